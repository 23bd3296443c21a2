use super::*;
use crate::ast::Value;
use crate::store::VariableStore;
use tracing::{debug, info};

const PATENT_LIMIT: usize = 5;

/// Where the pipeline finds its inputs in the variable store.
///
/// `basic_info` names a form submission with `achievement_name`, `tech_field`,
/// `completion_stage`, `description` and `keywords` fields. `document` names a
/// submission whose `file` field holds the path of an uploaded document; its
/// `description` is used when the basic info has none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportBindings {
    pub basic_info: String,
    pub document: String,
}

impl Default for ReportBindings {
    fn default() -> Self {
        Self {
            basic_info: "basic_info".to_string(),
            document: "document_info".to_string(),
        }
    }
}

/// Runs recognition, patent search and analysis over what a session collected.
pub struct ReportPipeline<'a> {
    documents: &'a dyn DocumentRecognition,
    patents: &'a dyn PatentSearch,
    analysis: &'a dyn AchievementAnalysis,
    bindings: ReportBindings,
}

impl<'a> ReportPipeline<'a> {
    pub fn new(
        documents: &'a dyn DocumentRecognition,
        patents: &'a dyn PatentSearch,
        analysis: &'a dyn AchievementAnalysis,
    ) -> Self {
        Self {
            documents,
            patents,
            analysis,
            bindings: ReportBindings::default(),
        }
    }

    pub fn with_bindings(mut self, bindings: ReportBindings) -> Self {
        self.bindings = bindings;
        self
    }

    pub fn run(&self, variables: &VariableStore) -> Result<AnalysisReport, ServiceError> {
        let info = variables.get(&self.bindings.basic_info);
        let mut request = AnalysisRequest {
            title: field_text(info, "achievement_name"),
            field: field_text(info, "tech_field"),
            maturity: field_text(info, "completion_stage"),
            description: field_text(info, "description"),
            keywords: keywords(info.get("keywords")),
            ..Default::default()
        };

        let upload = variables.get(&self.bindings.document);
        if request.description.is_empty() {
            request.description = field_text(upload, "description");
        }

        let file = field_text(upload, "file");
        if !file.is_empty() {
            let document = self
                .documents
                .recognize_document(&DocumentRequest { file_path: file })?;
            debug!(file = %document.file_name, sections = document.sections.len(), "Document recognized");
            if request.keywords.is_empty() {
                request.keywords = document.keywords.iter().map(|k| k.keyword.clone()).collect();
            }
            request.document = Some(document);
        }

        if !request.keywords.is_empty() {
            request.patents = self.patents.query_patents(&PatentQuery {
                keywords: request.keywords.clone(),
                limit: PATENT_LIMIT,
            })?;
        }

        let report = self.analysis.generate_analysis(&request)?;
        info!(
            title = %report.title,
            score = report.conversion_potential_score,
            patents = request.patents.len(),
            "Analysis report generated"
        );
        Ok(report)
    }
}

fn field_text(submission: &Value, key: &str) -> String {
    submission
        .get(key)
        .map(|v| v.to_string().trim().to_string())
        .unwrap_or_default()
}

/// Accepts either a list of keywords or a comma-separated string.
fn keywords(value: Option<&Value>) -> Vec<String> {
    let raw: Vec<String> = match value {
        Some(Value::List(items)) => items.iter().map(Value::to_string).collect(),
        Some(Value::Text(text)) => text.split(',').map(str::to_string).collect(),
        _ => Vec::new(),
    };
    raw.into_iter()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .collect()
}
