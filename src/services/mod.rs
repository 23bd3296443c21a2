//! Analysis capabilities a host can call between or after workflow steps.
//!
//! The engine never calls these itself. A host reads the variables a session collected,
//! builds requests, and passes the results wherever it needs them. `MockServices`
//! implements every capability deterministically for demos and tests.

use crate::error::ServiceError;
use serde::{Deserialize, Serialize};

mod mock;
mod report;

pub use mock::MockServices;
pub use report::{ReportBindings, ReportPipeline};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRequest {
    pub file_path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSection {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub keyword: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizedDocument {
    pub file_name: String,
    pub content: String,
    pub sections: Vec<DocumentSection>,
    pub keywords: Vec<Keyword>,
    pub recognition_score: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatentQuery {
    pub keywords: Vec<String>,
    pub limit: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatentRecord {
    pub patent_id: String,
    pub title: String,
    pub applicant: String,
    pub application_year: u16,
    pub similarity_score: f64,
}

/// What is known about a research achievement when it is analyzed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub title: String,
    pub field: String,
    pub maturity: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub patents: Vec<PatentRecord>,
    pub document: Option<RecognizedDocument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub title: String,
    /// Transfer potential on a 0-10 scale.
    pub conversion_potential_score: f64,
    pub advantages: Vec<String>,
    pub risks: Vec<String>,
    pub suggestions: Vec<String>,
    pub summary: String,
}

impl AnalysisReport {
    /// Renders the report as Markdown.
    pub fn render(&self) -> String {
        let mut out = format!("# Transfer Analysis: {}\n\n", self.title);
        out.push_str(&format!(
            "Conversion potential: {:.1}/10\n\n",
            self.conversion_potential_score
        ));
        for (heading, items) in [
            ("Advantages", &self.advantages),
            ("Risks", &self.risks),
            ("Suggestions", &self.suggestions),
        ] {
            out.push_str(&format!("## {}\n", heading));
            for item in items {
                out.push_str(&format!("- {}\n", item));
            }
            out.push('\n');
        }
        out.push_str("## Summary\n");
        out.push_str(&self.summary);
        out.push('\n');
        out
    }
}

/// Extracts text, structure and keywords from an uploaded document.
pub trait DocumentRecognition {
    fn recognize_document(
        &self,
        request: &DocumentRequest,
    ) -> Result<RecognizedDocument, ServiceError>;
}

/// Finds patents related to an achievement.
pub trait PatentSearch {
    fn query_patents(&self, query: &PatentQuery) -> Result<Vec<PatentRecord>, ServiceError>;
}

/// Produces the transfer analysis of an achievement.
pub trait AchievementAnalysis {
    fn generate_analysis(&self, request: &AnalysisRequest) -> Result<AnalysisReport, ServiceError>;
}
