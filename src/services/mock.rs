use super::*;
use std::path::Path;

const SUPPORTED_EXTENSIONS: [&str; 4] = ["pdf", "doc", "docx", "txt"];
const MAX_MOCK_PATENTS: usize = 5;

/// Deterministic stand-ins for the analysis services.
///
/// Results depend only on the request, so tests can assert on them.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockServices;

impl DocumentRecognition for MockServices {
    fn recognize_document(
        &self,
        request: &DocumentRequest,
    ) -> Result<RecognizedDocument, ServiceError> {
        let path = Path::new(&request.file_path);
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| request.file_path.clone());
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        if !SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(ServiceError::UnsupportedDocument {
                file_name,
                supported: SUPPORTED_EXTENSIONS.join(", "),
            });
        }

        let sections = ["Abstract", "Introduction", "Technical Approach", "Results", "Conclusion"]
            .iter()
            .map(|title| DocumentSection {
                title: title.to_string(),
                content: format!("{} of {}", title, file_name),
            })
            .collect();
        let keywords = [
            ("artificial intelligence", 0.95),
            ("machine learning", 0.92),
            ("deep learning", 0.88),
            ("computer vision", 0.85),
        ]
        .iter()
        .map(|(keyword, score)| Keyword {
            keyword: keyword.to_string(),
            score: *score,
        })
        .collect();

        Ok(RecognizedDocument {
            content: format!(
                "Recognized content of {}: basic information, key techniques and applications.",
                file_name
            ),
            file_name,
            sections,
            keywords,
            recognition_score: 0.98,
        })
    }
}

impl PatentSearch for MockServices {
    fn query_patents(&self, query: &PatentQuery) -> Result<Vec<PatentRecord>, ServiceError> {
        let keywords: Vec<&str> = query
            .keywords
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .collect();
        if keywords.is_empty() {
            return Err(ServiceError::InvalidRequest {
                service: "patent search".to_string(),
                message: "at least one keyword is required".to_string(),
            });
        }

        let topic = keywords.join(" ");
        Ok((0..query.limit.min(MAX_MOCK_PATENTS))
            .map(|i| {
                let year = 2020 + i as u16;
                PatentRecord {
                    patent_id: format!("CN{}12345{:02}U", year, i),
                    title: format!("Intelligent processing method and system based on {}", topic),
                    applicant: format!("Research Institute {}", i),
                    application_year: year,
                    similarity_score: 0.95 - (i as f64 * 0.03),
                }
            })
            .collect())
    }
}

impl AchievementAnalysis for MockServices {
    fn generate_analysis(&self, request: &AnalysisRequest) -> Result<AnalysisReport, ServiceError> {
        if request.title.trim().is_empty() {
            return Err(ServiceError::InvalidRequest {
                service: "achievement analysis".to_string(),
                message: "the achievement title is empty".to_string(),
            });
        }

        let mut score: f64 = 5.0;
        score += match request.maturity.as_str() {
            "industrialized" | "pilot" => 2.0,
            "prototype" => 1.0,
            _ => 0.0,
        };
        score += (request.patents.len() as f64 * 0.4).min(2.0);
        if request.document.is_some() {
            score += 0.5;
        }
        let score = score.min(10.0);

        let field = if request.field.is_empty() {
            "its field"
        } else {
            request.field.as_str()
        };
        let mut advantages = vec![
            "Strong technical novelty with clear barriers to entry".to_string(),
            format!("Broad application scenarios in {}", field),
        ];
        if !request.patents.is_empty() {
            advantages.push(format!(
                "{} related patents indicate an active market",
                request.patents.len()
            ));
        }

        Ok(AnalysisReport {
            title: request.title.clone(),
            conversion_potential_score: score,
            advantages,
            risks: vec![
                "Limited commercialization experience".to_string(),
                "Fast-moving competition".to_string(),
            ],
            suggestions: vec![
                "Pilot with an industry partner before independent commercialization".to_string(),
                "Strengthen the team with business development experience".to_string(),
            ],
            summary: format!(
                "{} shows {} transfer potential.",
                request.title,
                if score >= 7.0 { "good" } else { "moderate" }
            ),
        })
    }
}
