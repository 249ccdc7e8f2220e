use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Kind of a generated quiz question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionKind {
    MultipleChoice,
    TrueFalse,
    ShortAnswer,
}

impl QuestionKind {
    /// Classify a `Type:` label from model output (case-insensitive)
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.to_lowercase();
        if label.contains("multiple") {
            Some(Self::MultipleChoice)
        } else if label.contains("true") {
            Some(Self::TrueFalse)
        } else if label.contains("short") {
            Some(Self::ShortAnswer)
        } else {
            None
        }
    }

    /// Label used in the prompt grammar
    pub fn label(&self) -> &'static str {
        match self {
            Self::MultipleChoice => "Multiple Choice",
            Self::TrueFalse => "True or False",
            Self::ShortAnswer => "Short Answer",
        }
    }
}

/// One parsed quiz question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizItem {
    /// 1-based position among retained items
    pub number: usize,
    pub question: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    /// Letter (A-D) to option text; empty unless multiple choice
    #[serde(default)]
    pub choices: BTreeMap<String, String>,
    pub answer: String,
}

/// Which extraction flavour a caller wants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractMode {
    /// Keep every fragment as extracted (upload preview)
    Raw,
    /// Trim fragments and drop empty ones (prompt input)
    #[default]
    Prompt,
}

/// Preview response for `/upload/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub text: String,
}

/// Response for `/reviewer/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewerResponse {
    pub reviewer: String,
}

/// Response for `/quiz/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizResponse {
    pub quiz: Vec<QuizItem>,
}
