//! Document and classification record models.
//!
//! Field names on serialized types follow the Spanish schema consumed by
//! downstream tooling (`documento`, `archivo`, `tema_general`, ...). The
//! Gemini prompt asks for the same schema, so parsed responses map onto
//! these types directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Model confidence in a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Baja,
    Media,
    Alta,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Baja => "baja",
            Self::Media => "media",
            Self::Alta => "alta",
        }
    }

    /// Case-insensitive parse, since model output is not always lowercase.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "baja" => Some(Self::Baja),
            "media" => Some(Self::Media),
            "alta" => Some(Self::Alta),
            _ => None,
        }
    }
}

/// A PDF with its extracted text, ready for classification.
#[derive(Debug, Clone)]
pub struct Document {
    /// 1-based position within the scanned folder.
    pub index: usize,
    /// Path to the source file.
    pub path: PathBuf,
    /// File name without directory components.
    pub filename: String,
    /// Extracted text, already bounded by the page and character limits.
    pub text: String,
    /// Number of pages actually read.
    pub pages_read: usize,
}

/// The three-level topic hierarchy returned by the model for one document.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicClassification {
    pub general_topic: String,
    pub subtopic: String,
    pub specific_topic: String,
    pub confidence: Confidence,
    pub keywords: Vec<String>,
}

/// A finalized classification for one document, as it appears in exports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationRecord {
    /// 1-based position of the document within the run.
    #[serde(rename = "documento")]
    pub index: usize,
    /// Source file name.
    #[serde(rename = "archivo")]
    pub filename: String,
    /// Top-level category, e.g. "Historia" or "Tecnología".
    #[serde(rename = "tema_general")]
    pub general_topic: String,
    /// Subcategory within the general topic.
    #[serde(rename = "subtema")]
    pub subtopic: String,
    /// Most specific topic describing the content.
    #[serde(rename = "tema_especifico")]
    pub specific_topic: String,
    /// Model confidence for this classification.
    #[serde(rename = "confianza")]
    pub confidence: Confidence,
    /// Keywords describing the document.
    #[serde(rename = "palabras_clave")]
    pub keywords: Vec<String>,
    /// When the result was aggregated.
    pub timestamp: DateTime<Utc>,
}
