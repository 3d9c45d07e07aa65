//! crates/text_forge_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or HTTP framework; the
//! serde derives exist because the same shapes travel over the wire and
//! into `jsonb` columns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Represents a user - every stored record is attached to one. The service
// bootstraps a single guest user at startup and attaches all records to it.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i32,
    pub username: String,
}

//=========================================================================================
// Humanization
//=========================================================================================

/// How aggressively the humanizer rewrites the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HumanizeLevel {
    Light,
    Moderate,
    Strong,
}

impl HumanizeLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            HumanizeLevel::Light => "light",
            HumanizeLevel::Moderate => "moderate",
            HumanizeLevel::Strong => "strong",
        }
    }

    /// Maximum number of sentence swaps the level permits.
    pub fn strength(self) -> usize {
        match self {
            HumanizeLevel::Light => 1,
            HumanizeLevel::Moderate => 2,
            HumanizeLevel::Strong => 3,
        }
    }
}

/// The writing style applied to the rewritten text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HumanizeStyle {
    Standard,
    Academic,
    Creative,
    Professional,
    Casual,
}

impl HumanizeStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            HumanizeStyle::Standard => "standard",
            HumanizeStyle::Academic => "academic",
            HumanizeStyle::Creative => "creative",
            HumanizeStyle::Professional => "professional",
            HumanizeStyle::Casual => "casual",
        }
    }

    /// The canned closing sentence appended for this style.
    pub fn suffix(self) -> &'static str {
        match self {
            HumanizeStyle::Academic => {
                "This analysis provides a comprehensive examination of the topic through an academic lens."
            }
            HumanizeStyle::Creative => {
                "The vibrant tapestry of ideas weaves together in this creative exploration."
            }
            HumanizeStyle::Professional => {
                "This professional assessment offers key insights into the matter at hand."
            }
            HumanizeStyle::Casual => "Just thinking out loud here, but that's my take on things!",
            HumanizeStyle::Standard => "This represents a balanced perspective on the subject.",
        }
    }
}

/// Options controlling a single humanize request. The extended fields are
/// accepted and persisted but only the core trio of flags affects the
/// simulated rewrite.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HumanizationOptions {
    pub level: HumanizeLevel,
    pub style: HumanizeStyle,
    pub fix_grammar: bool,
    pub reorder_sentences: bool,
    pub add_synonyms: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_readability: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub randomness: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub preserved_words: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub avoided_words: Vec<String>,
}

impl Default for HumanizationOptions {
    fn default() -> Self {
        Self {
            level: HumanizeLevel::Moderate,
            style: HumanizeStyle::Standard,
            fix_grammar: false,
            reorder_sentences: false,
            add_synonyms: false,
            target_readability: None,
            target_length: None,
            tone: None,
            randomness: None,
            audience: None,
            preserved_words: Vec::new(),
            avoided_words: Vec::new(),
        }
    }
}

/// Simulated plagiarism scores. Uniformly sampled, never derived from the
/// text.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlagiarismScore {
    /// Percent unique, 90-99.
    pub uniqueness: u8,
    /// Percent similar to existing sources, 0-9.
    pub similarity: u8,
}

/// Simulated per-detector AI-authorship percentages.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiDetection {
    /// 1-10.
    pub gpt_detector: u8,
    /// 1-12.
    pub zero_gpt: u8,
    /// 1-8.
    pub content_detective: u8,
}

/// The full result of one humanize call.
#[derive(Debug, Clone)]
pub struct HumanizeOutcome {
    pub humanized_text: String,
    pub plagiarism_score: PlagiarismScore,
    pub ai_detection: AiDetection,
}

/// A stored humanization record. Insert-only; never mutated or deleted.
#[derive(Debug, Clone)]
pub struct HumanizedText {
    pub id: i32,
    pub user_id: i32,
    pub original_text: String,
    pub humanized_text: String,
    pub options: HumanizationOptions,
    pub plagiarism_score: Option<PlagiarismScore>,
    pub ai_detection: Option<AiDetection>,
    pub created_at: DateTime<Utc>,
}

/// The insertable part of a `HumanizedText` row.
#[derive(Debug, Clone)]
pub struct NewHumanizedText {
    pub user_id: i32,
    pub original_text: String,
    pub humanized_text: String,
    pub options: HumanizationOptions,
    pub plagiarism_score: PlagiarismScore,
    pub ai_detection: AiDetection,
}

//=========================================================================================
// File conversion
//=========================================================================================

/// The operation applied to a batch of uploaded files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileOperation {
    Convert,
    Compress,
    Merge,
    Split,
    Edit,
}

impl FileOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            FileOperation::Convert => "convert",
            FileOperation::Compress => "compress",
            FileOperation::Merge => "merge",
            FileOperation::Split => "split",
            FileOperation::Edit => "edit",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "convert" => Some(FileOperation::Convert),
            "compress" => Some(FileOperation::Compress),
            "merge" => Some(FileOperation::Merge),
            "split" => Some(FileOperation::Split),
            "edit" => Some(FileOperation::Edit),
            _ => None,
        }
    }
}

/// Options for one conversion request, immutable for its duration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionOptions {
    pub from_format: String,
    pub to_format: String,
    pub operation: FileOperation,
}

/// A stored record describing one converted output file.
#[derive(Debug, Clone)]
pub struct ConvertedFile {
    pub id: i32,
    pub user_id: i32,
    pub original_filename: String,
    pub converted_filename: String,
    pub original_format: String,
    pub converted_format: String,
    pub operation: FileOperation,
    pub file_size: i64,
    pub download_url: String,
    pub created_at: DateTime<Utc>,
}

/// The insertable part of a `ConvertedFile` row.
#[derive(Debug, Clone)]
pub struct NewConvertedFile {
    pub user_id: i32,
    pub original_filename: String,
    pub converted_filename: String,
    pub original_format: String,
    pub converted_format: String,
    pub operation: FileOperation,
    pub file_size: i64,
    pub download_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_strength_maps_to_swap_budget() {
        assert_eq!(HumanizeLevel::Light.strength(), 1);
        assert_eq!(HumanizeLevel::Moderate.strength(), 2);
        assert_eq!(HumanizeLevel::Strong.strength(), 3);
    }

    #[test]
    fn operation_parse_is_inverse_of_as_str() {
        for op in [
            FileOperation::Convert,
            FileOperation::Compress,
            FileOperation::Merge,
            FileOperation::Split,
            FileOperation::Edit,
        ] {
            assert_eq!(FileOperation::parse(op.as_str()), Some(op));
        }
        assert_eq!(FileOperation::parse("rotate"), None);
    }

    #[test]
    fn options_accept_camel_case_wire_shape() {
        let json = r#"{
            "level": "light",
            "style": "academic",
            "fixGrammar": true,
            "reorderSentences": true,
            "addSynonyms": false
        }"#;
        let opts: HumanizationOptions = serde_json::from_str(json).unwrap();
        assert_eq!(opts.level, HumanizeLevel::Light);
        assert_eq!(opts.style, HumanizeStyle::Academic);
        assert!(opts.reorder_sentences);
        assert!(opts.preserved_words.is_empty());
    }
}
