//! Question and result types for mathgen.
//!
//! K_i: These types represent the core data flow: generator or fixed bank →
//! assembler → document, formatted export and JSONL records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;
use uuid::Uuid;

/// Curriculum mapping for a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Curriculum {
    pub subject: String,
    pub unit: String,
    pub topic: String,
}

impl Curriculum {
    pub fn new(subject: &str, unit: &str, topic: &str) -> Self {
        Self {
            subject: subject.to_string(),
            unit: unit.to_string(),
            topic: topic.to_string(),
        }
    }
}

/// Circles packed in a grid, as drawn in a geometry illustration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PackingFigure {
    pub rows: u32,
    pub cols: u32,
    /// Circle radius in cm
    pub radius: f64,
}

impl PackingFigure {
    pub fn diameter(&self) -> f64 {
        self.radius * 2.0
    }

    /// Extent along the rows (`rows × diameter`).
    pub fn width(&self) -> f64 {
        f64::from(self.rows) * self.diameter()
    }

    /// Extent along the columns (`cols × diameter`).
    pub fn length(&self) -> f64 {
        f64::from(self.cols) * self.diameter()
    }
}

/// A multiple-choice question, generated or fixed.
///
/// K_i: `correct_index < options.len()`. Generated questions also have
/// unique options; fixed records are checked on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedQuestion {
    /// Question prose (may embed a Markdown table)
    pub question: String,

    /// Option strings in display order
    pub options: Vec<String>,

    /// Position of the correct option in `options`
    pub correct_index: usize,

    /// Worked solution
    pub explanation: String,

    /// Subject/unit/topic classification
    #[serde(flatten)]
    pub curriculum: Curriculum,

    /// Illustration to embed; resolved by the assembler
    #[serde(
        default,
        deserialize_with = "empty_path_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_path: Option<PathBuf>,

    /// Packing layout for geometry questions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub figure: Option<PackingFigure>,
}

impl GeneratedQuestion {
    /// The option marked correct, if the index is in range.
    pub fn correct_option(&self) -> Option<&str> {
        self.options.get(self.correct_index).map(String::as_str)
    }

    pub fn has_unique_options(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.options.len());
        self.options.iter().all(|o| seen.insert(o.as_str()))
    }

    /// Check structural invariants. Returns the first violation.
    pub fn check(&self) -> Result<(), String> {
        if self.options.len() < 2 {
            return Err(format!("only {} option(s)", self.options.len()));
        }
        if self.options.len() > OPTION_LETTERS.len() {
            return Err(format!(
                "{} options, at most {} can be lettered",
                self.options.len(),
                OPTION_LETTERS.len()
            ));
        }
        if self.correct_index >= self.options.len() {
            return Err(format!(
                "correct_index {} out of range for {} options",
                self.correct_index,
                self.options.len()
            ));
        }
        if !self.has_unique_options() {
            return Err("duplicate options".to_string());
        }
        Ok(())
    }
}

/// Letters used to label options in rendered output.
pub const OPTION_LETTERS: [char; 5] = ['A', 'B', 'C', 'D', 'E'];

/// Label for the option at `index` ('A' for 0).
pub fn option_letter(index: usize) -> char {
    OPTION_LETTERS.get(index).copied().unwrap_or('?')
}

fn empty_path_as_none<'de, D>(deserializer: D) -> Result<Option<PathBuf>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.trim().is_empty()).map(PathBuf::from))
}

/// Where a question came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionSource {
    /// Produced by a generator from a context
    Dynamic,
    /// Taken verbatim from the fixed bank
    Fixed,
}

/// Exported question record (one JSONL line).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionRecord {
    /// Unique identifier
    pub id: Uuid,

    /// 1-based position in the assessment
    pub order: usize,

    pub source: QuestionSource,

    pub generated_at: DateTime<Utc>,

    #[serde(flatten)]
    pub question: GeneratedQuestion,
}

impl QuestionRecord {
    pub fn new(order: usize, source: QuestionSource, question: GeneratedQuestion) -> Self {
        Self {
            id: Uuid::new_v4(),
            order,
            source,
            generated_at: Utc::now(),
            question,
        }
    }
}

/// Statistics for an assessment run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunStats {
    /// Questions written
    pub total_questions: usize,

    /// Counting questions generated
    pub counting_questions: usize,

    /// Geometry questions generated
    pub geometry_questions: usize,

    /// Questions taken from the fixed bank
    pub fixed_questions: usize,

    /// Illustrations rendered
    pub illustrations: usize,

    /// Image references that did not resolve to a file
    pub missing_assets: usize,

    /// Fixed bank audit findings
    pub audit_findings: usize,

    /// Total runtime in seconds
    pub runtime_secs: f64,

    /// Questions per hour throughput
    pub throughput_per_hour: f64,
}

impl RunStats {
    /// Calculate derived stats.
    pub fn finalize(&mut self) {
        if self.runtime_secs > 0.0 {
            self.throughput_per_hour = self.total_questions as f64 / self.runtime_secs * 3600.0;
        }
    }
}
