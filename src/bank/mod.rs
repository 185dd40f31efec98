//! Fixed question bank.
//!
//! A deterministic alternative to the generators: fully specified question
//! records kept verbatim. The built-in bank is compiled in from
//! `assets/fixed_questions.jsonl`; any JSONL file with the same shape can
//! replace it.

mod audit;

pub use audit::*;

use crate::models::{GeneratedQuestion, MathgenError, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info};

/// Built-in fixed questions, one JSON object per line.
pub const BUILTIN_BANK: &str = include_str!("../../assets/fixed_questions.jsonl");

/// An ordered, immutable list of fixed questions.
#[derive(Debug, Clone)]
pub struct FixedQuestionBank {
    questions: Vec<GeneratedQuestion>,
}

impl FixedQuestionBank {
    /// Load the compiled-in bank.
    pub fn builtin() -> Result<Self> {
        Self::parse(BUILTIN_BANK.lines().map(|l| Ok(l.to_string())))
    }

    /// Load a bank from a JSONL file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| MathgenError::io("opening fixed questions file", e))?;
        let reader = BufReader::new(file);
        let bank = Self::parse(
            reader
                .lines()
                .map(|l| l.map_err(|e| MathgenError::io("reading fixed questions file", e))),
        )?;

        info!(path = %path.display(), count = bank.len(), "Loaded fixed questions");
        Ok(bank)
    }

    /// Load from the given file, or fall back to the built-in bank.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::builtin(),
        }
    }

    fn parse<I>(lines: I) -> Result<Self>
    where
        I: IntoIterator<Item = Result<String>>,
    {
        let mut questions = Vec::new();

        for (line_num, line) in lines.into_iter().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let question: GeneratedQuestion =
                serde_json::from_str(&line).map_err(|e| MathgenError::InvalidFixedQuestion {
                    line: line_num + 1,
                    reason: e.to_string(),
                })?;
            question
                .check()
                .map_err(|reason| MathgenError::InvalidFixedQuestion {
                    line: line_num + 1,
                    reason,
                })?;
            questions.push(question);
        }

        debug!(count = questions.len(), "Parsed fixed question bank");
        Ok(Self { questions })
    }

    /// The first `count` questions (all of them if the bank is shorter).
    pub fn take(&self, count: usize) -> Vec<GeneratedQuestion> {
        self.questions.iter().take(count).cloned().collect()
    }

    pub fn questions(&self) -> &[GeneratedQuestion] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Flag records whose explanation disagrees with their declared answer.
    ///
    /// Records are reported, never rewritten.
    pub fn audit(&self) -> Vec<AuditFinding> {
        audit_questions(&self.questions)
    }
}
