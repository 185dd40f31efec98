//! Consistency audit for fixed question records.
//!
//! K_i: Findings are reports only. The declared `correct_index` and the
//! explanation text are never modified.

use crate::models::GeneratedQuestion;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// What looks wrong about a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FindingKind {
    /// Explanation names an index ("so index 2") other than the declared one
    StatedIndex { stated: usize },
    /// Explanation's final value equals a different option
    ExplanationResult { value: String, option_index: usize },
    /// Same question text as an earlier record
    DuplicateQuestion { first_position: usize },
}

/// One audit finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditFinding {
    /// 1-based position of the record in the bank
    pub position: usize,

    /// Declared correct index of the record
    pub declared_index: usize,

    #[serde(flatten)]
    pub kind: FindingKind,
}

impl fmt::Display for AuditFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            FindingKind::StatedIndex { stated } => write!(
                f,
                "question {}: explanation names index {stated}, declared index is {}",
                self.position, self.declared_index
            ),
            FindingKind::ExplanationResult {
                value,
                option_index,
            } => write!(
                f,
                "question {}: explanation arrives at '{value}' (option {option_index}), declared index is {}",
                self.position, self.declared_index
            ),
            FindingKind::DuplicateQuestion { first_position } => write!(
                f,
                "question {}: repeats question {first_position}",
                self.position
            ),
        }
    }
}

/// Audit a list of questions in order.
pub fn audit_questions(questions: &[GeneratedQuestion]) -> Vec<AuditFinding> {
    let mut findings = Vec::new();
    let mut seen: HashMap<String, usize> = HashMap::new();

    for (i, q) in questions.iter().enumerate() {
        let position = i + 1;
        let finding = |kind| AuditFinding {
            position,
            declared_index: q.correct_index,
            kind,
        };

        if let Some(stated) = stated_index(&q.explanation) {
            if stated != q.correct_index {
                findings.push(finding(FindingKind::StatedIndex { stated }));
            }
        }

        if let Some((value, option_index)) = explained_option(q) {
            if option_index != q.correct_index {
                findings.push(finding(FindingKind::ExplanationResult {
                    value,
                    option_index,
                }));
            }
        }

        let key = question_key(&q.question);
        if let Some(&first_position) = seen.get(&key) {
            findings.push(finding(FindingKind::DuplicateQuestion { first_position }));
        } else {
            seen.insert(key, position);
        }
    }

    findings
}

/// "index N" as written in explanations.
static RE_STATED_INDEX: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\bindex\s+(\d+)").ok());

/// Index named in the explanation, e.g. "so index 2".
fn stated_index(explanation: &str) -> Option<usize> {
    let re = RE_STATED_INDEX.as_ref()?;
    re.captures_iter(explanation)
        .last()
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Option matching the value after the explanation's last `=`.
///
/// The value is cut at the first `,` or `;` and loses a trailing period.
/// When the whole value matches no option its first word is tried.
fn explained_option(q: &GeneratedQuestion) -> Option<(String, usize)> {
    let (_, rest) = q.explanation.rsplit_once('=')?;
    let clause = rest
        .split([',', ';'])
        .next()
        .unwrap_or("")
        .trim()
        .trim_end_matches('.')
        .trim();

    let first_word = clause
        .split_whitespace()
        .next()
        .map(|w| w.trim_end_matches('.'))
        .unwrap_or("");

    [clause, first_word]
        .into_iter()
        .filter(|c| !c.is_empty())
        .find_map(|candidate| {
            q.options
                .iter()
                .position(|o| o.trim() == candidate)
                .map(|idx| (candidate.to_string(), idx))
        })
}

/// Case- and whitespace-insensitive key for duplicate detection.
fn question_key(question: &str) -> String {
    question
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}
