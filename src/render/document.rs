//! Markdown assessment document.

use crate::models::{option_letter, GeneratedQuestion};
use std::path::PathBuf;

/// Illustration state for one question, as resolved by the assembler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    /// The question has no illustration
    None,
    /// The file exists at this path
    Resolved(PathBuf),
    /// The question names a file that does not exist
    Missing(PathBuf),
}

/// A question paired with its resolved illustration.
#[derive(Debug, Clone)]
pub struct DocumentEntry<'a> {
    pub question: &'a GeneratedQuestion,
    pub image: ImageRef,
}

/// Render the full document: title, description, then one section per question.
pub fn render_document(title: &str, description: &str, entries: &[DocumentEntry<'_>]) -> String {
    let mut doc = format!("# {title}\n\n**Assessment Description:** {description}\n");

    for (i, entry) in entries.iter().enumerate() {
        doc.push_str("\n---\n\n");
        doc.push_str(&render_question(i + 1, entry));
    }

    doc
}

fn render_question(number: usize, entry: &DocumentEntry<'_>) -> String {
    let q = entry.question;
    let mut out = format!("## Question {number}\n\n**Question:** {}\n\n", q.question);

    match &entry.image {
        ImageRef::None => {}
        ImageRef::Resolved(path) => {
            out.push_str(&format!(
                "![Figure for question {number}]({})\n\n",
                path.display()
            ));
        }
        ImageRef::Missing(path) => {
            out.push_str(&format!("_Figure unavailable: {}_\n\n", path.display()));
        }
    }

    out.push_str("**Options:**\n\n");
    for (j, option) in q.options.iter().enumerate() {
        let line = format!("({}) {}", option_letter(j), option);
        if j == q.correct_index {
            out.push_str(&format!("- **{line}**\n"));
        } else {
            out.push_str(&format!("- {line}\n"));
        }
    }

    out.push_str(&format!("\n**Explanation:** {}\n\n", q.explanation));
    out.push_str("**Curriculum Mapping:**\n\n");
    out.push_str(&format!("- Subject: {}\n", q.curriculum.subject));
    out.push_str(&format!("- Unit: {}\n", q.curriculum.unit));
    out.push_str(&format!("- Topic: {}\n", q.curriculum.topic));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Curriculum;

    fn question() -> GeneratedQuestion {
        GeneratedQuestion {
            question: "If a triangle has a base of 10 cm and a height of 5 cm, what is its area?"
                .to_string(),
            options: vec!["25 cm²".into(), "30 cm²".into(), "35 cm²".into()],
            correct_index: 0,
            explanation: "Area = 1/2 × base × height = 25 cm²".to_string(),
            curriculum: Curriculum::new(
                "Quantitative Math",
                "Geometry and Measurement",
                "Area & Volume",
            ),
            image_path: None,
            figure: None,
        }
    }

    #[test]
    fn test_correct_option_is_bold() {
        let q = question();
        let doc = render_document(
            "Title",
            "Desc",
            &[DocumentEntry {
                question: &q,
                image: ImageRef::None,
            }],
        );

        assert!(doc.starts_with("# Title\n\n**Assessment Description:** Desc\n"));
        assert!(doc.contains("## Question 1\n\n**Question:** If a triangle"));
        assert!(doc.contains("- **(A) 25 cm²**\n- (B) 30 cm²\n- (C) 35 cm²\n"));
        assert!(doc.contains("**Explanation:** Area = 1/2"));
        assert!(doc.contains("- Topic: Area & Volume\n"));
        assert!(!doc.contains("Figure"));
    }

    #[test]
    fn test_image_states() {
        let q = question();
        let doc = render_document(
            "T",
            "D",
            &[
                DocumentEntry {
                    question: &q,
                    image: ImageRef::Resolved(PathBuf::from("/tmp/images/geometry_question_1.svg")),
                },
                DocumentEntry {
                    question: &q,
                    image: ImageRef::Missing(PathBuf::from("images/q6_hike_altitude.png")),
                },
            ],
        );

        assert!(doc.contains(
            "![Figure for question 1](/tmp/images/geometry_question_1.svg)"
        ));
        assert!(doc.contains("_Figure unavailable: images/q6_hike_altitude.png_"));
        assert_eq!(doc.matches("\n---\n").count(), 2);
    }
}
