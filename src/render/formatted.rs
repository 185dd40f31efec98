//! `@`-tagged plain text export.
//!
//! One block per question; the correct option is tagged `@@option`.

use crate::models::GeneratedQuestion;

const INSTRUCTION: &str = "Choose the correct answer.";
const DIFFICULTY: &str = "moderate";
const MARKS: u32 = 1;

/// Render the export for the given questions.
pub fn render_formatted(title: &str, description: &str, questions: &[GeneratedQuestion]) -> String {
    let mut out = format!("@title {title}\n@description {description}\n\n");

    for (i, q) in questions.iter().enumerate() {
        out.push_str(&format!("@question {}\n", q.question));
        out.push_str(&format!("@instruction {INSTRUCTION}\n"));
        out.push_str(&format!("@difficulty {DIFFICULTY}\n"));
        out.push_str(&format!("@Order {}\n", i + 1));
        for (j, option) in q.options.iter().enumerate() {
            let tag = if j == q.correct_index { "@@option" } else { "@option" };
            out.push_str(&format!("{tag} {option}\n"));
        }
        out.push_str("@explanation\n");
        out.push_str(&format!("{}\n", q.explanation));
        out.push_str(&format!("@subject {}\n", q.curriculum.subject));
        out.push_str(&format!("@unit {}\n", q.curriculum.unit));
        out.push_str(&format!("@topic {}\n", q.curriculum.topic));
        out.push_str(&format!("@plusmarks {MARKS}\n\n"));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Curriculum;

    #[test]
    fn test_block_layout() {
        let q = GeneratedQuestion {
            question: "If n+5=5, what is the value of n?".to_string(),
            options: vec!["0".into(), "1/5".into(), "1".into()],
            correct_index: 0,
            explanation: "Subtract 5 from both sides: n = 0".to_string(),
            curriculum: Curriculum::new("Quantitative Math", "Algebra", "Linear Equations"),
            image_path: None,
            figure: None,
        };

        let out = render_formatted("T", "D", &[q.clone(), q]);
        let expected_block = "@question If n+5=5, what is the value of n?\n\
@instruction Choose the correct answer.\n\
@difficulty moderate\n\
@Order 2\n\
@@option 0\n\
@option 1/5\n\
@option 1\n\
@explanation\n\
Subtract 5 from both sides: n = 0\n\
@subject Quantitative Math\n\
@unit Algebra\n\
@topic Linear Equations\n\
@plusmarks 1\n\n";

        assert!(out.starts_with("@title T\n@description D\n\n@question"));
        assert!(out.ends_with(expected_block));
        assert_eq!(out.matches("@@option").count(), 2);
    }
}
