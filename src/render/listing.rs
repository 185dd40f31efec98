//! Plain terminal listing of questions.

use crate::models::{option_letter, GeneratedQuestion};

/// List questions with lettered options and the correct one marked.
///
/// With `details`, explanation, curriculum and image path follow each question.
pub fn render_listing(questions: &[GeneratedQuestion], details: bool) -> String {
    let mut out = String::new();

    for (i, q) in questions.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, q.question));
        for (j, option) in q.options.iter().enumerate() {
            let mark = if j == q.correct_index { " (Correct)" } else { "" };
            out.push_str(&format!("  {}) {}{}\n", option_letter(j), option, mark));
        }
        if details {
            out.push_str(&format!("Explanation: {}\n", q.explanation));
            out.push_str(&format!(
                "Subject: {}, Unit: {}, Topic: {}\n",
                q.curriculum.subject, q.curriculum.unit, q.curriculum.topic
            ));
            match &q.image_path {
                Some(path) => out.push_str(&format!("Image: {}\n", path.display())),
                None => out.push_str("Image: none\n"),
            }
            out.push_str(&"-".repeat(50));
            out.push('\n');
        } else {
            out.push('\n');
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::FixedQuestionBank;

    #[test]
    fn test_marks_correct_option() {
        let bank = FixedQuestionBank::builtin().unwrap();
        let listing = render_listing(&bank.take(1), false);
        assert_eq!(
            listing,
            "1. If n+5=5, what is the value of n?\n  A) 0 (Correct)\n  B) 1/5\n  C) 1\n  D) 5\n  E) 10\n\n"
        );
    }

    #[test]
    fn test_details() {
        let bank = FixedQuestionBank::builtin().unwrap();
        let listing = render_listing(&bank.take(2), true);
        assert!(listing.contains("Explanation: Subtract 5 from both sides: n = 0\n"));
        assert!(listing.contains("Subject: Quantitative Math, Unit: Algebra, Topic: Linear Equations\n"));
        assert!(listing.contains("Image: none\n"));
        assert!(listing.contains("Image: images/q2_shapes_sequence.png\n"));
    }
}
