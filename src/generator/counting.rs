//! Counting questions (fundamental counting principle).
//!
//! K_i: correct = product of the option counts of every component.
//! Distractors: off-by-one both ways, double, and the sum of counts.

use super::options::OptionSet;
use super::RandomSource;
use crate::models::{
    ConfigError, CountingConfig, CountingContext, Curriculum, GeneratedQuestion, GenerationConfig,
    MathgenError, Result,
};
use tracing::debug;

/// Pick a context uniformly and build a question from it.
pub fn generate<R: RandomSource>(
    config: &CountingConfig,
    settings: &GenerationConfig,
    rng: &mut R,
) -> Result<GeneratedQuestion> {
    let ctx = rng
        .choose(&config.contexts)
        .ok_or(ConfigError::NoContexts("counting"))?;

    build(ctx, config.curriculum(), settings, rng)
}

/// Build a counting question from a specific context.
pub fn build<R: RandomSource>(
    ctx: &CountingContext,
    curriculum: Curriculum,
    settings: &GenerationConfig,
    rng: &mut R,
) -> Result<GeneratedQuestion> {
    let counts = ctx.counts();
    let correct = ctx.combinations().ok_or_else(|| {
        MathgenError::InvalidInput(format!(
            "counting context '{}' has too many combinations",
            ctx.scenario
        ))
    })?;
    let sum: u64 = counts.iter().sum();

    let mut set = OptionSet::new(correct.to_string());
    set.offer_all(
        [
            correct + 1,
            correct.saturating_sub(1),
            correct * 2,
            sum,
        ]
        .map(|v| v.to_string()),
        settings.option_count,
    );

    // Deterministic distractors can coincide for tiny contexts; top up with
    // nearby values.
    let upper = (correct * 2)
        .max(sum)
        .saturating_add(settings.option_count as u64);
    let upper = i64::try_from(upper).unwrap_or(i64::MAX);
    let attempts = set.fill(
        settings.option_count,
        settings.max_distractor_attempts,
        rng,
        |rng| rng.int_inclusive(1, upper).to_string(),
    );

    let (options, correct_index) = set.finish("counting", attempts, rng)?;

    debug!(
        scenario = %ctx.scenario,
        item = %ctx.item,
        correct,
        correct_index,
        "Generated counting question"
    );

    Ok(GeneratedQuestion {
        question: format!(
            "A {} offers {}. How many combos?\n\n{}",
            ctx.scenario,
            ctx.components.join(", "),
            render_table(ctx)
        ),
        options,
        correct_index,
        explanation: format!("Multiply: {} = {}", join_counts(&counts), correct),
        curriculum,
        image_path: None,
        figure: None,
    })
}

/// Markdown table of the component options.
///
/// Rows zip the option lists positionally and stop at the shortest list.
/// This is a display of what is on offer, not an enumeration of combinations.
pub fn render_table(ctx: &CountingContext) -> String {
    let mut table = format!("| {} |\n", ctx.components.join(" | "));
    table.push('|');
    table.push_str(&" :---: |".repeat(ctx.components.len()));
    table.push('\n');

    let rows = ctx
        .component_options
        .iter()
        .map(Vec::len)
        .min()
        .unwrap_or(0);
    for i in 0..rows {
        let cells: Vec<&str> = ctx
            .component_options
            .iter()
            .map(|opts| opts[i].as_str())
            .collect();
        table.push_str(&format!("| {} |\n", cells.join(" | ")));
    }
    table
}

fn join_counts(counts: &[u64]) -> String {
    counts
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(" × ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{RngSource, SequenceSource};
    use crate::models::Config;
    use proptest::prelude::*;

    fn context(options: &[&[&str]]) -> CountingContext {
        CountingContext {
            scenario: "pizza restaurant".to_string(),
            item: "pizza".to_string(),
            components: (0..options.len()).map(|i| format!("c{i}")).collect(),
            component_options: options
                .iter()
                .map(|opts| opts.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    fn curriculum() -> Curriculum {
        Curriculum::new(
            "Quantitative Math",
            "Data Analysis & Probability",
            "Counting & Arrangement Problems",
        )
    }

    #[test]
    fn test_three_by_three_by_three() {
        let config = Config::builtin().unwrap();
        let mut rng = RngSource::seeded(11);
        let q = generate(&config.counting, &config.generation, &mut rng).unwrap();

        assert_eq!(q.options.len(), 5);
        assert_eq!(q.options[q.correct_index], "27");
        assert_eq!(q.options.iter().filter(|o| *o == "27").count(), 1);
        assert!(q.explanation.contains("3 × 3 × 3 = 27"));
        assert!(q.has_unique_options());

        let mut sorted = q.options.clone();
        sorted.sort();
        assert_eq!(sorted, vec!["26", "27", "28", "54", "9"]);

        assert_eq!(q.curriculum, curriculum());
        assert!(q.question.starts_with(
            "A pizza restaurant offers size, crust, topping. How many combos?\n\n"
        ));
    }

    #[test]
    fn test_table_zips_positionally() {
        let ctx = context(&[&["Small", "Large"], &["Thin", "Thick", "Stuffed"]]);
        assert_eq!(
            render_table(&ctx),
            "| c0 | c1 |\n| :---: | :---: |\n| Small | Thin |\n| Large | Thick |\n"
        );
    }

    #[test]
    fn test_single_option_context_stays_unique() {
        // counts [1]: 1, 2, 0, 2, 1 would collide without resampling
        let ctx = context(&[&["Only"]]);
        let settings = GenerationConfig::default();
        let mut rng = SequenceSource::new(vec![3, 1, 4, 1, 5, 9, 2, 6]);
        let q = build(&ctx, curriculum(), &settings, &mut rng).unwrap();

        assert_eq!(q.options.len(), 5);
        assert!(q.has_unique_options());
        assert_eq!(q.options[q.correct_index], "1");
        assert_eq!(q.explanation, "Multiply: 1 = 1");
    }

    #[test]
    fn test_exhausted_budget_is_an_error() {
        let ctx = context(&[&["Only"]]);
        let settings = GenerationConfig {
            max_distractor_attempts: 0,
            ..GenerationConfig::default()
        };
        let mut rng = SequenceSource::zeros();
        let q = build(&ctx, curriculum(), &settings, &mut rng).unwrap();
        // 1, 2, 0 are still distinct: three options is enough
        assert_eq!(q.options.len(), 3);

        let settings = GenerationConfig {
            max_distractor_attempts: 0,
            option_count: 2,
            ..GenerationConfig::default()
        };
        assert!(matches!(
            build(&ctx, curriculum(), &settings, &mut rng),
            Err(MathgenError::DegenerateOptions { .. })
        ));
    }

    #[test]
    fn test_oversized_context_is_an_error() {
        let ctx = CountingContext {
            scenario: "shop".to_string(),
            item: "thing".to_string(),
            components: (0..64).map(|i| format!("c{i}")).collect(),
            component_options: vec![vec!["a".to_string(), "b".to_string()]; 64],
        };
        let mut rng = SequenceSource::zeros();
        assert!(matches!(
            build(&ctx, curriculum(), &GenerationConfig::default(), &mut rng),
            Err(MathgenError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_context_selection_uses_source() {
        let mut config = Config::builtin().unwrap();
        config.counting.contexts.push(context(&[&["a", "b"], &["c", "d"]]));

        let mut rng = SequenceSource::new(vec![1]);
        let q = generate(&config.counting, &config.generation, &mut rng).unwrap();
        assert_eq!(q.options[q.correct_index], "4");
        assert!(q.question.contains("offers c0, c1."));
    }

    proptest! {
        #[test]
        fn prop_correct_is_product_and_options_unique(
            sizes in prop::collection::vec(1usize..6, 1..5),
            seed in any::<u64>(),
        ) {
            let ctx = CountingContext {
                scenario: "shop".to_string(),
                item: "thing".to_string(),
                components: (0..sizes.len()).map(|i| format!("c{i}")).collect(),
                component_options: sizes
                    .iter()
                    .map(|&n| (0..n).map(|j| format!("o{j}")).collect())
                    .collect(),
            };
            let expected: u64 = sizes.iter().map(|&n| n as u64).product();

            let mut rng = RngSource::seeded(seed);
            let q = build(&ctx, curriculum(), &GenerationConfig::default(), &mut rng).unwrap();

            prop_assert!(q.has_unique_options());
            prop_assert_eq!(q.options.len(), 5);
            prop_assert_eq!(&q.options[q.correct_index], &expected.to_string());
            let explained: u64 = q
                .explanation
                .trim_start_matches("Multiply: ")
                .split(" = ")
                .next()
                .unwrap()
                .split(" × ")
                .map(|n| n.parse::<u64>().unwrap())
                .product();
            prop_assert_eq!(explained, expected);
        }
    }
}
