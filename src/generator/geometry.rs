//! Circle-packing geometry questions.
//!
//! K_i: `rows × cols` circles of radius r packed in a grid fill a rectangle
//! of `rows·2r` by `cols·2r`. Both sides are truncated toward zero for the
//! answer string.

use super::options::OptionSet;
use super::RandomSource;
use crate::models::{
    Arrangement, ConfigError, Curriculum, GeneratedQuestion, GenerationConfig, GeometryConfig,
    GeometryContext, PackingFigure, Result,
};
use std::path::Path;
use tracing::debug;

/// Bounds for randomly padded "W × L" distractors.
const PAD_MIN: i64 = 2;
const PAD_MAX: i64 = 12;

/// Pick a context, arrangement and radius, then build a question.
pub fn generate<R: RandomSource>(
    config: &GeometryConfig,
    settings: &GenerationConfig,
    rng: &mut R,
    image_path: Option<&Path>,
) -> Result<GeneratedQuestion> {
    if config.contexts.is_empty() {
        return Err(ConfigError::NoContexts("geometry").into());
    }
    let index = rng.index(config.contexts.len());
    let ctx = &config.contexts[index];
    let arrangement = *rng
        .choose(&ctx.arrangements)
        .ok_or_else(|| ConfigError::InvalidContext {
            kind: "geometry",
            index,
            reason: "no arrangements".to_string(),
        })?;
    let radius = sample_radius(ctx.radius_range, rng);

    build(
        ctx,
        arrangement,
        radius,
        config.curriculum(),
        settings,
        rng,
        image_path,
    )
}

/// Build a geometry question for a fixed layout and radius.
pub fn build<R: RandomSource>(
    ctx: &GeometryContext,
    arrangement: Arrangement,
    radius: f64,
    curriculum: Curriculum,
    settings: &GenerationConfig,
    rng: &mut R,
    image_path: Option<&Path>,
) -> Result<GeneratedQuestion> {
    let figure = PackingFigure {
        rows: arrangement.rows,
        cols: arrangement.cols,
        radius,
    };
    let (width, length) = (figure.width(), figure.length());

    let correct = dims(width, length);
    let mut set = OptionSet::new(correct.clone());
    set.offer_all(
        [dims(width / 2.0, length / 2.0), dims(length, width)],
        settings.option_count,
    );

    let attempts = set.fill(
        settings.option_count,
        settings.max_distractor_attempts,
        rng,
        |rng| {
            let w = rng.int_inclusive(PAD_MIN, PAD_MAX);
            let l = rng.int_inclusive(PAD_MIN, PAD_MAX);
            format!("{w} × {l}")
        },
    );

    let (options, correct_index) = set.finish("geometry", attempts, rng)?;

    debug!(
        arrangement = %arrangement,
        radius,
        correct = %correct,
        correct_index,
        "Generated geometry question"
    );

    let d = figure.diameter();
    Ok(GeneratedQuestion {
        question: format!(
            "The top view of a {} holding {} tightly packed {} is shown. Radius = {} cm. Find base dimensions.",
            ctx.container,
            arrangement.count(),
            ctx.objects,
            measure(radius)
        ),
        options,
        correct_index,
        explanation: format!(
            "{} × {} cm = {} cm and {} × {} cm = {} cm",
            arrangement.rows,
            measure(d),
            measure(width),
            arrangement.cols,
            measure(d),
            measure(length)
        ),
        curriculum,
        image_path: image_path.map(Path::to_path_buf),
        figure: Some(figure),
    })
}

/// Radius drawn from the configured range, to one decimal place.
///
/// A degenerate range returns its bound without consuming a draw.
fn sample_radius<R: RandomSource>((min, max): (f64, f64), rng: &mut R) -> f64 {
    if max <= min {
        return min;
    }
    let r = (rng.float_between(min, max) * 10.0).round() / 10.0;
    r.clamp(min, max)
}

/// "W × L" with both sides truncated toward zero.
fn dims(width: f64, length: f64) -> String {
    format!("{} × {}", width.trunc() as i64, length.trunc() as i64)
}

/// Decimal rendering that keeps one place for whole numbers ("3.0").
fn measure(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}
