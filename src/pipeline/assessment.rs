//! Assessment pipeline.
//!
//! Pipeline flow:
//! Generators | Fixed bank → Questions → Illustrations → Document + Export + JSONL

use super::output::{ensure_dir, records_to_jsonl, write_atomic};
use crate::bank::FixedQuestionBank;
use crate::generator::{QuestionGenerator, RandomSource, RngSource};
use crate::models::{
    Config, GeneratedQuestion, MathgenError, OutputConfig, QuestionRecord, QuestionSource, Result,
    RunStats,
};
use crate::render::{
    render_document, render_formatted, render_packing_svg, DocumentEntry, ImageRef,
};
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Where the questions of a run come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Alternate counting (odd positions) and geometry (even positions)
    #[default]
    Dynamic,
    /// The first `count` records of the fixed bank
    Fixed,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Dynamic => write!(f, "dynamic"),
            Mode::Fixed => write!(f, "fixed"),
        }
    }
}

/// A question ready for output, tagged with its source.
#[derive(Debug, Clone)]
pub struct AssembledQuestion {
    pub question: GeneratedQuestion,
    pub source: QuestionSource,
}

/// Builds an assessment and writes it to the output directory.
pub struct AssessmentPipeline<R: RandomSource = RngSource> {
    generator: QuestionGenerator<R>,
    bank: FixedQuestionBank,
    output: OutputConfig,
    show_progress: bool,
}

impl AssessmentPipeline<RngSource> {
    /// Create a pipeline seeded from `generation.seed`, or from entropy.
    pub fn new(config: &Config, bank: FixedQuestionBank) -> Self {
        Self::with_generator(config, QuestionGenerator::new(config), bank)
    }
}

impl<R: RandomSource> AssessmentPipeline<R> {
    /// Create a pipeline around an existing generator.
    pub fn with_generator(
        config: &Config,
        generator: QuestionGenerator<R>,
        bank: FixedQuestionBank,
    ) -> Self {
        Self {
            generator,
            bank,
            output: config.output.clone(),
            show_progress: true,
        }
    }

    /// Enable or disable the terminal progress bar.
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn output(&self) -> &OutputConfig {
        &self.output
    }

    /// Path of the illustration for the `k`-th geometry question (1-based).
    pub fn illustration_path(&self, k: usize) -> PathBuf {
        self.output
            .images_dir
            .join(format!("geometry_question_{k}.svg"))
    }

    /// Run the pipeline: build `count` questions and write every output.
    pub fn run(&mut self, mode: Mode, count: usize) -> Result<RunStats> {
        if count == 0 {
            return Err(MathgenError::InvalidInput(
                "question count must be at least 1".to_string(),
            ));
        }
        let start = Instant::now();

        info!(
            mode = %mode,
            count,
            output_dir = %self.output.dir.display(),
            "Starting assessment pipeline"
        );

        ensure_dir(&self.output.dir)?;
        if mode == Mode::Dynamic {
            ensure_dir(&self.output.images_dir)?;
        }

        let mut stats = RunStats::default();
        let questions = match mode {
            Mode::Dynamic => self.build_dynamic(count, &mut stats)?,
            Mode::Fixed => self.build_fixed(count, &mut stats),
        };
        stats.total_questions = questions.len();

        let images: Vec<ImageRef> = questions
            .iter()
            .enumerate()
            .map(|(i, q)| resolve_image(i + 1, &q.question, &self.output.dir))
            .collect();
        stats.missing_assets = images
            .iter()
            .filter(|image| matches!(image, ImageRef::Missing(_)))
            .count();

        self.write_outputs(&questions, images)?;

        stats.runtime_secs = start.elapsed().as_secs_f64();
        stats.finalize();

        info!(
            questions = stats.total_questions,
            counting = stats.counting_questions,
            geometry = stats.geometry_questions,
            fixed = stats.fixed_questions,
            illustrations = stats.illustrations,
            missing_assets = stats.missing_assets,
            audit_findings = stats.audit_findings,
            throughput = format!("{:.0}/hr", stats.throughput_per_hour),
            "Assessment pipeline complete"
        );

        Ok(stats)
    }

    fn build_dynamic(
        &mut self,
        count: usize,
        stats: &mut RunStats,
    ) -> Result<Vec<AssembledQuestion>> {
        let pb = self.progress_bar(count)?;
        let mut questions = Vec::with_capacity(count);

        for position in 1..=count {
            let question = if position % 2 == 1 {
                let q = self.generator.generate_counting_question()?;
                stats.counting_questions += 1;
                q
            } else {
                let image_path = self.illustration_path(position / 2);
                let q = self.generator.generate_geometry_question(Some(&image_path))?;
                if let Some(figure) = &q.figure {
                    write_atomic(&image_path, &render_packing_svg(figure))?;
                    stats.illustrations += 1;
                    debug!(path = %image_path.display(), "Illustration rendered");
                }
                stats.geometry_questions += 1;
                q
            };

            questions.push(AssembledQuestion {
                question,
                source: QuestionSource::Dynamic,
            });

            pb.inc(1);
            pb.set_message(format!(
                "counting: {}, geometry: {}",
                stats.counting_questions, stats.geometry_questions
            ));
        }

        pb.finish_with_message(format!(
            "Done! {} counting, {} geometry",
            stats.counting_questions, stats.geometry_questions
        ));
        Ok(questions)
    }

    fn build_fixed(&self, count: usize, stats: &mut RunStats) -> Vec<AssembledQuestion> {
        if count > self.bank.len() {
            warn!(
                requested = count,
                available = self.bank.len(),
                "Fixed bank is shorter than the requested count"
            );
        }

        let questions: Vec<AssembledQuestion> = self
            .bank
            .take(count)
            .into_iter()
            .map(|question| AssembledQuestion {
                question,
                source: QuestionSource::Fixed,
            })
            .collect();
        stats.fixed_questions = questions.len();

        let findings = self.bank.audit();
        for finding in findings.iter().filter(|f| f.position <= questions.len()) {
            warn!(finding = %finding, "Fixed question flagged for review");
            stats.audit_findings += 1;
        }

        questions
    }

    fn write_outputs(&self, questions: &[AssembledQuestion], images: Vec<ImageRef>) -> Result<()> {
        let plain: Vec<GeneratedQuestion> =
            questions.iter().map(|q| q.question.clone()).collect();

        let entries: Vec<DocumentEntry<'_>> = plain
            .iter()
            .zip(images)
            .map(|(question, image)| DocumentEntry { question, image })
            .collect();
        let document = render_document(&self.output.title, &self.output.description, &entries);
        write_atomic(&self.output.document_path(), &document)?;

        let formatted = render_formatted(&self.output.title, &self.output.description, &plain);
        write_atomic(&self.output.formatted_path(), &formatted)?;

        let records: Vec<QuestionRecord> = questions
            .iter()
            .enumerate()
            .map(|(i, q)| QuestionRecord::new(i + 1, q.source, q.question.clone()))
            .collect();
        write_atomic(&self.output.records_path(), &records_to_jsonl(&records)?)?;

        info!(
            document = %self.output.document_path().display(),
            formatted = %self.output.formatted_path().display(),
            records = %self.output.records_path().display(),
            "Outputs written"
        );
        Ok(())
    }

    fn progress_bar(&self, len: usize) -> Result<ProgressBar> {
        if !self.show_progress {
            return Ok(ProgressBar::hidden());
        }

        let pb = ProgressBar::new(len as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} ({percent}%) {msg}")
                .map_err(|e| MathgenError::Internal(format!("Invalid progress template: {e}")))?
                .progress_chars("##-"),
        );
        Ok(pb)
    }
}

/// Resolve a question's illustration against the filesystem.
///
/// Resolved paths are made relative to `base` (the output directory) so the
/// document keeps working when the output tree is moved as a whole.
fn resolve_image(number: usize, question: &GeneratedQuestion, base: &Path) -> ImageRef {
    let Some(path) = &question.image_path else {
        return ImageRef::None;
    };

    if path.exists() {
        ImageRef::Resolved(relative_to(path, base))
    } else {
        warn!(
            question = number,
            path = %path.display(),
            "Image not found, continuing without it"
        );
        ImageRef::Missing(path.clone())
    }
}

/// `path` expressed relative to the directory `base`.
///
/// Falls back to the absolute path when either side cannot be canonicalized
/// or the two share no root.
fn relative_to(path: &Path, base: &Path) -> PathBuf {
    let Ok(target) = path.canonicalize() else {
        return path.to_path_buf();
    };
    let Ok(base) = base.canonicalize() else {
        return target;
    };

    let target_parts: Vec<Component<'_>> = target.components().collect();
    let base_parts: Vec<Component<'_>> = base.components().collect();
    let shared = target_parts
        .iter()
        .zip(&base_parts)
        .take_while(|(a, b)| a == b)
        .count();
    if shared == 0 {
        return target;
    }

    let mut relative = PathBuf::new();
    for _ in shared..base_parts.len() {
        relative.push("..");
    }
    for part in &target_parts[shared..] {
        relative.push(part);
    }
    relative
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::SequenceSource;
    use std::fs;
    use tempfile::TempDir;

    fn config_in(dir: &Path) -> Config {
        let mut config = Config::builtin().unwrap();
        config.output.dir = dir.join("output");
        config.output.images_dir = dir.join("images");
        config
    }

    fn read_records(path: &Path) -> Vec<QuestionRecord> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_mode_serde_names() {
        assert_eq!(Mode::Fixed.to_string(), "fixed");
        assert_eq!(serde_json::to_string(&Mode::Dynamic).unwrap(), "\"dynamic\"");
        assert_eq!(Mode::default(), Mode::Dynamic);
    }

    #[test]
    fn test_dynamic_run_alternates_and_renders() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_in(temp_dir.path());
        let generator = QuestionGenerator::with_source(&config, SequenceSource::zeros());
        let mut pipeline =
            AssessmentPipeline::with_generator(&config, generator, FixedQuestionBank::builtin().unwrap())
                .with_progress(false);

        let stats = pipeline.run(Mode::Dynamic, 5).unwrap();
        assert_eq!(stats.total_questions, 5);
        assert_eq!(stats.counting_questions, 3);
        assert_eq!(stats.geometry_questions, 2);
        assert_eq!(stats.illustrations, 2);
        assert_eq!(stats.missing_assets, 0);

        let images = temp_dir.path().join("images");
        assert!(images.join("geometry_question_1.svg").is_file());
        assert!(images.join("geometry_question_2.svg").is_file());
        assert!(!images.join("geometry_question_3.svg").exists());

        let records = read_records(&config.output.records_path());
        assert_eq!(records.len(), 5);
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record.order, i + 1);
            assert_eq!(record.source, QuestionSource::Dynamic);
            assert_eq!(record.question.figure.is_some(), i % 2 == 1);
            assert!(record.question.has_unique_options());
        }
        assert_eq!(
            records[1].question.image_path,
            Some(pipeline.illustration_path(1))
        );

        let document = fs::read_to_string(config.output.document_path()).unwrap();
        assert!(document.contains("## Question 5"));
        assert!(document.contains("](../images/geometry_question_2.svg)"));
        assert!(!document.contains("Figure unavailable"));

        let formatted = fs::read_to_string(config.output.formatted_path()).unwrap();
        assert_eq!(formatted.matches("@@option").count(), 5);
        assert!(formatted.contains("@Order 5\n"));
    }

    #[test]
    fn test_fixed_run_counts_missing_assets_and_findings() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_in(temp_dir.path());
        let bank = FixedQuestionBank::builtin().unwrap();
        let expected_missing = bank
            .questions()
            .iter()
            .filter(|q| q.image_path.as_ref().is_some_and(|p| !p.exists()))
            .count();
        let mut pipeline = AssessmentPipeline::new(&config, bank.clone()).with_progress(false);

        let stats = pipeline.run(Mode::Fixed, 100).unwrap();
        assert_eq!(stats.total_questions, bank.len());
        assert_eq!(stats.fixed_questions, bank.len());
        assert_eq!(stats.counting_questions, 0);
        assert_eq!(stats.illustrations, 0);
        assert_eq!(stats.missing_assets, expected_missing);
        assert_eq!(stats.audit_findings, bank.audit().len());

        let records = read_records(&config.output.records_path());
        assert_eq!(records.len(), bank.len());
        assert_eq!(records[0].source, QuestionSource::Fixed);
        assert_eq!(&records[0].question, &bank.questions()[0]);
        assert!(!temp_dir.path().join("images").exists());
    }

    #[test]
    fn test_fixed_run_takes_prefix() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_in(temp_dir.path());
        let bank = FixedQuestionBank::builtin().unwrap();
        let mut pipeline = AssessmentPipeline::new(&config, bank.clone()).with_progress(false);

        let stats = pipeline.run(Mode::Fixed, 3).unwrap();
        assert_eq!(stats.total_questions, 3);
        // no flagged record among the first three
        assert_eq!(stats.audit_findings, 0);

        let formatted = fs::read_to_string(config.output.formatted_path()).unwrap();
        assert!(formatted.contains(&format!("@question {}\n", bank.questions()[2].question)));
        assert!(!formatted.contains("@Order 4\n"));
    }

    #[test]
    fn test_zero_count_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_in(temp_dir.path());
        let mut pipeline = AssessmentPipeline::new(&config, FixedQuestionBank::builtin().unwrap())
            .with_progress(false);

        assert!(matches!(
            pipeline.run(Mode::Fixed, 0),
            Err(MathgenError::InvalidInput(_))
        ));
        assert!(!config.output.dir.exists());
    }

    #[test]
    fn test_resolve_image_states() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("output");
        fs::create_dir(&base).unwrap();
        let present = temp_dir.path().join("fig.svg");
        fs::write(&present, "<svg/>").unwrap();

        let mut q = FixedQuestionBank::builtin().unwrap().questions()[0].clone();
        assert_eq!(resolve_image(1, &q, &base), ImageRef::None);

        q.image_path = Some(present.clone());
        assert_eq!(
            resolve_image(1, &q, &base),
            ImageRef::Resolved(PathBuf::from("../fig.svg"))
        );

        let absent = temp_dir.path().join("absent.png");
        q.image_path = Some(absent.clone());
        assert_eq!(resolve_image(1, &q, &base), ImageRef::Missing(absent));
    }

    #[test]
    fn test_relative_paths_survive_moving_the_tree() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("run");
        fs::create_dir_all(root.join("output")).unwrap();
        fs::create_dir_all(root.join("output").join("figs")).unwrap();
        fs::write(root.join("output").join("figs").join("a.svg"), "<svg/>").unwrap();

        assert_eq!(
            relative_to(&root.join("output").join("figs").join("a.svg"), &root.join("output")),
            PathBuf::from("figs/a.svg")
        );

        let config = config_in(&root);
        let generator = QuestionGenerator::with_source(&config, SequenceSource::zeros());
        let mut pipeline =
            AssessmentPipeline::with_generator(&config, generator, FixedQuestionBank::builtin().unwrap())
                .with_progress(false);
        pipeline.run(Mode::Dynamic, 2).unwrap();

        let moved = temp_dir.path().join("moved");
        fs::rename(&root, &moved).unwrap();
        let document = fs::read_to_string(moved.join("output").join("generated_questions.md")).unwrap();
        let link = "../images/geometry_question_1.svg";
        assert!(document.contains(&format!("]({link})")));
        assert!(moved.join("output").join(link).is_file());
    }
}
