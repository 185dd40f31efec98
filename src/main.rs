//! mathgen CLI - Multiple-choice math assessment generation.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use mathgen::models::BUILTIN_CONFIG;
use mathgen::render::render_listing;
use mathgen::{AssessmentPipeline, Config, FixedQuestionBank, Mode, QuestionGenerator};
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "mathgen")]
#[command(author = "Infernet <dev@infernet.org>")]
#[command(version)]
#[command(about = "Multiple-choice math assessment generation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to configuration file (built-in defaults when omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to a fixed questions JSONL file (built-in bank when omitted)
    #[arg(short, long, global = true)]
    bank: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    /// Alternate counting and geometry questions
    Dynamic,
    /// Use the fixed question bank
    Fixed,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Dynamic => Mode::Dynamic,
            ModeArg::Fixed => Mode::Fixed,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an assessment document, formatted export and JSONL records
    Generate {
        /// Question source
        #[arg(short, long, value_enum, default_value = "dynamic")]
        mode: ModeArg,

        /// Number of questions
        #[arg(short = 'n', long, default_value = "2")]
        count: usize,

        /// Output directory (overrides config)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Illustration directory (overrides config)
        #[arg(long)]
        images_dir: Option<PathBuf>,

        /// Random seed for reproducible runs (overrides config)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Print one counting and one geometry question
    Preview {
        /// Random seed
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Print the fixed question bank
    ShowFixed {
        /// Include explanations, curriculum and image paths
        #[arg(short, long)]
        details: bool,
    },

    /// Validate configuration and audit the fixed bank
    Validate,

    /// Show example configuration
    Example,
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    Config::load(path.map(PathBuf::as_path)).with_context(|| match path {
        Some(path) => format!("Failed to load config from {path:?}"),
        None => "Failed to load built-in config".to_string(),
    })
}

fn load_bank(path: Option<&PathBuf>) -> Result<FixedQuestionBank> {
    FixedQuestionBank::load(path.map(PathBuf::as_path)).context("Failed to load fixed questions")
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Example => {
            println!("{BUILTIN_CONFIG}");
            return Ok(());
        }

        Commands::Validate => {
            let config = load_config(cli.config.as_ref())?;
            let bank = load_bank(cli.bank.as_ref())?;

            info!("Configuration is valid");
            info!(
                "  Counting: {} context(s), topic {:?}",
                config.counting.contexts.len(),
                config.counting.topic
            );
            info!(
                "  Geometry: {} context(s), topic {:?}",
                config.geometry.contexts.len(),
                config.geometry.topic
            );
            info!("  Options per question: {}", config.generation.option_count);
            info!("  Fixed questions: {}", bank.len());

            let findings = bank.audit();
            if findings.is_empty() {
                info!("Fixed bank audit found no issues");
            } else {
                for finding in &findings {
                    warn!("  {finding}");
                }
                warn!(
                    findings = findings.len(),
                    "Fixed bank audit flagged records for review"
                );
            }
            return Ok(());
        }

        Commands::ShowFixed { details } => {
            let bank = load_bank(cli.bank.as_ref())?;
            print!("{}", render_listing(bank.questions(), details));
            return Ok(());
        }

        Commands::Preview { seed } => {
            let mut config = load_config(cli.config.as_ref())?;
            if seed.is_some() {
                config.generation.seed = seed;
            }

            let mut generator = QuestionGenerator::new(&config);
            let questions = vec![
                generator
                    .generate_counting_question()
                    .context("Failed to generate counting question")?,
                generator
                    .generate_geometry_question(None)
                    .context("Failed to generate geometry question")?,
            ];
            print!("{}", render_listing(&questions, true));
        }

        Commands::Generate {
            mode,
            count,
            output_dir,
            images_dir,
            seed,
        } => {
            let mut config = load_config(cli.config.as_ref())?;

            // CLI overrides
            if let Some(dir) = output_dir {
                config.output.dir = dir;
            }
            if let Some(dir) = images_dir {
                config.output.images_dir = dir;
            }
            if seed.is_some() {
                config.generation.seed = seed;
            }

            let bank = load_bank(cli.bank.as_ref())?;
            let mut pipeline = AssessmentPipeline::new(&config, bank);
            let stats = pipeline
                .run(mode.into(), count)
                .context("Assessment generation failed")?;

            println!("\n=== Assessment Generation Complete ===");
            println!("Questions:      {}", stats.total_questions);
            println!("Counting:       {}", stats.counting_questions);
            println!("Geometry:       {}", stats.geometry_questions);
            println!("Fixed:          {}", stats.fixed_questions);
            println!("Illustrations:  {}", stats.illustrations);
            println!("Missing images: {}", stats.missing_assets);
            println!("Audit findings: {}", stats.audit_findings);
            println!("Runtime:        {:.2}s", stats.runtime_secs);
            let output = pipeline.output();
            println!("Document:       {:?}", output.document_path());
            println!("Formatted:      {:?}", output.formatted_path());
            println!("Records:        {:?}", output.records_path());
        }
    }

    Ok(())
}
