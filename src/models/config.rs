//! Configuration models for mathgen.
//!
//! All I^R (resolvable ignorance) is parameterized here: the scenario tables
//! the generators draw from, the curriculum strings, and where output lands.
//! A built-in configuration is compiled in; a TOML file can replace it.

use super::Curriculum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default configuration shipped with the binary.
pub const BUILTIN_CONFIG: &str = include_str!("../../assets/config.toml");

/// Smallest option list a multiple-choice question may have.
pub const MIN_OPTIONS: usize = 3;

/// Largest option list the document renderer can letter (A–E).
pub const MAX_OPTIONS: usize = 5;

/// Top-level configuration for mathgen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Counting (fundamental counting principle) scenarios
    pub counting: CountingConfig,

    /// Circle-packing scenarios
    pub geometry: GeometryConfig,

    /// Generation knobs
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// Counting generator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountingConfig {
    #[serde(default = "default_subject")]
    pub subject: String,

    #[serde(default = "default_counting_unit")]
    pub unit: String,

    #[serde(default = "default_counting_topic")]
    pub topic: String,

    /// Scenarios to pick from (uniformly)
    pub contexts: Vec<CountingContext>,
}

impl CountingConfig {
    pub fn curriculum(&self) -> Curriculum {
        Curriculum::new(&self.subject, &self.unit, &self.topic)
    }
}

/// A counting scenario, e.g. a pizza restaurant offering size/crust/topping.
///
/// K_i: `components` and `component_options` are parallel lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountingContext {
    /// Scenario name ("pizza restaurant")
    pub scenario: String,

    /// The thing being assembled ("pizza")
    pub item: String,

    /// Component names in display order
    pub components: Vec<String>,

    /// Option labels per component, parallel to `components`
    pub component_options: Vec<Vec<String>>,
}

impl CountingContext {
    /// Number of options offered for each component.
    pub fn counts(&self) -> Vec<u64> {
        self.component_options
            .iter()
            .map(|opts| opts.len() as u64)
            .collect()
    }

    /// Number of distinct combinations, if small enough to build options from.
    ///
    /// K_i: `2 × total + MAX_OPTIONS` fits in an `i64`, so every distractor
    /// and the resampling range are representable.
    pub fn combinations(&self) -> Option<u64> {
        let total = self
            .counts()
            .into_iter()
            .try_fold(1u64, |acc, n| acc.checked_mul(n))?;
        let upper = total.checked_mul(2)?.checked_add(MAX_OPTIONS as u64)?;
        i64::try_from(upper).ok()?;
        Some(total)
    }

    fn validate(&self, index: usize) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidContext {
            kind: "counting",
            index,
            reason,
        };

        if self.components.is_empty() {
            return Err(invalid("no components".to_string()));
        }
        if self.components.len() != self.component_options.len() {
            return Err(invalid(format!(
                "{} components but {} option lists",
                self.components.len(),
                self.component_options.len()
            )));
        }
        if let Some(pos) = self.component_options.iter().position(Vec::is_empty) {
            return Err(invalid(format!(
                "component '{}' has no options",
                self.components[pos]
            )));
        }
        if self.combinations().is_none() {
            return Err(invalid("number of combinations is too large".to_string()));
        }
        Ok(())
    }
}

/// Geometry generator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeometryConfig {
    #[serde(default = "default_subject")]
    pub subject: String,

    #[serde(default = "default_geometry_unit")]
    pub unit: String,

    #[serde(default = "default_geometry_topic")]
    pub topic: String,

    /// Packing scenarios to pick from (uniformly)
    pub contexts: Vec<GeometryContext>,
}

impl GeometryConfig {
    pub fn curriculum(&self) -> Curriculum {
        Curriculum::new(&self.subject, &self.unit, &self.topic)
    }
}

/// A packing scenario: identical circles laid out in a grid inside a rectangle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeometryContext {
    /// What is packed ("spherical balls")
    pub objects: String,

    /// What holds them ("cylindrical container")
    pub container: String,

    /// Grid layouts, written "R×C"
    pub arrangements: Vec<Arrangement>,

    /// Radius bounds in cm, inclusive; equal bounds mean a fixed radius
    pub radius_range: (f64, f64),
}

impl GeometryContext {
    fn validate(&self, index: usize) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidContext {
            kind: "geometry",
            index,
            reason,
        };

        if self.arrangements.is_empty() {
            return Err(invalid("no arrangements".to_string()));
        }
        let (min, max) = self.radius_range;
        if !(min.is_finite() && max.is_finite()) || min <= 0.0 {
            return Err(invalid(format!(
                "radius range ({min}, {max}) must be positive"
            )));
        }
        if min > max {
            return Err(invalid(format!("radius range ({min}, {max}) is inverted")));
        }
        Ok(())
    }
}

/// Grid layout parsed from "R×C".
///
/// K_i: rows and cols are both at least 1 once parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Arrangement {
    pub rows: u32,
    pub cols: u32,
}

impl Arrangement {
    pub fn new(rows: u32, cols: u32) -> Result<Self, ConfigError> {
        if rows == 0 || cols == 0 || rows.checked_mul(cols).is_none() {
            return Err(ConfigError::InvalidArrangement(format!("{rows}×{cols}")));
        }
        Ok(Self { rows, cols })
    }

    /// Total number of packed objects.
    pub fn count(&self) -> u64 {
        u64::from(self.rows) * u64::from(self.cols)
    }
}

impl FromStr for Arrangement {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidArrangement(s.to_string());

        let parts: Vec<&str> = s.split(['×', 'x', 'X']).map(str::trim).collect();
        let [rows, cols] = parts.as_slice() else {
            return Err(invalid());
        };
        let rows: u32 = rows.parse().map_err(|_| invalid())?;
        let cols: u32 = cols.parse().map_err(|_| invalid())?;
        Self::new(rows, cols).map_err(|_| invalid())
    }
}

impl TryFrom<String> for Arrangement {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Arrangement> for String {
    fn from(value: Arrangement) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Arrangement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}×{}", self.rows, self.cols)
    }
}

/// Generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Options per question (3 - 5)
    #[serde(default = "default_option_count")]
    pub option_count: usize,

    /// Resampling budget for filling distractor slots
    #[serde(default = "default_max_distractor_attempts")]
    pub max_distractor_attempts: usize,

    /// Seed for reproducible runs; entropy-seeded when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_option_count() -> usize {
    MAX_OPTIONS
}

fn default_max_distractor_attempts() -> usize {
    64
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            option_count: default_option_count(),
            max_distractor_attempts: default_max_distractor_attempts(),
            seed: None,
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory for the document, formatted export and records
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,

    /// Directory for generated illustrations
    #[serde(default = "default_images_dir")]
    pub images_dir: PathBuf,

    /// Markdown document file name
    #[serde(default = "default_document")]
    pub document: String,

    /// `@`-tagged plain text export file name
    #[serde(default = "default_formatted")]
    pub formatted: String,

    /// JSONL record file name
    #[serde(default = "default_records")]
    pub records: String,

    /// Assessment title
    #[serde(default = "default_title")]
    pub title: String,

    /// Assessment description
    #[serde(default = "default_description")]
    pub description: String,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_images_dir() -> PathBuf {
    PathBuf::from("images")
}

fn default_document() -> String {
    "generated_questions.md".to_string()
}

fn default_formatted() -> String {
    "formatted_questions.txt".to_string()
}

fn default_records() -> String {
    "questions.jsonl".to_string()
}

fn default_title() -> String {
    "Middle School Mathematics Problem Solving Assessment".to_string()
}

fn default_description() -> String {
    "This assessment contains multiple-choice questions designed to test students' \
     problem-solving abilities in counting arrangements and geometric spatial reasoning."
        .to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            images_dir: default_images_dir(),
            document: default_document(),
            formatted: default_formatted(),
            records: default_records(),
            title: default_title(),
            description: default_description(),
        }
    }
}

impl OutputConfig {
    pub fn document_path(&self) -> PathBuf {
        self.dir.join(&self.document)
    }

    pub fn formatted_path(&self) -> PathBuf {
        self.dir.join(&self.formatted)
    }

    pub fn records_path(&self) -> PathBuf {
        self.dir.join(&self.records)
    }
}

fn default_subject() -> String {
    "Quantitative Math".to_string()
}

fn default_counting_unit() -> String {
    "Data Analysis & Probability".to_string()
}

fn default_counting_topic() -> String {
    "Counting & Arrangement Problems".to_string()
}

fn default_geometry_unit() -> String {
    "Geometry and Measurement".to_string()
}

fn default_geometry_topic() -> String {
    "Area & Volume".to_string()
}

impl Config {
    /// Parse and validate the compiled-in configuration.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_toml_str(BUILTIN_CONFIG, Path::new("<builtin>"))
    }

    /// Load configuration from a TOML file.
    ///
    /// B_i(file exists) → Result
    /// B_i(file is valid TOML) → Result
    /// B_i(contexts are well formed) → Result
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_owned(),
            source: e,
        })?;

        Self::from_toml_str(&content, path)
    }

    /// Load from the given file, or fall back to the built-in configuration.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::builtin(),
        }
    }

    fn from_toml_str(content: &str, origin: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: origin.to_owned(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check every context table and setting. Fails fast on the first problem.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.counting.contexts.is_empty() {
            return Err(ConfigError::NoContexts("counting"));
        }
        if self.geometry.contexts.is_empty() {
            return Err(ConfigError::NoContexts("geometry"));
        }

        for (index, ctx) in self.counting.contexts.iter().enumerate() {
            ctx.validate(index)?;
        }
        for (index, ctx) in self.geometry.contexts.iter().enumerate() {
            ctx.validate(index)?;
        }

        let option_count = self.generation.option_count;
        if !(MIN_OPTIONS..=MAX_OPTIONS).contains(&option_count) {
            return Err(ConfigError::InvalidSetting(format!(
                "generation.option_count must be between {MIN_OPTIONS} and {MAX_OPTIONS}, got {option_count}"
            )));
        }

        Ok(())
    }
}

/// Configuration errors.
///
/// Epistemic origin:
/// - B_i falsified: File not found, parse error
/// - K_i violated at load: malformed context tables
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid arrangement '{0}': expected ROWS×COLS with both at least 1 and a product that fits in u32")]
    InvalidArrangement(String),

    #[error("Invalid {kind} context #{index}: {reason}")]
    InvalidContext {
        kind: &'static str,
        index: usize,
        reason: String,
    },

    #[error("No {0} contexts configured")]
    NoContexts(&'static str),

    #[error("Invalid setting: {0}")]
    InvalidSetting(String),
}
