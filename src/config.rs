use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::graph::{InvalidTopicPolicy, MaterializeOptions, Namespace};

/// Main configuration structure.
///
/// Every section is optional; a missing section (or a missing config file)
/// falls back to the fixed defaults the tools have always used.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub ontology: OntologyConfig,
    #[serde(default)]
    pub materialize: MaterializeConfig,
    #[serde(default)]
    pub corpus: CorpusConfig,
}

/// Input and output locations, relative to the working directory
#[derive(Debug, Clone, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_input_csv")]
    pub input_csv: PathBuf,
    #[serde(default = "default_output_ttl")]
    pub output_ttl: PathBuf,
    #[serde(default = "default_graph_html")]
    pub graph_html: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input_csv: default_input_csv(),
            output_ttl: default_output_ttl(),
            graph_html: default_graph_html(),
        }
    }
}

/// Namespace binding for generated identifiers
#[derive(Debug, Clone, Deserialize)]
pub struct OntologyConfig {
    #[serde(default = "default_prefix")]
    pub prefix: String,
    #[serde(default = "default_base_uri")]
    pub base_uri: String,
}

impl Default for OntologyConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            base_uri: default_base_uri(),
        }
    }
}

/// Materializer behaviour
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MaterializeConfig {
    /// What to do with a dominant_topic that is present but not numeric.
    #[serde(default)]
    pub invalid_topic: InvalidTopicPolicy,
}

/// Raw corpus locations for the `explore` overview
#[derive(Debug, Clone, Deserialize)]
pub struct CorpusConfig {
    #[serde(default = "default_true_csv")]
    pub true_csv: PathBuf,
    #[serde(default = "default_fake_csv")]
    pub fake_csv: PathBuf,
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            true_csv: default_true_csv(),
            fake_csv: default_fake_csv(),
            sample_size: default_sample_size(),
        }
    }
}

fn default_input_csv() -> PathBuf {
    PathBuf::from("final_combined_results.csv")
}

fn default_output_ttl() -> PathBuf {
    PathBuf::from("articles_data2.ttl")
}

fn default_graph_html() -> PathBuf {
    PathBuf::from("all_graphs_combined.html")
}

fn default_prefix() -> String {
    "ex".to_string()
}

fn default_base_uri() -> String {
    "http://example.org/misinfo#".to_string()
}

fn default_true_csv() -> PathBuf {
    PathBuf::from("True.csv")
}

fn default_fake_csv() -> PathBuf {
    PathBuf::from("Fake.csv")
}

fn default_sample_size() -> usize {
    5
}

impl Config {
    /// Load configuration
    ///
    /// Loads environment variables from .env file (if present) before loading config.
    /// Looks for config file in this order:
    /// 1. Path specified in MISINFO_KG_CONFIG environment variable (must exist)
    /// 2. ./config.toml in current directory (optional; defaults apply when absent)
    pub fn load() -> Result<Self> {
        let _ = dotenv::dotenv();

        if let Ok(path) = std::env::var("MISINFO_KG_CONFIG") {
            return Self::from_file(Path::new(&path));
        }

        let default_path = Path::new("config.toml");
        if default_path.exists() {
            return Self::from_file(default_path);
        }

        log::debug!("No config.toml found, using built-in defaults");
        let config = Config::default();
        config.validate()?;
        Ok(config)
    }

    /// Load and validate configuration from a specific file
    pub fn from_file(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        let prefix_re = Regex::new(r"^[A-Za-z][A-Za-z0-9_-]*$").expect("Invalid regex pattern");
        if !prefix_re.is_match(&self.ontology.prefix) {
            anyhow::bail!(
                "ontology.prefix '{}' is not a valid Turtle prefix name",
                self.ontology.prefix
            );
        }

        if matches!(self.ontology.prefix.as_str(), "rdf" | "xsd") {
            anyhow::bail!(
                "ontology.prefix '{}' collides with a built-in prefix",
                self.ontology.prefix
            );
        }

        let base = url::Url::parse(&self.ontology.base_uri).with_context(|| {
            format!("ontology.base_uri is not an absolute URI: {}", self.ontology.base_uri)
        })?;
        if base.cannot_be_a_base() {
            anyhow::bail!("ontology.base_uri cannot be used as a base: {}", self.ontology.base_uri);
        }
        // Written verbatim inside <...>, so it must need no escaping or normalization
        if let Some(bad) = self
            .ontology
            .base_uri
            .chars()
            .find(|c| c.is_whitespace() || c.is_control() || "<>\"{}|^`\\".contains(*c))
        {
            anyhow::bail!(
                "ontology.base_uri contains {:?}, which is not allowed in an IRI: {}",
                bad,
                self.ontology.base_uri
            );
        }
        if base.as_str() != self.ontology.base_uri {
            anyhow::bail!(
                "ontology.base_uri is not in normalized form (expected {}): {}",
                base.as_str(),
                self.ontology.base_uri
            );
        }
        if !(self.ontology.base_uri.ends_with('#') || self.ontology.base_uri.ends_with('/')) {
            anyhow::bail!(
                "ontology.base_uri must end with '#' or '/': {}",
                self.ontology.base_uri
            );
        }

        if self.corpus.sample_size == 0 {
            anyhow::bail!("corpus.sample_size must be greater than 0");
        }

        Ok(())
    }

    /// Namespace all generated identifiers live in
    pub fn namespace(&self) -> Namespace {
        Namespace::new(&self.ontology.prefix, &self.ontology.base_uri)
    }

    /// Options for a materializer run
    pub fn materialize_options(&self) -> MaterializeOptions {
        MaterializeOptions {
            namespace: self.namespace(),
            invalid_topic: self.materialize.invalid_topic,
        }
    }

    /// Get article table path
    pub fn input_csv(&self) -> &Path {
        &self.paths.input_csv
    }

    /// Get Turtle output path
    pub fn output_ttl(&self) -> &Path {
        &self.paths.output_ttl
    }

    /// Get graph view page path
    pub fn graph_html(&self) -> &Path {
        &self.paths.graph_html
    }
}
