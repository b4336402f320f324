//! YAML configuration for alignment runs.
//!
//! One file describes everything a run needs besides its input paths: which
//! two versions are being aligned, how words are normalized, how the resolver
//! cascade is tuned, how ambiguous cluster joins are handled, and how the
//! binary logs.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! # Crito word alignment, Greek ↔ Persian
//! version: "1.0"
//! name: crito-shamsian
//!
//! alignment:
//!   slug: crito-shamsian-word-alignment
//!   label: "Crito Greek/Farsi word alignment"
//!   version_a: "urn:cts:greekLit:tlg0059.tlg003.perseus-grc2:"
//!   version_b: "urn:cts:greekLit:tlg0059.tlg003.perseus-far1:"
//!
//! normalize:
//!   strip_marks: true
//!   casefold: true
//!   strip_punctuation: false
//!
//! resolver:
//!   fuzzy_threshold: 50
//!   scorer: ratio
//!   elision_marks: ["ʼ", "’", "'"]
//!   strip_digits: true
//!   report_near_misses: false
//!
//! cluster:
//!   merge_policy: drop
//!
//! logging:
//!   log_level: info
//!   json: false
//! ```

use std::fs;
use std::path::Path;

use canonical::{mint_alignment_urn, CanonicalError, NormalizeConfig};
use cluster::ClusterConfig;
use matcher::ResolverConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),

    #[error("missing required field: {0}")]
    MissingField(String),
}

/// Top-level YAML configuration for one alignment run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct AlignConfig {
    /// Configuration format version
    pub version: String,

    /// Optional configuration name/description
    #[serde(default)]
    pub name: Option<String>,

    /// Identity of the output document and the two aligned versions
    #[serde(default)]
    pub alignment: AlignmentSettings,

    /// Word normalization used by the resolver
    #[serde(default)]
    pub normalize: NormalizeConfig,

    /// Resolver cascade tuning
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Cluster merge policy
    #[serde(default)]
    pub cluster: ClusterConfig,

    /// Subscriber settings for the binary
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AlignConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: AlignConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.alignment.validate()?;
        self.resolver
            .validate()
            .map_err(|err| ConfigLoadError::Validation(err.to_string()))?;
        self.logging.validate()?;

        Ok(())
    }
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            alignment: AlignmentSettings::default(),
            normalize: NormalizeConfig::default(),
            resolver: ResolverConfig::default(),
            cluster: ClusterConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Output document identity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AlignmentSettings {
    /// Explicit alignment URN; minted from `slug` and the versions when unset
    #[serde(default)]
    pub urn: Option<String>,

    #[serde(default = "default_slug")]
    pub slug: String,

    #[serde(default)]
    pub label: String,

    /// Version URN prefix of side A, ending in `:`
    #[serde(default)]
    pub version_a: String,

    /// Version URN prefix of side B, ending in `:`
    #[serde(default)]
    pub version_b: String,
}

impl AlignmentSettings {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        for (field, value) in [
            ("alignment.version_a", &self.version_a),
            ("alignment.version_b", &self.version_b),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigLoadError::MissingField(field.to_string()));
            }
            if !value.ends_with(':') {
                return Err(ConfigLoadError::Validation(format!(
                    "{field} must be a version URN ending in ':' (got {value:?})"
                )));
            }
        }

        match &self.urn {
            Some(urn) => {
                let tail = urn.rsplit(':').next().unwrap_or_default();
                if !urn.starts_with("urn:") || tail.is_empty() {
                    return Err(ConfigLoadError::Validation(format!(
                        "alignment.urn must be a URN with a non-empty final segment (got {urn:?})"
                    )));
                }
            }
            None if self.slug.trim().is_empty() => {
                return Err(ConfigLoadError::Validation(
                    "alignment.slug must be non-empty when alignment.urn is unset".to_string(),
                ));
            }
            None => {}
        }

        Ok(())
    }

    /// The configured URN, or one minted from the slug and both versions.
    pub fn alignment_urn(&self) -> Result<String, CanonicalError> {
        match &self.urn {
            Some(urn) => Ok(urn.clone()),
            None => mint_alignment_urn(
                &self.slug,
                [self.version_a.as_str(), self.version_b.as_str()],
            ),
        }
    }

    pub fn versions(&self) -> [&str; 2] {
        [&self.version_a, &self.version_b]
    }
}

impl Default for AlignmentSettings {
    fn default() -> Self {
        Self {
            urn: None,
            slug: default_slug(),
            label: String::new(),
            version_a: String::new(),
            version_b: String::new(),
        }
    }
}

/// Logging YAML configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// `EnvFilter` directive; `RUST_LOG` takes precedence when set
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub json: bool,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.log_level.trim().is_empty() {
            return Err(ConfigLoadError::Validation(
                "logging.log_level must be non-empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json: false,
        }
    }
}

fn default_slug() -> String {
    "word-alignment".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}
