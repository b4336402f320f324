//! Workspace umbrella crate for ATLAS word alignment.
//!
//! This crate stitches together the token model ([`canonical`]), the token
//! resolver ([`matcher`]) and the clusterer ([`cluster`]) so callers can turn
//! a table of `(ref, a, b)` observations over two text versions into a
//! standoff-annotation alignment document with a single entry point.
//!
//! ```rust
//! use atlas_align::{AlignConfig, Aligner, Fallbacks, Observation};
//! use canonical::parse_flat_text;
//!
//! let mut config = AlignConfig::default();
//! config.alignment.version_a = "urn:cts:greekLit:tlg0059.tlg003.perseus-grc2:".into();
//! config.alignment.version_b = "urn:cts:greekLit:tlg0059.tlg003.perseus-eng2:".into();
//!
//! let a = parse_flat_text("43a ὦ Σώκρατες", &config.alignment.version_a).unwrap();
//! let b = parse_flat_text("43a O Socrates", &config.alignment.version_b).unwrap();
//! let rows = [Observation::new("43a", "Σωκρατες", "Socrates")];
//!
//! let alignment = Aligner::new(config).unwrap().align(&a, &b, &rows, Fallbacks::none()).unwrap();
//! let record = &alignment.document.records[0];
//! assert!(record.relations[0][0].ends_with("perseus-grc2:43a.t2"));
//! assert!(record.relations[1][0].ends_with("perseus-eng2:43a.t2"));
//! ```

pub mod config;
mod document;
mod error;
mod observation;
mod pipeline;

pub use crate::config::{AlignConfig, AlignmentSettings, ConfigLoadError, LoggingConfig};
pub use crate::document::{AlignmentDocument, AlignmentRecord, DOCUMENT_FORMAT};
pub use crate::error::PipelineError;
pub use crate::observation::{load_observations, parse_observations, Observation, Side};
pub use crate::pipeline::{Aligner, Alignment, Fallbacks};

pub use canonical::{load_corpus, CanonicalError, Corpus, NormalizeConfig};
pub use cluster::{ClusterConfig, MergePolicy};
pub use matcher::{FallbackTable, MatchError, ResolutionReport, ResolverConfig};
