pub mod cli;
pub mod config;
pub mod corrector;
pub mod files;
pub mod fixer;
pub mod hook;
pub mod segment;

pub use config::Config;
pub use corrector::{apply_matches, CasePattern, Corrector, Dictionary, Match, Tally};
pub use fixer::{FileReport, Fixer, WriteOptions};
pub use segment::{Dispatcher, Segmenter, Span, SpanKind};
