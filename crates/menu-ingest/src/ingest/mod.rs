pub mod error;
pub mod runner;
pub mod summary;

pub use error::SourceError;
pub use runner::Ingestor;
pub use summary::{IngestionSummary, SourceFailure};
