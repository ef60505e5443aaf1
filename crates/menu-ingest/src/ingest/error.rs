use std::time::Duration;

use thiserror::Error;

use crate::extract::ExtractionError;
use crate::fetch::FetchError;

/// Why one dining hall contributed nothing to a run.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Fetch did not finish within {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractionError),
}
