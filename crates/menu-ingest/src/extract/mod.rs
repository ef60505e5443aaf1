//! Turning dining hall pages into meal blocks.

pub mod daypart;
pub mod error;

pub use daypart::DaypartScraper;
pub use error::ExtractionError;

use crate::model::RawMealBlock;

/// Parses one dining hall page into its meal-period blocks.
///
/// Must be a pure function of `html`: the same page always yields the same
/// blocks, in page order.
pub trait MenuScraper: Send + Sync {
    fn extract(&self, html: &str) -> Result<Vec<RawMealBlock>, ExtractionError>;
}
