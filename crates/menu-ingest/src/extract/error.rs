use thiserror::Error;

/// Raised only for input that is not an HTML document at all.
///
/// Missing panels, labels or times are not errors; they yield fewer blocks.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("Document is empty")]
    EmptyDocument,

    #[error("Document does not contain HTML markup")]
    NotHtml,
}
