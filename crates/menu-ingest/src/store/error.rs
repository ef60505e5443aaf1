use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure of one of the two bulk upserts.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Failed to upsert menu items: {0}")]
    MenuItems(#[source] BoxError),

    #[error("Failed to upsert meal schedules: {0}")]
    MealSchedules(#[source] BoxError),
}
