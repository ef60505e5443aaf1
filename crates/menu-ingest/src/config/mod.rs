pub mod loader;
pub mod registry;
pub mod schema;

pub use loader::{load_config, load_config_from_str};
pub use registry::{default_dining_halls, DiningHallSource, SourceRegistry};
pub use schema::{Config, FetchConfig};
