//! Configuration models and layered config loading for Rackstock.
//!
//! Settings live in `rackstock.json5` files that are discovered in the user's
//! home directory, the project root and the working directory, then merged
//! with any explicit override files.

mod error;
mod loader;
mod model;

/// Public error type returned by config loading and validation APIs.
pub use error::ConfigError;
/// Layered config types and loader options.
pub use loader::{ConfigLayer, ConfigLayerSource, LayeredConfig, LayeredConfigOptions};
/// Configuration schema models.
pub use model::*;
