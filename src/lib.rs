pub mod api;
pub mod config;
pub mod error;
pub mod fetch;
pub mod model;
pub mod search;

// Export API types
pub use api::{ApplicationServerApi, Transport};

pub use config::ClientConfig;
pub use error::{Error, Result};

// Export fetch options, entity DTOs and search criteria
pub use fetch::*;
pub use model::*;
pub use search::*;
