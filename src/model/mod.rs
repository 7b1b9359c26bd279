pub mod common;
pub mod entities;
pub mod ids;

pub use common::*;
pub use entities::*;
pub use ids::*;
