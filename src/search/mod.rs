pub mod composite;
pub mod date;
pub mod entity;
pub mod field;
pub mod value;

pub use composite::*;
pub use date::{DateArg, ACCEPTED_DATE_FORMATS};
pub use entity::*;
pub use field::*;
pub use value::*;
