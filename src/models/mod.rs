//! Data model for the grid node agent

mod catalog;
mod error;
mod registration;

pub use catalog::*;
pub use error::*;
pub use registration::*;
