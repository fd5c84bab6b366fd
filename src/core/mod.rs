pub mod config;
pub mod domain;
pub mod errors;
pub mod validation;

pub use domain::{Will, WillStatus};
pub use errors::WillError;
