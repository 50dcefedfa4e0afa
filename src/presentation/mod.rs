pub mod config;
pub mod form;

pub use config::{Environment, ScaffoldConfig, Settings};
pub use form::{FormError, VideoInputForm};
