pub mod download;
pub mod error;
pub mod platform_extractor;
pub mod platforms;
pub mod utils;
mod default;

pub use default::{DEFAULT_ACCEPT, DEFAULT_ACCEPT_LANGUAGE, DEFAULT_UA};
