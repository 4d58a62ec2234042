pub mod config;
pub mod constants;
pub mod error;
pub mod playback;
pub mod trim;
pub mod upload;
pub mod utils;
