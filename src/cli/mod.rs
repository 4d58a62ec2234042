pub mod config;
pub mod init;
pub mod play;
pub mod plan;
pub mod stream_url;
pub mod trim;
