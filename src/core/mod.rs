pub mod config;
pub mod constants;
pub mod credentials;
pub mod error;
pub mod generator;
pub mod key_check;
pub mod photo;
pub mod vision;
