pub mod data;
pub mod io;
pub mod printing;

pub use data::{ApiKeySource, Config, Settings};
pub use io::ConfigError;

#[cfg(test)]
pub mod tests;
