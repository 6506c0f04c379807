use crate::core::config::data::{ApiKeySource, Settings};
use crate::utils::logging::redact_key;

impl Settings {
    pub fn print_all(&self) {
        println!("Current configuration:");
        match (&self.api_key, self.api_key_source) {
            (Some(key), Some(ApiKeySource::Environment)) => {
                println!("  api-key: {} (environment)", redact_key(key))
            }
            (Some(key), _) => println!("  api-key: {} (config file)", redact_key(key)),
            (None, _) => println!("  api-key: (unset)"),
        }
        println!("  model: {}", self.model);
        println!("  base-url: {}", self.base_url);
        println!("  temperature: {}", self.temperature);
        println!("  request-timeout: {}s", self.request_timeout.as_secs());
        println!("  key-check-timeout: {}s", self.key_check_timeout.as_secs());
    }
}
