//! Shared constants used across the application

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Creative but not maximally random.
pub const DEFAULT_TEMPERATURE: f32 = 0.8;
pub const TEMPERATURE_RANGE: (f32, f32) = (0.0, 2.0);

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_KEY_CHECK_TIMEOUT_SECS: u64 = 10;

/// Checked in order; the first non-empty one supplies the default credential.
pub const CREDENTIAL_ENV_VARS: &[&str] = &["GEMINI_API_KEY", "GOOGLE_API_KEY"];
pub const BASE_URL_ENV: &str = "MYTHICARD_BASE_URL";
pub const MODEL_ENV: &str = "MYTHICARD_MODEL";
