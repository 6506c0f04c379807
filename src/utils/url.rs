//! URL helpers for building provider endpoints.
//!
//! Base URLs come from config or the environment and may or may not carry a
//! trailing slash; model ids may or may not carry the `models/` resource
//! prefix. Everything that builds a request URL goes through here.

/// Remove trailing slashes from a base URL.
///
/// ```
/// use mythicard::utils::url::normalize_base_url;
///
/// assert_eq!(
///     normalize_base_url("https://generativelanguage.googleapis.com/v1beta/"),
///     "https://generativelanguage.googleapis.com/v1beta"
/// );
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Join a base URL and an endpoint path with exactly one slash.
///
/// ```
/// use mythicard::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("https://example.test/v1beta/", "/models"),
///     "https://example.test/v1beta/models"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let endpoint = endpoint.trim_start_matches('/');
    format!("{normalized_base}/{endpoint}")
}

/// Endpoint for invoking `action` on `model`, e.g. `generateContent`.
///
/// ```
/// use mythicard::utils::url::model_action_url;
///
/// assert_eq!(
///     model_action_url("https://example.test/v1beta", "models/gemini-2.0-flash", "generateContent"),
///     "https://example.test/v1beta/models/gemini-2.0-flash:generateContent"
/// );
/// ```
pub fn model_action_url(base_url: &str, model: &str, action: &str) -> String {
    let model = model.trim().trim_start_matches("models/");
    construct_api_url(base_url, &format!("models/{model}:{action}"))
}
