use crate::api::ModelsResponse;
use crate::utils::url::construct_api_url;

/// List the models visible to `api_key`. The key travels as the `key` query
/// parameter, which is what the provider's listing endpoint expects.
pub async fn fetch_models(
    client: &reqwest::Client,
    base_url: &str,
    api_key: &str,
) -> Result<ModelsResponse, Box<dyn std::error::Error>> {
    let models_url = construct_api_url(base_url, "models");
    let response = client
        .get(models_url)
        .query(&[("key", api_key), ("pageSize", "1000")])
        .header("Content-Type", "application/json")
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(format!("API request failed with status {status}: {error_text}").into());
    }

    let models_response = response.json::<ModelsResponse>().await?;
    Ok(models_response)
}

/// Order models by id, newest version first.
pub fn sort_models(models: &mut [crate::api::ModelInfo]) {
    // Newest families sort first within a prefix because version suffixes
    // compare lexically (gemini-2.5 > gemini-2.0), so sort by id descending.
    models.sort_by(|a, b| b.id().cmp(a.id()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ModelInfo;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn model(name: &str) -> ModelInfo {
        ModelInfo {
            name: format!("models/{name}"),
            display_name: None,
            description: None,
            input_token_limit: None,
            supported_generation_methods: vec!["generateContent".to_string()],
        }
    }

    #[test]
    fn sorts_by_id_descending() {
        let mut models = vec![
            model("gemini-1.5-pro"),
            model("gemini-2.5-flash"),
            model("gemini-2.0-flash"),
        ];
        sort_models(&mut models);
        let ids: Vec<_> = models.iter().map(ModelInfo::id).collect();
        assert_eq!(
            ids,
            ["gemini-2.5-flash", "gemini-2.0-flash", "gemini-1.5-pro"]
        );
    }

    #[test]
    fn sort_ignores_resource_prefix() {
        let mut bare = model("gemini-2.0-flash");
        bare.name = "gemini-2.0-flash".to_string();
        let mut models = vec![model("gemini-1.5-pro"), bare, model("gemini-2.5-pro")];
        sort_models(&mut models);
        let ids: Vec<_> = models.iter().map(ModelInfo::id).collect();
        assert_eq!(ids, ["gemini-2.5-pro", "gemini-2.0-flash", "gemini-1.5-pro"]);
    }

    #[tokio::test]
    async fn fetch_models_sends_key_as_query_param() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1beta/models"))
            .and(query_param("key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "models": [{
                    "name": "models/gemini-2.0-flash",
                    "displayName": "Gemini 2.0 Flash",
                    "supportedGenerationMethods": ["generateContent"]
                }]
            })))
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let base = format!("{}/v1beta/", server.uri());
        let response = fetch_models(&client, &base, "test-key").await.unwrap();
        assert_eq!(response.models.len(), 1);
        assert_eq!(
            response.models[0].display_name.as_deref(),
            Some("Gemini 2.0 Flash")
        );
    }

    #[tokio::test]
    async fn fetch_models_surfaces_status_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/models"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let err = fetch_models(&client, &server.uri(), "bad").await.unwrap_err();
        assert!(err.to_string().contains("403"));
    }
}
