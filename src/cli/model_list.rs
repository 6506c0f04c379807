//! Model listing functionality
//!
//! Lists the models the configured credential can use for card generation.

use crate::api::models::{fetch_models, sort_models};
use crate::core::config::Settings;
use std::error::Error;

pub async fn list_models(settings: &Settings) -> Result<(), Box<dyn Error>> {
    let api_key = settings.api_key.as_deref().ok_or(
        "No API key configured.\n\nSet GEMINI_API_KEY (or GOOGLE_API_KEY), or add api_key to the config file.",
    )?;

    println!("🤖 Available Models");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!();
    println!("🎯 Configured model: {}", settings.model);
    println!();

    let client = reqwest::Client::builder()
        .timeout(settings.request_timeout)
        .build()?;
    let models_response = fetch_models(&client, &settings.base_url, api_key).await?;

    let mut models: Vec<_> = models_response
        .models
        .into_iter()
        .filter(|model| model.supports_generate_content())
        .collect();

    if models.is_empty() {
        println!("No models support generateContent for this key.");
        return Ok(());
    }

    println!("Found {} models that can generate cards:", models.len());
    println!();
    sort_models(&mut models);

    for model in models {
        println!("  • {}", model.id());
        if let Some(display_name) = &model.display_name {
            if !display_name.is_empty() && display_name != model.id() {
                println!("    Name: {display_name}");
            }
        }
        if let Some(limit) = model.input_token_limit {
            println!("    Input limit: {limit} tokens");
        }
        println!();
    }

    Ok(())
}
