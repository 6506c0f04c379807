//! The card generation pipeline.
//!
//! One call runs a fixed chain: resolve the credential, build the instruction,
//! call the vision model once, strip formatting, parse JSON, validate. Nothing
//! is cached and nothing is retried; callers layer their own policy on top.

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::card::prompt::{build_card_prompt, build_lore_prompt};
use crate::card::response::{parse_model_json, MalformedResponse};
use crate::card::schema::{validate_with, Card, ValidationPolicy};
use crate::core::constants::{DEFAULT_TEMPERATURE, TEMPERATURE_RANGE};
use crate::core::credentials::{resolve_credential, CredentialSource};
use crate::core::error::{GenerationError, TransportError};
use crate::core::photo::Photo;
use crate::core::vision::{VisionModel, VisionRequest};
use crate::utils::logging::redact_key;

pub struct CardGenerator<M> {
    model: M,
    default_credential: Option<String>,
    temperature: f32,
    policy: ValidationPolicy,
}

impl<M: VisionModel> CardGenerator<M> {
    pub fn new(model: M) -> Self {
        Self {
            model,
            default_credential: None,
            temperature: DEFAULT_TEMPERATURE,
            policy: ValidationPolicy::default(),
        }
    }

    /// Process-wide credential used when callers do not supply one.
    pub fn with_default_credential(mut self, credential: Option<String>) -> Self {
        self.default_credential = credential.filter(|key| !key.trim().is_empty());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature.clamp(TEMPERATURE_RANGE.0, TEMPERATURE_RANGE.1);
        self
    }

    pub fn with_policy(mut self, policy: ValidationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    fn credential<'a>(
        &'a self,
        explicit: Option<&'a str>,
    ) -> Result<(&'a str, CredentialSource), GenerationError> {
        let resolved = resolve_credential(explicit, self.default_credential.as_deref())
            .ok_or(GenerationError::NoCredential)?;
        debug!(source = %resolved.1, key = %redact_key(resolved.0), "credential resolved");
        Ok(resolved)
    }

    /// Turn a photo into a validated card.
    pub async fn generate(
        &self,
        photo: &Photo,
        credential: Option<&str>,
    ) -> Result<Card, GenerationError> {
        let (key, _) = self.credential(credential)?;
        self.run(photo, key).await
    }

    /// Like [`generate`](Self::generate), but abandons the model call when
    /// `cancel` fires. A missing credential is still reported first.
    pub async fn generate_with_cancel(
        &self,
        photo: &Photo,
        credential: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<Card, GenerationError> {
        let (key, _) = self.credential(credential)?;

        tokio::select! {
            result = self.run(photo, key) => result,
            _ = cancel.cancelled() => {
                info!("card generation cancelled");
                Err(TransportError::Cancelled.into())
            }
        }
    }

    async fn run(&self, photo: &Photo, key: &str) -> Result<Card, GenerationError> {
        let instruction = build_card_prompt();
        info!(
            mime = %photo.mime_type,
            image_bytes = photo.bytes.len(),
            prompt_chars = instruction.len(),
            temperature = self.temperature,
            "requesting card from vision model"
        );

        let text = self
            .model
            .generate_text(VisionRequest {
                instruction: &instruction,
                image: Some(photo),
                temperature: self.temperature,
                credential: key,
            })
            .await
            .inspect_err(|err| warn!(error = %err, "vision model call failed"))?;
        debug!(chars = text.len(), "vision model responded");

        let value = parse_model_json(&text).inspect_err(|err| {
            warn!(reason = %err.reason, "model response was not JSON");
            debug!(raw = %text, "unparseable model response");
        })?;

        let card = validate_with(&value, self.policy).inspect_err(|err| {
            warn!(path = %err.path, reason = %err.reason, "model response violates card schema");
            debug!(raw = %text, "rejected model response");
        })?;

        for breach in card.convention_breaches() {
            warn!(card = %card.name, "{breach}");
        }
        info!(
            card = %card.name,
            category = %card.category,
            rarity = %card.rarity,
            stats = card.stats.len(),
            "card generated"
        );
        Ok(card)
    }

    /// Ask the model for fresh lore for an existing card. Text only, no image.
    pub async fn regenerate_lore(
        &self,
        card: &Card,
        theme: &str,
        credential: Option<&str>,
    ) -> Result<String, GenerationError> {
        let (key, _) = self.credential(credential)?;
        let instruction = build_lore_prompt(card, theme);
        info!(card = %card.name, theme, "requesting new lore");

        let text = self
            .model
            .generate_text(VisionRequest {
                instruction: &instruction,
                image: None,
                temperature: self.temperature,
                credential: key,
            })
            .await?;

        let lore = text.trim();
        if lore.is_empty() {
            return Err(MalformedResponse {
                reason: "lore response was empty".to_string(),
                text,
            }
            .into());
        }
        Ok(lore.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::schema::{Category, Rarity, StatValue};
    use crate::core::error::GenerationErrorKind;
    use std::sync::Mutex;

    const SIR_WHISKERS: &str = r#"{
        "name": "Sir Whiskers",
        "category": "Animal",
        "stats": {
            "Zoomies": { "value": 97, "iconHint": "speed" },
            "Nap Power": { "value": 88, "iconHint": "sleep" },
            "Judgement": { "value": 74, "iconHint": "eye" },
            "Weird Flex": { "value": "Can open doors with his face", "iconHint": "flex" }
        },
        "lore": "Sir Whiskers guards the sunny windowsill. None dare challenge him.",
        "rarity": "Rare"
    }"#;

    #[derive(Debug, Clone, PartialEq)]
    struct RecordedCall {
        instruction: String,
        had_image: bool,
        temperature: f32,
        credential: String,
    }

    /// Replies with a canned result and records what it was asked.
    struct RecordingModel {
        reply: Result<String, fn() -> TransportError>,
        calls: Mutex<Vec<RecordedCall>>,
    }

    impl RecordingModel {
        fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing(make: fn() -> TransportError) -> Self {
            Self {
                reply: Err(make),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<RecordedCall> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl VisionModel for RecordingModel {
        async fn generate_text(
            &self,
            request: VisionRequest<'_>,
        ) -> Result<String, TransportError> {
            self.calls.lock().unwrap().push(RecordedCall {
                instruction: request.instruction.to_string(),
                had_image: request.image.is_some(),
                temperature: request.temperature,
                credential: request.credential.to_string(),
            });
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(make) => Err(make()),
            }
        }
    }

    /// Never answers.
    struct StalledModel;

    #[async_trait::async_trait]
    impl VisionModel for StalledModel {
        async fn generate_text(&self, _: VisionRequest<'_>) -> Result<String, TransportError> {
            std::future::pending().await
        }
    }

    fn photo() -> Photo {
        Photo::from_bytes(vec![0xFF, 0xD8, 0xFF, 0xE0, 0, 1]).unwrap()
    }

    fn generator(model: RecordingModel) -> CardGenerator<RecordingModel> {
        CardGenerator::new(model).with_default_credential(Some("shared-key".to_string()))
    }

    #[tokio::test]
    async fn generates_card_from_clean_json() {
        let generator = generator(RecordingModel::replying(SIR_WHISKERS));
        let card = generator.generate(&photo(), None).await.unwrap();

        assert_eq!(card.name, "Sir Whiskers");
        assert_eq!(card.category, Category::Animal);
        assert_eq!(card.rarity, Rarity::Rare);
        assert_eq!(card.stats["Zoomies"].value, StatValue::Score(97.0));

        let calls = generator.model().calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].had_image);
        assert_eq!(calls[0].temperature, DEFAULT_TEMPERATURE);
        assert!(calls[0].instruction.contains("Weird Flex"));
    }

    #[tokio::test]
    async fn caller_credential_is_forwarded_over_default() {
        let generator = generator(RecordingModel::replying(SIR_WHISKERS));
        generator.generate(&photo(), Some("caller-key")).await.unwrap();
        assert_eq!(generator.model().calls()[0].credential, "caller-key");

        generator.generate(&photo(), None).await.unwrap();
        assert_eq!(generator.model().calls()[1].credential, "shared-key");
    }

    #[tokio::test]
    async fn missing_credential_fails_before_model_call() {
        let generator = CardGenerator::new(RecordingModel::replying(SIR_WHISKERS));
        let err = generator.generate(&photo(), Some("  ")).await.unwrap_err();

        assert_eq!(err.kind(), GenerationErrorKind::NoCredential);
        assert!(generator.model().calls().is_empty());
    }

    #[tokio::test]
    async fn fenced_response_matches_unwrapped_response() {
        let fenced = format!("```json\n{SIR_WHISKERS}\n```");
        let from_fenced = generator(RecordingModel::replying(&fenced))
            .generate(&photo(), None)
            .await
            .unwrap();
        let from_plain = generator(RecordingModel::replying(SIR_WHISKERS))
            .generate(&photo(), None)
            .await
            .unwrap();
        assert_eq!(from_fenced, from_plain);
    }

    #[tokio::test]
    async fn prose_is_malformed_not_schema_violation() {
        let generator = generator(RecordingModel::replying(
            "I'm sorry, I can't identify anything in this photo.",
        ));
        let err = generator.generate(&photo(), None).await.unwrap_err();
        assert_eq!(err.kind(), GenerationErrorKind::MalformedResponse);
    }

    #[tokio::test]
    async fn wrong_shape_is_schema_violation_with_path() {
        let alien = SIR_WHISKERS.replace("\"Animal\"", "\"Alien\"");
        let generator = generator(RecordingModel::replying(&alien));
        match generator.generate(&photo(), None).await.unwrap_err() {
            GenerationError::SchemaViolation(violation) => assert_eq!(violation.path, "category"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn strict_policy_rejects_out_of_range_scores() {
        let inflated = SIR_WHISKERS.replace("97", "150");
        let lenient = generator(RecordingModel::replying(&inflated));
        assert!(lenient.generate(&photo(), None).await.is_ok());

        let strict = generator(RecordingModel::replying(&inflated))
            .with_policy(ValidationPolicy::strict());
        let err = strict.generate(&photo(), None).await.unwrap_err();
        assert_eq!(err.kind(), GenerationErrorKind::SchemaViolation);
    }

    #[tokio::test]
    async fn transport_failures_propagate() {
        let generator = generator(RecordingModel::failing(|| TransportError::Timeout));
        let err = generator.generate(&photo(), None).await.unwrap_err();
        assert!(matches!(err, GenerationError::Transport(TransportError::Timeout)));
    }

    #[tokio::test]
    async fn cancellation_yields_no_card() {
        let generator = CardGenerator::new(StalledModel)
            .with_default_credential(Some("shared-key".to_string()));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = generator
            .generate_with_cancel(&photo(), None, &cancel)
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
    }

    #[tokio::test]
    async fn missing_credential_wins_over_cancellation() {
        let generator = CardGenerator::new(StalledModel);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = generator
            .generate_with_cancel(&photo(), None, &cancel)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), GenerationErrorKind::NoCredential);
    }

    #[tokio::test]
    async fn uncancelled_generation_completes() {
        let generator = generator(RecordingModel::replying(SIR_WHISKERS));
        let cancel = CancellationToken::new();
        let card = generator
            .generate_with_cancel(&photo(), None, &cancel)
            .await
            .unwrap();
        assert_eq!(card.name, "Sir Whiskers");
    }

    #[tokio::test]
    async fn lore_is_text_only_and_trimmed() {
        let card = Card::from_saved_json(SIR_WHISKERS).unwrap();
        let generator = generator(RecordingModel::replying(
            "\n  In the age of naps, one cat stood vigilant. He still does.  \n",
        ));

        let lore = generator
            .regenerate_lore(&card, "epic fantasy", Some("caller-key"))
            .await
            .unwrap();
        assert_eq!(lore, "In the age of naps, one cat stood vigilant. He still does.");

        let call = &generator.model().calls()[0];
        assert!(!call.had_image);
        assert_eq!(call.credential, "caller-key");
        assert!(call.instruction.contains("Subject: Sir Whiskers"));
        assert!(call.instruction.contains("Theme: epic fantasy"));
    }

    #[tokio::test]
    async fn empty_lore_is_malformed() {
        let card = Card::from_saved_json(SIR_WHISKERS).unwrap();
        let generator = generator(RecordingModel::replying("   "));
        let err = generator
            .regenerate_lore(&card, "noir", None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), GenerationErrorKind::MalformedResponse);
    }

    #[test]
    fn temperature_is_clamped() {
        let generator = CardGenerator::new(StalledModel).with_temperature(5.0);
        assert_eq!(generator.temperature(), 2.0);
        let generator = CardGenerator::new(StalledModel).with_temperature(-1.0);
        assert_eq!(generator.temperature(), 0.0);
    }
}
