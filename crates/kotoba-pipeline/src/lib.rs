use std::path::PathBuf;

use chrono::Utc;
use kotoba_config::{Config, Credentials};
use kotoba_core::id::generate_id;
use kotoba_core::mapper::map_to_anki_fields;
use kotoba_llm::{LlmClient, LlmError};
use kotoba_media::{ImageClient, MediaError, SpeechClient};
use kotoba_store::{Store, StoreError};
use kotoba_types::card::{CardRecord, LlmCard, MediaPaths};
use kotoba_types::event::{PipelineEvent, Stage};
use thiserror::Error;

pub mod bulk;

pub use bulk::{BulkError, BulkReport};

/// Channel end the pipeline reports progress to. A dropped receiver never
/// fails a run.
pub type ProgressSender = kanal::AsyncSender<PipelineEvent>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Media(#[from] MediaError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// End-to-end card generation: id → llm → images → audio → map → save.
///
/// One invocation runs its stages strictly in sequence and aborts on the
/// first failure; media files written before the failing stage are removed
/// on abort. Separate invocations are not serialized against each other.
pub struct Pipeline {
    llm: LlmClient,
    image: ImageClient,
    speech: SpeechClient,
    store: Store,
}

impl Pipeline {
    /// Build the clients and prepare the output directories.
    pub fn new(config: Config) -> Result<Self, PipelineError> {
        let store = Store::new(&config.storage);
        store.init()?;

        Ok(Pipeline {
            llm: LlmClient::new(config.llm.clone()),
            image: ImageClient::new(
                config.llm.base_url.clone(),
                config.llm.api_key.clone(),
                config.image,
            ),
            speech: SpeechClient::new(config.llm.base_url, config.llm.api_key, config.speech),
            store,
        })
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Process one raw input into a persisted card record.
    ///
    /// Empty or whitespace-only input short-circuits at validation and
    /// returns `Ok(None)` without touching any API. On failure the error
    /// propagates after an `error` event and artifact cleanup; no partial
    /// record is persisted.
    pub async fn process_input(
        &self,
        input: &str,
        credentials: Option<&Credentials>,
        progress: Option<&ProgressSender>,
    ) -> Result<Option<CardRecord>, PipelineError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            emit(progress, Stage::Validate, "Empty input skipped").await;
            return Ok(None);
        }

        emit(progress, Stage::Start, format!("Processing: {trimmed}")).await;

        let mut artifacts = Vec::new();
        match self.run(trimmed, credentials, progress, &mut artifacts).await {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                self.discard_artifacts(&artifacts);
                emit(progress, Stage::Error, format!("Error: {e}")).await;
                Err(e)
            }
        }
    }

    async fn run(
        &self,
        input: &str,
        credentials: Option<&Credentials>,
        progress: Option<&ProgressSender>,
        artifacts: &mut Vec<PathBuf>,
    ) -> Result<CardRecord, PipelineError> {
        let api_key = credentials.and_then(|c| c.api_key.as_deref());

        let id = generate_id(input);
        emit(progress, Stage::Id, format!("Generated ID: {id}")).await;

        emit(progress, Stage::Llm, "Calling LLM...").await;
        let llm_card = self.llm.generate_card(input, api_key, None).await?;
        emit(progress, Stage::Llm, format!("LLM returned: {}", llm_card.polite_jp)).await;

        let media = self
            .generate_media(&id, &llm_card, api_key, progress, artifacts)
            .await?;

        emit(progress, Stage::Map, "Mapping Anki fields").await;
        let anki_fields = map_to_anki_fields(&llm_card, &media);

        let record = CardRecord::assemble(
            id.clone(),
            input.to_string(),
            llm_card,
            media,
            anki_fields,
            Utc::now(),
        );

        self.store.append(&record)?;
        emit(progress, Stage::Save, format!("Saved data for {id}")).await;
        emit(progress, Stage::Done, format!("Done: {id}")).await;

        Ok(record)
    }

    /// Generate the polite media, then the casual media when the card has a
    /// casual variant with a usable prompt/text. Every written file is
    /// tracked for abort-time cleanup.
    async fn generate_media(
        &self,
        id: &str,
        llm_card: &LlmCard,
        api_key: Option<&str>,
        progress: Option<&ProgressSender>,
        artifacts: &mut Vec<PathBuf>,
    ) -> Result<MediaPaths, PipelineError> {
        let media_dir = self.store.media_dir();

        emit(progress, Stage::Image, "Generating polite image...").await;
        let image_polite = media_dir.join(format!("{id}_polite.png"));
        self.image
            .generate(&llm_card.img_prompt_polite, &image_polite, api_key)
            .await?;
        artifacts.push(image_polite.clone());

        let mut image_casual = None;
        if llm_card.has_polite_and_casual && !llm_card.img_prompt_casual.is_empty() {
            emit(progress, Stage::Image, "Generating casual image...").await;
            let path = media_dir.join(format!("{id}_casual.png"));
            self.image
                .generate(&llm_card.img_prompt_casual, &path, api_key)
                .await?;
            artifacts.push(path.clone());
            image_casual = Some(path);
        }

        emit(progress, Stage::Audio, "Generating polite audio...").await;
        let audio_polite = media_dir.join(format!("{id}_polite.mp3"));
        self.speech
            .synthesize(&llm_card.polite_jp, &audio_polite, api_key)
            .await?;
        artifacts.push(audio_polite.clone());

        let mut audio_casual = None;
        if llm_card.has_polite_and_casual && !llm_card.casual_jp.is_empty() {
            emit(progress, Stage::Audio, "Generating casual audio...").await;
            let path = media_dir.join(format!("{id}_casual.mp3"));
            self.speech
                .synthesize(&llm_card.casual_jp, &path, api_key)
                .await?;
            artifacts.push(path.clone());
            audio_casual = Some(path);
        }

        Ok(MediaPaths {
            image_polite: display(&image_polite),
            image_casual: image_casual.as_deref().map(display),
            audio_polite: display(&audio_polite),
            audio_casual: audio_casual.as_deref().map(display),
        })
    }

    /// Best-effort removal of media written before an aborted stage.
    fn discard_artifacts(&self, artifacts: &[PathBuf]) {
        for path in artifacts {
            if let Err(e) = std::fs::remove_file(path) {
                tracing::warn!(path = %path.display(), "could not remove partial media: {e}");
            }
        }
    }
}

fn display(path: &std::path::Path) -> String {
    path.to_string_lossy().into_owned()
}

async fn emit(progress: Option<&ProgressSender>, stage: Stage, message: impl Into<String>) {
    if let Some(tx) = progress {
        let _ = tx.send(PipelineEvent::new(stage, message.into())).await;
    }
}
