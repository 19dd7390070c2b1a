use std::path::Path;

use kotoba_config::image::ImageConfig;
use kotoba_config::llm::LlmConfig;
use kotoba_config::speech::SpeechConfig;
use kotoba_config::storage::StorageConfig;
use kotoba_config::Config;
use kotoba_pipeline::Pipeline;
use kotoba_types::event::Stage;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(server: &MockServer, dir: &Path) -> Config {
    Config {
        llm: LlmConfig {
            base_url: server.uri(),
            model: "gpt-4o".to_string(),
            api_key: Some("test-key".to_string()),
            temperature: 0.3,
        },
        image: ImageConfig {
            model: "dall-e-3".to_string(),
            size: "1024x1024".to_string(),
            quality: "standard".to_string(),
        },
        speech: SpeechConfig {
            model: "gpt-4o-mini-tts".to_string(),
            voice: "alloy".to_string(),
            format: "mp3".to_string(),
        },
        storage: StorageConfig {
            out_dir: dir.join("out"),
            media_dir: dir.join("media"),
        },
    }
}

fn llm_content(casual: bool) -> String {
    json!({
        "source_input": "ありがとう",
        "tense": "present",
        "has_polite_and_casual": casual,
        "polite_jp": "ありがとうございます",
        "polite_kana": "ありがとうございます",
        "polite_reading": "arigatou gozaimasu",
        "translation_polite": "Thank you",
        "casual_jp": if casual { "ありがとう" } else { "" },
        "casual_kana": if casual { "ありがとう" } else { "" },
        "translation_casual": if casual { "Thanks" } else { "" },
        "notes": "Set phrase.",
        "img_prompt_polite": "a person bowing politely",
        "img_prompt_casual": if casual { "friends waving" } else { "" },
    })
    .to_string()
}

async fn mount_llm(server: &MockServer, content: String) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": content } }]
        })))
        .mount(server)
        .await;
}

async fn mount_image(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/images/generations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "url": format!("{}/files/generated.png", server.uri()) }]
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/files/generated.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"\x89PNGdata".to_vec()))
        .mount(server)
        .await;
}

async fn mount_audio(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/audio/speech"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ID3audio".to_vec()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn polite_only_input_yields_record_without_casual_media() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    mount_llm(&server, llm_content(false)).await;
    mount_image(&server).await;
    mount_audio(&server).await;

    let pipeline = Pipeline::new(test_config(&server, dir.path())).unwrap();
    let record = pipeline
        .process_input("ありがとう", None, None)
        .await
        .unwrap()
        .expect("record");

    assert!(!record.has_polite_and_casual);
    assert_eq!(record.media.image_casual, None);
    assert_eq!(record.media.audio_casual, None);
    assert_eq!(record.casual_jp, None);
    assert_eq!(record.anki_fields.sentence_jp, "");
    assert_eq!(record.anki_fields.audio_sentence, "");

    assert!(Path::new(&record.media.image_polite).exists());
    assert!(Path::new(&record.media.audio_polite).exists());
    assert!(record.media.image_polite.ends_with(&format!("{}_polite.png", record.id)));
    assert!(record.media.audio_polite.ends_with(&format!("{}_polite.mp3", record.id)));

    // persisted to both stores
    let stored = pipeline.store().all_cards();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0], record);
    assert!(pipeline.store().csv_path().exists());
}

#[tokio::test]
async fn casual_variant_generates_two_images_and_two_audios() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    mount_llm(&server, llm_content(true)).await;
    mount_audio(&server).await;

    Mock::given(method("POST"))
        .and(path("/images/generations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "url": format!("{}/files/generated.png", server.uri()) }]
        })))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/files/generated.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"\x89PNGdata".to_vec()))
        .expect(2)
        .mount(&server)
        .await;

    let pipeline = Pipeline::new(test_config(&server, dir.path())).unwrap();
    let record = pipeline
        .process_input("ありがとう", None, None)
        .await
        .unwrap()
        .expect("record");

    let image_casual = record.media.image_casual.expect("casual image");
    let audio_casual = record.media.audio_casual.expect("casual audio");
    assert!(Path::new(&image_casual).exists());
    assert!(Path::new(&audio_casual).exists());
    assert_eq!(record.casual_jp.as_deref(), Some("ありがとう"));
    assert_eq!(record.anki_fields.sentence_jp, "ありがとう");
    assert_eq!(
        record.anki_fields.audio_sentence,
        format!("{}_casual.mp3", record.id)
    );
}

#[tokio::test]
async fn empty_input_short_circuits_without_any_api_call() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let pipeline = Pipeline::new(test_config(&server, dir.path())).unwrap();
    let (tx, rx) = kanal::unbounded_async();

    let outcome = pipeline
        .process_input("   \n ", None, Some(&tx))
        .await
        .unwrap();

    assert!(outcome.is_none());
    assert!(pipeline.store().all_cards().is_empty());

    let event = rx.recv().await.unwrap();
    assert_eq!(event.stage, Stage::Validate);
    drop(tx);
}

#[tokio::test]
async fn progress_events_follow_the_stage_order() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    mount_llm(&server, llm_content(false)).await;
    mount_image(&server).await;
    mount_audio(&server).await;

    let pipeline = Pipeline::new(test_config(&server, dir.path())).unwrap();
    let (tx, rx) = kanal::unbounded_async();

    pipeline
        .process_input("ありがとう", None, Some(&tx))
        .await
        .unwrap();
    drop(tx);

    let mut stages = Vec::new();
    while let Ok(event) = rx.recv().await {
        stages.push(event.stage);
    }

    assert_eq!(
        stages,
        vec![
            Stage::Start,
            Stage::Id,
            Stage::Llm,
            Stage::Llm,
            Stage::Image,
            Stage::Audio,
            Stage::Map,
            Stage::Save,
            Stage::Done,
        ]
    );
}

#[tokio::test]
async fn failed_audio_aborts_without_record_and_removes_partial_media() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    mount_llm(&server, llm_content(false)).await;
    mount_image(&server).await;

    Mock::given(method("POST"))
        .and(path("/audio/speech"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "error": { "message": "overloaded" }
        })))
        .mount(&server)
        .await;

    let pipeline = Pipeline::new(test_config(&server, dir.path())).unwrap();
    let (tx, rx) = kanal::unbounded_async();

    let err = pipeline
        .process_input("ありがとう", None, Some(&tx))
        .await
        .unwrap_err();
    drop(tx);

    assert!(err.to_string().contains("overloaded"));
    assert!(pipeline.store().all_cards().is_empty());

    // the polite image written before the failing stage is cleaned up
    let media_files = std::fs::read_dir(dir.path().join("media")).unwrap().count();
    assert_eq!(media_files, 0);

    let mut saw_error = false;
    while let Ok(event) = rx.recv().await {
        if event.stage == Stage::Error {
            saw_error = true;
        }
    }
    assert!(saw_error);
}

#[tokio::test]
async fn bulk_run_continues_past_a_failing_line() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    // the middle line's LLM call fails; specific mock mounted first wins
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("二行目"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": { "message": "model exploded" }
        })))
        .mount(&server)
        .await;
    mount_llm(&server, llm_content(false)).await;
    mount_image(&server).await;
    mount_audio(&server).await;

    let pipeline = Pipeline::new(test_config(&server, dir.path())).unwrap();
    let report = pipeline
        .process_lines(["ありがとう", "二行目です", "こんにちは"], None, None)
        .await;

    assert_eq!(report.total, 3);
    assert_eq!(report.processed, 2);
    assert_eq!(report.failed, 1);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].input, "二行目です");
    assert!(report.errors[0].error.contains("model exploded"));
    assert_eq!(pipeline.store().all_cards().len(), 2);
}

#[tokio::test]
async fn bulk_run_drops_blank_lines_before_counting() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    mount_llm(&server, llm_content(false)).await;
    mount_image(&server).await;
    mount_audio(&server).await;

    let pipeline = Pipeline::new(test_config(&server, dir.path())).unwrap();
    let report = pipeline
        .process_lines(["ありがとう", "", "   "], None, None)
        .await;

    assert_eq!(report.total, 1);
    assert_eq!(report.processed, 1);
    assert_eq!(report.failed, 0);
}
