use std::path::Path;

use kotoba_types::card::{AnkiFields, LlmCard, MediaPaths};

/// Project the model output plus media paths onto the 12 Anki fields.
///
/// Sentence fields carry the casual variant and are empty when the card has
/// no casual form. Media fields carry base file names only, since Anki
/// resolves them against its own media collection.
pub fn map_to_anki_fields(llm: &LlmCard, media: &MediaPaths) -> AnkiFields {
    let casual = llm.has_polite_and_casual;

    AnkiFields {
        expression: llm.polite_jp.clone(),
        expression_reading: llm.polite_reading.clone(),
        expression_kana: llm.polite_kana.clone(),
        pitch_accent: String::new(),
        meaning: llm.translation_polite.clone(),
        sentence_jp: if casual { llm.casual_jp.clone() } else { String::new() },
        sentence_jp_kana: if casual { llm.casual_kana.clone() } else { String::new() },
        sentence_en: if casual { llm.translation_casual.clone() } else { String::new() },
        photo: file_name(Some(&media.image_polite)),
        notes: llm.notes.clone(),
        audio_word: file_name(Some(&media.audio_polite)),
        audio_sentence: if casual {
            file_name(media.audio_casual.as_deref())
        } else {
            String::new()
        },
    }
}

fn file_name(path: Option<&str>) -> String {
    path.and_then(|p| Path::new(p).file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
