use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Grammatical tense of the source input, as classified by the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tense {
    Past,
    Present,
    Future,
}

impl Tense {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tense::Past => "past",
            Tense::Present => "present",
            Tense::Future => "future",
        }
    }
}

/// Structured output of the language model for one input.
///
/// Every key is required in the model's response. Casual fields may be
/// empty strings when `has_polite_and_casual` is false.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmCard {
    pub source_input: String,
    pub tense: Tense,
    pub has_polite_and_casual: bool,
    pub polite_jp: String,
    pub polite_kana: String,
    pub polite_reading: String,
    pub translation_polite: String,
    pub casual_jp: String,
    pub casual_kana: String,
    pub translation_casual: String,
    pub notes: String,
    pub img_prompt_polite: String,
    pub img_prompt_casual: String,
}

/// File paths of the generated media for one card.
///
/// Polite media always exists once a record exists; casual media exists
/// only for cards with a casual variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaPaths {
    #[serde(rename = "imagePolite")]
    pub image_polite: String,
    #[serde(rename = "imageCasual")]
    pub image_casual: Option<String>,
    #[serde(rename = "audioPolite")]
    pub audio_polite: String,
    #[serde(rename = "audioCasual")]
    pub audio_casual: Option<String>,
}

/// The fixed 12-field projection expected by the Anki note type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnkiFields {
    #[serde(rename = "Expression")]
    pub expression: String,
    #[serde(rename = "ExpressionReading")]
    pub expression_reading: String,
    #[serde(rename = "ExpressionKana")]
    pub expression_kana: String,
    #[serde(rename = "PitchAccent")]
    pub pitch_accent: String,
    #[serde(rename = "Meaning")]
    pub meaning: String,
    #[serde(rename = "SentenceJP")]
    pub sentence_jp: String,
    #[serde(rename = "SentenceJPKana")]
    pub sentence_jp_kana: String,
    #[serde(rename = "SentenceEN")]
    pub sentence_en: String,
    #[serde(rename = "Photo")]
    pub photo: String,
    #[serde(rename = "Notes")]
    pub notes: String,
    #[serde(rename = "AudioWord")]
    pub audio_word: String,
    #[serde(rename = "AudioSentence")]
    pub audio_sentence: String,
}

/// One generated flashcard, as persisted in the JSON store.
///
/// Created exactly once per successful pipeline run, never mutated.
/// Casual fields are `None` whenever `has_polite_and_casual` is false.
/// `id` is not unique: the 16-bit hash space admits collisions between
/// unrelated inputs, and lookups take the first match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardRecord {
    pub id: String,
    pub source_input: String,
    pub tense: Tense,
    pub has_polite_and_casual: bool,
    pub polite_jp: String,
    pub polite_kana: String,
    pub polite_reading: String,
    pub translation_polite: String,
    pub casual_jp: Option<String>,
    pub casual_kana: Option<String>,
    pub translation_casual: Option<String>,
    pub notes: String,
    pub img_prompt_polite: String,
    pub img_prompt_casual: String,
    pub media: MediaPaths,
    #[serde(rename = "ankiFields")]
    pub anki_fields: AnkiFields,
    pub timestamp: DateTime<Utc>,
}

impl CardRecord {
    /// Assemble a record from the model output plus generated media.
    ///
    /// Enforces the casual-field invariant: when the card has no casual
    /// variant, the casual text fields are dropped regardless of what the
    /// model returned.
    pub fn assemble(
        id: String,
        source_input: String,
        llm: LlmCard,
        media: MediaPaths,
        anki_fields: AnkiFields,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let casual = llm.has_polite_and_casual;
        CardRecord {
            id,
            source_input,
            tense: llm.tense,
            has_polite_and_casual: casual,
            polite_jp: llm.polite_jp,
            polite_kana: llm.polite_kana,
            polite_reading: llm.polite_reading,
            translation_polite: llm.translation_polite,
            casual_jp: casual.then_some(llm.casual_jp),
            casual_kana: casual.then_some(llm.casual_kana),
            translation_casual: casual.then_some(llm.translation_casual),
            notes: llm.notes,
            img_prompt_polite: llm.img_prompt_polite,
            img_prompt_casual: llm.img_prompt_casual,
            media,
            anki_fields,
            timestamp,
        }
    }
}
