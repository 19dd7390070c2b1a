use std::fmt;

/// Stages of the card generation pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validate,
    Start,
    Id,
    Llm,
    Image,
    Audio,
    Map,
    Save,
    Done,
    Error,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Validate => "validate",
            Stage::Start => "start",
            Stage::Id => "id",
            Stage::Llm => "llm",
            Stage::Image => "image",
            Stage::Audio => "audio",
            Stage::Map => "map",
            Stage::Save => "save",
            Stage::Done => "done",
            Stage::Error => "error",
        };
        f.write_str(name)
    }
}

/// Progress notification emitted by the pipeline for one stage.
#[derive(Debug, Clone)]
pub struct PipelineEvent {
    pub stage: Stage,
    pub message: String,
}

impl PipelineEvent {
    pub fn new(stage: Stage, message: impl Into<String>) -> Self {
        PipelineEvent {
            stage,
            message: message.into(),
        }
    }
}
