//! Errors raised while reading external input

/// Parse failures for colours, wire actions and configs
#[derive(Debug, thiserror::Error)]
pub enum ChexersError {
    #[error("Unknown colour: {0}")]
    UnknownColour(String),

    #[error("Unknown action tag: {0}")]
    UnknownTag(String),

    #[error("Payload does not match action tag {tag}")]
    PayloadMismatch { tag: String },

    #[error("Unknown strategy: {0}")]
    UnknownStrategy(String),
}
