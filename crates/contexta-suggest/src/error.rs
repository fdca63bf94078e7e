/// Why a generation attempt ended without a model. `Display` is the message
/// shown to the user; diagnostics are logged where the failure is detected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerateError {
    #[error("Please enter at least one use case.")]
    EmptyInput,
    #[error("Error communicating with the AI: {0}")]
    Transport(String),
    #[error("Could not generate the DDD architecture. Please try again.")]
    UnexpectedStructure,
    #[error("Error parsing the AI's JSON response. Please try again.")]
    InvalidPayload(String),
}

/// Coarse category, stable for callers that branch on the failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InputValidation,
    Transport,
    EnvelopeShape,
    PayloadParse,
}

impl GenerateError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GenerateError::EmptyInput => ErrorKind::InputValidation,
            GenerateError::Transport(_) => ErrorKind::Transport,
            GenerateError::UnexpectedStructure => ErrorKind::EnvelopeShape,
            GenerateError::InvalidPayload(_) => ErrorKind::PayloadParse,
        }
    }
}
