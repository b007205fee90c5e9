/// Result alias used across the crate.
pub type CardResult<T> = Result<T, CardError>;

/// Message shown to the user whenever card generation fails for any provider-side reason.
pub const GENERIC_GENERATION_MESSAGE: &str =
    "Ocorreu um erro ao criar o cartão. Verifique sua conexão e tente novamente.";

#[derive(thiserror::Error, Debug)]
pub enum CardError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("font error: {0}")]
    Font(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("generation error: {0}")]
    Generation(String),

    #[error("generation error: provider returned no background images")]
    EmptyGeneration,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CardError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn font(msg: impl Into<String>) -> Self {
        Self::Font(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn generation(msg: impl Into<String>) -> Self {
        Self::Generation(msg.into())
    }

    /// Text suitable for showing to the end user.
    ///
    /// Request validation keeps its own message; every other failure collapses into
    /// [`GENERIC_GENERATION_MESSAGE`].
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            _ => GENERIC_GENERATION_MESSAGE.to_string(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
