//! Boundary to the generative backend that writes captions and paints backgrounds.
//!
//! The backend itself is out of scope; [`CardProvider`] describes what the engine needs from it
//! and [`generate_card`] applies the product rules around it: request validation, caption
//! cleanup and fallback, candidate limits, and user-facing error mapping.

use async_trait::async_trait;

use crate::assets::decode::BackgroundSource;
use crate::foundation::error::{CardError, CardResult, GENERIC_GENERATION_MESSAGE};
use crate::scene::style::StyleParameters;

/// At most this many background candidates are offered.
pub const MAX_CANDIDATES: usize = 3;
/// Captions longer than this many UTF-16 code units are replaced.
pub const MAX_CAPTION_CHARS: usize = 120;

pub const MISSING_NAME_MESSAGE: &str = "Por favor, digite o nome do aniversariante.";
pub const MISSING_PHOTO_MESSAGE: &str = "Por favor, envie uma foto.";

/// Whether backgrounds are composed around a user photo or painted from scratch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GenerationMode {
    WithPhoto,
    NoPhoto,
}

/// What the user asked for.
#[derive(Clone, Debug)]
pub struct CardRequest {
    /// Display name of the person having the birthday.
    pub name: String,
    pub mode: GenerationMode,
    pub photo: Option<BackgroundSource>,
}

/// Caption plus the background candidates to choose from.
#[derive(Clone, Debug)]
pub struct GeneratedCard {
    pub caption: String,
    pub backgrounds: Vec<BackgroundSource>,
}

impl GeneratedCard {
    /// Style the editor starts from: default styling with the generated caption.
    pub fn initial_style(&self) -> StyleParameters {
        StyleParameters::with_text(self.caption.clone())
    }
}

#[async_trait]
pub trait CardProvider: Send + Sync {
    /// Raw caption text for `name`. Cleanup happens in [`generate_card`].
    async fn generate_caption(&self, name: &str) -> CardResult<String>;

    /// Background candidates. `photo` is set in [`GenerationMode::WithPhoto`].
    async fn generate_backgrounds(
        &self,
        mode: GenerationMode,
        photo: Option<&BackgroundSource>,
    ) -> CardResult<Vec<BackgroundSource>>;
}

/// Caption used when the caption backend fails outright.
pub fn fallback_caption(name: &str) -> String {
    format!("Parabéns, {name}! Tudo de bom hoje e sempre!")
}

/// Normalize a raw generated caption.
pub fn sanitize_caption(raw: &str, name: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return format!("Feliz Aniversário, {name}! Muita luz e alegria!");
    }

    let unquoted: String = trimmed.chars().filter(|c| !matches!(c, '"' | '*')).collect();
    let text = strip_label_prefix(&unquoted);

    if text.encode_utf16().count() > MAX_CAPTION_CHARS {
        return format!("Parabéns, {name}! Que seu dia seja repleto de amor e felicidade!");
    }
    text.to_string()
}

/// Drop a leading `Opção N:`, `Aqui está:` or `Mensagem:` label and the whitespace after it.
fn strip_label_prefix(text: &str) -> &str {
    fn strip_ci<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
        let head = text.get(..prefix.len())?;
        head.to_lowercase()
            .eq(&prefix.to_lowercase())
            .then(|| &text[prefix.len()..])
    }

    let rest = strip_ci(text, "aqui está:")
        .or_else(|| strip_ci(text, "mensagem:"))
        .or_else(|| {
            let after = strip_ci(text, "opção ")?;
            let mut chars = after.chars();
            let digit = chars.next()?;
            (digit.is_ascii_digit() && chars.next() == Some(':')).then(|| &after[2..])
        });
    match rest {
        Some(rest) => rest.trim_start(),
        None => text,
    }
}

/// Produce a caption and background candidates for `request`.
///
/// A caption failure is absorbed by [`fallback_caption`]; a background failure or an empty
/// candidate list becomes an error whose [`CardError::user_message`] is the generic message.
#[tracing::instrument(skip_all, fields(mode = ?request.mode))]
pub async fn generate_card(
    provider: &dyn CardProvider,
    request: &CardRequest,
) -> CardResult<GeneratedCard> {
    let name = request.name.as_str();
    if name.trim().is_empty() {
        return Err(CardError::validation(MISSING_NAME_MESSAGE));
    }
    if request.mode == GenerationMode::WithPhoto && request.photo.is_none() {
        return Err(CardError::validation(MISSING_PHOTO_MESSAGE));
    }

    let caption = match provider.generate_caption(name).await {
        Ok(raw) => sanitize_caption(&raw, name),
        Err(e) => {
            tracing::warn!(error = %e, "caption generation failed, using fallback");
            fallback_caption(name)
        }
    };

    let photo = match request.mode {
        GenerationMode::WithPhoto => request.photo.as_ref(),
        GenerationMode::NoPhoto => None,
    };
    let mut backgrounds = provider
        .generate_backgrounds(request.mode, photo)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "background generation failed");
            CardError::generation(GENERIC_GENERATION_MESSAGE)
        })?;

    if backgrounds.is_empty() {
        tracing::error!("background generation returned no candidates");
        return Err(CardError::EmptyGeneration);
    }
    backgrounds.truncate(MAX_CANDIDATES);

    tracing::debug!(candidates = backgrounds.len(), "card generated");
    Ok(GeneratedCard {
        caption,
        backgrounds,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/provider/mod.rs"]
mod tests;
