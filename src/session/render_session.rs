use std::sync::atomic::{AtomicU64, Ordering};

use crate::assets::decode::{BackgroundAsset, BackgroundSource, decode_background_async};
use crate::foundation::error::CardResult;
use crate::render::pipeline::{Compositor, CompositorOpts};
use crate::render::surface::{FrameRGBA, OutputSurface};
use crate::scene::style::StyleParameters;

/// Result of a session render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderOutcome {
    /// The surface was repainted; carries a readback of the finished card.
    Completed(FrameRGBA),
    /// A newer render was requested while this one waited, so it never drew.
    Superseded,
}

impl RenderOutcome {
    pub fn frame(&self) -> Option<&FrameRGBA> {
        match self {
            Self::Completed(frame) => Some(frame),
            Self::Superseded => None,
        }
    }
}

struct SessionState {
    surface: OutputSurface,
    compositor: Compositor,
}

/// Serializes renders onto one surface.
///
/// Every call to [`CardSession::render`] takes a ticket. Decoding may overlap between calls,
/// but drawing happens under a lock and only for the most recent ticket; older requests that
/// are still waiting resolve to [`RenderOutcome::Superseded`].
pub struct CardSession {
    issued: AtomicU64,
    state: tokio::sync::Mutex<SessionState>,
}

impl CardSession {
    pub fn new(surface: OutputSurface, compositor: Compositor) -> Self {
        Self {
            issued: AtomicU64::new(0),
            state: tokio::sync::Mutex::new(SessionState {
                surface,
                compositor,
            }),
        }
    }

    /// A session over a fresh 1080x1920 surface.
    pub fn story(opts: &CompositorOpts) -> CardResult<Self> {
        Ok(Self::new(OutputSurface::story()?, Compositor::new(opts)))
    }

    /// Number of render requests issued so far.
    pub fn issued(&self) -> u64 {
        self.issued.load(Ordering::SeqCst)
    }

    fn next_ticket(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.issued.load(Ordering::SeqCst) == ticket
    }

    /// Decode `source`, then repaint the surface unless a newer request arrived meanwhile.
    #[tracing::instrument(skip_all)]
    pub async fn render(
        &self,
        source: BackgroundSource,
        style: StyleParameters,
    ) -> CardResult<RenderOutcome> {
        let ticket = self.next_ticket();
        let background = decode_background_async(source).await?;
        self.draw(ticket, &background, &style).await
    }

    /// Repaint with an already decoded background.
    pub async fn render_decoded(
        &self,
        background: &BackgroundAsset,
        style: &StyleParameters,
    ) -> CardResult<RenderOutcome> {
        let ticket = self.next_ticket();
        self.draw(ticket, background, style).await
    }

    async fn draw(
        &self,
        ticket: u64,
        background: &BackgroundAsset,
        style: &StyleParameters,
    ) -> CardResult<RenderOutcome> {
        if !self.is_current(ticket) {
            tracing::warn!(ticket, latest = self.issued(), "render superseded after decode");
            return Ok(RenderOutcome::Superseded);
        }
        let mut guard = self.state.lock().await;
        if !self.is_current(ticket) {
            tracing::warn!(ticket, latest = self.issued(), "render superseded while waiting");
            return Ok(RenderOutcome::Superseded);
        }

        let SessionState {
            surface,
            compositor,
        } = &mut *guard;
        compositor.compose(background, style, surface)?;
        Ok(RenderOutcome::Completed(surface.frame()))
    }

    /// PNG of whatever the surface currently shows.
    pub async fn export_png(&self) -> CardResult<Vec<u8>> {
        self.state.lock().await.surface.to_png()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/render_session.rs"]
mod tests;
