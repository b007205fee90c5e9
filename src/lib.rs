#![forbid(unsafe_code)]
//! Composition engine for vertical birthday greeting cards.
//!
//! A card is a cover-fit background, a readability gradient over its lower part, a wrapped
//! and centered caption, and a fixed brand watermark, rasterized onto a 1080x1920 surface.
//! [`Compositor::compose`] runs that pipeline synchronously; [`CardSession`] wraps it with
//! async background decoding and last-write-wins serialization per surface.

pub mod assets;
pub mod effects;
pub mod encode;
pub mod foundation;
pub mod provider;
pub mod render;
pub mod scene;
pub mod session;

pub use assets::color::Rgb8;
pub use assets::decode::{
    BackgroundAsset, BackgroundSource, decode_background, decode_background_async,
};
pub use assets::fonts::{FONT_DIR_ENV, FontBook, FontSources, ResolvedFont};
pub use encode::png::{download_filename, encode_png, write_png};
pub use foundation::core::{Canvas, Rgba8Premul};
pub use foundation::error::{CardError, CardResult, GENERIC_GENERATION_MESSAGE};
pub use foundation::math::digest_u64;
pub use provider::{
    CardProvider, CardRequest, GeneratedCard, GenerationMode, generate_card, sanitize_caption,
};
pub use render::background::cover_fit;
pub use render::overlay::overlay_alpha;
pub use render::pipeline::{ComposeReport, Compositor, CompositorOpts};
pub use render::surface::{FrameRGBA, OutputSurface};
pub use render::text::{CaptionLine, LineLayout, MeasureText, layout_caption, wrap_lines};
pub use render::watermark::{WatermarkLayout, watermark_layout};
pub use scene::style::{FontFamily, StyleParameters};
pub use session::render_session::{CardSession, RenderOutcome};
