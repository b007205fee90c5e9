pub mod background;
pub mod overlay;
pub mod pipeline;
pub mod surface;
pub mod text;
pub mod watermark;
