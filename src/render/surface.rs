use crate::effects::composite::over_in_place;
use crate::effects::shadow::{DropShadow, composite_drop_shadow};
use crate::foundation::core::{Affine, BezPath, Canvas, Point};
use crate::foundation::error::{CardError, CardResult};

/// Premultiplied RGBA8 readback of a composed surface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

/// Scratch layer a stage draws into before it is composited onto the surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum LayerSlot {
    Primary = 0,
    Secondary = 1,
}

/// The fixed-size raster every card is composed on.
///
/// The surface is created once and reused: each compose clears it and repaints every stage.
pub struct OutputSurface {
    canvas: Canvas,
    pixmap: vello_cpu::Pixmap,
    layers: [vello_cpu::Pixmap; 2],
}

impl std::fmt::Debug for OutputSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputSurface")
            .field("canvas", &self.canvas)
            .finish_non_exhaustive()
    }
}

impl OutputSurface {
    pub fn new(canvas: Canvas) -> CardResult<Self> {
        let canvas = Canvas::new(canvas.width, canvas.height)?;
        let (w, h) = canvas.dims_u16()?;
        Ok(Self {
            canvas,
            pixmap: vello_cpu::Pixmap::new(w, h),
            layers: [vello_cpu::Pixmap::new(w, h), vello_cpu::Pixmap::new(w, h)],
        })
    }

    /// A 1080x1920 story surface.
    pub fn story() -> CardResult<Self> {
        Self::new(Canvas::STORY)
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn clear(&mut self) {
        clear_pixmap(&mut self.pixmap);
    }

    /// Premultiplied RGBA8 pixels, row-major.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        self.pixmap.data_as_u8_slice_mut()
    }

    pub fn frame(&self) -> FrameRGBA {
        FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data: self.data().to_vec(),
            premultiplied: true,
        }
    }

    pub fn to_png(&self) -> CardResult<Vec<u8>> {
        crate::encode::png::encode_png(&self.frame())
    }

    /// Clear `slot`, then rasterize whatever `draw` records into it.
    pub(crate) fn render_layer<F>(&mut self, slot: LayerSlot, draw: F) -> CardResult<()>
    where
        F: FnOnce(&mut vello_cpu::RenderContext) -> CardResult<()>,
    {
        let (w, h) = self.canvas.dims_u16()?;
        let layer = &mut self.layers[slot as usize];
        clear_pixmap(layer);

        let mut ctx = vello_cpu::RenderContext::new(w, h);
        draw(&mut ctx)?;
        ctx.flush();
        ctx.render_to_pixmap(layer);
        Ok(())
    }

    /// Source-over the contents of `slot` onto the surface.
    pub(crate) fn composite_layer(&mut self, slot: LayerSlot) -> CardResult<()> {
        let layer = &self.layers[slot as usize];
        over_in_place(
            self.pixmap.data_as_u8_slice_mut(),
            layer.data_as_u8_slice(),
            1.0,
        )
    }

    /// Paint the drop shadow cast by `slot` onto the surface. The layer itself is not drawn.
    pub(crate) fn composite_layer_shadow(
        &mut self,
        slot: LayerSlot,
        shadow: &DropShadow,
    ) -> CardResult<()> {
        let layer = &self.layers[slot as usize];
        composite_drop_shadow(
            self.pixmap.data_as_u8_slice_mut(),
            layer.data_as_u8_slice(),
            self.canvas.width,
            self.canvas.height,
            shadow,
        )
    }
}

fn clear_pixmap(pixmap: &mut vello_cpu::Pixmap) {
    pixmap.data_as_u8_slice_mut().fill(0);
}

pub(crate) fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

pub(crate) fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

pub(crate) fn image_premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> CardResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| CardError::render("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| CardError::render("image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(CardError::render("background byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let pixels = rgba8_premul
        .chunks_exact(4)
        .map(|px| {
            may_have_opacities |= px[3] != 255;
            vello_cpu::peniko::color::PremulRgba8 {
                r: px[0],
                g: px[1],
                b: px[2],
                a: px[3],
            }
        })
        .collect::<Vec<_>>();

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
