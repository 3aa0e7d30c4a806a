//! Panel rendering using vello.
//!
//! Panels are authored for a fixed canvas (1920×1080 by default). The canvas
//! is scaled uniformly to fit the window and centred; the leftover bars are
//! black. The same mapping converts window pointer positions back into canvas
//! coordinates for hit testing.

use vello::Scene;
use vello::kurbo::{Affine, Rect, Stroke};
use vello::peniko::{Color, Fill, ImageBrush, ImageData, ImageSampler};

use label_viewer::config::CanvasConfig;
use label_viewer::{Hotspot, Panel};

use crate::assets::AssetCache;

const LETTERBOX: Color = Color::new([0.0, 0.0, 0.0, 1.0]);
const PLACEHOLDER_BG: Color = Color::new([0.08, 0.08, 0.08, 1.0]);
const PLACEHOLDER_HOTSPOT: Color = Color::new([1.0, 0.894, 0.769, 0.8]);
const PLACEHOLDER_STROKE: f64 = 4.0;

// ---------------------------------------------------------------------------
// Canvas fit
// ---------------------------------------------------------------------------

/// Uniform scale + centring offset from canvas space to window space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasFit {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    pub canvas: CanvasConfig,
}

impl CanvasFit {
    pub fn new(canvas: CanvasConfig, window_width: f64, window_height: f64) -> Self {
        let scale = if canvas.width > 0.0 && canvas.height > 0.0 {
            (window_width / canvas.width).min(window_height / canvas.height)
        } else {
            1.0
        };
        Self {
            scale,
            offset_x: (window_width - canvas.width * scale) / 2.0,
            offset_y: (window_height - canvas.height * scale) / 2.0,
            canvas,
        }
    }

    pub fn transform(&self) -> Affine {
        Affine::translate((self.offset_x, self.offset_y)) * Affine::scale(self.scale)
    }

    /// Window position → canvas position. `None` if it falls in a letterbox bar.
    pub fn to_canvas(&self, x: f64, y: f64) -> Option<kurbo::Point> {
        if self.scale <= 0.0 {
            return None;
        }
        let cx = (x - self.offset_x) / self.scale;
        let cy = (y - self.offset_y) / self.scale;
        let inside = (0.0..self.canvas.width).contains(&cx) && (0.0..self.canvas.height).contains(&cy);
        inside.then(|| kurbo::Point::new(cx, cy))
    }

    fn canvas_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.canvas.width, self.canvas.height)
    }
}

// ---------------------------------------------------------------------------
// Drawing
// ---------------------------------------------------------------------------

/// Draw `panel` into `scene`: letterbox, background, then hotspot icons.
pub fn render_panel(
    scene: &mut Scene,
    width: f64,
    height: f64,
    panel: &Panel,
    assets: &AssetCache,
    fit: &CanvasFit,
) {
    scene.fill(
        Fill::NonZero,
        Affine::IDENTITY,
        LETTERBOX,
        None,
        &Rect::new(0.0, 0.0, width, height),
    );

    let canvas = fit.transform();
    scene.push_clip_layer(Fill::NonZero, canvas, &fit.canvas_rect());

    match assets.get(&panel.background) {
        Some(image) => draw_image(scene, image, canvas),
        None => scene.fill(Fill::NonZero, canvas, PLACEHOLDER_BG, None, &fit.canvas_rect()),
    }

    for hotspot in &panel.hotspots {
        match hotspot.icon.as_ref().and_then(|icon| assets.get(icon)) {
            Some(image) => {
                let origin = Affine::translate((hotspot.rect.x0, hotspot.rect.y0));
                draw_image(scene, image, canvas * origin);
            }
            None => outline_hotspot(scene, hotspot, canvas),
        }
    }

    scene.pop_layer();
}

fn draw_image(scene: &mut Scene, image: &ImageData, transform: Affine) {
    let brush = ImageBrush {
        image,
        sampler: ImageSampler::default(),
    };
    scene.draw_image(brush, transform);
}

fn outline_hotspot(scene: &mut Scene, hotspot: &Hotspot, transform: Affine) {
    let r = hotspot.rect;
    scene.stroke(
        &Stroke::new(PLACEHOLDER_STROKE),
        transform,
        PLACEHOLDER_HOTSPOT,
        None,
        &Rect::new(r.x0, r.y0, r.x1, r.y1),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hd() -> CanvasConfig {
        CanvasConfig {
            width: 1920.0,
            height: 1080.0,
        }
    }

    #[test]
    fn exact_fit_is_identity() {
        let fit = CanvasFit::new(hd(), 1920.0, 1080.0);
        assert!((fit.scale - 1.0).abs() < f64::EPSILON);
        assert_eq!(fit.to_canvas(50.0, 950.0), Some(kurbo::Point::new(50.0, 950.0)));
    }

    #[test]
    fn wider_window_letterboxes_horizontally() {
        // 2560x1080: scale 1, 320px bars left and right.
        let fit = CanvasFit::new(hd(), 2560.0, 1080.0);
        assert!((fit.offset_x - 320.0).abs() < f64::EPSILON);
        assert!(fit.offset_y.abs() < f64::EPSILON);
        assert_eq!(fit.to_canvas(100.0, 500.0), None);
        assert_eq!(fit.to_canvas(320.0, 0.0), Some(kurbo::Point::new(0.0, 0.0)));
    }

    #[test]
    fn retina_window_scales_down_pointer() {
        let fit = CanvasFit::new(hd(), 3840.0, 2160.0);
        assert!((fit.scale - 2.0).abs() < f64::EPSILON);
        assert_eq!(fit.to_canvas(100.0, 1900.0), Some(kurbo::Point::new(50.0, 950.0)));
    }

    #[test]
    fn right_and_bottom_edges_are_outside() {
        let fit = CanvasFit::new(hd(), 1920.0, 1080.0);
        assert_eq!(fit.to_canvas(1920.0, 10.0), None);
        assert_eq!(fit.to_canvas(10.0, 1080.0), None);
    }
}
