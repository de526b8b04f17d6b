//! Canvas 2D backend

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{CanvasPattern, CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use super::{Canvas, PatternTile, TextStyle};
use crate::sim::Rect;

/// A `CanvasRenderingContext2d` plus the mosaic image
pub struct Canvas2d {
    ctx: CanvasRenderingContext2d,
    image: HtmlImageElement,
}

impl Canvas2d {
    /// Get the 2D context of `canvas`
    pub fn new(canvas: &HtmlCanvasElement, image: HtmlImageElement) -> Option<Self> {
        let ctx: CanvasRenderingContext2d = canvas.get_context("2d").ok()??.dyn_into().ok()?;
        ctx.set_image_smoothing_enabled(false);
        Some(Self { ctx, image })
    }

    /// Reapply context state lost when the canvas is resized
    pub fn on_resize(&self) {
        self.ctx.set_image_smoothing_enabled(false);
    }
}

impl Canvas for Canvas2d {
    type Pattern = CanvasPattern;

    fn clear(&mut self, width: f32, height: f32) {
        self.ctx.set_global_alpha(1.0);
        self.ctx.clear_rect(0.0, 0.0, width as f64, height as f64);
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.ctx.set_global_alpha(alpha as f64);
    }

    fn fill_rect(&mut self, rect: Rect, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx
            .fill_rect(rect.x as f64, rect.y as f64, rect.w as f64, rect.h as f64);
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: &str) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.ctx.set_fill_style_str(color);
        self.ctx.begin_path();
        self.ctx.move_to(first.x as f64, first.y as f64);
        for p in rest {
            self.ctx.line_to(p.x as f64, p.y as f64);
        }
        self.ctx.close_path();
        self.ctx.fill();
    }

    fn fill_text(&mut self, text: &str, pos: Vec2, style: &TextStyle, color: &str) {
        self.ctx.set_font(&style.font());
        self.ctx.set_text_align(style.align.as_str());
        self.ctx.set_text_baseline(style.baseline.as_str());
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_text(text, pos.x as f64, pos.y as f64).ok();
    }

    fn draw_image(&mut self, src: Rect, dst: Rect) {
        self.ctx
            .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                &self.image,
                src.x as f64,
                src.y as f64,
                src.w as f64,
                src.h as f64,
                dst.x as f64,
                dst.y as f64,
                dst.w as f64,
                dst.h as f64,
            )
            .ok();
    }

    fn create_pattern(&mut self, tile: &PatternTile) -> Option<CanvasPattern> {
        let document = web_sys::window()?.document()?;
        let surface: HtmlCanvasElement = document.create_element("canvas").ok()?.dyn_into().ok()?;
        surface.set_width(tile.width);
        surface.set_height(tile.height);
        let tile_ctx: CanvasRenderingContext2d =
            surface.get_context("2d").ok()??.dyn_into().ok()?;
        tile_ctx.set_fill_style_str(tile.color);
        tile_ctx.fill_rect(
            tile.paint.x as f64,
            tile.paint.y as f64,
            tile.paint.w as f64,
            tile.paint.h as f64,
        );
        self.ctx
            .create_pattern_with_html_canvas_element(&surface, "repeat")
            .ok()?
    }

    fn fill_pattern(&mut self, pattern: &CanvasPattern, rect: Rect) {
        self.ctx.set_fill_style_canvas_pattern(pattern);
        self.ctx
            .fill_rect(rect.x as f64, rect.y as f64, rect.w as f64, rect.h as f64);
    }
}
