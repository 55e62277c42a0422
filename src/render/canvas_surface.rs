use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::error::PuzzleError;
use crate::geometry::{Point, Rect};
use crate::surface::{Color, Font, Surface};

fn js_error(value: JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{:?}", value))
}

/// HTML canvas with its 2D context.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn from_element_id(id: &str) -> Result<Self, PuzzleError> {
        let window = web_sys::window()
            .ok_or_else(|| PuzzleError::SurfaceUnavailable("No global window exists".into()))?;
        let document = window
            .document()
            .ok_or_else(|| PuzzleError::SurfaceUnavailable("Window should have a document".into()))?;

        let canvas = document
            .get_element_by_id(id)
            .ok_or_else(|| PuzzleError::SurfaceUnavailable(format!("Cannot find element with id '{}'", id)))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| PuzzleError::SurfaceUnavailable(format!("Element '{}' is not a canvas", id)))?;

        Self::new(canvas)
    }

    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, PuzzleError> {
        let context = canvas
            .get_context("2d")
            .map_err(|e| PuzzleError::SurfaceUnavailable(js_error(e)))?
            .ok_or_else(|| PuzzleError::SurfaceUnavailable("Cannot get 2D context from canvas".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| PuzzleError::SurfaceUnavailable("Unable to get canvas context".into()))?;

        Ok(Self { canvas, context })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Bounding rectangle in client coordinates.
    pub fn bounds(&self) -> Rect {
        let rect = self.canvas.get_bounding_client_rect();

        Rect::new(rect.left(), rect.top(), rect.width(), rect.height())
    }

    fn tile_path(&self, rect: Rect, radius: f64) -> Result<(), String> {
        let Rect {
            x,
            y,
            width,
            height,
        } = rect;
        let ctx = &self.context;

        ctx.begin_path();
        ctx.move_to(x + radius, y);
        ctx.arc_to(x + width, y, x + width, y + height, radius).map_err(js_error)?;
        ctx.arc_to(x + width, y + height, x, y + height, radius).map_err(js_error)?;
        ctx.arc_to(x, y + height, x, y, radius).map_err(js_error)?;
        ctx.arc_to(x, y, x + width, y, radius).map_err(js_error)?;
        ctx.close_path();

        Ok(())
    }
}

impl Surface for CanvasSurface {
    type Image = HtmlImageElement;
    type Error = String;

    fn set_size(&mut self, width: u32, height: u32) -> Result<(), Self::Error> {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        Ok(())
    }

    fn size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn clear_rect(&mut self, rect: Rect) -> Result<(), Self::Error> {
        self.context.clear_rect(rect.x, rect.y, rect.width, rect.height);
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, radius: f64, color: Color) -> Result<(), Self::Error> {
        self.tile_path(rect, radius)?;
        self.context.set_fill_style(&color.css().into());
        self.context.fill();
        Ok(())
    }

    fn stroke_rect(
        &mut self,
        rect: Rect,
        radius: f64,
        line_width: f64,
        color: Color,
    ) -> Result<(), Self::Error> {
        self.tile_path(rect, radius)?;
        self.context.set_stroke_style(&color.css().into());
        self.context.set_line_width(line_width);
        self.context.stroke();
        Ok(())
    }

    fn draw_image(&mut self, image: &HtmlImageElement, src: Rect, dest: Rect) -> Result<(), Self::Error> {
        self.context
            .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                image,
                src.x,
                src.y,
                src.width,
                src.height,
                dest.x,
                dest.y,
                dest.width,
                dest.height,
            )
            .map_err(js_error)
    }

    fn fill_text(
        &mut self,
        text: &str,
        center: Point,
        font: Font,
        color: Color,
    ) -> Result<(), Self::Error> {
        let ctx = &self.context;

        ctx.set_fill_style(&color.css().into());
        ctx.set_text_baseline("middle");
        ctx.set_text_align("center");
        ctx.set_font(&font.css());
        ctx.fill_text(text, center.x, center.y).map_err(js_error)
    }
}
