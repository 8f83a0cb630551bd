// canvas.rs - Surface over a 2D canvas context
//
// Each primitive runs inside save/restore so alpha, glow and paint never
// leak from one primitive into the next.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasGradient, CanvasRenderingContext2d, HtmlCanvasElement};

use crate::error::EngineError;
use crate::render::{LineCap, Paint, Path, PathOp, Stroke, Style, Surface};

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

fn js_err(op: &'static str) -> impl Fn(JsValue) -> EngineError {
    move |err| EngineError::surface(op, format!("{err:?}"))
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, EngineError> {
        let ctx = canvas
            .get_context("2d")
            .map_err(js_err("get_context"))?
            .ok_or_else(|| EngineError::surface("get_context", "2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| EngineError::surface("get_context", "not a 2d context"))?;
        Ok(Self { canvas, ctx })
    }

    fn gradient(&self, paint: &Paint) -> Result<Option<CanvasGradient>, EngineError> {
        let (grad, stops) = match paint {
            Paint::Solid(_) => return Ok(None),
            Paint::Linear { from, to, stops } => (
                self.ctx.create_linear_gradient(from.x as f64, from.y as f64, to.x as f64, to.y as f64),
                stops,
            ),
            Paint::Radial { inner, inner_r, outer, outer_r, stops } => (
                self.ctx
                    .create_radial_gradient(
                        inner.x as f64,
                        inner.y as f64,
                        *inner_r as f64,
                        outer.x as f64,
                        outer.y as f64,
                        *outer_r as f64,
                    )
                    .map_err(js_err("create_radial_gradient"))?,
                stops,
            ),
        };
        for stop in stops {
            grad.add_color_stop(stop.offset, &stop.color.to_css())
                .map_err(js_err("add_color_stop"))?;
        }
        Ok(Some(grad))
    }

    /// Save state and apply alpha and glow.
    fn begin(&self, style: &Style) {
        self.ctx.save();
        self.ctx.set_global_alpha(style.alpha as f64);
        if let Some(glow) = style.glow {
            self.ctx.set_shadow_color(&glow.color.to_css());
            self.ctx.set_shadow_blur(glow.blur as f64);
        }
    }

    fn set_fill(&self, paint: &Paint) -> Result<(), EngineError> {
        match (paint, self.gradient(paint)?) {
            (Paint::Solid(c), _) => self.ctx.set_fill_style_str(&c.to_css()),
            (_, Some(grad)) => self.ctx.set_fill_style_canvas_gradient(&grad),
            (_, None) => {}
        }
        Ok(())
    }

    fn set_stroke(&self, paint: &Paint) -> Result<(), EngineError> {
        match (paint, self.gradient(paint)?) {
            (Paint::Solid(c), _) => self.ctx.set_stroke_style_str(&c.to_css()),
            (_, Some(grad)) => self.ctx.set_stroke_style_canvas_gradient(&grad),
            (_, None) => {}
        }
        Ok(())
    }

    fn trace(&self, path: &Path) -> Result<(), EngineError> {
        self.ctx.begin_path();
        for op in path.ops() {
            match *op {
                PathOp::MoveTo(p) => self.ctx.move_to(p.x as f64, p.y as f64),
                PathOp::LineTo(p) => self.ctx.line_to(p.x as f64, p.y as f64),
                PathOp::QuadTo { ctrl, to } => {
                    self.ctx.quadratic_curve_to(ctrl.x as f64, ctrl.y as f64, to.x as f64, to.y as f64)
                }
                PathOp::Ellipse { center, rx, ry, start, end } => self
                    .ctx
                    .ellipse(center.x as f64, center.y as f64, rx as f64, ry as f64, 0.0, start as f64, end as f64)
                    .map_err(js_err("ellipse"))?,
                PathOp::Close => self.ctx.close_path(),
            }
        }
        Ok(())
    }

    /// Run `draw` between save and restore; restore even when it fails.
    fn scoped(&self, style: &Style, draw: impl FnOnce() -> Result<(), EngineError>) -> Result<(), EngineError> {
        self.begin(style);
        let result = draw();
        self.ctx.restore();
        result
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn resize(&mut self, w: u32, h: u32) -> Result<(), EngineError> {
        self.canvas.set_width(w);
        self.canvas.set_height(h);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), EngineError> {
        let (w, h) = self.size();
        self.ctx.clear_rect(0.0, 0.0, w as f64, h as f64);
        Ok(())
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, style: &Style) -> Result<(), EngineError> {
        self.scoped(style, || {
            self.set_fill(&style.paint)?;
            self.ctx.fill_rect(x as f64, y as f64, w as f64, h as f64);
            Ok(())
        })
    }

    fn fill_path(&mut self, path: &Path, style: &Style) -> Result<(), EngineError> {
        self.scoped(style, || {
            self.set_fill(&style.paint)?;
            self.trace(path)?;
            self.ctx.fill();
            Ok(())
        })
    }

    fn stroke_path(&mut self, path: &Path, style: &Style, stroke: Stroke) -> Result<(), EngineError> {
        self.scoped(style, || {
            self.set_stroke(&style.paint)?;
            self.ctx.set_line_width(stroke.width as f64);
            self.ctx.set_line_cap(match stroke.cap {
                LineCap::Butt => "butt",
                LineCap::Round => "round",
            });
            self.trace(path)?;
            self.ctx.stroke();
            Ok(())
        })
    }
}
