//! Canvas 2D renderer
//!
//! Sprites are emoji drawn with `fillText`, sized to their collision boxes.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::sim::GamePhase;
use crate::snapshot::Snapshot;

const TURTLE_GLYPH: &str = "\u{1F422}";
const HUD_FONT: &str = "600 20px sans-serif";
const OVERLAY_FILL: &str = "rgba(0, 0, 0, 0.7)";

pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    /// CSS pixel size of the drawing area
    size: (f32, f32),
    dpr: f64,
}

impl CanvasRenderer {
    pub fn new(canvas: HtmlCanvasElement, dpr: f64) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self {
            canvas,
            ctx,
            size: (0.0, 0.0),
            dpr,
        })
    }

    /// Match the backing store to a new CSS size
    pub fn resize(&mut self, width: f32, height: f32) -> Result<(), JsValue> {
        self.size = (width, height);
        self.canvas.set_width((width as f64 * self.dpr) as u32);
        self.canvas.set_height((height as f64 * self.dpr) as u32);
        // Resizing the canvas resets the transform
        self.ctx.scale(self.dpr, self.dpr)
    }

    pub fn render(&self, snapshot: &Snapshot) -> Result<(), JsValue> {
        let (width, height) = (self.size.0 as f64, self.size.1 as f64);
        let ctx = &self.ctx;
        ctx.clear_rect(0.0, 0.0, width, height);

        ctx.set_text_baseline("top");
        ctx.set_text_align("left");

        for obstacle in &snapshot.obstacles {
            ctx.set_font(&format!("{}px serif", obstacle.size));
            ctx.fill_text(
                obstacle.kind.glyph(),
                obstacle.pos.x as f64,
                obstacle.pos.y as f64,
            )?;
        }

        let player = &snapshot.player;
        ctx.set_font(&format!("{}px serif", player.size));
        ctx.fill_text(TURTLE_GLYPH, player.pos.x as f64, player.pos.y as f64)?;

        ctx.set_font(HUD_FONT);
        ctx.set_fill_style_str("black");
        ctx.fill_text(&format!("Score: {}", snapshot.score), 16.0, 16.0)?;

        if snapshot.phase == GamePhase::GameOver {
            self.draw_game_over(snapshot.score, width, height)?;
        }
        Ok(())
    }

    fn draw_game_over(&self, score: u32, width: f64, height: f64) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        ctx.set_fill_style_str(OVERLAY_FILL);
        ctx.fill_rect(0.0, 0.0, width, height);

        ctx.set_fill_style_str("white");
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        let cx = width / 2.0;
        let cy = height / 2.0;

        ctx.set_font("bold 40px sans-serif");
        ctx.fill_text("\u{1F480} Game Over!", cx, cy - 40.0)?;
        ctx.set_font("24px sans-serif");
        ctx.fill_text(&format!("Final Score: {}", score), cx, cy + 10.0)?;
        ctx.set_font("18px sans-serif");
        ctx.fill_text("Press Enter to restart", cx, cy + 50.0)?;
        Ok(())
    }
}
