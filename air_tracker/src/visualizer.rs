//! Software-rendered output window using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  [annotation surface when shown: widget row, strokes, cursor]   │
//! │                                                                 │
//! │                                                                 │
//! │  status bar                                                     │
//! │  key legend                                                     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! In simulation mode `poll_input` doubles as the hand: keyboard keys
//! stand in for finger poses and the mouse cursor for the index
//! fingertip. In camera mode the sim channel has no receiver and every
//! send is a no-op.

use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use std::sync::mpsc::Sender;

use hand_gesture::{FingerState, Point};
use overlay_canvas::{Stroke, WidgetAction, NEON_GREEN, SURFACE_BG};

use crate::app::{AppConfig, AppState};
use crate::error::Error;
use crate::landmark::SimInput;

// ════════════════════════════════════════════════════════════════════════════
// Palette
// ════════════════════════════════════════════════════════════════════════════

const BG_COLOR:     u32 = 0xFF1C1C24;
const STATUS_H:     usize = 44;
const TEXT_BG:      u32 = 0xFF10304A;
const TEXT_COLOR:   u32 = 0xFFEEEEEE;
const LEGEND_COLOR: u32 = 0xFF888888;
const WIDGET_EDGE:  u32 = 0xFF202020;
const CURSOR_RING:  u32 = 0xFFFFFFFF;

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window: Window,
    buf:    Vec<u32>,
    width:  usize,
    height: usize,
    sim_tx: Sender<SimInput>,
}

impl Visualizer {
    pub fn new(sim_tx: Sender<SimInput>, cfg: &AppConfig) -> Result<Self, Error> {
        let mut window = Window::new(
            "Air Tracker - Gesture Deck Control",
            cfg.width,
            cfg.height,
            WindowOptions { resize: false, ..WindowOptions::default() },
        )
        .map_err(|e| Error::Window(e.to_string()))?;

        window.limit_update_rate(Some(cfg.frame_interval));

        Ok(Visualizer {
            window,
            buf: vec![BG_COLOR; cfg.width * cfg.height],
            width: cfg.width,
            height: cfg.height,
            sim_tx,
        })
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// Poll window input and emit exactly one `SimInput` per tick.
    /// Returns false when the window should close immediately.
    pub fn poll_input(&mut self) -> bool {
        if !self.window.is_open() {
            return false;
        }
        if self.window.is_key_pressed(Key::Escape, KeyRepeat::No) {
            return false;
        }

        let tip = self.mouse_tip();
        let one_shot = |w: &Window, k: Key| w.is_key_pressed(k, KeyRepeat::No);

        //  key        pose             meaning
        //  P          (1,1,0,0,0)      toggle playback
        //  Left       (1,0,0,0,0)      previous slide
        //  Right      (0,0,0,0,1)      next slide
        //  Z          (0,1,1,1,0)      zoom in
        //  X          (0,1,1,1,1)      zoom out
        //  Enter      (0,0,1,1,1)      press enter
        //  C          (0,1,0,0,1)      toggle canvas
        //  Q          (1,0,0,0,1)      close host and quit
        //  D / mouse  (0,1,0,0,0)      draw (held)
        //  H          (0,1,1,0,0)      hover pointer (held)
        let pose_keys: [(Key, [bool; 5]); 8] = [
            (Key::P,     [true, true, false, false, false]),
            (Key::Left,  [true, false, false, false, false]),
            (Key::Right, [false, false, false, false, true]),
            (Key::Z,     [false, true, true, true, false]),
            (Key::X,     [false, true, true, true, true]),
            (Key::Enter, [false, false, true, true, true]),
            (Key::C,     [false, true, false, false, true]),
            (Key::Q,     [true, false, false, false, true]),
        ];

        for (key, bits) in pose_keys {
            if one_shot(&self.window, key) {
                self.send_pose(bits, tip, false);
                return true;
            }
        }

        // Held poses: drawing and hovering persist across frames.
        let mouse_draw = self.window.get_mouse_down(MouseButton::Left);
        if mouse_draw || self.window.is_key_down(Key::D) {
            // The mouse button stands in for a closed pinch so the
            // distance backend recognises it too.
            self.send_pose([false, true, false, false, false], tip, mouse_draw);
        } else if self.window.is_key_down(Key::H) {
            self.send_pose([false, true, true, false, false], tip, false);
        } else {
            let _ = self.sim_tx.send(SimInput::NoHand);
        }
        true
    }

    fn send_pose(&self, bits: [bool; 5], tip: Point, pinch: bool) {
        let fingers = FingerState::new(bits[0], bits[1], bits[2], bits[3], bits[4]);
        // Camera mode drops the receiver; sends become no-ops.
        let _ = self.sim_tx.send(SimInput::Pose { fingers, tip, pinch });
    }

    /// Mouse position in normalized frame coordinates.
    fn mouse_tip(&self) -> Point {
        let (mx, my) = self.window.get_mouse_pos(MouseMode::Clamp).unwrap_or((0.0, 0.0));
        Point::new(mx / self.width as f32, my / self.height as f32)
    }

    // ── rendering ─────────────────────────────────────────────────────────

    pub fn render(&mut self, app: &AppState) -> Result<(), Error> {
        self.buf.fill(BG_COLOR);

        if app.surface().is_visible() {
            self.draw_surface(app);
        }

        // ── Status bar ────────────────────────────────────────────────────
        let status_y = self.height - STATUS_H;
        self.fill_rect(0, status_y, self.width, STATUS_H, TEXT_BG);
        self.draw_label(&app.status, 10, status_y + 8, 2, TEXT_COLOR);
        let play = if app.is_playing() { "PLAYING" } else { "STOPPED" };
        self.draw_label(play, self.width.saturating_sub(100), status_y + 8, 2, NEON_GREEN | 0xFF000000);
        self.draw_label(
            "P=PLAY L/R=SLIDE Z/X=ZOOM C=CANVAS D/MOUSE=DRAW H=HOVER Q=QUIT",
            10,
            self.height - 14,
            1,
            LEGEND_COLOR,
        );

        self.window
            .update_with_buffer(&self.buf, self.width, self.height)
            .map_err(|e| Error::Window(e.to_string()))
    }

    fn draw_surface(&mut self, app: &AppState) {
        let surface = app.surface();
        let dx = surface.offset();

        // Surface backdrop, shifted by the re-show offset.
        self.fill_rect(
            dx as usize,
            0,
            self.width.saturating_sub(dx as usize),
            self.height - STATUS_H,
            0xFF000000 | SURFACE_BG,
        );

        // ── Widget row ────────────────────────────────────────────────────
        for widget in surface.widgets() {
            let x = (widget.rect.left + dx) as usize;
            let y = widget.rect.top as usize;
            let w = widget.rect.width() as usize;
            let h = widget.rect.height() as usize;
            match widget.action {
                WidgetAction::SelectColor(c) => {
                    self.fill_rect(x, y, w, h, 0xFF000000 | c);
                }
                WidgetAction::SelectTool(tool) => {
                    self.fill_rect(x, y, w, h, 0xFFD8D8D8);
                    let selected = tool == surface.tool_state().tool;
                    let tc = if selected { 0xFFB00000 } else { 0xFF303030 };
                    self.draw_label(&widget.label, x + 6, y + h / 2 - 5, 2, tc);
                }
            }
            self.draw_border(x, y, w, h, WIDGET_EDGE);
        }

        // ── Strokes ───────────────────────────────────────────────────────
        for stroke in surface.strokes() {
            self.draw_stroke(stroke, dx);
        }
        if let Some(active) = surface.active_stroke() {
            self.draw_stroke(active, dx);
        }

        // ── Cursor ────────────────────────────────────────────────────────
        if let Some(pos) = surface.cursor() {
            let color = 0xFF000000 | surface.tool_state().color;
            self.fill_circle(pos.x + dx, pos.y, 6.0, color);
            self.circle_outline(pos.x + dx, pos.y, 8.0, CURSOR_RING);
        }
    }

    fn draw_stroke(&mut self, stroke: &Stroke, dx: f32) {
        let color = 0xFF000000 | stroke.color;
        let radius = stroke.width / 2.0;
        if stroke.points.len() == 1 {
            let p = stroke.points[0];
            self.fill_circle(p.x + dx, p.y, radius, color);
            return;
        }
        for (a, b) in stroke.segments() {
            self.stamp_line(a.x + dx, a.y, b.x + dx, b.y, radius, color);
        }
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < self.width && y < self.height {
            self.buf[y * self.width + x] = color;
        }
    }

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y + h).min(self.height) {
            for col in x..(x + w).min(self.width) {
                self.buf[row * self.width + col] = color;
            }
        }
    }

    fn draw_border(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for col in x..(x + w).min(self.width) {
            self.set_pixel(col, y, color);
            self.set_pixel(col, y + h - 1, color);
        }
        for row in y..(y + h).min(self.height) {
            self.set_pixel(x, row, color);
            self.set_pixel(x + w - 1, row, color);
        }
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, r: f32, color: u32) {
        let r2 = r * r;
        let x0 = (cx - r).max(0.0) as usize;
        let x1 = (cx + r).min(self.width as f32 - 1.0) as usize;
        let y0 = (cy - r).max(0.0) as usize;
        let y1 = (cy + r).min(self.height as f32 - 1.0) as usize;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let ddx = x as f32 - cx;
                let ddy = y as f32 - cy;
                if ddx * ddx + ddy * ddy <= r2 {
                    self.set_pixel(x, y, color);
                }
            }
        }
    }

    fn circle_outline(&mut self, cx: f32, cy: f32, r: f32, color: u32) {
        let steps = (r * 8.0).max(16.0) as usize;
        for i in 0..steps {
            let angle = i as f32 / steps as f32 * std::f32::consts::TAU;
            let x = cx + r * angle.cos();
            let y = cy + r * angle.sin();
            if x >= 0.0 && y >= 0.0 {
                self.set_pixel(x as usize, y as usize, color);
            }
        }
    }

    /// Stamp discs along the segment so thick strokes have round joints.
    fn stamp_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, radius: f32, color: u32) {
        let dx = x1 - x0;
        let dy = y1 - y0;
        let len = (dx * dx + dy * dy).sqrt();
        let steps = (len / (radius.max(1.0) * 0.5)).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            self.fill_circle(x0 + dx * t, y0 + dy * t, radius.max(1.0), color);
        }
    }

    /// Minimal bitmap font — 3×5 glyphs scaled up for labels.
    fn draw_label(&mut self, text: &str, x: usize, y: usize, scale: usize, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        self.fill_rect(cx + col * scale, y + row * scale, scale, scale, color);
                    }
                }
            }
            cx += 4 * scale;
            if cx + 4 * scale > self.width {
                break;
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c.to_ascii_uppercase() {
        '0' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000],
    }
}
