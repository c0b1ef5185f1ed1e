//! # overlay_canvas
//!
//! State engine for the annotation overlay: a surface that can be shown
//! and hidden by gesture, accumulates freehand [`Stroke`]s while the
//! draw pose is held, and carries a row of [`ControlWidget`]s (color
//! palette + tool buttons) that the pointer can activate instead of
//! drawing.
//!
//! The engine owns no window and draws no pixels — a renderer walks the
//! stroke list and widget rectangles each frame. Strokes are ephemeral:
//! hiding the surface discards them.
//!
//! ## Surface lifecycle
//!
//! ```text
//! Hidden ──show──▶ Visible(idle) ──draw pose──▶ Visible(drawing)
//!    ▲                    ▲                            │
//!    └───────hide─────────┴──────any other pose────────┘
//! ```
//!
//! Each re-show nudges the surface origin right by a fixed step so a
//! stale window position is never perfectly covered by the fresh one,
//! wrapping back to the base once the offset passes a bound.

use hand_gesture::Point;

// ════════════════════════════════════════════════════════════════════════════
// Colors
// ════════════════════════════════════════════════════════════════════════════

/// Packed `0x00RRGGBB`, the framebuffer pixel format.
pub type Color = u32;

pub const BLACK:      Color = 0x00_00_00_00;
pub const RED:        Color = 0x00_FF_00_00;
pub const BLUE:       Color = 0x00_00_00_FF;
pub const GREEN:      Color = 0x00_00_80_00;
pub const YELLOW:     Color = 0x00_FF_FF_00;
pub const ORANGE:     Color = 0x00_FF_A5_00;
pub const PURPLE:     Color = 0x00_80_00_80;
pub const PINK:       Color = 0x00_FF_C0_CB;
/// Highlighter ink.
pub const NEON_GREEN: Color = 0x00_39_FF_14;
/// Surface background; also what the eraser paints with.
pub const SURFACE_BG: Color = 0x00_80_80_80;

/// The palette offered as color widgets, in widget order.
pub const PALETTE: [(Color, &str); 8] = [
    (BLACK,  "BLACK"),
    (RED,    "RED"),
    (BLUE,   "BLUE"),
    (GREEN,  "GREEN"),
    (YELLOW, "YELLOW"),
    (ORANGE, "ORANGE"),
    (PURPLE, "PURPLE"),
    (PINK,   "PINK"),
];

// ════════════════════════════════════════════════════════════════════════════
// Rect
// ════════════════════════════════════════════════════════════════════════════

/// Axis-aligned rectangle in surface pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub left:   f32,
    pub top:    f32,
    pub right:  f32,
    pub bottom: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Rect { left, top, right, bottom }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x < self.right && p.y >= self.top && p.y < self.bottom
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tools / strokes
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tool {
    Pen,
    Highlighter,
    Eraser,
}

impl Tool {
    /// Stroke width in pixels.
    pub fn stroke_width(&self) -> f32 {
        match self {
            Tool::Pen         => 3.0,
            Tool::Highlighter => 10.0,
            Tool::Eraser      => 20.0,
        }
    }

    /// The ink each tool starts with when selected. The eraser "draws"
    /// in the surface background color.
    pub fn default_color(&self) -> Color {
        match self {
            Tool::Pen         => BLACK,
            Tool::Highlighter => NEON_GREEN,
            Tool::Eraser      => SURFACE_BG,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tool::Pen         => "PEN",
            Tool::Highlighter => "HILITE",
            Tool::Eraser      => "ERASE",
        }
    }
}

/// Current tool and ink; read on every stroke segment, mutated only by
/// widget activation or explicit select calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ToolState {
    pub tool:  Tool,
    pub color: Color,
}

impl Default for ToolState {
    fn default() -> Self {
        ToolState { tool: Tool::Pen, color: BLACK }
    }
}

/// One freehand polyline with the color and width it was started with.
/// Immutable once the pointer lifts.
#[derive(Clone, Debug, PartialEq)]
pub struct Stroke {
    pub points: Vec<Point>,
    pub color:  Color,
    pub width:  f32,
}

impl Stroke {
    fn begin(at: Point, tools: ToolState) -> Self {
        Stroke { points: vec![at], color: tools.color, width: tools.tool.stroke_width() }
    }

    /// Successive point pairs, i.e. the drawable line segments.
    pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }

    pub fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Control widgets
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WidgetId(pub usize);

/// What activating a widget does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WidgetAction {
    SelectColor(Color),
    SelectTool(Tool),
}

/// A rectangular hit region on the surface. The `label` doubles as the
/// rendering fallback when a tool's icon asset is unavailable.
#[derive(Clone, Debug)]
pub struct ControlWidget {
    pub id:     WidgetId,
    pub rect:   Rect,
    pub action: WidgetAction,
    pub label:  String,
}

// ════════════════════════════════════════════════════════════════════════════
// Surface
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceMode {
    Hidden,
    /// Visible, drawing-inactive.
    Idle,
    /// Visible, a stroke is being extended.
    Drawing,
}

#[derive(Clone, Copy, Debug)]
pub struct SurfaceConfig {
    pub width:       f32,
    pub height:      f32,
    /// Horizontal nudge applied on each re-show.
    pub shift_step:  f32,
    /// Offset bound; exceeding it wraps the origin back to 0.
    pub shift_bound: f32,
}

impl SurfaceConfig {
    pub fn new(width: f32, height: f32) -> Self {
        SurfaceConfig { width, height, shift_step: 20.0, shift_bound: 100.0 }
    }
}

/// The drawing surface: visibility state machine, stroke accumulation,
/// and widget hit-testing. Single-owner, driven from the frame loop.
pub struct CanvasSurface {
    config:  SurfaceConfig,
    mode:    SurfaceMode,
    /// Horizontal origin offset, advanced on each show.
    offset:  f32,
    widgets: Vec<ControlWidget>,
    tools:   ToolState,
    strokes: Vec<Stroke>,
    active:  Option<Stroke>,
    /// Prior pointer position; `None` means the next draw frame starts a
    /// fresh stroke instead of joining an old segment.
    last_pos: Option<Point>,
    cursor:   Option<Point>,
}

impl CanvasSurface {
    pub fn new(config: SurfaceConfig) -> Self {
        let widgets = default_widgets(&config);
        CanvasSurface {
            config,
            mode: SurfaceMode::Hidden,
            offset: 0.0,
            widgets,
            tools: ToolState::default(),
            strokes: Vec::new(),
            active: None,
            last_pos: None,
            cursor: None,
        }
    }

    // ── accessors ────────────────────────────────────────────────────────

    pub fn mode(&self) -> SurfaceMode {
        self.mode
    }

    pub fn is_visible(&self) -> bool {
        self.mode != SurfaceMode::Hidden
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn active_stroke(&self) -> Option<&Stroke> {
        self.active.as_ref()
    }

    pub fn cursor(&self) -> Option<Point> {
        self.cursor
    }

    pub fn tool_state(&self) -> ToolState {
        self.tools
    }

    pub fn widgets(&self) -> &[ControlWidget] {
        &self.widgets
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    // ── visibility ───────────────────────────────────────────────────────

    /// Show the surface. Each show advances the origin offset by one
    /// step, wrapping to the base once past the bound.
    pub fn show(&mut self) {
        if self.is_visible() {
            return;
        }
        self.offset += self.config.shift_step;
        if self.offset > self.config.shift_bound {
            self.offset = 0.0;
        }
        self.mode = SurfaceMode::Idle;
    }

    /// Hide the surface. Strokes are ephemeral and are dropped here.
    pub fn hide(&mut self) {
        self.active = None;
        self.strokes.clear();
        self.last_pos = None;
        self.cursor = None;
        self.mode = SurfaceMode::Hidden;
    }

    /// Flip visibility; returns the new visibility.
    pub fn toggle(&mut self) -> bool {
        if self.is_visible() {
            self.hide();
        } else {
            self.show();
        }
        self.is_visible()
    }

    // ── pointer input ────────────────────────────────────────────────────

    /// Draw-pose frame at `pos`. Over a widget this fires exactly one
    /// activation and suppresses drawing; otherwise the first frame
    /// establishes the prior position and subsequent frames extend the
    /// active stroke.
    pub fn extend_stroke(&mut self, pos: Point) {
        if !self.is_visible() {
            return;
        }
        self.cursor = Some(pos);

        if let Some(id) = self.hit_test(pos) {
            self.finish_active();
            self.last_pos = None;
            self.activate(id);
            return;
        }

        match self.last_pos {
            None => {
                self.last_pos = Some(pos);
            }
            Some(prev) => {
                let stroke = self
                    .active
                    .get_or_insert_with(|| Stroke::begin(prev, self.tools));
                stroke.points.push(pos);
                self.last_pos = Some(pos);
                self.mode = SurfaceMode::Drawing;
            }
        }
    }

    /// Hover-pose frame: move the cursor, end any active stroke, and
    /// clear pointer continuity. Widgets still activate under the
    /// hovering pointer.
    pub fn move_cursor(&mut self, pos: Point) {
        if !self.is_visible() {
            return;
        }
        self.cursor = Some(pos);
        self.finish_active();
        self.last_pos = None;
        if let Some(id) = self.hit_test(pos) {
            self.activate(id);
        }
    }

    /// Finish the active stroke, if any.
    pub fn end_stroke(&mut self) {
        self.finish_active();
    }

    /// Pointer continuity lost (hand left the frame or the pose
    /// changed): the next draw frame must start a disconnected stroke.
    pub fn reset_pointer(&mut self) {
        self.finish_active();
        self.last_pos = None;
    }

    fn finish_active(&mut self) {
        if let Some(stroke) = self.active.take() {
            if stroke.segment_count() > 0 {
                self.strokes.push(stroke);
            }
        }
        if self.mode == SurfaceMode::Drawing {
            self.mode = SurfaceMode::Idle;
        }
    }

    // ── widgets / tools ──────────────────────────────────────────────────

    /// First widget containing `pos`, in stable insertion order.
    pub fn hit_test(&self, pos: Point) -> Option<WidgetId> {
        self.widgets
            .iter()
            .find(|w| w.rect.contains(pos))
            .map(|w| w.id)
    }

    pub fn activate(&mut self, id: WidgetId) {
        let action = match self.widgets.iter().find(|w| w.id == id) {
            Some(w) => w.action,
            None => return,
        };
        match action {
            WidgetAction::SelectColor(c) => self.set_color(c),
            WidgetAction::SelectTool(t)  => self.set_tool(t),
        }
    }

    /// Select a tool; the ink resets to the tool's default color.
    pub fn set_tool(&mut self, tool: Tool) {
        self.tools = ToolState { tool, color: tool.default_color() };
    }

    /// Select an ink color, keeping the current tool.
    pub fn set_color(&mut self, color: Color) {
        self.tools.color = color;
    }
}

/// Palette and tool buttons in one centered row along the top edge,
/// colors first, then pen/highlighter/eraser.
fn default_widgets(config: &SurfaceConfig) -> Vec<ControlWidget> {
    const BUTTON: f32 = 70.0;
    const PAD:    f32 = 5.0;
    const TOP:    f32 = 10.0;

    let tools = [Tool::Pen, Tool::Highlighter, Tool::Eraser];
    let count = PALETTE.len() + tools.len();
    let total = count as f32 * (BUTTON + PAD) - PAD;
    let mut x = (config.width - total) / 2.0;

    let mut widgets = Vec::with_capacity(count);
    let mut next_id = 0usize;
    let mut push = |widgets: &mut Vec<ControlWidget>, x: f32, action, label: &str| {
        widgets.push(ControlWidget {
            id: WidgetId(next_id),
            rect: Rect::new(x, TOP, x + BUTTON, TOP + BUTTON),
            action,
            label: label.to_string(),
        });
        next_id += 1;
    };

    for (color, name) in PALETTE {
        push(&mut widgets, x, WidgetAction::SelectColor(color), name);
        x += BUTTON + PAD;
    }
    for tool in tools {
        push(&mut widgets, x, WidgetAction::SelectTool(tool), tool.label());
        x += BUTTON + PAD;
    }
    widgets
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
