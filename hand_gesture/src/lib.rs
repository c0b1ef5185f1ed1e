//! # hand_gesture
//!
//! Turns noisy per-frame hand detections into discrete presentation
//! commands: a pure classifier over finger-extension state, plus a
//! per-gesture-class cooldown gate that stops a held pose from flooding
//! the dispatcher.
//!
//! ## Finger pattern → Gesture
//!
//! Patterns are (thumb, index, middle, ring, pinky), 1 = extended.
//!
//! | Pattern | Gesture |
//! |---|---|
//! | 1,1,0,0,0 | TogglePlayback |
//! | 0,1,0,0,1 | ToggleCanvas |
//! | 0,1,0,0,0 | DrawPointer |
//! | 0,1,1,0,0 | HoverPointer |
//! | 0,0,1,1,1 | Enter |
//! | 1,0,0,0,0 | SlideBackward |
//! | 0,0,0,0,1 | SlideForward |
//! | 0,1,1,1,0 | ZoomIn |
//! | 0,1,1,1,1 | ZoomOut |
//! | 1,0,0,0,1 | CloseApplication |
//! | anything else | (none) |
//!
//! A second recognition strategy, [`PinchClassifier`], works from raw
//! landmark geometry instead of the pattern table: thumb tip and index
//! tip closer than a normalized threshold is a pinch-draw. The two
//! strategies are alternative [`Classifier`] backends and are never
//! merged.
//!
//! ## Cooldown gating
//!
//! Each one-shot gesture belongs to a [`GestureClass`]; the
//! [`CooldownGate`] arms a per-class deadline on trigger and refuses
//! re-triggers until it passes. Pointer gestures (draw/hover) are
//! continuous tracking states and carry no class — they are evaluated
//! every frame.

use std::fmt;
use std::time::{Duration, Instant};

// ════════════════════════════════════════════════════════════════════════════
// FingerState
// ════════════════════════════════════════════════════════════════════════════

/// Per-finger extension state, ordered thumb → pinky. `true` = extended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FingerState(pub [bool; 5]);

impl FingerState {
    /// All fingers curled (a fist).
    pub const FIST: FingerState = FingerState([false; 5]);

    pub fn new(thumb: bool, index: bool, middle: bool, ring: bool, pinky: bool) -> Self {
        FingerState([thumb, index, middle, ring, pinky])
    }

    /// Build from the low 5 bits of `bits`; bit 0 = thumb, bit 4 = pinky.
    pub fn from_bits(bits: u8) -> Self {
        let mut f = [false; 5];
        for (i, slot) in f.iter_mut().enumerate() {
            *slot = bits & (1 << i) != 0;
        }
        FingerState(f)
    }

    pub fn thumb(&self)  -> bool { self.0[0] }
    pub fn index(&self)  -> bool { self.0[1] }
    pub fn middle(&self) -> bool { self.0[2] }
    pub fn ring(&self)   -> bool { self.0[3] }
    pub fn pinky(&self)  -> bool { self.0[4] }

    /// Number of extended fingers.
    pub fn extended_count(&self) -> usize {
        self.0.iter().filter(|&&f| f).count()
    }
}

impl fmt::Display for FingerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = |b: bool| if b { '1' } else { '0' };
        write!(
            f,
            "({},{},{},{},{})",
            d(self.0[0]), d(self.0[1]), d(self.0[2]), d(self.0[3]), d(self.0[4])
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Point / HandFrame
// ════════════════════════════════════════════════════════════════════════════

/// A 2-D point. Landmarks use normalized frame coordinates (0..1);
/// surface-space points use pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Landmark index of the thumb tip (MediaPipe hand numbering).
pub const THUMB_TIP: usize = 4;
/// Landmark index of the index-finger tip.
pub const INDEX_TIP: usize = 8;

/// One frame's detection result for a single tracked hand: the
/// finger-extension vector plus key landmark positions in normalized
/// frame coordinates. Absence of a hand is represented by the caller
/// holding no `HandFrame` at all, never by a dummy value.
#[derive(Clone, Debug, PartialEq)]
pub struct HandFrame {
    pub fingers:   FingerState,
    pub landmarks: Vec<Point>,
}

impl HandFrame {
    pub fn new(fingers: FingerState, landmarks: Vec<Point>) -> Self {
        HandFrame { fingers, landmarks }
    }

    /// Synthesize a frame from explicit thumb/index tip positions.
    /// Used by simulation sources and tests; intermediate landmarks are
    /// filled with the index tip.
    pub fn from_tips(fingers: FingerState, thumb: Point, index: Point) -> Self {
        let mut landmarks = vec![index; INDEX_TIP + 1];
        landmarks[THUMB_TIP] = thumb;
        HandFrame { fingers, landmarks }
    }

    /// Synthesize a frame where only the index tip matters. The thumb is
    /// placed well away from it so a pinch backend never misfires.
    pub fn from_tip(fingers: FingerState, tip: Point) -> Self {
        let thumb = Point::new((tip.x - 0.2).max(0.0), tip.y);
        Self::from_tips(fingers, thumb, tip)
    }

    pub fn thumb_tip(&self) -> Option<Point> {
        self.landmarks.get(THUMB_TIP).copied()
    }

    pub fn index_tip(&self) -> Option<Point> {
        self.landmarks.get(INDEX_TIP).copied()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Gesture / GestureClass
// ════════════════════════════════════════════════════════════════════════════

/// A recognized gesture. At most one per frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gesture {
    /// Play/pause embedded media on the current slide.
    TogglePlayback,
    /// Show or hide the annotation canvas.
    ToggleCanvas,
    /// Draw at the index-tip position (continuous).
    DrawPointer,
    /// Move the cursor without drawing (continuous).
    HoverPointer,
    /// Press Enter on the presentation host.
    Enter,
    /// Previous slide.
    SlideBackward,
    /// Next slide.
    SlideForward,
    ZoomIn,
    ZoomOut,
    /// Close the presentation host and exit.
    CloseApplication,
    /// Pinch-draw, emitted only by the [`PinchClassifier`] backend.
    DrawPinch,
}

impl Gesture {
    /// Continuous pointer-tracking gestures are acted on every frame and
    /// bypass the cooldown gate entirely.
    pub fn is_pointer(&self) -> bool {
        matches!(
            self,
            Gesture::DrawPointer | Gesture::HoverPointer | Gesture::DrawPinch
        )
    }

    /// True for the draw variants (pen down), false for hover.
    pub fn is_draw(&self) -> bool {
        matches!(self, Gesture::DrawPointer | Gesture::DrawPinch)
    }

    /// The cooldown class for one-shot gestures; `None` for pointer
    /// gestures. Both slide directions share a class, so navigating one
    /// way also debounces the other — a deliberate coarsening.
    pub fn class(&self) -> Option<GestureClass> {
        match self {
            Gesture::TogglePlayback   => Some(GestureClass::Playback),
            Gesture::ToggleCanvas     => Some(GestureClass::Canvas),
            Gesture::Enter            => Some(GestureClass::Enter),
            Gesture::SlideBackward    => Some(GestureClass::SlideNav),
            Gesture::SlideForward     => Some(GestureClass::SlideNav),
            Gesture::ZoomIn           => Some(GestureClass::ZoomIn),
            Gesture::ZoomOut          => Some(GestureClass::ZoomOut),
            Gesture::CloseApplication => Some(GestureClass::Exit),
            Gesture::DrawPointer | Gesture::HoverPointer | Gesture::DrawPinch => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Gesture::TogglePlayback   => "toggle-playback",
            Gesture::ToggleCanvas     => "toggle-canvas",
            Gesture::DrawPointer      => "draw",
            Gesture::HoverPointer     => "hover",
            Gesture::Enter            => "enter",
            Gesture::SlideBackward    => "slide-backward",
            Gesture::SlideForward     => "slide-forward",
            Gesture::ZoomIn           => "zoom-in",
            Gesture::ZoomOut          => "zoom-out",
            Gesture::CloseApplication => "close",
            Gesture::DrawPinch        => "pinch-draw",
        }
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Cooldown bookkeeping category — coarser than [`Gesture`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureClass {
    Playback,
    SlideNav,
    ZoomIn,
    ZoomOut,
    Enter,
    Canvas,
    Exit,
}

impl GestureClass {
    pub const ALL: [GestureClass; 7] = [
        GestureClass::Playback,
        GestureClass::SlideNav,
        GestureClass::ZoomIn,
        GestureClass::ZoomOut,
        GestureClass::Enter,
        GestureClass::Canvas,
        GestureClass::Exit,
    ];

    fn index(self) -> usize {
        match self {
            GestureClass::Playback => 0,
            GestureClass::SlideNav => 1,
            GestureClass::ZoomIn   => 2,
            GestureClass::ZoomOut  => 3,
            GestureClass::Enter    => 4,
            GestureClass::Canvas   => 5,
            GestureClass::Exit     => 6,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Classifier trait — pattern table and pinch geometry as alternative backends
// ════════════════════════════════════════════════════════════════════════════

/// Maps one frame's hand detection to at most one gesture.
///
/// Implementations must be pure: the same `HandFrame` always yields the
/// same answer, with no internal state between frames.
pub trait Classifier {
    fn classify(&self, hand: &HandFrame) -> Option<Gesture>;
}

/// Exact-match lookup over the 5-bit finger-extension pattern.
#[derive(Clone, Copy, Debug, Default)]
pub struct PatternClassifier;

impl PatternClassifier {
    /// The full classification table. Listed in priority order; entries
    /// are disjoint so first-match and exact-match coincide.
    pub fn lookup(fingers: FingerState) -> Option<Gesture> {
        match fingers.0 {
            [true,  true,  false, false, false] => Some(Gesture::TogglePlayback),
            [false, true,  false, false, true ] => Some(Gesture::ToggleCanvas),
            [false, true,  false, false, false] => Some(Gesture::DrawPointer),
            [false, true,  true,  false, false] => Some(Gesture::HoverPointer),
            [false, false, true,  true,  true ] => Some(Gesture::Enter),
            [true,  false, false, false, false] => Some(Gesture::SlideBackward),
            [false, false, false, false, true ] => Some(Gesture::SlideForward),
            [false, true,  true,  true,  false] => Some(Gesture::ZoomIn),
            [false, true,  true,  true,  true ] => Some(Gesture::ZoomOut),
            [true,  false, false, false, true ] => Some(Gesture::CloseApplication),
            _ => None,
        }
    }
}

impl Classifier for PatternClassifier {
    fn classify(&self, hand: &HandFrame) -> Option<Gesture> {
        Self::lookup(hand.fingers)
    }
}

/// Pinch-distance recognizer for detectors that deliver landmarks but no
/// reliable extension vector. Thumb tip and index tip closer than
/// `threshold` (normalized to frame size) is a pinch-draw, regardless of
/// the finger pattern; thumb + index both extended is the cursor pose.
#[derive(Clone, Copy, Debug)]
pub struct PinchClassifier {
    pub threshold: f32,
}

impl PinchClassifier {
    pub const DEFAULT_THRESHOLD: f32 = 0.05;

    pub fn new(threshold: f32) -> Self {
        PinchClassifier { threshold }
    }
}

impl Default for PinchClassifier {
    fn default() -> Self {
        PinchClassifier { threshold: Self::DEFAULT_THRESHOLD }
    }
}

impl Classifier for PinchClassifier {
    fn classify(&self, hand: &HandFrame) -> Option<Gesture> {
        let (thumb, index) = match (hand.thumb_tip(), hand.index_tip()) {
            (Some(t), Some(i)) => (t, i),
            _ => return None,
        };
        if thumb.distance(index) < self.threshold {
            return Some(Gesture::DrawPinch);
        }
        if hand.fingers.thumb() && hand.fingers.index() {
            return Some(Gesture::HoverPointer);
        }
        None
    }
}

// ════════════════════════════════════════════════════════════════════════════
// CooldownGate
// ════════════════════════════════════════════════════════════════════════════

/// Per-class cooldown intervals. The defaults are the canonical set;
/// zoom intervals in particular varied across the system's history and
/// stay configurable.
#[derive(Clone, Copy, Debug)]
pub struct CooldownConfig {
    pub playback:  Duration,
    pub slide_nav: Duration,
    pub zoom_in:   Duration,
    pub zoom_out:  Duration,
    pub enter:     Duration,
    pub canvas:    Duration,
    pub exit:      Duration,
}

impl Default for CooldownConfig {
    fn default() -> Self {
        CooldownConfig {
            playback:  Duration::from_millis(2000),
            slide_nav: Duration::from_millis(1000),
            zoom_in:   Duration::from_millis(1000),
            zoom_out:  Duration::from_millis(3000),
            enter:     Duration::from_millis(2000),
            canvas:    Duration::from_millis(2000),
            exit:      Duration::from_millis(2000),
        }
    }
}

impl CooldownConfig {
    pub fn interval(&self, class: GestureClass) -> Duration {
        match class {
            GestureClass::Playback => self.playback,
            GestureClass::SlideNav => self.slide_nav,
            GestureClass::ZoomIn   => self.zoom_in,
            GestureClass::ZoomOut  => self.zoom_out,
            GestureClass::Enter    => self.enter,
            GestureClass::Canvas   => self.canvas,
            GestureClass::Exit     => self.exit,
        }
    }
}

/// Debounces one-shot gestures: once a class triggers, it stays armed
/// until its interval elapses. Expiry is observed on the next query, so
/// no timers run and nothing can fire after teardown. Classes are fully
/// independent.
#[derive(Clone, Debug)]
pub struct CooldownGate {
    config:    CooldownConfig,
    deadlines: [Option<Instant>; GestureClass::ALL.len()],
}

impl CooldownGate {
    pub fn new(config: CooldownConfig) -> Self {
        CooldownGate { config, deadlines: [None; GestureClass::ALL.len()] }
    }

    /// Returns true and arms the class iff it is currently inactive.
    /// A `false` means the caller must not invoke the action.
    pub fn try_trigger(&mut self, class: GestureClass, now: Instant) -> bool {
        if self.is_active(class, now) {
            return false;
        }
        self.deadlines[class.index()] = Some(now + self.config.interval(class));
        true
    }

    /// True while the class is cooling down at `now`.
    pub fn is_active(&self, class: GestureClass, now: Instant) -> bool {
        match self.deadlines[class.index()] {
            Some(deadline) => now < deadline,
            None => false,
        }
    }

    /// Disarm every class (teardown / surface close).
    pub fn clear(&mut self) {
        self.deadlines = [None; GestureClass::ALL.len()];
    }

    pub fn config(&self) -> &CooldownConfig {
        &self.config
    }
}

impl Default for CooldownGate {
    fn default() -> Self {
        CooldownGate::new(CooldownConfig::default())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// PointerMap — camera-frame space → output-surface space
// ════════════════════════════════════════════════════════════════════════════

/// Linear scaling of normalized landmark coordinates onto an output
/// surface measured in pixels.
#[derive(Clone, Copy, Debug)]
pub struct PointerMap {
    pub width:  f32,
    pub height: f32,
}

impl PointerMap {
    pub fn new(width: f32, height: f32) -> Self {
        PointerMap { width, height }
    }

    pub fn to_surface(&self, normalized: Point) -> Point {
        Point::new(normalized.x * self.width, normalized.y * self.height)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    /// Independent statement of the gesture table, for the exhaustive check.
    fn expected(t: bool, i: bool, m: bool, r: bool, p: bool) -> Option<Gesture> {
        match (t, i, m, r, p) {
            (true,  true,  false, false, false) => Some(Gesture::TogglePlayback),
            (false, true,  false, false, true ) => Some(Gesture::ToggleCanvas),
            (false, true,  false, false, false) => Some(Gesture::DrawPointer),
            (false, true,  true,  false, false) => Some(Gesture::HoverPointer),
            (false, false, true,  true,  true ) => Some(Gesture::Enter),
            (true,  false, false, false, false) => Some(Gesture::SlideBackward),
            (false, false, false, false, true ) => Some(Gesture::SlideForward),
            (false, true,  true,  true,  false) => Some(Gesture::ZoomIn),
            (false, true,  true,  true,  true ) => Some(Gesture::ZoomOut),
            (true,  false, false, false, true ) => Some(Gesture::CloseApplication),
            _ => None,
        }
    }

    #[test]
    fn all_32_patterns_match_the_table() {
        for bits in 0u8..32 {
            let fs = FingerState::from_bits(bits);
            let want = expected(fs.thumb(), fs.index(), fs.middle(), fs.ring(), fs.pinky());
            assert_eq!(PatternClassifier::lookup(fs), want, "pattern {fs}");
        }
    }

    #[test]
    fn classification_is_deterministic() {
        let c = PatternClassifier;
        let hand = HandFrame::from_tip(
            FingerState::new(false, true, false, false, false),
            Point::new(0.5, 0.5),
        );
        let first = c.classify(&hand);
        for _ in 0..10 {
            assert_eq!(c.classify(&hand), first);
        }
        assert_eq!(first, Some(Gesture::DrawPointer));
    }

    #[test]
    fn fist_and_open_hand_are_none() {
        assert_eq!(PatternClassifier::lookup(FingerState::FIST), None);
        assert_eq!(PatternClassifier::lookup(FingerState::from_bits(0b11111)), None);
    }

    #[test]
    fn from_bits_ordering() {
        let fs = FingerState::from_bits(0b00001);
        assert!(fs.thumb() && !fs.pinky());
        let fs = FingerState::from_bits(0b10000);
        assert!(fs.pinky() && !fs.thumb());
    }

    // ── pinch backend ────────────────────────────────────────────────────

    #[test]
    fn pinch_inside_threshold_is_draw() {
        let c = PinchClassifier::default();
        let hand = HandFrame::from_tips(
            FingerState::FIST,
            Point::new(0.50, 0.50),
            Point::new(0.52, 0.51),
        );
        assert_eq!(c.classify(&hand), Some(Gesture::DrawPinch));
    }

    #[test]
    fn pinch_ignores_finger_pattern() {
        // Even a pattern that the table maps to a slide command pinches.
        let c = PinchClassifier::default();
        let hand = HandFrame::from_tips(
            FingerState::new(true, false, false, false, false),
            Point::new(0.3, 0.3),
            Point::new(0.3, 0.3),
        );
        assert_eq!(c.classify(&hand), Some(Gesture::DrawPinch));
    }

    #[test]
    fn separated_thumb_and_index_is_hover() {
        let c = PinchClassifier::default();
        let hand = HandFrame::from_tips(
            FingerState::new(true, true, false, false, false),
            Point::new(0.2, 0.5),
            Point::new(0.6, 0.5),
        );
        assert_eq!(c.classify(&hand), Some(Gesture::HoverPointer));
    }

    #[test]
    fn pinch_backend_without_pose_is_none() {
        let c = PinchClassifier::default();
        let hand = HandFrame::from_tips(
            FingerState::FIST,
            Point::new(0.2, 0.5),
            Point::new(0.6, 0.5),
        );
        assert_eq!(c.classify(&hand), None);
    }

    #[test]
    fn pinch_backend_without_landmarks_is_none() {
        let c = PinchClassifier::default();
        let hand = HandFrame::new(FingerState::FIST, Vec::new());
        assert_eq!(c.classify(&hand), None);
    }

    // ── gesture classes ──────────────────────────────────────────────────

    #[test]
    fn pointer_gestures_have_no_class() {
        assert_eq!(Gesture::DrawPointer.class(), None);
        assert_eq!(Gesture::HoverPointer.class(), None);
        assert_eq!(Gesture::DrawPinch.class(), None);
    }

    #[test]
    fn slide_directions_share_a_class() {
        assert_eq!(Gesture::SlideForward.class(), Some(GestureClass::SlideNav));
        assert_eq!(Gesture::SlideBackward.class(), Some(GestureClass::SlideNav));
    }

    // ── cooldown gate ────────────────────────────────────────────────────

    #[test]
    fn second_trigger_within_interval_is_refused() {
        let mut gate = CooldownGate::default();
        let t0 = Instant::now();
        assert!(gate.try_trigger(GestureClass::SlideNav, t0));
        assert!(!gate.try_trigger(GestureClass::SlideNav, t0 + ms(500)));
    }

    #[test]
    fn trigger_after_expiry_succeeds() {
        let mut gate = CooldownGate::default();
        let t0 = Instant::now();
        assert!(gate.try_trigger(GestureClass::SlideNav, t0));
        assert!(gate.try_trigger(GestureClass::SlideNav, t0 + ms(1000)));
    }

    #[test]
    fn classes_are_independent() {
        let mut gate = CooldownGate::default();
        let t0 = Instant::now();
        assert!(gate.try_trigger(GestureClass::Playback, t0));
        for class in [
            GestureClass::SlideNav,
            GestureClass::ZoomIn,
            GestureClass::ZoomOut,
            GestureClass::Enter,
            GestureClass::Canvas,
            GestureClass::Exit,
        ] {
            assert!(gate.try_trigger(class, t0), "{class:?} blocked by Playback");
        }
    }

    #[test]
    fn intervals_follow_config() {
        let mut cfg = CooldownConfig::default();
        cfg.zoom_out = ms(1500);
        let mut gate = CooldownGate::new(cfg);
        let t0 = Instant::now();
        assert!(gate.try_trigger(GestureClass::ZoomOut, t0));
        assert!(!gate.try_trigger(GestureClass::ZoomOut, t0 + ms(1400)));
        assert!(gate.try_trigger(GestureClass::ZoomOut, t0 + ms(1500)));
    }

    #[test]
    fn clear_disarms_everything() {
        let mut gate = CooldownGate::default();
        let t0 = Instant::now();
        gate.try_trigger(GestureClass::Enter, t0);
        gate.try_trigger(GestureClass::Canvas, t0);
        gate.clear();
        assert!(!gate.is_active(GestureClass::Enter, t0));
        assert!(gate.try_trigger(GestureClass::Canvas, t0));
    }

    #[test]
    fn is_active_observes_expiry_without_trigger() {
        let mut gate = CooldownGate::default();
        let t0 = Instant::now();
        gate.try_trigger(GestureClass::Exit, t0);
        assert!(gate.is_active(GestureClass::Exit, t0 + ms(1999)));
        assert!(!gate.is_active(GestureClass::Exit, t0 + ms(2000)));
    }

    // ── pointer mapping ──────────────────────────────────────────────────

    #[test]
    fn pointer_map_scales_linearly() {
        let map = PointerMap::new(1280.0, 720.0);
        let p = map.to_surface(Point::new(0.5, 0.25));
        assert_eq!(p, Point::new(640.0, 180.0));
    }

    #[test]
    fn pointer_map_corners() {
        let map = PointerMap::new(640.0, 480.0);
        assert_eq!(map.to_surface(Point::new(0.0, 0.0)), Point::new(0.0, 0.0));
        assert_eq!(map.to_surface(Point::new(1.0, 1.0)), Point::new(640.0, 480.0));
    }
}
