//! Top-level application state machine.
//!
//! `AppState` owns the classifier backend, the dispatcher (and with it
//! the cooldown gate), the annotation surface and the pointer mapping.
//! The run loop drives one synchronous pipeline pass per frame tick:
//! drain the landmark source, classify, gate, dispatch, render — each
//! tick completes before the next is scheduled, so the dispatcher is
//! never entered concurrently.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::{Duration, Instant};

use hand_gesture::{
    Classifier, CooldownConfig, CooldownGate, Gesture, HandFrame, PatternClassifier,
    PinchClassifier, PointerMap,
};
use overlay_canvas::{CanvasSurface, SurfaceConfig};

use crate::deck::{Deck, DeckControl};
use crate::dispatch::{DispatchOutcome, Dispatcher};
use crate::error::Error;
use crate::landmark::{spawn_landmark_source, FrameEvent, SimLandmarkSource};
use crate::visualizer::Visualizer;

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Which recognition strategy classifies each frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClassifierBackend {
    /// Exact finger-extension pattern table.
    Pattern,
    /// Thumb/index pinch distance (for detectors without a reliable
    /// extension vector).
    Pinch,
}

/// Configuration for the full application.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub cooldowns:       CooldownConfig,
    pub backend:         ClassifierBackend,
    pub pinch_threshold: f32,
    /// Output window / annotation surface size in pixels.
    pub width:           usize,
    pub height:          usize,
    /// Frame-acquisition tick.
    pub frame_interval:  Duration,
    pub camera_index:    u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            cooldowns:       CooldownConfig::default(),
            backend:         ClassifierBackend::Pattern,
            pinch_threshold: PinchClassifier::DEFAULT_THRESHOLD,
            width:           1280,
            height:          720,
            frame_interval:  Duration::from_millis(30),
            camera_index:    0,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Playback state
// ════════════════════════════════════════════════════════════════════════════

/// Best-effort mirror of the host's media playback, flipped on each
/// accepted playback toggle. Display only — the host is the truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayState {
    Stopped,
    Playing,
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    classifier:  Box<dyn Classifier>,
    dispatcher:  Dispatcher,
    surface:     CanvasSurface,
    pointer_map: PointerMap,
    play_state:  PlayState,
    should_exit: bool,

    // ── status message ────────────────────────────────────────────────────
    pub status: String,
}

impl AppState {
    pub fn new(cfg: &AppConfig) -> Self {
        let classifier: Box<dyn Classifier> = match cfg.backend {
            ClassifierBackend::Pattern => Box::new(PatternClassifier),
            ClassifierBackend::Pinch   => Box::new(PinchClassifier::new(cfg.pinch_threshold)),
        };
        AppState {
            classifier,
            dispatcher:  Dispatcher::new(CooldownGate::new(cfg.cooldowns)),
            surface:     CanvasSurface::new(SurfaceConfig::new(cfg.width as f32, cfg.height as f32)),
            pointer_map: PointerMap::new(cfg.width as f32, cfg.height as f32),
            play_state:  PlayState::Stopped,
            should_exit: false,
            status:      "READY - SHOW A HAND POSE".to_string(),
        }
    }

    // ── process one source frame ─────────────────────────────────────────

    pub fn process_frame(
        &mut self,
        hand: Option<&HandFrame>,
        now: Instant,
        deck: &dyn DeckControl,
    ) -> DispatchOutcome {
        let gesture = hand.and_then(|h| self.classifier.classify(h));
        let pointer = hand
            .and_then(|h| h.index_tip())
            .map(|p| self.pointer_map.to_surface(p));

        let outcome = self
            .dispatcher
            .dispatch(gesture, pointer, now, deck, &mut self.surface);

        match outcome {
            DispatchOutcome::Acted(g) if !g.is_pointer() => {
                if g == Gesture::TogglePlayback {
                    self.play_state = match self.play_state {
                        PlayState::Stopped => PlayState::Playing,
                        PlayState::Playing => PlayState::Stopped,
                    };
                }
                self.status = self.status_line(g);
                log::info!("{}", self.status);
            }
            DispatchOutcome::Exit => {
                self.should_exit = true;
                self.status = "CLOSING HOST".to_string();
                log::info!("{}", self.status);
            }
            _ => {}
        }
        outcome
    }

    fn status_line(&self, gesture: Gesture) -> String {
        match gesture {
            Gesture::TogglePlayback => match self.play_state {
                PlayState::Playing => "PLAYBACK: PLAYING".to_string(),
                PlayState::Stopped => "PLAYBACK: STOPPED".to_string(),
            },
            Gesture::ToggleCanvas => {
                if self.surface.is_visible() {
                    "CANVAS SHOWN - DRAW WITH INDEX FINGER".to_string()
                } else {
                    "CANVAS HIDDEN".to_string()
                }
            }
            Gesture::SlideForward  => "SLIDE: FORWARD".to_string(),
            Gesture::SlideBackward => "SLIDE: BACKWARD".to_string(),
            Gesture::ZoomIn        => "ZOOM: IN".to_string(),
            Gesture::ZoomOut       => "ZOOM: OUT".to_string(),
            Gesture::Enter         => "ENTER".to_string(),
            _                      => gesture.name().to_uppercase(),
        }
    }

    // ── accessors for the render loop ─────────────────────────────────────

    pub fn surface(&self) -> &CanvasSurface {
        &self.surface
    }

    pub fn play_state(&self) -> PlayState {
        self.play_state
    }

    pub fn is_playing(&self) -> bool {
        self.play_state == PlayState::Playing
    }

    pub fn should_exit(&self) -> bool {
        self.should_exit
    }
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Run in simulation mode: keyboard poses + mouse pointer drive the
/// whole pipeline, no hardware needed.
pub fn run(cfg: AppConfig) -> Result<(), Error> {
    let (sim_tx, sim_rx) = mpsc::channel();
    let events = spawn_landmark_source(SimLandmarkSource { rx: sim_rx });
    let vis = Visualizer::new(sim_tx, &cfg)?;
    run_loop(cfg, events, vis)
}

/// Run against a live webcam plus an external hand-landmark detector.
#[cfg(feature = "camera")]
pub fn run_with_camera(
    cfg: AppConfig,
    detector: Box<dyn crate::camera::HandDetector>,
) -> Result<(), Error> {
    use crate::camera::{CameraCapture, CameraLandmarkSource};

    // Camera failures are fatal here, before any frame processing.
    let capture = CameraCapture::open(cfg.camera_index, cfg.width as u32, cfg.height as u32)?;
    let events = spawn_landmark_source(CameraLandmarkSource::new(capture, detector));
    let (sim_tx, _sim_rx) = mpsc::channel();
    let vis = Visualizer::new(sim_tx, &cfg)?;
    run_loop(cfg, events, vis)
}

fn run_loop(
    cfg: AppConfig,
    events: Receiver<FrameEvent>,
    mut vis: Visualizer,
) -> Result<(), Error> {
    let deck = Deck::spawn();
    let mut app = AppState::new(&cfg);

    while vis.is_open() && !app.should_exit() {
        // 1. Window input → sim source (a no-op wire in camera mode).
        if !vis.poll_input() {
            break;
        }

        // 2. Drain source events; only the newest detection matters.
        let mut latest: Option<Option<HandFrame>> = None;
        loop {
            match events.try_recv() {
                Ok(FrameEvent::Hand(hand))      => latest = Some(hand),
                Err(TryRecvError::Empty)        => break,
                Err(TryRecvError::Disconnected) => {
                    deck.shutdown();
                    return Ok(());
                }
            }
        }

        // 3. One synchronous pipeline pass.
        if let Some(hand) = latest {
            app.process_frame(hand.as_ref(), Instant::now(), &deck);
        }

        // 4. Render (also paces the loop to the frame interval).
        vis.render(&app)?;
    }

    deck.shutdown();
    // Dropping `events` here disconnects the source thread; a camera
    // source drops its capture and releases the device.
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use hand_gesture::{FingerState, Point};

    #[derive(Default)]
    struct RecordingDeck {
        calls: RefCell<Vec<&'static str>>,
    }

    impl RecordingDeck {
        fn count(&self, name: &str) -> usize {
            self.calls.borrow().iter().filter(|c| **c == name).count()
        }
    }

    impl DeckControl for RecordingDeck {
        fn play_pause(&self) {
            self.calls.borrow_mut().push("play_pause");
        }
        fn navigate(&self, dir: crate::deck::SlideDirection) {
            self.calls.borrow_mut().push(match dir {
                crate::deck::SlideDirection::Forward  => "forward",
                crate::deck::SlideDirection::Backward => "backward",
            });
        }
        fn zoom(&self, _dir: crate::deck::ZoomDirection) {
            self.calls.borrow_mut().push("zoom");
        }
        fn press_enter(&self) {
            self.calls.borrow_mut().push("enter");
        }
        fn close_and_exit(&self) {
            self.calls.borrow_mut().push("close");
        }
    }

    fn make_app() -> AppState {
        AppState::new(&AppConfig::default())
    }

    fn pattern(bits: [u8; 5]) -> HandFrame {
        let fingers = FingerState::new(
            bits[0] == 1,
            bits[1] == 1,
            bits[2] == 1,
            bits[3] == 1,
            bits[4] == 1,
        );
        HandFrame::from_tip(fingers, Point::new(0.5, 0.5))
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn backward_pattern_one_frame_navigates_once() {
        let mut app = make_app();
        let deck = RecordingDeck::default();
        let hand = pattern([1, 0, 0, 0, 0]);
        app.process_frame(Some(&hand), Instant::now(), &deck);
        assert_eq!(deck.count("backward"), 1);
    }

    #[test]
    fn backward_pattern_held_1200ms_navigates_twice() {
        let mut app = make_app();
        let deck = RecordingDeck::default();
        let hand = pattern([1, 0, 0, 0, 0]);
        let t0 = Instant::now();
        // 40 frames at 30 ms/frame against a 1000 ms cooldown.
        for frame in 0..40u64 {
            app.process_frame(Some(&hand), t0 + ms(frame * 30), &deck);
        }
        assert_eq!(deck.count("backward"), 2);
    }

    #[test]
    fn playback_toggle_flips_play_state() {
        let mut app = make_app();
        let deck = RecordingDeck::default();
        let hand = pattern([1, 1, 0, 0, 0]);
        let t0 = Instant::now();
        assert_eq!(app.play_state(), PlayState::Stopped);
        app.process_frame(Some(&hand), t0, &deck);
        assert_eq!(app.play_state(), PlayState::Playing);
        // Still cooling down: no flip.
        app.process_frame(Some(&hand), t0 + ms(500), &deck);
        assert_eq!(app.play_state(), PlayState::Playing);
        app.process_frame(Some(&hand), t0 + ms(2000), &deck);
        assert_eq!(app.play_state(), PlayState::Stopped);
        assert_eq!(deck.count("play_pause"), 2);
    }

    #[test]
    fn canvas_gesture_toggles_surface() {
        let mut app = make_app();
        let deck = RecordingDeck::default();
        let hand = pattern([0, 1, 0, 0, 1]);
        let t0 = Instant::now();
        app.process_frame(Some(&hand), t0, &deck);
        assert!(app.surface().is_visible());
        app.process_frame(Some(&hand), t0 + ms(100), &deck);
        assert!(app.surface().is_visible(), "within cooldown: unchanged");
        app.process_frame(Some(&hand), t0 + ms(2500), &deck);
        assert!(!app.surface().is_visible());
    }

    #[test]
    fn draw_pose_builds_a_stroke_through_the_pipeline() {
        let mut app = make_app();
        let deck = RecordingDeck::default();
        let t0 = Instant::now();
        app.process_frame(Some(&pattern([0, 1, 0, 0, 1])), t0, &deck); // show canvas

        let draw = |x: f32| {
            HandFrame::from_tip(
                FingerState::new(false, true, false, false, false),
                Point::new(x, 0.6),
            )
        };
        app.process_frame(Some(&draw(0.30)), t0 + ms(100), &deck);
        app.process_frame(Some(&draw(0.31)), t0 + ms(130), &deck);
        app.process_frame(Some(&draw(0.32)), t0 + ms(160), &deck);
        let stroke = app.surface().active_stroke().expect("drawing");
        assert_eq!(stroke.segment_count(), 2);

        // Hand lost, then regained: the next stroke is disconnected.
        app.process_frame(None, t0 + ms(190), &deck);
        app.process_frame(Some(&draw(0.70)), t0 + ms(220), &deck);
        app.process_frame(Some(&draw(0.71)), t0 + ms(250), &deck);
        assert_eq!(app.surface().strokes().len(), 1);
        let resumed = app.surface().active_stroke().unwrap();
        assert_eq!(resumed.points[0].x, 0.70 * 1280.0);
    }

    #[test]
    fn pointer_scales_from_frame_to_surface_space() {
        let mut app = make_app();
        let deck = RecordingDeck::default();
        let t0 = Instant::now();
        app.process_frame(Some(&pattern([0, 1, 0, 0, 1])), t0, &deck); // show canvas

        let hover = HandFrame::from_tip(
            FingerState::new(false, true, true, false, false),
            Point::new(0.25, 0.5),
        );
        app.process_frame(Some(&hover), t0 + ms(100), &deck);
        assert_eq!(app.surface().cursor(), Some(Point::new(320.0, 360.0)));
    }

    #[test]
    fn close_gesture_sets_should_exit() {
        let mut app = make_app();
        let deck = RecordingDeck::default();
        app.process_frame(Some(&pattern([1, 0, 0, 0, 1])), Instant::now(), &deck);
        assert!(app.should_exit());
        assert_eq!(deck.count("close"), 1);
    }

    #[test]
    fn unmapped_pattern_does_nothing() {
        let mut app = make_app();
        let deck = RecordingDeck::default();
        let out = app.process_frame(Some(&pattern([1, 1, 1, 1, 1])), Instant::now(), &deck);
        assert_eq!(out, DispatchOutcome::Idle);
        assert!(deck.calls.borrow().is_empty());
    }

    #[test]
    fn pinch_backend_draws_without_patterns() {
        let cfg = AppConfig { backend: ClassifierBackend::Pinch, ..AppConfig::default() };
        let mut app = AppState::new(&cfg);
        let deck = RecordingDeck::default();
        let t0 = Instant::now();

        // Show the canvas via the engine directly — the pinch backend
        // has no canvas gesture.
        app.surface.show();

        let pinch = |x: f32| {
            HandFrame::from_tips(FingerState::FIST, Point::new(x, 0.5), Point::new(x, 0.5))
        };
        app.process_frame(Some(&pinch(0.40)), t0, &deck);
        app.process_frame(Some(&pinch(0.41)), t0 + ms(30), &deck);
        assert!(app.surface().active_stroke().is_some());
        // A slide pattern means nothing to the pinch backend.
        let out = app.process_frame(Some(&pattern([1, 0, 0, 0, 0])), t0 + ms(60), &deck);
        assert_eq!(out, DispatchOutcome::Idle);
        assert_eq!(deck.count("backward"), 0);
    }

    #[test]
    fn zoom_cooldowns_follow_config_overrides() {
        let mut cooldowns = CooldownConfig::default();
        cooldowns.zoom_out = ms(1500); // the shorter historical variant
        let cfg = AppConfig { cooldowns, ..AppConfig::default() };
        let mut app = AppState::new(&cfg);
        let deck = RecordingDeck::default();
        let hand = pattern([0, 1, 1, 1, 1]);
        let t0 = Instant::now();

        app.process_frame(Some(&hand), t0, &deck);
        app.process_frame(Some(&hand), t0 + ms(1000), &deck);
        app.process_frame(Some(&hand), t0 + ms(1500), &deck);
        assert_eq!(deck.count("zoom"), 2);
    }
}
