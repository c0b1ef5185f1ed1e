//! Gesture → action dispatch.
//!
//! One [`Dispatcher::dispatch`] call per frame: pointer gestures drive
//! the annotation surface directly and continuously, one-shot gestures
//! pass through the owned [`CooldownGate`] and invoke exactly one
//! collaborator action per accepted trigger.

use std::time::Instant;

use hand_gesture::{CooldownGate, Gesture, Point};
use overlay_canvas::CanvasSurface;

use crate::deck::{DeckControl, SlideDirection, ZoomDirection};

/// What a frame's dispatch decided.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// No hand / no recognized gesture this frame.
    Idle,
    /// The gesture acted (pointer gestures act every frame).
    Acted(Gesture),
    /// A one-shot gesture was held back by its cooldown.
    Suppressed(Gesture),
    /// Close gesture accepted — the application should shut down.
    Exit,
}

pub struct Dispatcher {
    gate: CooldownGate,
}

impl Dispatcher {
    pub fn new(gate: CooldownGate) -> Self {
        Dispatcher { gate }
    }

    pub fn gate(&self) -> &CooldownGate {
        &self.gate
    }

    /// Process one frame's classification result.
    ///
    /// `pointer` is the index-tip position in surface space, when a hand
    /// was present. Absence of a gesture (or of the pointer for a
    /// pointer gesture) resets stroke continuity so the next stroke
    /// starts fresh.
    pub fn dispatch(
        &mut self,
        gesture: Option<Gesture>,
        pointer: Option<Point>,
        now: Instant,
        deck: &dyn DeckControl,
        surface: &mut CanvasSurface,
    ) -> DispatchOutcome {
        let gesture = match gesture {
            Some(g) => g,
            None => {
                surface.reset_pointer();
                return DispatchOutcome::Idle;
            }
        };

        if gesture.is_pointer() {
            let pos = match pointer {
                Some(p) => p,
                None => {
                    surface.reset_pointer();
                    return DispatchOutcome::Idle;
                }
            };
            if gesture.is_draw() {
                surface.extend_stroke(pos);
            } else {
                surface.move_cursor(pos);
            }
            return DispatchOutcome::Acted(gesture);
        }

        // Any non-pointer gesture ends the draw pose.
        surface.reset_pointer();

        let class = match gesture.class() {
            Some(c) => c,
            None => return DispatchOutcome::Idle,
        };
        if !self.gate.try_trigger(class, now) {
            return DispatchOutcome::Suppressed(gesture);
        }

        log::debug!("dispatch {gesture}");
        match gesture {
            Gesture::TogglePlayback   => deck.play_pause(),
            Gesture::SlideForward     => deck.navigate(SlideDirection::Forward),
            Gesture::SlideBackward    => deck.navigate(SlideDirection::Backward),
            Gesture::ZoomIn           => deck.zoom(ZoomDirection::In),
            Gesture::ZoomOut          => deck.zoom(ZoomDirection::Out),
            Gesture::Enter            => deck.press_enter(),
            Gesture::ToggleCanvas     => {
                surface.toggle();
            }
            Gesture::CloseApplication => {
                deck.close_and_exit();
                return DispatchOutcome::Exit;
            }
            // Pointer gestures already returned above.
            Gesture::DrawPointer | Gesture::HoverPointer | Gesture::DrawPinch => {}
        }
        DispatchOutcome::Acted(gesture)
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Dispatcher::new(CooldownGate::default())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::time::Duration;

    use overlay_canvas::{SurfaceConfig, SurfaceMode};

    #[derive(Default)]
    struct RecordingDeck {
        calls: RefCell<Vec<String>>,
    }

    impl RecordingDeck {
        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }

        fn count(&self, name: &str) -> usize {
            self.calls.borrow().iter().filter(|c| c.as_str() == name).count()
        }
    }

    impl DeckControl for RecordingDeck {
        fn play_pause(&self) {
            self.calls.borrow_mut().push("play_pause".into());
        }
        fn navigate(&self, dir: SlideDirection) {
            self.calls.borrow_mut().push(format!("navigate:{dir:?}"));
        }
        fn zoom(&self, dir: ZoomDirection) {
            self.calls.borrow_mut().push(format!("zoom:{dir:?}"));
        }
        fn press_enter(&self) {
            self.calls.borrow_mut().push("press_enter".into());
        }
        fn close_and_exit(&self) {
            self.calls.borrow_mut().push("close_and_exit".into());
        }
    }

    fn surface() -> CanvasSurface {
        CanvasSurface::new(SurfaceConfig::new(1280.0, 720.0))
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn one_shot_gesture_acts_exactly_once_per_trigger() {
        let mut d = Dispatcher::default();
        let deck = RecordingDeck::default();
        let mut s = surface();
        let t0 = Instant::now();

        let out = d.dispatch(Some(Gesture::SlideBackward), None, t0, &deck, &mut s);
        assert_eq!(out, DispatchOutcome::Acted(Gesture::SlideBackward));
        assert_eq!(deck.calls(), vec!["navigate:Backward"]);
    }

    #[test]
    fn held_gesture_is_suppressed_until_cooldown_expires() {
        let mut d = Dispatcher::default();
        let deck = RecordingDeck::default();
        let mut s = surface();
        let t0 = Instant::now();

        // Pattern (1,0,0,0,0) held for 40 frames at 30 ms/frame spans
        // 1200 ms against a 1000 ms cooldown: exactly two triggers.
        for frame in 0..40u64 {
            d.dispatch(
                Some(Gesture::SlideBackward),
                None,
                t0 + ms(frame * 30),
                &deck,
                &mut s,
            );
        }
        assert_eq!(deck.count("navigate:Backward"), 2);
    }

    #[test]
    fn slide_directions_debounce_each_other() {
        let mut d = Dispatcher::default();
        let deck = RecordingDeck::default();
        let mut s = surface();
        let t0 = Instant::now();

        d.dispatch(Some(Gesture::SlideForward), None, t0, &deck, &mut s);
        let out = d.dispatch(Some(Gesture::SlideBackward), None, t0 + ms(100), &deck, &mut s);
        assert_eq!(out, DispatchOutcome::Suppressed(Gesture::SlideBackward));
        assert_eq!(deck.calls(), vec!["navigate:Forward"]);
    }

    #[test]
    fn cooldown_of_one_class_never_blocks_another() {
        let mut d = Dispatcher::default();
        let deck = RecordingDeck::default();
        let mut s = surface();
        let t0 = Instant::now();

        d.dispatch(Some(Gesture::TogglePlayback), None, t0, &deck, &mut s);
        d.dispatch(Some(Gesture::ZoomIn), None, t0 + ms(10), &deck, &mut s);
        d.dispatch(Some(Gesture::Enter), None, t0 + ms(20), &deck, &mut s);
        assert_eq!(deck.calls(), vec!["play_pause", "zoom:In", "press_enter"]);
    }

    #[test]
    fn canvas_toggle_twice_within_window_keeps_visibility() {
        let mut d = Dispatcher::default();
        let deck = RecordingDeck::default();
        let mut s = surface();
        let t0 = Instant::now();

        d.dispatch(Some(Gesture::ToggleCanvas), None, t0, &deck, &mut s);
        assert!(s.is_visible());
        let out = d.dispatch(Some(Gesture::ToggleCanvas), None, t0 + ms(500), &deck, &mut s);
        assert_eq!(out, DispatchOutcome::Suppressed(Gesture::ToggleCanvas));
        assert!(s.is_visible(), "second toggle inside cooldown is a no-op");
        // After the window it toggles again.
        d.dispatch(Some(Gesture::ToggleCanvas), None, t0 + ms(2000), &deck, &mut s);
        assert!(!s.is_visible());
    }

    #[test]
    fn draw_frames_are_never_gated() {
        let mut d = Dispatcher::default();
        let deck = RecordingDeck::default();
        let mut s = surface();
        s.show();
        let t0 = Instant::now();

        for frame in 0..5u64 {
            let out = d.dispatch(
                Some(Gesture::DrawPointer),
                Some(Point::new(100.0 + frame as f32, 400.0)),
                t0 + ms(frame * 30),
                &deck,
                &mut s,
            );
            assert_eq!(out, DispatchOutcome::Acted(Gesture::DrawPointer));
        }
        assert_eq!(s.active_stroke().unwrap().segment_count(), 4);
        assert!(deck.calls().is_empty());
    }

    #[test]
    fn hand_loss_resets_stroke_continuity() {
        let mut d = Dispatcher::default();
        let deck = RecordingDeck::default();
        let mut s = surface();
        s.show();
        let t0 = Instant::now();

        d.dispatch(Some(Gesture::DrawPointer), Some(Point::new(10.0, 400.0)), t0, &deck, &mut s);
        d.dispatch(Some(Gesture::DrawPointer), Some(Point::new(20.0, 400.0)), t0, &deck, &mut s);
        // Hand leaves the frame.
        let out = d.dispatch(None, None, t0, &deck, &mut s);
        assert_eq!(out, DispatchOutcome::Idle);
        // Regained: new disconnected stroke.
        d.dispatch(Some(Gesture::DrawPointer), Some(Point::new(500.0, 400.0)), t0, &deck, &mut s);
        d.dispatch(Some(Gesture::DrawPointer), Some(Point::new(510.0, 400.0)), t0, &deck, &mut s);

        assert_eq!(s.strokes().len(), 1);
        assert_eq!(s.active_stroke().unwrap().points[0], Point::new(500.0, 400.0));
    }

    #[test]
    fn hover_moves_cursor_and_ends_stroke() {
        let mut d = Dispatcher::default();
        let deck = RecordingDeck::default();
        let mut s = surface();
        s.show();
        let t0 = Instant::now();

        d.dispatch(Some(Gesture::DrawPointer), Some(Point::new(10.0, 400.0)), t0, &deck, &mut s);
        d.dispatch(Some(Gesture::DrawPointer), Some(Point::new(20.0, 400.0)), t0, &deck, &mut s);
        d.dispatch(Some(Gesture::HoverPointer), Some(Point::new(30.0, 400.0)), t0, &deck, &mut s);
        assert_eq!(s.mode(), SurfaceMode::Idle);
        assert_eq!(s.cursor(), Some(Point::new(30.0, 400.0)));
        assert_eq!(s.strokes().len(), 1);
    }

    #[test]
    fn close_gesture_requests_exit_once() {
        let mut d = Dispatcher::default();
        let deck = RecordingDeck::default();
        let mut s = surface();
        let t0 = Instant::now();

        let out = d.dispatch(Some(Gesture::CloseApplication), None, t0, &deck, &mut s);
        assert_eq!(out, DispatchOutcome::Exit);
        let out = d.dispatch(Some(Gesture::CloseApplication), None, t0 + ms(100), &deck, &mut s);
        assert_eq!(out, DispatchOutcome::Suppressed(Gesture::CloseApplication));
        assert_eq!(deck.count("close_and_exit"), 1);
    }

    #[test]
    fn pinch_draw_extends_like_draw_pointer() {
        let mut d = Dispatcher::default();
        let deck = RecordingDeck::default();
        let mut s = surface();
        s.show();
        let t0 = Instant::now();

        d.dispatch(Some(Gesture::DrawPinch), Some(Point::new(40.0, 400.0)), t0, &deck, &mut s);
        d.dispatch(Some(Gesture::DrawPinch), Some(Point::new(50.0, 400.0)), t0, &deck, &mut s);
        assert_eq!(s.active_stroke().unwrap().segment_count(), 1);
    }
}
