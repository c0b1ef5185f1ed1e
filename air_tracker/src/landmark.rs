//! Landmark sources — where per-frame hand detections come from.
//!
//! The public interface is [`FrameEvent`] delivered over a `mpsc`
//! channel; the frame loop doesn't care whether events come from a real
//! capture pipeline or the keyboard/mouse simulator the visualizer
//! feeds. One event per source frame, hand absence included — the loop
//! only resets pointer continuity when a source *says* the hand is gone.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use hand_gesture::{FingerState, HandFrame, Point};

// ════════════════════════════════════════════════════════════════════════════
// FrameEvent / LandmarkSource
// ════════════════════════════════════════════════════════════════════════════

/// One source frame's worth of detection.
#[derive(Clone, Debug)]
pub enum FrameEvent {
    /// `None` = no hand in frame this tick (a normal, expected state).
    Hand(Option<HandFrame>),
}

/// Anything that can deliver [`FrameEvent`]s over a channel.
pub trait LandmarkSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<FrameEvent>);
}

/// Spawn a landmark source on its own thread and return the receiving
/// end. The source exits when the receiver is dropped.
pub fn spawn_landmark_source<S: LandmarkSource>(source: S) -> Receiver<FrameEvent> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || Box::new(source).run(tx));
    rx
}

// ════════════════════════════════════════════════════════════════════════════
// SimLandmarkSource — keyboard/mouse simulation (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Raw input from the simulation window, one per frame tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimInput {
    /// A pose key is held; `tip` is the mouse position in normalized
    /// window coordinates standing in for the index fingertip. `pinch`
    /// collapses the synthetic thumb onto the index tip so the pinch
    /// backend recognizes a draw.
    Pose {
        fingers: FingerState,
        tip:     Point,
        pinch:   bool,
    },
    /// No pose key held — the hand is out of frame.
    NoHand,
}

/// Translates [`SimInput`] from the visualizer's window into hand
/// frames. Decouples the window event loop from detection semantics,
/// and means the rest of the pipeline is identical in sim and capture
/// modes.
pub struct SimLandmarkSource {
    pub rx: Receiver<SimInput>,
}

impl SimLandmarkSource {
    fn translate(input: SimInput) -> FrameEvent {
        match input {
            SimInput::Pose { fingers, tip, pinch } => {
                let hand = if pinch {
                    HandFrame::from_tips(fingers, tip, tip)
                } else {
                    HandFrame::from_tip(fingers, tip)
                };
                FrameEvent::Hand(Some(hand))
            }
            SimInput::NoHand => FrameEvent::Hand(None),
        }
    }
}

impl LandmarkSource for SimLandmarkSource {
    fn run(self: Box<Self>, tx: Sender<FrameEvent>) {
        for input in self.rx {
            if tx.send(Self::translate(input)).is_err() {
                return;
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
