//! Presentation-deck control over simulated key input.
//!
//! The gesture loop never talks to the host directly: [`Deck`] pushes a
//! [`DeckCommand`] onto a channel and returns immediately, and a worker
//! thread applies it with bounded retries. A stalled or missing host
//! therefore costs the frame loop nothing, and the single worker
//! guarantees at most one in-flight host call.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

// ════════════════════════════════════════════════════════════════════════════
// Directions / commands
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlideDirection {
    Forward,
    Backward,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

/// A single host action, applied exactly once per accepted trigger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeckCommand {
    /// Alt+P — toggle embedded media playback.
    PlayPause,
    /// Arrow key — slide navigation.
    Navigate(SlideDirection),
    /// Ctrl+'+' / Ctrl+'-'.
    Zoom(ZoomDirection),
    PressEnter,
    /// Escape out of the slideshow, then close the host window.
    CloseAndExit,
    /// Terminate the worker.
    Shutdown,
}

// ════════════════════════════════════════════════════════════════════════════
// DeckControl — the contract the dispatcher depends on
// ════════════════════════════════════════════════════════════════════════════

/// Narrow interface to the presentation host. All methods are
/// fire-and-forget: failures are logged at the collaborator boundary
/// and never raised into the gesture loop.
pub trait DeckControl {
    fn play_pause(&self);
    fn navigate(&self, dir: SlideDirection);
    fn zoom(&self, dir: ZoomDirection);
    fn press_enter(&self);
    fn close_and_exit(&self);
}

// ════════════════════════════════════════════════════════════════════════════
// KeyInjector — abstraction over enigo / null (for testing and fallback)
// ════════════════════════════════════════════════════════════════════════════

trait KeyInjector: Send {
    fn apply(&mut self, cmd: DeckCommand) -> Result<(), String>;
}

// ── enigo backend ─────────────────────────────────────────────────────────

struct EnigoKeys {
    enigo: enigo::Enigo,
}

impl EnigoKeys {
    fn open() -> Result<Self, String> {
        let enigo = enigo::Enigo::new(&enigo::Settings::default())
            .map_err(|e| e.to_string())?;
        Ok(EnigoKeys { enigo })
    }

    fn tap(&mut self, key: enigo::Key) -> Result<(), String> {
        use enigo::{Direction, Keyboard};
        self.enigo.key(key, Direction::Click).map_err(|e| e.to_string())
    }

    fn chord(&mut self, hold: enigo::Key, key: enigo::Key) -> Result<(), String> {
        use enigo::{Direction, Keyboard};
        self.enigo.key(hold, Direction::Press).map_err(|e| e.to_string())?;
        let tapped = self.tap(key);
        // Always release the modifier, even if the tap failed.
        let released = self
            .enigo
            .key(hold, Direction::Release)
            .map_err(|e| e.to_string());
        tapped.and(released)
    }
}

impl KeyInjector for EnigoKeys {
    fn apply(&mut self, cmd: DeckCommand) -> Result<(), String> {
        use enigo::Key;
        match cmd {
            DeckCommand::PlayPause => self.chord(Key::Alt, Key::Unicode('p')),
            DeckCommand::Navigate(SlideDirection::Forward)  => self.tap(Key::RightArrow),
            DeckCommand::Navigate(SlideDirection::Backward) => self.tap(Key::LeftArrow),
            DeckCommand::Zoom(ZoomDirection::In)  => self.chord(Key::Control, Key::Unicode('+')),
            DeckCommand::Zoom(ZoomDirection::Out) => self.chord(Key::Control, Key::Unicode('-')),
            DeckCommand::PressEnter => self.tap(Key::Return),
            DeckCommand::CloseAndExit => {
                self.tap(Key::Escape)?;
                self.chord(Key::Alt, Key::F4)
            }
            DeckCommand::Shutdown => Ok(()),
        }
    }
}

// ── null backend (used when no input backend is available) ────────────────

struct NullKeys;

impl KeyInjector for NullKeys {
    fn apply(&mut self, cmd: DeckCommand) -> Result<(), String> {
        log::debug!("[deck] null backend, dropping {cmd:?}");
        Ok(())
    }
}

/// Open the platform key-injection backend, falling back to a logging
/// null backend so the gesture loop still runs end to end.
fn open_injector() -> Box<dyn KeyInjector> {
    match EnigoKeys::open() {
        Ok(keys) => Box::new(keys),
        Err(e) => {
            log::warn!("[deck] input backend unavailable: {e} — using null backend");
            Box::new(NullKeys)
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Retry policy
// ════════════════════════════════════════════════════════════════════════════

/// Bounded retry with doubling backoff for flaky hosts. After the last
/// attempt the single action is dropped; the loop is unaffected.
#[derive(Clone, Copy, Debug)]
struct RetryPolicy {
    attempts: u32,
    backoff:  Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy { attempts: 3, backoff: Duration::from_millis(200) }
    }
}

fn apply_with_retry(
    keys: &mut dyn KeyInjector,
    cmd: DeckCommand,
    policy: RetryPolicy,
) -> bool {
    let mut delay = policy.backoff;
    for attempt in 1..=policy.attempts {
        match keys.apply(cmd) {
            Ok(()) => return true,
            Err(e) if attempt < policy.attempts => {
                log::warn!("[deck] {cmd:?} failed (attempt {attempt}): {e} — retrying");
                thread::sleep(delay);
                delay *= 2;
            }
            Err(e) => {
                log::warn!("[deck] {cmd:?} dropped after {} attempts: {e}", policy.attempts);
            }
        }
    }
    false
}

// ════════════════════════════════════════════════════════════════════════════
// Deck — handle to the worker thread
// ════════════════════════════════════════════════════════════════════════════

/// Handle to the deck worker. Cheap to share by reference with the
/// dispatcher; dropping it without [`Deck::shutdown`] leaves the worker
/// to exit on channel disconnect.
pub struct Deck {
    cmd_tx: Sender<DeckCommand>,
}

impl Deck {
    /// Spawn the worker thread with the platform key backend.
    pub fn spawn() -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel::<DeckCommand>();
        thread::spawn(move || deck_thread(cmd_rx, open_injector()));
        Deck { cmd_tx }
    }

    fn send(&self, cmd: DeckCommand) {
        // Fire-and-forget; a dead worker just drops the action.
        let _ = self.cmd_tx.send(cmd);
    }

    pub fn shutdown(&self) {
        self.send(DeckCommand::Shutdown);
    }
}

impl DeckControl for Deck {
    fn play_pause(&self) {
        self.send(DeckCommand::PlayPause);
    }

    fn navigate(&self, dir: SlideDirection) {
        self.send(DeckCommand::Navigate(dir));
    }

    fn zoom(&self, dir: ZoomDirection) {
        self.send(DeckCommand::Zoom(dir));
    }

    fn press_enter(&self) {
        self.send(DeckCommand::PressEnter);
    }

    fn close_and_exit(&self) {
        self.send(DeckCommand::CloseAndExit);
    }
}

fn deck_thread(cmd_rx: Receiver<DeckCommand>, mut keys: Box<dyn KeyInjector>) {
    let policy = RetryPolicy::default();
    for cmd in cmd_rx {
        match cmd {
            DeckCommand::Shutdown => return,
            DeckCommand::CloseAndExit => {
                apply_with_retry(keys.as_mut(), cmd, policy);
                log::info!("[deck] host closed, worker exiting");
                return;
            }
            _ => {
                apply_with_retry(keys.as_mut(), cmd, policy);
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
