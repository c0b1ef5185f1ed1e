//! # air_tracker
//!
//! Webcam hand-gesture controller for slide presentations, with a
//! debounced action dispatcher and a transparent annotation overlay.
//!
//! ## Pose → Action mapping
//!
//! Poses are written `(thumb, index, middle, ring, pinky)`, 1 = extended.
//!
//! | Pose | Action | Cooldown |
//! |---|---|---|
//! | `(1,1,0,0,0)` | Toggle playback (alt+p) | 2000 ms |
//! | `(1,0,0,0,0)` | Previous slide | 1000 ms, shared |
//! | `(0,0,0,0,1)` | Next slide | 1000 ms, shared |
//! | `(0,1,0,0,0)` | Draw with index fingertip | none (continuous) |
//! | `(0,1,1,0,0)` | Hover pointer, no ink | none (continuous) |
//! | `(0,1,1,1,0)` | Zoom in (ctrl+plus) | 1000 ms |
//! | `(0,1,1,1,1)` | Zoom out (ctrl+minus) | 3000 ms |
//! | `(0,0,1,1,1)` | Press enter | 2000 ms |
//! | `(0,1,0,0,1)` | Toggle annotation canvas | 2000 ms |
//! | `(1,0,0,0,1)` | Close host application and exit | 2000 ms |
//!
//! An alternate **pinch** backend classifies by thumb/index distance
//! instead of the pattern table, for detectors that report fingertip
//! positions but no reliable extension flags.
//!
//! ## Feature flags
//!
//! * (default) — **Simulation mode**: keyboard poses and the mouse
//!   pointer drive the whole pipeline, no hardware needed.
//! * `camera` — **Webcam mode**: captures frames via `nokhwa` and feeds
//!   them to a pluggable [`camera::HandDetector`].
//!
//! ### Simulation keyboard shortcuts
//!
//! | Key | Pose |
//! |---|---|
//! | `P` | Toggle playback |
//! | `Left` / `Right` | Previous / next slide |
//! | `Z` / `X` | Zoom in / out |
//! | `Enter` | Press enter |
//! | `C` | Toggle canvas |
//! | `D` / hold mouse | Draw (mouse position = fingertip) |
//! | `H` / hold | Hover pointer |
//! | `Q` | Close host and quit |
//! | `Escape` | Quit the tracker only |

pub mod app;
pub mod deck;
pub mod dispatch;
pub mod error;
pub mod landmark;
pub mod visualizer;

#[cfg(feature = "camera")]
pub mod camera;
