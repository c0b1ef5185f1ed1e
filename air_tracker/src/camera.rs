//! Webcam capture source (feature = "camera").
//!
//! Opens the device up front so camera unavailability surfaces as an
//! [`Error::Camera`] before any frame processing starts, then streams
//! frames through an external [`HandDetector`] on the source thread.
//! Dropping the event receiver stops the thread, which drops the
//! capture and releases the device.

use std::sync::mpsc::Sender;
use std::time::Duration;

use image::{ImageBuffer, Rgb};
use nokhwa::{
    pixel_format::RgbFormat,
    utils::{
        CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
    },
    Camera,
};

use hand_gesture::HandFrame;

use crate::error::Error;
use crate::landmark::{FrameEvent, LandmarkSource};

/// Decoded RGB camera frame.
pub type RgbFrame = ImageBuffer<Rgb<u8>, Vec<u8>>;

/// The external hand-landmark capability: per frame, zero-or-one hand's
/// finger-extension vector and landmark coordinates (normalized to the
/// frame). Where a detector reports several hands, it must return the
/// first in its own reported order.
pub trait HandDetector: Send + 'static {
    fn detect(&mut self, frame: &RgbFrame) -> Option<HandFrame>;
}

// ════════════════════════════════════════════════════════════════════════════
// CameraCapture
// ════════════════════════════════════════════════════════════════════════════

/// Thin wrapper over `nokhwa` that owns the open stream.
pub struct CameraCapture {
    cam:    Camera,
    width:  u32,
    height: u32,
}

impl CameraCapture {
    /// Open device `index` near the requested resolution. A missing
    /// camera fails here, before the gesture loop exists.
    pub fn open(index: u32, width: u32, height: u32) -> Result<Self, Error> {
        let wanted = CameraFormat::new(
            Resolution::new(width, height),
            FrameFormat::YUYV,
            30,
        );
        let request = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(wanted));

        let mut cam = Camera::new(CameraIndex::Index(index), request)
            .map_err(|e| Error::Camera(format!("open device {index}: {e}")))?;
        cam.open_stream()
            .map_err(|e| Error::Camera(format!("start stream: {e}")))?;

        // The stream may settle on a nearby resolution.
        let actual = cam.resolution();
        log::info!("[camera] device {index} streaming at {}x{}", actual.width(), actual.height());

        Ok(CameraCapture { cam, width: actual.width(), height: actual.height() })
    }

    /// Block for the next frame and decode it to RGB.
    pub fn next_frame(&mut self) -> Result<RgbFrame, Error> {
        let frame = self
            .cam
            .frame()
            .map_err(|e| Error::Camera(format!("grab frame: {e}")))?;
        frame
            .decode_image::<RgbFormat>()
            .map_err(|e| Error::Camera(format!("decode frame: {e}")))
    }

    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// CameraLandmarkSource
// ════════════════════════════════════════════════════════════════════════════

/// Landmark source backed by a live capture plus an external detector.
pub struct CameraLandmarkSource {
    capture:  CameraCapture,
    detector: Box<dyn HandDetector>,
}

impl CameraLandmarkSource {
    pub fn new(capture: CameraCapture, detector: Box<dyn HandDetector>) -> Self {
        CameraLandmarkSource { capture, detector }
    }
}

impl LandmarkSource for CameraLandmarkSource {
    fn run(mut self: Box<Self>, tx: Sender<FrameEvent>) {
        loop {
            let frame = match self.capture.next_frame() {
                Ok(f) => f,
                Err(e) => {
                    // Transient grab failures are logged and skipped;
                    // the loop keeps its cadence.
                    log::warn!("[camera] {e}");
                    std::thread::sleep(Duration::from_millis(30));
                    continue;
                }
            };
            let hand = self.detector.detect(&frame);
            if tx.send(FrameEvent::Hand(hand)).is_err() {
                // Receiver gone: drop the capture, releasing the device.
                return;
            }
        }
    }
}
