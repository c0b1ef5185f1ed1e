// Application-level failures. Camera problems are fatal before the
// frame loop ever starts; everything downstream of setup degrades and
// logs instead of erroring.

use std::fmt::{self, Display};

#[derive(Debug)]
pub enum Error {
    /// Creating or updating the output window failed.
    Window(String),
    /// Opening the capture device or pulling a frame failed.
    Camera(String),
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Window(s) => write!(f, "window error: {s}"),
            Error::Camera(s) => write!(f, "camera error: {s}"),
        }
    }
}

impl std::error::Error for Error {}
