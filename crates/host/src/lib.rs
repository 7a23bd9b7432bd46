#![deny(unsafe_code)]
//! Offline host for the liquid reveal effect.
//!
//! Stands in for a browser page: scripted pointer gestures replace the
//! mouse, [`FrameDriver`] replaces the display refresh loop and the
//! `snapshot` module turns frames into PNG files. Both the CLI and tests
//! depend on this crate so the driving logic lives in one place.

pub mod driver;
pub mod gesture;
pub mod pixel;

#[cfg(feature = "png")]
pub mod snapshot;

pub use driver::{DriveSummary, FrameDriver};
pub use gesture::GestureKind;
