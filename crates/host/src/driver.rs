//! Fixed-rate frame loop that feeds a gesture into a controller.

use crate::gesture::GestureKind;
use liquid_reveal_core::{EffectController, EffectError, FrameStats, Framebuffer};
use std::time::Duration;

pub const DEFAULT_FPS: u32 = 60;

/// Pointer samples delivered between consecutive frames.
pub const DEFAULT_SAMPLES_PER_FRAME: u32 = 4;

/// What happened during a [`FrameDriver::drive`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveSummary {
    /// Frames actually stepped.
    pub frames: u64,
    /// Pointer samples delivered to the controller.
    pub samples: u64,
    /// Largest intensity seen after any frame.
    pub peak_intensity: f64,
    /// Controller state after the last frame.
    pub last: FrameStats,
}

/// Runs a controller at a fixed frame rate.
///
/// Pointer samples arrive faster than frames, so several land between two
/// frame steps and only the latest of them reaches the trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameDriver {
    fps: u32,
    samples_per_frame: u32,
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            samples_per_frame: DEFAULT_SAMPLES_PER_FRAME,
        }
    }
}

impl FrameDriver {
    /// Returns `EffectError::InvalidParam` if either rate is zero.
    pub fn new(fps: u32, samples_per_frame: u32) -> Result<Self, EffectError> {
        if fps == 0 {
            return Err(EffectError::InvalidParam {
                name: "fps".into(),
                reason: "must be at least 1".into(),
            });
        }
        if samples_per_frame == 0 {
            return Err(EffectError::InvalidParam {
                name: "samples_per_frame".into(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(Self {
            fps,
            samples_per_frame,
        })
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn samples_per_frame(&self) -> u32 {
        self.samples_per_frame
    }

    /// Timestamp of frame `frame`, counted from zero at the start.
    pub fn frame_time(&self, frame: u64) -> Duration {
        let nanos = u128::from(frame) * 1_000_000_000 / u128::from(self.fps);
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }

    /// Steps `controller` through `frames` frames of `gesture`.
    ///
    /// Stops early if the controller has been stopped.
    pub fn drive(
        &self,
        controller: &mut EffectController,
        gesture: GestureKind,
        frames: u64,
    ) -> DriveSummary {
        let mut summary = DriveSummary {
            frames: 0,
            samples: 0,
            peak_intensity: controller.intensity(),
            last: controller.stats(),
        };
        for frame in 1..=frames {
            if controller.is_stopped() {
                log::debug!("controller stopped after {} frames", summary.frames);
                break;
            }
            let prev = self.frame_time(frame - 1);
            let now = self.frame_time(frame);
            for j in 1..=self.samples_per_frame {
                let at = prev + (now - prev) * j / self.samples_per_frame;
                if let Some(p) = gesture.position(at) {
                    controller.on_pointer_move(p, at);
                    summary.samples += 1;
                }
            }
            let stats = controller.on_frame(now);
            summary.frames += 1;
            summary.peak_intensity = summary.peak_intensity.max(stats.intensity);
            summary.last = stats;
        }
        log::info!(
            "drove {} for {} frames ({} samples, peak intensity {:.3})",
            gesture.name(),
            summary.frames,
            summary.samples,
            summary.peak_intensity
        );
        summary
    }

    /// Drives the gesture, then renders the final frame at `width * height`.
    pub fn run(
        &self,
        controller: &mut EffectController,
        gesture: GestureKind,
        frames: u64,
        width: usize,
        height: usize,
    ) -> Result<(Framebuffer, DriveSummary), EffectError> {
        let summary = self.drive(controller, gesture, frames);
        let frame = controller.render(width, height)?;
        Ok((frame, summary))
    }
}
