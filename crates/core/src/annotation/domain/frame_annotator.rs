use crate::detection::domain::detection::PixelBox;
use crate::shared::frame::Frame;

/// Domain interface for drawing detection annotations onto a frame.
///
/// Implementations modify the frame in-place (`&mut Frame`) and are
/// infallible: boxes outside the frame are clamped or skipped, never an
/// error.
pub trait FrameAnnotator: Send {
    fn annotate(&self, frame: &mut Frame, boxes: &[PixelBox]);
}
