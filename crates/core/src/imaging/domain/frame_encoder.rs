use crate::shared::frame::Frame;

/// Encodes a frame as compressed image bytes.
pub trait FrameEncoder: Send {
    fn encode(&self, frame: &Frame) -> Result<Vec<u8>, Box<dyn std::error::Error>>;
}
