use crate::shared::frame::Frame;

/// Decodes compressed image bytes into an RGB frame.
pub trait FrameDecoder: Send {
    fn decode(&self, bytes: &[u8]) -> Result<Frame, Box<dyn std::error::Error>>;
}
