use std::io::Cursor;

use crate::imaging::domain::frame_decoder::FrameDecoder;
use crate::imaging::domain::frame_encoder::FrameEncoder;
use crate::shared::frame::Frame;

/// Default JPEG quality for outbound frames.
const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Image decode/encode backed by the `image` crate.
///
/// Decoding sniffs the container format from the byte stream (JPEG and
/// PNG in practice); encoding always produces JPEG.
pub struct ImageCodec {
    jpeg_quality: u8,
}

impl ImageCodec {
    pub fn new(jpeg_quality: u8) -> Self {
        Self { jpeg_quality }
    }
}

impl Default for ImageCodec {
    fn default() -> Self {
        Self::new(DEFAULT_JPEG_QUALITY)
    }
}

impl FrameDecoder for ImageCodec {
    fn decode(&self, bytes: &[u8]) -> Result<Frame, Box<dyn std::error::Error>> {
        let img = image::load_from_memory(bytes)?.to_rgb8();
        let (width, height) = img.dimensions();
        Ok(Frame::new(img.into_raw(), width, height, 3))
    }
}

impl FrameEncoder for ImageCodec {
    fn encode(&self, frame: &Frame) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
        let img = image::RgbImage::from_raw(frame.width(), frame.height(), frame.data().to_vec())
            .ok_or("Failed to create image from frame data")?;

        let mut out = Cursor::new(Vec::new());
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, self.jpeg_quality);
        img.write_with_encoder(encoder)?;
        Ok(out.into_inner())
    }
}
