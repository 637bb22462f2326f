use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use crate::annotation::domain::frame_annotator::FrameAnnotator;
use crate::annotation::infrastructure::outline_renderer::OutlineRenderer;
use crate::detection::domain::detection::PixelBox;
use crate::detection::domain::face_detector::FaceDetector;
use crate::imaging::domain::frame_decoder::FrameDecoder;
use crate::imaging::domain::frame_encoder::FrameEncoder;
use crate::imaging::infrastructure::image_codec::ImageCodec;
use crate::relay::alert::FaceAlert;
use crate::relay::error::RelayError;
use crate::relay::message::ServerMessage;
use crate::shared::constants::CONFIDENCE_THRESHOLD;

/// Per-frame relay pipeline: decode → detect → annotate → encode.
///
/// Owns the connection's detector; one processor per connection, invoked
/// strictly sequentially — exactly one in-flight cycle at a time.
pub struct FrameProcessor {
    detector: Box<dyn FaceDetector>,
    decoder: Box<dyn FrameDecoder>,
    encoder: Box<dyn FrameEncoder>,
    annotator: Box<dyn FrameAnnotator>,
    confidence: f32,
}

impl FrameProcessor {
    pub fn new(
        detector: Box<dyn FaceDetector>,
        decoder: Box<dyn FrameDecoder>,
        encoder: Box<dyn FrameEncoder>,
        annotator: Box<dyn FrameAnnotator>,
        confidence: f32,
    ) -> Self {
        Self {
            detector,
            decoder,
            encoder,
            annotator,
            confidence,
        }
    }

    /// Build a processor with the standard JPEG codec and green outline
    /// renderer.
    pub fn with_defaults(detector: Box<dyn FaceDetector>, confidence: f32) -> Self {
        Self::new(
            detector,
            Box::new(ImageCodec::default()),
            Box::new(ImageCodec::default()),
            Box::new(OutlineRenderer::default()),
            confidence,
        )
    }

    /// Run one receive→process cycle over a base64-encoded image payload.
    ///
    /// Detections at or below the confidence threshold are excluded from
    /// both the face count and the drawn boxes. Annotation happens on the
    /// original frame, not the detector's resized input.
    pub fn process(&mut self, image_base64: &str) -> Result<ServerMessage, RelayError> {
        let bytes = BASE64
            .decode(image_base64)
            .map_err(|e| RelayError::Decode(e.to_string()))?;
        let mut frame = self
            .decoder
            .decode(&bytes)
            .map_err(|e| RelayError::Decode(e.to_string()))?;

        let detections = self
            .detector
            .detect(&frame)
            .map_err(|e| RelayError::Model(e.to_string()))?;

        let boxes: Vec<PixelBox> = detections
            .iter()
            .filter(|d| d.confidence > self.confidence)
            .map(|d| d.bounds.to_pixels(frame.width(), frame.height()))
            .collect();
        let face_count = boxes.len();

        self.annotator.annotate(&mut frame, &boxes);

        let jpeg = self
            .encoder
            .encode(&frame)
            .map_err(|e| RelayError::Decode(e.to_string()))?;

        Ok(ServerMessage {
            image: BASE64.encode(&jpeg),
            alert: FaceAlert::from_count(face_count).to_string(),
        })
    }
}
