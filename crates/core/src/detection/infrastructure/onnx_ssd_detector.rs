/// ResNet-10 SSD face detector using ONNX Runtime via `ort`.
///
/// The pretrained 300×300 SSD emits a fixed-shape `[1, 1, N, 7]` tensor of
/// `[batch, class, confidence, x1, y1, x2, y2]` rows, with box coordinates
/// relative to the input image.
use std::path::Path;

use crate::detection::domain::detection::{Detection, RelativeBox};
use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::constants::{CHANNEL_MEANS_BGR, DETECTOR_INPUT_SIZE};
use crate::shared::frame::Frame;

/// Values per detection row in the SSD output tensor.
const ROW_LEN: usize = 7;

/// SSD face detector backed by an ONNX Runtime session.
///
/// The session is immutable after load and stateless across calls; one
/// instance is loaded per connection.
pub struct OnnxSsdDetector {
    session: ort::session::Session,
}

impl OnnxSsdDetector {
    /// Load the SSD ONNX model. Fails if the file is missing or malformed.
    pub fn new(model_path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let session = ort::session::Session::builder()?.commit_from_file(model_path)?;
        Ok(Self { session })
    }
}

impl FaceDetector for OnnxSsdDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>, Box<dyn std::error::Error>> {
        let input_tensor = blob_from_frame(frame, DETECTOR_INPUT_SIZE);
        let input_value = ort::value::Tensor::from_array(input_tensor)?;
        let outputs = self.session.run(ort::inputs![input_value])?;
        if outputs.len() == 0 {
            return Err("SSD model produced no outputs".into());
        }

        let tensor = outputs[0].try_extract_array::<f32>()?;
        let data = tensor.as_slice().ok_or("Cannot get detection slice")?;
        Ok(parse_detections(data))
    }
}

// ---------------------------------------------------------------------------
// Preprocessing
// ---------------------------------------------------------------------------

/// Resize to `size × size` and build the mean-subtracted BGR NCHW tensor.
///
/// Matches the SSD's training-time preprocessing: bilinear resize, BGR
/// channel order, per-channel mean subtraction, no scale factor.
fn blob_from_frame(frame: &Frame, size: u32) -> ndarray::Array4<f32> {
    let img = image::RgbImage::from_raw(frame.width(), frame.height(), frame.data().to_vec())
        .expect("Frame data length must match dimensions");
    let resized = image::imageops::resize(&img, size, size, image::imageops::FilterType::Triangle);

    let s = size as usize;
    let mut tensor = ndarray::Array4::<f32>::zeros((1, 3, s, s));
    for y in 0..s {
        for x in 0..s {
            let p = resized.get_pixel(x as u32, y as u32);
            tensor[[0, 0, y, x]] = p[2] as f32 - CHANNEL_MEANS_BGR[0]; // B
            tensor[[0, 1, y, x]] = p[1] as f32 - CHANNEL_MEANS_BGR[1]; // G
            tensor[[0, 2, y, x]] = p[0] as f32 - CHANNEL_MEANS_BGR[2]; // R
        }
    }
    tensor
}

// ---------------------------------------------------------------------------
// Output parsing
// ---------------------------------------------------------------------------

/// Parse `[batch, class, confidence, x1, y1, x2, y2]` rows in model order.
fn parse_detections(data: &[f32]) -> Vec<Detection> {
    data.chunks_exact(ROW_LEN)
        .map(|row| Detection {
            confidence: row[2],
            bounds: RelativeBox {
                x1: row[3],
                y1: row[4],
                x2: row[5],
                y2: row[6],
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn solid_frame(width: u32, height: u32, rgb: [u8; 3]) -> Frame {
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for _ in 0..(width * height) {
            data.extend_from_slice(&rgb);
        }
        Frame::new(data, width, height, 3)
    }

    #[test]
    fn test_blob_shape() {
        let frame = solid_frame(200, 100, [128, 128, 128]);
        let tensor = blob_from_frame(&frame, 300);
        assert_eq!(tensor.shape(), &[1, 3, 300, 300]);
    }

    #[test]
    fn test_blob_subtracts_channel_means() {
        // A frame whose RGB values equal the means (in BGR order: B=104,
        // G=177, R=123) must produce an all-zero blob.
        let frame = solid_frame(50, 50, [123, 177, 104]);
        let tensor = blob_from_frame(&frame, 300);
        for c in 0..3 {
            assert_relative_eq!(tensor[[0, c, 0, 0]], 0.0);
            assert_relative_eq!(tensor[[0, c, 150, 150]], 0.0);
        }
    }

    #[test]
    fn test_blob_channel_order_is_bgr() {
        // Pure red input: only the last (R) channel should be bright.
        let frame = solid_frame(50, 50, [255, 0, 0]);
        let tensor = blob_from_frame(&frame, 300);
        assert_relative_eq!(tensor[[0, 0, 10, 10]], 0.0 - CHANNEL_MEANS_BGR[0]);
        assert_relative_eq!(tensor[[0, 1, 10, 10]], 0.0 - CHANNEL_MEANS_BGR[1]);
        assert_relative_eq!(tensor[[0, 2, 10, 10]], 255.0 - CHANNEL_MEANS_BGR[2]);
    }

    #[test]
    fn test_parse_detections_maps_rows() {
        let data = [
            0.0, 1.0, 0.9, 0.1, 0.2, 0.3, 0.4, //
            0.0, 1.0, 0.2, 0.5, 0.6, 0.7, 0.8,
        ];
        let dets = parse_detections(&data);
        assert_eq!(dets.len(), 2);
        assert_relative_eq!(dets[0].confidence, 0.9);
        assert_relative_eq!(dets[0].bounds.x1, 0.1);
        assert_relative_eq!(dets[0].bounds.y2, 0.4);
        assert_relative_eq!(dets[1].confidence, 0.2);
        assert_relative_eq!(dets[1].bounds.x2, 0.7);
    }

    #[test]
    fn test_parse_detections_preserves_model_order() {
        let data = [
            0.0, 1.0, 0.1, 0.0, 0.0, 0.1, 0.1, //
            0.0, 1.0, 0.8, 0.0, 0.0, 0.2, 0.2,
        ];
        let dets = parse_detections(&data);
        // Low-confidence row stays first; ordering is the model's, not ours.
        assert_relative_eq!(dets[0].confidence, 0.1);
        assert_relative_eq!(dets[1].confidence, 0.8);
    }

    #[test]
    fn test_parse_detections_empty_output() {
        assert!(parse_detections(&[]).is_empty());
    }

    #[test]
    fn test_parse_detections_ignores_partial_row() {
        let data = [0.0, 1.0, 0.9, 0.1, 0.2, 0.3, 0.4, 0.0, 1.0];
        assert_eq!(parse_detections(&data).len(), 1);
    }

    #[test]
    fn test_new_missing_model_fails() {
        assert!(OnnxSsdDetector::new(Path::new("/nonexistent/model.onnx")).is_err());
    }
}
