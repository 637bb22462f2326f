/// Square input resolution the SSD detector expects.
pub const DETECTOR_INPUT_SIZE: u32 = 300;

/// Per-channel means subtracted during blob construction, BGR order.
pub const CHANNEL_MEANS_BGR: [f32; 3] = [104.0, 177.0, 123.0];

/// Minimum confidence for a detection to count as a face.
pub const CONFIDENCE_THRESHOLD: f32 = 0.5;

/// Annotation outline color (RGB).
pub const BOX_COLOR: [u8; 3] = [0, 255, 0];

/// Annotation outline stroke width in pixels.
pub const BOX_STROKE: u32 = 2;

/// Minimum interval between processed frames per connection.
pub const FRAME_INTERVAL_MS: u64 = 100;

pub const SSD_MODEL_NAME: &str = "res10_300x300_ssd.onnx";
pub const SSD_MODEL_URL: &str =
    "https://github.com/facerelay/models/releases/download/v0.1.0/res10_300x300_ssd.onnx";
