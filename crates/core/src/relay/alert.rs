use std::fmt;

/// Face-count anomaly summary for a single frame.
///
/// Rendered into the outbound `alert` field: exactly one face is the
/// expected case and renders as the empty string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceAlert {
    /// Exactly one face: nothing to report.
    None,
    NoFace,
    Multiple(usize),
}

impl FaceAlert {
    pub fn from_count(count: usize) -> Self {
        match count {
            0 => FaceAlert::NoFace,
            1 => FaceAlert::None,
            n => FaceAlert::Multiple(n),
        }
    }
}

impl fmt::Display for FaceAlert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaceAlert::None => Ok(()),
            FaceAlert::NoFace => write!(f, "No face detected!"),
            FaceAlert::Multiple(n) => write!(f, "Multiple faces detected: {n}"),
        }
    }
}
