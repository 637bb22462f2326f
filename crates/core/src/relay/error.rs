use thiserror::Error;

/// Error taxonomy for a relay connection.
///
/// Every variant is terminal for its connection. The one recoverable
/// condition — a message without an image — is represented by the
/// optional field on [`ClientMessage`](crate::relay::message::ClientMessage),
/// not as an error.
#[derive(Error, Debug)]
pub enum RelayError {
    /// The underlying stream failed, or delivered a frame type the relay
    /// cannot carry.
    #[error("transport error: {0}")]
    Transport(String),

    /// The message was not a valid relay payload.
    #[error("invalid payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// Image codec failure: undecodable base64 or image bytes inbound,
    /// or an encoder failure outbound.
    #[error("frame codec failed: {0}")]
    Decode(String),

    /// Detector load or inference failure.
    #[error("model error: {0}")]
    Model(String),
}
