use serde::{Deserialize, Serialize};

/// Inbound client payload.
///
/// Unknown fields are ignored; an absent or null `image` means the
/// iteration is skipped without a response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClientMessage {
    #[serde(default)]
    pub image: Option<String>,
}

/// Outbound server payload: the annotated frame plus the face-count alert.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerMessage {
    pub image: String,
    pub alert: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_image() {
        let msg: ClientMessage = serde_json::from_str(r#"{"image": "aGVsbG8="}"#).unwrap();
        assert_eq!(msg.image.as_deref(), Some("aGVsbG8="));
    }

    #[test]
    fn test_parse_missing_image_is_none() {
        let msg: ClientMessage = serde_json::from_str("{}").unwrap();
        assert!(msg.image.is_none());
    }

    #[test]
    fn test_parse_null_image_is_none() {
        let msg: ClientMessage = serde_json::from_str(r#"{"image": null}"#).unwrap();
        assert!(msg.image.is_none());
    }

    #[test]
    fn test_parse_ignores_unknown_fields() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"image": "eA==", "ts": 123, "extra": "x"}"#).unwrap();
        assert_eq!(msg.image.as_deref(), Some("eA=="));
    }

    #[test]
    fn test_parse_malformed_json_fails() {
        assert!(serde_json::from_str::<ClientMessage>("not json").is_err());
        assert!(serde_json::from_str::<ClientMessage>(r#"{"image": 42}"#).is_err());
    }

    #[test]
    fn test_serialize_server_message_shape() {
        let msg = ServerMessage {
            image: "aW1n".to_string(),
            alert: "No face detected!".to_string(),
        };
        let value: serde_json::Value = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"image": "aW1n", "alert": "No face detected!"})
        );
    }

    #[test]
    fn test_serialize_empty_alert_kept() {
        // The alert field is always present, even when empty.
        let msg = ServerMessage {
            image: "aW1n".to_string(),
            alert: String::new(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""alert":"""#));
    }
}
