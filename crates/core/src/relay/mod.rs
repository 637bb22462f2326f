pub mod alert;
pub mod error;
pub mod frame_processor;
pub mod message;
pub mod registry;
