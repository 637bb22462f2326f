pub mod annotation;
pub mod detection;
pub mod imaging;
pub mod relay;
pub mod shared;
