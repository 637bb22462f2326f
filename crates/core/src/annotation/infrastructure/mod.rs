pub mod outline_renderer;
