pub mod build;
pub mod render;
pub mod watch;
