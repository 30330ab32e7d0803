pub mod camera;
pub mod config;
pub mod interactive;
pub mod preview;
pub mod process;
pub mod sample;
pub mod tasks;
