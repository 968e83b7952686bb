//! Air canvas: draw over a live camera feed with hand gestures.
//!
//! Per frame: landmarks -> finger states -> gesture -> drawing controller ->
//! canvas ops -> composited output + status. The pieces with state (the
//! controller and the canvas) live together in [`studio::Studio`].

pub mod args;
pub mod camera;
pub mod canvas;
pub mod config;
pub mod controller;
pub mod draw;
pub mod error;
pub mod gesture;
pub mod landmarks;
pub mod overlay;
pub mod palette;
pub mod stream;
pub mod studio;
pub mod tracker;
pub mod types;

pub use error::Error;
