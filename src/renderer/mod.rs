//! Canvas 2D rendering module
//!
//! Draws a [`Snapshot`](crate::Snapshot) each frame. Holds no game state.

pub mod canvas;

pub use canvas::CanvasRenderer;
