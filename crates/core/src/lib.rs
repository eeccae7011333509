#![deny(unsafe_code)]
//! Core types for the flowfield generator.
//!
//! Provides the `FlowError` type, the `Xorshift64` PRNG, the row-major
//! `Field` grid, plane geometry (`Line`, `Rect`, `DVec2`), `Srgb` colors,
//! the `Canvas` drawing-command model, and the run configuration
//! (`Parameters`, `RunConfig`).

pub mod canvas;
pub mod color;
pub mod config;
pub mod error;
pub mod field;
pub mod geometry;
pub mod params;
pub mod prng;

pub use canvas::{Canvas, DrawCommand};
pub use color::Srgb;
pub use config::{Mode, RunConfig, WindowLayout};
pub use error::FlowError;
pub use field::Field;
pub use geometry::{scaled_to, Line, Rect};
pub use glam::DVec2;
pub use params::Parameters;
pub use prng::Xorshift64;
