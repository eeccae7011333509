#![deny(unsafe_code)]
//! Noise-driven flow field.
//!
//! Pipeline, leaf to root: [`noise`] builds a smoothed multi-octave grid,
//! [`vector_field`] turns it into per-cell forces, [`particle`] advects
//! particles through those forces and records their traces, [`clip`] and
//! [`window`] crop the traces into framed strips, and [`drawing`] sequences
//! it all for one `RunConfig`.
//!
//! With the `parallel` feature (on by default) particle passes run on the
//! rayon thread pool. Output is identical either way.

pub mod clip;
pub mod drawing;
pub mod noise;
pub mod particle;
pub mod vector_field;
pub mod window;

pub use clip::{CohenSutherland, Outcode};
pub use drawing::{Artwork, Drawing, FlowTrace};
pub use particle::{Particle, Phase};
pub use vector_field::{ForceField, VectorField};
pub use window::{clip_into_windows, Window};
