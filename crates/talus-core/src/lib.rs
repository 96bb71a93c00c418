//! Shared coordinate math, configuration, noise, and error types for the
//! talus voxel engine.
//!
//! This crate has no dependency on storage, world, or generation — it's the
//! foundation every other `talus-*` crate builds on.

pub mod config;
pub mod coords;
pub mod error;
pub mod noise;

pub use config::Config;
pub use coords::{ChunkPos, LocalPos, WorldPos};
pub use error::{Error, Result};
pub use noise::NoiseGenerator;
