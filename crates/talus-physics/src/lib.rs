//! The cellular gravity/fluid physics step run once per tick over resident,
//! generated chunks.

pub mod step;

pub use step::{step, step_chunk};
