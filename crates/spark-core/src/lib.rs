//! Spark Core - Foundational types for the Spark particle engine
//!
//! This crate provides the types every other Spark crate depends on:
//! - `Vec2` - Surface-space positions and velocities
//! - `Color` - Opaque color tokens handed through to the renderer
//! - Error types and Result alias

mod error;
mod types;

pub use error::{Result, SparkError};
pub use types::{Color, Vec2};
