//! # Gardenmap Core
//!
//! Core types shared by the gardenmap crates: world-space geometry, piece
//! edges, sampled colours, editor constants and the unified error type.

pub mod constants;
pub mod error;
pub mod geometry;

pub use error::{Error, Result, StorageError, UploadError};
pub use geometry::{Bounds, Edge, Point, Rgb, Size};
