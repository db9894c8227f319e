#![deny(unsafe_code)]
//! Core types and traits for tilemaker, the terrain scene synthesizer.
//!
//! Provides the `Scene` trait, the `Frame` primitive model (faces, paths,
//! polygons), the `Surface` drawing trait with its `SvgDocument`
//! implementation, `Hsla`/`Srgb` colors, the `RandomSource` trait with the
//! `Xorshift64` PRNG, `SceneSeed`, and parameter helpers.

pub mod color;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod params;
pub mod prng;
pub mod scene;
pub mod seed;
pub mod surface;

pub use color::{Hsla, Srgb};
pub use error::SceneError;
pub use frame::{Face, FaceKind, Frame, FrameMeta, Pane, Path, PathCommand, Polygon, Stroke, Window};
pub use geometry::DVec2;
pub use prng::{RandomSource, Xorshift64};
pub use scene::Scene;
pub use seed::SceneSeed;
pub use surface::{Element, Surface, SvgDocument};
