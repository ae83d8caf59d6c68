#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Chaos-game renderer
//!
//! An iterated function system is a handful of maps from the plane to
//! itself.  The "chaos game" picks a random point, then over and over
//! picks one of the maps at random and applies it to the point.  After
//! a few steps the point is trapped on the system's attractor, and
//! every position it visits from then on is a sample of that
//! attractor's density.  Map each visited position to the nearest
//! integral pixel, count the visits, and the resulting image is the
//! fractal.
//!
//! Rendering is split across threads.  Each thread plays the game into
//! a private canvas with its own seeded random stream, and the
//! canvases are merged afterwards, weighting each pixel by how often it
//! was hit.  No pixel is ever shared between threads.

extern crate crossbeam;
extern crate failure;
extern crate image;
extern crate itertools;
extern crate log;
extern crate num;
extern crate num_cpus;
extern crate rand;
extern crate rand_pcg;

pub mod canvas;
pub mod errors;
pub mod export;
pub mod planes;
pub mod reduce;
pub mod render;
pub mod sampler;
pub mod transforms;

pub use canvas::{Canvas, Color, Pixel};
pub use errors::RenderError;
pub use export::{to_image, write_image, Tone};
pub use planes::{Point, Rect};
pub use render::{partition, render, CancelToken, ChaosRenderer, Rendered};
pub use transforms::{presets, Affine, Transformation, Transformations, Variation};
