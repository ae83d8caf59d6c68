//! The failures a render can report.  Configuration problems are
//! caught before any worker starts; the rest describe invariant
//! violations or a worker that did not finish.

use failure::Fail;

/// Everything that can go wrong while configuring, sampling, merging,
/// or exporting a canvas.
#[derive(Debug, Fail, Clone, PartialEq)]
pub enum RenderError {
    /// The world rectangle must have a positive, finite width and height.
    #[fail(display = "invalid world region: {}x{}", width, height)]
    InvalidRegion {
        /// The rejected width.
        width: f64,
        /// The rejected height.
        height: f64,
    },

    /// Random selection is undefined over an empty set.
    #[fail(display = "the transformation set is empty")]
    EmptyTransformationSet,

    /// The symmetry order counts rotational copies, so it starts at one.
    #[fail(display = "symmetry order must be at least 1")]
    InvalidSymmetry,

    /// A canvas needs at least one pixel.
    #[fail(display = "canvas dimensions must be non-zero: {}x{}", width, height)]
    EmptyCanvas {
        /// The rejected width.
        width: usize,
        /// The rejected height.
        height: usize,
    },

    /// A grid coordinate fell outside the canvas.
    #[fail(
        display = "pixel ({}, {}) is outside a {}x{} canvas",
        x, y, width, height
    )]
    OutOfBounds {
        /// Requested column.
        x: usize,
        /// Requested row.
        y: usize,
        /// Canvas width.
        width: usize,
        /// Canvas height.
        height: usize,
    },

    /// Only canvases of the same shape can be merged.
    #[fail(
        display = "cannot merge a {}x{} canvas with a {}x{} canvas",
        _0, _1, _2, _3
    )]
    ShapeMismatch(usize, usize, usize, usize),

    /// A worker panicked.  Its canvas is discarded, never merged.
    #[fail(
        display = "worker {} (partition of {} samples) failed: {}",
        worker, samples, reason
    )]
    WorkerFailed {
        /// Index of the failed worker.
        worker: usize,
        /// Samples assigned to that worker's partition.
        samples: u64,
        /// The panic payload, if it was a string.
        reason: String,
    },

    /// Encoding or writing the output image failed.
    #[fail(display = "could not write image: {}", _0)]
    Image(String),
}
