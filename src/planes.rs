//! Contains the geometry shared by every stage of a render: points on
//! the world plane, the rectangle of the world plane we care about,
//! and the PlaneMapper that relates that rectangle to the integral
//! grid of a canvas.
use num::Complex;

use crate::errors::RenderError;

/// An x, y location on the real (world) plane.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Constructor.
    pub fn new(x: f64, y: f64) -> Point {
        Point { x, y }
    }

    /// Rotate this point about the origin by a unit rotor; see
    /// `rotors()`.  Treating the point as a complex number makes this
    /// a single multiplication.
    #[inline]
    pub fn rotate(self, rotor: Complex<f64>) -> Point {
        let z = Complex::new(self.x, self.y) * rotor;
        Point { x: z.re, y: z.im }
    }
}

/// The unit complex numbers for the `symmetry` evenly spaced angles
/// 2πk/symmetry, k = 0..symmetry.  The first is always exactly 1.
pub fn rotors(symmetry: usize) -> Vec<Complex<f64>> {
    (0..symmetry)
        .map(|k| {
            if k == 0 {
                Complex::new(1.0, 0.0)
            } else {
                let theta = 2.0 * std::f64::consts::PI * (k as f64) / (symmetry as f64);
                Complex::from_polar(&1.0, &theta)
            }
        })
        .collect()
}

/// A region of the world plane: an origin at its lower-left corner, a
/// width and a height.  Both dimensions are always positive.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Lower edge.
    pub y: f64,
    /// Width; always > 0.
    pub width: f64,
    /// Height; always > 0.
    pub height: f64,
}

impl Rect {
    /// Constructor.  Fails unless width and height are positive and
    /// every edge of the rectangle is finite.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Result<Rect, RenderError> {
        let edges = [x, y, x + width, y + height];
        if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite())
            || !edges.iter().all(|e| e.is_finite())
        {
            return Err(RenderError::InvalidRegion { width, height });
        }
        Ok(Rect {
            x,
            y,
            width,
            height,
        })
    }

    /// Inclusive on all four edges.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }
}

/// Relates a world rectangle to an integral plane of `width` x
/// `height` cells whose origin is 0,0.
#[derive(Copy, Clone, Debug)]
pub struct PlaneMapper {
    /// The world rectangle.
    pub world: Rect,
    /// Columns in the integral plane.
    pub width: usize,
    /// Rows in the integral plane.
    pub height: usize,
}

impl PlaneMapper {
    /// Constructor.
    pub fn new(world: Rect, width: usize, height: usize) -> PlaneMapper {
        PlaneMapper {
            world,
            width,
            height,
        }
    }

    /// Map a world point to the cell that contains it, or None if the
    /// point is off the world rectangle or lands past the last row or
    /// column.  The far edges of the world are inside `contains()` but
    /// map to `width` or `height`, one past the grid, and are dropped
    /// here.
    pub fn point_to_pixel(&self, p: Point) -> Option<(usize, usize)> {
        if !self.world.contains(p) {
            return None;
        }
        let left = ((p.x - self.world.x) / self.world.width * (self.width as f64)).floor();
        let top = ((p.y - self.world.y) / self.world.height * (self.height as f64)).floor();
        if left < 0.0 || top < 0.0 {
            return None;
        }
        let (left, top) = (left as usize, top as usize);
        if left >= self.width || top >= self.height {
            return None;
        }
        Some((left, top))
    }
}
