//! The accumulation surface.  A Canvas is a dense, row-major grid of
//! Pixels, each of which holds the running average of every color
//! contribution plotted into it along with the number of those
//! contributions.  A Canvas is owned by exactly one worker at a time
//! and has no interior synchronization.

use crate::errors::RenderError;

/// A color contribution, one float per channel.  Channels are nominally
/// in 0.0..=255.0 but nothing here enforces that.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Color {
    /// Red.
    pub r: f64,
    /// Green.
    pub g: f64,
    /// Blue.
    pub b: f64,
}

impl Color {
    /// Constructor.
    pub fn new(r: f64, g: f64, b: f64) -> Color {
        Color { r, g, b }
    }

    /// Full-intensity white, the default contribution.
    pub fn white() -> Color {
        Color::new(255.0, 255.0, 255.0)
    }
}

/// Accumulation state for one cell.  `r`, `g`, `b` are averages, not
/// sums; `hits` is how many contributions went into them.  When `hits`
/// is zero the channels are zero and carry no meaning.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Pixel {
    /// Mean red contribution.
    pub r: f64,
    /// Mean green contribution.
    pub g: f64,
    /// Mean blue contribution.
    pub b: f64,
    /// Number of contributions averaged.
    pub hits: u64,
}

impl Pixel {
    /// Fold one more contribution into the running average.
    #[inline]
    pub fn accumulate(&mut self, c: Color) {
        let n = (self.hits + 1) as f64;
        self.r += (c.r - self.r) / n;
        self.g += (c.g - self.g) / n;
        self.b += (c.b - self.b) / n;
        self.hits += 1;
    }

    /// Hit-weighted average of two pixels.  An untouched side
    /// contributes nothing, so two untouched pixels merge to an
    /// untouched pixel rather than dividing by zero.
    pub fn merge(&self, other: &Pixel) -> Pixel {
        if other.hits == 0 {
            return *self;
        }
        if self.hits == 0 {
            return *other;
        }
        let hits = self.hits + other.hits;
        let (wa, wb, total) = (self.hits as f64, other.hits as f64, hits as f64);
        Pixel {
            r: (self.r * wa + other.r * wb) / total,
            g: (self.g * wa + other.g * wb) / total,
            b: (self.b * wa + other.b * wb) / total,
            hits,
        }
    }

    /// The stored average, or None for an untouched pixel.
    pub fn color(&self) -> Option<Color> {
        if self.hits == 0 {
            None
        } else {
            Some(Color::new(self.r, self.g, self.b))
        }
    }
}

/// A fixed-size grid of Pixels.  `Clone` is a deep copy.
#[derive(Clone, Debug, PartialEq)]
pub struct Canvas {
    width: usize,
    height: usize,
    data: Vec<Pixel>,
}

impl Canvas {
    /// A blank canvas.  Both dimensions must be non-zero.
    pub fn new(width: usize, height: usize) -> Result<Canvas, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::EmptyCanvas { width, height });
        }
        Ok(Canvas {
            width,
            height,
            data: vec![Pixel::default(); width * height],
        })
    }

    /// Columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The pixels in row-major order.
    pub fn pixels(&self) -> &[Pixel] {
        &self.data
    }

    fn offset(&self, x: usize, y: usize) -> Result<usize, RenderError> {
        if x >= self.width || y >= self.height {
            return Err(RenderError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(y * self.width + x)
    }

    /// The pixel at column `x`, row `y`.
    pub fn pixel_at(&self, x: usize, y: usize) -> Result<&Pixel, RenderError> {
        let offset = self.offset(x, y)?;
        Ok(&self.data[offset])
    }

    /// Mutable access to the pixel at column `x`, row `y`.
    pub fn pixel_at_mut(&mut self, x: usize, y: usize) -> Result<&mut Pixel, RenderError> {
        let offset = self.offset(x, y)?;
        Ok(&mut self.data[offset])
    }

    /// Fold a contribution into the pixel at column `x`, row `y`.
    pub fn plot(&mut self, x: usize, y: usize, c: Color) -> Result<(), RenderError> {
        self.pixel_at_mut(x, y)?.accumulate(c);
        Ok(())
    }

    /// Sum of every pixel's hit count.
    pub fn total_hits(&self) -> u64 {
        self.data.iter().map(|p| p.hits).sum()
    }

    /// The largest hit count on the canvas.
    pub fn max_hits(&self) -> u64 {
        self.data.iter().map(|p| p.hits).max().unwrap_or(0)
    }

    /// True if nothing has been plotted.
    pub fn is_blank(&self) -> bool {
        self.data.iter().all(|p| p.hits == 0)
    }

    /// Pixel-wise hit-weighted merge of two same-shaped canvases.
    pub fn merge(&self, other: &Canvas) -> Result<Canvas, RenderError> {
        if self.width != other.width || self.height != other.height {
            return Err(RenderError::ShapeMismatch(
                self.width,
                self.height,
                other.width,
                other.height,
            ));
        }
        Ok(Canvas {
            width: self.width,
            height: self.height,
            data: self
                .data
                .iter()
                .zip(other.data.iter())
                .map(|(a, b)| a.merge(b))
                .collect(),
        })
    }
}
