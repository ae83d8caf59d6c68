//! The mappings the chaos game chooses between.  A Transformation is
//! any pure Point -> Point function that can be shared between
//! threads: a closure, a function pointer, or an `Affine` map with an
//! optional non-linear variation applied afterwards.

use rand::Rng;
use std::fmt;

use crate::errors::RenderError;
use crate::planes::Point;

/// A pure mapping of the world plane onto itself.
pub trait Transformation: Send + Sync {
    /// Map a point.
    fn apply(&self, p: Point) -> Point;
}

impl<F> Transformation for F
where
    F: Fn(Point) -> Point + Send + Sync,
{
    fn apply(&self, p: Point) -> Point {
        self(p)
    }
}

/// Non-linear functions applied after the affine step.  See Draves &
/// Reckase, "The Fractal Flame Algorithm", for the originals.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Variation {
    /// Identity.
    Linear,
    /// (sin x, sin y)
    Sinusoidal,
    /// Inversion through the unit circle.
    Spherical,
    /// Rotation by an angle proportional to r².
    Swirl,
    /// ((x - y)(x + y), 2xy) / r
    Horseshoe,
}

/// x' = a·x + b·y + c, y' = d·x + e·y + f, then the variation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Affine {
    /// Coefficients a through f.
    pub coefficients: [f64; 6],
    /// Applied after the linear step.
    pub variation: Variation,
}

impl Affine {
    /// A linear affine map.
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Affine {
        Affine {
            coefficients: [a, b, c, d, e, f],
            variation: Variation::Linear,
        }
    }

    /// Replace the variation.
    pub fn with_variation(mut self, variation: Variation) -> Affine {
        self.variation = variation;
        self
    }
}

impl Transformation for Affine {
    fn apply(&self, p: Point) -> Point {
        let [a, b, c, d, e, f] = self.coefficients;
        let (x, y) = (a * p.x + b * p.y + c, d * p.x + e * p.y + f);
        let r2 = x * x + y * y;
        match self.variation {
            Variation::Linear => Point::new(x, y),
            Variation::Sinusoidal => Point::new(x.sin(), y.sin()),
            // Both blow up at the origin; the result is non-finite and
            // falls outside every world rectangle.
            Variation::Spherical => Point::new(x / r2, y / r2),
            Variation::Horseshoe => {
                let r = r2.sqrt();
                Point::new((x - y) * (x + y) / r, 2.0 * x * y / r)
            }
            Variation::Swirl => {
                let (s, c) = (r2.sin(), r2.cos());
                Point::new(x * s - y * c, x * c + y * s)
            }
        }
    }
}

/// An ordered, non-empty, read-only set of transformations.
pub struct Transformations {
    maps: Vec<Box<dyn Transformation>>,
}

impl fmt::Debug for Transformations {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Transformations({})", self.maps.len())
    }
}

impl Transformations {
    /// Fails on an empty list; there is nothing to choose from.
    pub fn new(maps: Vec<Box<dyn Transformation>>) -> Result<Transformations, RenderError> {
        if maps.is_empty() {
            return Err(RenderError::EmptyTransformationSet);
        }
        Ok(Transformations { maps })
    }

    /// Convenience for a list of affine maps.
    pub fn from_affine(maps: Vec<Affine>) -> Result<Transformations, RenderError> {
        Transformations::new(
            maps.into_iter()
                .map(|m| Box::new(m) as Box<dyn Transformation>)
                .collect(),
        )
    }

    /// How many maps there are.  Never zero.
    pub fn len(&self) -> usize {
        self.maps.len()
    }

    /// True if the set holds no maps; never true for a constructed set.
    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    /// Choose a map uniformly by index using the caller's stream.
    #[inline]
    pub fn pick_random<R: Rng + ?Sized>(&self, rng: &mut R) -> &dyn Transformation {
        self.maps[rng.gen_range(0, self.maps.len())].as_ref()
    }

    /// Apply a randomly chosen map to `p`.
    #[inline]
    pub fn step<R: Rng + ?Sized>(&self, p: Point, rng: &mut R) -> Point {
        self.pick_random(rng).apply(p)
    }
}

/// Named transformation sets for the command line.
pub mod presets {
    use super::*;

    /// The names `by_name()` understands.
    pub const NAMES: &[&str] = &["demo", "sierpinski", "fern", "swirl"];

    /// Halve x; rotate a quarter turn; reflect through the origin.
    pub fn demo() -> Transformations {
        Transformations {
            maps: vec![
                Box::new(|p: Point| Point::new(p.x / 2.0, p.y)),
                Box::new(|p: Point| Point::new(-p.y, p.x)),
                Box::new(|p: Point| Point::new(-p.x, -p.y)),
            ],
        }
    }

    /// The Sierpinski triangle, with its corners at (0, 0), (1, 0), and
    /// (0.5, 1).
    pub fn sierpinski() -> Transformations {
        Transformations {
            maps: vec![
                Box::new(Affine::new(0.5, 0.0, 0.0, 0.0, 0.5, 0.0)),
                Box::new(Affine::new(0.5, 0.0, 0.5, 0.0, 0.5, 0.0)),
                Box::new(Affine::new(0.5, 0.0, 0.25, 0.0, 0.5, 0.5)),
            ],
        }
    }

    /// Barnsley's fern.  Selection is uniform, so the stem is
    /// overrepresented compared to the weighted original.
    pub fn fern() -> Transformations {
        Transformations {
            maps: vec![
                Box::new(Affine::new(0.0, 0.0, 0.0, 0.0, 0.16, 0.0)),
                Box::new(Affine::new(0.85, 0.04, 0.0, -0.04, 0.85, 1.6)),
                Box::new(Affine::new(0.2, -0.26, 0.0, 0.23, 0.22, 1.6)),
                Box::new(Affine::new(-0.15, 0.28, 0.0, 0.26, 0.24, 0.44)),
            ],
        }
    }

    /// A pair of contracting maps run through non-linear variations.
    pub fn swirl() -> Transformations {
        Transformations {
            maps: vec![
                Box::new(Affine::new(0.6, -0.4, 0.1, 0.4, 0.6, 0.0).with_variation(Variation::Swirl)),
                Box::new(
                    Affine::new(0.5, 0.0, -0.3, 0.0, 0.5, 0.2)
                        .with_variation(Variation::Sinusoidal),
                ),
                Box::new(
                    Affine::new(-0.4, 0.3, 0.0, -0.3, -0.4, -0.1)
                        .with_variation(Variation::Horseshoe),
                ),
            ],
        }
    }

    /// Look up a preset.
    pub fn by_name(name: &str) -> Option<Transformations> {
        match name {
            "demo" => Some(demo()),
            "sierpinski" => Some(sierpinski()),
            "fern" => Some(fern()),
            "swirl" => Some(swirl()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    #[test]
    fn empty_set_is_rejected() {
        assert_eq!(
            Transformations::new(vec![]).unwrap_err(),
            RenderError::EmptyTransformationSet
        );
    }

    #[test]
    fn closures_are_transformations() {
        let t = Transformations::new(vec![Box::new(|p: Point| Point::new(p.y, p.x))]).unwrap();
        let mut rng = Pcg64::seed_from_u64(1);
        assert_eq!(t.step(Point::new(1.0, 2.0), &mut rng), Point::new(2.0, 1.0));
    }

    #[test]
    fn pick_random_is_uniform_ish() {
        let t = Transformations::new(vec![
            Box::new(|_: Point| Point::new(0.0, 0.0)),
            Box::new(|_: Point| Point::new(1.0, 0.0)),
            Box::new(|_: Point| Point::new(2.0, 0.0)),
        ])
        .unwrap();
        let mut rng = Pcg64::seed_from_u64(7);
        let mut counts = [0usize; 3];
        for _ in 0..30_000 {
            let p = t.step(Point::new(9.0, 9.0), &mut rng);
            counts[p.x as usize] += 1;
        }
        for count in counts.iter() {
            assert!(*count > 9_000 && *count < 11_000, "{:?}", counts);
        }
    }

    #[test]
    fn pick_random_follows_the_seed() {
        let t = presets::demo();
        let run = |seed| {
            let mut rng = Pcg64::seed_from_u64(seed);
            let mut p = Point::new(0.3, 0.7);
            for _ in 0..50 {
                p = t.step(p, &mut rng);
            }
            p
        };
        assert_eq!(run(11), run(11));
    }

    #[test]
    fn affine_maps_points() {
        let m = Affine::new(0.5, 0.0, 0.5, 0.0, 0.5, 0.0);
        assert_eq!(m.apply(Point::new(1.0, 1.0)), Point::new(1.0, 0.5));
    }

    #[test]
    fn spherical_at_origin_is_not_finite() {
        let m = Affine::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0).with_variation(Variation::Spherical);
        let p = m.apply(Point::new(0.0, 0.0));
        assert!(!p.x.is_finite());
    }

    #[test]
    fn every_preset_resolves() {
        for name in presets::NAMES {
            assert!(!presets::by_name(name).unwrap().is_empty());
        }
        assert!(presets::by_name("mandelbrot").is_none());
    }
}
