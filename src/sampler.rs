//! One worker's share of a render.  A Sampler owns a private canvas
//! and a private, seeded random stream, and plays the chaos game into
//! that canvas: pick a starting point in the world, then repeatedly
//! apply a randomly chosen transformation, plotting every rotational
//! copy of the point that lands on the canvas.

use log::error;
use num::Complex;
use rand::distributions::{Distribution, Uniform};
use rand::SeedableRng;
use rand_pcg::Pcg64;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::canvas::{Canvas, Color};
use crate::planes::{rotors, PlaneMapper, Point, Rect};
use crate::transforms::Transformations;

/// The parameters every worker shares.  Nothing in here is mutated
/// once the render starts.
#[derive(Debug)]
pub struct Walk<'a> {
    /// The region of the world plane the canvas covers.
    pub world: Rect,
    /// The maps to choose between.
    pub transformations: &'a Transformations,
    /// Steps taken per trajectory.
    pub iterations: usize,
    /// Rotational copies plotted per step; at least 1.
    pub symmetry: usize,
    /// The color each accepted point contributes.
    pub color: Color,
}

/// A worker's private state.
pub struct Sampler<'a> {
    walk: &'a Walk<'a>,
    rng: Pcg64,
    canvas: Canvas,
    plane: PlaneMapper,
    rotors: Vec<Complex<f64>>,
    starts: (Uniform<f64>, Uniform<f64>),
}

impl<'a> Sampler<'a> {
    /// Takes ownership of the canvas it will draw into.  Every random
    /// draw, including starting points, comes from the seeded stream,
    /// so a Sampler's output is a pure function of its inputs.
    pub fn new(walk: &'a Walk<'a>, canvas: Canvas, seed: u64) -> Self {
        let plane = PlaneMapper::new(walk.world, canvas.width(), canvas.height());
        let w = walk.world;
        Sampler {
            walk,
            rng: Pcg64::seed_from_u64(seed),
            canvas,
            plane,
            rotors: rotors(walk.symmetry),
            starts: (
                Uniform::new_inclusive(w.x, w.x + w.width),
                Uniform::new_inclusive(w.y, w.y + w.height),
            ),
        }
    }

    fn start(&mut self) -> Point {
        Point::new(
            self.starts.0.sample(&mut self.rng),
            self.starts.1.sample(&mut self.rng),
        )
    }

    /// Plot every rotational copy of `p` that lands on the canvas, and
    /// return how many did.
    #[inline]
    fn plot(&mut self, p: Point) -> usize {
        let mut plotted = 0;
        for rotor in &self.rotors {
            let pr = p.rotate(*rotor);
            // Copies off the world, or on its far edges, are skipped
            // one at a time; the other angles still get plotted.
            if let Some((x, y)) = self.plane.point_to_pixel(pr) {
                match self.canvas.plot(x, y, self.walk.color) {
                    Ok(()) => plotted += 1,
                    Err(e) => error!("mapper and canvas disagree: {}", e),
                }
            }
        }
        plotted
    }

    /// Run one trajectory from a fresh random start.  Returns the
    /// number of pixel updates made.
    pub fn trajectory(&mut self) -> usize {
        let mut p = self.start();
        let mut plotted = 0;
        for _ in 0..self.walk.iterations {
            p = self.walk.transformations.step(p, &mut self.rng);
            plotted += self.plot(p);
        }
        plotted
    }

    /// Run up to `samples` trajectories, checking `cancel` before each
    /// one.  Returns the number of trajectories actually completed; a
    /// trajectory is never abandoned half-way.
    pub fn run(&mut self, samples: u64, cancel: &AtomicBool) -> u64 {
        for done in 0..samples {
            if cancel.load(Ordering::Relaxed) {
                return done;
            }
            self.trajectory();
        }
        samples
    }

    /// Surrender the canvas.
    pub fn into_canvas(self) -> Canvas {
        self.canvas
    }
}

/// Render `samples` trajectories into a copy of `canvas` with one
/// seeded stream, on the calling thread.
pub fn sample(walk: &Walk, canvas: &Canvas, samples: u64, seed: u64) -> Canvas {
    let mut sampler = Sampler::new(walk, canvas.clone(), seed);
    sampler.run(samples, &AtomicBool::new(false));
    sampler.into_canvas()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> Transformations {
        Transformations::new(vec![Box::new(|p: Point| p)]).unwrap()
    }

    fn walk(transformations: &Transformations, symmetry: usize) -> Walk {
        Walk {
            world: Rect::new(-1.0, -1.0, 2.0, 2.0).unwrap(),
            transformations,
            iterations: 1,
            symmetry,
            color: Color::white(),
        }
    }

    #[test]
    fn zero_samples_leave_the_canvas_blank() {
        let t = identity();
        let w = walk(&t, 1);
        let canvas = Canvas::new(16, 16).unwrap();
        assert_eq!(sample(&w, &canvas, 0, 1), canvas);
    }

    #[test]
    fn identity_walk_plots_every_sample_once() {
        let t = identity();
        let w = walk(&t, 1);
        let out = sample(&w, &Canvas::new(32, 32).unwrap(), 1000, 3);
        // A start exactly on the far edge is contained but off-grid.
        assert!(out.total_hits() <= 1000 && out.total_hits() >= 990);
        assert!(out.pixels().iter().filter(|p| p.hits > 0).all(|p| p.hits >= 1));
        assert_eq!(out.pixels().len(), 32 * 32);
    }

    #[test]
    fn same_seed_same_canvas() {
        let t = crate::transforms::presets::demo();
        let w = Walk {
            world: Rect::new(-2.0, -2.0, 4.0, 4.0).unwrap(),
            transformations: &t,
            iterations: 20,
            symmetry: 3,
            color: Color::new(200.0, 100.0, 50.0),
        };
        let canvas = Canvas::new(40, 40).unwrap();
        let a = sample(&w, &canvas, 500, 42);
        let b = sample(&w, &canvas, 500, 42);
        assert_eq!(a, b);
        let c = sample(&w, &canvas, 500, 43);
        assert_ne!(a, c);
    }

    #[test]
    fn symmetry_fans_out_at_most_s_copies() {
        let t = identity();
        let w = walk(&t, 4);
        let mut sampler = Sampler::new(&w, Canvas::new(64, 64).unwrap(), 9);
        for _ in 0..200 {
            let plotted = sampler.trajectory();
            assert!(plotted <= 4);
        }
        // A point near the centre keeps all four copies on the world.
        let mut sampler = Sampler::new(&w, Canvas::new(64, 64).unwrap(), 9);
        assert_eq!(sampler.plot(Point::new(0.3, 0.1)), 4);
        let canvas = sampler.into_canvas();
        assert_eq!(canvas.total_hits(), 4);
        assert_eq!(canvas.pixels().iter().filter(|p| p.hits > 0).count(), 4);
    }

    #[test]
    fn rotated_copies_off_the_world_are_skipped_individually() {
        let t = identity();
        let w = Walk {
            world: Rect::new(0.0, 0.0, 1.0, 1.0).unwrap(),
            ..walk(&t, 4)
        };
        let mut sampler = Sampler::new(&w, Canvas::new(8, 8).unwrap(), 1);
        // Only the unrotated copy stays in the first quadrant.
        assert_eq!(sampler.plot(Point::new(0.5, 0.5)), 1);
    }

    #[test]
    fn cancellation_stops_at_a_trajectory_boundary() {
        let t = identity();
        let w = walk(&t, 1);
        let mut sampler = Sampler::new(&w, Canvas::new(8, 8).unwrap(), 1);
        let cancel = AtomicBool::new(true);
        assert_eq!(sampler.run(100, &cancel), 0);
        assert!(sampler.into_canvas().is_blank());
    }

    #[test]
    fn accepted_points_carry_the_walk_color() {
        let t = identity();
        let w = Walk {
            color: Color::new(10.0, 20.0, 30.0),
            ..walk(&t, 1)
        };
        let out = sample(&w, &Canvas::new(8, 8).unwrap(), 100, 5);
        for p in out.pixels().iter().filter(|p| p.hits > 0) {
            assert!((p.r - 10.0).abs() < 1e-9);
            assert!((p.g - 20.0).abs() < 1e-9);
            assert!((p.b - 30.0).abs() < 1e-9);
        }
    }
}
