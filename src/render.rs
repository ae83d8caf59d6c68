// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The ChaosRenderer splits a sample budget across a pool of threads,
//! lets each thread play the chaos game into its own canvas, and folds
//! the results together.  Threads share nothing mutable: the
//! transformations are read-only, each canvas belongs to one thread,
//! and the only cross-thread traffic is a cancellation flag.

use crossbeam::thread::ScopedJoinHandle;
use log::{debug, info, warn};
use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::canvas::{Canvas, Color};
use crate::errors::RenderError;
use crate::planes::Rect;
use crate::reduce;
use crate::sampler::{Sampler, Walk};
use crate::transforms::{Transformation, Transformations};

/// A cooperative stop signal.  Clones share the same flag.  Workers
/// look at it between trajectories, never in the middle of one.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// A token that has not been triggered.
    pub fn new() -> CancelToken {
        CancelToken::default()
    }

    /// Ask every worker watching this token to stop.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Has `cancel()` been called?
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// The outcome of a render that may have been cancelled.
#[derive(Debug)]
pub struct Rendered {
    /// The merged canvas.  If the render was cancelled this holds
    /// every trajectory that finished before the workers stopped.
    pub canvas: Canvas,
    /// Trajectories actually completed across all workers.
    pub samples: u64,
    /// Whether the cancel token fired before the budget was spent.
    pub cancelled: bool,
}

/// Split `total` samples across `workers` partitions.  The first
/// `total % workers` partitions get one extra sample, so the
/// partitions always add up to `total`.
pub fn partition(total: u64, workers: usize) -> Vec<u64> {
    let workers = workers.max(1) as u64;
    let (share, extra) = (total / workers, total % workers);
    (0..workers)
        .map(|i| share + if i < extra { 1 } else { 0 })
        .collect()
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// The ChaosRenderer contains the parameters by which a fractal is
/// sampled.  Once built it is not modified by rendering, and one
/// renderer can produce any number of canvases.
#[derive(Debug)]
pub struct ChaosRenderer {
    world: Rect,
    transformations: Transformations,
    // Steps per trajectory.
    iterations: usize,
    // Rotational copies per step.
    symmetry: usize,
    // Size of the worker pool.
    threads: usize,
    // What every accepted point contributes.
    color: Color,
}

impl ChaosRenderer {
    /// Defaults: 50 iterations per sample, symmetry 1, one thread per
    /// CPU, white contributions.
    pub fn new(world: Rect, transformations: Transformations) -> Result<Self, RenderError> {
        let world = Rect::new(world.x, world.y, world.width, world.height)?;
        if transformations.is_empty() {
            return Err(RenderError::EmptyTransformationSet);
        }
        Ok(ChaosRenderer {
            world,
            transformations,
            iterations: 50,
            symmetry: 1,
            threads: num_cpus::get(),
            color: Color::white(),
        })
    }

    /// Steps taken per trajectory.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Rotational copies plotted per step.  Must be at least 1.
    pub fn with_symmetry(mut self, symmetry: usize) -> Result<Self, RenderError> {
        if symmetry == 0 {
            return Err(RenderError::InvalidSymmetry);
        }
        self.symmetry = symmetry;
        Ok(self)
    }

    /// Worker count.  Zero means one per CPU.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = if threads == 0 { num_cpus::get() } else { threads };
        self
    }

    /// The color every accepted point contributes.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// The world region being sampled.
    pub fn world(&self) -> Rect {
        self.world
    }

    /// Worker count.
    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Render `samples` trajectories and merge them into `canvas`.
    /// Worker `i` uses the stream seeded with `seed + i`, so with one
    /// thread the result depends only on the arguments.
    pub fn render(&self, canvas: &Canvas, samples: u64, seed: u64) -> Result<Canvas, RenderError> {
        self.render_with_cancel(canvas, samples, seed, &CancelToken::new())
            .map(|rendered| rendered.canvas)
    }

    /// As `render()`, but stops early if `cancel` fires.  Workers that
    /// stop early still hand back every trajectory they completed, and
    /// those are merged into the result.  A worker that panics is not
    /// merged; the whole render fails with that worker's index and
    /// partition size.
    pub fn render_with_cancel(
        &self,
        canvas: &Canvas,
        samples: u64,
        seed: u64,
        cancel: &CancelToken,
    ) -> Result<Rendered, RenderError> {
        let shares = partition(samples, self.threads);
        info!(
            "rendering {} samples x {} iterations on {} workers ({}x{}, symmetry {})",
            samples,
            self.iterations,
            shares.len(),
            canvas.width(),
            canvas.height(),
            self.symmetry
        );

        let walk = Walk {
            world: self.world,
            transformations: &self.transformations,
            iterations: self.iterations,
            symmetry: self.symmetry,
            color: self.color,
        };
        let walk = &walk;
        let flag: &AtomicBool = &cancel.0;
        let blank = Canvas::new(canvas.width(), canvas.height())?;

        let joined = crossbeam::scope(|spawner| {
            let handles: Vec<(usize, u64, ScopedJoinHandle<(Canvas, u64)>)> = shares
                .iter()
                .enumerate()
                .map(|(worker, &share)| {
                    let mine = blank.clone();
                    let seed = seed.wrapping_add(worker as u64);
                    let handle = spawner.spawn(move |_| {
                        debug!("worker {}: {} samples, seed {}", worker, share, seed);
                        let mut sampler = Sampler::new(walk, mine, seed);
                        let done = sampler.run(share, flag);
                        debug!("worker {}: finished {} of {}", worker, done, share);
                        (sampler.into_canvas(), done)
                    });
                    (worker, share, handle)
                })
                .collect();

            handles
                .into_iter()
                .map(|(worker, share, handle)| {
                    handle.join().map_err(|payload| RenderError::WorkerFailed {
                        worker,
                        samples: share,
                        reason: panic_reason(&*payload),
                    })
                })
                .collect::<Vec<_>>()
        })
        // Every handle is joined inside the scope, so a panic has
        // already been turned into a WorkerFailed above.
        .map_err(|payload| RenderError::WorkerFailed {
            worker: shares.len(),
            samples,
            reason: panic_reason(&*payload),
        })?;

        let mut canvases = Vec::with_capacity(joined.len());
        let mut completed = 0;
        for result in joined {
            match result {
                Ok((canvas, done)) => {
                    completed += done;
                    canvases.push(canvas);
                }
                Err(e) => {
                    warn!("{}", e);
                    return Err(e);
                }
            }
        }

        let merged = match reduce::fold(canvases) {
            Some(merged) => canvas.merge(&merged?)?,
            None => canvas.clone(),
        };
        let cancelled = cancel.is_cancelled() && completed < samples;
        if cancelled {
            warn!("cancelled after {} of {} samples", completed, samples);
        } else {
            info!("rendered {} samples, {} hits", completed, merged.total_hits());
        }
        Ok(Rendered {
            canvas: merged,
            samples: completed,
            cancelled,
        })
    }
}

/// One-shot render with symmetry 1 and one worker per CPU.
pub fn render(
    canvas: &Canvas,
    world: Rect,
    transformations: Vec<Box<dyn Transformation>>,
    samples: u64,
    iterations: usize,
    seed: u64,
) -> Result<Canvas, RenderError> {
    ChaosRenderer::new(world, Transformations::new(transformations)?)?
        .with_iterations(iterations)
        .render(canvas, samples, seed)
}
