//! Timed effect scheduler.
//!
//! Effects are boxed trait objects with a start / update / end lifecycle,
//! timed against real elapsed seconds. `W` is the game's own world state,
//! which effects read and mutate alongside the engine context.

use crate::api::game::{EngineContext, RenderContext};

/// Handle returned by [`EffectQueue::spawn`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EffectId(pub u32);

/// A transient, time-boxed visual effect.
pub trait Effect<W> {
    /// Short label, used for logging and counting.
    fn kind(&self) -> &'static str;

    /// Called once on the first frame the effect is live.
    fn start(&mut self, _world: &mut W, _ctx: &mut EngineContext) {}

    /// Called every frame while `0 <= elapsed <= duration`.
    /// `elapsed` is measured from the effect's own start time; `dt` is the
    /// real (unscaled) step, so effects keep their pace at any time scale.
    fn update(&mut self, world: &mut W, ctx: &mut EngineContext, elapsed: f32, dt: f32);

    /// Called exactly once after the effect expires or is cleared.
    /// Must tolerate effects that never started.
    fn end(&mut self, _world: &mut W, _ctx: &mut EngineContext) {}

    /// Emit per-frame geometry (arcs, points, vectors). Called once per rendered frame.
    fn draw(&self, _world: &W, _out: &mut RenderContext) {}
}

struct Scheduled<W> {
    id: EffectId,
    start_time: f32,
    duration: f32,
    started: bool,
    effect: Box<dyn Effect<W>>,
}

/// Ordered list of pending and running effects.
pub struct EffectQueue<W> {
    entries: Vec<Scheduled<W>>,
    next_id: u32,
}

impl<W> EffectQueue<W> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
        }
    }

    /// Schedule an effect to start at `start_time` (real seconds) and run for `duration`.
    pub fn spawn(&mut self, effect: Box<dyn Effect<W>>, start_time: f32, duration: f32) -> EffectId {
        let id = EffectId(self.next_id);
        self.next_id += 1;
        log::debug!("effect {} scheduled at {:.2}s for {:.2}s", effect.kind(), start_time, duration);
        self.entries.push(Scheduled {
            id,
            start_time,
            duration: duration.max(0.0),
            started: false,
            effect,
        });
        id
    }

    /// Run every live effect for this step, newest first.
    ///
    /// Expired effects are ended and removed; the order of survivors is preserved.
    pub fn tick(&mut self, world: &mut W, ctx: &mut EngineContext, now: f32, dt: f32) {
        let mut i = self.entries.len();
        while i > 0 {
            i -= 1;
            let elapsed = now - self.entries[i].start_time;
            if elapsed < 0.0 {
                continue;
            }
            let entry = &mut self.entries[i];
            if !entry.started {
                entry.started = true;
                entry.effect.start(world, ctx);
            }
            if elapsed > entry.duration {
                let mut done = self.entries.remove(i);
                done.effect.end(world, ctx);
                log::debug!("effect {} ({:?}) finished", done.effect.kind(), done.id);
            } else {
                entry.effect.update(world, ctx, elapsed, dt);
            }
        }
    }

    /// Let every started effect emit its geometry.
    pub fn draw(&self, world: &W, out: &mut RenderContext) {
        for entry in self.entries.iter().filter(|e| e.started) {
            entry.effect.draw(world, out);
        }
    }

    /// End every effect immediately, started or not.
    pub fn clear(&mut self, world: &mut W, ctx: &mut EngineContext) {
        for mut entry in self.entries.drain(..).rev() {
            entry.effect.end(world, ctx);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of scheduled effects with the given kind label.
    pub fn count_kind(&self, kind: &str) -> usize {
        self.entries.iter().filter(|e| e.effect.kind() == kind).count()
    }

    pub fn contains(&self, id: EffectId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }
}

impl<W> Default for EffectQueue<W> {
    fn default() -> Self {
        Self::new()
    }
}
