//! # Particle Scheduler
//!
//! Owns every live particle and a queue of deferred effects.
//!
//! ## Timer Queue
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Timer Queue (min-heap)                           │
//! │                                                                         │
//! │   due        seq  particle  effect                                      │
//! │   ───────    ───  ────────  ──────                                      │
//! │   t0+10ms    0    a1        Rise     ◄── fires first                    │
//! │   t0+10ms    2    a2        Rise                                        │
//! │   t0+2100ms  1    a1        Expire                                      │
//! │   t0+2100ms  3    a2        Expire                                      │
//! │                                                                         │
//! │   advance(now) pops every timer with due <= now, in (due, seq) order.   │
//! │                                                                         │
//! │   Rise   ──► particle present and Spawned?  set target, Rising         │
//! │              otherwise                       no-op (stale)              │
//! │   Expire ──► remove by id; absent id         no-op (idempotent)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The scheduler never reads a clock. Callers pass `now`, so tests drive a
//! particle's whole life without sleeping.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use tracing::{debug, trace};

use crate::config::FxConfig;
use crate::particle::{HeartColor, Particle, ParticleId, Phase, Point};

// =============================================================================
// Timers & Events
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Effect {
    Rise,
    Expire,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Timer {
    due: DateTime<Utc>,
    seq: u64,
    id: ParticleId,
    effect: Effect,
}

/// Visible changes produced by [`ParticleScheduler::advance`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParticleEvent {
    Rose { id: ParticleId, target: Point },
    /// Carries the removed particle in its final `Expired` phase.
    Expired { particle: Particle },
}

impl ParticleEvent {
    pub fn id(&self) -> ParticleId {
        match self {
            ParticleEvent::Rose { id, .. } => *id,
            ParticleEvent::Expired { particle } => particle.id,
        }
    }
}

// =============================================================================
// Particle Scheduler
// =============================================================================

/// Spawns, rises and expires hearts.
///
/// ## Ownership
/// The scheduler is the only writer. Renderers read
/// [`snapshot`](Self::snapshot), which copies the live particles.
#[derive(Debug)]
pub struct ParticleScheduler<R = StdRng> {
    config: FxConfig,
    rng: R,
    particles: HashMap<ParticleId, Particle>,
    timers: BinaryHeap<Reverse<Timer>>,
    next_seq: u64,
}

impl ParticleScheduler<StdRng> {
    /// Creates a scheduler with an entropy-seeded RNG.
    pub fn new(config: FxConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }
}

impl<R: Rng> ParticleScheduler<R> {
    /// Creates a scheduler with a caller-supplied RNG (seeded in tests).
    pub fn with_rng(config: FxConfig, rng: R) -> Self {
        ParticleScheduler {
            config,
            rng,
            particles: HashMap::new(),
            timers: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    pub fn config(&self) -> &FxConfig {
        &self.config
    }

    // =========================================================================
    // Spawning
    // =========================================================================

    /// Inserts a burst of particles around `origin` and queues their timers.
    ///
    /// Every particle gets two timers relative to `now`: `Rise` after the
    /// rise delay and `Expire` after the full lifetime.
    pub fn spawn_burst(&mut self, origin: Point, now: DateTime<Utc>) {
        let burst = &self.config.burst;
        let rise_at = now + self.config.timing.rise_delay();
        let expire_at = now + self.config.timing.lifetime();

        for _ in 0..burst.count {
            let id = ParticleId::new();
            let position = Point::new(
                origin.x + jitter(&mut self.rng, burst.jitter_x),
                origin.y + jitter(&mut self.rng, burst.jitter_y),
            );
            let size = if burst.size_max > burst.size_min {
                self.rng.gen_range(burst.size_min..=burst.size_max)
            } else {
                burst.size_min
            };
            let color = HeartColor::PALETTE[self.rng.gen_range(0..HeartColor::PALETTE.len())];

            self.particles.insert(
                id,
                Particle {
                    id,
                    position,
                    target: position,
                    size,
                    color,
                    phase: Phase::Spawned,
                    created_at: now,
                    rise_started_at: None,
                },
            );

            let seq = self.next_seq;
            self.next_seq += 2;
            self.timers.push(Reverse(Timer {
                due: rise_at,
                seq,
                id,
                effect: Effect::Rise,
            }));
            self.timers.push(Reverse(Timer {
                due: expire_at,
                seq: seq + 1,
                id,
                effect: Effect::Expire,
            }));
        }

        debug!(
            x = origin.x,
            y = origin.y,
            count = burst.count,
            live = self.particles.len(),
            "Spawned particle burst"
        );
    }

    // =========================================================================
    // Timer Processing
    // =========================================================================

    /// Fires every timer due at or before `now`.
    ///
    /// Returns the visible changes in firing order. For any one particle
    /// its `Rose` event always precedes its `Expired` event.
    pub fn advance(&mut self, now: DateTime<Utc>) -> Vec<ParticleEvent> {
        let mut events = Vec::new();

        while let Some(Reverse(timer)) = self.timers.peek().copied() {
            if timer.due > now {
                break;
            }
            self.timers.pop();

            match timer.effect {
                Effect::Rise => match self.particles.get_mut(&timer.id) {
                    Some(particle) if particle.phase == Phase::Spawned => {
                        let rise = &self.config.rise;
                        particle.target = Point::new(
                            particle.position.x + jitter(&mut self.rng, rise.jitter_x),
                            rise.top_offset + jitter(&mut self.rng, rise.jitter_y),
                        );
                        particle.phase = Phase::Rising;
                        particle.rise_started_at = Some(timer.due);
                        events.push(ParticleEvent::Rose {
                            id: timer.id,
                            target: particle.target,
                        });
                    }
                    _ => trace!(id = %timer.id, "Ignoring stale rise timer"),
                },
                Effect::Expire => {
                    if let Some(particle) = self.remove(timer.id) {
                        events.push(ParticleEvent::Expired { particle });
                    }
                }
            }
        }

        if !events.is_empty() {
            trace!(
                fired = events.len(),
                live = self.particles.len(),
                pending = self.timers.len(),
                "Advanced particle timers"
            );
        }

        events
    }

    /// Removes a particle before its lifetime ends.
    ///
    /// Its queued timers stay in the heap and become no-ops.
    pub fn cancel(&mut self, id: ParticleId) -> bool {
        let removed = self.remove(id).is_some();
        if removed {
            debug!(%id, "Cancelled particle");
        }
        removed
    }

    fn remove(&mut self, id: ParticleId) -> Option<Particle> {
        let mut particle = self.particles.remove(&id)?;
        particle.phase = Phase::Expired;
        Some(particle)
    }

    // =========================================================================
    // Read Access
    // =========================================================================

    /// Copies the live particles. Order is unspecified.
    pub fn snapshot(&self) -> Vec<Particle> {
        self.particles.values().cloned().collect()
    }

    pub fn get(&self, id: ParticleId) -> Option<&Particle> {
        self.particles.get(&id)
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Number of queued timers, stale ones included.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// When the earliest queued timer is due.
    pub fn next_deadline(&self) -> Option<DateTime<Utc>> {
        self.timers.peek().map(|Reverse(timer)| timer.due)
    }
}

/// Uniform offset in `[-spread, spread]`.
fn jitter<R: Rng>(rng: &mut R, spread: f64) -> f64 {
    if spread > 0.0 {
        rng.gen_range(-spread..=spread)
    } else {
        0.0
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
