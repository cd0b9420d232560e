//! # Fx Driver
//!
//! Runs a [`ParticleScheduler`] on its own tokio task.
//!
//! ## Task Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           Fx Driver Task                                │
//! │                                                                         │
//! │   FxHandle (Clone) ──► mpsc ──┐                                         │
//! │                               ▼                                         │
//! │                     ┌───────────────────┐                               │
//! │                     │   select! loop    │◄── interval(tick_ms)          │
//! │                     └─────────┬─────────┘                               │
//! │                               │ advance(clock.now())                    │
//! │                               ▼                                         │
//! │                     ┌───────────────────┐                               │
//! │                     │ ParticleScheduler │  (owned, single writer)       │
//! │                     └───────────────────┘                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every command is applied in arrival order, so a `Snapshot` sent after a
//! `SpawnBurst` from the same handle always sees that burst.

use rand::Rng;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::clock::Clock;
use crate::error::{FxError, FxResult};
use crate::particle::{Particle, ParticleId, Point};
use crate::scheduler::ParticleScheduler;

/// Capacity of the command channel.
const COMMAND_BUFFER: usize = 256;

// =============================================================================
// Commands & Handle
// =============================================================================

#[derive(Debug)]
enum FxCommand {
    /// Release a burst at `origin`, stamped with the driver clock.
    SpawnBurst { origin: Point },
    /// Remove a particle early.
    Cancel {
        id: ParticleId,
        reply: oneshot::Sender<bool>,
    },
    /// Copy the live particles.
    Snapshot { reply: oneshot::Sender<Vec<Particle>> },
    /// Advance timers now instead of waiting for the next interval.
    Tick,
    Shutdown,
}

/// Cloneable handle to a running [`FxDriver`].
#[derive(Debug, Clone)]
pub struct FxHandle {
    cmd_tx: mpsc::Sender<FxCommand>,
}

impl FxHandle {
    pub async fn spawn_burst(&self, origin: Point) -> FxResult<()> {
        self.send(FxCommand::SpawnBurst { origin }).await
    }

    /// Returns whether the particle was still live.
    pub async fn cancel(&self, id: ParticleId) -> FxResult<bool> {
        let (reply, rx) = oneshot::channel();
        self.send(FxCommand::Cancel { id, reply }).await?;
        rx.await.map_err(|_| closed())
    }

    pub async fn snapshot(&self) -> FxResult<Vec<Particle>> {
        let (reply, rx) = oneshot::channel();
        self.send(FxCommand::Snapshot { reply }).await?;
        rx.await.map_err(|_| closed())
    }

    pub async fn tick(&self) -> FxResult<()> {
        self.send(FxCommand::Tick).await
    }

    /// Stops the driver task. Live particles are dropped.
    pub async fn shutdown(&self) -> FxResult<()> {
        self.send(FxCommand::Shutdown).await
    }

    async fn send(&self, cmd: FxCommand) -> FxResult<()> {
        self.cmd_tx.send(cmd).await.map_err(|_| closed())
    }
}

fn closed() -> FxError {
    FxError::ChannelClosed("Fx driver stopped".into())
}

// =============================================================================
// Driver
// =============================================================================

pub struct FxDriver<C, R> {
    scheduler: ParticleScheduler<R>,
    clock: C,
    tick: Duration,
}

impl<C, R> FxDriver<C, R>
where
    C: Clock,
    R: Rng + Send + 'static,
{
    /// `tick` is how often timers are advanced without an explicit `Tick`.
    pub fn new(scheduler: ParticleScheduler<R>, clock: C, tick: Duration) -> Self {
        FxDriver {
            scheduler,
            clock,
            tick,
        }
    }

    /// Spawns the driver task and returns a handle.
    pub fn start(self) -> FxHandle {
        let (cmd_tx, cmd_rx) = mpsc::channel(COMMAND_BUFFER);

        tokio::spawn(async move {
            self.run(cmd_rx).await;
        });

        FxHandle { cmd_tx }
    }

    async fn run(mut self, mut cmd_rx: mpsc::Receiver<FxCommand>) {
        info!(tick_ms = self.tick.as_millis() as u64, "Fx driver started");

        let mut ticker = interval(self.tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                cmd = cmd_rx.recv() => {
                    let Some(cmd) = cmd else {
                        debug!("All fx handles dropped");
                        break;
                    };
                    match cmd {
                        FxCommand::Shutdown => {
                            info!(live = self.scheduler.len(), "Fx driver shutting down");
                            break;
                        }
                        FxCommand::SpawnBurst { origin } => {
                            let now = self.clock.now();
                            self.scheduler.spawn_burst(origin, now);
                        }
                        FxCommand::Cancel { id, reply } => {
                            let _ = reply.send(self.scheduler.cancel(id));
                        }
                        FxCommand::Snapshot { reply } => {
                            let _ = reply.send(self.scheduler.snapshot());
                        }
                        FxCommand::Tick => self.advance(),
                    }
                }
                _ = ticker.tick() => self.advance(),
            }
        }
    }

    fn advance(&mut self) {
        let events = self.scheduler.advance(self.clock.now());
        if !events.is_empty() {
            debug!(fired = events.len(), live = self.scheduler.len(), "Fx timers fired");
        }
    }
}
