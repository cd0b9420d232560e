//! # Particle Types
//!
//! A particle is a decorative heart with no meaning beyond its animation.
//!
//! ## Dual-Position Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  position ── where the heart was spawned (fixed)                        │
//! │  target   ── where it is heading (== position until the Rise timer)     │
//! │                                                                         │
//! │  Renderers interpolate linearly between the two over the animation      │
//! │  duration, starting at rise_started_at (see Particle::position_at).     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;
use uuid::Uuid;

// =============================================================================
// Identity
// =============================================================================

/// Unique particle identity.
///
/// UUID v4, generated fresh for every particle and never reused, so a
/// stale timer can never act on a different particle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(transparent)]
pub struct ParticleId(#[ts(type = "string")] Uuid);

impl ParticleId {
    pub fn new() -> Self {
        ParticleId(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ParticleId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ParticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Geometry & Palette
// =============================================================================

/// A screen-space point.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// Linear interpolation towards `other`; `t` is clamped to `[0, 1]`.
    pub fn lerp(&self, other: Point, t: f64) -> Point {
        let t = t.clamp(0.0, 1.0);
        Point {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }
}

/// The three heart hues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum HeartColor {
    Pink,
    Red,
    Purple,
}

impl HeartColor {
    /// Palette that colors are drawn from uniformly.
    pub const PALETTE: [HeartColor; 3] = [HeartColor::Pink, HeartColor::Red, HeartColor::Purple];
}

// =============================================================================
// Phase
// =============================================================================

/// Lifecycle phase. Transitions are driven only by timers.
///
/// ```text
/// Spawned ──Rise──► Rising ──Expire──► Expired (removed)
///    └──────────────Expire───────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Spawned,
    Rising,
    Expired,
}

// =============================================================================
// Particle
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Particle {
    pub id: ParticleId,

    /// Spawn point (origin plus jitter).
    pub position: Point,

    /// Rise destination; equals `position` while `Spawned`.
    pub target: Point,

    pub size: f64,

    pub color: HeartColor,

    pub phase: Phase,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the Rise timer fired.
    #[ts(as = "Option<String>")]
    pub rise_started_at: Option<DateTime<Utc>>,
}

impl Particle {
    /// Where a renderer should draw this particle at `now`.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::{Duration, Utc};
    /// use heartcalc_fx::particle::{HeartColor, Particle, ParticleId, Phase, Point};
    ///
    /// let start = Utc::now();
    /// let particle = Particle {
    ///     id: ParticleId::new(),
    ///     position: Point::new(0.0, 100.0),
    ///     target: Point::new(0.0, 0.0),
    ///     size: 10.0,
    ///     color: HeartColor::Red,
    ///     phase: Phase::Rising,
    ///     created_at: start,
    ///     rise_started_at: Some(start),
    /// };
    ///
    /// let halfway = particle.position_at(start + Duration::seconds(1), Duration::seconds(2));
    /// assert_eq!(halfway, Point::new(0.0, 50.0));
    /// ```
    pub fn position_at(&self, now: DateTime<Utc>, animation: Duration) -> Point {
        let Some(started) = self.rise_started_at else {
            return self.position;
        };

        let total = animation.num_milliseconds();
        if total <= 0 {
            return self.target;
        }

        let elapsed = (now - started).num_milliseconds();
        self.position.lerp(self.target, elapsed as f64 / total as f64)
    }

    /// Time since the particle was spawned.
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now - self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn particle(now: DateTime<Utc>) -> Particle {
        Particle {
            id: ParticleId::new(),
            position: Point::new(100.0, 800.0),
            target: Point::new(100.0, 800.0),
            size: 10.0,
            color: HeartColor::Pink,
            phase: Phase::Spawned,
            created_at: now,
            rise_started_at: None,
        }
    }

    #[test]
    fn test_ids_are_unique() {
        let a = ParticleId::new();
        let b = ParticleId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_position_before_rise_is_spawn_point() {
        let now = Utc::now();
        let p = particle(now);
        assert_eq!(
            p.position_at(now + Duration::seconds(1), Duration::seconds(2)),
            Point::new(100.0, 800.0)
        );
    }

    #[test]
    fn test_position_interpolates_and_clamps() {
        let now = Utc::now();
        let mut p = particle(now);
        p.phase = Phase::Rising;
        p.target = Point::new(120.0, 50.0);
        p.rise_started_at = Some(now);

        let anim = Duration::milliseconds(2000);
        assert_eq!(p.position_at(now, anim), Point::new(100.0, 800.0));
        assert_eq!(
            p.position_at(now + Duration::milliseconds(1000), anim),
            Point::new(110.0, 425.0)
        );
        assert_eq!(
            p.position_at(now + Duration::milliseconds(5000), anim),
            Point::new(120.0, 50.0)
        );
    }

    #[test]
    fn test_particle_serializes_camel_case() {
        let p = particle(Utc::now());
        let json = serde_json::to_value(&p).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("riseStartedAt").is_some());
        assert_eq!(json["color"], "pink");
    }
}
