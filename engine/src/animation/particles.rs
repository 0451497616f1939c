//! Particle field
//!
//! A ring of motes orbiting the breathing circle. Every particle state is a
//! pure function of (index, amplitude, animation counter), so the motion is
//! continuous across ticks and identical across runs. Snapshots are fixed
//! size arrays: producing one never allocates.

use std::f64::consts::TAU;

/// Upper bound on the particle count
pub const MAX_PARTICLES: usize = 64;

/// Golden ratio conjugate, spreads per-particle constants evenly
const SPREAD: f64 = 0.618_033_988_749_895;

/// Length of the completion burst, in seconds
pub const BURST_SECS: f64 = 3.0;

/// Particles in a completion burst
const BURST_PARTICLES: usize = 48;

/// Drag coefficient slowing burst particles
const BURST_DRAG: f64 = 1.4;

/// Downward pull on burst particles, units per second squared
const BURST_GRAVITY: f64 = 0.35;

/// One effect element, in coordinates normalized to the circle's full radius
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Particle {
    /// Horizontal offset from the centre
    pub x: f64,
    /// Vertical offset from the centre
    pub y: f64,
    /// Horizontal velocity, units per second
    pub vx: f64,
    /// Vertical velocity, units per second
    pub vy: f64,
    /// 0 (invisible) to 1 (solid)
    pub opacity: f64,
}

/// Fixed-capacity set of particles for one frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleSnapshot {
    particles: [Particle; MAX_PARTICLES],
    len: usize,
}

impl ParticleSnapshot {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            particles: [Particle::default(); MAX_PARTICLES],
            len: 0,
        }
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Particle] {
        &self.particles[..self.len]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for ParticleSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

/// Generator for particle snapshots
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleField {
    count: usize,
}

impl ParticleField {
    /// `count` is capped at [`MAX_PARTICLES`]
    #[must_use]
    pub fn new(count: usize) -> Self {
        Self {
            count: count.min(MAX_PARTICLES),
        }
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Particle states for `amplitude` at animation time `counter` (seconds)
    #[must_use]
    pub fn snapshot(&self, amplitude: f64, counter: f64) -> ParticleSnapshot {
        let amplitude = amplitude.clamp(0.0, 1.0);
        let mut snapshot = ParticleSnapshot::empty();

        for (i, slot) in snapshot.particles.iter_mut().take(self.count).enumerate() {
            *slot = particle(i, amplitude, counter);
        }
        snapshot.len = self.count;
        snapshot
    }

    /// Completion burst `elapsed` seconds after the session finished
    ///
    /// Particles fly outward from the centre, slow down, sag and fade. The
    /// snapshot is empty once [`BURST_SECS`] have passed or when the field
    /// has no particles at all.
    #[must_use]
    pub fn burst(&self, elapsed: f64) -> ParticleSnapshot {
        let mut snapshot = ParticleSnapshot::empty();
        if self.count == 0 || !(0.0..BURST_SECS).contains(&elapsed) {
            return snapshot;
        }

        for (i, slot) in snapshot.particles.iter_mut().take(BURST_PARTICLES).enumerate() {
            *slot = burst_particle(i, elapsed);
        }
        snapshot.len = BURST_PARTICLES;
        snapshot
    }
}

fn burst_particle(index: usize, t: f64) -> Particle {
    let seed = (index as f64 * SPREAD).fract();
    let angle = TAU * index as f64 / BURST_PARTICLES as f64 + (seed - 0.5) * 0.3;
    let speed = 0.8 + 1.2 * seed;
    let life = BURST_SECS * (0.6 + 0.4 * seed);

    // Closed form of v' = -drag * v, so any t gives the same answer
    let decay = (-BURST_DRAG * t).exp();
    let distance = speed * (1.0 - decay) / BURST_DRAG;
    let (sin, cos) = angle.sin_cos();

    let remaining = (1.0 - t / life).clamp(0.0, 1.0);
    let fade = 1.0 - (1.0 - remaining).powi(3);

    Particle {
        x: distance * cos,
        y: distance * sin - 0.5 * BURST_GRAVITY * t * t,
        vx: speed * decay * cos,
        vy: speed * decay * sin - BURST_GRAVITY * t,
        opacity: fade,
    }
}

fn particle(index: usize, amplitude: f64, counter: f64) -> Particle {
    let seed = (index as f64 * SPREAD).fract();

    // Orbit speed varies per particle, alternate particles counter-rotate
    let direction = if index % 2 == 0 { 1.0 } else { -1.0 };
    let angular_speed = direction * (0.15 + 0.25 * seed);
    let angle = seed * TAU + counter * angular_speed;

    // Ring follows the breath with a gentle radial wobble
    let wobble_rate = 0.8 + seed;
    let base = 0.35 + 0.6 * amplitude;
    let wobble = 0.08 * (counter * wobble_rate + seed * TAU).sin();
    let radius = base + wobble;
    let radial_velocity = 0.08 * wobble_rate * (counter * wobble_rate + seed * TAU).cos();

    let (sin, cos) = angle.sin_cos();
    let tangential = radius * angular_speed;

    let twinkle = 0.5 + 0.5 * (counter * (1.5 + seed) + seed * TAU).sin();
    let opacity = (0.25 + 0.75 * amplitude) * (0.4 + 0.6 * twinkle);

    Particle {
        x: radius * cos,
        y: radius * sin,
        vx: radial_velocity * cos - tangential * sin,
        vy: radial_velocity * sin + tangential * cos,
        opacity: opacity.clamp(0.0, 1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_is_capped() {
        let field = ParticleField::new(1000);
        assert_eq!(field.count(), MAX_PARTICLES);
        assert_eq!(field.snapshot(0.5, 3.0).len(), MAX_PARTICLES);
    }

    #[test]
    fn test_zero_particles() {
        assert!(ParticleField::new(0).snapshot(1.0, 0.0).is_empty());
    }

    #[test]
    fn test_deterministic() {
        let field = ParticleField::new(24);
        assert_eq!(field.snapshot(0.42, 17.3), field.snapshot(0.42, 17.3));
    }

    #[test]
    fn test_continuous_between_ticks() {
        let field = ParticleField::new(24);
        let a = field.snapshot(0.5, 10.0);
        let b = field.snapshot(0.5, 10.0 + 1.0 / 60.0);
        for (p, q) in a.as_slice().iter().zip(b.as_slice()) {
            assert!((p.x - q.x).abs() < 0.05);
            assert!((p.y - q.y).abs() < 0.05);
            assert!((p.opacity - q.opacity).abs() < 0.05);
        }
    }

    #[test]
    fn test_ring_grows_with_amplitude() {
        let field = ParticleField::new(16);
        let mean_radius = |amplitude: f64| {
            let snapshot = field.snapshot(amplitude, 5.0);
            let total: f64 = snapshot.as_slice().iter().map(|p| p.x.hypot(p.y)).sum();
            total / snapshot.len() as f64
        };
        assert!(mean_radius(1.0) > mean_radius(0.0) + 0.4);
    }

    #[test]
    fn test_burst_spreads_then_ends() {
        let field = ParticleField::new(24);
        let spread = |t: f64| {
            let snapshot = field.burst(t);
            snapshot.as_slice().iter().map(|p| p.x.hypot(p.y)).sum::<f64>() / snapshot.len() as f64
        };

        assert_eq!(field.burst(0.0).len(), BURST_PARTICLES);
        assert!(spread(0.0) < 1e-9);
        assert!(spread(0.5) > spread(0.1));
        assert!(field.burst(BURST_SECS).is_empty());
        assert!(field.burst(-1.0).is_empty());
    }

    #[test]
    fn test_burst_fades_and_is_deterministic() {
        let field = ParticleField::new(8);
        assert_eq!(field.burst(1.2), field.burst(1.2));

        let mean_opacity = |t: f64| {
            let snapshot = field.burst(t);
            snapshot.as_slice().iter().map(|p| p.opacity).sum::<f64>() / snapshot.len() as f64
        };
        assert!(mean_opacity(0.2) > mean_opacity(2.0));
        assert!(field.burst(2.9).as_slice().iter().all(|p| (0.0..=1.0).contains(&p.opacity)));
    }

    #[test]
    fn test_no_burst_without_particles() {
        assert!(ParticleField::new(0).burst(0.5).is_empty());
    }

    #[test]
    fn test_opacity_in_range() {
        let field = ParticleField::new(MAX_PARTICLES);
        for step in 0..50 {
            let snapshot = field.snapshot(f64::from(step) / 50.0, f64::from(step) * 0.7);
            assert!(snapshot.as_slice().iter().all(|p| (0.0..=1.0).contains(&p.opacity)));
        }
    }
}
