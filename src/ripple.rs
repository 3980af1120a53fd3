//! Expanding ring disturbances. Each ripple grows by its speed every frame
//! and is retired the moment it reaches its maximum radius; a point's total
//! influence is the strongest single ring covering it, not a sum.

use crate::config::RippleParams;
use rand::{rngs::StdRng, Rng, SeedableRng};

#[derive(Clone, Copy, Debug)]
pub(crate) struct Ripple {
    pub(crate) center: (f64, f64),
    pub(crate) radius: f64,
    pub(crate) max_radius: f64,
    /// Peak influence contribution, (0, 1].
    pub(crate) strength: f64,
    /// Radius growth per frame.
    pub(crate) speed: f64,
}

pub(crate) struct RippleSystem {
    ripples: Vec<Ripple>,
    frame: u64,
    rng: StdRng,
}

impl RippleSystem {
    pub(crate) fn new(seed: u64) -> Self {
        Self {
            ripples: Vec::new(),
            frame: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Drop all live ripples and restart the spawn cadence.
    pub(crate) fn reseed(&mut self, seed: u64) {
        self.ripples.clear();
        self.frame = 0;
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub(crate) fn spawn(&mut self, center: (f64, f64), max_radius: f64, speed: f64, strength: f64) {
        self.ripples.push(Ripple {
            center,
            radius: 0.0,
            max_radius,
            strength,
            speed,
        });
    }

    /// One frame: grow, retire, then maybe spawn. New ripples never grow in
    /// the frame that created them.
    pub(crate) fn advance(&mut self, params: &RippleParams, width: f64, height: f64) {
        for r in &mut self.ripples {
            r.radius += r.speed;
        }
        self.ripples.retain(|r| r.radius < r.max_radius);

        let due = params.spawn_interval > 0 && self.frame % params.spawn_interval == 0;
        if due && self.ripples.len() < params.cap && width > 0.0 && height > 0.0 {
            let n = self.rng.gen_range(params.spawn_min..=params.spawn_max);
            for _ in 0..n {
                if self.ripples.len() >= params.cap {
                    break;
                }
                let center = (
                    self.rng.gen_range(0.0..width),
                    self.rng.gen_range(0.0..height),
                );
                let max_radius = self
                    .rng
                    .gen_range(params.radius_range.0..=params.radius_range.1);
                let speed = self
                    .rng
                    .gen_range(params.speed_range.0..=params.speed_range.1);
                let strength = self
                    .rng
                    .gen_range(params.strength_range.0..=params.strength_range.1);
                self.spawn(center, max_radius, speed, strength);
            }
        }

        self.frame += 1;
    }

    /// Influence of all live rings on a point, in [0, 1]. A point inside a
    /// ring band gets that ring's intensity, attenuated by how far the
    /// ripple has already expanded; overlapping rings take the max.
    pub(crate) fn influence_at(&self, x: f64, y: f64, ring_width: f64) -> f64 {
        if ring_width <= 0.0 {
            return 0.0;
        }
        let mut best = 0.0_f64;
        for r in &self.ripples {
            let dx = x - r.center.0;
            let dy = y - r.center.1;
            let dist = (dx * dx + dy * dy).sqrt();
            let band = (dist - r.radius).abs();
            if band < ring_width {
                let ring = 1.0 - band / ring_width;
                let age_fade = 1.0 - r.radius / r.max_radius;
                best = best.max(ring * r.strength * age_fade);
            }
        }
        best.clamp(0.0, 1.0)
    }

    pub(crate) fn len(&self) -> usize {
        self.ripples.len()
    }

    #[cfg(test)]
    pub(crate) fn ripples(&self) -> &[Ripple] {
        &self.ripples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_params() -> RippleParams {
        // No autonomous spawning; tests drive the population by hand.
        RippleParams {
            spawn_interval: 0,
            ..RippleParams::default()
        }
    }

    #[test]
    fn ripple_retires_after_exactly_max_radius_frames() {
        let mut sys = RippleSystem::new(1);
        sys.spawn((100.0, 100.0), 150.0, 1.0, 0.5);
        let params = quiet_params();
        for i in 0..149 {
            sys.advance(&params, 800.0, 600.0);
            assert_eq!(sys.len(), 1, "retired early at frame {}", i + 1);
        }
        sys.advance(&params, 800.0, 600.0);
        assert_eq!(sys.len(), 0, "not retired at max radius");
    }

    #[test]
    fn radius_grows_monotonically_within_bounds() {
        let mut sys = RippleSystem::new(2);
        sys.spawn((0.0, 0.0), 50.0, 1.7, 0.5);
        let params = quiet_params();
        let mut prev = 0.0;
        while sys.len() == 1 {
            let r = sys.ripples()[0];
            assert!(r.radius >= prev);
            assert!(r.radius >= 0.0 && r.radius < r.max_radius);
            prev = r.radius;
            sys.advance(&params, 100.0, 100.0);
        }
    }

    #[test]
    fn autonomous_spawning_respects_cap() {
        let mut sys = RippleSystem::new(3);
        let params = RippleParams {
            spawn_interval: 1,
            // Long-lived, slow ripples so the population only climbs.
            radius_range: (10_000.0, 20_000.0),
            speed_range: (0.1, 0.2),
            ..RippleParams::default()
        };
        for _ in 0..200 {
            sys.advance(&params, 800.0, 600.0);
            assert!(sys.len() <= params.cap);
        }
        assert_eq!(sys.len(), params.cap);
    }

    #[test]
    fn spawn_cadence_is_gated() {
        let mut sys = RippleSystem::new(4);
        let params = RippleParams {
            spawn_interval: 60,
            spawn_min: 1,
            spawn_max: 1,
            radius_range: (10_000.0, 20_000.0),
            speed_range: (0.1, 0.2),
            ..RippleParams::default()
        };
        // Frame 0 spawns, then nothing until frame 60.
        sys.advance(&params, 800.0, 600.0);
        assert_eq!(sys.len(), 1);
        for _ in 0..59 {
            sys.advance(&params, 800.0, 600.0);
        }
        assert_eq!(sys.len(), 1);
        sys.advance(&params, 800.0, 600.0);
        assert_eq!(sys.len(), 2);
    }

    #[test]
    fn no_spawning_on_degenerate_surface() {
        let mut sys = RippleSystem::new(5);
        let params = RippleParams {
            spawn_interval: 1,
            ..RippleParams::default()
        };
        for _ in 0..10 {
            sys.advance(&params, 0.0, 0.0);
        }
        assert_eq!(sys.len(), 0);
    }

    #[test]
    fn influence_inside_the_band() {
        let mut sys = RippleSystem::new(6);
        sys.spawn((0.0, 0.0), 200.0, 1.0, 0.5);
        let params = quiet_params();
        for _ in 0..100 {
            sys.advance(&params, 800.0, 600.0);
        }
        // radius is now 100; a point right on the ring sees full ring
        // intensity scaled by strength and age fade (1 - 100/200).
        let v = sys.influence_at(100.0, 0.0, 40.0);
        assert!((v - 0.5 * 0.5).abs() < 1e-9);
        // 20 units off the ring: half ring intensity.
        let v = sys.influence_at(120.0, 0.0, 40.0);
        assert!((v - 0.5 * 0.5 * 0.5).abs() < 1e-9);
        // Outside the band entirely.
        assert_eq!(sys.influence_at(400.0, 0.0, 40.0), 0.0);
    }

    #[test]
    fn overlapping_ripples_take_the_max_not_the_sum() {
        let mut sys = RippleSystem::new(7);
        sys.spawn((0.0, 0.0), 1000.0, 1.0, 0.6);
        sys.spawn((0.0, 0.0), 1000.0, 1.0, 0.4);
        let params = quiet_params();
        for _ in 0..50 {
            sys.advance(&params, 800.0, 600.0);
        }
        // Both rings sit at radius 50 with nearly no age fade; the stronger
        // one wins and the weaker one does not stack on top.
        let v = sys.influence_at(50.0, 0.0, 40.0);
        let expect = 0.6 * (1.0 - 50.0 / 1000.0);
        assert!((v - expect).abs() < 1e-9);
        assert!(v <= 1.0);
    }

    #[test]
    fn influence_is_always_in_unit_range() {
        let mut sys = RippleSystem::new(8);
        let params = RippleParams {
            spawn_interval: 1,
            ..RippleParams::default()
        };
        for _ in 0..300 {
            sys.advance(&params, 800.0, 600.0);
            for gx in 0..8 {
                for gy in 0..6 {
                    let v = sys.influence_at(gx as f64 * 100.0, gy as f64 * 100.0, 40.0);
                    assert!((0.0..=1.0).contains(&v));
                }
            }
        }
    }

    #[test]
    fn reseed_clears_state() {
        let mut sys = RippleSystem::new(9);
        sys.spawn((1.0, 1.0), 100.0, 1.0, 0.5);
        sys.reseed(9);
        assert_eq!(sys.len(), 0);
    }
}
