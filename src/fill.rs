//! Target-fill strategies and the asymmetric smoothing that chases them.
//! Ambient mode scores cells from the breathing noise field; interactive
//! mode scores them from pointer proximity and ripple rings. Both produce
//! a target in [0, 1] that the cell's fill approaches with a fast attack
//! and a slow release.

use crate::config::{Config, FillMode};
use crate::noise::NoiseField;
use crate::ripple::RippleSystem;

/// Per-frame context a strategy may consult.
pub(crate) struct FrameCtx<'a> {
    pub(crate) noise: &'a NoiseField,
    pub(crate) ripples: &'a RippleSystem,
    /// Last pointer position in surface coordinates, `None` while away.
    pub(crate) pointer: Option<(f64, f64)>,
    pub(crate) t: f64,
}

pub(crate) trait TargetFill {
    /// Instantaneous ideal fill for the cell centered at (x, y), in [0, 1].
    fn target(&self, x: f64, y: f64, ctx: &FrameCtx<'_>, cfg: &Config) -> f64;
}

pub(crate) fn strategy_for(mode: FillMode) -> Box<dyn TargetFill> {
    match mode {
        FillMode::Ambient => Box::new(AmbientFill),
        FillMode::Interactive => Box::new(PointerFill),
    }
}

/// fBm mapped from [-1, 1] into [0, 1], padded off the extremes and given a
/// mild gamma so crests read brighter than troughs.
pub(crate) struct AmbientFill;

impl TargetFill for AmbientFill {
    fn target(&self, x: f64, y: f64, ctx: &FrameCtx<'_>, cfg: &Config) -> f64 {
        let s = cfg.noise.base_scale;
        let n = ctx.noise.fbm(x * s, y * s, ctx.t, &cfg.noise);
        let t = (n * 0.5 + 0.5).clamp(0.0, 1.0);
        let t = 0.05 + t * 0.9;
        t.powf(1.1).clamp(0.0, 1.0)
    }
}

/// Pointer proximity and ripple rings, combined by max so a fresh ring near
/// the cursor does not saturate past full brightness.
pub(crate) struct PointerFill;

impl TargetFill for PointerFill {
    fn target(&self, x: f64, y: f64, ctx: &FrameCtx<'_>, cfg: &Config) -> f64 {
        let pointer = match ctx.pointer {
            Some((px, py)) if cfg.pointer_radius > 0.0 => {
                let dx = x - px;
                let dy = y - py;
                let dist = (dx * dx + dy * dy).sqrt();
                (1.0 - dist / cfg.pointer_radius).max(0.0)
            }
            _ => 0.0,
        };
        let ripple = ctx.ripples.influence_at(x, y, cfg.ripple.ring_width);
        pointer.max(ripple).clamp(0.0, 1.0)
    }
}

/// Asymmetric exponential step toward the target: fast up, slow down,
/// clamped to [0, 1] after every update.
pub(crate) fn smooth(fill: f64, target: f64, attack: f64, release: f64) -> f64 {
    let rate = if target > fill { attack } else { release };
    (fill + (target - fill) * rate).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attack_is_faster_than_release() {
        let cfg = Config::default();
        let up = smooth(0.2, 1.0, cfg.attack_rate, cfg.release_rate);
        let down = smooth(0.8, 0.0, cfg.attack_rate, cfg.release_rate);
        // Same 0.8 gap in both directions; the rise covers more ground.
        assert!((up - 0.2) > (0.8 - down));
        assert!(up > 0.2 && up < 1.0);
        assert!(down < 0.8 && down > 0.0);
    }

    #[test]
    fn smoothing_moves_strictly_toward_target() {
        let mut fill = 0.0;
        for _ in 0..500 {
            let next = smooth(fill, 0.9, 0.1, 0.03);
            assert!(next >= fill);
            fill = next;
        }
        assert!((fill - 0.9).abs() < 1e-3);
        for _ in 0..500 {
            let next = smooth(fill, 0.1, 0.1, 0.03);
            assert!(next <= fill);
            fill = next;
        }
        assert!((fill - 0.1).abs() < 1e-3);
    }

    #[test]
    fn smoothing_clamps_to_unit_range() {
        assert!(smooth(0.99, 5.0, 1.5, 0.03) <= 1.0);
        assert!(smooth(0.01, -5.0, 0.1, 1.5) >= 0.0);
    }

    #[test]
    fn pointer_influence_falls_off_linearly() {
        let cfg = Config::default();
        let noise = NoiseField::new();
        let ripples = RippleSystem::new(0);
        let strategy = PointerFill;

        let ctx = FrameCtx {
            noise: &noise,
            ripples: &ripples,
            pointer: Some((0.0, 0.0)),
            t: 0.0,
        };
        assert!((strategy.target(0.0, 0.0, &ctx, &cfg) - 1.0).abs() < 1e-9);
        let half = strategy.target(cfg.pointer_radius * 0.5, 0.0, &ctx, &cfg);
        assert!((half - 0.5).abs() < 1e-9);
        assert_eq!(strategy.target(cfg.pointer_radius * 2.0, 0.0, &ctx, &cfg), 0.0);
    }

    #[test]
    fn absent_pointer_influences_nothing() {
        let cfg = Config::default();
        let noise = NoiseField::new();
        let ripples = RippleSystem::new(0);
        let ctx = FrameCtx {
            noise: &noise,
            ripples: &ripples,
            pointer: None,
            t: 0.0,
        };
        let strategy = PointerFill;
        for i in 0..20 {
            assert_eq!(strategy.target(i as f64 * 13.0, 7.0, &ctx, &cfg), 0.0);
        }
    }

    #[test]
    fn pointer_and_ripple_combine_by_max() {
        let cfg = Config::default();
        let noise = NoiseField::new();
        let mut ripples = RippleSystem::new(0);
        ripples.spawn((0.0, 0.0), 1000.0, 1.0, 1.0);
        let quiet = crate::config::RippleParams {
            spawn_interval: 0,
            ..cfg.ripple
        };
        for _ in 0..100 {
            ripples.advance(&quiet, 800.0, 600.0);
        }
        // Ring at radius 100 with fade 0.9; pointer sits on the same spot.
        let ring_v = ripples.influence_at(100.0, 0.0, cfg.ripple.ring_width);
        let ctx = FrameCtx {
            noise: &noise,
            ripples: &ripples,
            pointer: Some((100.0, 0.0)),
            t: 0.0,
        };
        let v = PointerFill.target(100.0, 0.0, &ctx, &cfg);
        // Pointer contributes a full 1.0 at zero distance; the combination
        // is exactly the max, not ring + pointer.
        assert!((v - 1.0_f64.max(ring_v)).abs() < 1e-9);
        assert!(v <= 1.0);
    }

    #[test]
    fn ambient_target_stays_in_unit_range() {
        let cfg = Config::default();
        let noise = NoiseField::new();
        let ripples = RippleSystem::new(0);
        let strategy = AmbientFill;
        for t in [0.0, 0.9, 4.2] {
            let ctx = FrameCtx {
                noise: &noise,
                ripples: &ripples,
                pointer: None,
                t,
            };
            for i in 0..40 {
                for j in 0..40 {
                    let v = strategy.target(i as f64 * 17.0, j as f64 * 13.0, &ctx, &cfg);
                    assert!((0.0..=1.0).contains(&v), "target out of range: {v}");
                }
            }
        }
    }
}
