//! Deterministic 2D gradient noise over a fixed permutation table, plus a
//! fractal sum whose octave amplitudes breathe over time instead of the
//! field scrolling.

use crate::config::NoiseParams;

// Ken Perlin's reference permutation. Fixed so every run of the program
// produces the same field.
const PERM: [u8; 256] = [
    151, 160, 137, 91, 90, 15, 131, 13, 201, 95, 96, 53, 194, 233, 7, 225, 140, 36, 103, 30, 69,
    142, 8, 99, 37, 240, 21, 10, 23, 190, 6, 148, 247, 120, 234, 75, 0, 26, 197, 62, 94, 252, 219,
    203, 117, 35, 11, 32, 57, 177, 33, 88, 237, 149, 56, 87, 174, 20, 125, 136, 171, 168, 68, 175,
    74, 165, 71, 134, 139, 48, 27, 166, 77, 146, 158, 231, 83, 111, 229, 122, 60, 211, 133, 230,
    220, 105, 92, 41, 55, 46, 245, 40, 244, 102, 143, 54, 65, 25, 63, 161, 1, 216, 80, 73, 209,
    76, 132, 187, 208, 89, 18, 169, 200, 196, 135, 130, 116, 188, 159, 86, 164, 100, 109, 198,
    173, 186, 3, 64, 52, 217, 226, 250, 124, 123, 5, 202, 38, 147, 118, 126, 255, 82, 85, 212,
    207, 206, 59, 227, 47, 16, 58, 17, 182, 189, 28, 42, 223, 183, 170, 213, 119, 248, 152, 2, 44,
    154, 163, 70, 221, 153, 101, 155, 167, 43, 172, 9, 129, 22, 39, 253, 19, 98, 108, 110, 79,
    113, 224, 232, 178, 185, 112, 104, 218, 246, 97, 228, 251, 34, 242, 193, 238, 210, 144, 12,
    191, 179, 162, 241, 81, 51, 145, 235, 249, 14, 239, 107, 49, 192, 214, 31, 181, 199, 106, 157,
    184, 84, 204, 176, 115, 121, 50, 45, 127, 4, 150, 254, 138, 236, 205, 93, 222, 114, 67, 29,
    24, 72, 243, 141, 128, 195, 78, 66, 215, 61, 156, 180,
];

pub(crate) struct NoiseField {
    // Doubled so corner lookups never need a wraparound branch.
    perm: [u8; 512],
}

impl NoiseField {
    pub(crate) fn new() -> Self {
        let mut perm = [0u8; 512];
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = PERM[i & 255];
        }
        Self { perm }
    }

    /// Gradient noise in roughly [-1, 1]. Pure function of its inputs.
    pub(crate) fn noise2(&self, x: f64, y: f64) -> f64 {
        let xi = (x.floor() as i64 & 255) as usize;
        let yi = (y.floor() as i64 & 255) as usize;
        let xf = x - x.floor();
        let yf = y - y.floor();

        let u = fade(xf);
        let v = fade(yf);

        let p = &self.perm;
        let aa = p[p[xi] as usize + yi];
        let ab = p[p[xi] as usize + yi + 1];
        let ba = p[p[xi + 1] as usize + yi];
        let bb = p[p[xi + 1] as usize + yi + 1];

        let x1 = lerp(grad(aa, xf, yf), grad(ba, xf - 1.0, yf), u);
        let x2 = lerp(grad(ab, xf, yf - 1.0), grad(bb, xf - 1.0, yf - 1.0), u);
        lerp(x1, x2, v)
    }

    /// Fractal sum of `octaves` layers. Each octave's amplitude oscillates
    /// with time so the field pulses in place; the result is normalised by
    /// the total absolute weight to stay near [-1, 1].
    pub(crate) fn fbm(&self, x: f64, y: f64, t: f64, params: &NoiseParams) -> f64 {
        let mut amp = 1.0;
        let mut freq = 1.0;
        let mut sum = 0.0;
        let mut norm = 0.0;

        for o in 0..params.octaves {
            let o = o as f64;
            let osc = 0.6 + 0.4 * (t * params.speed * (o + 1.0) + o * 1.7).sin();
            let w = amp * osc;
            sum += w * self.noise2(x * freq, y * freq);
            norm += w.abs();
            amp *= params.gain;
            freq *= params.lacunarity;
        }

        if norm == 0.0 {
            0.0
        } else {
            sum / norm
        }
    }
}

/// Smootherstep: 6t^5 - 15t^4 + 10t^3.
#[inline]
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// One of four fixed gradient directions, dotted with the corner offset.
#[inline]
fn grad(hash: u8, x: f64, y: f64) -> f64 {
    match hash & 3 {
        0 => x + y,
        1 => -x + y,
        2 => x - y,
        _ => -x - y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noise_is_deterministic() {
        let a = NoiseField::new();
        let b = NoiseField::new();
        for i in 0..50 {
            let x = i as f64 * 1.37 - 20.0;
            let y = i as f64 * 0.91 + 3.0;
            let va = a.noise2(x, y);
            assert_eq!(va.to_bits(), a.noise2(x, y).to_bits());
            assert_eq!(va.to_bits(), b.noise2(x, y).to_bits());
        }
    }

    #[test]
    fn noise_golden_values() {
        let n = NoiseField::new();
        // Lattice points have zero fractional offset, so every corner dot
        // product vanishes.
        assert_eq!(n.noise2(0.0, 0.0), 0.0);
        assert!((n.noise2(12.3, 45.6) - 0.5968415078400011).abs() < 1e-12);
        assert!((n.noise2(3.7, -2.2) - 0.5716472192).abs() < 1e-12);
        assert!((n.noise2(0.25, 0.75) - 0.3554420471191406).abs() < 1e-12);
    }

    #[test]
    fn noise_is_bounded() {
        let n = NoiseField::new();
        for i in 0..200 {
            for j in 0..200 {
                let v = n.noise2(i as f64 * 0.173 + 0.05, j as f64 * 0.131 - 13.07);
                assert!(v > -1.2 && v < 1.2, "noise2 out of range: {v}");
            }
        }
    }

    #[test]
    fn fade_endpoints() {
        assert_eq!(fade(0.0), 0.0);
        assert_eq!(fade(1.0), 1.0);
        assert_eq!(fade(0.5), 0.5);
    }

    #[test]
    fn fbm_is_bounded() {
        let n = NoiseField::new();
        let params = NoiseParams::default();
        for i in 0..60 {
            for j in 0..60 {
                for t in [0.0, 1.3, 7.7] {
                    let v = n.fbm(i as f64 * 0.217, j as f64 * 0.179, t, &params);
                    assert!((-1.0..=1.0).contains(&v), "fbm out of range: {v}");
                }
            }
        }
    }

    #[test]
    fn fbm_zero_octaves_returns_zero() {
        let n = NoiseField::new();
        let params = NoiseParams {
            octaves: 0,
            ..NoiseParams::default()
        };
        let v = n.fbm(3.0, 4.0, 1.0, &params);
        assert_eq!(v, 0.0);
        assert!(v.is_finite());
    }

    #[test]
    fn fbm_pulses_in_place() {
        // With a single octave the oscillation weight cancels in the
        // normalisation (it is always positive), so time cannot move the
        // sampled value at all: amplitude modulation, not translation.
        let n = NoiseField::new();
        let params = NoiseParams {
            octaves: 1,
            ..NoiseParams::default()
        };
        let raw = n.noise2(5.5, 5.5);
        for t in [0.0, 0.7, 3.1, 100.0] {
            assert!((n.fbm(5.5, 5.5, t, &params) - raw).abs() < 1e-12);
        }
    }
}
