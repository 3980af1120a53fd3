//! Engine tuning knobs. Plain values with defaults matching the reference
//! behavior; the app layer swaps in terminal-scaled spatial constants.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FillMode {
    /// Fill levels follow the breathing noise field.
    Ambient,
    /// Fill levels follow pointer proximity and expanding ripples.
    Interactive,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Rgb {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
}

impl Rgb {
    pub(crate) const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Linear per-channel interpolation, t clamped to [0, 1].
    pub(crate) fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| -> u8 {
            (a as f64 + (b as f64 - a as f64) * t).round().clamp(0.0, 255.0) as u8
        };
        Rgb {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
        }
    }

    pub(crate) fn to_color(self) -> crossterm::style::Color {
        crossterm::style::Color::Rgb {
            r: self.r,
            g: self.g,
            b: self.b,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct NoiseParams {
    pub(crate) octaves: u32,
    pub(crate) lacunarity: f64,
    pub(crate) gain: f64,
    /// Surface units -> noise units.
    pub(crate) base_scale: f64,
    /// Temporal rate of the per-octave amplitude oscillation.
    pub(crate) speed: f64,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            octaves: 3,
            lacunarity: 2.0,
            gain: 0.5,
            base_scale: 0.015,
            speed: 0.8,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct RippleParams {
    /// Maximum number of live ripples.
    pub(crate) cap: usize,
    /// Spawn attempt every N frames; 0 disables autonomous spawning.
    pub(crate) spawn_interval: u64,
    pub(crate) spawn_min: usize,
    pub(crate) spawn_max: usize,
    /// Half-width of the bright expanding band.
    pub(crate) ring_width: f64,
    pub(crate) radius_range: (f64, f64),
    pub(crate) speed_range: (f64, f64),
    pub(crate) strength_range: (f64, f64),
}

impl Default for RippleParams {
    fn default() -> Self {
        Self {
            cap: 8,
            spawn_interval: 60,
            spawn_min: 1,
            spawn_max: 2,
            ring_width: 40.0,
            radius_range: (100.0, 250.0),
            speed_range: (0.8, 2.0),
            strength_range: (0.3, 0.8),
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Config {
    pub(crate) mode: FillMode,
    pub(crate) hex_radius: f64,
    /// Fill gradient endpoints; a cell's color is min..max by fill level.
    pub(crate) min_color: Rgb,
    pub(crate) max_color: Rgb,
    pub(crate) outline_color: Rgb,
    /// Background vertical gradient.
    pub(crate) bg_top: Rgb,
    pub(crate) bg_bottom: Rgb,
    pub(crate) noise: NoiseParams,
    pub(crate) ripple: RippleParams,
    /// Smoothing rate when a cell brightens toward its target.
    pub(crate) attack_rate: f64,
    /// Smoothing rate when it fades; slower than attack so glow trails.
    pub(crate) release_rate: f64,
    /// Pointer proximity influence radius (interactive mode).
    pub(crate) pointer_radius: f64,
    pub(crate) seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: FillMode::Ambient,
            hex_radius: 18.0,
            min_color: Rgb::new(18, 26, 48),
            max_color: Rgb::new(120, 220, 255),
            outline_color: Rgb::new(50, 62, 90),
            bg_top: Rgb::new(8, 10, 22),
            bg_bottom: Rgb::new(14, 18, 34),
            noise: NoiseParams::default(),
            ripple: RippleParams::default(),
            attack_rate: 0.1,
            release_rate: 0.03,
            pointer_radius: 120.0,
            seed: 0xC0FFEE,
        }
    }
}

pub(crate) struct Palette {
    pub(crate) name: &'static str,
    pub(crate) min_color: Rgb,
    pub(crate) max_color: Rgb,
    pub(crate) outline_color: Rgb,
    pub(crate) bg_top: Rgb,
    pub(crate) bg_bottom: Rgb,
}

pub(crate) const PALETTES: &[Palette] = &[
    Palette {
        name: "Glacier",
        min_color: Rgb::new(18, 26, 48),
        max_color: Rgb::new(120, 220, 255),
        outline_color: Rgb::new(50, 62, 90),
        bg_top: Rgb::new(8, 10, 22),
        bg_bottom: Rgb::new(14, 18, 34),
    },
    Palette {
        name: "Ember",
        min_color: Rgb::new(40, 16, 10),
        max_color: Rgb::new(255, 180, 70),
        outline_color: Rgb::new(90, 44, 28),
        bg_top: Rgb::new(16, 6, 4),
        bg_bottom: Rgb::new(28, 12, 8),
    },
    Palette {
        name: "Moss",
        min_color: Rgb::new(12, 30, 18),
        max_color: Rgb::new(140, 255, 160),
        outline_color: Rgb::new(40, 70, 48),
        bg_top: Rgb::new(4, 12, 8),
        bg_bottom: Rgb::new(10, 20, 12),
    },
    Palette {
        name: "Violet",
        min_color: Rgb::new(28, 14, 44),
        max_color: Rgb::new(220, 140, 255),
        outline_color: Rgb::new(70, 44, 100),
        bg_top: Rgb::new(10, 4, 18),
        bg_bottom: Rgb::new(18, 10, 30),
    },
];

impl Config {
    pub(crate) fn apply_palette(&mut self, p: &Palette) {
        self.min_color = p.min_color;
        self.max_color = p.max_color;
        self.outline_color = p.outline_color;
        self.bg_top = p.bg_top;
        self.bg_bottom = p.bg_bottom;
    }
}
