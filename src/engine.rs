//! The animation engine proper: one struct owning the grid, the noise
//! field, the ripple system and the fill strategy. The host drives it with
//! `tick`, feeds it pointer/resize state between ticks, and reads cells
//! back out to draw. Nothing here touches the terminal.

use crate::config::{Config, FillMode};
use crate::fill::{self, FrameCtx, TargetFill};
use crate::grid::{Cell, Grid};
use crate::noise::NoiseField;
use crate::ripple::RippleSystem;

pub(crate) struct Engine {
    cfg: Config,
    noise: NoiseField,
    grid: Grid,
    ripples: RippleSystem,
    strategy: Box<dyn TargetFill>,
    pointer: Option<(f64, f64)>,
    width: f64,
    height: f64,
    t: f64,
    frame: u64,
}

impl Engine {
    pub(crate) fn new(cfg: Config, width: f64, height: f64) -> Self {
        let grid = Grid::build(width, height, cfg.hex_radius);
        let ripples = RippleSystem::new(cfg.seed);
        let strategy = fill::strategy_for(cfg.mode);
        Self {
            cfg,
            noise: NoiseField::new(),
            grid,
            ripples,
            strategy,
            pointer: None,
            width,
            height,
            t: 0.0,
            frame: 0,
        }
    }

    /// Rebuild the grid wholesale and restart the ripple population.
    /// Live ripples from the old surface are discarded; their centers may
    /// no longer exist.
    pub(crate) fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.grid = Grid::build(width, height, self.cfg.hex_radius);
        self.ripples
            .reseed(self.cfg.seed.wrapping_add(self.frame));
        self.pointer = None;
    }

    /// Written by the host between ticks; consumed at the next tick.
    pub(crate) fn set_pointer(&mut self, pointer: Option<(f64, f64)>) {
        self.pointer = pointer;
    }

    pub(crate) fn set_mode(&mut self, mode: FillMode) {
        if mode != self.cfg.mode {
            self.cfg.mode = mode;
            self.strategy = fill::strategy_for(mode);
        }
    }

    pub(crate) fn mode(&self) -> FillMode {
        self.cfg.mode
    }

    /// Drop a ripple at an explicit point (pointer press).
    pub(crate) fn splash(&mut self, x: f64, y: f64) {
        let p = &self.cfg.ripple;
        let max_radius = (p.radius_range.0 + p.radius_range.1) * 0.5;
        let speed = (p.speed_range.0 + p.speed_range.1) * 0.5;
        self.ripples
            .spawn((x, y), max_radius, speed, p.strength_range.1);
    }

    pub(crate) fn reseed_ripples(&mut self, seed: u64) {
        self.ripples.reseed(seed);
    }

    /// One frame: advance ripples (interactive mode only), then recompute
    /// every cell's target and smoothed fill.
    pub(crate) fn tick(&mut self, dt: f64) {
        self.t += dt;

        if self.cfg.mode == FillMode::Interactive {
            self.ripples.advance(&self.cfg.ripple, self.width, self.height);
        }

        let ctx = FrameCtx {
            noise: &self.noise,
            ripples: &self.ripples,
            pointer: self.pointer,
            t: self.t,
        };
        let strategy = &*self.strategy;
        let cfg = &self.cfg;
        for cell in self.grid.cells.iter_mut() {
            let target = strategy.target(cell.position.0, cell.position.1, &ctx, cfg);
            cell.target_fill = target;
            cell.fill = fill::smooth(cell.fill, target, cfg.attack_rate, cfg.release_rate);
        }

        self.frame = self.frame.wrapping_add(1);
    }

    pub(crate) fn cells(&self) -> &[Cell] {
        &self.grid.cells
    }

    pub(crate) fn hex_radius(&self) -> f64 {
        self.grid.hex_radius
    }

    pub(crate) fn ripple_count(&self) -> usize {
        self.ripples.len()
    }

    pub(crate) fn config(&self) -> &Config {
        &self.cfg
    }

    pub(crate) fn config_mut(&mut self) -> &mut Config {
        &mut self.cfg
    }
}
