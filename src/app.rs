//! Frame loop and host glue: terminal setup, pointer/resize ingestion,
//! per-frame engine tick, hexagon drawing, HUD, pacing, teardown.

use crate::config::{Config, FillMode, PALETTES};
use crate::engine::Engine;
use crate::input::{collect_events, AppEvent};
use crate::render::{
    canvas_to_cells, draw_text, hexagon, PixelCanvas, Pixel, Terminal, SUB_H, SUB_W,
};
use std::time::{Duration, Instant};

const FPS_CAP: u32 = 30;
/// Fills below this are not worth painting; the outline still is.
const MIN_VISIBLE_FILL: f64 = 0.01;
/// One terminal row at the bottom is reserved for the HUD.
const HUD_ROWS: u16 = 1;

/// Spatial constants tuned for braille-subpixel resolution. The engine's
/// reference defaults assume a much larger surface.
fn terminal_config() -> Config {
    let mut cfg = Config {
        mode: FillMode::Ambient,
        hex_radius: 5.0,
        pointer_radius: 26.0,
        ..Config::default()
    };
    cfg.noise.base_scale = 0.05;
    cfg.ripple.ring_width = 10.0;
    cfg.ripple.radius_range = (22.0, 55.0);
    cfg.ripple.speed_range = (0.4, 1.1);
    cfg.apply_palette(&PALETTES[0]);
    cfg
}

struct App {
    term: Terminal,
    canvas: PixelCanvas,
    engine: Engine,
    palette_i: usize,
    paused: bool,
    show_hud: bool,
    sim_speed: f64,
    should_quit: bool,
}

impl App {
    fn init() -> anyhow::Result<Self> {
        let term = Terminal::begin()?;
        let (cw, ch) = canvas_size(term.cols, term.rows);
        let canvas = PixelCanvas::new(cw, ch);
        let engine = Engine::new(terminal_config(), cw as f64, ch as f64);
        Ok(Self {
            term,
            canvas,
            engine,
            palette_i: 0,
            paused: false,
            show_hud: true,
            sim_speed: 1.0,
            should_quit: false,
        })
    }

    fn run(&mut self) -> anyhow::Result<()> {
        let frame_dt = Duration::from_secs_f64(1.0 / FPS_CAP as f64);
        let mut fps_timer = Instant::now();
        let mut frames: u32 = 0;
        let mut fps: f64 = 0.0;
        let mut last = Instant::now();

        while !self.should_quit {
            let frame_start = Instant::now();

            if self.term.resize_if_needed()? {
                self.rebuild_surface();
            }

            for ev in collect_events()? {
                self.apply(ev);
            }
            if self.should_quit {
                break;
            }

            let now = Instant::now();
            let dt = now.saturating_duration_since(last).as_secs_f64();
            last = now;
            if !self.paused {
                self.engine.tick(dt * self.sim_speed);
            }

            frames += 1;
            if fps_timer.elapsed() >= Duration::from_millis(500) {
                fps = frames as f64 / fps_timer.elapsed().as_secs_f64();
                fps_timer = Instant::now();
                frames = 0;
            }

            self.render_frame(fps)?;
            spin_sleep(frame_dt, frame_start);
        }

        self.term.end()
    }

    fn rebuild_surface(&mut self) {
        let (cw, ch) = canvas_size(self.term.cols, self.term.rows);
        self.canvas = PixelCanvas::new(cw, ch);
        self.engine.resize(cw as f64, ch as f64);
    }

    fn apply(&mut self, ev: AppEvent) {
        match ev {
            AppEvent::Quit => self.should_quit = true,
            AppEvent::TogglePause => self.paused = !self.paused,
            AppEvent::ToggleHud => self.show_hud = !self.show_hud,
            AppEvent::ToggleMode => {
                let next = match self.engine.mode() {
                    FillMode::Ambient => FillMode::Interactive,
                    FillMode::Interactive => FillMode::Ambient,
                };
                self.engine.set_mode(next);
            }
            AppEvent::CyclePalette => {
                self.palette_i = (self.palette_i + 1) % PALETTES.len();
                self.engine.config_mut().apply_palette(&PALETTES[self.palette_i]);
            }
            AppEvent::Reseed => {
                let seed = std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .map(|d| d.as_nanos() as u64)
                    .unwrap_or(0x9E37_79B9);
                self.engine.reseed_ripples(seed);
            }
            AppEvent::SpeedDown => self.sim_speed = (self.sim_speed - 0.25).max(0.25),
            AppEvent::SpeedUp => self.sim_speed = (self.sim_speed + 0.25).min(4.0),
            AppEvent::PointerMoved { col, row } => {
                self.engine.set_pointer(self.pointer_to_surface(col, row));
            }
            AppEvent::PointerPressed { col, row } => {
                if let Some((x, y)) = self.pointer_to_surface(col, row) {
                    self.engine.set_pointer(Some((x, y)));
                    if self.engine.mode() == FillMode::Interactive {
                        self.engine.splash(x, y);
                    }
                }
            }
            AppEvent::PointerLeft => self.engine.set_pointer(None),
            // The size poll at the top of the next frame handles it.
            AppEvent::Resized => {}
        }
    }

    /// Terminal cell -> subpixel surface coordinates; None outside the
    /// drawable region (e.g. over the HUD).
    fn pointer_to_surface(&self, col: u16, row: u16) -> Option<(f64, f64)> {
        if row >= self.term.rows.saturating_sub(HUD_ROWS) {
            return None;
        }
        Some((
            (col as f64 + 0.5) * SUB_W as f64,
            (row as f64 + 0.5) * SUB_H as f64,
        ))
    }

    fn render_frame(&mut self, fps: f64) -> anyhow::Result<()> {
        self.canvas.clear();

        let cfg = self.engine.config();
        let min_color = cfg.min_color;
        let max_color = cfg.max_color;
        let outline = Pixel::opaque(cfg.outline_color);
        let bg_top = cfg.bg_top;
        let bg_bottom = cfg.bg_bottom;
        let r = self.engine.hex_radius();

        // Hex body radius is slightly inset so neighbouring outlines read
        // as separate cells at subpixel resolution.
        let body = r * 0.92;
        for cell in self.engine.cells() {
            let (cx, cy) = cell.position;
            if cx < -r || cy < -r || cx > self.canvas.w as f64 + r || cy > self.canvas.h as f64 + r
            {
                continue;
            }
            let pts = hexagon(cx, cy, body);
            if cell.fill > MIN_VISIBLE_FILL {
                let color = min_color.lerp(max_color, cell.fill);
                self.canvas.fill_convex_poly(&pts, Pixel::opaque(color));
            }
            self.canvas.stroke_poly(&pts, outline);
        }

        canvas_to_cells(&self.canvas, &mut self.term.cur, bg_top, bg_bottom);

        let hud_y = self.term.rows.saturating_sub(HUD_ROWS);
        let hud_fg = crossterm::style::Color::DarkGrey;
        let hud_bg = crossterm::style::Color::Black;
        for x in 0..self.term.cols {
            draw_text(&mut self.term.cur, x, hud_y, " ", hud_fg, hud_bg);
        }
        if self.show_hud {
            let mode = match self.engine.mode() {
                FillMode::Ambient => "ambient",
                FillMode::Interactive => "interactive",
            };
            let line = format!(
                "hexglow | Q quit | SPACE pause{} | M mode {} | C palette {} | R reseed | [ ] speed {:.2}x | H hud | cells {} | ripples {} | {:.1} fps",
                if self.paused { " (paused)" } else { "" },
                mode,
                PALETTES[self.palette_i].name,
                self.sim_speed,
                self.engine.cells().len(),
                self.engine.ripple_count(),
                fps,
            );
            draw_text(&mut self.term.cur, 0, hud_y, &line, hud_fg, hud_bg);
        }

        self.term.present()
    }
}

/// Drawable canvas size in braille subpixels, HUD row excluded.
fn canvas_size(cols: u16, rows: u16) -> (u32, u32) {
    let draw_rows = rows.saturating_sub(HUD_ROWS);
    (cols as u32 * SUB_W, draw_rows as u32 * SUB_H)
}

/// Coarse sleep until ~2ms before the deadline, then spin for accuracy.
fn spin_sleep(target: Duration, frame_start: Instant) {
    let end = frame_start + target;
    loop {
        let t = Instant::now();
        if t >= end {
            break;
        }
        if end - t > Duration::from_millis(2) {
            std::thread::sleep(Duration::from_millis(1));
        } else {
            std::hint::spin_loop();
        }
    }
}

pub(crate) fn run() -> anyhow::Result<()> {
    let mut app = App::init()?;
    app.run()
}
