//! Non-blocking event collection, mapped to app-level actions.

use crossterm::event::{
    self, Event, KeyCode, KeyEventKind, MouseButton, MouseEventKind,
};
use std::time::Duration;

#[derive(Clone, Copy, Debug)]
pub(crate) enum AppEvent {
    Quit,
    TogglePause,
    ToggleHud,
    ToggleMode,
    CyclePalette,
    Reseed,
    SpeedDown,
    SpeedUp,
    /// Pointer moved to a terminal cell.
    PointerMoved { col: u16, row: u16 },
    /// Pointer pressed (spawns a splash in interactive mode).
    PointerPressed { col: u16, row: u16 },
    /// Terminal lost focus; forget the pointer.
    PointerLeft,
    Resized,
}

pub(crate) fn collect_events() -> anyhow::Result<Vec<AppEvent>> {
    let mut out = Vec::new();
    while event::poll(Duration::from_millis(0))? {
        match event::read()? {
            Event::Key(k) if k.kind == KeyEventKind::Press => {
                let ev = match k.code {
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(AppEvent::Quit),
                    KeyCode::Char(' ') => Some(AppEvent::TogglePause),
                    KeyCode::Char('h') | KeyCode::Char('H') => Some(AppEvent::ToggleHud),
                    KeyCode::Char('m') | KeyCode::Char('M') => Some(AppEvent::ToggleMode),
                    KeyCode::Char('c') | KeyCode::Char('C') => Some(AppEvent::CyclePalette),
                    KeyCode::Char('r') | KeyCode::Char('R') => Some(AppEvent::Reseed),
                    KeyCode::Char('[') => Some(AppEvent::SpeedDown),
                    KeyCode::Char(']') => Some(AppEvent::SpeedUp),
                    _ => None,
                };
                if let Some(ev) = ev {
                    out.push(ev);
                }
            }
            Event::Mouse(m) => match m.kind {
                MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                    out.push(AppEvent::PointerMoved {
                        col: m.column,
                        row: m.row,
                    });
                }
                MouseEventKind::Down(MouseButton::Left) => {
                    out.push(AppEvent::PointerPressed {
                        col: m.column,
                        row: m.row,
                    });
                }
                _ => {}
            },
            Event::FocusLost => out.push(AppEvent::PointerLeft),
            Event::Resize(_, _) => out.push(AppEvent::Resized),
            _ => {}
        }
        if out.len() >= 64 {
            break;
        }
    }
    Ok(out)
}
