//! Pan and zoom state of the reconciliation graph canvas.
//!
//! Panning is a two-state machine driven by pointer events; zoom is a
//! separate scalar set by the slider. Neither is reset when the graph data
//! changes.

use crate::error::{ConsoleError, Result};
use crate::layout::{Bounds, NodeSize};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_ZOOM_PERCENT: f64 = 85.0;
pub const MIN_ZOOM_PERCENT: f64 = 5.0;

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PointerEvent {
    Down,
    /// Movement since the previous pointer event.
    Move { dx: f64, dy: f64 },
    Up,
    /// Pointer left the canvas.
    Leave,
}

impl fmt::Display for PointerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointerEvent::Down => f.write_str("down"),
            PointerEvent::Move { dx, dy } => write!(f, "move:{dx},{dy}"),
            PointerEvent::Up => f.write_str("up"),
            PointerEvent::Leave => f.write_str("leave"),
        }
    }
}

impl FromStr for PointerEvent {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || ConsoleError::InvalidPointerEvent(s.to_string());
        match s.trim() {
            "down" => Ok(PointerEvent::Down),
            "up" => Ok(PointerEvent::Up),
            "leave" => Ok(PointerEvent::Leave),
            other => {
                let delta = other.strip_prefix("move:").ok_or_else(invalid)?;
                let (dx, dy) = delta.split_once(',').ok_or_else(invalid)?;
                let dx: f64 = dx.trim().parse().map_err(|_| invalid())?;
                let dy: f64 = dy.trim().parse().map_err(|_| invalid())?;
                if !dx.is_finite() || !dy.is_finite() {
                    return Err(invalid());
                }
                Ok(PointerEvent::Move { dx, dy })
            }
        }
    }
}

/// Parse a whitespace-separated event script such as `down move:5,0 up`.
pub fn parse_events(script: &str) -> Result<Vec<PointerEvent>> {
    script.split_whitespace().map(str::parse).collect()
}

// ---------------------------------------------------------------------------
// Viewport
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PanState {
    Idle,
    Panning,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// The rectangle of graph space that the canvas shows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl fmt::Display for ViewBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.x, self.y, self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    zoom_percent: f64,
    pan: Point,
    state: PanState,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(DEFAULT_ZOOM_PERCENT)
    }
}

impl Viewport {
    pub fn new(zoom_percent: f64) -> Self {
        let mut v = Self {
            zoom_percent: DEFAULT_ZOOM_PERCENT,
            pan: Point::default(),
            state: PanState::Idle,
        };
        v.set_zoom(zoom_percent);
        v
    }

    pub fn zoom_percent(&self) -> f64 {
        self.zoom_percent
    }

    pub fn pan(&self) -> Point {
        self.pan
    }

    pub fn state(&self) -> PanState {
        self.state
    }

    pub fn is_panning(&self) -> bool {
        self.state == PanState::Panning
    }

    /// Feed one pointer event. Returns whether pan or state changed.
    pub fn handle(&mut self, event: PointerEvent) -> bool {
        match (self.state, event) {
            (PanState::Idle, PointerEvent::Down) => {
                self.state = PanState::Panning;
                true
            }
            (PanState::Panning, PointerEvent::Move { dx, dy }) => {
                self.pan.x += dx;
                self.pan.y += dy;
                dx != 0.0 || dy != 0.0
            }
            (PanState::Panning, PointerEvent::Up | PointerEvent::Leave) => {
                self.state = PanState::Idle;
                true
            }
            _ => false,
        }
    }

    /// Set zoom from the slider, clamped below at [`MIN_ZOOM_PERCENT`].
    /// Non-finite input is ignored. Returns the zoom now in effect.
    pub fn set_zoom(&mut self, percent: f64) -> f64 {
        if percent.is_finite() {
            self.zoom_percent = percent.max(MIN_ZOOM_PERCENT);
        }
        self.zoom_percent
    }

    /// View box over the laid-out graph, centred on the bounds: lower zoom
    /// shows more of it, pan drags the content along with the pointer.
    pub fn view_box(&self, bounds: &Bounds, size: &NodeSize) -> ViewBox {
        let scale = 100.0 / self.zoom_percent;
        let width = (bounds.width() + size.horizontal_separation) * scale;
        let height = (bounds.height() + size.vertical_separation) * scale;
        let center_x = (bounds.min_x + bounds.max_x) / 2.0;
        let center_y = (bounds.min_y + bounds.max_y) / 2.0;
        ViewBox {
            x: center_x - width / 2.0 - self.pan.x * scale,
            y: center_y - height / 2.0 - self.pan.y * scale,
            width,
            height,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
