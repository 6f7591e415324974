//! Screen-space UI: selection arrows, car specs and the controls hint.
//!
//! Positions are in a fixed 320x240 logical screen; renderers scale them to
//! their own resolution.

use crate::car::CarPars;
use crate::color::Color;
use crate::state::ShowcaseState;

pub const SCREEN_WIDTH: f64 = 320.0;
pub const SCREEN_HEIGHT: f64 = 240.0;

pub const TEXT_LEFT: f64 = 16.0;
/// Baseline of the car name, bottom-left of the screen
pub const NAME_TOP: f64 = 180.0;
pub const NAME_ADVANCE: f64 = 12.0;
pub const SPEC_ADVANCE: f64 = 8.0;
/// Logical width of one character cell
pub const GLYPH_WIDTH: f64 = 8.0;
/// Spec lines starting at or below this line are not drawn
pub const TEXT_LIMIT: f64 = 235.0;

pub const HINT: &str = "Analog Stick L/R: Switch Cars";
pub const HINT_POSITION: [f64; 2] = [16.0, 16.0];

const NAME_COLOR: Color = Color::WHITE;
const SPEC_COLOR: Color = Color::rgb8(0xAA, 0xAA, 0xAA);
const HINT_COLOR: Color = Color::rgb8(0x66, 0x66, 0xFF);
const DEBUG_COLOR: Color = Color::rgb8(0x66, 0xFF, 0x66);

const ARROW_COLOR: Color = Color::rgb8(0x60, 0x60, 0x60);
const ARROW_ACTIVE_COLOR: Color = Color::rgb8(0xFF, 0xD7, 0x00);
const HALO_COLOR: Color = Color::rgba8(0xFF, 0xD7, 0x00, 0x60);
const HALO_SCALE: f64 = 1.6;

pub const LEFT_ARROW: [[f64; 2]; 3] = [[12.0, 120.0], [32.0, 104.0], [32.0, 136.0]];
pub const RIGHT_ARROW: [[f64; 2]; 3] = [[308.0, 120.0], [288.0, 136.0], [288.0, 104.0]];

#[derive(Debug, Clone, PartialEq)]
pub enum OverlayItem {
    Text {
        position: [f64; 2],
        color: Color,
        text: String,
    },
    Triangle {
        points: [[f64; 2]; 3],
        color: Color,
    },
}

impl OverlayItem {
    fn text(x: f64, y: f64, color: Color, text: impl Into<String>) -> Self {
        OverlayItem::Text {
            position: [x, y],
            color,
            text: text.into(),
        }
    }
}

/// Builds the overlay for the current frame
pub fn build(state: &ShowcaseState, car: Option<&CarPars>) -> Vec<OverlayItem> {
    let mut items = Vec::new();
    push_arrow(&mut items, LEFT_ARROW, state.arrow_left);
    push_arrow(&mut items, RIGHT_ARROW, state.arrow_right);
    if let Some(car) = car {
        items.extend(car_text(&car.name, &car.specs, NAME_TOP));
    }
    items.push(OverlayItem::text(
        HINT_POSITION[0],
        HINT_POSITION[1],
        HINT_COLOR,
        HINT,
    ));
    items
}

fn push_arrow(items: &mut Vec<OverlayItem>, points: [[f64; 2]; 3], active: bool) {
    if active {
        items.push(OverlayItem::Triangle {
            points: scale_about_centroid(points, HALO_SCALE),
            color: HALO_COLOR,
        });
    }
    items.push(OverlayItem::Triangle {
        points,
        color: if active {
            ARROW_ACTIVE_COLOR
        } else {
            ARROW_COLOR
        },
    });
}

fn scale_about_centroid(points: [[f64; 2]; 3], factor: f64) -> [[f64; 2]; 3] {
    let cx = (points[0][0] + points[1][0] + points[2][0]) / 3.0;
    let cy = (points[0][1] + points[1][1] + points[2][1]) / 3.0;
    points.map(|[x, y]| [cx + (x - cx) * factor, cy + (y - cy) * factor])
}

/// Car name followed by as many spec lines as fit above `TEXT_LIMIT`
pub fn car_text(name: &str, specs: &[String], top: f64) -> Vec<OverlayItem> {
    let mut items = vec![OverlayItem::text(TEXT_LEFT, top, NAME_COLOR, name)];
    let mut y = top + NAME_ADVANCE;
    for spec in specs {
        if y >= TEXT_LIMIT {
            break;
        }
        items.push(OverlayItem::text(TEXT_LEFT, y, SPEC_COLOR, spec.as_str()));
        y += SPEC_ADVANCE;
    }
    items
}

/// Program version, turntable angle and frame rate, right-aligned in the
/// top-right corner
pub fn debug_lines(rotation_y: f64, fps: f64) -> Vec<OverlayItem> {
    let lines = [
        format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        format!("Angle: {:.2}", rotation_y),
        format!("FPS: {:.2}", fps),
    ];
    lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            let x = SCREEN_WIDTH - TEXT_LEFT - GLYPH_WIDTH * line.chars().count() as f64;
            OverlayItem::text(x, 32.0 + 8.0 * i as f64, DEBUG_COLOR, line)
        })
        .collect()
}
