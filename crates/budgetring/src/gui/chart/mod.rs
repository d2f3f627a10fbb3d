use ringchart::Point;
use std::time::Duration;

pub mod view;

pub use view::draw;

pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);
pub const MAX_FRAME_DELTA: Duration = Duration::from_millis(100); // after stalls or hide/show
pub const SHADOW_LAYERS: usize = 4;
pub const INDICATOR_SIZE: f64 = 9.0;
pub const CENTER_FILL_RATIO: f64 = 0.86; // center disc relative to the inner radius
pub const CENTER_TINT_ALPHA: f64 = 0.16;
pub const CENTER_ICON_RATIO: f64 = 0.7; // icon box relative to the center disc radius

/// Largest centered square inside a `width` x `height` area: its side and
/// its top-left corner.
pub fn square_origin(width: f64, height: f64) -> (f64, Point) {
    let side = width.min(height).max(0.0);
    (
        side,
        Point::new((width - side) / 2.0, (height - side) / 2.0),
    )
}
