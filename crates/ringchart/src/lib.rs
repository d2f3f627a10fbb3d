//! Geometry, selection and motion engine for a single ring of proportional
//! segments ("donut chart").
//!
//! The engine is toolkit independent: hosts feed it categories, a size and
//! frame deltas, and read back wedge geometry, the ring rotation, the center
//! content and accessibility labels.

use std::f64::consts::PI;
use std::time::Duration;

#[macro_use]
pub mod macros;

pub mod angle;
pub mod category;
pub mod center;
pub mod chart;
pub mod command;
pub mod geometry;
pub mod labels;
pub mod motion;
pub mod rotation;
pub mod state;

pub use angle::{AngleRange, angle_range, angle_ranges};
pub use category::{Category, CategoryError, CategoryId, CategoryName, Color, SymbolName};
pub use center::{CenterContent, CenterFrame, CenterSnapshot, CenterView};
pub use chart::{ChartEvent, ChartOptions, DonutChart, SubscriptionId};
pub use command::{Command, CommandError, MotionMode, SOCKET_PATH};
pub use geometry::{Point, RingLayout, Wedge, WedgeFill};
pub use labels::{SegmentLabel, ValueFormatter};
pub use motion::{AnimatedValue, MotionPolicy, PopPulse, Spring, Transition, TransitionKind};
pub use rotation::RotationController;
pub use state::{ChartState, Replacement, Selection, SelectionChange};

pub const START_OFFSET: f64 = -PI / 2.0; // index 0 starts at 12 o'clock
pub const FULL_TURN: f64 = 2.0 * PI;

pub const RING_MARGIN: f64 = 20.0;
pub const THICKNESS_RATIO: f64 = 0.2; // relative to the outer radius
pub const INDICATOR_OFFSET: f64 = 10.0;

// Selection emphasis
pub const SELECTED_THICKNESS_FACTOR: f64 = 1.32;
pub const SELECTED_SCALE: f64 = 1.1;
pub const SHADOW_RADIUS: f64 = 2.0;
pub const SELECTED_SHADOW_RADIUS: f64 = 8.0;

// Count-change pulse
pub const PULSE_PEAK_SCALE: f64 = 1.08;
pub const PULSE_WINDOW: Duration = Duration::from_millis(280);

pub const REDUCED_MOTION_DURATION: Duration = Duration::from_millis(100);
pub const DEFAULT_ALIGNMENT_ANGLE: f64 = 0.0; // right edge
pub const PLACEHOLDER_LABEL: &str = "No data";
