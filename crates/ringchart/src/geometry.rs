use crate::angle::{self, AngleRange};
use crate::category::{Category, CategoryId, Color};
use crate::center::lerp;
use crate::{
    INDICATOR_OFFSET, RING_MARGIN, SELECTED_SCALE, SELECTED_SHADOW_RADIUS,
    SELECTED_THICKNESS_FACTOR, SHADOW_RADIUS, THICKNESS_RATIO,
};
use palette::{Darken, FromColor, Hsla, Lighten, Srgba};

const GRADIENT_SHIFT: f64 = 0.12;
const HIT_SLOP: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn polar(center: Point, radius: f64, angle: f64) -> Self {
        Self::new(
            center.x + radius * angle.cos(),
            center.y + radius * angle.sin(),
        )
    }

    pub fn distance_to(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn angle_from(&self, center: Point) -> f64 {
        (self.y - center.y).atan2(self.x - center.x)
    }
}

/// Fixed ring proportions for a square drawing area of side `size`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingLayout {
    size: f64,
}

impl RingLayout {
    pub fn new(size: f64) -> Self {
        Self {
            size: size.max(0.0),
        }
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn center(&self) -> Point {
        Point::new(self.size / 2.0, self.size / 2.0)
    }

    pub fn outer_radius(&self) -> f64 {
        (self.size / 2.0 - RING_MARGIN).max(0.0)
    }

    pub fn thickness(&self) -> f64 {
        self.outer_radius() * THICKNESS_RATIO
    }

    pub fn inner_radius(&self) -> f64 {
        self.outer_radius() - self.thickness()
    }

    /// Radius of the circle the wedges are centered on.
    pub fn path_radius(&self) -> f64 {
        self.outer_radius() - self.thickness() / 2.0
    }

    pub fn indicator_position(&self, alignment: f64) -> Point {
        Point::polar(
            self.center(),
            self.outer_radius() + INDICATOR_OFFSET,
            alignment,
        )
    }
}

/// Two-stop self gradient of a wedge's own color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WedgeFill {
    pub start: Color,
    pub end: Color,
}

impl WedgeFill {
    pub fn from_color(color: Color) -> Self {
        let hsla: Hsla<palette::encoding::Srgb, f64> = Hsla::from_color(color);
        Self {
            start: Srgba::from_color(hsla.lighten(GRADIENT_SHIFT)),
            end: Srgba::from_color(hsla.darken(GRADIENT_SHIFT)),
        }
    }
}

/// Everything needed to draw one segment, in the unrotated ring frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Wedge {
    pub index: usize,
    pub id: CategoryId,
    pub range: AngleRange,
    pub path_radius: f64,
    pub line_width: f64,
    /// Scale about the ring center.
    pub scale: f64,
    pub shadow_radius: f64,
    pub selected: bool,
    pub fill: WedgeFill,
}

impl Wedge {
    pub fn inner_radius(&self) -> f64 {
        (self.path_radius - self.line_width / 2.0) * self.scale
    }

    pub fn outer_radius(&self) -> f64 {
        (self.path_radius + self.line_width / 2.0) * self.scale
    }

    /// Chord the fill gradient runs along.
    pub fn gradient_axis(&self, center: Point) -> (Point, Point) {
        let r = self.path_radius * self.scale;
        (
            Point::polar(center, r, self.range.start),
            Point::polar(center, r, self.range.end),
        )
    }
}

/// Builds the drawable wedges. `emphasis[i]` (0 = resting, 1 = fully
/// selected) comes from the chart's animations for `categories[i]`; missing
/// entries count as resting. `selected` is an index, so a duplicated id never
/// marks more than one wedge. A zero total yields no wedges at all.
pub fn wedges(
    categories: &[Category],
    selected: Option<usize>,
    emphasis: &[f64],
    layout: &RingLayout,
) -> Vec<Wedge> {
    angle::angle_ranges(categories)
        .into_iter()
        .zip(categories)
        .enumerate()
        .filter(|(_, (range, _))| !range.is_degenerate())
        .map(|(index, (range, category))| {
            let e = emphasis.get(index).copied().unwrap_or(0.0);
            Wedge {
                index,
                id: category.id().clone(),
                range,
                path_radius: layout.path_radius(),
                line_width: layout.thickness() * lerp(1.0, SELECTED_THICKNESS_FACTOR, e),
                scale: lerp(1.0, SELECTED_SCALE, e),
                shadow_radius: lerp(SHADOW_RADIUS, SELECTED_SHADOW_RADIUS, e),
                selected: selected == Some(index),
                fill: WedgeFill::from_color(category.color()),
            }
        })
        .collect()
}

/// Finds the wedge under `point`, given the ring's current rotation and
/// pulse scale. Taps inside the hole or outside the ring miss.
pub fn hit_test(
    point: Point,
    wedges: &[Wedge],
    layout: &RingLayout,
    rotation: f64,
    ring_scale: f64,
) -> Option<usize> {
    let center = layout.center();
    let distance = point.distance_to(center) / ring_scale.max(f64::EPSILON);

    let inner = layout.inner_radius() - HIT_SLOP;
    let outer = layout.outer_radius() * SELECTED_SCALE + HIT_SLOP;
    if distance < inner || distance > outer {
        return None;
    }

    let angle = angle::normalize_angle(point.angle_from(center) - rotation);
    wedges
        .iter()
        .find(|w| w.range.contains(angle))
        .map(|w| w.index)
}
