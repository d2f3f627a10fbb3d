use super::{
    CENTER_FILL_RATIO, CENTER_ICON_RATIO, CENTER_TINT_ALPHA, INDICATOR_SIZE, SHADOW_LAYERS,
};
use crate::gui::icon::IconCache;
use crate::gui::theme::ThemeColors;
use cairo::{Context, LinearGradient};
use gdk_pixbuf::Pixbuf;
use gdk4::prelude::*;
use palette::Srgba;
use ringchart::center::CenterLayer;
use ringchart::{CenterView, DonutChart, PLACEHOLDER_LABEL, Point, RingLayout, Wedge};
use std::f64::consts::PI;

struct WedgeRenderer<'a> {
    wedge: &'a Wedge,
    center: Point,
}

impl<'a> WedgeRenderer<'a> {
    fn new(wedge: &'a Wedge, center: Point) -> Self {
        Self { wedge, center }
    }

    fn draw(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        self.draw_shadow(cr, colors)?;
        self.draw_fill(cr)
    }

    /// Soft shadow built from a few widening, mostly transparent copies of
    /// the wedge outline.
    fn draw_shadow(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        let (r, g, b, a) = colors.shadow.into_components();
        let layer_alpha = a / SHADOW_LAYERS as f64;

        for layer in (1..=SHADOW_LAYERS).rev() {
            let spread = self.wedge.shadow_radius * layer as f64 / SHADOW_LAYERS as f64;
            cr.set_source_rgba(r, g, b, layer_alpha);
            self.annulus(cr, spread);
            cr.fill()?;
        }
        Ok(())
    }

    fn draw_fill(&self, cr: &Context) -> Result<(), cairo::Error> {
        let (from, to) = self.wedge.gradient_axis(self.center);
        let gradient = LinearGradient::new(from.x, from.y, to.x, to.y);
        let (r0, g0, b0, a0) = self.wedge.fill.start.into_components();
        let (r1, g1, b1, a1) = self.wedge.fill.end.into_components();
        gradient.add_color_stop_rgba(0.0, r0, g0, b0, a0);
        gradient.add_color_stop_rgba(1.0, r1, g1, b1, a1);

        cr.set_source(&gradient)?;
        self.annulus(cr, 0.0);
        cr.fill()
    }

    fn annulus(&self, cr: &Context, grow: f64) {
        let inner = (self.wedge.inner_radius() - grow).max(0.0);
        let outer = self.wedge.outer_radius() + grow;
        let (start, end) = (self.wedge.range.start, self.wedge.range.end);

        cr.new_path();
        cr.arc(self.center.x, self.center.y, outer, start, end);
        cr.arc_negative(self.center.x, self.center.y, inner, end, start);
        cr.close_path();
    }
}

struct CenterRenderer<'a> {
    layer: CenterLayer<'a>,
    center: Point,
    radius: f64,
}

impl<'a> CenterRenderer<'a> {
    fn draw(
        &self,
        cr: &Context,
        colors: &ThemeColors,
        icons: &mut IconCache,
    ) -> Result<(), cairo::Error> {
        if self.layer.opacity <= 0.0 {
            return Ok(());
        }

        cr.push_group();
        cr.translate(self.center.x, self.center.y);
        cr.scale(self.layer.scale, self.layer.scale);
        cr.translate(-self.center.x, -self.center.y);

        let drawn = self.draw_contents(cr, colors, icons);

        // always balance the group, even if drawing failed halfway
        cr.pop_group_to_source()?;
        drawn?;
        cr.paint_with_alpha(self.layer.opacity)
    }

    fn draw_contents(
        &self,
        cr: &Context,
        colors: &ThemeColors,
        icons: &mut IconCache,
    ) -> Result<(), cairo::Error> {
        let snapshot = match self.layer.view {
            CenterView::Placeholder => {
                return draw_centered_text(
                    cr,
                    PLACEHOLDER_LABEL,
                    self.center,
                    14.0,
                    colors.placeholder,
                );
            }
            CenterView::Category(snapshot) => snapshot,
        };

        self.draw_tint(cr, snapshot.color)?;
        let icon_box = self.radius * CENTER_ICON_RATIO;
        if let Some(pixbuf) = icons.get(&snapshot.symbol) {
            let icon_center = Point::new(self.center.x, self.center.y - icon_box * 0.35);
            draw_icon(cr, pixbuf, icon_center, icon_box * 0.6)?;
        }
        let value_at = Point::new(self.center.x, self.center.y + self.radius * 0.3);
        draw_centered_text(cr, &snapshot.formatted_value, value_at, 15.0, colors.text)?;
        let name_at = Point::new(self.center.x, self.center.y + self.radius * 0.55);
        draw_centered_text(cr, snapshot.name.as_str(), name_at, 10.0, colors.placeholder)
    }

    fn draw_tint(&self, cr: &Context, color: Srgba<f64>) -> Result<(), cairo::Error> {
        let (r, g, b, _) = color.into_components();
        cr.set_source_rgba(r, g, b, CENTER_TINT_ALPHA);
        cr.arc(self.center.x, self.center.y, self.radius, 0.0, 2.0 * PI);
        cr.fill()
    }
}

fn draw_icon(cr: &Context, pixbuf: &Pixbuf, center: Point, size: f64) -> Result<(), cairo::Error> {
    // fit icon into the box
    let icon_scale = size / pixbuf.width().max(pixbuf.height()).max(1) as f64;
    let (iw, ih) = (
        pixbuf.width() as f64 * icon_scale,
        pixbuf.height() as f64 * icon_scale,
    );

    cr.save()?;
    cr.translate(center.x - iw / 2.0, center.y - ih / 2.0);
    cr.scale(icon_scale, icon_scale);
    cr.set_source_pixbuf(pixbuf, 0.0, 0.0);
    cr.paint()?;
    cr.restore()
}

fn draw_centered_text(
    cr: &Context,
    text: &str,
    at: Point,
    font_size: f64,
    color: Srgba<f64>,
) -> Result<(), cairo::Error> {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
    cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
    cr.set_font_size(font_size);
    if let Ok(ext) = cr.text_extents(text) {
        cr.move_to(
            at.x - ext.width() / 2.0 - ext.x_bearing(),
            at.y + ext.height() / 2.0,
        );
        cr.show_text(text)?;
    }
    Ok(())
}

fn draw_track(cr: &Context, layout: &RingLayout, colors: &ThemeColors) -> Result<(), cairo::Error> {
    let center = layout.center();
    let (r, g, b, a) = colors.track.into_components();
    cr.set_source_rgba(r, g, b, a);
    cr.set_line_width(layout.thickness());
    cr.new_path();
    cr.arc(center.x, center.y, layout.path_radius(), 0.0, 2.0 * PI);
    cr.stroke()
}

/// Triangle just outside the ring, pointing at its center.
fn draw_indicator(
    cr: &Context,
    tip: Point,
    center: Point,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    let angle = tip.angle_from(center);
    let back = Point::polar(tip, INDICATOR_SIZE, angle);
    let side = Point::polar(Point::default(), INDICATOR_SIZE * 0.6, angle + PI / 2.0);

    let (r, g, b, a) = colors.indicator.into_components();
    cr.set_source_rgba(r, g, b, a);
    cr.new_path();
    cr.move_to(tip.x, tip.y);
    cr.line_to(back.x + side.x, back.y + side.y);
    cr.line_to(back.x - side.x, back.y - side.y);
    cr.close_path();
    cr.fill()
}

/// Runs `f` between `save` and `restore`. The state is restored even when
/// `f` fails; `f`'s error wins over a failing restore.
fn with_saved_state<F>(cr: &Context, f: F) -> Result<(), cairo::Error>
where
    F: FnOnce() -> Result<(), cairo::Error>,
{
    cr.save()?;
    let drawn = f();
    let restored = cr.restore();
    drawn.and(restored)
}

/// Renders the whole chart into the square whose top-left corner is `origin`.
pub fn draw(
    cr: &Context,
    chart: &DonutChart,
    origin: Point,
    colors: &ThemeColors,
    icons: &mut IconCache,
) -> Result<(), cairo::Error> {
    let layout = chart.layout();
    let center = layout.center();

    with_saved_state(cr, || {
        cr.translate(origin.x, origin.y);
        draw_track(cr, layout, colors)?;

        // Ring frame: pulse scale and rotation about the center
        with_saved_state(cr, || {
            cr.translate(center.x, center.y);
            cr.scale(chart.pulse_scale(), chart.pulse_scale());
            cr.rotate(chart.rotation_angle());
            cr.translate(-center.x, -center.y);

            // selected wedge last so its shadow lies over its neighbours
            let (selected, resting): (Vec<_>, Vec<_>) =
                chart.wedges().into_iter().partition(|w| w.selected);
            resting
                .iter()
                .chain(&selected)
                .try_for_each(|wedge| WedgeRenderer::new(wedge, center).draw(cr, colors))
        })?;

        if !chart.categories().is_empty() {
            draw_indicator(cr, chart.indicator_position(), center, colors)?;
        }

        let frame = chart.center_frame();
        let radius = layout.inner_radius() * CENTER_FILL_RATIO;
        frame
            .outgoing
            .into_iter()
            .chain([frame.incoming])
            .try_for_each(|layer| {
                CenterRenderer {
                    layer,
                    center,
                    radius,
                }
                .draw(cr, colors, icons)
            })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cairo::{Format, ImageSurface};
    use ringchart::{Category, ChartOptions};

    fn context() -> Context {
        let surface = ImageSurface::create(Format::ARgb32, 200, 200).unwrap();
        Context::new(&surface).unwrap()
    }

    fn assert_identity(cr: &Context) {
        let m = cr.matrix();
        assert_eq!(
            (m.xx(), m.yx(), m.xy(), m.yy(), m.x0(), m.y0()),
            (1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
        );
    }

    fn colors() -> ThemeColors {
        ThemeColors {
            indicator: Srgba::new(0.4, 0.4, 0.8, 1.0),
            track: Srgba::new(0.5, 0.5, 0.5, 0.1),
            shadow: Srgba::new(0.0, 0.0, 0.0, 0.35),
            text: Srgba::new(0.9, 0.9, 0.9, 1.0),
            placeholder: Srgba::new(0.6, 0.6, 0.6, 0.8),
        }
    }

    #[test]
    fn test_failed_drawing_still_restores_state() {
        let cr = context();

        let result = with_saved_state(&cr, || {
            cr.translate(40.0, 40.0);
            cr.rotate(1.0);
            Err(cairo::Error::InvalidMatrix)
        });

        assert!(matches!(result, Err(cairo::Error::InvalidMatrix)));
        assert_identity(&cr);
    }

    #[test]
    fn test_draw_leaves_transform_untouched() {
        let cr = context();
        let categories = vec![
            Category::new("rent", "Rent", 60.0, Srgba::new(0.2, 0.3, 0.4, 1.0), "")
                .unwrap(),
            Category::new("food", "Food", 40.0, Srgba::new(0.8, 0.5, 0.4, 1.0), "")
                .unwrap(),
        ];
        let options = ChartOptions {
            size: 200.0,
            ..ChartOptions::default()
        };
        let chart = DonutChart::new(categories, None, options, |v: f64| format!("{v:.0}"));

        draw(&cr, &chart, Point::new(0.0, 0.0), &colors(), &mut IconCache::default()).unwrap();

        assert_identity(&cr);
    }
}
