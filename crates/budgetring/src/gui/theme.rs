use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use palette::Srgba;

pub struct ThemeColors {
    pub indicator: Srgba<f64>,
    pub track: Srgba<f64>,
    pub shadow: Srgba<f64>,
    pub text: Srgba<f64>,
    pub placeholder: Srgba<f64>,
}

impl ThemeColors {
    pub fn from_context(context: &gtk::StyleContext) -> Self {
        Self {
            indicator: Self::lookup_color(
                context,
                "theme_selected_bg_color",
                Srgba::new(0.4, 0.4, 0.8, 1.0),
                None,
            ),
            track: Self::lookup_color(
                context,
                "theme_fg_color",
                Srgba::new(0.5, 0.5, 0.5, 0.12),
                Some(0.08),
            ),
            shadow: Srgba::new(0.0, 0.0, 0.0, 0.35),
            text: Self::lookup_color(
                context,
                "theme_fg_color",
                Srgba::new(0.9, 0.9, 0.9, 1.0),
                None,
            ),
            placeholder: Self::lookup_color(
                context,
                "insensitive_fg_color",
                Srgba::new(0.6, 0.6, 0.6, 0.8),
                Some(0.8),
            ),
        }
    }

    fn lookup_color(
        context: &gtk::StyleContext,
        name: &str,
        fallback: Srgba<f64>,
        alpha_override: Option<f64>,
    ) -> Srgba<f64> {
        context
            .lookup_color(name)
            .map(|c| {
                let (r, g, b, a) = (
                    c.red() as f64,
                    c.green() as f64,
                    c.blue() as f64,
                    c.alpha() as f64,
                );
                Srgba::new(r, g, b, alpha_override.unwrap_or(a))
            })
            .unwrap_or(fallback)
    }
}

/// `true` when the desktop has animations switched off.
pub fn system_prefers_reduced_motion() -> bool {
    gtk::Settings::default().is_some_and(|s| !s.is_gtk_enable_animations())
}

/// Ordinary decorated window on the theme's own background; the chart keeps
/// some breathing room from the window edges.
const APP_CSS: &str = "
.budgetring-window {
    background-color: @theme_bg_color;
}
.budgetring-chart {
    margin: 12px;
}
";

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    provider.load_from_data(APP_CSS);

    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_has_an_opaque_theme_background() {
        assert!(APP_CSS.contains("background-color: @theme_bg_color"));
        assert!(!APP_CSS.contains("transparent"));
    }
}
