use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use palette::Srgba;

pub struct WheelColors {
    pub rim: Srgba<f64>,
    pub face: Srgba<f64>,
    pub divider: Srgba<f64>,
    pub text: Srgba<f64>,
    pub highlight: Srgba<f64>,
    pub pointer: Srgba<f64>,
    pub shadow: Srgba<f64>,
    pub hub: Srgba<f64>,
}

impl WheelColors {
    pub fn from_context(context: &gtk::StyleContext) -> Self {
        let rim = Self::lookup_color(context, "accent_bg_color", hex(0x2196F3, 1.0), None);
        Self {
            rim,
            divider: rim,
            face: hex(0xFFFFFF, 1.0),
            text: hex(0x000000, 1.0),
            highlight: Self::lookup_color(
                context,
                "theme_selected_bg_color",
                hex(0x2196F3, 0.2),
                Some(0.2),
            ),
            pointer: hex(0xF44336, 1.0),
            shadow: hex(0x000000, 30.0 / 255.0),
            hub: hex(0xF44336, 1.0),
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

/// `0xRRGGBB` to a colour with the given alpha.
pub fn hex(rgb: u32, alpha: f64) -> Srgba<f64> {
    let channel = |shift: u32| f64::from((rgb >> shift) & 0xFF) / 255.0;
    Srgba::new(channel(16), channel(8), channel(0), alpha)
}

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    let css_data = "
.dojo-panel {
    padding: 16px;
}
.section-title {
    font-weight: bold;
    font-size: 16px;
}
.ninja-card {
    padding: 2px 4px;
    border: 1px solid #ddd;
    border-radius: 4px;
}
.ninja-card label {
    font-weight: bold;
    font-size: 13px;
}
.scroll-chip {
    padding: 4px 8px;
    border: 1px solid #ddd;
    border-radius: 6px;
}
.notice {
    padding: 8px;
    border-radius: 4px;
}
.notice.warning {
    background-color: #ffebee;
    color: #c62828;
}
.notice.success {
    background-color: #e8f5e9;
    color: #2e7d32;
}
.landed {
    font-weight: bold;
    font-size: 18px;
}
.rules {
    font-weight: bold;
    font-size: 16px;
}
";
    provider.load_from_data(css_data);

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
    fn test_hex_channels() {
        let c = hex(0xF44336, 0.5);
        let (r, g, b, a) = c.into_components();
        assert_eq!(r, 244.0 / 255.0);
        assert_eq!(g, 67.0 / 255.0);
        assert_eq!(b, 54.0 / 255.0);
        assert_eq!(a, 0.5);
    }
}
