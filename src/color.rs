use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::record::StatusTag;

// ---------------------------------------------------------------------------
// Base colours
// ---------------------------------------------------------------------------

pub const HELP_RED: Color32 = Color32::from_rgb(0xdc, 0x26, 0x26);
pub const OK_GREEN: Color32 = Color32::from_rgb(0x16, 0xa3, 0x4a);
pub const SCHOLARSHIP_AMBER: Color32 = Color32::from_rgb(0xd9, 0x77, 0x06);
pub const NEUTRAL_GRAY: Color32 = Color32::from_rgb(0x6b, 0x72, 0x80);
pub const RADAR_BLUE: Color32 = Color32::from_rgb(0x3b, 0x82, 0xf6);
pub const GPA_PURPLE: Color32 = Color32::from_rgb(0x8b, 0x5c, 0xf6);

/// Lightness of badge backgrounds derived from a base colour.
const BADGE_BG_LIGHTNESS: f32 = 0.93;

// ---------------------------------------------------------------------------
// Derived colours
// ---------------------------------------------------------------------------

/// Foreground / background pair for a status badge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Badge {
    pub fg: Color32,
    pub bg: Color32,
}

impl Badge {
    /// Badge with `base` text on a pale tint of the same hue.
    pub fn from_base(base: Color32) -> Self {
        Badge {
            fg: base,
            bg: with_lightness(base, BADGE_BG_LIGHTNESS),
        }
    }
}

/// Which card a status entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Consultation,
    Scholarship,
}

/// Badge for a consultation / scholarship entry.
pub fn item_badge(kind: ItemKind, tag: StatusTag) -> Badge {
    let base = match (kind, tag) {
        (_, StatusTag::None) => NEUTRAL_GRAY,
        (ItemKind::Consultation, StatusTag::HasValue) => HELP_RED,
        (ItemKind::Scholarship, StatusTag::HasValue) => SCHOLARSHIP_AMBER,
    };
    Badge::from_base(base)
}

/// Badge for the help-request card.
pub fn help_badge(needs_help: bool) -> Badge {
    Badge::from_base(if needs_help { HELP_RED } else { OK_GREEN })
}

/// Keep the hue and saturation of `color` but set its HSL lightness.
pub fn with_lightness(color: Color32, lightness: f32) -> Color32 {
    let rgb = Srgb::new(color.r(), color.g(), color.b()).into_format::<f32>();
    let mut hsl: Hsl = rgb.into_color();
    hsl.lightness = lightness.clamp(0.0, 1.0);
    let out: Srgb = hsl.into_color();
    let out = out.into_format::<u8>();
    Color32::from_rgb(out.red, out.green, out.blue)
}

/// `color` with the given opacity, for filled chart areas.
pub fn translucent(color: Color32, alpha: f32) -> Color32 {
    Color32::from_rgba_unmultiplied(
        color.r(),
        color.g(),
        color.b(),
        (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lum(c: Color32) -> u32 {
        c.r() as u32 + c.g() as u32 + c.b() as u32
    }

    #[test]
    fn badge_background_is_lighter() {
        for base in [HELP_RED, OK_GREEN, SCHOLARSHIP_AMBER, NEUTRAL_GRAY] {
            let badge = Badge::from_base(base);
            assert_eq!(badge.fg, base);
            assert!(lum(badge.bg) > lum(base));
        }
    }

    #[test]
    fn tags_choose_colours() {
        assert_eq!(item_badge(ItemKind::Consultation, StatusTag::HasValue).fg, HELP_RED);
        assert_eq!(item_badge(ItemKind::Scholarship, StatusTag::HasValue).fg, SCHOLARSHIP_AMBER);
        assert_eq!(item_badge(ItemKind::Scholarship, StatusTag::None).fg, NEUTRAL_GRAY);
        assert_eq!(help_badge(true).fg, HELP_RED);
        assert_eq!(help_badge(false).fg, OK_GREEN);
    }

    #[test]
    fn lightness_extremes() {
        assert_eq!(with_lightness(HELP_RED, 1.0), Color32::WHITE);
        assert_eq!(with_lightness(HELP_RED, 0.0), Color32::BLACK);
    }

    #[test]
    fn translucent_keeps_rgb() {
        let c = translucent(RADAR_BLUE, 1.0);
        assert_eq!(c, RADAR_BLUE);
    }
}
