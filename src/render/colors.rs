//! Color parsing utilities for theme colors.
//!
//! Colors are kept as CSS color strings, which Canvas 2D consumes directly.
//! Parsing only validates and normalizes them so that a malformed theme entry
//! can fall back to its default instead of painting nothing.

/// A CSS color string (e.g., "#FF0000", "rgba(255, 0, 0, 0.5)")
pub type CssColor = String;

/// Parse a color string and normalize it to CSS format.
///
/// Supports formats:
/// - "#RGB" (short hex, expanded to "#RRGGBB")
/// - "#RRGGBB"
/// - "#RRGGBBAA" (CSS order: alpha last)
/// - "RRGGBB" (hex without # prefix)
/// - "rgb(r, g, b)" and "rgba(r, g, b, a)"
/// - "transparent"
pub fn parse_color(s: &str) -> Option<CssColor> {
    let s = s.trim();

    if s.eq_ignore_ascii_case("transparent") {
        Some("transparent".to_string())
    } else if s.starts_with("rgb") {
        // Validate components, keep the caller's spelling
        parse_color_rgba(s).map(|_| s.to_string())
    } else if s.starts_with('#') {
        parse_hex_color(s)
    } else {
        parse_hex_color(&format!("#{s}"))
    }
}

fn parse_hex_color(s: &str) -> Option<CssColor> {
    let (r, g, b, a) = parse_hex_rgba(s)?;
    if (a - 1.0).abs() < f64::EPSILON {
        Some(format!("#{r:02X}{g:02X}{b:02X}"))
    } else {
        Some(format!("rgba({r}, {g}, {b}, {a:.2})"))
    }
}

/// Parse color and return RGBA components (0-255 for RGB, 0.0-1.0 for alpha)
pub fn parse_color_rgba(s: &str) -> Option<(u8, u8, u8, f64)> {
    let s = s.trim();

    if s.starts_with('#') {
        parse_hex_rgba(s)
    } else if s.starts_with("rgba(") {
        parse_rgba_string(s)
    } else if s.starts_with("rgb(") {
        parse_rgb_string(s)
    } else {
        parse_hex_rgba(&format!("#{s}"))
    }
}

fn hex_byte(hex: &str, at: usize) -> Option<u8> {
    u8::from_str_radix(hex.get(at..at + 2)?, 16).ok()
}

fn parse_hex_rgba(s: &str) -> Option<(u8, u8, u8, f64)> {
    let hex = s.strip_prefix('#')?;

    match hex.len() {
        3 => {
            let mut digits = hex.chars().map(|c| c.to_digit(16));
            let mut next = || -> Option<u8> {
                let d = u8::try_from(digits.next()??).ok()?;
                Some(d * 17)
            };
            Some((next()?, next()?, next()?, 1.0))
        }
        6 => Some((hex_byte(hex, 0)?, hex_byte(hex, 2)?, hex_byte(hex, 4)?, 1.0)),
        8 => {
            let a = hex_byte(hex, 6)?;
            Some((
                hex_byte(hex, 0)?,
                hex_byte(hex, 2)?,
                hex_byte(hex, 4)?,
                f64::from(a) / 255.0,
            ))
        }
        _ => None,
    }
}

fn parse_rgb_string(s: &str) -> Option<(u8, u8, u8, f64)> {
    let inner = s.strip_prefix("rgb(")?.strip_suffix(')')?;
    let mut parts = inner.split(',').map(str::trim);
    let r: u8 = parts.next()?.parse().ok()?;
    let g: u8 = parts.next()?.parse().ok()?;
    let b: u8 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((r, g, b, 1.0))
}

fn parse_rgba_string(s: &str) -> Option<(u8, u8, u8, f64)> {
    let inner = s.strip_prefix("rgba(")?.strip_suffix(')')?;
    let mut parts = inner.split(',').map(str::trim);
    let r: u8 = parts.next()?.parse().ok()?;
    let g: u8 = parts.next()?.parse().ok()?;
    let b: u8 = parts.next()?.parse().ok()?;
    let a: f64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() || !(0.0..=1.0).contains(&a) {
        return None;
    }
    Some((r, g, b, a))
}

/// Default theme colors (CSS format)
pub mod palette {
    pub const BACKGROUND: &str = "#FFFFFF";

    /// Body text
    pub const TEXT: &str = "#333333";

    pub const HEADER_BACKGROUND: &str = "#F2F2F2";
    pub const HEADER_TEXT: &str = "#000000";

    /// Grid line color (light gray)
    pub const GRID_LINE: &str = "#E0E0E0";
    pub const BORDER: &str = "#E0E0E0";

    pub const SELECTION: &str = "rgba(0, 123, 255, 0.3)";
    pub const HOVER: &str = "rgba(0, 123, 255, 0.1)";

    /// Block drawn for rows whose page is not resident yet
    pub const PLACEHOLDER: &str = "#F0F0F0";

    /// Scrollbar thumb color
    pub const SCROLLBAR_THUMB: &str = "rgba(0, 0, 0, 0.3)";
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_6() {
        let color = parse_color("#FF0000").unwrap();
        assert_eq!(color, "#FF0000");
    }

    #[test]
    fn test_parse_hex_3() {
        assert_eq!(parse_color("#fff").unwrap(), "#FFFFFF");
        assert_eq!(parse_color("#333").unwrap(), "#333333");
    }

    #[test]
    fn test_parse_hex_8_transparent() {
        let color = parse_color("#FF000080").unwrap();
        assert!(color.starts_with("rgba(255, 0, 0,"));
        assert_eq!(parse_color("#FF0000FF").unwrap(), "#FF0000");
    }

    #[test]
    fn test_parse_rgba() {
        let color = parse_color("rgba(0, 123, 255, 0.3)").unwrap();
        assert_eq!(color, "rgba(0, 123, 255, 0.3)");
        assert!(parse_color("rgba(0, 123, 255, 3)").is_none());
        assert!(parse_color("rgb(300, 0, 0)").is_none());
    }

    #[test]
    fn test_parse_color_rgba() {
        let (r, g, b, a) = parse_color_rgba("#FF8040").unwrap();
        assert_eq!((r, g, b), (255, 128, 64));
        assert!((a - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_parse_without_hash() {
        assert_eq!(parse_color("FF0000").unwrap(), "#FF0000");
        assert!(parse_color("not-a-color").is_none());
        assert_eq!(parse_color("transparent").unwrap(), "transparent");
    }
}
