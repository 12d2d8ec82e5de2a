// Branch colors.
//
// Every arc takes the color of its depth-1 ancestor. Branch colors are
// sampled evenly along a piecewise-linear sRGB gradient through the palette
// stops, one sample per root child.

use palette::{Mix, Srgb};

use crate::error::{Result, SunburstError};

pub type Rgb = [u8; 3];

/// Parse a CSS color string (`#rrggbb`, `#rgb`, `rgb(..)`, named colors).
/// Alpha is dropped.
pub fn parse_hex_color(s: &str) -> Result<Rgb> {
    let c = csscolorparser::parse(s.trim())
        .map_err(|_| SunburstError::InvalidColor(s.to_string()))?;
    let [r, g, b, _] = c.to_rgba8();
    Ok([r, g, b])
}

pub fn css_rgb(c: Rgb) -> String {
    format!("rgb({}, {}, {})", c[0], c[1], c[2])
}

fn to_srgb(c: Rgb) -> Srgb {
    Srgb::new(c[0], c[1], c[2]).into_format()
}

fn from_srgb(c: Srgb) -> Rgb {
    let c: Srgb<u8> = c.into_format();
    [c.red, c.green, c.blue]
}

/// Color at `t` in [0, 1] along the gradient through `stops`.
pub fn gradient_at(stops: &[Rgb], t: f64) -> Rgb {
    match stops.len() {
        0 => [0, 0, 0],
        1 => stops[0],
        len => {
            let segments = len - 1;
            let scaled = t.clamp(0.0, 1.0) * segments as f64;
            let i = (scaled.floor() as usize).min(segments - 1);
            let factor = (scaled - i as f64) as f32;
            from_srgb(to_srgb(stops[i]).mix(to_srgb(stops[i + 1]), factor))
        }
    }
}

/// `count` colors evenly spaced from the first stop to the last.
pub fn quantize(stops: &[Rgb], count: usize) -> Vec<Rgb> {
    match count {
        0 => Vec::new(),
        1 => vec![gradient_at(stops, 0.0)],
        n => (0..n).map(|i| gradient_at(stops, i as f64 / (n - 1) as f64)).collect(),
    }
}

/// Branch colors for a palette given as CSS color strings.
pub fn branch_colors(palette: &[String], branches: usize) -> Result<Vec<Rgb>> {
    if palette.is_empty() {
        return Err(SunburstError::EmptyPalette);
    }
    let stops = palette.iter().map(|s| parse_hex_color(s)).collect::<Result<Vec<_>>>()?;
    Ok(quantize(&stops, branches))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#E26C42").unwrap(), [0xE2, 0x6C, 0x42]);
        assert_eq!(parse_hex_color(" #8eaab8 ").unwrap(), [0x8E, 0xAA, 0xB8]);
        assert_eq!(parse_hex_color("#fff").unwrap(), [255, 255, 255]);
        assert!(parse_hex_color("#12").is_err());
        assert!(parse_hex_color("#gg0000").is_err());
        assert!(matches!(
            parse_hex_color("not a color"),
            Err(SunburstError::InvalidColor(s)) if s == "not a color"
        ));
    }

    #[test]
    fn test_gradient_endpoints_and_midpoint() {
        let stops = [[0, 0, 0], [200, 100, 50]];
        assert_eq!(gradient_at(&stops, 0.0), [0, 0, 0]);
        assert_eq!(gradient_at(&stops, 1.0), [200, 100, 50]);
        assert_eq!(gradient_at(&stops, 0.5), [100, 50, 25]);
        assert_eq!(gradient_at(&stops, 7.0), [200, 100, 50]);
    }

    #[test]
    fn test_quantize_spans_all_stops() {
        let stops = [[0, 0, 0], [100, 100, 100], [200, 200, 200]];
        let colors = quantize(&stops, 3);
        assert_eq!(colors, vec![[0, 0, 0], [100, 100, 100], [200, 200, 200]]);
        assert_eq!(quantize(&stops, 1), vec![[0, 0, 0]]);
        assert!(quantize(&stops, 0).is_empty());
    }

    #[test]
    fn test_branch_colors_from_hex() {
        let palette = vec!["#000000".to_string(), "#ffffff".to_string()];
        let colors = branch_colors(&palette, 2).unwrap();
        assert_eq!(colors, vec![[0, 0, 0], [255, 255, 255]]);
        assert_eq!(css_rgb(colors[1]), "rgb(255, 255, 255)");
        assert!(branch_colors(&[], 2).is_err());
    }
}
