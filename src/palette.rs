//! Deterministic route coloring for the map layer.
//!
//! Every route id maps to one of 12 visually distinct colors via a rolling
//! hash, so a route keeps its color within and across runs. Collisions
//! between different ids are expected; the id space is far larger than the
//! palette.

use rgb::RGB8;

/// Distinct, map-visible colors. Index order matters: changing it recolors
/// every route.
pub const ROUTE_COLORS: [RGB8; 12] = [
    RGB8 { r: 0x3b, g: 0x82, b: 0xf6 }, // blue
    RGB8 { r: 0x22, g: 0xc5, b: 0x5e }, // green
    RGB8 { r: 0xf5, g: 0x9e, b: 0x0b }, // amber
    RGB8 { r: 0xef, g: 0x44, b: 0x44 }, // red
    RGB8 { r: 0xa8, g: 0x55, b: 0xf7 }, // purple
    RGB8 { r: 0x06, g: 0xb6, b: 0xd4 }, // cyan
    RGB8 { r: 0xf9, g: 0x73, b: 0x16 }, // orange
    RGB8 { r: 0x10, g: 0xb9, b: 0x81 }, // emerald
    RGB8 { r: 0x8b, g: 0x5c, b: 0xf6 }, // violet
    RGB8 { r: 0xec, g: 0x48, b: 0x99 }, // pink
    RGB8 { r: 0x14, g: 0xb8, b: 0xa6 }, // teal
    RGB8 { r: 0xfb, g: 0xbf, b: 0x24 }, // yellow
];

/// Picks the palette color for a route id.
///
/// Signed 32-bit rolling hash (`hash = code + (hash << 5) - hash` per
/// character), absolute value modulo palette size. Stable for a given id.
pub fn color_for(route_id: &str) -> RGB8 {
    let mut hash: i32 = 0;
    for ch in route_id.chars() {
        hash = (ch as i32).wrapping_add(hash.wrapping_shl(5).wrapping_sub(hash));
    }
    ROUTE_COLORS[hash.unsigned_abs() as usize % ROUTE_COLORS.len()]
}

/// Blends a color with white (70% original, 30% white per channel), used to
/// render the remaining path in a shade related to the completed path.
pub fn lighten(color: RGB8) -> RGB8 {
    let blend = |c: u8| (c as f64 * 0.7 + 255.0 * 0.3).round() as u8;
    RGB8 {
        r: blend(color.r),
        g: blend(color.g),
        b: blend(color.b),
    }
}

/// `#rrggbb` form for web-facing consumers.
pub fn hex(color: RGB8) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r, color.g, color.b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_for_is_stable() {
        for id in ["13g", "5a", "7b", "12c", "9d", ""] {
            assert_eq!(color_for(id), color_for(id));
        }
    }

    #[test]
    fn test_color_for_indexes_the_palette() {
        for id in ["13g", "5a", "7b", "12c", "9d", "route-with-a-long-id"] {
            let color = color_for(id);
            assert!(ROUTE_COLORS.contains(&color));
        }
    }

    #[test]
    fn test_empty_id_hashes_to_first_color() {
        assert_eq!(color_for(""), ROUTE_COLORS[0]);
    }

    #[test]
    fn test_lighten_blends_toward_white() {
        let white = RGB8 { r: 255, g: 255, b: 255 };
        assert_eq!(lighten(white), white);

        let black = RGB8 { r: 0, g: 0, b: 0 };
        let lightened = lighten(black);
        assert_eq!(lightened, RGB8 { r: 77, g: 77, b: 77 }); // 255 * 0.3 rounded

        let blue = ROUTE_COLORS[0];
        let lighter = lighten(blue);
        assert!(lighter.r >= blue.r && lighter.g >= blue.g && lighter.b >= blue.b);
    }

    #[test]
    fn test_hex_formatting() {
        assert_eq!(hex(RGB8 { r: 0x3b, g: 0x82, b: 0xf6 }), "#3b82f6");
        assert_eq!(hex(RGB8 { r: 0, g: 0, b: 0 }), "#000000");
    }
}
