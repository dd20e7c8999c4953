// Picks how mask preview tiles sit next to the main image so the whole
// display lands close to a target aspect ratio. Purely arithmetic: nothing
// is rendered to decide.

use std::fmt;

pub const DEFAULT_TARGET_RATIO: f64 = 2.0;

/// Where the tile block goes relative to the image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Right,
    Top,
}

/// How the tiles are stacked among themselves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StackOrder {
    Vertical,
    Horizontal,
    /// Two rows, the first holding `ceil(n / 2)` tiles. Scored as a 2x2
    /// block (`tall_w`/`wide_h` wide or tall), which is exact for four tiles.
    Grid,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Side::Right => "right",
            Side::Top => "top",
        })
    }
}

impl fmt::Display for StackOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StackOrder::Vertical => "vertical",
            StackOrder::Horizontal => "horizontal",
            StackOrder::Grid => "grid",
        })
    }
}

/// Candidate arrangements in precedence order; earlier entries win ties.
pub const CANDIDATES: [(Side, StackOrder); 6] = [
    (Side::Right, StackOrder::Vertical),
    (Side::Right, StackOrder::Horizontal),
    (Side::Right, StackOrder::Grid),
    (Side::Top, StackOrder::Vertical),
    (Side::Top, StackOrder::Horizontal),
    (Side::Top, StackOrder::Grid),
];

/// Composite aspect ratio (w / h) of each candidate, in `CANDIDATES` order.
///
/// Tiles are first scaled to match the image: to the image height when they
/// sit on the right (`tall_w`), to the image width when on top (`wide_h`).
pub fn candidate_ratios(image_hw: (usize, usize), tile_hw: (usize, usize), num_tiles: usize) -> [f64; 6] {
    let (img_h, img_w) = (image_hw.0.max(1) as f64, image_hw.1.max(1) as f64);
    let (tile_h, tile_w) = (tile_hw.0.max(1) as f64, tile_hw.1.max(1) as f64);
    let n = num_tiles.max(1) as f64;
    let tall_w = tile_w * (img_h / tile_h);
    let wide_h = tile_h * (img_w / tile_w);

    // (added height, added width) per candidate
    let added = [
        (0.0, (tall_w / n).floor()),
        (0.0, img_w + tall_w * n),
        (0.0, tall_w),
        (wide_h * n, 0.0),
        ((wide_h / n).floor(), 0.0),
        (wide_h, 0.0),
    ];
    added.map(|(add_h, add_w)| (img_w + add_w) / (img_h + add_h))
}

/// Arrangement whose composite ratio is closest to `target_ratio`.
pub fn find_best_display_arrangement(
    image_hw: (usize, usize),
    tile_hw: (usize, usize),
    target_ratio: f64,
    num_tiles: usize,
) -> (Side, StackOrder) {
    let ratios = candidate_ratios(image_hw, tile_hw, num_tiles);
    let mut best = 0;
    let mut best_delta = f64::INFINITY;
    for (i, ratio) in ratios.iter().enumerate() {
        let delta = (target_ratio - ratio).abs();
        // Strict comparison keeps the earliest candidate on ties
        if delta < best_delta {
            best = i;
            best_delta = delta;
        }
    }
    let (side, order) = CANDIDATES[best];
    log::debug!("display arrangement for image {image_hw:?}, tiles {tile_hw:?}: {side}/{order} (delta {best_delta:.3})");
    (side, order)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_image_puts_tiles_on_the_right() {
        let first = find_best_display_arrangement((400, 800), (200, 200), DEFAULT_TARGET_RATIO, 4);
        assert_eq!(first, (Side::Right, StackOrder::Vertical));
        assert_eq!(find_best_display_arrangement((400, 800), (200, 200), DEFAULT_TARGET_RATIO, 4), first);
    }

    #[test]
    fn tall_image_prefers_grid_tiles() {
        let ratios = candidate_ratios((800, 400), (200, 200), 4);
        // right/horizontal: (400 + 400 + 800*4) / 800
        assert!((ratios[1] - 5.0).abs() < 1e-9);
        assert!((ratios[2] - 1.5).abs() < 1e-9);
        let best = find_best_display_arrangement((800, 400), (200, 200), DEFAULT_TARGET_RATIO, 4);
        assert_eq!(best, (Side::Right, StackOrder::Grid));
    }

    #[test]
    fn ties_keep_list_order() {
        // Every candidate is equally far from an impossible target
        let best = find_best_display_arrangement((100, 100), (100, 100), f64::INFINITY, 4);
        assert_eq!(best, CANDIDATES[0]);
    }
}
