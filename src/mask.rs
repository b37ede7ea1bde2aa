// SPDX-License-Identifier: MPL-2.0

//! Binary frequency masks: parametric shapes and painted custom masks.
//!
//! A mask holds one value per spectrum coefficient,
//! [`PASS`] keeps the coefficient and [`BLOCK`] removes it.
//! Geometry uses `(x, y)` = `(column, row)` and is clipped to the grid,
//! shapes reaching past the borders are expected and never an error.

use std::fmt;
use std::str::FromStr;

use ndarray::Array2;

use crate::error::{FilterError, Result};

/// Mask value keeping a frequency.
pub const PASS: u8 = 1;
/// Mask value removing a frequency.
pub const BLOCK: u8 = 0;

/// Predefined mask shapes, sized by a single fraction in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MaskKind {
    /// Keep every frequency.
    #[default]
    None,
    /// Block a centered disk.
    CircleInside,
    /// Keep only a centered disk.
    CircleOutside,
    /// Block a centered rectangle.
    RectangleInside,
    /// Keep only a centered rectangle.
    RectangleOutside,
}

impl MaskKind {
    /// Every kind, in the order a user would pick them.
    pub const ALL: [MaskKind; 5] = [
        MaskKind::None,
        MaskKind::CircleInside,
        MaskKind::CircleOutside,
        MaskKind::RectangleInside,
        MaskKind::RectangleOutside,
    ];

    /// Name used on the command line and in logs.
    pub fn name(self) -> &'static str {
        match self {
            MaskKind::None => "none",
            MaskKind::CircleInside => "circle-inside",
            MaskKind::CircleOutside => "circle-outside",
            MaskKind::RectangleInside => "rectangle-inside",
            MaskKind::RectangleOutside => "rectangle-outside",
        }
    }

    /// Whether the size fraction changes the mask.
    pub fn is_sized(self) -> bool {
        self != MaskKind::None
    }
}

impl fmt::Display for MaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MaskKind {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self> {
        MaskKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| FilterError::UnknownSelection(s.to_string()))
    }
}

/// Binary mask over the grid of a centered spectrum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    cells: Array2<u8>,
}

impl Mask {
    /// Mask keeping every frequency.
    pub fn all_pass(shape: (usize, usize)) -> Self {
        Mask {
            cells: Array2::from_elem(shape, PASS),
        }
    }

    /// Mask removing every frequency.
    pub fn all_block(shape: (usize, usize)) -> Self {
        Mask {
            cells: Array2::from_elem(shape, BLOCK),
        }
    }

    /// Mask from raw values, any non zero value passes.
    pub fn from_cells(cells: Array2<u8>) -> Self {
        Mask {
            cells: cells.mapv(|v| if v == BLOCK { BLOCK } else { PASS }),
        }
    }

    /// Shape `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        self.cells.dim()
    }

    /// Raw mask values, [`PASS`] or [`BLOCK`].
    pub fn cells(&self) -> &Array2<u8> {
        &self.cells
    }

    /// Whether the coefficient at `(row, col)` is kept.
    pub fn is_pass(&self, row: usize, col: usize) -> bool {
        self.cells[[row, col]] == PASS
    }

    /// Number of blocked coefficients.
    pub fn blocked_count(&self) -> usize {
        self.cells.iter().filter(|&&v| v == BLOCK).count()
    }

    /// Every pass becomes a block and the other way around.
    pub fn complement(&self) -> Mask {
        Mask {
            cells: self.cells.mapv(|v| if v == PASS { BLOCK } else { PASS }),
        }
    }

    /// Set a filled disk centered at `(x, y)` to `value`, clipped to the grid.
    fn fill_disk(&mut self, (cx, cy): (i64, i64), radius: i64, value: u8) {
        let (rows, cols) = self.shape();
        let (Some(row_range), Some(col_range)) = (
            clip(cy - radius, cy + radius + 1, rows),
            clip(cx - radius, cx + radius + 1, cols),
        ) else {
            return;
        };
        let radius_sqr = radius * radius;
        for row in row_range {
            let dy = row as i64 - cy;
            for col in col_range.clone() {
                let dx = col as i64 - cx;
                if dx * dx + dy * dy <= radius_sqr {
                    self.cells[[row, col]] = value;
                }
            }
        }
    }

    /// Set the half-open rectangle `[x0, x1) x [y0, y1)` to `value`, clipped to the grid.
    fn fill_rect(&mut self, (x0, y0): (i64, i64), (x1, y1): (i64, i64), value: u8) {
        let (rows, cols) = self.shape();
        let (Some(row_range), Some(col_range)) = (clip(y0, y1, rows), clip(x0, x1, cols)) else {
            return;
        };
        for row in row_range {
            for col in col_range.clone() {
                self.cells[[row, col]] = value;
            }
        }
    }
}

/// Intersection of `[start, end)` with `[0, len)`, `None` when empty.
fn clip(start: i64, end: i64, len: usize) -> Option<std::ops::Range<usize>> {
    let start = start.max(0);
    let end = end.min(len as i64);
    (start < end).then(|| start as usize..end as usize)
}

/// Build the mask of a predefined shape for a spectrum of the given `(rows, cols)` shape.
///
/// Circles have a radius of `size_fraction * min(rows, cols)`, rectangles extend
/// `size_fraction` of the half width and half height on each side of the center.
/// "Inside" and "outside" variants of a shape are exact complements.
pub fn build_parametric_mask(
    kind: MaskKind,
    size_fraction: f64,
    shape: (usize, usize),
) -> Result<Mask> {
    if !(0.0..=1.0).contains(&size_fraction) {
        return Err(FilterError::SizeOutOfRange(size_fraction));
    }
    if kind == MaskKind::None {
        return Ok(Mask::all_pass(shape));
    }
    let (rows, cols) = shape;
    let inside = matches!(kind, MaskKind::CircleInside | MaskKind::RectangleInside);
    let (mut mask, shape_value) = if inside {
        (Mask::all_pass(shape), BLOCK)
    } else {
        (Mask::all_block(shape), PASS)
    };

    match kind {
        MaskKind::None => {}
        MaskKind::CircleInside | MaskKind::CircleOutside => {
            let radius = (size_fraction * rows.min(cols) as f64) as i64;
            if radius > 0 {
                let center = ((cols / 2) as i64, (rows / 2) as i64);
                mask.fill_disk(center, radius, shape_value);
            }
        }
        MaskKind::RectangleInside | MaskKind::RectangleOutside => {
            let half_width = cols as f64 / 2.0;
            let half_height = rows as f64 / 2.0;
            let start = (
                (half_width * (1.0 - size_fraction)) as i64,
                (half_height * (1.0 - size_fraction)) as i64,
            );
            let end = (
                (half_width * (1.0 + size_fraction)) as i64,
                (half_height * (1.0 + size_fraction)) as i64,
            );
            mask.fill_rect(start, end, shape_value);
        }
    }
    Ok(mask)
}

/// Fresh custom mask, keeping every frequency.
pub fn init_custom_mask(shape: (usize, usize)) -> Mask {
    Mask::all_pass(shape)
}

/// Size of the surface on which the spectrum is shown and painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplaySize {
    /// Width in display pixels.
    pub width: u32,
    /// Height in display pixels.
    pub height: u32,
}

impl DisplaySize {
    /// Whether `point` is finite and lies on the surface, borders included.
    pub fn contains(&self, point: DisplayPoint) -> bool {
        (0.0..=f64::from(self.width)).contains(&point.x)
            && (0.0..=f64::from(self.height)).contains(&point.y)
    }
}

/// A position on the display surface, as delivered by pointer events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayPoint {
    /// Horizontal position, from the left edge.
    pub x: f64,
    /// Vertical position, from the top edge.
    pub y: f64,
}

impl DisplayPoint {
    /// Point at `(x, y)`.
    pub fn new(x: f64, y: f64) -> Self {
        DisplayPoint { x, y }
    }
}

impl FromStr for DisplayPoint {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || FilterError::InvalidPoint(s.to_string());
        let (x, y) = s.split_once(',').ok_or_else(invalid)?;
        let x = x.trim().parse().map_err(|_| invalid())?;
        let y = y.trim().parse().map_err(|_| invalid())?;
        Ok(DisplayPoint { x, y })
    }
}

/// Map a display point to the `(x, y)` spectrum position it paints.
///
/// The point is first folded into the top left quadrant of the display,
/// then scaled to the spectrum grid.
/// Points off the display land on the nearest edge of that quadrant.
pub fn display_to_spectrum(
    point: DisplayPoint,
    display: DisplaySize,
    shape: (usize, usize),
) -> (i64, i64) {
    let (rows, cols) = shape;
    let fold = |coord: f64, extent: f64| {
        let folded = if coord > extent / 2.0 {
            extent - coord
        } else {
            coord
        };
        folded.clamp(0.0, extent / 2.0)
    };
    let display_width = f64::from(display.width);
    let display_height = f64::from(display.height);
    let x = fold(point.x, display_width) / display_width * cols as f64;
    let y = fold(point.y, display_height) / display_height * rows as f64;
    (x as i64, y as i64)
}

/// Block a disk of `brush_radius` around the painted frequency and its three mirrors.
///
/// The spectrum of a real image is conjugate symmetric,
/// so the four disks are centered at `(x, y)`, `(W - x, y)`, `(x, H - y)` and `(W - x, H - y)`.
/// Painting the same point twice changes nothing.
pub fn paint_point(mask: &mut Mask, point: DisplayPoint, brush_radius: u32, display: DisplaySize) {
    let (rows, cols) = mask.shape();
    let (x, y) = display_to_spectrum(point, display, (rows, cols));
    let (w, h) = (cols as i64, rows as i64);
    let radius = i64::from(brush_radius);
    for center in [(x, y), (w - x, y), (x, h - y), (w - x, h - y)] {
        mask.fill_disk(center, radius, BLOCK);
    }
    log::trace!("painted ({}, {}) -> ({x}, {y}) r={brush_radius}", point.x, point.y);
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZES: [f64; 6] = [0.0, 0.1, 0.25, 0.5, 0.8, 1.0];
    const DISPLAY: DisplaySize = DisplaySize {
        width: 64,
        height: 32,
    };

    #[test]
    fn inside_and_outside_are_exact_complements() {
        for shape in [(10, 10), (7, 12), (9, 5), (1, 1)] {
            for size in SIZES {
                let pairs = [
                    (MaskKind::CircleInside, MaskKind::CircleOutside),
                    (MaskKind::RectangleInside, MaskKind::RectangleOutside),
                ];
                for (inside, outside) in pairs {
                    let a = build_parametric_mask(inside, size, shape).unwrap();
                    let b = build_parametric_mask(outside, size, shape).unwrap();
                    assert_eq!(a.complement(), b, "{inside} / {outside} at {size} on {shape:?}");
                }
            }
        }
    }

    #[test]
    fn zero_size_blocks_nothing_inside_and_everything_outside() {
        let shape = (8, 6);
        for kind in [MaskKind::CircleInside, MaskKind::RectangleInside] {
            let mask = build_parametric_mask(kind, 0.0, shape).unwrap();
            assert_eq!(mask, Mask::all_pass(shape));
        }
        for kind in [MaskKind::CircleOutside, MaskKind::RectangleOutside] {
            let mask = build_parametric_mask(kind, 0.0, shape).unwrap();
            assert_eq!(mask, Mask::all_block(shape));
        }
    }

    #[test]
    fn full_rectangle_covers_the_whole_grid() {
        let shape = (10, 10);
        let inside = build_parametric_mask(MaskKind::RectangleInside, 1.0, shape).unwrap();
        assert_eq!(inside, Mask::all_block(shape));
        let outside = build_parametric_mask(MaskKind::RectangleOutside, 1.0, shape).unwrap();
        assert_eq!(outside, Mask::all_pass(shape));
    }

    #[test]
    fn half_rectangle_has_truncated_corners() {
        // Columns 2..7 and rows 2..7 for a 10x10 grid at 0.5.
        let mask = build_parametric_mask(MaskKind::RectangleInside, 0.5, (10, 10)).unwrap();
        assert_eq!(mask.blocked_count(), 25);
        assert!(!mask.is_pass(2, 2));
        assert!(!mask.is_pass(6, 6));
        assert!(mask.is_pass(7, 7));
        assert!(mask.is_pass(1, 5));
    }

    #[test]
    fn circle_is_centered_and_clipped() {
        let mask = build_parametric_mask(MaskKind::CircleInside, 0.5, (4, 4)).unwrap();
        assert!(!mask.is_pass(2, 2));
        assert!(mask.is_pass(0, 0));

        // Radius 6 centered at (15, 3) reaches past the top and bottom rows.
        let mask = build_parametric_mask(MaskKind::CircleInside, 1.0, (6, 30)).unwrap();
        assert!(!mask.is_pass(0, 15));
        assert!(!mask.is_pass(5, 15));
        assert!(!mask.is_pass(3, 21));
        assert!(mask.is_pass(3, 22));
        assert!(mask.is_pass(0, 0));

        let mask = build_parametric_mask(MaskKind::CircleInside, 1.0, (6, 9)).unwrap();
        assert_eq!(mask, Mask::all_block((6, 9)));
    }

    #[test]
    fn none_is_all_pass_and_fraction_is_validated() {
        let mask = build_parametric_mask(MaskKind::None, 0.7, (3, 4)).unwrap();
        assert_eq!(mask, Mask::all_pass((3, 4)));
        assert!(matches!(
            build_parametric_mask(MaskKind::CircleInside, 1.5, (3, 4)),
            Err(FilterError::SizeOutOfRange(_))
        ));
        assert!(build_parametric_mask(MaskKind::CircleInside, f64::NAN, (3, 4)).is_err());
    }

    #[test]
    fn display_points_fold_into_the_first_quadrant() {
        let shape = (64, 128);
        let map = |x, y| display_to_spectrum(DisplayPoint::new(x, y), DISPLAY, shape);
        assert_eq!(map(8.0, 4.0), (16, 8));
        assert_eq!(map(56.0, 28.0), (16, 8));
        assert_eq!(map(32.0, 16.0), (64, 32));
    }

    #[test]
    fn painting_blocks_four_mirrored_disks() {
        let mut mask = init_custom_mask((64, 128));
        paint_point(&mut mask, DisplayPoint::new(8.0, 4.0), 2, DISPLAY);
        for (row, col) in [(8, 16), (8, 112), (56, 16), (56, 112)] {
            assert!(!mask.is_pass(row, col), "({row}, {col}) should be blocked");
        }
        // Four disjoint disks of 13 cells each.
        assert_eq!(mask.blocked_count(), 4 * 13);
    }

    #[test]
    fn painting_is_idempotent_and_additive() {
        let mut once = init_custom_mask((64, 128));
        paint_point(&mut once, DisplayPoint::new(8.0, 4.0), 3, DISPLAY);
        let mut twice = once.clone();
        paint_point(&mut twice, DisplayPoint::new(8.0, 4.0), 3, DISPLAY);
        assert_eq!(once, twice);

        paint_point(&mut twice, DisplayPoint::new(20.0, 10.0), 1, DISPLAY);
        assert!(twice.blocked_count() > once.blocked_count());
        assert!(!twice.is_pass(8, 16));
    }

    #[test]
    fn painting_near_the_border_is_clipped() {
        let mut mask = init_custom_mask((64, 128));
        paint_point(&mut mask, DisplayPoint::new(0.0, 0.0), 10, DISPLAY);
        assert!(!mask.is_pass(0, 0));
        paint_point(&mut mask, DisplayPoint::new(-40.0, -40.0), 5, DISPLAY);
        paint_point(&mut mask, DisplayPoint::new(500.0, 500.0), 5, DISPLAY);
    }

    #[test]
    fn non_finite_and_huge_points_stay_on_the_grid() {
        let shape = (64, 128);
        let far = [
            DisplayPoint::new(f64::INFINITY, 10.0),
            DisplayPoint::new(10.0, f64::NEG_INFINITY),
            DisplayPoint::new(1e300, -1e300),
            DisplayPoint::new(f64::NAN, 4.0),
        ];
        for point in far {
            let (x, y) = display_to_spectrum(point, DISPLAY, shape);
            assert!((0..=64).contains(&x) && (0..=32).contains(&y), "{point:?}");
            let mut mask = init_custom_mask(shape);
            paint_point(&mut mask, point, 3, DISPLAY);
            assert!(mask.blocked_count() > 0);
        }
        let inf: DisplayPoint = "inf,10".parse().unwrap();
        assert!(!DISPLAY.contains(inf));
        assert!(!DISPLAY.contains(DisplayPoint::new(1e300, 10.0)));
        assert!(!DISPLAY.contains(DisplayPoint::new(f64::NAN, 10.0)));
        assert!(DISPLAY.contains(DisplayPoint::new(64.0, 0.0)));
    }

    #[test]
    fn parses_names_and_points() {
        assert_eq!(
            "Circle-Inside".parse::<MaskKind>().unwrap(),
            MaskKind::CircleInside
        );
        assert!("triangle".parse::<MaskKind>().is_err());
        assert_eq!(
            "12.5, 7".parse::<DisplayPoint>().unwrap(),
            DisplayPoint::new(12.5, 7.0)
        );
        assert!("12".parse::<DisplayPoint>().is_err());
    }
}
