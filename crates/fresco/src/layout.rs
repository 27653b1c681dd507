//! Surface partitioning and coordinate mapping.
//!
//! The layout slices the shared drawing surface into one region per
//! element, under a selectable partition mode, and converts between
//! absolute surface coordinates and each region's 0–1 normalized local
//! space. Regions are recomputed wholesale whenever the surface size or
//! element count changes; nothing is patched incrementally.
//!
//! Region edges are computed as differences of shared edge positions, so
//! the regions tile the surface exactly - no gaps, no overlaps - even when
//! the surface extent does not divide evenly.

use crate::error::{Error, Result};
use crate::geometry::{Point, Rect, Size};
use fresco_core::logging::targets;

/// How the surface is divided among elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PartitionMode {
    /// Equal-width vertical strips spanning full height, left-to-right.
    #[default]
    Horizontal,
    /// Equal-height horizontal strips spanning full width, top-to-bottom.
    Vertical,
    /// A square-ish grid: `ceil(sqrt(count))` columns, rows filled
    /// top-to-bottom, the final partial row stretched to full width.
    Grid,
}

/// Axis selection for magnitude scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AxisScale {
    /// Scale x by region width; leave y untouched.
    X,
    /// Scale y by region height; leave x untouched.
    Y,
    /// Scale x by width and y by height.
    #[default]
    Both,
}

/// One element's share of the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    /// Element index this region belongs to.
    pub index: usize,
    /// Absolute rectangle in surface coordinates.
    pub rect: Rect,
}

/// The active partition of the surface.
#[derive(Debug, Clone)]
pub struct Layout {
    mode: PartitionMode,
    count: usize,
    size: Size,
    regions: Vec<Region>,
}

impl Layout {
    /// Partition a `width` x `height` surface into `count` regions.
    pub fn new(mode: PartitionMode, count: usize, width: f32, height: f32) -> Self {
        let mut layout = Self {
            mode,
            count: count.max(1),
            size: Size::new(width, height),
            regions: Vec::new(),
        };
        layout.rebuild();
        layout
    }

    /// The active partition mode.
    pub fn mode(&self) -> PartitionMode {
        self.mode
    }

    /// Number of regions (equals the element count).
    pub fn count(&self) -> usize {
        self.count
    }

    /// Current surface size.
    pub fn surface_size(&self) -> Size {
        self.size
    }

    /// All regions, in index order.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Region by element index.
    pub fn region(&self, index: usize) -> Result<&Region> {
        self.regions
            .get(index)
            .ok_or_else(|| Error::region_out_of_range(index, self.regions.len()))
    }

    /// Replace the surface size and recompute every region.
    pub fn set_surface_size(&mut self, width: f32, height: f32) {
        self.size = Size::new(width, height);
        self.rebuild();
    }

    /// Replace the element count and recompute every region.
    pub fn set_count(&mut self, count: usize) {
        self.count = count.max(1);
        self.rebuild();
    }

    /// Hit-test a surface point to a region index.
    ///
    /// Bounds are inclusive; a point on a shared edge resolves to the
    /// lowest region index containing it. Returns `None` outside all
    /// regions.
    pub fn hit_test(&self, p: Point) -> Option<usize> {
        self.regions.iter().find(|r| r.rect.contains(p)).map(|r| r.index)
    }

    /// Map a surface point into a region's 0–1 normalized local space.
    pub fn to_local(&self, index: usize, p: Point) -> Result<Point> {
        let rect = self.region(index)?.rect;
        Ok(Point::new(
            safe_div(p.x - rect.left(), rect.width()),
            safe_div(p.y - rect.top(), rect.height()),
        ))
    }

    /// Map a normalized local point back to absolute surface coordinates.
    ///
    /// Inverse of [`to_local`](Self::to_local) for points inside the
    /// region, up to floating-point rounding.
    pub fn to_surface(&self, index: usize, local: Point) -> Result<Point> {
        let rect = self.region(index)?.rect;
        Ok(Point::new(
            local.x * rect.width() + rect.left(),
            local.y * rect.height() + rect.top(),
        ))
    }

    /// Scale a normalized vector by a region's extent along chosen axes.
    pub fn scale_vector(&self, index: usize, v: Point, axis: AxisScale) -> Result<Point> {
        let rect = self.region(index)?.rect;
        Ok(match axis {
            AxisScale::X => Point::new(v.x * rect.width(), v.y),
            AxisScale::Y => Point::new(v.x, v.y * rect.height()),
            AxisScale::Both => Point::new(v.x * rect.width(), v.y * rect.height()),
        })
    }

    /// Scale a normalized magnitude by a region's width and height.
    pub fn scale_scalar(&self, index: usize, magnitude: f32) -> Result<Point> {
        let rect = self.region(index)?.rect;
        Ok(Point::new(
            magnitude * rect.width(),
            magnitude * rect.height(),
        ))
    }

    fn rebuild(&mut self) {
        let (w, h) = (self.size.width, self.size.height);
        let n = self.count;

        self.regions = match self.mode {
            PartitionMode::Horizontal => (0..n)
                .map(|i| {
                    let left = edge(i, n, w);
                    let right = edge(i + 1, n, w);
                    Region {
                        index: i,
                        rect: Rect::new(left, 0.0, right - left, h),
                    }
                })
                .collect(),
            PartitionMode::Vertical => (0..n)
                .map(|i| {
                    let top = edge(i, n, h);
                    let bottom = edge(i + 1, n, h);
                    Region {
                        index: i,
                        rect: Rect::new(0.0, top, w, bottom - top),
                    }
                })
                .collect(),
            PartitionMode::Grid => {
                let cols = (n as f32).sqrt().ceil() as usize;
                let rows = n.div_ceil(cols);
                (0..n)
                    .map(|i| {
                        let row = i / cols;
                        let col = i % cols;
                        // The last row may hold fewer cells; those stretch
                        // to keep the tiling exact.
                        let row_cells = if row == rows - 1 { n - row * cols } else { cols };
                        let left = edge(col, row_cells, w);
                        let right = edge(col + 1, row_cells, w);
                        let top = edge(row, rows, h);
                        let bottom = edge(row + 1, rows, h);
                        Region {
                            index: i,
                            rect: Rect::new(left, top, right - left, bottom - top),
                        }
                    })
                    .collect()
            }
        };

        tracing::debug!(
            target: targets::LAYOUT,
            mode = ?self.mode,
            count = n,
            width = w,
            height = h,
            "layout rebuilt"
        );
    }
}

/// Position of partition edge `i` out of `n` along an axis of `extent`.
#[inline]
fn edge(i: usize, n: usize, extent: f32) -> f32 {
    i as f32 * extent / n as f32
}

#[inline]
fn safe_div(a: f32, b: f32) -> f32 {
    if b != 0.0 { a / b } else { 0.0 }
}
