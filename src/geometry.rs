//! Capture-quality geometry analysis.
//!
//! Runs once after a page is decoded and records at most one advisory
//! classification, evaluated in fixed priority order:
//!
//! 1. two strokes whose dot bounding boxes intersect (beyond the
//!    millimeter tolerance) flag the page as STROKE_OVERLAP;
//! 2. otherwise a dot outside the content rectangle flags the page —
//!    OUT_OF_BOUNDS when some dot escapes the full page rectangle,
//!    MARGIN_NOT_RESPECTED when the ink merely strays into the margins.
//!
//! The classification is metadata, never a decode failure. Overlap is
//! judged on axis-aligned dot bounding boxes, not on true path
//! intersection.

use crate::ir::units::EPSILON;
use crate::ir::{CaptureError, Dot, Page, Stroke};

/// Axis-aligned bounding box of a set of located dots, in millimeters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl Bounds {
    fn of_dot(dot: &Dot) -> Option<Self> {
        let (x, y) = (dot.x?, dot.y?);
        Some(Self {
            xmin: x,
            ymin: y,
            xmax: x,
            ymax: y,
        })
    }

    fn expand(self, other: Self) -> Self {
        Self {
            xmin: self.xmin.min(other.xmin),
            ymin: self.ymin.min(other.ymin),
            xmax: self.xmax.max(other.xmax),
            ymax: self.ymax.max(other.ymax),
        }
    }

    /// Whether two boxes overlap by more than `tolerance` on both axes.
    fn intersects(&self, other: &Self, tolerance: f64) -> bool {
        let overlap_x = self.xmax.min(other.xmax) - self.xmin.max(other.xmin);
        let overlap_y = self.ymax.min(other.ymax) - self.ymin.max(other.ymin);
        overlap_x > tolerance && overlap_y > tolerance
    }
}

/// Bounding box of a stroke's located dots, `None` when it has none.
pub fn stroke_bounds(stroke: &Stroke) -> Option<Bounds> {
    stroke
        .dots
        .iter()
        .filter_map(Bounds::of_dot)
        .reduce(Bounds::expand)
}

/// Bounding box of every located dot on the page, `None` when there are
/// none.
pub fn page_ink_bounds(page: &Page) -> Option<Bounds> {
    page.dots()
        .filter_map(Bounds::of_dot)
        .reduce(Bounds::expand)
}

/// Classifies a page's capture quality, or `None` when no defect is
/// detected.
pub fn analyze(page: &Page) -> Option<CaptureError> {
    if has_overlapping_strokes(page) {
        return Some(CaptureError::StrokeOverlap);
    }

    if has_dot_outside_content_rect(page) {
        if has_dot_outside_page(page) {
            return Some(CaptureError::OutOfBounds);
        }
        return Some(CaptureError::MarginNotRespected);
    }

    None
}

/// Runs the analysis and records the result on the page.
pub fn apply(page: &mut Page) {
    page.capture_error = analyze(page);
}

fn has_overlapping_strokes(page: &Page) -> bool {
    let bounds: Vec<Bounds> = page.strokes.iter().filter_map(stroke_bounds).collect();

    for (index, first) in bounds.iter().enumerate() {
        for second in &bounds[index + 1..] {
            if first.intersects(second, EPSILON) {
                return true;
            }
        }
    }

    false
}

fn has_dot_outside_content_rect(page: &Page) -> bool {
    let (xmin, ymin, xmax, ymax) = page.content_rect();
    page.dots()
        .any(|dot| dot_outside(dot, xmin, ymin, xmax, ymax))
}

fn has_dot_outside_page(page: &Page) -> bool {
    page.dots()
        .any(|dot| dot_outside(dot, 0.0, 0.0, page.width, page.height))
}

fn dot_outside(dot: &Dot, xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> bool {
    let (Some(x), Some(y)) = (dot.x, dot.y) else {
        return false;
    };
    x < xmin - EPSILON || x > xmax + EPSILON || y < ymin - EPSILON || y > ymax + EPSILON
}
