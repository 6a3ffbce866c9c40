//! Post-decode page normalization.
//!
//! Optional, format-agnostic rewrites applied after decoding and
//! capture-quality analysis:
//!
//! 1. **centering** translates the ink so its bounding box sits centered
//!    in the page's content rectangle;
//! 2. **time rebasing** shifts all timestamps so the page's first dot is
//!    at 0, preserving every relative delta;
//! 3. **quantization** rounds coordinates and the page dimensions to a
//!    caller-chosen number of decimals.
//!
//! Quantization always runs last so rounding error never feeds back into
//! the geometric steps.

use crate::geometry;
use crate::ir::Page;

/// Which normalization steps to run.
#[derive(Clone, Copy, Debug, Default)]
pub struct NormalizeOptions {
    /// Center the ink inside the content rectangle.
    pub center: bool,

    /// Shift timestamps so the first dot is at 0.
    pub rebase_time: bool,

    /// Round coordinates and page dimensions to this many decimals.
    pub precision: Option<u32>,
}

/// Applies the selected normalization steps, in their fixed order.
pub fn normalize_page(page: &mut Page, options: &NormalizeOptions) {
    if options.center {
        center(page);
    }
    if options.rebase_time {
        rebase_times(page);
    }
    if let Some(precision) = options.precision {
        quantize(page, precision);
    }
}

/// Translates all dot coordinates so the ink bounding box is centered in
/// the content rectangle. Pages without located ink are left untouched.
pub fn center(page: &mut Page) {
    let Some(ink) = geometry::page_ink_bounds(page) else {
        return;
    };

    let (xmin, ymin, xmax, ymax) = page.content_rect();
    let shift_x = (xmin + xmax) / 2.0 - (ink.xmin + ink.xmax) / 2.0;
    let shift_y = (ymin + ymax) / 2.0 - (ink.ymin + ink.ymax) / 2.0;

    for stroke in &mut page.strokes {
        for dot in &mut stroke.dots {
            if let Some(x) = dot.x.as_mut() {
                *x += shift_x;
            }
            if let Some(y) = dot.y.as_mut() {
                *y += shift_y;
            }
        }
    }
}

/// Shifts every timestamp on the page so the first dot's timestamp
/// becomes 0. Falls back to the first stroke's start time when the page
/// has strokes but no dots; pages without strokes are left untouched.
pub fn rebase_times(page: &mut Page) {
    let first_dot_time = page.dots().map(|dot| dot.timestamp).next();
    let Some(offset) = first_dot_time.or_else(|| page.strokes.first().map(|s| s.start_time))
    else {
        return;
    };

    for stroke in &mut page.strokes {
        stroke.start_time -= offset;
        stroke.end_time -= offset;
        for dot in &mut stroke.dots {
            dot.timestamp -= offset;
        }
    }
}

/// Rounds dot coordinates and the page dimensions to `precision`
/// decimals.
pub fn quantize(page: &mut Page, precision: u32) {
    page.width = round_to(page.width, precision);
    page.height = round_to(page.height, precision);

    for stroke in &mut page.strokes {
        for dot in &mut stroke.dots {
            if let Some(x) = dot.x.as_mut() {
                *x = round_to(*x, precision);
            }
            if let Some(y) = dot.y.as_mut() {
                *y = round_to(*y, precision);
            }
        }
    }
}

fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Dot, Stroke};

    #[test]
    fn rebasing_zeroes_the_first_dot_and_keeps_deltas() {
        let mut page = Page::new();
        page.add_stroke(
            Stroke::new(1_576_499_042_448, 1_576_499_043_432)
                .with_dot(Dot::new(1.0, 1.0, 1_576_499_042_448))
                .with_dot(Dot::new(2.0, 2.0, 1_576_499_042_500)),
        );
        page.add_stroke(
            Stroke::new(1_576_500_049_236, 1_576_500_049_319)
                .with_dot(Dot::new(3.0, 3.0, 1_576_500_049_236)),
        );

        rebase_times(&mut page);

        assert_eq!(page.strokes[0].start_time, 0);
        assert_eq!(page.strokes[0].dots[0].timestamp, 0);
        assert_eq!(page.strokes[0].dots[1].timestamp, 52);
        assert_eq!(page.strokes[0].end_time, 984);
        assert_eq!(page.strokes[1].start_time, 1_006_788);
        assert_eq!(page.strokes[1].dots[0].timestamp, 1_006_788);
    }

    #[test]
    fn centering_moves_ink_to_the_content_center() {
        let mut page = Page {
            width: 100.0,
            height: 100.0,
            margin_left: 10.0,
            margin_top: 10.0,
            margin_right: 10.0,
            margin_bottom: 10.0,
            ..Page::default()
        };
        page.add_stroke(
            Stroke::new(0, 10)
                .with_dot(Dot::new(0.0, 0.0, 0))
                .with_dot(Dot::new(20.0, 20.0, 10)),
        );

        center(&mut page);

        assert_eq!(page.strokes[0].dots[0].x, Some(40.0));
        assert_eq!(page.strokes[0].dots[0].y, Some(40.0));
        assert_eq!(page.strokes[0].dots[1].x, Some(60.0));
        assert_eq!(page.strokes[0].dots[1].y, Some(60.0));
    }

    #[test]
    fn quantization_rounds_coordinates_and_dimensions() {
        let mut page = Page {
            width: 210.225928,
            height: 271.935572,
            ..Page::default()
        };
        page.add_stroke(Stroke::new(0, 10).with_dot(Dot::new(28.8984257, 72.8031712, 0)));

        quantize(&mut page, 3);

        assert_eq!(page.width, 210.226);
        assert_eq!(page.height, 271.936);
        assert_eq!(page.strokes[0].dots[0].x, Some(28.898));
        assert_eq!(page.strokes[0].dots[0].y, Some(72.803));
    }

    #[test]
    fn quantization_runs_after_centering() {
        let mut page = Page {
            width: 10.0,
            height: 10.0,
            ..Page::default()
        };
        page.add_stroke(Stroke::new(0, 10).with_dot(Dot::new(1.0001, 1.0001, 0)));

        normalize_page(
            &mut page,
            &NormalizeOptions {
                center: true,
                rebase_time: false,
                precision: Some(3),
            },
        );

        // A single dot centers to exactly (5, 5); quantizing first would
        // have moved the center by the rounding residue.
        assert_eq!(page.strokes[0].dots[0].x, Some(5.0));
        assert_eq!(page.strokes[0].dots[0].y, Some(5.0));
    }

    #[test]
    fn empty_page_is_untouched() {
        let mut page = Page::new();
        normalize_page(
            &mut page,
            &NormalizeOptions {
                center: true,
                rebase_time: true,
                precision: Some(3),
            },
        );
        assert_eq!(page, Page::new());
    }
}
