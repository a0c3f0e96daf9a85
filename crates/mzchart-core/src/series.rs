// File: crates/mzchart-core/src/series.rs
// Summary: Series model and the flat-points-to-series builder with ground-point synthesis.

use std::collections::BTreeMap;

use crate::descriptor::{SeriesDescriptor, SeriesId};
use crate::error::ChartError;
use crate::palette::{Color, Palette};
use crate::point::Point;

/// Base visual settings applied to every series built for one chart.
/// Field names tell the renderer which point fields carry per-point
/// overrides (bullet shape/size, color).
#[derive(Clone, Debug)]
pub struct SeriesProto {
    pub fill_alpha: f64,
    pub line_alpha: f64,
    pub color_field: String,
    pub bullet_field: String,
    pub bullet_size_field: String,
}

impl SeriesProto {
    /// Chromatogram series: translucent area fill so overlapping traces stay
    /// readable.
    pub fn chromatogram() -> Self {
        Self { fill_alpha: 0.7, ..Self::default() }
    }

    /// Mass-peak series: fully opaque sticks.
    pub fn mass_peaks() -> Self {
        Self::default()
    }
}

impl Default for SeriesProto {
    fn default() -> Self {
        Self {
            fill_alpha: 1.0,
            line_alpha: 1.0,
            color_field: crate::point::keys::COLOR.to_string(),
            bullet_field: crate::point::keys::BULLET.to_string(),
            bullet_size_field: crate::point::keys::BULLET_SIZE.to_string(),
        }
    }
}

/// One renderable line/area: ordered points sharing a `series_id`, bounded by
/// synthetic ground points, plus the presentation state the renderer and the
/// selection machinery read and write.
#[derive(Clone, Debug)]
pub struct Series {
    pub id: SeriesId,
    pub title: String,
    pub x_field: String,
    pub y_field: String,
    pub color: Color,
    pub color_field: String,
    pub bullet_field: String,
    pub bullet_size_field: String,
    pub fill_alpha: f64,
    pub line_alpha: f64,
    pub hidden: bool,
}

/// Options for [`build_series`].
///
/// `horizontal_offset` pushes one extra ground point outward on the category
/// axis at each run end, visually separating coincident-category series.
/// `stick_plot` bounds every real point individually, producing lollipop
/// series. `decorate` runs once per real point; it must be pure assignment.
pub struct BuildOptions<'a> {
    pub horizontal_offset: f64,
    pub stick_plot: bool,
    pub proto: SeriesProto,
    pub decorate: Option<&'a dyn Fn(&mut Point)>,
    pub title: Option<&'a dyn Fn(&SeriesDescriptor) -> String>,
}

impl Default for BuildOptions<'_> {
    fn default() -> Self {
        Self {
            horizontal_offset: 0.0,
            stick_plot: false,
            proto: SeriesProto::default(),
            decorate: None,
            title: None,
        }
    }
}

/// Convert a flat, ungrouped point sequence into per-series polylines plus
/// the mutated point list the renderer consumes.
///
/// The input is scanned in order; a contiguous run of one `series_id` gets a
/// leading and a trailing ground point (y forced to exactly 0.0, same x) so
/// the series renders as a closed shape. Single-point runs are bounded on
/// both sides. A `Series` is created the first time an id is encountered;
/// its color comes from the descriptor when preassigned, else sequentially
/// from the palette. Synthetic points already present in the input are
/// skipped. A point without a matching descriptor aborts the build.
pub fn build_series(
    descriptors: &BTreeMap<SeriesId, SeriesDescriptor>,
    points: &[Point],
    palette: &mut Palette,
    opts: &BuildOptions<'_>,
) -> Result<(Vec<Series>, Vec<Point>), ChartError> {
    let mut series: Vec<Series> = Vec::new();
    let mut out: Vec<Point> = Vec::with_capacity(points.len() * 2);
    let mut last_id: Option<&SeriesId> = None;

    for (i, point) in points.iter().enumerate() {
        if point.synthetic {
            continue;
        }
        let desc = descriptors.get(&point.series_id).ok_or_else(|| {
            ChartError::MissingDescriptor { series_id: point.series_id.clone() }
        })?;

        let run_start = last_id != Some(&point.series_id);
        let run_end = match next_real(points, i) {
            Some(next) => next.series_id != point.series_id,
            None => true,
        };

        if run_start && !series.iter().any(|s| s.id == point.series_id) {
            let title = match opts.title {
                Some(f) => f(desc),
                None => desc.default_title(),
            };
            let color = match desc.color {
                Some(c) => c,
                None => palette.color(series.len()),
            };
            series.push(Series {
                id: point.series_id.clone(),
                title,
                x_field: desc.x_field.clone(),
                y_field: desc.y_field.clone(),
                color,
                color_field: opts.proto.color_field.clone(),
                bullet_field: opts.proto.bullet_field.clone(),
                bullet_size_field: opts.proto.bullet_size_field.clone(),
                fill_alpha: opts.proto.fill_alpha,
                line_alpha: opts.proto.line_alpha,
                hidden: false,
            });
        }

        let add_before = opts.stick_plot || run_start;
        let add_after = opts.stick_plot || run_end;
        let offset_before = opts.horizontal_offset > 0.0 && run_start;
        let offset_after = opts.horizontal_offset > 0.0 && run_end;

        if offset_before {
            out.push(ground_point(point, desc, -opts.horizontal_offset));
        }
        if add_before && !ground_already_at(out.last(), point, desc) {
            out.push(ground_point(point, desc, 0.0));
        }

        let mut real = point.clone();
        if let Some(decorate) = opts.decorate {
            decorate(&mut real);
        }
        out.push(real);

        if add_after {
            out.push(ground_point(point, desc, 0.0));
        }
        if offset_after {
            out.push(ground_point(point, desc, opts.horizontal_offset));
        }

        last_id = Some(&point.series_id);
    }

    Ok((series, out))
}

/// Next non-synthetic point after index `i`, if any.
fn next_real<'a>(points: &'a [Point], i: usize) -> Option<&'a Point> {
    points[i + 1..].iter().find(|p| !p.synthetic)
}

/// Duplicate one point as a ground point: y forced to the zero baseline
/// (never interpolated), x shifted by `offset` on the category axis.
fn ground_point(point: &Point, desc: &SeriesDescriptor, offset: f64) -> Point {
    let mut ground = point.clone();
    ground.synthetic = true;
    ground.set(desc.y_field.as_str(), 0.0);
    if offset != 0.0 {
        if let Some(x) = point.number(&desc.x_field) {
            ground.set(desc.x_field.as_str(), x + offset);
        }
    }
    ground
}

/// A ground point at the same category position for the same series already
/// sits in the adjacent slot; inserting another would double it up.
fn ground_already_at(last: Option<&Point>, point: &Point, desc: &SeriesDescriptor) -> bool {
    match last {
        Some(prev) => {
            prev.synthetic
                && prev.series_id == point.series_id
                && prev.get(&desc.x_field) == point.get(&desc.x_field)
        }
        None => false,
    }
}
