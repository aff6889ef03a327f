use std::fmt::Display;
use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use thiserror::Error;
use tracing::info;

use crate::types::Weekday;

pub const FIGURE_TITLE: &str = "Summary of Music Listening Habits";
pub const FIGURE_SIZE: (u32, u32) = (1200, 600);
pub const TIMES_LISTENED_BINS: usize = 100;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to draw histograms: {0}")]
    Drawing(String),
}

fn drawing<E: Display>(err: E) -> RenderError {
    RenderError::Drawing(err.to_string())
}

/// Equal-width bin counts over `[lower, upper]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub lower: f64,
    pub upper: f64,
    pub counts: Vec<u64>,
}

impl Histogram {
    /// Counts `values` into `bins` equal-width bins.
    ///
    /// Without an explicit `range` the data minimum and maximum are used, a
    /// zero-width range being widened by half a unit on each side. Every bin is
    /// half-open except the last, which also holds values equal to `upper`.
    /// Values outside the range are not counted.
    pub fn equal_width(values: &[f64], bins: usize, range: Option<(f64, f64)>) -> Self {
        let bins = bins.max(1);
        let (mut lower, mut upper) = range.unwrap_or_else(|| {
            let finite = values.iter().copied().filter(|v| v.is_finite());
            let min = finite.clone().fold(f64::INFINITY, f64::min);
            let max = finite.fold(f64::NEG_INFINITY, f64::max);
            if min.is_finite() {
                (min, max)
            } else {
                (0.0, 1.0)
            }
        });
        if lower == upper {
            lower -= 0.5;
            upper += 0.5;
        }

        let width = (upper - lower) / bins as f64;
        let mut counts = vec![0u64; bins];
        for value in values.iter().copied() {
            if !(lower..=upper).contains(&value) {
                continue;
            }
            let idx = (((value - lower) / width).floor() as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Self {
            lower,
            upper,
            counts,
        }
    }

    /// Plays per weekday, one bin per day from Monday to Sunday.
    pub fn weekday_counts(weekdays: &[Weekday]) -> Self {
        let indices: Vec<f64> = weekdays.iter().map(|day| day.index() as f64).collect();
        Self::equal_width(&indices, Weekday::ALL.len(), Some((0.0, Weekday::ALL.len() as f64)))
    }

    pub fn bin_width(&self) -> f64 {
        (self.upper - self.lower) / self.counts.len() as f64
    }

    pub fn bin_edges(&self, idx: usize) -> (f64, f64) {
        let width = self.bin_width();
        let start = self.lower + width * idx as f64;
        (start, start + width)
    }

    pub fn max_count(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

/// Histogram pair drawn as one row of the figure.
#[derive(Debug, Clone)]
pub struct PersonHistograms {
    pub label: String,
    pub times_listened: Histogram,
    pub weekdays: Histogram,
}

fn y_ceiling(hist: &Histogram) -> u64 {
    let max = hist.max_count().max(1);
    max + max / 10 + 1
}

fn draw_times_listened(
    area: &DrawingArea<SVGBackend<'_>, Shift>,
    person: &PersonHistograms,
) -> Result<(), RenderError> {
    let hist = &person.times_listened;
    let mut chart = ChartBuilder::on(area)
        .caption(
            format!("Times Listened of a Single Track, Person {}", person.label),
            ("sans-serif", 16),
        )
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(45)
        .build_cartesian_2d(hist.lower..hist.upper, 0u64..y_ceiling(hist))
        .map_err(drawing)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Times Listened")
        .y_desc("Frequency")
        .draw()
        .map_err(drawing)?;

    chart
        .draw_series(
            hist.counts
                .iter()
                .enumerate()
                .filter(|(_, count)| **count > 0)
                .map(|(idx, count)| {
                    let (start, end) = hist.bin_edges(idx);
                    Rectangle::new([(start, 0u64), (end, *count)], BLUE.filled())
                }),
        )
        .map_err(drawing)?;

    Ok(())
}

fn weekday_label(x: &f64) -> String {
    if (x - x.round()).abs() > 1e-6 || *x < 0.0 {
        return String::new();
    }
    Weekday::from_index(x.round() as usize)
        .map(|day| day.as_str().to_string())
        .unwrap_or_default()
}

fn draw_weekdays(
    area: &DrawingArea<SVGBackend<'_>, Shift>,
    person: &PersonHistograms,
) -> Result<(), RenderError> {
    let hist = &person.weekdays;
    let mut chart = ChartBuilder::on(area)
        .caption(
            format!("Listening Amounts at Different Weekdays, Person {}", person.label),
            ("sans-serif", 16),
        )
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(45)
        .build_cartesian_2d(-0.5f64..6.5f64, 0u64..y_ceiling(hist))
        .map_err(drawing)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(Weekday::ALL.len())
        .x_label_formatter(&weekday_label)
        .x_desc("Weekday")
        .y_desc("Frequency")
        .draw()
        .map_err(drawing)?;

    // Bars are centred on their day and drawn at half width with an outline.
    let bars: Vec<(f64, u64)> = hist
        .counts
        .iter()
        .enumerate()
        .map(|(idx, count)| (idx as f64, *count))
        .collect();
    chart
        .draw_series(bars.iter().map(|(centre, count)| {
            Rectangle::new([(centre - 0.25, 0u64), (centre + 0.25, *count)], BLUE.filled())
        }))
        .map_err(drawing)?;
    chart
        .draw_series(bars.iter().map(|(centre, count)| {
            Rectangle::new([(centre - 0.25, 0u64), (centre + 0.25, *count)], BLACK.stroke_width(1))
        }))
        .map_err(drawing)?;

    Ok(())
}

/// Draws one row per person: times-listened distribution on the left,
/// plays per weekday on the right.
pub fn render_histograms(path: &Path, people: &[PersonHistograms]) -> Result<(), RenderError> {
    let root = SVGBackend::new(path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(drawing)?;
    let root = root
        .titled(FIGURE_TITLE, ("sans-serif", 26))
        .map_err(drawing)?;

    let panels = root.split_evenly((people.len().max(1), 2));
    for (person, row) in people.iter().zip(panels.chunks(2)) {
        draw_times_listened(&row[0], person)?;
        draw_weekdays(&row[1], person)?;
    }

    root.present().map_err(drawing)?;
    info!(path = %path.display(), people = people.len(), "rendered histograms");
    Ok(())
}
