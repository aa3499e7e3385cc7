//! Gantt timeline geometry: date range, pixel scale, bars, day columns and
//! header cells. `today` and `zoom` are always explicit parameters.

use chrono::{Datelike, NaiveDate, Weekday};
use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{EngineConfig, TimelineConfig};
use crate::model::task::add_days;
use crate::model::{Interval, Task};
use crate::schedule::Schedule;

pub const MIN_ZOOM: f32 = 0.5;
pub const MAX_ZOOM: f32 = 2.0;
const ZOOM_STEP: f32 = 1.2;

/// Controls what scale the timeline displays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Granularity {
    Day,
    #[default]
    Week,
    Month,
    Year,
}

impl Granularity {
    pub const ALL: [Granularity; 4] = [
        Granularity::Day,
        Granularity::Week,
        Granularity::Month,
        Granularity::Year,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Granularity::Day => "Days",
            Granularity::Week => "Weeks",
            Granularity::Month => "Months",
            Granularity::Year => "Years",
        }
    }

    /// Header row grouping that suits this granularity.
    pub fn header_unit(self) -> HeaderUnit {
        match self {
            Granularity::Day | Granularity::Week => HeaderUnit::Week,
            Granularity::Month => HeaderUnit::Month,
            Granularity::Year => HeaderUnit::Year,
        }
    }
}

/// Inclusive range of calendar days shown by the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    /// Number of calendar days in the range, both ends included.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Span of all dated tasks, padded per granularity. Without any dates, a
/// window of `empty_window_days` centred on `today`.
pub fn compute_date_range(
    tasks: &[Task],
    granularity: Granularity,
    today: NaiveDate,
    config: &TimelineConfig,
) -> DateRange {
    let starts = tasks.iter().filter_map(|t| t.start_date.or(t.end_date));
    let ends = tasks.iter().filter_map(|t| t.end_date.or(t.start_date));
    match (starts.min(), ends.max()) {
        (Some(min), Some(max)) => {
            let pad = config.padding_days(granularity);
            DateRange::new(add_days(min, -pad), add_days(max, pad))
        }
        _ => {
            let half = config.empty_window_days / 2;
            DateRange::new(add_days(today, -half), add_days(today, half))
        }
    }
}

/// Pixels per day for a granularity at a zoom factor clamped to
/// [`MIN_ZOOM`, `MAX_ZOOM`].
pub fn day_width(granularity: Granularity, zoom: f32, config: &TimelineConfig) -> f32 {
    let zoom = if zoom.is_finite() { zoom } else { 1.0 };
    config.base_day_width(granularity) * zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}

/// Horizontal placement of one task bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub task_id: Uuid,
    pub left_px: f32,
    pub width_px: f32,
    /// Drawn with reduced opacity: the interval is inferred, not real data.
    pub placeholder: bool,
}

impl Geometry {
    pub fn right_px(&self) -> f32 {
        self.left_px + self.width_px
    }
}

/// Place one task bar. Width covers at least one day.
pub fn bar_geometry(
    task: &Task,
    range: &DateRange,
    day_width: f32,
    today: NaiveDate,
    placeholder_days: i64,
) -> Geometry {
    interval_geometry(task.id, task.interval(today, placeholder_days), range, day_width)
}

fn interval_geometry(
    task_id: Uuid,
    interval: Interval,
    range: &DateRange,
    day_width: f32,
) -> Geometry {
    let offset = (interval.start - range.start).num_days() as f32;
    let span = (interval.end - interval.start).num_days().max(1) as f32;
    Geometry {
        task_id,
        left_px: offset * day_width,
        width_px: span * day_width,
        placeholder: interval.placeholder,
    }
}

/// Vertical row layout of the Gantt canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowMetrics {
    pub row_height: f32,
    pub row_gap: f32,
    pub header_height: f32,
    /// Vertical inset so bars don't touch row edges.
    pub bar_inset: f32,
}

impl Default for RowMetrics {
    fn default() -> Self {
        Self {
            row_height: 30.0,
            row_gap: 2.0,
            header_height: 44.0,
            bar_inset: 3.0,
        }
    }
}

impl RowMetrics {
    pub fn row_top(&self, row: usize) -> f32 {
        self.header_height + row as f32 * (self.row_height + self.row_gap) + self.row_gap
    }
}

/// Rectangle of a bar in canvas coordinates (origin at the canvas top-left).
pub fn bar_rect(geometry: &Geometry, row: usize, metrics: &RowMetrics) -> Rect {
    let top = metrics.row_top(row) + metrics.bar_inset;
    Rect::from_min_size(
        Pos2::new(geometry.left_px, top),
        Vec2::new(
            geometry.width_px,
            (metrics.row_height - metrics.bar_inset * 2.0).max(1.0),
        ),
    )
}

/// One calendar day of the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineColumn {
    pub date: NaiveDate,
    pub is_weekend: bool,
    pub is_today: bool,
}

/// Lazy iterator over the days of a [`DateRange`]. Clone it to restart.
#[derive(Debug, Clone)]
pub struct Columns {
    next: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
    done: bool,
}

impl Iterator for Columns {
    type Item = TimelineColumn;

    fn next(&mut self) -> Option<TimelineColumn> {
        if self.done || self.next > self.end {
            return None;
        }
        let date = self.next;
        match date.succ_opt() {
            Some(next) => self.next = next,
            None => self.done = true,
        }
        Some(TimelineColumn {
            date,
            is_weekend: matches!(date.weekday(), Weekday::Sat | Weekday::Sun),
            is_today: date == self.today,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = if self.done || self.next > self.end {
            0
        } else {
            ((self.end - self.next).num_days() + 1) as usize
        };
        (n, Some(n))
    }
}

impl ExactSizeIterator for Columns {}

pub fn timeline_columns(range: &DateRange, today: NaiveDate) -> Columns {
    Columns {
        next: range.start,
        end: range.end,
        today,
        done: false,
    }
}

/// Header grouping of day columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeaderUnit {
    /// ISO-8601 weeks.
    Week,
    Month,
    Year,
}

impl HeaderUnit {
    fn key(self, date: NaiveDate) -> (i32, u32) {
        match self {
            HeaderUnit::Week => {
                let week = date.iso_week();
                (week.year(), week.week())
            }
            HeaderUnit::Month => (date.year(), date.month()),
            HeaderUnit::Year => (date.year(), 0),
        }
    }

    fn label(self, date: NaiveDate) -> String {
        match self {
            HeaderUnit::Week => date.format("W%V").to_string(),
            HeaderUnit::Month => date.format("%b %Y").to_string(),
            HeaderUnit::Year => date.format("%Y").to_string(),
        }
    }
}

/// One header cell spanning a contiguous run of days.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderCell {
    pub label: String,
    pub start: NaiveDate,
    pub days: usize,
    pub left_px: f32,
    pub width_px: f32,
}

/// Partition `columns` into runs sharing the same week, month or year.
pub fn header_cells(
    columns: impl IntoIterator<Item = TimelineColumn>,
    unit: HeaderUnit,
    day_width: f32,
) -> Vec<HeaderCell> {
    let mut cells: Vec<HeaderCell> = Vec::new();
    let mut current_key = None;
    let mut offset = 0usize;
    for column in columns {
        let key = unit.key(column.date);
        match cells.last_mut() {
            Some(cell) if current_key == Some(key) => {
                cell.days += 1;
                cell.width_px = cell.days as f32 * day_width;
            }
            _ => {
                cells.push(HeaderCell {
                    label: unit.label(column.date),
                    start: column.date,
                    days: 1,
                    left_px: offset as f32 * day_width,
                    width_px: day_width,
                });
                current_key = Some(key);
            }
        }
        offset += 1;
    }
    cells
}

/// The visible timeline: range, granularity and zoom as one value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub range: DateRange,
    pub granularity: Granularity,
    pub zoom: f32,
    /// Pixels per day derived from the other three fields.
    pub day_width: f32,
}

impl Timeline {
    pub fn new(range: DateRange, granularity: Granularity, zoom: f32, config: &TimelineConfig) -> Self {
        let zoom = if zoom.is_finite() { zoom.clamp(MIN_ZOOM, MAX_ZOOM) } else { 1.0 };
        Self {
            range,
            granularity,
            zoom,
            day_width: day_width(granularity, zoom, config),
        }
    }

    /// Timeline fitted to `tasks`.
    pub fn fit(
        tasks: &[Task],
        granularity: Granularity,
        zoom: f32,
        today: NaiveDate,
        config: &TimelineConfig,
    ) -> Self {
        let range = compute_date_range(tasks, granularity, today, config);
        Self::new(range, granularity, zoom, config)
    }

    /// Convert a date to an x-pixel offset from the range start.
    pub fn date_to_x(&self, date: NaiveDate) -> f32 {
        let days = (date - self.range.start).num_days() as f32;
        days * self.day_width
    }

    /// Convert an x-pixel offset back to a date.
    pub fn x_to_date(&self, x: f32) -> NaiveDate {
        let days = (x / self.day_width).floor() as i64;
        add_days(self.range.start, days)
    }

    /// Total width in pixels for the visible range.
    pub fn total_width(&self) -> f32 {
        self.range.days() as f32 * self.day_width
    }

    pub fn today_x(&self, today: NaiveDate) -> Option<f32> {
        self.range.contains(today).then(|| self.date_to_x(today))
    }

    pub fn zoomed_in(&self, config: &TimelineConfig) -> Self {
        Self::new(self.range, self.granularity, self.zoom * ZOOM_STEP, config)
    }

    pub fn zoomed_out(&self, config: &TimelineConfig) -> Self {
        Self::new(self.range, self.granularity, self.zoom / ZOOM_STEP, config)
    }

    pub fn with_granularity(&self, granularity: Granularity, config: &TimelineConfig) -> Self {
        Self::new(self.range, granularity, self.zoom, config)
    }

    pub fn columns(&self, today: NaiveDate) -> Columns {
        timeline_columns(&self.range, today)
    }

    pub fn header(&self, today: NaiveDate) -> Vec<HeaderCell> {
        header_cells(self.columns(today), self.granularity.header_unit(), self.day_width)
    }
}

/// Bars for every task, in input order.
///
/// Dated tasks sit at their own dates. Tasks missing a date sit where
/// `schedule` placed them, or at their placeholder without one.
pub fn gantt_geometry(
    tasks: &[Task],
    schedule: Option<&Schedule>,
    timeline: &Timeline,
    today: NaiveDate,
    config: &EngineConfig,
) -> Vec<Geometry> {
    tasks
        .iter()
        .map(|t| {
            let scheduled = schedule
                .filter(|_| !t.is_dated())
                .and_then(|s| s.interval(t.id));
            match scheduled {
                Some(interval) => {
                    interval_geometry(t.id, interval, &timeline.range, timeline.day_width)
                }
                None => bar_geometry(
                    t,
                    &timeline.range,
                    timeline.day_width,
                    today,
                    config.placeholder_days,
                ),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn empty_project_centres_on_today() {
        let cfg = TimelineConfig::default();
        let today = d(2024, 6, 15);
        let range = compute_date_range(&[Task::undated("x")], Granularity::Day, today, &cfg);
        assert_eq!(range.start, d(2024, 5, 31));
        assert_eq!(range.end, d(2024, 6, 30));
    }

    #[test]
    fn range_is_padded_by_granularity() {
        let cfg = TimelineConfig::default();
        let tasks = vec![
            Task::new("a", d(2024, 3, 1), d(2024, 3, 5)),
            Task::new("b", d(2024, 3, 4), d(2024, 3, 20)),
        ];
        let today = d(2000, 1, 1);
        let day = compute_date_range(&tasks, Granularity::Day, today, &cfg);
        assert_eq!((day.start, day.end), (d(2024, 2, 27), d(2024, 3, 23)));
        let month = compute_date_range(&tasks, Granularity::Month, today, &cfg);
        assert!(month.start < day.start && month.end > day.end);
    }

    #[test]
    fn zoom_is_clamped() {
        let cfg = TimelineConfig::default();
        assert_eq!(day_width(Granularity::Day, 10.0, &cfg), 80.0);
        assert_eq!(day_width(Granularity::Day, 0.1, &cfg), 20.0);
        assert_eq!(day_width(Granularity::Day, f32::NAN, &cfg), 40.0);
    }

    #[test]
    fn bar_offsets_follow_dates() {
        let range = DateRange::new(d(2024, 1, 1), d(2024, 1, 31));
        let task = Task::new("t", d(2024, 1, 3), d(2024, 1, 3));
        let g = bar_geometry(&task, &range, 40.0, d(2024, 1, 1), 7);
        assert_eq!(g.left_px, 80.0);
        assert_eq!(g.width_px, 40.0);
        assert!(!g.placeholder);

        let g = bar_geometry(&Task::undated("u"), &range, 10.0, d(2024, 1, 11), 7);
        assert!(g.placeholder);
        assert_eq!(g.left_px, 100.0);
        assert_eq!(g.width_px, 70.0);
    }

    #[test]
    fn undated_bars_follow_the_schedule() {
        use crate::model::{Dependency, DependencyKind};
        use crate::schedule::propagate;

        let today = d(2024, 1, 1);
        let cfg = EngineConfig::default();
        let real = Task::new("Real", d(2024, 1, 1), d(2024, 1, 10));
        let floating = Task::undated("Floating");
        let deps = vec![Dependency::new(floating.id, real.id, DependencyKind::FinishToStart)];
        let tasks = vec![real, floating];
        let schedule = propagate(&tasks, &deps, today, &cfg).unwrap();
        let timeline = Timeline::new(
            DateRange::new(d(2024, 1, 1), d(2024, 1, 31)),
            Granularity::Day,
            1.0,
            &cfg.timeline,
        );
        let w = timeline.day_width;

        let placed = gantt_geometry(&tasks, Some(&schedule), &timeline, today, &cfg);
        assert_eq!(placed[0].left_px, 0.0);
        assert_eq!(placed[1].left_px, 9.0 * w);
        assert_eq!(placed[1].width_px, 7.0 * w);
        assert!(placed[1].placeholder);
        // FS arrow runs forward: the successor starts where the predecessor ends.
        assert_eq!(placed[1].left_px, placed[0].right_px());

        let unplaced = gantt_geometry(&tasks, None, &timeline, today, &cfg);
        assert_eq!(unplaced[1].left_px, 0.0);
    }

    #[test]
    fn columns_flag_weekends_and_today() {
        // 2024-01-05 is a Friday.
        let range = DateRange::new(d(2024, 1, 5), d(2024, 1, 8));
        let cols = timeline_columns(&range, d(2024, 1, 7));
        assert_eq!(cols.len(), 4);
        let v: Vec<_> = cols.clone().collect();
        assert_eq!(
            v.iter().map(|c| c.is_weekend).collect::<Vec<_>>(),
            vec![false, true, true, false]
        );
        assert!(v[2].is_today);
        // Restartable: a clone yields the same sequence again.
        assert_eq!(cols.collect::<Vec<_>>(), v);
    }

    #[test]
    fn week_headers_split_on_iso_weeks() {
        // Wed 2024-01-03 .. Tue 2024-01-16 spans ISO weeks 1, 2 and 3.
        let range = DateRange::new(d(2024, 1, 3), d(2024, 1, 16));
        let cells = header_cells(timeline_columns(&range, d(2024, 1, 1)), HeaderUnit::Week, 10.0);
        let spans: Vec<(String, usize)> = cells.iter().map(|c| (c.label.clone(), c.days)).collect();
        assert_eq!(
            spans,
            vec![("W01".into(), 5), ("W02".into(), 7), ("W03".into(), 2)]
        );
        assert_eq!(cells[1].left_px, 50.0);
        assert_eq!(cells[1].width_px, 70.0);
    }

    #[test]
    fn month_headers_cover_range() {
        let range = DateRange::new(d(2024, 1, 20), d(2024, 3, 2));
        let cells = header_cells(timeline_columns(&range, d(2024, 1, 1)), HeaderUnit::Month, 2.0);
        assert_eq!(cells.len(), 3);
        assert_eq!(cells[0].label, "Jan 2024");
        assert_eq!(cells[1].days, 29);
        let total: usize = cells.iter().map(|c| c.days).sum();
        assert_eq!(total as i64, range.days());
    }

    #[test]
    fn timeline_round_trips_pixels() {
        let cfg = TimelineConfig::default();
        let tl = Timeline::new(
            DateRange::new(d(2024, 1, 1), d(2024, 1, 31)),
            Granularity::Day,
            1.0,
            &cfg,
        );
        assert_eq!(tl.date_to_x(d(2024, 1, 11)), 400.0);
        assert_eq!(tl.x_to_date(415.0), d(2024, 1, 11));
        assert_eq!(tl.total_width(), 31.0 * 40.0);
        assert_eq!(tl.today_x(d(2024, 2, 1)), None);
        let zoomed = tl.zoomed_in(&cfg).zoomed_in(&cfg).zoomed_in(&cfg).zoomed_in(&cfg);
        assert_eq!(zoomed.zoom, MAX_ZOOM);
    }
}
