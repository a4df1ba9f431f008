use chrono::NaiveDate;

use crate::date;

/// Controls what the timeline header labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineScale {
    Days,
    Weeks,
    Months,
}

pub const MIN_PIXELS_PER_DAY: f32 = 2.0;
pub const MAX_PIXELS_PER_DAY: f32 = 80.0;

/// Manages the rendered range of the timeline.
#[derive(Debug, Clone)]
pub struct TimelineViewport {
    /// The leftmost rendered date.
    pub start: NaiveDate,
    /// The rightmost rendered date.
    pub end: NaiveDate,
    /// Current header scale.
    pub scale: TimelineScale,
    /// Pixels per day (controls zoom level).
    pub pixels_per_day: f32,
}

impl TimelineViewport {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end: end.max(start),
            scale: TimelineScale::Weeks,
            pixels_per_day: 18.0,
        }
    }

    /// Days between the two rendered edges.
    pub fn total_days(&self) -> i64 {
        date::days_between(self.start, self.end).max(1)
    }

    /// Convert a date to an x-pixel offset from the viewport start.
    pub fn date_to_x(&self, date: NaiveDate) -> f32 {
        date::days_between(self.start, date) as f32 * self.pixels_per_day
    }

    /// Convert an x-pixel offset back to a date, snapped to whole days.
    pub fn x_to_date(&self, x: f32) -> NaiveDate {
        let days = (x / self.pixels_per_day).round() as i64;
        date::add_days(self.start, days)
    }

    /// Track width in pixels for the rendered range.
    pub fn total_width(&self) -> f32 {
        self.total_days() as f32 * self.pixels_per_day
    }

    /// Scale factor used by drag gestures: `total_days / track_width`.
    pub fn days_per_pixel(&self) -> f64 {
        self.total_days() as f64 / self.total_width() as f64
    }

    /// True if `[start, due]` lies inside the rendered range.
    pub fn contains_window(&self, start: NaiveDate, due: NaiveDate) -> bool {
        start >= self.start && due <= self.end
    }

    /// Extend the rendered range so `[start, due]` fits with `padding_days`
    /// to spare on the side(s) that overflowed. Never shrinks.
    /// Returns true if the range changed.
    pub fn widen_to(&mut self, start: NaiveDate, due: NaiveDate, padding_days: i64) -> bool {
        let mut changed = false;
        if start < self.start {
            self.start = date::add_days(start, -padding_days);
            changed = true;
        }
        if due > self.end {
            self.end = date::add_days(due, padding_days);
            changed = true;
        }
        changed
    }

    /// Reset the range to `span` plus padding, or to a window around `today`
    /// when there is nothing to show.
    pub fn fit_to(&mut self, span: Option<(NaiveDate, NaiveDate)>, today: NaiveDate, padding_days: i64) {
        let (lo, hi) = span.unwrap_or((today, date::add_days(today, 30)));
        self.start = date::add_days(lo, -padding_days);
        self.end = date::add_days(hi, padding_days);
    }

    /// Zoom in (increase pixels per day).
    pub fn zoom_in(&mut self) {
        self.pixels_per_day = (self.pixels_per_day * 1.2).min(MAX_PIXELS_PER_DAY);
    }

    /// Zoom out (decrease pixels per day).
    pub fn zoom_out(&mut self) {
        self.pixels_per_day = (self.pixels_per_day / 1.2).max(MIN_PIXELS_PER_DAY);
    }

    /// Scroll the viewport by a number of days.
    pub fn scroll_days(&mut self, days: i64) {
        self.start = date::add_days(self.start, days);
        self.end = date::add_days(self.end, days);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn pixel_conversions_round_trip_whole_days() {
        let vp = TimelineViewport::new(d(2025, 1, 1), d(2025, 2, 1));
        let x = vp.date_to_x(d(2025, 1, 11));
        assert_eq!(x, 180.0);
        assert_eq!(vp.x_to_date(x), d(2025, 1, 11));
        assert_eq!(vp.x_to_date(x + 8.0), d(2025, 1, 11));
        assert_eq!(vp.x_to_date(x + 10.0), d(2025, 1, 12));
    }

    #[test]
    fn scale_factor_is_days_over_width() {
        let vp = TimelineViewport::new(d(2025, 1, 1), d(2025, 1, 31));
        assert_eq!(vp.total_days(), 30);
        assert!((vp.days_per_pixel() - 1.0 / 18.0).abs() < 1e-9);
    }

    #[test]
    fn widening_only_grows_the_overflowing_side() {
        let mut vp = TimelineViewport::new(d(2025, 1, 10), d(2025, 1, 20));
        assert!(!vp.widen_to(d(2025, 1, 12), d(2025, 1, 18), 3));
        assert!(vp.widen_to(d(2025, 1, 15), d(2025, 1, 25), 3));
        assert_eq!(vp.start, d(2025, 1, 10));
        assert_eq!(vp.end, d(2025, 1, 28));
        assert!(vp.widen_to(d(2025, 1, 5), d(2025, 1, 6), 3));
        assert_eq!(vp.start, d(2025, 1, 2));
    }

    #[test]
    fn zoom_is_bounded() {
        let mut vp = TimelineViewport::new(d(2025, 1, 1), d(2025, 1, 2));
        for _ in 0..50 {
            vp.zoom_in();
        }
        assert_eq!(vp.pixels_per_day, MAX_PIXELS_PER_DAY);
        for _ in 0..80 {
            vp.zoom_out();
        }
        assert_eq!(vp.pixels_per_day, MIN_PIXELS_PER_DAY);
    }
}
