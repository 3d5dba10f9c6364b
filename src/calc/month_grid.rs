use chrono::{Datelike, Duration, NaiveDate};

/// One month's cell layout: `leading_offset` blank placeholder positions
/// (aligning day 1 with its weekday column), then one cell per day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthGrid {
    first_day: NaiveDate,
    leading_offset: usize,
    cell_count: usize,
}

impl MonthGrid {
    fn new(first_day: NaiveDate) -> Self {
        let leading_offset = (weekday_number(first_day) - 1) as usize;
        let cell_count =
            leading_offset + days_in_month(first_day.year(), first_day.month()) as usize;
        MonthGrid {
            first_day,
            leading_offset,
            cell_count,
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    pub fn leading_offset(&self) -> usize {
        self.leading_offset
    }

    pub fn cell_count(&self) -> usize {
        self.cell_count
    }

    /// Date at a grid position. `None` for the leading blanks and for rows
    /// past the last day; callers can see `cell_count` and stay in bounds,
    /// so an overshoot is treated as absence rather than an error.
    pub fn date_at(&self, row: usize) -> Option<NaiveDate> {
        if row < self.leading_offset || row >= self.cell_count {
            return None;
        }
        self.first_day
            .checked_add_signed(Duration::days((row - self.leading_offset) as i64))
    }

    /// Header text, e.g. "March 2024".
    pub fn label(&self) -> String {
        format!(
            "{} {}",
            month_name(self.first_day.month()),
            self.first_day.year()
        )
    }
}

/// Grid generation anchored to a single reference date captured at
/// construction, so every grid is a pure function of the month offset.
#[derive(Debug, Clone, Copy)]
pub struct CalendarModel {
    today: NaiveDate,
}

impl CalendarModel {
    pub fn new(today: NaiveDate) -> Self {
        CalendarModel { today }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Grid for the month `month_offset` months after the reference month
    /// (0 = the reference month, negative = past months).
    pub fn grid_for(&self, month_offset: i32) -> MonthGrid {
        MonthGrid::new(first_of_month(add_months(self.today, month_offset)))
    }

    pub fn date_at(&self, month_offset: i32, row: usize) -> Option<NaiveDate> {
        self.grid_for(month_offset).date_at(row)
    }

    pub fn first_day_label(&self, month_offset: i32) -> String {
        self.grid_for(month_offset).label()
    }
}

// ── Date helpers ──────────────────────────────────────────────────────────────

/// Weekday number with Sunday as 1 through Saturday as 7.
pub fn weekday_number(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_sunday() + 1
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap()
        .signed_duration_since(NaiveDate::from_ymd_opt(year, month, 1).unwrap())
        .num_days() as u32
}

/// Month arithmetic over any signed count, clamping the day to the target
/// month's length (Jan 31 + 1 month = Feb 28/29).
pub fn add_months(date: NaiveDate, months: i32) -> NaiveDate {
    let year = date.year();
    let month = date.month() as i32;
    let new_total = month - 1 + months;
    let new_month = ((new_total % 12 + 12) % 12 + 1) as u32;
    let year_delta = new_total.div_euclid(12);
    let new_year = year + year_delta;
    let max_day = days_in_month(new_year, new_month);
    let new_day = date.day().min(max_day);
    NaiveDate::from_ymd_opt(new_year, new_month, new_day).unwrap_or(date)
}

pub(crate) fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}
