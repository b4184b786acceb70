use chrono::{Datelike, Days, NaiveDate, Weekday};

/// Danish short weekday names, Monday first.
pub const DA_DAYS: [&str; 7] = ["Man", "Tir", "Ons", "Tor", "Fre", "Lør", "Søn"];

pub fn day_label(weekday: Weekday) -> &'static str {
    DA_DAYS[weekday.num_days_from_monday() as usize]
}

/// One calendar day the forecast must cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaySlot {
    pub date: NaiveDate,
    pub label: &'static str,
}

impl DaySlot {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            label: day_label(date.weekday()),
        }
    }

    /// `Ons 21/10`, the form used when asking the agent.
    pub fn dated_label(&self) -> String {
        format!("{} {}", self.label, self.date.format("%d/%m"))
    }

    /// Whether an agent-supplied label names this day.
    ///
    /// Accepts the short name (any case), optionally followed by a `dd/mm`
    /// date; when a date is present it has to be this slot's date.
    pub fn matches(&self, raw: &str) -> bool {
        let mut parts = raw.split_whitespace();
        let Some(name) = parts.next() else {
            return false;
        };
        if name.to_lowercase() != self.label.to_lowercase() {
            return false;
        }
        match parts.next() {
            None => true,
            Some(date) => parse_day_month(date).is_none_or(|(day, month)| {
                day == self.date.day() && month == self.date.month()
            }),
        }
    }
}

fn parse_day_month(raw: &str) -> Option<(u32, u32)> {
    let (day, month) = raw.split_once('/')?;
    Some((day.trim().parse().ok()?, month.trim().parse().ok()?))
}

/// Today through the upcoming Sunday, inclusive. On a Sunday that is just today.
pub fn required_days(today: NaiveDate) -> Vec<DaySlot> {
    let remaining = 7 - today.weekday().num_days_from_monday();
    (0..remaining)
        .filter_map(|offset| today.checked_add_days(Days::new(u64::from(offset))))
        .map(DaySlot::new)
        .collect()
}
