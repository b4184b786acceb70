use crate::config::ScheduleConfig;
use crate::state::RunState;
use chrono::{DateTime, Datelike, Duration, TimeZone, Timelike, Utc};
use std::fmt;

/// What this run should send. Computed fresh every run, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendDecision {
    Welcome,
    Weekly,
    None,
}

impl fmt::Display for SendDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Welcome => "welcome",
            Self::Weekly => "weekly",
            Self::None => "none",
        })
    }
}

/// Decide what to send at `now`, given in the configured local timezone.
///
/// - `Welcome` once `welcome_delay_minutes` have passed since the first
///   observed run, until a welcome has been sent.
/// - `Weekly` inside the configured weekday + hour window when at least
///   `send_interval_days` local calendar days separate it from the last
///   weekly send. Ticks land anywhere in that hour; a send earlier the same
///   day is zero days ago, which is what stops a second send in the window.
/// - `Weekly` also right after the welcome (same delay) while no weekly
///   message has ever gone out, when `follow_up_after_welcome` is set.
pub fn decide<Tz: TimeZone>(
    now: &DateTime<Tz>,
    schedule: &ScheduleConfig,
    state: &RunState,
) -> SendDecision {
    let now_utc = now.with_timezone(&Utc);
    let delay = Duration::minutes(i64::from(schedule.welcome_delay_minutes));

    if !state.welcome_sent {
        let anchor = state.first_seen_at.unwrap_or(now_utc);
        if now_utc >= anchor + delay {
            return SendDecision::Welcome;
        }
    }

    if weekly_window_due(now, schedule, state) || follow_up_due(now_utc, schedule, state, delay) {
        return SendDecision::Weekly;
    }

    SendDecision::None
}

fn weekly_window_due<Tz: TimeZone>(
    now: &DateTime<Tz>,
    schedule: &ScheduleConfig,
    state: &RunState,
) -> bool {
    let right_day = now.weekday().num_days_from_monday() == schedule.send_day_of_week;
    let right_hour = now.hour() == schedule.send_hour_local;
    if !(right_day && right_hour) {
        return false;
    }

    // Local calendar days: a late send last week or a DST shift must not
    // push this week's window out of reach.
    let today = now.date_naive();
    state.last_sent_at.is_none_or(|last| {
        let last_day = last.with_timezone(&now.timezone()).date_naive();
        (today - last_day).num_days() >= i64::from(schedule.send_interval_days)
    })
}

fn follow_up_due(
    now_utc: DateTime<Utc>,
    schedule: &ScheduleConfig,
    state: &RunState,
    delay: Duration,
) -> bool {
    schedule.follow_up_after_welcome
        && state.welcome_sent
        && state.last_sent_at.is_none()
        && state
            .welcome_sent_at
            .is_some_and(|welcomed| now_utc >= welcomed + delay)
}
