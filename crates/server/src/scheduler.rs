// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Wall-clock scheduling of the daily notification and purge runs.
//!
//! Jobs fire at fixed local times in the configured timezone: two birthday
//! notification runs (7-day and 1-day lead) at the notification time, and
//! the transfer purge at the purge time. Each tick is independent and
//! failure-isolated — a failed run is logged and the loop keeps going. The
//! purge is idempotent-safe and transfer recording is idempotent-checked,
//! so missed or repeated ticks cannot corrupt state.

use chrono::{Datelike, Duration as ChronoDuration, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use gift_fund_api::OutboundMessage;
use std::sync::Arc;
use time::{Date, Month};
use tracing::{error, info, warn};

use crate::live::OutboundBroadcaster;
use crate::AppState;

/// Wall-clock schedule in a declared timezone.
#[derive(Debug, Clone, Copy)]
pub struct Schedule {
    /// The timezone the local fire times are declared in.
    pub timezone: Tz,
    /// Local time of the two notification runs.
    pub notify_time: NaiveTime,
    /// Local time of the nightly purge run.
    pub purge_time: NaiveTime,
}

/// The two job kinds the scheduler drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Job {
    /// Both birthday notification runs (7-day and 1-day lead).
    Notify,
    /// The transfer purge.
    Purge,
}

/// Runs the scheduler until the process exits.
pub async fn run(state: AppState, broadcaster: Arc<OutboundBroadcaster>, schedule: Schedule) {
    info!(
        timezone = %schedule.timezone,
        notify_time = %schedule.notify_time,
        purge_time = %schedule.purge_time,
        "Scheduler started"
    );

    loop {
        let (job, wait) = next_job(&schedule, Utc::now().with_timezone(&schedule.timezone));
        tokio::time::sleep(wait).await;

        let local_today: Option<Date> = to_time_date(
            Utc::now().with_timezone(&schedule.timezone).date_naive(),
        );
        let Some(today) = local_today else {
            error!("Could not represent the local date; skipping tick");
            continue;
        };

        match job {
            Job::Notify => run_notifications(&state, &broadcaster, today).await,
            Job::Purge => run_purge(&state, today).await,
        }
    }
}

/// Picks the next job to fire and how long to wait for it.
fn next_job(
    schedule: &Schedule,
    local_now: chrono::DateTime<Tz>,
) -> (Job, std::time::Duration) {
    let notify_at = next_occurrence(schedule.timezone, local_now, schedule.notify_time);
    let purge_at = next_occurrence(schedule.timezone, local_now, schedule.purge_time);

    let (job, fire_at) = if notify_at <= purge_at {
        (Job::Notify, notify_at)
    } else {
        (Job::Purge, purge_at)
    };

    let wait = (fire_at - local_now)
        .to_std()
        .unwrap_or(std::time::Duration::ZERO);
    (job, wait)
}

/// The next occurrence of a local wall-clock time, today or tomorrow.
///
/// Nonexistent or ambiguous local times around DST transitions resolve to
/// the earliest valid instant at or after the nominal label.
fn next_occurrence(
    tz: Tz,
    local_now: chrono::DateTime<Tz>,
    at: NaiveTime,
) -> chrono::DateTime<Tz> {
    let today: NaiveDateTime = local_now.date_naive().and_time(at);
    let candidate: chrono::DateTime<Tz> = resolve_local(tz, today);
    if candidate > local_now {
        return candidate;
    }
    let tomorrow: NaiveDateTime = (local_now.date_naive() + ChronoDuration::days(1)).and_time(at);
    resolve_local(tz, tomorrow)
}

fn resolve_local(tz: Tz, naive: NaiveDateTime) -> chrono::DateTime<Tz> {
    tz.from_local_datetime(&naive)
        .earliest()
        .unwrap_or_else(|| {
            // Skipped by a DST gap: fire one hour later instead.
            tz.from_local_datetime(&(naive + ChronoDuration::hours(1)))
                .earliest()
                .unwrap_or_else(|| Utc::now().with_timezone(&tz))
        })
}

/// Runs both notification leads and hands the fan-out to the gateway.
async fn run_notifications(
    state: &AppState,
    broadcaster: &Arc<OutboundBroadcaster>,
    today: Date,
) {
    for days_before in [7_i64, 1] {
        let messages: Vec<OutboundMessage> = {
            let mut persistence = state.persistence.lock().await;
            match gift_fund_api::upcoming_birthday_notifications(
                &mut persistence,
                today,
                days_before,
            ) {
                Ok(messages) => messages,
                Err(err) => {
                    error!(days_before, %err, "Notification run failed");
                    continue;
                }
            }
        };

        if messages.is_empty() {
            continue;
        }
        info!(
            days_before,
            count = messages.len(),
            "Dispatching birthday reminders"
        );
        broadcaster.deliver_all(&messages);
    }
}

/// Runs the nightly transfer purge.
async fn run_purge(state: &AppState, today: Date) {
    let mut persistence = state.persistence.lock().await;
    match persistence.purge_past_transfers(today) {
        Ok(deleted) => info!(deleted, "Nightly purge finished"),
        Err(err) => error!(%err, "Nightly purge failed"),
    }
}

/// Converts a chrono calendar date to a `time` date.
fn to_time_date(naive: chrono::NaiveDate) -> Option<Date> {
    let month_number: u8 = u8::try_from(naive.month()).ok()?;
    let month: Month = Month::try_from(month_number).ok()?;
    let day: u8 = u8::try_from(naive.day()).ok()?;
    Date::from_calendar_date(naive.year(), month, day).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn tz() -> Tz {
        "Europe/Moscow".parse().expect("valid timezone")
    }

    fn local(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
    ) -> chrono::DateTime<Tz> {
        tz().with_ymd_and_hms(year, month, day, hour, minute, 0)
            .single()
            .expect("unambiguous local time")
    }

    fn schedule() -> Schedule {
        Schedule {
            timezone: tz(),
            notify_time: NaiveTime::from_hms_opt(11, 7, 0).expect("valid time"),
            purge_time: NaiveTime::from_hms_opt(0, 0, 0).expect("valid time"),
        }
    }

    #[test]
    fn before_the_notification_time_the_notify_job_is_next() {
        let (job, wait) = next_job(&schedule(), local(2026, 3, 10, 9, 0));
        assert_eq!(job, Job::Notify);
        assert_eq!(wait, std::time::Duration::from_secs(2 * 3600 + 7 * 60));
    }

    #[test]
    fn after_the_notification_time_the_purge_is_next() {
        let (job, wait) = next_job(&schedule(), local(2026, 3, 10, 12, 0));
        assert_eq!(job, Job::Purge);
        assert_eq!(wait, std::time::Duration::from_secs(12 * 3600));
    }

    #[test]
    fn occurrences_roll_over_to_tomorrow() {
        let now = local(2026, 3, 10, 23, 30);
        let next = next_occurrence(
            tz(),
            now,
            NaiveTime::from_hms_opt(11, 7, 0).expect("valid time"),
        );
        assert_eq!(
            next.date_naive(),
            NaiveDate::from_ymd_opt(2026, 3, 11).expect("valid date")
        );
    }

    #[test]
    fn chrono_dates_convert_to_time_dates() {
        let date = to_time_date(NaiveDate::from_ymd_opt(2026, 3, 10).expect("valid date"))
            .expect("converted");
        assert_eq!(date.year(), 2026);
        assert_eq!(u8::from(date.month()), 3);
        assert_eq!(date.day(), 10);
    }
}
