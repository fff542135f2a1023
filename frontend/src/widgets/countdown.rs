use std::cell::RefCell;
use std::rc::{Rc, Weak};

use chrono::{DateTime, Duration, NaiveDateTime, SecondsFormat, Utc};
use gloo_timers::callback::Interval;
use web_sys::Element;

use crate::config::CountdownConfig;
use crate::dom;
use crate::error::{report, Result};

pub const TARGET_ATTR: &str = "data-countdown-date";

/// Accepts RFC 3339 or a bare local-less `YYYY-MM-DDTHH:MM[:SS]` (read as UTC).
pub fn parse_target(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Remaining {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Remaining {
    pub fn between(target: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let total = (target - now).num_seconds().max(0);
        Self {
            days: total / 86_400,
            hours: (total % 86_400) / 3_600,
            minutes: (total % 3_600) / 60,
            seconds: total % 60,
        }
    }

    /// Under a day left.
    pub fn is_urgent(&self) -> bool {
        self.days == 0
    }
}

/// `now + extension`, saturating at the latest representable instant.
fn extend(now: DateTime<Utc>, extension: Duration) -> DateTime<Utc> {
    now.checked_add_signed(extension)
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Countdown {
    target: DateTime<Utc>,
    extension: Duration,
}

impl Countdown {
    /// Starts from the persisted target; an absent, unparsable or elapsed one
    /// is replaced by `now + extension`.
    pub fn resume(raw: Option<&str>, now: DateTime<Utc>, extension: Duration) -> (Self, bool) {
        match parse_target(raw) {
            Some(target) if target > now => (Self { target, extension }, false),
            _ => (
                Self {
                    target: extend(now, extension),
                    extension,
                },
                true,
            ),
        }
    }

    pub fn target(&self) -> DateTime<Utc> {
        self.target
    }

    /// Returns the time left and whether the target had to be moved.
    pub fn tick(&mut self, now: DateTime<Utc>) -> (Remaining, bool) {
        let reset = self.target <= now;
        if reset {
            self.target = extend(now, self.extension);
        }
        (Remaining::between(self.target, now), reset)
    }
}

struct Display {
    root: Element,
    countdown: RefCell<Countdown>,
}

impl Display {
    fn persist(&self) -> Result<()> {
        let target = self.countdown.borrow().target();
        self.root
            .set_attribute(TARGET_ATTR, &target.to_rfc3339_opts(SecondsFormat::Secs, true))?;
        Ok(())
    }

    fn refresh(&self) -> Result<()> {
        let (remaining, reset) = self.countdown.borrow_mut().tick(Utc::now());
        if reset {
            log::debug!("countdown elapsed, extending target");
            self.persist()?;
        }
        for (unit, value) in [
            ("days", remaining.days),
            ("hours", remaining.hours),
            ("minutes", remaining.minutes),
            ("seconds", remaining.seconds),
        ] {
            for el in dom::query_all_in(&self.root, &format!("[data-unit='{}']", unit)) {
                el.set_text_content(Some(&format!("{:02}", value)));
            }
        }
        dom::set_class(&self.root, "pulse", remaining.is_urgent())
    }
}

pub struct CountdownTimer {
    _display: Rc<Display>,
    _timer: Interval,
}

impl CountdownTimer {
    pub fn install(config: &CountdownConfig) -> Result<Option<Self>> {
        let document = dom::document()?;
        let Some(root) = dom::query(&document, ".countdown") else {
            return Ok(None);
        };

        let raw = root.get_attribute(TARGET_ATTR);
        let (countdown, reinitialized) =
            Countdown::resume(raw.as_deref(), Utc::now(), config.extension());
        let display = Rc::new(Display {
            root,
            countdown: RefCell::new(countdown),
        });
        if reinitialized {
            display.persist()?;
        }
        display.refresh()?;

        let weak: Weak<Display> = Rc::downgrade(&display);
        let timer = Interval::new(config.tick_ms, move || {
            if let Some(display) = weak.upgrade() {
                report("countdown", display.refresh());
            }
        });

        Ok(Some(Self {
            _display: display,
            _timer: timer,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn elapsed_target_moves_four_days_out() {
        let mut countdown = Countdown {
            target: now() - Duration::milliseconds(1),
            extension: Duration::days(4),
        };
        let (remaining, reset) = countdown.tick(now());
        assert!(reset);
        assert_eq!(countdown.target(), now() + Duration::days(4));
        assert_eq!(
            remaining,
            Remaining { days: 4, hours: 0, minutes: 0, seconds: 0 }
        );
    }

    #[test]
    fn future_target_is_kept() {
        let raw = "2026-03-11T14:30:15Z";
        let (mut countdown, reinitialized) = Countdown::resume(Some(raw), now(), Duration::days(4));
        assert!(!reinitialized);
        let (remaining, reset) = countdown.tick(now());
        assert!(!reset);
        assert_eq!(
            remaining,
            Remaining { days: 1, hours: 2, minutes: 30, seconds: 15 }
        );
        assert!(!remaining.is_urgent());
    }

    #[test]
    fn malformed_or_missing_target_reinitializes() {
        for raw in [None, Some("next tuesday"), Some("")] {
            let (countdown, reinitialized) = Countdown::resume(raw, now(), Duration::days(4));
            assert!(reinitialized);
            assert_eq!(countdown.target(), now() + Duration::days(4));
        }
    }

    #[test]
    fn past_target_reinitializes_on_resume() {
        let (countdown, reinitialized) =
            Countdown::resume(Some("2020-01-01T00:00:00Z"), now(), Duration::days(4));
        assert!(reinitialized);
        assert!(countdown.target() > now());
    }

    #[test]
    fn huge_extension_saturates_instead_of_panicking() {
        let (countdown, reinitialized) = Countdown::resume(None, now(), Duration::MAX);
        assert!(reinitialized);
        assert_eq!(countdown.target(), DateTime::<Utc>::MAX_UTC);
    }

    #[test]
    fn naive_timestamps_are_utc() {
        assert_eq!(
            parse_target(Some("2026-03-10T12:00")),
            Some(now())
        );
        assert_eq!(
            parse_target(Some("2026-03-10T14:00:00+02:00")),
            Some(now())
        );
    }

    #[test]
    fn remaining_never_negative() {
        let remaining = Remaining::between(now() - Duration::hours(3), now());
        assert_eq!(remaining, Remaining { days: 0, hours: 0, minutes: 0, seconds: 0 });
    }

    #[test]
    fn under_a_day_is_urgent() {
        let remaining = Remaining::between(now() + Duration::hours(23), now());
        assert!(remaining.is_urgent());
        assert_eq!(remaining.hours, 23);
    }
}
