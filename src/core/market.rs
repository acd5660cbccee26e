//! Exchange session clock.
//!
//! Only used to pick how long a cached quote stays fresh, so the rules are
//! deliberately coarse: weekdays, 09:30 up to (not including) 16:00 in the
//! exchange's own time zone. Holidays are not modelled.

use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};
use chrono_tz::Tz;
use tracing::{debug, warn};

pub const DEFAULT_MARKET_TIMEZONE: &str = "America/New_York";

const SESSION_OPEN_MINUTE: u32 = 9 * 60 + 30;
const SESSION_CLOSE_MINUTE: u32 = 16 * 60;

#[derive(Debug, Clone, Copy)]
pub struct MarketClock {
    zone: Option<Tz>,
}

impl MarketClock {
    /// Builds a clock for an IANA zone name. An unknown zone is kept as `None`
    /// and makes [`MarketClock::is_open`] report an open market.
    pub fn new(zone_name: &str) -> Self {
        let zone = match zone_name.parse::<Tz>() {
            Ok(tz) => Some(tz),
            Err(e) => {
                warn!(zone = %zone_name, error = %e, "Unknown market time zone");
                None
            }
        };
        Self { zone }
    }

    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        let Some(zone) = self.zone else {
            // Fail open: an open market means the short freshness window, so
            // a fetch is attempted rather than skipped for a whole day.
            debug!("No market time zone, assuming market is open");
            return true;
        };

        let local = now.with_timezone(&zone);
        let weekday = !matches!(local.weekday(), Weekday::Sat | Weekday::Sun);
        let minute_of_day = local.hour() * 60 + local.minute();
        let in_session = (SESSION_OPEN_MINUTE..SESSION_CLOSE_MINUTE).contains(&minute_of_day);

        debug!(%local, weekday, in_session, "Evaluated market hours");
        weekday && in_session
    }
}

impl Default for MarketClock {
    fn default() -> Self {
        Self {
            zone: Some(chrono_tz::America::New_York),
        }
    }
}

/// Convenience wrapper over [`MarketClock`] for a single check.
pub fn is_market_open(now: DateTime<Utc>, zone_name: &str) -> bool {
    MarketClock::new(zone_name).is_open(now)
}
