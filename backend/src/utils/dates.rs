use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

/// Calendar date of `now` as seen in `tz`
pub fn date_in(now: DateTime<Utc>, tz: Tz) -> NaiveDate {
    now.with_timezone(&tz).date_naive()
}

/// Today's date in `tz`. Call once per operation and reuse the value.
pub fn today(tz: Tz) -> NaiveDate {
    date_in(Utc::now(), tz)
}
