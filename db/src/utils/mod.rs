use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Publication date buckets offered by the admin question list.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PubDateFilter {
    Today,
    #[serde(rename = "past_7_days")]
    Past7Days,
    ThisMonth,
    ThisYear,
}

impl PubDateFilter {
    /// Half open `[since, until)` range the bucket covers relative to `now`.
    pub fn range(&self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        let today = start_of_day(now);
        let tomorrow = today + Duration::days(1);

        match self {
            PubDateFilter::Today => (today, tomorrow),
            PubDateFilter::Past7Days => (today - Duration::days(7), tomorrow),
            PubDateFilter::ThisMonth => {
                let since = Utc.ymd(now.year(), now.month(), 1).and_hms(0, 0, 0);
                let until = if now.month() == 12 {
                    Utc.ymd(now.year() + 1, 1, 1).and_hms(0, 0, 0)
                } else {
                    Utc.ymd(now.year(), now.month() + 1, 1).and_hms(0, 0, 0)
                };
                (since, until)
            }
            PubDateFilter::ThisYear => (
                Utc.ymd(now.year(), 1, 1).and_hms(0, 0, 0),
                Utc.ymd(now.year() + 1, 1, 1).and_hms(0, 0, 0),
            ),
        }
    }
}

pub fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date().and_hms(0, 0, 0)
}
