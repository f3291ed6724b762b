// Date formatting with template tokens (`YYYY-MM-DD HH:mm:ss`), day bounds,
// time ranges and calendar differences.
use std::str::FromStr;

use chrono::{
    DateTime, Datelike, FixedOffset, Months, NaiveDate, NaiveDateTime, Offset, TimeZone, Timelike,
    Utc,
};
use serde::Deserialize;
use serde_json::Value;
use shared::models::Record;
use shared::utils::is_truthy;

use crate::config::DateSettings;
use crate::error::{Result, ShapeError};

pub const DATE_YYYY: &str = "YYYY";
pub const DATE_MM: &str = "YYYY-MM";
pub const DATE_DD: &str = "YYYY-MM-DD";
pub const DATE_HH: &str = "YYYY-MM-DD HH";
pub const DATE_MINUTE: &str = "YYYY-MM-DD HH:mm";
pub const DATE_SS: &str = "YYYY-MM-DD HH:mm:ss";

pub const EMPTY_PLACEHOLDER: &str = "--";

const MS_PER_SECOND: i64 = 1_000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;
const MS_PER_WEEK: i64 = 7 * MS_PER_DAY;

const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];
const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday",
];

// Longest tokens first so "YYYY" wins over "YY".
const TOKENS: [&str; 25] = [
    "YYYY", "MMMM", "dddd", "MMM", "ddd", "SSS", "YY", "MM", "DD", "dd", "HH", "hh", "mm", "ss",
    "ZZ", "M", "D", "d", "H", "h", "m", "s", "Z", "A", "a",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffUnit {
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl Default for DiffUnit {
    fn default() -> Self {
        DiffUnit::Day
    }
}

impl FromStr for DiffUnit {
    type Err = ShapeError;

    // Accepts full names, plurals and the short aliases (`M` is month, `m` is minute).
    fn from_str(s: &str) -> Result<Self> {
        let unit = match s {
            "ms" => DiffUnit::Millisecond,
            "s" => DiffUnit::Second,
            "m" => DiffUnit::Minute,
            "h" => DiffUnit::Hour,
            "d" | "D" => DiffUnit::Day,
            "w" => DiffUnit::Week,
            "M" => DiffUnit::Month,
            "Q" => DiffUnit::Quarter,
            "y" => DiffUnit::Year,
            other => match other.to_lowercase().trim_end_matches('s') {
                "millisecond" => DiffUnit::Millisecond,
                "second" => DiffUnit::Second,
                "minute" => DiffUnit::Minute,
                "hour" => DiffUnit::Hour,
                "day" => DiffUnit::Day,
                "week" => DiffUnit::Week,
                "month" => DiffUnit::Month,
                "quarter" => DiffUnit::Quarter,
                "year" => DiffUnit::Year,
                _ => return Err(ShapeError::ConfigError(format!("Unknown time unit '{}'", s))),
            },
        };
        Ok(unit)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormatter {
    offset: FixedOffset,
    placeholder: String,
}

impl Default for DateFormatter {
    fn default() -> Self {
        DateFormatter::new(Utc.fix())
    }
}

impl DateFormatter {
    pub fn new(offset: FixedOffset) -> Self {
        DateFormatter {
            offset,
            placeholder: EMPTY_PLACEHOLDER.to_string(),
        }
    }

    pub fn from_settings(settings: &DateSettings) -> Result<Self> {
        let offset = FixedOffset::east_opt(settings.utc_offset_seconds).ok_or_else(|| {
            ShapeError::ConfigError(format!(
                "UTC offset out of range: {} seconds",
                settings.utc_offset_seconds
            ))
        })?;
        Ok(DateFormatter {
            offset,
            placeholder: settings.empty_placeholder.clone(),
        })
    }

    pub fn display_time(&self, time: &Value, template: &str) -> String {
        self.format_time(time, template)
            .unwrap_or_else(|| self.placeholder.clone())
    }

    // Formats a millisecond timestamp given as a number or numeric text.
    pub fn format_time(&self, time: &Value, template: &str) -> Option<String> {
        if is_empty_date(time) {
            return None;
        }
        let instant = self.from_millis(timestamp_of(time)?)?;
        Some(render(&instant, template))
    }

    pub fn format_date(&self, time: &Value, template: &str) -> Option<String> {
        if is_empty_date(time) {
            return None;
        }
        match self.parse_date(time) {
            Some(instant) => Some(render(&instant, template)),
            None => {
                tracing::warn!(%time, "Unparsable date");
                None
            }
        }
    }

    pub fn start_of_day(&self, time: &Value) -> Option<i64> {
        if is_empty_date(time) {
            return None;
        }
        let instant = self.from_millis(timestamp_of(time)?)?;
        self.day_start(instant.date_naive())
    }

    pub fn end_of_day(&self, time: &Value) -> Option<i64> {
        if is_empty_date(time) {
            return None;
        }
        let instant = self.from_millis(timestamp_of(time)?)?;
        let next = instant.date_naive().succ_opt()?;
        Some(self.day_start(next)? - 1)
    }

    // Turns a `[start, end]` pair into `{start_key: day start, end_key: day end}`.
    // Gives an empty record unless there are exactly two items and the first
    // is set. An empty end is written as `false`.
    pub fn format_time_range(&self, times: &[Value], start_key: &str, end_key: &str) -> Record {
        let mut range = Record::new();
        if times.len() != 2 || !is_truthy(times.first()) {
            return range;
        }
        let bound = |ms: Option<i64>| ms.map(Value::from).unwrap_or(Value::Bool(false));
        range.insert(start_key.to_string(), bound(self.start_of_day(&times[0])));
        range.insert(end_key.to_string(), bound(self.end_of_day(&times[1])));
        range
    }

    // Whole `unit`s from `start` to `end`, truncated toward zero.
    // Month, quarter and year count calendar months anchored on `start`.
    pub fn calculate_between(&self, start: &Value, end: &Value, unit: DiffUnit) -> Option<i64> {
        let start = self.parse_date(start)?;
        let end = self.parse_date(end)?;
        let ms = end.timestamp_millis() - start.timestamp_millis();
        let diff = match unit {
            DiffUnit::Millisecond => ms,
            DiffUnit::Second => ms / MS_PER_SECOND,
            DiffUnit::Minute => ms / MS_PER_MINUTE,
            DiffUnit::Hour => ms / MS_PER_HOUR,
            DiffUnit::Day => ms / MS_PER_DAY,
            DiffUnit::Week => ms / MS_PER_WEEK,
            DiffUnit::Month => month_diff(&start, &end)?,
            DiffUnit::Quarter => month_diff(&start, &end)? / 3,
            DiffUnit::Year => month_diff(&start, &end)? / 12,
        };
        Some(diff)
    }

    fn from_millis(&self, ms: i64) -> Option<DateTime<FixedOffset>> {
        DateTime::from_timestamp_millis(ms).map(|utc| utc.with_timezone(&self.offset))
    }

    fn day_start(&self, date: NaiveDate) -> Option<i64> {
        let midnight = date.and_hms_opt(0, 0, 0)?;
        self.localize(midnight).map(|dt| dt.timestamp_millis())
    }

    fn localize(&self, naive: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
        self.offset.from_local_datetime(&naive).single()
    }

    // Numbers are millisecond timestamps; strings are read as RFC 3339 or as
    // a local date/time in this formatter's offset.
    pub fn parse_date(&self, time: &Value) -> Option<DateTime<FixedOffset>> {
        match time {
            Value::Number(n) => self.from_millis(n.as_f64()?.trunc() as i64),
            Value::String(s) => self.parse_date_str(s.trim()),
            _ => None,
        }
    }

    fn parse_date_str(&self, s: &str) -> Option<DateTime<FixedOffset>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.with_timezone(&self.offset));
        }
        const DATE_TIME_FORMATS: [&str; 6] = [
            "%Y-%m-%d %H:%M:%S%.f",
            "%Y-%m-%dT%H:%M:%S%.f",
            "%Y-%m-%d %H:%M",
            "%Y-%m-%dT%H:%M",
            "%Y/%m/%d %H:%M:%S",
            "%Y/%m/%d %H:%M",
        ];
        for format in DATE_TIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
                return self.localize(naive);
            }
        }
        const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"];
        for format in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(s, format) {
                return self.localize(date.and_hms_opt(0, 0, 0)?);
            }
        }
        // Year and month only.
        let date = NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d").ok()?;
        self.localize(date.and_hms_opt(0, 0, 0)?)
    }
}

fn is_empty_date(time: &Value) -> bool {
    !is_truthy(Some(time)) || time.as_str() == Some("0")
}

fn timestamp_of(time: &Value) -> Option<i64> {
    let ms = match time {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        Value::Bool(b) => f64::from(u8::from(*b)),
        _ => return None,
    };
    ms.is_finite().then(|| ms.trunc() as i64)
}

fn add_months(dt: &DateTime<FixedOffset>, months: i64) -> Option<DateTime<FixedOffset>> {
    let count = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
    if months >= 0 {
        dt.checked_add_months(count)
    } else {
        dt.checked_sub_months(count)
    }
}

fn month_diff(start: &DateTime<FixedOffset>, end: &DateTime<FixedOffset>) -> Option<i64> {
    let mut months = i64::from(end.year() - start.year()) * 12
        + (i64::from(end.month()) - i64::from(start.month()));
    let anchor = add_months(start, months)?;
    if months > 0 && anchor > *end {
        months -= 1;
    } else if months < 0 && anchor < *end {
        months += 1;
    }
    Some(months)
}

pub fn render(instant: &DateTime<FixedOffset>, template: &str) -> String {
    let mut out = String::with_capacity(template.len() + 8);
    let mut rest = template;
    while let Some(c) = rest.chars().next() {
        if c == '[' {
            if let Some(close) = rest.find(']') {
                out.push_str(&rest[1..close]);
                rest = &rest[close + 1..];
                continue;
            }
        }
        match TOKENS.iter().find(|token| rest.starts_with(*token)) {
            Some(token) => {
                out.push_str(&render_token(instant, token));
                rest = &rest[token.len()..];
            }
            None => {
                out.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }
    out
}

fn render_token(dt: &DateTime<FixedOffset>, token: &str) -> String {
    let hour12 = match dt.hour() % 12 {
        0 => 12,
        h => h,
    };
    match token {
        "YYYY" => format!("{:04}", dt.year()),
        "YY" => format!("{:02}", dt.year().rem_euclid(100)),
        "MMMM" => MONTH_NAMES[dt.month0() as usize].to_string(),
        "MMM" => MONTH_NAMES[dt.month0() as usize][..3].to_string(),
        "MM" => format!("{:02}", dt.month()),
        "M" => dt.month().to_string(),
        "DD" => format!("{:02}", dt.day()),
        "D" => dt.day().to_string(),
        "dddd" => WEEKDAY_NAMES[dt.weekday().num_days_from_sunday() as usize].to_string(),
        "ddd" => WEEKDAY_NAMES[dt.weekday().num_days_from_sunday() as usize][..3].to_string(),
        "dd" => WEEKDAY_NAMES[dt.weekday().num_days_from_sunday() as usize][..2].to_string(),
        "d" => dt.weekday().num_days_from_sunday().to_string(),
        "HH" => format!("{:02}", dt.hour()),
        "H" => dt.hour().to_string(),
        "hh" => format!("{:02}", hour12),
        "h" => hour12.to_string(),
        "mm" => format!("{:02}", dt.minute()),
        "m" => dt.minute().to_string(),
        "ss" => format!("{:02}", dt.second()),
        "s" => dt.second().to_string(),
        "SSS" => format!("{:03}", dt.timestamp_subsec_millis()),
        "A" => (if dt.hour() < 12 { "AM" } else { "PM" }).to_string(),
        "a" => (if dt.hour() < 12 { "am" } else { "pm" }).to_string(),
        "Z" => dt.format("%:z").to_string(),
        "ZZ" => dt.format("%z").to_string(),
        other => other.to_string(),
    }
}

pub fn format_time(time: &Value, template: &str) -> Option<String> {
    DateFormatter::default().format_time(time, template)
}

pub fn format_time_or(time: &Value, template: &str, empty: &str) -> String {
    format_time(time, template).unwrap_or_else(|| empty.to_string())
}

pub fn format_date(time: &Value, template: &str) -> Option<String> {
    DateFormatter::default().format_date(time, template)
}

pub fn format_date_or(time: &Value, template: &str, empty: &str) -> String {
    format_date(time, template).unwrap_or_else(|| empty.to_string())
}

pub fn format_yyyy(time: &Value) -> String {
    format_time_or(time, DATE_YYYY, EMPTY_PLACEHOLDER)
}

pub fn format_mm(time: &Value) -> String {
    format_time_or(time, DATE_MM, EMPTY_PLACEHOLDER)
}

pub fn format_dd(time: &Value) -> String {
    format_time_or(time, DATE_DD, EMPTY_PLACEHOLDER)
}

pub fn format_hh(time: &Value) -> String {
    format_time_or(time, DATE_HH, EMPTY_PLACEHOLDER)
}

pub fn format_minute(time: &Value) -> String {
    format_time_or(time, DATE_MINUTE, EMPTY_PLACEHOLDER)
}

pub fn format_ss(time: &Value) -> String {
    format_time_or(time, DATE_SS, EMPTY_PLACEHOLDER)
}

pub fn date_start_of(time: &Value) -> Option<i64> {
    DateFormatter::default().start_of_day(time)
}

pub fn date_end_of(time: &Value) -> Option<i64> {
    DateFormatter::default().end_of_day(time)
}

pub fn format_time_range(times: &[Value]) -> Record {
    DateFormatter::default().format_time_range(times, "createStart", "createEnd")
}

pub fn calculate_between(start: &Value, end: &Value, unit: DiffUnit) -> Option<i64> {
    DateFormatter::default().calculate_between(start, end, unit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // 2024-03-05 14:07:09.045 UTC
    const TS: i64 = 1_709_647_629_045;

    #[test]
    fn test_format_time_templates() {
        let ts = json!(TS);
        assert_eq!(format_time(&ts, DATE_SS).as_deref(), Some("2024-03-05 14:07:09"));
        assert_eq!(format_yyyy(&ts), "2024");
        assert_eq!(format_mm(&ts), "2024-03");
        assert_eq!(format_dd(&ts), "2024-03-05");
        assert_eq!(format_hh(&ts), "2024-03-05 14");
        assert_eq!(format_minute(&ts), "2024-03-05 14:07");
        assert_eq!(format_time(&ts, "D/M/YY h:m:s.SSS A").as_deref(), Some("5/3/24 2:7:9.045 PM"));
    }

    #[test]
    fn test_format_time_accepts_numeric_text() {
        assert_eq!(
            format_time(&json!(TS.to_string()), DATE_DD).as_deref(),
            Some("2024-03-05")
        );
    }

    #[test]
    fn test_format_time_empty_values() {
        assert_eq!(format_ss(&json!(null)), "--");
        assert_eq!(format_ss(&json!("")), "--");
        assert_eq!(format_ss(&json!("0")), "--");
        assert_eq!(format_ss(&json!(0)), "--");
        assert_eq!(format_time_or(&json!("soon"), DATE_DD, "n/a"), "n/a");
    }

    #[test]
    fn test_literal_brackets_and_names() {
        let ts = json!(TS);
        assert_eq!(
            format_time(&ts, "[Day] D [of] MMMM, dddd").as_deref(),
            Some("Day 5 of March, Tuesday")
        );
        assert_eq!(format_time(&ts, "MMM ddd dd d").as_deref(), Some("Mar Tue Tu 2"));
    }

    #[test]
    fn test_offset_formatter() {
        let settings = DateSettings { utc_offset_seconds: 8 * 3600, ..DateSettings::default() };
        let formatter = DateFormatter::from_settings(&settings).unwrap();
        assert_eq!(
            formatter.format_time(&json!(TS), "YYYY-MM-DD HH:mm Z").as_deref(),
            Some("2024-03-05 22:07 +08:00")
        );
        assert_eq!(formatter.display_time(&json!(""), DATE_DD), "--");

        let blank = DateSettings { empty_placeholder: "N/A".into(), ..DateSettings::default() };
        let formatter = DateFormatter::from_settings(&blank).unwrap();
        assert_eq!(formatter.display_time(&json!(null), DATE_DD), "N/A");
        assert_eq!(formatter.display_time(&json!(TS), DATE_DD), "2024-03-05");

        let bad = DateSettings { utc_offset_seconds: 90_000, ..DateSettings::default() };
        assert!(DateFormatter::from_settings(&bad).is_err());
    }

    #[test]
    fn test_format_date_strings() {
        assert_eq!(
            format_date(&json!("2024-03-05 08:30"), "DD/MM/YYYY HH:mm").as_deref(),
            Some("05/03/2024 08:30")
        );
        assert_eq!(format_date(&json!("2024/12/01"), DATE_DD).as_deref(), Some("2024-12-01"));
        assert_eq!(format_date(&json!("2024-07"), DATE_DD).as_deref(), Some("2024-07-01"));
        assert_eq!(
            format_date(&json!("2024-03-05T23:30:00+02:00"), DATE_SS).as_deref(),
            Some("2024-03-05 21:30:00")
        );
        assert_eq!(format_date(&json!(TS), DATE_DD).as_deref(), Some("2024-03-05"));
        assert_eq!(format_date_or(&json!("not a date"), DATE_DD, "-"), "-");
    }

    #[test]
    fn test_day_bounds() {
        let start = date_start_of(&json!(TS)).unwrap();
        let end = date_end_of(&json!(TS)).unwrap();
        assert_eq!(start, 1_709_596_800_000);
        assert_eq!(end, 1_709_596_800_000 + MS_PER_DAY - 1);
        assert_eq!(date_start_of(&json!("")), None);
    }

    #[test]
    fn test_format_time_range() {
        let range = format_time_range(&[json!(TS), json!(TS)]);
        assert_eq!(range["createStart"], json!(1_709_596_800_000_i64));
        assert_eq!(range["createEnd"], json!(1_709_683_199_999_i64));

        let open_end = format_time_range(&[json!(TS), json!("")]);
        assert_eq!(open_end["createEnd"], json!(false));

        assert!(format_time_range(&[json!(TS)]).is_empty());
        assert!(format_time_range(&[json!(""), json!(TS)]).is_empty());

        let custom = DateFormatter::default().format_time_range(&[json!(TS), json!(TS)], "from", "to");
        assert!(custom.contains_key("from") && custom.contains_key("to"));
    }

    #[test]
    fn test_calculate_between_units() {
        let a = json!("2024-01-01");
        let b = json!("2024-03-15 12:00");
        assert_eq!(calculate_between(&a, &b, DiffUnit::Day), Some(74));
        assert_eq!(calculate_between(&a, &b, DiffUnit::Week), Some(10));
        assert_eq!(calculate_between(&a, &b, DiffUnit::Hour), Some(74 * 24 + 12));
        assert_eq!(calculate_between(&b, &a, DiffUnit::Day), Some(-74));
        assert_eq!(calculate_between(&a, &json!("invalid"), DiffUnit::Day), None);
    }

    #[test]
    fn test_calculate_between_months() {
        let start = json!("2024-01-31");
        assert_eq!(calculate_between(&start, &json!("2024-02-29"), DiffUnit::Month), Some(1));
        assert_eq!(calculate_between(&json!("2024-01-15"), &json!("2024-03-14"), DiffUnit::Month), Some(1));
        assert_eq!(calculate_between(&json!("2024-03-15"), &json!("2024-01-20"), DiffUnit::Month), Some(-1));
        assert_eq!(calculate_between(&json!("2023-01-01"), &json!("2024-12-31"), DiffUnit::Quarter), Some(7));
        assert_eq!(calculate_between(&json!("2023-01-01"), &json!("2024-12-31"), DiffUnit::Year), Some(1));
    }

    #[test]
    fn test_diff_unit_parsing() {
        assert_eq!("M".parse::<DiffUnit>().unwrap(), DiffUnit::Month);
        assert_eq!("m".parse::<DiffUnit>().unwrap(), DiffUnit::Minute);
        assert_eq!("days".parse::<DiffUnit>().unwrap(), DiffUnit::Day);
        assert_eq!("Quarter".parse::<DiffUnit>().unwrap(), DiffUnit::Quarter);
        assert!("fortnight".parse::<DiffUnit>().is_err());
        assert_eq!(DiffUnit::default(), DiffUnit::Day);
    }
}
