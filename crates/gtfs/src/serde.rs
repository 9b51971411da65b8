use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

/// `YYYYMMDD` service days.
pub(crate) fn deserialize_yyyymmdd<'de, D>(de: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(de)?;
    NaiveDate::parse_from_str(raw.trim(), "%Y%m%d").map_err(serde::de::Error::custom)
}

/// `HH:MM:SS` (or `H:MM:SS`) measured from noon-minus-12h of the service
/// day, as nanoseconds. Hours beyond 24 are valid next-day times.
pub(crate) fn deserialize_service_time_option<'de, D>(
    de: D,
) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(de)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => parse_service_time(text)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("bad time `{}`", text))),
    }
}

pub(crate) fn parse_service_time(text: &str) -> Option<i64> {
    let mut parts = text.split(':');
    let hours: i64 = parts.next()?.trim().parse().ok()?;
    let minutes: i64 = parts.next()?.trim().parse().ok()?;
    let seconds: i64 = parts.next()?.trim().parse().ok()?;
    if parts.next().is_some()
        || hours < 0
        || !(0..60).contains(&minutes)
        || !(0..60).contains(&seconds)
    {
        return None;
    }
    Some((hours * 3600 + minutes * 60 + seconds) * 1_000_000_000)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_service_times_including_next_day_wraparound() {
        assert_eq!(parse_service_time("00:00:00"), Some(0));
        assert_eq!(
            parse_service_time("8:30:15"),
            Some((8 * 3600 + 30 * 60 + 15) * 1_000_000_000)
        );
        // Past-midnight times stay on the same service day.
        assert_eq!(
            parse_service_time("25:01:00"),
            Some((25 * 3600 + 60) * 1_000_000_000)
        );
    }

    #[test]
    fn rejects_malformed_times() {
        assert_eq!(parse_service_time(""), None);
        assert_eq!(parse_service_time("12:60:00"), None);
        assert_eq!(parse_service_time("12:00"), None);
        assert_eq!(parse_service_time("12:00:00:00"), None);
        assert_eq!(parse_service_time("noon"), None);
    }
}
