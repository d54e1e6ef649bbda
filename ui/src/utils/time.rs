use jiff::{Timestamp, tz};

/// Format a timestamp in the viewer's timezone.
pub fn format_local(timestamp: Timestamp) -> String {
    timestamp
        .to_zoned(tz::TimeZone::system())
        .strftime("%a, %d %b %Y %H:%M %Z")
        .to_string()
}

/// Coarse age of `timestamp` as seen at `now`. Falls back to a calendar
/// date after a week.
pub fn relative_to(timestamp: Timestamp, now: Timestamp) -> String {
    let seconds = now.as_second() - timestamp.as_second();
    let plural = |n: i64, unit: &str| {
        format!("{n} {unit}{} ago", if n == 1 { "" } else { "s" })
    };

    match seconds {
        ..60 => "just now".to_string(),
        60..3_600 => plural(seconds / 60, "minute"),
        3_600..86_400 => plural(seconds / 3_600, "hour"),
        86_400..604_800 => plural(seconds / 86_400, "day"),
        _ => timestamp.strftime("%b %d, %Y").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(second: i64) -> Timestamp {
        Timestamp::from_second(1_704_067_200 + second).unwrap()
    }

    #[test]
    fn buckets() {
        assert_eq!(relative_to(at(0), at(30)), "just now");
        assert_eq!(relative_to(at(0), at(60)), "1 minute ago");
        assert_eq!(relative_to(at(0), at(7_200)), "2 hours ago");
        assert_eq!(relative_to(at(0), at(86_400 * 3)), "3 days ago");
        assert_eq!(relative_to(at(0), at(86_400 * 30)), "Jan 01, 2024");
    }

    #[test]
    fn future_timestamps_are_just_now() {
        assert_eq!(relative_to(at(100), at(0)), "just now");
    }
}
