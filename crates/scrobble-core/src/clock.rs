use chrono::NaiveTime;

pub const MINUTES_PER_DAY: f64 = 1440.0;

/// Converts minutes since midnight into a clock time.
///
/// Whole hours and minutes are truncated; the fractional minute becomes
/// rounded seconds, carrying into the minute (and hour) when it rounds to 60.
/// Returns `None` for values outside `[0, 1440)` or when rounding would reach
/// midnight of the next day.
pub fn minutes_to_clock(value: f64) -> Option<NaiveTime> {
    if !value.is_finite() || value < 0.0 || value >= MINUTES_PER_DAY {
        return None;
    }

    let hour = (value / 60.0).floor();
    let remainder = value - 60.0 * hour;
    let minute = remainder.floor();
    let second = (60.0 * (remainder - minute)).round();

    let (mut hour, mut minute, mut second) = (hour as u32, minute as u32, second as u32);
    if second >= 60 {
        second -= 60;
        minute += 1;
    }
    if minute >= 60 {
        minute -= 60;
        hour += 1;
    }

    NaiveTime::from_hms_opt(hour, minute, second)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hms(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn whole_minutes_convert_exactly() {
        assert_eq!(minutes_to_clock(0.0), Some(hms(0, 0, 0)));
        assert_eq!(minutes_to_clock(90.0), Some(hms(1, 30, 0)));
        assert_eq!(minutes_to_clock(1439.0), Some(hms(23, 59, 0)));
    }

    #[test]
    fn fractional_minutes_become_seconds() {
        assert_eq!(minutes_to_clock(545.5), Some(hms(9, 5, 30)));
        assert_eq!(minutes_to_clock(60.25), Some(hms(1, 0, 15)));
    }

    #[test]
    fn rounding_carries_into_minute_and_hour() {
        assert_eq!(minutes_to_clock(59.995), Some(hms(1, 0, 0)));
        assert_eq!(minutes_to_clock(10.9999), Some(hms(0, 11, 0)));
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        assert_eq!(minutes_to_clock(-1.0), None);
        assert_eq!(minutes_to_clock(1440.0), None);
        assert_eq!(minutes_to_clock(f64::NAN), None);
        assert_eq!(minutes_to_clock(1439.9999), None);
    }

    #[test]
    fn displays_as_clock_string() {
        let clock = minutes_to_clock(545.0).unwrap();
        assert_eq!(clock.to_string(), "09:05:00");
    }
}
