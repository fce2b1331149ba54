/// Utilities for date, time and duration formatting
use chrono::{DateTime, Utc};

/// Timestamp as DD.MM.YYYY HH:MM:SS
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.format("%d.%m.%Y %H:%M:%S").to_string()
}

/// Duration badge text: "850ms" below one second, "1.25s" otherwise
pub fn format_loading_time(ms: f64) -> String {
    if ms < 1000.0 {
        format!("{:.0}ms", ms)
    } else {
        format!("{:.2}s", ms / 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_timestamp() {
        let at = Utc.with_ymd_and_hms(2024, 3, 15, 14, 2, 26).unwrap();
        assert_eq!(format_timestamp(&at), "15.03.2024 14:02:26");
    }

    #[test]
    fn test_format_loading_time() {
        assert_eq!(format_loading_time(0.0), "0ms");
        assert_eq!(format_loading_time(850.4), "850ms");
        assert_eq!(format_loading_time(999.0), "999ms");
        assert_eq!(format_loading_time(1000.0), "1.00s");
        assert_eq!(format_loading_time(1250.0), "1.25s");
    }
}
