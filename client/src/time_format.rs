use std::fmt::Write;

use chrono::{DateTime, Utc};

/// Short relative age for the "updated" readout.
pub fn format_age(updated: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - updated).num_seconds().max(0);
    match secs {
        0..=1 => "just now".to_string(),
        2..=59 => format!("{secs}s ago"),
        60..=3599 => format!("{}m ago", secs / 60),
        _ => {
            let mut out = String::with_capacity(12);
            write_hms(&mut out, secs);
            out.push_str(" ago");
            out
        }
    }
}

/// Wall-clock time of the last update, UTC.
pub fn format_clock(at: DateTime<Utc>) -> String {
    at.format("%H:%M:%S UTC").to_string()
}

fn write_hms(buf: &mut String, total_secs: i64) {
    let secs = total_secs.max(0);
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    let _ = write!(buf, "{hours:02}:{minutes:02}:{seconds:02}");
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn fresh_updates_read_just_now() {
        assert_eq!(format_age(at(100), at(100)), "just now");
        assert_eq!(format_age(at(100), at(101)), "just now");
    }

    #[test]
    fn clock_skew_clamps_to_just_now() {
        assert_eq!(format_age(at(100), at(90)), "just now");
    }

    #[test]
    fn seconds_then_minutes() {
        assert_eq!(format_age(at(0), at(42)), "42s ago");
        assert_eq!(format_age(at(0), at(60)), "1m ago");
        assert_eq!(format_age(at(0), at(3599)), "59m ago");
    }

    #[test]
    fn long_gaps_use_cumulative_hours() {
        assert_eq!(format_age(at(0), at(3661)), "01:01:01 ago");
        assert_eq!(format_age(at(0), at(90061)), "25:01:01 ago");
    }

    #[test]
    fn clock_is_utc() {
        assert_eq!(format_clock(at(3661)), "01:01:01 UTC");
    }
}
