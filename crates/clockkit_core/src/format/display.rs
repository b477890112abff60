//! Time-of-day and duration formatting.

/// Zero-pads to at least two digits.
pub fn pad_zero(value: u64) -> String {
    format!("{value:02}")
}

/// Formats a wall-clock time.
///
/// 12-hour output uses `hh:mm[:ss] AM|PM` with midnight rendered as `12`.
pub fn format_clock_time(
    hour: u32,
    minute: u32,
    second: u32,
    use_24_hour: bool,
    show_seconds: bool,
) -> String {
    let (display_hour, period) = if use_24_hour {
        (hour, None)
    } else {
        (to_12_hour(hour), Some(meridiem(hour)))
    };

    let mut text = format!("{display_hour:02}:{minute:02}");
    if show_seconds {
        text.push_str(&format!(":{second:02}"));
    }
    if let Some(period) = period {
        text.push(' ');
        text.push_str(period);
    }
    text
}

/// Formats an alarm's `hour:minute` for the alarm list.
pub fn format_alarm_time(hour: u32, minute: u32, use_24_hour: bool) -> String {
    format_clock_time(hour, minute, 0, use_24_hour, false)
}

/// Stopwatch display: `MM:SS.cc` (minutes are not capped at 59).
pub fn format_stopwatch_time(elapsed_ms: u64) -> String {
    let total_seconds = elapsed_ms / 1000;
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    let centiseconds = (elapsed_ms % 1000) / 10;
    format!("{minutes:02}:{seconds:02}.{centiseconds:02}")
}

/// Countdown display: `HH:MM:SS`.
pub fn format_timer_display(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

fn to_12_hour(hour: u32) -> u32 {
    match hour % 12 {
        0 => 12,
        other => other,
    }
}

fn meridiem(hour: u32) -> &'static str {
    if hour >= 12 {
        "PM"
    } else {
        "AM"
    }
}

#[cfg(test)]
mod tests {
    use super::{format_clock_time, format_stopwatch_time, format_timer_display, pad_zero};

    #[test]
    fn clock_time_handles_midnight_and_noon_in_12_hour_mode() {
        assert_eq!(format_clock_time(0, 5, 9, false, true), "12:05:09 AM");
        assert_eq!(format_clock_time(12, 0, 0, false, false), "12:00 PM");
        assert_eq!(format_clock_time(23, 59, 1, true, true), "23:59:01");
    }

    #[test]
    fn stopwatch_time_truncates_to_centiseconds() {
        assert_eq!(format_stopwatch_time(0), "00:00.00");
        assert_eq!(format_stopwatch_time(61_239), "01:01.23");
        assert_eq!(format_stopwatch_time(3_600_000), "60:00.00");
    }

    #[test]
    fn timer_display_splits_hours() {
        assert_eq!(format_timer_display(3_725), "01:02:05");
        assert_eq!(pad_zero(7), "07");
    }
}
