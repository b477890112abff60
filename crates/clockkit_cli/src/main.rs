//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `clockkit_core` linkage.
//! - Print the current time through core formatting for a quick sanity check.

use chrono::{Local, Timelike};
use clockkit_core::format::display::format_clock_time;
use clockkit_core::format::recurrence::repeat_text;
use clockkit_core::AlarmDraft;

fn main() {
    println!("clockkit_core ping={}", clockkit_core::ping());
    println!("clockkit_core version={}", clockkit_core::core_version());

    let now = Local::now();
    println!(
        "clockkit_core now={}",
        format_clock_time(now.hour(), now.minute(), now.second(), true, true)
    );
    let draft = AlarmDraft::for_now(now);
    println!(
        "clockkit_core draft_repeat={}",
        repeat_text(&draft.repeat_days)
    );
}
