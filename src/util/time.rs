use chrono::{DateTime, Datelike, Local, Timelike};

use crate::config::MonthsLanguage;

/// Get the current time in seconds since the UNIX epoch
#[cfg(not(target_arch = "wasm32"))]
pub fn current_time_secs() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}

/// Get the current time in seconds since the UNIX epoch
#[cfg(target_arch = "wasm32")]
pub fn current_time_secs() -> f64 {
    web_sys::window()
        .and_then(|window| window.performance())
        .map(|perf| (perf.time_origin() + perf.now()) / 1000.0)
        .unwrap_or(0.0)
}

/// Get a timestamp in seconds since the UNIX epoch
pub fn timestamp_secs() -> u64 {
    current_time_secs() as u64
}

/// Local date and time of a timestamp, e.g. `3 March 2025, 14:05`
pub fn format_timestamp(secs: u64, language: MonthsLanguage) -> String {
    let Some(utc) = DateTime::from_timestamp(secs as i64, 0) else {
        return secs.to_string();
    };
    let local = utc.with_timezone(&Local);
    format!(
        "{} {} {}, {:02}:{:02}",
        local.day(),
        language.month_name(local.month()),
        local.year(),
        local.hour(),
        local.minute()
    )
}
