use crate::policy::MatchResult;
use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};
use std::io::Write;
use std::path::Path;

/// Install the stderr logger at `level`. Records carry their source
/// location. A second call is a no-op.
pub fn init(level: LevelFilter) {
    let config = ConfigBuilder::new()
        .set_location_level(LevelFilter::Error)
        .build();
    let _ = TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto);
}

/// Append a match record to `log_path`.
/// Best-effort: failures are silently ignored (record logging must never block matching).
pub fn log_match(log_path: &Path, candidate: &str, result: &MatchResult) {
    if let Some(dir) = log_path.parent() {
        let _ = std::fs::create_dir_all(dir);
    }

    let Ok(mut file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
    else {
        return;
    };

    let _ = writeln!(file, "{}", format_record(&timestamp_now(), candidate, result));
}

/// One tab-separated line; the candidate is cut to 200 chars with line
/// breaks and tabs blanked out.
fn format_record(ts: &str, candidate: &str, result: &MatchResult) -> String {
    let candidate: String = candidate
        .chars()
        .take(200)
        .map(|c| if matches!(c, '\n' | '\r' | '\t') { ' ' } else { c })
        .collect();
    format!(
        "{ts}\t{decision}\t{candidate}\t{reason}",
        decision = result.as_str(),
        reason = result.reason.replace(['\r', '\n'], "; ").replace('\t', " "),
    )
}

fn timestamp_now() -> String {
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    format_timestamp(secs)
}

/// `YYYY-MM-DDTHH:MM:SSZ` for seconds since the Unix epoch.
fn format_timestamp(secs: u64) -> String {
    let mut days = secs / 86_400;
    let clock = secs % 86_400;

    let mut year = 1970;
    while days >= days_in_year(year) {
        days -= days_in_year(year);
        year += 1;
    }

    let february = if days_in_year(year) == 366 { 29 } else { 28 };
    let month_lengths = [31, february, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
    let mut month = 1;
    for len in month_lengths {
        if days < len {
            break;
        }
        days -= len;
        month += 1;
    }

    format!(
        "{year:04}-{month:02}-{day:02}T{h:02}:{m:02}:{s:02}Z",
        day = days + 1,
        h = clock / 3600,
        m = clock % 3600 / 60,
        s = clock % 60,
    )
}

fn days_in_year(year: u64) -> u64 {
    if (year % 4 == 0 && year % 100 != 0) || year % 400 == 0 {
        366
    } else {
        365
    }
}
