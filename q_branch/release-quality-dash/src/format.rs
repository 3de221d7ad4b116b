//! Display string helpers shared by the table, KPIs and chart labels.

use chrono::{DateTime, Utc};

/// Placeholder shown for absent values.
pub const ABSENT: &str = "—";

/// Render a duration as `1h 2m`, `3m 4s` or `5s`.
pub fn fmt_duration(secs: Option<u64>) -> String {
    let Some(secs) = secs else {
        return ABSENT.to_string();
    };
    let h = secs / 3600;
    let m = (secs % 3600) / 60;
    let s = secs % 60;
    if h > 0 {
        format!("{h}h {m}m")
    } else if m > 0 {
        format!("{m}m {s}s")
    } else {
        format!("{s}s")
    }
}

/// Render a timestamp as `05 Mar 2024 10:15` (UTC).
pub fn fmt_date(ts: Option<DateTime<Utc>>) -> String {
    match ts {
        Some(ts) => ts.format("%d %b %Y %H:%M").to_string(),
        None => ABSENT.to_string(),
    }
}

/// First `max` characters of `s`, no ellipsis.
pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Shorten `s` to `keep` characters plus `…` when it is longer than `limit`.
pub fn ellipsize(s: &str, limit: usize, keep: usize) -> String {
    if s.chars().count() > limit {
        let mut out = truncate_chars(s, keep);
        out.push('…');
        out
    } else {
        s.to_string()
    }
}

/// Last `n` characters of `s`.
pub fn tail_chars(s: &str, n: usize) -> String {
    let count = s.chars().count();
    s.chars().skip(count.saturating_sub(n)).collect()
}

/// Render a chart value without a trailing `.0` for whole numbers.
pub fn fmt_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        let s = format!("{value:.2}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_fmt_duration() {
        assert_eq!(fmt_duration(None), "—");
        assert_eq!(fmt_duration(Some(0)), "0s");
        assert_eq!(fmt_duration(Some(59)), "59s");
        assert_eq!(fmt_duration(Some(61)), "1m 1s");
        assert_eq!(fmt_duration(Some(3600)), "1h 0m");
        assert_eq!(fmt_duration(Some(3725)), "1h 2m");
    }

    #[test]
    fn test_fmt_date() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 5, 9, 7, 59).unwrap();
        assert_eq!(fmt_date(Some(ts)), "05 Mar 2024 09:07");
        assert_eq!(fmt_date(None), "—");
    }

    #[test]
    fn test_ellipsize() {
        assert_eq!(ellipsize("short", 10, 9), "short");
        assert_eq!(ellipsize("exactly10!", 10, 9), "exactly10!");
        assert_eq!(ellipsize("eleven-char", 10, 9), "eleven-ch…");
    }

    #[test]
    fn test_char_helpers_respect_unicode() {
        assert_eq!(truncate_chars("héllo wörld", 7), "héllo w");
        assert_eq!(tail_chars("abcdef", 3), "def");
        assert_eq!(tail_chars("ab", 12), "ab");
    }

    #[test]
    fn test_fmt_number() {
        assert_eq!(fmt_number(3.0), "3");
        assert_eq!(fmt_number(2.5), "2.5");
        assert_eq!(fmt_number(1.0 / 3.0), "0.33");
    }
}
