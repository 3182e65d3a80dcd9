use chrono::{DateTime, TimeDelta, Utc};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Compact signed duration, e.g. `1m 48s`, `-3s`, `2h 05m`.
pub(crate) fn format_delta(delta: TimeDelta) -> String {
    let sign = if delta < TimeDelta::zero() { "-" } else { "" };
    let secs = delta.num_seconds().unsigned_abs();
    let body = if secs >= 3600 {
        format!("{}h {:02}m", secs / 3600, (secs % 3600) / 60)
    } else if secs >= 60 {
        format!("{}m {:02}s", secs / 60, secs % 60)
    } else {
        format!("{secs}s")
    };
    format!("{sign}{body}")
}

pub(crate) fn format_clock(at: DateTime<Utc>) -> String {
    at.format("%H:%M:%S").to_string()
}

pub(crate) fn format_bytes(bytes: usize) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f32 / (1024.0 * 1024.0))
    } else if bytes >= 1024 {
        format!("{:.1} KB", bytes as f32 / 1024.0)
    } else {
        format!("{bytes} B")
    }
}

/// Truncate to at most `max` display columns, ending in `…` when cut.
pub(crate) fn truncate_with_ellipsis(raw: &str, max: usize) -> String {
    if raw.width() <= max {
        return raw.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in raw.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > max - 1 {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_formats() {
        assert_eq!(format_delta(TimeDelta::seconds(9)), "9s");
        assert_eq!(format_delta(TimeDelta::seconds(108)), "1m 48s");
        assert_eq!(format_delta(TimeDelta::seconds(-3)), "-3s");
        assert_eq!(format_delta(TimeDelta::seconds(7500)), "2h 05m");
    }

    #[test]
    fn byte_formats() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
    }

    #[test]
    fn truncation_respects_width() {
        assert_eq!(truncate_with_ellipsis("cam-1", 10), "cam-1");
        assert_eq!(truncate_with_ellipsis("parking-lot-east", 8), "parking…");
        assert_eq!(truncate_with_ellipsis("abc", 0), "");
    }
}
