//! Small shared helpers: identifiers, clock, titles and timestamp labels

use chrono::{DateTime, Datelike, Duration, Local, SubsecRound, TimeZone, Utc};
use ulid::Ulid;

/// Generate a new identifier for a conversation or message
///
/// ULIDs sort by creation time, which keeps stored records readable.
///
/// # Examples
///
/// ```
/// use chatdesk::helpers::new_id;
///
/// let id = new_id();
/// assert_eq!(id.len(), 26);
/// ```
pub fn new_id() -> String {
    Ulid::new().to_string()
}

/// Current instant truncated to millisecond precision
///
/// Stored timestamps carry milliseconds, so instants are created at that
/// precision and survive a save/load round trip unchanged.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Derive a conversation title from the first user message
///
/// Newlines become spaces and the result is trimmed. Content longer than
/// `max_chars` characters is cut to that many characters, trimmed again and
/// suffixed with `ellipsis`.
///
/// # Examples
///
/// ```
/// use chatdesk::helpers::generate_title;
///
/// assert_eq!(generate_title("  Hello there \n", 30, "..."), "Hello there");
/// assert_eq!(generate_title("abcdefghij", 4, "..."), "abcd...");
/// ```
pub fn generate_title(content: &str, max_chars: usize, ellipsis: &str) -> String {
    let cleaned = content.replace(['\r', '\n'], " ");
    let cleaned = cleaned.trim();

    if cleaned.chars().count() <= max_chars {
        return cleaned.to_string();
    }

    let prefix: String = cleaned.chars().take(max_chars).collect();
    format!("{}{}", prefix.trim(), ellipsis)
}

/// Human-friendly label for a timestamp relative to `now`, in local time
pub fn format_timestamp(instant: DateTime<Utc>, now: DateTime<Utc>) -> String {
    format_timestamp_in(instant, now, &Local)
}

/// Human-friendly label for a timestamp relative to `now` in the given zone
///
/// - under a minute: `Just now`
/// - under an hour: `N min ago`
/// - same calendar day: `HH:MM`
/// - previous calendar day: `Yesterday`
/// - under a week: the weekday name
/// - otherwise: abbreviated month and day, e.g. `May 1`
pub fn format_timestamp_in<Tz: TimeZone>(
    instant: DateTime<Utc>,
    now: DateTime<Utc>,
    tz: &Tz,
) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let diff = now - instant;

    if diff < Duration::minutes(1) {
        return "Just now".to_string();
    }

    if diff < Duration::hours(1) {
        return format!("{} min ago", diff.num_minutes());
    }

    let local = instant.with_timezone(tz);
    let local_now = now.with_timezone(tz);

    if local.date_naive() == local_now.date_naive() {
        return local.format("%H:%M").to_string();
    }

    if local_now
        .date_naive()
        .pred_opt()
        .is_some_and(|yesterday| yesterday == local.date_naive())
    {
        return "Yesterday".to_string();
    }

    if diff < Duration::days(7) {
        return local.format("%A").to_string();
    }

    format!("{} {}", local.format("%b"), local.day())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_new_id_is_unique() {
        assert_ne!(new_id(), new_id());
    }

    #[test]
    fn test_now_has_millisecond_precision() {
        let instant = now();
        assert_eq!(instant.nanosecond() % 1_000_000, 0);
    }

    #[test]
    fn test_generate_title_short_content_is_trimmed() {
        assert_eq!(generate_title("  What is Rust?  ", 30, "..."), "What is Rust?");
    }

    #[test]
    fn test_generate_title_replaces_newlines() {
        assert_eq!(generate_title("line one\nline two", 30, "..."), "line one line two");
    }

    #[test]
    fn test_generate_title_truncates_long_content() {
        let title = generate_title(
            "Explain the borrow checker in detail please",
            30,
            "...",
        );
        assert_eq!(title, "Explain the borrow checker in...");
    }

    #[test]
    fn test_generate_title_exactly_at_limit() {
        let content = "a".repeat(30);
        assert_eq!(generate_title(&content, 30, "..."), content);
    }

    #[test]
    fn test_generate_title_counts_characters_not_bytes() {
        let content = "é".repeat(31);
        let title = generate_title(&content, 30, "…");
        assert_eq!(title, format!("{}…", "é".repeat(30)));
    }

    #[test]
    fn test_format_timestamp_just_now() {
        let now = at(2024, 5, 10, 12, 0);
        assert_eq!(format_timestamp_in(now, now, &Utc), "Just now");
    }

    #[test]
    fn test_format_timestamp_minutes_ago() {
        let now = at(2024, 5, 10, 12, 0);
        let earlier = at(2024, 5, 10, 11, 35);
        assert_eq!(format_timestamp_in(earlier, now, &Utc), "25 min ago");
    }

    #[test]
    fn test_format_timestamp_same_day() {
        let now = at(2024, 5, 10, 18, 0);
        let earlier = at(2024, 5, 10, 9, 5);
        assert_eq!(format_timestamp_in(earlier, now, &Utc), "09:05");
    }

    #[test]
    fn test_format_timestamp_yesterday() {
        let now = at(2024, 5, 10, 12, 0);
        let earlier = at(2024, 5, 9, 8, 0);
        assert_eq!(format_timestamp_in(earlier, now, &Utc), "Yesterday");
    }

    #[test]
    fn test_format_timestamp_weekday() {
        // 2024-05-10 is a Friday; three days earlier is a Tuesday
        let now = at(2024, 5, 10, 12, 0);
        let earlier = at(2024, 5, 7, 12, 0);
        assert_eq!(format_timestamp_in(earlier, now, &Utc), "Tuesday");
    }

    #[test]
    fn test_format_timestamp_older_dates() {
        let now = at(2024, 5, 10, 12, 0);
        let earlier = at(2024, 4, 1, 12, 0);
        assert_eq!(format_timestamp_in(earlier, now, &Utc), "Apr 1");
    }
}
