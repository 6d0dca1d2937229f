/// Format seconds into a compact human-readable duration (e.g. 59s, 1m, 1h 30m, 1d 1h).
pub fn format_compact_duration(total_seconds: u64) -> String {
    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;

    let parts: Vec<String> = if days > 0 {
        [(days, 'd'), (hours, 'h')]
            .into_iter()
            .filter(|(value, _)| *value > 0)
            .map(|(value, unit)| format!("{value}{unit}"))
            .collect()
    } else {
        [(hours, 'h'), (minutes, 'm'), (seconds, 's')]
            .into_iter()
            .filter(|(value, _)| *value > 0)
            .map(|(value, unit)| format!("{value}{unit}"))
            .collect()
    };

    if parts.is_empty() {
        "0s".to_owned()
    } else {
        parts.join(" ")
    }
}

/// Break user and role pings in user-supplied text.
pub fn escape_mentions(text: &str) -> String {
    text.replace('@', "@\u{200B}")
}

/// Capitalize the first letter of a command category.
pub fn display_category(category: &str) -> String {
    let mut chars = category.chars();
    match chars.next() {
        Some(first) => format!("{}{}", first.to_uppercase(), chars.as_str()),
        None => String::new(),
    }
}

/// Title-case a permission flag name (`MANAGE_MESSAGES` -> `Manage Messages`).
pub fn permission_display_name(flag: &str) -> String {
    flag.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| display_category(&part.to_ascii_lowercase()))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::{
        display_category, escape_mentions, format_compact_duration, permission_display_name,
    };

    #[test]
    fn compact_duration_formatting() {
        assert_eq!(format_compact_duration(0), "0s");
        assert_eq!(format_compact_duration(59), "59s");
        assert_eq!(format_compact_duration(60), "1m");
        assert_eq!(format_compact_duration(61), "1m 1s");
        assert_eq!(format_compact_duration(3660), "1h 1m");
        assert_eq!(format_compact_duration(3605), "1h 5s");
        assert_eq!(format_compact_duration(86_400), "1d");
        assert_eq!(format_compact_duration(90_060), "1d 1h");
    }

    #[test]
    fn mentions_are_neutralised() {
        assert_eq!(escape_mentions("@everyone hi"), "@\u{200B}everyone hi");
    }

    #[test]
    fn names_are_user_friendly() {
        assert_eq!(display_category("moderation"), "Moderation");
        assert_eq!(display_category(""), "");
        assert_eq!(permission_display_name("MANAGE_MESSAGES"), "Manage Messages");
    }
}
