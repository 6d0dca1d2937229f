/// Parse a compact duration token like `30s`, `10m`, `2h`, `1d`, `1h30m` or plain seconds.
pub fn parse_duration_seconds(raw: &str) -> Option<u64> {
    let compact: String = raw.chars().filter(|ch| !ch.is_whitespace()).collect();
    if compact.is_empty() {
        return None;
    }

    let bytes = compact.as_bytes();
    let mut cursor = 0;
    let mut total_seconds = 0_u64;
    let mut saw_unit_segment = false;

    while cursor < bytes.len() {
        let number_start = cursor;
        while cursor < bytes.len() && bytes[cursor].is_ascii_digit() {
            cursor += 1;
        }

        if number_start == cursor {
            return None;
        }

        let number = compact[number_start..cursor].parse::<u64>().ok()?;
        if number == 0 {
            return None;
        }

        let multiplier = match bytes.get(cursor).map(|unit| unit.to_ascii_lowercase()) {
            Some(b's') => 1_u64,
            Some(b'm') => 60,
            Some(b'h') => 60 * 60,
            Some(b'd') => 60 * 60 * 24,
            Some(b'w') => 60 * 60 * 24 * 7,
            Some(_) => return None,
            // A bare trailing number is only allowed on its own.
            None if saw_unit_segment => return None,
            None => 1,
        };

        if cursor < bytes.len() {
            cursor += 1;
            saw_unit_segment = true;
        }

        total_seconds = total_seconds.checked_add(number.checked_mul(multiplier)?)?;
    }

    Some(total_seconds)
}

/// Accept a raw id or a `<prefix id>` mention, e.g. `<#123>` or `<@&123>`.
/// Zero is rejected since serenity ids are non-zero.
fn parse_mention_id(raw: &str, prefix: &str) -> Option<u64> {
    let raw = raw.trim();
    let digits = match raw.strip_prefix(prefix) {
        Some(rest) => rest.strip_suffix('>')?,
        None => raw,
    };

    digits.parse::<u64>().ok().filter(|id| *id != 0)
}

pub fn parse_channel_id(raw: &str) -> Option<u64> {
    parse_mention_id(raw, "<#")
}

pub fn parse_role_id(raw: &str) -> Option<u64> {
    parse_mention_id(raw, "<@&")
}

pub fn parse_user_id(raw: &str) -> Option<u64> {
    parse_mention_id(raw, "<@!").or_else(|| parse_mention_id(raw, "<@"))
}

/// Parse `#rrggbb`, `0xrrggbb` or `rrggbb` into a 24-bit color.
pub fn parse_hex_color(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    let digits = raw
        .strip_prefix('#')
        .or_else(|| raw.strip_prefix("0x"))
        .unwrap_or(raw);

    if digits.len() != 6 {
        return None;
    }

    u32::from_str_radix(digits, 16).ok()
}

/// Interpret yes/no style flags.
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        parse_channel_id, parse_duration_seconds, parse_flag, parse_hex_color, parse_role_id,
        parse_user_id,
    };

    #[test]
    fn parses_durations() {
        assert_eq!(parse_duration_seconds("45"), Some(45));
        assert_eq!(parse_duration_seconds("10m"), Some(600));
        assert_eq!(parse_duration_seconds("1h30m"), Some(5400));
        assert_eq!(parse_duration_seconds("1d 2h"), Some(93_600));
        assert_eq!(parse_duration_seconds("2W"), Some(1_209_600));
        assert_eq!(parse_duration_seconds("1h30"), None);
        assert_eq!(parse_duration_seconds("0m"), None);
        assert_eq!(parse_duration_seconds("5x"), None);
        assert_eq!(parse_duration_seconds(""), None);
    }

    #[test]
    fn parses_mentions_and_raw_ids() {
        assert_eq!(parse_channel_id("<#123>"), Some(123));
        assert_eq!(parse_channel_id("123"), Some(123));
        assert_eq!(parse_channel_id("<@123>"), None);
        assert_eq!(parse_role_id(" <@&77> "), Some(77));
        assert_eq!(parse_role_id("<#77>"), None);
        assert_eq!(parse_user_id("<@!5>"), Some(5));
        assert_eq!(parse_user_id("<@5>"), Some(5));
        assert_eq!(parse_user_id("five"), None);
        assert_eq!(parse_user_id("0"), None);
    }

    #[test]
    fn parses_hex_colors() {
        assert_eq!(parse_hex_color("#456dd4"), Some(0x45_6D_D4));
        assert_eq!(parse_hex_color("0xFF0000"), Some(0xFF_00_00));
        assert_eq!(parse_hex_color("00ff00"), Some(0x00_FF_00));
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("zzzzzz"), None);
    }

    #[test]
    fn parses_flags() {
        assert_eq!(parse_flag("Yes"), Some(true));
        assert_eq!(parse_flag("off"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
