/// First second of 2015, the epoch Discord snowflakes count from (in ms).
const DISCORD_EPOCH_MS: u64 = 1_420_070_400_000;

/// Creation time of a snowflake (message or interaction id) as fractional
/// Unix seconds, millisecond precision.
pub fn snowflake_unix_secs(snowflake: u64) -> f64 {
    let millis = (snowflake >> 22) + DISCORD_EPOCH_MS;
    millis as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::snowflake_unix_secs;

    #[test]
    fn decodes_snowflake_timestamps() {
        // Discord's documented example snowflake.
        assert_eq!(snowflake_unix_secs(175_928_847_299_117_063), 1_462_015_105.796);
        assert_eq!(snowflake_unix_secs(0), 1_420_070_400.0);
    }
}
