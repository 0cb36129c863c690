/// Formats the elapsed clock the way the header shows it: whole and tenth
/// seconds, e.g. 2300 ms -> "2.3s".
pub fn format_elapsed(ms: u64) -> String {
    format!("{}.{}s", ms / 1000, (ms % 1000) / 100)
}

/// Parses the point-count field. Digits only; empty or malformed input
/// yields None, which disables starting a round.
pub fn parse_count(input: &str) -> Option<u32> {
    if input.is_empty() || !input.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    input.parse().ok()
}
