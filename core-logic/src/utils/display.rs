/// Shortened wallet address for logs and reports: first 8 chars, ellipsis,
/// last 4. Addresses too short to shorten pass through.
pub fn short_address(address: &str) -> String {
    if address.len() <= 12 {
        return address.to_string();
    }
    format!("{}...{}", &address[..8], &address[address.len() - 4..])
}

/// `HH:MM:SS` rendering of a millisecond countdown remainder.
pub fn format_countdown(ms: u64) -> String {
    let total_seconds = ms / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}
