/// Format seconds as `MM:SS`, flooring both parts.
///
/// Flooring keeps the label from ever showing a time past the real
/// duration. Returns `None` for values that have no sensible label (`NaN`
/// before metadata loads, infinities for live streams) so callers can skip
/// the update. Minutes keep growing past 99 rather than rolling into hours.
pub fn format_clock(seconds: f64) -> Option<String> {
    if !seconds.is_finite() {
        return None;
    }
    let total = seconds.max(0.0).floor() as u64;
    let minutes = total / 60;
    let secs = total % 60;
    Some(format!("{minutes:02}:{secs:02}"))
}
