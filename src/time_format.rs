/// Formats elapsed seconds as `MM:SS:CC` (minutes, seconds, centiseconds).
///
/// Every component is truncated, never rounded. Minutes keep growing past two
/// digits. The input must be non-negative.
pub fn format_timestamp(seconds: f64) -> String {
    let minutes = (seconds / 60.0) as u64;
    let secs = (seconds % 60.0) as u64;
    let centis = ((seconds % 1.0) * 100.0) as u64;
    format!("{minutes:02}:{secs:02}:{centis:02}")
}
