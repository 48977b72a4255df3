/// Clamp a string to `max` characters (Unicode-safe, no ellipsis).
pub fn clamp_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max).collect()
    }
}
