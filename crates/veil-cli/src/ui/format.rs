//! String formatting helpers.

/// Human-readable byte count.
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Keep the tail of `text` within `max` characters, prefixing `...` when cut.
pub fn truncate_start(text: &str, max: usize) -> String {
    let count = text.chars().count();
    if count <= max || max <= 3 {
        return text.to_string();
    }
    let tail: String = text.chars().skip(count - (max - 3)).collect();
    format!("...{}", tail)
}

/// Shorten a hex digest to `first8...last8`.
pub fn short_digest(hex: &str) -> String {
    if hex.len() <= 20 || !hex.is_ascii() {
        return hex.to_string();
    }
    format!("{}...{}", &hex[..8], &hex[hex.len() - 8..])
}
