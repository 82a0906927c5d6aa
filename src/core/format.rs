//! Display helpers used by list templates

/// Truncate `line` to `max_chars` characters, appending `...` when cut
pub fn ellipsis(line: &str, max_chars: usize) -> String {
    if line.chars().count() <= max_chars {
        return line.to_string();
    }
    let cut: String = line.chars().take(max_chars).collect();
    format!("{}...", cut)
}

/// Percent-encode a value for use as one URL component
pub fn escape_url(input: &str) -> String {
    urlencoding::encode(input).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ellipsis_short_line_unchanged() {
        assert_eq!(ellipsis("vol-1", 10), "vol-1");
        assert_eq!(ellipsis("exactly10!", 10), "exactly10!");
    }

    #[test]
    fn test_ellipsis_truncates() {
        assert_eq!(ellipsis("a very long description", 6), "a very...");
    }

    #[test]
    fn test_ellipsis_counts_chars_not_bytes() {
        assert_eq!(ellipsis("déjà vu", 4), "déjà...");
    }

    #[test]
    fn test_escape_url() {
        assert_eq!(escape_url("my volume/1"), "my%20volume%2F1");
        assert_eq!(escape_url("plain"), "plain");
    }
}
