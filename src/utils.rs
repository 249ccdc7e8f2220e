//! Small shared helpers

/// Expand ~ to home directory in paths
pub fn expand_path(path: &str) -> String {
    if path.starts_with("~/") {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    path.to_string()
}

/// Longest prefix of `text` holding at most `max_chars` characters
pub fn char_prefix(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Lower-cased extension without the leading dot
pub fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_prefix_ascii() {
        assert_eq!(char_prefix("hello world", 5), "hello");
        assert_eq!(char_prefix("hi", 5), "hi");
        assert_eq!(char_prefix("", 3), "");
    }

    #[test]
    fn test_char_prefix_multibyte() {
        // Counts characters, never splits a code point
        assert_eq!(char_prefix("ñandú", 2), "ña");
        assert_eq!(char_prefix("日本語テキスト", 3), "日本語");
    }

    #[test]
    fn test_normalize_extension() {
        assert_eq!(normalize_extension(".PDF"), "pdf");
        assert_eq!(normalize_extension("pptx"), "pptx");
        assert_eq!(normalize_extension(" .Pptx "), "pptx");
    }

    #[test]
    fn test_expand_path_passthrough() {
        assert_eq!(expand_path("/etc/quizgen.toml"), "/etc/quizgen.toml");
    }
}
