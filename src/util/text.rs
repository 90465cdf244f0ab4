// src/util/text.rs

/// First non-empty line of `content`, trimmed and cut to `max_chars` characters.
///
/// A cut line ends in `…`; the ellipsis counts toward the limit.
///
/// # Examples
///
/// ```
/// use notehub::util::text::preview;
///
/// let content = "\n  Buy milk  \nand bread";
/// assert_eq!(preview(content, 80), "Buy milk");
/// assert_eq!(preview("abcdef", 4), "abc…");
/// ```
pub fn preview(content: &str, max_chars: usize) -> String {
    let line = content
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("");

    if line.chars().count() <= max_chars {
        return line.to_string();
    }
    if max_chars == 0 {
        return String::new();
    }
    let mut cut: String = line.chars().take(max_chars - 1).collect();
    cut.truncate(cut.trim_end().len());
    cut.push('…');
    cut
}

/// Whether `content` has more than the line [`preview`] shows.
pub fn is_multiline(content: &str) -> bool {
    content.trim().lines().filter(|l| !l.trim().is_empty()).count() > 1
}
