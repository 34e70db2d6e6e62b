use unicode_width::UnicodeWidthStr;

/// Terminal display width of `text`; wide (CJK) characters count as two.
pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Pad `text` with spaces up to `width` display columns.
pub fn pad_to(text: &str, width: usize) -> String {
    let mut padded = String::with_capacity(text.len() + width);
    padded.push_str(text);
    for _ in display_width(text)..width {
        padded.push(' ');
    }
    padded
}
