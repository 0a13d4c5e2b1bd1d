/// Length in characters rather than bytes.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Characters that finish a token in the input field.
pub fn is_token_boundary(c: char) -> bool {
    matches!(c, ' ' | '\n' | '\r' | '\u{3000}')
}

/// Turns every line break into a single space so the text fits on one line.
pub fn flatten_lines(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                // \r\n is one break, not two
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                output.push(' ');
            }
            '\n' => output.push(' '),
            _ => output.push(c),
        }
    }
    output
}

/// Keeps at most `max` characters from the end of `text`.
pub fn tail_chars(text: &str, max: usize) -> &str {
    let len = char_len(text);
    if len <= max {
        return text;
    }
    let skip = len - max;
    match text.char_indices().nth(skip) {
        Some((idx, _)) => &text[idx..],
        None => "",
    }
}
