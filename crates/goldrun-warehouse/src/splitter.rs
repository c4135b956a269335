//! Line-oriented statement splitting.
//!
//! Statements are delimited by `;`. A line comment on the same line as a
//! terminator is dropped with it, and fragments holding nothing but
//! whitespace or line comments are discarded. A `;` inside a `--` comment
//! never terminates a statement. String literals are not tokenized: a `;`
//! inside a quoted literal still splits the statement, and a `--` inside one
//! hides the rest of its line.

/// Split rendered script text into trimmed, non-empty statements in order.
pub fn split_statements(script: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut rest = script;

    loop {
        match find_terminator(rest) {
            Some(position) => {
                push_fragment(&mut statements, &rest[..position]);
                rest = skip_trailing_comments(&rest[position + 1..]);
            }
            None => {
                push_fragment(&mut statements, rest);
                break;
            }
        }
    }

    statements
}

fn push_fragment(statements: &mut Vec<String>, fragment: &str) {
    let trimmed = fragment.trim();
    if !is_blank(trimmed) {
        statements.push(trimmed.to_string());
    }
}

/// Byte offset of the next `;` outside a `--` line comment.
fn find_terminator(text: &str) -> Option<usize> {
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        let code = line.find("--").map_or(line, |start| &line[..start]);
        if let Some(position) = code.find(';') {
            return Some(offset + position);
        }
        offset += line.len();
    }
    None
}

/// Skip a `--` comment on the same line as a terminator.
///
/// Comment lines further down belong to the next statement and stay with it.
fn skip_trailing_comments(text: &str) -> &str {
    let same_line = text.trim_start_matches([' ', '\t']);
    if !same_line.starts_with("--") {
        return text;
    }
    match same_line.find('\n') {
        Some(end) => &same_line[end + 1..],
        None => "",
    }
}

fn is_blank(fragment: &str) -> bool {
    fragment
        .lines()
        .map(str::trim)
        .all(|line| line.is_empty() || line.starts_with("--"))
}
