//! Text helpers: AsciiDoc escaping, anchor ids, paths and snippet extraction.

use regex::Regex;
use std::sync::LazyLock;

/// Characters that may not appear in an AsciiDoc id.
static RE_INVALID_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]+").unwrap());

/// Escapes text so that AsciiDoc renders it literally.
///
/// Characters that open inline formatting, macros, attribute references or
/// table cells are replaced by built-in attribute references or numeric
/// character references. The first character of a typographic replacement
/// (`->`, `=>`, `--`, `...`, `(C)`, `(R)`, `(TM)`) is written as a character
/// reference so the sequence is not turned into a glyph. Plain text passes
/// through unchanged.
pub fn convert_to_asciidoc(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '-' if matches!(chars.peek(), Some('>' | '-')) => out.push_str("&#45;"),
            '=' if chars.peek() == Some(&'>') => out.push_str("&#61;"),
            '.' if chars.clone().take(2).eq(['.', '.']) => out.push_str("&#46;"),
            '(' if starts_replacement(chars.clone()) => out.push_str("&#40;"),
            '*' => out.push_str("{asterisk}"),
            '`' => out.push_str("{backtick}"),
            '^' => out.push_str("{caret}"),
            '~' => out.push_str("{tilde}"),
            '+' => out.push_str("{plus}"),
            '|' => out.push_str("{vbar}"),
            '[' => out.push_str("{startsb}"),
            ']' => out.push_str("{endsb}"),
            '\\' => out.push_str("{backslash}"),
            '<' => out.push_str("{lt}"),
            '_' => out.push_str("&#95;"),
            '#' => out.push_str("&#35;"),
            '{' => out.push_str("&#123;"),
            _ => out.push(c),
        }
    }
    out
}

/// Whether the text after an opening parenthesis reads `C)`, `R)` or `TM)`.
fn starts_replacement(rest: impl Iterator<Item = char>) -> bool {
    let head: String = rest.take(3).collect();
    head.starts_with("C)") || head.starts_with("R)") || head == "TM)"
}

/// Returns a delimiter line of `c` for a block holding `content`.
///
/// The delimiter is four characters long unless `content` has a line made of
/// that character alone; then it is one character longer than the longest
/// such line.
pub fn block_delimiter(content: &str, c: char) -> String {
    let longest = content
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty() && line.chars().all(|x| x == c))
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0);
    c.to_string().repeat(longest.max(3) + 1)
}

/// Returns the last path component of `path`.
pub fn strip_path(path: &str) -> &str {
    match path.rfind(['/', '\\']) {
        Some(pos) => &path[pos + 1..],
        None => path,
    }
}

/// Returns `name` without its extension.
pub fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(pos) if pos > 0 => &name[..pos],
        _ => name,
    }
}

/// Builds the AsciiDoc id for a compound file and an anchor inside it.
///
/// The id is `<file>_1<anchor>`; either part may be empty.
pub fn anchor_id(file: &str, anchor: &str) -> String {
    let file = strip_path(file);
    let raw = match (file.is_empty(), anchor.is_empty()) {
        (false, false) => format!("{}_1{}", file, anchor),
        (false, true) => file.to_string(),
        (true, _) => anchor.to_string(),
    };
    sanitize_id(&raw)
}

/// Replaces characters that are not allowed in an id by `_`.
///
/// Ids must start with a letter or `_`; any other first character gets a
/// `_` prefix.
pub fn sanitize_id(raw: &str) -> String {
    let id = RE_INVALID_ID.replace_all(raw, "_");
    match id.chars().next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => id.into_owned(),
        _ => format!("_{}", id),
    }
}

/// Extracts the text between the first two lines containing `marker`.
///
/// Returns an empty string if the marker does not occur. A marker that
/// occurs only once yields everything after it.
pub fn extract_block(text: &str, marker: &str) -> String {
    if marker.is_empty() {
        return String::new();
    }
    let mut lines = text.split_inclusive('\n');
    if !lines.by_ref().any(|line| line.contains(marker)) {
        return String::new();
    }
    let mut block = String::new();
    for line in lines {
        if line.contains(marker) {
            break;
        }
        block.push_str(line);
    }
    block
}

/// Line number (1-based) of the first line after the opening `marker`.
pub fn line_block(text: &str, marker: &str) -> u32 {
    text.lines()
        .position(|line| !marker.is_empty() && line.contains(marker))
        .map(|pos| pos as u32 + 2)
        .unwrap_or(1)
}

/// Strips the delimiters of a LaTeX formula (`$..$`, `\[..\]`, `\f{..}`).
pub fn strip_formula_delimiters(text: &str) -> &str {
    let t = text.trim();
    if let Some(inner) = t.strip_prefix('$').and_then(|s| s.strip_suffix('$')) {
        return inner.trim();
    }
    if let Some(inner) = t.strip_prefix("\\[").and_then(|s| s.strip_suffix("\\]")) {
        return inner.trim();
    }
    t
}
