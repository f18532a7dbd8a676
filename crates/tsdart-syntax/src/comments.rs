//! Leading comment scanning.
//!
//! A node's leading comments are the comments in the trivia between its full
//! start and its first token. Comments on the same line as the previous token
//! belong to that token, so collection only starts after the first line break
//! (or immediately, at the start of the file).

#[derive(Clone, Copy)]
enum CommentKind {
    /// `// ...`
    SingleLine,
    /// `/* ... */`
    MultiLine,
}

/// Byte range of one comment in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentRange {
    pub pos: u32,
    pub end: u32,
    pub has_trailing_newline: bool,
}

fn is_line_break(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

fn is_horizontal_space(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\u{000B}' | '\u{000C}' | '\u{00A0}' | '\u{FEFF}')
        || (!ch.is_ascii() && ch.is_whitespace() && !is_line_break(ch))
}

fn char_at(text: &str, pos: usize) -> Option<char> {
    text.get(pos..).and_then(|rest| rest.chars().next())
}

/// Scan the trivia starting at `pos` and return its leading comment ranges.
pub fn leading_comment_ranges(text: &str, pos: usize) -> Vec<CommentRange> {
    let mut ranges = Vec::new();
    let mut pending: Option<CommentRange> = None;
    let mut collecting = pos == 0;
    let mut i = pos;

    if i == 0 && text.starts_with("#!") {
        i = text.find(is_line_break).unwrap_or(text.len());
    }

    while let Some(ch) = char_at(text, i) {
        if is_line_break(ch) {
            i += ch.len_utf8();
            if ch == '\r' && char_at(text, i) == Some('\n') {
                i += 1;
            }
            collecting = true;
            if let Some(comment) = pending.as_mut() {
                comment.has_trailing_newline = true;
            }
            continue;
        }

        if is_horizontal_space(ch) {
            i += ch.len_utf8();
            continue;
        }

        let kind = match (ch, char_at(text, i + 1)) {
            ('/', Some('/')) => CommentKind::SingleLine,
            ('/', Some('*')) => CommentKind::MultiLine,
            _ => break,
        };

        let start = i;
        let mut has_trailing_newline = false;
        i += 2;
        match kind {
            CommentKind::SingleLine => match text[i..].find(is_line_break) {
                Some(offset) => {
                    i += offset;
                    has_trailing_newline = true;
                }
                None => i = text.len(),
            },
            CommentKind::MultiLine => match text[i..].find("*/") {
                Some(offset) => i += offset + 2,
                None => i = text.len(),
            },
        }

        if collecting {
            ranges.extend(pending.take());
            pending = Some(CommentRange {
                pos: start as u32,
                end: i as u32,
                has_trailing_newline,
            });
        }
    }

    ranges.extend(pending);
    ranges
}
