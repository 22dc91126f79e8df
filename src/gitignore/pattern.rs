//! Per-segment glob compilation and globstar segment matching

use std::iter::Peekable;
use std::str::Chars;

use glob::Pattern;

/// One slash-free component of a compiled rule.
#[derive(Debug, Clone)]
pub enum Segment {
    /// The bare `**` token: zero or more whole path segments.
    Globstar,
    /// A glob matched against exactly one path segment.
    Glob(Pattern),
}

impl Segment {
    /// Compile one segment of rule text. A segment that is exactly `**`
    /// becomes the globstar token.
    pub fn compile(raw: &str) -> Result<Self, String> {
        if raw == "**" {
            return Ok(Segment::Globstar);
        }
        compile_glob(raw).map(Segment::Glob)
    }
}

/// Compile gitignore glob text into a [`glob::Pattern`].
///
/// The rule dialect escapes with backslashes and accepts `[^...]` for
/// negated classes; `glob` escapes with brackets and negates with `[!...]`,
/// so the text is rewritten before compiling. Runs of unescaped `*`
/// collapse to one `*`.
pub fn compile_glob(raw: &str) -> Result<Pattern, String> {
    let translated = translate(raw)?;
    Pattern::new(&translated).map_err(|e| e.msg.to_string())
}

fn translate(raw: &str) -> Result<String, String> {
    let mut out = String::with_capacity(raw.len() + 4);
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let escaped = chars
                    .next()
                    .ok_or_else(|| "trailing backslash escape".to_string())?;
                out.push_str(&Pattern::escape(&escaped.to_string()));
            }
            '*' => {
                while chars.peek() == Some(&'*') {
                    chars.next();
                }
                out.push('*');
            }
            '[' => translate_class(&mut chars, &mut out)?,
            other => out.push(other),
        }
    }

    Ok(out)
}

/// Rewrite one bracket class, the opening `[` already consumed.
///
/// `glob` has no escapes inside a class, so escaped members are placed where
/// they lose their meaning: `]` first and `-` last. A class holding a single
/// literal character is written as that character.
fn translate_class(chars: &mut Peekable<Chars<'_>>, out: &mut String) -> Result<(), String> {
    let negated = matches!(chars.peek(), Some('!') | Some('^'));
    if negated {
        chars.next();
    }

    let mut close = false;
    let mut dash = false;
    let mut members = String::new();

    // A `]` right after the opening bracket is a class member.
    if chars.peek() == Some(&']') {
        chars.next();
        close = true;
    }

    let mut closed = false;
    while let Some(member) = chars.next() {
        match member {
            ']' => {
                closed = true;
                break;
            }
            '\\' => match chars.next() {
                Some(']') => close = true,
                Some('-') => dash = true,
                Some(escaped) => members.push(escaped),
                None => return Err("trailing backslash escape".to_string()),
            },
            other => members.push(other),
        }
    }
    if !closed {
        return Err("unterminated character class".to_string());
    }

    let literal = match (close, dash, members.chars().count()) {
        (true, false, 0) => Some(']'),
        (false, true, 0) => Some('-'),
        (false, false, 1) => members.chars().next(),
        _ => None,
    };
    if let (false, Some(c)) = (negated, literal) {
        out.push_str(&Pattern::escape(&c.to_string()));
        return Ok(());
    }

    // A leading `!` would read as negation.
    if !negated && !close && members.starts_with('!') {
        members.remove(0);
        members.push('!');
    }

    out.push('[');
    if negated {
        out.push('!');
    }
    if close {
        out.push(']');
    }
    out.push_str(&members);
    if dash {
        out.push('-');
    }
    out.push(']');
    Ok(())
}

/// Match pattern segments against path segments.
///
/// A trailing globstar accepts whatever depth remains; an inner globstar
/// tries every split point of the remaining path.
pub fn matches_segments(pattern: &[Segment], path: &[&str]) -> bool {
    match pattern.split_first() {
        None => path.is_empty(),
        Some((Segment::Globstar, rest)) => {
            if rest.is_empty() {
                return true;
            }
            (0..=path.len()).any(|i| matches_segments(rest, &path[i..]))
        }
        Some((Segment::Glob(glob), rest)) => match path.split_first() {
            Some((head, tail)) => glob.matches(head) && matches_segments(rest, tail),
            None => false,
        },
    }
}

/// Split a slash-separated path, dropping empty components.
pub fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|part| !part.is_empty()).collect()
}
