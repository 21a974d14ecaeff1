//! Light import extraction for JavaScript and TypeScript sources.
//!
//! This is pattern matching over comment-stripped text, not a parser. It
//! finds static, re-export, `require` and dynamic `import()` specifiers,
//! which is all the impact walk needs. Minified forms such as
//! `import{a}from'./x'` are recognised.
//!
//! A `/` starts a regex literal only after an operator or punctuation, so
//! `return /re/` is read as division. The literal then runs to the end of
//! its line, which can only hide comments, never imports.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

fn patterns() -> &'static [Regex; 4] {
    static PATTERNS: OnceLock<[Regex; 4]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            // import x from 'm' / import {a, b} from 'm' / import 'm'
            r#"\bimport\b\s*(?:type\b\s*)?(?:[\w*${}\s,]+?\s*from\s*)?['"]([^'"\n]+)['"]"#,
            // export * from 'm' / export {a} from 'm'
            r#"\bexport\b\s*(?:type\b\s*)?(?:\*(?:\s*as\s+[\w$]+)?|\{[^}]*\})\s*from\s*['"]([^'"\n]+)['"]"#,
            r#"\brequire\s*\(\s*['"]([^'"\n]+)['"]\s*\)"#,
            r#"\bimport\s*\(\s*['"]([^'"\n]+)['"]\s*\)"#,
        ]
        .map(|p| Regex::new(p).expect("import pattern is valid"))
    })
}

/// Returns the module specifiers imported by `source`, deduplicated, in
/// order of first appearance.
#[must_use]
pub fn imports(source: &str) -> Vec<String> {
    let text = strip_comments(source);
    let mut found: Vec<(usize, &str)> = patterns()
        .iter()
        .flat_map(|re| re.captures_iter(&text))
        .filter_map(|caps| caps.get(1))
        .map(|m| (m.start(), m.as_str()))
        .collect();
    found.sort_by_key(|(pos, _)| *pos);

    let mut seen = HashSet::new();
    found
        .into_iter()
        .map(|(_, spec)| spec.trim())
        .filter(|spec| !spec.is_empty() && seen.insert(*spec))
        .map(String::from)
        .collect()
}

/// Replaces `//` and `/* */` comments with whitespace, leaving string and
/// regex literals intact. Line breaks are kept so positions stay
/// line-aligned.
fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    let mut quote: Option<char> = None;
    // Last significant character outside comments.
    let mut last: Option<char> = None;

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            out.push(c);
            if c == '\\' {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            } else if c == q || (c == '\n' && q != '`') {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' | '`' => {
                quote = Some(c);
                last = Some(c);
                out.push(c);
            }
            '/' if chars.peek() == Some(&'/') => {
                for n in chars.by_ref() {
                    if n == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for n in chars.by_ref() {
                    if n == '\n' {
                        out.push('\n');
                    }
                    if prev == '*' && n == '/' {
                        break;
                    }
                    prev = n;
                }
                out.push(' ');
            }
            '/' if regex_can_start(last) => {
                out.push(c);
                copy_regex_literal(&mut chars, &mut out);
                last = Some('/');
            }
            _ => {
                out.push(c);
                if !c.is_whitespace() {
                    last = Some(c);
                }
            }
        }
    }
    out
}

/// Whether a `/` after `last` opens a regex literal rather than dividing.
fn regex_can_start(last: Option<char>) -> bool {
    match last {
        None => true,
        Some(c) => "(,=:[!&|?{};+-*%<>~^".contains(c),
    }
}

/// Copies the body of a regex literal up to its closing `/` (outside a
/// character class) or the end of the line.
fn copy_regex_literal(chars: &mut std::iter::Peekable<std::str::Chars<'_>>, out: &mut String) {
    let mut in_class = false;
    while let Some(n) = chars.next() {
        out.push(n);
        match n {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            }
            '[' => in_class = true,
            ']' => in_class = false,
            '/' if !in_class => break,
            '\n' => break,
            _ => {}
        }
    }
}
