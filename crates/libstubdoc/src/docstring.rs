//! Docstring reformatting: section-aware lists and markup escaping outside code spans.

use once_cell::sync::Lazy;
use regex::Regex;

/// Section headings recognised inside docstrings.
static HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(Args|Attributes|Methods|Returns|Raises):\s*$").expect("valid heading regex")
});

/// Docstring section the formatter is currently inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    /// `Args`, `Attributes`, `Methods` and `Raises` render `name: description` as list items.
    Terms,
    /// `Returns` renders `type: description` without a bullet.
    Returns,
}

impl Section {
    fn from_title(title: &str) -> Self {
        if title == "Returns" {
            Self::Returns
        } else {
            Self::Terms
        }
    }
}

/// Remove the whitespace prefix shared by every non-blank line. Whitespace-only lines become
/// empty.
pub fn dedent(text: &str) -> String {
    let margin = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| &line[..line.len() - line.trim_start().len()])
        .reduce(common_prefix)
        .unwrap_or("");
    text.split('\n')
        .map(|line| {
            if line.trim().is_empty() {
                ""
            } else {
                line.strip_prefix(margin).unwrap_or(line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let len = a
        .char_indices()
        .zip(b.chars())
        .find(|((_, x), y)| x != y)
        .map_or_else(|| a.len().min(b.len()), |((idx, _), _)| idx);
    &a[..len]
}

/// The first line of a docstring, or `fallback` when there is no text.
pub fn summary_from_doc(doc: Option<&str>, fallback: &str) -> String {
    doc.map(|doc| dedent(doc))
        .and_then(|text| text.trim().lines().next().map(str::to_string))
        .filter(|line| !line.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

/// Escape characters that are significant to MDX.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('{', "&#123;")
        .replace('}', "&#125;")
}

/// Escape `text` everywhere except inside backtick code spans.
///
/// A span opens at a run of backticks and closes at the nearest following run of the same
/// length. When no closing run exists the opener is retried with one backtick fewer; a lone
/// unmatched backtick is ordinary text.
pub fn escape_outside_code(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut plain_from = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'`' {
            i += 1;
            continue;
        }
        let run = bytes[i..].iter().take_while(|b| **b == b'`').count();
        let span_end = (1..=run).rev().find_map(|width| {
            let fence = &text[i..i + width];
            text[i + width..]
                .find(fence)
                .map(|close| i + width + close + width)
        });
        match span_end {
            Some(end) => {
                out.push_str(&escape_html(&text[plain_from..i]));
                out.push_str(&text[i..end]);
                plain_from = end;
                i = end;
            }
            None => i += 1,
        }
    }
    out.push_str(&escape_html(&text[plain_from..]));
    out
}

/// Python's `str.title()`: a letter following a non-letter is upper-cased, any other letter is
/// lower-cased.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

/// Split a `term: description` line. `None` when there is no colon or the term is empty.
fn split_term(stripped: &str, strip_parens: bool) -> Option<(&str, &str)> {
    let (left, right) = stripped.split_once(':')?;
    let term = if strip_parens {
        left.split('(').next().unwrap_or(left)
    } else {
        left
    }
    .trim();
    (!term.is_empty()).then_some((term, right.trim()))
}

/// Reformat a docstring for an API card.
///
/// `Args:`, `Attributes:`, `Methods:` and `Raises:` sections turn `name (type): text` lines into
/// list items; a `Returns:` section turns `type: text` into a plain term line. Everything else
/// is passed through with markup escaped outside code spans.
pub fn format_docstring(doc: Option<&str>) -> String {
    let Some(doc) = doc else {
        return String::new();
    };
    let text = dedent(doc);
    let text = text.trim();
    if text.is_empty() {
        return String::new();
    }

    let mut out: Vec<String> = Vec::new();
    let mut section: Option<Section> = None;

    for line in text.lines() {
        let stripped = line.trim();
        if let Some(caps) = HEADING.captures(stripped) {
            let title = title_case(&caps[1]);
            section = Some(Section::from_title(&title));
            out.push(format!("_**{title}**_"));
            out.push(String::new());
            continue;
        }

        let Some(current) = section else {
            out.push(escape_outside_code(line));
            continue;
        };
        if stripped.is_empty() {
            out.push(String::new());
            continue;
        }
        let item = match current {
            Section::Terms => split_term(stripped, true)
                .map(|(term, desc)| format!("- `{term}` : {}", escape_outside_code(desc))),
            Section::Returns => split_term(stripped, false)
                .map(|(term, desc)| format!("`{term}` : {}", escape_outside_code(desc))),
        };
        match item {
            Some(item) => out.push(item.trim_end().to_string()),
            None => out.push(escape_outside_code(line)),
        }
    }

    out.join("\n").trim().to_string()
}
