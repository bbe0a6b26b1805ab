//! Thin helpers over the tree-sitter Python syntax tree.

use tree_sitter::{Node, Parser, Tree};

use crate::error::{Result, StubdocError};

/// A parsed declaration file and the text it was parsed from.
pub struct SourceFile<'a> {
    text: &'a str,
    lines: Vec<&'a str>,
    tree: Tree,
}

impl<'a> SourceFile<'a> {
    /// Parse `text` as Python. Syntax errors are kept in the tree and handled per declaration.
    pub fn parse(text: &'a str) -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .map_err(|e| StubdocError::Parser(e.to_string()))?;
        let tree = parser
            .parse(text, None)
            .ok_or_else(|| StubdocError::Parser("parser returned no tree".to_string()))?;
        Ok(Self {
            text,
            lines: text.lines().collect(),
            tree,
        })
    }

    /// Root `module` node of the parse tree.
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Source text covered by `node`.
    pub fn text(&self, node: Node<'_>) -> Option<&'a str> {
        node.utf8_text(self.text.as_bytes()).ok()
    }

    /// Text of the field `field` of `node`.
    pub fn field_text(&self, node: Node<'_>, field: &str) -> Option<&'a str> {
        node.child_by_field_name(field).and_then(|n| self.text(n))
    }

    /// The full source line a node starts on.
    pub fn line_of(&self, node: Node<'_>) -> Option<&'a str> {
        self.lines.get(node.start_position().row).copied()
    }

    /// Render an expression as source text with `prefixes` removed. Nodes containing syntax
    /// errors render as `None`.
    pub fn render_expr(&self, node: Option<Node<'_>>, prefixes: &[String]) -> Option<String> {
        let node = node?;
        if node.has_error() {
            return None;
        }
        let mut text = squash_whitespace(self.text(node)?);
        for prefix in prefixes {
            text = text.replace(prefix.as_str(), "");
        }
        Some(text)
    }

    /// The cleaned docstring of a module or a definition body, if its first statement is a
    /// string literal.
    pub fn docstring(&self, body: Node<'_>) -> Option<String> {
        let first = statements(body).into_iter().next()?;
        self.string_statement(first).map(|doc| clean_doc(&doc))
    }

    /// The raw value of a statement that consists of a single string literal.
    pub fn string_statement(&self, node: Node<'_>) -> Option<String> {
        if node.kind() != "expression_statement" {
            return None;
        }
        let children = named_children(node);
        match children.as_slice() {
            [expr] => self.string_value(*expr),
            _ => None,
        }
    }

    /// Evaluate a string literal (or an implicit concatenation of literals).
    fn string_value(&self, node: Node<'_>) -> Option<String> {
        match node.kind() {
            "string" => string_literal_value(self.text(node)?),
            "concatenated_string" => named_children(node)
                .into_iter()
                .map(|part| self.string_value(part))
                .collect(),
            _ => None,
        }
    }
}

/// Named children of `node`, skipping comments and line continuations.
pub fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| !matches!(child.kind(), "comment" | "line_continuation"))
        .collect()
}

/// Statements of a module or block, in source order.
pub fn statements(node: Node<'_>) -> Vec<Node<'_>> {
    named_children(node)
}

/// A definition together with the decorators applied to it.
pub fn unwrap_decorated<'t>(node: Node<'t>) -> (Node<'t>, Vec<Node<'t>>) {
    if node.kind() != "decorated_definition" {
        return (node, Vec::new());
    }
    let decorators = named_children(node)
        .into_iter()
        .filter(|child| child.kind() == "decorator")
        .collect();
    match node.child_by_field_name("definition") {
        Some(definition) => (definition, decorators),
        None => (node, decorators),
    }
}

/// Collapse multi-line expressions onto one line. Bracket spacing left by the join is tightened
/// outside string literals only.
fn squash_whitespace(text: &str) -> String {
    if !text.contains('\n') {
        return text.to_string();
    }
    let joined = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let mut out = String::with_capacity(joined.len());
    let mut code_from = 0;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (idx, c) in joined.char_indices() {
        match quote {
            Some(_) if escaped => escaped = false,
            Some(_) if c == '\\' => escaped = true,
            Some(q) if c == q => {
                out.push_str(&joined[code_from..=idx]);
                code_from = idx + 1;
                quote = None;
            }
            Some(_) => {}
            None if c == '"' || c == '\'' => {
                out.push_str(&tighten_brackets(&joined[code_from..idx]));
                code_from = idx;
                quote = Some(c);
            }
            None => {}
        }
    }
    let rest = &joined[code_from..];
    if quote.is_some() {
        out.push_str(rest);
    } else {
        out.push_str(&tighten_brackets(rest));
    }
    out
}

/// Remove the spaces and trailing commas a line join leaves inside brackets.
fn tighten_brackets(code: &str) -> String {
    code.replace("( ", "(")
        .replace("[ ", "[")
        .replace(",)", ")")
        .replace(",]", "]")
        .replace(", )", ")")
        .replace(", ]", "]")
        .replace(" )", ")")
        .replace(" ]", "]")
}

/// Evaluate the text of a single Python string literal. Bytes literals have no string value.
pub fn string_literal_value(literal: &str) -> Option<String> {
    let quote_at = literal.find(['"', '\''])?;
    let prefix = literal[..quote_at].to_ascii_lowercase();
    if prefix.contains('b') {
        return None;
    }
    let body = &literal[quote_at..];
    let delimiter = if body.starts_with("\"\"\"") || body.starts_with("'''") {
        &body[..3]
    } else {
        &body[..1]
    };
    let inner = body
        .strip_prefix(delimiter)?
        .strip_suffix(delimiter)
        .unwrap_or_else(|| &body[delimiter.len()..]);
    if prefix.contains('r') {
        Some(inner.to_string())
    } else {
        Some(unescape(inner))
    }
}

/// Resolve backslash escapes the way a non-raw Python string literal does.
fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(next) = chars.next() else {
            out.push('\\');
            break;
        };
        match next {
            '\n' => {}
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'a' => out.push('\u{7}'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            'x' | 'u' | 'U' => {
                let width = match next {
                    'x' => 2,
                    'u' => 4,
                    _ => 8,
                };
                let digits: String = chars.clone().take(width).collect();
                match u32::from_str_radix(&digits, 16).ok().and_then(char::from_u32) {
                    Some(decoded) if digits.len() == width => {
                        out.push(decoded);
                        for _ in 0..width {
                            chars.next();
                        }
                    }
                    _ => {
                        out.push('\\');
                        out.push(next);
                    }
                }
            }
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }
    out
}

/// Leading whitespace of `line`, counted in characters.
fn indent_width(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

/// `line` without its first `count` characters.
fn skip_chars(line: &str, count: usize) -> &str {
    line.char_indices()
        .nth(count)
        .map_or("", |(idx, _)| &line[idx..])
}

/// Normalise docstring indentation: the first line loses its leading whitespace, the rest lose
/// their common indent, and blank lines at either end are dropped.
pub fn clean_doc(doc: &str) -> String {
    let expanded = doc.replace('\t', "        ");
    let mut lines: Vec<&str> = expanded.split('\n').collect();
    let margin = lines
        .iter()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(|line| indent_width(line))
        .min()
        .unwrap_or(0);
    let mut cleaned: Vec<String> = Vec::with_capacity(lines.len());
    if let Some(first) = lines.first() {
        cleaned.push(first.trim_start().to_string());
    }
    for line in lines.drain(..).skip(1) {
        let cut = margin.min(indent_width(line));
        cleaned.push(skip_chars(line, cut).trim_end_matches('\r').to_string());
    }
    while cleaned.first().is_some_and(|line| line.trim().is_empty()) {
        cleaned.remove(0);
    }
    while cleaned.last().is_some_and(|line| line.trim().is_empty()) {
        cleaned.pop();
    }
    cleaned.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn literal_values() {
        assert_eq!(string_literal_value(r#""plain""#).as_deref(), Some("plain"));
        assert_eq!(string_literal_value(r#"'single'"#).as_deref(), Some("single"));
        assert_eq!(
            string_literal_value("\"\"\"triple \"quoted\" text\"\"\"").as_deref(),
            Some("triple \"quoted\" text")
        );
        assert_eq!(string_literal_value(r#""a\nb""#).as_deref(), Some("a\nb"));
        assert_eq!(string_literal_value(r#"r"a\nb""#).as_deref(), Some("a\\nb"));
        assert_eq!(string_literal_value(r#""\x41é""#).as_deref(), Some("Aé"));
        assert_eq!(string_literal_value(r#""keep \d""#).as_deref(), Some("keep \\d"));
        assert_eq!(string_literal_value(r#"b"bytes""#), None);
    }

    #[test]
    fn clean_doc_dedents_body_lines() {
        let doc = "Summary line.\n\n    Args:\n        x: The value.\n    ";
        assert_eq!(clean_doc(doc), "Summary line.\n\nArgs:\n    x: The value.");
    }

    #[test]
    fn clean_doc_counts_unicode_indent_in_characters() {
        let doc = "Summary.\n    a\n   \u{a0}b\n\u{3000}     c\n    ";
        assert_eq!(clean_doc(doc), "Summary.\na\nb\n  c");
    }

    #[test]
    fn clean_doc_drops_leading_blank_lines() {
        let doc = "\n    Indented summary.\n    More.\n";
        assert_eq!(clean_doc(doc), "Indented summary.\nMore.");
    }

    #[test]
    fn multiline_expressions_are_squashed() {
        assert_eq!(squash_whitespace("tuple[\n    int,\n    str,\n]"), "tuple[int, str]");
        assert_eq!(squash_whitespace("list[int]"), "list[int]");
    }

    #[test]
    fn squashing_leaves_string_literals_alone() {
        assert_eq!(
            squash_whitespace("Literal[\n    '( x ]',\n    \"a, )\",\n    'it\\'s ]',\n]"),
            "Literal['( x ]', \"a, )\", 'it\\'s ]']"
        );
    }

    #[test]
    fn render_strips_prefixes() {
        let source = SourceFile::parse("x: typing.Optional[_core.Vec2] = None\n").unwrap();
        let stmt = statements(source.root())[0];
        let assignment = named_children(stmt)[0];
        let prefixes = vec!["typing.".to_string(), "_core.".to_string()];
        assert_eq!(
            source.render_expr(assignment.child_by_field_name("type"), &prefixes),
            Some("Optional[Vec2]".to_string())
        );
    }

    #[test]
    fn module_docstring() {
        let source = SourceFile::parse("\"\"\"\n    Module summary.\n\"\"\"\nx = 1\n").unwrap();
        assert_eq!(source.docstring(source.root()).as_deref(), Some("Module summary."));
    }
}
