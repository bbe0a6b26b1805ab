//! Rewrites known class names inside rendered type expressions as links to their pages.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{config::LinkScheme, docstring::escape_html, model::Class};

/// Identifier-shaped tokens in a type expression, and character references left by an earlier
/// escaping pass.
static TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?P<entity>&(?:[a-zA-Z]+|#[0-9]+);)|\b[a-zA-Z_][a-zA-Z0-9_]*\b")
        .expect("valid token regex")
});

/// Resolves type names against the classes of one model.
#[derive(Debug, Clone, Copy)]
pub struct CrossLinker<'m> {
    /// Known classes keyed by bare name.
    classes: &'m BTreeMap<String, Class>,
    /// Routes links point at.
    links: &'m LinkScheme,
}

impl<'m> CrossLinker<'m> {
    /// Link against `classes`, building hrefs from `links`.
    pub fn new(classes: &'m BTreeMap<String, Class>, links: &'m LinkScheme) -> Self {
        Self { classes, links }
    }

    /// Link every known class name in `type_expr`. Punctuation is escaped; unknown names and
    /// existing character references are left as they are, so text without known names is
    /// unchanged by a second pass.
    pub fn link(&self, type_expr: &str) -> String {
        let mut out = String::with_capacity(type_expr.len());
        let mut last = 0;
        for caps in TOKEN.captures_iter(type_expr) {
            let Some(token) = caps.get(0) else {
                continue;
            };
            out.push_str(&escape_html(&type_expr[last..token.start()]));
            if caps.name("entity").is_some() {
                out.push_str(token.as_str());
            } else {
                out.push_str(&self.link_name(token.as_str()));
            }
            last = token.end();
        }
        out.push_str(&escape_html(&type_expr[last..]));
        out
    }

    /// A single identifier, linked when it names a known class.
    fn link_name(&self, name: &str) -> String {
        match self.classes.get(name) {
            Some(class) if class.is_enum => {
                format!(r#"<a href="{}">{name}</a>"#, self.links.enum_href(name))
            }
            Some(_) => format!(r#"<a href="{}">{name}</a>"#, self.links.class_href(name)),
            None => name.to_string(),
        }
    }
}
