//! MDX page rendering for classes, function modules and the constants index.

use std::collections::BTreeSet;

use crate::{
    config::Config,
    crosslink::CrossLinker,
    docstring::{escape_outside_code, format_docstring, summary_from_doc},
    frontmatter::Frontmatter,
    model::{ApiModel, Class, Function, Module, Parameter, Signature},
    naming::snake_to_title,
};

/// Signatures with more parameters than this are always laid out one parameter per line.
const MULTILINE_PARAMS: usize = 3;
/// Longest type annotation that still fits on a single-line signature.
const MULTILINE_TYPE_CHARS: usize = 18;
/// Longest parameter list, as `name: type = default` joined by commas, kept on one line.
const MULTILINE_SIG_CHARS: usize = 42;

const CARD_OPEN: &str = r#"<div className="api-card">"#;
const CARD_CLOSE: &str = "</div>";
const TABLE_HEADER: &str = "| Name | Description | Type |";
const TABLE_RULE: &str = "| --- | --- | --- |";

/// Escape a value for use inside a double-quoted JSX attribute.
pub fn escape_attr(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Whether a signature is too long to render on one line.
pub fn should_multiline(params: &[Parameter]) -> bool {
    if params.len() > MULTILINE_PARAMS {
        return true;
    }
    if params
        .iter()
        .filter_map(|p| p.type_.as_deref())
        .any(|ty| ty.chars().count() > MULTILINE_TYPE_CHARS)
    {
        return true;
    }
    let rendered: Vec<String> = params
        .iter()
        .map(|p| {
            let mut out = p.name.clone();
            if let Some(ty) = &p.type_ {
                out.push_str(": ");
                out.push_str(ty);
            }
            if let Some(default) = &p.default {
                out.push_str(" = ");
                out.push_str(default);
            }
            out
        })
        .collect();
    rendered.join(", ").chars().count() > MULTILINE_SIG_CHARS
}

fn params_to_mdx(params: &[Parameter]) -> String {
    let items: Vec<String> = params
        .iter()
        .map(|p| {
            let mut fields = vec![format!(r#"name: "{}""#, escape_attr(&p.name))];
            if let Some(ty) = &p.type_ {
                fields.push(format!(r#"type: "{}""#, escape_attr(ty)));
            }
            if let Some(default) = &p.default {
                fields.push(format!(r#"default: "{}""#, escape_attr(default)));
            }
            format!("{{ {} }}", fields.join(", "))
        })
        .collect();
    format!("[{}]", items.join(", "))
}

/// Render a signature as a self-closing `<ApiSig />` component.
pub fn api_sig(name: &str, sig: &Signature) -> String {
    let mut parts = vec![format!(r#"<ApiSig name="{}""#, escape_attr(name))];
    if should_multiline(&sig.params) {
        parts.push("multiline".to_string());
    }
    if !sig.params.is_empty() {
        parts.push(format!("params={{{}}}", params_to_mdx(&sig.params)));
    }
    if let Some(returns) = sig.returns.as_deref().filter(|r| !r.is_empty()) {
        parts.push(format!(r#"returns="{}""#, escape_attr(returns)));
    }
    format!("{} />", parts.join(" "))
}

/// Join page lines, trimming trailing blank lines down to a single final newline.
fn finish(lines: &[String]) -> String {
    let mut page = lines.join("\n").trim_end().to_string();
    page.push('\n');
    page
}

fn push_all(lines: &mut Vec<String>, items: &[&str]) {
    lines.extend(items.iter().map(|item| item.to_string()));
}

fn non_empty(doc: Option<&str>) -> Option<&str> {
    doc.filter(|doc| !doc.is_empty())
}

/// Append the card (or cards) documenting one overload group.
///
/// When more than one overload carries its own distinct documentation every overload gets its
/// own section; otherwise the signatures are stacked and the group doc is shown once.
fn callable_cards(lines: &mut Vec<String>, func: &Function) {
    let name = func.name();
    let distinct_docs: BTreeSet<&str> = func
        .overloads()
        .unwrap_or_default()
        .iter()
        .filter_map(|sig| non_empty(sig.doc.as_deref()))
        .collect();

    lines.push(CARD_OPEN.to_string());
    match func.overloads() {
        Some(members) if distinct_docs.len() > 1 => {
            for (idx, sig) in members.iter().enumerate() {
                if idx > 0 {
                    push_all(lines, &["", "---", ""]);
                }
                lines.push(api_sig(name, sig));
                if let Some(doc) = non_empty(sig.doc.as_deref()) {
                    lines.push(String::new());
                    lines.push(format_docstring(Some(doc)));
                }
            }
        }
        overloads => {
            match overloads {
                Some(members) => lines.extend(members.iter().map(|sig| api_sig(name, sig))),
                None => lines.push(api_sig(name, func.primary())),
            }
            if let Some(doc) = non_empty(func.doc()) {
                lines.push(String::new());
                lines.push(format_docstring(Some(doc)));
            }
        }
    }
    push_all(lines, &["", CARD_CLOSE, ""]);
}

/// Renders pages for one extracted model.
pub struct Renderer<'m> {
    /// The model being documented.
    model: &'m ApiModel,
    /// Run settings.
    config: &'m Config,
    /// Links type names to class and constant pages.
    linker: CrossLinker<'m>,
}

impl<'m> Renderer<'m> {
    /// A renderer for `model` using the link scheme and enum bases from `config`.
    pub fn new(model: &'m ApiModel, config: &'m Config) -> Self {
        Self {
            model,
            config,
            linker: CrossLinker::new(&model.classes, &config.links),
        }
    }

    /// The page for a non-enumeration class.
    pub fn class_page(&self, class: &Class) -> String {
        let mut frontmatter = Frontmatter::new(
            class.name.as_str(),
            summary_from_doc(
                class.doc.as_deref(),
                &format!("API reference for {}.", class.name),
            ),
        );
        if let Some(note) = self.submodule_note(&class.module) {
            frontmatter = frontmatter.with_note(&note);
        }

        let mut lines = vec![frontmatter.render()];
        self.constructor_section(&mut lines, class);
        self.properties_section(&mut lines, class);
        if !class.methods.is_empty() {
            push_all(&mut lines, &["", "## Methods", "---", ""]);
            for method in &class.methods {
                lines.push(format!("### {}", snake_to_title(method.name())));
                callable_cards(&mut lines, method);
            }
        }
        finish(&lines)
    }

    /// The page for a module of free functions.
    pub fn module_page(&self, module: &Module) -> String {
        let frontmatter = Frontmatter::new(
            snake_to_title(&module.name),
            summary_from_doc(
                module.doc.as_deref(),
                &format!("Functions in {}.", module.name),
            ),
        );
        let mut lines = vec![frontmatter.render()];
        push_all(&mut lines, &["---", ""]);
        for func in &module.functions {
            lines.push(format!("## {}", snake_to_title(func.name())));
            callable_cards(&mut lines, func);
        }
        finish(&lines)
    }

    /// The constants index: one section per enumeration, sorted by name.
    pub fn constants_page(&self) -> String {
        let frontmatter = Frontmatter::new(
            "Constants",
            format!(
                "A comprehensive list of constants used in {}.",
                self.config.package
            ),
        );
        let mut lines = vec![frontmatter.render()];
        for class in self.model.enums() {
            lines.push(format!("## {}", class.name));
            if non_empty(class.doc.as_deref()).is_some() {
                lines.push(escape_outside_code(&summary_from_doc(
                    class.doc.as_deref(),
                    "",
                )));
                lines.push(String::new());
            }
            lines.push(TABLE_HEADER.to_string());
            lines.push(TABLE_RULE.to_string());
            for prop in &class.properties {
                let desc = escape_outside_code(&summary_from_doc(prop.doc.as_deref(), ""));
                lines.push(format!("| `{}` | {desc} | `{}` |", prop.name, class.name));
            }
            lines.push(String::new());
        }
        finish(&lines)
    }

    /// `Access via the 'x' submodule.` for classes declared outside the package root and its
    /// implementation module.
    fn submodule_note(&self, module: &str) -> Option<String> {
        let package = &self.config.package;
        let internal = &self.config.internal_module;
        let sub = module.strip_prefix(package.as_str())?.strip_prefix('.')?;
        let sub = sub
            .replace(&format!("{internal}."), "")
            .replace(internal.as_str(), "");
        let sub = sub.trim_matches('.');
        (!sub.is_empty()).then(|| format!("Access via the '{sub}' submodule."))
    }

    fn constructor_section(&self, lines: &mut Vec<String>, class: &Class) {
        if class.is_enum || class.constructors.is_empty() {
            return;
        }
        lines.push("## Constructor".to_string());
        lines.push(CARD_OPEN.to_string());
        lines.push(String::new());
        for sig in &class.constructors {
            lines.push(format!(
                "- {}",
                api_sig(&class.name, &sig.returning(class.name.as_str()))
            ));
        }

        let doc = non_empty(class.doc.as_deref()).or_else(|| {
            class
                .constructors
                .iter()
                .find_map(|sig| non_empty(sig.doc.as_deref()))
        });
        let summary = summary_from_doc(doc, "");
        if !summary.is_empty() {
            lines.push(String::new());
            lines.push(escape_outside_code(&summary));
        }
        lines.push(CARD_CLOSE.to_string());
    }

    fn properties_section(&self, lines: &mut Vec<String>, class: &Class) {
        if class.properties.is_empty() {
            return;
        }
        push_all(
            lines,
            &[
                "",
                "## Properties",
                "<hr style={{marginBottom: 0}} />",
                "",
                TABLE_HEADER,
                TABLE_RULE,
            ],
        );
        for prop in &class.properties {
            let mut desc = escape_outside_code(&summary_from_doc(prop.doc.as_deref(), ""));
            if desc.is_empty()
                && prop
                    .type_
                    .as_deref()
                    .is_some_and(|ty| ty.contains("ClassVar"))
            {
                desc = "Static constant.".to_string();
            }
            let ty = self.linker.link(prop.type_.as_deref().unwrap_or("Any"));
            lines.push(format!("| `{}` | {desc} | <code>{ty}</code> |", prop.name));
        }
    }
}
