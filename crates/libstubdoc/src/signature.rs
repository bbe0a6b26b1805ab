//! Building ordered parameter lists from a callable's raw argument slots.

use std::iter;

use tree_sitter::Node;

use crate::{
    model::Parameter,
    syntax::{SourceFile, named_children},
};

/// A parameter as declared, before defaults are aligned.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawParam {
    /// Bare name, without any `*` or `**` marker.
    pub name: String,
    /// Rendered annotation.
    pub annotation: Option<String>,
}

impl RawParam {
    /// A parameter with no default and no `*` marker.
    pub fn new(name: impl Into<String>, annotation: Option<String>) -> Self {
        Self {
            name: name.into(),
            annotation,
        }
    }
}

/// The four parameter slots of a Python callable.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArgumentList {
    /// Positional (and positional-only) parameters.
    pub positional: Vec<RawParam>,
    /// Defaults of the trailing positional parameters, right-aligned against `positional`.
    pub defaults: Vec<Option<String>>,
    /// The `*args` catch-all.
    pub vararg: Option<RawParam>,
    /// Keyword-only parameters, each with its own optional default.
    pub kwonly: Vec<(RawParam, Option<String>)>,
    /// The `**kwargs` catch-all.
    pub kwarg: Option<RawParam>,
}

impl ArgumentList {
    /// Collect the argument slots from a `parameters` node.
    pub fn from_node(
        source: &SourceFile<'_>,
        node: Node<'_>,
        annotation_prefixes: &[String],
        default_prefixes: &[String],
    ) -> Self {
        let mut args = Self::default();
        let mut keyword_only = false;

        for child in named_children(node) {
            let annotation =
                source.render_expr(child.child_by_field_name("type"), annotation_prefixes);
            let default = child
                .child_by_field_name("value")
                .map(|value| source.render_expr(Some(value), default_prefixes));

            match child.kind() {
                "keyword_separator" => keyword_only = true,
                "positional_separator" => {}
                "list_splat_pattern" | "dictionary_splat_pattern" => {
                    let param = RawParam::new(splat_name(source, child), None);
                    if child.kind() == "list_splat_pattern" {
                        args.vararg = Some(param);
                        keyword_only = true;
                    } else {
                        args.kwarg = Some(param);
                    }
                }
                "typed_parameter" => {
                    let Some(target) = named_children(child).into_iter().next() else {
                        continue;
                    };
                    let param = RawParam::new(splat_name(source, target), annotation);
                    match target.kind() {
                        "list_splat_pattern" => {
                            args.vararg = Some(param);
                            keyword_only = true;
                        }
                        "dictionary_splat_pattern" => args.kwarg = Some(param),
                        _ => args.push(param, None, keyword_only),
                    }
                }
                "default_parameter" | "typed_default_parameter" => {
                    let name = source.field_text(child, "name").unwrap_or_default();
                    args.push(RawParam::new(name, annotation), default, keyword_only);
                }
                "identifier" => {
                    let name = source.text(child).unwrap_or_default();
                    args.push(RawParam::new(name, None), None, keyword_only);
                }
                _ => {}
            }
        }
        args
    }

    /// Record a named parameter. `default` is `Some` when the declaration has a default, even if
    /// that default could not be rendered.
    fn push(&mut self, param: RawParam, default: Option<Option<String>>, keyword_only: bool) {
        if keyword_only {
            self.kwonly.push((param, default.flatten()));
        } else {
            if let Some(default) = default {
                self.defaults.push(default);
            }
            self.positional.push(param);
        }
    }
}

/// Name of a parameter node with any splat markers removed.
fn splat_name(source: &SourceFile<'_>, node: Node<'_>) -> String {
    source
        .text(node)
        .unwrap_or_default()
        .trim_start_matches('*')
        .trim()
        .to_string()
}

/// Build the ordered parameter list for a callable.
///
/// Defaults are right-aligned against the positional parameters; `drop_first` removes the
/// receiver (`self`/`cls`) before alignment. The variadic parameter gains a `*` marker and the
/// keyword-variadic one `**`.
pub fn build_parameters(args: &ArgumentList, drop_first: bool) -> Vec<Parameter> {
    let mut positional: &[RawParam] = &args.positional;
    if drop_first && !positional.is_empty() {
        positional = &positional[1..];
    }

    let pad = positional.len().saturating_sub(args.defaults.len());
    let skip = args.defaults.len().saturating_sub(positional.len());
    let defaults = iter::repeat_n(None, pad).chain(args.defaults.iter().skip(skip).cloned());

    let mut params: Vec<Parameter> = positional
        .iter()
        .zip(defaults)
        .map(|(raw, default)| {
            Parameter::new(raw.name.as_str())
                .with_type(raw.annotation.clone())
                .with_default(default)
        })
        .collect();

    if let Some(vararg) = &args.vararg {
        params.push(
            Parameter::new(format!("*{}", vararg.name)).with_type(vararg.annotation.clone()),
        );
    }
    for (raw, default) in &args.kwonly {
        params.push(
            Parameter::new(raw.name.as_str())
                .with_type(raw.annotation.clone())
                .with_default(default.clone()),
        );
    }
    if let Some(kwarg) = &args.kwarg {
        params.push(
            Parameter::new(format!("**{}", kwarg.name)).with_type(kwarg.annotation.clone()),
        );
    }
    params
}

/// Whether a parameter list carries a binding generator's synthetic placeholder name.
pub fn has_placeholder(params: &[Parameter], placeholder: &str) -> bool {
    params.iter().any(|param| param.name == placeholder)
}
