//! Walks the top level of one declaration file into classes and free functions.

use tracing::debug;
use tree_sitter::Node;

use crate::{
    classify::parse_class,
    config::Config,
    error::Result,
    model::{OverloadBuckets, ParsedStub, Signature},
    signature::{ArgumentList, build_parameters, has_placeholder},
    syntax::{SourceFile, statements, unwrap_decorated},
};

/// Parse one declaration file.
pub fn parse_stub(text: &str, config: &Config) -> Result<ParsedStub> {
    let source = SourceFile::parse(text)?;
    Ok(Walker::new(&source, config).walk())
}

/// Parsing context for a single file.
pub struct Walker<'s, 'a> {
    /// The file being walked.
    source: &'s SourceFile<'a>,
    /// Run settings.
    config: &'s Config,
    /// Qualifiers stripped from annotations.
    annotation_prefixes: Vec<String>,
    /// Qualifiers stripped from default values.
    default_prefixes: Vec<String>,
}

impl<'s, 'a> Walker<'s, 'a> {
    /// A walker over `source`.
    pub fn new(source: &'s SourceFile<'a>, config: &'s Config) -> Self {
        Self {
            source,
            config,
            annotation_prefixes: config.annotation_prefixes(),
            default_prefixes: config.default_prefixes(),
        }
    }

    /// The file being walked.
    pub fn source(&self) -> &'s SourceFile<'a> {
        self.source
    }

    /// Run settings.
    pub fn config(&self) -> &'s Config {
        self.config
    }

    /// Render a type annotation with implementation prefixes removed.
    pub fn annotation(&self, node: Option<Node<'_>>) -> Option<String> {
        self.source.render_expr(node, &self.annotation_prefixes)
    }

    /// Walk the module's top-level statements.
    pub fn walk(&self) -> ParsedStub {
        let root = self.source.root();
        let mut classes = Vec::new();
        let mut buckets = OverloadBuckets::default();

        for stmt in statements(root) {
            let (def, _decorators) = unwrap_decorated(stmt);
            match def.kind() {
                "class_definition" => {
                    if let Some(class) = parse_class(self, def) {
                        classes.push(class);
                    }
                }
                "function_definition" => {
                    if let Some(sig) = self.callable(def, false) {
                        buckets.push(sig);
                    }
                }
                _ => {}
            }
        }

        let functions = buckets
            .into_functions()
            .into_iter()
            .filter(|func| self.is_exported(func.name()))
            .collect();

        ParsedStub {
            doc: self.source.docstring(root),
            classes,
            functions,
        }
    }

    /// Private names stay out of the module listing, except effects functions.
    fn is_exported(&self, name: &str) -> bool {
        if !name.starts_with('_') {
            return true;
        }
        self.config
            .effects
            .as_ref()
            .is_some_and(|effects| name.starts_with(&effects.prefix))
    }

    /// Build the signature of a `function_definition`. Returns `None` for declarations that
    /// cannot be documented: syntax errors, or placeholder parameter names.
    pub fn callable(&self, def: Node<'_>, drop_first: bool) -> Option<Signature> {
        let name = self.source.field_text(def, "name")?;
        if def.has_error() {
            debug!(name, "skipping callable with syntax errors");
            return None;
        }
        let args = ArgumentList::from_node(
            self.source,
            def.child_by_field_name("parameters")?,
            &self.annotation_prefixes,
            &self.default_prefixes,
        );
        let params = build_parameters(&args, drop_first);
        if has_placeholder(&params, &self.config.placeholder_param) {
            debug!(name, "skipping callable with placeholder parameter names");
            return None;
        }

        Some(Signature {
            name: name.to_string(),
            params,
            returns: self.annotation(def.child_by_field_name("return_type")),
            doc: def
                .child_by_field_name("body")
                .and_then(|body| self.source.docstring(body)),
        })
    }
}
