//! Class body classification: data properties, computed properties, enumeration members,
//! constructors and methods.

use bitflags::bitflags;
use tracing::debug;
use tree_sitter::Node;

use crate::{
    model::{Class, OverloadBuckets, Property},
    syntax::{named_children, statements, unwrap_decorated},
    walker::Walker,
};

/// Base classes that make a class an enumeration.
const ENUM_BASES: &[&str] = &["Enum", "IntEnum", "Flag", "IntFlag"];

/// Marker comment a binding generator leaves after a constant's declaration.
const VALUE_MARKER: &str = "# value =";

bitflags! {
    /// What a function definition inside a class body is, resolved once from its name and
    /// decorators.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Capabilities: u16 {
        /// The canonical constructor, `__init__`.
        const CONSTRUCTOR = 1 << 0;
        /// `@staticmethod`: no receiver parameter.
        const STATIC_METHOD = 1 << 1;
        /// `@classmethod`.
        const CLASS_METHOD = 1 << 2;
        /// `@property`.
        const PROPERTY_GETTER = 1 << 3;
        /// `@name.setter`.
        const PROPERTY_SETTER = 1 << 4;
        /// `@name.deleter`.
        const PROPERTY_DELETER = 1 << 5;
        /// `@name.getter`, a re-declaration of an existing getter.
        const GETTER_ALIAS = 1 << 6;
        /// `@overload`.
        const OVERLOAD = 1 << 7;
    }
}

impl Capabilities {
    /// Resolve the capabilities of a definition named `name` carrying `decorators`.
    pub fn resolve(walker: &Walker<'_, '_>, name: &str, decorators: &[Node<'_>]) -> Self {
        let mut caps = if name == "__init__" {
            Self::CONSTRUCTOR
        } else {
            Self::empty()
        };
        for decorator in decorators {
            if let Some(name) = decorator_name(walker, *decorator) {
                caps |= Self::from_decorator(name);
            }
        }
        caps
    }

    fn from_decorator(name: &str) -> Self {
        match name {
            "staticmethod" => Self::STATIC_METHOD,
            "classmethod" => Self::CLASS_METHOD,
            "property" => Self::PROPERTY_GETTER,
            "setter" => Self::PROPERTY_SETTER,
            "deleter" => Self::PROPERTY_DELETER,
            "getter" => Self::GETTER_ALIAS,
            "overload" => Self::OVERLOAD,
            _ => Self::empty(),
        }
    }

    /// Setter, deleter and getter re-declarations add nothing to the documented surface.
    pub fn is_accessor(self) -> bool {
        self.intersects(Self::PROPERTY_SETTER | Self::PROPERTY_DELETER | Self::GETTER_ALIAS)
    }
}

/// The last name segment of a decorator expression: `property`, or `setter` for `@x.setter`.
fn decorator_name<'a>(walker: &Walker<'_, 'a>, decorator: Node<'_>) -> Option<&'a str> {
    let expr = named_children(decorator).into_iter().next()?;
    match expr.kind() {
        "identifier" => walker.source().text(expr),
        "attribute" => walker.source().field_text(expr, "attribute"),
        _ => None,
    }
}

fn is_enum_base(base: &str) -> bool {
    let base = base.trim();
    ENUM_BASES
        .iter()
        .any(|name| base == *name || base.strip_suffix(name).is_some_and(|rest| rest.ends_with('.')))
}

/// Build a class from a `class_definition`. Collection wrappers and classes with syntax errors
/// are skipped.
pub fn parse_class(walker: &Walker<'_, '_>, node: Node<'_>) -> Option<Class> {
    let source = walker.source();
    let name = source.field_text(node, "name")?;
    if name.ends_with(walker.config().collection_suffix.as_str()) {
        debug!(class = name, "skipping collection wrapper");
        return None;
    }
    if node.has_error() {
        debug!(class = name, "skipping class with syntax errors");
        return None;
    }

    let is_enum = node.child_by_field_name("superclasses").is_some_and(|bases| {
        named_children(bases)
            .into_iter()
            .filter(|base| base.kind() != "keyword_argument")
            .filter_map(|base| source.text(base))
            .any(is_enum_base)
    });
    let body = node.child_by_field_name("body")?;

    let mut builder = ClassBuilder {
        walker,
        class: Class::new(name, source.docstring(body), is_enum),
        methods: OverloadBuckets::default(),
    };
    let items = statements(body);
    for (idx, item) in items.iter().enumerate() {
        let next_doc = items
            .get(idx + 1)
            .and_then(|next| source.string_statement(*next));
        let (def, decorators) = unwrap_decorated(*item);
        match def.kind() {
            "expression_statement" => builder.assignment(def, next_doc),
            "function_definition" => builder.function(def, &decorators),
            _ => {}
        }
    }
    Some(builder.finish())
}

/// Accumulates one class body.
struct ClassBuilder<'w, 's, 'a> {
    walker: &'w Walker<'s, 'a>,
    class: Class,
    methods: OverloadBuckets,
}

impl ClassBuilder<'_, '_, '_> {
    /// Annotated assignments become properties; plain assignments are enumeration members.
    fn assignment(&mut self, stmt: Node<'_>, next_doc: Option<String>) {
        let Some(assignment) = named_children(stmt)
            .into_iter()
            .find(|child| child.kind() == "assignment")
        else {
            return;
        };

        if let Some(annotation) = assignment.child_by_field_name("type") {
            let Some(target) = assignment.child_by_field_name("left") else {
                return;
            };
            if target.kind() != "identifier" {
                return;
            }
            let Some(name) = self.walker.source().text(target) else {
                return;
            };
            if name.starts_with('_') {
                return;
            }
            let doc = next_doc.or_else(|| self.value_comment(stmt));
            self.class.properties.push(Property {
                name: name.to_string(),
                type_: self.walker.annotation(Some(annotation)),
                doc,
            });
            return;
        }

        if !self.class.is_enum {
            return;
        }
        for name in assignment_targets(self.walker, assignment) {
            if name.starts_with('_') {
                continue;
            }
            self.class.properties.push(Property {
                name: name.to_string(),
                type_: Some(self.class.name.clone()),
                doc: next_doc.clone(),
            });
        }
    }

    /// The literal from a `# value = <literal>` comment on the statement's line, rendered as
    /// inline code. Enumerations never use it.
    fn value_comment(&self, stmt: Node<'_>) -> Option<String> {
        if self.class.is_enum || !self.walker.config().value_comments {
            return None;
        }
        let line = self.walker.source().line_of(stmt)?;
        let (_, value) = line.split_once(VALUE_MARKER)?;
        Some(format!("`{}`", value.trim()))
    }

    fn function(&mut self, def: Node<'_>, decorators: &[Node<'_>]) {
        let source = self.walker.source();
        let Some(name) = source.field_text(def, "name") else {
            return;
        };
        let caps = Capabilities::resolve(self.walker, name, decorators);
        if caps.is_accessor() {
            return;
        }

        if caps.contains(Capabilities::PROPERTY_GETTER) {
            if name.starts_with('_') {
                return;
            }
            self.class.properties.push(Property {
                name: name.to_string(),
                type_: self.walker.annotation(def.child_by_field_name("return_type")),
                doc: def
                    .child_by_field_name("body")
                    .and_then(|body| source.docstring(body)),
            });
            return;
        }

        let drop_first = !caps.contains(Capabilities::STATIC_METHOD);
        let Some(sig) = self.walker.callable(def, drop_first) else {
            return;
        };
        if caps.contains(Capabilities::CONSTRUCTOR) {
            self.class.constructors.push(sig);
        } else if !name.starts_with('_') {
            self.methods.push(sig);
        }
    }

    fn finish(mut self) -> Class {
        self.class.methods = self.methods.into_functions();
        self.class
    }
}

/// Every plain name bound by an assignment, including chained targets (`A = B = 1`).
fn assignment_targets<'a>(walker: &Walker<'_, 'a>, assignment: Node<'_>) -> Vec<&'a str> {
    let mut names = Vec::new();
    let mut current = Some(assignment);
    while let Some(node) = current {
        if node.kind() != "assignment" {
            break;
        }
        if let Some(left) = node.child_by_field_name("left")
            && left.kind() == "identifier"
            && let Some(name) = walker.source().text(left)
        {
            names.push(name);
        }
        current = node.child_by_field_name("right");
    }
    names
}
