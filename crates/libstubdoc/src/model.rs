//! The extracted API model: classes, modules and their callables.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use tracing::warn;

/// One parameter of a callable, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    /// Parameter name; `*name` for the variadic and `**name` for the keyword-variadic slot.
    pub name: String,
    /// Rendered annotation, if any.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    /// Rendered default value, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl Parameter {
    /// Create a parameter with no type and no default.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_: None,
            default: None,
        }
    }

    /// Attach a rendered annotation.
    pub fn with_type(mut self, type_: Option<String>) -> Self {
        self.type_ = type_;
        self
    }

    /// Attach a rendered default value.
    pub fn with_default(mut self, default: Option<String>) -> Self {
        self.default = default;
        self
    }
}

/// A single declared signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Signature {
    /// Callable name.
    pub name: String,
    /// Parameters in declaration order.
    pub params: Vec<Parameter>,
    /// Rendered return annotation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub returns: Option<String>,
    /// Cleaned docstring.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

impl Signature {
    /// Copy of this signature under a different name.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    /// Copy of this signature with the return type replaced.
    pub fn returning(&self, returns: impl Into<String>) -> Self {
        Self {
            returns: Some(returns.into()),
            ..self.clone()
        }
    }
}

/// Every signature declared under one name, merged into a single documented entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Function {
    /// Declared exactly once.
    Single(Signature),
    /// Declared more than once.
    Overloaded {
        /// First member's parameters and return type, with the group doc.
        primary: Signature,
        /// All members in declaration order.
        members: Vec<Signature>,
    },
}

impl Function {
    /// Merge same-name declarations. The merged entry takes the first member's parameters and
    /// return type, and the first non-empty doc found among the members.
    pub fn from_overloads(members: Vec<Signature>) -> Option<Self> {
        let first = members.first()?;
        let doc = members
            .iter()
            .find_map(|sig| sig.doc.as_ref().filter(|doc| !doc.is_empty()))
            .cloned();
        let primary = Signature {
            name: first.name.clone(),
            params: first.params.clone(),
            returns: first.returns.clone(),
            doc,
        };
        if members.len() == 1 {
            Some(Self::Single(primary))
        } else {
            Some(Self::Overloaded { primary, members })
        }
    }

    /// The merged signature.
    pub fn primary(&self) -> &Signature {
        match self {
            Self::Single(sig) => sig,
            Self::Overloaded { primary, .. } => primary,
        }
    }

    /// Name shared by every member.
    pub fn name(&self) -> &str {
        &self.primary().name
    }

    /// Group documentation.
    pub fn doc(&self) -> Option<&str> {
        self.primary().doc.as_deref()
    }

    /// All declared members when there is more than one.
    pub fn overloads(&self) -> Option<&[Signature]> {
        match self {
            Self::Single(_) => None,
            Self::Overloaded { members, .. } => Some(members),
        }
    }

    /// Copy of this function with `prefix` stripped from the group and member names.
    pub fn strip_prefix(&self, prefix: &str) -> Self {
        let strip = |sig: &Signature| {
            let name = sig.name.strip_prefix(prefix).unwrap_or(&sig.name).to_string();
            sig.renamed(name)
        };
        match self {
            Self::Single(sig) => Self::Single(strip(sig)),
            Self::Overloaded { primary, members } => Self::Overloaded {
                primary: strip(primary),
                members: members.iter().map(strip).collect(),
            },
        }
    }
}

/// Signatures grouped by name, remembering the order in which names were first seen.
#[derive(Debug, Default)]
pub struct OverloadBuckets {
    order: Vec<String>,
    buckets: HashMap<String, Vec<Signature>>,
}

impl OverloadBuckets {
    /// Add a signature to the bucket of its name.
    pub fn push(&mut self, sig: Signature) {
        if !self.buckets.contains_key(&sig.name) {
            self.order.push(sig.name.clone());
        }
        self.buckets.entry(sig.name.clone()).or_default().push(sig);
    }

    /// Merge every bucket, in first-seen order.
    pub fn into_functions(self) -> Vec<Function> {
        let Self { order, mut buckets } = self;
        order
            .into_iter()
            .filter_map(|name| buckets.remove(&name))
            .filter_map(Function::from_overloads)
            .collect()
    }
}

/// A class data member, computed property or enumeration member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Property {
    /// Attribute name as declared.
    pub name: String,
    /// Annotation, or the getter's return annotation.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    /// Cleaned docstring.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

/// A documented class or enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Class {
    /// Bare class name.
    pub name: String,
    /// Cleaned class docstring.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    /// Dotted module the class was declared in; assigned when the file is added to the model.
    pub module: String,
    /// Whether a base class is one of the enumeration bases.
    pub is_enum: bool,
    /// Constructor overloads in declaration order.
    pub constructors: Vec<Signature>,
    /// Data members, properties and enum members, in declaration order.
    pub properties: Vec<Property>,
    /// Public methods, overloads merged.
    pub methods: Vec<Function>,
}

impl Class {
    /// An empty class not yet placed in a module.
    pub fn new(name: impl Into<String>, doc: Option<String>, is_enum: bool) -> Self {
        Self {
            name: name.into(),
            doc,
            module: String::new(),
            is_enum,
            constructors: Vec::new(),
            properties: Vec::new(),
            methods: Vec::new(),
        }
    }
}

/// A module and its free functions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Module {
    /// Last segment of the dotted module path.
    pub name: String,
    /// Module docstring.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    /// Public free functions.
    pub functions: Vec<Function>,
}

/// Everything one declaration file contributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedStub {
    /// Module docstring.
    pub doc: Option<String>,
    /// Top-level classes.
    pub classes: Vec<Class>,
    /// Top-level public functions.
    pub functions: Vec<Function>,
}

/// Two files declared a class with the same name; the later declaration was kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameCollision {
    /// The contested class name.
    pub name: String,
    /// Module of the declaration that was dropped.
    pub replaced_module: String,
    /// Module of the declaration now in the model.
    pub kept_module: String,
}

/// The aggregate model for a whole package run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ApiModel {
    /// Classes keyed by bare name.
    pub classes: BTreeMap<String, Class>,
    /// Modules keyed by dotted path.
    pub modules: BTreeMap<String, Module>,
    /// Class names declared by more than one file.
    pub collisions: Vec<NameCollision>,
}

impl ApiModel {
    /// An empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one parsed file, declared as `module`, into the model.
    pub fn add_stub(&mut self, module: &str, stub: ParsedStub) {
        for mut class in stub.classes {
            class.module = module.to_string();
            self.insert_class(class);
        }
        if !stub.functions.is_empty() {
            let name = module.rsplit('.').next().unwrap_or(module).to_string();
            self.modules.insert(
                module.to_string(),
                Module {
                    name,
                    doc: stub.doc,
                    functions: stub.functions,
                },
            );
        }
    }

    /// Insert a class; a class already registered under the same name is replaced.
    pub fn insert_class(&mut self, class: Class) {
        if let Some(previous) = self.classes.get(&class.name)
            && previous.module != class.module
        {
            warn!(
                class = %class.name,
                replaced = %previous.module,
                kept = %class.module,
                "class declared in more than one module; keeping the later declaration"
            );
            self.collisions.push(NameCollision {
                name: class.name.clone(),
                replaced_module: previous.module.clone(),
                kept_module: class.module.clone(),
            });
        }
        self.classes.insert(class.name.clone(), class);
    }

    /// Enumeration classes sorted by name.
    pub fn enums(&self) -> impl Iterator<Item = &Class> {
        self.classes.values().filter(|class| class.is_enum)
    }

    /// Non-enumeration classes sorted by name.
    pub fn plain_classes(&self) -> impl Iterator<Item = &Class> {
        self.classes.values().filter(|class| !class.is_enum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sig(name: &str, params: &[&str], doc: Option<&str>) -> Signature {
        Signature {
            name: name.to_string(),
            params: params.iter().map(|p| Parameter::new(*p)).collect(),
            returns: None,
            doc: doc.map(str::to_string),
        }
    }

    #[test]
    fn single_declaration_is_not_an_overload_group() {
        let func = Function::from_overloads(vec![sig("f", &["x"], Some("doc"))]).unwrap();
        assert!(func.overloads().is_none());
        assert_eq!(func.doc(), Some("doc"));
    }

    #[test]
    fn merge_takes_first_params_and_first_doc() {
        let func = Function::from_overloads(vec![
            sig("f", &["x"], None),
            sig("f", &["x", "y"], Some("second")),
            sig("f", &["z"], Some("third")),
        ])
        .unwrap();
        let params: Vec<_> = func.primary().params.iter().map(|p| &p.name).collect();
        assert_eq!(params, vec!["x"]);
        assert_eq!(func.doc(), Some("second"));
        assert_eq!(func.overloads().map(<[Signature]>::len), Some(3));
    }

    #[test]
    fn buckets_keep_first_seen_order() {
        let mut buckets = OverloadBuckets::default();
        buckets.push(sig("b", &[], None));
        buckets.push(sig("a", &[], None));
        buckets.push(sig("b", &["x"], None));
        let names: Vec<_> = buckets
            .into_functions()
            .iter()
            .map(|f| f.name().to_string())
            .collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn strip_prefix_renames_members() {
        let func = Function::from_overloads(vec![
            sig("_fx_move", &[], None),
            sig("_fx_move", &["x"], None),
        ])
        .unwrap()
        .strip_prefix("_fx_");
        assert_eq!(func.name(), "move");
        assert!(func.overloads().unwrap().iter().all(|s| s.name == "move"));
    }

    #[test]
    fn later_class_wins_and_collision_is_recorded() {
        let mut model = ApiModel::new();
        model.add_stub(
            "pkg.a",
            ParsedStub {
                classes: vec![Class::new("Thing", Some("first".into()), false)],
                ..ParsedStub::default()
            },
        );
        model.add_stub(
            "pkg.b",
            ParsedStub {
                classes: vec![Class::new("Thing", Some("second".into()), false)],
                ..ParsedStub::default()
            },
        );
        assert_eq!(model.classes["Thing"].doc.as_deref(), Some("second"));
        assert_eq!(model.classes["Thing"].module, "pkg.b");
        assert_eq!(
            model.collisions,
            vec![NameCollision {
                name: "Thing".into(),
                replaced_module: "pkg.a".into(),
                kept_module: "pkg.b".into(),
            }]
        );
    }

    #[test]
    fn modules_are_only_created_for_files_with_functions() {
        let mut model = ApiModel::new();
        model.add_stub("pkg.empty", ParsedStub::default());
        model.add_stub(
            "pkg.math",
            ParsedStub {
                doc: Some("Math helpers.".into()),
                functions: vec![Function::from_overloads(vec![sig("lerp", &[], None)]).unwrap()],
                ..ParsedStub::default()
            },
        );
        assert_eq!(model.modules.keys().collect::<Vec<_>>(), vec!["pkg.math"]);
        assert_eq!(model.modules["pkg.math"].name, "math");
    }
}
