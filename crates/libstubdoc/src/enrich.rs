//! Backfilling enumeration member docs from sources outside the declaration files.
//!
//! Binding generators often attach member docs only at runtime, so a member with no doc in the
//! stub can still be documented from the loaded package, or from a JSON dump of it.

use std::{collections::HashMap, fs, path::Path};

use serde::Deserialize;
use tracing::debug;

use crate::{error::Result, model::ApiModel};

/// Somewhere enumeration member docs can be looked up.
pub trait MemberDocSource {
    /// Whether `module` defines a class called `class`.
    fn has_class(&self, module: &str, class: &str) -> bool;

    /// The doc of `class.member` in `module`, if it has a non-empty one.
    fn member_doc(&self, module: &str, class: &str, member: &str) -> Option<String>;
}

/// No runtime available: nothing is enriched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRuntime;

impl MemberDocSource for NoRuntime {
    fn has_class(&self, _module: &str, _class: &str) -> bool {
        false
    }

    fn member_doc(&self, _module: &str, _class: &str, _member: &str) -> Option<String> {
        None
    }
}

/// Member docs read from a JSON document shaped `{module: {class: {member: doc}}}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct JsonMemberDocs {
    /// Docs keyed by module, then class, then member.
    docs: HashMap<String, HashMap<String, HashMap<String, String>>>,
}

impl JsonMemberDocs {
    /// Parse a JSON document.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse a JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }
}

impl MemberDocSource for JsonMemberDocs {
    fn has_class(&self, module: &str, class: &str) -> bool {
        self.docs
            .get(module)
            .is_some_and(|classes| classes.contains_key(class))
    }

    fn member_doc(&self, module: &str, class: &str, member: &str) -> Option<String> {
        let doc = self.docs.get(module)?.get(class)?.get(member)?.trim();
        (!doc.is_empty()).then(|| doc.to_string())
    }
}

#[cfg(feature = "python")]
pub use python::PythonRuntime;

#[cfg(feature = "python")]
mod python {
    use pyo3::prelude::*;

    use super::MemberDocSource;
    use crate::error::{Result, StubdocError};

    /// Looks member docs up on the runtime package through an embedded interpreter.
    #[derive(Debug, Clone, Copy)]
    pub struct PythonRuntime;

    impl PythonRuntime {
        /// Start (or attach to) the interpreter.
        pub fn new() -> Result<Self> {
            Python::with_gil(|py| py.import("sys").map(|_| Self))
                .map_err(|e| StubdocError::Runtime(e.to_string()))
        }

        fn class<'py>(py: Python<'py>, module: &str, class: &str) -> PyResult<Bound<'py, PyAny>> {
            py.import(module)?.getattr(class)
        }
    }

    impl MemberDocSource for PythonRuntime {
        fn has_class(&self, module: &str, class: &str) -> bool {
            Python::with_gil(|py| Self::class(py, module, class).is_ok())
        }

        fn member_doc(&self, module: &str, class: &str, member: &str) -> Option<String> {
            Python::with_gil(|py| {
                let cls = Self::class(py, module, class).ok()?;
                let value = cls
                    .getattr("__members__")
                    .and_then(|members| members.get_item(member))
                    .or_else(|_| cls.getattr(member))
                    .ok()?;
                let doc: Option<String> = value.getattr("__doc__").ok()?.extract().ok()?;
                doc.map(|doc| doc.trim().to_string())
                    .filter(|doc| !doc.is_empty())
            })
        }
    }
}

/// Fill in docs of enumeration members that have none. The enum's own module is consulted
/// first, then the package root. Returns the number of members filled.
pub fn enrich_enum_member_docs(
    model: &mut ApiModel,
    package: &str,
    source: &dyn MemberDocSource,
) -> usize {
    let mut filled = 0;
    for class in model.classes.values_mut().filter(|class| class.is_enum) {
        if class.module.is_empty() {
            continue;
        }
        let candidates = [class.module.as_str(), package];
        let Some(module) = candidates
            .into_iter()
            .find(|module| source.has_class(module, &class.name))
        else {
            continue;
        };
        let module = module.to_string();

        for prop in &mut class.properties {
            if prop.doc.as_deref().is_some_and(|doc| !doc.is_empty()) {
                continue;
            }
            if let Some(doc) = source.member_doc(&module, &class.name, &prop.name) {
                prop.doc = Some(doc);
                filled += 1;
            }
        }
    }
    debug!(filled, "enriched enumeration member docs");
    filled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Class, Property};
    use pretty_assertions::assert_eq;

    fn member(name: &str, doc: Option<&str>) -> Property {
        Property {
            name: name.into(),
            type_: Some("Key".into()),
            doc: doc.map(str::to_string),
        }
    }

    fn model() -> ApiModel {
        let mut key = Class::new("Key", None, true);
        key.module = "pkg._core.input".into();
        key.properties = vec![member("A", None), member("B", Some("Kept.")), member("C", None)];
        let mut plain = Class::new("Vec2", None, false);
        plain.module = "pkg._core".into();
        plain.properties = vec![member("x", None)];
        let mut model = ApiModel::new();
        model.insert_class(key);
        model.insert_class(plain);
        model
    }

    #[test]
    fn json_docs_fill_missing_members_only() -> Result<()> {
        let docs = JsonMemberDocs::from_json(
            r#"{"pkg._core.input": {"Key": {"A": "  The A key. ", "B": "Ignored.", "C": " "}}}"#,
        )?;
        let mut model = model();
        assert_eq!(enrich_enum_member_docs(&mut model, "pkg", &docs), 1);
        let docs: Vec<_> = model.classes["Key"]
            .properties
            .iter()
            .map(|p| p.doc.as_deref())
            .collect();
        assert_eq!(docs, vec![Some("The A key."), Some("Kept."), None]);
        Ok(())
    }

    #[test]
    fn package_root_is_the_fallback_module() -> Result<()> {
        let docs = JsonMemberDocs::from_json(r#"{"pkg": {"Key": {"C": "The C key."}}}"#)?;
        let mut model = model();
        assert_eq!(enrich_enum_member_docs(&mut model, "pkg", &docs), 1);
        assert_eq!(
            model.classes["Key"].properties[2].doc.as_deref(),
            Some("The C key.")
        );
        Ok(())
    }

    #[test]
    fn no_runtime_changes_nothing() {
        let mut model = model();
        assert_eq!(enrich_enum_member_docs(&mut model, "pkg", &NoRuntime), 0);
        assert_eq!(model.classes["Key"].properties[0].doc, None);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(JsonMemberDocs::from_json("[1, 2]").is_err());
    }
}
