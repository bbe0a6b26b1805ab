//! Extraction settings shared by every stage of the pipeline.

use crate::naming::{camel_to_kebab, constants_anchor};

/// Where generated pages live on the documentation site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkScheme {
    /// Route prefix for per-class pages.
    pub classes_base: String,
    /// Route of the constants index page; enum links are anchors on it.
    pub constants_page: String,
}

impl LinkScheme {
    /// Route of a class page.
    pub fn class_href(&self, name: &str) -> String {
        format!("{}/{}", self.classes_base, camel_to_kebab(name))
    }

    /// Route of an enumeration's section on the constants page.
    pub fn enum_href(&self, name: &str) -> String {
        format!("{}#{}", self.constants_page, constants_anchor(name))
    }
}

impl Default for LinkScheme {
    fn default() -> Self {
        Self {
            classes_base: "/docs/classes".to_string(),
            constants_page: "/docs/manual/constants".to_string(),
        }
    }
}

/// Internal effects functions re-exported as their own documented module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectsConfig {
    /// Name prefix marking an effects function in the internal module.
    pub prefix: String,
    /// Name of the module the stripped functions are published under.
    pub module: String,
    /// Source file whose module docstring documents the effects module.
    pub doc_file: String,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            prefix: "_fx_".to_string(),
            module: "fx".to_string(),
            doc_file: "fx.py".to_string(),
        }
    }
}

/// Configuration for stub extraction and page generation.
#[derive(Debug, Clone)]
pub struct Config {
    /// Importable name of the package being documented.
    pub package: String,
    /// Name of the compiled implementation submodule.
    pub internal_module: String,
    /// Files that are always parsed even though they are not stubs.
    pub extra_modules: Vec<String>,
    /// Effects module extraction, if enabled.
    pub effects: Option<EffectsConfig>,
    /// Parameter name emitted by binding generators when the real name was lost.
    pub placeholder_param: String,
    /// Class name suffix marking internal collection wrappers.
    pub collection_suffix: String,
    /// Whether `# value = <literal>` comments document constants.
    pub value_comments: bool,
    /// Site routes used by cross-links and the type link map.
    pub links: LinkScheme,
}

impl Config {
    /// Create a configuration for `package` with default conventions.
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            internal_module: "_core".to_string(),
            extra_modules: vec!["fx.py".to_string(), "shader_uniform.py".to_string()],
            effects: Some(EffectsConfig::default()),
            placeholder_param: "arg0".to_string(),
            collection_suffix: "List".to_string(),
            value_comments: true,
            links: LinkScheme::default(),
        }
    }

    /// Set the implementation submodule name.
    pub fn with_internal_module(mut self, name: impl Into<String>) -> Self {
        self.internal_module = name.into();
        self
    }

    /// Replace the list of force-included auxiliary files.
    pub fn with_extra_modules(mut self, files: Vec<String>) -> Self {
        self.extra_modules = files;
        self
    }

    /// Enable or disable effects module extraction.
    pub fn with_effects(mut self, effects: Option<EffectsConfig>) -> Self {
        self.effects = effects;
        self
    }

    /// Enable or disable the `# value = ...` comment heuristic.
    pub fn with_value_comments(mut self, enabled: bool) -> Self {
        self.value_comments = enabled;
        self
    }

    /// Override the site link scheme.
    pub fn with_links(mut self, links: LinkScheme) -> Self {
        self.links = links;
        self
    }

    /// Fully qualified name of the implementation submodule.
    pub fn internal_module_path(&self) -> String {
        format!("{}.{}", self.package, self.internal_module)
    }

    /// Prefixes removed from rendered type annotations, in application order.
    pub fn annotation_prefixes(&self) -> Vec<String> {
        let mut prefixes = vec!["typing.".to_string(), "collections.abc.".to_string()];
        prefixes.extend(self.default_prefixes());
        prefixes
    }

    /// Prefixes removed from rendered default values.
    pub fn default_prefixes(&self) -> Vec<String> {
        vec![
            format!("{}.", self.internal_module_path()),
            format!("{}.", self.internal_module),
        ]
    }
}
