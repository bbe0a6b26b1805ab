#![allow(dead_code)]

use std::{fs, path::Path};

use libstubdoc::{ApiModel, Config, Renderer, docstring::dedent, parse_stub};
use pretty_assertions::assert_eq;

/// Package name used by every fixture.
pub const PACKAGE: &str = "pkg";
/// Module that fixtures declare their classes in unless stated otherwise.
pub const CORE: &str = "pkg._core";

/// Strip the indentation a fixture picks up from being written inside a test.
pub fn source(text: &str) -> String {
    format!("{}\n", dedent(text).trim())
}

pub fn config() -> Config {
    Config::new(PACKAGE)
}

/// Build a model from `(module, source)` pairs, folded in order.
pub fn model_of(files: &[(&str, &str)]) -> ApiModel {
    let config = config();
    let mut model = ApiModel::new();
    for (module, text) in files {
        let stub = parse_stub(&source(text), &config).expect("fixture should parse");
        model.add_stub(module, stub);
    }
    model
}

/// Build a model from one file declared as the implementation module.
pub fn model(text: &str) -> ApiModel {
    model_of(&[(CORE, text)])
}

pub fn class_page(text: &str, class: &str) -> String {
    let model = model(text);
    let config = config();
    let class = model
        .classes
        .get(class)
        .unwrap_or_else(|| panic!("class {class} not found"));
    Renderer::new(&model, &config).class_page(class)
}

pub fn module_page(text: &str, module: &str) -> String {
    let model = model_of(&[(module, text)]);
    let config = config();
    let module = model
        .modules
        .get(module)
        .unwrap_or_else(|| panic!("module {module} not found"));
    Renderer::new(&model, &config).module_page(module)
}

pub fn constants_page(text: &str) -> String {
    let model = model(text);
    let config = config();
    Renderer::new(&model, &config).constants_page()
}

pub fn assert_class_page(input: &str, class: &str, expected: &str) {
    assert_eq!(class_page(input, class), source(expected));
}

pub fn assert_module_page(input: &str, module: &str, expected: &str) {
    assert_eq!(module_page(input, module), source(expected));
}

pub fn assert_constants_page(input: &str, expected: &str) {
    assert_eq!(constants_page(input), source(expected));
}

/// Write `text` to `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, text: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create fixture directory");
    }
    fs::write(path, source(text)).expect("write fixture file");
}

#[macro_export]
macro_rules! gen_tests {
    ($prefix:ident, {
        $(class_page {
            $class_name:ident: {
                input: $class_input:expr,
                class: $class:expr,
                output: $class_output:expr
            }
        })*
        $(module_page {
            $module_name:ident: {
                input: $module_input:expr,
                module: $module:expr,
                output: $module_output:expr
            }
        })*
        $(constants_page {
            $constants_name:ident: {
                input: $constants_input:expr,
                output: $constants_output:expr
            }
        })*
    }) => {
        #[cfg(test)]
        mod $prefix {
            use super::*;

            $(
                #[test]
                fn $class_name() {
                    assert_class_page($class_input, $class, $class_output);
                }
            )*

            $(
                #[test]
                fn $module_name() {
                    assert_module_page($module_input, $module, $module_output);
                }
            )*

            $(
                #[test]
                fn $constants_name() {
                    assert_constants_page($constants_input, $constants_output);
                }
            )*
        }
    };
}
