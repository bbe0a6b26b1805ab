//! Stubdoc generates MDX API reference pages from the type stubs of a Python extension package.
//!
//! Declaration files (`.pyi`) are parsed with tree-sitter into an [`ApiModel`] of classes,
//! enumerations and function modules. Same-name declarations are merged into overload groups,
//! enumeration member docs can be backfilled from the runtime package, and the model is rendered
//! as one page per class, one page per function module and a constants index. Type names in
//! rendered tables link to the page that documents them.
//!
//! The [`Stubdoc`] facade runs the whole pipeline; the stages are public for use on their own.

pub mod classify;
pub mod config;
pub mod crosslink;
pub mod discover;
pub mod docstring;
pub mod enrich;
mod error;
pub mod frontmatter;
pub mod model;
pub mod naming;
pub mod render;
pub mod signature;
pub mod site;
mod stubdoc;
pub mod syntax;
pub mod walker;

pub use crate::{
    config::{Config, EffectsConfig, LinkScheme},
    enrich::{JsonMemberDocs, MemberDocSource, NoRuntime},
    error::{Result, StubdocError},
    model::{ApiModel, Class, Function, Module, Parameter, Property, Signature},
    render::Renderer,
    stubdoc::{GenerateReport, Stubdoc},
    walker::parse_stub,
};

#[cfg(feature = "python")]
pub use crate::enrich::PythonRuntime;
