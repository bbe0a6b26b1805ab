//! The generation pipeline: locate, parse, enrich, render and write.

use std::{
    collections::BTreeSet,
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, info, warn};

use crate::{
    config::Config,
    discover::{StubSet, locate_package},
    enrich::{MemberDocSource, NoRuntime, enrich_enum_member_docs},
    error::Result,
    model::{ApiModel, Function, Module},
    naming::camel_to_kebab,
    render::Renderer,
    site::{update_routes_config, write_type_links},
    syntax::SourceFile,
    walker::parse_stub,
};

/// File name of every generated page inside its slug directory.
const PAGE_FILE: &str = "index.mdx";

/// What a [`Stubdoc::generate`] run wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateReport {
    /// Class pages written.
    pub class_pages: Vec<PathBuf>,
    /// Function module pages written.
    pub module_pages: Vec<PathBuf>,
    /// The constants index page.
    pub constants_page: PathBuf,
    /// Stale page directories removed.
    pub pruned: Vec<PathBuf>,
    /// Whether the route configuration changed.
    pub routes_updated: bool,
    /// Whether the type link map was rewritten.
    pub type_links_updated: bool,
}

/// Stubdoc turns a Python package's type stubs into cross-linked MDX reference pages.
///
/// The package is located on the search paths, every declaration file is parsed into one
/// [`ApiModel`], and the model is rendered as one page per class, one page per function module
/// and a constants index, plus the route list and type link map the site reads.
pub struct Stubdoc {
    /// Extraction conventions.
    config: Config,
    /// Directories searched for the package, in order.
    search_paths: Vec<PathBuf>,
    /// Root of the generated documentation tree.
    out_dir: PathBuf,
    /// Whether stale page directories are removed.
    prune: bool,
    /// Route configuration to update, if any.
    routes: Option<PathBuf>,
    /// Type link map to write, if any.
    type_links: Option<PathBuf>,
    /// Where enumeration member docs missing from the stubs are looked up.
    member_docs: Box<dyn MemberDocSource>,
}

impl Stubdoc {
    /// Create a generator for `package` with the default site layout.
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            config: Config::new(package),
            search_paths: vec![PathBuf::from(".")],
            out_dir: PathBuf::from("contents/docs"),
            prune: false,
            routes: Some(PathBuf::from("lib/routes-config.ts")),
            type_links: Some(PathBuf::from("lib/type-links.ts")),
            member_docs: Box::new(NoRuntime),
        }
    }

    /// Replace the extraction configuration, package name included.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Set the directories searched for the package.
    pub fn with_search_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.search_paths = paths;
        self
    }

    /// Set the root of the generated documentation tree.
    pub fn with_out_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.out_dir = dir.into();
        self
    }

    /// Enable or disable removal of stale page directories.
    pub fn with_prune(mut self, prune: bool) -> Self {
        self.prune = prune;
        self
    }

    /// Set the route configuration file, or `None` to leave routes alone.
    pub fn with_routes(mut self, path: Option<PathBuf>) -> Self {
        self.routes = path;
        self
    }

    /// Set the type link map file, or `None` to skip it.
    pub fn with_type_links(mut self, path: Option<PathBuf>) -> Self {
        self.type_links = path;
        self
    }

    /// Use `source` to fill in enumeration member docs.
    pub fn with_member_docs(mut self, source: impl MemberDocSource + 'static) -> Self {
        self.member_docs = Box::new(source);
        self
    }

    /// Parse every declaration file of the package into one model.
    pub fn extract(&self) -> Result<ApiModel> {
        let stubs = locate_package(&self.config.package, &self.search_paths)?;
        let files = stubs.files(&self.config.extra_modules)?;
        info!(
            count = files.len(),
            root = %stubs.root.display(),
            "found declaration files"
        );

        let mut model = ApiModel::new();
        for file in &files {
            let text = fs::read_to_string(file)?;
            let stub = parse_stub(&text, &self.config)?;
            let module = stubs.module_name(file);
            debug!(
                module = %module,
                classes = stub.classes.len(),
                functions = stub.functions.len(),
                "parsed declaration file"
            );
            model.add_stub(&module, stub);
        }
        self.extract_effects(&stubs, &mut model);

        enrich_enum_member_docs(&mut model, &self.config.package, self.member_docs.as_ref());
        info!(
            classes = model.classes.len(),
            modules = model.modules.len(),
            "parsed package"
        );
        Ok(model)
    }

    /// Publish the effects functions of the implementation module as their own module.
    fn extract_effects(&self, stubs: &StubSet, model: &mut ApiModel) {
        let Some(effects) = &self.config.effects else {
            return;
        };
        let Some(internal) = model.modules.get(&self.config.internal_module_path()) else {
            return;
        };
        let functions: Vec<Function> = internal
            .functions
            .iter()
            .filter(|func| func.name().starts_with(effects.prefix.as_str()))
            .map(|func| func.strip_prefix(&effects.prefix))
            .collect();
        if functions.is_empty() {
            return;
        }

        let doc = fs::read_to_string(stubs.root.join(&effects.doc_file))
            .ok()
            .and_then(|text| {
                let source = SourceFile::parse(&text).ok()?;
                source.docstring(source.root())
            });
        info!(count = functions.len(), module = %effects.module, "extracted effects functions");
        model.modules.insert(
            format!("{}.{}", self.config.package, effects.module),
            Module {
                name: effects.module.clone(),
                doc,
                functions,
            },
        );
    }

    /// Modules that get a page: everything except the package root and the implementation
    /// module.
    fn documented_modules<'m>(&self, model: &'m ApiModel) -> impl Iterator<Item = &'m Module> {
        let package = self.config.package.clone();
        let internal = self.config.internal_module.clone();
        model
            .modules
            .values()
            .filter(move |module| module.name != package && module.name != internal)
    }

    /// Extract the model and write every page and site file.
    pub fn generate(&self) -> Result<GenerateReport> {
        let model = self.extract()?;
        let renderer = Renderer::new(&model, &self.config);
        let mut report = GenerateReport::default();

        let classes_dir = self.out_dir.join("classes");
        let functions_dir = self.out_dir.join("functions");
        fs::create_dir_all(&classes_dir)?;
        fs::create_dir_all(&functions_dir)?;

        let mut class_slugs = Vec::new();
        for class in model.plain_classes() {
            let slug = camel_to_kebab(&class.name);
            let path = classes_dir.join(&slug).join(PAGE_FILE);
            write_page(&path, &renderer.class_page(class))?;
            class_slugs.push(slug);
            report.class_pages.push(path);
        }

        let constants = self.out_dir.join("manual").join("constants").join(PAGE_FILE);
        write_page(&constants, &renderer.constants_page())?;
        info!(path = %constants.display(), "wrote constants page");
        report.constants_page = constants;

        let mut module_slugs = Vec::new();
        for module in self.documented_modules(&model) {
            let slug = camel_to_kebab(&module.name);
            let path = functions_dir.join(&slug).join(PAGE_FILE);
            write_page(&path, &renderer.module_page(module))?;
            module_slugs.push(slug);
            report.module_pages.push(path);
        }
        info!(
            classes = report.class_pages.len(),
            modules = report.module_pages.len(),
            "wrote pages"
        );

        if self.prune {
            report.pruned = prune_dirs(&classes_dir, &class_slugs)?;
            report.pruned.extend(prune_dirs(&functions_dir, &module_slugs)?);
            info!(removed = report.pruned.len(), "pruned stale page directories");
        }

        let class_names: Vec<&str> = model.plain_classes().map(|c| c.name.as_str()).collect();
        let enum_names: Vec<&str> = model.enums().map(|c| c.name.as_str()).collect();

        if let Some(routes) = &self.routes {
            let module_names: Vec<&str> = self
                .documented_modules(&model)
                .map(|m| m.name.as_str())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect();
            report.routes_updated = update_routes_config(routes, &class_names, &module_names)?;
            if report.routes_updated {
                info!(path = %routes.display(), "updated routes config");
            } else {
                info!("routes config unchanged");
            }
        }

        if let Some(type_links) = &self.type_links {
            report.type_links_updated =
                write_type_links(type_links, &class_names, &enum_names, &self.config.links)?;
            if report.type_links_updated {
                info!(path = %type_links.display(), "updated type links");
            } else {
                info!("type links unchanged");
            }
        }

        Ok(report)
    }

    /// Returns the extracted model as pretty-printed JSON.
    pub fn raw_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.extract()?)?)
    }
}

fn write_page(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

/// Remove directories under `root` whose name, compared case-insensitively, is not in `keep`.
fn prune_dirs(root: &Path, keep: &[String]) -> Result<Vec<PathBuf>> {
    let keep: BTreeSet<String> = keep.iter().map(|slug| slug.to_lowercase()).collect();
    let mut removed = Vec::new();
    for entry in fs::read_dir(root)? {
        let path = entry?.path();
        let stale = path.is_dir()
            && path
                .file_name()
                .is_some_and(|name| !keep.contains(&name.to_string_lossy().to_lowercase()));
        if !stale {
            continue;
        }
        match fs::remove_dir_all(&path) {
            Ok(()) => removed.push(path),
            Err(e) => warn!(path = %path.display(), error = %e, "failed to prune directory"),
        }
    }
    removed.sort();
    Ok(removed)
}
