//! Locating a package's declaration files on disk.

use std::{
    io,
    path::{Path, PathBuf},
};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{Result, StubdocError};

/// Extension of declaration files.
const STUB_EXTENSION: &str = "pyi";

/// The declaration files of one package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubSet {
    /// Importable package name.
    pub package: String,
    /// Directory holding the package's files.
    pub root: PathBuf,
    /// `__init__` file, or the single-file stub.
    pub entry: PathBuf,
    /// The package is one `<package>.pyi` file rather than a directory.
    pub single_file: bool,
}

/// Find `package` on the search paths, trying each path in order.
///
/// A directory package is recognised by `__init__.pyi` or `__init__.py`; a single-file stub by
/// `<package>.pyi`.
pub fn locate_package(package: &str, search_paths: &[PathBuf]) -> Result<StubSet> {
    for base in search_paths {
        let dir = base.join(package);
        for init in ["__init__.pyi", "__init__.py"] {
            let entry = dir.join(init);
            if entry.is_file() {
                debug!(entry = %entry.display(), "located package");
                return Ok(StubSet {
                    package: package.to_string(),
                    root: dir,
                    entry,
                    single_file: false,
                });
            }
        }
        let stub = base.join(format!("{package}.{STUB_EXTENSION}"));
        if stub.is_file() {
            debug!(entry = %stub.display(), "located single-file package");
            return Ok(StubSet {
                package: package.to_string(),
                root: base.clone(),
                entry: stub,
                single_file: true,
            });
        }
    }
    Err(StubdocError::PackageNotFound(package.to_string()))
}

impl StubSet {
    /// Every file to parse: stubs in path order, then each of `extra_modules` that exists.
    /// Falls back to the entry file when nothing else is found.
    pub fn files(&self, extra_modules: &[String]) -> Result<Vec<PathBuf>> {
        if !self.entry.is_file() {
            return Err(StubdocError::EntryNotFound(self.entry.clone()));
        }
        if self.single_file {
            return Ok(vec![self.entry.clone()]);
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.file_name() != "__pycache__");
        for entry in walker {
            let entry = entry.map_err(io::Error::from)?;
            let path = entry.path();
            if entry.file_type().is_file()
                && path.extension().is_some_and(|ext| ext == STUB_EXTENSION)
            {
                files.push(path.to_path_buf());
            }
        }

        files.extend(
            extra_modules
                .iter()
                .map(|name| self.root.join(name))
                .filter(|path| path.is_file()),
        );

        if files.is_empty() {
            files.push(self.entry.clone());
        }
        Ok(files)
    }

    /// Dotted module name of a file inside the package. `__init__` files name their directory.
    pub fn module_name(&self, file: &Path) -> String {
        if self.single_file {
            return self.package.clone();
        }
        let Ok(rel) = file.strip_prefix(&self.root) else {
            return self.package.clone();
        };
        if !rel
            .extension()
            .is_some_and(|ext| ext == STUB_EXTENSION || ext == "py")
        {
            return self.package.clone();
        }

        let mut parts: Vec<String> = rel
            .with_extension("")
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        if rel.file_stem().is_some_and(|stem| stem == "__init__") {
            parts.pop();
        }

        let mut name = self.package.clone();
        for part in parts {
            name.push('.');
            name.push_str(&part);
        }
        name
    }
}
