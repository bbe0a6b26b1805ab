use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use libstubdoc::{Config, JsonMemberDocs, Stubdoc};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Default log filter when `RUST_LOG` is not set.
const DEFAULT_FILTER: &str = "stubdoc=info,libstubdoc=info";

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Python package to document
    package: String,

    /// Directories searched for the package, in order
    #[arg(
        long = "search-path",
        env = "STUBDOC_PATH",
        value_delimiter = ':',
        default_value = "."
    )]
    search_paths: Vec<PathBuf>,

    /// Root of the generated documentation tree
    #[arg(long, default_value = "contents/docs")]
    out: PathBuf,

    /// Remove class and function page directories that were not generated by this run
    #[arg(long, default_value_t = false)]
    prune: bool,

    /// Route configuration whose Classes and Functions lists are rewritten
    #[arg(long, default_value = "lib/routes-config.ts")]
    routes: PathBuf,

    /// Type link map to write
    #[arg(long, default_value = "lib/type-links.ts")]
    type_links: PathBuf,

    /// Name of the compiled implementation submodule
    #[arg(long, default_value = "_core")]
    internal_module: String,

    /// JSON file of enum member docs, shaped {module: {Enum: {MEMBER: doc}}}
    #[arg(long)]
    member_docs: Option<PathBuf>,

    /// Read enum member docs from the installed package through an embedded interpreter
    #[cfg(feature = "python")]
    #[arg(long, default_value_t = false, conflicts_with = "member_docs")]
    python: bool,

    /// Ignore `# value = ...` comments when documenting constants
    #[arg(long, default_value_t = false)]
    no_value_comments: bool,

    /// Print the extracted model as JSON instead of writing pages
    #[arg(long, default_value_t = false)]
    raw: bool,

    /// Only log warnings and errors
    #[arg(long, default_value_t = false)]
    quiet: bool,
}

fn init_tracing(quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if quiet { "warn" } else { DEFAULT_FILTER }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn build(cli: &Cli) -> Result<Stubdoc> {
    let config = Config::new(cli.package.as_str())
        .with_internal_module(cli.internal_module.as_str())
        .with_value_comments(!cli.no_value_comments);

    let mut stubdoc = Stubdoc::new(cli.package.as_str())
        .with_config(config)
        .with_search_paths(cli.search_paths.clone())
        .with_out_dir(cli.out.clone())
        .with_prune(cli.prune)
        .with_routes(Some(cli.routes.clone()))
        .with_type_links(Some(cli.type_links.clone()));

    if let Some(path) = &cli.member_docs {
        let docs = JsonMemberDocs::from_path(path)
            .with_context(|| format!("failed to load member docs from {}", path.display()))?;
        stubdoc = stubdoc.with_member_docs(docs);
    }

    #[cfg(feature = "python")]
    if cli.python {
        let runtime =
            libstubdoc::PythonRuntime::new().context("failed to start the Python runtime")?;
        stubdoc = stubdoc.with_member_docs(runtime);
    }

    Ok(stubdoc)
}

fn run(cli: &Cli) -> Result<()> {
    let stubdoc = build(cli)?;

    if cli.raw {
        let json = stubdoc
            .raw_json()
            .with_context(|| format!("failed to extract '{}'", cli.package))?;
        println!("{json}");
        return Ok(());
    }

    let report = stubdoc
        .generate()
        .with_context(|| format!("failed to generate docs for '{}'", cli.package))?;
    info!(
        classes = report.class_pages.len(),
        modules = report.module_pages.len(),
        out = %cli.out.display(),
        "done"
    );
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.quiet);

    if let Err(e) = run(&cli) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
