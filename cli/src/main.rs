use std::fs;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use cmdtree_export::output::{OutputFormat, format_snapshot};
use cmdtree_export::{AccessorRegistry, export_snapshot};
use cmdtree_web::{ServeConfig, ServeContext, serve};

mod manifest;

use manifest::load_manifest;

/// CLI-specific output format enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
    Markdown,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(fmt: CliOutputFormat) -> Self {
        match fmt {
            CliOutputFormat::Json => Self::Json,
            CliOutputFormat::Yaml => Self::Yaml,
            CliOutputFormat::Markdown => Self::Markdown,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "cmdtree")]
#[command(about = "Export a command-tree manifest as a normalized description")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Export a manifest's command tree to JSON, YAML, or Markdown.
    Export(ExportArgs),
    /// Check a manifest's structure without exporting.
    Validate(ValidateArgs),
    /// Serve the exported tree over HTTP with the bundled UI.
    Serve(ServeArgs),
}

#[derive(Debug, Args)]
struct ExportArgs {
    /// Command-tree manifest (YAML, or JSON with a .json extension).
    manifest: PathBuf,
    /// Output file path; stdout when omitted.
    #[arg(long)]
    output: Option<PathBuf>,
    /// Output format (default: json).
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
    /// Override the application name from the manifest.
    #[arg(long)]
    app_name: Option<String>,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Command-tree manifest (YAML, or JSON with a .json extension).
    manifest: PathBuf,
}

#[derive(Debug, Args)]
struct ServeArgs {
    /// Command-tree manifest (YAML, or JSON with a .json extension).
    manifest: PathBuf,
    /// Listen host.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,
    /// Listen port.
    #[arg(long, default_value_t = 8080)]
    port: u16,
    /// Override the application name from the manifest.
    #[arg(long)]
    app_name: Option<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Export(args) => run_export(args),
        Command::Validate(args) => run_validate(args),
        Command::Serve(args) => run_serve(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run_export(args: ExportArgs) -> Result<(), String> {
    let (application, root) = load_manifest(&args.manifest).map_err(|e| e.to_string())?;
    let application = args.app_name.unwrap_or(application);

    let generated_at = chrono::Utc::now().to_rfc3339();
    let outcome = export_snapshot(
        &application,
        &generated_at,
        &root,
        &AccessorRegistry::standard(),
    )
    .map_err(|e| e.detail())?;

    for failure in &outcome.pruned {
        eprintln!("warning: dropped '{}': {}", failure.path, failure.error);
    }

    let raw = format_snapshot(&outcome.snapshot, args.format.into())?;
    match args.output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)
                        .map_err(|err| format!("Failed to create '{}': {err}", parent.display()))?;
                }
            }
            fs::write(&path, raw)
                .map_err(|err| format!("Failed to write '{}': {err}", path.display()))?;
            println!("Wrote export to {}", path.display());
        }
        None => println!("{raw}"),
    }

    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let (application, root) = load_manifest(&args.manifest).map_err(|e| e.to_string())?;
    let (commands, flags) = tree_counts(&root);
    println!("Manifest for '{application}' is well-formed: {commands} command(s), {flags} flag(s).");
    Ok(())
}

fn run_serve(args: ServeArgs) -> Result<(), String> {
    let (application, root) = load_manifest(&args.manifest).map_err(|e| e.to_string())?;
    let application = args.app_name.unwrap_or(application);

    let config = ServeConfig {
        host: args.host,
        port: args.port,
    };
    let ctx = ServeContext::new(&application, root);
    serve(&config, &ctx).map_err(|e| e.to_string())
}

fn tree_counts(command: &cmdtree_core::Command) -> (usize, usize) {
    let mut commands = 1;
    let mut flags = command.flags().len();
    for child in command.children() {
        let (c, f) = tree_counts(child);
        commands += c;
        flags += f;
    }
    (commands, flags)
}
