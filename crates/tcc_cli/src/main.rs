//! Taubyte Config Compiler CLI
//!
//! `tcc compile` turns a project directory into JSON; `tcc decompile` writes
//! such JSON back as a project directory.

#![warn(missing_docs)]
#![warn(clippy::all)]

use clap::{Parser, Subcommand};
use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use std::path::PathBuf;
use tcc_taubyte::{Compiled, Compiler, CompilerOptions, DEFAULT_BRANCH, Decompiler, DecompilerOptions};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tcc")]
#[command(about = "Taubyte config compiler", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a project directory
    Compile {
        /// Project directory
        #[arg(short, long, default_value = ".")]
        path: PathBuf,
        /// Branch recorded in index paths
        #[arg(short, long, default_value = DEFAULT_BRANCH)]
        branch: String,
        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Write compiled JSON back as a project directory
    Decompile {
        /// Compiled JSON file
        #[arg(short, long)]
        input: PathBuf,
        /// Target directory
        #[arg(short, long)]
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env("TCC_LOG").unwrap_or_else(|_| EnvFilter::new("tcc=info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Compile { path, branch, output } => {
            let options = CompilerOptions::default()
                .with_branch(branch)
                .with_source(path.clone());
            let compiled = Compiler::new(options)
                .compile()
                .wrap_err_with(|| format!("compiling {}", path.display()))?;
            let json = serde_json::to_string_pretty(&compiled.to_json())?;
            match output {
                Some(file) => {
                    std::fs::write(&file, json)
                        .wrap_err_with(|| format!("writing {}", file.display()))?;
                    info!(output = %file.display(), "wrote compiled project");
                }
                None => println!("{}", json),
            }
            Ok(())
        }
        Commands::Decompile { input, path } => {
            let text = std::fs::read_to_string(&input)
                .wrap_err_with(|| format!("reading {}", input.display()))?;
            let json: serde_json::Value = serde_json::from_str(&text)?;
            let compiled = Compiled::from_json(&json)?;
            Decompiler::new(DecompilerOptions::default().with_target(path.clone()))
                .decompile(&compiled.root)
                .wrap_err_with(|| format!("decompiling into {}", path.display()))?;
            info!(path = %path.display(), "wrote project");
            Ok(())
        }
    }
}
