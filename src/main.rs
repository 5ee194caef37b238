use assetgen::generate::{self, ErrorKind, GenerateError, GenerateOptions};
use assetgen::{config, output};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

/// Shared flag for commands that read the config file.
#[derive(clap::Args, Clone)]
struct ConfigArgs {
    /// Config file path (.toml, or .yaml/.yml)
    /// [default: assetgen.toml, assetgen.yaml or assetgen.yml in the working directory]
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output directory, relative to the working directory (overrides `out` in the config)
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(clap::Args, Clone)]
struct GenerateArgs {
    #[command(flatten)]
    config: ConfigArgs,

    /// Hash matched files without copying them
    #[arg(long)]
    no_copy: bool,

    /// Copy files but do not write manifest.json
    #[arg(long)]
    no_manifest: bool,
}

#[derive(Parser)]
#[command(name = "assetgen")]
#[command(about = "Generate manifest files for your static assets")]
#[command(long_about = "\
Generate manifest files for your static assets

Matches the glob patterns listed in the config file, copies every matched
file into the output directory at the same relative path, and writes
manifest.json with the SHA-256 hash of each file.

Config file (assetgen.toml, or assetgen.yaml with the same keys):

  out = \"dist\"                      # relative to the config file
  scripts = [\"js/**/*.js\"]
  styles = [\"css/*.css\"]
  random = [\"img/*\", \"robots.txt\"]

Manifest (dist/manifest.json):

  { \"styles\":  [{ \"path\": \"css/site.css\", \"hash\": \"<sha256>\" }],
    \"scripts\": [...],
    \"random\":  [...] }

Run 'assetgen gen-config' to print a documented config file.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Copy matched assets and write manifest.json
    Generate(GenerateArgs),
    /// Resolve patterns and list matches without copying anything
    Check(ConfigArgs),
    /// Print a stock assetgen.toml with all options documented
    GenConfig,
}

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Generate(#[from] GenerateError),
    #[error("progress printer stopped; output is incomplete")]
    Printer,
}

impl CliError {
    fn kind(&self) -> ErrorKind {
        match self {
            CliError::Generate(err) => err.kind(),
            CliError::Printer => ErrorKind::Io,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error ({}): {}", err.kind(), err);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<(), CliError> {
    match command {
        Command::Generate(args) => {
            let options = GenerateOptions {
                config_path: args.config.config,
                out: args.config.out,
                copy: !args.no_copy,
                write_manifest: !args.no_manifest,
            };
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_generate_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let result = generate::run(&options, Some(tx));
            let printed = printer.join();
            let result = result?;
            if printed.is_err() {
                return Err(CliError::Printer);
            }
            output::print_generate_summary(&result);
        }
        Command::Check(args) => {
            let options = GenerateOptions {
                config_path: args.config,
                out: args.out,
                ..Default::default()
            };
            let report = generate::check(&options)?;
            output::print_check_output(&report);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
