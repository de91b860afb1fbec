//! Stack Codegen Driver
//!
//! Command-line front end for the stack-discipline code generator. It runs
//! the built-in sample trees, lowers JSON IR files to assembly and dumps
//! samples as JSON so they can be edited and fed back in.

mod samples;

use clap::{Parser, Subcommand};
use log::info;
use stackcg_backend::{backend_for, Backend, GeneratorOptions, SUPPORTED_TARGETS};
use stackcg_common::CompilerError;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "stackcg")]
#[command(about = "Stack-discipline x86-64 code generator")]
#[command(version = "0.1.0")]
struct Cli {
    /// Enable logging (RUST_LOG refines the filter)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the built-in sample trees and check their output
    Test {
        /// Which sample to run
        #[arg(short, long, default_value = "arithmetic")]
        name: String,

        /// Run every sample
        #[arg(long)]
        all: bool,

        /// Output file for a single sample's assembly
        #[arg(short, long, conflicts_with = "all")]
        output: Option<PathBuf>,

        /// Directory receiving `test_<name>.s` files
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Generate assembly from a JSON IR tree
    Generate {
        /// Input IR tree in JSON form
        input: PathBuf,

        /// Output assembly file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Emit a comment naming each node's kind
        #[arg(long)]
        annotate: bool,

        /// Generator options in JSON form
        #[arg(long)]
        config: Option<PathBuf>,

        /// Target architecture
        #[arg(long, default_value = "x86_64")]
        target: String,
    },

    /// Print a built-in sample tree as JSON
    DumpSample {
        /// Sample name
        name: String,
    },
}

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    }

    match cli.command {
        Commands::Test { name, all, output, out_dir } => {
            let selected = if all { samples::names() } else { vec![name.as_str()] };
            match run_samples(&selected, output.as_deref(), &out_dir) {
                Ok(summary) => {
                    println!("\n{} passed, {} failed", summary.passed, summary.failed);
                    if summary.failed > 0 {
                        std::process::exit(1);
                    }
                }
                Err(e) => {
                    eprintln!("Error running samples: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Generate { input, output, annotate, config, target } => {
            let result = load_options(config.as_deref(), annotate)
                .and_then(|options| generate_command(&input, output.as_deref(), &target, options));
            if let Err(e) = result {
                eprintln!("Error generating assembly: {}", e);
                std::process::exit(1);
            }
        }
        Commands::DumpSample { name } => match dump_sample(&name) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error dumping sample: {}", e);
                std::process::exit(1);
            }
        },
    }
}

#[derive(Debug, Default, PartialEq)]
struct Summary {
    passed: usize,
    failed: usize,
}

/// Generate each named sample, check it and write its assembly
///
/// With a single sample `output` overrides the file name; otherwise files go
/// to `out_dir/test_<name>.s`.
fn run_samples(
    names: &[&str],
    output: Option<&Path>,
    out_dir: &Path,
) -> Result<Summary, CompilerError> {
    let mut summary = Summary::default();

    for name in names {
        let sample = samples::find(name).ok_or_else(|| unknown_sample(name))?;
        println!("Running sample: {} ({})", sample.name, sample.description);

        // Fresh generator per sample so label numbering is reproducible
        let mut backend = new_backend("x86_64", GeneratorOptions::default())?;
        let asm = backend.generate(&sample.tree())?;

        let path = match output {
            Some(path) if names.len() == 1 => path.to_path_buf(),
            _ => out_dir.join(format!("test_{}.s", sample.name)),
        };
        fs::write(&path, &asm)?;
        info!("wrote {}", path.display());

        let missing = sample.missing(&asm);
        if missing.is_empty() {
            println!("  PASSED -> {}", path.display());
            summary.passed += 1;
        } else {
            println!("  FAILED -> {}", path.display());
            for fragment in missing {
                println!("    missing: {}", fragment);
            }
            summary.failed += 1;
        }
    }

    Ok(summary)
}

/// Options from an optional JSON file, with `--annotate` applied on top
fn load_options(config: Option<&Path>, annotate: bool) -> Result<GeneratorOptions, CompilerError> {
    let options: GeneratorOptions = match config {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => GeneratorOptions::default(),
    };
    Ok(if annotate { options.with_annotations(true) } else { options })
}

fn generate_command(
    input: &Path,
    output: Option<&Path>,
    target: &str,
    options: GeneratorOptions,
) -> Result<(), CompilerError> {
    info!("generating {} for {}", input.display(), target);
    let json = fs::read_to_string(input)?;
    let asm = compile_json(&json, target, options)?;

    match output {
        Some(path) => {
            fs::write(path, &asm)?;
            println!("Assembly written to: {}", path.display());
        }
        None => print!("{}", asm),
    }
    Ok(())
}

/// Parse a JSON tree and generate one unit for it
fn compile_json(json: &str, target: &str, options: GeneratorOptions) -> Result<String, CompilerError> {
    let tree = stackcg_ir::from_json(json)?;
    let mut backend = new_backend(target, options)?;
    Ok(backend.generate(&tree)?)
}

fn dump_sample(name: &str) -> Result<String, CompilerError> {
    let sample = samples::find(name).ok_or_else(|| unknown_sample(name))?;
    Ok(stackcg_ir::to_json(&sample.tree())?)
}

fn new_backend(
    target: &str,
    options: GeneratorOptions,
) -> Result<Box<dyn Backend>, CompilerError> {
    backend_for(target, options).ok_or_else(|| {
        CompilerError::input_error(format!(
            "unsupported target '{}' (expected one of: {})",
            target,
            SUPPORTED_TARGETS.join(", ")
        ))
    })
}

fn unknown_sample(name: &str) -> CompilerError {
    CompilerError::input_error(format!(
        "unknown sample '{}' (available: {})",
        name,
        samples::names().join(", ")
    ))
}
