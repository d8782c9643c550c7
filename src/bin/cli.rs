use clap::{Args, Parser, Subcommand};
use claimnorm::prelude::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "claims")]
#[command(about = "Claim normalizer - turn provider spreadsheet exports into per-claimant files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize every recognized spreadsheet in a directory
    Run(RunArgs),
    /// Show which profile a file name would route to
    Classify(ClassifyArgs),
    /// List the registered provider profiles
    Profiles,
}

#[derive(Args)]
struct RunArgs {
    /// Directory containing provider spreadsheet exports
    #[arg(short, long)]
    input_dir: PathBuf,
    /// Output directory (relative paths resolve under the input directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
    /// Disable the progress bar
    #[arg(long)]
    no_progress: bool,
    /// Abort on the first invalid file instead of skipping it
    #[arg(long)]
    strict: bool,
}

#[derive(Args)]
struct ClassifyArgs {
    /// File names to classify
    #[arg(required = true)]
    file_names: Vec<String>,
}

fn main() {
    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => cmd_run(args),
        Commands::Classify(args) => cmd_classify(args),
        Commands::Profiles => cmd_profiles(),
    }
}

fn cmd_run(args: RunArgs) {
    let mut builder = ConfigBuilder::new()
        .progress_bar(!args.no_progress)
        .halt_on_file_error(args.strict);
    if let Some(dir) = &args.output_dir {
        builder = builder.output_dir(dir);
    }

    let mut pipeline = match ClaimsPipeline::new(&args.input_dir) {
        Ok(pipeline) => pipeline.with_config(builder.build()),
        Err(e) => {
            eprintln!("Error: {}", e.user_message());
            std::process::exit(1);
        }
    };

    // Per-file skips are reported inside the run and do not fail the batch.
    if let Err(e) = pipeline.run() {
        eprintln!("Error: {}", e.user_message());
        std::process::exit(1);
    }
}

fn cmd_classify(args: ClassifyArgs) {
    let registry = match ProfileRegistry::standard() {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("Error: {}", e.user_message());
            std::process::exit(1);
        }
    };

    for file_name in &args.file_names {
        match registry.classify(file_name) {
            Classification::Matched(profile) => {
                println!("{}: {}", file_name, profile.provider_name);
            }
            Classification::Skip => {
                println!("{}: (skip)", file_name);
            }
        }
    }
}

fn cmd_profiles() {
    let registry = match ProfileRegistry::standard() {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("Error: {}", e.user_message());
            std::process::exit(1);
        }
    };

    for profile in registry.profiles() {
        println!(
            "{:<12} token '{}', sheet '{}', header row {}, {} mapped column(s), {} constant(s)",
            profile.provider_name,
            profile.match_token,
            profile.sheet_name,
            profile.header_offset,
            profile.field_map.len(),
            profile.constants.len()
        );
    }
}
