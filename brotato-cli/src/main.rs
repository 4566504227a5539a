use clap::{Parser, Subcommand};
use log::{info, LevelFilter};
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

use brotato_core::datapackage::data_package;
use brotato_core::{BrotatoOptions, BrotatoWorld, GenerationError, MemoryWorld, SlotData};

#[derive(Debug, Parser)]
#[command(name = "brotato-apworld", version, about = "Brotato multiworld generation tool")]
struct Args {
    /// Log debug output from every generation phase.
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate one player's world and print its slot data.
    Generate {
        /// JSON file with the player's options. Missing options use their defaults.
        #[arg(long)]
        options: Option<PathBuf>,

        #[arg(long)]
        seed: u64,

        #[arg(long, default_value_t = 1)]
        player: u32,

        /// Write slot data here instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Dump item and location ids.
    Datapackage {
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Summarise slot data files found in a directory or zip archive.
    Stats { path: PathBuf },
}

#[derive(Debug, Error)]
enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

type Result<T> = std::result::Result<T, CliError>;

fn write_output(output: Option<&Path>, text: &str) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, text)?;
            info!("wrote {}", path.display());
        }
        None => println!("{text}"),
    }
    Ok(())
}

fn generate(options: Option<&Path>, seed: u64, player: u32, output: Option<&Path>) -> Result<()> {
    let options = match options {
        Some(path) => BrotatoOptions::from_json(&fs::read_to_string(path)?)?,
        None => BrotatoOptions::default(),
    };

    let mut host = MemoryWorld::new();
    let mut world = BrotatoWorld::new(player, options, seed)?;
    let slot_data = world.generate(&mut host)?;

    if let Some(pool) = world.context().and_then(|ctx| ctx.item_pool.as_ref()) {
        eprintln!("{:<24} {:>5}", "item", "count");
        for (kind, count) in pool.iter() {
            eprintln!("{:<24} {:>5}", kind.name(), count);
        }
        eprintln!(
            "{:<24} {:>5} ({} locations)",
            "total",
            pool.total(),
            host.location_count(player)
        );
    }

    write_output(output, &serde_json::to_string_pretty(&slot_data)?)
}

fn summarise(name: &str, data: &SlotData) {
    let items: Vec<String> = data
        .wave_per_game_item
        .values()
        .map(|waves| waves.len().to_string())
        .collect();
    println!(
        "{:<40} {:>4} {:>8} {:>8} {:>8} {:>6} {:>6}  {}",
        name,
        data.num_wins_needed,
        data.waves_with_checks.len(),
        data.num_common_crate_locations,
        data.num_legendary_crate_locations,
        data.common_crate_drop_groups.len(),
        data.legendary_crate_drop_groups.len(),
        items.join("/"),
    );
}

fn stats_from_zip(path: &Path) -> Result<()> {
    let mut archive = zip::ZipArchive::new(File::open(path)?)?;
    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        if !file.name().ends_with(".json") {
            continue;
        }
        let mut text = String::new();
        file.read_to_string(&mut text)?;
        let data: SlotData = serde_json::from_str(&text)?;
        summarise(&format!("{}:{}", path.display(), file.name()), &data);
    }
    Ok(())
}

fn stats(path: &Path) -> Result<()> {
    println!(
        "{:<40} {:>4} {:>8} {:>8} {:>8} {:>6} {:>6}  {}",
        "file", "wins", "checks", "c_crates", "l_crates", "c_grp", "l_grp", "items (C/U/R/L)"
    );
    for entry in WalkDir::new(path).sort_by_file_name() {
        let entry = entry?;
        let file = entry.path();
        match file.extension().and_then(|e| e.to_str()) {
            Some("zip") => stats_from_zip(file)?,
            Some("json") => {
                let data: SlotData = serde_json::from_str(&fs::read_to_string(file)?)?;
                summarise(&file.display().to_string(), &data);
            }
            _ => {}
        }
    }
    Ok(())
}

fn run(args: Args) -> Result<()> {
    match args.command {
        Command::Generate {
            options,
            seed,
            player,
            output,
        } => generate(options.as_deref(), seed, player, output.as_deref()),
        Command::Datapackage { output } => {
            let text = serde_json::to_string_pretty(&data_package()?)?;
            write_output(output.as_deref(), &text)
        }
        Command::Stats { path } => stats(&path),
    }
}

fn main() {
    let args = Args::parse();

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    if let Err(err) = run(args) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
