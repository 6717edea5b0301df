//! # Labelpress CLI
//!
//! Command-line interface for rendering and printing labels.
//!
//! ## Usage
//!
//! ```bash
//! # Render a label request to a BMP (and a PNG preview)
//! labelpress render label.json --out label.bmp --png label.png
//!
//! # Print on the primary printer
//! labelpress print label.json --device "TSC TE310-btpincode=/dev/usb/lp0"
//!
//! # Print on both printers, primary first
//! labelpress print label.json --profile both
//!
//! # Show what would be sent
//! labelpress print label.json --dry-run
//! labelpress commands --profile secondary
//!
//! # Inspect or override settings
//! labelpress settings --set dpi=203 --set orientation=landscape
//! ```
//!
//! Settings come from the environment (and `.env`), then from the file
//! given with `--settings`. Log verbosity follows `RUST_LOG` (default `info`).

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use serde_json::{Map, Value};

use labelpress::{
    LabelError,
    json_api::JsonLabel,
    label::LabelElements,
    printer::{LabelProfile, LabelSettings, SettingsStore},
    protocol::PrintSequence,
    render::{FontResolver, LabelRenderer},
    service::{LabelService, PrintReceipt},
    transport::{DeviceChannel, MemoryChannel, PortChannel},
};

/// Labelpress - Thermal label printer utility
#[derive(Parser, Debug)]
#[command(name = "labelpress")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON file with settings overrides (keys as printed by `settings`)
    #[arg(long, global = true, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Extra directory searched for fonts before the system directories
    #[arg(long, global = true, value_name = "DIR")]
    font_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a label request to a BMP file
    Render {
        /// Label request JSON (textEntries / iconEntries / barcodeEntries)
        input: PathBuf,

        #[arg(long, value_enum, default_value_t = Profile::Primary)]
        profile: Profile,

        /// BMP output path
        #[arg(long, value_name = "FILE")]
        out: PathBuf,

        /// Also write a PNG preview
        #[arg(long, value_name = "FILE")]
        png: Option<PathBuf>,
    },

    /// Render and print a label request
    Print {
        /// Label request JSON
        input: PathBuf,

        #[arg(long, value_enum, default_value_t = Target::Primary)]
        profile: Target,

        /// Map a printer name to a device file, as NAME=PATH (repeatable)
        #[arg(long, value_name = "NAME=PATH")]
        device: Vec<String>,

        /// Record the job instead of sending it
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the command sequence a job would send
    Commands {
        #[arg(long, value_enum, default_value_t = Profile::Primary)]
        profile: Profile,
    },

    /// Print the effective settings as JSON
    Settings {
        /// Override a setting, as KEY=VALUE (repeatable)
        #[arg(long, value_name = "KEY=VALUE")]
        set: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Profile {
    Primary,
    Secondary,
}

impl From<Profile> for LabelProfile {
    fn from(profile: Profile) -> Self {
        match profile {
            Profile::Primary => LabelProfile::Primary,
            Profile::Secondary => LabelProfile::Secondary,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Target {
    Primary,
    Secondary,
    Both,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), LabelError> {
    let cli = Cli::parse();
    let settings = load_settings(cli.settings.as_deref())?;
    let fonts = match cli.font_dir {
        Some(dir) => FontResolver::system().with_font_dir(dir),
        None => FontResolver::system(),
    };
    let renderer = LabelRenderer::new(fonts);

    match cli.command {
        Commands::Render {
            input,
            profile,
            out,
            png,
        } => {
            let elements = read_elements(&input)?;
            let label = renderer.render(&elements, profile.into(), &settings)?;

            label.raster.save_bmp(&out)?;
            println!(
                "Saved {}x{} label to {}",
                label.raster.width(),
                label.raster.height(),
                out.display()
            );
            if let Some(png_path) = png {
                fs::write(&png_path, label.raster.to_png()?)?;
                println!("Saved preview to {}", png_path.display());
            }
            for skipped in label.report.skipped() {
                println!("  skipped {} #{}: {:?}", skipped.kind, skipped.index, skipped.outcome);
            }
        }

        Commands::Print {
            input,
            profile,
            device,
            dry_run,
        } => {
            let elements = read_elements(&input)?;

            if dry_run {
                let service = LabelService::new(settings, renderer, MemoryChannel::new());
                let receipts = print_target(&service, &elements, profile)?;
                report_receipts(&receipts);
                println!("Dry run, calls recorded:");
                for call in service.into_channel().calls() {
                    println!("  {:?}", call);
                }
            } else {
                let mut channel = PortChannel::new();
                for mapping in &device {
                    let (name, path) = split_pair(mapping)?;
                    channel = channel.with_device(name, path);
                }
                let service = LabelService::new(settings, renderer, channel);
                let receipts = print_target(&service, &elements, profile)?;
                report_receipts(&receipts);
            }
        }

        Commands::Commands { profile } => {
            let profile = LabelProfile::from(profile);
            println!("# {} → '{}'", profile, settings.printer_name(profile));
            for line in PrintSequence::build(&settings, profile).to_lines() {
                println!("{}", line);
            }
        }

        Commands::Settings { set } => {
            let store = SettingsStore::new(settings);
            if !set.is_empty() {
                let mut changes = Map::new();
                for pair in &set {
                    let (key, raw) = split_pair(pair)?;
                    changes.insert(key.to_string(), parse_value(raw));
                }
                let applied = store.update(&changes)?;
                info!("Applied {} of {} overrides", applied.len(), set.len());
            }
            println!("{}", serde_json::to_string_pretty(&store.snapshot())?);
        }
    }

    Ok(())
}

fn print_target<C: DeviceChannel>(
    service: &LabelService<C>,
    elements: &LabelElements,
    target: Target,
) -> Result<Vec<PrintReceipt>, LabelError> {
    match target {
        Target::Primary => Ok(vec![service.print(elements, LabelProfile::Primary)?]),
        Target::Secondary => Ok(vec![service.print(elements, LabelProfile::Secondary)?]),
        Target::Both => service.print_all(elements),
    }
}

fn report_receipts(receipts: &[PrintReceipt]) {
    for receipt in receipts {
        println!(
            "{} label → '{}': {:?} ({} elements drawn, {} skipped)",
            receipt.profile,
            receipt.printer,
            receipt.outcome,
            receipt.report.drawn_count(),
            receipt.report.skipped().count()
        );
    }
}

/// Environment first, then the overrides file.
fn load_settings(path: Option<&Path>) -> Result<LabelSettings, LabelError> {
    let store = SettingsStore::new(LabelSettings::from_env());
    if let Some(path) = path {
        let value: Value = serde_json::from_str(&fs::read_to_string(path)?)?;
        let Value::Object(changes) = value else {
            return Err(LabelError::InvalidSettings(format!(
                "{} must contain a JSON object",
                path.display()
            )));
        };
        let applied = store.update(&changes)?;
        info!("Loaded {} settings from {}", applied.len(), path.display());
    }
    Ok(store.snapshot())
}

fn read_elements(path: &Path) -> Result<LabelElements, LabelError> {
    JsonLabel::parse(&fs::read_to_string(path)?)?.to_elements()
}

fn split_pair(pair: &str) -> Result<(&str, &str), LabelError> {
    pair.split_once('=')
        .map(|(k, v)| (k.trim(), v.trim()))
        .ok_or_else(|| LabelError::InvalidSettings(format!("expected KEY=VALUE, got '{}'", pair)))
}

/// `dpi=203` → number, `tear_off=false` → bool, anything unparsable → string.
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
