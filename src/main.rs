//! # thermal-raster CLI
//!
//! Command-line interface for drawing on and printing to Bluetooth thermal
//! printers.
//!
//! ## Usage
//!
//! ```bash
//! # List nearby devices, or look for one printer by name
//! thermal-raster scan
//! thermal-raster scan --name MTP-2 --timeout 10
//!
//! # Print two lines of text under a rule
//! thermal-raster print --text "HELLO" --text "WORLD" --font large --line 0,70,383,70
//!
//! # Preview as PNG instead of printing
//! thermal-raster print --text "HELLO" --png hello.png
//!
//! # Encode and pace without a printer
//! thermal-raster print --text "HELLO" --dry-run
//!
//! # Show the effective configuration
//! thermal-raster config --config printer.toml
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use thermal_raster::{
    PrintStatus, Printer, PrinterConfig, PrinterError,
    protocol::raster,
    render::{FontSize, Fonts, FrameBuffer, preview},
    transport::{BluetoothTransport, MemoryTransport, Transport, bluetooth},
};

/// thermal-raster - Bluetooth thermal printer utility
#[derive(Parser, Debug)]
#[command(name = "thermal-raster")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML printer configuration
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan for Bluetooth devices
    Scan {
        /// Only report this printer name (exact match)
        #[arg(long)]
        name: Option<String>,

        /// Scan duration in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Draw text and lines, then print (or preview) the bitmap
    Print {
        /// Text to draw; each value starts a new line
        #[arg(long)]
        text: Vec<String>,

        /// Font size: small (8x8) or large (16x32)
        #[arg(long, default_value = "small")]
        font: FontSize,

        /// Draw text white on black
        #[arg(long)]
        invert: bool,

        /// Wrap text at the right edge
        #[arg(long)]
        wrap: bool,

        /// Line as x1,y1,x2,y2 (repeatable)
        #[arg(long, value_parser = parse_line)]
        line: Vec<Line>,

        /// Bitmap height in rows
        #[arg(long, default_value = "200")]
        height: usize,

        /// Bitmap width in dots (defaults to the configured printer width)
        #[arg(long)]
        width: Option<u16>,

        /// Printer name to discover
        #[arg(long)]
        name: Option<String>,

        /// Bound RFCOMM device, skips discovery
        #[arg(long)]
        device: Option<PathBuf>,

        /// Save a PNG preview instead of printing
        #[arg(long, value_name = "FILE")]
        png: Option<PathBuf>,

        /// Write the raw raster command to a file instead of printing
        #[arg(long, value_name = "FILE")]
        raw: Option<PathBuf>,

        /// Stream into memory instead of a printer
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the effective configuration as TOML
    Config,
}

/// A `--line` argument.
#[derive(Debug, Clone, Copy)]
struct Line {
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
}

fn parse_line(s: &str) -> Result<Line, String> {
    let parts: Vec<i32> = s
        .split(',')
        .map(|p| p.trim().parse::<i32>().map_err(|_| format!("Invalid coordinate: {}", p)))
        .collect::<Result<_, _>>()?;
    match parts[..] {
        [x1, y1, x2, y2] => Ok(Line { x1, y1, x2, y2 }),
        _ => Err(format!("Expected x1,y1,x2,y2, got '{}'", s)),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), PrinterError> {
    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => PrinterConfig::load(path)?,
        None => PrinterConfig::default(),
    };

    match cli.command {
        Commands::Scan { name, timeout, json } => {
            let timeout = timeout.map(Duration::from_secs).unwrap_or(config.scan_timeout());
            match name {
                Some(name) => {
                    let device = bluetooth::discover_by_name(&name, timeout)?
                        .ok_or_else(|| PrinterError::NotFound(name.clone()))?;
                    if json {
                        println!("{}", to_json(&device)?);
                    } else {
                        println!("{}  {}", device.address, device.name);
                    }
                }
                None => {
                    let devices = bluetooth::scan(timeout, |_| {})?;
                    if json {
                        println!("{}", to_json(&devices)?);
                    } else if devices.is_empty() {
                        println!("No devices found.");
                    } else {
                        for device in &devices {
                            println!("{}  {}", device.address, device.name);
                        }
                    }
                }
            }
        }

        Commands::Print {
            text,
            font,
            invert,
            wrap,
            line,
            height,
            width,
            name,
            device,
            png,
            raw,
            dry_run,
        } => {
            if let Some(width) = width {
                config.width_dots = width;
            }
            if let Some(name) = name {
                config.name = name;
            }
            if device.is_some() {
                config.device = device;
            }
            config.validate()?;

            let width = config.width_dots as usize;
            let mut memory = vec![0u8; config.pitch() * height];
            let mut fb = FrameBuffer::with_buffer(&mut memory, width, height)?;
            fb.set_wrap(wrap);

            if !text.is_empty() {
                let fonts = Fonts::spleen()?;
                let mut y = 0;
                for line_text in &text {
                    fb.draw_text(&fonts, Some((0, y)), line_text, font, invert)?;
                    let (cx, cy) = fb.cursor();
                    y = if cx == 0 { cy } else { cy + font.glyph_height() };
                }
            }
            for l in &line {
                fb.draw_line(l.x1, l.y1, l.x2, l.y2, true)?;
            }

            if let Some(path) = png {
                preview::save_png(&fb, &path)?;
                println!("Saved preview to {}", path.display());
                return Ok(());
            }

            if let Some(path) = raw {
                std::fs::write(&path, raster::raster_command(&fb)?)?;
                println!("Saved raster command to {}", path.display());
                return Ok(());
            }

            if dry_run {
                let mut printer = Printer::new(MemoryTransport::new(), config);
                printer.connect()?;
                let status = printer.print(&fb)?;
                report(status);
                println!(
                    "Pacing would take {} ms",
                    printer.transport().total_pause().as_millis()
                );
                return Ok(());
            }

            let transport = match &config.device {
                Some(path) => BluetoothTransport::for_device(path),
                None => BluetoothTransport::discover(
                    &config.name,
                    config.scan_timeout(),
                    config.rfcomm_channel,
                )?,
            };
            let status = print_with(transport, config, &fb)?;
            report(status);
        }

        Commands::Config => {
            config.validate()?;
            print!("{}", config.to_toml_string()?);
        }
    }

    Ok(())
}

/// Connect, print, disconnect.
fn print_with<T: Transport>(
    transport: T,
    config: PrinterConfig,
    fb: &FrameBuffer<'_>,
) -> Result<PrintStatus, PrinterError> {
    let mut printer = Printer::new(transport, config);
    printer.connect()?;
    let status = printer.print(fb)?;
    printer.disconnect();
    Ok(status)
}

fn report(status: PrintStatus) {
    match status {
        PrintStatus::Sent { rows, bytes } => println!("Printed {} rows ({} bytes)", rows, bytes),
        PrintStatus::Skipped => println!("Printer not connected, nothing sent"),
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, PrinterError> {
    serde_json::to_string_pretty(value).map_err(|e| PrinterError::Config(e.to_string()))
}
