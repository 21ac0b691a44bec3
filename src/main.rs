//! Game of Life CLI - Run a distributed simulation over PGM images.
//!
//! Keys read from stdin control the run: `s` saves a snapshot, `p` toggles
//! pause and `q` stops.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Instant;

use clap::Parser;
use gol_distributor::{
    crossbeam_channel::{Sender, unbounded},
    io::{ImageStore, PgmStore, SeededStore},
    schema::{ControlSignal, Event, Params, Seed},
};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON parameters file; individual flags override its fields.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Number of generations to run.
    #[arg(short, long)]
    turns: Option<usize>,
    /// Number of band workers.
    #[arg(short = 'n', long)]
    threads: Option<usize>,
    /// Grid width in cells.
    #[arg(long)]
    width: Option<usize>,
    /// Grid height in cells.
    #[arg(long)]
    height: Option<usize>,
    /// Directory holding `<width>x<height>.pgm` input images.
    #[arg(long, value_name = "DIR", default_value = "images")]
    images: PathBuf,
    /// Directory final and snapshot images are written to.
    #[arg(long, value_name = "DIR", default_value = "out")]
    out: PathBuf,
    /// JSON seed file used instead of an input image.
    #[arg(long, value_name = "FILE")]
    seed: Option<PathBuf>,
    /// Milliseconds between live-cell reports.
    #[arg(long = "tick-ms", value_name = "MILLISECONDS")]
    tick_ms: Option<u64>,
    /// Do not emit per-cell flip events.
    #[arg(long)]
    no_flips: bool,
    /// Print events as JSON lines.
    #[arg(long)]
    json: bool,
    /// Print example parameters and seed, then exit.
    #[arg(long)]
    example: bool,
}

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let cli = Cli::parse();
    if cli.example {
        print_example_config();
        return;
    }

    let params = load_params(&cli);
    let pgm = PgmStore::new(&cli.images, &cli.out);
    let store: Box<dyn ImageStore> = match &cli.seed {
        Some(path) => Box::new(SeededStore::new(read_json::<Seed>(path), pgm)),
        None => Box::new(pgm),
    };

    println!("Game of Life");
    println!("============");
    println!("Grid: {}x{}", params.image_width, params.image_height);
    println!("Threads: {}", params.threads);
    println!("Turns: {}", params.turns);
    println!();

    let (events_tx, events_rx) = unbounded::<Event>();
    let (signals_tx, signals_rx) = unbounded::<ControlSignal>();
    spawn_key_reader(signals_tx);

    let start = Instant::now();
    let run = gol_distributor::spawn(params, store, events_tx, signals_rx).unwrap_or_else(|e| {
        eprintln!("Error starting simulation: {}", e);
        std::process::exit(1);
    });

    for event in events_rx {
        if cli.json {
            match serde_json::to_string(&event) {
                Ok(line) => println!("{}", line),
                Err(e) => log::warn!("could not encode event: {}", e),
            }
            continue;
        }
        match event {
            Event::CellFlipped { .. } => {}
            Event::TurnComplete { turn } => log::debug!("turn {} complete", turn),
            other => println!("{}", other),
        }
    }

    let summary = match run.join() {
        Ok(Ok(summary)) => summary,
        Ok(Err(e)) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
        Err(_) => {
            eprintln!("Error: simulation thread panicked");
            std::process::exit(1);
        }
    };

    let elapsed = start.elapsed();
    println!();
    println!("Completed turns: {}", summary.completed_turns);
    println!("Alive cells: {}", summary.alive_cells.len());
    println!("Output: {}", cli.out.join(format!("{}.pgm", summary.output)).display());
    println!(
        "Time: {:.2}s ({:.1} turns/s)",
        elapsed.as_secs_f32(),
        summary.completed_turns as f32 / elapsed.as_secs_f32()
    );
}

fn load_params(cli: &Cli) -> Params {
    let mut params = match &cli.config {
        Some(path) => read_json::<Params>(path),
        None => Params::default(),
    };
    if let Some(turns) = cli.turns {
        params.turns = turns;
    }
    if let Some(threads) = cli.threads {
        params.threads = threads;
    }
    if let Some(width) = cli.width {
        params.image_width = width;
    }
    if let Some(height) = cli.height {
        params.image_height = height;
    }
    if let Some(tick_ms) = cli.tick_ms {
        params.tick_interval_ms = tick_ms;
    }
    if cli.no_flips {
        params.emit_cell_flips = false;
    }
    params
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> T {
    let text = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {}", path.display(), e);
        std::process::exit(1);
    });
    serde_json::from_str(&text).unwrap_or_else(|e| {
        eprintln!("Error parsing {}: {}", path.display(), e);
        std::process::exit(1);
    })
}

/// Forward control keys typed on stdin until it closes.
fn spawn_key_reader(signals: Sender<ControlSignal>) {
    let spawned = thread::Builder::new()
        .name("gol-keys".into())
        .spawn(move || {
            for byte in io::stdin().lock().bytes() {
                let Ok(byte) = byte else { break };
                if let Some(signal) = ControlSignal::from_key(byte as char) {
                    if signals.send(signal).is_err() {
                        break;
                    }
                }
            }
        });
    if let Err(e) = spawned {
        log::warn!("keyboard control unavailable: {}", e);
    }
}

fn print_example_config() {
    let params = Params::default();
    let seed = Seed::default();

    println!("Example parameters (params.json):");
    match serde_json::to_string_pretty(&params) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error encoding parameters: {}", e),
    }
    println!();
    println!("Example seed (seed.json):");
    match serde_json::to_string_pretty(&seed) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error encoding seed: {}", e),
    }
}
