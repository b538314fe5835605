use aura_core::{
    CellStatus, ExecutionMode, FireRiskSimulation, GridPreset, KilometersPerHour, Percent,
    SimulationConfig, VegetationCatalog,
};
use clap::{Parser, ValueEnum};
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Widest ASCII map printed with `--ascii`
const MAX_ASCII_WIDTH: usize = 96;

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Preset {
    Small,
    Standard,
    Large,
}

impl From<Preset> for GridPreset {
    fn from(preset: Preset) -> Self {
        match preset {
            Preset::Small => GridPreset::Small,
            Preset::Standard => GridPreset::Standard,
            Preset::Large => GridPreset::Large,
        }
    }
}

/// Fire risk simulation demo with configurable parameters
#[derive(Parser, Debug)]
#[command(name = "aura-headless")]
#[command(about = "Stochastic wildfire spread with risk diagnostics", long_about = None)]
struct Args {
    /// Load the run configuration from a JSON file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the effective run configuration to a JSON file and exit
    #[arg(long)]
    save_config: Option<PathBuf>,

    /// Grid size preset (ignored when --config is given)
    #[arg(short, long, value_enum, default_value_t = Preset::Standard)]
    preset: Preset,

    /// Override grid rows
    #[arg(long)]
    rows: Option<usize>,

    /// Override grid columns
    #[arg(long)]
    cols: Option<usize>,

    /// Master random seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Process rows on the calling thread instead of the thread pool
    #[arg(long)]
    sequential: bool,

    /// Wind direction in degrees (0=East, 90=North)
    #[arg(long, default_value_t = 90.0)]
    wind_angle: f32,

    /// Wind speed in km/h (0-100)
    #[arg(short, long, default_value_t = 15.0)]
    wind_kmh: f32,

    /// Relative humidity in % applied to every cell (default: random per cell)
    #[arg(long)]
    humidity: Option<f32>,

    /// Temperature in °C applied to every cell
    #[arg(short, long)]
    temperature: Option<f32>,

    /// Drought level in % (0-100)
    #[arg(short, long, default_value_t = 0.0)]
    drought: f32,

    /// Vegetation type by catalog name
    #[arg(short, long)]
    vegetation: Option<String>,

    /// List the vegetation catalog and exit
    #[arg(long)]
    list_vegetation: bool,

    /// Stop after this many ticks even if the fire is still burning
    #[arg(short, long, default_value_t = 1_000)]
    max_ticks: u64,

    /// Print diagnostics every N ticks
    #[arg(short, long, default_value_t = 5)]
    report_interval: u64,

    /// Print a downsampled map of the final grid
    #[arg(short, long)]
    ascii: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let args = Args::parse();

    if args.list_vegetation {
        print_catalog();
        return Ok(());
    }

    let config = build_config(&args)?;
    if let Some(path) = &args.save_config {
        fs::write(path, serde_json::to_string_pretty(&config)?)?;
        println!("Wrote configuration to {}", path.display());
        return Ok(());
    }

    println!("=== Fire Risk Simulation Demo ===\n");

    let mut sim = FireRiskSimulation::new(config)?;
    sim.set_wind_kmh(args.wind_angle, KilometersPerHour::new(args.wind_kmh))?;
    sim.set_drought_percent(Percent::new(args.drought))?;
    if let Some(humidity) = args.humidity {
        sim.set_humidity_percent(Percent::new(humidity))?;
    }
    if let Some(temperature) = args.temperature {
        sim.set_temperature(temperature)?;
    }
    if let Some(name) = &args.vegetation {
        sim.select_vegetation(name)?;
    }

    let config = sim.config();
    let environment = sim.environment();
    let vegetation = sim.vegetation();
    println!(
        "Grid: {}x{} cells, seed {}, {:?} execution",
        config.rows, config.cols, config.seed, config.execution
    );
    println!(
        "Wind: {:.0}° at {} (strength {:.2}), Drought: {}",
        environment.wind_angle(),
        KilometersPerHour::from_wind_strength(environment.wind_strength()),
        environment.wind_strength(),
        Percent::new(environment.drought_level() * 100.0)
    );
    println!(
        "Vegetation: {} ({}), spread factor {:.1}\n",
        vegetation.name, vegetation.common_name, vegetation.spread_factor
    );

    println!("Tick  | Burning | Burned | Coverage | Fractal D | Control");
    println!("------|---------|--------|----------|-----------|--------");

    sim.start();
    let interval = args.report_interval.max(1);
    while sim.tick() < args.max_ticks {
        let Some(diagnostics) = sim.update() else {
            break;
        };
        if sim.tick() % interval == 0 || !sim.is_running() {
            let stats = sim.stats();
            println!(
                "{:5} | {:7} | {:6} | {:7.2}% | {:9.3} | {:7.3}",
                stats.tick,
                stats.burning,
                stats.burned_out,
                diagnostics.fire_coverage * 100.0,
                diagnostics.fractal_dimension,
                diagnostics.controllability
            );
        }
    }
    sim.stop();

    let stats = sim.stats();
    println!("\n=== Simulation Complete ===");
    println!("Ticks run: {}", stats.tick);
    println!("Still burning: {}", stats.burning);
    println!("Burned out: {}", stats.burned_out);
    println!("Unburned: {}", stats.unburned);
    println!("Area affected: {:.1}%", stats.affected_fraction() * 100.0);
    println!("Mean fuel remaining: {:.3}", stats.mean_fuel);

    if args.ascii {
        println!();
        print_ascii(&sim);
    }

    Ok(())
}

fn build_config(args: &Args) -> Result<SimulationConfig, Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => {
            let content = fs::read_to_string(path)
                .map_err(|e| format!("Failed to read config file {}: {e}", path.display()))?;
            let config: SimulationConfig = serde_json::from_str(&content)
                .map_err(|e| format!("Failed to parse config file {}: {e}", path.display()))?;
            info!("Loaded configuration from {}", path.display());
            config
        }
        None => SimulationConfig::from_preset(args.preset.into()),
    };
    if let Some(rows) = args.rows {
        config.rows = rows;
    }
    if let Some(cols) = args.cols {
        config.cols = cols;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if args.sequential {
        config.execution = ExecutionMode::Sequential;
    }
    config.validate()?;
    Ok(config)
}

fn print_catalog() {
    println!("{:<10} | {:<17} | Spread | Colour", "Name", "Common name");
    println!("-----------|-------------------|--------|--------");
    for vegetation in VegetationCatalog::standard().iter() {
        println!(
            "{:<10} | {:<17} | {:6.1} | {}",
            vegetation.name, vegetation.common_name, vegetation.spread_factor, vegetation.color
        );
    }
}

/// Print every `step`-th cell so wide grids fit a terminal
fn print_ascii(sim: &FireRiskSimulation) {
    let grid = sim.grid();
    let step = grid.cols().div_ceil(MAX_ASCII_WIDTH).max(1);
    for row in (0..grid.rows()).step_by(step) {
        let line: String = (0..grid.cols())
            .step_by(step)
            .map(|col| grid.status_at(row, col).glyph())
            .collect();
        println!("{line}");
    }
    println!(
        "\n{} unburned  {} burning  {} burned out",
        CellStatus::Tree.glyph(),
        CellStatus::Burning.glyph(),
        CellStatus::Empty.glyph()
    );
}
