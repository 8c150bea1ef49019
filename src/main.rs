use clap::{Parser, Subcommand};

use ferrous_select::simd_abstraction::{
    LaneType, SimdEngineType, detect_optimal_simd_engine, simd_engine_description,
};
use ferrous_select::verify::{self, Primitive, VerifyConfig, config::parse_seed};

#[derive(Parser)]
#[command(name = "ferrous-select")]
#[command(
    about = "FerrousSelect - lane-wise conditional selection with differential verification",
    long_about = None
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify the selection primitives against scalar expectations
    Verify {
        /// Primitive to verify (repeatable; default: all)
        #[arg(short = 'p', long = "primitive", value_name = "PRIMITIVE")]
        primitives: Vec<Primitive>,

        /// Randomized repetitions per configuration before scaling
        #[arg(short = 'r', long, value_name = "INT")]
        reps: Option<usize>,

        /// Base seed, decimal or 0x hex
        #[arg(short = 's', long, value_name = "SEED", value_parser = parse_seed)]
        seed: Option<u64>,

        /// Widest engine to verify (default: detected)
        #[arg(short = 'e', long, value_name = "ENGINE")]
        engine: Option<SimdEngineType>,

        /// Run configurations one at a time
        #[arg(long)]
        sequential: bool,

        /// Number of threads (default: all available cores)
        #[arg(short = 't', long, value_name = "INT")]
        threads: Option<usize>,

        /// Verbose level: 1=error, 2=warning, 3=message, 4+=debugging
        #[arg(short = 'v', long, value_name = "INT", default_value = "3")]
        verbosity: i32,
    },

    /// Show the detected engine and its lane counts
    Engines,
}

fn init_logger(verbosity: i32) {
    let log_level = match verbosity {
        v if v <= 1 => log::LevelFilter::Error,
        2 => log::LevelFilter::Warn,
        3 => log::LevelFilter::Info,
        4 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace, // 5+ = trace
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn configure_threads(threads: Option<usize>) {
    let mut num_threads = threads.unwrap_or_else(num_cpus::get);
    if num_threads < 1 {
        log::warn!("Invalid thread count {}, using 1 thread", num_threads);
        num_threads = 1;
    }

    match rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()
    {
        Ok(_) => log::debug!("Built global Rayon thread pool with {} threads", num_threads),
        Err(e) => log::warn!(
            "Failed to configure thread pool: {} (may already be initialized)",
            e
        ),
    }
}

fn run_verify(primitives: Vec<Primitive>, config: &VerifyConfig) -> anyhow::Result<()> {
    let primitives = if primitives.is_empty() {
        Primitive::ALL.to_vec()
    } else {
        primitives
    };

    let mut total = 0;
    for primitive in primitives {
        let report = verify::run_primitive(primitive, config)?;
        total += report.configurations;
    }
    log::info!("All {} configurations passed", total);
    Ok(())
}

fn print_engines() {
    let detected = detect_optimal_simd_engine();
    println!("Detected: {} ({})", detected, simd_engine_description(detected));
    for engine in SimdEngineType::all() {
        let marker = if engine == detected { '*' } else { ' ' };
        let lanes: Vec<String> = LaneType::ALL
            .iter()
            .map(|t| format!("{}={}", t, engine.max_lanes(t.bytes())))
            .collect();
        println!("{} {:>6}  {}", marker, engine.name(), lanes.join(" "));
    }
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Verify {
            primitives,
            reps,
            seed,
            engine,
            sequential,
            threads,
            verbosity,
        } => {
            init_logger(verbosity);

            // Environment first, command line overrides
            let mut config = VerifyConfig::from_env();
            if let Some(engine) = engine {
                config = config.with_engine(engine);
            }
            if let Some(reps) = reps {
                config.reps = reps;
            }
            if let Some(seed) = seed {
                config.seed = seed;
            }
            config.parallel = !sequential;

            if config.parallel {
                configure_threads(threads);
            }

            log::info!(
                "Engines: {} | seed 0x{:x} | {} reps per configuration",
                config
                    .engines
                    .iter()
                    .map(|e| e.name())
                    .collect::<Vec<_>>()
                    .join(", "),
                config.seed,
                config.adjusted_reps()
            );

            if let Err(e) = run_verify(primitives, &config) {
                log::error!("Verification failed: {}", e);
                std::process::exit(1);
            }
        }

        Commands::Engines => print_engines(),
    }
}
