//! # Morphogen Command Line Entry Point
//!
//! Runs single core computations and prints the result as JSON. Useful for
//! checking that a client build agrees with the server on a given seed.

use clap::{Parser, Subcommand};
use log::{debug, info};
use morphogen::{
    diminishing_multiplier, plan_decorative_layout, plan_organic_cluster,
    resolve_damage_with_breakdown, ClusterOptions, CombatQuery, EntityFactory, EntityOverrides,
    MorphogenError, MorphogenResult, RandomStream, SpawnConfig, SpawnKind,
};
use serde::Serialize;
use std::path::PathBuf;

/// Command line arguments for the Morphogen tool.
#[derive(Parser, Debug)]
#[command(name = "morphogen")]
#[command(about = "Deterministic spawn planning and combat resolution")]
#[command(version)]
struct Args {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plan one organic-matter cluster
    Plan {
        /// Region seed; a random one is chosen when omitted
        #[arg(short, long)]
        seed: Option<u32>,

        /// Remaining spawn capacity
        #[arg(short, long, default_value_t = 10)]
        remaining: u32,

        /// Inner scatter radius (defaults to the config value)
        #[arg(long)]
        scatter_min: Option<f64>,

        /// Scatter band width (defaults to the config value)
        #[arg(long)]
        scatter_radius: Option<f64>,

        /// Force the cluster kind
        #[arg(long)]
        kind: Option<SpawnKind>,

        /// Force the cluster size
        #[arg(long)]
        size: Option<u32>,

        /// JSON spawn configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Plan a decorative layout
    Layout {
        #[arg(short, long)]
        seed: Option<u32>,

        /// Number of points requested
        #[arg(short, long, default_value_t = 8)]
        count: u32,

        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Materialize a single entity from a seed
    Materialize {
        #[arg(short, long)]
        seed: Option<u32>,

        #[arg(short, long, default_value = "protein")]
        kind: SpawnKind,

        /// Draw each attribute from its own child stream
        #[arg(long)]
        keyed: bool,

        /// Override the size
        #[arg(long)]
        size: Option<f64>,

        /// Override the color
        #[arg(long)]
        color: Option<String>,
    },

    /// Resolve one combat hit
    Combat {
        #[arg(short, long)]
        attacker: String,

        #[arg(short, long)]
        defender: String,

        /// neutral, attuned or divergent
        #[arg(long, default_value = "neutral")]
        affinity: String,

        /// Attacker's innate element
        #[arg(long)]
        innate: Option<String>,

        /// Defender resistance as element=value, repeatable
        #[arg(long = "resist", value_parser = parse_resistance)]
        resistances: Vec<(String, f64)>,
    },

    /// Diminishing-returns multiplier for a repeated upgrade
    Diminishing {
        /// Earlier purchases of the same upgrade
        #[arg(short, long, default_value_t = 0)]
        purchases: u32,

        #[arg(short, long, default_value = "small")]
        tier: String,

        #[arg(long)]
        rate: Option<f64>,

        #[arg(long)]
        minimum: Option<f64>,
    },
}

fn main() -> MorphogenResult<()> {
    let args = Args::parse();

    initialize_logging(&args.log_level)?;
    debug!("Morphogen v{} (wire version {})", morphogen::VERSION, morphogen::config::WIRE_VERSION);

    match args.command {
        Command::Plan {
            seed,
            remaining,
            scatter_min,
            scatter_radius,
            kind,
            size,
            config,
        } => {
            let config = load_config(config)?;
            let mut options = ClusterOptions::from_config(remaining, &config);
            if let Some(scatter_min) = scatter_min {
                options.scatter_min = scatter_min;
            }
            if let Some(scatter_radius) = scatter_radius {
                options.scatter_radius = scatter_radius;
            }
            if let Some(kind) = kind {
                options = options.with_kind(kind);
            }
            if let Some(size) = size {
                options = options.with_size(size);
            }

            let plan = plan_organic_cluster(resolve_seed(seed), &options, &config);
            print_json(&plan, args.pretty)
        }
        Command::Layout {
            seed,
            count,
            config,
        } => {
            let config = load_config(config)?;
            let layout = plan_decorative_layout(resolve_seed(seed), count, &config);
            print_json(&layout, args.pretty)
        }
        Command::Materialize {
            seed,
            kind,
            keyed,
            size,
            color,
        } => {
            let seed = resolve_seed(seed);
            let mut overrides = EntityOverrides::none();
            if let Some(size) = size {
                overrides = overrides.with_size(size);
            }
            if let Some(color) = color {
                overrides = overrides.with_color(color);
            }

            let factory = EntityFactory::new();
            let entity = if keyed {
                factory.materialize_keyed(seed, kind, &overrides)
            } else {
                factory.materialize(kind, &mut RandomStream::new(seed), &overrides)
            };
            print_json(&entity, args.pretty)
        }
        Command::Combat {
            attacker,
            defender,
            affinity,
            innate,
            resistances,
        } => {
            let mut query = CombatQuery::new(&attacker, &defender).with_affinity(&affinity);
            if let Some(innate) = innate {
                query = query.with_innate(&innate);
            }
            for (element, value) in resistances {
                query = query.with_resistance(&element, value);
            }
            print_json(&resolve_damage_with_breakdown(&query), args.pretty)
        }
        Command::Diminishing {
            purchases,
            tier,
            rate,
            minimum,
        } => {
            let multiplier = diminishing_multiplier(purchases, &tier, rate, minimum);
            print_json(&multiplier, args.pretty)
        }
    }
}

/// Initializes env_logger at the requested level. `RUST_LOG` still wins
/// when set.
fn initialize_logging(log_level: &str) -> MorphogenResult<()> {
    let level = match log_level.to_lowercase().as_str() {
        "error" => log::LevelFilter::Error,
        "warn" => log::LevelFilter::Warn,
        "info" => log::LevelFilter::Info,
        "debug" => log::LevelFilter::Debug,
        "trace" => log::LevelFilter::Trace,
        other => {
            return Err(MorphogenError::InvalidArgument(format!(
                "unknown log level '{}'",
                other
            )))
        }
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_target(false)
        .init();

    Ok(())
}

fn resolve_seed(seed: Option<u32>) -> u32 {
    match seed {
        Some(seed) => seed,
        None => {
            let seed = rand::random::<u32>();
            info!("Using random seed {}", seed);
            seed
        }
    }
}

fn load_config(path: Option<PathBuf>) -> MorphogenResult<SpawnConfig> {
    let config = match path {
        Some(path) => {
            info!("Loading spawn config from {}", path.display());
            SpawnConfig::load(&path)?
        }
        None => SpawnConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn parse_resistance(raw: &str) -> Result<(String, f64), MorphogenError> {
    let (element, value) = raw.split_once('=').ok_or_else(|| {
        MorphogenError::InvalidArgument(format!("expected element=value, got '{}'", raw))
    })?;
    let value = value.trim().parse::<f64>().map_err(|e| {
        MorphogenError::InvalidArgument(format!("bad resistance value in '{}': {}", raw, e))
    })?;
    Ok((element.trim().to_string(), value))
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> MorphogenResult<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", json);
    Ok(())
}
