//! Strider procedural stepping CLI.
//!
//! Provides two modes of operation:
//! - `walk`: Drive a body along a scripted path and print gait frames
//! - `config`: Print the default gait configuration as TOML

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use nalgebra::Vector3;
use strider_core::{BodyPose, GaitConfig, Side, StriderError};
use strider_gait::{FlatGround, GaitController, GroundProjector, NoGround, StepKind};
use tracing_subscriber::EnvFilter;

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

/// Procedural foot placement for bipeds.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Gait configuration file (TOML). Defaults are used when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk a body along a scripted path, then stand still.
    Walk(WalkArgs),

    /// Print the gait configuration as TOML.
    Config,
}

#[derive(clap::Args, Clone)]
struct WalkArgs {
    /// Forward speed in the body frame (m/s).
    #[arg(long, default_value_t = 1.5)]
    speed: f64,

    /// Sideways speed in the body frame, positive to the right (m/s).
    #[arg(long, default_value_t = 0.0)]
    strafe: f64,

    /// Turn rate about +Y (rad/s).
    #[arg(long, default_value_t = 0.0)]
    yaw_rate: f64,

    /// Seconds spent moving.
    #[arg(short, long, default_value_t = 3.0)]
    duration: f64,

    /// Seconds spent standing after the walk.
    #[arg(long, default_value_t = 1.0)]
    settle: f64,

    /// Tick length in seconds.
    #[arg(long, default_value_t = 0.02)]
    dt: f64,

    /// Print a JSON frame every N ticks (0 disables frames).
    #[arg(short, long, default_value_t = 0)]
    every: u64,

    /// Ground under the body.
    #[arg(short, long, value_enum, default_value_t = Terrain::Flat)]
    terrain: Terrain,
}

impl Default for WalkArgs {
    fn default() -> Self {
        Self {
            speed: 1.5,
            strafe: 0.0,
            yaw_rate: 0.0,
            duration: 3.0,
            settle: 1.0,
            dt: 0.02,
            every: 0,
            terrain: Terrain::Flat,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Terrain {
    /// Level ground at height 0.
    Flat,
    /// No ground at all; every probe misses.
    None,
    /// Slope rising 0.15 m per meter along +Z.
    Ramp,
}

// ---------------------------------------------------------------------------
// Walk
// ---------------------------------------------------------------------------

#[derive(Default)]
struct WalkSummary {
    ticks: u64,
    strides: [u32; 2],
    settles: u32,
    max_swinging: usize,
}

fn simulate<G: GroundProjector>(config: GaitConfig, ground: G, args: &WalkArgs) -> WalkSummary {
    let mut pose = BodyPose::at(ground.project_to_ground(&Vector3::zeros()));
    let mut ctrl = GaitController::new(config, ground, pose);
    let mut summary = WalkSummary::default();
    let local_velocity = Vector3::new(args.strafe, 0.0, args.speed);
    let mut yaw = 0.0_f64;
    let mut elapsed = 0.0_f64;

    let dt = args.dt.max(f64::EPSILON);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let ticks = ((args.duration + args.settle) / dt).round() as u64;

    for tick in 0..ticks {
        elapsed += dt;
        if elapsed <= args.duration {
            yaw += args.yaw_rate * dt;
            let heading = BodyPose::from_yaw(Vector3::zeros(), yaw).orientation;
            let mut position = pose.position + heading * local_velocity * dt;
            // Keep the body riding the terrain.
            position.y = ctrl.ground().project_to_ground(&position).y;
            pose = BodyPose::new(position, heading);
        }

        let steps = ctrl.advance(dt, &pose);
        for (i, side) in Side::BOTH.into_iter().enumerate() {
            match steps.get(side) {
                Some(StepKind::Stride) => summary.strides[i] += 1,
                Some(StepKind::Settle) => summary.settles += 1,
                None => {}
            }
        }
        let swinging = Side::BOTH
            .iter()
            .filter(|&&s| ctrl.foot(s).is_swinging())
            .count();
        summary.max_swinging = summary.max_swinging.max(swinging);
        summary.ticks += 1;

        if args.every > 0 && tick % args.every == 0 {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let timestamp_ns = (elapsed * 1e9) as u64;
            match serde_json::to_string(&ctrl.frame(timestamp_ns)) {
                Ok(line) => println!("{line}"),
                Err(e) => tracing::warn!(error = %e, "failed to encode frame"),
            }
        }
    }

    for side in Side::BOTH {
        let foot = ctrl.foot(side);
        tracing::info!(
            ?side,
            position = ?foot.position(),
            grounded = foot.is_grounded(),
            "final foot state"
        );
    }
    summary
}

fn run_walk(config: GaitConfig, args: &WalkArgs) {
    tracing::info!(
        speed = args.speed,
        strafe = args.strafe,
        yaw_rate = args.yaw_rate,
        duration = args.duration,
        "starting walk"
    );

    let summary = match args.terrain {
        Terrain::Flat => simulate(config, FlatGround::new(0.0), args),
        Terrain::None => simulate(config, NoGround, args),
        Terrain::Ramp => simulate(
            config,
            |p: &Vector3<f64>| Some(Vector3::new(p.x, 0.15 * p.z, p.z)),
            args,
        ),
    };

    println!(
        "ticks={}, strides: left={} right={}, settles={}, max_swinging={}",
        summary.ticks,
        summary.strides[0],
        summary.strides[1],
        summary.settles,
        summary.max_swinging
    );
}

fn load_config(path: Option<&PathBuf>) -> Result<GaitConfig, StriderError> {
    match path {
        Some(path) => {
            let config = GaitConfig::from_file(path)?;
            tracing::debug!(path = %path.display(), "loaded gait config");
            Ok(config)
        }
        None => Ok(GaitConfig::default()),
    }
}

fn run(cli: Cli) -> Result<(), StriderError> {
    let config = load_config(cli.config.as_ref())?;
    match cli.command {
        Some(Commands::Walk(args)) => run_walk(config, &args),
        Some(Commands::Config) => print!("{}", config.to_toml_string()?),
        None => run_walk(config, &WalkArgs::default()),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
