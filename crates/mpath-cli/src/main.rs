//! `mpath` CLI: analyse a multipath scene, print chart samples, run motion scenarios.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use mpath_core::doppler::path_shifts_hz;
use mpath_core::logging::{init_logging, LogLevel};
use mpath_core::{ChannelAnalysis, ChannelAnalyzer, Direction, MpathConfig, SceneParameters};
use mpath_sim::{ScenarioConfig, ScenarioEngine};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mpath", version, about = "Multipath channel analysis")]
struct Cli {
    /// Configuration file (default: search MPATH_CONFIG, ./mpath.yaml, user and system dirs)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Start from a named preset in the configuration
    #[arg(long, global = true)]
    preset: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<LogLevel>,

    #[command(flatten)]
    scene: SceneArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Overrides applied on top of the configured scene
#[derive(Args, Debug, Default)]
struct SceneArgs {
    /// Transmitter-wall distance d in metres
    #[arg(long, global = true)]
    wall_distance: Option<f64>,

    /// Transmitter-receiver distance r in metres
    #[arg(long, global = true)]
    receiver_distance: Option<f64>,

    /// Carrier frequency in MHz
    #[arg(long, global = true)]
    frequency: Option<f64>,

    /// Receiver speed in m/s
    #[arg(long, global = true, allow_negative_numbers = true)]
    velocity: Option<f64>,

    /// Motion direction (approaching, receding)
    #[arg(long, global = true)]
    direction: Option<Direction>,

    /// Remove the left wall
    #[arg(long, global = true)]
    no_left_wall: bool,

    /// Remove the right wall
    #[arg(long, global = true)]
    no_right_wall: bool,
}

impl SceneArgs {
    fn apply(&self, mut scene: SceneParameters) -> SceneParameters {
        if let Some(d) = self.wall_distance {
            scene.wall_distance_m = d;
        }
        if let Some(r) = self.receiver_distance {
            scene.receiver_distance_m = r;
        }
        if let Some(f) = self.frequency {
            scene.carrier_frequency_mhz = f;
        }
        if let Some(v) = self.velocity {
            scene.velocity_mps = v;
        }
        if let Some(direction) = self.direction {
            scene.direction = direction;
        }
        if self.no_left_wall {
            scene.left_wall_active = false;
        }
        if self.no_right_wall {
            scene.right_wall_active = false;
        }
        scene
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Paths, phase differences, Doppler spread and delay spread for the scene.
    Analyze,
    /// Direct and reflected chart samples over one carrier period.
    Waveform,
    /// Move the receiver and print channel snapshots.
    Scenario {
        /// Duration in seconds
        #[arg(long)]
        duration: Option<f64>,
        /// Time step in seconds
        #[arg(long)]
        step: Option<f64>,
    },
    /// Configuration helpers.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print an example configuration file.
    Example,
    /// Print the effective configuration.
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = effective_config(&cli, load_config(&cli)?)?;
    init_logging(&config.logging);
    tracing::debug!(scene = ?config.scene, "effective scene");

    match cli.command {
        Commands::Analyze => run_analyze(&config, cli.json),
        Commands::Waveform => run_waveform(&config, cli.json),
        Commands::Scenario { duration, step } => {
            let mut timing = ScenarioConfig::from(config.scenario);
            if let Some(duration) = duration {
                timing.duration_s = duration;
            }
            if let Some(step) = step {
                timing.step_s = step;
            }
            run_scenario(&config, timing, cli.json)
        }
        Commands::Config { action } => match action {
            ConfigAction::Example => {
                print!("{}", MpathConfig::example_yaml());
                Ok(())
            }
            ConfigAction::Show => {
                print!("{}", config.to_yaml()?);
                Ok(())
            }
        },
    }
}

fn load_config(cli: &Cli) -> Result<MpathConfig> {
    let config = match cli.config {
        Some(ref path) => MpathConfig::load_from(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => MpathConfig::load()?,
    };

    match cli.preset {
        Some(ref name) => Ok(config.with_preset(name)?),
        None => Ok(config),
    }
}

/// Apply command-line overrides and reject unusable settings
fn effective_config(cli: &Cli, mut config: MpathConfig) -> Result<MpathConfig> {
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    config.scene = cli.scene.apply(config.scene);
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn analyzer_for(config: &MpathConfig) -> ChannelAnalyzer {
    ChannelAnalyzer::new(config.waveform)
}

fn run_analyze(config: &MpathConfig, json: bool) -> Result<()> {
    let analysis = analyzer_for(config)
        .analyze(&config.scene)
        .context("scene failed validation")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        print_analysis(&analysis);
    }
    Ok(())
}

fn print_analysis(analysis: &ChannelAnalysis) {
    let p = &analysis.params;
    println!(
        "Scene: d = {} m, r = {} m, f = {} MHz, v = {} m/s ({})",
        p.wall_distance_m,
        p.receiver_distance_m,
        p.carrier_frequency_mhz,
        p.speed_mps(),
        p.direction
    );

    println!();
    println!("Paths:");
    for path in &analysis.paths {
        println!(
            "  {:<24} {:<12} {:>10.3} m  {:>10.4} µs",
            path.kind.label(),
            path.distance.symbolic(),
            path.base_distance_m,
            path.delay_us()
        );
    }

    println!();
    if analysis.phases.is_empty() {
        println!("Phase difference: no reflections");
    } else {
        println!("Phase difference:");
        for phase in &analysis.phases {
            println!(
                "  {:<24} Δθ = {}π  {}",
                phase.path.label(),
                phase.display_multiple(),
                phase.class
            );
        }
    }

    println!();
    println!("Doppler spread: {} Hz ({:?})", analysis.doppler_spread_hz, analysis.case.doppler);
    if p.is_moving() {
        for (kind, shift) in path_shifts_hz(&analysis.paths) {
            println!("  {:<24} {:+.3} Hz", kind.label(), shift);
        }
    }

    println!();
    match analysis.delay_spread {
        Some(spread) => {
            if let Some(formula) = analysis.case.delay_spread.formula() {
                println!("{}", formula);
            }
            println!("Delay spread: {:.4} µs", spread.delay_spread_us);
            println!("Coherence bandwidth: {}", spread.coherence_bandwidth);
        }
        None => println!("Delay spread: not applicable (direct path only)"),
    }
}

fn run_waveform(config: &MpathConfig, json: bool) -> Result<()> {
    let analysis = analyzer_for(config)
        .analyze(&config.scene)
        .context("scene failed validation")?;

    let Some(samples) = analysis.waveform else {
        tracing::info!("no active wall, no reflected waveform");
        if json {
            println!("[]");
        }
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&samples)?);
        return Ok(());
    }

    let label = analysis.reflected_label.unwrap_or_default();
    println!("{:>8}  {:>10}  {:>10}", "t", "Direct", label);
    for s in &samples {
        println!(
            "{:>8.2}  {:>10.4}  {:>10.4}",
            s.time, s.direct_amplitude, s.reflected_amplitude
        );
    }
    Ok(())
}

fn run_scenario(config: &MpathConfig, timing: ScenarioConfig, json: bool) -> Result<()> {
    let engine = ScenarioEngine::with_analyzer(config.scene, timing, analyzer_for(config))
        .context("scenario setup failed")?;
    let snapshots = engine.run();

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshots)?);
        return Ok(());
    }

    if let Some(boundary) = engine.trajectory().time_to_boundary() {
        println!("Receiver leaves the scene after {:.3} s", boundary);
    }
    println!(
        "{:>8}  {:>10}  {:>12}  {:>10}",
        "t (s)", "r (m)", "T_d (µs)", "|E|"
    );
    for snap in &snapshots {
        let spread = snap
            .delay_spread_us
            .map(|td| format!("{:.4}", td))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>8.3}  {:>10.3}  {:>12}  {:>10.5}",
            snap.time_s, snap.receiver_distance_m, spread, snap.received_magnitude
        );
    }
    Ok(())
}
