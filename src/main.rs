use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, ValueEnum};
use macroquad::prelude::*;

use preygrid::config::TICKS_PER_SECOND;
use preygrid::reporting::RunReport;
use preygrid::{Scenario, SimConfig, SimSettings, Simulation};

mod frames;
mod renderer;
mod ui;

use frames::FrameWriter;
use ui::UiState;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Preset {
    PredatorPrey,
    ThreeWay,
}

/// Grid predator/prey ecosystem simulator.
#[derive(Parser, Debug)]
#[command(name = "preygrid", version, about)]
struct Cli {
    /// Run without a window and exit after `--ticks` ticks.
    #[arg(long)]
    headless: bool,

    /// Ticks to run in headless mode.
    #[arg(long, default_value_t = 200)]
    ticks: u64,

    /// RNG seed; drawn at random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Built-in scenario, ignored when `--config` is given.
    #[arg(long, value_enum, default_value_t = Preset::PredatorPrey)]
    preset: Preset,

    /// JSON file holding a scenario and parameters.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write a JSON run report here after a headless run.
    #[arg(long)]
    report: Option<PathBuf>,

    /// Write a map and a population plot PNG per tick under this directory
    /// during a headless run.
    #[arg(long)]
    frames: Option<PathBuf>,
}

fn window_conf() -> Conf {
    Conf {
        window_title: "preygrid".to_string(),
        window_width: 1280,
        window_height: 800,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

fn load_settings(cli: &Cli) -> anyhow::Result<SimSettings> {
    if let Some(path) = &cli.config {
        return SimSettings::load(path)
            .with_context(|| format!("failed to load settings from {}", path.display()));
    }
    Ok(match cli.preset {
        Preset::PredatorPrey => SimSettings {
            scenario: Scenario::predator_prey(),
            config: SimConfig::default(),
        },
        Preset::ThreeWay => SimSettings {
            scenario: Scenario::three_way(),
            config: SimConfig::multi_species(),
        },
    })
}

fn run_headless(
    mut sim: Simulation,
    seed: u64,
    ticks: u64,
    report: Option<PathBuf>,
    frames: Option<FrameWriter>,
) -> anyhow::Result<()> {
    for _ in 0..ticks {
        if let Some(frames) = &frames {
            frames.write(&sim)?;
        }
        sim.advance_one_tick();
        if sim.is_extinct() {
            log::info!("all types extinct at tick {}", sim.tick_count());
            break;
        }
    }

    let counts = sim.store().aggregate_counts_by_type();
    log::info!("finished after {} ticks: {}", sim.tick_count(), sim.population_line(&counts));

    if let Some(path) = report {
        RunReport::from_sim(&sim, seed)
            .save(&path)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        log::info!("report written to {}", path.display());
    }
    Ok(())
}

async fn viewer(mut sim: Simulation) {
    let mut ui_state = UiState::default();
    let mut accumulator = 0.0f64;

    loop {
        accumulator += (get_frame_time() as f64).min(0.25);

        if is_key_pressed(KeyCode::Space) {
            ui_state.paused = !ui_state.paused;
        }
        if is_key_pressed(KeyCode::N) {
            ui_state.step_requested = true;
        }

        let tick_dt = 1.0 / (TICKS_PER_SECOND * ui_state.speed_multiplier as f64);
        if ui_state.paused {
            accumulator = 0.0;
            if ui_state.step_requested {
                sim.advance_one_tick();
            }
        } else {
            while accumulator >= tick_dt {
                sim.advance_one_tick();
                accumulator -= tick_dt;
            }
        }
        ui_state.step_requested = false;

        renderer::draw(&sim, ui_state.paused);
        ui::draw_ui(&sim, &mut ui_state);

        next_frame().await;
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let settings = load_settings(&cli)?;
    let seed = cli.seed.unwrap_or_else(::rand::random);
    log::info!("seed {seed}");

    let sim = Simulation::new(&settings.scenario, settings.config, seed)
        .context("failed to build simulation")?;

    if cli.headless {
        let frames = cli.frames.as_deref().map(FrameWriter::create).transpose()?;
        return run_headless(sim, seed, cli.ticks, cli.report, frames);
    }

    if cli.report.is_some() || cli.frames.is_some() {
        log::warn!("--report and --frames are only written in headless mode");
    }
    macroquad::Window::from_config(window_conf(), viewer(sim));
    Ok(())
}
