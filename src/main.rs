mod disc;
mod error;
mod initialization;
mod io;
mod solver;
mod validation;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

use crate::io::{
    param_parser::{ProfileKind, SolverParamParser},
    write_to_csv::{CsvWriter, RunMetadata},
};

/// Advects a density pulse along a 1-D grid with the Lax-Friedrichs, first-order upwind and
/// flux-corrected transport schemes and writes all three fields at every step.
#[derive(Parser, Debug)]
#[command(name = "transport1d", version, about, long_about = None)]
struct Cli {
    /// JSON parameter file; the flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Number of cells [default: 1000]
    #[arg(short = 'n', long)]
    cells: Option<usize>,
    /// Cell width [m] [default: 1.0]
    #[arg(long)]
    dx: Option<f64>,
    /// Uniform advection velocity [m/s] [default: 10.0]
    #[arg(short, long, allow_negative_numbers = true)]
    velocity: Option<f64>,
    /// Total simulated time [s] [default: 10.0]
    #[arg(short = 't', long)]
    final_time: Option<f64>,
    /// Time step [s] [default: 0.1]
    #[arg(long)]
    dt: Option<f64>,
    /// Densities below this value are set to zero after each step [default: 1e-6]
    #[arg(long)]
    density_floor: Option<f64>,
    /// Initial profile [default: square]
    #[arg(short, long, value_enum)]
    profile: Option<ProfileKind>,
    /// Peak density of the initial profile [default: 25.0]
    #[arg(short, long)]
    amplitude: Option<f64>,
    /// Width of the square pulse in cells [default: 100]
    #[arg(short = 'w', long)]
    pulse_width: Option<usize>,
    /// Gaussian standard deviation as a fraction of the domain length [default: 0.05]
    #[arg(short, long)]
    sigma_fraction: Option<f64>,
    /// Output CSV path [default: outputs/transport.csv]
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}
impl Cli {
    fn override_params(&self, param: &mut SolverParamParser) {
        if let Some(cells) = self.cells {
            param.cell_num = cells;
        }
        if let Some(dx) = self.dx {
            param.dx = dx;
        }
        if let Some(velocity) = self.velocity {
            param.velocity = velocity;
        }
        if let Some(final_time) = self.final_time {
            param.final_time = final_time;
        }
        if let Some(dt) = self.dt {
            param.dt = dt;
        }
        if let Some(density_floor) = self.density_floor {
            param.density_floor = density_floor;
        }
        if let Some(profile) = self.profile {
            param.profile = profile;
        }
        if let Some(amplitude) = self.amplitude {
            param.amplitude = amplitude;
        }
        if let Some(pulse_width) = self.pulse_width {
            param.pulse_width = pulse_width;
        }
        if let Some(sigma_fraction) = self.sigma_fraction {
            param.sigma_fraction = sigma_fraction;
        }
        if let Some(output) = &self.output {
            param.output = output.clone();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut param = match &cli.config {
        Some(path) => SolverParamParser::parse(path)?,
        None => SolverParamParser::default(),
    };
    cli.override_params(&mut param);
    let (solver_param, profile) =
        initialization::initialize_params(&param).context("invalid run parameters")?;
    info!("initial profile: {profile:?}");

    let mut solver = initialization::initialize_solver(&solver_param, &profile);
    let metadata = RunMetadata::new(&solver_param, &profile, &solver.scheme_names());
    let mut writer = CsvWriter::create(&param.output, &metadata)
        .with_context(|| format!("failed to create output {}", param.output.display()))?;

    let report = solver.solve(&mut writer);
    info!(
        "initial mass {:.6e}, t = {} after {} steps",
        report.initial_mass, report.final_time, report.steps_completed
    );
    for summary in &report.schemes {
        info!(
            "{:>14}: mass {:.6e}, peak {:.6}, min {:.6}",
            summary.name, summary.mass, summary.peak, summary.trough
        );
    }
    match report.output_failure {
        Some(err) => warn!(
            "output stopped after {} of {} steps, {} holds a partial result: {:#}",
            report.steps_written,
            solver_param.final_step,
            param.output.display(),
            anyhow::Error::from(err)
        ),
        None => info!(
            "wrote {} (cell centres in {})",
            param.output.display(),
            writer.coords_path().display()
        ),
    }
    Ok(())
}
