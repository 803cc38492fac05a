use ndarray::Array1;
use serde::Serialize;
use tracing::warn;

use crate::{
    disc::{mesh::mesh1d::Mesh1d, transport::default_schemes},
    error::ConfigError,
    io::param_parser::{ProfileKind, SolverParamParser},
    solver::{Solver, SolverParameters},
};

/// Initial density profile, centred in the domain.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum InitialProfile {
    /// `width` cells at `amplitude`, zero elsewhere.
    Square { amplitude: f64, width: usize },
    /// Standard deviation is `sigma_fraction` of the domain length.
    Gaussian { amplitude: f64, sigma_fraction: f64 },
}
impl InitialProfile {
    pub fn sample(&self, mesh: &Mesh1d) -> Array1<f64> {
        match *self {
            InitialProfile::Square { amplitude, width } => {
                let start = mesh.cell_num.saturating_sub(width) / 2;
                let end = start + width;
                Array1::from_shape_fn(mesh.cell_num, |icell| {
                    if (start..end).contains(&icell) { amplitude } else { 0.0 }
                })
            }
            InitialProfile::Gaussian {
                amplitude,
                sigma_fraction,
            } => {
                let length = mesh.length();
                let center = 0.5 * length;
                let sigma = sigma_fraction * length;
                mesh.cell_centers()
                    .mapv(|x| amplitude * (-0.5 * ((x - center) / sigma).powi(2)).exp())
            }
        }
    }
}

fn ensure_positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}
fn ensure_non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Negative { name, value })
    }
}
fn ensure_finite(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { name, value })
    }
}
/// Validates raw parameters into solver parameters and an initial profile.
pub fn initialize_params(
    param: &SolverParamParser,
) -> Result<(SolverParameters, InitialProfile), ConfigError> {
    if param.cell_num == 0 {
        return Err(ConfigError::NoCells);
    }
    ensure_positive("dx", param.dx)?;
    ensure_positive("dt", param.dt)?;
    ensure_non_negative("final_time", param.final_time)?;
    ensure_non_negative("density_floor", param.density_floor)?;
    ensure_finite("velocity", param.velocity)?;
    ensure_non_negative("amplitude", param.amplitude)?;
    let profile = match param.profile {
        ProfileKind::Square => {
            if param.pulse_width == 0 || param.pulse_width > param.cell_num {
                return Err(ConfigError::PulseWidth {
                    width: param.pulse_width,
                    cell_num: param.cell_num,
                });
            }
            InitialProfile::Square {
                amplitude: param.amplitude,
                width: param.pulse_width,
            }
        }
        ProfileKind::Gaussian => {
            ensure_positive("sigma_fraction", param.sigma_fraction)?;
            InitialProfile::Gaussian {
                amplitude: param.amplitude,
                sigma_fraction: param.sigma_fraction,
            }
        }
    };
    let solver_params = SolverParameters {
        cell_num: param.cell_num,
        dx: param.dx,
        velocity: param.velocity,
        dt: param.dt,
        final_time: param.final_time,
        final_step: (param.final_time / param.dt).round() as usize,
        density_floor: param.density_floor,
    };
    let cfl = solver_params.cfl();
    if cfl > 1.0 {
        warn!("CFL number {cfl:.3} exceeds 1, the explicit schemes may become unstable");
    }
    if param.cell_num < 3 {
        warn!("{} cells leave no interior cell to transport", param.cell_num);
    }
    Ok((solver_params, profile))
}
pub fn initialize_mesh1d(solver_param: &SolverParameters) -> Mesh1d {
    Mesh1d::new(solver_param.cell_num, solver_param.dx)
}
/// Uniform advection velocity at every cell centre.
pub fn initialize_velocity(mesh: &Mesh1d, velocity: f64) -> Array1<f64> {
    Array1::from_elem(mesh.cell_num, velocity)
}
/// Builds a solver running the three transport schemes from the same initial field.
pub fn initialize_solver(solver_param: &SolverParameters, profile: &InitialProfile) -> Solver {
    let mesh = initialize_mesh1d(solver_param);
    let initial_sol = profile.sample(&mesh);
    let velocity = initialize_velocity(&mesh, solver_param.velocity);
    Solver::new(mesh, solver_param.clone(), initial_sol, velocity, default_schemes())
}
