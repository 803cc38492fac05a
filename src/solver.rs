use ndarray::{Array1, ArrayView1, ArrayViewMut1};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    disc::{mesh::mesh1d::Mesh1d, transport::TransportScheme},
    error::OutputError,
    io::SolutionWriter,
    validation::{cfl_number, peak, total_mass, trough},
};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SolverParameters {
    pub cell_num: usize,
    pub dx: f64,
    pub velocity: f64,
    pub dt: f64,
    pub final_time: f64,
    pub final_step: usize, // round(final_time / dt)
    pub density_floor: f64,
}
impl SolverParameters {
    pub fn cfl(&self) -> f64 {
        cfl_number(self.velocity, self.dt, self.dx)
    }
}
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SolverStatus {
    Initialized,
    Stepping { step: usize },
    Finished,
    /// The output sink failed while writing `step`.
    Aborted { step: usize },
}
#[derive(Clone, Debug, PartialEq)]
pub struct SchemeSummary {
    pub name: &'static str,
    pub mass: f64,
    pub peak: f64,
    pub trough: f64,
}
#[derive(Debug)]
pub struct RunReport {
    pub steps_completed: usize,
    /// Steps the writer accepted; lags `steps_completed` when a write fails.
    pub steps_written: usize,
    pub final_time: f64,
    pub initial_mass: f64,
    pub schemes: Vec<SchemeSummary>,
    pub output_failure: Option<OutputError>,
}
/// Sets every value below `floor` to exactly zero.
pub fn clip_below(mut u: ArrayViewMut1<f64>, floor: f64) {
    u.mapv_inplace(|x| if x < floor { 0.0 } else { x });
}
/// Advances one copy of the initial field per scheme, sharing a velocity field and one
/// scratch buffer.
pub struct Solver {
    pub mesh: Mesh1d,
    pub solver_param: SolverParameters,
    pub velocity: Array1<f64>,
    pub schemes: Vec<Box<dyn TransportScheme>>,
    pub solutions: Vec<Array1<f64>>,
    scratch: Array1<f64>,
    initial_mass: f64,
    pub current_step: usize,
    pub current_time: f64,
    pub status: SolverStatus,
}
impl Solver {
    pub fn new(
        mesh: Mesh1d,
        solver_param: SolverParameters,
        initial_sol: Array1<f64>,
        velocity: Array1<f64>,
        schemes: Vec<Box<dyn TransportScheme>>,
    ) -> Self {
        debug_assert_eq!(initial_sol.len(), mesh.cell_num);
        debug_assert_eq!(velocity.len(), mesh.cell_num);
        let solutions = schemes.iter().map(|_| initial_sol.clone()).collect();
        Self {
            scratch: Array1::zeros(mesh.cell_num),
            initial_mass: total_mass(initial_sol.view()),
            mesh,
            solver_param,
            velocity,
            schemes,
            solutions,
            current_step: 0,
            current_time: 0.0,
            status: SolverStatus::Initialized,
        }
    }
    pub fn scheme_names(&self) -> Vec<&'static str> {
        self.schemes.iter().map(|scheme| scheme.name()).collect()
    }
    /// Advances every scheme by one time step and applies the density floor.
    pub fn advance_one_step(&mut self) {
        let dt = self.solver_param.dt;
        let dx = self.mesh.dx;
        let floor = self.solver_param.density_floor;
        for (scheme, sol) in self.schemes.iter().zip(self.solutions.iter_mut()) {
            // a kernel that leaves the buffer untouched must leave the field unchanged
            self.scratch.assign(sol);
            scheme.advance(sol.view(), self.velocity.view(), dt, dx, self.scratch.view_mut());
            clip_below(self.scratch.view_mut(), floor);
            std::mem::swap(sol, &mut self.scratch);
        }
        self.current_step += 1;
        self.current_time = self.current_step as f64 * dt;
    }
    /// Runs to `final_step`, handing every step to `writer`.
    ///
    /// A writer failure stops the loop; `writer.finish` is called on every path and the failure
    /// is returned in the report rather than as an error.
    pub fn solve<W: SolutionWriter + ?Sized>(&mut self, writer: &mut W) -> RunReport {
        let final_step = self.solver_param.final_step;
        info!(
            "advancing {} schemes on {} cells for {} steps (dt = {}, dx = {}, cfl = {:.3})",
            self.schemes.len(),
            self.mesh.cell_num,
            final_step,
            self.solver_param.dt,
            self.mesh.dx,
            self.solver_param.cfl()
        );
        let mut output_failure = None;
        let mut steps_written = 0;
        if let Err(err) = writer.write_coordinates(self.mesh.cell_centers().view()) {
            self.status = SolverStatus::Aborted { step: 0 };
            output_failure = Some(err);
        }
        while output_failure.is_none() && self.current_step < final_step {
            self.status = SolverStatus::Stepping {
                step: self.current_step + 1,
            };
            self.advance_one_step();
            debug!(
                "step {}: t = {}, mass = {:?}",
                self.current_step,
                self.current_time,
                self.solutions
                    .iter()
                    .map(|sol| total_mass(sol.view()))
                    .collect::<Vec<_>>()
            );
            let views: Vec<ArrayView1<f64>> = self.solutions.iter().map(|sol| sol.view()).collect();
            match writer.write_step(self.current_step, self.current_time, &views) {
                Ok(()) => steps_written += 1,
                Err(err) => {
                    self.status = SolverStatus::Aborted {
                        step: self.current_step,
                    };
                    output_failure = Some(err);
                }
            }
        }
        if let Err(err) = writer.finish() {
            match output_failure {
                Some(_) => warn!("closing output after failure also failed: {err}"),
                None => {
                    self.status = SolverStatus::Aborted {
                        step: self.current_step,
                    };
                    output_failure = Some(err);
                }
            }
        }
        if !matches!(self.status, SolverStatus::Aborted { .. }) {
            self.status = SolverStatus::Finished;
        }
        self.report(steps_written, output_failure)
    }
    fn report(&self, steps_written: usize, output_failure: Option<OutputError>) -> RunReport {
        let schemes = self
            .schemes
            .iter()
            .zip(self.solutions.iter())
            .map(|(scheme, sol)| SchemeSummary {
                name: scheme.name(),
                mass: total_mass(sol.view()),
                peak: peak(sol.view()),
                trough: trough(sol.view()),
            })
            .collect();
        RunReport {
            steps_completed: self.current_step,
            steps_written,
            final_time: self.current_time,
            initial_mass: self.initial_mass,
            schemes,
            output_failure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disc::transport::{FirstOrderUpwind, FluxCorrectedTransport, default_schemes};
    use crate::initialization::{InitialProfile, initialize_solver};
    use ndarray::{array, s};

    #[derive(Default)]
    struct MemoryWriter {
        coords: Option<Array1<f64>>,
        steps: Vec<(usize, f64, Vec<Array1<f64>>)>,
        fail_at_step: Option<usize>,
        fail_coords: bool,
        fail_finish: bool,
        finished: bool,
    }
    impl SolutionWriter for MemoryWriter {
        fn write_coordinates(&mut self, x: ArrayView1<f64>) -> Result<(), OutputError> {
            if self.fail_coords {
                return Err(OutputError::FieldLength {
                    expected: 0,
                    actual: x.len(),
                });
            }
            self.coords = Some(x.to_owned());
            Ok(())
        }
        fn write_step(
            &mut self,
            step: usize,
            time: f64,
            sols: &[ArrayView1<f64>],
        ) -> Result<(), OutputError> {
            if self.fail_at_step == Some(step) {
                return Err(OutputError::FieldCount {
                    expected: 3,
                    actual: 0,
                });
            }
            self.steps
                .push((step, time, sols.iter().map(|sol| sol.to_owned()).collect()));
            Ok(())
        }
        fn finish(&mut self) -> Result<(), OutputError> {
            self.finished = true;
            if self.fail_finish {
                return Err(OutputError::FieldCount {
                    expected: 0,
                    actual: 0,
                });
            }
            Ok(())
        }
    }

    fn params(cell_num: usize, dx: f64, velocity: f64, dt: f64, final_time: f64) -> SolverParameters {
        SolverParameters {
            cell_num,
            dx,
            velocity,
            dt,
            final_time,
            final_step: (final_time / dt).round() as usize,
            density_floor: 1e-6,
        }
    }

    fn build_solver(solver_param: SolverParameters, profile: InitialProfile) -> Solver {
        initialize_solver(&solver_param, &profile)
    }

    fn peaks(writer: &MemoryWriter, ischeme: usize) -> Vec<f64> {
        writer
            .steps
            .iter()
            .map(|(_, _, sols)| peak(sols[ischeme].view()))
            .collect()
    }

    #[test]
    fn test_clip_below() {
        let mut u = array![-1.0, 1e-7, 1e-6, 0.5, f64::NAN];
        clip_below(u.view_mut(), 1e-6);
        assert_eq!(u.slice(s![..4]), array![0.0, 0.0, 1e-6, 0.5]);
        assert!(u[4].is_nan());
    }

    #[test]
    fn test_reference_scenario() {
        let profile = InitialProfile::Square {
            amplitude: 25.0,
            width: 100,
        };
        let mut solver = build_solver(params(1000, 1.0, 10.0, 0.1, 10.0), profile);
        let mut writer = MemoryWriter::default();
        let report = solver.solve(&mut writer);

        assert!(report.output_failure.is_none());
        assert_eq!(report.steps_completed, 100);
        assert_eq!(report.steps_written, 100);
        assert_eq!(solver.status, SolverStatus::Finished);
        assert!(writer.finished);
        assert_eq!(writer.steps.len(), 100);
        let coords = writer.coords.as_ref().unwrap();
        assert_eq!(coords[0], 0.5);
        assert_eq!(coords[999], 999.5);
        for (istep, (step, time, sols)) in writer.steps.iter().enumerate() {
            assert_eq!(*step, istep + 1);
            approx::assert_relative_eq!(*time, (istep + 1) as f64 * 0.1);
            assert_eq!(sols.len(), 3);
            assert!(sols.iter().all(|sol| sol.iter().all(|&x| x >= 0.0)));
        }
        let lax = peaks(&writer, 0);
        assert!(lax.windows(2).all(|w| w[1] <= w[0] + 1e-9));
        for ischeme in 1..3 {
            let other = peaks(&writer, ischeme);
            assert!(lax.iter().zip(other.iter()).all(|(l, o)| *o >= l - 1e-9));
        }
        // the pulse stays inside the domain, so no scheme loses mass
        for summary in &report.schemes {
            approx::assert_relative_eq!(summary.mass, report.initial_mass, max_relative = 1e-9);
        }
    }

    #[test]
    fn test_lax_friedrichs_damps_narrow_pulse_most() {
        let profile = InitialProfile::Square {
            amplitude: 25.0,
            width: 10,
        };
        let mut solver = build_solver(params(400, 1.0, 5.0, 0.1, 10.0), profile);
        let mut writer = MemoryWriter::default();
        let report = solver.solve(&mut writer);

        let lax = peaks(&writer, 0);
        assert!(lax.windows(2).all(|w| w[1] <= w[0] + 1e-9));
        assert!(lax[99] < 25.0);
        let [lax_peak, upwind_peak, fct_peak] = [0, 1, 2].map(|i| report.schemes[i].peak);
        assert!(upwind_peak > lax_peak, "{report:?}");
        assert!(fct_peak > upwind_peak, "{report:?}");
        assert!(report.schemes.iter().all(|s| s.trough >= 0.0));
    }

    #[test]
    fn test_zero_velocity_keeps_fields() {
        let profile = InitialProfile::Gaussian {
            amplitude: 3.0,
            sigma_fraction: 0.1,
        };
        let mesh = Mesh1d::new(50, 0.2);
        let initial_sol = profile.sample(&mesh);
        let schemes: Vec<Box<dyn TransportScheme>> =
            vec![Box::new(FirstOrderUpwind), Box::new(FluxCorrectedTransport)];
        let solver_param = SolverParameters {
            density_floor: 0.0,
            ..params(50, 0.2, 0.0, 0.05, 1.0)
        };
        let mut solver = Solver::new(mesh, solver_param, initial_sol.clone(), Array1::zeros(50), schemes);
        let report = solver.solve(&mut MemoryWriter::default());
        assert_eq!(report.steps_completed, 20);
        for sol in &solver.solutions {
            approx::assert_abs_diff_eq!(*sol, initial_sol, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_floor_applied_after_each_step() {
        let profile = InitialProfile::Gaussian {
            amplitude: 1.0,
            sigma_fraction: 0.05,
        };
        let solver_param = SolverParameters {
            density_floor: 1e-3,
            ..params(100, 1.0, 1.0, 0.5, 5.0)
        };
        let mut solver = build_solver(solver_param, profile);
        let mut writer = MemoryWriter::default();
        solver.solve(&mut writer);
        for (_, _, sols) in &writer.steps {
            assert!(sols.iter().all(|sol| sol.iter().all(|&x| x == 0.0 || x >= 1e-3)));
        }
    }

    #[test]
    fn test_too_few_cells_leaves_fields_unchanged() {
        let mesh = Mesh1d::new(2, 1.0);
        let initial_sol = array![1.0, 2.0];
        let mut solver = Solver::new(
            mesh,
            params(2, 1.0, 1.0, 0.5, 2.0),
            initial_sol.clone(),
            Array1::from_elem(2, 1.0),
            default_schemes(),
        );
        let mut writer = MemoryWriter::default();
        let report = solver.solve(&mut writer);
        assert_eq!(report.steps_completed, 4);
        for sol in &solver.solutions {
            assert_eq!(*sol, initial_sol);
        }
    }

    #[test]
    fn test_writer_failure_stops_loop_and_finishes() {
        let profile = InitialProfile::Square {
            amplitude: 1.0,
            width: 5,
        };
        let mut solver = build_solver(params(30, 1.0, 1.0, 0.5, 5.0), profile);
        let mut writer = MemoryWriter {
            fail_at_step: Some(3),
            ..Default::default()
        };
        let report = solver.solve(&mut writer);
        assert!(matches!(report.output_failure, Some(OutputError::FieldCount { .. })));
        assert_eq!(report.steps_completed, 3);
        assert_eq!(report.steps_written, 2);
        assert_eq!(report.steps_written, writer.steps.len());
        assert_eq!(solver.status, SolverStatus::Aborted { step: 3 });
        assert!(writer.finished);
    }

    #[test]
    fn test_finish_failure_marks_run_aborted() {
        let profile = InitialProfile::Square {
            amplitude: 1.0,
            width: 5,
        };
        let mut solver = build_solver(params(30, 1.0, 1.0, 0.5, 2.0), profile);
        let mut writer = MemoryWriter {
            fail_finish: true,
            ..Default::default()
        };
        let report = solver.solve(&mut writer);
        assert!(report.output_failure.is_some());
        assert_eq!(report.steps_completed, 4);
        assert_eq!(report.steps_written, 4);
        assert_eq!(solver.status, SolverStatus::Aborted { step: 4 });
    }

    #[test]
    fn test_coordinate_failure_runs_no_steps() {
        let profile = InitialProfile::Square {
            amplitude: 1.0,
            width: 5,
        };
        let mut solver = build_solver(params(30, 1.0, 1.0, 0.5, 5.0), profile);
        let mut writer = MemoryWriter {
            fail_coords: true,
            ..Default::default()
        };
        let report = solver.solve(&mut writer);
        assert!(report.output_failure.is_some());
        assert_eq!(report.steps_completed, 0);
        assert_eq!(solver.status, SolverStatus::Aborted { step: 0 });
        assert!(writer.steps.is_empty());
        assert!(writer.finished);
    }
}
