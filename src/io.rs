pub mod param_parser;
pub mod write_to_csv;

use ndarray::ArrayView1;

use crate::error::OutputError;

/// Destination for the evolving fields of a run.
///
/// The driver calls `write_coordinates` once, then `write_step` once per completed step with
/// one field per scheme, and `finish` on every exit path.
pub trait SolutionWriter {
    fn write_coordinates(&mut self, x: ArrayView1<f64>) -> Result<(), OutputError>;
    fn write_step(
        &mut self,
        step: usize,
        time: f64,
        sols: &[ArrayView1<f64>],
    ) -> Result<(), OutputError>;
    fn finish(&mut self) -> Result<(), OutputError>;
}
