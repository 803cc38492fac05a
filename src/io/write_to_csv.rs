use std::fs::{self, File};
use std::path::{Path, PathBuf};

use csv::Writer;
use ndarray::ArrayView1;
use serde::Serialize;

use super::SolutionWriter;
use crate::{error::OutputError, initialization::InitialProfile, solver::SolverParameters};

#[derive(Serialize)]
struct PointData {
    cell: usize,
    x: f64,
}
/// Everything needed to interpret the CSV files, written once as `<stem>_meta.json`.
#[derive(Clone, Debug, Serialize)]
pub struct RunMetadata {
    pub cell_num: usize,
    pub dx: f64,
    pub velocity: f64,
    pub dt: f64,
    pub final_time: f64,
    pub final_step: usize,
    pub density_floor: f64,
    pub cfl: f64,
    pub profile: InitialProfile,
    pub coordinate_units: &'static str,
    pub schemes: Vec<String>,
}
impl RunMetadata {
    pub fn new(solver_param: &SolverParameters, profile: &InitialProfile, schemes: &[&str]) -> Self {
        Self {
            cell_num: solver_param.cell_num,
            dx: solver_param.dx,
            velocity: solver_param.velocity,
            dt: solver_param.dt,
            final_time: solver_param.final_time,
            final_step: solver_param.final_step,
            density_floor: solver_param.density_floor,
            cfl: solver_param.cfl(),
            profile: *profile,
            coordinate_units: "meters",
            schemes: schemes.iter().map(|name| name.to_string()).collect(),
        }
    }
}
/// Writes a run as three files next to `path`:
/// the long-format time series itself, `<stem>_x.csv` with the cell centres and
/// `<stem>_meta.json` with the run metadata.
pub struct CsvWriter {
    path: PathBuf,
    coords_path: PathBuf,
    writer: Writer<File>,
    cell_num: usize,
    scheme_num: usize,
}
impl CsvWriter {
    pub fn create(path: &Path, metadata: &RunMetadata) -> Result<Self, OutputError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| OutputError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let meta_path = sibling_path(path, "meta", "json");
        let meta_file = File::create(&meta_path).map_err(|source| OutputError::Io {
            path: meta_path.clone(),
            source,
        })?;
        serde_json::to_writer_pretty(meta_file, metadata)?;

        let mut writer = Writer::from_path(path)?;
        let mut header = vec!["step".to_string(), "time".to_string(), "cell".to_string()];
        header.extend(metadata.schemes.iter().map(|name| format!("density_{name}")));
        writer.write_record(&header)?;
        Ok(Self {
            path: path.to_path_buf(),
            coords_path: sibling_path(path, "x", "csv"),
            writer,
            cell_num: metadata.cell_num,
            scheme_num: metadata.schemes.len(),
        })
    }
    pub fn coords_path(&self) -> &Path {
        &self.coords_path
    }
}
impl SolutionWriter for CsvWriter {
    fn write_coordinates(&mut self, x: ArrayView1<f64>) -> Result<(), OutputError> {
        if x.len() != self.cell_num {
            return Err(OutputError::FieldLength {
                expected: self.cell_num,
                actual: x.len(),
            });
        }
        let mut writer = Writer::from_path(&self.coords_path)?;
        for (cell, &xc) in x.iter().enumerate() {
            writer.serialize(PointData { cell, x: xc })?;
        }
        writer.flush().map_err(|source| OutputError::Io {
            path: self.coords_path.clone(),
            source,
        })?;
        Ok(())
    }
    fn write_step(
        &mut self,
        step: usize,
        time: f64,
        sols: &[ArrayView1<f64>],
    ) -> Result<(), OutputError> {
        if sols.len() != self.scheme_num {
            return Err(OutputError::FieldCount {
                expected: self.scheme_num,
                actual: sols.len(),
            });
        }
        if let Some(sol) = sols.iter().find(|sol| sol.len() != self.cell_num) {
            return Err(OutputError::FieldLength {
                expected: self.cell_num,
                actual: sol.len(),
            });
        }
        let mut record = Vec::with_capacity(3 + self.scheme_num);
        for icell in 0..self.cell_num {
            record.clear();
            record.push(step.to_string());
            record.push(time.to_string());
            record.push(icell.to_string());
            record.extend(sols.iter().map(|sol| sol[icell].to_string()));
            self.writer.write_record(&record)?;
        }
        Ok(())
    }
    fn finish(&mut self) -> Result<(), OutputError> {
        self.writer.flush().map_err(|source| OutputError::Io {
            path: self.path.clone(),
            source,
        })
    }
}
/// `dir/run.csv` -> `dir/run_<suffix>.<ext>`
fn sibling_path(path: &Path, suffix: &str, ext: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{stem}_{suffix}.{ext}"))
}
