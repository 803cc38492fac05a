use ndarray::ArrayView1;
use ndarray_stats::QuantileExt;

/// Sum of a scalar field over every cell.
pub fn total_mass(u: ArrayView1<f64>) -> f64 {
    u.sum()
}
/// Largest value, ignoring NaNs.
pub fn peak(u: ArrayView1<f64>) -> f64 {
    *u.max_skipnan()
}
/// Smallest value, ignoring NaNs.
pub fn trough(u: ArrayView1<f64>) -> f64 {
    *u.min_skipnan()
}
pub fn cfl_number(velocity: f64, dt: f64, dx: f64) -> f64 {
    velocity.abs() * dt / dx
}
