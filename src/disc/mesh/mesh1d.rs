use ndarray::Array1;

/// Uniform one-dimensional grid of `cell_num` cells of width `dx`, starting at x = 0.
#[derive(Clone, Debug, PartialEq)]
pub struct Mesh1d {
    pub cell_num: usize,
    pub dx: f64,
}
impl Mesh1d {
    pub fn new(cell_num: usize, dx: f64) -> Self {
        Self { cell_num, dx }
    }
    pub fn length(&self) -> f64 {
        self.cell_num as f64 * self.dx
    }
    pub fn cell_center(&self, icell: usize) -> f64 {
        (icell as f64 + 0.5) * self.dx
    }
    pub fn cell_centers(&self) -> Array1<f64> {
        Array1::from_shape_fn(self.cell_num, |icell| self.cell_center(icell))
    }
}
