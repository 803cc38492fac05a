use ndarray::{ArrayView1, ArrayViewMut1};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BoundaryPosition {
    Left,
    Right,
}
/// Zero-gradient outflow boundary: the edge cell is carried forward unchanged.
#[derive(Clone, Debug)]
pub struct OpenBoundary {
    pub position: BoundaryPosition,
}
impl OpenBoundary {
    pub fn new(position: BoundaryPosition) -> Self {
        Self { position }
    }
    pub fn icell(&self, cell_num: usize) -> usize {
        match self.position {
            BoundaryPosition::Left => 0,
            BoundaryPosition::Right => cell_num - 1,
        }
    }
    pub fn apply(&self, u: ArrayView1<f64>, mut u_out: ArrayViewMut1<f64>) {
        let icell = self.icell(u.len());
        u_out[icell] = u[icell];
    }
}
/// Copies both edge cells of `u` into `u_out`. Requires at least one cell.
pub fn apply_outflow(u: ArrayView1<f64>, mut u_out: ArrayViewMut1<f64>) {
    for bnd in [
        OpenBoundary::new(BoundaryPosition::Left),
        OpenBoundary::new(BoundaryPosition::Right),
    ] {
        bnd.apply(u, u_out.view_mut());
    }
}
