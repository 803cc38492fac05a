use ndarray::{ArrayView1, ArrayViewMut1};

use super::{TransportScheme, has_interior};
use crate::disc::boundary::apply_outflow;

/// Classical Lax-Friedrichs: the centre value is replaced by the mean of its neighbours,
/// which makes the scheme strongly diffusive.
#[derive(Clone, Copy, Debug, Default)]
pub struct LaxFriedrichs;

impl TransportScheme for LaxFriedrichs {
    fn name(&self) -> &'static str {
        "lax"
    }
    fn advance(
        &self,
        u: ArrayView1<f64>,
        v: ArrayView1<f64>,
        dt: f64,
        dx: f64,
        mut u_out: ArrayViewMut1<f64>,
    ) {
        if !has_interior(u, v, &u_out) {
            return;
        }
        let ncell = u.len();
        apply_outflow(u, u_out.view_mut());
        for icell in 1..ncell - 1 {
            let f_minus = v[icell - 1] * u[icell - 1];
            let f_plus = v[icell + 1] * u[icell + 1];
            u_out[icell] =
                0.5 * (u[icell + 1] + u[icell - 1]) - (dt / (2.0 * dx)) * (f_plus - f_minus);
        }
    }
}
