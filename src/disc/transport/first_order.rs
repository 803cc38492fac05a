use ndarray::{ArrayView1, ArrayViewMut1};

use super::{TransportScheme, has_interior};
use crate::disc::{
    boundary::apply_outflow,
    flux::{face_velocity, upwind_flux},
};

/// First-order donor-cell scheme in conservative flux form.
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstOrderUpwind;

impl TransportScheme for FirstOrderUpwind {
    fn name(&self) -> &'static str {
        "first_order"
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
            let (im, ip) = (icell - 1, icell + 1);
            let f_left = upwind_flux(face_velocity(v, im), u[im], u[icell]);
            let f_right = upwind_flux(face_velocity(v, icell), u[icell], u[ip]);
            u_out[icell] = u[icell] - (dt / dx) * (f_right - f_left);
        }
    }
}
