use ndarray::{Array1, ArrayView1, ArrayViewMut1};

use super::{TransportScheme, has_interior};
use crate::disc::{
    boundary::apply_outflow,
    flux::{face_velocity, lax_wendroff_flux, upwind_flux},
};

/// Zalesak-type flux-corrected transport.
///
/// The donor-cell flux gives a monotone provisional solution; the Lax-Wendroff flux supplies an
/// anti-diffusive correction which is limited face by face so that no interior cell leaves the
/// range spanned by the provisional solution over itself and its two neighbours.
///
/// Face `iface` sits between cells `iface` and `iface + 1`.
#[derive(Clone, Copy, Debug, Default)]
pub struct FluxCorrectedTransport;

/// Intermediate state of one flux-corrected step.
struct CorrectedFluxes {
    low_order_sols: Array1<f64>,
    limited_anti_fluxes: Array1<f64>,
}

impl TransportScheme for FluxCorrectedTransport {
    fn name(&self) -> &'static str {
        "flux_corrected"
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
        let ratio = dt / dx;
        let fluxes = Self::compute_corrected_fluxes(u, v, dt, dx);
        let u_td = &fluxes.low_order_sols;
        let corr = &fluxes.limited_anti_fluxes;
        apply_outflow(u, u_out.view_mut());
        for icell in 1..ncell - 1 {
            u_out[icell] = u_td[icell] - ratio * (corr[icell] - corr[icell - 1]);
        }
    }
}

impl FluxCorrectedTransport {
    fn compute_corrected_fluxes(
        u: ArrayView1<f64>,
        v: ArrayView1<f64>,
        dt: f64,
        dx: f64,
    ) -> CorrectedFluxes {
        let ncell = u.len();
        let nface = ncell - 1;
        let ratio = dt / dx;
        let mut low_fluxes: Array1<f64> = Array1::zeros(nface);
        let mut anti_fluxes: Array1<f64> = Array1::zeros(nface);
        for iface in 0..nface {
            let vel = face_velocity(v, iface);
            let (ul, ur) = (u[iface], u[iface + 1]);
            low_fluxes[iface] = upwind_flux(vel, ul, ur);
            anti_fluxes[iface] = lax_wendroff_flux(vel, ul, ur, dt, dx) - low_fluxes[iface];
        }
        let low_order_sols = Self::low_order_solution(u, low_fluxes.view(), ratio);
        Self::prelimit(anti_fluxes.view_mut(), low_order_sols.view());
        let limiters = Self::compute_limiters(anti_fluxes.view(), low_order_sols.view(), ratio);
        let limited_anti_fluxes = &limiters * &anti_fluxes;
        CorrectedFluxes {
            low_order_sols,
            limited_anti_fluxes,
        }
    }
    /// Donor-cell update with the edge cells carried over.
    fn low_order_solution(u: ArrayView1<f64>, low_fluxes: ArrayView1<f64>, ratio: f64) -> Array1<f64> {
        let ncell = u.len();
        let mut u_td = u.to_owned();
        for icell in 1..ncell - 1 {
            u_td[icell] = u[icell] - ratio * (low_fluxes[icell] - low_fluxes[icell - 1]);
        }
        u_td
    }
    /// Cancels an anti-diffusive flux that runs down the gradient of the provisional solution
    /// where that gradient also reverses across a neighbouring face.
    fn prelimit(mut anti_fluxes: ArrayViewMut1<f64>, u_td: ArrayView1<f64>) {
        let nface = anti_fluxes.len();
        for iface in 0..nface {
            let a = anti_fluxes[iface];
            if a * (u_td[iface + 1] - u_td[iface]) >= 0.0 {
                continue;
            }
            let right_reversed = iface + 2 < u_td.len() && a * (u_td[iface + 2] - u_td[iface + 1]) < 0.0;
            let left_reversed = iface >= 1 && a * (u_td[iface] - u_td[iface - 1]) < 0.0;
            if right_reversed || left_reversed {
                anti_fluxes[iface] = 0.0;
            }
        }
    }
    /// Per-face coefficient in [0, 1] scaling the anti-diffusive flux.
    fn compute_limiters(anti_fluxes: ArrayView1<f64>, u_td: ArrayView1<f64>, ratio: f64) -> Array1<f64> {
        let ncell = u_td.len();
        let nface = anti_fluxes.len();
        // edge cells are frozen, so they never constrain a face
        let mut r_plus: Array1<f64> = Array1::ones(ncell);
        let mut r_minus: Array1<f64> = Array1::ones(ncell);
        for icell in 1..ncell - 1 {
            let a_left = anti_fluxes[icell - 1];
            let a_right = anti_fluxes[icell];
            let u_max = u_td[icell - 1].max(u_td[icell]).max(u_td[icell + 1]);
            let u_min = u_td[icell - 1].min(u_td[icell]).min(u_td[icell + 1]);
            let p_plus = ratio * (a_left.max(0.0) - a_right.min(0.0));
            let p_minus = ratio * (a_right.max(0.0) - a_left.min(0.0));
            r_plus[icell] = limiter_ratio(u_max - u_td[icell], p_plus);
            r_minus[icell] = limiter_ratio(u_td[icell] - u_min, p_minus);
        }
        Array1::from_shape_fn(nface, |iface| {
            if anti_fluxes[iface] >= 0.0 {
                r_plus[iface + 1].min(r_minus[iface])
            } else {
                r_plus[iface].min(r_minus[iface + 1])
            }
        })
    }
}
/// `min(1, q / p)`, or no correction at all when nothing flows in the limited direction.
#[inline]
fn limiter_ratio(q: f64, p: f64) -> f64 {
    if p > 0.0 { (q / p).min(1.0) } else { 0.0 }
}
