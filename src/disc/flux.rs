use ndarray::ArrayView1;

/// Donor-cell flux through a face: the upwind cell is the one the face velocity points away from.
#[inline]
pub fn upwind_flux(vel_face: f64, u_left: f64, u_right: f64) -> f64 {
    if vel_face >= 0.0 {
        vel_face * u_left // flow to the right, left cell is upwind
    } else {
        vel_face * u_right // flow to the left, right cell is upwind
    }
}
/// Velocity at face `iface + 1/2`, the arithmetic mean of the two bracketing cells.
#[inline]
pub fn face_velocity(v: ArrayView1<f64>, iface: usize) -> f64 {
    0.5 * (v[iface] + v[iface + 1])
}
/// Lax-Wendroff flux for linear advection with face velocity `vel_face`.
pub fn lax_wendroff_flux(vel_face: f64, u_left: f64, u_right: f64, dt: f64, dx: f64) -> f64 {
    let courant = vel_face * dt / dx;
    vel_face * 0.5 * (u_left + u_right) - 0.5 * vel_face * courant * (u_right - u_left)
}
