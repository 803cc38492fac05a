pub mod first_order;
pub mod flux_corrected;
pub mod lax_friedrichs;

use ndarray::{ArrayView1, ArrayViewMut1};

pub use first_order::FirstOrderUpwind;
pub use flux_corrected::FluxCorrectedTransport;
pub use lax_friedrichs::LaxFriedrichs;

/// An explicit conservative update of a cell-centred scalar under a cell-centred velocity.
///
/// `u` and `u_out` are distinct buffers of the same length as `v`. Edge cells are copied
/// through unchanged. With fewer than three cells the call leaves `u_out` untouched.
pub trait TransportScheme {
    /// Short name used to label output columns.
    fn name(&self) -> &'static str;
    fn advance(
        &self,
        u: ArrayView1<f64>,
        v: ArrayView1<f64>,
        dt: f64,
        dx: f64,
        u_out: ArrayViewMut1<f64>,
    );
}
/// The three schemes in output order.
pub fn default_schemes() -> Vec<Box<dyn TransportScheme>> {
    vec![
        Box::new(LaxFriedrichs),
        Box::new(FirstOrderUpwind),
        Box::new(FluxCorrectedTransport),
    ]
}
/// Whether a kernel call has interior cells to update.
pub(crate) fn has_interior(u: ArrayView1<f64>, v: ArrayView1<f64>, u_out: &ArrayViewMut1<f64>) -> bool {
    debug_assert_eq!(u.len(), v.len());
    debug_assert_eq!(u.len(), u_out.len());
    u.len() >= 3
}
