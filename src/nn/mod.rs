//! Neural Network Module: Dist2Cycle layers on candle tensors
//!
//! Parameters are candle `Var`s; gradients come from candle's autodiff and
//! updates from `candle_nn` optimizers. Nothing here differentiates by hand.

mod layer;
mod linear;
mod loss;
mod network;

pub use layer::{Dist2Cycle, Dist2CycleLayer};
pub use linear::Linear;
pub use loss::{thresholded_accuracy, LossFn, LossKind};
pub use network::Network;

use candle_core::Var;

use crate::error::Dist2CycleResult;

/// Anything owning learnable parameters.
pub trait Parameterized {
    /// Every `Var` this module owns. The returned handles share storage with
    /// the module, so an optimizer built from them updates it in place.
    fn parameters(&self) -> Vec<Var>;

    /// Copy of every parameter, flattened, in `parameters()` order
    fn parameter_snapshot(&self) -> Dist2CycleResult<Vec<Vec<f64>>> {
        self.parameters()
            .iter()
            .map(|p| Ok(p.as_tensor().flatten_all()?.to_vec1::<f64>()?))
            .collect()
    }
}
