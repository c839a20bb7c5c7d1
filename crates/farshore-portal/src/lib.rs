//! Portal frame recognition: declarative cell patterns, a pure
//! evaluation over a voxel neighborhood, and the strike handler that
//! arms it with the igniter item.

mod activation;
mod pattern;
mod validator;

pub use activation::{
    ACTIVATION_MESSAGE, ActivationAttempt, ActivationOutcome, AgentId, AgentNotifier,
    PortalActivator,
};
pub use pattern::{
    ORIENTATION_PROBE, Orientation, RING_OFFSETS, X_ALIGNED_KEY_OFFSETS, Z_ALIGNED_KEY_OFFSETS,
};
pub use validator::{AssemblyMaterials, Rejection, Validation, validate};
