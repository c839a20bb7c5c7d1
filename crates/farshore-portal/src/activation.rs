//! Block-strike handler that arms and runs the frame evaluation.

use glam::{DVec3, IVec3};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use farshore_voxel::VoxelView;

use crate::{AssemblyMaterials, Orientation, Rejection, Validation, validate};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Routes notifications back to an agent's controller.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct AgentId(pub u64);

/// Sink for messages delivered to an agent's controller.
pub trait AgentNotifier {
    fn notify(&mut self, agent: AgentId, message: &str);
}

/// Message delivered to the striking agent when the frame ignites.
pub const ACTIVATION_MESSAGE: &str = "The frame shudders and hums with violet light.";

/// One strike against a candidate anchor cell.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivationAttempt {
    pub agent: AgentId,
    /// Cell that was struck; all pattern offsets are relative to it.
    pub anchor: IVec3,
    /// Item in the agent's hand at strike time, if any.
    pub held_item: Option<String>,
    /// Agent feet position at strike time.
    pub position: DVec3,
}

/// Outcome of a single strike.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationOutcome {
    /// The agent was not holding the igniter. No cell was inspected.
    NotIgnited,
    /// The frame evaluation failed.
    Rejected(Rejection),
    /// The frame ignited; the agent was notified once.
    Activated { orientation: Orientation },
}

// ---------------------------------------------------------------------------
// Activator
// ---------------------------------------------------------------------------

/// Evaluates strikes for one frame recipe.
///
/// Holds no per-strike state. Re-invocation policy belongs to the
/// caller; a second strike on an already-accepted frame simply accepts
/// again and notifies again.
#[derive(Debug, Clone)]
pub struct PortalActivator {
    materials: AssemblyMaterials,
    igniter: String,
}

impl PortalActivator {
    pub fn new(materials: AssemblyMaterials, igniter: impl Into<String>) -> Self {
        Self {
            materials,
            igniter: igniter.into(),
        }
    }

    pub fn materials(&self) -> AssemblyMaterials {
        self.materials
    }

    /// Name of the held item that arms a strike.
    pub fn igniter(&self) -> &str {
        &self.igniter
    }

    /// Handles one strike.
    ///
    /// The held-item gate runs before any cell is inspected: a wrong or
    /// empty hand is a silent no-op no matter how complete the frame
    /// is. On acceptance the agent is notified exactly once.
    pub fn on_strike(
        &self,
        view: &dyn VoxelView,
        notifier: &mut dyn AgentNotifier,
        attempt: &ActivationAttempt,
    ) -> ActivationOutcome {
        if attempt.held_item.as_deref() != Some(self.igniter.as_str()) {
            return ActivationOutcome::NotIgnited;
        }

        let anchor = attempt.anchor;
        let lookup = |offset: IVec3| view.tag_at(anchor + offset);
        match validate(anchor, &lookup, self.materials, attempt.position) {
            Validation::Accepted { orientation } => {
                info!(
                    "Portal frame at ({}, {}, {}) ignited {:?} by agent {}",
                    anchor.x, anchor.y, anchor.z, orientation, attempt.agent.0
                );
                notifier.notify(attempt.agent, ACTIVATION_MESSAGE);
                ActivationOutcome::Activated { orientation }
            }
            Validation::Rejected(rejection) => {
                debug!(
                    "Strike at ({}, {}, {}) rejected: {:?}",
                    anchor.x, anchor.y, anchor.z, rejection
                );
                ActivationOutcome::Rejected(rejection)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
