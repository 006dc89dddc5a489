//! Explicit simulation context.
//!
//! Equipment models never reach for global state. Everything a shell reads or
//! writes outside its own record lives in a [`Simulation`] passed by mutable
//! reference: the [`NodeStore`] and its plant flow-request API, the current
//! [`Environment`], the [`Diagnostics`] sink and the plant design-flow
//! registrations. Equipment records live in caller-owned [`Registry`]
//! collections addressed by validated [`Handle`]s.
//!
//! A fatal condition is returned as [`SimError::Fatal`] and propagated to the
//! driver, which decides how to stop.

mod diagnostics;
mod environment;
mod error;
mod node;
mod plant;
mod registry;
mod schedule;
mod zone;

pub use diagnostics::{Diagnostics, Message, RecurringWarning, Severity};
pub use environment::Environment;
pub use error::SimError;
pub use node::{Node, NodeId, NodeStore};
pub use plant::DesignFlows;
pub use registry::{CompIndex, Handle, Named, Registry};
pub use schedule::Schedule;
pub use zone::ZoneDemand;

/// Mutable state shared by every equipment call in a simulation.
#[derive(Debug, Clone, Default)]
pub struct Simulation {
    pub nodes: NodeStore,
    pub environment: Environment,
    pub diagnostics: Diagnostics,
    pub design_flows: DesignFlows,
}

impl Simulation {
    /// Creates a context with no nodes and the given environment.
    #[must_use]
    pub fn new(environment: Environment) -> Self {
        Self {
            environment,
            ..Self::default()
        }
    }
}
