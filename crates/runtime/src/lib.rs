//! Runtime orchestration for the authoritative combat simulation.
//!
//! This crate wires oracle access, the simulation worker and the event bus
//! into a cohesive runtime API. Consumers embed [`Runtime`] to drive fixed
//! steps, submit hits and attack inputs, and subscribe to events through
//! [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`oracle`] adapts loaded content to the combat oracles
//! - [`logging`] installs the tracing subscriber for binaries and tests
//! - `workers` keeps background tasks internal to the crate
pub mod api;
pub mod events;
pub mod logging;
pub mod oracle;
pub mod runtime;

mod workers;

pub use api::{AgentInput, ProjectileId, Result, RuntimeError, RuntimeHandle};
pub use events::{Event, EventBus, FeedbackEvent, ReplicationEvent, Topic};
pub use logging::setup_logging;
pub use oracle::{AnimationMirror, AttackCatalogImpl, OracleBundle};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
