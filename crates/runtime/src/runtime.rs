//! High-level runtime orchestrator.
//!
//! The runtime owns background workers, wires up command/event channels, and
//! exposes a builder-based API for clients to drive the simulation.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use combat_content::ContentFactory;
use combat_core::{Authority, CombatAgent, CombatConfig, MatchContext, Ruleset};

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::events::EventBus;
use crate::oracle::{AnimationMirror, AttackCatalogImpl, OracleBundle};
use crate::workers::{Command, SimulationWorker};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub combat: CombatConfig,
    pub authority: Authority,
    pub ruleset: Ruleset,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// Drive one step per `combat.step_millis` of wall-clock time (server only).
    pub auto_step: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            combat: CombatConfig::default(),
            authority: Authority::Server,
            ruleset: Ruleset::default(),
            event_buffer_size: 100,
            command_buffer_size: 32,
            auto_step: false,
        }
    }
}

/// Main runtime that orchestrates the combat simulation
///
/// Design: Runtime owns workers and coordinates execution.
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    oracles: OracleBundle,

    // Background workers
    sim_worker_handle: JoinHandle<()>,
    ticker_handle: Option<JoinHandle<()>>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across clients and async tasks.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    pub fn oracles(&self) -> &OracleBundle {
        &self.oracles
    }

    /// Animation mirror the host reports clip playback into.
    pub fn animation(&self) -> Arc<AnimationMirror> {
        self.oracles.animation()
    }

    /// Shutdown the runtime gracefully
    ///
    /// The worker stops once every outstanding [`RuntimeHandle`] clone is dropped.
    pub async fn shutdown(self) -> Result<()> {
        if let Some(ticker) = self.ticker_handle {
            ticker.abort();
            if let Err(error) = ticker.await
                && !error.is_cancelled()
            {
                return Err(RuntimeError::WorkerJoin(error));
            }
        }

        drop(self.handle);

        self.sim_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    oracles: Option<OracleBundle>,
    content_dir: Option<PathBuf>,
    agents: Vec<CombatAgent>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            oracles: None,
            content_dir: None,
            agents: Vec::new(),
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the oracle bundle directly
    pub fn oracles(mut self, oracles: OracleBundle) -> Self {
        self.oracles = Some(oracles);
        self
    }

    /// Load attack tables and combat tuning from a content directory.
    ///
    /// Ignored when oracles are set explicitly. The loaded `config.toml`
    /// replaces `RuntimeConfig::combat`.
    pub fn content_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.content_dir = Some(data_dir.into());
        self
    }

    /// Use the attack tables compiled into `combat-content`.
    pub fn embedded_content(self) -> Result<Self> {
        let catalog = AttackCatalogImpl::embedded()?;
        let rules = self.config.ruleset;
        Ok(self.oracles(OracleBundle::new(
            catalog,
            Arc::new(AnimationMirror::new()),
            rules,
        )))
    }

    /// Agent present when the match starts
    pub fn agent(mut self, agent: CombatAgent) -> Self {
        self.agents.push(agent);
        self
    }

    /// Build the runtime
    pub async fn build(mut self) -> Result<Runtime> {
        let oracles = match (self.oracles.take(), self.content_dir.take()) {
            (Some(oracles), _) => oracles,
            (None, Some(data_dir)) => {
                let factory = ContentFactory::new(&data_dir);
                self.config.combat = factory.load_config().map_err(RuntimeError::Content)?;
                let catalog = AttackCatalogImpl::from_content_dir(&data_dir)?;
                info!(path = %data_dir.display(), attacks = catalog.table().len(), "content loaded");
                OracleBundle::new(catalog, Arc::new(AnimationMirror::new()), self.config.ruleset)
            }
            (None, None) => return Err(RuntimeError::MissingOracles),
        };

        let mut context = MatchContext::new(self.config.combat.clone(), self.config.authority);
        for agent in self.agents {
            context.spawn(agent)?;
        }

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);

        let handle = RuntimeHandle::new(command_tx, event_bus.clone());

        let sim_worker = SimulationWorker::new(context, oracles.clone(), command_rx, event_bus);
        let sim_worker_handle = tokio::spawn(async move {
            sim_worker.run().await;
        });

        let ticker_handle = match (self.config.auto_step, self.config.authority) {
            (false, _) => None,
            (true, Authority::Client) => {
                warn!("auto_step ignored: clients do not advance the simulation");
                None
            }
            (true, Authority::Server) => {
                let period = Duration::from_millis(u64::from(self.config.combat.step_millis.max(1)));
                Some(tokio::spawn(run_ticker(handle.clone(), period)))
            }
        };

        Ok(Runtime {
            handle,
            oracles,
            sim_worker_handle,
            ticker_handle,
        })
    }
}

/// Steps the simulation on a fixed wall-clock period until the worker goes away.
async fn run_ticker(handle: RuntimeHandle, period: Duration) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Burst);
    loop {
        interval.tick().await;
        match handle.step().await {
            Ok(_) => {}
            Err(RuntimeError::Combat(error)) => {
                warn!(%error, "step refused");
            }
            Err(error) => {
                debug!(%error, "ticker stopped");
                break;
            }
        }
    }
}
