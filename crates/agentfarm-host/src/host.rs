//! Glue between the protocol channel and the [`FarmEngine`].
//!
//! [`FarmHost`] is synchronous. The event loop in `main` feeds it inbound
//! lines and pump ticks and writes whatever lines it returns to stdout.

use agentfarm_core::FarmEngine;
use agentfarm_core::config::PersistenceConfig;
use agentfarm_types::FarmEvent;

use crate::error::HostError;
use crate::persist;
use crate::protocol::{HostCommand, HostMessage};

/// Owns the engine and relays its output.
#[derive(Debug)]
pub struct FarmHost {
    engine: FarmEngine,
    persistence: PersistenceConfig,
}

impl FarmHost {
    /// Wrap an engine. Saves go to `persistence.state_path`.
    pub const fn new(engine: FarmEngine, persistence: PersistenceConfig) -> Self {
        Self {
            engine,
            persistence,
        }
    }

    /// The wrapped engine.
    pub const fn engine(&self) -> &FarmEngine {
        &self.engine
    }

    /// Handle one raw inbound line. Malformed lines are logged and yield
    /// no output.
    pub fn handle_line(&mut self, line: &str) -> Result<Vec<String>, HostError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Vec::new());
        }
        match serde_json::from_str::<HostCommand>(line) {
            Ok(command) => self.dispatch(command),
            Err(error) => {
                tracing::warn!(%error, "malformed inbound line skipped");
                Ok(Vec::new())
            }
        }
    }

    /// Apply one command and return the outbound lines it produced.
    pub fn dispatch(&mut self, command: HostCommand) -> Result<Vec<String>, HostError> {
        let name = command.name();
        let mut lines = Vec::new();

        if matches!(command, HostCommand::Snapshot) {
            lines.push(self.state_line()?);
            return Ok(lines);
        }

        let mutated = match self.apply(command) {
            Ok(always_mutates) => always_mutates,
            Err(error) => {
                tracing::debug!(command = name, %error, "command rejected");
                lines.push(
                    HostMessage::Rejected {
                        command: name,
                        reason: error.to_string(),
                    }
                    .to_line()?,
                );
                false
            }
        };

        self.flush(mutated, &mut lines)?;
        Ok(lines)
    }

    /// Fire due timers and rotate the season if its time has come.
    pub fn pump(&mut self) -> Result<Vec<String>, HostError> {
        let fired = self.engine.run_due_tasks();
        let rotated = self.engine.update_season();
        let mut lines = Vec::new();
        self.flush(fired > 0 || rotated, &mut lines)?;
        Ok(lines)
    }

    /// Write the current state to disk.
    pub fn save(&self) -> Result<(), HostError> {
        persist::save_state(&self.persistence.state_path, self.engine.state())?;
        Ok(())
    }

    /// Run a command against the engine. `Ok(true)` marks commands that
    /// change state even when they emit no event.
    fn apply(&mut self, command: HostCommand) -> Result<bool, agentfarm_core::FarmError> {
        match command {
            HostCommand::AgentStarted {
                id,
                process_name,
                start_time,
            } => {
                tracing::debug!(
                    session_id = %id,
                    process = ?process_name,
                    started = ?start_time,
                    "agent started"
                );
                self.engine.spawn_pawn(&id);
                Ok(false)
            }
            HostCommand::AgentCompleted {
                id,
                process_name,
                result,
            } => {
                tracing::debug!(session_id = %id, process = ?process_name, "agent completed");
                self.engine.complete_task(&id, &result);
                Ok(false)
            }
            HostCommand::ManualComplete {
                complexity,
                agent_id,
            } => {
                self.engine.complete_manual(agent_id.as_deref(), complexity);
                Ok(false)
            }
            HostCommand::Plant { x, y, crop_type } => {
                self.engine.try_plant_crop(x, y, crop_type)?;
                Ok(false)
            }
            HostCommand::GitEvent => {
                self.engine.on_git_event();
                Ok(true)
            }
            HostCommand::WithdrawSeeds { pawn_id, max_types } => {
                self.engine.try_pawn_withdraw_seeds(pawn_id, max_types)?;
                Ok(false)
            }
            HostCommand::PlantSeed {
                pawn_id,
                x,
                y,
                seed_item,
            } => {
                self.engine
                    .try_pawn_plant_seed(pawn_id, x, y, seed_item.as_deref())?;
                Ok(false)
            }
            HostCommand::DepositAll { pawn_id } => {
                self.engine.try_pawn_deposit_all(pawn_id)?;
                Ok(false)
            }
            HostCommand::Snapshot => Ok(false),
        }
    }

    /// Relay queued events, then the state if anything changed.
    fn flush(&mut self, mutated: bool, lines: &mut Vec<String>) -> Result<(), HostError> {
        let events = self.engine.take_events();
        for event in &events {
            lines.push(event_line(event)?);
        }
        if !mutated && events.is_empty() {
            return Ok(());
        }

        lines.push(self.state_line()?);
        if self.persistence.autosave {
            if let Err(error) = self.save() {
                tracing::warn!(%error, "autosave failed");
            }
        }
        Ok(())
    }

    fn state_line(&self) -> Result<String, HostError> {
        Ok(HostMessage::State {
            state: self.engine.state(),
        }
        .to_line()?)
    }
}

fn event_line(event: &FarmEvent) -> Result<String, HostError> {
    Ok(HostMessage::Event { event }.to_line()?)
}
