//! The farm engine: sole owner of [`FarmState`] and every rule that mutates it.
//!
//! The engine is single-threaded and event-driven. Each public method runs
//! to completion and leaves the state either fully updated or untouched.
//! Side effects that should land later (pawn unbinding, the end of an
//! auto-planting work animation) go through the [`TaskScheduler`] and are
//! applied by [`FarmEngine::run_due_tasks`], which re-validates the target
//! before mutating it.
//!
//! Notifications accumulate in an outbox drained with
//! [`FarmEngine::take_events`]. The host relays them, followed by a fresh
//! snapshot, to the renderer.
//!
//! # Task completion order
//!
//! 1. Normalize the raw task result.
//! 2. Grade it against the rolling history.
//! 3. Append the task record.
//! 4. Update the bound pawn and schedule its unbind.
//! 5. Advance crops by the grade's action count.
//! 6. Harvest mature crops.
//! 7. Auto-plant with an idle pawn.
//! 8. Store the new lifetime efficiency.

use agentfarm_items::{InventoryResult, inventory, registry};
use agentfarm_scoring::{EfficiencyScorer, RawTaskResult, TaskResult};
use agentfarm_types::{
    Complexity, CropPlantedDetails, CropType, CropsHarvestedDetails, Farm, FarmEvent, FarmState,
    Grade, HarvestRecord, MAX_SOIL_HEALTH, PAWN_MAX_SLOTS, Pawn, PawnId, PawnInventoryUpdateDetails,
    PawnSpawnedDetails, PawnState, Plot, PlotType, Position, SeasonChangedDetails,
    StorehouseUpdateDetails, TaskCompletedDetails, TaskRecord,
};
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use crate::clock::Clock;
use crate::config::FarmConfig;
use crate::crops::{self, CropInfo};
use crate::error::FarmError;
use crate::pawns;
use crate::scheduler::{DeferredAction, TaskScheduler};
use crate::state;

/// Delay between a task completing and its pawn unbinding.
pub const UNBIND_DELAY_SECS: i64 = 3;

/// Length of an auto-planting work animation.
pub const WORK_ANIMATION_SECS: i64 = 2;

/// Session id used for manual completions that name no agent.
pub const MANUAL_AGENT_ID: &str = "manual";

/// Seed units moved per stack by [`FarmEngine::pawn_withdraw_seeds`].
const SEED_WITHDRAW_MIN: u32 = 2;
const SEED_WITHDRAW_MAX: u32 = 4;

/// Summary returned by [`FarmEngine::complete_task`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskOutcome {
    /// Grade awarded.
    pub grade: Grade,
    /// Growth actions applied to every planted crop.
    pub actions_earned: u32,
    /// Seeds earned from harvests this task triggered.
    pub seeds_earned: u64,
    /// Pawn bound to the completing session, if any.
    pub pawn_id: Option<PawnId>,
}

/// One seed stack moved into a pawn's bag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Withdrawal {
    /// Seed item moved.
    pub item_id: String,
    /// Units moved.
    pub quantity: u32,
}

/// Owns the farm state and applies every simulation rule.
pub struct FarmEngine {
    state: FarmState,
    clock: Box<dyn Clock>,
    rng: StdRng,
    scheduler: TaskScheduler,
    events: Vec<FarmEvent>,
}

impl std::fmt::Debug for FarmEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FarmEngine")
            .field("pawns", &self.state.pawns.len())
            .field("season", &self.state.stats.current_season)
            .field("pending_tasks", &self.scheduler.len())
            .field("queued_events", &self.events.len())
            .finish_non_exhaustive()
    }
}

impl FarmEngine {
    /// Take ownership of a loaded state.
    ///
    /// The state is healed, config-owned settings are applied, and session
    /// bindings left over from a previous run are released, since their
    /// unbind timers did not survive.
    pub fn new(mut state: FarmState, config: &FarmConfig, clock: impl Clock + 'static) -> Self {
        let repairs = state::heal_state(&mut state);
        if repairs > 0 {
            tracing::warn!(repairs, "loaded farm state repaired");
        }

        state.settings.season_length_days = config.farm.season_length_days;
        state.settings.day_night_cycle = config.display.day_night_cycle;
        state.settings.particles = config.display.particles;

        for pawn in &mut state.pawns {
            if pawn.agent_session_id.take().is_some() || pawn.state != PawnState::Idle {
                tracing::debug!(pawn_id = %pawn.id, "stale pawn binding released");
            }
            pawn.state = PawnState::Idle;
            pawn.assigned_plot = None;
        }

        let rng = config
            .farm
            .rng_seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);

        Self {
            state,
            clock: Box::new(clock),
            rng,
            scheduler: TaskScheduler::new(),
            events: Vec::new(),
        }
    }

    /// Start a brand-new farm.
    pub fn with_default_state(config: &FarmConfig, clock: impl Clock + 'static) -> Self {
        let state = state::default_farm_state(config, clock.now());
        Self::new(state, config, clock)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// The current state.
    pub const fn state(&self) -> &FarmState {
        &self.state
    }

    /// An owned copy of the current state.
    pub fn snapshot(&self) -> FarmState {
        self.state.clone()
    }

    /// Give up the engine and return its state.
    pub fn into_state(self) -> FarmState {
        self.state
    }

    /// Drain queued notifications, oldest first.
    pub fn take_events(&mut self) -> Vec<FarmEvent> {
        std::mem::take(&mut self.events)
    }

    /// Rolling efficiency percentile from the last ten grades.
    pub fn current_efficiency(&self) -> f64 {
        agentfarm_scoring::current_efficiency(&self.state.stats.task_history)
    }

    /// Seeds needed to plant `crop`.
    pub const fn seed_cost(crop: CropType) -> u64 {
        crops::crop_info(crop).seed_cost()
    }

    /// Catalogue entry for `crop`.
    pub const fn crop_info(crop: CropType) -> &'static CropInfo {
        crops::crop_info(crop)
    }

    /// The plot at `(x, y)`.
    pub fn plot(&self, x: u32, y: u32) -> Option<&Plot> {
        self.state.farm.plot(x, y)
    }

    /// Every pawn ever created.
    pub fn pawns(&self) -> &[Pawn] {
        &self.state.pawns
    }

    /// Look up a pawn.
    pub fn pawn(&self, id: PawnId) -> Option<&Pawn> {
        self.state.pawn(id)
    }

    /// The pawn bound to an agent session.
    pub fn pawn_by_session(&self, session_id: &str) -> Option<&Pawn> {
        self.state.pawn_by_session(session_id)
    }

    /// Pawns currently bound to a live agent session.
    pub fn active_pawn_count(&self) -> usize {
        self.state
            .pawns
            .iter()
            .filter(|p| p.agent_session_id.is_some())
            .count()
    }

    /// Deferred tasks not yet applied.
    pub fn pending_tasks(&self) -> usize {
        self.scheduler.len()
    }

    // -----------------------------------------------------------------------
    // Pawn lifecycle
    // -----------------------------------------------------------------------

    /// Bind a pawn to a newly started agent session.
    ///
    /// An idle, unbound pawn is reused when one exists; otherwise a new pawn
    /// is created at the barn. A session that already has a pawn keeps it.
    pub fn spawn_pawn(&mut self, session_id: &str) -> PawnId {
        if let Some(existing) = self.state.pawn_by_session(session_id) {
            tracing::debug!(session_id, pawn_id = %existing.id, "session already has a pawn");
            return existing.id;
        }

        if let Some(pawn) = self.state.pawns.iter_mut().find(|p| p.is_available()) {
            pawn.state = PawnState::Walking;
            pawn.agent_session_id = Some(session_id.to_owned());
            let snapshot = pawn.clone();
            let id = snapshot.id;
            tracing::info!(pawn_id = %id, name = %snapshot.name, session_id, "pawn reactivated");
            self.emit(FarmEvent::PawnSpawned(PawnSpawnedDetails {
                pawn: snapshot,
                reactivated: true,
            }));
            return id;
        }

        let name = pawns::pick_unused_name(&self.state.pawns);
        let color = pawns::least_populated_faction(&self.state.pawns);
        let position = self.state.farm.barn_position().unwrap_or_default();
        let mut pawn = pawns::new_pawn(name, color, position);
        pawn.agent_session_id = Some(session_id.to_owned());
        pawn.lifetime_efficiency = self.current_efficiency();
        let id = pawn.id;

        tracing::info!(
            pawn_id = %id,
            name = %pawn.name,
            color = ?color,
            session_id,
            "pawn spawned"
        );
        self.state.pawns.push(pawn.clone());
        self.emit(FarmEvent::PawnSpawned(PawnSpawnedDetails {
            pawn,
            reactivated: false,
        }));
        id
    }

    // -----------------------------------------------------------------------
    // Task completion
    // -----------------------------------------------------------------------

    /// Score a finished agent task and run one simulation step.
    pub fn complete_task(&mut self, agent_id: &str, raw: &RawTaskResult) -> TaskOutcome {
        self.apply_task(agent_id, &raw.normalize())
    }

    /// A completion triggered by hand, using the complexity preset.
    pub fn complete_manual(
        &mut self,
        agent_id: Option<&str>,
        complexity: Complexity,
    ) -> TaskOutcome {
        let result = TaskResult::manual(complexity);
        self.apply_task(agent_id.unwrap_or(MANUAL_AGENT_ID), &result)
    }

    fn apply_task(&mut self, agent_id: &str, result: &TaskResult) -> TaskOutcome {
        let now = self.clock.now();

        let (grade, efficiency) = {
            let mut scorer = EfficiencyScorer::new(&mut self.state.stats.task_history);
            let grade = scorer.score(result);
            scorer.add_record(TaskRecord {
                timestamp: now,
                duration: result.duration_ms,
                output_length: result.output_length,
                grade,
                actions_earned: grade.actions(),
            });
            (grade, scorer.current_efficiency())
        };
        let actions_earned = grade.actions();
        self.state.stats.total_tasks = self.state.stats.total_tasks.saturating_add(1);

        let workable: Vec<Position> = self
            .state
            .farm
            .plots
            .iter()
            .filter(|p| matches!(p.plot_type, PlotType::Planted | PlotType::Tilled))
            .map(Plot::position)
            .collect();

        let mut pawn_id = None;
        if let Some(pawn) = self
            .state
            .pawns
            .iter_mut()
            .find(|p| p.agent_session_id.as_deref() == Some(agent_id))
        {
            pawn.total_tasks = pawn.total_tasks.saturating_add(1);
            pawn.state = if grade == Grade::S {
                PawnState::Celebrating
            } else {
                PawnState::Working
            };
            pawns::apply_grade_mood(pawn, grade);
            pawn.lifetime_efficiency = efficiency;
            pawn.assigned_plot = workable.choose(&mut self.rng).copied();
            self.scheduler.schedule(
                later(now, UNBIND_DELAY_SECS),
                DeferredAction::UnbindPawn {
                    pawn_id: pawn.id,
                    session_id: agent_id.to_owned(),
                },
            );
            pawn_id = Some(pawn.id);
        }

        self.advance_crops(actions_earned);
        let seeds_earned = self.process_harvests();
        self.perform_auto_planting();

        self.state.stats.lifetime_efficiency = efficiency;

        tracing::info!(
            agent_id,
            grade = ?grade,
            actions_earned,
            seeds_earned,
            duration_ms = result.duration_ms,
            "task completed"
        );
        self.emit(FarmEvent::TaskCompleted(TaskCompletedDetails {
            agent_id: agent_id.to_owned(),
            pawn_id,
            grade,
            actions_earned,
            seeds_earned,
        }));

        TaskOutcome {
            grade,
            actions_earned,
            seeds_earned,
            pawn_id,
        }
    }

    /// A commit or similar repository event: one bonus growth action.
    pub fn on_git_event(&mut self) -> u64 {
        self.advance_crops(1);
        self.process_harvests()
    }

    // -----------------------------------------------------------------------
    // Crops
    // -----------------------------------------------------------------------

    /// Apply `steps` growth actions to every planted crop. Returns how many
    /// crops reached maturity.
    pub fn advance_crops(&mut self, steps: u32) -> usize {
        let mut matured = 0_usize;
        for plot in &mut self.state.farm.plots {
            let soil = plot.soil_health;
            let Some(crop) = plot.crop.as_mut() else {
                continue;
            };
            let outcome = crops::advance_crop(crop, steps, soil, &mut self.rng);
            if outcome.matured {
                matured = matured.saturating_add(1);
            }
            if outcome.turned_golden {
                tracing::info!(x = plot.x, y = plot.y, crop = %crop.crop_type, "golden crop");
            }
        }
        matured
    }

    /// Harvest every mature crop into the storehouse and credit its value.
    /// Returns the seeds earned.
    pub fn process_harvests(&mut self) -> u64 {
        let mut harvests = Vec::new();
        let mut total_seeds = 0_u64;
        let mut stored_any = false;

        for plot in &mut self.state.farm.plots {
            let soil = plot.soil_health;
            let Some(crop) = plot.crop.as_mut() else {
                continue;
            };
            if !crop.is_mature() {
                continue;
            }

            let quantity = crops::harvest_quantity(crop, soil);
            let value = crops::harvest_value(crop, soil);
            let item_id = registry::crop_to_harvest_item(crop.crop_type, crop.is_golden);

            let stored = inventory::add_item(
                &mut self.state.storehouse.items,
                item_id,
                quantity,
                self.state.storehouse.max_slots,
            );
            if !stored.success {
                tracing::warn!(
                    item_id,
                    lost = stored.overflow,
                    "storehouse full, harvest partially lost"
                );
            }
            stored_any |= stored.moved_any();

            self.state.economy.seeds = self.state.economy.seeds.saturating_add(value);
            self.state.economy.total_earned = self.state.economy.total_earned.saturating_add(value);
            total_seeds = total_seeds.saturating_add(value);

            let quality = crop.quality;
            let is_golden = crop.is_golden;
            let crop_type = crop.crop_type;
            plot.soil_health = soil.saturating_sub(crops::SOIL_HARVEST_DECAY);
            let regrows = crops::regrow(crop, plot.soil_health);
            if !regrows {
                plot.crop = None;
                plot.plot_type = PlotType::Tilled;
            }

            harvests.push(HarvestRecord {
                position: plot.position(),
                crop_type,
                item_id: item_id.to_owned(),
                quantity,
                overflow: stored.overflow,
                seeds_earned: value,
                quality,
                is_golden,
                regrows,
            });
        }

        if harvests.is_empty() {
            return 0;
        }

        tracing::info!(plots = harvests.len(), total_seeds, "crops harvested");
        self.emit(FarmEvent::CropsHarvested(CropsHarvestedDetails {
            harvests,
            total_seeds,
        }));
        if stored_any {
            self.emit_storehouse_update();
        }
        total_seeds
    }

    /// Player-paid planting. Returns `false` if rejected.
    pub fn plant_crop(&mut self, x: u32, y: u32, crop: CropType) -> bool {
        self.try_plant_crop(x, y, crop)
            .map_err(|error| log_rejection("plant_crop", &error))
            .is_ok()
    }

    /// Player-paid planting.
    ///
    /// The plot must be tilled, the crop in season, and the balance must
    /// cover the seed cost. Quality comes from the current efficiency.
    pub fn try_plant_crop(&mut self, x: u32, y: u32, crop: CropType) -> Result<(), FarmError> {
        let season = self.state.stats.current_season;
        let info = crops::crop_info(crop);
        let quality = Grade::from_efficiency(self.current_efficiency());

        let plot = tilled_plot_mut(&mut self.state.farm, x, y)?;
        if !info.grows_in(season) {
            return Err(FarmError::OutOfSeason { crop, season });
        }
        let cost = info.seed_cost();
        if self.state.economy.seeds < cost {
            return Err(FarmError::InsufficientSeeds {
                required: cost,
                available: self.state.economy.seeds,
            });
        }

        self.state.economy.seeds = self.state.economy.seeds.saturating_sub(cost);
        self.state.economy.total_spent = self.state.economy.total_spent.saturating_add(cost);
        plot.crop = Some(crops::new_crop(crop, quality));
        plot.plot_type = PlotType::Planted;

        tracing::info!(x, y, crop = %crop, quality = ?quality, cost, "crop planted");
        self.emit(FarmEvent::CropPlanted(CropPlantedDetails {
            position: Position::new(x, y),
            crop_type: crop,
            quality,
            pawn_id: None,
            cost,
        }));
        Ok(())
    }

    /// Free planting by an idle pawn on the first healthy tilled plot.
    /// Returns the planted position.
    fn perform_auto_planting(&mut self) -> Option<Position> {
        let info = crops::cheapest_crop_for_season(self.state.stats.current_season)?;
        let pawn_index = self.state.pawns.iter().position(Pawn::is_available)?;
        let efficiency = self.current_efficiency();

        let plot = self
            .state
            .farm
            .plots
            .iter_mut()
            .find(|p| {
                p.plot_type == PlotType::Tilled && p.soil_health > crops::AUTO_PLANT_MIN_SOIL
            })?;
        let quality = Grade::from_efficiency(crops::soil_adjusted_efficiency(
            efficiency,
            plot.soil_health,
        ));
        plot.crop = Some(crops::new_crop(info.crop_type, quality));
        plot.plot_type = PlotType::Planted;
        let position = plot.position();

        let pawn = self.state.pawns.get_mut(pawn_index)?;
        pawn.state = PawnState::Working;
        pawn.assigned_plot = Some(position);
        let pawn_id = pawn.id;

        self.scheduler.schedule(
            later(self.clock.now(), WORK_ANIMATION_SECS),
            DeferredAction::FinishWork {
                pawn_id,
                plot: position,
            },
        );

        tracing::info!(
            pawn_id = %pawn_id,
            x = position.x,
            y = position.y,
            crop = %info.crop_type,
            quality = ?quality,
            "auto-planted"
        );
        self.emit(FarmEvent::CropPlanted(CropPlantedDetails {
            position,
            crop_type: info.crop_type,
            quality,
            pawn_id: Some(pawn_id),
            cost: 0,
        }));
        Some(position)
    }

    // -----------------------------------------------------------------------
    // Seasons and timers
    // -----------------------------------------------------------------------

    /// Rotate the season once its length has elapsed, wilting crops that
    /// cannot grow in the new one. Returns `true` if the season changed.
    pub fn update_season(&mut self) -> bool {
        let now = self.clock.now();
        let elapsed = now
            .signed_duration_since(self.state.stats.season_start_date)
            .num_days()
            .max(0);
        let elapsed = u32::try_from(elapsed).unwrap_or(u32::MAX);
        self.state.stats.days_elapsed = elapsed;

        if elapsed < self.state.settings.season_length_days {
            return false;
        }

        let previous = self.state.stats.current_season;
        let season = previous.next();
        self.state.stats.current_season = season;
        self.state.stats.season_start_date = now;
        self.state.stats.days_elapsed = 0;

        let mut wilted = Vec::new();
        for plot in &mut self.state.farm.plots {
            let dies = plot
                .crop
                .as_ref()
                .is_some_and(|crop| !crops::crop_info(crop.crop_type).grows_in(season));
            if dies {
                plot.crop = None;
                plot.plot_type = PlotType::Tilled;
                plot.soil_health = plot
                    .soil_health
                    .saturating_add(crops::SOIL_WILT_RECOVERY)
                    .min(MAX_SOIL_HEALTH);
                wilted.push(plot.position());
            }
        }

        tracing::info!(
            previous = %previous,
            season = %season,
            wilted = wilted.len(),
            "season changed"
        );
        self.emit(FarmEvent::SeasonChanged(SeasonChangedDetails {
            previous,
            season,
            wilted,
        }));
        true
    }

    /// Apply every deferred task that has come due. Tasks whose target has
    /// moved on are dropped. Returns the number applied.
    pub fn run_due_tasks(&mut self) -> usize {
        let now = self.clock.now();
        let mut applied = 0_usize;

        for task in self.scheduler.pop_due(now) {
            match task.action {
                DeferredAction::UnbindPawn {
                    pawn_id,
                    session_id,
                } => {
                    let Some(pawn) = self.state.pawn_mut(pawn_id) else {
                        tracing::debug!(pawn_id = %pawn_id, "unbind skipped: pawn gone");
                        continue;
                    };
                    if pawn.agent_session_id.as_deref() != Some(session_id.as_str()) {
                        tracing::debug!(
                            pawn_id = %pawn_id,
                            session_id = %session_id,
                            "unbind skipped: pawn rebound"
                        );
                        continue;
                    }
                    pawn.agent_session_id = None;
                    pawn.state = PawnState::Idle;
                    pawn.assigned_plot = None;
                    tracing::debug!(pawn_id = %pawn_id, session_id = %session_id, "pawn unbound");
                    applied = applied.saturating_add(1);
                }
                DeferredAction::FinishWork { pawn_id, plot } => {
                    let Some(pawn) = self.state.pawn_mut(pawn_id) else {
                        continue;
                    };
                    if pawn.assigned_plot != Some(plot) || pawn.agent_session_id.is_some() {
                        tracing::debug!(pawn_id = %pawn_id, "work finish skipped: pawn reassigned");
                        continue;
                    }
                    pawn.state = PawnState::Idle;
                    pawn.assigned_plot = None;
                    tracing::debug!(pawn_id = %pawn_id, x = plot.x, y = plot.y, "work finished");
                    applied = applied.saturating_add(1);
                }
            }
        }
        applied
    }

    // -----------------------------------------------------------------------
    // Storehouse
    // -----------------------------------------------------------------------

    /// Add items to the storehouse.
    pub fn storehouse_add(&mut self, item_id: &str, quantity: u32) -> InventoryResult {
        self.try_storehouse_add(item_id, quantity).unwrap_or_else(|error| {
            log_rejection("storehouse_add", &error);
            InventoryResult::rejected(quantity)
        })
    }

    /// Add items to the storehouse, rejecting unknown item ids.
    pub fn try_storehouse_add(
        &mut self,
        item_id: &str,
        quantity: u32,
    ) -> Result<InventoryResult, FarmError> {
        known_item(item_id)?;
        let result = inventory::add_item(
            &mut self.state.storehouse.items,
            item_id,
            quantity,
            self.state.storehouse.max_slots,
        );
        if result.moved_any() {
            self.emit_storehouse_update();
        }
        Ok(result)
    }

    /// Remove items from the storehouse.
    pub fn storehouse_remove(&mut self, item_id: &str, quantity: u32) -> InventoryResult {
        let result = inventory::remove_item(&mut self.state.storehouse.items, item_id, quantity);
        if result.moved_any() {
            self.emit_storehouse_update();
        }
        result
    }

    /// Units of `item_id` in the storehouse.
    pub fn storehouse_count(&self, item_id: &str) -> u32 {
        inventory::get_count(&self.state.storehouse.items, item_id)
    }

    /// Whether the storehouse can take `quantity` more of `item_id`.
    pub fn storehouse_has_space(&self, item_id: &str, quantity: u32) -> bool {
        inventory::has_space(
            &self.state.storehouse.items,
            item_id,
            quantity,
            self.state.storehouse.max_slots,
        )
    }

    // -----------------------------------------------------------------------
    // Pawn inventories
    // -----------------------------------------------------------------------

    /// Whether a pawn's bag can take `quantity` more of `item_id`.
    pub fn pawn_has_space(&self, pawn_id: PawnId, item_id: &str, quantity: u32) -> bool {
        self.state.pawn(pawn_id).is_some_and(|p| {
            inventory::has_space(&p.inventory, item_id, quantity, PAWN_MAX_SLOTS)
        })
    }

    /// Put new items straight into a pawn's bag.
    pub fn pawn_pickup(
        &mut self,
        pawn_id: PawnId,
        item_id: &str,
        quantity: u32,
    ) -> InventoryResult {
        self.try_pawn_pickup(pawn_id, item_id, quantity).unwrap_or_else(|error| {
            log_rejection("pawn_pickup", &error);
            InventoryResult::rejected(quantity)
        })
    }

    /// Put new items straight into a pawn's bag.
    pub fn try_pawn_pickup(
        &mut self,
        pawn_id: PawnId,
        item_id: &str,
        quantity: u32,
    ) -> Result<InventoryResult, FarmError> {
        known_item(item_id)?;
        let pawn = find_pawn_mut(&mut self.state.pawns, pawn_id)?;
        let result = inventory::add_item(&mut pawn.inventory, item_id, quantity, PAWN_MAX_SLOTS);
        if result.moved_any() {
            self.emit_pawn_inventory(pawn_id);
        }
        Ok(result)
    }

    /// Move items from a pawn's bag to the storehouse.
    pub fn pawn_deposit(
        &mut self,
        pawn_id: PawnId,
        item_id: &str,
        quantity: u32,
    ) -> InventoryResult {
        self.try_pawn_deposit(pawn_id, item_id, quantity).unwrap_or_else(|error| {
            log_rejection("pawn_deposit", &error);
            InventoryResult::rejected(quantity)
        })
    }

    /// Move items from a pawn's bag to the storehouse.
    pub fn try_pawn_deposit(
        &mut self,
        pawn_id: PawnId,
        item_id: &str,
        quantity: u32,
    ) -> Result<InventoryResult, FarmError> {
        let pawn = find_pawn_mut(&mut self.state.pawns, pawn_id)?;
        let result = inventory::transfer(
            &mut pawn.inventory,
            &mut self.state.storehouse.items,
            item_id,
            quantity,
            self.state.storehouse.max_slots,
        );
        if result.moved_any() {
            self.emit_pawn_inventory(pawn_id);
            self.emit_storehouse_update();
        }
        Ok(result)
    }

    /// Empty a pawn's bag into the storehouse.
    pub fn pawn_deposit_all(&mut self, pawn_id: PawnId) -> InventoryResult {
        self.try_pawn_deposit_all(pawn_id).unwrap_or_else(|error| {
            log_rejection("pawn_deposit_all", &error);
            InventoryResult::rejected(0)
        })
    }

    /// Empty a pawn's bag into the storehouse. Items that do not fit stay
    /// in the bag and are reported as overflow.
    pub fn try_pawn_deposit_all(
        &mut self,
        pawn_id: PawnId,
    ) -> Result<InventoryResult, FarmError> {
        let pawn = find_pawn_mut(&mut self.state.pawns, pawn_id)?;

        let mut processed = 0_u32;
        let mut overflow = 0_u32;
        for item_id in inventory::get_unique_items(&pawn.inventory) {
            let count = inventory::get_count(&pawn.inventory, &item_id);
            let moved = inventory::transfer(
                &mut pawn.inventory,
                &mut self.state.storehouse.items,
                &item_id,
                count,
                self.state.storehouse.max_slots,
            );
            processed = processed.saturating_add(moved.processed);
            if !moved.success {
                overflow = overflow.saturating_add(count);
            }
        }

        if processed > 0 {
            self.emit_pawn_inventory(pawn_id);
            self.emit_storehouse_update();
        }
        Ok(InventoryResult {
            success: overflow == 0,
            processed,
            overflow,
        })
    }

    /// Move items from the storehouse to a pawn's bag.
    pub fn pawn_withdraw(
        &mut self,
        pawn_id: PawnId,
        item_id: &str,
        quantity: u32,
    ) -> InventoryResult {
        self.try_pawn_withdraw(pawn_id, item_id, quantity).unwrap_or_else(|error| {
            log_rejection("pawn_withdraw", &error);
            InventoryResult::rejected(quantity)
        })
    }

    /// Move items from the storehouse to a pawn's bag.
    pub fn try_pawn_withdraw(
        &mut self,
        pawn_id: PawnId,
        item_id: &str,
        quantity: u32,
    ) -> Result<InventoryResult, FarmError> {
        let pawn = find_pawn_mut(&mut self.state.pawns, pawn_id)?;
        let result = inventory::transfer(
            &mut self.state.storehouse.items,
            &mut pawn.inventory,
            item_id,
            quantity,
            PAWN_MAX_SLOTS,
        );
        if result.moved_any() {
            self.emit_pawn_inventory(pawn_id);
            self.emit_storehouse_update();
        }
        Ok(result)
    }

    /// Hand a pawn a few units of up to `max_types` different seeds.
    pub fn pawn_withdraw_seeds(
        &mut self,
        pawn_id: PawnId,
        max_types: usize,
    ) -> Vec<Withdrawal> {
        self.try_pawn_withdraw_seeds(pawn_id, max_types).unwrap_or_else(|error| {
            log_rejection("pawn_withdraw_seeds", &error);
            Vec::new()
        })
    }

    /// Hand a pawn a few units of up to `max_types` different seeds.
    ///
    /// Seed kinds are taken in storehouse order. Each transfer moves a
    /// random 2 to 4 units, clamped to stock. Kinds that do not fit in the
    /// bag are skipped.
    pub fn try_pawn_withdraw_seeds(
        &mut self,
        pawn_id: PawnId,
        max_types: usize,
    ) -> Result<Vec<Withdrawal>, FarmError> {
        let pawn = find_pawn_mut(&mut self.state.pawns, pawn_id)?;

        let seed_kinds: Vec<String> = inventory::get_unique_items(&self.state.storehouse.items)
            .into_iter()
            .filter(|id| registry::is_seed(id))
            .take(max_types)
            .collect();

        let mut withdrawn = Vec::new();
        for item_id in seed_kinds {
            let wanted = self.rng.random_range(SEED_WITHDRAW_MIN..=SEED_WITHDRAW_MAX);
            let result = inventory::transfer(
                &mut self.state.storehouse.items,
                &mut pawn.inventory,
                &item_id,
                wanted,
                PAWN_MAX_SLOTS,
            );
            if result.success && result.moved_any() {
                withdrawn.push(Withdrawal {
                    item_id,
                    quantity: result.processed,
                });
            } else {
                tracing::debug!(pawn_id = %pawn_id, item_id = %item_id, "seed withdrawal skipped");
            }
        }

        if !withdrawn.is_empty() {
            self.emit_pawn_inventory(pawn_id);
            self.emit_storehouse_update();
        }
        Ok(withdrawn)
    }

    /// Plant one seed from a pawn's bag. Returns `false` if rejected.
    pub fn pawn_plant_seed(
        &mut self,
        pawn_id: PawnId,
        x: u32,
        y: u32,
        seed_item: Option<&str>,
    ) -> bool {
        self.try_pawn_plant_seed(pawn_id, x, y, seed_item)
            .map_err(|error| log_rejection("pawn_plant_seed", &error))
            .is_ok()
    }

    /// Plant one seed from a pawn's bag.
    ///
    /// Uses `seed_item` if given, else the first plantable seed in the bag.
    /// The seed is consumed only once the plot and season have been
    /// validated. Quality comes from soil-adjusted efficiency.
    pub fn try_pawn_plant_seed(
        &mut self,
        pawn_id: PawnId,
        x: u32,
        y: u32,
        seed_item: Option<&str>,
    ) -> Result<CropType, FarmError> {
        let season = self.state.stats.current_season;
        let efficiency = self.current_efficiency();
        let pawn = find_pawn_mut(&mut self.state.pawns, pawn_id)?;

        let (seed_id, crop) = match seed_item {
            Some(seed_id) => {
                if !inventory::contains(&pawn.inventory, seed_id, 1) {
                    return Err(FarmError::NoSeedInBag { pawn_id });
                }
                let crop = registry::seed_to_crop(seed_id).ok_or_else(|| {
                    FarmError::UnknownSeedType {
                        item_id: seed_id.to_owned(),
                    }
                })?;
                (seed_id.to_owned(), crop)
            }
            None => pawn
                .inventory
                .iter()
                .find_map(|stack| {
                    registry::seed_to_crop(&stack.item_id)
                        .map(|crop| (stack.item_id.clone(), crop))
                })
                .ok_or(FarmError::NoSeedInBag { pawn_id })?,
        };

        let plot = tilled_plot_mut(&mut self.state.farm, x, y)?;
        if !crops::crop_info(crop).grows_in(season) {
            return Err(FarmError::OutOfSeason { crop, season });
        }

        let removed = inventory::remove_item(&mut pawn.inventory, &seed_id, 1);
        if !removed.success {
            return Err(FarmError::NoSeedInBag { pawn_id });
        }

        let quality = Grade::from_efficiency(crops::soil_adjusted_efficiency(
            efficiency,
            plot.soil_health,
        ));
        plot.crop = Some(crops::new_crop(crop, quality));
        plot.plot_type = PlotType::Planted;

        tracing::info!(
            pawn_id = %pawn_id,
            x,
            y,
            crop = %crop,
            quality = ?quality,
            "pawn planted seed"
        );
        self.emit(FarmEvent::CropPlanted(CropPlantedDetails {
            position: Position::new(x, y),
            crop_type: crop,
            quality,
            pawn_id: Some(pawn_id),
            cost: 0,
        }));
        self.emit_pawn_inventory(pawn_id);
        Ok(crop)
    }

    // -----------------------------------------------------------------------
    // Notifications
    // -----------------------------------------------------------------------

    fn emit(&mut self, event: FarmEvent) {
        self.events.push(event);
    }

    fn emit_storehouse_update(&mut self) {
        let storehouse = self.state.storehouse.clone();
        self.emit(FarmEvent::StorehouseUpdate(StorehouseUpdateDetails {
            storehouse,
        }));
    }

    fn emit_pawn_inventory(&mut self, pawn_id: PawnId) {
        let Some(pawn) = self.state.pawn(pawn_id) else {
            return;
        };
        let inventory = pawn.inventory.clone();
        self.emit(FarmEvent::PawnInventoryUpdate(PawnInventoryUpdateDetails {
            pawn_id,
            inventory,
        }));
    }
}

/// `secs` seconds after `now`, or `now` itself if that is out of range.
fn later(now: DateTime<Utc>, secs: i64) -> DateTime<Utc> {
    now.checked_add_signed(Duration::seconds(secs)).unwrap_or(now)
}

fn log_rejection(operation: &'static str, error: &FarmError) {
    tracing::debug!(operation, %error, "operation rejected");
}

fn known_item(item_id: &str) -> Result<(), FarmError> {
    registry::get_item(item_id)
        .map(|_| ())
        .ok_or_else(|| FarmError::UnknownItem {
            item_id: item_id.to_owned(),
        })
}

fn find_pawn_mut(pawns: &mut [Pawn], pawn_id: PawnId) -> Result<&mut Pawn, FarmError> {
    pawns
        .iter_mut()
        .find(|p| p.id == pawn_id)
        .ok_or(FarmError::UnknownPawn { pawn_id })
}

fn tilled_plot_mut(farm: &mut Farm, x: u32, y: u32) -> Result<&mut Plot, FarmError> {
    let plot = farm
        .plot_mut(x, y)
        .ok_or(FarmError::PlotNotFound { x, y })?;
    if plot.plot_type != PlotType::Tilled {
        return Err(FarmError::PlotNotTilled {
            x,
            y,
            actual: plot.plot_type,
        });
    }
    Ok(plot)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use agentfarm_types::{Crop, Season};

    use super::*;
    use crate::clock::ManualClock;

    fn engine() -> (FarmEngine, ManualClock) {
        let mut config = FarmConfig::default();
        config.farm.rng_seed = Some(42);
        let clock = ManualClock::new(Utc::now());
        (FarmEngine::with_default_state(&config, clock.clone()), clock)
    }

    fn raw(duration: u64, output_length: u64) -> RawTaskResult {
        RawTaskResult {
            duration: Some(duration),
            output_length: Some(output_length),
            ..RawTaskResult::default()
        }
    }

    fn mature_crop(crop_type: CropType, quality: Grade) -> Crop {
        let mut crop = crops::new_crop(crop_type, quality);
        crop.stage = crop.max_stages;
        crop.tasks_until_next_stage = 0;
        crop
    }

    fn set_crop(engine: &mut FarmEngine, x: u32, y: u32, crop: Crop, soil: u8) {
        let plot = engine.state.farm.plot_mut(x, y).unwrap();
        plot.plot_type = PlotType::Planted;
        plot.crop = Some(crop);
        plot.soil_health = soil;
    }

    #[test]
    fn spawn_creates_then_reuses() {
        let (mut engine, clock) = engine();
        let first = engine.spawn_pawn("agent-1");
        let pawn = engine.pawn(first).unwrap();
        assert_eq!(pawn.state, PawnState::Walking);
        assert_eq!(pawn.position, Position::new(0, 0));
        assert_eq!(pawn.faction_color, agentfarm_types::FactionColor::Red);
        assert!(pawn.inventory.is_empty());

        // Same session twice keeps the same pawn.
        assert_eq!(engine.spawn_pawn("agent-1"), first);

        let second = engine.spawn_pawn("agent-2");
        assert_ne!(first, second);
        assert_eq!(
            engine.pawn(second).map(|p| p.faction_color),
            Some(agentfarm_types::FactionColor::Blue)
        );
        assert_eq!(engine.active_pawn_count(), 2);

        engine.complete_task("agent-1", &raw(5_000, 100));
        clock.advance(Duration::seconds(UNBIND_DELAY_SECS));
        engine.run_due_tasks();
        assert_eq!(engine.active_pawn_count(), 1);

        let third = engine.spawn_pawn("agent-3");
        assert_eq!(third, first);
        assert_eq!(engine.pawns().len(), 2);

        let events = engine.take_events();
        let reactivated = events.iter().any(|e| {
            matches!(e, FarmEvent::PawnSpawned(details) if details.reactivated)
        });
        assert!(reactivated);
    }

    #[test]
    fn complete_task_updates_bound_pawn() {
        let (mut engine, _clock) = engine();
        let id = engine.spawn_pawn("agent-1");
        let outcome = engine.complete_task("agent-1", &raw(5_000, 100));

        assert_eq!(outcome.grade, Grade::B);
        assert_eq!(outcome.actions_earned, 1);
        assert_eq!(outcome.pawn_id, Some(id));

        let pawn = engine.pawn(id).unwrap();
        assert_eq!(pawn.total_tasks, 1);
        assert_eq!(pawn.state, PawnState::Working);
        assert_eq!(pawn.mood, agentfarm_types::Mood::Neutral);
        assert!(pawn.assigned_plot.is_some());
        assert_eq!(engine.state().stats.total_tasks, 1);
        assert_eq!(engine.state().stats.task_history.len(), 1);
        assert_eq!(engine.pending_tasks(), 1);
    }

    #[test]
    fn manual_completion_records_preset() {
        let (mut engine, _clock) = engine();
        for _ in 0..12 {
            engine.complete_task("agent-1", &raw(1_000, 1_000_000));
        }
        let id = engine.spawn_pawn(MANUAL_AGENT_ID);

        let outcome = engine.complete_manual(None, Complexity::Medium);

        assert_eq!(outcome.grade, Grade::B);
        assert_eq!(outcome.pawn_id, Some(id));
        let last = engine.state().stats.task_history.records().last();
        assert_eq!(
            last.map(|r| (r.duration, r.output_length, r.grade)),
            Some((120_000, 3_000, Grade::B))
        );
    }

    #[test]
    fn deferred_tasks_use_fixed_delays() {
        let (mut engine, clock) = engine();
        let start = clock.now();
        engine.spawn_pawn("agent-1");
        engine.complete_task("agent-1", &raw(5_000, 100));

        assert_eq!(
            engine.scheduler.next_due(),
            Some(start + Duration::seconds(UNBIND_DELAY_SECS))
        );
        assert_eq!(later(start, WORK_ANIMATION_SECS), start + Duration::seconds(2));
        let end = DateTime::<Utc>::MAX_UTC;
        assert_eq!(later(end, UNBIND_DELAY_SECS), end);
    }

    #[test]
    fn unbind_is_skipped_after_rebind() {
        let (mut engine, clock) = engine();
        let id = engine.spawn_pawn("agent-1");
        engine.complete_task("agent-1", &raw(5_000, 100));

        // Rebind the same pawn to a new session before the timer fires.
        engine.state.pawn_mut(id).unwrap().agent_session_id = Some("agent-2".to_owned());

        clock.advance(Duration::seconds(UNBIND_DELAY_SECS + 1));
        assert_eq!(engine.run_due_tasks(), 0);
        assert_eq!(
            engine.pawn(id).and_then(|p| p.agent_session_id.clone()),
            Some("agent-2".to_owned())
        );
    }

    #[test]
    fn unbind_waits_for_deadline() {
        let (mut engine, clock) = engine();
        let id = engine.spawn_pawn("agent-1");
        engine.complete_task("agent-1", &raw(5_000, 100));

        clock.advance(Duration::seconds(1));
        assert_eq!(engine.run_due_tasks(), 0);
        assert!(engine.pawn(id).unwrap().agent_session_id.is_some());

        clock.advance(Duration::seconds(2));
        assert_eq!(engine.run_due_tasks(), 1);
        let pawn = engine.pawn(id).unwrap();
        assert!(pawn.agent_session_id.is_none());
        assert_eq!(pawn.state, PawnState::Idle);
        assert!(pawn.assigned_plot.is_none());
    }

    #[test]
    fn plant_crop_validations() {
        let (mut engine, _clock) = engine();

        assert_eq!(
            engine.try_plant_crop(0, 0, CropType::Turnip),
            Err(FarmError::PlotNotTilled {
                x: 0,
                y: 0,
                actual: PlotType::Building
            })
        );
        assert_eq!(
            engine.try_plant_crop(50, 50, CropType::Turnip),
            Err(FarmError::PlotNotFound { x: 50, y: 50 })
        );
        assert_eq!(
            engine.try_plant_crop(2, 2, CropType::Pumpkin),
            Err(FarmError::OutOfSeason {
                crop: CropType::Pumpkin,
                season: Season::Spring
            })
        );

        engine.state.economy.seeds = 1;
        assert_eq!(
            engine.try_plant_crop(2, 2, CropType::Turnip),
            Err(FarmError::InsufficientSeeds {
                required: 2,
                available: 1
            })
        );
        assert!(!engine.plant_crop(2, 2, CropType::Turnip));
        assert_eq!(engine.plot(2, 2).map(|p| p.plot_type), Some(PlotType::Tilled));
        assert!(engine.take_events().is_empty());
    }

    #[test]
    fn plant_crop_quality_follows_efficiency() {
        let (mut engine, _clock) = engine();
        // Empty history: efficiency 50 -> B.
        assert!(engine.plant_crop(2, 2, CropType::Turnip));
        let crop = engine.plot(2, 2).and_then(|p| p.crop.clone()).unwrap();
        assert_eq!(crop.quality, Grade::B);
        assert_eq!(engine.state().economy.total_spent, 2);

        let events = engine.take_events();
        assert!(matches!(
            events.first(),
            Some(FarmEvent::CropPlanted(details)) if details.cost == 2 && details.pawn_id.is_none()
        ));
    }

    #[test]
    fn harvest_regrowing_crop_stays_planted() {
        let (mut engine, _clock) = engine();
        engine.state.stats.current_season = Season::Spring;
        set_crop(&mut engine, 3, 3, mature_crop(CropType::Strawberry, Grade::B), 60);

        let seeds = engine.process_harvests();
        assert_eq!(seeds, 14);

        let plot = engine.plot(3, 3).unwrap();
        assert_eq!(plot.plot_type, PlotType::Planted);
        assert_eq!(plot.crop.as_ref().map(|c| c.stage), Some(3));
        assert_eq!(plot.soil_health, 50);
        assert_eq!(engine.storehouse_count("strawberry"), 1);
    }

    #[test]
    fn harvest_overflow_is_reported() {
        let (mut engine, _clock) = engine();
        engine.state.storehouse.max_slots = 1;
        set_crop(&mut engine, 3, 3, mature_crop(CropType::Potato, Grade::B), 60);

        engine.process_harvests();
        let events = engine.take_events();
        let harvest = events.iter().find_map(|e| match e {
            FarmEvent::CropsHarvested(details) => details.harvests.first().cloned(),
            _ => None,
        });
        let harvest = harvest.unwrap();
        assert_eq!(harvest.quantity, 1);
        assert_eq!(harvest.overflow, 1);
        assert_eq!(engine.storehouse_count("potato"), 0);
        assert_eq!(engine.state().economy.seeds, 25 + 8);
    }

    #[test]
    fn auto_planting_uses_idle_pawn() {
        let (mut engine, clock) = engine();
        let a = engine.spawn_pawn("a");
        let b = engine.spawn_pawn("b");

        // Both pawns are bound, so nobody is free to plant.
        engine.complete_task("a", &raw(5_000, 100));
        assert!(engine.state().farm.plots.iter().all(|p| p.crop.is_none()));

        clock.advance(Duration::seconds(UNBIND_DELAY_SECS));
        engine.run_due_tasks();
        engine.complete_task("b", &raw(5_000, 100));

        let plot = engine.plot(2, 2).unwrap();
        assert_eq!(plot.plot_type, PlotType::Planted);
        assert_eq!(plot.crop.as_ref().map(|c| c.crop_type), Some(CropType::Turnip));
        assert_eq!(engine.state().economy.total_spent, 0);

        let worker = engine.pawn(a).unwrap();
        assert_eq!(worker.state, PawnState::Working);
        assert_eq!(worker.assigned_plot, Some(Position::new(2, 2)));
        assert_eq!(
            engine.pawn(b).and_then(|p| p.agent_session_id.as_deref()),
            Some("b")
        );

        clock.advance(Duration::seconds(WORK_ANIMATION_SECS));
        engine.run_due_tasks();
        let worker = engine.pawn(a).unwrap();
        assert_eq!(worker.state, PawnState::Idle);
        assert!(worker.assigned_plot.is_none());
    }

    #[test]
    fn season_rotation_wilts_and_restores_soil() {
        let (mut engine, clock) = engine();
        assert!(engine.plant_crop(2, 2, CropType::Turnip));
        engine.state.farm.plot_mut(2, 2).unwrap().soil_health = 98;

        clock.advance(Duration::days(6));
        assert!(!engine.update_season());
        assert_eq!(engine.state().stats.days_elapsed, 6);

        clock.advance(Duration::days(1));
        assert!(engine.update_season());
        assert_eq!(engine.state().stats.current_season, Season::Summer);
        assert_eq!(engine.state().stats.days_elapsed, 0);

        let plot = engine.plot(2, 2).unwrap();
        assert!(plot.crop.is_none());
        assert_eq!(plot.plot_type, PlotType::Tilled);
        assert_eq!(plot.soil_health, 100);
    }

    #[test]
    fn git_event_grants_one_action() {
        let (mut engine, _clock) = engine();
        assert!(engine.plant_crop(2, 2, CropType::Turnip));
        engine.on_git_event();
        assert_eq!(engine.plot(2, 2).and_then(|p| p.crop.as_ref()).map(|c| c.stage), Some(1));
    }

    #[test]
    fn pawn_inventory_round_trip() {
        let (mut engine, _clock) = engine();
        let id = engine.spawn_pawn("agent-1");
        engine.take_events();

        let picked = engine.pawn_pickup(id, "potato", 7);
        assert!(picked.success);
        let deposited = engine.pawn_deposit(id, "potato", 5);
        assert_eq!(deposited.processed, 5);
        assert_eq!(engine.storehouse_count("potato"), 5);

        let withdrawn = engine.pawn_withdraw(id, "potato", 3);
        assert!(withdrawn.success);

        let all = engine.pawn_deposit_all(id);
        assert!(all.success);
        assert_eq!(all.processed, 5);
        assert!(engine.pawn(id).unwrap().inventory.is_empty());
        assert_eq!(engine.storehouse_count("potato"), 7);

        let events = engine.take_events();
        assert!(events.iter().any(|e| matches!(e, FarmEvent::PawnInventoryUpdate(_))));
        assert!(events.iter().any(|e| matches!(e, FarmEvent::StorehouseUpdate(_))));
    }

    #[test]
    fn no_event_when_nothing_moves() {
        let (mut engine, _clock) = engine();
        let id = engine.spawn_pawn("agent-1");
        engine.take_events();

        assert!(!engine.pawn_deposit(id, "potato", 3).success);
        assert!(!engine.storehouse_add("mystery", 3).success);
        assert!(!engine.pawn_pickup(PawnId::new(), "potato", 1).success);
        assert!(engine.take_events().is_empty());
    }

    #[test]
    fn pawn_bag_capacity_is_enforced() {
        let (mut engine, _clock) = engine();
        let id = engine.spawn_pawn("agent-1");
        for tool in ["hoe", "watering_can", "fertilizer", "compost", "potato"] {
            assert!(engine.pawn_pickup(id, tool, 1).success);
        }
        assert!(!engine.pawn_has_space(id, "turnip", 1));
        let result = engine.pawn_pickup(id, "turnip", 1);
        assert!(!result.success);
        assert_eq!(result.overflow, 1);
    }

    #[test]
    fn pawn_plant_seed_consumes_one_seed() {
        let (mut engine, _clock) = engine();
        let id = engine.spawn_pawn("agent-1");
        engine.pawn_withdraw(id, "turnip_seeds", 2);

        let crop = engine.try_pawn_plant_seed(id, 3, 3, None);
        assert_eq!(crop, Ok(CropType::Turnip));
        let bag = &engine.pawn(id).unwrap().inventory;
        assert_eq!(inventory::get_count(bag, "turnip_seeds"), 1);

        // Soil 80 nudges efficiency 50 to 60: A quality.
        let quality = engine.plot(3, 3).and_then(|p| p.crop.as_ref()).map(|c| c.quality);
        assert_eq!(quality, Some(Grade::A));
        // Seeds are free for pawns.
        assert_eq!(engine.state().economy.seeds, 25);
    }

    #[test]
    fn pawn_plant_seed_rejections_keep_the_seed() {
        let (mut engine, _clock) = engine();
        let id = engine.spawn_pawn("agent-1");

        assert_eq!(
            engine.try_pawn_plant_seed(id, 3, 3, None),
            Err(FarmError::NoSeedInBag { pawn_id: id })
        );

        engine.pawn_pickup(id, "pumpkin_seeds", 1);
        engine.pawn_pickup(id, "hoe", 1);
        assert_eq!(
            engine.try_pawn_plant_seed(id, 3, 3, Some("hoe")),
            Err(FarmError::UnknownSeedType {
                item_id: "hoe".to_owned()
            })
        );
        assert!(matches!(
            engine.try_pawn_plant_seed(id, 3, 3, Some("pumpkin_seeds")),
            Err(FarmError::OutOfSeason { .. })
        ));
        assert!(matches!(
            engine.try_pawn_plant_seed(id, 0, 7, Some("pumpkin_seeds")),
            Err(FarmError::PlotNotTilled { .. })
        ));
        assert!(!engine.pawn_plant_seed(PawnId::new(), 3, 3, None));

        let bag = &engine.pawn(id).unwrap().inventory;
        assert_eq!(inventory::get_count(bag, "pumpkin_seeds"), 1);
    }

    #[test]
    fn stale_bindings_released_on_load() {
        let (mut engine, _clock) = engine();
        let id = engine.spawn_pawn("agent-1");
        let state = engine.into_state();

        let mut config = FarmConfig::default();
        config.farm.season_length_days = 3;
        let reloaded = FarmEngine::new(state, &config, ManualClock::new(Utc::now()));
        let pawn = reloaded.pawn(id).unwrap();
        assert!(pawn.agent_session_id.is_none());
        assert_eq!(pawn.state, PawnState::Idle);
        assert_eq!(reloaded.state().settings.season_length_days, 3);
    }

    #[test]
    fn storehouse_add_and_remove() {
        let (mut engine, _clock) = engine();
        assert!(engine.storehouse_has_space("fertilizer", 10));
        assert!(engine.storehouse_add("fertilizer", 60).success);
        assert_eq!(engine.storehouse_count("fertilizer"), 60);
        let removed = engine.storehouse_remove("fertilizer", 70);
        assert!(!removed.success);
        assert_eq!(removed.processed, 60);
        assert_eq!(
            engine.try_storehouse_add("nope", 1),
            Err(FarmError::UnknownItem {
                item_id: "nope".to_owned()
            })
        );
    }
}
