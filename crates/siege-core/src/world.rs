//! The simulation's world state and its message router.
//!
//! [`WorldState`] is the single owner of the Station, the guards, the
//! targets, the grid, the ledger, and the seeded RNG. It is mutated only by
//! [`run_round`](crate::round::run_round) and by the explicit collaboration
//! calls below; between rounds it is read through [`WorldState::snapshot`].

use std::collections::{BTreeMap, BTreeSet};

use rand::SeedableRng;
use rand::rngs::SmallRng;
use siege_agents::{AgentError, Guard, Station, Target, pair_mut};
use siege_ledger::{LedgerError, UnitLedger};
use siege_types::{ActorId, Cell, GuardId, Message, Outcome, WorldSnapshot};
use siege_world::{Grid, Occupant, WorldError};
use tracing::{debug, info};

use crate::clock::{GrowthThrottle, RoundClock};
use crate::config::{ConfigError, SiegeConfig, SweepPolicy};
use crate::outcome::OutcomeReason;

/// Errors that can occur when building or directly mutating the world.
#[derive(Debug, thiserror::Error)]
pub enum WorldStateError {
    /// The configuration was rejected.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },

    /// The grid could not be built.
    #[error("world error: {source}")]
    Grid {
        /// The underlying grid error.
        #[from]
        source: WorldError,
    },

    /// A guard lookup failed.
    #[error("agent error: {source}")]
    Agent {
        /// The underlying agent error.
        #[from]
        source: AgentError,
    },

    /// A unit movement could not be recorded.
    #[error("ledger error: {source}")]
    Ledger {
        /// The underlying ledger error.
        #[from]
        source: LedgerError,
    },
}

/// Per-round rule parameters copied out of the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundRules {
    /// Guards below this many units request more.
    pub request_threshold: u32,
    /// Target growth stops at this population.
    pub target_cap: u32,
    /// Sweep precedence over negotiation.
    pub sweep: SweepPolicy,
    /// Remove unarmed guards after activation.
    pub retire_unarmed_guards: bool,
}

/// The whole simulation state.
#[derive(Debug)]
pub struct WorldState {
    pub(crate) grid: Grid,
    pub(crate) station: Station,
    pub(crate) guards: Vec<Guard>,
    pub(crate) targets: Vec<Target>,
    pub(crate) clock: RoundClock,
    pub(crate) throttle: GrowthThrottle,
    pub(crate) outcome: Outcome,
    pub(crate) reason: Option<OutcomeReason>,
    pub(crate) rng: SmallRng,
    pub(crate) ledger: UnitLedger,
    pub(crate) rules: RoundRules,
    initial_units: u32,
    guards_created: u32,
}

impl WorldState {
    /// Build the initial world from a configuration.
    ///
    /// Initial guards start with no units. Every target is placed on a
    /// random empty cell, or on any cell once the grid is full.
    ///
    /// # Errors
    ///
    /// Returns [`WorldStateError::Config`] if the configuration fails
    /// validation. Nothing is constructed in that case.
    pub fn new(config: &SiegeConfig) -> Result<Self, WorldStateError> {
        config.validate()?;
        let grid = Grid::new(config.world.grid_width, config.world.grid_height)?;
        let mut rng = SmallRng::seed_from_u64(config.world.seed);

        let guards: Vec<Guard> = (0..config.population.initial_guards)
            .map(|_| Guard::new(0))
            .collect();

        let mut occupied = BTreeSet::new();
        let mut targets = Vec::new();
        for _ in 0..config.population.initial_targets {
            let cell = grid.place(&mut rng, &occupied);
            occupied.insert(cell);
            targets.push(Target::new(cell));
        }

        info!(
            seed = config.world.seed,
            grid_width = grid.width(),
            grid_height = grid.height(),
            guards = guards.len(),
            targets = targets.len(),
            unit_store = config.station.initial_units,
            deployable_slots = config.station.max_deployable,
            "World initialized"
        );

        Ok(Self {
            grid,
            station: Station::new(config.station.initial_units, config.station.max_deployable),
            guards_created: config.population.initial_guards,
            guards,
            targets,
            clock: RoundClock::new(),
            throttle: GrowthThrottle::new(config.population.target_growth_period),
            outcome: Outcome::Ongoing,
            reason: None,
            rng,
            ledger: UnitLedger::new(),
            rules: RoundRules {
                request_threshold: config.negotiation.request_threshold,
                target_cap: config.population.target_cap,
                sweep: config.negotiation.sweep,
                retire_unarmed_guards: config.negotiation.retire_unarmed_guards,
            },
            initial_units: config.station.initial_units,
        })
    }

    /// Rounds completed so far.
    pub const fn round(&self) -> u64 {
        self.clock.round()
    }

    /// Current contest state.
    pub const fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Why the contest ended, once it has.
    pub const fn outcome_reason(&self) -> Option<OutcomeReason> {
        self.reason
    }

    /// The Station.
    pub const fn station(&self) -> &Station {
        &self.station
    }

    /// Active guards in deployment order.
    pub fn guards(&self) -> &[Guard] {
        &self.guards
    }

    /// Look up a guard by ID.
    pub fn guard(&self, id: GuardId) -> Option<&Guard> {
        self.guards.iter().find(|g| g.id() == id)
    }

    /// Active targets in creation order.
    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// The grid targets move on.
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The unit movement ledger.
    pub const fn ledger(&self) -> &UnitLedger {
        &self.ledger
    }

    /// Rule parameters in effect.
    pub const fn rules(&self) -> RoundRules {
        self.rules
    }

    /// Units the Station started with.
    pub const fn initial_units(&self) -> u32 {
        self.initial_units
    }

    /// Guards ever created, initial ones included.
    pub const fn guards_created(&self) -> u32 {
        self.guards_created
    }

    /// Number of active guards.
    pub fn guard_count(&self) -> u32 {
        u32::try_from(self.guards.len()).unwrap_or(u32::MAX)
    }

    /// Number of active targets.
    pub fn target_count(&self) -> u32 {
        u32::try_from(self.targets.len()).unwrap_or(u32::MAX)
    }

    /// Number of guards holding at least one unit.
    pub fn armed_guard_count(&self) -> u32 {
        let armed = self.guards.iter().filter(|g| g.is_armed()).count();
        u32::try_from(armed).unwrap_or(u32::MAX)
    }

    /// Cells currently occupied by targets.
    pub fn occupied_cells(&self) -> BTreeSet<Cell> {
        self.targets.iter().map(Occupant::cell).collect()
    }

    /// Read-only view for external reporters.
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            round: self.round(),
            unit_store: self.station.unit_store(),
            deployable_slots: self.station.deployable_slots(),
            guard_count: self.guard_count(),
            target_count: self.target_count(),
            armed_guard_count: self.armed_guard_count(),
            per_guard_units: self
                .guards
                .iter()
                .map(|g| (g.id(), g.held_units()))
                .collect::<BTreeMap<_, _>>(),
            outcome: self.outcome,
        }
    }

    /// Append a message to its receiver's mailbox.
    ///
    /// Returns `false` if the receiver has no mailbox (targets) or is no
    /// longer active; the message is dropped.
    pub fn deliver(&mut self, message: Message) -> bool {
        match message.receiver() {
            ActorId::Station => {
                self.station.post(message);
                true
            }
            ActorId::Guard(id) => {
                if let Some(guard) = self.guards.iter_mut().find(|g| g.id() == id) {
                    guard.post(message);
                    true
                } else {
                    debug!(receiver = %id, "Dropped message for inactive guard");
                    false
                }
            }
            ActorId::Target(id) => {
                debug!(receiver = %id, "Dropped message addressed to a target");
                false
            }
        }
    }

    /// Queue a share request from `requester` in `donor`'s mailbox.
    ///
    /// The donor answers on its next step; the requester is credited on
    /// the step after the donor's answer lands.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::SelfShare`] if both IDs match or
    /// [`AgentError::GuardNotFound`] if either guard is not active.
    pub fn request_share(
        &mut self,
        requester: GuardId,
        donor: GuardId,
        amount: u32,
    ) -> Result<(), WorldStateError> {
        if requester == donor {
            return Err(AgentError::SelfShare(requester).into());
        }
        let request = self
            .guard(requester)
            .ok_or(AgentError::GuardNotFound(requester))?
            .request_share(donor, amount);
        if !self.deliver(request) {
            return Err(AgentError::GuardNotFound(donor).into());
        }
        Ok(())
    }

    /// Move `amount` units from one guard to another immediately.
    ///
    /// Returns `Ok(false)` with nothing changed if `from` holds too few.
    /// Successful transfers are recorded in the ledger.
    ///
    /// # Errors
    ///
    /// Returns [`WorldStateError::Agent`] if either guard is unknown or
    /// both IDs are the same.
    pub fn share_between(
        &mut self,
        from: GuardId,
        to: GuardId,
        amount: u32,
    ) -> Result<bool, WorldStateError> {
        let (donor, recipient) = pair_mut(&mut self.guards, from, to)?;
        if !donor.share_with(recipient, amount) {
            return Ok(false);
        }
        if amount > 0 {
            self.ledger.record_transfer(self.clock.round(), from, to, amount)?;
        }
        Ok(true)
    }

    /// Construct and register a new guard holding `units`.
    pub(crate) fn add_guard(&mut self, units: u32) -> GuardId {
        let guard = Guard::new(units);
        let id = guard.id();
        self.guards.push(guard);
        self.guards_created = self.guards_created.saturating_add(1);
        id
    }

    /// Place and register a new target.
    pub(crate) fn add_target(&mut self) -> Target {
        let occupied = self.occupied_cells();
        let cell = self.grid.place(&mut self.rng, &occupied);
        let target = Target::new(cell);
        self.targets.push(target.clone());
        target
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use siege_types::{MessageContent, Performative};

    use super::*;

    fn small_config() -> SiegeConfig {
        let mut config = SiegeConfig::default();
        config.population.initial_guards = 2;
        config.population.initial_targets = 3;
        config
    }

    #[test]
    fn new_world_matches_config() {
        let world = WorldState::new(&SiegeConfig::default()).unwrap();
        let snapshot = world.snapshot();
        assert_eq!(snapshot.round, 0);
        assert_eq!(snapshot.unit_store, 15);
        assert_eq!(snapshot.deployable_slots, 5);
        assert_eq!(snapshot.guard_count, 5);
        assert_eq!(snapshot.target_count, 10);
        assert_eq!(snapshot.armed_guard_count, 0);
        assert_eq!(snapshot.per_guard_units.len(), 5);
        assert_eq!(snapshot.outcome, Outcome::Ongoing);
        assert_eq!(world.guards_created(), 5);
    }

    #[test]
    fn targets_start_on_distinct_cells() {
        let world = WorldState::new(&SiegeConfig::default()).unwrap();
        assert_eq!(world.occupied_cells().len(), 10);
        assert!(world.targets().iter().all(|t| world.grid().contains(t.cell())));
    }

    #[test]
    fn overfull_grid_still_places_every_target() {
        let mut config = small_config();
        config.world.grid_width = 1;
        config.world.grid_height = 2;
        let world = WorldState::new(&config).unwrap();
        assert_eq!(world.target_count(), 3);
    }

    #[test]
    fn invalid_config_is_rejected_before_construction() {
        let mut config = SiegeConfig::default();
        config.world.grid_width = 0;
        assert!(matches!(
            WorldState::new(&config),
            Err(WorldStateError::Config { .. })
        ));
    }

    #[test]
    fn deliver_routes_by_receiver() {
        let mut world = WorldState::new(&small_config()).unwrap();
        let guard = world.guards().first().unwrap().id();

        assert!(world.deliver(Message::request_units(ActorId::Guard(guard), 3)));
        assert_eq!(world.station().mailbox().len(), 1);

        assert!(world.deliver(Message::agree(ActorId::Station, ActorId::Guard(guard), 1)));
        assert_eq!(world.guard(guard).unwrap().mailbox().len(), 1);

        let target = world.targets().first().unwrap().actor_id();
        assert!(!world.deliver(Message::agree(ActorId::Station, target, 1)));
        assert!(!world.deliver(Message::agree(
            ActorId::Station,
            ActorId::Guard(GuardId::new()),
            1
        )));
    }

    #[test]
    fn share_between_moves_units_and_records_transfer() {
        let mut world = WorldState::new(&small_config()).unwrap();
        let a = world.guards().first().unwrap().id();
        let b = world.guards().get(1).unwrap().id();
        world.guards.first_mut().unwrap().set_held_units(3);

        assert!(world.share_between(a, b, 2).unwrap());
        assert_eq!(world.guard(a).unwrap().held_units(), 1);
        assert_eq!(world.guard(b).unwrap().held_units(), 2);
        assert_eq!(world.ledger().len(), 1);
        assert_eq!(world.ledger().guard_net_flow(b), 2);
    }

    #[test]
    fn share_between_with_insufficient_units_is_refused() {
        let mut world = WorldState::new(&small_config()).unwrap();
        let a = world.guards().first().unwrap().id();
        let b = world.guards().get(1).unwrap().id();
        world.guards.first_mut().unwrap().set_held_units(1);

        assert!(!world.share_between(a, b, 2).unwrap());
        assert_eq!(world.guard(a).unwrap().held_units(), 1);
        assert_eq!(world.guard(b).unwrap().held_units(), 0);
        assert!(world.ledger().is_empty());
    }

    #[test]
    fn share_between_unknown_guard_is_an_error() {
        let mut world = WorldState::new(&small_config()).unwrap();
        let a = world.guards().first().unwrap().id();
        assert!(world.share_between(a, GuardId::new(), 1).is_err());
        assert!(world.share_between(a, a, 1).is_err());
    }

    #[test]
    fn request_share_lands_in_donor_mailbox() {
        let mut world = WorldState::new(&small_config()).unwrap();
        let requester = world.guards().first().unwrap().id();
        let donor = world.guards().get(1).unwrap().id();

        world.request_share(requester, donor, 2).unwrap();
        let mailbox = world.guard(donor).unwrap().mailbox();
        let queued = mailbox.iter().next().unwrap();
        assert_eq!(queued.performative(), Performative::Request);
        assert_eq!(queued.content(), &MessageContent::Share { amount: 2 });
        assert!(world.request_share(requester, GuardId::new(), 2).is_err());
    }
}
