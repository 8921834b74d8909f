//! Round scheduler: the fixed per-round sequence that drives the siege.
//!
//! Each call to [`run_round`] performs, in order:
//!
//! 1. **Count** -- current guards and targets.
//! 2. **Deploy** -- if targets outnumber guards, ask the Station for one
//!    more guard. A consumed slot always yields a guard, seeded with
//!    whatever units the Station could spare.
//! 3. **Grow** -- the throttle fires every few rounds; if the target
//!    population is under its cap, one target is placed.
//! 4. **Sweep** -- depending on [`SweepPolicy`], force guard holdings to
//!    zero (empty store) or to one unit (stocked store).
//! 5. **Activate** -- the Station, every guard, and every target run their
//!    own step in a seeded random order. Messages an actor emits are routed
//!    after its step returns, so the recipient sees them on its next drain.
//! 6. **Evaluate** -- guard and target counts come from step 1; remaining
//!    slots and armed guards are read at the end of the round.
//!
//! After step 5, unarmed guards may be retired and the Station store is
//! audited against the ledger. Once the outcome is terminal, further calls
//! change nothing and report `advanced: false`.

use rand::seq::SliceRandom;
use siege_ledger::{ConservationResult, LedgerAnomaly, LedgerError};
use siege_types::{
    ActorId, GuardId, Message, MessageContent, Outcome, Performative, TargetId, WorldSnapshot,
};
use tracing::{debug, error, info, warn};

use crate::clock::ClockError;
use crate::config::SweepPolicy;
use crate::outcome::{self, OutcomeInputs, OutcomeReason};
use crate::world::WorldState;

/// Errors that can occur during round execution.
#[derive(Debug, thiserror::Error)]
pub enum RoundError {
    /// The round counter could not advance.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },

    /// A unit movement could not be recorded.
    #[error("ledger error: {source}")]
    Ledger {
        /// The underlying ledger error.
        #[from]
        source: LedgerError,
    },
}

/// A guard deployed during step 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deployment {
    /// The new guard.
    pub guard_id: GuardId,
    /// Units the Station handed over with it.
    pub units_granted: u32,
}

/// Units moved by the sweep in step 4.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Whether the sweep ran at all this round.
    pub applied: bool,
    /// Units removed from guards.
    pub seized: u32,
    /// Units handed to guards from outside the Station store.
    pub requisitioned: u32,
}

/// Summary of a single round's execution.
#[derive(Debug, Clone)]
pub struct RoundSummary {
    /// The round number that was executed.
    pub round: u64,
    /// `false` if the world was already terminal and nothing ran.
    pub advanced: bool,
    /// The guard deployed this round, if any.
    pub deployment: Option<Deployment>,
    /// Deployment was needed but no slot was left.
    pub deployment_failed: bool,
    /// The target added by the growth throttle, if any.
    pub spawned_target: Option<TargetId>,
    /// What the sweep did.
    pub sweep: SweepReport,
    /// Messages appended to a mailbox during activation.
    pub messages_delivered: u32,
    /// Messages with no active recipient.
    pub messages_dropped: u32,
    /// Guards retired for holding no units.
    pub retired: Vec<GuardId>,
    /// Outcome at the end of the round.
    pub outcome: Outcome,
    /// Reason for a terminal outcome.
    pub reason: Option<OutcomeReason>,
    /// Store conservation violation, if one was detected.
    pub anomaly: Option<LedgerAnomaly>,
    /// World view at the end of the round.
    pub snapshot: WorldSnapshot,
}

impl RoundSummary {
    /// Summary for a call on a world that has already finished.
    fn halted(state: &WorldState) -> Self {
        Self {
            round: state.round(),
            advanced: false,
            deployment: None,
            deployment_failed: false,
            spawned_target: None,
            sweep: SweepReport::default(),
            messages_delivered: 0,
            messages_dropped: 0,
            retired: Vec::new(),
            outcome: state.outcome(),
            reason: state.outcome_reason(),
            anomaly: None,
            snapshot: state.snapshot(),
        }
    }
}

#[derive(Debug, Default)]
struct DeliveryCount {
    delivered: u32,
    dropped: u32,
}

/// Execute one round.
///
/// # Errors
///
/// Returns [`RoundError::Clock`] if the round counter overflows or
/// [`RoundError::Ledger`] if a unit movement fails ledger validation.
pub fn run_round(state: &mut WorldState) -> Result<RoundSummary, RoundError> {
    if state.outcome().is_terminal() {
        debug!(round = state.round(), outcome = ?state.outcome(), "World is terminal, round skipped");
        return Ok(RoundSummary::halted(state));
    }

    let round = state.clock.advance()?;

    // --- Step 1: Count ---
    let guard_count = state.guard_count();
    let target_count = state.target_count();
    info!(round, guards = guard_count, targets = target_count, "Round started");

    // --- Step 2: Deploy ---
    let mut deployment_failed = false;
    let deployment = if target_count > guard_count {
        let deployment = deploy_guard(state, round)?;
        deployment_failed = deployment.is_none();
        deployment
    } else {
        None
    };

    // --- Step 3: Grow ---
    let spawned_target = grow_targets(state, round);

    // --- Step 4: Sweep ---
    let sweep = apply_sweep(state, round)?;

    // --- Step 5: Activate ---
    let delivery = activate_actors(state, round)?;

    let retired = if state.rules.retire_unarmed_guards {
        retire_unarmed_guards(state, round)
    } else {
        Vec::new()
    };

    let anomaly = audit_store(state, round);

    // --- Step 6: Evaluate ---
    let verdict = outcome::evaluate(OutcomeInputs {
        deployable_slots: state.station.deployable_slots(),
        guard_count,
        target_count,
        armed_guard_count: state.armed_guard_count(),
    });
    state.outcome = verdict.outcome;
    state.reason = verdict.reason;

    if let Some(reason) = verdict.reason {
        info!(round, outcome = ?verdict.outcome, %reason, "Outcome reached");
    }

    let snapshot = state.snapshot();
    debug!(
        round,
        unit_store = snapshot.unit_store,
        deployable_slots = snapshot.deployable_slots,
        armed = snapshot.armed_guard_count,
        delivered = delivery.delivered,
        dropped = delivery.dropped,
        "Round complete"
    );

    Ok(RoundSummary {
        round,
        advanced: true,
        deployment,
        deployment_failed,
        spawned_target,
        sweep,
        messages_delivered: delivery.delivered,
        messages_dropped: delivery.dropped,
        retired,
        outcome: verdict.outcome,
        reason: verdict.reason,
        anomaly,
        snapshot,
    })
}

/// Step 2. `None` means the Station had no slot left.
fn deploy_guard(state: &mut WorldState, round: u64) -> Result<Option<Deployment>, RoundError> {
    let Some(units_granted) = state.station.try_deploy_guard() else {
        warn!(round, "Deployment failed: no deployable slots left");
        return Ok(None);
    };
    let guard_id = state.add_guard(units_granted);
    if units_granted > 0 {
        state.ledger.record_deployment_grant(round, guard_id, units_granted)?;
    }
    info!(
        round,
        %guard_id,
        units_granted,
        slots_left = state.station.deployable_slots(),
        "Guard deployed"
    );
    Ok(Some(Deployment {
        guard_id,
        units_granted,
    }))
}

/// Step 3.
fn grow_targets(state: &mut WorldState, round: u64) -> Option<TargetId> {
    if !state.throttle.tick() {
        return None;
    }
    if state.target_count() >= state.rules.target_cap {
        debug!(round, cap = state.rules.target_cap, "Target cap reached, no growth");
        return None;
    }
    let target = state.add_target();
    info!(round, target_id = %target.id(), "Target appeared");
    Some(target.id())
}

/// Step 4.
fn apply_sweep(state: &mut WorldState, round: u64) -> Result<SweepReport, RoundError> {
    let store_empty = state.station.unit_store() == 0;
    let forced_units = match (state.rules.sweep, store_empty) {
        (SweepPolicy::Disabled, _) | (SweepPolicy::SeizeOnly, false) => {
            return Ok(SweepReport::default());
        }
        (_, true) => 0,
        (SweepPolicy::Override, false) => 1,
    };

    let mut report = SweepReport {
        applied: true,
        ..SweepReport::default()
    };
    for guard in &mut state.guards {
        let held = guard.held_units();
        if held > forced_units {
            let delta = held.saturating_sub(forced_units);
            state.ledger.record_seizure(round, guard.id(), delta)?;
            report.seized = report.seized.saturating_add(delta);
        } else if held < forced_units {
            let delta = forced_units.saturating_sub(held);
            state.ledger.record_requisition(round, guard.id(), delta)?;
            report.requisitioned = report.requisitioned.saturating_add(delta);
        }
        guard.set_held_units(forced_units);
    }

    info!(
        round,
        policy = ?state.rules.sweep,
        forced_units,
        seized = report.seized,
        requisitioned = report.requisitioned,
        "Sweep applied"
    );
    Ok(report)
}

/// Step 5.
fn activate_actors(state: &mut WorldState, round: u64) -> Result<DeliveryCount, RoundError> {
    let mut order: Vec<ActorId> = Vec::with_capacity(
        state
            .guards
            .len()
            .saturating_add(state.targets.len())
            .saturating_add(1),
    );
    order.push(ActorId::Station);
    order.extend(state.guards.iter().map(siege_agents::Guard::actor_id));
    order.extend(state.targets.iter().map(siege_agents::Target::actor_id));
    order.shuffle(&mut state.rng);

    let threshold = state.rules.request_threshold;
    let mut count = DeliveryCount::default();
    for actor in order {
        let outgoing = match actor {
            ActorId::Station => {
                let replies = state.station.process_mailbox();
                record_dispatches(state, round, &replies)?;
                replies
            }
            ActorId::Guard(id) => {
                let outgoing = state
                    .guards
                    .iter_mut()
                    .find(|g| g.id() == id)
                    .map(|guard| guard.step(threshold))
                    .unwrap_or_default();
                record_transfers(state, round, &outgoing)?;
                outgoing
            }
            ActorId::Target(id) => {
                if let Some(target) = state.targets.iter_mut().find(|t| t.id() == id) {
                    target.step(&state.grid, &mut state.rng);
                }
                Vec::new()
            }
        };
        for message in outgoing {
            if state.deliver(message) {
                count.delivered = count.delivered.saturating_add(1);
            } else {
                count.dropped = count.dropped.saturating_add(1);
            }
        }
    }
    Ok(count)
}

/// Grant amount of an AGREE message.
const fn granted(message: &Message) -> Option<u32> {
    match (message.performative(), message.content()) {
        (Performative::Agree, MessageContent::Grant { amount }) if *amount > 0 => Some(*amount),
        _ => None,
    }
}

fn record_dispatches(
    state: &mut WorldState,
    round: u64,
    replies: &[Message],
) -> Result<(), RoundError> {
    for reply in replies {
        if let (Some(amount), Some(guard)) = (granted(reply), reply.receiver().as_guard()) {
            state.ledger.record_dispatch(round, guard, amount)?;
        }
    }
    Ok(())
}

fn record_transfers(
    state: &mut WorldState,
    round: u64,
    outgoing: &[Message],
) -> Result<(), RoundError> {
    for message in outgoing {
        let endpoints = (message.sender().as_guard(), message.receiver().as_guard());
        if let (Some(amount), (Some(from), Some(to))) = (granted(message), endpoints) {
            state.ledger.record_transfer(round, from, to, amount)?;
        }
    }
    Ok(())
}

/// Remove guards with no units and no positive grant waiting to be drained.
fn retire_unarmed_guards(state: &mut WorldState, round: u64) -> Vec<GuardId> {
    let mut retired = Vec::new();
    state.guards.retain(|guard| {
        let pending_grant = guard.mailbox().iter().any(|m| {
            matches!(m.content(), MessageContent::Grant { amount } if *amount > 0)
        });
        let keep = guard.is_armed() || pending_grant;
        if !keep {
            retired.push(guard.id());
        }
        keep
    });
    if !retired.is_empty() {
        info!(round, count = retired.len(), "Unarmed guards retired");
    }
    retired
}

fn audit_store(state: &WorldState, round: u64) -> Option<LedgerAnomaly> {
    match state
        .ledger
        .verify_store(round, state.initial_units(), state.station.unit_store())
    {
        ConservationResult::Balanced => None,
        ConservationResult::Anomaly(anomaly) => {
            error!(
                round,
                expected_store = anomaly.expected_store,
                actual_store = anomaly.actual_store,
                message = %anomaly,
                "Ledger anomaly detected"
            );
            Some(anomaly)
        }
    }
}
