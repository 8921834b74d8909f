//! End-to-end siege scenarios.
//!
//! Each test builds a world from configuration (or drives the actors
//! directly) and checks the observable result after one round.

#![allow(clippy::unwrap_used)]

use siege_agents::{Guard, Station};
use siege_core::config::SiegeConfig;
use siege_core::outcome::OutcomeReason;
use siege_core::round::run_round;
use siege_core::world::WorldState;
use siege_types::{ActorId, Message, Outcome};

fn config(guards: u32, targets: u32, units: u32, slots: u32) -> SiegeConfig {
    let mut config = SiegeConfig::default();
    config.population.initial_guards = guards;
    config.population.initial_targets = targets;
    config.station.initial_units = units;
    config.station.max_deployable = slots;
    config
}

#[test]
fn empty_station_loses_to_outnumbering_targets() {
    let mut world = WorldState::new(&config(5, 10, 0, 0)).unwrap();
    let summary = run_round(&mut world).unwrap();

    assert!(summary.deployment_failed);
    assert_eq!(summary.snapshot.armed_guard_count, 0);
    assert_eq!(summary.outcome, Outcome::ChallengersWin);
    assert_eq!(summary.reason, Some(OutcomeReason::ResourcesExhausted));
    assert_eq!(world.outcome(), Outcome::ChallengersWin);
}

#[test]
fn stocked_station_equips_enough_guards_to_win() {
    let mut world = WorldState::new(&config(5, 3, 100, 5)).unwrap();
    let summary = run_round(&mut world).unwrap();

    assert!(summary.deployment.is_none());
    assert_eq!(summary.snapshot.guard_count, 5);
    assert_eq!(summary.snapshot.armed_guard_count, 5);
    assert_eq!(summary.outcome, Outcome::AuthorityWins);
    assert_eq!(summary.reason, Some(OutcomeReason::TargetsUnderControl));
}

#[test]
fn sharing_more_than_held_changes_nothing() {
    let mut donor = Guard::new(1);
    let mut peer = Guard::new(0);

    assert!(!donor.share_with(&mut peer, 2));
    assert_eq!(donor.held_units(), 1);
    assert_eq!(peer.held_units(), 0);
}

#[test]
fn sharing_more_than_held_through_the_world_changes_nothing() {
    let mut world = WorldState::new(&config(2, 4, 10, 0)).unwrap();
    let a = world.guards().first().unwrap().id();
    let b = world.guards().get(1).unwrap().id();

    assert!(!world.share_between(a, b, 2).unwrap());
    assert_eq!(world.guard(a).unwrap().held_units(), 0);
    assert_eq!(world.guard(b).unwrap().held_units(), 0);
}

#[test]
fn concurrent_requests_split_a_small_store() {
    let mut station = Station::new(2, 0);
    let first = Guard::new(0);
    let second = Guard::new(0);
    station.post(Message::request_units(first.actor_id(), 5));
    station.post(Message::request_units(second.actor_id(), 5));

    let replies = station.process_mailbox();
    let dispatched: u32 = replies.iter().filter_map(|m| m.content().amount()).sum();

    assert_eq!(replies.len(), 2);
    assert_eq!(dispatched, 2);
    assert_eq!(station.unit_store(), 0);
    assert!(station.mailbox().is_empty());
    assert!(replies.iter().all(|m| m.sender() == ActorId::Station));
}

#[test]
fn concurrent_requests_through_the_world_cannot_overdraw() {
    let mut config = config(2, 2, 2, 0);
    config.negotiation.sweep = siege_core::config::SweepPolicy::Disabled;
    let mut world = WorldState::new(&config).unwrap();
    let ids: Vec<_> = world.guards().iter().map(Guard::id).collect();
    for id in &ids {
        assert!(world.deliver(Message::request_units(ActorId::Guard(*id), 5)));
    }

    run_round(&mut world).unwrap();

    assert_eq!(world.station().unit_store(), 0);
    assert_eq!(world.ledger().station_outflow_total(), 2);
}
