//! Per-round outcome evaluation.
//!
//! [`evaluate`] is a pure function of four counts. The rules are checked in
//! order and the first match wins:
//!
//! 1. No deployable slots left and targets outnumber guards: challengers win.
//! 2. Armed guards at least match the targets: the authority wins.
//! 3. No guards at all, or none of them armed: challengers win.
//! 4. Otherwise the siege goes on.

use std::fmt;

use siege_types::Outcome;

/// The counts the evaluator looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutcomeInputs {
    /// Slots the Station can still deploy.
    pub deployable_slots: u32,
    /// Active guards.
    pub guard_count: u32,
    /// Active targets.
    pub target_count: u32,
    /// Guards holding at least one unit.
    pub armed_guard_count: u32,
}

/// Why a terminal outcome was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeReason {
    /// Out of slots while outnumbered.
    ResourcesExhausted,
    /// Every target is matched by an armed guard.
    TargetsUnderControl,
    /// No guard is left holding a unit.
    NoArmedGuards,
}

impl OutcomeReason {
    /// Human-readable reason.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ResourcesExhausted => "resources exhausted",
            Self::TargetsUnderControl => "targets under control",
            Self::NoArmedGuards => "no armed guards",
        }
    }
}

impl fmt::Display for OutcomeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The evaluator's result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    /// The outcome after this round.
    pub outcome: Outcome,
    /// Set whenever the outcome is terminal.
    pub reason: Option<OutcomeReason>,
}

impl Verdict {
    const ONGOING: Self = Self {
        outcome: Outcome::Ongoing,
        reason: None,
    };

    const fn terminal(outcome: Outcome, reason: OutcomeReason) -> Self {
        Self {
            outcome,
            reason: Some(reason),
        }
    }
}

/// Evaluate the outcome from one round's counts.
pub const fn evaluate(inputs: OutcomeInputs) -> Verdict {
    if inputs.deployable_slots == 0 && inputs.target_count > inputs.guard_count {
        return Verdict::terminal(Outcome::ChallengersWin, OutcomeReason::ResourcesExhausted);
    }
    if inputs.armed_guard_count >= inputs.target_count {
        return Verdict::terminal(Outcome::AuthorityWins, OutcomeReason::TargetsUnderControl);
    }
    if inputs.guard_count == 0 || inputs.armed_guard_count == 0 {
        return Verdict::terminal(Outcome::ChallengersWin, OutcomeReason::NoArmedGuards);
    }
    Verdict::ONGOING
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn inputs(slots: u32, guards: u32, targets: u32, armed: u32) -> OutcomeInputs {
        OutcomeInputs {
            deployable_slots: slots,
            guard_count: guards,
            target_count: targets,
            armed_guard_count: armed,
        }
    }

    #[test]
    fn exhausted_and_outnumbered_loses() {
        let verdict = evaluate(inputs(0, 5, 10, 0));
        assert_eq!(verdict.outcome, Outcome::ChallengersWin);
        assert_eq!(verdict.reason, Some(OutcomeReason::ResourcesExhausted));
    }

    #[test]
    fn exhaustion_rule_precedes_authority_rule() {
        // Armed guards would cover the targets, but rule 1 is checked first.
        let verdict = evaluate(inputs(0, 2, 3, 2));
        assert_eq!(verdict.reason, Some(OutcomeReason::ResourcesExhausted));

        let verdict = evaluate(inputs(0, 1, 0, 0));
        assert_eq!(verdict.outcome, Outcome::AuthorityWins);
    }

    #[test]
    fn armed_guards_matching_targets_wins() {
        let verdict = evaluate(inputs(5, 5, 3, 5));
        assert_eq!(verdict.outcome, Outcome::AuthorityWins);
        assert_eq!(verdict.reason, Some(OutcomeReason::TargetsUnderControl));
        assert_eq!(evaluate(inputs(1, 3, 3, 3)).outcome, Outcome::AuthorityWins);
    }

    #[test]
    fn no_targets_means_authority_wins_even_without_guards() {
        let verdict = evaluate(inputs(3, 0, 0, 0));
        assert_eq!(verdict.outcome, Outcome::AuthorityWins);
    }

    #[test]
    fn unarmed_guards_lose() {
        let verdict = evaluate(inputs(2, 4, 6, 0));
        assert_eq!(verdict.outcome, Outcome::ChallengersWin);
        assert_eq!(verdict.reason, Some(OutcomeReason::NoArmedGuards));
        assert_eq!(evaluate(inputs(2, 0, 1, 0)).outcome, Outcome::ChallengersWin);
    }

    #[test]
    fn partial_coverage_is_ongoing() {
        let verdict = evaluate(inputs(2, 4, 6, 3));
        assert_eq!(verdict.outcome, Outcome::Ongoing);
        assert!(verdict.reason.is_none());
    }

    #[test]
    fn reason_strings() {
        assert_eq!(OutcomeReason::ResourcesExhausted.to_string(), "resources exhausted");
        assert_eq!(OutcomeReason::TargetsUnderControl.to_string(), "targets under control");
        assert_eq!(OutcomeReason::NoArmedGuards.to_string(), "no armed guards");
    }
}
