//! Access gate: composes the lockout check, subscription gate, challenge
//! issuance/validation, and ledger updates into the onboarding flow.
//!
//! Entry events are split in two around the subscription probe:
//! [`AccessGate::begin_entry`] runs the lockout check and referral recording
//! (no network), the caller then probes the user's channel subscriptions, and
//! [`AccessGate::complete_entry`] resolves the event. Challenge responses go
//! through [`AccessGate::on_response`] in a single step.

use std::sync::Arc;

use gatebot_store::user::UserStore;
use gatebot_store::{ReferralLedger, VerificationLedger};
use gatebot_types::{
    ArithmeticChallenge, ChallengeSource, ChannelId, GateParams, GateState, Timestamp, UserId,
};

use crate::error::GateError;
use crate::lockout::LockoutTracker;
use crate::outcomes::{EntryOutcome, EntryStage, ResponseOutcome, RewardCredit};
use crate::pending::PendingChallenges;

/// Events emitted by the gate for the bot layer to log and count.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GateEvent {
    /// A referral relationship was recorded (first writer).
    ReferralRecorded { user: UserId, referrer: UserId },
    /// A challenge was issued to a user, superseding any outstanding one.
    ChallengeIssued { user: UserId },
    /// A user passed verification (the false→true edge).
    UserVerified { user: UserId },
    /// A referrer was credited for a verified referral.
    RewardCredited {
        referrer: UserId,
        referred: UserId,
        amount: u64,
    },
    /// A wrong answer armed the lockout.
    LockoutArmed { user: UserId, unblock_at: Timestamp },
}

/// The orchestrator tying challenges, lockouts, and ledgers together.
///
/// Synchronous; the caller serializes updates per user (one update at a time
/// per chat) and may interleave different users freely; every store below
/// is keyed by user id.
pub struct AccessGate {
    params: GateParams,
    challenge_source: Box<dyn ChallengeSource + Send>,
    users: Arc<dyn UserStore + Send + Sync>,
    verification: Arc<dyn VerificationLedger + Send + Sync>,
    referrals: Arc<dyn ReferralLedger + Send + Sync>,
    lockouts: LockoutTracker,
    pending: PendingChallenges,
    /// Pending events for the bot to process.
    pending_events: Vec<GateEvent>,
}

impl AccessGate {
    pub fn new(
        params: GateParams,
        challenge_source: Box<dyn ChallengeSource + Send>,
        users: Arc<dyn UserStore + Send + Sync>,
        verification: Arc<dyn VerificationLedger + Send + Sync>,
        referrals: Arc<dyn ReferralLedger + Send + Sync>,
    ) -> Self {
        Self {
            params,
            challenge_source,
            users,
            verification,
            referrals,
            lockouts: LockoutTracker::new(),
            pending: PendingChallenges::new(),
            pending_events: Vec::new(),
        }
    }

    /// First half of an entry event, before any network call.
    ///
    /// Checks the lockout, then records the user (first contact) and any
    /// referral. A locked user is refused immediately: no record update, no
    /// referral write, and the caller must not run the subscription probe.
    pub fn begin_entry(
        &mut self,
        user: UserId,
        display_name: &str,
        referrer: Option<UserId>,
        now: Timestamp,
    ) -> Result<EntryStage, GateError> {
        let (locked, remaining_secs) = self.lockouts.is_locked(user, now);
        if locked {
            return Ok(EntryStage::Locked { remaining_secs });
        }

        self.users.ensure_user(user, display_name, now)?;

        if let Some(referrer) = referrer {
            if self.referrals.record_referrer_if_absent(user, referrer)? {
                self.pending_events
                    .push(GateEvent::ReferralRecorded { user, referrer });
            }
        }

        Ok(EntryStage::Proceed)
    }

    /// Second half of an entry event, fed the subscription-probe result.
    ///
    /// A non-empty `unmet` list refuses entry without touching gate state.
    /// Otherwise a verified user is granted access, and an unverified one
    /// gets a fresh challenge that replaces any outstanding one.
    pub fn complete_entry(
        &mut self,
        user: UserId,
        unmet: Vec<ChannelId>,
        now: Timestamp,
    ) -> Result<EntryOutcome, GateError> {
        if !unmet.is_empty() {
            return Ok(EntryOutcome::Unsubscribed { unmet });
        }

        if self.verification.is_verified(user)? {
            return Ok(EntryOutcome::AlreadyVerified);
        }

        let challenge = self.challenge_source.next_challenge();
        self.pending.issue(user, challenge, now);
        self.pending_events.push(GateEvent::ChallengeIssued { user });
        Ok(EntryOutcome::ChallengeIssued { challenge })
    }

    /// Handle a challenge response.
    ///
    /// Only unsigned integers are accepted as answers; anything else is
    /// malformed and re-prompts while leaving the outstanding challenge and
    /// lockout state untouched. A well-formed wrong answer consumes the
    /// challenge and arms the lockout. A response with no outstanding
    /// challenge (consumed or superseded) reports `Expired`.
    pub fn on_response(
        &mut self,
        user: UserId,
        text: &str,
        now: Timestamp,
    ) -> Result<ResponseOutcome, GateError> {
        let Some(expected) = self.pending.peek(user).map(|p| p.challenge.answer()) else {
            return Ok(ResponseOutcome::Expired);
        };

        let Ok(answer) = text.trim().parse::<u64>() else {
            return Ok(ResponseOutcome::Malformed);
        };

        // One consume per well-formed response: success or failure, the
        // challenge is spent.
        self.pending.consume(user);

        if answer != expected as u64 {
            let duration = self.params.lockout_secs;
            self.lockouts.lock(user, duration, now);
            self.pending_events.push(GateEvent::LockoutArmed {
                user,
                unblock_at: now.add_secs(duration),
            });
            return Ok(ResponseOutcome::WrongAnswer {
                locked_for_secs: duration,
            });
        }

        let mut reward = None;
        if self.verification.set_verified(user)? {
            self.pending_events.push(GateEvent::UserVerified { user });
            reward = self.grant_referral_reward(user)?;
        }
        Ok(ResponseOutcome::Verified { reward })
    }

    /// Credit the referrer on the verification edge.
    ///
    /// Reached at most once per user: `set_verified` reports the false→true
    /// transition exactly once, and there is no unset.
    fn grant_referral_reward(&mut self, user: UserId) -> Result<Option<RewardCredit>, GateError> {
        let Some(referrer) = self.referrals.referrer_of(user)? else {
            return Ok(None);
        };

        let amount = self.params.reward_amount;
        match self.referrals.credit_reward(referrer, amount)? {
            Some(new_balance) => {
                self.pending_events.push(GateEvent::RewardCredited {
                    referrer,
                    referred: user,
                    amount,
                });
                Ok(Some(RewardCredit {
                    referrer,
                    amount,
                    new_balance,
                }))
            }
            // The recorded referrer never made contact; nothing to credit.
            None => Ok(None),
        }
    }

    /// Whether the gate is waiting on a challenge answer from `user`.
    pub fn has_pending(&self, user: UserId) -> bool {
        self.pending.has_pending(user)
    }

    /// The challenge `user` still has to answer, for re-prompting.
    pub fn pending_challenge(&self, user: UserId) -> Option<ArithmeticChallenge> {
        self.pending.peek(user).map(|p| p.challenge)
    }

    /// Current state of `user`, derived from the authoritative stores.
    pub fn state_of(&mut self, user: UserId, now: Timestamp) -> Result<GateState, GateError> {
        if self.verification.is_verified(user)? {
            return Ok(GateState::Verified);
        }
        let (locked, _) = self.lockouts.is_locked(user, now);
        if locked {
            return Ok(GateState::LockedOut);
        }
        if self.pending.has_pending(user) {
            return Ok(GateState::NeedsCaptcha);
        }
        Ok(GateState::Unknown)
    }

    /// Drain pending events for the bot to process.
    pub fn drain_events(&mut self) -> Vec<GateEvent> {
        std::mem::take(&mut self.pending_events)
    }

    pub fn params(&self) -> &GateParams {
        &self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatebot_nullables::{FixedChallengeSource, MemoryUserStore, NullClock};
    use gatebot_types::{ArithmeticChallenge, Operator};

    const ALICE: UserId = UserId::new(1);
    const BOB: UserId = UserId::new(2);

    fn challenge(a: i64, op: Operator, b: i64) -> ArithmeticChallenge {
        ArithmeticChallenge::new(a, op, b)
    }

    /// Gate over a shared in-memory store with a scripted challenge sequence.
    fn gate_with(
        store: &Arc<MemoryUserStore>,
        challenges: Vec<ArithmeticChallenge>,
    ) -> AccessGate {
        AccessGate::new(
            GateParams::gate_defaults(),
            Box::new(FixedChallengeSource::new(challenges)),
            store.clone(),
            store.clone(),
            store.clone(),
        )
    }

    /// Run a user through entry up to the issued challenge.
    fn issue_challenge(gate: &mut AccessGate, user: UserId, now: Timestamp) {
        assert_eq!(
            gate.begin_entry(user, "user", None, now).unwrap(),
            EntryStage::Proceed
        );
        let outcome = gate.complete_entry(user, vec![], now).unwrap();
        assert!(matches!(outcome, EntryOutcome::ChallengeIssued { .. }));
    }

    // ── Entry flow ──────────────────────────────────────────────────────

    #[test]
    fn first_contact_creates_the_user_record() {
        let store = Arc::new(MemoryUserStore::new());
        let mut gate = gate_with(&store, vec![challenge(3, Operator::Add, 4)]);

        assert!(store.get_user(ALICE).unwrap().is_none());
        gate.begin_entry(ALICE, "Alice", None, Timestamp::new(100))
            .unwrap();

        let record = store.get_user(ALICE).unwrap().unwrap();
        assert_eq!(record.display_name, "Alice");
        assert!(!record.verified);
    }

    #[test]
    fn unmet_channels_refuse_entry_without_issuing_a_challenge() {
        let store = Arc::new(MemoryUserStore::new());
        let mut gate = gate_with(&store, vec![challenge(3, Operator::Add, 4)]);
        let now = Timestamp::new(100);

        gate.begin_entry(ALICE, "Alice", None, now).unwrap();
        let outcome = gate
            .complete_entry(ALICE, vec![ChannelId::new("@news")], now)
            .unwrap();

        assert_eq!(
            outcome,
            EntryOutcome::Unsubscribed {
                unmet: vec![ChannelId::new("@news")]
            }
        );
        assert!(!gate.has_pending(ALICE));
    }

    #[test]
    fn verified_user_is_granted_access_without_a_challenge() {
        let store = Arc::new(MemoryUserStore::new());
        let mut gate = gate_with(&store, vec![challenge(3, Operator::Add, 4)]);
        let now = Timestamp::new(100);

        issue_challenge(&mut gate, ALICE, now);
        gate.on_response(ALICE, "7", now).unwrap();

        gate.begin_entry(ALICE, "Alice", None, now).unwrap();
        let outcome = gate.complete_entry(ALICE, vec![], now).unwrap();
        assert_eq!(outcome, EntryOutcome::AlreadyVerified);
        assert!(!gate.has_pending(ALICE));
    }

    #[test]
    fn entry_while_locked_reports_remaining_and_skips_all_writes() {
        let store = Arc::new(MemoryUserStore::new());
        let mut gate = gate_with(
            &store,
            vec![challenge(3, Operator::Add, 4), challenge(2, Operator::Add, 2)],
        );
        let clock = NullClock::new(1_000);

        issue_challenge(&mut gate, ALICE, clock.now());
        gate.on_response(ALICE, "999", clock.now()).unwrap();

        // Locked: the referral must not be recorded on this entry.
        let stage = gate
            .begin_entry(ALICE, "Alice", Some(BOB), clock.now())
            .unwrap();
        assert_eq!(stage, EntryStage::Locked { remaining_secs: 60 });
        assert_eq!(store.get_user(ALICE).unwrap().unwrap().referred_by, None);

        clock.advance(59);
        assert_eq!(
            gate.begin_entry(ALICE, "Alice", None, clock.now()).unwrap(),
            EntryStage::Locked { remaining_secs: 1 }
        );

        clock.advance(1);
        assert_eq!(
            gate.begin_entry(ALICE, "Alice", Some(BOB), clock.now())
                .unwrap(),
            EntryStage::Proceed
        );
        assert_eq!(
            store.get_user(ALICE).unwrap().unwrap().referred_by,
            Some(BOB)
        );
    }

    // ── Response flow ───────────────────────────────────────────────────

    #[test]
    fn correct_answer_verifies_the_user() {
        let store = Arc::new(MemoryUserStore::new());
        let mut gate = gate_with(&store, vec![challenge(3, Operator::Add, 4)]);
        let now = Timestamp::new(100);

        issue_challenge(&mut gate, ALICE, now);
        let outcome = gate.on_response(ALICE, "7", now).unwrap();

        assert_eq!(outcome, ResponseOutcome::Verified { reward: None });
        assert!(store.get_user(ALICE).unwrap().unwrap().verified);
        assert!(!gate.has_pending(ALICE));
    }

    #[test]
    fn answer_with_surrounding_whitespace_is_accepted() {
        let store = Arc::new(MemoryUserStore::new());
        let mut gate = gate_with(&store, vec![challenge(3, Operator::Add, 4)]);
        let now = Timestamp::new(100);

        issue_challenge(&mut gate, ALICE, now);
        let outcome = gate.on_response(ALICE, "  7 ", now).unwrap();
        assert_eq!(outcome, ResponseOutcome::Verified { reward: None });
    }

    #[test]
    fn wrong_answer_consumes_the_challenge_and_locks_out() {
        let store = Arc::new(MemoryUserStore::new());
        let mut gate = gate_with(&store, vec![challenge(9, Operator::Sub, 2)]);
        let now = Timestamp::new(100);

        issue_challenge(&mut gate, ALICE, now);
        let outcome = gate.on_response(ALICE, "6", now).unwrap();

        assert_eq!(outcome, ResponseOutcome::WrongAnswer { locked_for_secs: 60 });
        assert!(!gate.has_pending(ALICE));
        assert!(!store.get_user(ALICE).unwrap().unwrap().verified);
        assert_eq!(
            gate.begin_entry(ALICE, "Alice", None, now).unwrap(),
            EntryStage::Locked { remaining_secs: 60 }
        );
    }

    #[test]
    fn malformed_input_re_prompts_and_preserves_the_challenge() {
        let store = Arc::new(MemoryUserStore::new());
        let mut gate = gate_with(&store, vec![challenge(3, Operator::Add, 4)]);
        let now = Timestamp::new(100);

        issue_challenge(&mut gate, ALICE, now);

        for text in ["abc", "seven", "-7", "7.0", ""] {
            assert_eq!(
                gate.on_response(ALICE, text, now).unwrap(),
                ResponseOutcome::Malformed,
                "input {text:?} must be malformed"
            );
            assert!(gate.has_pending(ALICE), "input {text:?} consumed the challenge");
        }

        // No lockout was armed; the preserved challenge still succeeds.
        assert_eq!(
            gate.on_response(ALICE, "7", now).unwrap(),
            ResponseOutcome::Verified { reward: None }
        );
    }

    #[test]
    fn response_without_a_challenge_is_expired() {
        let store = Arc::new(MemoryUserStore::new());
        let mut gate = gate_with(&store, vec![challenge(3, Operator::Add, 4)]);

        let outcome = gate.on_response(ALICE, "7", Timestamp::new(100)).unwrap();
        assert_eq!(outcome, ResponseOutcome::Expired);
    }

    #[test]
    fn replayed_correct_answer_only_succeeds_once() {
        let store = Arc::new(MemoryUserStore::new());
        let mut gate = gate_with(&store, vec![challenge(3, Operator::Add, 4)]);
        let now = Timestamp::new(100);

        issue_challenge(&mut gate, ALICE, now);
        assert!(matches!(
            gate.on_response(ALICE, "7", now).unwrap(),
            ResponseOutcome::Verified { .. }
        ));
        // The duplicate delivery finds no pending challenge.
        assert_eq!(
            gate.on_response(ALICE, "7", now).unwrap(),
            ResponseOutcome::Expired
        );
    }

    #[test]
    fn superseded_challenge_validates_against_the_latest_only() {
        let store = Arc::new(MemoryUserStore::new());
        let mut gate = gate_with(
            &store,
            vec![challenge(9, Operator::Sub, 2), challenge(2, Operator::Add, 2)],
        );
        let now = Timestamp::new(100);

        issue_challenge(&mut gate, ALICE, now);
        // A second /start replaces 9 - 2 with 2 + 2.
        issue_challenge(&mut gate, ALICE, now);

        // The old expected value is wrong against the latest challenge.
        let outcome = gate.on_response(ALICE, "7", now).unwrap();
        assert_eq!(outcome, ResponseOutcome::WrongAnswer { locked_for_secs: 60 });
    }

    // ── Referral rewards ────────────────────────────────────────────────

    #[test]
    fn verification_credits_the_referrer_exactly_once() {
        let store = Arc::new(MemoryUserStore::new());
        store.ensure_user(BOB, "Bob", Timestamp::new(50)).unwrap();
        let mut gate = gate_with(&store, vec![challenge(3, Operator::Add, 4)]);
        let now = Timestamp::new(100);

        gate.begin_entry(ALICE, "Alice", Some(BOB), now).unwrap();
        gate.complete_entry(ALICE, vec![], now).unwrap();
        let outcome = gate.on_response(ALICE, "7", now).unwrap();

        assert_eq!(
            outcome,
            ResponseOutcome::Verified {
                reward: Some(RewardCredit {
                    referrer: BOB,
                    amount: 10,
                    new_balance: 10,
                })
            }
        );
        assert_eq!(store.get_user(BOB).unwrap().unwrap().balance, 10);
        // The referred user's own balance is untouched.
        assert_eq!(store.get_user(ALICE).unwrap().unwrap().balance, 0);
    }

    #[test]
    fn reward_is_not_repeated_on_later_entries() {
        let store = Arc::new(MemoryUserStore::new());
        store.ensure_user(BOB, "Bob", Timestamp::new(50)).unwrap();
        let mut gate = gate_with(
            &store,
            vec![challenge(3, Operator::Add, 4), challenge(2, Operator::Add, 2)],
        );
        let now = Timestamp::new(100);

        gate.begin_entry(ALICE, "Alice", Some(BOB), now).unwrap();
        gate.complete_entry(ALICE, vec![], now).unwrap();
        gate.on_response(ALICE, "7", now).unwrap();

        // Re-entering after verification grants access and credits nothing.
        gate.begin_entry(ALICE, "Alice", Some(BOB), now).unwrap();
        assert_eq!(
            gate.complete_entry(ALICE, vec![], now).unwrap(),
            EntryOutcome::AlreadyVerified
        );
        assert_eq!(store.get_user(BOB).unwrap().unwrap().balance, 10);
    }

    #[test]
    fn reward_survives_a_failed_attempt_in_between() {
        let store = Arc::new(MemoryUserStore::new());
        store.ensure_user(BOB, "Bob", Timestamp::new(50)).unwrap();
        let mut gate = gate_with(
            &store,
            vec![challenge(9, Operator::Sub, 2), challenge(3, Operator::Add, 4)],
        );
        let clock = NullClock::new(1_000);

        // First attempt fails and locks.
        gate.begin_entry(ALICE, "Alice", Some(BOB), clock.now())
            .unwrap();
        gate.complete_entry(ALICE, vec![], clock.now()).unwrap();
        gate.on_response(ALICE, "6", clock.now()).unwrap();
        assert_eq!(store.get_user(BOB).unwrap().unwrap().balance, 0);

        // After the lockout expires the retry succeeds; one reward total.
        clock.advance(60);
        gate.begin_entry(ALICE, "Alice", Some(BOB), clock.now())
            .unwrap();
        gate.complete_entry(ALICE, vec![], clock.now()).unwrap();
        let outcome = gate.on_response(ALICE, "7", clock.now()).unwrap();

        assert!(matches!(
            outcome,
            ResponseOutcome::Verified { reward: Some(_) }
        ));
        assert_eq!(store.get_user(BOB).unwrap().unwrap().balance, 10);
    }

    #[test]
    fn self_referral_is_ignored_and_never_rewarded() {
        let store = Arc::new(MemoryUserStore::new());
        let mut gate = gate_with(&store, vec![challenge(3, Operator::Add, 4)]);
        let now = Timestamp::new(100);

        gate.begin_entry(ALICE, "Alice", Some(ALICE), now).unwrap();
        gate.complete_entry(ALICE, vec![], now).unwrap();
        let outcome = gate.on_response(ALICE, "7", now).unwrap();

        assert_eq!(outcome, ResponseOutcome::Verified { reward: None });
        let record = store.get_user(ALICE).unwrap().unwrap();
        assert_eq!(record.referred_by, None);
        assert_eq!(record.balance, 0);
    }

    #[test]
    fn referrer_without_a_record_is_recorded_but_not_credited() {
        let store = Arc::new(MemoryUserStore::new());
        let ghost = UserId::new(999);
        let mut gate = gate_with(&store, vec![challenge(3, Operator::Add, 4)]);
        let now = Timestamp::new(100);

        gate.begin_entry(ALICE, "Alice", Some(ghost), now).unwrap();
        gate.complete_entry(ALICE, vec![], now).unwrap();
        let outcome = gate.on_response(ALICE, "7", now).unwrap();

        assert_eq!(outcome, ResponseOutcome::Verified { reward: None });
        assert_eq!(
            store.get_user(ALICE).unwrap().unwrap().referred_by,
            Some(ghost)
        );
    }

    #[test]
    fn referrer_is_first_writer_wins_across_entries() {
        let store = Arc::new(MemoryUserStore::new());
        let carol = UserId::new(3);
        let mut gate = gate_with(
            &store,
            vec![challenge(3, Operator::Add, 4), challenge(2, Operator::Add, 2)],
        );
        let now = Timestamp::new(100);

        gate.begin_entry(ALICE, "Alice", Some(BOB), now).unwrap();
        gate.begin_entry(ALICE, "Alice", Some(carol), now).unwrap();

        assert_eq!(
            store.get_user(ALICE).unwrap().unwrap().referred_by,
            Some(BOB)
        );
    }

    // ── Events ──────────────────────────────────────────────────────────

    #[test]
    fn happy_path_emits_the_full_event_sequence() {
        let store = Arc::new(MemoryUserStore::new());
        store.ensure_user(BOB, "Bob", Timestamp::new(50)).unwrap();
        let mut gate = gate_with(&store, vec![challenge(3, Operator::Add, 4)]);
        let now = Timestamp::new(100);

        gate.begin_entry(ALICE, "Alice", Some(BOB), now).unwrap();
        gate.complete_entry(ALICE, vec![], now).unwrap();
        gate.on_response(ALICE, "7", now).unwrap();

        let events = gate.drain_events();
        assert_eq!(
            events,
            vec![
                GateEvent::ReferralRecorded {
                    user: ALICE,
                    referrer: BOB
                },
                GateEvent::ChallengeIssued { user: ALICE },
                GateEvent::UserVerified { user: ALICE },
                GateEvent::RewardCredited {
                    referrer: BOB,
                    referred: ALICE,
                    amount: 10
                },
            ]
        );
    }

    #[test]
    fn wrong_answer_emits_lockout_armed() {
        let store = Arc::new(MemoryUserStore::new());
        let mut gate = gate_with(&store, vec![challenge(9, Operator::Sub, 2)]);
        let now = Timestamp::new(100);

        issue_challenge(&mut gate, ALICE, now);
        gate.drain_events();
        gate.on_response(ALICE, "6", now).unwrap();

        let events = gate.drain_events();
        assert_eq!(
            events,
            vec![GateEvent::LockoutArmed {
                user: ALICE,
                unblock_at: Timestamp::new(160)
            }]
        );
    }

    #[test]
    fn drain_events_clears_the_buffer() {
        let store = Arc::new(MemoryUserStore::new());
        let mut gate = gate_with(&store, vec![challenge(3, Operator::Add, 4)]);

        issue_challenge(&mut gate, ALICE, Timestamp::new(100));
        assert!(!gate.drain_events().is_empty());
        assert!(gate.drain_events().is_empty());
    }

    // ── Derived state view ──────────────────────────────────────────────

    #[test]
    fn state_follows_the_transition_table() {
        let store = Arc::new(MemoryUserStore::new());
        let mut gate = gate_with(
            &store,
            vec![challenge(9, Operator::Sub, 2), challenge(3, Operator::Add, 4)],
        );
        let clock = NullClock::new(1_000);

        assert_eq!(
            gate.state_of(ALICE, clock.now()).unwrap(),
            GateState::Unknown
        );

        issue_challenge(&mut gate, ALICE, clock.now());
        assert_eq!(
            gate.state_of(ALICE, clock.now()).unwrap(),
            GateState::NeedsCaptcha
        );

        gate.on_response(ALICE, "6", clock.now()).unwrap();
        assert_eq!(
            gate.state_of(ALICE, clock.now()).unwrap(),
            GateState::LockedOut
        );

        clock.advance(60);
        assert_eq!(
            gate.state_of(ALICE, clock.now()).unwrap(),
            GateState::Unknown
        );

        issue_challenge(&mut gate, ALICE, clock.now());
        gate.on_response(ALICE, "7", clock.now()).unwrap();
        assert_eq!(
            gate.state_of(ALICE, clock.now()).unwrap(),
            GateState::Verified
        );
    }
}
