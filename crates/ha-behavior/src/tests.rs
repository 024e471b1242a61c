//! Unit tests for ha-behavior.

use ha_chat::{ChannelKind, Outbound};
use ha_core::{AutomationConfig, CaveChoice, HostApiVersion, ParticipantId, SessionClock, Tick, TimeOfDay};
use ha_readiness::{checks, ReadinessRegistry};
use ha_world::{FestivalInfo, Menu, Question, ScriptedWorld, Tile, Warp, WorldCall, WorldOps};

use crate::*;

// ── Helpers ───────────────────────────────────────────────────────────────────

const HOST: ParticipantId = ParticipantId(100);
const A: ParticipantId = ParticipantId(1);
const B: ParticipantId = ParticipantId(2);

/// A world, a registry and a standard chain, stepped one tick at a time.
/// Ten ticks per second: transition waits are 20 ticks, dialogue waits 5.
struct Rig {
    world:     ScriptedWorld,
    readiness: ReadinessRegistry,
    config:    AutomationConfig,
    clock:     SessionClock,
    state:     BehaviorState,
    chain:     BehaviorChain,
    /// Chat the links queued, oldest first.
    outbox:    Vec<Outbound>,
}

impl Rig {
    fn new(version: HostApiVersion) -> Self {
        let config = AutomationConfig { tick_rate: 10, ..AutomationConfig::default() };
        let mut world = ScriptedWorld::new(version, HOST);
        world.time = TimeOfDay(900);
        Self {
            world,
            readiness: ReadinessRegistry::new(),
            clock: SessionClock::new(config.tick_rate),
            config,
            state: BehaviorState::new(),
            chain: BehaviorChain::standard(),
            outbox: Vec::new(),
        }
    }

    fn with_others(mut self) -> Self {
        self.world.connect(A, "Alice", Tile::new(10, 10));
        self.world.connect(B, "Bob", Tile::new(12, 10));
        self
    }

    fn ctx(&mut self) -> LinkContext<'_> {
        LinkContext::new(&mut self.world, &mut self.readiness, &self.config, self.clock)
    }

    fn tick(&mut self) -> ChainStep {
        let mut ctx = LinkContext::new(&mut self.world, &mut self.readiness, &self.config, self.clock);
        let step = self.chain.process(&mut self.state, &mut ctx);
        self.outbox.append(&mut ctx.outbox);
        self.clock.advance();
        step
    }

    fn run(&mut self, ticks: usize) -> Vec<ChainStep> {
        (0..ticks).map(|_| self.tick()).collect()
    }

    fn ready(&mut self, check: &str, who: &[ParticipantId]) {
        for p in who {
            self.readiness.mark_ready(check, *p);
        }
    }
}

fn festival() -> FestivalInfo {
    FestivalInfo {
        id:           "spring13".into(),
        venue:        Warp::new("Town", Tile::new(27, 67)),
        start:        TimeOfDay(900),
        end:          TimeOfDay(1400),
        chat_enabled: true,
        night_market: false,
    }
}

// ── TransitionPhase ───────────────────────────────────────────────────────────

#[cfg(test)]
mod transition_tests {
    use super::*;

    #[test]
    fn idle_and_unwanted_is_settled_without_change() {
        let mut p = TransitionPhase::Idle;
        for _ in 0..5 {
            assert_eq!(p.poll(false), PhaseStep::Settled);
        }
        assert_eq!(p, TransitionPhase::Idle);
    }

    #[test]
    fn enter_then_settle_clears_the_wait() {
        let mut p = TransitionPhase::Idle;
        assert_eq!(p.poll(true), PhaseStep::Enter);
        p.enter(3);
        assert!(p.in_progress());
        assert_eq!(p.poll(true), PhaseStep::Settled);
        assert_eq!(p, TransitionPhase::InProgress);
    }

    #[test]
    fn pending_change_burns_wait_ticks_first() {
        let mut p = TransitionPhase::Idle;
        p.enter(2);
        assert_eq!(p.poll(false), PhaseStep::Wait);
        assert_eq!(p.poll(false), PhaseStep::Wait);
        assert_eq!(p.ticks_left(), 0);
        assert_eq!(p.poll(false), PhaseStep::Leave);
        p.leave(0);
        assert_eq!(p, TransitionPhase::Idle);
    }

    #[test]
    fn wait_keeps_the_settled_phase() {
        let mut p = TransitionPhase::InProgress;
        p.wait(4);
        assert_eq!(p, TransitionPhase::Waiting { ticks_left: 4, in_progress: true });
        let mut q = TransitionPhase::Idle;
        q.wait(0);
        assert_eq!(q, TransitionPhase::Idle);
    }
}

// ── Chain properties ──────────────────────────────────────────────────────────

#[cfg(test)]
mod chain_tests {
    use super::*;

    #[test]
    fn standard_chain_order_is_fixed() {
        assert_eq!(BehaviorChain::standard().link_names(), vec![
            "unlock_community_center",
            "end_community_center",
            "get_fishing_rod",
            "joja_membership",
            "dialogue",
            "sleep",
            "festival_attendance",
            "festival_event_start",
            "festival_end",
        ]);
    }

    struct Noop;

    impl BehaviorLink for Noop {
        fn name(&self) -> &'static str {
            "noop"
        }

        fn process(&self, _: &mut BehaviorState, _: &mut LinkContext<'_>) -> LinkOutcome {
            LinkOutcome::Forward
        }
    }

    struct Halt;

    impl BehaviorLink for Halt {
        fn name(&self) -> &'static str {
            "halt"
        }

        fn process(&self, state: &mut BehaviorState, _: &mut LinkContext<'_>) -> LinkOutcome {
            state.dialogue_wait += 1;
            LinkOutcome::Waited
        }
    }

    #[test]
    fn custom_chain_stops_at_first_non_forwarding_link() {
        let mut rig = Rig::new(HostApiVersion::Current);
        rig.chain = BehaviorChain::new().then(Noop).then(Halt).then(Halt);
        assert_eq!(rig.chain.len(), 3);

        let step = rig.tick();
        assert_eq!(step, ChainStep { outcome: LinkOutcome::Waited, link: Some("halt") });
        assert!(!step.acted());
        assert_eq!(rig.state.dialogue_wait, 1);
    }

    #[test]
    fn all_forwarding_chain_reports_no_link() {
        let mut rig = Rig::new(HostApiVersion::Current);
        rig.chain = BehaviorChain::new().then(Noop);
        assert_eq!(rig.tick().link, None);
        assert!(BehaviorChain::new().is_empty());
    }

    #[test]
    fn idle_world_forwards_without_touching_state() {
        let mut rig = Rig::new(HostApiVersion::Current).with_others();
        for step in rig.run(100) {
            assert_eq!(step, ChainStep { outcome: LinkOutcome::Forward, link: None });
        }
        assert_eq!(rig.state, BehaviorState::default());
        assert!(rig.world.calls.is_empty());
    }

    #[test]
    fn at_most_one_world_call_per_tick() {
        let mut rig = Rig::new(HostApiVersion::Legacy);
        rig.world.connect(A, "Alice", Tile::new(10, 10));
        rig.config.auto_sleep_time = TimeOfDay(1700);
        rig.world.time = TimeOfDay(1700);
        rig.world.quests.insert(13);
        rig.world.menus.extend([Menu::Dialogue(None), Menu::Naming, Menu::LevelUp]);

        for _ in 0..200 {
            let before = rig.world.calls.len();
            let step = rig.tick();
            let delta = rig.world.calls.len() - before;
            assert!(delta <= 1, "{delta} calls in one tick");
            assert_eq!(step.acted(), delta == 1);
        }
        let calls = rig.world.take_calls();
        assert_eq!(calls.len(), 6, "{calls:?}");
        assert!(matches!(&calls[0], WorldCall::Warp { to, .. } if to.location == "Beach"));
        assert_eq!(calls[1], WorldCall::AdvanceDialogue);
        assert_eq!(calls[2], WorldCall::SubmitName("Stella".into()));
        assert_eq!(calls[3], WorldCall::DismissLevelUp);
        assert!(matches!(&calls[4], WorldCall::Warp { to, .. } if to.location == "FarmHouse"));
        assert_eq!(calls[5], WorldCall::OpenReadyCheck("sleep".into()));
    }

    #[test]
    fn new_day_is_idempotent() {
        let mut state = BehaviorState {
            sleep:           TransitionPhase::InProgress,
            dialogue_wait:   3,
            sleep_executing: true,
            sleep_attempts:  2,
            errand:          Some(Errand::GetFishingRod),
            votes:           Some(FestivalVotes::open(Tick(5))),
            ..BehaviorState::default()
        };
        state.new_day();
        let once = state.clone();
        state.new_day();
        assert_eq!(state, once);
        assert_eq!(state, BehaviorState::default());
    }
}

// ── Sleep ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod sleep_tests {
    use super::*;
    use crate::predicates::should_sleep;

    #[test]
    fn others_in_bed_trigger_sleep_before_the_threshold() {
        let mut rig = Rig::new(HostApiVersion::Current).with_others();
        rig.world.time = TimeOfDay(1200);
        assert!(!should_sleep(&mut rig.ctx()));
        rig.ready(checks::SLEEP, &[A, B]);
        assert!(should_sleep(&mut rig.ctx()));
    }

    #[test]
    fn nobody_else_online_never_sleeps() {
        let mut rig = Rig::new(HostApiVersion::Current);
        rig.world.time = TimeOfDay(2500);
        assert!(!should_sleep(&mut rig.ctx()));
    }

    #[test]
    fn threshold_alone_triggers_sleep() {
        let mut rig = Rig::new(HostApiVersion::Current).with_others();
        rig.world.time = TimeOfDay(2200);
        assert!(should_sleep(&mut rig.ctx()));
    }

    #[test]
    fn day_ends_once_when_everyone_is_ready() {
        let mut rig = Rig::new(HostApiVersion::Legacy).with_others();
        rig.world.time = TimeOfDay(2200);

        let step = rig.tick();
        assert_eq!(step, ChainStep { outcome: LinkOutcome::Acted, link: Some("sleep") });
        assert_eq!(rig.tick().link, None, "others not ready yet");

        rig.ready(checks::SLEEP, &[A, B]);
        rig.run(30);
        assert_eq!(rig.world.take_calls(), vec![
            WorldCall::OpenReadyCheck("sleep".into()),
            WorldCall::AdvanceDay,
        ]);
        assert!(rig.state.sleep_executing);
        assert_eq!(rig.state.sleep_attempts, 1);
    }

    #[test]
    fn unsupported_advance_day_falls_back() {
        let mut rig = Rig::new(HostApiVersion::Current).with_others();
        rig.world.time = TimeOfDay(2200);
        rig.ready(checks::SLEEP, &[A, B]);
        rig.run(10);
        assert_eq!(rig.world.take_calls(), vec![
            WorldCall::OpenReadyCheck("sleep".into()),
            WorldCall::ForceEndOfDay,
        ]);
    }

    #[test]
    fn upstream_readiness_is_reconciled() {
        let mut rig = Rig::new(HostApiVersion::Legacy).with_others();
        rig.world.time = TimeOfDay(2200);
        rig.world.mark_upstream_ready(checks::SLEEP, A);
        rig.world.mark_upstream_ready(checks::SLEEP, B);
        rig.run(3);
        assert_eq!(rig.world.calls.last(), Some(&WorldCall::AdvanceDay));
    }

    #[test]
    fn failed_attempts_are_capped_per_day() {
        let mut rig = Rig::new(HostApiVersion::Legacy).with_others();
        rig.world.time = TimeOfDay(2200);
        rig.world.rejections.insert("advance_day", "busy".into());
        rig.ready(checks::SLEEP, &[A, B]);
        rig.run(50);
        assert_eq!(rig.state.sleep_attempts, state::MAX_SLEEP_ATTEMPTS);
        assert!(!rig.state.sleep_executing);
        assert_eq!(rig.world.take_calls(), vec![WorldCall::OpenReadyCheck("sleep".into())]);
    }

    #[test]
    fn host_walks_home_before_going_to_bed() {
        let mut rig = Rig::new(HostApiVersion::Current).with_others();
        rig.world.time = TimeOfDay(2200);
        rig.world.warp(HOST, &Warp::farm_return()).ok();
        rig.world.take_calls();

        rig.run(21);
        let bed = rig.world.bed.clone();
        assert_eq!(rig.world.calls, vec![WorldCall::Warp { who: HOST, to: bed }]);
        rig.tick();
        assert_eq!(rig.world.calls.last(), Some(&WorldCall::OpenReadyCheck("sleep".into())));
    }

    #[test]
    fn host_gets_up_when_the_others_leave() {
        let mut rig = Rig::new(HostApiVersion::Current).with_others();
        rig.world.time = TimeOfDay(2200);
        rig.tick();
        rig.world.disconnect(A);
        rig.world.disconnect(B);
        rig.run(30);
        assert_eq!(rig.world.take_calls(), vec![
            WorldCall::OpenReadyCheck("sleep".into()),
            WorldCall::CloseReadyCheck("sleep".into()),
        ]);
        assert_eq!(rig.state.sleep, TransitionPhase::Idle);
        assert!(!rig.readiness.cached(checks::SLEEP).is_some_and(|s| s.contains(&HOST)));
    }
}

// ── Dialogue ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod dialogue_tests {
    use super::*;

    #[test]
    fn cave_question_follows_config() {
        let mut rig = Rig::new(HostApiVersion::Current);
        rig.config.cave_choice = CaveChoice::Bats;
        rig.world.menus.push_back(Menu::Dialogue(Some(Question::new("Cave?", ["Mushrooms", "Bats"]))));
        rig.tick();
        assert_eq!(rig.world.calls, vec![WorldCall::ChooseResponse(1)]);
    }

    #[test]
    fn yes_no_question_follows_accept_pet() {
        let mut rig = Rig::new(HostApiVersion::Current);
        rig.config.accept_pet = false;
        rig.world.menus.push_back(Menu::Dialogue(Some(Question::new("Pet?", ["Yes", "No"]))));
        rig.tick();
        assert_eq!(rig.world.calls, vec![WorldCall::ChooseResponse(1)]);
    }

    #[test]
    fn other_question_takes_first_response() {
        let mut rig = Rig::new(HostApiVersion::Current);
        rig.world.menus.push_back(Menu::Dialogue(Some(Question::new("?", ["Left", "Right"]))));
        rig.tick();
        assert_eq!(rig.world.calls, vec![WorldCall::ChooseResponse(0)]);
    }

    #[test]
    fn actions_are_spaced_by_the_dialogue_wait() {
        let mut rig = Rig::new(HostApiVersion::Current);
        rig.world.menus.extend([Menu::Dialogue(None), Menu::Naming]);

        assert!(rig.tick().acted());
        for _ in 0..5 {
            assert_eq!(rig.tick().outcome, LinkOutcome::Waited);
        }
        assert!(rig.tick().acted());
        assert_eq!(rig.world.take_calls(), vec![
            WorldCall::AdvanceDialogue,
            WorldCall::SubmitName("Stella".into()),
        ]);
        // Menu gone: counter cleared, chain forwards.
        assert_eq!(rig.tick().link, None);
        assert_eq!(rig.state.dialogue_wait, 0);
    }

    #[test]
    fn unknown_menu_is_left_alone() {
        let mut rig = Rig::new(HostApiVersion::Current);
        rig.world.menus.push_back(Menu::Other("shop".into()));
        rig.run(5);
        assert!(rig.world.calls.is_empty());
    }
}

// ── Errands ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod errand_tests {
    use super::*;

    #[test]
    fn host_attends_community_center_unlock_and_returns() {
        let mut rig = Rig::new(HostApiVersion::Current);
        rig.world.days_played = 5;

        let step = rig.tick();
        assert_eq!(step.link, Some("unlock_community_center"));
        assert_eq!(rig.state.errand, Some(Errand::UnlockCommunityCenter));
        assert_eq!(rig.tick().link, None);

        rig.world.seen_events.insert(611_439);
        rig.tick();
        assert_eq!(rig.state.errand, None);
        assert_eq!(rig.world.take_calls(), vec![
            WorldCall::Warp { who: HOST, to: Warp::new("Town", Tile::new(0, 54)) },
            WorldCall::Warp { who: HOST, to: Warp::farm_return() },
        ]);
    }

    #[test]
    fn errands_wait_for_dry_weather_and_no_festival() {
        let mut rig = Rig::new(HostApiVersion::Current);
        rig.world.days_played = 5;
        rig.world.raining.insert("Town".into());
        rig.tick();
        rig.world.raining.clear();
        rig.world.festival = Some(festival());
        rig.world.time = TimeOfDay(800);
        rig.tick();
        assert!(rig.world.calls.is_empty());
    }

    #[test]
    fn joja_membership_is_bought_once() {
        let mut rig = Rig::new(HostApiVersion::Current);
        rig.config.purchase_joja_membership = true;
        rig.world.seen_events.insert(611_439);
        rig.run(5);
        assert_eq!(rig.world.take_calls(), vec![WorldCall::PurchaseJojaMembership]);
    }
}

// ── Festivals ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod festival_tests {
    use super::*;

    fn at_festival() -> Rig {
        let mut rig = Rig::new(HostApiVersion::Current).with_others();
        rig.world.festival = Some(festival());
        rig.world.time = TimeOfDay(1000);
        rig
    }

    #[test]
    fn full_festival_round_trip() {
        let mut rig = at_festival();
        assert_eq!(rig.tick().link, None, "nobody waiting yet");

        rig.ready(checks::FESTIVAL_START, &[A, B]);
        rig.run(2);
        assert!(rig.world.in_festival);
        assert!(rig.state.votes_enabled());
        assert_eq!(rig.outbox, vec![Outbound { to: None, text: votes::ENTRY_MESSAGE.into() }]);
        assert!(rig.world.broadcasts().is_empty(), "links never talk to the world directly");
        assert_eq!(rig.tick().link, None, "waiting for votes");

        assert_eq!(rig.state.handle_festival_chat(A, ChannelKind::Public, "start"), VoteOutcome::Voted);
        assert_eq!(rig.state.handle_festival_chat(B, ChannelKind::Public, " START "), VoteOutcome::Voted);
        rig.tick();

        rig.ready(checks::FESTIVAL_END, &[A, B]);
        rig.run(10);
        assert!(!rig.world.in_festival);
        assert!(!rig.state.votes_enabled());
        assert_eq!(rig.world.take_calls(), vec![
            WorldCall::OpenReadyCheck("festivalStart".into()),
            WorldCall::Warp { who: HOST, to: festival().venue },
            WorldCall::StartFestivalEvent,
            WorldCall::OpenReadyCheck("festivalEnd".into()),
            WorldCall::EndFestival,
            WorldCall::CloseReadyCheck("festivalEnd".into()),
        ]);
    }

    #[test]
    fn night_market_is_never_attended() {
        let mut rig = at_festival();
        rig.world.festival = Some(FestivalInfo { night_market: true, ..festival() });
        rig.ready(checks::FESTIVAL_START, &[A, B]);
        rig.run(10);
        assert!(rig.world.calls.is_empty());
    }

    #[test]
    fn main_event_is_forced_after_the_delay() {
        let mut rig = at_festival();
        rig.ready(checks::FESTIVAL_START, &[A, B]);
        rig.run(3);
        // Votes opened on tick 1; the delay is 600 ticks.
        rig.run(597);
        assert!(!rig.world.calls.contains(&WorldCall::StartFestivalEvent));
        rig.run(5);
        let starts = rig.world.calls.iter().filter(|c| **c == WorldCall::StartFestivalEvent).count();
        assert_eq!(starts, 1);
    }

    #[test]
    fn cancelled_forced_start_waits_for_votes() {
        let mut rig = at_festival();
        rig.ready(checks::FESTIVAL_START, &[A, B]);
        rig.run(3);
        assert_eq!(
            rig.state.handle_festival_chat(A, ChannelKind::Private, "Cancel Festival"),
            VoteOutcome::ForcedStartCancelled,
        );
        rig.run(700);
        assert!(!rig.world.calls.contains(&WorldCall::StartFestivalEvent));
    }

    #[test]
    fn festival_closing_time_ends_it_without_votes() {
        let mut rig = at_festival();
        rig.ready(checks::FESTIVAL_START, &[A, B]);
        rig.run(3);
        rig.world.time = TimeOfDay(1400);
        rig.run(3);
        assert!(rig.world.calls.contains(&WorldCall::EndFestival));
    }

    #[test]
    fn festival_day_suppresses_sleep() {
        let mut rig = at_festival();
        rig.world.time = TimeOfDay(1000);
        rig.config.auto_sleep_time = TimeOfDay(900);
        rig.run(5);
        assert!(!rig.world.calls.contains(&WorldCall::OpenReadyCheck("sleep".into())));
    }
}

// ── Votes ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod vote_tests {
    use super::*;

    #[test]
    fn start_and_cancel_toggle_a_vote() {
        let mut v = FestivalVotes::open(Tick(0));
        assert_eq!(v.handle(A, ChannelKind::Public, "start"), VoteOutcome::Voted);
        assert_eq!(v.handle(A, ChannelKind::Public, "start"), VoteOutcome::Voted);
        assert_eq!(v.count_among(&[A, B]), 1);
        assert_eq!(v.handle(A, ChannelKind::Private, "cancel"), VoteOutcome::Withdrawn);
        assert!(v.is_empty());
        assert_eq!(v.handle(A, ChannelKind::Public, "hello"), VoteOutcome::Ignored);
    }

    #[test]
    fn cancel_phrases_need_the_private_channel() {
        let mut state = BehaviorState::new();
        assert_eq!(
            state.handle_festival_chat(A, ChannelKind::Public, "stop festival"),
            VoteOutcome::Ignored,
        );
        assert!(!state.forced_start_cancelled);
        assert_eq!(
            state.handle_festival_chat(A, ChannelKind::Private, "stop festival"),
            VoteOutcome::ForcedStartCancelled,
        );
        assert!(state.forced_start_cancelled);
    }

    #[test]
    fn votes_only_count_while_enabled() {
        let mut state = BehaviorState::new();
        assert_eq!(state.handle_festival_chat(A, ChannelKind::Public, "start"), VoteOutcome::Ignored);
        state.votes = Some(FestivalVotes::open(Tick(0)));
        assert_eq!(state.handle_festival_chat(A, ChannelKind::Public, "start"), VoteOutcome::Voted);
        state.remove_participant(A);
        assert_eq!(state.votes.as_ref().map(FestivalVotes::len), Some(0));
    }
}
