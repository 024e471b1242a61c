//! Unit tests for ha-world.

use ha_core::{HostApiVersion, ParticipantId, TimeOfDay};
use ha_readiness::ReadySource;

use crate::*;

const HOST: ParticipantId = ParticipantId(100);
const ALICE: ParticipantId = ParticipantId(1);

// ── Types ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod type_tests {
    use super::*;

    #[test]
    fn tile_in_front_follows_facing() {
        let mut pos = Position { location: "Farm".into(), tile: Tile::new(10, 10), facing: Facing::Up };
        assert_eq!(pos.tile_in_front(), Tile::new(10, 9));
        pos.facing = Facing::Right;
        assert_eq!(pos.tile_in_front(), Tile::new(11, 10));
        pos.facing = Facing::Down;
        assert_eq!(pos.tile_in_front(), Tile::new(10, 11));
        pos.facing = Facing::Left;
        assert_eq!(pos.tile_in_front(), Tile::new(9, 10));
    }

    #[test]
    fn structure_footprint_covers_its_tiles() {
        let cabin = Structure { id: StructureId(0), kind: StructureKind::LogCabin, origin: Tile::new(10, 10) };
        assert!(cabin.occupies(Tile::new(10, 10)));
        assert!(cabin.occupies(Tile::new(14, 12)));
        assert!(!cabin.occupies(Tile::new(15, 10)));
        assert!(!cabin.occupies(Tile::new(10, 13)));
        assert!(!cabin.occupies(Tile::new(9, 10)));
    }

    #[test]
    fn buildable_kinds_parse_from_command_tokens() {
        assert_eq!(StructureKind::from_command_name("stone_cabin"), Some(StructureKind::StoneCabin));
        assert_eq!(StructureKind::from_command_name("LOG_CABIN"), Some(StructureKind::LogCabin));
        assert_eq!(StructureKind::from_command_name("shipping_bin"), None);
        assert_eq!(StructureKind::PlankCabin.to_string(), "Plank Cabin");
    }

    #[test]
    fn question_lookup_ignores_case() {
        let q = Question::new("Which?", ["Mushrooms", "Bats"]);
        assert_eq!(q.position_of("bats"), Some(1));
        assert_eq!(q.position_of("yes"), None);
    }

    #[test]
    fn festival_window_is_inclusive() {
        let f = FestivalInfo {
            id:           "spring13".into(),
            venue:        Warp::new("Town", Tile::new(27, 67)),
            start:        TimeOfDay(900),
            end:          TimeOfDay(1400),
            chat_enabled: true,
            night_market: false,
        };
        assert!(f.is_open_at(TimeOfDay(900)));
        assert!(f.is_open_at(TimeOfDay(1400)));
        assert!(!f.is_open_at(TimeOfDay(1410)));
    }
}

// ── Adapter selection ─────────────────────────────────────────────────────────

#[cfg(test)]
mod adapter_tests {
    use super::*;

    #[test]
    fn selects_the_registered_version() {
        let registry = AdapterRegistry::new()
            .register(HostApiVersion::Legacy, || Box::new(ScriptedWorld::new(HostApiVersion::Legacy, HOST)))
            .register(HostApiVersion::Current, || Box::new(ScriptedWorld::new(HostApiVersion::Current, HOST)));
        let world = registry.select(HostApiVersion::Legacy).expect("registered");
        assert_eq!(world.api_version(), HostApiVersion::Legacy);
        assert_eq!(world.host(), HOST);
    }

    #[test]
    fn missing_version_is_an_error() {
        let registry = AdapterRegistry::new()
            .register(HostApiVersion::Current, || Box::new(ScriptedWorld::new(HostApiVersion::Current, HOST)));
        assert!(!registry.supports(HostApiVersion::Legacy));
        assert!(matches!(
            registry.select(HostApiVersion::Legacy),
            Err(WorldError::NoAdapter(HostApiVersion::Legacy))
        ));
    }
}

// ── ScriptedWorld ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod scripted_tests {
    use super::*;

    #[test]
    fn ready_check_dialog_publishes_host_readiness() {
        let mut w = ScriptedWorld::new(HostApiVersion::Legacy, HOST);
        w.open_ready_check("sleep").unwrap();
        assert_eq!(w.active_menu(), Some(Menu::ReadyCheck("sleep".into())));
        assert_eq!(w.ready_participants("sleep"), Some(vec![HOST]));
        w.close_ready_check("sleep").unwrap();
        assert_eq!(w.ready_participants("sleep"), Some(vec![]));
        assert_eq!(w.active_menu(), None);
    }

    #[test]
    fn current_host_cannot_advance_day_directly() {
        let mut legacy = ScriptedWorld::new(HostApiVersion::Legacy, HOST);
        assert!(legacy.advance_day().is_ok());
        let mut current = ScriptedWorld::new(HostApiVersion::Current, HOST);
        assert_eq!(current.advance_day(), Err(WorldError::Unsupported("advance_day")));
        assert!(current.force_end_of_day().is_ok());
        assert_eq!(current.time, TimeOfDay::DAY_END);
    }

    #[test]
    fn failing_lookup_returns_none() {
        let mut w = ScriptedWorld::new(HostApiVersion::Current, HOST);
        w.ready_lookup_fails = true;
        assert_eq!(w.ready_participants("sleep"), None);
    }

    #[test]
    fn only_effective_mutations_are_logged() {
        let mut w = ScriptedWorld::new(HostApiVersion::Current, HOST);
        w.rejections.insert("warp", "blocked".into());
        assert_eq!(w.warp(HOST, &Warp::farm_return()), Err(WorldError::rejected("blocked")));
        assert!(w.calls.is_empty());
        w.rejections.clear();
        w.warp(HOST, &Warp::farm_return()).unwrap();
        assert_eq!(w.take_calls(), vec![WorldCall::Warp { who: HOST, to: Warp::farm_return() }]);
        assert_eq!(w.position_of(HOST).unwrap().location, "Farm");
    }

    #[test]
    fn placement_rejects_overlap() {
        let mut w = ScriptedWorld::new(HostApiVersion::Current, HOST);
        w.add_structure(StructureKind::ShippingBin, Tile::new(71, 14));
        let err = w.place_structure(&StructureKind::LogCabin, Tile::new(68, 12), ALICE).unwrap_err();
        assert!(matches!(err, WorldError::Rejected(_)));
        let id = w.place_structure(&StructureKind::LogCabin, Tile::new(60, 12), ALICE).unwrap();
        assert_eq!(w.structure_at(Tile::new(62, 13)).map(|s| s.id), Some(id));
        assert_eq!(w.count_structures(&StructureKind::LogCabin), 1);
    }

    #[test]
    fn menus_pop_when_answered() {
        let mut w = ScriptedWorld::new(HostApiVersion::Current, HOST);
        w.menus.push_back(Menu::Dialogue(None));
        w.menus.push_back(Menu::Naming);
        w.advance_dialogue().unwrap();
        assert_eq!(w.active_menu(), Some(Menu::Naming));
        assert!(w.advance_dialogue().is_err());
        w.submit_name("Stella").unwrap();
        assert_eq!(w.active_menu(), None);
    }

    #[test]
    fn private_chat_to_absent_participant_fails() {
        let mut w = ScriptedWorld::new(HostApiVersion::Current, HOST);
        assert_eq!(w.send_chat(Some(ALICE), "hi"), Err(WorldError::UnknownParticipant(ALICE)));
        w.connect(ALICE, "Alice", Tile::new(1, 1));
        w.send_chat(Some(ALICE), "hi").unwrap();
        w.send_chat(None, "hello all").unwrap();
        assert_eq!(w.private_chat(ALICE), vec!["hi"]);
        assert_eq!(w.broadcasts(), vec!["hello all"]);
    }

    #[test]
    fn disconnect_clears_upstream_readiness() {
        let mut w = ScriptedWorld::new(HostApiVersion::Current, HOST);
        w.connect(ALICE, "Alice", Tile::new(1, 1));
        w.mark_upstream_ready("sleep", ALICE);
        w.disconnect(ALICE);
        assert_eq!(w.ready_participants("sleep"), Some(vec![]));
        assert_eq!(w.online_participants(), vec![HOST]);
    }

    #[test]
    fn restoring_vitals_refills_to_the_maxima() {
        let mut w = ScriptedWorld::new(HostApiVersion::Current, HOST);
        assert!(w.host_vitals().is_some_and(|v| v.is_full()));
        w.host_vitals.health = 12;
        w.host_vitals.stamina = 0.5;
        assert!(!w.host_vitals.is_full());
        w.restore_host_vitals().unwrap();
        assert_eq!(w.host_vitals, Vitals::full(100, 270.0));
        assert_eq!(w.take_calls(), vec![WorldCall::RestoreHostVitals]);
    }

    #[test]
    fn begin_day_rolls_the_calendar() {
        let mut w = ScriptedWorld::new(HostApiVersion::Current, HOST);
        w.time = TimeOfDay(2200);
        w.force_end_of_day().unwrap();
        assert!(w.day_ended);
        w.begin_day();
        assert_eq!(w.time, TimeOfDay::DAY_START);
        assert_eq!(w.days_played, 2);
        assert!(!w.day_ended);
    }
}
