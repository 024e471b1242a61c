//! scripted-day — one in-game day of an automated host against the
//! in-memory `ScriptedWorld`.
//!
//! Two farmhands join, ask for a cabin, demolish it again, pause the game
//! for a moment and finally go to bed.  The host clicks through the morning
//! dialogue, follows them to bed and ends the day.
//!
//! Set `RUST_LOG=debug` to watch the engine's decisions.

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use ha_behavior::ChainStep;
use ha_chat::ChatMessage;
use ha_core::{AutomationConfig, HostApiVersion, ParticipantId, Tick, TimeOfDay};
use ha_readiness::checks;
use ha_session::{ChatOutcome, Session, SessionBuilder, SessionObserver};
use ha_world::{AdapterRegistry, Menu, Question, ScriptedWorld, StructureKind, Tile};

// ── Constants ─────────────────────────────────────────────────────────────────

const HOST:  ParticipantId = ParticipantId(1);
const ALICE: ParticipantId = ParticipantId(2);
const BOB:   ParticipantId = ParticipantId(3);

/// In-game minutes that pass per second of session time.
const MINUTES_PER_SECOND: u32 = 10;

const CONFIG_TOML: &str = r#"
tick_rate                 = 10
host_version              = "1.6"
auto_sleep_time           = 2400
dialogue_wait_secs        = 0.5
transition_wait_secs      = 2.0
confirmation_timeout_secs = 30
cave_choice               = "bats"
pet_name                  = "Biscuit"
move_build_permission     = "off"
admins                    = [2]
"#;

// ── World factories ───────────────────────────────────────────────────────────

/// The farm as the day begins: two farmhands outside, the shipping bin, and
/// two prompts waiting on the host.
fn farm(version: HostApiVersion) -> ScriptedWorld {
    let mut world = ScriptedWorld::new(version, HOST);
    world.connect(ALICE, "Alice", Tile::new(60, 15));
    world.connect(BOB, "Bob", Tile::new(64, 15));
    world.add_structure(StructureKind::ShippingBin, Tile::new(71, 14));
    world.menus.push_back(Menu::Dialogue(None));
    world.menus.push_back(Menu::Dialogue(Some(Question::new(
        "Which would you like in the cave?",
        ["Mushrooms", "Bats"],
    ))));
    world
}

fn adapters() -> AdapterRegistry {
    AdapterRegistry::new()
        .register(HostApiVersion::Legacy, || Box::new(farm(HostApiVersion::Legacy)))
        .register(HostApiVersion::Current, || Box::new(farm(HostApiVersion::Current)))
}

// ── Observer ──────────────────────────────────────────────────────────────────

/// Prints every world action the host takes.
#[derive(Default)]
struct ActionPrinter {
    actions: usize,
    timers:  usize,
}

impl SessionObserver for ActionPrinter {
    fn on_tick_end(&mut self, tick: Tick, step: ChainStep, fired: usize) {
        if let (true, Some(link)) = (step.acted(), step.link) {
            self.actions += 1;
            println!("  tick {:>5}  host action by {link}", tick.0);
        }
        self.timers += fired;
    }

    fn on_chat(&mut self, msg: &ChatMessage, outcome: &ChatOutcome) {
        println!("  chat  {} says {:?} → {outcome:?}", msg.sender, msg.text);
    }

    fn on_shutdown(&mut self, final_tick: Tick) {
        println!();
        println!("{} host actions, {} timers fired, {} ticks", self.actions, self.timers, final_tick.0);
    }
}

// ── Script ────────────────────────────────────────────────────────────────────

fn world(session: &mut Session) -> Result<&mut ScriptedWorld> {
    session
        .world_as_mut::<ScriptedWorld>()
        .context("demo expects the scripted world adapter")
}

/// What the farmhands do at a given time of day.
fn farmhands(session: &mut Session, time: TimeOfDay) -> Result<()> {
    match time.0 {
        900 => {
            session.on_chat(&ChatMessage::private(ALICE, "build stone_cabin"));
        }
        1000 => {
            session.on_chat(&ChatMessage::private(ALICE, "demolish"));
            session.on_chat(&ChatMessage::private(ALICE, "yes"));
        }
        1100 => {
            // Asked, then never answered; the confirmation expires.
            session.on_chat(&ChatMessage::private(BOB, "build log_cabin"));
            session.on_chat(&ChatMessage::private(BOB, "demolish"));
        }
        1400 => {
            session.on_chat(&ChatMessage::private(BOB, "pause"));
            session.on_chat(&ChatMessage::private(ALICE, "pause"));
            session.on_chat(&ChatMessage::private(ALICE, "pause"));
        }
        2000 | 2030 => {
            let who = if time.0 == 2000 { ALICE } else { BOB };
            world(session)?.mark_upstream_ready(checks::SLEEP, who);
            session.on_ready_changed(who, checks::SLEEP, true);
        }
        _ => {}
    }
    Ok(())
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    println!("=== scripted-day — automated host ===");

    let config = AutomationConfig::from_toml_str(CONFIG_TOML)?;
    let ticks_per_step = u64::from(config.tick_rate);
    let mut session = SessionBuilder::new(config)
        .adapters(adapters())
        .observer(ActionPrinter::default())
        .build()?;

    session.on_connect(ALICE);
    session.on_connect(BOB);
    session.on_day_start();

    // One in-game step of ten minutes per second of session time.
    loop {
        let time = world(&mut session)?.time;
        if world(&mut session)?.day_ended || time >= TimeOfDay::DAY_END {
            break;
        }
        farmhands(&mut session, time)?;
        session.run_ticks(ticks_per_step);
        let w = world(&mut session)?;
        w.time = w.time.plus_minutes(MINUTES_PER_SECOND);
    }

    let w = world(&mut session)?;
    println!();
    println!("Day ended: {}  at {}", w.day_ended, w.time);
    println!("World calls:");
    for call in &w.calls {
        println!("  {call:?}");
    }
    println!("Chat log:");
    for (to, text) in &w.chat_log {
        match to {
            Some(who) => println!("  to {who}: {text}"),
            None      => println!("  all: {text}"),
        }
    }

    session.shutdown();
    Ok(())
}
