use anyhow::{Context, Result};
use bitflags::Flags;
use core_input_bridge::bridge::{
    button_names, lock_recover, ButtonMask, DirectController, InputBridge, InputConfig,
    SessionStart, System,
};
use core_input_bridge::host::{CoreThread, LatchCore};
use core_input_bridge::systems::{Ds, Gba, Gbc, Genesis, Nes, Snes};
use core_input_bridge::SystemId;
use log::info;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

/// How long a scripted button stays held
const HOLD_TIME: Duration = Duration::from_millis(50);

fn main() -> Result<()> {
    // Initialize logger (RUST_LOG overrides the default level)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Usage: core-input-bridge [system] [seconds] [bindings-file]
    let args: Vec<String> = std::env::args().collect();

    let system = match args.get(1) {
        Some(name) => name.parse::<SystemId>().with_context(|| {
            format!(
                "Usage: core-input-bridge [{}] [seconds] [bindings-file]",
                system_names()
            )
        })?,
        None => SystemId::Nes,
    };
    let duration = match args.get(2) {
        Some(text) => parse_duration(text)?,
        None => Duration::from_secs(2),
    };
    let bindings = args
        .get(3)
        .map(|path| {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read bindings {path}"))
        })
        .transpose()?;

    info!("Starting input bridge demo for {system} ({duration:?})...");
    let bindings = bindings.as_deref();

    match system {
        SystemId::Nes => run::<Nes>(system, duration, bindings),
        SystemId::Snes => run::<Snes>(system, duration, bindings),
        SystemId::Gbc => run::<Gbc>(system, duration, bindings),
        SystemId::Gba => run::<Gba>(system, duration, bindings),
        SystemId::Ds => run::<Ds>(system, duration, bindings),
        SystemId::Genesis => run::<Genesis>(system, duration, bindings),
    }
}

fn run<S: System>(system: SystemId, duration: Duration, bindings: Option<&str>) -> Result<()> {
    let config = match bindings {
        Some(text) => InputConfig::<S>::parse(0, text).context("Invalid bindings file")?,
        None => InputConfig::default(),
    };

    let latch = Arc::new(Mutex::new(LatchCore::new(S::player_count())));
    let bridge = InputBridge::<S>::shared();
    bridge.attach_core(latch.clone(), SessionStart::Fresh);
    let core_thread = CoreThread::spawn(format!("{}-core", S::NAME), latch.clone())
        .context("Failed to spawn core thread")?;

    let controller = DirectController::<S>::new("script", 0)?;
    let deadline = Instant::now() + duration;

    thread::scope(|scope| {
        // Scripted input: walk the bound sources on player 1
        scope.spawn(|| {
            let mut sources = config.bindings();
            sources.sort_by(|a, b| a.0.cmp(&b.0));
            for (source, buttons) in sources.iter().cycle() {
                if Instant::now() >= deadline {
                    break;
                }
                log::debug!("script: {source} -> {}", button_names::<S>(*buttons));
                controller.press(*buttons);
                thread::sleep(HOLD_TIME);
                controller.release(*buttons);
            }
        });

        // Relayed input: raw masks on player 2, as a netplay peer would send them
        if S::player_count() > 1 {
            let relayed: Vec<ButtonMask> = <S::Buttons as Flags>::all()
                .iter()
                .map(Into::into)
                .collect();
            scope.spawn(move || {
                for &bit in relayed.iter().cycle() {
                    if Instant::now() >= deadline {
                        break;
                    }
                    system.press_button(bit, 1);
                    thread::sleep(HOLD_TIME / 2);
                    system.release_button(bit, 1);
                }
            });
        }
    });

    let frames = core_thread.stop();
    {
        let latch = lock_recover(&latch);
        for player in 0..S::player_count() {
            info!(
                "Player {}: last frame saw {}",
                player + 1,
                latch.latched(player).unwrap_or_default()
            );
        }
        info!("{frames} frames, {} input forwards", latch.apply_count());
    }

    // Session teardown: nothing stays held into the next game
    drop(controller);
    bridge.reset_all_inputs();
    bridge.detach_core();

    info!("Demo finished");
    Ok(())
}

/// Parse a run time in seconds; negative, infinite and NaN values are rejected
fn parse_duration(text: &str) -> Result<Duration> {
    let seconds = text
        .parse::<f32>()
        .with_context(|| format!("Invalid duration: {text}"))?;
    Duration::try_from_secs_f32(seconds).with_context(|| format!("Duration out of range: {text}"))
}

fn system_names() -> String {
    SystemId::ALL
        .iter()
        .map(|id| id.name())
        .collect::<Vec<_>>()
        .join("|")
}
