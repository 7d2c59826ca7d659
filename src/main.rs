//! Egg Catcher headless driver
//!
//! Registers a demo player, lets the autopilot play a round at a fixed
//! timestep and prints the result and leaderboard. Rendering and audio belong
//! to the host application; this binary only exercises the simulation core.
//!
//! Usage: `egg-catcher [classic|boss] [seed]`
//! Set `EGG_CATCHER_STORE=path.json` to keep players between runs.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::rc::Rc;
    use std::time::{SystemTime, UNIX_EPOCH};

    use egg_catcher::consts::{FRAME_DT, MAX_SUBSTEPS};
    use egg_catcher::persistence::LocalStore;
    use egg_catcher::sim::GameEvent;
    use egg_catcher::{AuthMode, AuthService, Session, SessionInput, SessionPhase, Tuning, Variant};

    env_logger::init();

    let mut args = std::env::args().skip(1);
    let variant = args
        .next()
        .and_then(|s| Variant::from_str(&s))
        .unwrap_or(Variant::BossRush);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    });
    log::info!("Egg Catcher ({}) starting, seed {}", variant.as_str(), seed);

    let store = match std::env::var("EGG_CATCHER_STORE") {
        Ok(path) => match LocalStore::open(&path) {
            Ok(store) => store,
            Err(err) => {
                log::warn!("Could not open {}: {}, using memory store", path, err);
                LocalStore::in_memory()
            }
        },
        Err(_) => LocalStore::in_memory(),
    };
    // Log in, registering the demo player on first run
    let name = "autopilot";
    let existing = store.account_exists(name).unwrap_or(false);
    let store = Rc::new(store);
    let mut session = Session::new(store.clone(), store, Tuning::from_variant(variant), seed);

    let mode = if existing { AuthMode::Login } else { AuthMode::Register };
    let entry = |text: &str| SessionInput {
        choose_mode: Some(mode),
        typed: text.chars().collect(),
        submit: true,
        ..Default::default()
    };
    session.update(&entry(name), FRAME_DT);
    session.update(
        &SessionInput {
            typed: "demo".chars().collect(),
            submit: true,
            ..Default::default()
        },
        FRAME_DT,
    );
    if session.phase() == SessionPhase::Authenticating {
        println!("Login failed: {}", session.form().error().unwrap_or("unknown"));
        return;
    }

    // Fixed-timestep loop driven by a simulated 144 Hz host
    let host_dt = 1.0 / 144.0;
    let mut accumulator = 0.0f32;
    let play = SessionInput {
        idle_mode: true,
        ..Default::default()
    };
    let mut caught = 0u32;
    let mut lost = 0u32;
    let mut host_frames = 0u64;
    while !matches!(session.phase(), SessionPhase::GameOver | SessionPhase::Won) {
        accumulator += host_dt;
        let mut substeps = 0;
        while accumulator >= FRAME_DT && substeps < MAX_SUBSTEPS {
            session.update(&play, FRAME_DT);
            accumulator -= FRAME_DT;
            substeps += 1;
        }
        for event in session.drain_events() {
            match event {
                GameEvent::ObjectCaught(_) => caught += 1,
                GameEvent::LifeLost => lost += 1,
                GameEvent::LevelUp(level) => println!("Level {}", level),
                GameEvent::BossHit { health } => println!("Boss hit! {} health left", health),
                _ => {}
            }
        }
        host_frames += 1;
        // Ten simulated minutes is plenty for a demo
        if host_frames > 144 * 600 {
            break;
        }
    }

    if let Some(snap) = session.snapshot() {
        println!(
            "{:?}: score {}, level {}, lives {}/{}, best {}",
            snap.phase, snap.score, snap.level, snap.lives, snap.max_lives, snap.record
        );
    }
    println!("Caught {} objects, lost {} lives", caught, lost);

    session.update(
        &SessionInput {
            toggle_leaderboard: true,
            ..Default::default()
        },
        FRAME_DT,
    );
    println!("Leaderboard:");
    for line in session.leaderboard().lines() {
        println!("  {}", line);
    }
    if let Some(err) = session.last_save_error() {
        println!("Result not saved: {}", err);
    }

    session.update(
        &SessionInput {
            quit: true,
            ..Default::default()
        },
        FRAME_DT,
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Hosts embed the library directly on the web
}
