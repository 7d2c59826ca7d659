//! Session state machine
//!
//! Authenticating -> Playing <-> Paused -> (BossEncounter) -> GameOver | Won,
//! with restart back to a fresh round. The session owns the round's
//! `GameState` and the handles to the account and storage services; all
//! service calls happen here, at phase boundaries, never inside the tick.

use std::rc::Rc;

use crate::auth::{AuthMode, AuthService, LoginForm};
use crate::consts::LEADERBOARD_ROWS;
use crate::leaderboard::Leaderboard;
use crate::persistence::{PersistenceError, PersistenceService, PlayerId, PlayerRecord, SessionSummary};
use crate::sim::{GameEvent, GamePhase, GameState, Snapshot, TickInput, tick};
use crate::tuning::Tuning;

/// Top-level phase, including the login screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Authenticating,
    Playing,
    Paused,
    BossEncounter,
    GameOver,
    Won,
}

impl From<GamePhase> for SessionPhase {
    fn from(phase: GamePhase) -> Self {
        match phase {
            GamePhase::Playing => SessionPhase::Playing,
            GamePhase::Paused => SessionPhase::Paused,
            GamePhase::BossEncounter => SessionPhase::BossEncounter,
            GamePhase::GameOver => SessionPhase::GameOver,
            GamePhase::Won => SessionPhase::Won,
        }
    }
}

/// Everything the host collected since the last update
#[derive(Debug, Clone, Default)]
pub struct SessionInput {
    // === Play ===
    pub move_left: bool,
    pub move_right: bool,
    pub pause: bool,
    /// Let the autopilot play
    pub idle_mode: bool,

    // === Terminal screen ===
    pub restart: bool,
    pub quit: bool,
    pub toggle_leaderboard: bool,

    // === Login screen ===
    pub typed: Vec<char>,
    pub backspace: bool,
    pub submit: bool,
    pub choose_mode: Option<AuthMode>,
}

impl SessionInput {
    pub fn tick_input(&self) -> TickInput {
        TickInput {
            move_left: self.move_left,
            move_right: self.move_right,
            pause: self.pause,
            idle_mode: self.idle_mode,
        }
    }
}

pub struct Session {
    auth: Rc<dyn AuthService>,
    store: Rc<dyn PersistenceService>,
    tuning: Tuning,
    base_seed: u64,
    form: LoginForm,
    player: Option<PlayerRecord>,
    game: Option<GameState>,
    rounds_played: u64,
    /// Finished rounds not yet accepted by storage
    pending_saves: Vec<SessionSummary>,
    last_save_error: Option<PersistenceError>,
    show_leaderboard: bool,
    leaderboard: Leaderboard,
    exit_requested: bool,
}

impl Session {
    pub fn new(
        auth: Rc<dyn AuthService>,
        store: Rc<dyn PersistenceService>,
        tuning: Tuning,
        seed: u64,
    ) -> Self {
        Self {
            auth,
            store,
            tuning,
            base_seed: seed,
            form: LoginForm::new(),
            player: None,
            game: None,
            rounds_played: 0,
            pending_saves: Vec::new(),
            last_save_error: None,
            show_leaderboard: false,
            leaderboard: Leaderboard::default(),
            exit_requested: false,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        match &self.game {
            Some(game) => game.phase.into(),
            None => SessionPhase::Authenticating,
        }
    }

    pub fn form(&self) -> &LoginForm {
        &self.form
    }

    pub fn player(&self) -> Option<&PlayerRecord> {
        self.player.as_ref()
    }

    pub fn player_id(&self) -> Option<PlayerId> {
        self.player.as_ref().map(|p| p.id)
    }

    pub fn game(&self) -> Option<&GameState> {
        self.game.as_ref()
    }

    pub fn snapshot(&self) -> Option<Snapshot> {
        self.game.as_ref().map(Snapshot::capture)
    }

    pub fn leaderboard_visible(&self) -> bool {
        self.show_leaderboard
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    pub fn pending_saves(&self) -> &[SessionSummary] {
        &self.pending_saves
    }

    pub fn last_save_error(&self) -> Option<&PersistenceError> {
        self.last_save_error.as_ref()
    }

    /// Host should shut down
    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    /// Take the round's queued cues
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.game.as_mut().map(GameState::drain_events).unwrap_or_default()
    }

    /// Advance the session by `dt` seconds
    pub fn update(&mut self, input: &SessionInput, dt: f32) {
        if self.exit_requested {
            return;
        }
        let Some(game) = self.game.as_mut() else {
            self.update_login(input);
            return;
        };

        if game.phase.is_terminal() {
            self.update_terminal(input);
            return;
        }

        tick(game, &input.tick_input(), dt);
        if game.phase.is_terminal() {
            self.finish_round();
        }
    }

    fn update_login(&mut self, input: &SessionInput) {
        if let Some(mode) = input.choose_mode {
            self.form.choose_mode(mode);
        }
        for &c in &input.typed {
            self.form.type_char(c);
        }
        if input.backspace {
            self.form.backspace();
        }
        if input.submit {
            if let Some(id) = self.form.submit(self.auth.as_ref()) {
                self.sign_in(id);
            }
        }
    }

    fn update_terminal(&mut self, input: &SessionInput) {
        if input.toggle_leaderboard {
            self.toggle_leaderboard();
        }
        if input.restart {
            self.flush_saves();
            self.start_round();
        } else if input.quit {
            self.flush_saves();
            log::info!("Quit requested");
            self.exit_requested = true;
        }
    }

    /// Load the player's record and start the first round
    fn sign_in(&mut self, id: PlayerId) {
        let record = match self.store.load_player_record(id) {
            Ok(record) => record,
            Err(err) => {
                if !matches!(err, PersistenceError::NotFound(_)) {
                    log::warn!("Could not load player {}: {}", id, err);
                }
                PlayerRecord {
                    id,
                    name: self.form.username().trim().to_string(),
                    high_score: 0,
                }
            }
        };
        log::info!("Signed in as '{}' (best {})", record.name, record.high_score);
        self.player = Some(record);
        self.start_round();
    }

    /// Fresh round carrying only the player and their best score
    fn start_round(&mut self) {
        let record = self.player.as_ref().map_or(0, |p| p.high_score);
        self.rounds_played += 1;
        let seed = self
            .base_seed
            .wrapping_add(self.rounds_played.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        self.show_leaderboard = false;
        self.game = Some(GameState::new(seed, self.tuning.clone(), record));
        log::info!("Round {} started (seed {})", self.rounds_played, seed);
    }

    /// Queue the finished round for storage and try to save it
    fn finish_round(&mut self) {
        let (Some(game), Some(player)) = (self.game.as_ref(), self.player.as_mut()) else {
            return;
        };
        player.high_score = player.high_score.max(game.score);
        // The id only has to be unique; queued retries reuse it
        let summary = SessionSummary {
            player: player.id,
            round: rand::random::<u64>(),
            score: game.score,
            lives: game.lives,
        };
        log::info!(
            "Round over ({}): score {}, lives {}",
            game.phase.as_str(),
            summary.score,
            summary.lives
        );
        self.pending_saves.push(summary);
        self.flush_saves();
    }

    /// Retry every pending save; failures stay queued for the next save point
    fn flush_saves(&mut self) {
        let store = Rc::clone(&self.store);
        let mut failed = None;
        self.pending_saves.retain(|summary| match store.save_session_result(summary) {
            Ok(()) => false,
            Err(err) => {
                log::warn!("Saving round {} failed: {}", summary.round, err);
                failed = Some(err);
                true
            }
        });
        self.last_save_error = failed;
    }

    fn toggle_leaderboard(&mut self) {
        self.show_leaderboard = !self.show_leaderboard;
        if !self.show_leaderboard {
            return;
        }
        self.leaderboard = match self.store.top_players(LEADERBOARD_ROWS) {
            Ok(records) => Leaderboard::from_records(&records, LEADERBOARD_ROWS),
            Err(err) => {
                log::warn!("Leaderboard unavailable: {}", err);
                Leaderboard::default()
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthError;
    use crate::consts::{BASKET_Y, FRAME_DT};
    use crate::persistence::LocalStore;
    use crate::sim::{FallingObject, MotionPhase, Payload};
    use glam::Vec2;
    use std::cell::Cell;

    /// Storage that fails until told otherwise
    struct FlakyStore {
        inner: LocalStore,
        failing: Cell<bool>,
    }

    impl PersistenceService for FlakyStore {
        fn load_player_record(&self, player: PlayerId) -> Result<PlayerRecord, PersistenceError> {
            self.inner.load_player_record(player)
        }

        fn save_session_result(&self, summary: &SessionSummary) -> Result<(), PersistenceError> {
            if self.failing.get() {
                return Err(PersistenceError::Unavailable("offline".into()));
            }
            self.inner.save_session_result(summary)
        }

        fn top_players(&self, limit: usize) -> Result<Vec<PlayerRecord>, PersistenceError> {
            if self.failing.get() {
                return Err(PersistenceError::Unavailable("offline".into()));
            }
            self.inner.top_players(limit)
        }
    }

    impl AuthService for FlakyStore {
        fn authenticate(
            &self,
            username: &str,
            password: &str,
            mode: AuthMode,
        ) -> Result<PlayerId, AuthError> {
            self.inner.authenticate(username, password, mode)
        }

        fn account_exists(&self, username: &str) -> Result<bool, AuthError> {
            self.inner.account_exists(username)
        }
    }

    fn typed(s: &str) -> SessionInput {
        SessionInput {
            typed: s.chars().collect(),
            submit: true,
            ..Default::default()
        }
    }

    fn register(session: &mut Session, name: &str) {
        session.update(
            &SessionInput {
                choose_mode: Some(AuthMode::Register),
                ..Default::default()
            },
            FRAME_DT,
        );
        session.update(&typed(name), FRAME_DT);
        session.update(&typed("pw"), FRAME_DT);
    }

    fn session_with(store: Rc<FlakyStore>) -> Session {
        Session::new(store.clone(), store, Tuning::default(), 42)
    }

    fn flaky(failing: bool) -> Rc<FlakyStore> {
        Rc::new(FlakyStore {
            inner: LocalStore::in_memory(),
            failing: Cell::new(failing),
        })
    }

    /// Force the current round to end on the next update
    fn lose_round(session: &mut Session, score: u32) {
        let game = session.game.as_mut().unwrap();
        game.score = score;
        game.lives = 1;
        game.objects.clear();
        let id = game.next_entity_id();
        game.objects.push(FallingObject {
            id,
            pos: Vec2::new(game.catcher.x, BASKET_Y + 10.0),
            vel: Vec2::ZERO,
            phase: MotionPhase::Falling,
            transition_x: 0.0,
            payload: Payload::Harmful,
            alive: true,
        });
        session.update(&SessionInput::default(), FRAME_DT);
    }

    #[test]
    fn test_login_starts_round() {
        let store = flaky(false);
        let mut session = session_with(store);
        assert_eq!(session.phase(), SessionPhase::Authenticating);
        register(&mut session, "wolf");
        assert_eq!(session.phase(), SessionPhase::Playing);
        assert_eq!(session.player().map(|p| p.name.as_str()), Some("wolf"));
    }

    #[test]
    fn test_game_over_saves_and_restart_carries_record() {
        let store = flaky(false);
        let mut session = session_with(store.clone());
        register(&mut session, "wolf");
        lose_round(&mut session, 9);
        assert_eq!(session.phase(), SessionPhase::GameOver);
        assert!(session.pending_saves().is_empty());

        let id = session.player_id().unwrap();
        assert_eq!(store.inner.load_player_record(id).unwrap().high_score, 9);

        // Only terminal-screen intents are honoured now
        session.update(
            &SessionInput {
                move_left: true,
                ..Default::default()
            },
            FRAME_DT,
        );
        assert_eq!(session.phase(), SessionPhase::GameOver);

        session.update(
            &SessionInput {
                restart: true,
                ..Default::default()
            },
            FRAME_DT,
        );
        assert_eq!(session.phase(), SessionPhase::Playing);
        let game = session.game().unwrap();
        assert_eq!(game.score, 0);
        assert_eq!(game.lives, 3);
        assert_eq!(game.record, 9);
        assert_eq!(session.player_id(), Some(id));
    }

    #[test]
    fn test_failed_save_is_retried() {
        let store = flaky(false);
        let mut session = session_with(store.clone());
        register(&mut session, "wolf");
        store.failing.set(true);

        lose_round(&mut session, 5);
        assert_eq!(session.phase(), SessionPhase::GameOver);
        assert_eq!(session.pending_saves().len(), 1);
        assert!(session.last_save_error().is_some());
        // In-memory best survives the failure
        assert_eq!(session.player().unwrap().high_score, 5);
        assert_eq!(session.game().unwrap().score, 5);

        store.failing.set(false);
        session.update(
            &SessionInput {
                restart: true,
                ..Default::default()
            },
            FRAME_DT,
        );
        assert!(session.pending_saves().is_empty());
        assert!(session.last_save_error().is_none());
        let id = session.player_id().unwrap();
        assert_eq!(store.inner.load_player_record(id).unwrap().high_score, 5);
    }

    #[test]
    fn test_quit_saves_and_requests_exit() {
        let store = flaky(true);
        let mut session = session_with(store.clone());
        register(&mut session, "wolf");
        lose_round(&mut session, 3);
        store.failing.set(false);
        session.update(
            &SessionInput {
                quit: true,
                ..Default::default()
            },
            FRAME_DT,
        );
        assert!(session.exit_requested());
        assert!(session.pending_saves().is_empty());
    }

    #[test]
    fn test_leaderboard_toggle() {
        let store = flaky(false);
        let mut session = session_with(store.clone());
        register(&mut session, "wolf");
        lose_round(&mut session, 4);

        let toggle = SessionInput {
            toggle_leaderboard: true,
            ..Default::default()
        };
        session.update(&toggle, FRAME_DT);
        assert!(session.leaderboard_visible());
        assert_eq!(session.leaderboard().lines(), vec!["1. wolf - 4"]);

        session.update(&toggle, FRAME_DT);
        assert!(!session.leaderboard_visible());

        // Storage outage shows an empty board rather than failing
        store.failing.set(true);
        session.update(&toggle, FRAME_DT);
        assert!(session.leaderboard_visible());
        assert!(session.leaderboard().is_empty());
    }

    #[test]
    fn test_failed_login_keeps_authenticating() {
        let store = flaky(false);
        let mut session = session_with(store);
        session.update(&typed("ghost"), FRAME_DT);
        assert_eq!(session.phase(), SessionPhase::Authenticating);
        assert_eq!(session.form().error(), Some("User does not exist"));
    }

    #[test]
    fn test_pause_through_session() {
        let store = flaky(false);
        let mut session = session_with(store);
        register(&mut session, "wolf");
        let pause = SessionInput {
            pause: true,
            ..Default::default()
        };
        session.update(&pause, FRAME_DT);
        assert_eq!(session.phase(), SessionPhase::Paused);
        session.update(&pause, FRAME_DT);
        assert_eq!(session.phase(), SessionPhase::Playing);
        assert!(session
            .drain_events()
            .contains(&GameEvent::PhaseChanged(GamePhase::Paused)));
    }

    #[test]
    fn test_sessions_with_same_seed_keep_every_round() {
        let store = flaky(false);
        let mut first = session_with(store.clone());
        register(&mut first, "wolf");
        lose_round(&mut first, 6);
        assert!(first.last_save_error().is_none());

        let mut second = session_with(store.clone());
        second.update(&typed("wolf"), FRAME_DT);
        second.update(&typed("pw"), FRAME_DT);
        assert_eq!(second.player_id(), first.player_id());
        lose_round(&mut second, 2);
        assert!(second.last_save_error().is_none());

        let id = second.player_id().unwrap();
        let rounds = store.inner.rounds_for(id);
        assert_eq!(rounds.len(), 2);
        assert_eq!(rounds[0].score, 6);
        assert_eq!(rounds[1].score, 2);
    }

    #[test]
    fn test_retried_save_stored_once() {
        let store = flaky(false);
        let mut session = session_with(store.clone());
        register(&mut session, "wolf");
        store.failing.set(true);
        lose_round(&mut session, 5);
        store.failing.set(false);

        // Restart retries the queued save, a second restart has nothing left
        let restart = SessionInput {
            restart: true,
            ..Default::default()
        };
        session.update(&restart, FRAME_DT);
        lose_round(&mut session, 1);

        let id = session.player_id().unwrap();
        let scores: Vec<u32> = store.inner.rounds_for(id).iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![5, 1]);
    }
}
