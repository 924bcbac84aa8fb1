//! Session driver
//!
//! [`Game`] owns the play-field bounds, the input handle and the stepping
//! clock. While a session runs, its [`GameState`] and collaborators live on
//! the stepping thread; every lifecycle call first joins that thread and
//! takes the session back, so lifecycle changes never overlap a tick.
//!
//! Session time only advances while the clock runs: a paused session
//! resumes with its spawn and fire timers where they were.

use std::ops::ControlFlow;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, PoisonError};
use std::time::{Duration, Instant};

use crate::clock::SimulationClock;
use crate::consts::TICK_MS;
use crate::error::GameError;
use crate::feedback::Feedback;
use crate::highscores::HighScores;
use crate::input::InputState;
use crate::persistence::{self, MemoryStore, SharedStore};
use crate::presentation::{Frame, Presenter};
use crate::settings::Settings;
use crate::sim::{Field, GameEvent, GamePhase, GameState, tick};

/// External collaborators driven from the stepping thread
pub struct Collaborators {
    pub presenter: Option<Box<dyn Presenter>>,
    pub feedback: Feedback,
    pub store: SharedStore,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self::new(persistence::shared(MemoryStore::new()))
    }
}

impl Collaborators {
    pub fn new(store: SharedStore) -> Self {
        Self {
            presenter: None,
            feedback: Feedback::default(),
            store,
        }
    }

    pub fn with_presenter(mut self, presenter: impl Presenter + 'static) -> Self {
        self.presenter = Some(Box::new(presenter));
        self
    }

    pub fn with_feedback(mut self, feedback: Feedback) -> Self {
        self.feedback = feedback;
        self
    }
}

/// Notifications for the presentation side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    LevelUp { level: u32 },
    /// Final score and the leaderboard rank it earned, if any
    GameOver { score: u64, rank: Option<usize> },
}

/// Phase mirror readable without joining the stepping thread
#[derive(Debug, Default)]
struct PhaseCell(AtomicU8);

impl PhaseCell {
    fn get(&self) -> GamePhase {
        match self.0.load(Ordering::Acquire) {
            1 => GamePhase::Playing,
            2 => GamePhase::GameOver,
            _ => GamePhase::Idle,
        }
    }

    fn set(&self, phase: GamePhase) {
        let raw = match phase {
            GamePhase::Idle => 0,
            GamePhase::Playing => 1,
            GamePhase::GameOver => 2,
        };
        self.0.store(raw, Ordering::Release);
    }
}

/// Everything the stepping thread owns while it runs
struct Session {
    state: GameState,
    collaborators: Collaborators,
    input: Arc<InputState>,
    events: Sender<SessionEvent>,
    phase: Arc<PhaseCell>,
    /// Session time accumulated before the current run
    banked_ms: u64,
    resumed_at: Instant,
}

impl Session {
    fn new(
        state: GameState,
        collaborators: Collaborators,
        input: Arc<InputState>,
        events: Sender<SessionEvent>,
        phase: Arc<PhaseCell>,
    ) -> Self {
        Self {
            state,
            collaborators,
            input,
            events,
            phase,
            banked_ms: 0,
            resumed_at: Instant::now(),
        }
    }

    fn now_ms(&self) -> u64 {
        let run = u64::try_from(self.resumed_at.elapsed().as_millis()).unwrap_or(u64::MAX);
        self.banked_ms.saturating_add(run)
    }

    /// Freeze session time at the current instant
    fn bank(&mut self) {
        self.banked_ms = self.now_ms();
    }

    /// One clock step: tick, then dispatch everything the tick queued
    fn step(&mut self) -> ControlFlow<()> {
        let input = self.input.take_tick_input();
        let now = self.now_ms();
        let level = self.state.level();

        tick(&mut self.state, &input, now);

        for event in self.state.drain_events() {
            self.collaborators.feedback.on_event(&event);
            if let GameEvent::GameOver { score } = event {
                let rank = self.report_score(score);
                self.notify(SessionEvent::GameOver { score, rank });
            }
        }
        if self.state.level() > level {
            self.notify(SessionEvent::LevelUp {
                level: self.state.level(),
            });
        }
        self.phase.set(self.state.phase);

        if let Some(presenter) = self.collaborators.presenter.as_mut() {
            if presenter.is_ready() {
                presenter.present(&Frame::capture(&self.state));
            }
        }

        match self.state.phase {
            GamePhase::Playing => ControlFlow::Continue(()),
            _ => ControlFlow::Break(()),
        }
    }

    fn report_score(&self, score: u64) -> Option<usize> {
        let mut store = self
            .collaborators
            .store
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        match store.report_score(score) {
            Ok(rank) => {
                if let Some(rank) = rank {
                    log::info!("Score {} entered the leaderboard at #{}", score, rank);
                }
                rank
            }
            Err(e) => {
                log::error!("Failed to record score {}: {}", score, e);
                None
            }
        }
    }

    fn notify(&self, event: SessionEvent) {
        // Nobody listening is fine
        let _ = self.events.send(event);
    }
}

/// Lifecycle front-end for one player's sessions
pub struct Game {
    settings: Settings,
    field: Option<Field>,
    clock: SimulationClock<Session>,
    /// Parked session; `None` while the stepping thread holds it
    session: Option<Session>,
    input: Arc<InputState>,
    phase: Arc<PhaseCell>,
    store: SharedStore,
    events_tx: Sender<SessionEvent>,
    events_rx: Receiver<SessionEvent>,
}

impl Game {
    /// Create an idle game. The feedback mixer in `collaborators` is
    /// configured from `settings`; its sinks are kept.
    pub fn new(settings: Settings, mut collaborators: Collaborators) -> Self {
        collaborators.feedback.configure(&settings);
        let seed = settings.seed.unwrap_or_else(rand::random);
        log::info!("New game (seed {})", seed);

        let (events_tx, events_rx) = mpsc::channel();
        let input = Arc::new(InputState::new());
        let phase = Arc::new(PhaseCell::default());
        let store = Arc::clone(&collaborators.store);
        let session = Session::new(
            GameState::new(seed, settings.star_count),
            collaborators,
            Arc::clone(&input),
            events_tx.clone(),
            Arc::clone(&phase),
        );

        Self {
            settings,
            field: None,
            clock: SimulationClock::new(Duration::from_millis(TICK_MS)),
            session: Some(session),
            input,
            phase,
            store,
            events_tx,
            events_rx,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn field(&self) -> Option<Field> {
        self.field
    }

    /// Lay out the play-field. Any change of bounds resets the session; a
    /// session that was playing keeps playing on the new field.
    pub fn set_field(&mut self, width: f32, height: f32) -> Result<(), GameError> {
        let field = Field::new(width, height)?;
        if self.field == Some(field) {
            return Ok(());
        }
        let was_playing = self.phase() == GamePhase::Playing;

        self.field = Some(field);
        self.input.set_field_width(width);
        log::info!("Play-field set to {}x{}", width, height);

        self.reset()?;
        if was_playing {
            self.resume()?;
        }
        Ok(())
    }

    /// Attach or replace the drawing collaborator
    pub fn set_presenter(&mut self, presenter: impl Presenter + 'static) -> Result<(), GameError> {
        let was_running = self.clock.is_running();
        let mut session = self.take_session()?;
        session.collaborators.presenter = Some(Box::new(presenter));
        self.park(session);
        if was_running {
            self.resume()?;
        }
        Ok(())
    }

    /// Fresh session, then play
    pub fn start(&mut self) -> Result<(), GameError> {
        if self.field.is_none() {
            return Err(GameError::FieldUnset);
        }
        self.reset()?;
        self.resume()
    }

    /// Start over after a game over
    pub fn retry(&mut self) -> Result<(), GameError> {
        self.start()
    }

    /// Stop ticking and restore score, lives and entities to their initial
    /// values. Leaves the game idle.
    pub fn reset(&mut self) -> Result<(), GameError> {
        let mut session = self.take_session()?;
        session.state.reset(self.field);
        session.banked_ms = 0;
        self.input.clear();
        self.park(session);
        Ok(())
    }

    /// Stop ticking, keeping the session as it is
    pub fn pause(&mut self) -> Result<(), GameError> {
        let mut session = self.take_session()?;
        if session.state.phase == GamePhase::Playing {
            session.state.phase = GamePhase::Idle;
            log::info!("Paused at score {}", session.state.session.score);
        }
        self.input.clear();
        self.park(session);
        Ok(())
    }

    /// Resume ticking. A finished session stays finished until
    /// [`Self::retry`].
    pub fn resume(&mut self) -> Result<(), GameError> {
        if self.field.is_none() {
            return Err(GameError::FieldUnset);
        }
        if self.clock.is_running() {
            return Ok(());
        }

        let mut session = self.take_session()?;
        if session.state.phase == GamePhase::GameOver {
            self.park(session);
            return Ok(());
        }

        session.state.phase = GamePhase::Playing;
        session.resumed_at = Instant::now();
        self.phase.set(GamePhase::Playing);
        log::debug!(
            "Resuming at {} ms session time ({:?} per tick)",
            session.banked_ms,
            self.clock.period()
        );

        if let Err(session) = self.clock.start(session, Session::step) {
            // Unreachable after take_session; keep the session regardless
            self.park(session);
        }
        Ok(())
    }

    pub fn phase(&self) -> GamePhase {
        self.phase.get()
    }

    /// The stepping thread is alive
    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    /// Handle for the platform input path
    pub fn input(&self) -> Arc<InputState> {
        Arc::clone(&self.input)
    }

    /// Notifications from the stepping thread
    pub fn events(&self) -> &Receiver<SessionEvent> {
        &self.events_rx
    }

    pub fn high_scores(&self) -> HighScores {
        let store = self.store.lock().unwrap_or_else(PoisonError::into_inner);
        HighScores::from_scores(store.load_scores())
    }

    /// Frame of the parked session; `None` while the clock holds it
    pub fn snapshot(&self) -> Option<Frame> {
        self.session.as_ref().map(|s| Frame::capture(&s.state))
    }

    /// Join the stepping thread, if any, and take the session back
    fn take_session(&mut self) -> Result<Session, GameError> {
        if self.clock.is_started() {
            return match self.clock.stop() {
                Some(mut session) => {
                    session.bank();
                    Ok(session)
                }
                None => {
                    // The session died with the thread; park a fresh one
                    let fresh = self.fresh_session();
                    self.park(fresh);
                    Err(GameError::StepperPanicked)
                }
            };
        }
        self.session.take().ok_or(GameError::StepperPanicked)
    }

    fn park(&mut self, session: Session) {
        self.phase.set(session.state.phase);
        self.session = Some(session);
    }

    fn fresh_session(&self) -> Session {
        let seed = self.settings.seed.unwrap_or_else(rand::random);
        let mut state = GameState::new(seed, self.settings.star_count);
        state.reset(self.field);
        let collaborators = Collaborators::new(Arc::clone(&self.store))
            .with_feedback(Feedback::new(&self.settings));
        Session::new(
            state,
            collaborators,
            Arc::clone(&self.input),
            self.events_tx.clone(),
            Arc::clone(&self.phase),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::{SoundKind, SoundSink};
    use crate::sim::Enemy;
    use glam::Vec2;
    use std::sync::atomic::AtomicUsize;
    use std::thread;

    #[derive(Clone, Default)]
    struct CountingPresenter {
        frames: Arc<AtomicUsize>,
        ready: bool,
    }

    impl Presenter for CountingPresenter {
        fn is_ready(&self) -> bool {
            self.ready
        }

        fn present(&mut self, _frame: &Frame) {
            self.frames.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn seeded() -> Settings {
        Settings {
            seed: Some(11),
            ..Settings::default()
        }
    }

    fn playing_session(
        store: &SharedStore,
        presenter: CountingPresenter,
        score: u64,
    ) -> (Session, Receiver<SessionEvent>) {
        let field = Field::new(480.0, 800.0).unwrap();
        let mut state = GameState::with_field(field, 3, 0);
        state.phase = GamePhase::Playing;
        state.session.score = score;

        let (tx, rx) = mpsc::channel();
        let session = Session::new(
            state,
            Collaborators::new(Arc::clone(store)).with_presenter(presenter),
            Arc::new(InputState::new()),
            tx,
            Arc::new(PhaseCell::default()),
        );
        (session, rx)
    }

    /// Queue an enemy far from the ship that crosses the bottom next step
    fn add_breacher(session: &mut Session) {
        session
            .state
            .enemies
            .insert(Enemy::new(Vec2::new(30.0, 799.0), 2, 1));
    }

    fn session_on_last_life(
        presenter: CountingPresenter,
    ) -> (Session, Receiver<SessionEvent>, SharedStore) {
        let store = persistence::shared(MemoryStore::new());
        let (mut session, rx) = playing_session(&store, presenter, 70);
        session.state.session.lives = 1;
        add_breacher(&mut session);
        (session, rx, store)
    }

    #[test]
    fn test_step_reports_game_over_once() {
        let presenter = CountingPresenter {
            ready: true,
            ..Default::default()
        };
        let (mut session, rx, store) = session_on_last_life(presenter.clone());

        assert!(session.step().is_break());
        assert_eq!(session.phase.get(), GamePhase::GameOver);
        assert_eq!(
            rx.try_recv(),
            Ok(SessionEvent::GameOver {
                score: 70,
                rank: Some(1)
            })
        );
        assert!(rx.try_recv().is_err());
        assert_eq!(store.lock().unwrap().load_scores(), vec![70]);
        assert_eq!(presenter.frames.load(Ordering::SeqCst), 1);

        // A finished session never reports again
        assert!(session.step().is_break());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_third_breach_ranks_score_among_stored() {
        let store = persistence::shared(MemoryStore::new());
        for score in [120, 90, 40, 5] {
            store.lock().unwrap().report_score(score).unwrap();
        }
        let (mut session, rx) = playing_session(&store, CountingPresenter::default(), 70);

        for breach in 1..=3 {
            add_breacher(&mut session);
            let flow = session.step();
            assert_eq!(flow.is_break(), breach == 3);
            assert_eq!(session.state.session.lives, 3 - breach);
        }

        assert_eq!(
            rx.try_recv(),
            Ok(SessionEvent::GameOver {
                score: 70,
                rank: Some(3)
            })
        );
        assert_eq!(
            store.lock().unwrap().load_scores(),
            vec![120, 90, 70, 40, 5]
        );
    }

    #[test]
    fn test_settings_configure_supplied_feedback() {
        struct CountingSink(Arc<AtomicUsize>);

        impl SoundSink for CountingSink {
            fn play(&mut self, _kind: SoundKind, _volume: f32) {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }

        for (muted, expected) in [(true, 0), (false, 1)] {
            let plays = Arc::new(AtomicUsize::new(0));
            let feedback = Feedback::default().with_sound(CountingSink(Arc::clone(&plays)));
            let settings = Settings {
                muted,
                ..seeded()
            };
            let mut game = Game::new(settings, Collaborators::default().with_feedback(feedback));

            let session = game.session.as_mut().unwrap();
            session.collaborators.feedback.on_event(&GameEvent::ShotFired);
            assert_eq!(plays.load(Ordering::SeqCst), expected);
        }
    }

    #[test]
    fn test_unready_presenter_is_skipped() {
        let presenter = CountingPresenter::default();
        let (mut session, _rx, _store) = session_on_last_life(presenter.clone());
        let _ = session.step();
        assert_eq!(presenter.frames.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_phase_cell_round_trips() {
        let cell = PhaseCell::default();
        assert_eq!(cell.get(), GamePhase::Idle);
        for phase in [GamePhase::Playing, GamePhase::GameOver, GamePhase::Idle] {
            cell.set(phase);
            assert_eq!(cell.get(), phase);
        }
    }

    #[test]
    fn test_start_requires_field() {
        let mut game = Game::new(seeded(), Collaborators::default());
        assert!(matches!(game.start(), Err(GameError::FieldUnset)));
        assert!(matches!(game.resume(), Err(GameError::FieldUnset)));
        assert_eq!(game.phase(), GamePhase::Idle);
        assert!(!game.is_running());
    }

    #[test]
    fn test_invalid_field_is_rejected() {
        let mut game = Game::new(seeded(), Collaborators::default());
        assert!(matches!(
            game.set_field(0.0, 800.0),
            Err(GameError::InvalidField { .. })
        ));
        assert!(game.field().is_none());
    }

    #[test]
    fn test_pause_resume_reset_lifecycle() {
        let mut game = Game::new(seeded(), Collaborators::default());
        game.set_field(480.0, 800.0).unwrap();
        assert_eq!(game.phase(), GamePhase::Idle);

        game.start().unwrap();
        assert_eq!(game.phase(), GamePhase::Playing);
        assert!(game.is_running());
        assert!(game.snapshot().is_none());
        thread::sleep(Duration::from_millis(120));

        game.pause().unwrap();
        assert_eq!(game.phase(), GamePhase::Idle);
        assert!(!game.is_running());
        let paused = game.snapshot().unwrap();

        // Nothing moves while paused
        thread::sleep(Duration::from_millis(80));
        assert_eq!(game.snapshot(), Some(paused));

        game.resume().unwrap();
        assert_eq!(game.phase(), GamePhase::Playing);
        assert!(game.is_running());

        game.reset().unwrap();
        assert_eq!(game.phase(), GamePhase::Idle);
        let fresh = game.snapshot().unwrap();
        assert_eq!(fresh.score, 0);
        assert_eq!(fresh.lives, 3);
    }

    #[test]
    fn test_resize_while_playing_restarts_on_new_field() {
        let mut game = Game::new(seeded(), Collaborators::default());
        game.set_field(480.0, 800.0).unwrap();
        game.start().unwrap();

        game.set_field(600.0, 900.0).unwrap();
        assert_eq!(game.phase(), GamePhase::Playing);
        game.pause().unwrap();

        let frame = game.snapshot().unwrap();
        let player = frame
            .sprites
            .iter()
            .find(|s| s.kind == crate::sim::EntityKind::Player)
            .unwrap();
        assert_eq!(player.pos.y, 800.0);
        assert_eq!(game.field(), Some(Field::new(600.0, 900.0).unwrap()));
    }
}
