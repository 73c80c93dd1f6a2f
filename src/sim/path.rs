//! Path sequencer
//!
//! A path is a themed run of four mini-games behind a welcome screen. Only
//! one game controller is mounted at a time; finishing game `i` mounts game
//! `i + 1`, and finishing the last one shows the celebration after a short
//! delay.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::controller::{ControllerSignal, GameController, GameView, MiniGame};
use super::event::GameEvent;
use super::games::{BalloonPop, BoardRace, GameAction, GameKind, LoveMaze, MemoryMatch, Quiz, Rules};
use super::timer::{Fired, Scheduler, TimerId, TimerPurpose, TimerTag};
use crate::consts::CELEBRATION_DELAY_MS;
use crate::tuning::GameTuning;

pub const PATH_GAMES: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathKind {
    Crown,
    Love,
}

impl PathKind {
    /// Games in play order
    pub fn games(&self) -> [GameKind; PATH_GAMES] {
        match self {
            PathKind::Crown => [
                GameKind::BoardRace,
                GameKind::MemoryMatch,
                GameKind::FriendshipQuiz,
                GameKind::BalloonPop,
            ],
            PathKind::Love => [
                GameKind::LoveMaze,
                GameKind::MemoryMatch,
                GameKind::RomanceQuiz,
                GameKind::BalloonPop,
            ],
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            PathKind::Crown => "Crown Path",
            PathKind::Love => "Love Path",
        }
    }
}

/// Completion flags, one per game. Set once, never cleared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathProgress {
    completed: [bool; PATH_GAMES],
}

impl PathProgress {
    pub fn mark(&mut self, index: usize) {
        if let Some(flag) = self.completed.get_mut(index) {
            *flag = true;
        }
    }

    pub fn is_done(&self, index: usize) -> bool {
        self.completed.get(index).copied().unwrap_or(false)
    }

    pub fn count(&self) -> usize {
        self.completed.iter().filter(|done| **done).count()
    }

    pub fn all_done(&self) -> bool {
        self.count() == PATH_GAMES
    }

    pub fn flags(&self) -> [bool; PATH_GAMES] {
        self.completed
    }
}

/// Which screen of the path is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathScreen {
    Welcome,
    /// Index into [`PathKind::games`]
    Game(usize),
    Celebration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PathSignal {
    /// The player left the celebration screen
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathView {
    pub kind: PathKind,
    pub title: &'static str,
    pub screen: PathScreen,
    pub games: [GameKind; PATH_GAMES],
    pub completed: [bool; PATH_GAMES],
    pub game: Option<GameView>,
}

/// Builds the controller for one game of a path
pub type GameFactory = fn(GameKind, &GameTuning, u64, bool) -> Box<dyn MiniGame>;

fn boxed<R: Rules + 'static>(rules: R, seed: u64, allow_rules_skip: bool) -> Box<dyn MiniGame> {
    Box::new(GameController::new(rules, seed).with_rules_skip(allow_rules_skip))
}

/// The shipped rule set for each game
pub fn build_game(kind: GameKind, tuning: &GameTuning, seed: u64, allow_rules_skip: bool) -> Box<dyn MiniGame> {
    match kind {
        GameKind::BoardRace => boxed(BoardRace::new(tuning), seed, allow_rules_skip),
        GameKind::MemoryMatch => boxed(MemoryMatch::new(tuning), seed, allow_rules_skip),
        GameKind::FriendshipQuiz => boxed(Quiz::friendship(tuning), seed, allow_rules_skip),
        GameKind::RomanceQuiz => boxed(Quiz::romance(tuning), seed, allow_rules_skip),
        GameKind::BalloonPop => boxed(BalloonPop::new(tuning), seed, allow_rules_skip),
        GameKind::LoveMaze => boxed(LoveMaze::new(tuning), seed, allow_rules_skip),
    }
}

pub struct PathSequencer {
    kind: PathKind,
    owner: u32,
    screen: PathScreen,
    progress: PathProgress,
    game: Option<Box<dyn MiniGame>>,
    factory: GameFactory,
    tuning: GameTuning,
    allow_rules_skip: bool,
    /// Seeds each mounted controller
    rng: Pcg32,
    celebration_timer: Option<TimerId>,
    generation: u64,
    events: Vec<GameEvent>,
    signal: Option<PathSignal>,
}

impl PathSequencer {
    pub fn new(kind: PathKind, sched: &mut Scheduler, tuning: GameTuning, allow_rules_skip: bool, seed: u64) -> Self {
        Self::with_factory(kind, sched, tuning, allow_rules_skip, seed, build_game)
    }

    pub fn with_factory(
        kind: PathKind,
        sched: &mut Scheduler,
        tuning: GameTuning,
        allow_rules_skip: bool,
        seed: u64,
        factory: GameFactory,
    ) -> Self {
        log::info!("{} mounted", kind.title());
        Self {
            kind,
            owner: sched.allocate_owner(),
            screen: PathScreen::Welcome,
            progress: PathProgress::default(),
            game: None,
            factory,
            tuning,
            allow_rules_skip,
            rng: Pcg32::seed_from_u64(seed),
            celebration_timer: None,
            generation: 0,
            events: Vec::new(),
            signal: None,
        }
    }

    pub fn kind(&self) -> PathKind {
        self.kind
    }

    pub fn owner(&self) -> u32 {
        self.owner
    }

    pub fn screen(&self) -> PathScreen {
        self.screen
    }

    pub fn progress(&self) -> &PathProgress {
        &self.progress
    }

    /// The mounted controller, if a game is showing
    pub fn game(&self) -> Option<&dyn MiniGame> {
        self.game.as_deref()
    }

    /// Leave the welcome screen for the first game
    pub fn start(&mut self, sched: &mut Scheduler) -> bool {
        if self.screen != PathScreen::Welcome {
            return false;
        }
        self.show_game(sched, 0);
        true
    }

    fn show_game(&mut self, sched: &mut Scheduler, index: usize) {
        let Some(&kind) = self.kind.games().get(index) else {
            return;
        };
        self.drop_game(sched);

        let mut game = (self.factory)(kind, &self.tuning, self.rng.random(), self.allow_rules_skip);
        game.mount(sched);
        self.events.extend(game.drain_events());
        self.game = Some(game);
        self.screen = PathScreen::Game(index);
        log::info!("{}: game {} ({kind})", self.kind.title(), index + 1);
    }

    fn drop_game(&mut self, sched: &mut Scheduler) {
        if let Some(mut game) = self.game.take() {
            game.unmount(sched);
            self.events.extend(game.drain_events());
        }
    }

    fn cancel_celebration(&mut self, sched: &mut Scheduler) {
        if let Some(id) = self.celebration_timer.take() {
            sched.cancel(id);
        }
        self.generation += 1;
    }

    /// Apply a firing owned by this path or by its mounted game
    pub fn on_timer(&mut self, sched: &mut Scheduler, fired: Fired) {
        if fired.tag.owner == self.owner {
            if fired.tag.purpose == TimerPurpose::Delay
                && fired.tag.generation == self.generation
                && self.celebration_timer == Some(fired.id)
            {
                self.celebration_timer = None;
                self.drop_game(sched);
                self.screen = PathScreen::Celebration;
                self.events.push(GameEvent::Confetti);
                log::info!("{} complete, celebrating", self.kind.title());
            }
            return;
        }

        if let Some(game) = self.game.as_mut() {
            game.on_timer(sched, fired);
        }
        self.poll(sched);
    }

    /// Collect the mounted game's events and react to its signal
    fn poll(&mut self, sched: &mut Scheduler) {
        let PathScreen::Game(index) = self.screen else {
            return;
        };
        let Some(game) = self.game.as_mut() else {
            return;
        };
        self.events.extend(game.drain_events());

        match game.take_signal() {
            Some(ControllerSignal::Completed) => self.game_completed(sched, index),
            Some(ControllerSignal::Back) => self.step_back(sched, index),
            None => {}
        }
    }

    fn game_completed(&mut self, sched: &mut Scheduler, index: usize) {
        self.progress.mark(index);
        log::info!(
            "{}: {}/{} games complete",
            self.kind.title(),
            self.progress.count(),
            PATH_GAMES
        );

        if index + 1 < PATH_GAMES {
            self.show_game(sched, index + 1);
            return;
        }

        self.cancel_celebration(sched);
        let tag = TimerTag {
            owner: self.owner,
            generation: self.generation,
            purpose: TimerPurpose::Delay,
        };
        self.celebration_timer = Some(sched.after(CELEBRATION_DELAY_MS, tag));
    }

    fn step_back(&mut self, sched: &mut Scheduler, index: usize) {
        self.cancel_celebration(sched);
        if index == 0 {
            self.drop_game(sched);
            self.screen = PathScreen::Welcome;
            log::info!("{}: back to welcome", self.kind.title());
        } else {
            self.show_game(sched, index - 1);
        }
    }

    pub fn act(&mut self, sched: &mut Scheduler, action: GameAction) {
        if let Some(game) = self.game.as_mut() {
            game.act(sched, action);
        }
        self.poll(sched);
    }

    pub fn skip_rules(&mut self, sched: &mut Scheduler) -> bool {
        let skipped = self.game.as_mut().is_some_and(|game| game.skip_rules(sched));
        self.poll(sched);
        skipped
    }

    /// Back out of the current game to the previous one (or the welcome screen)
    pub fn back(&mut self, sched: &mut Scheduler) {
        if !matches!(self.screen, PathScreen::Game(_)) {
            return;
        }
        if let Some(game) = self.game.as_mut() {
            game.back(sched);
        }
        self.poll(sched);
    }

    /// Leave the celebration screen
    pub fn finish(&mut self) -> bool {
        if self.screen != PathScreen::Celebration {
            return false;
        }
        self.signal = Some(PathSignal::Completed);
        true
    }

    pub fn take_signal(&mut self) -> Option<PathSignal> {
        self.signal.take()
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        if let Some(game) = self.game.as_mut() {
            self.events.extend(game.drain_events());
        }
        std::mem::take(&mut self.events)
    }

    /// Cancel every timer this path and its game own
    pub fn unmount(&mut self, sched: &mut Scheduler) {
        self.drop_game(sched);
        self.cancel_celebration(sched);
        sched.cancel_owner(self.owner);
    }

    pub fn view(&self) -> PathView {
        PathView {
            kind: self.kind,
            title: self.kind.title(),
            screen: self.screen,
            games: self.kind.games(),
            completed: self.progress.flags(),
            game: self.game.as_ref().map(|game| game.view()),
        }
    }
}
