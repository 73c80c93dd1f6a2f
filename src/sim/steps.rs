//! Top-level step sequencer
//!
//! The journey is five linear steps. On the reveal step the player may pick
//! one path, once per session. Crown and Love mount a [`PathSequencer`];
//! finishing it moves the journey on to the next step.
//!
//! The sequencer owns the only [`Scheduler`] and routes every firing by its
//! owner tag.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::event::GameEvent;
use super::games::GameAction;
use super::path::{GameFactory, PathKind, PathSequencer, PathSignal, PathView, build_game};
use super::timer::{Fired, Scheduler, TimerId, TimerPurpose, TimerTag};
use crate::consts::PATH_MOUNT_DELAY_MS;
use crate::settings::Settings;
use crate::tuning::GameTuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Step {
    Welcome,
    SurpriseReveal,
    BirthdayGame,
    MemoryLane,
    FinalCelebration,
}

impl Step {
    pub const ALL: [Step; 5] = [
        Step::Welcome,
        Step::SurpriseReveal,
        Step::BirthdayGame,
        Step::MemoryLane,
        Step::FinalCelebration,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Step::Welcome => "Welcome",
            Step::SurpriseReveal => "Surprise Reveal",
            Step::BirthdayGame => "Birthday Game",
            Step::MemoryLane => "Memory Lane",
            Step::FinalCelebration => "Final Celebration",
        }
    }

    fn confetti_on_enter(&self) -> bool {
        matches!(self, Step::SurpriseReveal | Step::FinalCelebration)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathChoice {
    Crown,
    Love,
    /// No sub-journey; just continue
    Glam,
}

impl PathChoice {
    pub fn path(&self) -> Option<PathKind> {
        match self {
            PathChoice::Crown => Some(PathKind::Crown),
            PathChoice::Love => Some(PathKind::Love),
            PathChoice::Glam => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JourneyView {
    pub step: Step,
    pub step_index: usize,
    pub step_count: usize,
    pub title: &'static str,
    pub selected_path: Option<PathChoice>,
    /// True while the reveal step still offers a choice
    pub can_select_path: bool,
    pub path: Option<PathView>,
}

pub struct StepSequencer {
    scheduler: Scheduler,
    owner: u32,
    step: usize,
    selected_path: Option<PathChoice>,
    path: Option<PathSequencer>,
    mount_timer: Option<TimerId>,
    generation: u64,
    events: Vec<GameEvent>,
    tuning: GameTuning,
    allow_rules_skip: bool,
    factory: GameFactory,
    rng: Pcg32,
}

impl StepSequencer {
    pub fn new(tuning: GameTuning, allow_rules_skip: bool, seed: u64) -> Self {
        Self::with_factory(tuning, allow_rules_skip, seed, build_game)
    }

    pub fn from_settings(settings: &Settings, tuning: GameTuning, fallback_seed: u64) -> Self {
        Self::new(
            tuning,
            settings.allow_rules_skip,
            settings.seed.unwrap_or(fallback_seed),
        )
    }

    pub fn with_factory(tuning: GameTuning, allow_rules_skip: bool, seed: u64, factory: GameFactory) -> Self {
        let mut scheduler = Scheduler::new();
        let owner = scheduler.allocate_owner();
        log::info!("Journey starting (seed {seed})");
        Self {
            scheduler,
            owner,
            step: 0,
            selected_path: None,
            path: None,
            mount_timer: None,
            generation: 0,
            events: Vec::new(),
            tuning,
            allow_rules_skip,
            factory,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn step(&self) -> Step {
        Step::ALL[self.step]
    }

    pub fn selected_path(&self) -> Option<PathChoice> {
        self.selected_path
    }

    pub fn path(&self) -> Option<&PathSequencer> {
        self.path.as_ref()
    }

    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    /// Armed timers across the whole journey
    pub fn active_timers(&self) -> usize {
        self.scheduler.active()
    }

    /// Borrow the scheduler alongside `self`
    fn with_scheduler<T>(&mut self, f: impl FnOnce(&mut Self, &mut Scheduler) -> T) -> T {
        let mut sched = std::mem::take(&mut self.scheduler);
        let out = f(self, &mut sched);
        self.scheduler = sched;
        out
    }

    /// Move virtual time forward, dispatching every due timer
    pub fn advance(&mut self, elapsed_ms: u64) {
        self.with_scheduler(|this, sched| {
            sched.run_for(elapsed_ms, |s, fired| this.on_timer(s, fired));
        });
    }

    fn on_timer(&mut self, sched: &mut Scheduler, fired: Fired) {
        if fired.tag.owner == self.owner {
            if fired.tag.purpose == TimerPurpose::Delay
                && fired.tag.generation == self.generation
                && self.mount_timer == Some(fired.id)
            {
                self.mount_timer = None;
                self.mount_selected(sched);
            }
            return;
        }
        if let Some(path) = self.path.as_mut() {
            path.on_timer(sched, fired);
        }
        self.check_path(sched);
    }

    fn mount_selected(&mut self, sched: &mut Scheduler) {
        match self.selected_path.and_then(|choice| choice.path()) {
            Some(kind) => {
                let seed = self.rng.random();
                self.path = Some(PathSequencer::with_factory(
                    kind,
                    sched,
                    self.tuning,
                    self.allow_rules_skip,
                    seed,
                    self.factory,
                ));
            }
            None => self.go_to(self.step + 1),
        }
    }

    fn check_path(&mut self, sched: &mut Scheduler) {
        let Some(path) = self.path.as_mut() else {
            return;
        };
        if path.take_signal() != Some(PathSignal::Completed) {
            return;
        }
        path.unmount(sched);
        self.events.extend(path.drain_events());
        self.path = None;
        log::info!("Path finished");
        self.go_to(self.step + 1);
    }

    fn go_to(&mut self, index: usize) {
        let index = index.min(Step::ALL.len() - 1);
        if index == self.step {
            return;
        }
        self.step = index;
        let step = self.step();
        log::info!("Step {} of {}: {}", index + 1, Step::ALL.len(), step.title());
        if step.confetti_on_enter() {
            self.events.push(GameEvent::Confetti);
        }
    }

    /// Step navigation is locked while a path is mounted or about to be
    fn navigation_locked(&self) -> bool {
        self.path.is_some() || self.mount_timer.is_some()
    }

    pub fn next(&mut self) -> bool {
        if self.navigation_locked() || self.step + 1 >= Step::ALL.len() {
            return false;
        }
        self.go_to(self.step + 1);
        true
    }

    pub fn prev(&mut self) -> bool {
        if self.navigation_locked() || self.step == 0 {
            return false;
        }
        self.go_to(self.step - 1);
        true
    }

    /// Pick a journey on the reveal step. Only the first choice counts.
    pub fn select_path(&mut self, choice: PathChoice) -> bool {
        if self.step() != Step::SurpriseReveal || self.selected_path.is_some() {
            log::debug!("Ignoring path choice {choice:?}");
            return false;
        }
        self.selected_path = Some(choice);
        self.events.push(GameEvent::PathSelected);
        log::info!("Path selected: {choice:?}");

        self.generation += 1;
        let tag = TimerTag {
            owner: self.owner,
            generation: self.generation,
            purpose: TimerPurpose::Delay,
        };
        self.mount_timer = Some(self.scheduler.after(PATH_MOUNT_DELAY_MS, tag));
        true
    }

    /// Leave the path's welcome screen
    pub fn start_path(&mut self) -> bool {
        self.with_scheduler(|this, sched| this.path.as_mut().is_some_and(|p| p.start(sched)))
    }

    pub fn act(&mut self, action: GameAction) {
        self.with_scheduler(|this, sched| {
            if let Some(path) = this.path.as_mut() {
                path.act(sched, action);
            }
            this.check_path(sched);
        });
    }

    pub fn skip_rules(&mut self) -> bool {
        self.with_scheduler(|this, sched| this.path.as_mut().is_some_and(|p| p.skip_rules(sched)))
    }

    pub fn back(&mut self) {
        self.with_scheduler(|this, sched| {
            if let Some(path) = this.path.as_mut() {
                path.back(sched);
            }
        });
    }

    /// Leave the path's celebration screen and continue the journey
    pub fn finish_path(&mut self) -> bool {
        let finished = self.path.as_mut().is_some_and(|p| p.finish());
        if finished {
            self.with_scheduler(|this, sched| this.check_path(sched));
        }
        finished
    }

    /// Confetti and fanfare on the final step
    pub fn celebrate(&mut self) -> bool {
        if self.step() != Step::FinalCelebration {
            return false;
        }
        self.events.push(GameEvent::Confetti);
        self.events.push(GameEvent::Celebrate);
        true
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        if let Some(path) = self.path.as_mut() {
            self.events.extend(path.drain_events());
        }
        std::mem::take(&mut self.events)
    }

    pub fn view(&self) -> JourneyView {
        let step = self.step();
        JourneyView {
            step,
            step_index: self.step,
            step_count: Step::ALL.len(),
            title: step.title(),
            selected_path: self.selected_path,
            can_select_path: step == Step::SurpriseReveal && self.selected_path.is_none(),
            path: self.path.as_ref().map(PathSequencer::view),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::controller::{GameController, MiniGame};
    use crate::sim::games::{GameKind, Tally};
    use crate::sim::path::PathScreen;

    fn tally(kind: GameKind, _tuning: &GameTuning, seed: u64, skip: bool) -> Box<dyn MiniGame> {
        Box::new(GameController::new(Tally::of(kind), seed).with_rules_skip(skip))
    }

    fn journey() -> StepSequencer {
        StepSequencer::with_factory(GameTuning::default(), false, 42, tally)
    }

    fn at_reveal() -> StepSequencer {
        let mut j = journey();
        j.next();
        j.drain_events();
        j
    }

    #[test]
    fn test_navigation_clamps() {
        let mut j = journey();
        assert!(!j.prev());
        assert_eq!(j.step(), Step::Welcome);
        for _ in 0..10 {
            j.next();
        }
        assert_eq!(j.step(), Step::FinalCelebration);
        assert!(!j.next());
        assert!(j.prev());
        assert_eq!(j.step(), Step::MemoryLane);
    }

    #[test]
    fn test_confetti_on_reveal_and_finale() {
        let mut j = journey();
        j.next();
        assert_eq!(j.drain_events(), vec![GameEvent::Confetti]);
        j.next();
        j.next();
        assert!(j.drain_events().is_empty());
        j.next();
        assert_eq!(j.drain_events(), vec![GameEvent::Confetti]);
    }

    #[test]
    fn test_select_only_on_reveal_and_once() {
        let mut j = journey();
        assert!(!j.select_path(PathChoice::Crown));

        let mut j = at_reveal();
        assert!(j.select_path(PathChoice::Love));
        assert!(!j.select_path(PathChoice::Crown));
        assert_eq!(j.selected_path(), Some(PathChoice::Love));
        assert_eq!(j.drain_events(), vec![GameEvent::PathSelected]);
    }

    #[test]
    fn test_path_mounts_after_delay() {
        let mut j = at_reveal();
        j.select_path(PathChoice::Crown);
        j.advance(PATH_MOUNT_DELAY_MS - 1);
        assert!(j.path().is_none());
        j.advance(1);
        let path = j.path().map(|p| (p.kind(), p.screen()));
        assert_eq!(path, Some((PathKind::Crown, PathScreen::Welcome)));
        assert!(!j.next());
        assert_eq!(j.step(), Step::SurpriseReveal);
    }

    #[test]
    fn test_glam_moves_on() {
        let mut j = at_reveal();
        j.select_path(PathChoice::Glam);
        assert_eq!(j.step(), Step::SurpriseReveal);
        j.advance(PATH_MOUNT_DELAY_MS);
        assert_eq!(j.step(), Step::BirthdayGame);
        assert!(j.path().is_none());

        // The choice sticks even after walking back
        j.prev();
        assert!(!j.select_path(PathChoice::Crown));
        assert!(!j.view().can_select_path);
    }

    #[test]
    fn test_completed_path_advances_step() {
        let mut j = at_reveal();
        j.select_path(PathChoice::Love);
        j.advance(PATH_MOUNT_DELAY_MS);
        assert!(j.start_path());

        for _ in 0..4 {
            j.advance((RULES_SECS + COUNTDOWN_SECS) as u64 * 1000);
            j.act(GameAction::RollDice);
            j.act(GameAction::RollDice);
            j.act(GameAction::PopBalloon(0));
            j.advance(2000);
        }
        j.advance(CELEBRATION_DELAY_MS);
        assert_eq!(j.path().map(|p| p.screen()), Some(PathScreen::Celebration));

        assert!(j.finish_path());
        assert!(j.path().is_none());
        assert_eq!(j.step(), Step::BirthdayGame);
        assert_eq!(j.active_timers(), 0);
        assert_eq!(j.selected_path(), Some(PathChoice::Love));
    }

    #[test]
    fn test_celebrate_only_on_final_step() {
        let mut j = journey();
        assert!(!j.celebrate());
        for _ in 0..4 {
            j.next();
        }
        j.drain_events();
        assert!(j.celebrate());
        assert_eq!(j.drain_events(), vec![GameEvent::Confetti, GameEvent::Celebrate]);
    }

    #[test]
    fn test_back_on_path_returns_to_welcome() {
        let mut j = at_reveal();
        j.select_path(PathChoice::Crown);
        j.advance(PATH_MOUNT_DELAY_MS);
        j.start_path();
        j.back();
        assert_eq!(j.path().map(|p| p.screen()), Some(PathScreen::Welcome));
        assert_eq!(j.step(), Step::SurpriseReveal);
    }

    #[test]
    fn test_view_serializes() {
        let j = at_reveal();
        let json = serde_json::to_value(j.view()).unwrap();
        assert_eq!(json["step"], "SurpriseReveal");
        assert_eq!(json["can_select_path"], true);
        assert!(json["path"].is_null());
    }
}
