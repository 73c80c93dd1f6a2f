//! Mini-game lifecycle controller
//!
//! One reusable state machine drives every mini-game:
//!
//! ```text
//! Rules -> Countdown -> Playing -> Evaluating -> Won -> (Completed)
//!                                      |
//!                                      +-> Retry -> Rules ...
//! ```
//!
//! The controller owns exactly one phase timer at a time plus, while
//! playing, the game's optional sub-timer. Every timer is tagged with the
//! controller's owner id and the generation of the phase it was armed in;
//! firings from an older generation are dropped.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::event::GameEvent;
use super::games::{FieldView, Flow, GameAction, GameKind, Play, Rules};
use super::phase::{AttemptState, Phase, PhaseTimings};
use super::scoring::Verdict;
use super::timer::{Fired, Scheduler, TimerId, TimerPurpose, TimerTag};
use crate::consts::PHASE_TICK_MS;
use crate::format_clock;

/// Notification from a controller to whoever mounted it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ControllerSignal {
    /// The win screen finished; advance the path
    Completed,
    /// The player asked to go back
    Back,
}

/// What the UI should show for a mini-game
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameView {
    pub kind: GameKind,
    pub title: &'static str,
    pub phase: Phase,
    pub attempt: u32,
    pub seconds_left: u32,
    /// `seconds_left` as `m:ss`
    pub clock: String,
    pub rules: &'static [&'static str],
    pub verdict: Option<Verdict>,
    pub field: Option<FieldView>,
}

/// Object-safe face of a [`GameController`], so a path can hold any game
pub trait MiniGame {
    fn kind(&self) -> GameKind;

    /// Start the lifecycle in `Rules`
    fn mount(&mut self, sched: &mut Scheduler);

    /// Apply a fired timer; stale or foreign firings are ignored
    fn on_timer(&mut self, sched: &mut Scheduler, fired: Fired);

    /// Player input, ignored outside `Playing`
    fn act(&mut self, sched: &mut Scheduler, action: GameAction);

    /// Jump from `Rules` to `Countdown` when skipping is allowed
    fn skip_rules(&mut self, sched: &mut Scheduler) -> bool;

    /// Tear down and signal [`ControllerSignal::Back`]
    fn back(&mut self, sched: &mut Scheduler);

    /// Tear down silently
    fn unmount(&mut self, sched: &mut Scheduler);

    fn take_signal(&mut self) -> Option<ControllerSignal>;

    fn drain_events(&mut self) -> Vec<GameEvent>;

    fn view(&self) -> GameView;

    fn phase(&self) -> Phase;

    fn attempt(&self) -> u32;

    /// Timer owner id while mounted
    fn owner(&self) -> Option<u32>;

    fn is_finished(&self) -> bool;
}

pub struct GameController<R: Rules> {
    rules: R,
    timings: PhaseTimings,
    state: AttemptState<R::Progress>,
    content: Option<R::Content>,
    field: Option<R::Field>,
    rng: Pcg32,
    owner: Option<u32>,
    generation: u64,
    phase_timer: Option<TimerId>,
    sub_timer: Option<TimerId>,
    events: Vec<GameEvent>,
    signal: Option<ControllerSignal>,
    last_verdict: Option<Verdict>,
    finished: bool,
    allow_rules_skip: bool,
}

impl<R: Rules> GameController<R> {
    pub fn new(rules: R, seed: u64) -> Self {
        let timings = rules.timings();
        Self {
            state: AttemptState::new(&timings),
            timings,
            rules,
            content: None,
            field: None,
            rng: Pcg32::seed_from_u64(seed),
            owner: None,
            generation: 0,
            phase_timer: None,
            sub_timer: None,
            events: Vec::new(),
            signal: None,
            last_verdict: None,
            finished: false,
            allow_rules_skip: false,
        }
    }

    pub fn with_rules_skip(mut self, allow: bool) -> Self {
        self.allow_rules_skip = allow;
        self
    }

    pub fn rules(&self) -> &R {
        &self.rules
    }

    pub fn state(&self) -> &AttemptState<R::Progress> {
        &self.state
    }

    /// Current attempt's play field, once generated
    pub fn field(&self) -> Option<&R::Field> {
        self.field.as_ref()
    }

    pub fn last_verdict(&self) -> Option<Verdict> {
        self.last_verdict
    }

    fn is_live(&self) -> bool {
        self.owner.is_some() && !self.finished
    }

    fn tag(&self, purpose: TimerPurpose) -> Option<TimerTag> {
        self.owner.map(|owner| TimerTag {
            owner,
            generation: self.generation,
            purpose,
        })
    }

    fn cancel_timers(&mut self, sched: &mut Scheduler) {
        if let Some(id) = self.phase_timer.take() {
            sched.cancel(id);
        }
        if let Some(id) = self.sub_timer.take() {
            sched.cancel(id);
        }
    }

    fn enter_phase(&mut self, sched: &mut Scheduler, phase: Phase) {
        self.cancel_timers(sched);
        self.generation += 1;

        if phase == Phase::Retry {
            self.state.attempt_number += 1;
        }
        let prev = self.state.phase;
        self.state.phase = phase;
        self.state.phase_time_remaining = self.timings.duration(phase);
        self.events.push(GameEvent::PhaseChanged(phase));
        log::info!(
            "{}: {} -> {} (attempt {})",
            self.rules.kind(),
            prev.as_str(),
            phase.as_str(),
            self.state.attempt_number
        );

        match phase {
            Phase::Evaluating => self.evaluate(sched),
            Phase::Playing => {
                if self.timings.play_secs.is_some() {
                    self.arm_phase_timer(sched);
                }
                self.arm_sub_timer(sched);
            }
            Phase::Rules | Phase::Countdown | Phase::Won | Phase::Retry => self.arm_phase_timer(sched),
        }
    }

    fn arm_phase_timer(&mut self, sched: &mut Scheduler) {
        if self.state.phase_time_remaining == 0 {
            self.phase_expired(sched);
            return;
        }
        if let Some(tag) = self.tag(TimerPurpose::PhaseSecond) {
            self.phase_timer = Some(sched.every(PHASE_TICK_MS, tag));
        }
    }

    /// (Re)start the game's sub-timer so its next firing is one interval from now
    fn arm_sub_timer(&mut self, sched: &mut Scheduler) {
        if let Some(id) = self.sub_timer.take() {
            sched.cancel(id);
        }
        if let (Some(ms), Some(tag)) = (self.rules.sub_tick_ms(), self.tag(TimerPurpose::SubTick)) {
            self.sub_timer = Some(sched.every(ms, tag));
        }
    }

    fn phase_expired(&mut self, sched: &mut Scheduler) {
        match self.state.phase {
            Phase::Rules => self.enter_phase(sched, Phase::Countdown),
            Phase::Countdown => self.start_attempt(sched),
            Phase::Playing => self.enter_phase(sched, Phase::Evaluating),
            Phase::Won => self.complete(sched),
            Phase::Retry => self.enter_phase(sched, Phase::Rules),
            Phase::Evaluating => {}
        }
    }

    /// Fresh content and zeroed progress for a new round of play
    fn start_attempt(&mut self, sched: &mut Scheduler) {
        let content = self.rules.generate(self.state.attempt_number, &mut self.rng);
        self.field = Some(self.rules.setup(&content));
        self.content = Some(content);
        self.state.progress = R::Progress::default();
        self.enter_phase(sched, Phase::Playing);
    }

    fn evaluate(&mut self, sched: &mut Scheduler) {
        let verdict = Verdict::from(self.rules.passed(&self.state.progress));
        if let (Some(content), Some(field)) = (self.content.as_ref(), self.field.as_ref()) {
            self.rules.evaluated(content, field, verdict);
        }
        self.last_verdict = Some(verdict);
        self.events.push(match verdict {
            Verdict::Won => GameEvent::Won,
            Verdict::Retry => GameEvent::Retry,
        });

        let next = match verdict {
            Verdict::Won => Phase::Won,
            Verdict::Retry => Phase::Retry,
        };
        self.enter_phase(sched, next);
    }

    fn complete(&mut self, sched: &mut Scheduler) {
        self.cancel_timers(sched);
        self.generation += 1;
        self.finished = true;
        self.signal = Some(ControllerSignal::Completed);
        log::info!(
            "{} completed after {} attempt(s)",
            self.rules.kind(),
            self.state.attempt_number
        );
    }

    fn teardown(&mut self, sched: &mut Scheduler) {
        self.cancel_timers(sched);
        if let Some(owner) = self.owner.take() {
            sched.cancel_owner(owner);
        }
        self.generation += 1;
    }

    /// Run a play-phase handler and evaluate if it reports completion
    fn with_play(&mut self, sched: &mut Scheduler, handler: impl FnOnce(&mut R, Play<'_, R>) -> Flow) {
        let (Some(content), Some(field)) = (self.content.as_ref(), self.field.as_mut()) else {
            return;
        };
        let play = Play {
            content,
            field,
            progress: &mut self.state.progress,
            rng: &mut self.rng,
            events: &mut self.events,
        };
        match handler(&mut self.rules, play) {
            Flow::Continue => {}
            Flow::RestartSubTick => self.arm_sub_timer(sched),
            Flow::Finished => self.enter_phase(sched, Phase::Evaluating),
        }
    }
}

impl<R: Rules> MiniGame for GameController<R> {
    fn kind(&self) -> GameKind {
        self.rules.kind()
    }

    fn mount(&mut self, sched: &mut Scheduler) {
        if self.owner.is_some() || self.finished {
            return;
        }
        self.owner = Some(sched.allocate_owner());
        self.enter_phase(sched, Phase::Rules);
    }

    fn on_timer(&mut self, sched: &mut Scheduler, fired: Fired) {
        if !self.is_live()
            || Some(fired.tag.owner) != self.owner
            || fired.tag.generation != self.generation
        {
            log::debug!("{}: dropping stale timer {:?}", self.rules.kind(), fired.id);
            return;
        }

        match fired.tag.purpose {
            TimerPurpose::PhaseSecond => {
                let paused = self.state.phase == Phase::Playing
                    && self.field.as_ref().is_some_and(|f| !self.rules.clock_running(f));
                if !paused && self.state.tick_second() {
                    self.phase_expired(sched);
                }
            }
            TimerPurpose::SubTick if self.state.phase == Phase::Playing => {
                self.with_play(sched, |rules, play| rules.sub_tick(play));
            }
            TimerPurpose::SubTick | TimerPurpose::Delay => {}
        }
    }

    fn act(&mut self, sched: &mut Scheduler, action: GameAction) {
        if !self.is_live() || self.state.phase != Phase::Playing {
            log::debug!(
                "{}: ignoring {:?} during {}",
                self.rules.kind(),
                action,
                self.state.phase.as_str()
            );
            return;
        }
        self.with_play(sched, |rules, play| rules.act(play, &action));
    }

    fn skip_rules(&mut self, sched: &mut Scheduler) -> bool {
        if !self.allow_rules_skip || !self.is_live() || self.state.phase != Phase::Rules {
            return false;
        }
        self.enter_phase(sched, Phase::Countdown);
        true
    }

    fn back(&mut self, sched: &mut Scheduler) {
        if self.owner.is_none() {
            return;
        }
        self.teardown(sched);
        self.signal = Some(ControllerSignal::Back);
        log::info!("{}: back", self.rules.kind());
    }

    fn unmount(&mut self, sched: &mut Scheduler) {
        self.teardown(sched);
    }

    fn take_signal(&mut self) -> Option<ControllerSignal> {
        self.signal.take()
    }

    fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn view(&self) -> GameView {
        let show_field = matches!(
            self.state.phase,
            Phase::Playing | Phase::Evaluating | Phase::Won | Phase::Retry
        );
        let field = match (show_field, self.content.as_ref(), self.field.as_ref()) {
            (true, Some(content), Some(field)) => {
                Some(self.rules.field_view(content, field, &self.state.progress))
            }
            _ => None,
        };

        let play_clock = match (self.state.phase, self.timings.play_secs, self.field.as_ref()) {
            (Phase::Playing, None, Some(field)) => self.rules.play_clock(field),
            _ => None,
        };
        let seconds_left = play_clock.unwrap_or(self.state.phase_time_remaining);

        GameView {
            kind: self.rules.kind(),
            title: self.rules.kind().title(),
            phase: self.state.phase,
            attempt: self.state.attempt_number,
            seconds_left,
            clock: format_clock(seconds_left),
            rules: self.rules.rules_text(),
            verdict: self.last_verdict,
            field,
        }
    }

    fn phase(&self) -> Phase {
        self.state.phase
    }

    fn attempt(&self) -> u32 {
        self.state.attempt_number
    }

    fn owner(&self) -> Option<u32> {
        self.owner
    }

    fn is_finished(&self) -> bool {
        self.finished
    }
}
