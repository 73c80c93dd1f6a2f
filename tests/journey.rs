//! Whole-journey runs through the public API in virtual time

use birthday_quest::GameTuning;
use birthday_quest::autoplay::Autopilot;
use birthday_quest::consts::*;
use birthday_quest::sim::{
    GameEvent, GameKind, PathChoice, PathKind, PathScreen, Phase, Step, StepSequencer,
};

const FRAME_MS: u64 = 100;
const LIMIT_MS: u64 = 3 * 60 * 60 * 1000;

fn at_reveal(seed: u64) -> StepSequencer {
    let mut journey = StepSequencer::new(GameTuning::default(), false, seed);
    assert!(journey.next());
    assert_eq!(journey.step(), Step::SurpriseReveal);
    journey
}

/// Play the mounted path until its celebration screen shows, recording the
/// order in which games were mounted
fn play_path(journey: &mut StepSequencer, pilot: &mut Autopilot) -> Vec<GameKind> {
    let mut mounted = Vec::new();
    while journey.path().map(|p| p.screen()) != Some(PathScreen::Celebration) {
        assert!(journey.now_ms() < LIMIT_MS, "path did not finish");

        let game = journey.path().and_then(|p| p.game()).map(|g| g.view());
        if let Some(view) = game {
            if mounted.last() != Some(&view.kind) {
                mounted.push(view.kind);
            }
            if let Some(action) = pilot.next_action(&view) {
                journey.act(action);
            }
        }
        journey.advance(FRAME_MS);
    }
    mounted
}

#[test]
fn crown_path_runs_start_to_finish() {
    let mut journey = at_reveal(2024);
    let mut pilot = Autopilot::new();

    assert!(journey.select_path(PathChoice::Crown));
    journey.advance(PATH_MOUNT_DELAY_MS);
    assert_eq!(journey.path().map(|p| p.kind()), Some(PathKind::Crown));
    assert!(journey.start_path());

    let first = journey.path().and_then(|p| p.game()).map(|g| (g.kind(), g.phase()));
    assert_eq!(first, Some((GameKind::BoardRace, Phase::Rules)));

    let mounted = play_path(&mut journey, &mut pilot);
    assert_eq!(mounted, PathKind::Crown.games().to_vec());
    assert!(journey.path().is_some_and(|p| p.progress().all_done()));
    assert!(journey.drain_events().contains(&GameEvent::Confetti));

    assert!(journey.finish_path());
    assert!(journey.path().is_none());
    assert_eq!(journey.step(), Step::BirthdayGame);
    assert_eq!(journey.active_timers(), 0);
}

#[test]
fn love_path_runs_start_to_finish() {
    let mut journey = at_reveal(7);
    let mut pilot = Autopilot::new();

    journey.select_path(PathChoice::Love);
    journey.advance(PATH_MOUNT_DELAY_MS);
    journey.start_path();

    let mounted = play_path(&mut journey, &mut pilot);
    assert_eq!(mounted, PathKind::Love.games().to_vec());
    journey.finish_path();
    assert_eq!(journey.step(), Step::BirthdayGame);
}

#[test]
fn autopilot_finishes_every_choice() {
    for (seed, choice) in [(1, PathChoice::Crown), (2, PathChoice::Love), (3, PathChoice::Glam)] {
        let mut journey = StepSequencer::new(GameTuning::default(), false, seed);
        let mut pilot = Autopilot::new();
        while pilot.steer(&mut journey, choice) {
            journey.advance(FRAME_MS);
            assert!(journey.now_ms() < LIMIT_MS, "{choice:?} did not finish");
        }
        assert_eq!(journey.step(), Step::FinalCelebration);
        assert_eq!(journey.selected_path(), Some(choice));

        let events = journey.drain_events();
        assert_eq!(events.last(), Some(&GameEvent::Celebrate));
    }
}

#[test]
fn glam_skips_the_games() {
    let mut journey = at_reveal(5);
    journey.select_path(PathChoice::Glam);
    journey.advance(PATH_MOUNT_DELAY_MS);
    assert!(journey.path().is_none());
    assert_eq!(journey.step(), Step::BirthdayGame);
}

#[test]
fn same_seed_same_journey() {
    let run = |seed| {
        let mut journey = at_reveal(seed);
        let mut pilot = Autopilot::new();
        journey.select_path(PathChoice::Crown);
        journey.advance(PATH_MOUNT_DELAY_MS);
        journey.start_path();
        play_path(&mut journey, &mut pilot);
        journey.now_ms()
    };
    assert_eq!(run(99), run(99));
}

#[test]
fn rules_skip_follows_settings() {
    let mut journey = at_reveal(11);
    journey.select_path(PathChoice::Crown);
    journey.advance(PATH_MOUNT_DELAY_MS);
    journey.start_path();
    assert!(!journey.skip_rules());

    let mut journey = StepSequencer::new(GameTuning::default(), true, 11);
    journey.next();
    journey.select_path(PathChoice::Crown);
    journey.advance(PATH_MOUNT_DELAY_MS);
    journey.start_path();
    assert!(journey.skip_rules());
    let phase = journey.path().and_then(|p| p.game()).map(|g| g.phase());
    assert_eq!(phase, Some(Phase::Countdown));
}

#[test]
fn backing_out_of_second_game_restarts_first() {
    let mut journey = at_reveal(3);
    let mut pilot = Autopilot::new();
    journey.select_path(PathChoice::Crown);
    journey.advance(PATH_MOUNT_DELAY_MS);
    journey.start_path();

    while journey.path().map(|p| p.screen()) == Some(PathScreen::Game(0)) {
        assert!(journey.now_ms() < LIMIT_MS);
        let view = journey.path().and_then(|p| p.game()).map(|g| g.view());
        if let Some(action) = view.and_then(|v| pilot.next_action(&v)) {
            journey.act(action);
        }
        journey.advance(FRAME_MS);
    }
    assert_eq!(journey.path().map(|p| p.screen()), Some(PathScreen::Game(1)));

    journey.back();
    let path = journey.path();
    assert_eq!(path.map(|p| p.screen()), Some(PathScreen::Game(0)));
    assert_eq!(path.and_then(|p| p.game()).map(|g| g.attempt()), Some(1));
    assert!(path.is_some_and(|p| p.progress().is_done(0)));
}
