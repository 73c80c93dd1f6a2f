//! Friendship and romance quizzes: five timed questions per attempt

use std::collections::BTreeSet;

use rand_pcg::Pcg32;
use serde::Serialize;

use super::{FieldView, Flow, GameAction, GameKind, Play, Rules};
use crate::consts::QUIZ_QUESTIONS_PER_ATTEMPT;
use crate::sim::content::questions::{FRIENDSHIP_QUESTIONS, ROMANCE_QUESTIONS};
use crate::sim::content::{Question, QuestionKind, select_questions};
use crate::sim::event::GameEvent;
use crate::sim::phase::PhaseTimings;
use crate::sim::scoring::{Evaluate, QuizProgress, Thresholds, Verdict};
use crate::tuning::GameTuning;

const FRIENDSHIP_RULES: &[&str] = &[
    "Answer 5 questions about true friendship.",
    "Questions can be single choice, multiple choice or fill in the blank.",
    "You have 15 seconds per question. Each correct answer is worth 10 points.",
    "Get at least 3 right to win.",
];

const ROMANCE_RULES: &[&str] = &[
    "Answer 5 questions about love and romance.",
    "Questions can be single choice, multiple choice or fill in the blank.",
    "You have 15 seconds per question. Each correct answer is worth 10 points.",
    "Get at least 3 right to win.",
];

#[derive(Debug, Clone, Default)]
pub struct QuizField {
    /// Index of the current question
    pub index: usize,
    pub secs_left: u32,
    /// (question id, answered correctly) in answer order
    pub results: Vec<(u32, bool)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizView {
    /// 1-based
    pub number: usize,
    pub total: usize,
    pub question: Option<Question>,
    pub kind: Option<QuestionKind>,
    pub secs_left: u32,
    pub last_correct: Option<bool>,
    /// Hint for the previous question when it was missed
    pub hint: Option<&'static str>,
    pub correct: u32,
    pub points: u32,
}

#[derive(Debug, Clone)]
pub struct Quiz {
    kind: GameKind,
    bank: &'static [Question],
    /// Ids answered correctly in earlier attempts of this instance
    answered: BTreeSet<u32>,
    timings: PhaseTimings,
    thresholds: Thresholds,
    question_secs: u32,
}

impl Quiz {
    pub fn friendship(tuning: &GameTuning) -> Self {
        Self::new(GameKind::FriendshipQuiz, &FRIENDSHIP_QUESTIONS, tuning)
    }

    pub fn romance(tuning: &GameTuning) -> Self {
        Self::new(GameKind::RomanceQuiz, &ROMANCE_QUESTIONS, tuning)
    }

    fn new(kind: GameKind, bank: &'static [Question], tuning: &GameTuning) -> Self {
        Self {
            kind,
            bank,
            answered: BTreeSet::new(),
            timings: tuning.quiz,
            thresholds: tuning.thresholds,
            question_secs: tuning.quiz_question_secs,
        }
    }

    pub fn answered(&self) -> &BTreeSet<u32> {
        &self.answered
    }

    /// Record the current question and move on. The next question gets a
    /// fresh clock, so the sub-timer restarts.
    fn conclude(&self, play: Play<'_, Self>, correct: bool) -> Flow {
        let Some(question) = play.content.get(play.field.index) else {
            return Flow::Continue;
        };
        play.progress.record(correct);
        play.field.results.push((question.id, correct));
        play.field.index += 1;
        play.field.secs_left = self.question_secs;

        if play.progress.all_attempted() {
            Flow::Finished
        } else {
            Flow::RestartSubTick
        }
    }
}

impl Rules for Quiz {
    type Content = Vec<&'static Question>;
    type Field = QuizField;
    type Progress = QuizProgress;

    fn kind(&self) -> GameKind {
        self.kind
    }

    fn timings(&self) -> PhaseTimings {
        self.timings
    }

    fn rules_text(&self) -> &'static [&'static str] {
        match self.kind {
            GameKind::RomanceQuiz => ROMANCE_RULES,
            _ => FRIENDSHIP_RULES,
        }
    }

    fn generate(&mut self, _attempt: u32, rng: &mut Pcg32) -> Vec<&'static Question> {
        select_questions(self.bank, &mut self.answered, rng)
    }

    fn setup(&self, _content: &Vec<&'static Question>) -> QuizField {
        QuizField {
            index: 0,
            secs_left: self.question_secs,
            results: Vec::with_capacity(QUIZ_QUESTIONS_PER_ATTEMPT),
        }
    }

    fn act(&mut self, play: Play<'_, Self>, action: &GameAction) -> Flow {
        let GameAction::SubmitAnswer(answer) = action else {
            return Flow::Continue;
        };
        let Some(question) = play.content.get(play.field.index) else {
            return Flow::Continue;
        };

        let correct = question.is_correct(answer);
        log::debug!("Question {} answered, correct: {correct}", question.id);
        play.events.push(if correct {
            GameEvent::AnswerCorrect
        } else {
            GameEvent::AnswerWrong
        });
        self.conclude(play, correct)
    }

    fn sub_tick_ms(&self) -> Option<u64> {
        Some(1000)
    }

    fn sub_tick(&mut self, play: Play<'_, Self>) -> Flow {
        if play.field.index >= play.content.len() {
            return Flow::Continue;
        }
        play.field.secs_left = play.field.secs_left.saturating_sub(1);
        if play.field.secs_left > 0 {
            return Flow::Continue;
        }
        play.events.push(GameEvent::QuestionTimedOut);
        self.conclude(play, false)
    }

    fn play_clock(&self, field: &QuizField) -> Option<u32> {
        Some(field.secs_left)
    }

    fn passed(&self, progress: &QuizProgress) -> bool {
        progress.passes(&self.thresholds)
    }

    fn evaluated(&mut self, _content: &Vec<&'static Question>, field: &QuizField, verdict: Verdict) {
        let correct_ids = field.results.iter().filter(|(_, ok)| *ok).map(|(id, _)| *id);
        self.answered.extend(correct_ids);
        log::debug!(
            "{} evaluated as {verdict:?}, {} questions retired",
            self.kind,
            self.answered.len()
        );
    }

    fn field_view(
        &self,
        content: &Vec<&'static Question>,
        field: &QuizField,
        progress: &QuizProgress,
    ) -> FieldView {
        let question = content.get(field.index).map(|q| **q);
        let last = field.results.last().copied();
        let hint = last
            .filter(|(_, ok)| !ok)
            .and_then(|(id, _)| content.iter().find(|q| q.id == id))
            .map(|q| q.hint);

        FieldView::Quiz(QuizView {
            number: (field.index + 1).min(content.len()),
            total: content.len(),
            kind: question.map(|q| q.kind()),
            question,
            secs_left: field.secs_left,
            last_correct: last.map(|(_, ok)| ok),
            hint,
            correct: progress.correct,
            points: progress.points,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::content::Answer;
    use crate::sim::content::questions::Expected;
    use crate::sim::games::Harness;

    fn right_answer(q: &Question) -> Answer {
        match q.expected {
            Expected::Single(i) => Answer::Single(i),
            Expected::Multiple(set) => Answer::Multiple(set.to_vec()),
            Expected::Text(t) => Answer::Text(t.to_uppercase()),
        }
    }

    fn answer_current(h: &mut Harness<Quiz>, correct: bool) -> Flow {
        let q = h.content[h.field.index];
        let answer = if correct {
            right_answer(q)
        } else {
            Answer::Text("definitely wrong".into())
        };
        h.act(GameAction::SubmitAnswer(answer))
    }

    #[test]
    fn test_five_questions_drawn() {
        let h = Harness::new(Quiz::friendship(&GameTuning::default()), 1, 1);
        assert_eq!(h.content.len(), QUIZ_QUESTIONS_PER_ATTEMPT);
        assert_eq!(h.field.secs_left, 15);
    }

    #[test]
    fn test_three_correct_passes() {
        let mut h = Harness::new(Quiz::friendship(&GameTuning::default()), 1, 1);
        let mut flow = Flow::Continue;
        for correct in [true, false, true, false, true] {
            flow = answer_current(&mut h, correct);
        }
        assert_eq!(flow, Flow::Finished);
        assert_eq!(h.progress.correct, 3);
        assert_eq!(h.progress.points, 30);
        assert!(h.rules.passed(&h.progress));
    }

    #[test]
    fn test_timeout_counts_as_attempt() {
        let mut h = Harness::new(Quiz::romance(&GameTuning::default()), 4, 1);
        for _ in 0..14 {
            assert_eq!(h.tick(), Flow::Continue);
        }
        assert_eq!(h.field.index, 0);
        h.tick();
        assert_eq!(h.field.index, 1);
        assert_eq!(h.progress.attempted, 1);
        assert_eq!(h.progress.correct, 0);
        assert_eq!(h.field.secs_left, 15);
        assert!(h.events.contains(&GameEvent::QuestionTimedOut));
    }

    #[test]
    fn test_next_question_restarts_clock() {
        let mut h = Harness::new(Quiz::friendship(&GameTuning::default()), 6, 1);
        h.tick();
        assert_eq!(answer_current(&mut h, true), Flow::RestartSubTick);
        assert_eq!(h.field.secs_left, 15);
        assert_eq!(h.rules.play_clock(&h.field), Some(15));
    }

    #[test]
    fn test_answers_after_finish_ignored() {
        let mut h = Harness::new(Quiz::friendship(&GameTuning::default()), 1, 1);
        for _ in 0..5 {
            answer_current(&mut h, true);
        }
        let flow = h.act(GameAction::SubmitAnswer(Answer::Single(0)));
        assert_eq!(flow, Flow::Continue);
        assert_eq!(h.progress.attempted, 5);
    }

    #[test]
    fn test_correct_ids_retired_after_evaluation() {
        let mut h = Harness::new(Quiz::friendship(&GameTuning::default()), 9, 1);
        let first = h.content[0].id;
        let second = h.content[1].id;
        answer_current(&mut h, true);
        answer_current(&mut h, false);
        for _ in 0..3 {
            answer_current(&mut h, false);
        }
        h.rules.evaluated(&h.content, &h.field, Verdict::Retry);
        assert!(h.rules.answered().contains(&first));
        assert!(!h.rules.answered().contains(&second));
    }

    #[test]
    fn test_view_shows_hint_after_miss() {
        let mut h = Harness::new(Quiz::romance(&GameTuning::default()), 3, 1);
        let missed = h.content[0];
        answer_current(&mut h, false);
        let FieldView::Quiz(view) = h.rules.field_view(&h.content, &h.field, &h.progress) else {
            panic!("expected quiz view");
        };
        assert_eq!(view.number, 2);
        assert_eq!(view.hint, Some(missed.hint));
        assert_eq!(view.last_correct, Some(false));
    }
}
