//! Quiz question banks and per-attempt question selection

use std::collections::BTreeSet;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::consts::QUIZ_QUESTIONS_PER_ATTEMPT;

/// What counts as a correct answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Expected {
    /// Index of the one correct option
    Single(usize),
    /// Exact set of option indices
    Multiple(&'static [usize]),
    /// Free text, compared trimmed and case-insensitive
    Text(&'static str),
}

/// Kind of input a question asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionKind {
    Single,
    Multiple,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Question {
    pub id: u32,
    pub prompt: &'static str,
    pub options: &'static [&'static str],
    #[serde(skip)]
    pub expected: Expected,
    pub hint: &'static str,
}

/// A player's answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Answer {
    Single(usize),
    Multiple(Vec<usize>),
    Text(String),
}

impl Question {
    pub fn kind(&self) -> QuestionKind {
        match self.expected {
            Expected::Single(_) => QuestionKind::Single,
            Expected::Multiple(_) => QuestionKind::Multiple,
            Expected::Text(_) => QuestionKind::Text,
        }
    }

    /// Grade an answer. A mismatched answer kind is simply wrong.
    pub fn is_correct(&self, answer: &Answer) -> bool {
        match (&self.expected, answer) {
            (Expected::Single(want), Answer::Single(got)) => want == got,
            (Expected::Multiple(want), Answer::Multiple(got)) => {
                let want: BTreeSet<usize> = want.iter().copied().collect();
                let got: BTreeSet<usize> = got.iter().copied().collect();
                want == got
            }
            (Expected::Text(want), Answer::Text(got)) => got.trim().eq_ignore_ascii_case(want),
            _ => false,
        }
    }
}

/// Draw the questions for one attempt.
///
/// Questions whose id is in `answered` are skipped. When fewer than a full
/// attempt's worth remain, `answered` is cleared and the whole pool is used.
pub fn select_questions(
    pool: &'static [Question],
    answered: &mut BTreeSet<u32>,
    rng: &mut impl Rng,
) -> Vec<&'static Question> {
    let mut eligible: Vec<&'static Question> =
        pool.iter().filter(|q| !answered.contains(&q.id)).collect();

    if eligible.len() < QUIZ_QUESTIONS_PER_ATTEMPT {
        log::debug!("Question pool exhausted, resetting answered set");
        answered.clear();
        eligible = pool.iter().collect();
    }

    eligible.shuffle(rng);
    eligible.truncate(QUIZ_QUESTIONS_PER_ATTEMPT);
    eligible
}

const fn single(
    id: u32,
    prompt: &'static str,
    options: &'static [&'static str],
    correct: usize,
    hint: &'static str,
) -> Question {
    Question {
        id,
        prompt,
        options,
        expected: Expected::Single(correct),
        hint,
    }
}

const fn multiple(
    id: u32,
    prompt: &'static str,
    options: &'static [&'static str],
    correct: &'static [usize],
    hint: &'static str,
) -> Question {
    Question {
        id,
        prompt,
        options,
        expected: Expected::Multiple(correct),
        hint,
    }
}

const fn text(id: u32, prompt: &'static str, correct: &'static str, hint: &'static str) -> Question {
    Question {
        id,
        prompt,
        options: &[],
        expected: Expected::Text(correct),
        hint,
    }
}

pub static FRIENDSHIP_QUESTIONS: [Question; 20] = [
    single(
        1,
        "What makes a friendship truly royal and special?",
        &[
            "Always agreeing with each other",
            "Being honest, supportive, and celebrating each other's growth",
            "Only spending time together when convenient",
            "Competing to see who's better",
        ],
        1,
        "True friendship is built on honesty, support, and celebrating each other's journey!",
    ),
    single(
        2,
        "How should a queen treat her friends during difficult times?",
        &[
            "Avoid them until things get better",
            "Give advice only when asked",
            "Listen with compassion and offer support without judgment",
            "Tell them what they did wrong",
        ],
        2,
        "A true queen-friend listens with her heart and supports without judgment.",
    ),
    multiple(
        3,
        "What are the most precious gifts you can give a friend? (Select all that apply)",
        &[
            "Your time and attention",
            "Expensive presents",
            "Genuine care and understanding",
            "Social media likes",
            "Trust and loyalty",
        ],
        &[0, 2, 4],
        "The most valuable gifts come from the heart, not the wallet.",
    ),
    single(
        4,
        "How do royal friends celebrate each other's successes?",
        &[
            "Feel jealous secretly",
            "Compare their own achievements",
            "Genuinely celebrate and feel proud of their friend",
            "Try to one-up them",
        ],
        2,
        "Royal friends lift each other up and celebrate successes as if they were their own!",
    ),
    text(
        5,
        "Complete this sentence: 'The crown jewel of friendship is...'",
        "trust",
        "It's something that takes time to build but can be broken in an instant.",
    ),
    multiple(
        6,
        "What qualities make someone a true friend? (Select all that apply)",
        &[
            "Reliability and consistency",
            "Being popular",
            "Empathy and understanding",
            "Having lots of money",
            "Being a good listener",
        ],
        &[0, 2, 4],
        "True friendship qualities come from character, not circumstances.",
    ),
    single(
        7,
        "When friends disagree, what's the royal way to handle it?",
        &[
            "Stop talking to them",
            "Talk it out with respect and understanding",
            "Get other friends to take sides",
            "Pretend nothing happened",
        ],
        1,
        "Royal friends communicate openly and respectfully, even during disagreements.",
    ),
    text(
        8,
        "What does 'being there' for a friend really mean?",
        "support",
        "It's about offering emotional presence and help when they need it most.",
    ),
    multiple(
        9,
        "Which actions show you truly care about a friend? (Select all that apply)",
        &[
            "Remembering important dates",
            "Only calling when you need something",
            "Checking in during tough times",
            "Being genuinely interested in their life",
            "Gossiping about them",
        ],
        &[0, 2, 3],
        "Caring friends show interest and support consistently, not just when convenient.",
    ),
    single(
        10,
        "What's the best way to apologize to a friend?",
        &[
            "Send a text message",
            "Have a sincere face-to-face conversation",
            "Buy them something expensive",
            "Wait for them to get over it",
        ],
        1,
        "Sincere apologies require genuine conversation and taking responsibility.",
    ),
    text(
        11,
        "Fill in the blank: 'A true friend accepts you for _____ you are.'",
        "who",
        "True friends love and accept your authentic self.",
    ),
    multiple(
        12,
        "What are signs of a healthy friendship? (Select all that apply)",
        &[
            "Mutual respect",
            "One person always giving",
            "Open communication",
            "Jealousy and competition",
            "Supporting each other's dreams",
        ],
        &[0, 2, 4],
        "Healthy friendships are balanced and supportive, not one-sided or competitive.",
    ),
    single(
        13,
        "How should friends handle secrets?",
        &[
            "Share them with everyone",
            "Keep them safe and private",
            "Use them when you're angry",
            "Forget about them immediately",
        ],
        1,
        "Trust is the foundation of friendship - secrets should be kept safe.",
    ),
    text(
        14,
        "What's the most important thing in maintaining long-distance friendships?",
        "communication",
        "It's about staying connected despite the physical distance.",
    ),
    multiple(
        15,
        "Which behaviors can damage a friendship? (Select all that apply)",
        &[
            "Being honest about feelings",
            "Breaking promises repeatedly",
            "Gossiping behind their back",
            "Supporting their decisions",
            "Being unreliable",
        ],
        &[1, 2, 4],
        "Friendship-damaging behaviors involve breaking trust and being unreliable.",
    ),
    single(
        16,
        "What's the best way to make new friends?",
        &[
            "Pretend to be someone you're not",
            "Be genuine and show interest in others",
            "Only talk about yourself",
            "Wait for others to approach you",
        ],
        1,
        "Authenticity and genuine interest in others attracts real friendships.",
    ),
    text(
        17,
        "Complete this: 'Good friends help you become the _____ version of yourself.'",
        "best",
        "True friends inspire and encourage your growth and improvement.",
    ),
    multiple(
        18,
        "What should you do when a friend is going through a hard time? (Select all that apply)",
        &[
            "Listen without trying to fix everything",
            "Avoid them until they feel better",
            "Offer practical help when appropriate",
            "Tell them to get over it",
            "Be patient and understanding",
        ],
        &[0, 2, 4],
        "Supporting friends through difficulties requires patience, listening, and practical help.",
    ),
    single(
        19,
        "What's the difference between a friend and an acquaintance?",
        &[
            "Friends are people you see every day",
            "Friends are deeper connections with mutual care and trust",
            "Acquaintances are more important",
            "There's no real difference",
        ],
        1,
        "Friendship involves deeper emotional connection and mutual investment.",
    ),
    text(
        20,
        "The golden rule of friendship is to treat others how you want to be _____.",
        "treated",
        "It's about reciprocity and mutual respect in relationships.",
    ),
];

pub static ROMANCE_QUESTIONS: [Question; 20] = [
    single(
        1,
        "What makes a romantic relationship truly special and lasting?",
        &[
            "Always agreeing with each other",
            "Trust, communication, and mutual respect",
            "Only spending time together when convenient",
            "Competing to see who's better",
        ],
        1,
        "True love is built on trust, open communication, and respecting each other!",
    ),
    single(
        2,
        "How should partners support each other during difficult times?",
        &[
            "Avoid them until things get better",
            "Give advice only when asked",
            "Listen with compassion and offer emotional support",
            "Tell them what they did wrong",
        ],
        2,
        "True love means being there with compassion and emotional support.",
    ),
    multiple(
        3,
        "What are the most precious gifts you can give in a relationship? (Select all that apply)",
        &[
            "Your time and undivided attention",
            "Expensive presents",
            "Genuine love and understanding",
            "Social media posts",
            "Trust and loyalty",
        ],
        &[0, 2, 4],
        "The most valuable gifts in love come from the heart, not the wallet.",
    ),
    single(
        4,
        "How do loving partners celebrate each other's successes?",
        &[
            "Feel jealous secretly",
            "Compare their own achievements",
            "Genuinely celebrate and feel proud of their partner",
            "Try to one-up them",
        ],
        2,
        "True love means celebrating your partner's success as if it were your own!",
    ),
    text(
        5,
        "Complete this sentence: 'The foundation of true love is...'",
        "trust",
        "It's something that takes time to build but can be broken in an instant.",
    ),
    multiple(
        6,
        "What qualities make someone a loving partner? (Select all that apply)",
        &[
            "Kindness and empathy",
            "Being popular",
            "Emotional intelligence",
            "Having lots of money",
            "Being a good listener",
        ],
        &[0, 2, 4],
        "True love qualities come from character and emotional maturity.",
    ),
    single(
        7,
        "When partners disagree, what's the loving way to handle it?",
        &[
            "Give the silent treatment",
            "Communicate openly with respect and understanding",
            "Get friends to take sides",
            "Pretend nothing happened",
        ],
        1,
        "Loving partners communicate openly and respectfully, even during disagreements.",
    ),
    text(
        8,
        "What does 'being there' for your partner really mean?",
        "support",
        "It's about offering emotional presence and help when they need it most.",
    ),
    multiple(
        9,
        "Which actions show you truly love someone? (Select all that apply)",
        &[
            "Remembering important dates and moments",
            "Only calling when you need something",
            "Being there during tough times",
            "Showing genuine interest in their dreams",
            "Talking behind their back",
        ],
        &[0, 2, 3],
        "True love shows through consistent care and genuine interest in their wellbeing.",
    ),
    single(
        10,
        "What's the best way to apologize to someone you love?",
        &[
            "Send a text message",
            "Have a sincere heart-to-heart conversation",
            "Buy them something expensive",
            "Wait for them to get over it",
        ],
        1,
        "Sincere apologies in love require genuine conversation and taking responsibility.",
    ),
    text(
        11,
        "Fill in the blank: 'True love accepts you for _____ you are.'",
        "who",
        "True love embraces your authentic self completely.",
    ),
    multiple(
        12,
        "What are signs of a healthy romantic relationship? (Select all that apply)",
        &[
            "Mutual respect and admiration",
            "One person always giving",
            "Open and honest communication",
            "Jealousy and possessiveness",
            "Supporting each other's dreams",
        ],
        &[0, 2, 4],
        "Healthy love is balanced, supportive, and built on mutual respect.",
    ),
    single(
        13,
        "How should couples handle personal secrets and privacy?",
        &[
            "Share everything with everyone",
            "Respect privacy while maintaining trust",
            "Use secrets when you're angry",
            "Hide everything from each other",
        ],
        1,
        "Love balances openness with respect for personal boundaries.",
    ),
    text(
        14,
        "What's the most important thing in maintaining long-distance love?",
        "communication",
        "It's about staying emotionally connected despite physical distance.",
    ),
    multiple(
        15,
        "Which behaviors can damage a loving relationship? (Select all that apply)",
        &[
            "Being honest about feelings",
            "Breaking promises repeatedly",
            "Betraying trust and confidence",
            "Supporting their decisions",
            "Being emotionally unavailable",
        ],
        &[1, 2, 4],
        "Love-damaging behaviors involve breaking trust and emotional neglect.",
    ),
    single(
        16,
        "What's the best way to show love in everyday moments?",
        &[
            "Grand expensive gestures only",
            "Small acts of kindness and thoughtfulness",
            "Only on special occasions",
            "Through social media posts",
        ],
        1,
        "True love shines through daily acts of kindness and thoughtfulness.",
    ),
    text(
        17,
        "Complete this: 'Love helps you become the _____ version of yourself.'",
        "best",
        "True love inspires growth and brings out your finest qualities.",
    ),
    multiple(
        18,
        "What should you do when your partner is going through a hard time? (Select all that apply)",
        &[
            "Listen without trying to fix everything",
            "Avoid them until they feel better",
            "Offer comfort and practical help",
            "Tell them to get over it quickly",
            "Be patient and understanding",
        ],
        &[0, 2, 4],
        "Supporting someone you love requires patience, listening, and gentle care.",
    ),
    single(
        19,
        "What's the difference between love and infatuation?",
        &[
            "Love is just physical attraction",
            "Love is deeper, involving emotional connection and commitment",
            "Infatuation lasts longer",
            "There's no real difference",
        ],
        1,
        "True love involves deep emotional connection and long-term commitment.",
    ),
    text(
        20,
        "The golden rule of love is to treat your partner how you want to be _____.",
        "loved",
        "It's about giving the kind of love you hope to receive.",
    ),
];

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_banks_have_unique_ids() {
        for bank in [&FRIENDSHIP_QUESTIONS, &ROMANCE_QUESTIONS] {
            let ids: BTreeSet<u32> = bank.iter().map(|q| q.id).collect();
            assert_eq!(ids.len(), bank.len());
        }
    }

    #[test]
    fn test_grading_single() {
        let q = &FRIENDSHIP_QUESTIONS[0];
        assert_eq!(q.kind(), QuestionKind::Single);
        assert!(q.is_correct(&Answer::Single(1)));
        assert!(!q.is_correct(&Answer::Single(0)));
        assert!(!q.is_correct(&Answer::Text("1".into())));
    }

    #[test]
    fn test_grading_multiple_is_exact_set() {
        let q = &FRIENDSHIP_QUESTIONS[2];
        assert!(q.is_correct(&Answer::Multiple(vec![4, 0, 2])));
        assert!(!q.is_correct(&Answer::Multiple(vec![0, 2])));
        assert!(!q.is_correct(&Answer::Multiple(vec![0, 1, 2, 4])));
    }

    #[test]
    fn test_grading_text_trims_and_ignores_case() {
        let q = &FRIENDSHIP_QUESTIONS[4];
        assert!(q.is_correct(&Answer::Text("  Trust ".into())));
        assert!(!q.is_correct(&Answer::Text("trusting".into())));
        assert!(ROMANCE_QUESTIONS[19].is_correct(&Answer::Text("LOVED".into())));
    }

    #[test]
    fn test_selection_skips_answered() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut answered: BTreeSet<u32> = (1..=10).collect();
        let picked = select_questions(&FRIENDSHIP_QUESTIONS, &mut answered, &mut rng);
        assert_eq!(picked.len(), QUIZ_QUESTIONS_PER_ATTEMPT);
        assert!(picked.iter().all(|q| q.id > 10));
        assert_eq!(answered.len(), 10);
    }

    #[test]
    fn test_selection_resets_when_pool_exhausted() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut answered: BTreeSet<u32> = (1..=17).collect();
        let picked = select_questions(&ROMANCE_QUESTIONS, &mut answered, &mut rng);
        assert_eq!(picked.len(), QUIZ_QUESTIONS_PER_ATTEMPT);
        assert!(answered.is_empty());
    }

    proptest! {
        #[test]
        fn prop_selection_is_distinct(seed: u64, answered_mask in 0u32..(1 << 20)) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut answered: BTreeSet<u32> =
                (1..=20).filter(|id| answered_mask & (1 << (id - 1)) != 0).collect();
            let before = answered.clone();
            let picked = select_questions(&FRIENDSHIP_QUESTIONS, &mut answered, &mut rng);

            let ids: BTreeSet<u32> = picked.iter().map(|q| q.id).collect();
            prop_assert_eq!(ids.len(), QUIZ_QUESTIONS_PER_ATTEMPT);
            if 20 - before.len() >= QUIZ_QUESTIONS_PER_ATTEMPT {
                prop_assert!(ids.is_disjoint(&before));
            } else {
                prop_assert!(answered.is_empty());
            }
        }
    }
}
