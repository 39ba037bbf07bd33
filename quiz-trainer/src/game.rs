//! State for one run of the `play` command.
//!
//! A [`Game`] starts from a snapshot of every quiz and asks them in random
//! order without repetition. It is either asking (questions left, no wrong
//! answer yet) or finished. The game owns no I/O: the `play` handler feeds it
//! replies and reports what it returns.

use rand::Rng;

use crate::model::Quiz;

/// Why a game stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finish {
    /// Every quiz was answered correctly.
    Exhausted,
    /// A reply did not match.
    WrongAnswer,
}

/// Result of submitting a reply to the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Correct { score: usize },
    Incorrect { score: usize },
}

#[derive(Debug)]
pub struct Game {
    working_set: Vec<Quiz>,
    current: Option<usize>,
    score: usize,
    finish: Option<Finish>,
}

impl Game {
    pub fn new(quizzes: Vec<Quiz>) -> Self {
        Self {
            working_set: quizzes,
            current: None,
            score: 0,
            finish: None,
        }
    }

    /// Picks the next question uniformly among the quizzes not yet answered.
    ///
    /// Returns `None` once the game is finished; an empty working set
    /// finishes it as [`Finish::Exhausted`].
    pub fn next_question<R: Rng>(&mut self, rng: &mut R) -> Option<&Quiz> {
        if self.finish.is_some() {
            return None;
        }
        if self.working_set.is_empty() {
            self.finish = Some(Finish::Exhausted);
            return None;
        }

        let index = rng.gen_range(0..self.working_set.len());
        self.current = Some(index);
        self.working_set.get(index)
    }

    /// Checks `reply` against the question last returned by
    /// [`Game::next_question`].
    ///
    /// A correct reply removes that quiz from the working set; a wrong one
    /// ends the game. Without a pending question the reply counts as wrong.
    pub fn submit(&mut self, reply: &str) -> Verdict {
        let correct = self
            .current
            .take()
            .filter(|&index| self.working_set[index].is_correct(reply));

        match correct {
            Some(index) => {
                self.working_set.remove(index);
                self.score += 1;
                Verdict::Correct { score: self.score }
            }
            None => {
                self.finish = Some(Finish::WrongAnswer);
                Verdict::Incorrect { score: self.score }
            }
        }
    }

    pub fn score(&self) -> usize {
        self.score
    }

    #[cfg(test)]
    fn remaining(&self) -> usize {
        self.working_set.len()
    }

    pub fn finish(&self) -> Option<Finish> {
        self.finish
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn quizzes(count: i64) -> Vec<Quiz> {
        (1..=count)
            .map(|id| Quiz {
                id,
                question: format!("question {id}"),
                answer: format!("answer {id}"),
            })
            .collect()
    }

    #[test]
    fn empty_game_finishes_immediately_with_zero() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut game = Game::new(Vec::new());

        assert!(game.next_question(&mut rng).is_none());
        assert_eq!(game.finish(), Some(Finish::Exhausted));
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn always_correct_asks_every_quiz_once() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut game = Game::new(quizzes(6));
            let mut asked = HashSet::new();

            while let Some(quiz) = game.next_question(&mut rng) {
                let (id, answer) = (quiz.id, quiz.answer.to_uppercase());
                assert!(asked.insert(id), "quiz {id} asked twice");
                assert!(matches!(game.submit(&answer), Verdict::Correct { .. }));
            }

            assert_eq!(asked.len(), 6);
            assert_eq!(game.score(), 6);
            assert_eq!(game.remaining(), 0);
            assert_eq!(game.finish(), Some(Finish::Exhausted));
        }
    }

    #[test]
    fn wrong_answer_ends_the_game() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut game = Game::new(quizzes(3));

        let answer = game.next_question(&mut rng).map(|quiz| quiz.answer.clone());
        let answer = answer.expect("first question");
        assert_eq!(game.submit(&answer), Verdict::Correct { score: 1 });

        assert!(game.next_question(&mut rng).is_some());
        assert_eq!(game.submit("nope"), Verdict::Incorrect { score: 1 });
        assert_eq!(game.finish(), Some(Finish::WrongAnswer));
        assert!(game.next_question(&mut rng).is_none());
        assert_eq!(game.remaining(), 2);
    }

    #[test]
    fn reply_without_question_is_wrong() {
        let mut game = Game::new(quizzes(1));
        assert_eq!(game.submit("answer 1"), Verdict::Incorrect { score: 0 });
    }
}
