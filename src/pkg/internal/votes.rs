//! Relevance voting on job postings.
//!
//! A user sits in at most one of the two voter lists. A fresh vote moves the
//! score by one; switching sides moves it by two, since the old vote is undone
//! as well.

use serde::Serialize;
use uuid::Uuid;

use crate::{pkg::internal::adaptors::jobs::spec::JobEntry, prelude::AppError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteDirection {
    Up,
    Down,
}

impl VoteDirection {
    fn unit(self) -> i32 {
        match self {
            VoteDirection::Up => 1,
            VoteDirection::Down => -1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UserVote {
    pub upvoted: bool,
    pub downvoted: bool,
}

impl From<VoteDirection> for UserVote {
    fn from(direction: VoteDirection) -> Self {
        UserVote {
            upvoted: direction == VoteDirection::Up,
            downvoted: direction == VoteDirection::Down,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteLedger {
    pub upvoted_by: Vec<Uuid>,
    pub downvoted_by: Vec<Uuid>,
    pub relevance_score: i32,
}

impl From<&JobEntry> for VoteLedger {
    fn from(job: &JobEntry) -> Self {
        VoteLedger {
            upvoted_by: job.upvoted_by.clone(),
            downvoted_by: job.downvoted_by.clone(),
            relevance_score: job.relevance_score,
        }
    }
}

impl VoteLedger {
    /// Records `user`'s vote and returns the score delta applied.
    pub fn cast(&mut self, user: Uuid, direction: VoteDirection) -> Result<i32, AppError> {
        let previous = self.vote_of(user);
        if previous == Some(direction) {
            return Err(AppError::bad_request(match direction {
                VoteDirection::Up => "Already upvoted",
                VoteDirection::Down => "Already downvoted",
            }));
        }

        self.upvoted_by.retain(|id| *id != user);
        self.downvoted_by.retain(|id| *id != user);
        match direction {
            VoteDirection::Up => self.upvoted_by.push(user),
            VoteDirection::Down => self.downvoted_by.push(user),
        }

        let delta = match previous {
            Some(_) => 2 * direction.unit(),
            None => direction.unit(),
        };
        self.relevance_score += delta;
        Ok(delta)
    }

    pub fn vote_of(&self, user: Uuid) -> Option<VoteDirection> {
        if self.upvoted_by.contains(&user) {
            Some(VoteDirection::Up)
        } else if self.downvoted_by.contains(&user) {
            Some(VoteDirection::Down)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty() -> VoteLedger {
        VoteLedger {
            upvoted_by: vec![],
            downvoted_by: vec![],
            relevance_score: 0,
        }
    }

    #[test]
    fn fresh_votes_move_score_by_one() {
        let mut ledger = empty();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        assert_eq!(ledger.cast(a, VoteDirection::Up).ok(), Some(1));
        assert_eq!(ledger.cast(b, VoteDirection::Down).ok(), Some(-1));
        assert_eq!(ledger.relevance_score, 0);
        assert_eq!(ledger.vote_of(a), Some(VoteDirection::Up));
        assert_eq!(ledger.vote_of(b), Some(VoteDirection::Down));
    }

    #[test]
    fn switching_sides_moves_score_by_two() {
        let mut ledger = empty();
        let a = Uuid::new_v4();

        ledger.cast(a, VoteDirection::Down).ok();
        assert_eq!(ledger.relevance_score, -1);
        assert_eq!(ledger.cast(a, VoteDirection::Up).ok(), Some(2));
        assert_eq!(ledger.relevance_score, 1);
        assert!(ledger.downvoted_by.is_empty());
        assert_eq!(ledger.upvoted_by, vec![a]);

        assert_eq!(ledger.cast(a, VoteDirection::Down).ok(), Some(-2));
        assert_eq!(ledger.relevance_score, -1);
        assert!(ledger.upvoted_by.is_empty());
        assert_eq!(ledger.downvoted_by, vec![a]);
    }

    #[test]
    fn repeated_vote_is_rejected_and_leaves_ledger_untouched() {
        let mut ledger = empty();
        let a = Uuid::new_v4();
        ledger.cast(a, VoteDirection::Up).ok();
        let snapshot = ledger.clone();

        let err = ledger.cast(a, VoteDirection::Up).unwrap_err();
        assert_eq!(err.to_string(), "Already upvoted");
        assert_eq!(ledger, snapshot);

        let b = Uuid::new_v4();
        ledger.cast(b, VoteDirection::Down).ok();
        let err = ledger.cast(b, VoteDirection::Down).unwrap_err();
        assert_eq!(err.to_string(), "Already downvoted");
    }

    #[test]
    fn switching_leaves_the_voter_in_one_list_once() {
        let a = Uuid::new_v4();
        let mut ledger = VoteLedger {
            upvoted_by: vec![a, a],
            downvoted_by: vec![a],
            relevance_score: 1,
        };
        assert_eq!(ledger.vote_of(a), Some(VoteDirection::Up));

        assert_eq!(ledger.cast(a, VoteDirection::Down).ok(), Some(-2));
        assert!(ledger.upvoted_by.is_empty());
        assert_eq!(ledger.downvoted_by, vec![a]);
        assert_eq!(ledger.vote_of(a), Some(VoteDirection::Down));
    }

    #[test]
    fn user_vote_reflects_direction() {
        assert_eq!(
            UserVote::from(VoteDirection::Up),
            UserVote {
                upvoted: true,
                downvoted: false
            }
        );
        assert_eq!(
            UserVote::from(VoteDirection::Down),
            UserVote {
                upvoted: false,
                downvoted: true
            }
        );
    }
}
