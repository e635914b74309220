use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Vote {
    pub post_id: i64,
    pub user_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteRequest {
    pub post_id: i64,
    pub dir: i64,
}

/// `dir` of a vote request: 1 casts a vote, 0 withdraws it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteDirection {
    Remove,
    Add,
}

impl TryFrom<i64> for VoteDirection {
    type Error = i64;

    fn try_from(dir: i64) -> Result<Self, Self::Error> {
        match dir {
            0 => Ok(VoteDirection::Remove),
            1 => Ok(VoteDirection::Add),
            other => Err(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    Added,
    Removed,
}

impl VoteOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            VoteOutcome::Added => "Successfully added vote",
            VoteOutcome::Removed => "Successfully deleted vote",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_accepts_only_zero_and_one() {
        assert_eq!(VoteDirection::try_from(1), Ok(VoteDirection::Add));
        assert_eq!(VoteDirection::try_from(0), Ok(VoteDirection::Remove));
        assert_eq!(VoteDirection::try_from(2), Err(2));
        assert_eq!(VoteDirection::try_from(-1), Err(-1));
    }
}
