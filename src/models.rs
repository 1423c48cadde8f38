// models.rs
use chrono::{DateTime, TimeDelta, Utc};
use serde::Deserialize;

use crate::error::StoreError;

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Question {
    pub id: i64,
    pub question_text: String,
    pub pub_date: DateTime<Utc>,
}

impl Question {
    /// Published within the last day, and not scheduled for later.
    pub fn was_published_recently(&self, now: DateTime<Utc>) -> bool {
        now - TimeDelta::days(1) <= self.pub_date && self.pub_date <= now
    }

    pub fn is_published(&self, now: DateTime<Utc>) -> bool {
        self.pub_date <= now
    }
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Choice {
    pub id: i64,
    pub question_id: i64,
    pub choice_text: String,
    pub votes: i32,
}

impl Choice {
    /// Bumps the in-memory count by one. The caller persists it with
    /// [`PollStore::save_votes`](crate::store::PollStore::save_votes).
    ///
    /// A count already at `i32::MAX` is left alone and reported.
    pub fn record_vote(&mut self) -> Result<(), StoreError> {
        self.votes = self.votes.checked_add(1).ok_or(StoreError::VoteOverflow(self.id))?;
        Ok(())
    }
}

/// Form body of `POST /vote/{question_id}`.
#[derive(Debug, Default, Deserialize)]
pub struct VoteForm {
    pub choice: Option<String>,
}

impl VoteForm {
    /// The submitted choice id, if present and numeric.
    pub fn choice_id(&self) -> Option<i64> {
        self.choice.as_deref()?.trim().parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question_at(pub_date: DateTime<Utc>) -> Question {
        Question {
            id: 1,
            question_text: "Capital of UK".into(),
            pub_date,
        }
    }

    #[test]
    fn future_question_is_not_recent() {
        let now = Utc::now();
        let question = question_at(now + TimeDelta::days(30));
        assert!(!question.was_published_recently(now));
        assert!(!question.is_published(now));
    }

    #[test]
    fn old_question_is_not_recent() {
        let now = Utc::now();
        let question = question_at(now - TimeDelta::days(1) - TimeDelta::seconds(1));
        assert!(!question.was_published_recently(now));
        assert!(question.is_published(now));
    }

    #[test]
    fn recent_question_is_recent() {
        let now = Utc::now();
        let question = question_at(now - TimeDelta::hours(23) - TimeDelta::minutes(59) - TimeDelta::seconds(59));
        assert!(question.was_published_recently(now));
    }

    #[test]
    fn record_vote_adds_one() {
        let mut choice = Choice {
            id: 7,
            question_id: 1,
            choice_text: "London".into(),
            votes: 3,
        };
        choice.record_vote().unwrap();
        assert_eq!(choice.votes, 4);
    }

    #[test]
    fn record_vote_at_the_cap_fails() {
        let mut choice = Choice {
            id: 7,
            question_id: 1,
            choice_text: "London".into(),
            votes: i32::MAX,
        };
        let err = choice.record_vote().unwrap_err();
        assert!(matches!(err, StoreError::VoteOverflow(7)));
        assert_eq!(choice.votes, i32::MAX);
    }

    #[test]
    fn vote_form_choice_id() {
        let form = |choice: Option<&str>| VoteForm {
            choice: choice.map(str::to_owned),
        };
        assert_eq!(form(Some("12")).choice_id(), Some(12));
        assert_eq!(form(Some(" 3 ")).choice_id(), Some(3));
        assert_eq!(form(Some("london")).choice_id(), None);
        assert_eq!(form(Some("")).choice_id(), None);
        assert_eq!(form(None).choice_id(), None);
    }
}
