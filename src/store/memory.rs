// src/store/memory.rs
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::models::{Choice, Question};
use crate::store::PollStore;

#[derive(Debug, Default)]
struct Tables {
    questions: Vec<Question>,
    choices: Vec<Choice>,
    last_question_id: i64,
    last_choice_id: i64,
}

/// In-process store. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PollStore for MemoryStore {
    async fn latest_questions(&self, now: DateTime<Utc>, limit: i64) -> Result<Vec<Question>, StoreError> {
        let tables = self.tables.read().await;

        let mut questions: Vec<Question> = tables
            .questions
            .iter()
            .filter(|q| q.is_published(now))
            .filter(|q| tables.choices.iter().any(|c| c.question_id == q.id))
            .cloned()
            .collect();

        questions.sort_by(|a, b| b.pub_date.cmp(&a.pub_date));
        questions.truncate(usize::try_from(limit).unwrap_or(0));

        Ok(questions)
    }

    async fn published_question(&self, id: i64, now: DateTime<Utc>) -> Result<Option<Question>, StoreError> {
        let tables = self.tables.read().await;

        Ok(tables
            .questions
            .iter()
            .find(|q| q.id == id && q.is_published(now))
            .cloned())
    }

    async fn choices(&self, question_id: i64) -> Result<Vec<Choice>, StoreError> {
        let tables = self.tables.read().await;

        Ok(tables
            .choices
            .iter()
            .filter(|c| c.question_id == question_id)
            .cloned()
            .collect())
    }

    async fn choice_of(&self, question_id: i64, choice_id: i64) -> Result<Option<Choice>, StoreError> {
        let tables = self.tables.read().await;

        Ok(tables
            .choices
            .iter()
            .find(|c| c.id == choice_id && c.question_id == question_id)
            .cloned())
    }

    async fn save_votes(&self, choice: &Choice) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;

        if let Some(stored) = tables.choices.iter_mut().find(|c| c.id == choice.id) {
            stored.votes = choice.votes;
        }

        Ok(())
    }

    async fn create_question(&self, question_text: &str, pub_date: DateTime<Utc>) -> Result<Question, StoreError> {
        let mut tables = self.tables.write().await;

        tables.last_question_id += 1;
        let question = Question {
            id: tables.last_question_id,
            question_text: question_text.to_owned(),
            pub_date,
        };
        tables.questions.push(question.clone());

        Ok(question)
    }

    async fn create_choice(&self, question_id: i64, choice_text: &str, votes: i32) -> Result<Choice, StoreError> {
        let mut tables = self.tables.write().await;

        if !tables.questions.iter().any(|q| q.id == question_id) {
            return Err(StoreError::MissingQuestion(question_id));
        }

        tables.last_choice_id += 1;
        let choice = Choice {
            id: tables.last_choice_id,
            question_id,
            choice_text: choice_text.to_owned(),
            votes,
        };
        tables.choices.push(choice.clone());

        Ok(choice)
    }

    async fn set_pub_date(&self, question_id: i64, pub_date: DateTime<Utc>) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;

        let question = tables
            .questions
            .iter_mut()
            .find(|q| q.id == question_id)
            .ok_or(StoreError::MissingQuestion(question_id))?;
        question.pub_date = pub_date;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;

    #[tokio::test]
    async fn latest_skips_future_and_choiceless_questions() {
        let store = MemoryStore::new();
        let now = Utc::now();

        let past = store.create_question("Past", now - TimeDelta::days(3)).await.unwrap();
        store.create_choice(past.id, "Yes", 0).await.unwrap();
        let future = store.create_question("Future", now + TimeDelta::days(3)).await.unwrap();
        store.create_choice(future.id, "Yes", 0).await.unwrap();
        store.create_question("Empty", now - TimeDelta::days(1)).await.unwrap();

        let latest = store.latest_questions(now, 5).await.unwrap();
        assert_eq!(latest, vec![past]);
    }

    #[tokio::test]
    async fn latest_is_newest_first_and_limited() {
        let store = MemoryStore::new();
        let now = Utc::now();

        for days in 1..=7 {
            let q = store
                .create_question(&format!("{days} days ago"), now - TimeDelta::days(days))
                .await
                .unwrap();
            store.create_choice(q.id, "Yes", 0).await.unwrap();
        }

        let texts: Vec<String> = store
            .latest_questions(now, 5)
            .await
            .unwrap()
            .into_iter()
            .map(|q| q.question_text)
            .collect();
        assert_eq!(
            texts,
            ["1 days ago", "2 days ago", "3 days ago", "4 days ago", "5 days ago"]
        );
    }

    #[tokio::test]
    async fn choice_of_checks_owner() {
        let store = MemoryStore::new();
        let now = Utc::now();

        let uk = store.create_question("Capital of UK", now).await.unwrap();
        let fr = store.create_question("Capital of France", now).await.unwrap();
        let london = store.create_choice(uk.id, "London", 3).await.unwrap();

        assert_eq!(store.choice_of(uk.id, london.id).await.unwrap(), Some(london.clone()));
        assert_eq!(store.choice_of(fr.id, london.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn create_choice_needs_question() {
        let store = MemoryStore::new();
        let err = store.create_choice(42, "Orphan", 0).await.unwrap_err();
        assert!(matches!(err, StoreError::MissingQuestion(42)));
    }

    #[tokio::test]
    async fn set_pub_date_unknown_question() {
        let store = MemoryStore::new();
        let err = store.set_pub_date(9, Utc::now()).await.unwrap_err();
        assert!(matches!(err, StoreError::MissingQuestion(9)));
    }
}
