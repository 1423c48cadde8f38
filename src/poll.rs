// src/poll.rs
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::error::AppError;
use crate::models::{Choice, Question, VoteForm};
use crate::store::PollStore;

/// Size of the index page.
pub const LATEST_QUESTIONS: i64 = 5;

pub const NO_CHOICE_SELECTED: &str = "You didn't select a choice.";

/// A question together with its choices, as shown on the detail and result pages.
#[derive(Debug, Clone)]
pub struct QuestionPage {
    pub question: Question,
    pub choices: Vec<Choice>,
    pub error_message: Option<&'static str>,
}

#[derive(Debug)]
pub enum VoteOutcome {
    /// The vote was stored; the client goes on to the results of this question.
    Recorded { question_id: i64 },
    /// Nothing was stored; the detail page is shown again.
    Rejected(QuestionPage),
}

pub async fn latest<S: PollStore>(store: &S, now: DateTime<Utc>) -> Result<Vec<Question>, AppError> {
    Ok(store.latest_questions(now, LATEST_QUESTIONS).await?)
}

/// Published questions only. Unlike [`latest`], zero choices is fine here.
pub async fn detail<S: PollStore>(store: &S, question_id: i64, now: DateTime<Utc>) -> Result<QuestionPage, AppError> {
    page(store, question_id, now, "Question does not exist").await
}

/// Same visibility as [`detail`]: a question scheduled for later has no results yet.
pub async fn results<S: PollStore>(store: &S, question_id: i64, now: DateTime<Utc>) -> Result<QuestionPage, AppError> {
    page(store, question_id, now, "Result does not exist").await
}

pub async fn vote<S: PollStore>(
    store: &S,
    question_id: i64,
    form: &VoteForm,
    now: DateTime<Utc>,
) -> Result<VoteOutcome, AppError> {
    let question = store
        .published_question(question_id, now)
        .await?
        .ok_or(AppError::NotFound("Question does not exist"))?;

    let selected = match form.choice_id() {
        Some(choice_id) => store.choice_of(question.id, choice_id).await?,
        None => None,
    };

    let Some(mut choice) = selected else {
        debug!("Rejected vote on question {question_id}: choice {:?}", form.choice);
        let choices = store.choices(question.id).await?;
        return Ok(VoteOutcome::Rejected(QuestionPage {
            question,
            choices,
            error_message: Some(NO_CHOICE_SELECTED),
        }));
    };

    choice.record_vote()?;
    store.save_votes(&choice).await?;
    info!("Vote recorded for choice {} of question {}", choice.id, question.id);

    Ok(VoteOutcome::Recorded { question_id: question.id })
}

async fn page<S: PollStore>(
    store: &S,
    question_id: i64,
    now: DateTime<Utc>,
    missing: &'static str,
) -> Result<QuestionPage, AppError> {
    let question = store
        .published_question(question_id, now)
        .await?
        .ok_or(AppError::NotFound(missing))?;
    let choices = store.choices(question.id).await?;

    Ok(QuestionPage {
        question,
        choices,
        error_message: None,
    })
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;
    use crate::error::StoreError;
    use crate::store::MemoryStore;

    async fn capital_of_uk(store: &MemoryStore, days: i64) -> (Question, Vec<Choice>) {
        let question = store
            .create_question("Capital of UK", Utc::now() + TimeDelta::days(days))
            .await
            .unwrap();
        let mut choices = Vec::new();
        for (text, votes) in [("London", 3), ("Berlin", 1), ("Paris", 0)] {
            choices.push(store.create_choice(question.id, text, votes).await.unwrap());
        }
        (question, choices)
    }

    fn form(choice: &str) -> VoteForm {
        VoteForm {
            choice: Some(choice.to_owned()),
        }
    }

    #[tokio::test]
    async fn detail_of_published_question_without_choices() {
        let store = MemoryStore::new();
        let question = store
            .create_question("No choice question.", Utc::now() - TimeDelta::days(30))
            .await
            .unwrap();

        let page = detail(&store, question.id, Utc::now()).await.unwrap();
        assert_eq!(page.question, question);
        assert!(page.choices.is_empty());
        assert!(latest(&store, Utc::now()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn future_question_is_hidden_everywhere() {
        let store = MemoryStore::new();
        let (question, choices) = capital_of_uk(&store, 1).await;
        let now = Utc::now();

        assert!(latest(&store, now).await.unwrap().is_empty());
        assert!(matches!(detail(&store, question.id, now).await, Err(AppError::NotFound(_))));
        assert!(matches!(results(&store, question.id, now).await, Err(AppError::NotFound(_))));
        assert!(matches!(
            vote(&store, question.id, &form(&choices[0].id.to_string()), now).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn vote_increments_only_the_selected_choice() {
        let store = MemoryStore::new();
        let (question, choices) = capital_of_uk(&store, -1).await;

        let outcome = vote(&store, question.id, &form(&choices[1].id.to_string()), Utc::now())
            .await
            .unwrap();
        assert!(matches!(outcome, VoteOutcome::Recorded { question_id } if question_id == question.id));

        let votes: Vec<i32> = store
            .choices(question.id)
            .await
            .unwrap()
            .iter()
            .map(|c| c.votes)
            .collect();
        assert_eq!(votes, [3, 2, 0]);
    }

    #[tokio::test]
    async fn vote_with_bad_choice_is_rejected() {
        let store = MemoryStore::new();
        let (question, _) = capital_of_uk(&store, -1).await;
        let (other, other_choices) = capital_of_uk(&store, -2).await;
        assert_ne!(question.id, other.id);

        let forms = [
            VoteForm::default(),
            form("not-a-number"),
            form("9999"),
            form(&other_choices[0].id.to_string()),
        ];
        for submitted in &forms {
            match vote(&store, question.id, submitted, Utc::now()).await.unwrap() {
                VoteOutcome::Rejected(page) => {
                    assert_eq!(page.question, question);
                    assert_eq!(page.error_message, Some(NO_CHOICE_SELECTED));
                    assert_eq!(page.choices.len(), 3);
                }
                outcome => panic!("expected a rejected vote, got {outcome:?}"),
            }
        }

        let untouched: Vec<i32> = store
            .choices(other.id)
            .await
            .unwrap()
            .iter()
            .map(|c| c.votes)
            .collect();
        assert_eq!(untouched, [3, 1, 0]);
    }

    #[tokio::test]
    async fn vote_past_the_cap_is_an_error() {
        let store = MemoryStore::new();
        let question = store
            .create_question("Capital of UK", Utc::now() - TimeDelta::days(1))
            .await
            .unwrap();
        let full = store.create_choice(question.id, "London", i32::MAX).await.unwrap();

        let result = vote(&store, question.id, &form(&full.id.to_string()), Utc::now()).await;
        assert!(matches!(result, Err(AppError::Store(StoreError::VoteOverflow(id))) if id == full.id));
        assert_eq!(store.choices(question.id).await.unwrap()[0].votes, i32::MAX);
    }
}
