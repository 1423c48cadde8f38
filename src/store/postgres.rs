// src/store/postgres.rs
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};

use crate::error::StoreError;
use crate::models::{Choice, Question};
use crate::store::PollStore;

pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<Pool<Postgres>, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: Pool<Postgres>,
}

impl PgStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

impl PollStore for PgStore {
    async fn latest_questions(&self, now: DateTime<Utc>, limit: i64) -> Result<Vec<Question>, StoreError> {
        let questions = sqlx::query_as::<_, Question>(
            r#"
            SELECT q.id, q.question_text, q.pub_date
            FROM questions q
            WHERE q.pub_date <= $1
              AND EXISTS (SELECT 1 FROM choices c WHERE c.question_id = q.id)
            ORDER BY q.pub_date DESC
            LIMIT $2
            "#,
        )
        .bind(now)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(questions)
    }

    async fn published_question(&self, id: i64, now: DateTime<Utc>) -> Result<Option<Question>, StoreError> {
        let question = sqlx::query_as::<_, Question>(
            "SELECT id, question_text, pub_date FROM questions WHERE id = $1 AND pub_date <= $2",
        )
        .bind(id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(question)
    }

    async fn choices(&self, question_id: i64) -> Result<Vec<Choice>, StoreError> {
        let choices = sqlx::query_as::<_, Choice>(
            "SELECT id, question_id, choice_text, votes FROM choices WHERE question_id = $1 ORDER BY id",
        )
        .bind(question_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(choices)
    }

    async fn choice_of(&self, question_id: i64, choice_id: i64) -> Result<Option<Choice>, StoreError> {
        let choice = sqlx::query_as::<_, Choice>(
            "SELECT id, question_id, choice_text, votes FROM choices WHERE id = $1 AND question_id = $2",
        )
        .bind(choice_id)
        .bind(question_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(choice)
    }

    async fn save_votes(&self, choice: &Choice) -> Result<(), StoreError> {
        sqlx::query("UPDATE choices SET votes = $1 WHERE id = $2")
            .bind(choice.votes)
            .bind(choice.id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn create_question(&self, question_text: &str, pub_date: DateTime<Utc>) -> Result<Question, StoreError> {
        let question = sqlx::query_as::<_, Question>(
            "INSERT INTO questions (question_text, pub_date) VALUES ($1, $2) RETURNING id, question_text, pub_date",
        )
        .bind(question_text)
        .bind(pub_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(question)
    }

    async fn create_choice(&self, question_id: i64, choice_text: &str, votes: i32) -> Result<Choice, StoreError> {
        let choice = sqlx::query_as::<_, Choice>(
            r#"
            INSERT INTO choices (question_id, choice_text, votes)
            VALUES ($1, $2, $3)
            RETURNING id, question_id, choice_text, votes
            "#,
        )
        .bind(question_id)
        .bind(choice_text)
        .bind(votes)
        .fetch_one(&self.pool)
        .await?;

        Ok(choice)
    }

    async fn set_pub_date(&self, question_id: i64, pub_date: DateTime<Utc>) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE questions SET pub_date = $1 WHERE id = $2")
            .bind(pub_date)
            .bind(question_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::MissingQuestion(question_id));
        }

        Ok(())
    }
}
