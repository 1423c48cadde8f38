// src/store.rs
//! Persistence for questions and choices.
//!
//! Handlers only ever talk to a [`PollStore`]. [`PgStore`] is the production
//! backend; [`MemoryStore`] keeps everything in process and backs the tests and
//! database-less runs.

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::models::{Choice, Question};

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::{PgStore, create_pool};

pub trait PollStore: Send + Sync + 'static {
    /// Published questions that have at least one choice, newest first.
    fn latest_questions(
        &self,
        now: DateTime<Utc>,
        limit: i64,
    ) -> impl Future<Output = Result<Vec<Question>, StoreError>> + Send;

    /// The question with `id`, provided `pub_date <= now`.
    fn published_question(
        &self,
        id: i64,
        now: DateTime<Utc>,
    ) -> impl Future<Output = Result<Option<Question>, StoreError>> + Send;

    /// All choices of a question, in creation order.
    fn choices(
        &self,
        question_id: i64,
    ) -> impl Future<Output = Result<Vec<Choice>, StoreError>> + Send;

    /// The choice `choice_id`, only if it belongs to `question_id`.
    fn choice_of(
        &self,
        question_id: i64,
        choice_id: i64,
    ) -> impl Future<Output = Result<Option<Choice>, StoreError>> + Send;

    /// Overwrites the stored vote count with `choice.votes`.
    ///
    /// This is a plain write of a value computed by the caller; two requests
    /// that read the same count will both write `count + 1`.
    fn save_votes(&self, choice: &Choice) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn create_question(
        &self,
        question_text: &str,
        pub_date: DateTime<Utc>,
    ) -> impl Future<Output = Result<Question, StoreError>> + Send;

    fn create_choice(
        &self,
        question_id: i64,
        choice_text: &str,
        votes: i32,
    ) -> impl Future<Output = Result<Choice, StoreError>> + Send;

    fn set_pub_date(
        &self,
        question_id: i64,
        pub_date: DateTime<Utc>,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}
