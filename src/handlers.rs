// handlers.rs
use std::sync::Arc;

use axum::{
    extract::{rejection::FormRejection, Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use chrono::Utc;
use tracing::debug;

use crate::error::AppError;
use crate::models::VoteForm;
use crate::poll::{self, VoteOutcome};
use crate::store::PollStore;
use crate::views;

pub struct AppState<S> {
    pub store: Arc<S>,
    /// Prefix of every link and redirect, `""` at the root.
    pub mount: Arc<str>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            mount: Arc::clone(&self.mount),
        }
    }
}

/// Latest published questions
pub async fn index<S: PollStore>(State(state): State<AppState<S>>) -> Result<Html<String>, AppError> {
    let now = Utc::now();
    let questions = poll::latest(state.store.as_ref(), now).await?;

    Ok(Html(views::index(&state.mount, &questions, now)?))
}

/// Question text and the voting form
pub async fn detail<S: PollStore>(
    State(state): State<AppState<S>>,
    Path(question_id): Path<i64>,
) -> Result<Html<String>, AppError> {
    let page = poll::detail(state.store.as_ref(), question_id, Utc::now()).await?;

    Ok(Html(views::detail(&state.mount, &page)?))
}

/// Vote counts of every choice
pub async fn result<S: PollStore>(
    State(state): State<AppState<S>>,
    Path(question_id): Path<i64>,
) -> Result<Html<String>, AppError> {
    let page = poll::results(state.store.as_ref(), question_id, Utc::now()).await?;

    Ok(Html(views::results(&state.mount, &page)?))
}

/// Vote for a choice, then show the results.
///
/// A body that is not a readable vote form counts as no choice at all.
pub async fn vote<S: PollStore>(
    State(state): State<AppState<S>>,
    Path(question_id): Path<i64>,
    form: Result<Form<VoteForm>, FormRejection>,
) -> Result<Response, AppError> {
    let form = form.map(|Form(form)| form).unwrap_or_else(|rejection| {
        debug!("Unreadable vote form for question {question_id}: {rejection}");
        VoteForm::default()
    });

    match poll::vote(state.store.as_ref(), question_id, &form, Utc::now()).await? {
        VoteOutcome::Recorded { question_id } => {
            let location = format!("{}/result/{question_id}", state.mount);
            Ok(Redirect::to(&location).into_response())
        }
        VoteOutcome::Rejected(page) => Ok(Html(views::detail(&state.mount, &page)?).into_response()),
    }
}
