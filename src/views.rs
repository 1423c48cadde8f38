// src/views.rs
//! HTML pages, rendered from `templates/poll/`.

use askama::Template;
use chrono::{DateTime, Utc};

use crate::models::Question;
use crate::poll::QuestionPage;

pub struct IndexEntry<'a> {
    pub question: &'a Question,
    pub recent: bool,
}

#[derive(Template)]
#[template(path = "poll/index.html")]
pub struct IndexTemplate<'a> {
    pub mount: &'a str,
    pub questions: Vec<IndexEntry<'a>>,
}

#[derive(Template)]
#[template(path = "poll/detail.html")]
pub struct DetailTemplate<'a> {
    pub mount: &'a str,
    pub page: &'a QuestionPage,
}

#[derive(Template)]
#[template(path = "poll/results.html")]
pub struct ResultsTemplate<'a> {
    pub mount: &'a str,
    pub page: &'a QuestionPage,
}

#[derive(Template)]
#[template(path = "poll/not_found.html")]
pub struct NotFoundTemplate<'a> {
    pub message: &'a str,
}

#[derive(Template)]
#[template(path = "poll/server_error.html")]
pub struct ServerErrorTemplate;

pub fn index(mount: &str, questions: &[Question], now: DateTime<Utc>) -> askama::Result<String> {
    let questions = questions
        .iter()
        .map(|question| IndexEntry {
            question,
            recent: question.was_published_recently(now),
        })
        .collect();

    IndexTemplate { mount, questions }.render()
}

pub fn detail(mount: &str, page: &QuestionPage) -> askama::Result<String> {
    DetailTemplate { mount, page }.render()
}

pub fn results(mount: &str, page: &QuestionPage) -> askama::Result<String> {
    ResultsTemplate { mount, page }.render()
}

pub fn not_found(message: &str) -> askama::Result<String> {
    NotFoundTemplate { message }.render()
}

pub fn server_error() -> askama::Result<String> {
    ServerErrorTemplate.render()
}
