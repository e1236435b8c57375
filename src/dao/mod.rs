/*!
 * The dao module holds everything that touches stored questions and choices
 *
 * Route handlers only see the `Store` trait, which lets the server run against
 * PostgreSQL in deployment and against the in-memory tables when no database
 * is configured (and in tests).
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{Choice, InsertableQuestion, Question};

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/**
 * Number of questions shown on the index page
 */
pub const LATEST_LIMIT: usize = 5;

#[async_trait]
pub trait Store: Send + Sync {
    async fn create_question(&self, question: InsertableQuestion) -> Result<Question>;

    async fn create_choice(&self, question_id: i32, choice_text: &str) -> Result<Choice>;

    /**
     * Insert a question and all of its choices, or nothing at all
     */
    async fn create_question_with_choices(
        &self,
        question: InsertableQuestion,
        choice_texts: &[String],
    ) -> Result<(Question, Vec<Choice>)>;

    /**
     * Questions visible at `now`, newest first, at most `limit` of them
     */
    async fn latest_questions(&self, now: DateTime<Utc>, limit: usize) -> Result<Vec<Question>>;

    /**
     * Look up a question, treating one that is not yet published as missing
     */
    async fn published_question(&self, id: i32, now: DateTime<Utc>) -> Result<Option<Question>>;

    /**
     * Choices of a question in insertion order
     */
    async fn choices(&self, question_id: i32) -> Result<Vec<Choice>>;

    /**
     * Add one vote to `choice_id`, returning false if that choice does not
     * belong to `question_id`
     */
    async fn vote(&self, question_id: i32, choice_id: i32) -> Result<bool>;
}
