use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::*;
use sqlx::postgres::{PgPool, PgPoolOptions};

use super::Store;
use crate::error::Result;
use crate::models::{Choice, InsertableQuestion, Question};

#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /**
     * Create the sqlx connection pool for postgresql and make sure the tables exist
     */
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<()> {
        for statement in crate::schema::STATEMENTS {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        debug!("Schema is in place");
        Ok(())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn create_question(&self, question: InsertableQuestion) -> Result<Question> {
        let question = sqlx::query_as::<_, Question>(
            "INSERT INTO questions (question_text, pub_date) VALUES ($1, $2)
             RETURNING id, question_text, pub_date",
        )
        .bind(&question.question_text)
        .bind(question.pub_date)
        .fetch_one(&self.pool)
        .await?;

        info!("Inserted question: {:?}", question);
        Ok(question)
    }

    async fn create_choice(&self, question_id: i32, choice_text: &str) -> Result<Choice> {
        let choice = sqlx::query_as::<_, Choice>(
            "INSERT INTO choices (question_id, choice_text) VALUES ($1, $2)
             RETURNING id, question_id, choice_text, votes",
        )
        .bind(question_id)
        .bind(choice_text)
        .fetch_one(&self.pool)
        .await?;

        info!("Inserted choice: {:?}", choice);
        Ok(choice)
    }

    async fn create_question_with_choices(
        &self,
        question: InsertableQuestion,
        choice_texts: &[String],
    ) -> Result<(Question, Vec<Choice>)> {
        let mut tx = self.pool.begin().await?;

        let question = sqlx::query_as::<_, Question>(
            "INSERT INTO questions (question_text, pub_date) VALUES ($1, $2)
             RETURNING id, question_text, pub_date",
        )
        .bind(&question.question_text)
        .bind(question.pub_date)
        .fetch_one(&mut tx)
        .await?;

        let mut choices = Vec::with_capacity(choice_texts.len());
        for text in choice_texts.iter() {
            // Dropping `tx` on an early return rolls the question back
            let choice = sqlx::query_as::<_, Choice>(
                "INSERT INTO choices (question_id, choice_text) VALUES ($1, $2)
                 RETURNING id, question_id, choice_text, votes",
            )
            .bind(question.id)
            .bind(text)
            .fetch_one(&mut tx)
            .await?;
            choices.push(choice);
        }

        tx.commit().await?;
        info!("Inserted question {:?} with {} choices", question, choices.len());
        Ok((question, choices))
    }

    async fn latest_questions(&self, now: DateTime<Utc>, limit: usize) -> Result<Vec<Question>> {
        let questions = sqlx::query_as::<_, Question>(
            "SELECT id, question_text, pub_date FROM questions
             WHERE pub_date <= $1
             ORDER BY pub_date DESC, id DESC
             LIMIT $2",
        )
        .bind(now)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;
        Ok(questions)
    }

    async fn published_question(&self, id: i32, now: DateTime<Utc>) -> Result<Option<Question>> {
        let question = sqlx::query_as::<_, Question>(
            "SELECT id, question_text, pub_date FROM questions
             WHERE id = $1 AND pub_date <= $2",
        )
        .bind(id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;
        Ok(question)
    }

    async fn choices(&self, question_id: i32) -> Result<Vec<Choice>> {
        let choices = sqlx::query_as::<_, Choice>(
            "SELECT id, question_id, choice_text, votes FROM choices
             WHERE question_id = $1 ORDER BY id ASC",
        )
        .bind(question_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(choices)
    }

    async fn vote(&self, question_id: i32, choice_id: i32) -> Result<bool> {
        let done = sqlx::query(
            "UPDATE choices SET votes = votes + 1 WHERE id = $1 AND question_id = $2",
        )
        .bind(choice_id)
        .bind(question_id)
        .execute(&self.pool)
        .await?;

        Ok(done.rows_affected() == 1)
    }
}
