use async_std::sync::RwLock;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::*;

use super::Store;
use crate::error::{Error, Result};
use crate::models::{Choice, InsertableQuestion, Question};

#[derive(Debug, Default)]
struct Tables {
    questions: Vec<Question>,
    choices: Vec<Choice>,
}

/**
 * Process-local store, ids are handed out from 1 like a SERIAL column
 */
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tables {
    fn insert_question(&mut self, question: InsertableQuestion) -> Question {
        let question = Question {
            id: self.questions.len() as i32 + 1,
            question_text: question.question_text,
            pub_date: question.pub_date,
        };
        self.questions.push(question.clone());
        question
    }

    fn insert_choice(&mut self, question_id: i32, choice_text: &str) -> Result<Choice> {
        if !self.questions.iter().any(|q| q.id == question_id) {
            return Err(Error::Validation(format!(
                "question {} does not exist",
                question_id
            )));
        }
        let choice = Choice {
            id: self.choices.len() as i32 + 1,
            question_id,
            choice_text: choice_text.to_string(),
            votes: 0,
        };
        self.choices.push(choice.clone());
        Ok(choice)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_question(&self, question: InsertableQuestion) -> Result<Question> {
        Ok(self.tables.write().await.insert_question(question))
    }

    async fn create_choice(&self, question_id: i32, choice_text: &str) -> Result<Choice> {
        self.tables.write().await.insert_choice(question_id, choice_text)
    }

    async fn create_question_with_choices(
        &self,
        question: InsertableQuestion,
        choice_texts: &[String],
    ) -> Result<(Question, Vec<Choice>)> {
        let mut tables = self.tables.write().await;
        let question = tables.insert_question(question);
        let choices = choice_texts
            .iter()
            .map(|text| tables.insert_choice(question.id, text))
            .collect::<Result<Vec<Choice>>>()?;
        Ok((question, choices))
    }

    async fn latest_questions(&self, now: DateTime<Utc>, limit: usize) -> Result<Vec<Question>> {
        let tables = self.tables.read().await;
        let mut visible: Vec<Question> = tables
            .questions
            .iter()
            .filter(|q| q.is_visible_at(now))
            .cloned()
            .collect();
        visible.sort_by(|a, b| b.pub_date.cmp(&a.pub_date).then(b.id.cmp(&a.id)));
        visible.truncate(limit);
        Ok(visible)
    }

    async fn published_question(&self, id: i32, now: DateTime<Utc>) -> Result<Option<Question>> {
        let tables = self.tables.read().await;
        Ok(tables
            .questions
            .iter()
            .find(|q| q.id == id && q.is_visible_at(now))
            .cloned())
    }

    async fn choices(&self, question_id: i32) -> Result<Vec<Choice>> {
        let tables = self.tables.read().await;
        Ok(tables
            .choices
            .iter()
            .filter(|c| c.question_id == question_id)
            .cloned()
            .collect())
    }

    async fn vote(&self, question_id: i32, choice_id: i32) -> Result<bool> {
        let mut tables = self.tables.write().await;
        match tables
            .choices
            .iter_mut()
            .find(|c| c.id == choice_id && c.question_id == question_id)
        {
            Some(choice) => {
                choice.votes += 1;
                debug!("Choice {} now has {} votes", choice.id, choice.votes);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
