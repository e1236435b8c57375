use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Choice, Question};

/**
 * A question together with its choices, as returned by the JSON API
 */
#[derive(Debug, Serialize)]
pub struct QuestionResponse {
    pub question: Question,
    pub choices: Vec<Choice>,
}

/**
 * User-provided details to create a question
 */
#[derive(Debug, Deserialize)]
pub struct QuestionCreateRequest {
    pub question_text: String,
    /**
     * Defaults to the time of the request, i.e. published immediately
     */
    #[serde(default)]
    pub pub_date: Option<DateTime<Utc>>,
    /**
     * Just the text of each choice
     */
    #[serde(default)]
    pub choices: Vec<String>,
}

/**
 * Form posted by the vote page
 *
 * `choice` stays a string so that garbage input can be answered with the
 * detail page instead of a bare 400
 */
#[derive(Debug, Default, Deserialize)]
pub struct VoteForm {
    pub choice: Option<String>,
}

impl VoteForm {
    pub fn choice_id(&self) -> Option<i32> {
        self.choice.as_ref().and_then(|c| c.trim().parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_defaults() {
        let req: QuestionCreateRequest =
            serde_json::from_value(serde_json::json!({"question_text": "What's new?"})).unwrap();
        assert_eq!(req.question_text, "What's new?");
        assert!(req.pub_date.is_none());
        assert!(req.choices.is_empty());
    }

    #[test]
    fn test_create_request_with_pub_date() {
        let req: QuestionCreateRequest = serde_json::from_value(serde_json::json!({
            "question_text": "Later?",
            "pub_date": "2030-01-01T12:00:00Z",
            "choices": ["Yes", "No"],
        }))
        .unwrap();
        assert_eq!(req.pub_date.unwrap().to_rfc3339(), "2030-01-01T12:00:00+00:00");
        assert_eq!(req.choices, vec!["Yes", "No"]);
    }

    #[test]
    fn test_vote_form() {
        let form: VoteForm = serde_qs::from_str("choice=3").unwrap();
        assert_eq!(form.choice_id(), Some(3));

        let form: VoteForm = serde_qs::from_str("choice=three").unwrap();
        assert_eq!(form.choice_id(), None);

        let form: VoteForm = serde_qs::from_str("").unwrap();
        assert_eq!(form.choice_id(), None);
    }
}
