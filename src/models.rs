use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/**
 * Longest text accepted for a question or a choice, matching the column width
 */
pub const MAX_TEXT_LENGTH: usize = 200;

/**
 * A poll prompt, visible once its `pub_date` has passed
 */
#[derive(Clone, Debug, PartialEq, Serialize, sqlx::FromRow)]
pub struct Question {
    pub id: i32,
    pub question_text: String,
    pub pub_date: DateTime<Utc>,
}

impl Question {
    /**
     * True when the question went out within the last day, judged at `now`.
     *
     * The window is half-open: something published exactly 24 hours ago is
     * no longer recent, something published exactly at `now` is.
     */
    pub fn was_published_recently_at(&self, now: DateTime<Utc>) -> bool {
        now - Duration::days(1) < self.pub_date && self.pub_date <= now
    }

    pub fn was_published_recently(&self) -> bool {
        self.was_published_recently_at(Utc::now())
    }

    /**
     * Future questions exist but stay hidden from every view
     */
    pub fn is_visible_at(&self, now: DateTime<Utc>) -> bool {
        self.pub_date <= now
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, sqlx::FromRow)]
pub struct Choice {
    pub id: i32,
    pub question_id: i32,
    pub choice_text: String,
    pub votes: i32,
}

/**
 * Fields needed to insert a question
 */
#[derive(Clone, Debug, Deserialize)]
pub struct InsertableQuestion {
    pub question_text: String,
    pub pub_date: DateTime<Utc>,
}

impl InsertableQuestion {
    pub fn new(question_text: impl Into<String>, pub_date: DateTime<Utc>) -> Self {
        Self {
            question_text: question_text.into(),
            pub_date,
        }
    }
}

/**
 * Reject texts the database column would not hold
 */
pub fn validate_text(kind: &str, text: &str) -> crate::error::Result<()> {
    let len = text.chars().count();
    if len > MAX_TEXT_LENGTH {
        return Err(crate::error::Error::Validation(format!(
            "{} text must be at most {} characters, got {}",
            kind, MAX_TEXT_LENGTH, len
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question_at(pub_date: DateTime<Utc>) -> Question {
        Question {
            id: 1,
            question_text: "What's up?".to_string(),
            pub_date,
        }
    }

    #[test]
    fn test_recent_with_future_question() {
        let future = question_at(Utc::now() + Duration::days(30));
        assert!(!future.was_published_recently());
    }

    #[test]
    fn test_recent_with_old_question() {
        let old = question_at(Utc::now() - Duration::days(30));
        assert!(!old.was_published_recently());
    }

    #[test]
    fn test_recent_with_recent_question() {
        let recent = question_at(Utc::now() - Duration::hours(1));
        assert!(recent.was_published_recently());
    }

    #[test]
    fn test_recent_boundaries() {
        let now = Utc::now();

        assert!(!question_at(now - Duration::days(1)).was_published_recently_at(now));
        assert!(question_at(now - Duration::days(1) + Duration::seconds(1))
            .was_published_recently_at(now));
        assert!(question_at(now).was_published_recently_at(now));
        assert!(!question_at(now + Duration::seconds(1)).was_published_recently_at(now));
    }

    #[test]
    fn test_visibility() {
        let now = Utc::now();
        assert!(question_at(now).is_visible_at(now));
        assert!(question_at(now - Duration::days(30)).is_visible_at(now));
        assert!(!question_at(now + Duration::minutes(1)).is_visible_at(now));
    }

    #[test]
    fn test_validate_text() {
        assert!(validate_text("question", "").is_ok());
        assert!(validate_text("question", &"a".repeat(MAX_TEXT_LENGTH)).is_ok());
        match validate_text("choice", &"a".repeat(MAX_TEXT_LENGTH + 1)) {
            Err(crate::error::Error::Validation(message)) => assert!(message.starts_with("choice")),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
