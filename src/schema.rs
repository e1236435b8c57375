/*
 * DDL for the PostgreSQL store, applied one statement at a time on startup.
 * Every statement is idempotent.
 */
pub const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS questions (
        id SERIAL PRIMARY KEY,
        question_text VARCHAR(200) NOT NULL,
        pub_date TIMESTAMPTZ NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS choices (
        id SERIAL PRIMARY KEY,
        question_id INTEGER NOT NULL REFERENCES questions (id) ON DELETE CASCADE,
        choice_text VARCHAR(200) NOT NULL,
        votes INTEGER NOT NULL DEFAULT 0 CHECK (votes >= 0)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS questions_pub_date_idx ON questions (pub_date DESC)",
    "CREATE INDEX IF NOT EXISTS choices_question_id_idx ON choices (question_id)",
];
