use thiserror::Error;

/**
 * Everything that can go wrong below the route handlers
 *
 * Handlers let these bubble up through `?`, which tide turns into a 500,
 * except for `Validation` which the JSON API reports as a 400.
 */
#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("failed to load templates: {0}")]
    TemplateLoad(#[from] handlebars::TemplateFileError),

    #[error("failed to render template: {0}")]
    Render(#[from] handlebars::RenderError),

    #[error("invalid configuration for {key}: {message}")]
    Config { key: &'static str, message: String },

    #[error("{0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, Error>;
