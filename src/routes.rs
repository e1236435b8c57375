/*!
 * The routes module contains all the tide routes and the logic to fulfill the responses for each
 * route.
 *
 * Modules are nested for cleaner organization here
 */
use chrono::Utc;
use log::*;
use serde::Serialize;
use tide::http::mime;
use tide::{Request, Response, StatusCode};

use crate::models::Question;
use crate::AppState;

/**
 *  GET /
 */
pub async fn index(_req: Request<AppState>) -> tide::Result<Response> {
    Ok(tide::Redirect::new("/polls/").into())
}

/**
 * Send a GET for a page path without its trailing slash to the canonical URL
 */
pub async fn append_slash(req: Request<AppState>) -> tide::Result<Response> {
    let url = req.url();
    let location = match url.query() {
        Some(query) => format!("{}/?{}", url.path(), query),
        None => format!("{}/", url.path()),
    };
    debug!("Appending slash, redirecting to {}", location);
    Ok(tide::Redirect::permanent(location).into())
}

/**
 * Pull the numeric `:id` out of the path, anything else cannot name a question
 */
fn question_id(req: &Request<AppState>) -> tide::Result<i32> {
    req.param::<i32>("id").map_err(|_| not_found())
}

fn not_found() -> tide::Error {
    tide::Error::from_str(StatusCode::NotFound, "Question does not exist")
}

/**
 * Look up the question named in the request, hiding the ones not yet published
 */
async fn visible_question(req: &Request<AppState>) -> tide::Result<Question> {
    let id = question_id(req)?;
    debug!("Fetching question: {}", id);

    match req.state().store.published_question(id, Utc::now()).await? {
        Some(question) => Ok(question),
        None => {
            debug!("Question {} is missing or not yet published", id);
            Err(not_found())
        }
    }
}

fn render<T: Serialize>(
    req: &Request<AppState>,
    template: &str,
    context: &T,
    status: StatusCode,
) -> tide::Result<Response> {
    let html = req
        .state()
        .templates
        .render(template, context)
        .map_err(|err| {
            error!("Failed to render {}: {:?}", template, err);
            crate::error::Error::from(err)
        })?;

    Ok(Response::builder(status)
        .body(html)
        .content_type(mime::HTML)
        .build())
}

pub mod polls {
    use chrono::Utc;
    use log::*;
    use serde::Serialize;
    use tide::http::mime;
    use tide::{Request, Response, StatusCode};

    use super::{render, visible_question};
    use crate::api_models::VoteForm;
    use crate::dao::LATEST_LIMIT;
    use crate::models::{Choice, Question};
    use crate::AppState;

    #[derive(Serialize)]
    struct QuestionSummary {
        id: i32,
        question_text: String,
        recent: bool,
    }

    #[derive(Serialize)]
    struct IndexContext {
        latest_question_list: Vec<QuestionSummary>,
    }

    #[derive(Serialize)]
    struct DetailContext {
        question: Question,
        choices: Vec<Choice>,
        error_message: Option<&'static str>,
    }

    #[derive(Serialize)]
    struct Tally {
        choice_text: String,
        votes: i32,
        noun: &'static str,
    }

    #[derive(Serialize)]
    struct ResultsContext {
        question: Question,
        choices: Vec<Tally>,
    }

    /**
     *  GET /polls/
     */
    pub async fn index(req: Request<AppState>) -> tide::Result<Response> {
        let now = Utc::now();
        let latest = req.state().store.latest_questions(now, LATEST_LIMIT).await?;
        debug!("Listing {} questions", latest.len());

        let context = IndexContext {
            latest_question_list: latest
                .into_iter()
                .map(|q| QuestionSummary {
                    recent: q.was_published_recently_at(now),
                    id: q.id,
                    question_text: q.question_text,
                })
                .collect(),
        };
        render(&req, "index", &context, StatusCode::Ok)
    }

    /**
     *  GET /polls/:id/
     */
    pub async fn detail(req: Request<AppState>) -> tide::Result<Response> {
        let question = visible_question(&req).await?;
        let choices = req.state().store.choices(question.id).await?;

        let context = DetailContext {
            question,
            choices,
            error_message: None,
        };
        render(&req, "detail", &context, StatusCode::Ok)
    }

    /**
     *  GET /polls/:id/results/
     */
    pub async fn results(req: Request<AppState>) -> tide::Result<Response> {
        let question = visible_question(&req).await?;
        let choices = req
            .state()
            .store
            .choices(question.id)
            .await?
            .into_iter()
            .map(|c| Tally {
                noun: if c.votes == 1 { "vote" } else { "votes" },
                choice_text: c.choice_text,
                votes: c.votes,
            })
            .collect();

        render(&req, "results", &ResultsContext { question, choices }, StatusCode::Ok)
    }

    /**
     *  GET /polls/:id/vote/
     */
    pub async fn vote_page(req: Request<AppState>) -> tide::Result<Response> {
        let id = super::question_id(&req)?;
        Ok(Response::builder(StatusCode::Ok)
            .body(format!("You're on voting question {}.", id))
            .content_type(mime::PLAIN)
            .build())
    }

    /**
     *  POST /polls/:id/vote/
     */
    pub async fn vote(mut req: Request<AppState>) -> tide::Result<Response> {
        let question = visible_question(&req).await?;
        let body = req.body_string().await?;
        let form: VoteForm = serde_qs::from_str(&body).unwrap_or_default();

        let voted = match form.choice_id() {
            Some(choice_id) => req.state().store.vote(question.id, choice_id).await?,
            None => false,
        };

        if voted {
            info!("Vote recorded for question {}", question.id);
            return Ok(tide::Redirect::new(format!("/polls/{}/results/", question.id)).into());
        }

        warn!("Rejected ballot for question {}: {:?}", question.id, form);
        let choices = req.state().store.choices(question.id).await?;
        let context = DetailContext {
            question,
            choices,
            error_message: Some("You didn't select a choice."),
        };
        render(&req, "detail", &context, StatusCode::Ok)
    }
}

pub mod api {
    use chrono::Utc;
    use log::*;
    use tide::{Body, Request, Response, StatusCode};

    use super::visible_question;
    use crate::api_models::{QuestionCreateRequest, QuestionResponse};
    use crate::models::{validate_text, InsertableQuestion};
    use crate::AppState;

    fn validate(request: &QuestionCreateRequest) -> crate::error::Result<()> {
        validate_text("question", &request.question_text)?;
        for choice in request.choices.iter() {
            validate_text("choice", choice)?;
        }
        Ok(())
    }

    /**
     *  PUT /api/v1/questions
     */
    pub async fn create(mut req: Request<AppState>) -> tide::Result<Response> {
        let request = req.body_json::<QuestionCreateRequest>().await?;
        debug!("Question received: {:?}", request);

        if let Err(err) = validate(&request) {
            warn!("Refusing question: {}", err);
            return Ok(Response::builder(StatusCode::BadRequest)
                .body(err.to_string())
                .build());
        }

        let (question, choices) = req
            .state()
            .store
            .create_question_with_choices(
                InsertableQuestion::new(
                    request.question_text,
                    request.pub_date.unwrap_or_else(Utc::now),
                ),
                &request.choices,
            )
            .await?;

        Ok(Response::builder(StatusCode::Created)
            .body(Body::from_json(&QuestionResponse { question, choices })?)
            .build())
    }

    /**
     * GET /api/v1/questions/:id
     */
    pub async fn get(req: Request<AppState>) -> tide::Result<Body> {
        let question = visible_question(&req).await?;
        info!("Found question: {:?}", question);
        let choices = req.state().store.choices(question.id).await?;

        Body::from_json(&QuestionResponse { question, choices })
    }
}
