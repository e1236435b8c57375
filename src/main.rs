use std::path::Path;
use std::sync::Arc;

use handlebars::Handlebars;
use log::*;

mod api_models;
mod config;
mod dao;
mod error;
mod models;
mod routes;
mod schema;

use dao::{MemoryStore, PgStore, Store};

/**
 * Struct for carrying application state into tide request handlers
 */
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub templates: Arc<Handlebars<'static>>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, templates: Handlebars<'static>) -> Self {
        Self {
            store,
            templates: Arc::new(templates),
        }
    }
}

/**
 * Load every `*.hbs` file under `dir`, named by its path without the extension
 *
 * Output is escaped with html-escape rather than the handlebars default so that
 * quotes and slashes in question text are neutralized too.
 */
pub fn load_templates<P: AsRef<Path>>(dir: P) -> error::Result<Handlebars<'static>> {
    let mut hb = Handlebars::new();
    hb.register_escape_fn(|s| html_escape::encode_safe(s).into_owned());
    hb.register_templates_directory(".hbs", dir.as_ref())?;
    debug!("Loaded templates from {}", dir.as_ref().display());
    Ok(hb)
}

/**
 * Wire the routes up to a tide server
 */
pub fn build_app(state: AppState) -> tide::Server<AppState> {
    let mut app = tide::with_state(state);
    app.with(driftwood::ApacheCombinedLogger);

    app.at("/").get(routes::index);
    for path in &["/polls", "/polls/:id", "/polls/:id/results", "/polls/:id/vote"] {
        app.at(path).get(routes::append_slash);
    }
    app.at("/polls/").get(routes::polls::index);
    app.at("/polls/:id/").get(routes::polls::detail);
    app.at("/polls/:id/results/").get(routes::polls::results);
    app.at("/polls/:id/vote/")
        .get(routes::polls::vote_page)
        .post(routes::polls::vote);
    app.at("/api/v1/questions").put(routes::api::create);
    app.at("/api/v1/questions/:id").get(routes::api::get);
    app
}

async fn create_store(settings: &config::Settings) -> error::Result<Arc<dyn Store>> {
    match &settings.database_url {
        Some(url) => {
            let store = PgStore::connect(url, settings.max_connections).await?;
            info!("Connected to PostgreSQL");
            Ok(Arc::new(store))
        }
        None => {
            warn!("DATABASE_URL is not set, questions will only live in memory");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

#[async_std::main]
async fn main() -> Result<(), std::io::Error> {
    pretty_env_logger::init();

    let settings = config::Settings::from_env().map_err(|err| {
        error!("Could not read configuration! {:?}", err);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, err)
    })?;

    let templates = load_templates(&settings.templates_dir).map_err(|err| {
        error!("Could not load templates! {:?}", err);
        std::io::Error::new(std::io::ErrorKind::NotFound, err)
    })?;

    match create_store(&settings).await {
        Ok(store) => {
            let app = build_app(AppState::new(store, templates));
            info!("Listening on {}", settings.listen_addr);
            app.listen(settings.listen_addr.clone()).await?;
            Ok(())
        }
        Err(err) => {
            error!("Could not initialize store! {:?}", err);
            Err(std::io::Error::new(std::io::ErrorKind::Other, err))
        }
    }
}
