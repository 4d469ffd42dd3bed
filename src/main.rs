//! Stack Sherpa server entry point.

use std::error::Error;
use std::path::Path;
use std::sync::Arc;

use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use tracing_subscriber::EnvFilter;

use stack_sherpa::adapters::ai::{OpenAiClient, OpenAiConfig};
use stack_sherpa::adapters::checklist::load_catalog_from_csv;
use stack_sherpa::adapters::http::{app, AdvisoryAppState};
use stack_sherpa::adapters::persistence::{InMemorySessionStore, PostgresSessionStore};
use stack_sherpa::adapters::retrieval::{EmbeddedIndex, NoopRetriever};
use stack_sherpa::application::{AdvisoryService, PromptSet};
use stack_sherpa::config::AppConfig;
use stack_sherpa::ports::{KnowledgeRetriever, SessionStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config);

    let catalog = Arc::new(load_catalog_from_csv(&config.checklist.questions_path)?);
    info!(
        questions = catalog.len(),
        pillars = catalog.pillar_order().len(),
        "checklist catalog loaded"
    );

    let api_key = config
        .ai
        .openai_api_key
        .as_ref()
        .map(|k| k.expose_secret().clone())
        .unwrap_or_default();
    let client = Arc::new(OpenAiClient::new(
        OpenAiConfig::new(api_key)
            .with_model(config.ai.model.clone())
            .with_embedding_model(config.ai.embedding_model.clone())
            .with_base_url(config.ai.base_url.clone())
            .with_timeout(config.ai.timeout()),
    )?);

    let retriever: Arc<dyn KnowledgeRetriever> = match &config.retrieval.index_path {
        Some(path) => {
            let index = EmbeddedIndex::load(path, client.clone())?;
            info!(path = %path.display(), "knowledge index loaded");
            Arc::new(index)
        }
        None => {
            info!("no knowledge index configured, generation runs ungrounded");
            Arc::new(NoopRetriever)
        }
    };

    let store: Arc<dyn SessionStore> = match &config.database {
        Some(database) => {
            let pool = PgPoolOptions::new()
                .min_connections(database.min_connections)
                .max_connections(database.max_connections)
                .acquire_timeout(database.acquire_timeout())
                .connect(&database.url)
                .await?;
            sqlx::migrate!("./migrations").run(&pool).await?;
            info!("connected to postgres session store");
            Arc::new(PostgresSessionStore::new(pool))
        }
        None => {
            info!("no database configured, using in-memory session store");
            Arc::new(InMemorySessionStore::new())
        }
    };

    let prompts = match &config.ai.prompts_path {
        Some(path) => PromptSet::load(Path::new(path))?,
        None => PromptSet::builtin()?,
    };

    let service = Arc::new(AdvisoryService::new(
        catalog,
        store,
        client,
        retriever,
        prompts,
        config.retrieval.top_k,
    ));

    let router = app(AdvisoryAppState::new(service), &config.server);
    let addr = config.server.socket_addr();
    info!(%addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
