//! HTTP service: projects API, contact relay and resume download.

pub mod contact;
pub mod error;
pub mod extract;
pub mod model;
pub mod projects;
pub mod resume;
pub mod store;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use axum::body::Body;
use axum::http::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;

use self::contact::{HttpMailer, MailSettings, Mailer};
use self::store::ProjectStore;

/// Everything `run` needs, assembled from CLI flags and the environment.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub db_path: PathBuf,
    pub resume_path: Option<PathBuf>,
    pub mail: Option<MailSettings>,
}

/// Shared handler state.  Cloned per request.
#[derive(Clone)]
pub struct ServerState {
    pub store: Arc<ProjectStore>,
    pub mailer: Option<Arc<dyn Mailer>>,
    pub mail: Option<MailSettings>,
    pub resume: Option<Arc<PathBuf>>,
}

impl ServerState {
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let store = ProjectStore::open(&config.db_path)
            .with_context(|| format!("opening {}", config.db_path.display()))?;
        let mailer = config
            .mail
            .as_ref()
            .map(|m| Arc::new(HttpMailer::new(m)) as Arc<dyn Mailer>);
        if mailer.is_none() {
            tracing::warn!("MAIL_API_KEY or CONTACT_TO unset; /api/contact will answer 500");
        }
        Ok(Self {
            store: Arc::new(store),
            mailer,
            mail: config.mail.clone(),
            resume: config.resume_path.clone().map(Arc::new),
        })
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            store: Arc::new(ProjectStore::in_memory().expect("in-memory store")),
            mailer: None,
            mail: None,
            resume: None,
        }
    }
}

async fn log_request(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();
    let response = next.run(request).await;
    tracing::info!(
        %method,
        %path,
        status = response.status().as_u16(),
        latency_ms = started.elapsed().as_millis() as u64,
        "request"
    );
    response
}

async fn healthz() -> &'static str {
    "ok"
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/projects", get(projects::list).post(projects::create))
        .route(
            "/api/projects/:key",
            get(projects::get_by_slug)
                .patch(projects::update)
                .delete(projects::delete),
        )
        .route("/api/contact", post(contact::submit))
        .route("/api/download/resume", get(resume::download))
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

pub async fn run(config: ServerConfig) -> Result<()> {
    let state = ServerState::new(&config)?;
    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("binding {}", config.addr))?;
    tracing::info!(addr = %config.addr, db = %config.db_path.display(), "serving");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .context("server error")?;
    Ok(())
}
