//! Contact form relay: validate, then hand the message to a mail provider.

use std::sync::OnceLock;

use async_trait::async_trait;
use axum::extract::State;
use axum::Json;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::error::ApiError;
use super::extract::ApiJson;
use super::ServerState;

const MIN_NAME: usize = 2;
const MIN_MESSAGE: usize = 10;
const DEFAULT_MAIL_API_URL: &str = "https://api.resend.com/emails";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub message: String,
}

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex")
    })
}

impl ContactRequest {
    pub fn validate(&self) -> Result<(), String> {
        let mut problems = Vec::new();
        if self.name.trim().chars().count() < MIN_NAME {
            problems.push(format!("name must be at least {MIN_NAME} characters"));
        }
        if !email_re().is_match(self.email.trim()) {
            problems.push("email address is not valid".to_string());
        }
        if self.message.trim().chars().count() < MIN_MESSAGE {
            problems.push(format!("message must be at least {MIN_MESSAGE} characters"));
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems.join("; "))
        }
    }
}

/// Outgoing mail, already addressed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingMail {
    pub from: String,
    pub to: String,
    pub reply_to: String,
    pub subject: String,
    pub text: String,
}

impl OutgoingMail {
    fn from_request(req: &ContactRequest, settings: &MailSettings) -> Self {
        let name = req.name.trim();
        Self {
            from: settings.from.clone(),
            to: settings.to.clone(),
            reply_to: req.email.trim().to_string(),
            subject: format!("Portfolio contact from {name}"),
            text: format!("From: {name} <{}>\n\n{}", req.email.trim(), req.message.trim()),
        }
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver `mail`; the error string is the provider's complaint.
    async fn send(&self, mail: &OutgoingMail) -> Result<(), String>;
}

/// Provider credentials and addressing, read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailSettings {
    pub api_key: String,
    pub api_url: String,
    pub to: String,
    pub from: String,
}

impl MailSettings {
    /// `None` when the API key or recipient is missing.
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let non_empty = |name: &str| get(name).filter(|v| !v.trim().is_empty());
        Some(Self {
            api_key: non_empty("MAIL_API_KEY")?,
            to: non_empty("CONTACT_TO")?,
            api_url: non_empty("MAIL_API_URL").unwrap_or_else(|| DEFAULT_MAIL_API_URL.to_string()),
            from: non_empty("CONTACT_FROM").unwrap_or_else(|| "Portfolio <onboarding@resend.dev>".to_string()),
        })
    }
}

/// Posts JSON to an HTTP email API with a bearer token.
pub struct HttpMailer {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl HttpMailer {
    pub fn new(settings: &MailSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: settings.api_url.clone(),
            api_key: settings.api_key.clone(),
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), String> {
        let resp = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(mail)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        let detail = resp.text().await.unwrap_or_default();
        Err(format!("{status}: {detail}"))
    }
}

pub async fn submit(
    State(state): State<ServerState>,
    ApiJson(req): ApiJson<ContactRequest>,
) -> Result<Json<Value>, ApiError> {
    req.validate().map_err(ApiError::Validation)?;
    let (Some(mailer), Some(settings)) = (state.mailer.as_deref(), state.mail.as_ref()) else {
        return Err(ApiError::Misconfigured);
    };
    let mail = OutgoingMail::from_request(&req, settings);
    mailer.send(&mail).await.map_err(ApiError::Upstream)?;
    tracing::info!(reply_to = %mail.reply_to, "contact message relayed");
    Ok(Json(json!({ "ok": true })))
}
