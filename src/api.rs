use std::{future::Future, sync::Arc};

use anyhow::{Error, Result};
use axum::{
    Router,
    extract::{FromRequest, Path, Request, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::{Serialize, de::DeserializeOwned};
use tokio::{net::TcpListener, sync::watch};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::{
    clients::{backend::BackendClient, health::HealthChecker},
    config::Config,
    errors::SenderError,
    models::{
        message::MessagesSnapshot,
        parameter::ParameterSlot,
        request::{LegacyMessageRequest, SendTemplateForm, SmsRequest, TemplateCreateRequest},
        response::ApiResponse,
        validation::{validate_phone_number, validate_sms},
    },
    templates::{GroupedTemplate, Selection, extract_slots},
    utils::{SubmitGuard, load_catalog, submit_template, submit_template_creation},
};

pub struct AppState {
    client: BackendClient,
    health_checker: HealthChecker,
    submit_guard: SubmitGuard,
    snapshots: watch::Receiver<MessagesSnapshot>,
}

impl AppState {
    pub fn new(client: BackendClient, snapshots: watch::Receiver<MessagesSnapshot>) -> Self {
        Self {
            health_checker: HealthChecker::new(client.clone()),
            client,
            submit_guard: SubmitGuard::new(),
            snapshots,
        }
    }

    pub fn submit_guard(&self) -> &SubmitGuard {
        &self.submit_guard
    }
}

#[derive(Debug, Serialize)]
pub struct CatalogView {
    pub templates: Vec<GroupedTemplate>,
    pub default_selection: Option<Selection>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/templates", get(list_templates).post(create_template))
        .route(
            "/templates/{name}/{language}/parameters",
            get(template_parameters),
        )
        .route("/send-template", post(send_template))
        .route("/send-message", post(send_message))
        .route("/send-sms", post(send_sms))
        .route("/messages", get(messages))
        .route("/message-status/{id}", get(message_status))
        .route("/message-statuses", get(message_statuses))
        .route("/monitoring/requests", get(request_logs))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_api_server<F>(config: &Config, state: Arc<AppState>, shutdown: F) -> Result<(), Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = TcpListener::bind(&addr).await?;

    info!(address = %addr, "Console server started");

    serve(listener, state, shutdown).await
}

pub async fn serve<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F) -> Result<(), Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}

fn ok<T: Serialize>(data: T, message: &str) -> Response {
    ApiResponse::ok(data, message).into_response()
}

/// `Json` extractor whose rejections use the console envelope.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                let status = rejection.status();
                let error = rejection.body_text();
                debug!(%status, %error, "Rejected request body");
                Err(ApiResponse::failed(status, error, "Invalid request body").into_response())
            }
        }
    }
}

impl IntoResponse for SenderError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            SenderError::Validation(_) => (StatusCode::BAD_REQUEST, "Validation failed"),
            SenderError::Busy => (StatusCode::CONFLICT, "Submission already in progress"),
            SenderError::Transport(_) | SenderError::Decode(_) => {
                (StatusCode::BAD_GATEWAY, "Backend request failed")
            }
        };

        ApiResponse::failed(status, &self, message).into_response()
    }
}

async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.snapshots.borrow().clone();
    let health = state.health_checker.check_all(&snapshot).await;

    let status_code = if health.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(health))
}

async fn list_templates(State(state): State<Arc<AppState>>) -> Result<Response, SenderError> {
    let catalog = load_catalog(&state.client).await?;

    let view = CatalogView {
        default_selection: catalog.default_selection(),
        templates: catalog.groups().to_vec(),
    };

    Ok(ok(view, "Templates retrieved"))
}

async fn template_parameters(
    State(state): State<Arc<AppState>>,
    Path((name, language)): Path<(String, String)>,
) -> Result<Response, SenderError> {
    let catalog = load_catalog(&state.client).await?;

    let template = catalog.find(&name, &language).ok_or_else(|| {
        SenderError::validation(format!(
            "Template {} is not available in language {}",
            name, language
        ))
    })?;

    let slots: Vec<ParameterSlot> = extract_slots(template);
    Ok(ok(slots, "Template parameters extracted"))
}

async fn create_template(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<TemplateCreateRequest>,
) -> Result<Response, SenderError> {
    let response = submit_template_creation(request, &state.client).await?;
    Ok(ok(
        response,
        "Template created successfully! It will be reviewed by WhatsApp before becoming active.",
    ))
}

async fn send_template(
    State(state): State<Arc<AppState>>,
    JsonBody(form): JsonBody<SendTemplateForm>,
) -> Result<Response, SenderError> {
    let response = submit_template(form, &state.client, &state.submit_guard).await?;
    Ok(ok(response, "Template message sent"))
}

async fn send_message(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<LegacyMessageRequest>,
) -> Result<Response, SenderError> {
    validate_phone_number(&request.phone_number)?;
    if request.message.trim().is_empty() {
        return Err(SenderError::validation("Message cannot be empty"));
    }

    let response = state.client.send_message(&request).await?;
    Ok(ok(response, "Message sent successfully!"))
}

async fn send_sms(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<SmsRequest>,
) -> Result<Response, SenderError> {
    validate_sms(&request)?;

    let response = state.client.send_sms(&request).await?;
    Ok(ok(response, "SMS sent successfully!"))
}

async fn messages(State(state): State<Arc<AppState>>) -> Response {
    let snapshot = state.snapshots.borrow().clone();
    ok(snapshot, "Messages retrieved")
}

async fn message_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, SenderError> {
    let response = state.client.message_status(&id).await?;
    Ok(ok(response, "Message status retrieved"))
}

async fn message_statuses(State(state): State<Arc<AppState>>) -> Result<Response, SenderError> {
    let response = state.client.all_message_statuses().await?;
    Ok(ok(response, "Message statuses retrieved"))
}

async fn request_logs(State(state): State<Arc<AppState>>) -> Result<Response, SenderError> {
    let logs = state.client.request_logs().await?;
    Ok(ok(logs, "Request logs retrieved"))
}
