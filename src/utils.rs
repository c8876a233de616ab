use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    clients::backend::BackendClient,
    errors::SenderError,
    models::{
        parameter::ParameterValues,
        request::{SendTemplateForm, TemplateCreateRequest},
        validation::prepare_template_create,
    },
    templates::{TemplateCatalog, assemble_request, validate_selection},
};

/// Allows one submission at a time; a second caller gets `SenderError::Busy`.
#[derive(Clone, Default)]
pub struct SubmitGuard {
    in_flight: Arc<AtomicBool>,
}

pub struct SubmitPermit {
    in_flight: Arc<AtomicBool>,
}

impl SubmitGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_acquire(&self) -> Result<SubmitPermit, SenderError> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| SenderError::Busy)?;

        Ok(SubmitPermit {
            in_flight: Arc::clone(&self.in_flight),
        })
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }
}

impl Drop for SubmitPermit {
    fn drop(&mut self) {
        self.in_flight.store(false, Ordering::Release);
    }
}

pub async fn load_catalog(client: &BackendClient) -> Result<TemplateCatalog, SenderError> {
    let templates = client.list_templates().await?;
    Ok(TemplateCatalog::from_templates(templates))
}

/// Validates, assembles and sends a template message. Returns the backend's
/// response untouched.
pub async fn submit_template(
    form: SendTemplateForm,
    client: &BackendClient,
    guard: &SubmitGuard,
) -> Result<Value, SenderError> {
    let _permit = guard.try_acquire()?;
    let trace_id = Uuid::new_v4();

    info!(
        %trace_id,
        template_name = %form.template_name,
        language_code = ?form.language_code,
        "Processing template submission"
    );

    validate_selection(&form.to, form.language_code.as_deref())
        .inspect_err(|e| warn!(%trace_id, error = %e, "Template submission rejected"))?;

    let catalog = load_catalog(client).await?;
    let values: ParameterValues = form.parameters.into_iter().collect();

    let request = assemble_request(
        &form.to,
        &form.template_name,
        form.language_code.as_deref(),
        &catalog,
        &values,
    )
    .inspect_err(|e| warn!(%trace_id, error = %e, "Template submission rejected"))?;

    match client.send_template(&request).await {
        Ok(response) => {
            info!(%trace_id, "Template message sent successfully");
            Ok(response)
        }
        Err(e) => {
            warn!(%trace_id, error = %e, "Template message failed");
            Err(e)
        }
    }
}

pub async fn submit_template_creation(
    request: TemplateCreateRequest,
    client: &BackendClient,
) -> Result<Value, SenderError> {
    let request = prepare_template_create(request)?;

    info!(
        name = %request.name,
        language = %request.language,
        category = %request.category,
        "Submitting template for review"
    );

    client.create_template(&request).await
}
