use std::sync::Arc;

use serde_json::json;
use tracing::{debug, error};

use crate::error::AppError;
use crate::genai::GenerativeModel;
use crate::messages;
use crate::models::ValidationResult;

/// Judges whether a bibliographic reference follows APA 7.
///
/// `validate` never fails: blank input and every model failure come back as a
/// negative verdict with Spanish feedback. One model call per invocation, no
/// retries.
#[derive(Clone)]
pub struct ReferenceValidator {
    model: Option<Arc<dyn GenerativeModel>>,
}

impl ReferenceValidator {
    pub fn new(model: Option<Arc<dyn GenerativeModel>>) -> Self {
        Self { model }
    }

    pub async fn validate(&self, reference_text: &str) -> ValidationResult {
        if reference_text.trim().is_empty() {
            return ValidationResult::rejected(messages::EMPTY_REFERENCE);
        }

        match self.ask_model(reference_text).await {
            Ok(result) => result,
            Err(e) => {
                error!("Error validating APA reference: {}", e);
                ValidationResult::rejected(messages::VALIDATION_FAILED)
            }
        }
    }

    async fn ask_model(&self, reference_text: &str) -> Result<ValidationResult, AppError> {
        let model = self.model.as_ref().ok_or_else(|| {
            AppError::NotConfigured("generative model API key is not set".to_string())
        })?;

        let raw = model
            .generate_json(&build_prompt(reference_text), &response_schema())
            .await?;
        debug!("model verdict: {}", raw);

        serde_json::from_str::<ValidationResult>(&raw)
            .map_err(|e| AppError::Upstream(format!("model output does not match schema: {}", e)))
    }
}

pub fn build_prompt(reference_text: &str) -> String {
    format!(
        "Eres un experto en el estilo de citación APA (7.ª edición). Se te proporcionará una \
referencia y tu trabajo es determinar si es válida y devolver comentarios sobre ella, incluyendo \
errores y sugerencias para corregirla. Responde siempre en español, sin importar el idioma de la \
referencia.\n\nReferencia a validar:\n\n{}",
        reference_text
    )
}

/// Shape the model's answer must take: `{ isValid, feedback }`, both required.
pub fn response_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "isValid": {
                "type": "BOOLEAN",
                "description": "Indica si la referencia APA es válida o no."
            },
            "feedback": {
                "type": "STRING",
                "description": "Comentarios sobre la referencia APA, incluyendo errores y sugerencias de corrección. Debe estar en español."
            }
        },
        "required": ["isValid", "feedback"]
    })
}
