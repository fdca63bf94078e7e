pub mod engine;
mod error;
pub mod parse;
pub mod prompt;
pub mod session;

use contexta_core::StructuredDomainModel;

pub use engine::{GeminiTransport, GenerateContentRequest, Transport};
pub use error::{ErrorKind, GenerateError};
pub use prompt::{DomainDescriptionRequest, PromptVariant};
pub use session::{Session, SubmitOutcome};

/// Run one exchange: prompt, send, unwrap, parse. Makes a single attempt.
pub async fn generate(
    transport: &dyn Transport,
    request: &DomainDescriptionRequest,
    variant: PromptVariant,
) -> Result<StructuredDomainModel, GenerateError> {
    let prompt = prompt::build_prompt(request, variant);
    tracing::info!(prompt_chars = prompt.len(), ?variant, "requesting domain model");

    let envelope = transport.send(&GenerateContentRequest::new(prompt)).await?;
    let model = parse::validate(&envelope)?;

    tracing::info!(
        contexts = model.bounded_contexts.len(),
        relationships = model.context_map.len(),
        "domain model generated"
    );
    Ok(model)
}

/// [`generate`] from raw text; blank text fails before any network call.
pub async fn generate_from_text(
    transport: &dyn Transport,
    use_case_text: &str,
    variant: PromptVariant,
) -> Result<StructuredDomainModel, GenerateError> {
    let request = DomainDescriptionRequest::new(use_case_text)?;
    generate(transport, &request, variant).await
}

#[cfg(test)]
pub(crate) mod testing {
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use crate::{GenerateContentRequest, GenerateError, Transport};

    /// Replays canned replies in order and records every request.
    pub struct FakeTransport {
        replies: Mutex<Vec<Result<Value, GenerateError>>>,
        pub calls: AtomicUsize,
        pub last_prompt: Mutex<Option<String>>,
    }

    impl FakeTransport {
        pub fn new(mut replies: Vec<Result<Value, GenerateError>>) -> Self {
            replies.reverse();
            Self {
                replies: Mutex::new(replies),
                calls: AtomicUsize::new(0),
                last_prompt: Mutex::new(None),
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    pub fn envelope(text: &str) -> Value {
        json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] })
    }

    #[async_trait]
    impl Transport for FakeTransport {
        async fn send(&self, request: &GenerateContentRequest) -> Result<Value, GenerateError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_prompt.lock().unwrap() = Some(request.contents[0].parts[0].text.clone());
            self.replies
                .lock()
                .unwrap()
                .pop()
                .unwrap_or(Err(GenerateError::Transport("no reply queued".into())))
        }
    }
}
