//! Transient view state for one user: the text being edited, the last good
//! model, the loading flag and the last error.

use contexta_core::StructuredDomainModel;

use crate::{generate, DomainDescriptionRequest, GenerateError, PromptVariant, Transport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A new model replaced the previous one.
    Generated,
    /// The input was blank; nothing was sent.
    Rejected,
    /// The exchange failed; see [`Session::error`].
    Failed,
    /// An exchange is already in flight.
    Busy,
}

/// Clears the loading flag when dropped, including when the submit future is
/// cancelled mid-flight.
struct LoadingGuard<'a>(&'a mut bool);

impl<'a> LoadingGuard<'a> {
    fn raise(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

#[derive(Debug, Default)]
pub struct Session {
    input: String,
    variant: PromptVariant,
    result: Option<StructuredDomainModel>,
    loading: bool,
    error: Option<GenerateError>,
}

impl Session {
    pub fn new(variant: PromptVariant) -> Self {
        Self {
            variant,
            ..Self::default()
        }
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn result(&self) -> Option<&StructuredDomainModel> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&GenerateError> {
        self.error.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Drop the displayed model and error.
    pub fn clear(&mut self) {
        self.result = None;
        self.error = None;
    }

    /// Submit the current input. A failed attempt keeps the previous model on
    /// display; only a successful one replaces it. The loading flag is cleared
    /// on return and also when the returned future is dropped early.
    pub async fn submit(&mut self, transport: &dyn Transport) -> SubmitOutcome {
        if self.loading {
            tracing::warn!("submission ignored: a request is already in flight");
            return SubmitOutcome::Busy;
        }

        let request = match DomainDescriptionRequest::new(self.input.as_str()) {
            Ok(request) => request,
            Err(e) => {
                self.error = Some(e);
                return SubmitOutcome::Rejected;
            }
        };

        self.error = None;
        let variant = self.variant;
        let outcome = {
            let _loading = LoadingGuard::raise(&mut self.loading);
            generate(transport, &request, variant).await
        };

        match outcome {
            Ok(model) => {
                self.result = Some(model);
                SubmitOutcome::Generated
            }
            Err(e) => {
                tracing::warn!(kind = ?e.kind(), "generation failed: {e}");
                self.error = Some(e);
                SubmitOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{envelope, FakeTransport};
    use crate::{ErrorKind, GenerateContentRequest};
    use async_trait::async_trait;
    use serde_json::Value;

    /// Never answers.
    struct StalledTransport;

    #[async_trait]
    impl Transport for StalledTransport {
        async fn send(&self, _: &GenerateContentRequest) -> Result<Value, GenerateError> {
            std::future::pending().await
        }
    }

    const GOOD: &str = r#"{"boundedContexts": [{"name": "Billing"}]}"#;

    async fn session_with_result(transport: &FakeTransport) -> Session {
        let mut session = Session::new(PromptVariant::Extended);
        session.set_input("Customers pay invoices");
        assert_eq!(session.submit(transport).await, SubmitOutcome::Generated);
        session
    }

    #[tokio::test]
    async fn blank_input_keeps_previous_result_and_skips_network() {
        let transport = FakeTransport::new(vec![Ok(envelope(GOOD))]);
        let mut session = session_with_result(&transport).await;

        session.set_input("   ");
        assert_eq!(session.submit(&transport).await, SubmitOutcome::Rejected);
        assert_eq!(transport.calls(), 1);
        assert_eq!(session.error(), Some(&GenerateError::EmptyInput));
        assert_eq!(session.result().unwrap().bounded_contexts[0].name, "Billing");
        assert!(!session.is_loading());
    }

    #[tokio::test]
    async fn payload_error_on_retry_keeps_previous_result() {
        let transport = FakeTransport::new(vec![Ok(envelope(GOOD)), Ok(envelope("{not json"))]);
        let mut session = session_with_result(&transport).await;
        let before = session.result().cloned();

        assert_eq!(session.submit(&transport).await, SubmitOutcome::Failed);
        assert_eq!(session.error().map(GenerateError::kind), Some(ErrorKind::PayloadParse));
        assert_eq!(session.result().cloned(), before);
        assert!(!session.is_loading());
    }

    #[tokio::test]
    async fn success_clears_the_previous_error() {
        let transport = FakeTransport::new(vec![Ok(serde_json::json!({})), Ok(envelope(GOOD))]);
        let mut session = Session::new(PromptVariant::Core);
        session.set_input("text");

        assert_eq!(session.submit(&transport).await, SubmitOutcome::Failed);
        assert_eq!(session.error(), Some(&GenerateError::UnexpectedStructure));
        assert!(session.result().is_none());

        assert_eq!(session.submit(&transport).await, SubmitOutcome::Generated);
        assert!(session.error().is_none());
        assert!(session.result().is_some());
    }

    #[tokio::test]
    async fn transport_failure_returns_to_interactive_state() {
        let transport = FakeTransport::new(vec![Err(GenerateError::Transport("down".into()))]);
        let mut session = Session::new(PromptVariant::Extended);
        session.set_input("text");
        assert_eq!(session.submit(&transport).await, SubmitOutcome::Failed);
        assert!(!session.is_loading());
        assert_eq!(
            session.error().unwrap().to_string(),
            "Error communicating with the AI: down"
        );
    }

    #[tokio::test]
    async fn abandoned_submit_does_not_leave_the_session_busy() {
        let mut session = Session::new(PromptVariant::Extended);
        session.set_input("Customers pay invoices");

        tokio::select! {
            biased;
            _ = session.submit(&StalledTransport) => panic!("stalled transport answered"),
            _ = std::future::ready(()) => {}
        }
        assert!(!session.is_loading());

        let transport = FakeTransport::new(vec![Ok(envelope(GOOD))]);
        assert_eq!(session.submit(&transport).await, SubmitOutcome::Generated);
        assert_eq!(transport.calls(), 1);
        assert_eq!(session.result().unwrap().bounded_contexts[0].name, "Billing");
    }
}
