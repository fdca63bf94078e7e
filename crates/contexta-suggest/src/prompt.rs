use contexta_core::IntegrationPattern;

use crate::GenerateError;

/// How much the model is asked to extract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PromptVariant {
    /// Contexts, language, aggregates, services and events.
    Core,
    /// Everything in `Core` plus the context map and component breakdown.
    #[default]
    Extended,
}

/// A single submission. Construction rejects blank text, so holding one
/// means the input check already passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainDescriptionRequest {
    use_case_text: String,
}

impl DomainDescriptionRequest {
    pub fn new(use_case_text: impl Into<String>) -> Result<Self, GenerateError> {
        let use_case_text = use_case_text.into();
        if use_case_text.trim().is_empty() {
            return Err(GenerateError::EmptyInput);
        }
        Ok(Self { use_case_text })
    }

    pub fn use_case_text(&self) -> &str {
        &self.use_case_text
    }
}

const CORE_TARGETS: &str = "\
- A short overview of the domain: its name, description and purpose\n\
- Bounded Contexts, each with its responsibilities and how it relates to the overall domain\n\
- Ubiquitous Language for every context (term and definition)\n\
- Aggregates with their Root Entity, Entities (with attributes), Value Objects (with properties) \
and the Repository that persists them\n\
- Domain Services\n\
- Application Services\n\
- Domain Events\n";

fn extended_targets() -> String {
    format!(
        "- A Context Map: directed relationships between bounded contexts (upstream → downstream), \
each tagged with exactly one integration pattern from: {}\n\
- External Systems the bounded contexts integrate with (name and description); context-map \
entries may name them on either end\n\
- Components inside each bounded context (API, application service, repository, external \
adapter, ...) with their responsibilities, the components they depend on and the components \
they interact with, referenced by exact component name\n",
        IntegrationPattern::LABELS.join(", ")
    )
}

/// Compose the instruction sent to the model. The use-case text is embedded verbatim.
pub fn build_prompt(request: &DomainDescriptionRequest, variant: PromptVariant) -> String {
    let mut out = String::with_capacity(1024 + request.use_case_text.len());
    out.push_str(
        "Analyse the following use cases and define a Domain-Driven Design (DDD) architecture.\n\
Identify:\n",
    );
    out.push_str(CORE_TARGETS);
    if variant == PromptVariant::Extended {
        out.push_str(&extended_targets());
    }
    out.push_str(
        "\nUse the same names consistently: context-map entries must name existing bounded \
contexts or external systems, and repositories should be named after the aggregate they persist.\n\
Make sure the output is valid JSON that follows the provided schema.\n\
Use cases:\n",
    );
    out.push_str(&request.use_case_text);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_input_is_rejected() {
        for text in ["", "   ", "\n\t "] {
            assert!(matches!(
                DomainDescriptionRequest::new(text),
                Err(GenerateError::EmptyInput)
            ));
        }
    }

    #[test]
    fn prompt_contains_input_verbatim() {
        let text = "- A customer can place an order.\n- The system charges the card.  ";
        let request = DomainDescriptionRequest::new(text).unwrap();
        for variant in [PromptVariant::Core, PromptVariant::Extended] {
            assert!(build_prompt(&request, variant).contains(text));
        }
    }

    #[test]
    fn extended_prompt_lists_every_pattern() {
        let request = DomainDescriptionRequest::new("anything").unwrap();
        let prompt = build_prompt(&request, PromptVariant::Extended);
        for label in IntegrationPattern::LABELS {
            assert!(prompt.contains(label), "missing {label}");
        }
        assert!(prompt.contains("External Systems"));
        let core = build_prompt(&request, PromptVariant::Core);
        assert!(!core.contains("Context Map"));
        assert!(!core.contains("External Systems"));
    }
}
