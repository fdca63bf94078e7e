pub mod error;
pub mod lenient;
pub mod schema;
pub mod settings;

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::fs;
use std::path::Path;

pub use error::{Error, Result};
pub use settings::AiSettings;

// --- Types (the shape requested from the model) ---

/// The validated result of one generation round.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StructuredDomainModel {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::object"
    )]
    pub domain: Option<DomainOverview>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub bounded_contexts: Vec<BoundedContext>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub context_map: Vec<ContextRelationship>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub external_systems: Vec<ExternalSystem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DomainOverview {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub purpose: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BoundedContext {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub responsibilities: Vec<String>,
    /// How this context serves the wider domain
    #[serde(default, deserialize_with = "lenient::string")]
    pub relation_to_domain: String,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub ubiquitous_language: Vec<Term>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub aggregates: Vec<Aggregate>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub domain_services: Vec<NamedItem>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub application_services: Vec<NamedItem>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub domain_events: Vec<NamedItem>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub components: Vec<Component>,
}

/// A ubiquitous-language entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Term {
    #[serde(default, deserialize_with = "lenient::string")]
    pub term: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub definition: String,
}

/// Domain services, application services and domain events share this shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NamedItem {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Aggregate {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub root_entity: String,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub entities: Vec<Entity>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub value_objects: Vec<ValueObject>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string"
    )]
    pub repository: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, JsonSchema)]
pub struct Entity {
    pub name: String,
    pub attributes: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, JsonSchema)]
pub struct ValueObject {
    pub name: String,
    pub properties: Vec<String>,
}

// Older responses list entities and value objects as bare names.
#[derive(Deserialize)]
#[serde(untagged)]
enum MemberRepr {
    Name(String),
    Record {
        #[serde(default, deserialize_with = "lenient::string")]
        name: String,
        #[serde(default, deserialize_with = "lenient::strings")]
        attributes: Vec<String>,
        #[serde(default, deserialize_with = "lenient::strings")]
        properties: Vec<String>,
    },
}

impl MemberRepr {
    fn into_parts(self, prefer_properties: bool) -> (String, Vec<String>) {
        match self {
            MemberRepr::Name(name) => (name, Vec::new()),
            MemberRepr::Record {
                name,
                attributes,
                properties,
            } => {
                let (first, second) = if prefer_properties {
                    (properties, attributes)
                } else {
                    (attributes, properties)
                };
                (name, if first.is_empty() { second } else { first })
            }
        }
    }
}

impl<'de> Deserialize<'de> for Entity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let (name, attributes) = MemberRepr::deserialize(deserializer)?.into_parts(false);
        Ok(Entity { name, attributes })
    }
}

impl<'de> Deserialize<'de> for ValueObject {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let (name, properties) = MemberRepr::deserialize(deserializer)?.into_parts(true);
        Ok(ValueObject { name, properties })
    }
}

/// A building block inside a bounded context, as drawn on the component diagram.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Component {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    /// Free text such as "API", "Repository" or "External"
    #[serde(rename = "type", default, deserialize_with = "lenient::string")]
    pub kind: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub responsibilities: Vec<String>,
    /// Names of components this one depends on
    #[serde(default, deserialize_with = "lenient::strings")]
    pub dependencies: Vec<String>,
    /// Names of components this one talks to without depending on them
    #[serde(default, deserialize_with = "lenient::strings")]
    pub interactions: Vec<String>,
}

/// A directed context-map link. Names are not checked against the
/// bounded-context list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ContextRelationship {
    #[serde(default, deserialize_with = "lenient::string")]
    pub upstream: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub downstream: String,
    #[serde(default)]
    pub pattern: IntegrationPattern,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: String,
}

/// A system outside the domain that bounded contexts talk to, such as a
/// payment gateway. Context-map links may name it on either end.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ExternalSystem {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: String,
}

// --- Integration patterns ---

/// The eight context-map integration patterns. Any other tag is kept
/// verbatim in `Unknown` so it survives a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IntegrationPattern {
    SharedKernel,
    CustomerSupplier,
    Conformist,
    AnticorruptionLayer,
    OpenHostService,
    PublishedLanguage,
    SeparateWays,
    Partnership,
    Unknown(String),
}

impl IntegrationPattern {
    pub const KNOWN: [IntegrationPattern; 8] = [
        IntegrationPattern::SharedKernel,
        IntegrationPattern::CustomerSupplier,
        IntegrationPattern::Conformist,
        IntegrationPattern::AnticorruptionLayer,
        IntegrationPattern::OpenHostService,
        IntegrationPattern::PublishedLanguage,
        IntegrationPattern::SeparateWays,
        IntegrationPattern::Partnership,
    ];

    /// Wire literals, in the same order as [`IntegrationPattern::KNOWN`].
    pub const LABELS: [&'static str; 8] = [
        "Shared Kernel",
        "Customer-Supplier",
        "Conformist",
        "Anticorruption Layer",
        "Open Host Service",
        "Published Language",
        "Separate Ways",
        "Partnership",
    ];

    pub fn from_label(label: &str) -> Self {
        Self::KNOWN
            .iter()
            .zip(Self::LABELS)
            .find(|(_, known)| *known == label)
            .map(|(pattern, _)| pattern.clone())
            .unwrap_or_else(|| IntegrationPattern::Unknown(label.to_string()))
    }

    pub fn label(&self) -> &str {
        match self {
            IntegrationPattern::SharedKernel => Self::LABELS[0],
            IntegrationPattern::CustomerSupplier => Self::LABELS[1],
            IntegrationPattern::Conformist => Self::LABELS[2],
            IntegrationPattern::AnticorruptionLayer => Self::LABELS[3],
            IntegrationPattern::OpenHostService => Self::LABELS[4],
            IntegrationPattern::PublishedLanguage => Self::LABELS[5],
            IntegrationPattern::SeparateWays => Self::LABELS[6],
            IntegrationPattern::Partnership => Self::LABELS[7],
            IntegrationPattern::Unknown(tag) => tag,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, IntegrationPattern::Unknown(_))
    }
}

impl Default for IntegrationPattern {
    fn default() -> Self {
        IntegrationPattern::Unknown(String::new())
    }
}

impl std::fmt::Display for IntegrationPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for IntegrationPattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for IntegrationPattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        lenient::string(deserializer).map(|label| IntegrationPattern::from_label(&label))
    }
}

impl JsonSchema for IntegrationPattern {
    fn schema_name() -> Cow<'static, str> {
        "IntegrationPattern".into()
    }

    fn json_schema(_: &mut schemars::SchemaGenerator) -> schemars::Schema {
        schemars::json_schema!({
            "type": "string",
            "description": "Context-map integration pattern; unknown tags are tolerated",
            "enum": IntegrationPattern::LABELS,
        })
    }
}

// --- Files ---

/// Read a model saved with [`write_model_file`] (or any JSON in the same shape).
pub fn read_model_file(path: &Path) -> Result<StructuredDomainModel> {
    let raw = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    serde_json::from_str(&raw).map_err(|e| Error::json(path, e))
}

/// Write a model as pretty JSON, replacing any existing file.
pub fn write_model_file(path: &Path, model: &StructuredDomainModel) -> Result<()> {
    let json = serde_json::to_string_pretty(model)?;
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
    }
    fs::write(path, json).map_err(|e| Error::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StructuredDomainModel {
        StructuredDomainModel {
            domain: Some(DomainOverview {
                name: "Retail".into(),
                description: "Online shop".into(),
                purpose: "Sell things".into(),
            }),
            bounded_contexts: vec![BoundedContext {
                name: "Ordering".into(),
                description: "Takes orders".into(),
                responsibilities: vec!["Accept orders".into()],
                relation_to_domain: "Core".into(),
                ubiquitous_language: vec![Term {
                    term: "Order".into(),
                    definition: "A purchase request".into(),
                }],
                aggregates: vec![Aggregate {
                    name: "Order".into(),
                    root_entity: "Order".into(),
                    entities: vec![Entity {
                        name: "OrderLine".into(),
                        attributes: vec!["quantity".into()],
                    }],
                    value_objects: vec![ValueObject {
                        name: "Money".into(),
                        properties: vec!["amount".into(), "currency".into()],
                    }],
                    repository: Some("OrderRepository".into()),
                    description: "Order lifecycle".into(),
                }],
                domain_services: vec![NamedItem {
                    name: "Pricing".into(),
                    description: "Computes totals".into(),
                }],
                application_services: vec![],
                domain_events: vec![NamedItem {
                    name: "OrderPlaced".into(),
                    description: String::new(),
                }],
                components: vec![],
            }],
            context_map: vec![ContextRelationship {
                upstream: "Catalog".into(),
                downstream: "Ordering".into(),
                pattern: IntegrationPattern::Unknown("Mystery Pattern".into()),
                description: "Prices".into(),
            }],
            external_systems: vec![ExternalSystem {
                name: "Stripe".into(),
                description: "Card payments".into(),
            }],
        }
    }

    #[test]
    fn model_round_trips_through_json() {
        let model = sample();
        let json = serde_json::to_string(&model).unwrap();
        let back: StructuredDomainModel = serde_json::from_str(&json).unwrap();
        assert_eq!(back, model);
    }

    #[test]
    fn null_arrays_decode_as_empty() {
        let json = r#"{
            "boundedContexts": [{
                "name": "Billing",
                "aggregates": null,
                "ubiquitousLanguage": null,
                "domainEvents": [null, {"name": "InvoiceIssued"}]
            }],
            "contextMap": null
        }"#;
        let model: StructuredDomainModel = serde_json::from_str(json).unwrap();
        let ctx = &model.bounded_contexts[0];
        assert!(ctx.aggregates.is_empty());
        assert!(ctx.ubiquitous_language.is_empty());
        assert_eq!(ctx.domain_events.len(), 1);
        assert_eq!(ctx.domain_events[0].name, "InvoiceIssued");
        assert!(model.context_map.is_empty());
        assert!(model.domain.is_none());
    }

    #[test]
    fn external_systems_decode_leniently() {
        let json = r#"{"externalSystems": [{"name": "Stripe", "description": null}, null, "junk"]}"#;
        let model: StructuredDomainModel = serde_json::from_str(json).unwrap();
        assert_eq!(
            model.external_systems,
            vec![ExternalSystem { name: "Stripe".into(), description: String::new() }]
        );
        let absent: StructuredDomainModel = serde_json::from_str("{}").unwrap();
        assert!(absent.external_systems.is_empty());
    }

    #[test]
    fn bare_string_entities_are_accepted() {
        let json = r#"{"name": "Order", "entities": ["OrderLine"], "valueObjects": ["Money", {"name": "Address", "properties": ["city"]}]}"#;
        let agg: Aggregate = serde_json::from_str(json).unwrap();
        assert_eq!(agg.entities, vec![Entity { name: "OrderLine".into(), attributes: vec![] }]);
        assert_eq!(agg.value_objects[0].name, "Money");
        assert_eq!(agg.value_objects[1].properties, vec!["city"]);
        assert_eq!(agg.repository, None);
    }

    #[test]
    fn unknown_pattern_is_kept_verbatim() {
        let rel: ContextRelationship =
            serde_json::from_str(r#"{"upstream": "A", "downstream": "B", "pattern": "Mystery Pattern"}"#)
                .unwrap();
        assert_eq!(rel.pattern, IntegrationPattern::Unknown("Mystery Pattern".into()));
        assert!(!rel.pattern.is_known());
        assert_eq!(
            serde_json::to_value(&rel).unwrap()["pattern"],
            serde_json::json!("Mystery Pattern")
        );
    }

    #[test]
    fn every_label_maps_back_to_its_pattern() {
        for (pattern, label) in IntegrationPattern::KNOWN.iter().zip(IntegrationPattern::LABELS) {
            assert_eq!(&IntegrationPattern::from_label(label), pattern);
            assert_eq!(pattern.label(), label);
        }
    }

    #[test]
    fn model_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("model.json");
        write_model_file(&path, &sample()).unwrap();
        assert_eq!(read_model_file(&path).unwrap(), sample());
    }

    #[test]
    fn missing_model_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_model_file(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
