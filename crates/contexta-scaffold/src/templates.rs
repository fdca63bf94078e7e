//! File bodies written for each service. `{name}` is the display name from the
//! descriptor, not the folder name.

use crate::ServiceDescriptor;

pub fn api(name: &str) -> String {
    format!(
        "// Presentation layer - simple Express server for {name}
const express = require('express');
const app = express();
app.use(express.json());

// Example endpoints
app.get('/health', (req, res) => res.json({{ status: 'ok' }}));

// Replace with the endpoints listed in README.md
app.listen(process.env.PORT || 3000, () => console.log('Server running on port', process.env.PORT || 3000));
"
    )
}

pub fn use_cases(name: &str) -> String {
    format!(
        "// Application layer - use cases for {name}
// Implement orchestration of domain operations here
module.exports = {{
  // example: createOrder: async (dto) => {{ /* ... */ }}
}};
"
    )
}

pub fn entities(name: &str) -> String {
    format!(
        "// Domain layer - entities for {name}
// Define aggregates, entities and value objects here

// Example entity
class ExampleEntity {{
  constructor(props) {{
    this.id = props.id;
  }}
}}

module.exports = {{ ExampleEntity }};
"
    )
}

pub fn repositories(name: &str) -> String {
    format!(
        "// Domain layer - repository interfaces for {name}
// Define repository interfaces to be implemented by infrastructure adapters

class ExampleRepository {{
  async save(entity) {{ throw new Error('not implemented'); }}
}}

module.exports = {{ ExampleRepository }};
"
    )
}

pub fn repository_impl(name: &str) -> String {
    format!(
        "// Infrastructure - repository implementation for {name}
// Replace with actual DB adapter (ORM / raw queries)
module.exports = {{
  async save(entity) {{
    // persist entity
    return entity;
  }}
}};
"
    )
}

pub fn events(name: &str) -> String {
    format!(
        "// Infrastructure - events publisher/subscriber for {name}
module.exports = {{
  publish(event) {{
    console.log('publish', event);
  }}
}};
"
    )
}

fn bullets(lines: impl Iterator<Item = String>) -> String {
    let lines: Vec<String> = lines.map(|l| format!("- {l}")).collect();
    if lines.is_empty() {
        "- (unspecified)".to_string()
    } else {
        lines.join("\n")
    }
}

pub fn readme(service: &ServiceDescriptor) -> String {
    let responsibilities = bullets(service.responsibilities.iter().cloned());
    let ownership = bullets(service.data_ownership.iter().cloned());
    let apis = bullets(
        service
            .public_apis
            .iter()
            .map(|a| format!("{} {}: {}", a.method, a.path, a.description)),
    );
    format!(
        "# {}

Responsibilities:
{responsibilities}

Data ownership:
{ownership}

Suggested APIs:
{apis}
",
        service.display_name()
    )
}
