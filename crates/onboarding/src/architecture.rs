//! Architecture explorer: cached component explanations.

use database::{architecture, ArchitectureDoc, NewArchitectureDoc};
use generation_core::StructuredOutput;
use tracing::{debug, info, warn};

use crate::{prompts, require_text, Onboarding, OnboardingError, Result};

/// Build a doc from generator output, falling back to the raw text.
///
/// The stored name is always the requested one so later lookups hit the cache.
fn doc_from_output(component: &str, output: StructuredOutput) -> NewArchitectureDoc {
    match output.parse_object::<NewArchitectureDoc>() {
        Some(doc) => NewArchitectureDoc {
            component_name: component.to_string(),
            ..doc
        },
        None => {
            warn!(component, "Architecture output was not a JSON object, storing raw text");
            NewArchitectureDoc {
                component_name: component.to_string(),
                description: output.into_raw(),
                dependencies: Vec::new(),
                tech_stack: Vec::new(),
                file_paths: Vec::new(),
                code_examples: Vec::new(),
            }
        }
    }
}

impl Onboarding {
    /// Explain a component, generating and caching the doc on first request.
    pub async fn explain_component(&self, component: &str) -> Result<ArchitectureDoc> {
        let component = require_text(component, "Component name is required")?.trim();

        if let Some(doc) = architecture::find_doc(self.db.pool(), component).await? {
            debug!(component, "Architecture doc served from cache");
            return Ok(doc);
        }

        let output = self
            .generate_structured(&prompts::architecture_prompt(component))
            .await?;
        let doc = architecture::upsert_doc(self.db.pool(), &doc_from_output(component, output)).await?;

        info!(component, doc_id = doc.id, "Architecture doc generated");
        Ok(doc)
    }

    /// All stored docs, ordered by component name.
    pub async fn list_architecture(&self) -> Result<Vec<ArchitectureDoc>> {
        Ok(architecture::list_docs(self.db.pool()).await?)
    }

    /// The stored doc for a component.
    pub async fn get_architecture(&self, component: &str) -> Result<ArchitectureDoc> {
        architecture::find_doc(self.db.pool(), component)
            .await?
            .ok_or_else(|| OnboardingError::NotFound {
                entity: "Component",
                id: component.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::service_with;
    use mock_generator::ScriptedGenerator;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_explain_generates_once_then_serves_cache() {
        let generator = Arc::new(ScriptedGenerator::with_replies([r#"{
            "componentName": "renamed-by-model",
            "description": "HTTP entry point",
            "dependencies": ["database"],
            "techStack": ["axum"],
            "filePaths": ["crates/api/src/main.rs"],
            "codeExamples": [{"language": "rust", "code": "Router::new()", "description": "Router"}]
        }"#]));
        let service = service_with(generator.clone()).await;

        let doc = service.explain_component("api").await.unwrap();
        assert_eq!(doc.component_name, "api");
        assert_eq!(doc.tech_stack.0, vec!["axum".to_string()]);
        assert_eq!(doc.code_examples.0[0].code, "Router::new()");

        let again = service.explain_component("api").await.unwrap();
        assert_eq!(again.id, doc.id);
        assert_eq!(generator.calls(), 1);

        assert_eq!(service.get_architecture("api").await.unwrap().id, doc.id);
        assert_eq!(service.list_architecture().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_explain_falls_back_to_raw_text() {
        let generator = Arc::new(ScriptedGenerator::with_replies(["It talks to the database."]));
        let service = service_with(generator).await;

        let doc = service.explain_component("ledger").await.unwrap();
        assert_eq!(doc.description, "It talks to the database.");
        assert!(doc.dependencies.0.is_empty());
        assert!(doc.code_examples.0.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_component_is_not_found() {
        let service = service_with(Arc::new(ScriptedGenerator::new())).await;
        assert!(matches!(
            service.get_architecture("nope").await,
            Err(OnboardingError::NotFound { .. })
        ));
    }
}
