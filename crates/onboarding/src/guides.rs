//! Setup guide generation.

use database::{guide, Difficulty, NewSetupGuide, SetupGuide};
use generation_core::StructuredOutput;
use tracing::{info, warn};

use crate::{prompts, require_text, Onboarding, Result};

const FALLBACK_ESTIMATED_TIME: &str = "30 minutes";

/// Build a guide from generator output, falling back to the raw text.
fn guide_from_output(topic: &str, output: StructuredOutput) -> NewSetupGuide {
    if let Some(guide) = output.parse_object::<NewSetupGuide>() {
        return guide;
    }

    warn!(topic, "Guide output was not a JSON object, storing raw text");
    NewSetupGuide {
        title: topic.to_string(),
        description: format!("Setup guide for {topic}"),
        content: output.into_raw(),
        prerequisites: Vec::new(),
        difficulty: Difficulty::Beginner,
        estimated_time: FALLBACK_ESTIMATED_TIME.to_string(),
    }
}

impl Onboarding {
    /// Generate and store a setup guide for a topic.
    ///
    /// The generator is first asked to search the codebase for the topic, and
    /// its findings are passed into the guide request.
    pub async fn generate_guide(&self, topic: &str) -> Result<SetupGuide> {
        require_text(topic, "Topic is required")?;

        let codebase_context = self
            .generate_text(&prompts::codebase_search_prompt(topic))
            .await?;
        let output = self
            .generate_structured(&prompts::guide_prompt(topic, Some(&codebase_context)))
            .await?;

        let stored = guide::insert_guide(self.db.pool(), &guide_from_output(topic, output)).await?;
        info!(guide_id = stored.id, topic, "Setup guide generated");
        Ok(stored)
    }

    /// All guides, newest first.
    pub async fn list_guides(&self) -> Result<Vec<SetupGuide>> {
        Ok(guide::list_guides(self.db.pool()).await?)
    }

    pub async fn get_guide(&self, id: i64) -> Result<SetupGuide> {
        Ok(guide::get_guide(self.db.pool(), id).await?)
    }
}
