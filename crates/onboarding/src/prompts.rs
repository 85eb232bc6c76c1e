//! Prompt builders for each generation task.

use std::fmt::Write;

use database::{ConversationTurn, QaPair, SetupGuide};

/// Prompt for answering a question, with related cached pairs as context.
pub fn answer_prompt(question: &str, context: &[QaPair]) -> String {
    if context.is_empty() {
        return question.to_string();
    }

    let blocks: Vec<String> = context
        .iter()
        .map(|qa| format!("Q: {}\nA: {}", qa.question, qa.answer))
        .collect();

    format!(
        "{}\n\nRelevant context from knowledge base:\n{}",
        question,
        blocks.join("\n\n")
    )
}

/// Prompt asking for true/false statements about a transcript.
///
/// Each turn is labelled with its id so the generator can cite it as
/// `source_message_id`. Known guides are listed so statements can point into
/// them.
pub fn quiz_prompt(transcript: &[ConversationTurn], guides: &[SetupGuide], count: usize) -> String {
    let mut prompt = format!(
        "Generate {count} true/false statements that test understanding of the \
         following onboarding conversation.\n\nConversation:\n"
    );

    for (index, turn) in transcript.iter().enumerate() {
        let _ = write!(
            prompt,
            "\n[{}] (message id {})\nQ: {}\nA: {}\n",
            index + 1,
            turn.id,
            turn.user_question,
            turn.agent_response
        );
    }

    if !guides.is_empty() {
        prompt.push_str("\nAvailable setup guides:\n");
        for guide in guides {
            let _ = writeln!(prompt, "- guide id {}: {}", guide.id, guide.title);
        }
    }

    let _ = write!(
        prompt,
        r#"
Return ONLY a JSON array with exactly {count} items in this format:
[
  {{
    "text": "A statement that is either true or false",
    "correct_answer": true,
    "explanation": "Why the statement is true or false",
    "source_message_id": 1,
    "guide_refs": [{{"guideId": 1, "section": "Section heading"}}]
  }}
]
Use message ids from the conversation above for source_message_id. Omit guide_refs unless a listed guide covers the statement."#
    );

    prompt
}

/// Prompt asking the generator to look up material about a topic.
pub fn codebase_search_prompt(topic: &str) -> String {
    format!("Search the codebase for: {topic}")
}

/// Prompt asking for a setup guide as a JSON object.
pub fn guide_prompt(topic: &str, codebase_context: Option<&str>) -> String {
    let context = match codebase_context {
        Some(text) if !text.trim().is_empty() => {
            format!("Based on the codebase context:\n{text}\n\n")
        }
        _ => String::new(),
    };

    format!(
        r#"Generate a comprehensive setup guide for: {topic}

{context}Provide the response in the following JSON format:
{{
  "title": "Guide title",
  "description": "Brief description",
  "content": "Full markdown content with step-by-step instructions",
  "prerequisites": ["prerequisite1", "prerequisite2"],
  "difficulty": "beginner|intermediate|advanced",
  "estimatedTime": "X minutes"
}}"#
    )
}

/// Prompt asking for an explanation of one component as a JSON object.
pub fn architecture_prompt(component: &str) -> String {
    format!(
        r#"Analyze the architecture of the component: {component}

Provide a comprehensive explanation including:
- Description of the component's purpose and functionality
- Dependencies (other components it relies on)
- Technology stack used
- Relevant file paths
- Code examples demonstrating key functionality

Return the response in JSON format:
{{
  "componentName": "{component}",
  "description": "Detailed description",
  "dependencies": ["dep1", "dep2"],
  "techStack": ["tech1", "tech2"],
  "filePaths": ["path1", "path2"],
  "codeExamples": [
    {{
      "language": "rust",
      "code": "example code",
      "description": "What this code does"
    }}
  ]
}}"#
    )
}
