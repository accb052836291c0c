//! Vision agent: answers questions by reading the boxscore screenshot.

use std::path::Path;

use tracing::{debug, warn};

use crate::clients::AnthropicClient;

/// Result from the vision agent.
#[derive(Debug, Clone)]
pub struct VisionAgentResult {
    pub answer: Option<String>,
    pub confidence: f64,
    pub screenshot_path: Option<String>,
    pub error: Option<String>,
}

impl VisionAgentResult {
    fn failure(error: impl Into<String>) -> Self {
        Self {
            answer: None,
            confidence: 0.0,
            screenshot_path: None,
            error: Some(error.into()),
        }
    }
}

/// Agent that analyzes basketball boxscore screenshots.
#[derive(Debug, Clone)]
pub struct VisionAgent {
    anthropic: AnthropicClient,
}

impl VisionAgent {
    pub fn new(anthropic: AnthropicClient) -> Self {
        Self { anthropic }
    }

    /// Ask a question about a game using visual analysis.
    ///
    /// Total: missing or absent screenshots short-circuit to an error result
    /// before any model call; model failures are caught at this boundary.
    pub async fn ask(&self, question: &str, screenshot_path: Option<&Path>) -> VisionAgentResult {
        let Some(screenshot_path) = screenshot_path else {
            return VisionAgentResult::failure("No screenshot path provided");
        };

        if !screenshot_path.exists() {
            return VisionAgentResult::failure(format!(
                "Screenshot not found: {}",
                screenshot_path.display()
            ));
        }

        let prompt = build_prompt(question);
        debug!(
            "Vision agent analyzing {} for: {}",
            screenshot_path.display(),
            question
        );

        match self
            .anthropic
            .analyze_image(screenshot_path, &prompt, None)
            .await
        {
            Ok(reply) => VisionAgentResult {
                answer: Some(reply.answer),
                confidence: reply.confidence,
                screenshot_path: Some(screenshot_path.display().to_string()),
                error: None,
            },
            Err(e) => {
                warn!("Vision analysis failed: {}", e);
                VisionAgentResult::failure(format!("Vision analysis failed: {}", e))
            }
        }
    }
}

/// Wrap the user's question with instructions for reading the boxscore.
fn build_prompt(question: &str) -> String {
    format!(
        "Analyze this basketball boxscore image and answer the following question:

Question: {question}

Instructions:
- Look at the complete boxscore data shown in the image
- Find the specific statistics needed to answer the question
- Provide a clear, direct answer with specific numbers
- If the question asks about \"top\" or \"most\", find the maximum value
- Include the player name and their team when relevant

Answer the question based solely on what you can see in the image."
    )
}
