//! services/api/src/adapters/openai_humanizer.rs
//!
//! This module contains the live LLM implementation of the `HumanizerService`
//! port. It is opt-in (`HUMANIZER_BACKEND=openai`); the simulated adapter is
//! the default. The detection scores remain fabricated even here, because no
//! real detector is consulted on either path.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use text_forge_core::domain::{HumanizationOptions, HumanizeOutcome};
use text_forge_core::ports::{HumanizerService, PortError, PortResult};

use crate::adapters::sim_humanizer::{sample_detection, sample_plagiarism};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `HumanizerService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiHumanizer {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiHumanizer {
    /// Creates a new `OpenAiHumanizer`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }

    fn build_prompt(text: &str, options: &HumanizationOptions) -> String {
        let mut prompt = format!(
            "Humanize the following AI-generated text to avoid detection by AI content detectors.\n\
             Use {} paraphrasing with a {} writing style.\n",
            options.level.as_str(),
            options.style.as_str(),
        );
        if options.fix_grammar {
            prompt.push_str("Fix any grammar issues. ");
        }
        if options.reorder_sentences {
            prompt.push_str("Reorder sentences where appropriate. ");
        }
        if options.add_synonyms {
            prompt.push_str("Replace words with synonyms to add variety. ");
        }
        prompt.push_str(
            "\nEnsure the meaning remains intact while making the text appear more human-written.\n\n",
        );
        prompt.push_str("Original text:\n\"\"\"\n");
        prompt.push_str(text);
        prompt.push_str("\n\"\"\"");
        prompt
    }
}

//=========================================================================================
// `HumanizerService` Trait Implementation
//=========================================================================================

#[async_trait]
impl HumanizerService for OpenAiHumanizer {
    async fn humanize(
        &self,
        text: &str,
        options: &HumanizationOptions,
    ) -> PortResult<HumanizeOutcome> {
        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content("You are an expert at humanizing AI-generated text to avoid detection.")
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(Self::build_prompt(text, options))
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .max_tokens(2000u32)
            .n(1)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        // Call the API and manually map the error if it occurs, which respects the orphan rule.
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::Unexpected(e.to_string()))?;

        let humanized_text = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                PortError::Unexpected(
                    "Humanizer LLM response contained no text content.".to_string(),
                )
            })?;

        let mut rng = rand::thread_rng();
        Ok(HumanizeOutcome {
            humanized_text,
            plagiarism_score: sample_plagiarism(&mut rng),
            ai_detection: sample_detection(&mut rng),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use text_forge_core::domain::{HumanizeLevel, HumanizeStyle};

    #[test]
    fn prompt_mentions_every_enabled_flag() {
        let options = HumanizationOptions {
            level: HumanizeLevel::Strong,
            style: HumanizeStyle::Professional,
            fix_grammar: true,
            reorder_sentences: true,
            add_synonyms: true,
            ..HumanizationOptions::default()
        };
        let prompt = OpenAiHumanizer::build_prompt("Some text.", &options);
        assert!(prompt.contains("strong paraphrasing with a professional writing style"));
        assert!(prompt.contains("Fix any grammar issues."));
        assert!(prompt.contains("Reorder sentences where appropriate."));
        assert!(prompt.contains("Replace words with synonyms to add variety."));
        assert!(prompt.contains("Some text."));
    }

    #[test]
    fn prompt_omits_disabled_flags() {
        let options = HumanizationOptions {
            level: HumanizeLevel::Light,
            style: HumanizeStyle::Standard,
            ..HumanizationOptions::default()
        };
        let prompt = OpenAiHumanizer::build_prompt("Body.", &options);
        assert!(!prompt.contains("grammar"));
        assert!(!prompt.contains("synonyms"));
    }
}
