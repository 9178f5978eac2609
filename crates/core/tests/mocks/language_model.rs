use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use vibecheck_core::{Completion, LanguageModel, LlmError, UsageStats};

#[derive(Clone)]
pub struct MockLanguageModel {
    pub text: String,
    pub usage: Option<UsageStats>,
    pub prompts: Arc<Mutex<Vec<String>>>,
    pub fail_with: Option<String>,
}

impl MockLanguageModel {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            usage: Some(UsageStats {
                prompt_tokens: 1200,
                output_tokens: 300,
                total_tokens: 1500,
            }),
            prompts: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn without_usage(text: &str) -> Self {
        Self {
            usage: None,
            ..Self::new(text)
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            text: String::new(),
            usage: None,
            prompts: Arc::new(Mutex::new(Vec::new())),
            fail_with: Some(msg.to_string()),
        }
    }
}

#[async_trait]
impl LanguageModel for MockLanguageModel {
    fn model(&self) -> &str {
        "mock-llm"
    }

    async fn complete(&self, prompt: &str) -> Result<Completion, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if let Some(ref msg) = self.fail_with {
            return Err(LlmError::Api {
                status: 500,
                message: msg.clone(),
            });
        }
        Ok(Completion {
            text: self.text.clone(),
            usage: self.usage,
        })
    }
}
