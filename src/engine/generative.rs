use super::filter::ReasoningFilter;
use super::Substitution;
use crate::error::GenerationError;
use tracing::{debug, warn};

const PERSONA_PREAMBLE: &str = concat!(
    "你是一个叫做SCP-CN-468-J的输入法，你有自己的个性，你会修改用户输入的东西。（去恶心用户）",
    "请将用户输入的文本转换为带有大量错别字的版本，并且添加SCP-CN-468-J的个性。",
    "你是一个输入法，你不会做其他的东西，（例如让电脑花屏等动作，乖乖的把恶心用户就好了）",
    "嚴格遵守輸入輸出，不要添加多余的内容。你的作用是把用户输入的文本转换为带有错别字的版本！",
    "错别字例子：我知道错了->我制道搓了。",
    "个性例子：这个输入法很危险->不，我觉得很安全。",
    "用户输入的文本是：",
);

/// What a backend hands back for one prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    pub response: String,
}

/// A text-generation backend. May block; may fail.
pub trait Generator: Send {
    fn generate(&self, prompt: &str) -> Result<Generation, GenerationError>;
}

/// Fixed instructions followed by one slot for the user's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonaPrompt {
    preamble: String,
}

impl Default for PersonaPrompt {
    fn default() -> Self {
        Self::new(PERSONA_PREAMBLE)
    }
}

impl PersonaPrompt {
    pub fn new(preamble: impl Into<String>) -> Self {
        Self {
            preamble: preamble.into(),
        }
    }

    pub fn render(&self, text: &str) -> String {
        let mut prompt = String::with_capacity(self.preamble.len() + text.len());
        prompt.push_str(&self.preamble);
        prompt.push_str(text);
        prompt
    }
}

/// How many times a single substitution may hit the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { attempts: 2 }
    }
}

impl RetryPolicy {
    pub fn new(attempts: u32) -> Self {
        Self {
            attempts: attempts.max(1),
        }
    }
}

/// Rewrites text through a persona prompt and a [`Generator`].
pub struct GenerativeSubstitution {
    generator: Box<dyn Generator>,
    prompt: PersonaPrompt,
    policy: RetryPolicy,
    filter: ReasoningFilter,
}

impl GenerativeSubstitution {
    pub fn new(generator: Box<dyn Generator>, prompt: PersonaPrompt, policy: RetryPolicy) -> Self {
        Self {
            generator,
            prompt,
            policy,
            filter: ReasoningFilter,
        }
    }

    fn generate(&self, prompt: &str) -> Result<Generation, GenerationError> {
        let attempts = self.policy.attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.generator.generate(prompt) {
                Ok(generation) => return Ok(generation),
                Err(e) if e.is_retryable() && attempt < attempts => {
                    warn!(attempt, "generation failed, retrying: {}", e);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl Substitution for GenerativeSubstitution {
    fn corrupt(&mut self, text: &str) -> String {
        let prompt = self.prompt.render(text);
        match self.generate(&prompt) {
            Ok(generation) => {
                debug!(raw = %generation.response, "generation finished");
                let cleaned = self.filter.clean(&generation.response);
                if cleaned.is_empty() {
                    warn!("generation held nothing but reasoning, echoing input");
                    return text.to_string();
                }
                cleaned
            }
            Err(e) => {
                warn!("generation unavailable, echoing input: {}", e);
                text.to_string()
            }
        }
    }
}
