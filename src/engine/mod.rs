pub mod dictionary;
pub mod filter;
pub mod generative;
pub mod ollama;
pub mod word_map;

use crate::config::AppConfig;
use crate::models::Mode;
use dictionary::{DictionarySubstitution, RandomPicker, VariantPicker};
use generative::{GenerativeSubstitution, Generator, PersonaPrompt, RetryPolicy};
use ollama::OllamaClient;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;
use word_map::{JsonFileStore, MappingStore, WordMap};

/// Result of asking the engine to reload its mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReloadOutcome {
    Reloaded { entries: usize },
    NotApplicable,
}

/// One way of turning typed text into garbled text.
pub trait Substitution: Send {
    fn corrupt(&mut self, text: &str) -> String;

    fn reload(&mut self) -> ReloadOutcome {
        ReloadOutcome::NotApplicable
    }

    /// A few `(trigger, variant)` pairs to show the user.
    fn samples(&mut self, _limit: usize) -> Vec<(String, String)> {
        Vec::new()
    }
}

/// The single entry point the front end talks to. The strategy is fixed at
/// construction.
pub struct SubstitutionEngine {
    mode: Mode,
    strategy: Box<dyn Substitution>,
}

impl SubstitutionEngine {
    pub fn dictionary(store: Box<dyn MappingStore>, picker: Box<dyn VariantPicker>) -> Self {
        Self {
            mode: Mode::Dictionary,
            strategy: Box::new(DictionarySubstitution::new(store, WordMap::defaults, picker)),
        }
    }

    pub fn generative(
        generator: Box<dyn Generator>,
        prompt: PersonaPrompt,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            mode: Mode::Generative,
            strategy: Box::new(GenerativeSubstitution::new(generator, prompt, policy)),
        }
    }

    /// Wires the production collaborators for `mode` from configuration.
    pub fn from_config(mode: Mode, config: &AppConfig) -> Self {
        match mode {
            Mode::Dictionary => Self::dictionary(
                Box::new(JsonFileStore::new(config.mapping_path())),
                Box::new(RandomPicker::new(StdRng::from_os_rng())),
            ),
            Mode::Generative => {
                let generative = &config.generative;
                let client = OllamaClient::new(
                    &generative.endpoint,
                    generative.model.clone(),
                    Duration::from_secs(generative.timeout_secs),
                );
                Self::generative(
                    Box::new(client),
                    PersonaPrompt::default(),
                    RetryPolicy::new(generative.attempts),
                )
            }
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn corrupt(&mut self, text: &str) -> String {
        self.strategy.corrupt(text)
    }

    pub fn reload(&mut self) -> ReloadOutcome {
        self.strategy.reload()
    }

    pub fn samples(&mut self, limit: usize) -> Vec<(String, String)> {
        self.strategy.samples(limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenerationError;
    use crate::engine::generative::Generation;
    use tempfile::TempDir;

    struct FirstPicker;

    impl VariantPicker for FirstPicker {
        fn pick<'a>(&mut self, variants: &'a [String]) -> Option<&'a str> {
            variants.first().map(String::as_str)
        }
    }

    struct Down;

    impl Generator for Down {
        fn generate(&self, _prompt: &str) -> Result<Generation, GenerationError> {
            Err(GenerationError::Transport("connection refused".to_string()))
        }
    }

    struct Echo;

    impl Generator for Echo {
        fn generate(&self, prompt: &str) -> Result<Generation, GenerationError> {
            let text = prompt.rsplit('：').next().unwrap_or_default();
            Ok(Generation {
                response: format!("{}\n（完）", text),
            })
        }
    }

    #[test]
    fn test_dictionary_engine_corrupts_and_reloads() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("word_mapping.json");
        std::fs::write(&path, r#"{"错误": ["错悟", "厝误"]}"#).unwrap();

        let mut engine =
            SubstitutionEngine::dictionary(Box::new(JsonFileStore::new(&path)), Box::new(FirstPicker));
        assert_eq!(engine.mode(), Mode::Dictionary);
        assert_eq!(engine.corrupt("这是一个错误"), "这是一个错悟");

        std::fs::write(&path, r#"{"知道": ["制道"], "输入": ["输乳"]}"#).unwrap();
        assert_eq!(engine.reload(), ReloadOutcome::Reloaded { entries: 2 });
        assert_eq!(engine.corrupt("这是一个错误"), "这是一个错误");
        assert_eq!(engine.corrupt("我知道"), "我制道");
        assert_eq!(engine.samples(5).len(), 2);
    }

    #[test]
    fn test_generative_engine_falls_back_on_failure() {
        let mut engine =
            SubstitutionEngine::generative(Box::new(Down), PersonaPrompt::default(), RetryPolicy::new(2));
        assert_eq!(engine.mode(), Mode::Generative);
        assert_eq!(engine.corrupt("测试"), "测试");
        assert_eq!(engine.reload(), ReloadOutcome::NotApplicable);
    }

    #[test]
    fn test_generative_engine_cleans_output() {
        let mut engine =
            SubstitutionEngine::generative(Box::new(Echo), PersonaPrompt::new("输入："), RetryPolicy::default());
        assert_eq!(engine.corrupt("你好"), "你好 （完）");
    }
}
