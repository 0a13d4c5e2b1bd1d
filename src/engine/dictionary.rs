use super::word_map::{DefaultsProvider, MappingStore, WordMap};
use super::{ReloadOutcome, Substitution};
use crate::utils::strings;
use rand::prelude::IndexedRandom;
use rand::Rng;
use tracing::debug;

/// Picks one variant out of a trigger's list.
pub trait VariantPicker: Send {
    fn pick<'a>(&mut self, variants: &'a [String]) -> Option<&'a str>;
}

/// Uniform choice backed by any rng.
pub struct RandomPicker<R> {
    rng: R,
}

impl<R: Rng + Send> RandomPicker<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng + Send> VariantPicker for RandomPicker<R> {
    fn pick<'a>(&mut self, variants: &'a [String]) -> Option<&'a str> {
        variants.choose(&mut self.rng).map(String::as_str)
    }
}

/// Literal, longest-trigger-first replacement over a [`WordMap`].
pub struct DictionarySubstitution {
    map: WordMap,
    store: Box<dyn MappingStore>,
    defaults: DefaultsProvider,
    picker: Box<dyn VariantPicker>,
}

impl DictionarySubstitution {
    pub fn new(
        store: Box<dyn MappingStore>,
        defaults: DefaultsProvider,
        picker: Box<dyn VariantPicker>,
    ) -> Self {
        let map = WordMap::load(store.as_ref(), defaults);
        Self {
            map,
            store,
            defaults,
            picker,
        }
    }

    pub fn map(&self) -> &WordMap {
        &self.map
    }
}

/// Triggers ordered longest first (in characters). Equal lengths keep the
/// map's insertion order.
fn ordered_triggers(map: &WordMap) -> Vec<&str> {
    let mut triggers: Vec<&str> = map.triggers().collect();
    triggers.sort_by(|a, b| strings::char_len(b).cmp(&strings::char_len(a)));
    triggers
}

impl Substitution for DictionarySubstitution {
    fn corrupt(&mut self, text: &str) -> String {
        let mut result = text.to_string();

        for trigger in ordered_triggers(&self.map) {
            if !result.contains(trigger) {
                continue;
            }
            let Some(variants) = self.map.variants(trigger) else { continue };
            // one draw per trigger: every occurrence gets the same variant
            if let Some(typo) = self.picker.pick(variants) {
                debug!(trigger, typo, "substituting");
                result = result.replace(trigger, typo);
            }
        }

        result
    }

    fn reload(&mut self) -> ReloadOutcome {
        self.map = WordMap::load(self.store.as_ref(), self.defaults);
        ReloadOutcome::Reloaded {
            entries: self.map.len(),
        }
    }

    fn samples(&mut self, limit: usize) -> Vec<(String, String)> {
        let mut samples = Vec::new();
        for (trigger, variants) in self.map.iter().take(limit) {
            if let Some(typo) = self.picker.pick(variants) {
                samples.push((trigger.to_string(), typo.to_string()));
            }
        }
        samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{MappingLoadError, MappingSaveError};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeSet;
    use std::sync::{Arc, Mutex};

    /// In-memory store whose contents tests can swap out between reloads.
    #[derive(Clone, Default)]
    struct MemoryStore {
        content: Arc<Mutex<Option<WordMap>>>,
    }

    impl MemoryStore {
        fn with(map: WordMap) -> Self {
            Self {
                content: Arc::new(Mutex::new(Some(map))),
            }
        }

        fn replace(&self, map: WordMap) {
            *self.content.lock().unwrap() = Some(map);
        }
    }

    impl MappingStore for MemoryStore {
        fn load(&self) -> Result<WordMap, MappingLoadError> {
            self.content.lock().unwrap().clone().ok_or_else(|| {
                MappingLoadError::Read(std::io::Error::from(std::io::ErrorKind::NotFound))
            })
        }

        fn save(&self, map: &WordMap) -> Result<(), MappingSaveError> {
            *self.content.lock().unwrap() = Some(map.clone());
            Ok(())
        }

        fn describe(&self) -> String {
            "memory".to_string()
        }
    }

    /// Always takes the last variant.
    struct LastPicker;

    impl VariantPicker for LastPicker {
        fn pick<'a>(&mut self, variants: &'a [String]) -> Option<&'a str> {
            variants.last().map(String::as_str)
        }
    }

    fn map_of(entries: &[(&str, &[&str])]) -> WordMap {
        let mut map = WordMap::new();
        for (k, vs) in entries {
            map.insert(*k, vs.iter().map(|v| v.to_string()).collect());
        }
        map
    }

    fn seeded(map: WordMap, seed: u64) -> DictionarySubstitution {
        DictionarySubstitution::new(
            Box::new(MemoryStore::with(map)),
            WordMap::defaults,
            Box::new(RandomPicker::new(StdRng::seed_from_u64(seed))),
        )
    }

    fn fixed(map: WordMap) -> DictionarySubstitution {
        DictionarySubstitution::new(
            Box::new(MemoryStore::with(map)),
            WordMap::defaults,
            Box::new(LastPicker),
        )
    }

    #[test]
    fn test_no_trigger_is_identity() {
        let mut sub = seeded(WordMap::defaults(), 1);
        for text in ["", "hello world", "今天天气很好", "  spaced  "] {
            assert_eq!(sub.corrupt(text), text);
        }
    }

    #[test]
    fn test_empty_map_is_identity() {
        let mut sub = seeded(WordMap::new(), 1);
        assert!(sub.map().is_empty());
        assert_eq!(sub.corrupt("这是一个错误"), "这是一个错误");
    }

    #[test]
    fn test_end_to_end_example() {
        let map = map_of(&[("错误", &["错悟", "厝误"])]);
        let mut sub = seeded(map, 7);
        for _ in 0..50 {
            let out = sub.corrupt("这是一个错误");
            assert!(out == "这是一个错悟" || out == "这是一个厝误", "got {}", out);
        }
    }

    #[test]
    fn test_single_trigger_outputs_cover_exactly_its_variants() {
        let map = WordMap::defaults();
        let mut sub = seeded(map.clone(), 42);
        let expected: BTreeSet<String> = map.variants("知道").unwrap().iter().cloned().collect();

        let seen: BTreeSet<String> = (0..300).map(|_| sub.corrupt("知道")).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_longer_trigger_wins() {
        let map = map_of(&[("知道", &["织导"]), ("道", &["刀"])]);
        let mut sub = fixed(map);
        assert_eq!(sub.corrupt("我知道了"), "我织导了");
        assert_eq!(sub.corrupt("道路"), "刀路");
    }

    #[test]
    fn test_triggers_sorted_by_char_length() {
        // "abcd" has fewer bytes than "错误道" but more characters
        let map = map_of(&[("abcd", &["x"]), ("错误道", &["y"]), ("z", &["w"])]);
        assert_eq!(ordered_triggers(&map), vec!["abcd", "错误道", "z"]);
        let map = map_of(&[("ab", &["x"]), ("错误道", &["y"])]);
        assert_eq!(ordered_triggers(&map), vec!["错误道", "ab"]);
    }

    #[test]
    fn test_equal_lengths_keep_insertion_order() {
        let map = map_of(&[("知道", &["x"]), ("安全", &["y"]), ("错误", &["z"])]);
        assert_eq!(ordered_triggers(&map), vec!["知道", "安全", "错误"]);
    }

    #[test]
    fn test_all_occurrences_share_one_variant() {
        let map = map_of(&[("错误", &["错悟", "厝误"])]);
        let mut sub = seeded(map, 3);
        for _ in 0..50 {
            let out = sub.corrupt("错误又错误");
            assert!(out == "错悟又错悟" || out == "厝误又厝误", "got {}", out);
        }
    }

    #[test]
    fn test_matching_ignores_word_boundaries() {
        let map = map_of(&[("cat", &["kat"])]);
        let mut sub = fixed(map);
        assert_eq!(sub.corrupt("concatenate"), "conkatenate");
    }

    #[test]
    fn test_reload_replaces_map_wholesale() {
        let store = MemoryStore::with(map_of(&[("错误", &["错悟"])]));
        let mut sub = DictionarySubstitution::new(
            Box::new(store.clone()),
            WordMap::defaults,
            Box::new(LastPicker),
        );
        assert_eq!(sub.corrupt("错误 知道"), "错悟 知道");

        store.replace(map_of(&[("知道", &["制道"])]));
        assert_eq!(sub.reload(), ReloadOutcome::Reloaded { entries: 1 });
        assert_eq!(sub.corrupt("错误 知道"), "错误 制道");
    }

    #[test]
    fn test_missing_store_falls_back_to_defaults_and_persists() {
        let store = MemoryStore::default();
        let sub = DictionarySubstitution::new(
            Box::new(store.clone()),
            WordMap::defaults,
            Box::new(LastPicker),
        );
        assert_eq!(sub.map(), &WordMap::defaults());
        assert_eq!(store.load().unwrap(), WordMap::defaults());
    }

    #[test]
    fn test_samples_take_first_entries() {
        let map = map_of(&[("a", &["1"]), ("b", &["2"]), ("c", &["3"])]);
        let mut sub = fixed(map);
        assert_eq!(
            sub.samples(2),
            vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "2".to_string())
            ]
        );
    }

    #[test]
    fn test_default_samples_follow_built_in_order() {
        let mut sub = fixed(WordMap::defaults());
        let triggers: Vec<String> = sub.samples(5).into_iter().map(|(t, _)| t).collect();
        assert_eq!(triggers, ["知道", "错误", "输入", "设备", "项目"]);
    }
}
