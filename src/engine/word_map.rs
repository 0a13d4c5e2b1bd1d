use crate::error::{MappingLoadError, MappingSaveError};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

const DEFAULT_ENTRIES: &[(&str, &[&str])] = &[
    ("知道", &["制道", "知到", "织导"]),
    ("错误", &["措误", "错悟", "厝误"]),
    ("输入", &["输乳", "酥入", "叔入"]),
    ("设备", &["设倍", "社备", "摄备"]),
    ("项目", &["向目", "项木", "相目"]),
    ("登记", &["蹬记", "登计", "等记"]),
    ("等级", &["蹬级", "等即", "登记"]),
    ("安全", &["安全", "鞍全", "案全"]),
    ("收容", &["收荣", "受容", "手容"]),
    ("措施", &["措失", "错施", "厝施"]),
    ("特殊", &["特书", "特舒", "忒殊"]),
    ("实验", &["实研", "试验", "实咽"]),
    ("记录", &["记路", "计录", "纪録"]),
    ("报告", &["报吿", "报羔", "報告"]),
    ("研究", &["研揪", "研九", "研就"]),
    ("使用", &["使佣", "实用", "史用"]),
    ("发现", &["发先", "法现", "髮现"]),
    ("立即", &["立既", "即刻", "立急"]),
    ("卸载", &["卸栽", "谢载", "泻载"]),
    ("软件", &["软见", "阮件", "朊件"]),
];

/// Trigger phrase → corrupted variants.
///
/// Every key is non-empty and maps to at least one variant. Variants may be
/// shared between keys. Entries keep the order they were inserted in, which
/// is the order of the file they came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordMap {
    entries: Vec<(String, Vec<String>)>,
}

impl Serialize for WordMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(k, v)| (k, v)))
    }
}

/// Produces the fallback map used whenever nothing can be loaded.
pub type DefaultsProvider = fn() -> WordMap;

impl WordMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in set. Never empty.
    pub fn defaults() -> Self {
        let mut map = Self::new();
        for (trigger, variants) in DEFAULT_ENTRIES {
            map.insert(*trigger, variants.iter().map(|v| v.to_string()).collect());
        }
        map
    }

    /// Adds an entry, ignoring it if it would break the map's invariants.
    /// An existing trigger keeps its position. Returns whether the entry was
    /// accepted.
    pub fn insert(&mut self, trigger: impl Into<String>, variants: Vec<String>) -> bool {
        let trigger = trigger.into();
        if trigger.is_empty() || variants.is_empty() {
            return false;
        }
        match self.entries.iter().position(|(k, _)| *k == trigger) {
            Some(i) => self.entries[i].1 = variants,
            None => self.entries.push((trigger, variants)),
        }
        true
    }

    pub fn from_json(raw: &str) -> Result<Self, MappingLoadError> {
        // serde_json is built with preserve_order, so this keeps file order
        let parsed: Map<String, Value> = serde_json::from_str(raw)?;
        let mut map = Self::new();
        for (trigger, value) in parsed {
            let variants: Vec<String> = serde_json::from_value(value)?;
            if !map.insert(trigger.clone(), variants) {
                warn!(trigger = %trigger, "dropping mapping entry with empty trigger or no variants");
            }
        }
        Ok(map)
    }

    /// Pretty JSON, two-space indent, non-ASCII kept literal.
    pub fn to_json(&self) -> Result<String, MappingSaveError> {
        serde_json::to_string_pretty(self).map_err(MappingSaveError::Encode)
    }

    pub fn variants(&self, trigger: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(k, _)| k == trigger)
            .map(|(_, v)| v.as_slice())
    }

    pub fn triggers(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reads the map from `store`. On any failure the defaults are used and
    /// written back to the store; a failed write is only logged.
    pub fn load(store: &dyn MappingStore, defaults: DefaultsProvider) -> Self {
        match store.load() {
            Ok(map) => {
                info!(entries = map.len(), source = %store.describe(), "loaded word map");
                map
            }
            Err(e) => {
                warn!(source = %store.describe(), "failed to load word map, using defaults: {}", e);
                let map = defaults();
                map.save(store);
                map
            }
        }
    }

    /// Best-effort persist.
    pub fn save(&self, store: &dyn MappingStore) {
        match store.save(self) {
            Ok(()) => info!(destination = %store.describe(), "saved word map"),
            Err(e) => warn!(destination = %store.describe(), "failed to save word map: {}", e),
        }
    }
}

/// Where a word map is persisted.
pub trait MappingStore: Send {
    fn load(&self) -> Result<WordMap, MappingLoadError>;
    fn save(&self, map: &WordMap) -> Result<(), MappingSaveError>;
    fn describe(&self) -> String;
}

/// A flat JSON object on disk.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl MappingStore for JsonFileStore {
    fn load(&self) -> Result<WordMap, MappingLoadError> {
        let raw = fs::read_to_string(&self.path)?;
        WordMap::from_json(&raw)
    }

    fn save(&self, map: &WordMap) -> Result<(), MappingSaveError> {
        let json = map.to_json()?;

        // create the data directory if it doesn't exist yet
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(MappingSaveError::Write)?;
            }
        }

        fs::write(&self.path, json).map_err(MappingSaveError::Write)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
