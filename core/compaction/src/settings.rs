//! Configuration for when and how the compaction engine runs.

use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

fn default_reserve_tokens() -> u64 {
    16_384
}

fn default_keep_recent_tokens() -> u64 {
    20_000
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompactionSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_reserve_tokens")]
    pub reserve_tokens: u64,
    #[serde(default = "default_keep_recent_tokens")]
    pub keep_recent_tokens: u64,
}

impl Default for CompactionSettings {
    fn default() -> Self {
        Self { enabled: default_true(), reserve_tokens: default_reserve_tokens(), keep_recent_tokens: default_keep_recent_tokens() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompactionMode {
    Auto,
    Manual,
}

#[derive(Debug, Clone)]
pub struct CompactionConfig {
    pub context_window: u64,
    pub mode: CompactionMode,
    pub settings: CompactionSettings,
}

impl CompactionConfig {
    pub fn should_compact(&self, tokens: u64) -> bool {
        forge_tokens::should_compact(tokens, self.context_window, self.settings.reserve_tokens, self.settings.enabled)
    }
}

#[cfg(test)]
#[path = "settings.test.rs"]
mod tests;
