//! Usage: Linked-account counts per provider, the authoritative "connected" signal for the UI.

use crate::domain::providers::Provider;
use serde::{Deserialize, Serialize};

/// Snapshot of how many accounts are linked for each provider.
///
/// Counts are never computed locally; they are fetched from the backend and
/// committed wholesale by the connect coordinator after a connect/disconnect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthStatus {
    pub claude: u32,
    pub openai: u32,
    pub gemini: u32,
    pub qwen: u32,
    pub iflow: u32,
    pub vertex: u32,
    pub antigravity: u32,
}

impl AuthStatus {
    pub fn count_for(&self, provider: Provider) -> u32 {
        match provider {
            Provider::Claude => self.claude,
            Provider::Openai => self.openai,
            Provider::Gemini => self.gemini,
            Provider::Qwen => self.qwen,
            Provider::Iflow => self.iflow,
            Provider::Vertex => self.vertex,
            Provider::Antigravity => self.antigravity,
        }
    }

    pub fn set_count(&mut self, provider: Provider, count: u32) {
        match provider {
            Provider::Claude => self.claude = count,
            Provider::Openai => self.openai = count,
            Provider::Gemini => self.gemini = count,
            Provider::Qwen => self.qwen = count,
            Provider::Iflow => self.iflow = count,
            Provider::Vertex => self.vertex = count,
            Provider::Antigravity => self.antigravity = count,
        }
    }

    pub fn is_connected(&self, provider: Provider) -> bool {
        self.count_for(provider) > 0
    }
}
