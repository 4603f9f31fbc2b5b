//! Usage: Upstream provider identifiers and their connection kinds.

use serde::{Deserialize, Serialize};

const PROVIDER_CLAUDE: &str = "claude";
const PROVIDER_OPENAI: &str = "openai";
const PROVIDER_GEMINI: &str = "gemini";
const PROVIDER_QWEN: &str = "qwen";
const PROVIDER_IFLOW: &str = "iflow";
const PROVIDER_VERTEX: &str = "vertex";
const PROVIDER_ANTIGRAVITY: &str = "antigravity";

/// How accounts for a provider are linked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionKind {
    /// Browser-based OAuth flow driven by the connect coordinator.
    OAuth,
    /// One-shot import of a local credential file (service accounts).
    CredentialFile,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    Claude,
    Openai,
    Gemini,
    Qwen,
    Iflow,
    Vertex,
    Antigravity,
}

pub const ALL_PROVIDERS: [Provider; 7] = [
    Provider::Claude,
    Provider::Openai,
    Provider::Gemini,
    Provider::Qwen,
    Provider::Iflow,
    Provider::Vertex,
    Provider::Antigravity,
];

impl Provider {
    pub(crate) fn parse_strict(raw: &str) -> Option<Self> {
        match raw.trim() {
            PROVIDER_CLAUDE => Some(Self::Claude),
            PROVIDER_OPENAI => Some(Self::Openai),
            PROVIDER_GEMINI => Some(Self::Gemini),
            PROVIDER_QWEN => Some(Self::Qwen),
            PROVIDER_IFLOW => Some(Self::Iflow),
            PROVIDER_VERTEX => Some(Self::Vertex),
            PROVIDER_ANTIGRAVITY => Some(Self::Antigravity),
            _ => None,
        }
    }

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Claude => PROVIDER_CLAUDE,
            Self::Openai => PROVIDER_OPENAI,
            Self::Gemini => PROVIDER_GEMINI,
            Self::Qwen => PROVIDER_QWEN,
            Self::Iflow => PROVIDER_IFLOW,
            Self::Vertex => PROVIDER_VERTEX,
            Self::Antigravity => PROVIDER_ANTIGRAVITY,
        }
    }

    /// Name shown in notifications ("Claude connected!").
    pub(crate) fn display_name(self) -> &'static str {
        match self {
            Self::Claude => "Claude",
            Self::Openai => "ChatGPT",
            Self::Gemini => "Gemini",
            Self::Qwen => "Qwen",
            Self::Iflow => "iFlow",
            Self::Vertex => "Vertex AI",
            Self::Antigravity => "Antigravity",
        }
    }

    pub(crate) fn connection_kind(self) -> ConnectionKind {
        match self {
            Self::Vertex => ConnectionKind::CredentialFile,
            _ => ConnectionKind::OAuth,
        }
    }
}

/// Catalog entry consumed by the dashboard's provider cards.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderInfo {
    pub provider: Provider,
    pub name: &'static str,
    pub oauth: bool,
}

pub(crate) fn catalog() -> Vec<ProviderInfo> {
    ALL_PROVIDERS
        .iter()
        .map(|&provider| ProviderInfo {
            provider,
            name: provider.display_name(),
            oauth: provider.connection_kind() == ConnectionKind::OAuth,
        })
        .collect()
}
