pub mod cutout;
pub mod proxy;

use serde::{Deserialize, Serialize};

pub use cutout::CutoutEditor;
pub use proxy::{
    handle_remove_bg, ProxyResponse, RemoveBgRequest, Upstream, UpstreamError, UpstreamRequest,
    UpstreamResponse, UploadedFile,
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoveBgConfig {
    pub endpoint: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Explicit key; takes precedence over the environment.
    pub api_key: Option<String>,
}

impl Default for RemoveBgConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.remove.bg/v1.0/removebg".into(),
            api_key_env: "REMOVEBG_API_KEY".into(),
            api_key: None,
        }
    }
}

impl RemoveBgConfig {
    /// The configured key, else the environment variable, else empty.
    pub fn resolve_api_key(&self) -> String {
        self.api_key
            .clone()
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .unwrap_or_default()
    }
}
