use serde::Deserialize;
use chansub_core::error::{ChanSubError, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub subscriber: SubscriberSection,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            version: 1,
            server: ServerSection::default(),
            subscriber: SubscriberSection::default(),
        }
    }
}

impl ClientConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(ChanSubError::BadConfig(format!(
                "unsupported config version: {}",
                self.version
            )));
        }

        self.server.validate()?;
        self.subscriber.validate()?;

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    /// WebSocket endpoint, consumed once per connection creation.
    #[serde(default = "default_url")]
    pub url: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self { url: default_url() }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        if !(self.url.starts_with("ws://") || self.url.starts_with("wss://")) {
            return Err(ChanSubError::BadConfig(
                "server.url must start with ws:// or wss://".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubscriberSection {
    #[serde(default = "default_channel")]
    pub default_channel: String,
}

impl Default for SubscriberSection {
    fn default() -> Self {
        Self {
            default_channel: default_channel(),
        }
    }
}

impl SubscriberSection {
    pub fn validate(&self) -> Result<()> {
        if self.default_channel.is_empty() {
            return Err(ChanSubError::BadConfig(
                "subscriber.default_channel must not be empty".into(),
            ));
        }
        Ok(())
    }
}

fn default_url() -> String {
    "ws://127.0.0.1:8080/ws".into()
}
fn default_channel() -> String {
    "test-channel".into()
}
