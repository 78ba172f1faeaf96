//! Application settings.
//!
//! `AppSettings` is loaded once at startup from a TOML file and owned for
//! the process lifetime. A missing or unparseable file is fatal: the
//! process refuses to start without credentials and topic routing ids.

use secrecy::SecretString;
use serde::Deserialize;

/// Static configuration for the gridhook process. Immutable after load;
/// shared behind an `Arc` by everything that needs it.
#[derive(Debug, Deserialize)]
pub struct AppSettings {
    /// Directory (tenant) id of the app registration.
    pub tenant_id: String,

    /// Application (client) id of the app registration.
    pub client_id: String,

    /// Client secret; never logged, redacted in Debug output.
    pub client_secret: SecretString,

    /// Cloud subscription id where the partner topic lives.
    pub azure_subscription_id: String,

    /// Resource group for the partner topic.
    pub resource_group: String,

    /// Name of the partner topic to route notifications to.
    pub partner_topic: String,

    /// Cloud location name for the partner topic.
    pub location: String,

    /// Shared secret placed on the subscription and echoed back with each
    /// notification. Not verified inbound in this system.
    #[serde(default = "default_client_state")]
    pub client_state: String,

    /// Directory-service base URL override (tests and sovereign clouds).
    #[serde(default)]
    pub graph_base_url: Option<String>,

    /// Token endpoint override (tests).
    #[serde(default)]
    pub token_url: Option<String>,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_client_state() -> String {
    "SomeSecretValue".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl AppSettings {
    /// The event-routing destination URI used as both notification URL and
    /// lifecycle notification URL on the subscription. The directory
    /// service resolves this scheme into deliveries to the partner topic.
    pub fn event_grid_destination(&self) -> String {
        format!(
            "EventGrid:?azuresubscriptionid={}&resourcegroup={}&partnertopic={}&location={}",
            self.azure_subscription_id, self.resource_group, self.partner_topic, self.location
        )
    }
}
