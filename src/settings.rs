use serde::{Deserialize, Serialize};

fn default_charset() -> String {
    "utf8mb4".to_string()
}

fn default_autocommit() -> bool {
    true
}

/// Connection settings handed to the client at construction.
///
/// Hosts usually deserialize this from their configuration layer; the four
/// required fields mirror the usual MySQL client arguments. `driver` picks
/// a registered driver by name; leaving it unset lets the registry resolve
/// one in registration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectSettings {
    pub user: String,
    pub passwd: String,
    pub host: String,
    pub db: String,
    #[serde(default)]
    pub driver: Option<String>,
    #[serde(default = "default_charset")]
    pub charset: String,
    /// Autocommit flag applied to connections opened outside a
    /// transaction. Transactions always disable autocommit.
    #[serde(default = "default_autocommit")]
    pub autocommit: bool,
}

impl ConnectSettings {
    pub fn new(
        user: impl Into<String>,
        passwd: impl Into<String>,
        host: impl Into<String>,
        db: impl Into<String>,
    ) -> Self {
        Self {
            user: user.into(),
            passwd: passwd.into(),
            host: host.into(),
            db: db.into(),
            driver: None,
            charset: default_charset(),
            autocommit: default_autocommit(),
        }
    }

    /// Pins the driver by registered name.
    pub fn with_driver(mut self, name: impl Into<String>) -> Self {
        self.driver = Some(name.into());
        self
    }

    pub fn with_charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = charset.into();
        self
    }

    pub fn with_autocommit(mut self, autocommit: bool) -> Self {
        self.autocommit = autocommit;
        self
    }

    /// Options for one physical connection, with the effective autocommit
    /// flag the engine decided for it.
    pub(crate) fn connect_options(&self, autocommit: bool) -> ConnectOptions {
        ConnectOptions {
            user: self.user.clone(),
            passwd: self.passwd.clone(),
            host: self.host.clone(),
            db: self.db.clone(),
            charset: self.charset.clone(),
            autocommit,
        }
    }
}

/// What a driver receives when dialing one connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectOptions {
    pub user: String,
    pub passwd: String,
    pub host: String,
    pub db: String,
    pub charset: String,
    pub autocommit: bool,
}
