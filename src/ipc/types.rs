use crate::config::Config;
use crate::model::User;
use crate::store::Store;
use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    pub store: Store,
    /// Account signed in through `auth.login`.
    pub session: Option<User>,
    pub config: Config,
}

impl AppState {
    pub fn new(store: Store, config: Config) -> Self {
        Self {
            store,
            session: None,
            config,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.config.today()
    }
}
