use crate::model::parse_date;
use crate::seed::SeedProfile;
use anyhow::{anyhow, Context};
use chrono::{NaiveDate, Utc};
use std::env;
use tracing::info;

pub struct Config {
    pub seed: SeedProfile,
    /// Pinned calendar day; `None` follows the UTC clock.
    pub today: Option<NaiveDate>,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let seed = match lookup("CLUBTRACK_SEED") {
            Some(raw) => SeedProfile::parse(&raw).ok_or_else(|| {
                anyhow!("CLUBTRACK_SEED must be demo, roster or empty, got {raw:?}")
            })?,
            None => {
                info!("CLUBTRACK_SEED not set, using default: demo");
                SeedProfile::Demo
            }
        };

        let today = match lookup("CLUBTRACK_TODAY") {
            Some(raw) if !raw.trim().is_empty() => Some(
                parse_date(&raw)
                    .with_context(|| format!("CLUBTRACK_TODAY must be YYYY-MM-DD, got {raw:?}"))?,
            ),
            _ => None,
        };

        Ok(Self { seed, today })
    }

    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Utc::now().date_naive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_to_demo_seed_and_live_clock() {
        let cfg = load(&[]).expect("config");
        assert_eq!(cfg.seed, SeedProfile::Demo);
        assert_eq!(cfg.today, None);
    }

    #[test]
    fn pinned_today_and_seed_are_parsed() {
        let cfg = load(&[("CLUBTRACK_SEED", "roster"), ("CLUBTRACK_TODAY", "2026-03-10")])
            .expect("config");
        assert_eq!(cfg.seed, SeedProfile::Roster);
        assert_eq!(cfg.today(), parse_date("2026-03-10").expect("date"));
    }

    #[test]
    fn invalid_values_are_startup_errors() {
        assert!(load(&[("CLUBTRACK_SEED", "huge")]).is_err());
        assert!(load(&[("CLUBTRACK_TODAY", "10/03/2026")]).is_err());
    }
}
