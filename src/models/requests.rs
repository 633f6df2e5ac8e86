//! Query-string DTOs for the card endpoints
//!
//! Parameter names follow the public API (`aboutMe`, `extraData`), so every
//! field is optional at the serde level and checked by the accessors here.

use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::format::{abbreviate, parse_amount};
use crate::images::is_remote;

/// User shown when `/api/perfil` is called without `id`
pub const DEFAULT_PROFILE_ID: &str = "1159667835761594449";
pub const DEFAULT_STATUS: &str = "Solteiro(a)";
pub const DEFAULT_ABOUT_ME: &str = "Sou um entusiasta\nem tecnologia.";

/// Minimum number of valid `id:coins` entries in `extraData`
pub const MIN_PODIUM_ENTRIES: usize = 3;
/// Minimum number of valid `id:coins` entries in `data`
pub const MIN_LIST_ENTRIES: usize = 5;

/// Treats blank query values as absent.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Query for `GET /api/perfil`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileQuery {
    pub id: Option<String>,
    pub coins: Option<String>,
    pub reps: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "aboutMe")]
    pub about_me: Option<String>,
    /// Banner locator (URL)
    pub banner: Option<String>,
    /// `true` returns the profile as JSON instead of PNG
    pub json: Option<String>,
}

impl ProfileQuery {
    pub fn user_id(&self) -> &str {
        present(&self.id).unwrap_or(DEFAULT_PROFILE_ID)
    }

    /// Abbreviated coins, `"0"` when absent.
    pub fn coins(&self) -> Result<String> {
        abbreviated("coins", &self.coins)
    }

    /// Abbreviated reputation, `"0"` when absent.
    pub fn reps(&self) -> Result<String> {
        abbreviated("reps", &self.reps)
    }

    pub fn status(&self) -> &str {
        present(&self.status).unwrap_or(DEFAULT_STATUS)
    }

    pub fn about_me(&self) -> &str {
        present(&self.about_me).unwrap_or(DEFAULT_ABOUT_ME)
    }

    /// The banner URL. Anything other than an `http(s)` URL is ignored, so
    /// callers can never point the loader at a server-side path.
    pub fn banner(&self) -> Option<&str> {
        present(&self.banner)
            .map(str::trim)
            .filter(|banner| is_remote(banner))
    }

    pub fn wants_json(&self) -> bool {
        self.json.as_deref() == Some("true")
    }
}

fn abbreviated(field: &str, raw: &Option<String>) -> Result<String> {
    match present(raw) {
        Some(raw) => abbreviate(parse_amount(field, raw)?),
        None => Ok("0".to_string()),
    }
}

/// One `id:coins` pair of a leaderboard.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedEntry {
    pub id: String,
    pub coins: f64,
}

/// Parses a comma-separated `id:coins` list.
///
/// Entries with an empty id or a non-numeric amount are dropped. The result
/// is sorted by coins, highest first.
pub fn parse_ranked_entries(raw: &str) -> Vec<RankedEntry> {
    let mut entries: Vec<RankedEntry> = raw
        .split(',')
        .filter_map(|entry| {
            let mut parts = entry.split(':');
            let id = parts.next()?.trim();
            let coins = parts.next()?;
            if id.is_empty() {
                return None;
            }
            let coins = parse_amount("coins", coins).ok()?;
            Some(RankedEntry {
                id: id.to_string(),
                coins,
            })
        })
        .collect();

    entries.sort_by(|a, b| b.coins.total_cmp(&a.coins));
    entries
}

/// Query for `GET /api/rank`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RankQuery {
    /// Podium entries
    #[serde(rename = "extraData")]
    pub extra_data: Option<String>,
    /// List entries
    pub data: Option<String>,
    /// Cache-buster sent by some clients; ignored
    pub timestamp: Option<String>,
}

/// A validated leaderboard request.
#[derive(Debug, Clone, PartialEq)]
pub struct RankRequest {
    /// Key of the rendered image in the rank cache
    pub cache_key: String,
    pub podium: Vec<RankedEntry>,
    pub list: Vec<RankedEntry>,
}

impl RankQuery {
    /// Checks presence and entry counts of both lists.
    pub fn validate(&self) -> Result<RankRequest> {
        let (Some(extra_data), Some(data)) = (present(&self.extra_data), present(&self.data))
        else {
            return Err(AppError::Validation(
                "Parameters \"extraData\" and \"data\" are required".to_string(),
            ));
        };

        let podium = parse_ranked_entries(extra_data);
        if podium.len() < MIN_PODIUM_ENTRIES {
            return Err(AppError::Validation(format!(
                "At least {} valid users are required in \"extraData\"",
                MIN_PODIUM_ENTRIES
            )));
        }

        let list = parse_ranked_entries(data);
        if list.len() < MIN_LIST_ENTRIES {
            return Err(AppError::Validation(format!(
                "At least {} valid users are required in \"data\"",
                MIN_LIST_ENTRIES
            )));
        }

        Ok(RankRequest {
            cache_key: format!("{}_{}", extra_data, data),
            podium,
            list,
        })
    }
}

/// Query for `GET /api/atm`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AtmQuery {
    pub user: Option<String>,
    pub coins: Option<String>,
    pub bank: Option<String>,
}

/// A validated ATM request with amounts already abbreviated.
#[derive(Debug, Clone, PartialEq)]
pub struct AtmRequest {
    pub user: String,
    pub coins: String,
    pub bank: String,
}

impl AtmQuery {
    pub fn validate(&self) -> Result<AtmRequest> {
        let (Some(user), Some(coins), Some(bank)) =
            (present(&self.user), present(&self.coins), present(&self.bank))
        else {
            return Err(AppError::Validation(
                "Parameters \"user\", \"coins\" and \"bank\" are required".to_string(),
            ));
        };

        Ok(AtmRequest {
            user: user.trim().to_string(),
            coins: abbreviate(parse_amount("coins", coins)?)?,
            bank: abbreviate(parse_amount("bank", bank)?)?,
        })
    }
}
