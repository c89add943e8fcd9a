//! Domain types for the accounting engine
//!
//! Rows are read through `*Row` structs holding TEXT ids and converted into
//! domain types via `TryFrom`, so a corrupt id surfaces as an error instead
//! of a panic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::{Error, Result};

// ============================================================================
// Team
// ============================================================================

/// A team holding a token quota and a running usage counter.
///
/// `usage` is a separately maintained counter. Appending a usage record does
/// NOT increment it; the quota/update operations are the only writers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    /// Unique team ID
    pub id: Uuid,
    /// Team name
    pub name: String,
    /// Maximum token budget
    pub quota: i64,
    /// Cumulative tokens consumed so far
    pub usage: i64,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Team {
    /// Create a new team with usage initialized to zero
    pub fn new(name: impl Into<String>, quota: i64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            quota,
            usage: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Parameters for creating a team
#[derive(Debug, Clone, Deserialize)]
pub struct NewTeam {
    pub name: String,
    pub quota: i64,
}

impl NewTeam {
    pub(crate) fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::validation("name", "must not be empty"));
        }
        if self.quota < 0 {
            return Err(Error::validation("quota", "must be non-negative"));
        }
        Ok(())
    }
}

/// Parameters for updating a team. Both fields are overwritten; `usage` is
/// untouched.
#[derive(Debug, Clone, Deserialize)]
pub struct TeamUpdate {
    pub name: String,
    pub quota: i64,
}

impl TeamUpdate {
    pub(crate) fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::validation("name", "must not be empty"));
        }
        if self.quota < 0 {
            return Err(Error::validation("quota", "must be non-negative"));
        }
        Ok(())
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct TeamRow {
    pub id: String,
    pub name: String,
    pub quota: i64,
    pub usage: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<TeamRow> for Team {
    type Error = Error;

    fn try_from(row: TeamRow) -> Result<Team> {
        Ok(Team {
            id: parse_id(&row.id)?,
            name: row.name,
            quota: row.quota,
            usage: row.usage,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

// ============================================================================
// Model
// ============================================================================

/// An LLM model definition with its per-token cost.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmModel {
    /// Unique model ID
    pub id: Uuid,
    /// Model name (e.g. "gpt-4")
    pub name: String,
    /// Provider name (e.g. "OpenAI")
    pub provider: String,
    /// Cost per token in USD
    pub cost_per_token: f64,
    /// Provider API key, never exposed in serialized form
    #[serde(skip_serializing, default)]
    pub api_key: Option<String>,
    /// Whether the model is available for use
    pub is_active: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Parameters for registering a model
#[derive(Debug, Clone, Deserialize)]
pub struct NewModel {
    pub name: String,
    pub provider: String,
    pub cost_per_token: f64,
    pub api_key: Option<String>,
    /// Defaults to true when absent
    pub is_active: Option<bool>,
}

impl NewModel {
    pub(crate) fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::validation("name", "must not be empty"));
        }
        if self.provider.trim().is_empty() {
            return Err(Error::validation("provider", "must not be empty"));
        }
        if !(self.cost_per_token > 0.0) {
            return Err(Error::validation("cost_per_token", "must be positive"));
        }
        Ok(())
    }
}

/// Parameters for updating a model.
///
/// `name`, `provider` and `cost_per_token` are overwritten unconditionally.
/// `api_key` and `is_active` follow partial-update semantics: `None` means
/// "don't change", never "set to empty".
#[derive(Debug, Clone, Deserialize)]
pub struct ModelUpdate {
    pub name: String,
    pub provider: String,
    pub cost_per_token: f64,
    pub api_key: Option<String>,
    pub is_active: Option<bool>,
}

impl ModelUpdate {
    pub(crate) fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::validation("name", "must not be empty"));
        }
        if self.provider.trim().is_empty() {
            return Err(Error::validation("provider", "must not be empty"));
        }
        if !(self.cost_per_token > 0.0) {
            return Err(Error::validation("cost_per_token", "must be positive"));
        }
        Ok(())
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct ModelRow {
    pub id: String,
    pub name: String,
    pub provider: String,
    pub cost_per_token: f64,
    pub api_key: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ModelRow> for LlmModel {
    type Error = Error;

    fn try_from(row: ModelRow) -> Result<LlmModel> {
        Ok(LlmModel {
            id: parse_id(&row.id)?,
            name: row.name,
            provider: row.provider,
            cost_per_token: row.cost_per_token,
            api_key: row.api_key,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

// ============================================================================
// Usage record
// ============================================================================

/// One append-only ledger entry attributing a token count and a snapshot
/// cost to a team/model pair at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageRecord {
    /// Unique record ID
    pub id: Uuid,
    /// Owning team
    pub team_id: Uuid,
    /// Model the tokens were spent on
    pub model_id: Uuid,
    /// Tokens consumed
    pub tokens: i64,
    /// Cost at insert time. Caller-supplied; never recomputed against the
    /// model's current per-token cost.
    pub cost: f64,
    /// When the consumption happened
    pub used_at: DateTime<Utc>,
}

/// Parameters for appending a usage record
#[derive(Debug, Clone, Deserialize)]
pub struct NewUsage {
    pub team_id: Uuid,
    pub model_id: Uuid,
    pub tokens: i64,
    pub cost: f64,
    /// Defaults to the current time when absent
    pub used_at: Option<DateTime<Utc>>,
}

impl NewUsage {
    pub(crate) fn validate(&self) -> Result<()> {
        if self.tokens <= 0 {
            return Err(Error::validation("tokens", "must be positive"));
        }
        if self.cost < 0.0 {
            return Err(Error::validation("cost", "must be non-negative"));
        }
        Ok(())
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct UsageRow {
    pub id: String,
    pub team_id: String,
    pub model_id: String,
    pub tokens: i64,
    pub cost: f64,
    pub used_at: DateTime<Utc>,
}

impl TryFrom<UsageRow> for UsageRecord {
    type Error = Error;

    fn try_from(row: UsageRow) -> Result<UsageRecord> {
        Ok(UsageRecord {
            id: parse_id(&row.id)?,
            team_id: parse_id(&row.team_id)?,
            model_id: parse_id(&row.model_id)?,
            tokens: row.tokens,
            cost: row.cost,
            used_at: row.used_at,
        })
    }
}

fn parse_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|e| Error::Internal(format!("invalid id in row '{raw}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_team_starts_at_zero_usage() {
        let team = Team::new("AI Research Team", 10_000);
        assert_eq!(team.usage, 0);
        assert_eq!(team.quota, 10_000);
        assert_eq!(team.created_at, team.updated_at);
    }

    #[test]
    fn test_new_team_validation() {
        assert!(NewTeam {
            name: "platform".into(),
            quota: 0
        }
        .validate()
        .is_ok());

        let err = NewTeam {
            name: "  ".into(),
            quota: 100
        }
        .validate()
        .unwrap_err();
        assert!(matches!(err, Error::Validation { field: "name", .. }));

        let err = NewTeam {
            name: "platform".into(),
            quota: -1
        }
        .validate()
        .unwrap_err();
        assert!(matches!(err, Error::Validation { field: "quota", .. }));
    }

    #[test]
    fn test_new_model_validation() {
        let valid = NewModel {
            name: "gpt-4".into(),
            provider: "OpenAI".into(),
            cost_per_token: 0.0001,
            api_key: None,
            is_active: None,
        };
        assert!(valid.validate().is_ok());

        let mut zero_cost = valid.clone();
        zero_cost.cost_per_token = 0.0;
        assert!(matches!(
            zero_cost.validate().unwrap_err(),
            Error::Validation {
                field: "cost_per_token",
                ..
            }
        ));

        let mut nan_cost = valid.clone();
        nan_cost.cost_per_token = f64::NAN;
        assert!(nan_cost.validate().is_err());

        let mut no_provider = valid;
        no_provider.provider = String::new();
        assert!(matches!(
            no_provider.validate().unwrap_err(),
            Error::Validation {
                field: "provider",
                ..
            }
        ));
    }

    #[test]
    fn test_new_usage_validation() {
        let valid = NewUsage {
            team_id: Uuid::new_v4(),
            model_id: Uuid::new_v4(),
            tokens: 1500,
            cost: 0.15,
            used_at: None,
        };
        assert!(valid.validate().is_ok());

        let mut zero_tokens = valid.clone();
        zero_tokens.tokens = 0;
        assert!(matches!(
            zero_tokens.validate().unwrap_err(),
            Error::Validation { field: "tokens", .. }
        ));

        let mut negative_cost = valid;
        negative_cost.cost = -0.01;
        assert!(matches!(
            negative_cost.validate().unwrap_err(),
            Error::Validation { field: "cost", .. }
        ));
    }

    #[test]
    fn test_model_api_key_not_serialized() {
        let model = LlmModel {
            id: Uuid::new_v4(),
            name: "gpt-4".into(),
            provider: "OpenAI".into(),
            cost_per_token: 0.0001,
            api_key: Some("sk-secret".into()),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_string(&model).unwrap();
        assert!(!json.contains("sk-secret"));
        assert!(!json.contains("api_key"));
    }

    #[test]
    fn test_row_round_trip() {
        let team = Team::new("data", 500);
        let row = TeamRow {
            id: team.id.to_string(),
            name: team.name.clone(),
            quota: team.quota,
            usage: team.usage,
            created_at: team.created_at,
            updated_at: team.updated_at,
        };
        let back = Team::try_from(row).unwrap();
        assert_eq!(back.id, team.id);
        assert_eq!(back.name, "data");
    }

    #[test]
    fn test_row_with_corrupt_id_fails() {
        let row = TeamRow {
            id: "not-a-uuid".into(),
            name: "x".into(),
            quota: 0,
            usage: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(matches!(Team::try_from(row), Err(Error::Internal(_))));
    }
}
