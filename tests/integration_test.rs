//! Integration tests for Tokenmeter
//!
//! These tests exercise tokenmeter-core end to end: registries, the usage
//! ledger, the dashboard aggregation, and the access gate working together
//! against a real (in-memory) database.

use chrono::{Duration, Utc};
use tokenmeter_core::{
    compute_dashboard, AccessGate, NewModel, NewTeam, NewUsage, TeamUpdate, UsageStore,
};

async fn seeded_store() -> UsageStore {
    UsageStore::in_memory().await.unwrap()
}

// ============================================================================
// Registry + Ledger Integration
// ============================================================================

#[tokio::test]
async fn test_full_usage_flow() {
    let store = seeded_store().await;

    let team = store
        .create_team(NewTeam {
            name: "AI Research".into(),
            quota: 100_000,
        })
        .await
        .unwrap();
    assert_eq!(team.usage, 0);

    let model = store
        .create_model(NewModel {
            name: "GPT-4".into(),
            provider: "OpenAI".into(),
            cost_per_token: 0.0001,
            api_key: Some("sk-test".into()),
            is_active: None,
        })
        .await
        .unwrap();
    assert!(model.is_active);

    let record = store
        .record_usage(NewUsage {
            team_id: team.id,
            model_id: model.id,
            tokens: 2_500,
            cost: 0.25,
            used_at: None,
        })
        .await
        .unwrap();
    assert_eq!(record.tokens, 2_500);

    let records = store.list_usage_by_team(team.id).await.unwrap();
    assert_eq!(records.len(), 1);

    // Ledger appends never move the registry counter
    let team = store.get_team(team.id).await.unwrap();
    assert_eq!(team.usage, 0);
}

#[tokio::test]
async fn test_quota_update_preserves_history() {
    let store = seeded_store().await;

    let team = store
        .create_team(NewTeam {
            name: "Platform".into(),
            quota: 10_000,
        })
        .await
        .unwrap();
    let model = store
        .create_model(NewModel {
            name: "Claude".into(),
            provider: "Anthropic".into(),
            cost_per_token: 0.00008,
            api_key: None,
            is_active: Some(true),
        })
        .await
        .unwrap();

    store
        .record_usage(NewUsage {
            team_id: team.id,
            model_id: model.id,
            tokens: 1_000,
            cost: 0.08,
            used_at: None,
        })
        .await
        .unwrap();

    let updated = store.set_quota(team.id, 50_000).await.unwrap();
    assert_eq!(updated.quota, 50_000);

    let records = store.list_usage_by_team(team.id).await.unwrap();
    assert_eq!(records.len(), 1);

    let renamed = store
        .update_team(
            team.id,
            TeamUpdate {
                name: "Platform Eng".into(),
                quota: 60_000,
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.name, "Platform Eng");
    assert_eq!(renamed.created_at, team.created_at);
}

#[tokio::test]
async fn test_range_queries_are_inclusive() {
    let store = seeded_store().await;

    let team = store
        .create_team(NewTeam {
            name: "Search".into(),
            quota: 1_000,
        })
        .await
        .unwrap();
    let model = store
        .create_model(NewModel {
            name: "GPT-4o-mini".into(),
            provider: "OpenAI".into(),
            cost_per_token: 0.00001,
            api_key: None,
            is_active: None,
        })
        .await
        .unwrap();

    let base = Utc::now() - Duration::days(10);
    for offset in [0, 3, 7] {
        store
            .record_usage(NewUsage {
                team_id: team.id,
                model_id: model.id,
                tokens: 100,
                cost: 0.001,
                used_at: Some(base + Duration::days(offset)),
            })
            .await
            .unwrap();
    }

    let records = store
        .list_usage_by_team_in_range(team.id, base, base + Duration::days(3))
        .await
        .unwrap();
    assert_eq!(records.len(), 2);

    let all = store
        .list_usage_by_team_in_range(team.id, base, base + Duration::days(7))
        .await
        .unwrap();
    assert_eq!(all.len(), 3);
}

// ============================================================================
// Dashboard Integration
// ============================================================================

#[tokio::test]
async fn test_dashboard_over_seeded_store() {
    let store = seeded_store().await;

    let alpha = store
        .create_team(NewTeam {
            name: "Alpha".into(),
            quota: 10_000,
        })
        .await
        .unwrap();
    let beta = store
        .create_team(NewTeam {
            name: "Beta".into(),
            quota: 0,
        })
        .await
        .unwrap();

    let model = store
        .create_model(NewModel {
            name: "GPT-4".into(),
            provider: "OpenAI".into(),
            cost_per_token: 0.0001,
            api_key: None,
            is_active: None,
        })
        .await
        .unwrap();
    store
        .create_model(NewModel {
            name: "Legacy".into(),
            provider: "OpenAI".into(),
            cost_per_token: 0.0002,
            api_key: None,
            is_active: Some(false),
        })
        .await
        .unwrap();

    store
        .record_usage(NewUsage {
            team_id: alpha.id,
            model_id: model.id,
            tokens: 500,
            cost: 0.05,
            used_at: None,
        })
        .await
        .unwrap();
    store
        .record_usage(NewUsage {
            team_id: beta.id,
            model_id: model.id,
            tokens: 300,
            cost: 0.03,
            used_at: None,
        })
        .await
        .unwrap();

    let snapshot = compute_dashboard(&store).await.unwrap();

    assert_eq!(snapshot.total_teams, 2);
    assert_eq!(snapshot.total_quota, 10_000);
    assert_eq!(snapshot.total_models, 2);
    assert_eq!(snapshot.active_models, 1);
    assert!((snapshot.total_cost - 0.08).abs() < 1e-9);

    let alpha_summary = snapshot
        .team_summaries
        .iter()
        .find(|s| s.team_id == alpha.id)
        .unwrap();
    assert_eq!(alpha_summary.model_count, 1);

    // Zero quota reports zero percent regardless of recorded usage
    let beta_summary = snapshot
        .team_summaries
        .iter()
        .find(|s| s.team_id == beta.id)
        .unwrap();
    assert_eq!(beta_summary.usage_percentage, 0.0);
}

#[tokio::test]
async fn test_model_delete_cascades_into_dashboard() {
    let store = seeded_store().await;

    let team = store
        .create_team(NewTeam {
            name: "Gamma".into(),
            quota: 5_000,
        })
        .await
        .unwrap();
    let model = store
        .create_model(NewModel {
            name: "Short-lived".into(),
            provider: "OpenAI".into(),
            cost_per_token: 0.0001,
            api_key: None,
            is_active: None,
        })
        .await
        .unwrap();

    store
        .record_usage(NewUsage {
            team_id: team.id,
            model_id: model.id,
            tokens: 100,
            cost: 0.01,
            used_at: None,
        })
        .await
        .unwrap();

    store.delete_model(model.id).await.unwrap();

    let snapshot = compute_dashboard(&store).await.unwrap();
    assert_eq!(snapshot.total_models, 0);
    assert!((snapshot.total_cost - 0.0).abs() < 1e-9);
    assert_eq!(snapshot.team_summaries[0].model_count, 0);
}

// ============================================================================
// Access Gate Integration
// ============================================================================

#[test]
fn test_session_lifecycle() {
    let gate = AccessGate::new(true);

    let token = gate.login("alice").unwrap();
    let ctx = gate.validate_token(&token).unwrap();
    assert_eq!(ctx.username, "alice");
    assert_eq!(ctx.role, "admin");

    gate.revoke_token(&token).unwrap();
    assert!(gate.validate_token(&token).is_err());
    assert_eq!(gate.active_session_count(), 0);
}

#[test]
fn test_disabled_gate_admits_everyone() {
    let gate = AccessGate::new(false);
    let ctx = gate.validate_token("").unwrap();
    assert_eq!(ctx.role, "admin");
}

// ============================================================================
// Persistence
// ============================================================================

#[tokio::test]
async fn test_store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tokenmeter.db");

    let team_id = {
        let store = UsageStore::from_path(&path).await.unwrap();
        let team = store
            .create_team(NewTeam {
                name: "Durable".into(),
                quota: 42,
            })
            .await
            .unwrap();
        team.id
    };

    let store = UsageStore::from_path(&path).await.unwrap();
    let team = store.get_team(team_id).await.unwrap();
    assert_eq!(team.name, "Durable");
    assert_eq!(team.quota, 42);
}
