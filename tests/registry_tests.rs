//! Tests for the investigation registry and application state

use investigation_progress::config::{Config, EventFeedConfig};
use investigation_progress::error::AppError;
use investigation_progress::models::{InvestigationStatus, ToolUpdate};
use investigation_progress::schemas::ToolStatusUpdate;
use investigation_progress::services::ProgressEvent;
use investigation_progress::state::AppState;

fn state() -> AppState {
    let config = Config {
        event_feed: EventFeedConfig {
            poll_interval: 10,
            idle_poll_interval: 90,
            active_poll_interval: 4,
        },
        ..Config::default()
    };
    AppState::from_config(&config).unwrap()
}

#[test]
fn test_status_advises_active_interval_while_running() {
    let state = state();
    let id = state.registry.start();
    state.registry.start_phase(id, "device").unwrap();
    state
        .registry
        .report_tool_status(id, "device", "fingerprint", "running")
        .unwrap();

    let response = state.registry.status(id).unwrap();

    assert_eq!(response.investigation_id, id);
    assert_eq!(response.status, InvestigationStatus::InProgress);
    assert!(!response.is_terminal);
    assert_eq!(response.poll_after_seconds, 4);
    assert_eq!(response.progress.total_tools, 1);
    assert_eq!(response.progress.completed_tools, 0);
}

#[test]
fn test_full_lifecycle() {
    let state = state();
    let id = state.registry.start();

    for phase in ["device", "location", "network"] {
        assert!(state.registry.start_phase(id, phase).unwrap());
    }
    assert!(!state.registry.start_phase(id, "device").unwrap());

    let mut last = 0.0;
    for phase in ["device", "location", "network"] {
        state
            .registry
            .report_tool_status(id, phase, "scan", "pending")
            .unwrap();
        let progress = state
            .registry
            .report_tool_status(id, phase, "scan", "success")
            .unwrap();
        assert!(progress.overall_percentage > last);
        last = progress.overall_percentage;
    }
    assert_eq!(last, 100.0);

    let archived = state
        .registry
        .finish(id, InvestigationStatus::Completed)
        .unwrap();
    assert!(archived.completed_at.is_some());
    assert_eq!(archived.progress.phases.len(), 3);
    assert_eq!(state.polling.interval_for(archived.status), 90);

    assert!(matches!(
        state.registry.status(id),
        Err(AppError::InvestigationNotFound(_))
    ));
}

#[test]
fn test_finishing_twice_fails() {
    let state = state();
    let id = state.registry.start();

    state
        .registry
        .finish(id, InvestigationStatus::Cancelled)
        .unwrap();
    assert!(state
        .registry
        .finish(id, InvestigationStatus::Error)
        .is_err());
}

#[test]
fn test_apply_update_request() {
    let state = state();
    let id = state.registry.start();
    state.registry.start_phase(id, "device").unwrap();

    let update: ToolStatusUpdate = serde_json::from_value(serde_json::json!({
        "phase_name": "device",
        "tool_name": "fingerprint",
        "status": "success"
    }))
    .unwrap();

    let response = state.registry.apply_update(id, &update).unwrap();
    assert_eq!(response.outcome, ToolUpdate::Appended);
    assert_eq!(response.progress.overall_percentage, 100.0);

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["outcome"], "appended");
}

#[tokio::test]
async fn test_registry_updates_reach_subscribers() {
    let state = state();
    let mut rx = state.progress.subscribe().unwrap();

    let id = state.registry.start();
    state.registry.start_phase(id, "device").unwrap();
    state
        .registry
        .report_tool_status(id, "missing", "a", "success")
        .unwrap();

    let event = rx.recv().await.unwrap();
    let ProgressEvent::ToolStatusChanged {
        investigation_id,
        outcome,
        ..
    } = &event;
    assert_eq!(*investigation_id, id);
    assert_eq!(*outcome, ToolUpdate::PhaseNotFound);

    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["type"], "tool_status_changed");
    assert_eq!(json["phase_name"], "missing");
}
