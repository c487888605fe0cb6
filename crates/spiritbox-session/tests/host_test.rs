//! Integration tests for the session host.

mod common;

use std::sync::Arc;

use common::{BrokenFactory, Cast, CastFactory, config_at};
use spiritbox_content::application::ingest::fingerprint;
use spiritbox_core::agent::{CuratorProposal, GameResult};
use spiritbox_core::error::DomainError;
use spiritbox_core::timeline::EventTimeline;
use spiritbox_session::application::host::SessionHost;
use spiritbox_session::domain::config::SessionConfig;
use spiritbox_test_support::{FixedClock, ManualClock, MockRng, sample_scenario};

fn host(cast: &Cast, config: SessionConfig) -> (SessionHost, Arc<EventTimeline>) {
    let timeline = Arc::new(EventTimeline::new());
    let host = SessionHost::new(
        Arc::new(CastFactory(cast.clone())),
        config,
        timeline.clone(),
        Arc::new(FixedClock::default()),
    );
    (host, timeline)
}

#[tokio::test]
async fn test_idle_host_rejects_turns_and_ignores_commands() {
    // Arrange
    let cast = Cast::new(vec![], vec![], vec![]);
    let (mut host, timeline) = host(&cast, config_at(1.0));

    // Act
    let turn = host.execute("Hello?").await;
    let command = host.execute_command("Raise the activity").await.unwrap();

    // Assert
    assert!(matches!(turn, Err(DomainError::NoActiveSession)));
    assert!(command.is_none());
    assert!(!host.stop());
    assert!(host.current_scenario().is_none());
    assert!(timeline.is_empty());
    assert!(cast.curator.prompts().is_empty());
}

#[tokio::test]
async fn test_start_records_scenario_fingerprint_and_blocks_second_start() {
    // Arrange
    let cast = Cast::new(vec![], vec![], vec![]);
    let (mut host, timeline) = host(&cast, config_at(1.0));
    let scenario = sample_scenario();
    let expected_fingerprint = fingerprint(&scenario).unwrap();

    // Act
    let session_id = host.start(scenario, Box::new(MockRng)).unwrap();
    let second = host.start(sample_scenario(), Box::new(MockRng));

    // Assert
    assert!(matches!(second, Err(DomainError::SessionAlreadyRunning)));
    assert!(host.is_running());
    assert_eq!(host.current_scenario().unwrap().primary_ghost.name, "Akar");
    let session = host.session().unwrap();
    assert_eq!(session.session_id(), session_id);
    assert_eq!(session.config(), &config_at(1.0));

    let started = timeline.of_kind("session.started");
    assert_eq!(started.len(), 1);
    assert_eq!(started[0].metadata.session_id, session_id);
    assert_eq!(started[0].metadata.sequence_number, 1);
    assert_eq!(started[0].payload["fingerprint"], expected_fingerprint);
}

#[tokio::test]
async fn test_full_session_lifecycle() {
    // Arrange
    let cast = Cast::new(
        vec![
            CuratorProposal::default(),
            CuratorProposal {
                reasoning: "Operator override".to_owned(),
                ..CuratorProposal::default()
            },
            CuratorProposal {
                game_result: Some(GameResult::Lose),
                ..CuratorProposal::default()
            },
        ],
        vec![],
        vec![],
    );
    let (mut host, timeline) = host(&cast, config_at(1.0));
    let session_id = host.start(sample_scenario(), Box::new(MockRng)).unwrap();

    // Act
    let first = host.execute("Is anyone here?").await.unwrap();
    let command = host.execute_command("Calm down").await.unwrap();
    let last = host.execute("We give up").await.unwrap();
    let after = host.execute("Hello?").await;
    let stopped = host.stop();

    // Assert
    assert_eq!(first.game_result, None);
    assert_eq!(command.unwrap().reasoning, "Operator override");
    assert_eq!(last.game_result, Some(GameResult::Lose));
    assert!(matches!(after, Err(DomainError::SessionFinished)));
    assert!(stopped);
    assert!(!host.is_running());

    let events = timeline.list();
    assert!(events.iter().all(|e| e.metadata.session_id == session_id));
    assert_eq!(events.first().unwrap().kind, "session.started");
    let stop = events.last().unwrap();
    assert_eq!(stop.kind, "session.stopped");
    assert_eq!(stop.payload["game_result"], "lose");
}

#[tokio::test]
async fn test_failed_start_leaves_host_idle() {
    // Arrange
    let timeline = Arc::new(EventTimeline::new());
    let mut host = SessionHost::new(
        Arc::new(BrokenFactory),
        SessionConfig::default(),
        timeline.clone(),
        Arc::new(FixedClock::default()),
    );
    let mut invalid = sample_scenario();
    invalid.secondary_ghost.name = String::new();

    // Act
    let broken_factory = host.start(sample_scenario(), Box::new(MockRng));
    let invalid_scenario = host.start(invalid, Box::new(MockRng));

    // Assert
    assert!(matches!(broken_factory, Err(DomainError::Infrastructure(_))));
    assert!(matches!(invalid_scenario, Err(DomainError::Scenario(_))));
    assert!(!host.is_running());
    assert!(timeline.is_empty());
}

#[tokio::test]
async fn test_countdown_follows_injected_clock() {
    // Arrange
    let cast = Cast::new(
        vec![
            CuratorProposal::default(),
            CuratorProposal {
                timer_delta: Some(60.0),
                ..CuratorProposal::default()
            },
            CuratorProposal::default(),
        ],
        vec![],
        vec![],
    );
    let clock = Arc::new(ManualClock::default());
    let config = SessionConfig {
        timer_seconds: Some(900.0),
        ..SessionConfig::default()
    };
    let mut host = SessionHost::new(
        Arc::new(CastFactory(cast.clone())),
        config,
        Arc::new(EventTimeline::new()),
        clock.clone(),
    );
    host.start(sample_scenario(), Box::new(MockRng)).unwrap();

    // Act
    host.execute("Hello?").await.unwrap();
    clock.advance(120);
    let adjusted = host.execute("Anyone?").await.unwrap();
    clock.advance(1_000);
    host.execute("Still there?").await.unwrap();

    // Assert
    let prompts = cast.curator.prompts();
    assert_eq!(prompts[0].remaining_time, Some(900.0));
    assert_eq!(prompts[1].remaining_time, Some(780.0));
    assert_eq!(adjusted.curator.new_timer_total, Some(960.0));
    assert_eq!(prompts[2].remaining_time, Some(0.0));
    assert_eq!(
        cast.primary.prompts()[1].remaining_time,
        Some(840.0)
    );
}
