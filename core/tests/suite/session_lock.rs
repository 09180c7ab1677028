use std::time::Duration;
use std::time::Instant;

use repomind_core::SessionConfig;
use tempfile::TempDir;

use super::support::spawn_session;
use super::support::spawn_session_with_config;

#[tokio::test]
async fn first_session_holds_the_write_role() {
    let dir = TempDir::new().unwrap();
    let (session, _calls) = spawn_session(dir.path()).await;
    assert!(!session.is_read_only());
}

#[tokio::test]
async fn second_session_degrades_to_read_only_within_timeout() {
    let dir = TempDir::new().unwrap();
    let (_writer, _calls) = spawn_session(dir.path()).await;

    let config = SessionConfig::new(dir.path()).with_lock_timeout(Duration::from_millis(100));
    let started = Instant::now();
    let (reader, _reader_calls) = spawn_session_with_config(config).await;

    assert!(reader.is_read_only());
    assert!(
        started.elapsed() < Duration::from_secs(2),
        "construction blocked past the acquisition timeout"
    );
}

#[tokio::test]
async fn write_role_frees_after_shutdown() {
    let dir = TempDir::new().unwrap();
    let (mut first, _first_calls) = spawn_session(dir.path()).await;
    first.shutdown().await.unwrap();

    let config = SessionConfig::new(dir.path()).with_lock_timeout(Duration::ZERO);
    let (second, _second_calls) = spawn_session_with_config(config).await;
    assert!(!second.is_read_only());
}

#[tokio::test]
async fn shutdown_twice_is_safe() {
    let dir = TempDir::new().unwrap();
    let (mut session, _calls) = spawn_session(dir.path()).await;

    session.shutdown().await.unwrap();
    session.shutdown().await.unwrap();

    // The second shutdown must not have re-released a lock it no longer
    // holds; a fresh session can still take the write role.
    let config = SessionConfig::new(dir.path()).with_lock_timeout(Duration::ZERO);
    let (third, _third_calls) = spawn_session_with_config(config).await;
    assert!(!third.is_read_only());
}

#[tokio::test]
async fn read_only_shutdown_leaves_the_writer_lock_alone() {
    let dir = TempDir::new().unwrap();
    let (_writer, _writer_calls) = spawn_session(dir.path()).await;

    let config = SessionConfig::new(dir.path()).with_lock_timeout(Duration::ZERO);
    let (mut reader, _reader_calls) = spawn_session_with_config(config).await;
    assert!(reader.is_read_only());
    reader.shutdown().await.unwrap();

    // The writer still owns the lock, so another instance stays read-only.
    let config = SessionConfig::new(dir.path()).with_lock_timeout(Duration::ZERO);
    let (probe, _probe_calls) = spawn_session_with_config(config).await;
    assert!(probe.is_read_only());
}
