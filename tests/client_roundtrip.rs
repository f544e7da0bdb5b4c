//! Round-trip tests driving a live server through `TaskClient` and
//! `TaskBoard`.

mod common;

use chrono::NaiveDate;
use reqwest::StatusCode;
use rstest::rstest;

use common::spawn_server;
use task_tracker::api::TaskRequest;
use task_tracker::client::{
    ClientError, SortKey, StatusFilter, TaskBoard, TaskClient, ViewParams,
};
use task_tracker::domain::{TaskId, TaskStatus};

fn request(title: &str, status: TaskStatus, category: Option<&str>) -> TaskRequest {
    TaskRequest {
        status: Some(status),
        category: category.map(str::to_string),
        ..TaskRequest::new(title)
    }
}

// =============================================================================
// TaskClient
// =============================================================================

#[rstest]
#[tokio::test]
async fn test_client_crud_round_trip() {
    let client = TaskClient::new(spawn_server().await);
    let full = TaskRequest {
        title: "Test Task".to_string(),
        description: Some("Test Description".to_string()),
        status: Some(TaskStatus::InProgress),
        category: Some("Work".to_string()),
        due_date: NaiveDate::from_ymd_opt(2024, 12, 31),
    };

    let created = client.create(&full).await.unwrap();
    assert_eq!(TaskRequest::from(&created), full);
    assert_eq!(client.get(created.id).await.unwrap(), created);

    let updated = client
        .update(created.id, &TaskRequest::new("Renamed"))
        .await
        .unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.status, TaskStatus::Todo);
    assert!(updated.due_date.is_none());

    assert_eq!(client.list().await.unwrap(), vec![updated]);

    client.delete(created.id).await.unwrap();
    assert!(client.list().await.unwrap().is_empty());
}

#[rstest]
#[tokio::test]
async fn test_client_surfaces_server_message() {
    let client = TaskClient::new(spawn_server().await);

    let error = client.get(TaskId::new(999)).await.unwrap_err();

    match error {
        ClientError::Status { status, message } => {
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(message, "Task not found with id: 999");
        }
        ClientError::Transport(error) => panic!("expected status error, got {error}"),
    }
}

#[rstest]
#[tokio::test]
async fn test_client_validation_failure_is_bad_request() {
    let client = TaskClient::new(spawn_server().await);

    let error = client
        .create(&TaskRequest::new("t".repeat(101)))
        .await
        .unwrap_err();

    assert_eq!(error.status(), Some(StatusCode::BAD_REQUEST));
    assert_eq!(error.to_string(), "400 Validation failed");
}

#[rstest]
#[tokio::test]
async fn test_client_transport_failure() {
    // Port 9 (discard) on loopback is not served by the test suite.
    let client = TaskClient::new("http://127.0.0.1:9/api");

    let error = client.list().await.unwrap_err();

    assert!(matches!(error, ClientError::Transport(_)));
    assert_eq!(error.status(), None);
}

// =============================================================================
// TaskBoard
// =============================================================================

#[rstest]
#[tokio::test]
async fn test_board_reloads_after_each_mutation() {
    let mut board = TaskBoard::new(TaskClient::new(spawn_server().await));

    let first = board
        .create(&request("Buy milk", TaskStatus::Done, Some("Personal")))
        .await
        .unwrap();
    board
        .create(&request("Call Bob", TaskStatus::Todo, Some("Work")))
        .await
        .unwrap();
    board
        .create(&request("File taxes", TaskStatus::InProgress, Some("Work")))
        .await
        .unwrap();

    assert_eq!(board.tasks().len(), 3);
    assert_eq!(board.categories(), vec!["Personal", "Work"]);
    assert!(board.last_error().is_none());

    board.set_params(ViewParams {
        sort: SortKey::Status,
        ..ViewParams::default()
    });
    assert_eq!(board.params().sort, SortKey::Status);
    let statuses: Vec<TaskStatus> = board.visible().iter().map(|task| task.status).collect();
    assert_eq!(
        statuses,
        vec![TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done]
    );

    board.set_params(ViewParams {
        search: "bob".to_string(),
        status: StatusFilter::All,
        ..ViewParams::default()
    });
    let titles: Vec<String> = board.visible().into_iter().map(|task| task.title).collect();
    assert_eq!(titles, vec!["Call Bob"]);

    board.delete(first.id).await.unwrap();
    assert_eq!(board.tasks().len(), 2);
    assert_eq!(board.categories(), vec!["Work"]);
}

#[rstest]
#[tokio::test]
async fn test_board_keeps_state_on_failure() {
    let mut board = TaskBoard::new(TaskClient::new(spawn_server().await));
    board
        .create(&request("Keep me", TaskStatus::Todo, None))
        .await
        .unwrap();
    let before = board.tasks().to_vec();

    let result = board.update(TaskId::new(999), &TaskRequest::new("Ghost")).await;

    assert!(result.is_err());
    assert_eq!(board.tasks(), before.as_slice());
    assert_eq!(board.last_error(), Some("404 Task not found with id: 999"));

    board.reload().await.unwrap();
    assert!(board.last_error().is_none());
}
