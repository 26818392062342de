use tasklist::api::create_router;
use tasklist::client::{ClientError, TaskClient};
use tasklist::controller::*;
use tasklist::db::Database;
use tasklist::dispatch::Mutation;

/// Serve a fresh in-memory database on an ephemeral port.
async fn spawn_server() -> TaskClient {
    let db = Database::open_memory().expect("Failed to create database");
    db.migrate().expect("Failed to migrate");

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let address = listener.local_addr().expect("No local address");
    tokio::spawn(async move {
        axum::serve(listener, create_router(db))
            .await
            .expect("Server failed");
    });

    TaskClient::new(format!("http://{}/api/v1", address))
}

#[tokio::test]
async fn health_check_succeeds() {
    let client = spawn_server().await;
    client.health().await.expect("health failed");
}

#[tokio::test]
async fn submits_form_encoded_mutations() {
    let client = spawn_server().await;

    client
        .submit(&Mutation::Add {
            name: "Buy milk & eggs".to_string(),
        })
        .await
        .expect("add failed");

    let tasks = client.list_tasks().await.expect("list failed");
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].name, "Buy milk & eggs");

    client
        .submit(&Mutation::SetDone {
            id: tasks[0].id,
            done: true,
        })
        .await
        .expect("done failed");
    assert!(client.list_tasks().await.expect("list failed")[0].done);
}

#[tokio::test]
async fn maps_error_statuses() {
    let client = spawn_server().await;

    let err = client
        .submit(&Mutation::Add {
            name: String::new(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::BadRequest(ref body) if body == "name must be at least 1 characters"));

    let err = client
        .submit(&Mutation::Delete { id: 99 })
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::NotFound(_)));
}

#[tokio::test]
async fn truncated_error_body_is_an_http_error() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    // Announces more body than it sends, then hangs up.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let address = listener.local_addr().expect("No local address");
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept failed");
        let mut request = [0u8; 1024];
        let _ = socket.read(&mut request).await;
        let _ = socket
            .write_all(b"HTTP/1.1 500 Internal Server Error\r\nContent-Length: 100\r\n\r\nshort")
            .await;
    });

    let client = TaskClient::new(format!("http://{}/api/v1", address));
    let err = client.list_tasks().await.unwrap_err();
    assert!(matches!(err, ClientError::Http(_)), "{err:?}");
}

#[tokio::test]
async fn drives_a_task_list_over_http() {
    let client = spawn_server().await;
    let list = TaskList::new(client);

    list.refresh().await.expect("refresh failed");
    assert_eq!(list.view(), ListView::Empty);

    list.add("Call mum").await.expect("add failed");
    let ListView::Rows(rows) = list.view() else {
        panic!("expected rows");
    };
    let id = rows[0].task.id;

    list.act(id, RowEvent::ClickName).await.expect("click failed");
    list.act(
        id,
        RowEvent::SubmitUpdate {
            name: "Call dad".to_string(),
        },
    )
    .await
    .expect("update failed");

    let ListView::Rows(rows) = list.view() else {
        panic!("expected rows");
    };
    assert_eq!(rows[0].task.name, "Call dad");
    assert_eq!(rows[0].state, RowViewState::default());

    list.act(id, RowEvent::Delete).await.expect("delete failed");
    assert_eq!(list.view(), ListView::Empty);
}
