//! # Mock Framework
//!
//! Utilities for testing clients in isolation.
//!
//! Use [`create_mock_client`] to get a client and a receiver.
//! Then use helpers like [`expect_create`] or [`expect_list`] to script the
//! collaborator's replies.

use crate::actor_framework::{Entity, FrameworkError, ResourceClient, ResourceRequest};
use tokio::sync::{mpsc, oneshot};

/// Creates a mock client and a receiver for asserting requests.
///
/// Tests that exercise the booking engine rather than a repository point the
/// engine at this client and answer each request by hand, which makes
/// failures, delays and completion order deterministic.
pub fn create_mock_client<T: Entity>(buffer_size: usize) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Create request
pub async fn expect_create<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::CreatePayload, oneshot::Sender<Result<T::Id, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { payload, respond_to }) => Some((payload, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Get request
pub async fn expect_get<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, oneshot::Sender<Result<Option<T>, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a List request
pub async fn expect_list<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Query, oneshot::Sender<Result<Vec<T>, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::List { query, respond_to }) => Some((query, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Action request
pub async fn expect_action<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Action, oneshot::Sender<Result<T::ActionResult, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action { id, action, respond_to }) => Some((id, action, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Delete request
pub async fn expect_delete<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, oneshot::Sender<Result<(), FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Delete { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::TableClient;
    use crate::domain::{DiningTable, TableCreate, TableQuery};

    fn table(id: &str, name: &str) -> DiningTable {
        DiningTable {
            id: id.into(),
            name: name.into(),
            capacity: 4,
            kind: "indoor".into(),
            is_active: true,
        }
    }

    #[tokio::test]
    async fn test_mock_client() {
        let (inner, mut receiver) = create_mock_client::<DiningTable>(10);
        let client = TableClient::new(inner);

        let create_client = client.clone();
        let create_task = tokio::spawn(async move {
            create_client.create_table(TableCreate::new("Window", 4, "indoor")).await
        });

        let (payload, responder) = expect_create(&mut receiver).await.expect("Expected Create request");
        assert_eq!(payload.name, "Window");
        responder.send(Ok("table_1".to_string())).unwrap();
        assert_eq!(create_task.await.unwrap(), Ok("table_1".to_string()));

        let get_client = client.clone();
        let get_task = tokio::spawn(async move { get_client.get_table("table_1".to_string()).await });
        let (id, responder) = expect_get(&mut receiver).await.expect("Expected Get request");
        assert_eq!(id, "table_1");
        responder.send(Ok(Some(table("table_1", "Window")))).unwrap();
        assert_eq!(get_task.await.unwrap().unwrap().map(|t| t.name), Some("Window".to_string()));

        let list_task = tokio::spawn(async move { client.list_active_tables(3).await });
        let (query, responder) = expect_list(&mut receiver).await.expect("Expected List request");
        assert_eq!(query, TableQuery::seating(3));
        responder
            .send(Ok(vec![table("table_2", "Window"), table("table_1", "Bar")]))
            .unwrap();

        let names: Vec<String> = list_task.await.unwrap().unwrap().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["Bar".to_string(), "Window".to_string()]);
    }
}
