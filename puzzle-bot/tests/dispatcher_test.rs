//! Integration tests for the dispatch tick: dedup by publish timestamp,
//! per-channel failure isolation, idempotence, and commit semantics.

mod common;

use common::{mock_puzzle_server, RecordingChatApi};
use puzzle_bot::Dispatcher;
use std::sync::Arc;
use std::time::Duration;
use storage::{MemoryKvStore, Registry, SubscriptionStore};

const PUBLISH_TIME: i64 = 1714521600;

fn registry(entries: &[(&str, i64)]) -> Registry {
    entries
        .iter()
        .map(|(ch, ts)| (ch.to_string(), *ts))
        .collect()
}

async fn seeded_store(entries: &[(&str, i64)]) -> Arc<SubscriptionStore> {
    let store = Arc::new(SubscriptionStore::new(Arc::new(MemoryKvStore::new())));
    store.save(&registry(entries)).await.unwrap();
    store
}

fn dispatcher(
    client: chess_client::ChessClient,
    store: Arc<SubscriptionStore>,
    chat: Arc<RecordingChatApi>,
) -> Dispatcher {
    Dispatcher::new(
        client,
        store,
        chat,
        Some("white_check_mark".to_string()),
        Duration::from_secs(1800),
    )
}

#[tokio::test]
async fn delivers_new_puzzle_and_advances_timestamp() {
    let (_server, _mock, client) = mock_puzzle_server(PUBLISH_TIME).await;
    let store = seeded_store(&[("ch1", 100)]).await;
    let chat = Arc::new(RecordingChatApi::new());

    let report = dispatcher(client, store.clone(), chat.clone())
        .run_once()
        .await
        .unwrap();

    assert_eq!(report.delivered, 1);
    assert_eq!(report.skipped, 0);
    assert_eq!(report.failed, 0);

    let posts = chat.posts();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].channel_id, "ch1");
    assert!(posts[0].message.contains("Daily Test Puzzle"));

    let reactions = chat.reactions();
    assert_eq!(reactions.len(), 1);
    assert_eq!(reactions[0].emoji, "white_check_mark");

    assert_eq!(store.load().await.unwrap().get("ch1"), Some(&PUBLISH_TIME));
}

#[tokio::test]
async fn skips_channels_that_already_saw_the_puzzle() {
    let (_server, _mock, client) = mock_puzzle_server(PUBLISH_TIME).await;
    let store = seeded_store(&[("ch1", PUBLISH_TIME)]).await;
    let chat = Arc::new(RecordingChatApi::new());

    let report = dispatcher(client, store.clone(), chat.clone())
        .run_once()
        .await
        .unwrap();

    assert_eq!(report.delivered, 0);
    assert_eq!(report.skipped, 1);
    assert!(chat.posts().is_empty());
    assert_eq!(store.load().await.unwrap(), registry(&[("ch1", PUBLISH_TIME)]));
}

#[tokio::test]
async fn second_run_with_same_puzzle_delivers_nothing() {
    let (_server, _mock, client) = mock_puzzle_server(PUBLISH_TIME).await;
    let store = seeded_store(&[("ch1", 0)]).await;
    let chat = Arc::new(RecordingChatApi::new());
    let dispatcher = dispatcher(client, store, chat.clone());

    let first = dispatcher.run_once().await.unwrap();
    assert_eq!(first.delivered, 1);

    let second = dispatcher.run_once().await.unwrap();
    assert_eq!(second.delivered, 0);
    assert_eq!(second.skipped, 1);
    assert_eq!(chat.posts().len(), 1);
}

#[tokio::test]
async fn failed_channel_is_retried_next_tick_without_aborting_the_batch() {
    let (_server, _mock, client) = mock_puzzle_server(PUBLISH_TIME).await;
    let store = seeded_store(&[("bad", 0), ("good", 0)]).await;
    let chat = Arc::new(RecordingChatApi::new());
    chat.fail_channel("bad");
    let dispatcher = dispatcher(client, store.clone(), chat.clone());

    let report = dispatcher.run_once().await.unwrap();
    assert_eq!(report.delivered, 1);
    assert_eq!(report.failed, 1);

    let registry = store.load().await.unwrap();
    assert_eq!(registry.get("good"), Some(&PUBLISH_TIME));
    assert_eq!(registry.get("bad"), Some(&0), "failed channel keeps its timestamp");

    // Once the channel recovers, the same puzzle goes out on the next tick.
    chat.heal_channel("bad");
    let report = dispatcher.run_once().await.unwrap();
    assert_eq!(report.delivered, 1);
    assert_eq!(report.skipped, 1);
    assert_eq!(store.load().await.unwrap().get("bad"), Some(&PUBLISH_TIME));
}

#[tokio::test]
async fn subscribe_arriving_during_a_tick_is_not_lost() {
    let (_server, _mock, client) = mock_puzzle_server(PUBLISH_TIME).await;
    let store = seeded_store(&[("ch1", 100)]).await;
    let chat = Arc::new(RecordingChatApi::new());
    let dispatcher = Arc::new(dispatcher(client, store.clone(), chat));

    let tick = {
        let dispatcher = dispatcher.clone();
        tokio::spawn(async move { dispatcher.run_once().await })
    };
    let subscribe = {
        let store = store.clone();
        tokio::spawn(async move {
            store
                .update(|reg| {
                    reg.insert("ch2".to_string(), 0);
                })
                .await
        })
    };

    tick.await.unwrap().unwrap();
    subscribe.await.unwrap().unwrap();

    let registry = store.load().await.unwrap();
    assert_eq!(registry.get("ch1"), Some(&PUBLISH_TIME));
    assert!(
        registry.contains_key("ch2"),
        "subscribe must survive the dispatcher's commit"
    );
}

#[tokio::test]
async fn fetch_failure_aborts_the_tick_without_touching_the_registry() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/")
        .with_status(500)
        .create_async()
        .await;
    let client = chess_client::ChessClient::with_base_url(server.url());

    let store = seeded_store(&[("ch1", 100)]).await;
    let chat = Arc::new(RecordingChatApi::new());

    let result = dispatcher(client, store.clone(), chat.clone()).run_once().await;
    assert!(result.is_err());
    assert!(chat.posts().is_empty());
    assert_eq!(store.load().await.unwrap(), registry(&[("ch1", 100)]));
}
