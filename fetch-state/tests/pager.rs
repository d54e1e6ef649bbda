use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;

use fetch_state::{FetchState, Pager, PagerOptions, ParamsPatch, producer};
use payloads::requests::PageQuery;
use payloads::{ClientError, Envelope, ErrorKind, Pagination};
use serde::Deserialize;
use serde_json::{Value, json};
use test_helpers::init_test_tracing;
use tokio::sync::oneshot;

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct Item {
    id: i64,
}

/// A pager whose producer records every query and answers with `reply`.
fn recording_pager(
    reply: Value,
    initial: PageQuery,
) -> (Pager<Item>, Rc<RefCell<Vec<PageQuery>>>) {
    let seen: Rc<RefCell<Vec<PageQuery>>> = Rc::default();
    let pager = Pager::new(
        producer({
            let seen = seen.clone();
            move |query: PageQuery| {
                seen.borrow_mut().push(query);
                let reply = reply.clone();
                async move {
                    serde_json::from_value::<Envelope<Value>>(reply)
                        .map_err(ClientError::from)
                }
            }
        }),
        initial,
    );
    (pager, seen)
}

fn flat_reply() -> Value {
    json!({"success": true, "data": [{"id": 1}, {"id": 2}]})
}

#[tokio::test]
async fn seeds_page_one_limit_ten_with_initial_filters() {
    let (pager, _) = recording_pager(
        flat_reply(),
        PageQuery::default().with_filter("status", "approved"),
    );

    let params = pager.params();
    assert_eq!(params.page, 1);
    assert_eq!(params.limit, 10);
    assert_eq!(params.filters["status"], "approved");
}

#[tokio::test]
async fn nested_articles_shape_is_unwrapped() -> anyhow::Result<()> {
    init_test_tracing();
    let (pager, _) = recording_pager(
        json!({"success": true, "data": {"articles": [{"id": 1}]}}),
        PageQuery::default(),
    );

    pager.refetch().await?;

    let state = pager.snapshot();
    assert_eq!(state.items, FetchState::Fetched(vec![Item { id: 1 }]));
    assert!(state.error.is_none());
    Ok(())
}

#[tokio::test]
async fn derives_total_pages_when_server_omits_pagination() -> anyhow::Result<()> {
    let (pager, _) = recording_pager(
        flat_reply(),
        PageQuery::default().with_limit(1),
    );

    pager.refetch().await?;

    let state = pager.snapshot();
    assert_eq!(state.total(), 2);
    assert_eq!(state.total_pages(), 2);
    Ok(())
}

#[tokio::test]
async fn server_pagination_takes_precedence() -> anyhow::Result<()> {
    let (pager, _) = recording_pager(
        json!({
            "success": true,
            "data": [{"id": 1}],
            "pagination": {"page": 4, "limit": 10, "totalPages": 12, "total": 115}
        }),
        PageQuery::default(),
    );

    pager.change_page(4).await?;

    let state = pager.snapshot();
    assert_eq!(state.page(), 4);
    assert_eq!(state.total_pages(), 12);
    assert_eq!(state.total(), 115);
    Ok(())
}

#[tokio::test]
async fn change_limit_and_update_filters_land_on_page_one() -> anyhow::Result<()> {
    let (pager, seen) = recording_pager(flat_reply(), PageQuery::default());

    pager.change_page(3).await?;
    assert_eq!(pager.params().page, 3);

    pager.change_limit(25).await?;
    assert_eq!(pager.params().page, 1);
    assert_eq!(pager.params().limit, 25);

    pager.change_page(2).await?;
    pager
        .update_filters(BTreeMap::from([(
            "tag".to_string(),
            "rust".to_string(),
        )]))
        .await?;
    assert_eq!(pager.params().page, 1);
    assert_eq!(pager.params().filters["tag"], "rust");

    let pages: Vec<u32> = seen.borrow().iter().map(|q| q.page).collect();
    assert_eq!(pages, vec![3, 1, 2, 1]);
    Ok(())
}

#[tokio::test]
async fn execute_merges_patch_over_current_params() -> anyhow::Result<()> {
    let (pager, seen) = recording_pager(
        flat_reply(),
        PageQuery::default().with_filter("status", "approved"),
    );

    pager
        .execute(Some(ParamsPatch {
            page: Some(2),
            limit: None,
            filters: BTreeMap::from([("tag".to_string(), "yew".to_string())]),
        }))
        .await?;

    let sent = seen.borrow().last().cloned().unwrap();
    assert_eq!(sent.page, 2);
    assert_eq!(sent.limit, 10);
    assert_eq!(sent.filters["status"], "approved");
    assert_eq!(sent.filters["tag"], "yew");
    Ok(())
}

#[tokio::test]
async fn reset_restores_seed_and_refetches() -> anyhow::Result<()> {
    let (pager, seen) = recording_pager(
        flat_reply(),
        PageQuery::default().with_filter("status", "approved"),
    );

    pager.change_limit(50).await?;
    pager
        .update_filters(BTreeMap::from([(
            "status".to_string(),
            String::new(),
        )]))
        .await?;
    assert!(pager.params().filters.is_empty());

    pager.reset().await?;

    assert_eq!(pager.params(), PageQuery::default().with_filter("status", "approved"));
    assert_eq!(seen.borrow().len(), 3);
    Ok(())
}

#[tokio::test]
async fn reload_after_dependency_change_starts_from_page_one() -> anyhow::Result<()> {
    let (pager, seen) = recording_pager(
        flat_reply(),
        PageQuery::default().with_filter("status", "approved"),
    );

    pager.load().await?;
    pager.change_page(3).await?;
    pager
        .update_filters(BTreeMap::from([("tag".to_string(), "rust".to_string())]))
        .await?;
    pager.change_page(2).await?;

    // The owner's dependencies changed
    pager.load().await?;

    let sent = seen.borrow().last().cloned().unwrap();
    assert_eq!(sent, PageQuery::default().with_filter("status", "approved"));
    assert_eq!(pager.params().page, 1);
    assert_eq!(pager.snapshot().page(), 1);
    let pages: Vec<u32> = seen.borrow().iter().map(|q| q.page).collect();
    assert_eq!(pages, vec![1, 3, 1, 2, 1]);
    Ok(())
}

#[tokio::test]
async fn slower_older_page_cannot_overwrite_newer_one() {
    init_test_tracing();
    let pending: Rc<RefCell<VecDeque<oneshot::Receiver<u32>>>> =
        Rc::default();
    let successes = Rc::new(Cell::new(0));
    let pager: Pager<Item> = Pager::new(
        producer({
            let pending = pending.clone();
            move |query: PageQuery| {
                let rx = pending.borrow_mut().pop_front();
                async move {
                    let id = rx.expect("receiver queued").await.unwrap_or(0);
                    Ok(Envelope {
                        pagination: Some(Pagination::from_total(
                            query.page,
                            query.limit,
                            30,
                        )),
                        ..Envelope::ok(json!([{"id": id}]))
                    })
                }
            }
        }),
        PageQuery::default(),
    )
    .with_options(PagerOptions::default().on_success({
        let successes = successes.clone();
        move |_| successes.set(successes.get() + 1)
    }));

    let (older_tx, older_rx) = oneshot::channel();
    let (newer_tx, newer_rx) = oneshot::channel();
    pending.borrow_mut().extend([older_rx, newer_rx]);

    let driver = async {
        // Page 3 lands first, page 2 afterwards.
        newer_tx.send(3).unwrap();
        tokio::task::yield_now().await;
        older_tx.send(2).unwrap();
    };
    let (older, newer, ()) =
        tokio::join!(pager.change_page(2), pager.change_page(3), driver);

    // Each caller still receives its own page.
    assert_eq!(older.unwrap(), vec![Item { id: 2 }]);
    assert_eq!(newer.unwrap(), vec![Item { id: 3 }]);

    let state = pager.snapshot();
    assert_eq!(state.items, FetchState::Fetched(vec![Item { id: 3 }]));
    assert_eq!(state.pagination.page, 3);
    assert!(!state.loading);
    assert_eq!(pager.params().page, 3);
    assert_eq!(successes.get(), 1);
}

#[tokio::test]
async fn failure_keeps_previous_items_and_records_error() -> anyhow::Result<()> {
    let replies = Rc::new(RefCell::new(vec![
        json!({"success": false, "error": {"message": "down", "type": "SERVER_ERROR"}}),
        flat_reply(),
    ]));
    let errors = Rc::new(RefCell::new(Vec::new()));
    let pager: Pager<Item> = Pager::new(
        producer({
            let replies = replies.clone();
            move |_: PageQuery| {
                let reply = replies.borrow_mut().pop().unwrap_or(Value::Null);
                async move {
                    serde_json::from_value::<Envelope<Value>>(reply)
                        .map_err(ClientError::from)
                }
            }
        }),
        PageQuery::default(),
    )
    .with_options(PagerOptions::default().on_error({
        let errors = errors.clone();
        move |e| errors.borrow_mut().push(e.kind)
    }));

    pager.refetch().await?;
    let error = pager.refetch().await.unwrap_err();

    assert_eq!(error.kind, ErrorKind::ServerError);
    assert_eq!(*errors.borrow(), vec![ErrorKind::ServerError]);
    let state = pager.snapshot();
    assert_eq!(state.items().len(), 2);
    assert_eq!(state.error.map(|e| e.message), Some("down".to_string()));
    assert!(!state.loading);
    Ok(())
}

#[tokio::test]
async fn results_after_dispose_are_ignored() {
    let (pager, _) = recording_pager(flat_reply(), PageQuery::default());
    pager.dispose();

    let items = pager.refetch().await.unwrap();

    assert_eq!(items.len(), 2);
    assert!(!pager.snapshot().items.is_fetched());
}
