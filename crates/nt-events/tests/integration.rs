use nt_events::{channel, AppEvent, CatalogEvent, EventEmitter};

#[tokio::test]
async fn emitted_events_are_received_in_order() {
    let (tx, mut rx) = channel();

    tx.emit(AppEvent::Catalog(CatalogEvent::WalkStarted {
        from_cursor: None,
    }));
    tx.emit(AppEvent::Catalog(CatalogEvent::WalkCaughtUp));
    drop(tx);

    let first = rx.recv().await.expect("first event");
    assert!(matches!(
        first,
        AppEvent::Catalog(CatalogEvent::WalkStarted { from_cursor: None })
    ));

    let second = rx.recv().await.expect("second event");
    assert!(matches!(second, AppEvent::Catalog(CatalogEvent::WalkCaughtUp)));

    assert!(rx.recv().await.is_none());
}
