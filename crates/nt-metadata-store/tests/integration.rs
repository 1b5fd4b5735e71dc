use chrono::Utc;
use futures::StreamExt;
use nt_metadata_store::MetadataStore;
use nt_types::PackageLeaf;
use sqlx::postgres::PgPool;
use std::collections::BTreeSet;

fn leaf(id: &str) -> PackageLeaf {
    PackageLeaf {
        package_id: id.to_string(),
        package_id_lower: id.to_lowercase(),
        package_version: "1.0.0".to_string(),
        commit_timestamp: Utc::now(),
        published: Utc::now(),
        listed: Some(true),
        icon_url: None,
        project_url: None,
        description: None,
        tags: BTreeSet::new(),
        authors: None,
        target_frameworks: BTreeSet::new(),
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn catalog_walk_then_publish_candidate_flow(pool: PgPool) {
    let store = MetadataStore::from_pool(pool);

    assert_eq!(store.cursor().get().await.unwrap(), None);

    let outcome = store
        .leaves()
        .apply_batch(&[leaf("Foo"), leaf("Bar")], &[])
        .await
        .unwrap();
    assert_eq!(outcome.details_applied, 2);

    let cursor = Utc::now();
    store.cursor().set(cursor).await.unwrap();
    assert_eq!(store.cursor().get().await.unwrap(), Some(cursor));

    let pending: Vec<String> = store
        .downloads()
        .stream_pending_today(Utc::now().date_naive())
        .map(|r| r.unwrap())
        .collect()
        .await;
    assert_eq!(pending.len(), 2);
}
