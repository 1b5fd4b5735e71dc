use nt_catalog_client::{
    fetch_catalog_index, fetch_catalog_leaf, fetch_catalog_page, fetch_service_index, NetClient,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn fetches_and_parses_service_index() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v3/index.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "resources": [
                {"@id": "https://api.nuget.org/v3/catalog0/index.json", "@type": "Catalog/3.0.0"}
            ]
        })))
        .mount(&server)
        .await;

    let client = NetClient::with_defaults().unwrap();
    let doc = fetch_service_index(&client, &format!("{}/v3/index.json", server.uri()))
        .await
        .unwrap();

    assert_eq!(
        doc.resource_url("Catalog/3.0.0"),
        Some("https://api.nuget.org/v3/catalog0/index.json")
    );
}

#[tokio::test]
async fn fetches_catalog_index_and_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/catalog0/index.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [
                {"@id": "https://x/page0.json", "commitTimeStamp": "2024-01-01T00:00:00Z", "count": 2}
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/catalog0/page0.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [
                {
                    "@id": "https://x/leaf0.json",
                    "@type": ["nuget:catalog:PackageDetails"],
                    "commitTimeStamp": "2024-01-01T00:00:00Z",
                    "nuget:id": "Newtonsoft.Json",
                    "nuget:version": "13.0.1"
                }
            ]
        })))
        .mount(&server)
        .await;

    let client = NetClient::with_defaults().unwrap();
    let index = fetch_catalog_index(&client, &format!("{}/catalog0/index.json", server.uri()))
        .await
        .unwrap();
    assert_eq!(index.items.len(), 1);

    let page = fetch_catalog_page(&client, &format!("{}/catalog0/page0.json", server.uri()))
        .await
        .unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].package_id, "Newtonsoft.Json");
}

#[tokio::test]
async fn fetches_leaf_and_converts_to_package_leaf() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/leaf0.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "@type": ["nuget:catalog:PackageDetails"],
            "commitTimeStamp": "2024-01-01T00:00:00Z",
            "id": "Newtonsoft.Json",
            "version": "13.0.1",
            "published": "2023-01-01T00:00:00Z",
            "listed": true,
            "tags": "json serialization",
            "dependencyGroups": [{"targetFramework": "net6.0", "dependencies": []}]
        })))
        .mount(&server)
        .await;

    let client = NetClient::with_defaults().unwrap();
    let leaf = fetch_catalog_leaf(&client, &format!("{}/leaf0.json", server.uri()))
        .await
        .unwrap();

    let package_leaf = leaf.into_package_leaf();
    assert_eq!(package_leaf.package_id, "Newtonsoft.Json");
    assert_eq!(package_leaf.package_id_lower, "newtonsoft.json");
    assert!(package_leaf.tags.contains("json"));
    assert!(package_leaf.target_frameworks.contains("net6.0"));
}

#[tokio::test]
async fn surfaces_http_errors_as_typed_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = NetClient::with_defaults().unwrap();
    let err = fetch_service_index(&client, &format!("{}/missing.json", server.uri()))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        nt_errors::Error::Network(nt_errors::NetworkError::HttpError { status: 404, .. })
    ));
}
