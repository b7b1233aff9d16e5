//! Directory listings fetched from a fake node

mod common;

use axum::http::StatusCode;
use common::{client, spawn_node};
use teapot_client::{
    client::files_path,
    config::DirectoryConfig,
    directory::{DirectoryLister, Listing, ListingRow},
};

#[tokio::test]
async fn test_listing_links_under_user() {
    let (node, base_url) = spawn_node().await;
    node.set_files(
        StatusCode::OK,
        r#"[
            {"name":"music","url":"/music","type":"directory"},
            {"name":"a.txt","url":"a.txt","type":"file"},
            {"name":"shared.iso","url":"shared.iso","type":"file","hash":"deadbeef"}
        ]"#,
    );

    let lister = DirectoryLister::new(client(&base_url), &DirectoryConfig::default());
    let listing = lister.list(&files_path("alice", None), Some("alice")).await;

    assert_eq!(
        listing,
        Listing::Entries(vec![
            ListingRow {
                name: "music".to_string(),
                link: "/alice/myself/files/music/".to_string(),
            },
            ListingRow {
                name: "a.txt".to_string(),
                link: "/alice/myself/files/a.txt".to_string(),
            },
            ListingRow {
                name: "shared.iso".to_string(),
                link: "/deadbeef".to_string(),
            },
        ])
    );
}

#[tokio::test]
async fn test_empty_and_null_listings() {
    let (node, base_url) = spawn_node().await;
    let lister = DirectoryLister::new(client(&base_url), &DirectoryConfig::default());

    node.set_files(StatusCode::OK, "[]");
    let listing = lister.list(&files_path("alice", None), None).await;
    assert_eq!(listing.to_html(), "No files");

    node.set_files(StatusCode::OK, "null");
    let listing = lister.list(&files_path("alice", None), None).await;
    assert_eq!(listing.to_html(), "No files");
}

#[tokio::test]
async fn test_server_error_renders_failure() {
    let (node, base_url) = spawn_node().await;
    node.set_files(StatusCode::INTERNAL_SERVER_ERROR, "boom");

    let lister = DirectoryLister::new(client(&base_url), &DirectoryConfig::default());
    let listing = lister.list(&files_path("alice", None), None).await;
    assert_eq!(listing, Listing::Failed);
    assert_eq!(listing.to_html(), "Failed");
}

#[tokio::test]
async fn test_unknown_path_renders_failure() {
    let (_node, base_url) = spawn_node().await;
    let lister = DirectoryLister::new(client(&base_url), &DirectoryConfig::default());
    let listing = lister.list(&files_path("alice", Some("bob")), None).await;
    assert_eq!(listing, Listing::Failed);
}
