//! Integration tests for the filesystem image store.

use aquamon_core::error::AquamonError;
use aquamon_core::repository::ImageStore;
use aquamon_db::FsImageStore;
use uuid::Uuid;

#[tokio::test]
async fn stores_bytes_and_returns_url() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsImageStore::new(dir.path(), "http://localhost:8080");
    let well_id = Uuid::new_v4();

    let url = store
        .store(well_id, "photo.jpg", b"jpeg bytes")
        .await
        .unwrap();

    assert_eq!(url, format!("http://localhost:8080/wells/{well_id}/photo.jpg"));

    let on_disk = dir
        .path()
        .join("wells")
        .join(well_id.to_string())
        .join("photo.jpg");
    assert_eq!(std::fs::read(on_disk).unwrap(), b"jpeg bytes");
}

#[tokio::test]
async fn trailing_slash_in_base_url_is_trimmed() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsImageStore::new(dir.path(), "http://localhost:8080/");
    let well_id = Uuid::new_v4();

    let url = store.store(well_id, "a.png", b"png").await.unwrap();
    assert_eq!(url, format!("http://localhost:8080/wells/{well_id}/a.png"));
}

#[tokio::test]
async fn overwriting_same_name_replaces_contents() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsImageStore::new(dir.path(), "http://localhost:8080");
    let well_id = Uuid::new_v4();

    store.store(well_id, "photo.jpg", b"old").await.unwrap();
    store.store(well_id, "photo.jpg", b"new").await.unwrap();

    let on_disk = dir
        .path()
        .join("wells")
        .join(well_id.to_string())
        .join("photo.jpg");
    assert_eq!(std::fs::read(on_disk).unwrap(), b"new");
}

#[tokio::test]
async fn rejects_path_traversal_names() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsImageStore::new(dir.path(), "http://localhost:8080");
    let well_id = Uuid::new_v4();

    for bad in ["", "../escape.jpg", "a/b.jpg", "a\\b.jpg"] {
        let result = store.store(well_id, bad, b"x").await;
        assert!(
            matches!(result, Err(AquamonError::Validation { .. })),
            "expected rejection for {bad:?}"
        );
    }
}
