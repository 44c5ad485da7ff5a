use media_store::{upload, LocalMediaStore, MediaConfig, MediaError, MediaKind, MediaStore};

fn config_for(dir: &std::path::Path) -> MediaConfig {
    MediaConfig {
        base_url: "http://localhost:8000/media".to_string(),
        local_dir: dir.to_path_buf(),
        ..MediaConfig::default()
    }
}

#[tokio::test]
async fn upload_writes_file_and_returns_public_url() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = LocalMediaStore::new(config_for(dir.path()))
        .await
        .expect("store");

    let stored = upload(
        &store,
        MediaKind::Thumbnail,
        Some("cover.png"),
        b"png-bytes".to_vec(),
        "image/png",
    )
    .await
    .expect("upload");

    assert!(stored.url.starts_with("http://localhost:8000/media/thumbnails/"));
    assert_eq!(stored.size, 9);

    let on_disk = tokio::fs::read(dir.path().join(&stored.key))
        .await
        .expect("file exists");
    assert_eq!(on_disk, b"png-bytes");
}

#[tokio::test]
async fn delete_removes_file_and_tolerates_missing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = LocalMediaStore::new(config_for(dir.path()))
        .await
        .expect("store");

    let stored = store
        .put("avatars/a.png", b"x".to_vec(), "image/png")
        .await
        .expect("put");

    store.delete_url(&stored.url).await.expect("delete");
    assert!(!dir.path().join("avatars/a.png").exists());

    // second delete is a no-op
    store.delete_url(&stored.url).await.expect("idempotent delete");
}

#[tokio::test]
async fn delete_rejects_urls_from_other_hosts() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = LocalMediaStore::new(config_for(dir.path()))
        .await
        .expect("store");

    let result = store.delete_url("https://res.cloudinary.com/x/y.png").await;
    assert!(matches!(result, Err(MediaError::ForeignUrl(_))));
}

#[tokio::test]
async fn put_rejects_path_traversal() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = LocalMediaStore::new(config_for(dir.path()))
        .await
        .expect("store");

    let result = store.put("../outside.txt", b"x".to_vec(), "text/plain").await;
    assert!(result.is_err());
}
