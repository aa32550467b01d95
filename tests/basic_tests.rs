use s3_explorer::{create_in_memory_app, AppServices};
use std::io::Write;
use std::path::PathBuf;

fn write_file(dir: &tempfile::TempDir, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents).unwrap();
    path
}

async fn bucket_names(services: &AppServices) -> Vec<String> {
    services
        .bucket_use_cases
        .get_buckets()
        .await
        .into_iter()
        .map(|b| b.name)
        .collect()
}

#[tokio::test]
async fn bucket_and_object_lifecycle() {
    let services = create_in_memory_app().await;
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "a.txt", b"first line\nsecond line\n");
    let size = std::fs::metadata(&path).unwrap().len() as i64;

    assert!(services.bucket_use_cases.create_bucket("logs").await);
    assert_eq!(bucket_names(&services).await, vec!["logs"]);

    assert!(services.object_use_cases.upload_object("logs", &path).await);
    let objects = services.object_use_cases.get_objects("logs").await;
    assert_eq!(objects.len(), 1);
    assert_eq!(objects[0].key, "a.txt");
    assert_eq!(objects[0].size, size);

    assert!(services.object_use_cases.delete_object("logs", "a.txt").await);
    assert!(services.object_use_cases.get_objects("logs").await.is_empty());

    assert!(services.bucket_use_cases.delete_bucket("logs").await);
    assert!(bucket_names(&services).await.is_empty());
}

#[tokio::test]
async fn created_bucket_listed_exactly_once() {
    let services = create_in_memory_app().await;

    for name in ["alpha", "beta", "gamma"] {
        assert!(services.bucket_use_cases.create_bucket(name).await);
    }
    // A second create of the same name must not produce a duplicate
    assert!(!services.bucket_use_cases.create_bucket("beta").await);

    let names = bucket_names(&services).await;
    assert_eq!(names, vec!["alpha", "beta", "gamma"]);
    assert_eq!(names.iter().filter(|n| *n == "beta").count(), 1);
}

#[tokio::test]
async fn upload_key_is_final_path_segment() {
    let services = create_in_memory_app().await;
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("a/b")).unwrap();
    let path = write_file(&dir, "a/b/c.txt", b"c");

    assert!(services.bucket_use_cases.create_bucket("b").await);
    assert!(services.object_use_cases.upload_object("b", &path).await);

    let keys: Vec<String> = services
        .object_use_cases
        .get_objects("b")
        .await
        .into_iter()
        .map(|o| o.key)
        .collect();
    assert_eq!(keys, vec!["c.txt"]);
}

#[tokio::test]
async fn listings_are_fresh_values() {
    let services = create_in_memory_app().await;
    let dir = tempfile::tempdir().unwrap();
    assert!(services.bucket_use_cases.create_bucket("data").await);

    let before = services.object_use_cases.get_objects("data").await;
    assert!(before.is_empty());

    let path = write_file(&dir, "new.bin", &[0u8; 32]);
    assert!(services.object_use_cases.upload_object("data", &path).await);

    // The earlier listing is untouched; a new call sees the upload
    assert!(before.is_empty());
    let after = services.object_use_cases.get_objects("data").await;
    assert_eq!(after.len(), 1);
    assert_eq!(after[0].size, 32);
}

#[tokio::test]
async fn presigned_url_names_bucket_and_key() {
    let services = create_in_memory_app().await;
    let url = services
        .object_use_cases
        .generate_presigned_url("uploads", "photo.jpg", None)
        .await
        .unwrap();

    assert!(url.contains("uploads"));
    assert!(url.contains("photo.jpg"));
}
