use std::sync::Arc;

use mockup_publisher::{
    FilePayload, FolderSource, FsStorage, IdentityMap, PublishError, Publisher, PublisherBuilder,
    Settings, Storage,
};
use tempfile::TempDir;
use tokio::sync::Mutex as TokioMutex;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A stored object: key, bytes and the declared content type.
type Object = (String, Vec<u8>, Option<String>);

/// In-memory storage for testing without touching the filesystem.
#[derive(Clone)]
struct MemoryStorage {
    objects: Arc<TokioMutex<Vec<Object>>>,
}

impl MemoryStorage {
    fn new() -> Self {
        Self {
            objects: Arc::new(TokioMutex::new(Vec::new())),
        }
    }
}

impl Storage for MemoryStorage {
    async fn put(
        &self,
        key: &str,
        content: &[u8],
        content_type: Option<&str>,
    ) -> mockup_publisher::Result<()> {
        self.objects.lock().await.push((
            key.to_string(),
            content.to_vec(),
            content_type.map(str::to_string),
        ));
        Ok(())
    }
}

/// Storage that rejects keys ending in a given suffix and stores the rest.
struct FlakyStorage {
    inner: MemoryStorage,
    fail_suffix: &'static str,
}

impl Storage for FlakyStorage {
    async fn put(
        &self,
        key: &str,
        content: &[u8],
        content_type: Option<&str>,
    ) -> mockup_publisher::Result<()> {
        if key.ends_with(self.fail_suffix) {
            return Err(PublishError::Remote {
                key: key.to_string(),
                source: "simulated 500 InternalError".into(),
            });
        }
        self.inner.put(key, content, content_type).await
    }
}

/// Storage that always reports missing credentials.
struct NoCredentialsStorage;

impl Storage for NoCredentialsStorage {
    async fn put(
        &self,
        _key: &str,
        _content: &[u8],
        _content_type: Option<&str>,
    ) -> mockup_publisher::Result<()> {
        Err(PublishError::Credential)
    }
}

fn settings(region: &str) -> Settings {
    Settings::new(
        Some("nimonik-mockups".into()),
        Some(region.into()),
        Some("AKID".into()),
        Some("SECRET".into()),
    )
    .unwrap()
}

fn publisher<S: Storage>(storage: S) -> Publisher<S> {
    PublisherBuilder::new(storage, settings("us-east-1")).build()
}

const REGISTER_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <link rel="stylesheet" href="Register/style.css">
  <script src="Register/app.js"></script>
</head>
<body><img src="Register/logo.png"></body>
</html>"#;

fn register_assets() -> Vec<FilePayload> {
    vec![
        FilePayload::from_bytes("style.css", "body { margin: 0 }"),
        FilePayload::from_bytes("app.js", "console.log('hi')"),
        FilePayload::from_bytes("logo.png", vec![0x89, b'P', b'N', b'G']),
    ]
}

// ---------------------------------------------------------------------------
// Folder selection
// ---------------------------------------------------------------------------

#[tokio::test]
async fn assets_go_under_stylesheet_folder_and_html_at_root() {
    let storage = MemoryStorage::new();
    let objects = storage.objects.clone();
    let publisher = publisher(storage);

    let html = FilePayload::from_bytes("register.html", REGISTER_HTML);
    let result = publisher
        .upload_session("Lex", Some(&html), &register_assets(), None)
        .await
        .unwrap();

    assert_eq!(
        result.uploaded,
        [
            "Lex_folder/Register/style.css",
            "Lex_folder/Register/app.js",
            "Lex_folder/Register/logo.png",
            "Lex_folder/register.html",
        ]
    );
    assert!(result.errors.is_empty());
    assert_eq!(result.folder.as_ref().unwrap().source, FolderSource::Stylesheet);
    assert_eq!(
        result.html_url.as_deref(),
        Some("https://nimonik-mockups.s3.amazonaws.com/Lex_folder/register.html")
    );

    let stored = objects.lock().await;
    assert_eq!(stored.len(), 4);
    assert_eq!(stored[3].1, REGISTER_HTML.as_bytes());
}

#[tokio::test]
async fn override_wins_over_stylesheet() {
    let storage = MemoryStorage::new();
    let objects = storage.objects.clone();
    let publisher = publisher(storage);

    let html = FilePayload::from_bytes("register.html", REGISTER_HTML);
    let result = publisher
        .upload_session("Janelle", Some(&html), &register_assets(), Some(" Custom "))
        .await
        .unwrap();

    assert_eq!(result.folder.as_ref().unwrap().name, "Custom");
    let stored = objects.lock().await;
    assert_eq!(stored[0].0, "Janelle_folder/Custom/style.css");
    assert_eq!(stored[3].0, "Janelle_folder/register.html");
}

#[tokio::test]
async fn html_without_stylesheet_folder_uses_file_stem() {
    let storage = MemoryStorage::new();
    let objects = storage.objects.clone();
    let publisher = publisher(storage);

    let html = FilePayload::from_bytes(
        "Checkout Flow.html",
        "<link rel='stylesheet' href='style.css'><h1>Checkout</h1>",
    );
    let assets = vec![FilePayload::from_bytes("style.css", "h1 {}")];
    let result = publisher
        .upload_session("Yurii", Some(&html), &assets, None)
        .await
        .unwrap();

    assert_eq!(result.folder.as_ref().unwrap().source, FolderSource::FileName);
    assert_eq!(objects.lock().await[0].0, "Yurii_folder/Checkout Flow/style.css");
    assert_eq!(
        result.html_url.as_deref(),
        Some("https://nimonik-mockups.s3.amazonaws.com/Yurii_folder/Checkout%20Flow.html")
    );
}

#[tokio::test]
async fn non_utf8_html_still_uploads_with_stem_folder() {
    let storage = MemoryStorage::new();
    let objects = storage.objects.clone();
    let publisher = publisher(storage);

    let html = FilePayload::from_bytes("legacy.html", vec![0x3c, 0x70, 0x3e, 0xe9, 0xff]);
    let assets = vec![FilePayload::from_bytes("a.css", "")];
    let result = publisher
        .upload_session("Lex", Some(&html), &assets, None)
        .await
        .unwrap();

    assert!(result.errors.is_empty());
    assert_eq!(result.uploaded, ["Lex_folder/legacy/a.css", "Lex_folder/legacy.html"]);
    assert_eq!(objects.lock().await[1].1, vec![0x3c, 0x70, 0x3e, 0xe9, 0xff]);
}

#[tokio::test]
async fn no_html_and_no_override_writes_at_prefix_root() {
    let storage = MemoryStorage::new();
    let publisher = publisher(storage);

    let result = publisher
        .upload_session("Lex", None, &register_assets(), None)
        .await
        .unwrap();

    assert!(result.folder.is_none());
    assert!(result.html_url.is_none());
    assert_eq!(
        result.uploaded,
        ["Lex_folder/style.css", "Lex_folder/app.js", "Lex_folder/logo.png"]
    );
}

#[tokio::test]
async fn no_html_with_override_uses_override() {
    let publisher = publisher(MemoryStorage::new());

    let result = publisher
        .upload_session("Lex", None, &register_assets()[..1], Some("Shared"))
        .await
        .unwrap();

    assert_eq!(result.uploaded, ["Lex_folder/Shared/style.css"]);
}

// ---------------------------------------------------------------------------
// Content types
// ---------------------------------------------------------------------------

#[tokio::test]
async fn content_types_follow_extension_table() {
    let storage = MemoryStorage::new();
    let objects = storage.objects.clone();
    let publisher = publisher(storage);

    let html = FilePayload::from_bytes("index.htm", "<p>hi</p>");
    let assets = vec![
        FilePayload::from_bytes("style.css", ""),
        FilePayload::from_bytes("app.js", ""),
        FilePayload::from_bytes("data.json", "{}"),
        FilePayload::from_bytes("logo.png", ""),
        FilePayload::from_bytes("font.woff2", "").with_content_type("font/woff2"),
    ];
    publisher
        .upload_session("Lex", Some(&html), &assets, None)
        .await
        .unwrap();

    let stored = objects.lock().await;
    let types: Vec<Option<&str>> = stored.iter().map(|o| o.2.as_deref()).collect();
    assert_eq!(
        types,
        [
            Some("text/css"),
            Some("application/javascript"),
            Some("application/json"),
            None,
            Some("font/woff2"),
            Some("text/html"),
        ]
    );
}

// ---------------------------------------------------------------------------
// Partial success
// ---------------------------------------------------------------------------

#[tokio::test]
async fn one_failed_write_does_not_abort_the_rest() {
    let inner = MemoryStorage::new();
    let objects = inner.objects.clone();
    let publisher = publisher(FlakyStorage {
        inner,
        fail_suffix: "app.js",
    });

    let html = FilePayload::from_bytes("register.html", REGISTER_HTML);
    let result = publisher
        .upload_session("Lex", Some(&html), &register_assets(), None)
        .await
        .unwrap();

    assert_eq!(result.uploaded.len(), 3);
    assert_eq!(result.errors.len(), 1);
    assert!(result.is_partial());
    assert_eq!(result.errors[0].name, "app.js");
    assert_eq!(result.errors[0].key, "Lex_folder/Register/app.js");
    assert!(matches!(result.errors[0].error, PublishError::Remote { .. }));
    assert!(result.html_url.is_some());
    assert_eq!(objects.lock().await.len(), 3);
}

#[tokio::test]
async fn failed_html_write_leaves_no_url() {
    let publisher = publisher(FlakyStorage {
        inner: MemoryStorage::new(),
        fail_suffix: ".html",
    });

    let html = FilePayload::from_bytes("register.html", REGISTER_HTML);
    let result = publisher
        .upload_session("Lex", Some(&html), &register_assets(), None)
        .await
        .unwrap();

    assert!(result.html_url.is_none());
    assert_eq!(result.uploaded.len(), 3);
    assert_eq!(result.errors[0].key, "Lex_folder/register.html");
}

#[tokio::test]
async fn missing_credentials_fail_every_file_without_aborting() {
    let publisher = publisher(NoCredentialsStorage);

    let html = FilePayload::from_bytes("register.html", REGISTER_HTML);
    let result = publisher
        .upload_session("Lex", Some(&html), &register_assets(), None)
        .await
        .unwrap();

    assert!(result.nothing_uploaded());
    assert!(!result.is_partial());
    assert_eq!(result.errors.len(), 4);
    assert!(
        result
            .errors
            .iter()
            .all(|e| matches!(e.error, PublishError::Credential))
    );
}

#[tokio::test]
async fn missing_local_file_is_reported_per_file() {
    let tmp = TempDir::new().unwrap();
    let css = tmp.path().join("style.css");
    tokio::fs::write(&css, "body {}").await.unwrap();

    let publisher = publisher(MemoryStorage::new());
    let assets = vec![
        FilePayload::from_path(tmp.path().join("gone.js")),
        FilePayload::from_path(&css),
    ];
    let result = publisher
        .upload_session("Lex", None, &assets, Some("Register"))
        .await
        .unwrap();

    assert_eq!(result.uploaded, ["Lex_folder/Register/style.css"]);
    assert_eq!(result.errors.len(), 1);
    assert!(matches!(result.errors[0].error, PublishError::NotFound(_)));
}

#[tokio::test]
async fn missing_html_file_still_uploads_assets_under_stem() {
    let publisher = publisher(MemoryStorage::new());
    let html = FilePayload::from_path("/no/such/dir/landing.html");

    let result = publisher
        .upload_session("Lex", Some(&html), &register_assets()[..1], None)
        .await
        .unwrap();

    assert_eq!(result.uploaded, ["Lex_folder/landing/style.css"]);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].key, "Lex_folder/landing.html");
    assert!(result.html_url.is_none());
}

#[tokio::test]
async fn traversal_names_are_rejected_per_file() {
    let publisher = publisher(MemoryStorage::new());
    let assets = vec![
        FilePayload::from_bytes("../escape.css", ""),
        FilePayload::from_bytes("ok.css", ""),
    ];
    let result = publisher
        .upload_session("Lex", None, &assets, None)
        .await
        .unwrap();

    assert_eq!(result.uploaded, ["Lex_folder/ok.css"]);
    assert!(matches!(
        result.errors[0].error,
        PublishError::InvalidPayload(_)
    ));
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_identity_writes_nothing() {
    let storage = MemoryStorage::new();
    let objects = storage.objects.clone();
    let publisher = publisher(storage);

    let err = publisher
        .upload_session("Mallory", None, &register_assets(), None)
        .await
        .unwrap_err();

    assert!(err.is_fatal());
    assert!(objects.lock().await.is_empty());
}

#[tokio::test]
async fn parent_segment_override_is_used_verbatim() {
    let publisher = publisher(MemoryStorage::new());
    let result = publisher
        .upload_session("Lex", None, &register_assets()[..1], Some("../Janelle_folder"))
        .await
        .unwrap();
    assert_eq!(result.uploaded, ["Lex_folder/../Janelle_folder/style.css"]);
}

#[tokio::test]
async fn fs_storage_refuses_parent_segment_folders() {
    let out = TempDir::new().unwrap();
    let publisher = publisher(FsStorage::new(out.path().join("site")));
    let html = FilePayload::from_bytes(
        "index.html",
        r#"<link rel="stylesheet" href="../shared/style.css">"#,
    );

    let result = publisher
        .upload_session("Lex", Some(&html), &register_assets()[..1], None)
        .await
        .unwrap();

    assert_eq!(result.uploaded, ["Lex_folder/index.html"]);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].key, "Lex_folder/../shared/style.css");
    assert!(matches!(
        result.errors[0].error,
        PublishError::InvalidPayload(_)
    ));
    assert!(!out.path().join("site/shared/style.css").exists());
}

#[tokio::test]
async fn custom_identity_table() {
    let identities = IdentityMap::parse("Ana=ana_mockups").unwrap();
    let publisher = PublisherBuilder::new(MemoryStorage::new(), settings("us-east-1"))
        .identities(identities)
        .build();

    let result = publisher
        .upload_session("Ana", None, &register_assets()[..1], None)
        .await
        .unwrap();
    assert_eq!(result.uploaded, ["ana_mockups/style.css"]);

    assert!(
        publisher
            .upload_session("Lex", None, &register_assets(), None)
            .await
            .is_err()
    );
}

// ---------------------------------------------------------------------------
// URLs
// ---------------------------------------------------------------------------

#[tokio::test]
async fn regional_bucket_urls() {
    let publisher = PublisherBuilder::new(MemoryStorage::new(), settings("eu-west-1")).build();
    let html = FilePayload::from_bytes("Sign Up & Pay.html", "<p>x</p>");

    let result = publisher
        .upload_session("Lex", Some(&html), &[], None)
        .await
        .unwrap();

    assert_eq!(
        result.html_url.as_deref(),
        Some("https://nimonik-mockups.s3.eu-west-1.amazonaws.com/Lex_folder/Sign%20Up%20%26%20Pay.html")
    );
    assert_eq!(result.urls().count(), 1);
}

#[tokio::test]
async fn urls_cover_every_uploaded_key() {
    let publisher = publisher(MemoryStorage::new());
    let html = FilePayload::from_bytes("register.html", REGISTER_HTML);

    let result = publisher
        .upload_session("Lex", Some(&html), &register_assets(), None)
        .await
        .unwrap();

    let urls: Vec<String> = result.urls().collect();
    assert_eq!(urls.len(), 4);
    assert_eq!(
        urls[0],
        "https://nimonik-mockups.s3.amazonaws.com/Lex_folder/Register/style.css"
    );
}

// ---------------------------------------------------------------------------
// End-to-end: FsStorage
// ---------------------------------------------------------------------------

#[tokio::test]
async fn e2e_fs_publish_from_disk() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();

    let html_path = src.path().join("register.html");
    tokio::fs::write(&html_path, REGISTER_HTML).await.unwrap();
    tokio::fs::create_dir_all(src.path().join("Register"))
        .await
        .unwrap();
    let css_path = src.path().join("Register/style.css");
    tokio::fs::write(&css_path, "body { color: red }").await.unwrap();

    let publisher = publisher(FsStorage::new(out.path()));
    let html = FilePayload::from_path(&html_path);
    let result = publisher
        .upload_session("Janelle", Some(&html), &[FilePayload::from_path(&css_path)], None)
        .await
        .unwrap();

    assert!(result.errors.is_empty());
    let css = tokio::fs::read_to_string(out.path().join("Janelle_folder/Register/style.css"))
        .await
        .unwrap();
    assert_eq!(css, "body { color: red }");
    let html = tokio::fs::read_to_string(out.path().join("Janelle_folder/register.html"))
        .await
        .unwrap();
    assert_eq!(html, REGISTER_HTML);
}
