use std::net::SocketAddr;
use std::sync::Arc;

use tempfile::TempDir;
use tokio::net::TcpListener;
use zucchina_api::{serve, AppState};
use zucchina_core::codec;
use zucchina_core::config::{FetchConfig, ServerConfig};
use zucchina_core::SourceFetcher;

struct TestServer {
    addr: SocketAddr,
    dir: TempDir,
}

impl TestServer {
    async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let config = ServerConfig {
            public_url: "https://s.example.com".to_string(),
            allow_local_sources: true,
            ..Default::default()
        };
        let fetcher = SourceFetcher::new(&FetchConfig::default()).unwrap();
        let state = Arc::new(AppState::new(config, Arc::new(fetcher)));

        tokio::spawn(serve(listener, state));

        Self {
            addr,
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn file(&self, name: &str, content: &str) -> String {
        let path = self.dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path.to_string_lossy().to_string()
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

#[tokio::test]
async fn test_health() {
    let server = TestServer::start().await;
    let resp = reqwest::get(server.url("/health")).await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), r#"{"status":"healthy"}"#);
}

#[tokio::test]
async fn test_render_document_by_token() {
    let server = TestServer::start().await;
    let rules = server.file("ads.list", "DOMAIN-SUFFIX,ads.example.com\n");
    let missing = server.dir.path().join("gone.list").to_string_lossy().to_string();
    let source = server.file(
        "main.conf",
        &format!("[Rule]\nRULE-SET,{rules},REJECT\nRULE-SET,{missing},DIRECT\nFINAL,DIRECT\n"),
    );
    let token = codec::encode(&source);

    let resp = reqwest::get(server.url(&format!("/{}?c=DE", token))).await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["x-expansion-failures"], "1");

    let body = resp.text().await.unwrap();
    assert!(body.starts_with(&format!(
        "#!MANAGED-CONFIG https://s.example.com/{} interval=86400 strict=false\n",
        token
    )));
    assert!(body.contains("[Rule]\nDOMAIN-SUFFIX,ads.example.com,REJECT\nFINAL,DIRECT\n\n"));
}

#[tokio::test]
async fn test_invalid_token() {
    let server = TestServer::start().await;
    let resp = reqwest::get(server.url("/0OIl")).await.unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn test_unreachable_source() {
    let server = TestServer::start().await;
    let token = codec::encode("/nonexistent/zucchina/main.conf");
    let resp = reqwest::get(server.url(&format!("/{}", token))).await.unwrap();
    assert_eq!(resp.status(), 502);
}

#[tokio::test]
async fn test_method_not_allowed() {
    let server = TestServer::start().await;
    let resp = reqwest::Client::new()
        .post(server.url("/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 405);
}
