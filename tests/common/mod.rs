#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

use blog_list_api::config::AppConfig;
use blog_list_api::database::MemoryStore;
use blog_list_api::state::AppState;

pub const TEST_SECRET: &str = "integration-test-secret";

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
}

impl TestServer {
    /// Serve the app over real HTTP from a background thread with its own runtime.
    /// The thread goes away with the test binary, so no server outlives the run.
    fn spawn() -> Result<Self> {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").context("failed to bind test listener")?;
        listener.set_nonblocking(true)?;
        let port = listener.local_addr()?.port();
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut config = AppConfig::development(TEST_SECRET.to_string());
        config.server.port = port;
        config.api.enable_request_logging = false;

        std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .expect("failed to build server runtime");

            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::from_std(listener).expect("failed to adopt listener");
                let state = AppState::new(config, Arc::new(MemoryStore::new()));
                axum::serve(listener, blog_list_api::app(state)).await.expect("server error");
            });
        });

        Ok(Self { port, base_url })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to start test server"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

static NEXT_USER: AtomicU64 = AtomicU64::new(1);

/// Username unique within this test binary; its tests share one server
pub fn unique_username(prefix: &str) -> String {
    let n = NEXT_USER.fetch_add(1, Ordering::Relaxed);
    format!("{}_{}", prefix, n)
}

/// An account created through the public API, with a live token
pub struct TestUser {
    pub id: String,
    pub username: String,
    pub token: String,
}

pub async fn signup_and_login(client: &reqwest::Client, server: &TestServer, prefix: &str) -> Result<TestUser> {
    let username = unique_username(prefix);
    let password = "salainen";

    let res = client
        .post(server.url("/api/users"))
        .json(&json!({ "username": username, "name": format!("{prefix} tester"), "password": password }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::CREATED, "signup failed: {}", res.status());
    let user: Value = res.json().await?;
    let id = user["id"].as_str().context("signup response missing id")?.to_string();

    let res = client
        .post(server.url("/api/login"))
        .json(&json!({ "username": username, "password": password }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::OK, "login failed: {}", res.status());
    let body: Value = res.json().await?;
    let token = body["token"].as_str().context("login response missing token")?.to_string();

    Ok(TestUser { id, username, token })
}

/// Create a blog as `user` and return the stored record
pub async fn create_blog(client: &reqwest::Client, server: &TestServer, user: &TestUser, blog: Value) -> Result<Value> {
    let res = client
        .post(server.url("/api/blogs"))
        .bearer_auth(&user.token)
        .json(&blog)
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::CREATED, "create failed: {}", res.status());
    Ok(res.json().await?)
}
