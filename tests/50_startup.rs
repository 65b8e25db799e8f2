//! Runs the built binary to check configuration handling at startup.

use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;

fn server_command() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_blog-list-api"));
    cmd.env_clear()
        .env("PATH", std::env::var("PATH").unwrap_or_default())
        .env("HOST", "127.0.0.1")
        .env("APP_ENV", "development")
        .env("STORE_BACKEND", "memory")
        .env("RUST_LOG", "error")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped());
    cmd
}

#[test]
fn missing_secret_stops_startup() -> Result<()> {
    let output = server_command().output().context("failed to run server binary")?;

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("SECRET"), "{stderr}");
    Ok(())
}

#[test]
fn postgres_backend_without_database_url_stops_startup() -> Result<()> {
    let output = server_command()
        .env("SECRET", "startup-secret")
        .env("STORE_BACKEND", "postgres")
        .output()
        .context("failed to run server binary")?;

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("DATABASE_URL"), "{stderr}");
    Ok(())
}

#[tokio::test]
async fn port_flag_overrides_environment() -> Result<()> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let mut child = server_command()
        .env("SECRET", "startup-secret")
        .env("PORT", "1")
        .arg("--port")
        .arg(port.to_string())
        .stderr(Stdio::null())
        .spawn()
        .context("failed to spawn server binary")?;

    let client = reqwest::Client::new();
    let deadline = Instant::now() + Duration::from_secs(10);
    let mut ready = false;
    while Instant::now() < deadline {
        if let Ok(res) = client.get(format!("http://127.0.0.1:{port}/health")).send().await {
            ready = res.status() == StatusCode::OK;
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    child.kill().ok();
    child.wait().ok();
    assert!(ready, "server did not answer on --port {port}");
    Ok(())
}
