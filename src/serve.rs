//! Development server with live rebuild support.
//!
//! A lightweight HTTP server built on `tiny_http`:
//!
//! - Static file serving from the build output directory
//! - Automatic `index.html` resolution for directories
//! - `404.html` for misses, served with status 404
//! - `GET /api/hotels?q=&status=` over the live hotel snapshot
//! - File watching and auto-rebuild (via `watch` module)
//! - Graceful shutdown on Ctrl+C
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌──────────────────┐     ┌──────────────┐
//! │  Request Thread │     │  Watcher Thread  │     │ tokio worker │
//! │  (HTTP Server)  │     │  (File Monitor)  │     │  (loads)     │
//! └────────┬────────┘     └────────┬─────────┘     └──────┬───────┘
//!          │                       │ rebuild,             │
//!          │ read                  │ spawn_load ─────────►│
//!          ▼                       ▼                      │ settle
//!     Slot<Directory> ◄───────────────────────────────────┘
//!     config.build.output (public/)
//! ```

use crate::{
    config::{SiteConfig, cfg},
    error::SiteError,
    loader::{LoadState, Slot},
    log,
    render::routes,
    source::fetch_hotels,
    view::{Directory, StatusFilter},
    watch::watch_for_changes_blocking,
};
use anyhow::{Context, Result, anyhow};
use serde_json::json;
use std::{
    fs,
    net::{IpAddr, SocketAddr},
    path::{Component, Path, PathBuf},
    sync::Arc,
};
use tiny_http::{Header, Request, Response, Server};
use tokio::runtime::Handle;

/// Try binding to port, retry with incremented port if in use
const MAX_PORT_RETRIES: u16 = 10;

/// Live hotel snapshot shared by the request and watcher threads.
pub type Snapshot = Slot<Directory>;

/// Load the hotel file into a fresh [`Directory`].
pub async fn load_directory(path: PathBuf) -> Result<Directory, SiteError> {
    fetch_hotels(&path).await.map(Directory::new)
}

/// (Re)load the snapshot from the configured hotel file.
///
/// Must be called inside the tokio runtime; a newer call supersedes an older one.
pub fn reload_snapshot(snapshot: &Snapshot) {
    snapshot.spawn_load(load_directory(cfg().build.data.hotels.clone()));
}

// ============================================================================
// Server Entry Point
// ============================================================================

/// Start the development server with optional file watching.
///
/// This function:
/// 1. Binds to the configured interface and port (with auto-retry on port conflict)
/// 2. Sets up Ctrl+C handler for graceful shutdown
/// 3. Starts loading the hotel snapshot and spawns the watcher thread (if enabled)
/// 4. Enters the main request handling loop
///
/// Blocks until Ctrl+C is received; `runtime` runs the snapshot loads.
pub fn serve_site(runtime: Handle) -> Result<()> {
    let c = cfg();
    let interface: IpAddr = c.serve.interface.parse()?;

    let (server, addr) = try_bind_port(interface, c.serve.port, MAX_PORT_RETRIES)?;
    let server = Arc::new(server);

    let server_for_signal = Arc::clone(&server);
    ctrlc::set_handler(move || {
        log!("serve"; "shutting down...");
        server_for_signal.unblock();
    })
    .context("Failed to set Ctrl+C handler")?;

    let snapshot = Snapshot::new();
    {
        let _guard = runtime.enter();
        reload_snapshot(&snapshot);
    }

    log!("serve"; "http://{}", addr);

    if c.serve.watch {
        let snapshot = snapshot.clone();
        std::thread::spawn(move || {
            if let Err(err) = watch_for_changes_blocking(&runtime, &snapshot) {
                log!("watch"; "{err:#}");
            }
        });
    }

    // Blocks until Ctrl+C
    for request in server.incoming_requests() {
        // Re-load config on each request to pick up hot-reloaded changes
        if let Err(e) = handle_request(request, &cfg(), &snapshot) {
            log!("serve"; "request error: {e}");
        }
    }

    snapshot.cancel();
    Ok(())
}

/// Try to bind to a port, retrying with incremented port numbers if in use.
fn try_bind_port(interface: IpAddr, base_port: u16, max_retries: u16) -> Result<(Server, SocketAddr)> {
    let mut last_err = None;
    for offset in 0..max_retries {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(e) => last_err = Some(e),
        }
    }

    Err(anyhow!(
        "Failed to bind after {} attempts (ports {}-{}): {}",
        max_retries,
        base_port,
        base_port.saturating_add(max_retries.saturating_sub(1)),
        last_err.map(|e| e.to_string()).unwrap_or_default()
    ))
}

// ============================================================================
// Request Handling
// ============================================================================

/// A response before it is handed to `tiny_http`.
#[derive(Debug)]
struct Reply {
    status: u16,
    content_type: &'static str,
    body: Vec<u8>,
}

impl Reply {
    fn json(status: u16, value: &serde_json::Value) -> Self {
        Self {
            status,
            content_type: "application/json; charset=utf-8",
            body: value.to_string().into_bytes(),
        }
    }

    fn error(status: u16, message: impl ToString) -> Self {
        Self::json(status, &json!({ "error": message.to_string() }))
    }
}

/// Handle a single HTTP request.
///
/// Resolution order:
/// 1. `/api/hotels` → search the live snapshot
/// 2. Exact file match → serve file
/// 3. Directory with index.html → serve index.html
/// 4. Nothing found → `404.html` with status 404
fn handle_request(request: Request, config: &SiteConfig, snapshot: &Snapshot) -> Result<()> {
    let (path, query) = request.url().split_once('?').unwrap_or((request.url(), ""));
    let reply = if path == routes::API_HOTELS {
        api_hotels(query, snapshot)
    } else {
        static_file(&config.build.output, path)?
    };

    let header = Header::from_bytes("Content-Type", reply.content_type)
        .map_err(|()| anyhow!("invalid content type {}", reply.content_type))?;
    let response = Response::from_data(reply.body)
        .with_status_code(reply.status)
        .with_header(header);
    request.respond(response)?;
    Ok(())
}

/// Search the snapshot: `{ filtered, topClean, recentlyReported }`.
fn api_hotels(query: &str, snapshot: &Snapshot) -> Reply {
    let mut text = String::new();
    let mut filter = StatusFilter::All;

    for (key, value) in parse_query(query) {
        match key.as_str() {
            "q" => text = value,
            "status" => match value.parse() {
                Ok(parsed) => filter = parsed,
                Err(err) => return Reply::error(400, err),
            },
            _ => {}
        }
    }

    match snapshot.state() {
        LoadState::Ready(directory) => {
            let view = directory.view(&text, filter);
            match serde_json::to_value(&*view) {
                Ok(value) => Reply::json(200, &value),
                Err(err) => Reply::error(500, err),
            }
        }
        LoadState::Failed(err) => Reply::error(503, err),
        LoadState::Idle | LoadState::Loading => Reply::error(503, "hotel data is loading"),
    }
}

/// Decode `a=1&b=two+words` into pairs. `+` is a space.
fn parse_query(query: &str) -> Vec<(String, String)> {
    let decode = |s: &str| {
        let s = s.replace('+', " ");
        urlencoding::decode(&s).map_or(s.clone(), |d| d.into_owned())
    };

    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode(key), decode(value))
        })
        .collect()
}

/// Serve a file from the output directory, or its 404 page.
fn static_file(root: &Path, url_path: &str) -> Result<Reply> {
    if let Some(path) = resolve(root, url_path) {
        let body = fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?;
        return Ok(Reply {
            status: 200,
            content_type: guess_content_type(&path),
            body,
        });
    }

    let not_found = root.join(routes::NOT_FOUND.trim_start_matches('/'));
    Ok(match fs::read(&not_found) {
        Ok(body) => Reply {
            status: 404,
            content_type: "text/html; charset=utf-8",
            body,
        },
        Err(_) => Reply {
            status: 404,
            content_type: "text/plain; charset=utf-8",
            body: b"404 Not Found".to_vec(),
        },
    })
}

/// File behind `url_path`, resolving directories to their `index.html`.
///
/// Paths that would leave `root` resolve to nothing.
fn resolve(root: &Path, url_path: &str) -> Option<PathBuf> {
    // Decode URL-encoded characters (e.g., %20 → space)
    let decoded = urlencoding::decode(url_path).ok()?;
    let rel = Path::new(decoded.trim_matches('/'));
    if rel.components().any(|c| !matches!(c, Component::Normal(_))) {
        return None;
    }

    let local = root.join(rel);
    if local.is_file() {
        return Some(local);
    }
    let index = local.join("index.html");
    index.is_file().then_some(index)
}

// ============================================================================
// Content Type Detection
// ============================================================================

/// Guess MIME content type from file extension.
///
/// Returns `application/octet-stream` for unknown extensions.
fn guess_content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        // Web content
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js" | "mjs") => "application/javascript; charset=utf-8",
        Some("json") => "application/json; charset=utf-8",
        Some("xml") => "application/xml; charset=utf-8",

        // Images
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("avif") => "image/avif",
        Some("ico") => "image/x-icon",

        // Fonts
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",

        Some("txt") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Status, test_hotel};
    use tempfile::TempDir;

    fn ready_snapshot() -> Snapshot {
        let snapshot = Snapshot::new();
        let ticket = snapshot.begin();
        snapshot.settle(
            ticket,
            Ok(Directory::new(vec![
                test_hotel("a", Status::Clean, "2024-07-01"),
                test_hotel("b", Status::PestReported, "2024-07-15"),
            ])),
        );
        snapshot
    }

    fn body(reply: &Reply) -> serde_json::Value {
        serde_json::from_slice(&reply.body).unwrap()
    }

    #[test]
    fn test_parse_query() {
        assert_eq!(
            parse_query("q=new+york&status=clean&x"),
            [
                ("q".to_string(), "new york".to_string()),
                ("status".to_string(), "clean".to_string()),
                ("x".to_string(), String::new()),
            ]
        );
        assert_eq!(parse_query("q=caf%C3%A9"), [("q".to_string(), "café".to_string())]);
        assert!(parse_query("").is_empty());
    }

    #[test]
    fn test_api_hotels_ready() {
        let reply = api_hotels("", &ready_snapshot());
        assert_eq!(reply.status, 200);

        let json = body(&reply);
        assert_eq!(json["filtered"][0]["id"], "b");
        assert_eq!(json["filtered"][1]["id"], "a");
        assert_eq!(json["topClean"][0]["id"], "a");
        assert_eq!(json["recentlyReported"][0]["id"], "b");
    }

    #[test]
    fn test_api_hotels_filters() {
        let reply = api_hotels("status=pest-reported&q=HOTEL+B", &ready_snapshot());
        let json = body(&reply);
        assert_eq!(json["filtered"].as_array().unwrap().len(), 1);
        assert_eq!(json["filtered"][0]["id"], "b");
    }

    #[test]
    fn test_api_hotels_bad_filter() {
        let reply = api_hotels("status=haunted", &ready_snapshot());
        assert_eq!(reply.status, 400);
        assert!(body(&reply)["error"].as_str().unwrap().contains("haunted"));
    }

    #[test]
    fn test_api_hotels_unavailable() {
        let snapshot = Snapshot::new();
        snapshot.begin();
        assert_eq!(api_hotels("", &snapshot).status, 503);

        let ticket = snapshot.begin();
        snapshot.settle(ticket, Err(SiteError::fetch("data/hotels.json", "offline")));
        let reply = api_hotels("", &snapshot);
        assert_eq!(reply.status, 503);
        assert!(body(&reply)["error"].as_str().unwrap().contains("offline"));
    }

    #[test]
    fn test_resolve() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("hotel/a b")).unwrap();
        fs::write(root.join("index.html"), "home").unwrap();
        fs::write(root.join("hotel/a b/index.html"), "a").unwrap();
        fs::write(root.join("style.css"), "").unwrap();

        assert_eq!(resolve(root, "/"), Some(root.join("index.html")));
        assert_eq!(resolve(root, "/hotel/a%20b/"), Some(root.join("hotel/a b/index.html")));
        assert_eq!(resolve(root, "/style.css"), Some(root.join("style.css")));
        assert_eq!(resolve(root, "/missing/"), None);
        assert_eq!(resolve(root, "/../etc/passwd"), None);
    }

    #[test]
    fn test_static_file_not_found_page() {
        let dir = TempDir::new().unwrap();
        let reply = static_file(dir.path(), "/nope/").unwrap();
        assert_eq!(reply.status, 404);
        assert_eq!(reply.content_type, "text/plain; charset=utf-8");

        fs::write(dir.path().join("404.html"), "<h1>Page not found</h1>").unwrap();
        let reply = static_file(dir.path(), "/nope/").unwrap();
        assert_eq!(reply.status, 404);
        assert_eq!(reply.body, b"<h1>Page not found</h1>");
    }

    #[test]
    fn test_guess_content_type() {
        assert_eq!(guess_content_type(Path::new("a.html")), "text/html; charset=utf-8");
        assert_eq!(guess_content_type(Path::new("feed.xml")), "application/xml; charset=utf-8");
        assert_eq!(guess_content_type(Path::new("blob")), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_load_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hotels.json");
        fs::write(
            &path,
            r#"[{"id":"x","name":"X","city":"Y","status":"Clean","lastUpdated":"2024-01-01"}]"#,
        )
        .unwrap();

        let directory = load_directory(path).await.unwrap();
        assert!(directory.get("x").is_some());

        let missing = load_directory(dir.path().join("nope.json")).await;
        assert!(matches!(missing, Err(SiteError::Fetch { .. })));
    }
}
