//! Blog server with live reload
//!
//! Pages are rendered on every request: posts are re-read from disk and
//! their live snippets re-run, so edits show up without a restart.

use anyhow::Result;
use axum::{
    extract::{
        ws::{Message, WebSocket},
        Path, Query, State, WebSocketUpgrade,
    },
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::helpers::{filter_by_tag, top_tags};
use crate::processor::ContentProcessor;
use crate::templates::{self, PageOptions};
use crate::Blog;

/// Server state
struct ServerState {
    blog: Blog,
    processor: ContentProcessor,
    reload_tx: broadcast::Sender<()>,
    options: PageOptions,
}

/// A rendered page and the status to send it with
type Page = (StatusCode, String);

#[derive(Debug, Deserialize)]
struct IndexQuery {
    tag: Option<String>,
}

/// Start the blog server
pub async fn start(blog: Blog, ip: &str, port: u16, live_reload: bool) -> Result<()> {
    // Create broadcast channel for live reload notifications
    let (reload_tx, _) = broadcast::channel::<()>(16);

    let processor = blog.processor();
    let static_dir = blog.static_dir.clone();
    let state = Arc::new(ServerState {
        blog,
        processor,
        reload_tx: reload_tx.clone(),
        options: PageOptions { live_reload },
    });

    let app = Router::new()
        .route("/", get(index_handler))
        .route("/post/:slug", get(post_handler))
        .route("/__livereload", get(livereload_handler))
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    if live_reload {
        println!("Live reload enabled. Watching for changes...");
    }
    println!("Press Ctrl+C to stop.");

    if live_reload {
        let dirs = vec![state.blog.posts_dir.clone(), state.blog.static_dir.clone()];
        tokio::task::spawn_blocking(move || {
            if let Err(e) = watch_and_reload(dirs, reload_tx) {
                tracing::error!("File watcher error: {}", e);
            }
        });
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
    }
}

/// Watch content directories and tell connected pages to reload.
/// Blocks until the event channel closes.
fn watch_and_reload(dirs: Vec<PathBuf>, reload_tx: broadcast::Sender<()>) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel();

    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    for dir in dirs.iter().filter(|d| d.exists()) {
        debouncer.watcher().watch(dir, RecursiveMode::Recursive)?;
        tracing::debug!("Watching: {:?}", dir);
    }

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let relevant: Vec<_> = events
                    .iter()
                    .filter(|e| {
                        let path_str = e.path.to_string_lossy();
                        !path_str.contains(".DS_Store")
                            && !path_str.ends_with('~')
                            && !path_str.ends_with(".swp")
                    })
                    .collect();

                if relevant.is_empty() {
                    continue;
                }

                for event in &relevant {
                    tracing::info!("File changed: {}", event.path.display());
                }

                // No receivers just means no page is open
                let _ = reload_tx.send(());
            }
            Ok(Err(e)) => {
                tracing::error!("Watch error: {:?}", e);
            }
            Err(e) => {
                tracing::error!("Channel error: {:?}", e);
                break;
            }
        }
    }

    Ok(())
}

async fn index_handler(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<IndexQuery>,
) -> Response {
    let tag = query.tag.filter(|t| !t.is_empty());
    run_page(move || render_index(&state, tag.as_deref())).await
}

async fn post_handler(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
) -> Response {
    run_page(move || render_post(&state, &slug)).await
}

/// Render a page off the async runtime. Loading touches the disk and live
/// snippets may take a while.
async fn run_page<F>(render: F) -> Response
where
    F: FnOnce() -> Page + Send + 'static,
{
    match tokio::task::spawn_blocking(render).await {
        Ok((status, html)) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Page rendering panicked: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
        }
    }
}

fn render_index(state: &ServerState, tag: Option<&str>) -> Page {
    let posts = state.blog.loader().load_posts();
    let tags = top_tags(&posts, state.blog.config.top_tags);
    let shown = filter_by_tag(&posts, tag);

    let html = templates::index_page(&state.blog.config, &shown, &tags, tag, state.options);
    (StatusCode::OK, html.into_string())
}

fn render_post(state: &ServerState, slug: &str) -> Page {
    match state.blog.loader().find_post(slug) {
        Ok(Some(post)) => {
            let body = state.processor.render(&post.raw_body);
            let html = templates::post_page(&state.blog.config, &post, &body, state.options);
            (StatusCode::OK, html.into_string())
        }
        Ok(None) => {
            tracing::debug!("No post named {:?}", slug);
            let html = templates::not_found_page(&state.blog.config, state.options);
            (StatusCode::NOT_FOUND, html.into_string())
        }
        Err(e) => {
            tracing::warn!("Failed to load post {:?}: {}", slug, e);
            let html =
                templates::load_error_page(&state.blog.config, slug, &e.to_string(), state.options);
            (StatusCode::INTERNAL_SERVER_ERROR, html.into_string())
        }
    }
}

/// WebSocket handler for live reload
async fn livereload_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    let reload_rx = state.reload_tx.subscribe();
    ws.on_upgrade(move |socket| handle_livereload_socket(socket, reload_rx))
}

/// Handle WebSocket connection for live reload
async fn handle_livereload_socket(mut socket: WebSocket, mut reload_rx: broadcast::Receiver<()>) {
    tracing::debug!("Live reload client connected");

    loop {
        tokio::select! {
            result = reload_rx.recv() => {
                match result {
                    Ok(_) => {
                        if socket.send(Message::Text("reload".to_string())).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
        }
    }

    tracing::debug!("Live reload client disconnected");
}
