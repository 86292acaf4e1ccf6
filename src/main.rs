//! Matching engine binary: line-protocol TCP acceptor plus REST API.
//!
//! Connections on `LINE_PORT` speak the plain-text protocol, one detached
//! worker each; the REST server on `PORT` shares the same engine. Events go
//! to stdout as JSON lines.

use crossbook_matching_engine::api;
use crossbook_matching_engine::proto::run_line_acceptor;
use crossbook_matching_engine::{Engine, StdoutSink};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() {
    let _ = env_logger::try_init();
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);
    let line_port: u16 = std::env::var("LINE_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(9001);

    let engine = Arc::new(Engine::new(Arc::new(StdoutSink)));

    let line_listener =
        std::net::TcpListener::bind(("0.0.0.0", line_port)).expect("bind line port");
    eprintln!("line protocol on 0.0.0.0:{}", line_port);
    {
        let engine = Arc::clone(&engine);
        std::thread::spawn(move || run_line_acceptor(line_listener, engine));
    }

    let app = api::create_router(engine);
    let addr = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&addr).await.expect("bind");
    eprintln!("listening on http://{}", addr);
    axum::serve(listener, app.into_make_service())
        .await
        .expect("serve");
}
