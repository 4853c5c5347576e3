use std::{fs::OpenOptions, net::SocketAddr, path::Path, process::exit, sync::Arc};

use axum::{
    Router,
    extract::{MatchedPath, Request},
};
use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{
    EnvFilter, Layer, filter, layer::SubscriberExt, util::SubscriberInitExt,
};

use finanzas_rs::{AppState, CategoryDictionary, build_router, graceful_shutdown};

/// The REST API server for finanzas_rs.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The port to serve the API from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// File path to a JSON category dictionary that replaces the built-in one.
    #[arg(long)]
    dictionary_path: Option<String>,
}

#[tokio::main]
async fn main() {
    setup_logging();

    let args = Args::parse();

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));

    let dictionary = match &args.dictionary_path {
        Some(path) => match CategoryDictionary::from_json_file(Path::new(path)) {
            Ok(dictionary) => dictionary,
            Err(error) => {
                tracing::error!("Could not load the category dictionary from {path}: {error}");
                exit(1);
            }
        },
        None => CategoryDictionary::default(),
    };
    tracing::info!("Loaded {} categories", dictionary.iter().count());

    let conn = Connection::open(&args.db_path).expect("Could not open the database.");
    let state = match AppState::new(conn, dictionary) {
        Ok(state) => state,
        Err(error) => {
            tracing::error!("Could not initialize the database: {error}");
            exit(1);
        }
    };

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(build_router(state));

    tracing::info!("HTTP server listening on {}", addr);
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
        .expect("The server stopped unexpectedly.");
}

fn setup_logging() {
    let stdout_log = tracing_subscriber::fmt::layer().pretty();

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")
        .expect("Could not create log file");

    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(Arc::new(log_file));

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            stdout_log
                .with_filter(filter::LevelFilter::INFO)
                .and_then(debug_log)
                .with_filter(filter::LevelFilter::DEBUG),
        )
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // Errors are logged by the handlers themselves.
        .on_failure(());

    router.layer(tracing_layer)
}
