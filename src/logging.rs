//! Middleware for logging requests and responses.

use axum::{
    body::{Body, Bytes},
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::Error;

/// Bodies longer than this many bytes are truncated in `info` level logs.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is
/// truncated and the full body is logged at the `debug` level.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body_bytes = match read_body(body).await {
        Ok(bytes) => bytes,
        Err(error) => return error.into_response(),
    };
    log_request(&parts, &String::from_utf8_lossy(&body_bytes));

    let request = Request::from_parts(parts, Body::from(body_bytes));
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_bytes = match read_body(body).await {
        Ok(bytes) => bytes,
        Err(error) => return error.into_response(),
    };
    log_response(&parts, &String::from_utf8_lossy(&body_bytes));

    Response::from_parts(parts, Body::from(body_bytes))
}

async fn read_body(body: Body) -> Result<Bytes, Error> {
    axum::body::to_bytes(body, usize::MAX).await.map_err(|error| {
        tracing::error!("could not read body: {error}");
        Error::BodyReadError
    })
}

/// Shorten `body` to at most [LOG_BODY_LENGTH_LIMIT] bytes without splitting a character.
fn truncate_body(body: &str) -> Option<&str> {
    if body.len() <= LOG_BODY_LENGTH_LIMIT {
        return None;
    }

    let mut end = LOG_BODY_LENGTH_LIMIT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }

    Some(&body[..end])
}

fn log_request(parts: &axum::http::request::Parts, body: &str) {
    match truncate_body(body) {
        Some(truncated) => {
            tracing::info!(
                "Received request: {} {}\nbody: {truncated}...",
                parts.method,
                parts.uri
            );
            tracing::debug!("Full request body: {body:?}");
        }
        None => tracing::info!(
            "Received request: {} {}\nbody: {body:?}",
            parts.method,
            parts.uri
        ),
    }
}

fn log_response(parts: &axum::http::response::Parts, body: &str) {
    match truncate_body(body) {
        Some(truncated) => {
            tracing::info!("Sending response: {}\nbody: {truncated}...", parts.status);
            tracing::debug!("Full response body: {body:?}");
        }
        None => tracing::info!("Sending response: {}\nbody: {body:?}", parts.status),
    }
}

#[cfg(test)]
mod logging_tests {
    use axum::{Json, Router, middleware, routing::post};
    use axum_test::TestServer;
    use serde_json::{Value, json};

    use super::{LOG_BODY_LENGTH_LIMIT, logging_middleware, truncate_body};

    #[test]
    fn short_body_is_not_truncated() {
        assert_eq!(truncate_body("{\"name\":\"Comida\"}"), None);
    }

    #[test]
    fn long_body_is_truncated_to_limit() {
        let body = "a".repeat(LOG_BODY_LENGTH_LIMIT + 10);

        let truncated = truncate_body(&body).unwrap();

        assert_eq!(truncated.len(), LOG_BODY_LENGTH_LIMIT);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        // 'é' is two bytes, so byte 64 falls in the middle of a character.
        let body = format!("a{}", "é".repeat(LOG_BODY_LENGTH_LIMIT));

        let truncated = truncate_body(&body).unwrap();

        assert_eq!(truncated.len(), LOG_BODY_LENGTH_LIMIT - 1);
    }

    #[tokio::test]
    async fn middleware_passes_body_through() {
        async fn echo(Json(body): Json<Value>) -> Json<Value> {
            Json(body)
        }

        let app = Router::new()
            .route("/echo", post(echo))
            .layer(middleware::from_fn(logging_middleware));
        let server = TestServer::new(app);
        let body = json!({ "description": "x".repeat(LOG_BODY_LENGTH_LIMIT * 2) });

        let response = server.post("/echo").json(&body).await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>(), body);
    }
}
