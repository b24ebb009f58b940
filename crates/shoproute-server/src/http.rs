//! Axum front end
//!
//! A single fallback handler feeds every request into the dispatch
//! pipeline and translates the error taxonomy into HTTP statuses:
//! unknown shop, routing misses and unregistered handler names are 404s,
//! a missing route table is a 500 (broken deployment).

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use std::sync::Arc;
use tracing::{error, warn};

use shoproute_core::Error;

use crate::app::{AppState, DispatchOutcome};

pub fn router(state: Arc<AppState>) -> axum::Router {
    axum::Router::new()
        .fallback(dispatch_request)
        .with_state(state)
}

async fn dispatch_request(
    State(state): State<Arc<AppState>>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let host = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    match state.dispatch(host, uri.path()).await {
        Ok(DispatchOutcome::Response(response)) => Response::builder()
            .status(StatusCode::from_u16(response.status).unwrap_or(StatusCode::OK))
            .header(header::CONTENT_TYPE, response.content_type)
            .body(Body::from(response.body))
            .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response()),
        Ok(DispatchOutcome::NoRoute) => {
            (StatusCode::NOT_FOUND, "Not Found").into_response()
        }
        Err(Error::ShopNotFound(what)) => {
            warn!(host, what = %what, "shop not found");
            (StatusCode::NOT_FOUND, "Not Found").into_response()
        }
        Err(Error::HandlerNotFound(name)) => {
            // Matched by the generic fallback route but nothing serves it;
            // from the visitor's side this is an ordinary miss.
            warn!(host, handler = %name, "no handler registered for matched route");
            (StatusCode::NOT_FOUND, "Not Found").into_response()
        }
        Err(e @ Error::RouteTableMissing(_)) => {
            error!(host, error = %e, "broken deployment: route table missing");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
        Err(e) => {
            error!(host, error = %e, "dispatch failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}
