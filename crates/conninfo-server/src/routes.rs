use std::collections::BTreeMap;
use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::any,
    Router,
};
use chrono::Utc;
use tracing::info;

use conninfo_core::{BrowserClassification, ResolvedAddress};

use crate::render::render_page;
use crate::types::{ConnectionReport, HeaderEntry};

/// Report the caller's connection details as an HTML page.
///
/// Serves every method. The transport peer address comes from
/// `ConnectInfo`, so the router must be served with
/// `into_make_service_with_connect_info::<SocketAddr>`.
pub async fn connection_info(
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    request: Request,
) -> Response {
    let transport = peer.to_string();
    let headers = request.headers();

    let resolved = ResolvedAddress::resolve(
        header_str(headers, "x-forwarded-for"),
        header_str(headers, "x-real-ip"),
        &transport,
    );
    let user_agent = BrowserClassification::from_user_agent(header_str(headers, "user-agent"));

    info!("Serving connection report for {}", resolved.value);

    let report = ConnectionReport {
        client_ip: resolved.value,
        address_source: resolved.source,
        remote_addr: transport,
        method: request.method().to_string(),
        path: request.uri().path().to_string(),
        query_params: parse_query(request.uri().query()),
        headers: collect_headers(headers),
        user_agent,
        timestamp: Utc::now(),
    };

    Html(render_page(&report)).into_response()
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "404 Not Found")
}

/// Configure the service routes: the connection report on `/` for every
/// method, a plain 404 for any other path.
pub fn configure_routes() -> Router {
    Router::new()
        .route("/", any(connection_info))
        .fallback(not_found)
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// All request headers sorted by name, values for repeated names joined
/// with `", "`.
fn collect_headers(headers: &HeaderMap) -> Vec<HeaderEntry> {
    let mut entries: Vec<HeaderEntry> = headers
        .keys()
        .map(|name| {
            let value = headers
                .get_all(name)
                .iter()
                .filter_map(|v| v.to_str().ok())
                .collect::<Vec<_>>()
                .join(", ");
            HeaderEntry {
                name: name.as_str().to_string(),
                value,
            }
        })
        .collect();
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    entries
}

/// Parse the raw query string into sorted key/values, accumulating
/// repeated keys in request order. An unparseable query yields an empty
/// map rather than an error.
fn parse_query(query: Option<&str>) -> BTreeMap<String, Vec<String>> {
    let mut params: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let Some(query) = query else {
        return params;
    };
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query).unwrap_or_default();
    for (key, value) in pairs {
        params.entry(key).or_default().push(value);
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_root_serves_report() {
        let app = configure_routes();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/")
                    .extension(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 12345))))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_path_returns_404() {
        let app = configure_routes();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api")
                    .extension(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 12345))))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_parse_query_accumulates_repeated_keys() {
        let params = parse_query(Some("a=1&b=2&a=3"));
        assert_eq!(params["a"], vec!["1", "3"]);
        assert_eq!(params["b"], vec!["2"]);
    }

    #[test]
    fn test_parse_query_empty_and_missing() {
        assert!(parse_query(None).is_empty());
        assert!(parse_query(Some("")).is_empty());
    }
}
