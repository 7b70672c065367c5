use std::{collections::HashMap, sync::Arc};

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

pub const ETAG: &str = "\"etag\"";
pub const README: &str = "# hello-world";
pub const RAW_CONTENT_TYPE: &str = "application/vnd.github.v3.raw; charset=utf-8";

const ARCHIVE_HEX: &str = "1f8b0800000000000003cb4f2ec9cfce2cd14dcbac28292d4ad5cd2f4ad74d4f2dd14d2c4acec82c4bd53580007d060a0050bfb9b9a90203c428741ac2313436343307222320dbc010a8dc5c81c194124b8905a5c525894540a714e5e797e05347481edd734304e41319ff41ae8e2ebeae7ab92964d801d46f66668227fe0d4d51e3dfc8d0c8d808284f75df6201233cfe951590627ba01d330a46c1281805a3806e000024cb59d6000a0000";

/// Decoded at compile time; a malformed fixture fails the build.
const ARCHIVE: [u8; 172] = decode_hex(ARCHIVE_HEX);

const fn hex_digit(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'f' => b - b'a' + 10,
        _ => panic!("archive fixture contains a non-hex digit"),
    }
}

const fn decode_hex<const N: usize>(hex: &str) -> [u8; N] {
    let digits = hex.as_bytes();
    assert!(digits.len() == N * 2, "archive fixture has the wrong length");
    let mut out = [0u8; N];
    let mut i = 0;
    while i < N {
        out[i] = (hex_digit(digits[2 * i]) << 4) | hex_digit(digits[2 * i + 1]);
        i += 1;
    }
    out
}

/// The gzip payload served by the archive route.
pub fn archive() -> Vec<u8> {
    ARCHIVE.to_vec()
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Repo {
    pub name: String,
    pub private: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Issue {
    pub id: Uuid,
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub assignees: Vec<String>,
    #[serde(default)]
    pub milestone: Option<u64>,
}

#[derive(Deserialize)]
pub struct CreateIssue {
    pub title: String,
    pub body: Option<String>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub assignees: Vec<String>,
    pub milestone: Option<u64>,
}

#[derive(Deserialize)]
pub struct RepoFilter {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

pub type Db = Arc<RwLock<HashMap<String, Vec<Issue>>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/", get(echo_headers))
        .route("/echo", post(echo_body).put(echo_body).patch(echo_body))
        .route("/orgs/{org}", get(get_org))
        .route("/orgs/{org}/repos", get(list_repos))
        .route("/repos/{owner}/{repo}/issues", get(list_issues).post(create_issue))
        .route("/repos/{owner}/{repo}/pulls/{number}", get(get_pull))
        .route("/repos/{owner}/{repo}/contents/{*path}", get(get_contents))
        .route("/user/starred/{owner}/{repo}", put(star_repo))
        .route("/{owner}/{repo}/legacy.tar.gz/{reference}", get(get_archive))
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "mock server listening");
    }
    axum::serve(listener, app()).await
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "message": "Not Found",
            "documentation_url": "https://developer.github.com/v3"
        })),
    )
        .into_response()
}

/// Reflect request headers as a JSON object.
async fn echo_headers(headers: HeaderMap) -> Json<Map<String, Value>> {
    let echoed = headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), Value::String(v.to_string())))
        })
        .collect();
    Json(echoed)
}

async fn echo_body(Json(body): Json<Value>) -> Json<Value> {
    Json(body)
}

async fn get_org(Path(org): Path<String>, headers: HeaderMap) -> Response {
    if org == "nope" {
        return not_found();
    }
    let cached = headers
        .get(header::IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|tag| tag.trim_matches('"') == ETAG.trim_matches('"'));
    if cached {
        return (StatusCode::NOT_MODIFIED, [(header::ETAG, ETAG)]).into_response();
    }
    ([(header::ETAG, ETAG)], Json(json!({ "login": org }))).into_response()
}

async fn list_repos(Path(org): Path<String>, Query(filter): Query<RepoFilter>) -> Json<Vec<Repo>> {
    let repos = [
        Repo {
            name: format!("{org}.github.io"),
            private: false,
        },
        Repo {
            name: "secret-plans".to_string(),
            private: true,
        },
    ];
    let repos = repos
        .into_iter()
        .filter(|repo| match filter.kind.as_deref() {
            Some("private") => repo.private,
            Some("public") => !repo.private,
            _ => true,
        })
        .collect();
    Json(repos)
}

async fn list_issues(
    State(db): State<Db>,
    Path((owner, repo)): Path<(String, String)>,
) -> Json<Vec<Issue>> {
    let issues = db.read().await;
    Json(issues.get(&format!("{owner}/{repo}")).cloned().unwrap_or_default())
}

async fn create_issue(
    State(db): State<Db>,
    Path((owner, repo)): Path<(String, String)>,
    Json(input): Json<CreateIssue>,
) -> (StatusCode, Json<Issue>) {
    let mut db = db.write().await;
    let issues = db.entry(format!("{owner}/{repo}")).or_default();
    let issue = Issue {
        id: Uuid::new_v4(),
        number: issues.len() as u64 + 1,
        title: input.title,
        body: input.body,
        labels: input.labels,
        assignees: input.assignees,
        milestone: input.milestone,
    };
    issues.push(issue.clone());
    (StatusCode::CREATED, Json(issue))
}

async fn get_pull(Path((owner, repo, number)): Path<(String, String, u64)>) -> Response {
    if number != 1 {
        return not_found();
    }
    Json(json!({ "number": number, "base": { "repo": { "full_name": format!("{owner}/{repo}") } } }))
        .into_response()
}

async fn get_contents(
    Path((_owner, _repo, path)): Path<(String, String, String)>,
    headers: HeaderMap,
) -> Response {
    if path != "README.md" {
        return not_found();
    }
    let raw = headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains(".raw"));
    if raw {
        return ([(header::CONTENT_TYPE, RAW_CONTENT_TYPE)], README).into_response();
    }
    Json(json!({ "name": path, "size": README.len() })).into_response()
}

/// Starring takes no payload; a request body is rejected.
async fn star_repo(headers: HeaderMap, body: Bytes) -> StatusCode {
    if !body.is_empty() || headers.contains_key(header::CONTENT_TYPE) {
        return StatusCode::BAD_REQUEST;
    }
    if !headers.contains_key(header::AUTHORIZATION) {
        return StatusCode::UNAUTHORIZED;
    }
    StatusCode::NO_CONTENT
}

async fn get_archive(Path((_owner, _repo, _reference)): Path<(String, String, String)>) -> Response {
    ([(header::CONTENT_TYPE, "application/x-gzip")], archive()).into_response()
}
