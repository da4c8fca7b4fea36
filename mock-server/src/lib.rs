use std::{collections::BTreeMap, sync::Arc, time::Duration};

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, Method, StatusCode},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

/// How long `/slow` waits before answering.
pub const SLOW_DELAY: Duration = Duration::from_secs(5);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: u64,
    pub name: String,
}

/// What `/echo` saw of the incoming request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub content_type: Option<String>,
    pub accept_encoding: Option<String>,
}

pub type Db = Arc<RwLock<BTreeMap<u64, Item>>>;

fn seed() -> BTreeMap<u64, Item> {
    [(1, "x"), (2, "y")]
        .into_iter()
        .map(|(id, name)| {
            (
                id,
                Item {
                    id,
                    name: name.to_string(),
                },
            )
        })
        .collect()
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(seed()));
    Router::new()
        .route("/items", get(list_items).post(create_item))
        .route("/items/{id}", get(get_item))
        .route("/echo", get(echo).post(echo))
        .route("/empty", get(empty))
        .route("/malformed", get(malformed))
        .route("/slow", get(slow))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_items(State(db): State<Db>) -> Json<Vec<Item>> {
    let items = db.read().await;
    Json(items.values().cloned().collect())
}

async fn create_item(State(db): State<Db>) -> (StatusCode, Json<Item>) {
    let mut items = db.write().await;
    let id = items.keys().next_back().map_or(1, |last| last + 1);
    let item = Item {
        id,
        name: format!("item {id}"),
    };
    items.insert(id, item.clone());
    log::debug!("created item {id}");
    (StatusCode::CREATED, Json(item))
}

/// Missing items answer 404 with no body at all.
async fn get_item(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<Item>, StatusCode> {
    let items = db.read().await;
    items.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn echo(method: Method, headers: HeaderMap) -> Json<Echo> {
    let header_text = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    Json(Echo {
        method: method.to_string(),
        content_type: header_text(header::CONTENT_TYPE),
        accept_encoding: header_text(header::ACCEPT_ENCODING),
    })
}

async fn empty() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn malformed() -> &'static str {
    "this is not json"
}

async fn slow() -> Json<Item> {
    tokio::time::sleep(SLOW_DELAY).await;
    Json(Item {
        id: 0,
        name: "slow".to_string(),
    })
}
