use {
  axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
  },
  serde_json::{json, Value},
  std::{
    collections::HashMap,
    net::TcpListener,
    sync::{Arc, Mutex},
    thread,
  },
  tokio::sync::oneshot,
};

pub const PROJECT_ID: &str = "m1r4";
pub const DATASET: &str = "production";

pub fn builder() -> Builder {
  Builder {
    collections: Vec::new(),
    fail: false,
    token: None,
  }
}

/// A collection document in the shape the marketplace query projects.
pub fn collection(slug: &str, title: &str, address: &str) -> Value {
  json!({
    "_id": format!("collection-{slug}"),
    "title": title,
    "address": address,
    "description": format!("{title} description"),
    "nftCollectionName": format!("{title} Apes"),
    "mainImage": {
      "asset": {
        "_ref": format!("image-{}main-2000x3000-jpg", slug.replace('-', "")),
        "_type": "reference"
      }
    },
    "previewImage": {
      "asset": {
        "_ref": format!("image-{}preview-800x800-png", slug.replace('-', "")),
        "_type": "reference"
      }
    },
    "slug": { "current": slug },
    "creator": {
      "_id": "creator-mira",
      "name": "Mira",
      "address": "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
      "slug": { "current": "mira" }
    }
  })
}

pub struct Builder {
  collections: Vec<Value>,
  fail: bool,
  token: Option<String>,
}

impl Builder {
  pub fn collection(mut self, collection: Value) -> Self {
    self.collections.push(collection);
    self
  }

  /// Answer every query with a server error.
  pub fn fail(mut self) -> Self {
    self.fail = true;
    self
  }

  /// Require `Authorization: Bearer <token>`.
  pub fn token(mut self, token: &str) -> Self {
    self.token = Some(token.into());
    self
  }

  pub fn build(self) -> Handle {
    let state = Arc::new(Mutex::new(Store {
      collections: self.collections,
      fail: self.fail,
      queries: Vec::new(),
      token: self.token,
    }));

    let router = Router::new()
      .route("/:version/data/query/:dataset", get(query))
      .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.set_nonblocking(true).unwrap();
    let port = listener.local_addr().unwrap().port();

    let (shutdown, receiver) = oneshot::channel::<()>();

    thread::spawn(move || {
      tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(async move {
          axum::Server::from_tcp(listener)
            .unwrap()
            .serve(router.into_make_service())
            .with_graceful_shutdown(async {
              receiver.await.ok();
            })
            .await
            .unwrap();
        });
    });

    Handle {
      port,
      shutdown: Some(shutdown),
      state,
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Request {
  pub version: String,
  pub dataset: String,
  pub params: HashMap<String, String>,
}

struct Store {
  collections: Vec<Value>,
  fail: bool,
  queries: Vec<Request>,
  token: Option<String>,
}

async fn query(
  State(state): State<Arc<Mutex<Store>>>,
  Path((version, dataset)): Path<(String, String)>,
  Query(params): Query<HashMap<String, String>>,
  headers: HeaderMap,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
  let mut store = state.lock().unwrap();

  store.queries.push(Request {
    version: version.clone(),
    dataset: dataset.clone(),
    params: params.clone(),
  });

  if store.fail {
    return Err((
      StatusCode::INTERNAL_SERVER_ERROR,
      Json(json!({ "error": "internal" })),
    ));
  }

  if let Some(token) = &store.token {
    let authorized = headers
      .get("authorization")
      .and_then(|value| value.to_str().ok())
      == Some(format!("Bearer {token}").as_str());

    if !authorized {
      return Err((
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "Unauthorized" })),
      ));
    }
  }

  if !version.starts_with('v') || dataset != DATASET {
    return Err((
      StatusCode::NOT_FOUND,
      Json(json!({ "error": "Not found" })),
    ));
  }

  let Some(groq) = params.get("query") else {
    return Err((
      StatusCode::BAD_REQUEST,
      Json(json!({ "error": "missing query" })),
    ));
  };

  let result = match params.get("$id") {
    Some(id) => {
      let slug = serde_json::from_str::<String>(id).map_err(|err| {
        (
          StatusCode::BAD_REQUEST,
          Json(json!({ "error": err.to_string() })),
        )
      })?;

      store
        .collections
        .iter()
        .find(|collection| collection["slug"]["current"] == slug.as_str())
        .cloned()
        .unwrap_or(Value::Null)
    }
    None => Value::Array(store.collections.clone()),
  };

  Ok(Json(json!({
    "ms": 1,
    "query": groq,
    "result": result,
  })))
}

pub struct Handle {
  port: u16,
  shutdown: Option<oneshot::Sender<()>>,
  state: Arc<Mutex<Store>>,
}

impl Handle {
  pub fn url(&self) -> String {
    format!("http://127.0.0.1:{}", self.port)
  }

  pub fn queries(&self) -> Vec<Request> {
    self.state.lock().unwrap().queries.clone()
  }
}

impl Drop for Handle {
  fn drop(&mut self) {
    if let Some(shutdown) = self.shutdown.take() {
      shutdown.send(()).ok();
    }
  }
}
