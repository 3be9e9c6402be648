//! Client for the hosted content store's GROQ query API.

use {super::*, reqwest::Url, serde_json::Value};

const PROJECTION: &str = "{
  _id,
  title,
  address,
  description,
  nftCollectionName,
  mainImage {
    asset
  },
  previewImage {
    asset
  },
  slug {
    current
  },
  creator-> {
    _id,
    name,
    address,
    slug {
      current
    },
  },
}";

lazy_static! {
  static ref ALL_COLLECTIONS: String = format!("*[_type == 'collection'] {PROJECTION}");
  static ref COLLECTION_BY_SLUG: String =
    format!("*[_type == 'collection' && slug.current == $id][0] {PROJECTION}");
}

#[derive(Deserialize)]
struct QueryResponse<T> {
  result: T,
}

#[derive(Debug, Clone)]
pub struct ContentClient {
  client: reqwest::Client,
  dataset: String,
  project_id: String,
  query_url: Url,
  token: Option<String>,
}

impl ContentClient {
  pub const IMAGE_CDN: &'static str = "https://cdn.sanity.io";

  pub fn new(
    project_id: &str,
    dataset: &str,
    api_version: &str,
    api_url: Option<&str>,
    token: Option<String>,
    use_cdn: bool,
  ) -> Result<Self> {
    let base = match api_url {
      Some(url) => url.trim_end_matches('/').to_string(),
      None => format!(
        "https://{project_id}.{}.sanity.io",
        if use_cdn { "apicdn" } else { "api" }
      ),
    };

    let api_version = api_version.trim_start_matches('v');

    let query_url = format!("{base}/v{api_version}/data/query/{dataset}")
      .parse::<Url>()
      .with_context(|| format!("invalid content API URL `{base}`"))?;

    Ok(Self {
      client: reqwest::Client::new(),
      dataset: dataset.into(),
      project_id: project_id.into(),
      query_url,
      token,
    })
  }

  pub fn query_url(&self) -> &Url {
    &self.query_url
  }

  /// Every collection in the store. Documents that don't have the collection
  /// shape, such as drafts with a dangling creator reference, are skipped.
  pub async fn collections(&self) -> Result<Vec<Collection>> {
    Ok(
      self
        .query::<Vec<Value>>(&ALL_COLLECTIONS, None)
        .await?
        .into_iter()
        .filter_map(Self::decode)
        .collect(),
    )
  }

  /// Returns `None` when no collection has the given slug, or when the
  /// matching document is malformed.
  pub async fn collection(&self, slug: &str) -> Result<Option<Collection>> {
    Ok(
      self
        .query::<Option<Value>>(&COLLECTION_BY_SLUG, Some(slug))
        .await?
        .and_then(Self::decode),
    )
  }

  fn decode(document: Value) -> Option<Collection> {
    let id = document
      .get("_id")
      .and_then(Value::as_str)
      .unwrap_or("<missing _id>")
      .to_owned();

    match serde_json::from_value(document) {
      Ok(collection) => Some(collection),
      Err(err) => {
        log::warn!("skipping malformed collection document {id}: {err}");
        None
      }
    }
  }

  async fn query<T: DeserializeOwned>(&self, query: &str, id: Option<&str>) -> Result<T> {
    let mut params = vec![("query", query.to_string())];

    if let Some(id) = id {
      params.push(("$id", serde_json::to_string(id)?));
    }

    let mut request = self.client.get(self.query_url.clone()).query(&params);

    if let Some(token) = &self.token {
      request = request.bearer_auth(token);
    }

    log::debug!("querying content store: {query}");

    let response = request
      .send()
      .await
      .with_context(|| format!("failed to query content store at {}", self.query_url))?
      .error_for_status()
      .context("content store query failed")?;

    Ok(
      response
        .json::<QueryResponse<T>>()
        .await
        .context("failed to decode content store response")?
        .result,
    )
  }

  /// Public CDN URL for an image asset. Pure; makes no request.
  pub fn image_url(&self, image: &Image) -> String {
    let ImageRef {
      id,
      width,
      height,
      format,
    } = &image.asset.reference;

    format!(
      "{}/images/{}/{}/{id}-{width}x{height}.{format}",
      Self::IMAGE_CDN,
      self.project_id,
      self.dataset
    )
  }
}
