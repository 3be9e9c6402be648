use {
  self::{
    accept_json::AcceptJson,
    error::{OptionExt, ServerError, ServerResult},
  },
  super::*,
  crate::{
    api,
    mint::MintState,
    server_config::ServerConfig,
    templates::{CollectionHtml, HomeHtml, PageContent},
  },
  axum::{
    body,
    extract::{Extension, Json, Path, Query},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
  },
  axum_server::Handle,
  rust_embed::RustEmbed,
  tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
  },
};

mod accept_json;
mod error;

#[derive(RustEmbed)]
#[folder = "static"]
struct StaticAssets;

#[derive(Deserialize)]
struct StateQuery {
  address: Option<Address>,
}

#[derive(Deserialize)]
struct ClaimQuery {
  receiver: Option<String>,
}

#[derive(Debug, Parser, Clone)]
pub struct Server {
  #[arg(
    long,
    help = "Listen on <ADDRESS> for incoming requests. [default: 0.0.0.0]"
  )]
  pub(crate) address: Option<String>,
  #[arg(long, help = "Disable JSON API.")]
  pub(crate) disable_json_api: bool,
  #[arg(long, help = "Use <DOMAIN> in canonical page URLs.")]
  pub(crate) domain: Option<String>,
  #[arg(
    long,
    help = "Listen on <HTTP_PORT> for incoming HTTP requests. [default: 80]"
  )]
  pub(crate) http_port: Option<u16>,
}

impl Server {
  pub fn run(self, settings: Settings, handle: Handle) -> SubcommandResult {
    Runtime::new()?.block_on(async {
      let server_config = Arc::new(ServerConfig {
        domain: self.domain.clone(),
        json_api_enabled: !self.disable_json_api,
      });

      let content = Arc::new(settings.content_client()?);

      log::info!("serving collections from {}", content.query_url());

      let router = Self::router(content, Arc::new(settings), server_config);

      self
        .spawn(router, handle, self.http_port.unwrap_or(80))?
        .await??;

      Ok(None)
    })
  }

  fn router(
    content: Arc<ContentClient>,
    settings: Arc<Settings>,
    server_config: Arc<ServerConfig>,
  ) -> Router {
    Router::new()
      .route("/", get(Self::home))
      .route("/favicon.ico", get(Self::favicon))
      .route("/nft/:slug", get(Self::collection))
      .route("/r/collections", get(Self::collections_json))
      .route("/r/nft/:slug", get(Self::collection_json))
      .route("/r/nft/:slug/claim", get(Self::claim_transaction))
      .route("/r/nft/:slug/state", get(Self::claim_state))
      .route("/static/*path", get(Self::static_asset))
      .layer(Extension(content))
      .layer(Extension(server_config.clone()))
      .layer(Extension(settings))
      .layer(SetResponseHeaderLayer::if_not_present(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static("default-src 'self'; img-src 'self' https://cdn.sanity.io"),
      ))
      .layer(
        CorsLayer::new()
          .allow_methods([http::Method::GET])
          .allow_origin(Any),
      )
      .layer(CompressionLayer::new())
      .with_state(server_config)
  }

  fn spawn(
    &self,
    router: Router,
    handle: Handle,
    port: u16,
  ) -> Result<task::JoinHandle<io::Result<()>>> {
    let address = match &self.address {
      Some(address) => address.as_str(),
      None => {
        if cfg!(test) {
          "127.0.0.1"
        } else {
          "0.0.0.0"
        }
      }
    };

    let addr = (address, port)
      .to_socket_addrs()?
      .next()
      .ok_or_else(|| anyhow!("failed to get socket addrs"))?;

    if !cfg!(test) {
      eprintln!("Listening on http://{addr}");
    }

    Ok(tokio::spawn(async move {
      axum_server::Server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
    }))
  }

  /// A content store failure is logged and reported as a missing collection.
  async fn find_collection(content: &ContentClient, slug: &str) -> ServerResult<Collection> {
    content
      .collection(slug)
      .await
      .unwrap_or_else(|err| {
        log::error!("failed to fetch collection `{slug}`: {err:#}");
        None
      })
      .ok_or_not_found(|| format!("collection {slug}"))
  }

  async fn home(
    Extension(server_config): Extension<Arc<ServerConfig>>,
    Extension(content): Extension<Arc<ContentClient>>,
    AcceptJson(accept_json): AcceptJson,
  ) -> ServerResult<Response> {
    let collections = content.collections().await.unwrap_or_else(|err| {
      log::error!("failed to fetch collections: {err:#}");
      Vec::new()
    });

    Ok(if accept_json {
      Json(collections).into_response()
    } else {
      HomeHtml::new(&content, collections)
        .page(server_config)
        .into_response()
    })
  }

  async fn collection(
    Extension(server_config): Extension<Arc<ServerConfig>>,
    Extension(content): Extension<Arc<ContentClient>>,
    Path(slug): Path<String>,
    AcceptJson(accept_json): AcceptJson,
  ) -> ServerResult<Response> {
    let collection = Self::find_collection(&content, &slug).await?;

    Ok(if accept_json {
      Json(collection).into_response()
    } else {
      CollectionHtml::new(&content, collection)
        .page(server_config)
        .into_response()
    })
  }

  async fn collections_json(
    Extension(content): Extension<Arc<ContentClient>>,
  ) -> ServerResult<Json<Vec<Collection>>> {
    Ok(Json(content.collections().await?))
  }

  async fn collection_json(
    Extension(content): Extension<Arc<ContentClient>>,
    Path(slug): Path<String>,
  ) -> ServerResult<Json<Collection>> {
    Ok(Json(Self::find_collection(&content, &slug).await?))
  }

  async fn claim_state(
    Extension(content): Extension<Arc<ContentClient>>,
    Extension(settings): Extension<Arc<Settings>>,
    Path(slug): Path<String>,
    Query(query): Query<StateQuery>,
  ) -> ServerResult<Json<api::ClaimState>> {
    let collection = Self::find_collection(&content, &slug).await?;

    let state = MintState::fetch(&settings.drop_contract(collection.address)?).await;

    Ok(Json(api::ClaimState::new(&state, query.address)))
  }

  async fn claim_transaction(
    Extension(content): Extension<Arc<ContentClient>>,
    Extension(settings): Extension<Arc<Settings>>,
    Path(slug): Path<String>,
    Query(query): Query<ClaimQuery>,
  ) -> ServerResult<Json<api::ClaimTransaction>> {
    let receiver = query
      .receiver
      .ok_or_else(|| ServerError::BadRequest("missing receiver".into()))?
      .parse::<Address>()
      .map_err(|err| ServerError::BadRequest(format!("invalid receiver: {err}")))?;

    let collection = Self::find_collection(&content, &slug).await?;

    Ok(Json(
      settings
        .drop_contract(collection.address)?
        .claim_transaction(receiver, 1)
        .await?,
    ))
  }

  async fn favicon() -> ServerResult<Response> {
    Self::static_asset(Path("/favicon.svg".to_string())).await
  }

  async fn static_asset(Path(path): Path<String>) -> ServerResult<Response> {
    let content = StaticAssets::get(if let Some(stripped) = path.strip_prefix('/') {
      stripped
    } else {
      &path
    })
    .ok_or_not_found(|| format!("asset {path}"))?;
    let body = body::boxed(body::Full::from(content.data));
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    Response::builder()
      .header(header::CONTENT_TYPE, mime.as_ref())
      .body(body)
      .map_err(|err| ServerError::Internal(err.into()))
  }
}
