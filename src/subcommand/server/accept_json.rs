use {super::*, axum::extract::FromRef};

/// Whether the request asked for `application/json` instead of HTML.
pub(crate) struct AcceptJson(pub(crate) bool);

#[async_trait::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AcceptJson
where
  Arc<ServerConfig>: FromRef<S>,
  S: Send + Sync,
{
  type Rejection = (StatusCode, &'static str);

  async fn from_request_parts(
    parts: &mut http::request::Parts,
    state: &S,
  ) -> Result<Self, Self::Rejection> {
    let state = Arc::<ServerConfig>::from_ref(state);

    let json_header = parts
      .headers
      .get(header::ACCEPT)
      .map(|value| value == "application/json")
      .unwrap_or_default();

    match (json_header, state.json_api_enabled) {
      (true, true) => Ok(Self(true)),
      (true, false) => Err((StatusCode::NOT_ACCEPTABLE, "JSON API disabled")),
      (false, _) => Ok(Self(false)),
    }
  }
}
