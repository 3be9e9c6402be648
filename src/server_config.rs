#[derive(Default)]
pub(crate) struct ServerConfig {
  pub(crate) domain: Option<String>,
  pub(crate) json_api_enabled: bool,
}
