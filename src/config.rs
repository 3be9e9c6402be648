use super::*;

#[derive(Deserialize, Default, PartialEq, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct Config {
  pub(crate) polling_interval: Option<String>,
  pub(crate) receipt_timeout: Option<String>,
  pub(crate) rpc_url: Option<String>,
  pub(crate) sanity_api_url: Option<String>,
  pub(crate) sanity_api_version: Option<String>,
  pub(crate) sanity_dataset: Option<String>,
  pub(crate) sanity_project_id: Option<String>,
  pub(crate) sanity_token: Option<String>,
  pub(crate) sanity_use_cdn: Option<bool>,
  pub(crate) wallet_url: Option<String>,
}

impl Config {
  pub(crate) fn load(path: &Path) -> Result<Self> {
    serde_yaml::from_reader(
      fs::File::open(path).with_context(|| format!("failed to open config `{}`", path.display()))?,
    )
    .with_context(|| format!("failed to deserialize config `{}`", path.display()))
  }
}
