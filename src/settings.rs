use super::*;

#[derive(Default, Debug, Clone, PartialEq)]
pub struct Settings {
  config: Option<PathBuf>,
  config_dir: Option<PathBuf>,
  polling_interval: Option<Duration>,
  receipt_timeout: Option<Duration>,
  rpc_url: Option<String>,
  sanity_api_url: Option<String>,
  sanity_api_version: Option<String>,
  sanity_dataset: Option<String>,
  sanity_project_id: Option<String>,
  sanity_token: Option<String>,
  sanity_use_cdn: bool,
  wallet_url: Option<String>,
}

impl Settings {
  pub(crate) const DEFAULT_API_VERSION: &'static str = "2021-10-21";
  pub(crate) const DEFAULT_DATASET: &'static str = "production";
  pub(crate) const DEFAULT_RPC_URL: &'static str = "http://127.0.0.1:8545";

  pub(crate) fn merge(options: Options, env: BTreeMap<String, String>) -> Result<Self> {
    let settings = Settings::from_options(options).or(Settings::from_env(env)?);

    let config_path = if let Some(path) = &settings.config {
      Some(path.clone())
    } else {
      settings
        .config_dir
        .clone()
        .or_else(|| dirs::config_dir().map(|dir| dir.join("mira")))
        .map(|dir| dir.join("mira.yaml"))
        .filter(|path| path.exists())
    };

    let config = match config_path {
      Some(path) => {
        log::debug!("loading config from `{}`", path.display());
        Config::load(&path)?
      }
      None => Config::default(),
    };

    settings.or(Settings::from_config(config)?).or_defaults()
  }

  fn or(self, source: Settings) -> Self {
    Self {
      config: self.config.or(source.config),
      config_dir: self.config_dir.or(source.config_dir),
      polling_interval: self.polling_interval.or(source.polling_interval),
      receipt_timeout: self.receipt_timeout.or(source.receipt_timeout),
      rpc_url: self.rpc_url.or(source.rpc_url),
      sanity_api_url: self.sanity_api_url.or(source.sanity_api_url),
      sanity_api_version: self.sanity_api_version.or(source.sanity_api_version),
      sanity_dataset: self.sanity_dataset.or(source.sanity_dataset),
      sanity_project_id: self.sanity_project_id.or(source.sanity_project_id),
      sanity_token: self.sanity_token.or(source.sanity_token),
      sanity_use_cdn: self.sanity_use_cdn || source.sanity_use_cdn,
      wallet_url: self.wallet_url.or(source.wallet_url),
    }
  }

  fn from_options(options: Options) -> Self {
    Self {
      config: options.config,
      config_dir: options.config_dir,
      polling_interval: options.polling_interval.map(Into::into),
      receipt_timeout: options.receipt_timeout.map(Into::into),
      rpc_url: options.rpc_url,
      sanity_api_url: options.sanity_api_url,
      sanity_api_version: options.sanity_api_version,
      sanity_dataset: options.sanity_dataset,
      sanity_project_id: options.sanity_project_id,
      sanity_token: options.sanity_token,
      sanity_use_cdn: options.sanity_use_cdn,
      wallet_url: options.wallet_url,
    }
  }

  fn from_env(env: BTreeMap<String, String>) -> Result<Self> {
    let get_duration = |key: &str| -> Result<Option<Duration>> {
      env
        .get(key)
        .map(|value| {
          humantime::parse_duration(value)
            .with_context(|| format!("failed to parse environment variable MIRA_{key} as duration"))
        })
        .transpose()
    };

    let get_bool = |key: &str| -> Result<bool> {
      env
        .get(key)
        .map(|value| match value.as_str() {
          "1" | "true" => Ok(true),
          "0" | "false" | "" => Ok(false),
          _ => Err(anyhow!(
            "environment variable MIRA_{key} must be `true` or `false`, got `{value}`"
          )),
        })
        .transpose()
        .map(Option::unwrap_or_default)
    };

    Ok(Self {
      config: env.get("CONFIG").map(PathBuf::from),
      config_dir: env.get("CONFIG_DIR").map(PathBuf::from),
      polling_interval: get_duration("POLLING_INTERVAL")?,
      receipt_timeout: get_duration("RECEIPT_TIMEOUT")?,
      rpc_url: env.get("RPC_URL").cloned(),
      sanity_api_url: env.get("SANITY_API_URL").cloned(),
      sanity_api_version: env.get("SANITY_API_VERSION").cloned(),
      sanity_dataset: env.get("SANITY_DATASET").cloned(),
      sanity_project_id: env.get("SANITY_PROJECT_ID").cloned(),
      sanity_token: env.get("SANITY_TOKEN").cloned(),
      sanity_use_cdn: get_bool("SANITY_USE_CDN")?,
      wallet_url: env.get("WALLET_URL").cloned(),
    })
  }

  fn from_config(config: Config) -> Result<Self> {
    let parse_duration = |value: Option<String>, key: &str| -> Result<Option<Duration>> {
      value
        .map(|value| {
          humantime::parse_duration(&value)
            .with_context(|| format!("failed to parse config `{key}` as duration"))
        })
        .transpose()
    };

    Ok(Self {
      config: None,
      config_dir: None,
      polling_interval: parse_duration(config.polling_interval, "polling_interval")?,
      receipt_timeout: parse_duration(config.receipt_timeout, "receipt_timeout")?,
      rpc_url: config.rpc_url,
      sanity_api_url: config.sanity_api_url,
      sanity_api_version: config.sanity_api_version,
      sanity_dataset: config.sanity_dataset,
      sanity_project_id: config.sanity_project_id,
      sanity_token: config.sanity_token,
      sanity_use_cdn: config.sanity_use_cdn.unwrap_or_default(),
      wallet_url: config.wallet_url,
    })
  }

  fn or_defaults(self) -> Result<Self> {
    let rpc_url = self
      .rpc_url
      .unwrap_or_else(|| Self::DEFAULT_RPC_URL.into());

    ensure!(
      self.sanity_project_id.is_some(),
      "no content project configured: pass `--sanity-project-id`, set `MIRA_SANITY_PROJECT_ID`, \
       or add `sanity_project_id` to the config file"
    );

    Ok(Self {
      config: self.config,
      config_dir: self.config_dir,
      polling_interval: Some(self.polling_interval.unwrap_or(Duration::from_secs(1))),
      receipt_timeout: Some(self.receipt_timeout.unwrap_or(Duration::from_secs(300))),
      wallet_url: Some(self.wallet_url.unwrap_or_else(|| rpc_url.clone())),
      rpc_url: Some(rpc_url),
      sanity_api_url: self.sanity_api_url,
      sanity_api_version: Some(
        self
          .sanity_api_version
          .unwrap_or_else(|| Self::DEFAULT_API_VERSION.into()),
      ),
      sanity_dataset: Some(
        self
          .sanity_dataset
          .unwrap_or_else(|| Self::DEFAULT_DATASET.into()),
      ),
      sanity_project_id: self.sanity_project_id,
      sanity_token: self.sanity_token,
      sanity_use_cdn: self.sanity_use_cdn,
    })
  }

  pub(crate) fn content_client(&self) -> Result<ContentClient> {
    ContentClient::new(
      self.sanity_project_id.as_deref().unwrap_or_default(),
      self
        .sanity_dataset
        .as_deref()
        .unwrap_or(Self::DEFAULT_DATASET),
      self
        .sanity_api_version
        .as_deref()
        .unwrap_or(Self::DEFAULT_API_VERSION),
      self.sanity_api_url.as_deref(),
      self.sanity_token.clone(),
      self.sanity_use_cdn,
    )
  }

  pub(crate) fn rpc_client(&self) -> Result<Arc<RpcClient>> {
    Ok(Arc::new(RpcClient::new(
      self.rpc_url.as_deref().unwrap_or(Self::DEFAULT_RPC_URL),
    )?))
  }

  pub(crate) fn wallet_client(&self) -> Result<Arc<RpcClient>> {
    Ok(Arc::new(RpcClient::new(
      self
        .wallet_url
        .as_deref()
        .or(self.rpc_url.as_deref())
        .unwrap_or(Self::DEFAULT_RPC_URL),
    )?))
  }

  pub(crate) fn polling_interval(&self) -> Duration {
    self.polling_interval.unwrap_or(Duration::from_secs(1))
  }

  pub(crate) fn receipt_timeout(&self) -> Duration {
    self.receipt_timeout.unwrap_or(Duration::from_secs(300))
  }

  pub(crate) fn drop_contract(&self, address: Address) -> Result<DropContract> {
    Ok(
      DropContract::new(address, self.rpc_client()?)
        .polling_interval(self.polling_interval())
        .receipt_timeout(self.receipt_timeout()),
    )
  }
}

#[cfg(test)]
mod tests {
  use {super::*, tempfile::TempDir};

  fn parse(args: &[&str]) -> Result<Settings> {
    let args = ["mira"]
      .iter()
      .chain(args)
      .chain(["collections"].iter())
      .copied()
      .collect::<Vec<&str>>();

    Settings::merge(
      Arguments::try_parse_from(args).unwrap().options,
      BTreeMap::new(),
    )
  }

  fn env(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
      .iter()
      .map(|(key, value)| (key.to_string(), value.to_string()))
      .collect()
  }

  #[test]
  fn project_id_is_required() {
    let tempdir = TempDir::new().unwrap();
    let dir = tempdir.path().to_str().unwrap();

    assert!(parse(&["--config-dir", dir])
      .unwrap_err()
      .to_string()
      .starts_with("no content project configured"));
  }

  #[test]
  fn defaults() {
    let settings = parse(&["--sanity-project-id", "m1r4"]).unwrap();

    assert_eq!(settings.sanity_dataset.as_deref(), Some("production"));
    assert_eq!(settings.sanity_api_version.as_deref(), Some("2021-10-21"));
    assert_eq!(settings.rpc_url.as_deref(), Some("http://127.0.0.1:8545"));
    assert_eq!(settings.wallet_url, settings.rpc_url);
    assert_eq!(settings.polling_interval(), Duration::from_secs(1));
    assert_eq!(settings.receipt_timeout(), Duration::from_secs(300));
    assert!(!settings.sanity_use_cdn);
  }

  #[test]
  fn wallet_url_defaults_to_rpc_url() {
    let settings = parse(&[
      "--sanity-project-id",
      "m1r4",
      "--rpc-url",
      "http://node:8545",
    ])
    .unwrap();

    assert_eq!(settings.wallet_url.as_deref(), Some("http://node:8545"));

    let settings = parse(&[
      "--sanity-project-id",
      "m1r4",
      "--rpc-url",
      "http://node:8545",
      "--wallet-url",
      "http://127.0.0.1:1248",
    ])
    .unwrap();

    assert_eq!(settings.wallet_url.as_deref(), Some("http://127.0.0.1:1248"));
  }

  #[test]
  fn options_override_env() {
    let options = Arguments::try_parse_from([
      "mira",
      "--sanity-project-id",
      "from-options",
      "collections",
    ])
    .unwrap()
    .options;

    let settings = Settings::merge(
      options,
      env(&[
        ("SANITY_PROJECT_ID", "from-env"),
        ("SANITY_DATASET", "staging"),
      ]),
    )
    .unwrap();

    assert_eq!(settings.sanity_project_id.as_deref(), Some("from-options"));
    assert_eq!(settings.sanity_dataset.as_deref(), Some("staging"));
  }

  #[test]
  fn env_overrides_config() {
    let tempdir = TempDir::new().unwrap();
    let path = tempdir.path().join("mira.yaml");
    fs::write(
      &path,
      "sanity_project_id: from-config\nrpc_url: http://config:8545\npolling_interval: 250ms\n",
    )
    .unwrap();

    let settings = Settings::merge(
      Options::default(),
      env(&[
        ("CONFIG", path.to_str().unwrap()),
        ("RPC_URL", "http://env:8545"),
      ]),
    )
    .unwrap();

    assert_eq!(settings.sanity_project_id.as_deref(), Some("from-config"));
    assert_eq!(settings.rpc_url.as_deref(), Some("http://env:8545"));
    assert_eq!(settings.polling_interval(), Duration::from_millis(250));
  }

  #[test]
  fn config_dir_is_searched_for_config_file() {
    let tempdir = TempDir::new().unwrap();
    fs::write(
      tempdir.path().join("mira.yaml"),
      "sanity_project_id: from-dir\nsanity_use_cdn: true\n",
    )
    .unwrap();

    let settings = parse(&["--config-dir", tempdir.path().to_str().unwrap()]).unwrap();

    assert_eq!(settings.sanity_project_id.as_deref(), Some("from-dir"));
    assert!(settings.sanity_use_cdn);
  }

  #[test]
  fn missing_explicit_config_is_an_error() {
    assert!(parse(&["--config", "/nonexistent/mira.yaml"])
      .unwrap_err()
      .to_string()
      .starts_with("failed to open config"));
  }

  #[test]
  fn bad_env_values_are_errors() {
    assert!(Settings::from_env(env(&[("POLLING_INTERVAL", "soon")])).is_err());
    assert!(Settings::from_env(env(&[("SANITY_USE_CDN", "maybe")])).is_err());
    assert!(
      Settings::from_env(env(&[("SANITY_USE_CDN", "true")]))
        .unwrap()
        .sanity_use_cdn
    );
  }
}
