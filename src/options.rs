use super::*;

#[derive(Clone, Default, Debug, Parser)]
pub struct Options {
  #[arg(long, help = "Load configuration from <CONFIG>.")]
  pub(crate) config: Option<PathBuf>,
  #[arg(long, help = "Load configuration from <CONFIG_DIR>/mira.yaml.")]
  pub(crate) config_dir: Option<PathBuf>,
  #[arg(long, short, help = "Minify JSON output.")]
  pub(crate) minify: bool,
  #[arg(
    long,
    help = "Poll for transaction receipts every <POLLING_INTERVAL>. [default: 1s]"
  )]
  pub(crate) polling_interval: Option<humantime::Duration>,
  #[arg(
    long,
    help = "Give up waiting for a transaction receipt after <RECEIPT_TIMEOUT>. [default: 5m]"
  )]
  pub(crate) receipt_timeout: Option<humantime::Duration>,
  #[arg(
    long,
    help = "Read drop contracts from the JSON-RPC node at <RPC_URL>. [default: http://127.0.0.1:8545]"
  )]
  pub(crate) rpc_url: Option<String>,
  #[arg(
    long,
    help = "Query the content store at <SANITY_API_URL>. [default: https://<SANITY_PROJECT_ID>.api.sanity.io]"
  )]
  pub(crate) sanity_api_url: Option<String>,
  #[arg(long, help = "Use content API version <SANITY_API_VERSION>. [default: 2021-10-21]")]
  pub(crate) sanity_api_version: Option<String>,
  #[arg(long, help = "Query content dataset <SANITY_DATASET>. [default: production]")]
  pub(crate) sanity_dataset: Option<String>,
  #[arg(long, help = "Query content project <SANITY_PROJECT_ID>.")]
  pub(crate) sanity_project_id: Option<String>,
  #[arg(long, help = "Authenticate content queries with <SANITY_TOKEN>.")]
  pub(crate) sanity_token: Option<String>,
  #[arg(long, help = "Query the content store through its CDN.")]
  pub(crate) sanity_use_cdn: bool,
  #[arg(
    long,
    help = "Connect to the JSON-RPC wallet at <WALLET_URL>. [default: <RPC_URL>]"
  )]
  pub(crate) wallet_url: Option<String>,
}
