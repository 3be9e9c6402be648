#![allow(clippy::result_large_err, clippy::too_many_arguments)]
#![deny(
  clippy::cast_lossless,
  clippy::cast_possible_truncation,
  clippy::cast_possible_wrap,
  clippy::cast_sign_loss
)]

use {
  self::{
    arguments::Arguments,
    collection::{Image, ImageRef, Slug},
    config::Config,
    rpc::RpcClient,
    settings::Settings,
    subcommand::{Subcommand, SubcommandResult},
  },
  anyhow::{anyhow, bail, ensure, Context, Error},
  clap::Parser,
  drops::{Address, Bytes, ClaimCondition, Ether, IDropERC721, SolCall, Supply, TxHash, U256},
  html_escaper::{Escape, Trusted},
  lazy_static::lazy_static,
  regex::Regex,
  serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize, Serializer},
  std::{
    collections::BTreeMap,
    env,
    fmt::{self, Display, Formatter},
    fs, io,
    net::ToSocketAddrs,
    path::{Path, PathBuf},
    process,
    str::FromStr,
    sync::{
      atomic::{self, AtomicBool},
      Arc, Mutex,
    },
    time::Duration,
  },
  tokio::{runtime::Runtime, sync::watch, task},
};

pub use self::{
  collection::Collection, content::ContentClient, drop_contract::DropContract, mint::MintPage,
  options::Options, session::Session,
};


pub mod api;
pub mod arguments;
pub mod collection;
mod config;
pub mod content;
pub mod drop_contract;
pub mod mint;
pub mod options;
pub mod rpc;
mod server_config;
pub mod session;
mod settings;
pub mod subcommand;
pub mod templates;

type Result<T = (), E = Error> = std::result::Result<T, E>;

static SHUTTING_DOWN: AtomicBool = AtomicBool::new(false);
static LISTENERS: Mutex<Vec<axum_server::Handle>> = Mutex::new(Vec::new());

pub fn main() {
  env_logger::init();

  ctrlc::set_handler(move || {
    if SHUTTING_DOWN.fetch_or(true, atomic::Ordering::Relaxed) {
      process::exit(1);
    }

    eprintln!("Shutting down gracefully. Press <CTRL-C> again to shutdown immediately.");

    LISTENERS
      .lock()
      .unwrap()
      .iter()
      .for_each(|handle| handle.graceful_shutdown(Some(Duration::from_millis(100))));
  })
  .expect("Error setting <CTRL-C> handler");

  let args = Arguments::parse();

  let minify = args.options.minify;

  match args.run() {
    Err(err) => {
      eprintln!("error: {err}");
      err
        .chain()
        .skip(1)
        .for_each(|cause| eprintln!("because: {cause}"));
      if env::var_os("RUST_BACKTRACE")
        .map(|val| val == "1")
        .unwrap_or_default()
      {
        eprintln!("{}", err.backtrace());
      }

      process::exit(1);
    }
    Ok(output) => {
      if let Some(output) = output {
        output.print_json(minify);
      }
    }
  }
}
