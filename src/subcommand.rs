use super::*;

pub mod claim_state;
pub mod collections;
pub mod mint;
pub mod server;

#[derive(Debug, Parser)]
pub enum Subcommand {
  #[command(about = "Show a collection's claim price, supply, and mint button")]
  ClaimState(claim_state::ClaimState),
  #[command(about = "List collections")]
  Collections,
  #[command(about = "Mint one token from a collection's drop")]
  Mint(mint::Mint),
  #[command(about = "Run the marketplace web server")]
  Server(server::Server),
}

impl Subcommand {
  pub(crate) fn run(self, settings: Settings) -> SubcommandResult {
    match self {
      Self::ClaimState(claim_state) => claim_state.run(settings),
      Self::Collections => collections::run(settings),
      Self::Mint(mint) => mint.run(settings),
      Self::Server(server) => {
        let handle = axum_server::Handle::new();
        LISTENERS.lock().unwrap().push(handle.clone());
        server.run(settings, handle)
      }
    }
  }
}

pub trait Output: Send {
  fn print_json(&self, minify: bool);
}

impl<T> Output for T
where
  T: Serialize + Send,
{
  fn print_json(&self, minify: bool) {
    if minify {
      serde_json::to_writer(io::stdout(), self).ok();
    } else {
      serde_json::to_writer_pretty(io::stdout(), self).ok();
    }
    println!();
  }
}

pub type SubcommandResult = Result<Option<Box<dyn Output>>>;
