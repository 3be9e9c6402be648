use super::*;

/// Transient notice shown while and after minting.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Notification {
  Minting,
  Minted,
  MintFailed,
}

impl Notification {
  pub fn class(self) -> &'static str {
    match self {
      Self::Minting => "in-progress",
      Self::Minted => "success",
      Self::MintFailed => "failure",
    }
  }
}

impl Display for Notification {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    f.write_str(match self {
      Self::Minting => "Minting…",
      Self::Minted => "HOORAY… You successfully minted!",
      Self::MintFailed => "Whoops… Something went wrong!",
    })
  }
}
