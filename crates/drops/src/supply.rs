use super::*;

/// Claimed and total supply of a drop, as read from the contract.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
pub struct Supply {
  pub claimed: u64,
  pub total: u64,
}

impl Supply {
  pub fn is_sold_out(self) -> bool {
    self.claimed == self.total
  }
}

impl Display for Supply {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    write!(f, "{} / {}", self.claimed, self.total)
  }
}
