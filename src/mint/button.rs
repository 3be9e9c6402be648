use super::*;

/// The mint button's label and enabled state.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct MintButton {
  pub label: String,
  pub disabled: bool,
}

impl MintButton {
  pub const LOADING: &'static str = "Loading…";
  pub const SIGN_IN: &'static str = "Sign in to Mint";
  pub const SOLD_OUT: &'static str = "Sold OUT!";

  /// Disabled while loading, when sold out, or when no wallet is connected.
  /// When several hold, the label reflects the first in that order.
  pub fn new(
    loading: bool,
    supply: Option<Supply>,
    address: Option<Address>,
    price: Option<Ether>,
  ) -> Self {
    let sold_out = supply.map(Supply::is_sold_out).unwrap_or_default();

    let label = if loading {
      Self::LOADING.into()
    } else if sold_out {
      Self::SOLD_OUT.into()
    } else if address.is_none() {
      Self::SIGN_IN.into()
    } else if let Some(price) = price {
      format!("Mint NFT ({price} ETH)")
    } else {
      "Mint NFT".into()
    };

    Self {
      label,
      disabled: loading || sold_out || address.is_none(),
    }
  }
}
