use super::*;

/// An amount of ether, stored as a whole number of wei.
///
/// Displays as a decimal ether amount with trailing zeros trimmed, so one
/// hundredth of an ether displays as `0.01`.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Default)]
pub struct Ether(U256);

impl Ether {
  pub const fn from_wei(wei: U256) -> Self {
    Self(wei)
  }

  pub fn wei(self) -> U256 {
    self.0
  }

  pub fn checked_mul(self, n: u64) -> Option<Self> {
    self.0.checked_mul(U256::from(n)).map(Self)
  }
}

impl Display for Ether {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    let formatted = utils::format_ether(self.0);

    match formatted.split_once('.') {
      Some((integer, fraction)) => {
        let fraction = fraction.trim_end_matches('0');
        if fraction.is_empty() {
          write!(f, "{integer}")
        } else {
          write!(f, "{integer}.{fraction}")
        }
      }
      None => write!(f, "{formatted}"),
    }
  }
}

impl FromStr for Ether {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let invalid = |reason: String| Error::Ether {
      input: s.into(),
      reason,
    };

    if s.is_empty() || s == "." {
      return Err(invalid("empty amount".into()));
    }

    if !s.chars().all(|c| c.is_ascii_digit() || c == '.') || s.matches('.').count() > 1 {
      return Err(invalid(
        "only digits and a single decimal point are allowed".into(),
      ));
    }

    utils::parse_ether(s)
      .map(Self)
      .map_err(|err| invalid(err.to_string()))
  }
}

impl Serialize for Ether {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    serializer.collect_str(self)
  }
}

impl<'de> Deserialize<'de> for Ether {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    DeserializeFromStr::with(deserializer)
  }
}
