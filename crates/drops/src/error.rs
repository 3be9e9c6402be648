use super::*;

#[derive(Debug, Error, PartialEq)]
pub enum Error {
  #[error("invalid ether amount `{input}`: {reason}")]
  Ether { input: String, reason: String },
}
