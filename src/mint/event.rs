use super::*;

#[derive(Debug, PartialEq, Clone)]
pub enum Event {
  PriceLoaded(Ether),
  PriceFailed,
  SupplyLoaded(Supply),
  SupplyFailed,
  LoadingChanged(bool),
  Notified(Notification),
  Dismissed(Notification),
}
