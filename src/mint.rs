//! State machine behind the collection page's mint panel.
//!
//! Price lookup, supply lookup, and the mint transaction each run as a task
//! owned by the page. Navigating to another collection or dropping the page
//! aborts them. Every transition carries the generation it was started in,
//! and transitions from an earlier generation are dropped, so a response
//! that was already being handled when the page navigated never lands on
//! the wrong collection.

use {
  super::*,
  std::sync::atomic::AtomicU64,
  tokio::{sync::mpsc, task::JoinSet},
};

pub use self::{button::MintButton, event::Event, notification::Notification};

mod button;
mod event;
mod notification;

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Load<T> {
  Pending,
  Ready(T),
  Failed,
}

impl<T> Default for Load<T> {
  fn default() -> Self {
    Self::Pending
  }
}

impl<T: Copy> Load<T> {
  pub fn ready(&self) -> Option<T> {
    match self {
      Self::Ready(value) => Some(*value),
      Self::Pending | Self::Failed => None,
    }
  }

  pub fn is_pending(&self) -> bool {
    matches!(self, Self::Pending)
  }
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct MintState {
  pub price: Load<Ether>,
  pub supply: Load<Supply>,
  pub minting: bool,
  pub notification: Option<Notification>,
  pub last_transaction: Option<TxHash>,
}

impl MintState {
  /// Look up price and supply concurrently. A failed lookup is logged and
  /// recorded as [`Load::Failed`].
  pub async fn fetch(contract: &DropContract) -> Self {
    let (price, supply) = tokio::join!(contract.claim_price(), contract.supply());

    Self {
      price: price.map_or_else(
        |err| {
          log::warn!("failed to load claim price of {}: {err:#}", contract.address());
          Load::Failed
        },
        Load::Ready,
      ),
      supply: supply.map_or_else(
        |err| {
          log::warn!("failed to load supply of {}: {err:#}", contract.address());
          Load::Failed
        },
        Load::Ready,
      ),
      ..Default::default()
    }
  }

  pub fn loading(&self) -> bool {
    self.minting || self.price.is_pending() || self.supply.is_pending()
  }

  pub fn button(&self, address: Option<Address>) -> MintButton {
    MintButton::new(
      self.loading(),
      self.supply.ready(),
      address,
      self.price.ready(),
    )
  }
}

struct Shared {
  events: Option<mpsc::UnboundedSender<Event>>,
  generation: AtomicU64,
  state: watch::Sender<MintState>,
}

impl Shared {
  fn new(events: Option<mpsc::UnboundedSender<Event>>, state: MintState) -> Self {
    Self {
      events,
      generation: AtomicU64::new(0),
      state: watch::channel(state).0,
    }
  }

  fn emit(&self, event: Event) {
    if let Some(events) = &self.events {
      events.send(event).ok();
    }
  }

  fn generation(&self) -> u64 {
    self.generation.load(atomic::Ordering::SeqCst)
  }

  /// Start a new generation and reset the state. Returns the new generation.
  fn reset(&self) -> u64 {
    let generation = self.generation.fetch_add(1, atomic::Ordering::SeqCst) + 1;
    self.transition(generation, None, |state| *state = MintState::default());
    generation
  }

  /// Apply `f`, then emit `event`, then a loading change if `f` caused one.
  /// Does nothing and returns `false` if `generation` is no longer current.
  fn transition(
    &self,
    generation: u64,
    event: Option<Event>,
    f: impl FnOnce(&mut MintState),
  ) -> bool {
    let mut loading = None;

    self.state.send_if_modified(|state| {
      if self.generation() != generation {
        return false;
      }

      let before = state.loading();
      f(state);
      loading = Some((before, state.loading()));
      true
    });

    let Some((before, after)) = loading else {
      return false;
    };

    if let Some(event) = event {
      self.emit(event);
    }

    if before != after {
      self.emit(Event::LoadingChanged(after));
    }

    true
  }
}

pub struct MintPage {
  collection: Collection,
  contract: Option<DropContract>,
  session: Session,
  shared: Arc<Shared>,
  tasks: JoinSet<()>,
}

impl MintPage {
  pub fn new(collection: Collection, session: Session) -> Self {
    Self {
      collection,
      contract: None,
      session,
      shared: Arc::new(Shared::new(None, MintState::default())),
      tasks: JoinSet::new(),
    }
  }

  pub fn with_events(mut self, events: mpsc::UnboundedSender<Event>) -> Self {
    self.shared = Arc::new(Shared::new(Some(events), self.state()));
    self
  }

  pub fn collection(&self) -> &Collection {
    &self.collection
  }

  pub fn state(&self) -> MintState {
    self.shared.state.borrow().clone()
  }

  pub fn subscribe(&self) -> watch::Receiver<MintState> {
    self.shared.state.subscribe()
  }

  pub fn button(&self) -> MintButton {
    self.state().button(self.session.address())
  }

  /// Attach the collection's contract and start loading its price and supply.
  pub fn mount(&mut self, contract: DropContract) -> Result {
    ensure!(
      contract.address() == self.collection.address,
      "contract {} does not belong to collection `{}`",
      contract.address(),
      self.collection.slug
    );

    self.tasks.abort_all();
    let generation = self.shared.reset();

    let (shared, price_contract) = (self.shared.clone(), contract.clone());
    self.tasks.spawn(async move {
      match price_contract.claim_price().await {
        Ok(price) => shared.transition(generation, Some(Event::PriceLoaded(price)), |state| {
          state.price = Load::Ready(price)
        }),
        Err(err) => {
          log::warn!("failed to load claim price: {err:#}");
          shared.transition(generation, Some(Event::PriceFailed), |state| {
            state.price = Load::Failed
          })
        }
      };
    });

    let (shared, supply_contract) = (self.shared.clone(), contract.clone());
    self.tasks.spawn(async move {
      match supply_contract.supply().await {
        Ok(supply) => shared.transition(generation, Some(Event::SupplyLoaded(supply)), |state| {
          state.supply = Load::Ready(supply)
        }),
        Err(err) => {
          log::warn!("failed to load supply: {err:#}");
          shared.transition(generation, Some(Event::SupplyFailed), |state| {
            state.supply = Load::Failed
          })
        }
      };
    });

    self.contract = Some(contract);

    Ok(())
  }

  /// Switch to another collection, cancelling everything still in flight for
  /// the current one. The page must be mounted again.
  pub fn navigate(&mut self, collection: Collection) {
    self.tasks.abort_all();
    self.contract = None;
    self.collection = collection;
    self.shared.reset();
  }

  /// Claim one token to the connected address. Returns `false` without doing
  /// anything if the page has no contract, no wallet is connected, or the
  /// page is still loading, which includes a mint already in flight.
  pub fn mint(&mut self) -> bool {
    let Some(contract) = self.contract.clone() else {
      return false;
    };

    let Some(receiver) = self.session.address() else {
      return false;
    };

    if self.state().loading() {
      return false;
    }

    let generation = self.shared.generation();

    self
      .shared
      .transition(generation, None, |state| state.minting = true);
    self.shared.transition(
      generation,
      Some(Event::Notified(Notification::Minting)),
      |state| state.notification = Some(Notification::Minting),
    );

    let (shared, session) = (self.shared.clone(), self.session.clone());

    self.tasks.spawn(async move {
      let (notification, transaction) = match contract.claim_to(&session, receiver, 1).await {
        Ok(receipt) => {
          log::info!("minted with transaction {}", receipt.transaction_hash);
          (Notification::Minted, Some(receipt.transaction_hash))
        }
        Err(err) => {
          log::error!("mint failed: {err:#}");
          (Notification::MintFailed, None)
        }
      };

      let current = shared.transition(generation, Some(Event::Notified(notification)), |state| {
        state.notification = Some(notification);
        state.last_transaction = transaction;
      });

      if current && shared.transition(generation, None, |state| state.minting = false) {
        shared.emit(Event::Dismissed(Notification::Minting));
      }
    });

    true
  }

  /// Wait for every task in flight to finish.
  pub async fn settle(&mut self) {
    while let Some(result) = self.tasks.join_next().await {
      if let Err(err) = result {
        if err.is_panic() {
          log::error!("mint page task panicked: {err}");
        }
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const CONTRACT: &str = "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359";
  const ACCOUNT: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

  struct Fixture {
    node: test_evm_rpc::Handle,
    page: MintPage,
    events: mpsc::UnboundedReceiver<Event>,
    session: Session,
  }

  impl Fixture {
    fn new(node: test_evm_rpc::Handle) -> Self {
      let session = Session::new(Arc::new(RpcClient::new(&node.url()).unwrap()));
      let (sender, events) = mpsc::unbounded_channel();

      let page = MintPage::new(test::collection("mira-cruise", CONTRACT), session.clone())
        .with_events(sender);

      Self {
        node,
        page,
        events,
        session,
      }
    }

    fn contract(&self) -> DropContract {
      DropContract::new(
        CONTRACT.parse().unwrap(),
        Arc::new(RpcClient::new(&self.node.url()).unwrap()),
      )
      .polling_interval(Duration::from_millis(10))
    }

    async fn mounted(node: test_evm_rpc::Handle) -> Self {
      let mut fixture = Self::new(node);
      let contract = fixture.contract();
      fixture.page.mount(contract).unwrap();
      fixture.page.settle().await;
      fixture.drain();
      fixture
    }

    fn drain(&mut self) -> Vec<Event> {
      let mut events = Vec::new();
      while let Ok(event) = self.events.try_recv() {
        events.push(event);
      }
      events
    }
  }

  fn node() -> test_evm_rpc::Builder {
    test_evm_rpc::builder()
      .account(ACCOUNT.parse().unwrap())
      .drop(CONTRACT.parse().unwrap(), "0.01".parse().unwrap(), 13, 21)
  }

  #[tokio::test]
  async fn loading_until_price_and_supply_resolve() {
    let mut fixture = Fixture::new(node().build());

    assert_eq!(fixture.page.button().label, MintButton::LOADING);

    let contract = fixture.contract();
    fixture.page.mount(contract).unwrap();
    fixture.page.settle().await;

    let state = fixture.page.state();
    assert_eq!(state.price, Load::Ready("0.01".parse().unwrap()));
    assert_eq!(
      state.supply,
      Load::Ready(Supply {
        claimed: 13,
        total: 21
      })
    );
    assert!(!state.loading());

    let events = fixture.drain();
    assert_eq!(events.last(), Some(&Event::LoadingChanged(false)));
    assert!(events.contains(&Event::PriceLoaded("0.01".parse().unwrap())));
    assert!(events.contains(&Event::SupplyLoaded(Supply {
      claimed: 13,
      total: 21
    })));
  }

  #[tokio::test]
  async fn button_follows_session() {
    let fixture = Fixture::mounted(node().build()).await;

    assert_eq!(
      fixture.page.button(),
      MintButton {
        label: "Sign in to Mint".into(),
        disabled: true,
      }
    );

    fixture.session.connect().await.unwrap();

    assert_eq!(
      fixture.page.button(),
      MintButton {
        label: "Mint NFT (0.01 ETH)".into(),
        disabled: false,
      }
    );

    fixture.session.disconnect();

    assert!(fixture.page.button().disabled);
  }

  #[tokio::test]
  async fn sold_out() {
    let fixture = Fixture::mounted(
      test_evm_rpc::builder()
        .account(ACCOUNT.parse().unwrap())
        .drop(CONTRACT.parse().unwrap(), "0.01".parse().unwrap(), 21, 21)
        .build(),
    )
    .await;

    fixture.session.connect().await.unwrap();

    assert_eq!(fixture.page.button().label, "Sold OUT!");
    assert!(fixture.page.button().disabled);
  }

  #[tokio::test]
  async fn successful_mint_transitions() {
    let mut fixture = Fixture::mounted(node().build()).await;

    fixture.session.connect().await.unwrap();

    assert!(fixture.page.mint());
    assert!(fixture.page.state().loading());
    assert_eq!(fixture.page.button().label, MintButton::LOADING);

    fixture.page.settle().await;

    pretty_assertions::assert_eq!(
      fixture.drain(),
      [
        Event::LoadingChanged(true),
        Event::Notified(Notification::Minting),
        Event::Notified(Notification::Minted),
        Event::LoadingChanged(false),
        Event::Dismissed(Notification::Minting),
      ]
    );

    let state = fixture.page.state();
    assert!(!state.loading());
    assert_eq!(state.notification, Some(Notification::Minted));
    assert!(state.last_transaction.is_some());
    assert_eq!(fixture.node.claimed(CONTRACT.parse().unwrap()), 14);
  }

  #[tokio::test]
  async fn failed_mint_transitions() {
    let mut fixture = Fixture::mounted(node().reject_claims().build()).await;

    fixture.session.connect().await.unwrap();

    assert!(fixture.page.mint());
    fixture.page.settle().await;

    pretty_assertions::assert_eq!(
      fixture.drain(),
      [
        Event::LoadingChanged(true),
        Event::Notified(Notification::Minting),
        Event::Notified(Notification::MintFailed),
        Event::LoadingChanged(false),
        Event::Dismissed(Notification::Minting),
      ]
    );

    let state = fixture.page.state();
    assert!(!state.loading());
    assert_eq!(state.notification, Some(Notification::MintFailed));
    assert_eq!(state.last_transaction, None);
  }

  #[tokio::test]
  async fn mint_while_minting_is_a_no_op() {
    let mut fixture = Fixture::mounted(node().build()).await;

    fixture.session.connect().await.unwrap();

    assert!(fixture.page.mint());
    assert!(!fixture.page.mint());

    fixture.page.settle().await;

    pretty_assertions::assert_eq!(
      fixture.drain(),
      [
        Event::LoadingChanged(true),
        Event::Notified(Notification::Minting),
        Event::Notified(Notification::Minted),
        Event::LoadingChanged(false),
        Event::Dismissed(Notification::Minting),
      ]
    );

    assert_eq!(fixture.node.transactions().len(), 1);
    assert_eq!(fixture.node.claimed(CONTRACT.parse().unwrap()), 14);
  }

  #[tokio::test]
  async fn mint_while_price_and_supply_load_is_a_no_op() {
    let mut fixture = Fixture::new(node().build());

    fixture.session.connect().await.unwrap();

    let contract = fixture.contract();
    fixture.page.mount(contract).unwrap();

    assert!(fixture.page.state().loading());
    assert!(!fixture.page.mint());

    fixture.page.settle().await;

    assert!(fixture.node.transactions().is_empty());

    assert!(fixture.page.mint());
    fixture.page.settle().await;

    assert_eq!(fixture.node.transactions().len(), 1);
  }

  #[tokio::test]
  async fn mint_without_wallet_is_a_no_op() {
    let mut fixture = Fixture::mounted(node().build()).await;

    assert!(!fixture.page.mint());
    assert!(fixture.drain().is_empty());
    assert!(!fixture.page.state().loading());
  }

  #[tokio::test]
  async fn mint_without_contract_is_a_no_op() {
    let mut fixture = Fixture::new(node().build());

    fixture.session.connect().await.unwrap();

    assert!(!fixture.page.mint());
    assert!(fixture.drain().is_empty());
    assert!(fixture.node.transactions().is_empty());
  }

  #[tokio::test]
  async fn mount_rejects_foreign_contract() {
    let mut fixture = Fixture::new(node().build());

    let foreign = DropContract::new(
      Address::ZERO,
      Arc::new(RpcClient::new(&fixture.node.url()).unwrap()),
    );

    assert!(fixture.page.mount(foreign).is_err());
  }

  #[tokio::test]
  async fn navigate_cancels_and_resets() {
    let mut fixture = Fixture::new(node().build());

    let contract = fixture.contract();
    fixture.page.mount(contract).unwrap();

    fixture
      .page
      .navigate(test::collection("mira-dawn", "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB"));

    fixture.page.settle().await;

    assert_eq!(fixture.page.collection().slug.current, "mira-dawn");
    assert_eq!(fixture.page.state(), MintState::default());

    fixture.session.connect().await.unwrap();
    assert!(!fixture.page.mint());
  }

  #[tokio::test]
  async fn transitions_from_before_navigation_are_dropped() {
    let mut fixture = Fixture::new(node().build());

    let contract = fixture.contract();
    fixture.page.mount(contract).unwrap();

    let stale = fixture.page.shared.generation();

    fixture
      .page
      .navigate(test::collection("mira-dawn", "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB"));
    fixture.drain();

    let price = "0.01".parse().unwrap();

    assert!(!fixture.page.shared.transition(
      stale,
      Some(Event::PriceLoaded(price)),
      |state| state.price = Load::Ready(price),
    ));

    assert_eq!(fixture.page.state(), MintState::default());
    assert!(fixture.drain().is_empty());

    let current = fixture.page.shared.generation();

    assert!(fixture.page.shared.transition(
      current,
      Some(Event::PriceLoaded(price)),
      |state| state.price = Load::Ready(price),
    ));

    assert_eq!(fixture.page.state().price, Load::Ready(price));
    assert_eq!(fixture.drain(), [Event::PriceLoaded(price)]);
  }

  #[tokio::test]
  async fn fetch_snapshot() {
    let node = node().build();

    let contract = DropContract::new(
      CONTRACT.parse().unwrap(),
      Arc::new(RpcClient::new(&node.url()).unwrap()),
    );

    let state = MintState::fetch(&contract).await;

    assert!(!state.loading());
    assert_eq!(
      state.button(Some(ACCOUNT.parse().unwrap())).label,
      "Mint NFT (0.01 ETH)"
    );

    let state = MintState::fetch(&DropContract::new(
      Address::ZERO,
      Arc::new(RpcClient::new(&node.url()).unwrap()),
    ))
    .await;

    assert_eq!(state.price, Load::Failed);
    assert_eq!(state.supply, Load::Failed);
  }

  #[tokio::test]
  async fn failed_loads_clear_loading() {
    let mut fixture = Fixture::new(test_evm_rpc::builder().build());

    let contract = fixture.contract();
    fixture.page.mount(contract).unwrap();
    fixture.page.settle().await;

    let state = fixture.page.state();
    assert_eq!(state.price, Load::Failed);
    assert_eq!(state.supply, Load::Failed);
    assert!(!state.loading());
    assert_eq!(fixture.page.button().label, "Sign in to Mint");
  }
}
