use {
  super::*,
  crate::mint::{Event, MintPage, Notification},
  tokio::sync::mpsc,
};

#[derive(Debug, Parser)]
pub struct Mint {
  #[arg(help = "Mint from collection <SLUG>.")]
  slug: String,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Output {
  pub collection: String,
  pub contract: Address,
  pub receiver: Address,
  pub transaction: TxHash,
}

impl Mint {
  pub(crate) fn run(self, settings: Settings) -> SubcommandResult {
    Runtime::new()?.block_on(async {
      let collection = settings
        .content_client()?
        .collection(&self.slug)
        .await?
        .ok_or_else(|| anyhow!("collection `{}` not found", self.slug))?;

      let session = Session::new(settings.wallet_client()?);
      let receiver = session.connect().await?;

      let (sender, mut events) = mpsc::unbounded_channel();

      let reporter = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
          match event {
            Event::Notified(notification) => eprintln!("{notification}"),
            event => log::debug!("{event:?}"),
          }
        }
      });

      let contract = settings.drop_contract(collection.address)?;

      let mut page = MintPage::new(collection, session).with_events(sender);

      page.mount(contract)?;
      page.settle().await;

      let button = page.button();

      ensure!(
        !button.disabled,
        "cannot mint from `{}`: {}",
        self.slug,
        button.label
      );

      eprintln!("{}", button.label);

      page.mint();
      page.settle().await;

      let state = page.state();
      let contract = page.collection().address;

      drop(page);
      reporter.await?;

      match (state.notification, state.last_transaction) {
        (Some(Notification::Minted), Some(transaction)) => Ok(Some(Box::new(Output {
          collection: self.slug,
          contract,
          receiver,
          transaction,
        }) as Box<dyn super::Output>)),
        _ => bail!("failed to mint from `{}`", self.slug),
      }
    })
  }
}
