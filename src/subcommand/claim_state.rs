use {
  super::*,
  crate::{api, mint::MintState},
};

#[derive(Debug, Parser)]
pub struct ClaimState {
  #[arg(help = "Show claim state of collection <SLUG>.")]
  slug: String,
  #[arg(long, help = "Show the mint button as seen by <ADDRESS>.")]
  address: Option<Address>,
}

impl ClaimState {
  pub(crate) fn run(self, settings: Settings) -> SubcommandResult {
    Runtime::new()?.block_on(async {
      let collection = settings
        .content_client()?
        .collection(&self.slug)
        .await?
        .ok_or_else(|| anyhow!("collection `{}` not found", self.slug))?;

      let state = MintState::fetch(&settings.drop_contract(collection.address)?).await;

      Ok(Some(
        Box::new(api::ClaimState::new(&state, self.address)) as Box<dyn Output>
      ))
    })
  }
}
