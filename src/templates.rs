use {
  super::*,
  crate::mint::{MintButton, MintState},
  boilerplate::Boilerplate,
  server_config::ServerConfig,
};

pub(crate) use {collection::CollectionHtml, home::HomeHtml};

mod collection;
mod home;

pub(crate) const SITE_NAME: &str = "Mira NFT Marketplace";

#[derive(Boilerplate)]
pub(crate) struct PageHtml<T: PageContent> {
  content: T,
  config: Arc<ServerConfig>,
}

impl<T> PageHtml<T>
where
  T: PageContent,
{
  pub(crate) fn new(content: T, config: Arc<ServerConfig>) -> Self {
    Self { content, config }
  }

  fn og_url(&self) -> Option<String> {
    self
      .config
      .domain
      .as_ref()
      .map(|domain| format!("https://{domain}{}", self.content.path()))
  }
}

pub(crate) trait PageContent: Display + 'static {
  fn title(&self) -> String;

  fn path(&self) -> String;

  fn page(self, server_config: Arc<ServerConfig>) -> PageHtml<Self>
  where
    Self: Sized,
  {
    PageHtml::new(self, server_config)
  }

  fn preview_image_url(&self) -> Option<String> {
    None
  }

  fn script(&self) -> Option<&'static str> {
    None
  }
}
