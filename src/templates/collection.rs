use super::*;

#[derive(Boilerplate)]
pub(crate) struct CollectionHtml {
  pub(crate) button: MintButton,
  pub(crate) collection: Collection,
  pub(crate) main_image: String,
  pub(crate) preview_image: String,
}

impl CollectionHtml {
  /// Price and supply are filled in by the page script, so the button starts
  /// out loading.
  pub(crate) fn new(content: &ContentClient, collection: Collection) -> Self {
    Self {
      button: MintState::default().button(None),
      main_image: content.image_url(&collection.main_image),
      preview_image: content.image_url(&collection.preview_image),
      collection,
    }
  }
}

impl PageContent for CollectionHtml {
  fn title(&self) -> String {
    format!("{} | {SITE_NAME}", self.collection.nft_collection_name)
  }

  fn path(&self) -> String {
    format!("/nft/{}", self.collection.slug)
  }

  fn preview_image_url(&self) -> Option<String> {
    Some(self.preview_image.clone())
  }

  fn script(&self) -> Option<&'static str> {
    Some("mint.js")
  }
}
