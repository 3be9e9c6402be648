use super::*;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Output {
  pub slug: String,
  pub title: String,
  pub nft_collection_name: String,
  pub address: Address,
  pub creator: String,
  pub main_image: String,
  pub preview_image: String,
}

pub(crate) fn run(settings: Settings) -> SubcommandResult {
  let content = settings.content_client()?;

  let collections = Runtime::new()?.block_on(content.collections())?;

  Ok(Some(Box::new(
    collections
      .into_iter()
      .map(|collection| Output {
        main_image: content.image_url(&collection.main_image),
        preview_image: content.image_url(&collection.preview_image),
        slug: collection.slug.current,
        title: collection.title,
        nft_collection_name: collection.nft_collection_name,
        address: collection.address,
        creator: collection.creator.name,
      })
      .collect::<Vec<Output>>(),
  )))
}
