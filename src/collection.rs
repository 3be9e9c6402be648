//! Collection records as projected by the marketplace's content query.
//!
//! Field names follow the content store's document shape so records
//! round-trip through the JSON API unchanged.

use super::*;

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Collection {
  #[serde(rename = "_id")]
  pub id: String,
  pub title: String,
  pub description: String,
  #[serde(rename = "nftCollectionName")]
  pub nft_collection_name: String,
  pub address: Address,
  pub slug: Slug,
  #[serde(rename = "previewImage")]
  pub preview_image: Image,
  #[serde(rename = "mainImage")]
  pub main_image: Image,
  pub creator: Creator,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Creator {
  #[serde(rename = "_id")]
  pub id: String,
  pub name: String,
  pub address: Address,
  pub slug: Slug,
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct Slug {
  pub current: String,
}

impl Display for Slug {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    f.write_str(&self.current)
  }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Image {
  pub asset: Asset,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Asset {
  #[serde(rename = "_ref")]
  pub reference: ImageRef,
}

/// An image asset id of the form `image-<id>-<width>x<height>-<format>`.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ImageRef {
  pub id: String,
  pub width: u32,
  pub height: u32,
  pub format: String,
}

impl Display for ImageRef {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    write!(
      f,
      "image-{}-{}x{}-{}",
      self.id, self.width, self.height, self.format
    )
  }
}

impl FromStr for ImageRef {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    lazy_static! {
      static ref IMAGE_REF: Regex =
        Regex::new(r"^image-([[:alnum:]]+)-(\d+)x(\d+)-([[:alnum:]]+)$").unwrap();
    }

    let captures = IMAGE_REF
      .captures(s)
      .ok_or_else(|| anyhow!("invalid image asset reference `{s}`"))?;

    Ok(Self {
      id: captures[1].into(),
      width: captures[2].parse()?,
      height: captures[3].parse()?,
      format: captures[4].into(),
    })
  }
}

impl Serialize for ImageRef {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    serializer.collect_str(self)
  }
}

impl<'de> Deserialize<'de> for ImageRef {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    drops::DeserializeFromStr::with(deserializer)
  }
}
