use super::*;

#[derive(Boilerplate)]
pub(crate) struct HomeHtml {
  pub(crate) tiles: Vec<Tile>,
}

pub(crate) struct Tile {
  pub(crate) description: String,
  pub(crate) image: String,
  pub(crate) slug: Slug,
  pub(crate) title: String,
}

impl HomeHtml {
  pub(crate) fn new(content: &ContentClient, collections: Vec<Collection>) -> Self {
    Self {
      tiles: collections
        .into_iter()
        .map(|collection| Tile {
          image: content.image_url(&collection.main_image),
          description: collection.description,
          slug: collection.slug,
          title: collection.title,
        })
        .collect(),
    }
  }
}

impl PageContent for HomeHtml {
  fn title(&self) -> String {
    SITE_NAME.into()
  }

  fn path(&self) -> String {
    "/".into()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn content() -> ContentClient {
    ContentClient::new("m1r4", "production", "2021-10-21", None, None, false).unwrap()
  }

  #[test]
  fn tiles_link_to_collections() {
    assert_regex_match!(
      HomeHtml::new(
        &content(),
        vec![
          test::collection("mira-cruise", "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359"),
          test::collection("mira-dawn", "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB"),
        ]
      ),
      r"<header>
  <h1>Mira NFT Marketplace</h1>
</header>
<hr>
<section class=collections>
  <a class=tile href='/nft/mira-cruise'>
    <img src='https://cdn.sanity.io/images/m1r4/production/miracruisemain-2000x3000.jpg' alt='Mira Cruise'>
    <article>
      <h2>Mira Cruise</h2>
      <p>Mira Cruise description</p>
    </article>
  </a>
  <a class=tile href='/nft/mira-dawn'>
.*
  </a>
</section>
"
    );
  }

  #[test]
  fn empty_listing() {
    assert_regex_match!(
      HomeHtml::new(&content(), Vec::new()),
      r".*<section class=collections>
</section>
"
    );
  }

  #[test]
  fn text_is_escaped() {
    let mut collection =
      test::collection("mira-cruise", "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359");
    collection.title = "<script>".into();

    assert_regex_match!(
      HomeHtml::new(&content(), vec![collection]),
      r".*<h2>&lt;script&gt;</h2>.*"
    );
  }
}
