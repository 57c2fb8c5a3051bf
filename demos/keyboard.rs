//! Drive a tab group from simulated keyboard and pointer input.
//!
//! Run with `RUST_LOG=debug` to see every selection.

use a11ytab::{Config, Host, Key, Modifiers, Page};

const MARKUP: &str = r##"
<div class="tabs">
  <ul class="a11ytb-list">
    <li class="a11ytb-listitem"><a class="a11ytb-button" href="#overview">Overview</a></li>
    <li class="a11ytb-listitem"><a class="a11ytb-button" href="#specs">Specs</a></li>
    <li class="a11ytb-listitem"><a class="a11ytb-button" href="#reviews">Reviews</a></li>
  </ul>
  <div id="overview">Overview panel</div>
  <div id="specs">Specs panel</div>
  <div id="reviews">Reviews panel</div>
</div>"##;

fn main() -> anyhow::Result<()> {
    a11ytab::init_logging();

    let mut page = Page::from_html(MARKUP);
    let config = Config {
        tab_selected_class: Some("is-selected".into()),
        hash_navigation: true,
        dispatch_events: true,
        ..Config::default()
    };

    let ids = page.attach_all(".tabs", &config)?;
    page.initialize_all()?;

    let group = ids
        .first()
        .and_then(|&id| page.group(id))
        .ok_or_else(|| anyhow::anyhow!("no tab group in markup"))?;
    let first = group.triggers()[0].node;
    let last = group.triggers()[2].node;

    page.key_down(first, Key::ArrowRight, Modifiers::NONE)?;
    page.key_down(first, Key::ArrowLeft, Modifiers::NONE)?;
    page.click(last)?;

    let document = page.document();
    println!("{}", document.inner_html(document.body())?);
    println!("location hash: {:?}", document.location_hash());
    for event in document.dispatched_events() {
        println!("{} {}", event.dispatched_at.to_rfc3339(), event.name);
    }

    page.destroy_all();
    println!("{}", page.document().inner_html(page.document().body())?);

    Ok(())
}
