//! End-to-end tab group behavior driven through a `Page`.

use a11ytab::{Config, Host, Key, Modifiers, NodeId, Page, TabError};
use a11ytab::CoreError;
use pretty_assertions::assert_eq;

const GROUP: &str = r##"<div class="tabs" id="root"><ul class="a11ytb-list"><li class="a11ytb-listitem"><a class="a11ytb-button" href="#p1" id="t1">One</a></li><li class="a11ytb-listitem"><a class="a11ytb-button" href="#p2" id="t2">Two</a></li><li class="a11ytb-listitem"><a class="a11ytb-button" href="#p3" id="t3">Three</a></li></ul><div id="p1">1</div><div id="p2">2</div><div id="p3">3</div></div>"##;

fn by_id(page: &Page, id: &str) -> NodeId {
    page.document().element_by_id(id).expect("element exists")
}

fn attr(page: &Page, id: &str, name: &str) -> Option<String> {
    page.document().attribute(by_id(page, id), name)
}

fn tabindexes(page: &Page) -> Vec<Option<String>> {
    ["t1", "t2", "t3"]
        .iter()
        .map(|id| attr(page, id, "tabindex"))
        .collect()
}

fn page_with_group(config: &Config) -> (Page, a11ytab::GroupId) {
    let mut page = Page::from_html(GROUP);
    let root = by_id(&page, "root");
    let id = page.attach(root, config).expect("attach");
    (page, id)
}

#[test]
fn roving_tabindex_follows_arrow_keys() {
    let (mut page, id) = page_with_group(&Config::default());
    page.initialize(id, None).unwrap();

    let zero = Some("0".to_string());
    let minus = Some("-1".to_string());
    assert_eq!(tabindexes(&page), vec![zero.clone(), minus.clone(), minus.clone()]);
    assert_eq!(attr(&page, "p1", "aria-hidden").as_deref(), Some("false"));
    assert_eq!(attr(&page, "p2", "aria-hidden").as_deref(), Some("true"));

    let t1 = by_id(&page, "t1");
    assert!(page.key_down(t1, Key::ArrowRight, Modifiers::NONE).unwrap());
    assert_eq!(tabindexes(&page), vec![minus.clone(), zero.clone(), minus.clone()]);
    assert_eq!(page.document().focused(), Some(by_id(&page, "t2")));

    // Down behaves like Right, and Left from the first trigger wraps
    let t2 = by_id(&page, "t2");
    page.key_down(t2, Key::ArrowDown, Modifiers::NONE).unwrap();
    let t3 = by_id(&page, "t3");
    page.key_down(t3, Key::ArrowDown, Modifiers::NONE).unwrap();
    assert_eq!(tabindexes(&page), vec![zero.clone(), minus.clone(), minus.clone()]);

    page.key_down(t1, Key::ArrowUp, Modifiers::NONE).unwrap();
    assert_eq!(tabindexes(&page), vec![minus.clone(), minus, zero]);
    assert_eq!(page.group(id).unwrap().selected(), Some(2));
}

#[test]
fn modified_and_unrelated_keys_pass_through() {
    let (mut page, id) = page_with_group(&Config::default());
    page.initialize(id, None).unwrap();
    let t1 = by_id(&page, "t1");

    let alt = Modifiers {
        alt: true,
        ..Modifiers::NONE
    };
    assert!(!page.key_down(t1, Key::ArrowRight, alt).unwrap());
    assert!(!page.key_down(t1, Key::from("Enter"), Modifiers::NONE).unwrap());
    assert_eq!(page.group(id).unwrap().selected(), Some(0));
}

#[test]
fn unresolvable_target_leaves_document_untouched() {
    let markup = GROUP.replace(r#"<div id="p2">2</div>"#, "");
    let mut page = Page::from_html(&markup);
    let root = by_id(&page, "root");
    let before = page.document().outer_html(root).unwrap();

    let id = page.attach(root, &Config::default()).unwrap();
    let err = page.initialize(id, None).unwrap_err();

    assert!(matches!(
        err,
        CoreError::Tab(TabError::Resolution { ref target, .. }) if target == "#p2"
    ));
    assert_eq!(page.document().outer_html(root).unwrap(), before);
    assert_eq!(page.document().listener_count(), 0);
}

#[test]
fn location_hash_picks_initial_tab() {
    let document = a11ytab::Document::parse_html(GROUP)
        .with_location("https://example.test/page#p2")
        .unwrap();
    let mut page = Page::new(document);
    let root = by_id(&page, "root");
    let config = Config {
        hash_navigation: true,
        ..Config::default()
    };
    let id = page.attach(root, &config).unwrap();
    page.initialize(id, None).unwrap();

    assert_eq!(page.group(id).unwrap().selected(), Some(1));
    assert_eq!(attr(&page, "t2", "aria-selected").as_deref(), Some("true"));
    assert_eq!(attr(&page, "p2", "aria-hidden").as_deref(), Some("false"));

    let t3 = by_id(&page, "t3");
    page.click(t3).unwrap();
    assert_eq!(page.document().location_hash().as_deref(), Some("#p3"));

    // Back navigation
    page.set_location_hash("#p1").unwrap();
    assert_eq!(page.group(id).unwrap().selected(), Some(0));
}

#[test]
fn destroy_restores_markup() {
    let config = Config {
        tab_selected_class: Some("is-active".into()),
        panel_unselected_class: Some("is-hidden".into()),
        dispatch_events: true,
        ..Config::default()
    };
    let (mut page, id) = page_with_group(&config);
    let root = by_id(&page, "root");
    let before = page.document().outer_html(root).unwrap();

    page.initialize(id, None).unwrap();
    let t2 = by_id(&page, "t2");
    page.click(t2).unwrap();
    assert_ne!(page.document().outer_html(root).unwrap(), before);

    page.destroy_all();

    assert_eq!(page.document().outer_html(root).unwrap(), before);
    assert_eq!(page.document().listener_count(), 0);
    assert!(!page.click(t2).unwrap());
}

#[test]
fn initialize_twice_changes_nothing() {
    let (mut page, id) = page_with_group(&Config::default());
    page.initialize(id, None).unwrap();
    let root = by_id(&page, "root");
    let once = page.document().outer_html(root).unwrap();
    let listeners = page.document().listener_count();

    page.initialize(id, None).unwrap();

    assert_eq!(page.document().outer_html(root).unwrap(), once);
    assert_eq!(page.document().listener_count(), listeners);
}

#[test]
fn custom_events_fire_on_user_selection_only() {
    let config = Config {
        dispatch_events: true,
        ..Config::default()
    };
    let (mut page, id) = page_with_group(&config);
    page.initialize(id, None).unwrap();
    assert!(page.document().dispatched_events().is_empty());

    let t1 = by_id(&page, "t1");
    page.key_down(t1, Key::ArrowRight, Modifiers::NONE).unwrap();

    let names: Vec<String> = page
        .document()
        .dispatched_events()
        .into_iter()
        .map(|e| e.name)
        .collect();
    assert_eq!(names, vec!["a11ytab:beforeBlur", "a11ytab:afterFocus"]);
}

#[test]
fn non_ascii_panel_ids_follow_location() {
    let markup = r##"<div id="root"><a class="a11ytb-button" href="#intro" id="a">Intro</a><a class="a11ytb-button" href="#résumé" id="b">Résumé</a><div id="intro">i</div><div id="résumé">r</div></div>"##;
    let mut page = Page::from_html(markup);
    let root = by_id(&page, "root");
    let config = Config {
        hash_navigation: true,
        ..Config::default()
    };
    let id = page.attach(root, &config).unwrap();
    page.initialize(id, None).unwrap();

    assert_eq!(page.set_location_hash("#résumé").unwrap(), vec![id]);
    assert_eq!(page.group(id).unwrap().selected(), Some(1));
    assert_eq!(page.document().location_hash().as_deref(), Some("#résumé"));

    // Selecting writes the hash back in a form that matches again
    let a = by_id(&page, "a");
    page.click(a).unwrap();
    let b = by_id(&page, "b");
    page.click(b).unwrap();
    assert_eq!(page.set_location_hash("#résumé").unwrap(), Vec::new());
    assert_eq!(page.group(id).unwrap().selected(), Some(1));
}

#[test]
fn triggers_found_through_combinators() {
    let config = Config {
        trigger_selector: ".a11ytb-list li > a".to_string(),
        ..Config::default()
    };
    let (mut page, id) = page_with_group(&config);
    page.initialize(id, None).unwrap();

    assert_eq!(page.group(id).unwrap().triggers().len(), 3);
    let t1 = by_id(&page, "t1");
    page.key_down(t1, Key::ArrowLeft, Modifiers::NONE).unwrap();
    assert_eq!(attr(&page, "t3", "aria-selected").as_deref(), Some("true"));
}
