//! Integration tests against the shipped data, theme and configuration.

use std::path::PathBuf;
use std::time::Duration;

use memento_core::config::Config;
use memento_core::copy::MemoryClipboard;
use memento_core::dom::{Selector, find_all, find_first};
use memento_core::theme::{MemoryStore, stored_theme};
use memento_core::{
    Click, ContentModel, Document, Page, PageOptions, SiteBuilder, Theme, VirtualDocument,
    prerender,
};

fn project_root() -> PathBuf {
    // Navigate from memento-core/ up to the workspace root
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .to_path_buf()
}

fn shipped_content() -> ContentModel {
    ContentModel::read(project_root().join("data/commands.json"))
        .expect("Failed to load data/commands.json")
}

#[test]
fn test_shipped_content_is_valid() {
    let content = shipped_content();
    assert!(!content.is_empty(), "Expected at least one category");

    for category in content.categories() {
        assert!(!category.id.is_empty(), "Category ids must not be empty");
        assert!(!category.entries.is_empty(), "{} has no entries", category.id);
        for entry in &category.entries {
            assert!(!entry.value.trim().is_empty(), "{} has an empty command", category.id);
        }
    }
}

#[test]
fn test_shipped_config_parses() {
    let config =
        Config::read(project_root().join("memento.toml")).expect("Failed to load memento.toml");
    assert!(!config.site().title.is_empty());
    assert!(!config.labels().copy.idle.is_empty());
}

#[test]
fn test_shipped_theme_renders_a_complete_page() {
    let root = project_root();
    let config = Config::read(root.join("memento.toml")).unwrap();

    let site = SiteBuilder::new()
        .data_file(root.join("data/commands.json"))
        .theme_dir(root.join("theme"))
        .site_config(config.site())
        .labels(config.labels())
        .build()
        .expect("Failed to load the shipped theme");
    let html = site.render_index().unwrap();

    assert!(!html.contains("<!--app-html-->"));
    assert!(html.contains("data-theme-toggle"));
    assert!(html.contains("theme-toggle__icon"));
    assert!(html.contains("<meta name=\"theme-color\""));
    assert!(html.contains("id=\"memento-options\""));
    // The runtime packaged into public/pkg is copied next to index.html.
    assert!(html.contains("/pkg/memento_web.js"));
    assert_eq!(
        html.matches("class=\"section\"").count(),
        site.content().len(),
        "Every category should be prerendered once"
    );
}

/// The shell of a built page with an empty app container.
fn page_shell() -> VirtualDocument {
    let mut doc = VirtualDocument::new();
    let body = doc.create_element("body").unwrap();
    let root = doc.document_element();
    doc.append_child(&root, &body);

    let toggle = doc.create_element("button").unwrap();
    doc.set_attribute(&toggle, "data-theme-toggle", "");
    let icon = doc.create_element("span").unwrap();
    doc.add_class(&icon, "theme-toggle__icon");
    doc.append_child(&toggle, &icon);
    doc.append_child(&body, &toggle);

    let app = doc.create_element("main").unwrap();
    doc.set_attribute(&app, "id", "app");
    doc.append_child(&body, &app);

    doc
}

#[test]
fn test_load_renders_what_the_build_prerenders() {
    let content = shipped_content();
    let page = Page::load(
        page_shell(),
        content.categories(),
        MemoryStore::new(),
        Theme::Light,
        PageOptions::default(),
    )
    .unwrap();

    let doc = page.document();
    let app = doc.element_by_id("app").unwrap();
    let prerendered = prerender(content.categories(), &Default::default()).unwrap();
    assert_eq!(doc.inner_html(&app), prerendered);
}

#[test]
fn test_page_session_on_shipped_content() {
    let content = shipped_content();
    let mut page = Page::load(
        page_shell(),
        content.categories(),
        MemoryStore::new(),
        Theme::Light,
        PageOptions::default(),
    )
    .unwrap();

    let doc = page.document();
    let root = doc.document_element();
    let buttons = find_all(doc, &root, Selector::Class("command__btn"));
    let total: usize = content.categories().iter().map(|c| c.entries.len()).sum();
    assert_eq!(buttons.len(), total);

    // Copy the first command.
    let first = buttons[0].clone();
    let mut clipboard = MemoryClipboard::new();
    let click = page.click_with(&first, &mut clipboard, Duration::ZERO);
    assert!(matches!(click, Click::Copy(_)));
    assert_eq!(
        clipboard.contents(),
        Some(content.categories()[0].entries[0].value.as_str())
    );
    assert!(page.is_copied(&first));
    page.advance(Duration::from_millis(1500));
    assert!(!page.is_copied(&first));

    // Collapse the last section.
    let doc = page.document();
    let toggles = find_all(doc, &root, Selector::Class("section__toggle"));
    let last = toggles.last().unwrap().clone();
    assert_eq!(page.click(&last), Click::Section { expanded: false });

    // Flip the theme and keep the choice.
    let doc = page.document();
    let toggle = find_first(doc, &root, Selector::Attribute("data-theme-toggle")).unwrap();
    assert_eq!(page.click(&toggle), Click::Theme(Theme::Dark));
    assert_eq!(
        page.preferences().and_then(stored_theme),
        Some(Theme::Dark)
    );
}
