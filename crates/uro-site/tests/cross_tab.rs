//! Two tabs of the same origin sharing one local storage.

use chrono::{DateTime, Utc};
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;
use uro_events::MessageKind;
use uro_site::core::bus::Delivery;
use uro_site::core::config::SiteConfig;
use uro_site::core::context::{SiteContext, SitePorts};
use uro_site::core::error::SiteResult;
use uro_site::core::nav::NavGroup;
use uro_site::core::ports::{Clock, KeyValueStore, MemoryStore, NavLink, Renderer, Transport};

#[derive(Default)]
struct Page {
    root_class: RefCell<Option<String>>,
    navigations: RefCell<Vec<String>>,
}

impl Renderer for Page {
    fn has_element(&self, _id: &str) -> bool {
        false
    }

    fn replace_content(&self, id: &str, _markup: &str) -> SiteResult<()> {
        Err(uro_site::core::error::SiteError::MissingElement { id: id.to_string() })
    }

    fn set_root_class(&self, class: &str) {
        *self.root_class.borrow_mut() = Some(class.to_string());
    }

    fn nav_links(&self, _group: NavGroup) -> Vec<NavLink> {
        Vec::new()
    }

    fn update_link_classes(&self, _group: NavGroup, _index: usize, _add: &[&str], _remove: &[&str]) {}

    fn navigate(&self, url: &str) {
        self.navigations.borrow_mut().push(url.to_string());
    }
}

/// Storage shared by every tab; each write is queued as a storage event for
/// the tabs that did not make it.
#[derive(Default)]
struct Origin {
    entries: MemoryStore,
    events: RefCell<Vec<(usize, String, String)>>,
}

struct TabStore {
    tab: usize,
    origin: Rc<Origin>,
}

impl KeyValueStore for TabStore {
    fn get(&self, key: &str) -> Option<String> {
        self.origin.entries.get(key)
    }

    fn set(&self, key: &str, value: &str) -> SiteResult<()> {
        self.origin.entries.set(key, value)?;
        self.origin
            .events
            .borrow_mut()
            .push((self.tab, key.to_string(), value.to_string()));
        Ok(())
    }
}

#[derive(Default)]
struct Loopback {
    queue: RefCell<Vec<String>>,
}

impl Transport for Loopback {
    fn dispatch(&self, raw: &str) -> SiteResult<()> {
        self.queue.borrow_mut().push(raw.to_string());
        Ok(())
    }
}

struct Frozen;

impl Clock for Frozen {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(1_735_689_600_000).unwrap_or_default()
    }
}

struct Tab {
    page: Rc<Page>,
    loopback: Rc<Loopback>,
    ctx: SiteContext,
}

fn open_tab(origin: &Rc<Origin>, tab: usize, pathname: &str) -> Tab {
    let page = Rc::new(Page::default());
    let loopback = Rc::new(Loopback::default());
    let ctx = SiteContext::new(
        SiteConfig::default(),
        pathname,
        SitePorts {
            renderer: page.clone(),
            store: Rc::new(TabStore {
                tab,
                origin: origin.clone(),
            }),
            transport: loopback.clone(),
            clock: Rc::new(Frozen),
        },
    );
    Tab {
        page,
        loopback,
        ctx,
    }
}

/// Deliver pending in-page events and storage events, as the event loop would.
fn pump(origin: &Origin, tabs: &[&Tab]) -> Vec<(usize, Delivery)> {
    let mut deliveries = Vec::new();
    for (index, tab) in tabs.iter().enumerate() {
        let raw = std::mem::take(&mut *tab.loopback.queue.borrow_mut());
        for message in raw {
            deliveries.push((index, tab.ctx.bus().receive(&message)));
        }
    }
    let events = std::mem::take(&mut *origin.events.borrow_mut());
    for (writer, key, value) in events {
        for (index, tab) in tabs.iter().enumerate() {
            if index == writer {
                continue;
            }
            if let Some(delivery) = tab.ctx.bus().on_storage_event(Some(&key), Some(&value)) {
                deliveries.push((index, delivery));
            }
        }
    }
    deliveries
}

#[test]
fn theme_change_reaches_other_tab() {
    let origin = Rc::new(Origin::default());
    let home = open_tab(&origin, 0, "/index.html");
    let about = open_tab(&origin, 1, "/sobre.html");

    home.ctx
        .set_user_preference("theme", json!("escuro"))
        .unwrap_or_else(|err| panic!("send failed: {err}"));
    let deliveries = pump(&origin, &[&home, &about]);

    assert!(deliveries.contains(&(0, Delivery::Applied(MessageKind::UserPreference))));
    assert!(deliveries.contains(&(1, Delivery::Applied(MessageKind::UserPreference))));
    assert_eq!(home.page.root_class.borrow().as_deref(), Some("escuro"));
    assert_eq!(about.page.root_class.borrow().as_deref(), Some("escuro"));
    assert_eq!(origin.entries.get("uro-theme").as_deref(), Some("escuro"));
}

#[test]
fn repeated_views_accumulate() {
    let origin = Rc::new(Origin::default());
    let reader = open_tab(&origin, 0, "/artigos.html");

    reader
        .ctx
        .track_content_view("artigo-42", Some("Prolapso genital"), None)
        .unwrap_or_else(|err| panic!("send failed: {err}"));
    pump(&origin, &[&reader]);
    reader
        .ctx
        .track_content_view("artigo-42", None, None)
        .unwrap_or_else(|err| panic!("send failed: {err}"));
    pump(&origin, &[&reader]);

    assert_eq!(reader.ctx.view_count("artigo-42"), 2);
}

#[test]
fn one_view_with_several_tabs_open_counts_once() {
    let origin = Rc::new(Origin::default());
    let reader = open_tab(&origin, 0, "/artigos.html");
    let other = open_tab(&origin, 1, "/index.html");
    let third = open_tab(&origin, 2, "/eventos.html");

    reader
        .ctx
        .track_content_view("artigo-1", Some("Incontinência urinária"), None)
        .unwrap_or_else(|err| panic!("send failed: {err}"));
    let deliveries = pump(&origin, &[&reader, &other, &third]);

    assert!(deliveries.contains(&(0, Delivery::Applied(MessageKind::ContentViewed))));
    assert!(deliveries.contains(&(1, Delivery::Ignored(MessageKind::ContentViewed))));
    assert!(deliveries.contains(&(2, Delivery::Ignored(MessageKind::ContentViewed))));
    assert_eq!(reader.ctx.view_count("artigo-1"), 1);
    assert_eq!(other.ctx.view_count("artigo-1"), 1);
}

#[test]
fn search_from_one_tab_is_relayed_to_hooks_in_another() {
    let origin = Rc::new(Origin::default());
    let home = open_tab(&origin, 0, "/");
    let news = open_tab(&origin, 1, "/noticias.html");
    let seen = Rc::new(RefCell::new(Vec::<String>::new()));
    let sink = seen.clone();
    news.ctx
        .bus()
        .on_search(move |terms| sink.borrow_mut().extend_from_slice(terms));

    let url = home.ctx.submit_search(" fisioterapia pélvica ");
    pump(&origin, &[&home, &news]);

    assert_eq!(url.as_deref(), Some("busca.html?q=fisioterapia%20p%C3%A9lvica"));
    assert_eq!(
        *home.page.navigations.borrow(),
        vec!["busca.html?q=fisioterapia%20p%C3%A9lvica".to_string()]
    );
    assert!(news.page.navigations.borrow().is_empty());
    assert_eq!(*seen.borrow(), vec!["fisioterapia pélvica".to_string()]);
}

#[test]
fn unknown_message_from_newer_page_is_ignored() {
    let origin = Rc::new(Origin::default());
    let tab = open_tab(&origin, 0, "/contato.html");
    let raw = r#"{"type":"newsletter-signup","data":{"theme":"escuro"},"timestamp":1,"page":"index"}"#;

    let delivery = tab.ctx.bus().on_storage_event(Some("uro-site-data"), Some(raw));

    assert_eq!(delivery, Some(Delivery::Unknown("newsletter-signup".into())));
    assert_eq!(*tab.page.root_class.borrow(), None);
    assert!(origin.entries.is_empty());
}
