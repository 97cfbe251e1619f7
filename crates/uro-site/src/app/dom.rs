//! `web-sys` rendering adapter.

use crate::core::error::{SiteError, SiteResult};
use crate::core::menu::{HIDDEN_CLASS, MENU_ID, MenuState, MenuStep, OFFSCREEN_CLASS, PANEL_SELECTOR};
use crate::core::nav::NavGroup;
use crate::core::ports::{NavLink, Renderer};
use gloo::console;
use gloo::utils::{document, window};
use wasm_bindgen::JsCast;
use web_sys::{Element, NodeList};

/// Renderer bound to the live document.
pub(crate) struct DomRenderer;

impl Renderer for DomRenderer {
    fn has_element(&self, id: &str) -> bool {
        document().get_element_by_id(id).is_some()
    }

    fn replace_content(&self, id: &str, markup: &str) -> SiteResult<()> {
        let element = document()
            .get_element_by_id(id)
            .ok_or_else(|| SiteError::MissingElement { id: id.to_string() })?;
        element.set_inner_html(markup);
        Ok(())
    }

    fn set_root_class(&self, class: &str) {
        if let Some(root) = document().document_element() {
            root.set_class_name(class);
        }
    }

    fn nav_links(&self, group: NavGroup) -> Vec<NavLink> {
        elements(group.selector())
            .into_iter()
            .enumerate()
            .map(|(index, element)| NavLink {
                index,
                href: element.get_attribute("href"),
            })
            .collect()
    }

    fn update_link_classes(&self, group: NavGroup, index: usize, add: &[&str], remove: &[&str]) {
        if let Some(element) = elements(group.selector()).into_iter().nth(index) {
            toggle_classes(&element, add, remove);
        }
    }

    fn navigate(&self, url: &str) {
        if let Err(err) = window().location().set_href(url) {
            console::error!("navigation failed", url, err);
        }
    }
}

/// Every element matching `selector`, in document order.
pub(crate) fn elements(selector: &str) -> Vec<Element> {
    document()
        .query_selector_all(selector)
        .map(|list| collect_elements(&list))
        .unwrap_or_default()
}

fn collect_elements(list: &NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|index| list.item(index))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

fn toggle_classes(element: &Element, add: &[&str], remove: &[&str]) {
    let classes = element.class_list();
    for class in remove {
        let _ = classes.remove_1(class);
    }
    for class in add {
        let _ = classes.add_1(class);
    }
}

/// Apply one mobile menu step to the live document.
/// Menu visibility read back from the container's classes.
pub(crate) fn menu_state() -> Option<MenuState> {
    document()
        .get_element_by_id(MENU_ID)
        .map(|menu| MenuState::from_hidden(menu.class_list().contains(HIDDEN_CLASS)))
}

pub(crate) fn apply_menu_step(step: MenuStep) {
    let target = match step {
        MenuStep::Reveal | MenuStep::Hide => document().get_element_by_id(MENU_ID),
        MenuStep::SlideIn | MenuStep::SlideOut => document().query_selector(PANEL_SELECTOR).ok().flatten(),
    };
    let Some(target) = target else {
        tracing::warn!(step = ?step, "mobile menu element missing");
        return;
    };
    match step {
        MenuStep::Reveal => toggle_classes(&target, &[], &[HIDDEN_CLASS]),
        MenuStep::Hide => toggle_classes(&target, &[HIDDEN_CLASS], &[]),
        MenuStep::SlideIn => toggle_classes(&target, &[], &[OFFSCREEN_CLASS]),
        MenuStep::SlideOut => toggle_classes(&target, &[OFFSCREEN_CLASS], &[]),
    }
}
