//! Event listener wiring for the message bus, header menu, and search box.
//!
//! Listeners live as long as the page, so their handles are forgotten once
//! attached.

use crate::app::dom::{apply_menu_step, elements, menu_state};
use crate::app::storage::js_message;
use crate::core::context::SiteContext;
use crate::core::menu::{MENU_ID, MenuAction, MenuTimings, MenuTrigger, plan_from};
use crate::core::search::{BUTTON_ID, INPUT_ID};
use gloo::events::EventListener;
use gloo::utils::{document, window};
use gloo_timers::callback::Timeout;
use js_sys::JSON;
use wasm_bindgen::JsCast;
use web_sys::{CustomEvent, Event, HtmlInputElement, KeyboardEvent, StorageEvent};

/// Relay storage events from other tabs and in-page message events.
pub(crate) fn listen_for_messages(ctx: &SiteContext) {
    let window = window();

    let storage_ctx = ctx.clone();
    EventListener::new(&window, "storage", move |event: &Event| {
        let Some(event) = event.dyn_ref::<StorageEvent>() else {
            return;
        };
        storage_ctx
            .bus()
            .on_storage_event(event.key().as_deref(), event.new_value().as_deref());
    })
    .forget();

    let local_ctx = ctx.clone();
    let event_name = ctx.config().message_event.clone();
    EventListener::new(&window, event_name, move |event: &Event| {
        let Some(event) = event.dyn_ref::<CustomEvent>() else {
            return;
        };
        let detail = event.detail();
        let raw = match detail.as_string() {
            Some(raw) => raw,
            None => match JSON::stringify(&detail) {
                Ok(raw) => String::from(raw),
                Err(err) => {
                    tracing::warn!(error = %js_message(&err), "unreadable message event detail");
                    return;
                }
            },
        };
        local_ctx.bus().receive(&raw);
    })
    .forget();
}

/// Log connectivity changes.
pub(crate) fn listen_for_connectivity() {
    let window = window();
    EventListener::new(&window, "online", |_| tracing::info!("connection restored")).forget();
    EventListener::new(&window, "offline", |_| tracing::warn!("connection lost")).forget();
}

/// Wire the slide-in mobile menu; skipped when the page has none.
pub(crate) fn wire_mobile_menu(timings: MenuTimings) {
    if document().get_element_by_id(MENU_ID).is_none() {
        tracing::debug!("mobile menu not present");
        return;
    }

    for trigger in MenuTrigger::BY_ID {
        let Some(id) = trigger.element_id() else {
            continue;
        };
        if let Some(element) = document().get_element_by_id(id) {
            on_click(&element, trigger.action(), timings);
        }
    }
    for link in elements("#mobileMenu a") {
        on_click(&link, MenuTrigger::Link.action(), timings);
    }
}

fn on_click(target: &web_sys::EventTarget, action: MenuAction, timings: MenuTimings) {
    EventListener::new(target, "click", move |_| run_menu_action(action, timings)).forget();
}

fn run_menu_action(action: MenuAction, timings: MenuTimings) {
    let Some(state) = menu_state() else {
        return;
    };
    let Some(plan) = plan_from(state, action, timings) else {
        tracing::debug!(action = ?action, "mobile menu already settled");
        return;
    };
    apply_menu_step(plan.immediate);
    let delay = u32::try_from(plan.delay.as_millis()).unwrap_or(u32::MAX);
    let _ = Timeout::new(delay, move || apply_menu_step(plan.deferred)).forget();
}

/// Submit the search box on button click or Enter.
pub(crate) fn wire_search(ctx: &SiteContext) {
    let input = document()
        .get_element_by_id(INPUT_ID)
        .and_then(|element| element.dyn_into::<HtmlInputElement>().ok());
    let Some(input) = input else {
        tracing::debug!("search box not present");
        return;
    };

    if let Some(button) = document().get_element_by_id(BUTTON_ID) {
        let ctx = ctx.clone();
        let input = input.clone();
        EventListener::new(&button, "click", move |_| {
            ctx.submit_search(&input.value());
        })
        .forget();
    }

    let ctx = ctx.clone();
    let target = input.clone();
    EventListener::new(&target, "keypress", move |event: &Event| {
        let is_enter = event
            .dyn_ref::<KeyboardEvent>()
            .is_some_and(|event| event.key() == "Enter");
        if is_enter {
            ctx.submit_search(&input.value());
        }
    })
    .forget();
}
