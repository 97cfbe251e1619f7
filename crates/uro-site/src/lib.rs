#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls
)]
#![warn(
    missing_docs,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::multiple_crate_versions)]
//! Uroginecologia Em Dia site runtime.
//!
//! Loads the shared header and footer fragments into every page, marks the
//! active navigation link, drives the mobile menu and header search, and
//! relays small messages between open tabs through local storage. The
//! [`core`] module is DOM-free and builds natively for tests; the browser
//! bindings compile only for `wasm32`.

pub mod core;

#[cfg(target_arch = "wasm32")]
mod app;

#[cfg(target_arch = "wasm32")]
pub use app::run_site;
