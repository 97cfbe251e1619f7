#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs
)]
//! Page bootstrap for the site's static HTML.
//!
//! In the browser this attaches the site runtime to the current page. Native
//! builds only explain where the module belongs.

#[cfg(target_arch = "wasm32")]
fn main() {
    uro_site::run_site();
}

#[cfg(not(target_arch = "wasm32"))]
const NATIVE_NOTICE: &str = "uro-site runs inside the pages of Uroginecologia Em Dia. \
Build it for wasm32-unknown-unknown, run wasm-bindgen over the output, and load the \
generated module from each page next to the header-component and footer-component \
placeholders.\n";

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::io::Result<()> {
    use std::io::Write;

    std::io::stderr().lock().write_all(NATIVE_NOTICE.as_bytes())
}
