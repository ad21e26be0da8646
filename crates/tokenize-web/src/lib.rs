//! tokenize-web
//!
//! Leptos-based WASM front-end for the hosted tokenization demo.

mod api;
mod app;
mod bridge;
mod components;
mod pages;

pub use app::App;

use wasm_bindgen::prelude::*;

/// WASM entry point
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    leptos::mount::mount_to_body(App);
}
