//! Core, DOM-free logic for the site runtime.
pub mod bus;
pub mod config;
pub mod context;
pub mod error;
pub mod fragments;
pub mod menu;
pub mod nav;
pub mod ports;
pub mod search;
pub mod views;

#[cfg(test)]
pub(crate) mod testing;
