//! Browser glue for the portfolio page: loading splash, in-page navigation
//! and the two contact forms. Components are written against small view
//! traits; `dom` binds them to the real document.

pub mod app;
pub mod config;
pub mod contact_form;
pub mod dom;
pub mod error;
pub mod form;
pub mod loader;
pub mod navigation;
pub mod schedule;
pub mod utils;
pub mod validation;
pub mod whatsapp;

pub use error::Error;
