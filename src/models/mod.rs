//! Data models for the site content document.
//!
//! Field names serialize as camelCase so the persisted document matches what the admin pages send.

mod document;
mod faq;
mod info;
mod news;
mod staff;
mod vacancy;

pub use document::*;
pub use faq::*;
pub use info::*;
pub use news::*;
pub use staff::*;
pub use vacancy::*;

/// Items that can be hidden from the public site until published.
pub trait Publishable {
    fn is_published(&self) -> bool;
}

/// Keep only the published items, preserving order.
pub fn published_only<T: Publishable>(items: Vec<T>) -> Vec<T> {
    items.into_iter().filter(|item| item.is_published()).collect()
}
