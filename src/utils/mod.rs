//! Shared helpers.

pub mod html;
pub mod mime;
pub mod path;
pub mod plural;
