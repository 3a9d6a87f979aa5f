//! # Persistence
//!
//! Durable, process-local storage for named templates and uploaded
//! background images. Both stores are explicit objects opened on a path,
//! not ambient global state: call sites get wired a store instance and
//! tests isolate themselves with fresh directories.
//!
//! Neither store is shared across machines; durability means surviving a
//! process restart, nothing more.

mod backgrounds;
mod templates;

pub use backgrounds::BackgroundStore;
pub use templates::TemplateStore;
