//! Workspace placeholder crate.
//!
//! This crate exists to expose the workspace members behind one dependency.
//! A host application can depend on `dropbox-music-adapter`, enable the
//! documented features and reach every crate through the re-exports below
//! without wiring each one individually.

pub use bridge_traits;
pub use core_auth;
pub use provider_dropbox;

#[cfg(feature = "desktop-shims")]
pub use bridge_desktop;
