//! Flutter-facing bindings over `clockkit_core`.

pub mod api;
