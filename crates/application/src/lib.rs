//! Application services and ports.

#![forbid(unsafe_code)]

mod access_policy;
mod layout_document;
mod layout_editor;
mod layout_ports;
mod layout_service;

pub use access_policy::{AccessDecision, AccessPolicy, FieldAccessRule, MASK_TOKEN, RoleProfile};
pub use layout_document::{LAYOUT_EXPORT_VERSION, LayoutDocument};
pub use layout_editor::{
    EditorMode, LayoutController, LayoutObserver, LayoutSettled, LayoutSnapshot,
};
pub use layout_ports::{
    ContentBox, ContentMeasurer, LOCAL_LAYOUT_KEY_PREFIX, LayoutRepository, LayoutScope,
    UnmeasuredContent,
};
pub use layout_service::{LayoutService, LockOutcome};
