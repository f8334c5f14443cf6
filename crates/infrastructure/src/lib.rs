//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod fallback_layout_repository;
mod file_layout_repository;
mod http_layout_repository;
mod in_memory_layout_repository;

pub use fallback_layout_repository::FallbackLayoutRepository;
pub use file_layout_repository::FileLayoutRepository;
pub use http_layout_repository::{HttpLayoutRepository, USER_ID_HEADER};
pub use in_memory_layout_repository::InMemoryLayoutRepository;
