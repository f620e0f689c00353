//! Content watching that feeds [`BuildAdapter::on_file_changed`](crate::BuildAdapter::on_file_changed).
//!
//! This module is only available with the `hot-reload` feature.

mod watcher;

pub use watcher::{ChangeKind, ContentChangeEvent, ContentWatcher};
