//! The narrow interface a host bundler drives.
//!
//! A [`BuildAdapter`] owns one engine instance per build session and exposes
//! the three calls a host needs: [`compile`](BuildAdapter::compile),
//! [`on_file_changed`](BuildAdapter::on_file_changed) and
//! [`resolve_virtual_module`](BuildAdapter::resolve_virtual_module).

mod entry;
mod session;
mod virtual_module;

pub use entry::{ConfigEntry, FnConfig};
pub use session::{BuildAdapter, FileChange};
pub use virtual_module::{ManifestClass, ManifestDimension, ManifestExport, ModuleManifest, VirtualModule};
