#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Configuration gate for the short URL service.
//!
//! Layout: `model.rs` (snapshot + typed settings), `defaults.rs` (documented
//! defaults), `loader.rs` (JSON/YAML documents), `validate.rs` (the ordered
//! rule checks and the startup gate).

pub mod defaults;
pub mod error;
pub mod loader;
pub mod model;
pub mod validate;

pub use error::{ConfigError, ConfigResult, ConfigValidationError};
pub use loader::{DocumentFormat, LoadOptions, load_snapshot, parse_document};
pub use model::{
    ConfigSnapshot, ConfigSource, RedirectStatus, ShortUrlSettings, TableNames, TrackingSettings,
};
pub use validate::{ensure_valid, startup_gate, validate_config};
