//! # ovault-core
//!
//! Core types and text extraction for the ovault servers.
//!
//! This crate defines what the backends share:
//! - Error hierarchy ([`VaultError`], [`BridgeError`])
//! - Front-matter model and parsing capability ([`FmValue`],
//!   [`FrontmatterCodec`])
//! - Pure text extractors over note content ([`extract`])

pub mod error;
pub mod extract;
pub mod frontmatter;

pub use error::{BridgeError, Result, VaultError};
pub use frontmatter::{FmMap, FmValue, FrontmatterCodec, NullCodec, YamlCodec};
