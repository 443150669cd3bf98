//! Output generation for the finished digest.
//!
//! # Submodules
//!
//! - [`digest`]: renders category sections into the plain-text digest
//! - [`email`]: delivers the digest to the configured recipient over SMTP
//!
//! # Digest Layout
//!
//! ```text
//! 📅 **Your Daily News Digest**
//!
//! ### Sports:
//! - One sentence summary. ([Read more](https://...))
//! - Another summary. ([Read more](https://...))
//!
//! ### Science:
//! - ...
//! ```

pub mod digest;
pub mod email;
