//! Release download and archive extraction
//!
//! ## Module Organization
//!
//! - `platform` - Host identifier mapping to release coordinates
//! - `release` - Download URL and archive naming
//! - `core` - HTTP download with bounded redirect following
//! - `extract` - Platform-specific archive extraction (tar.gz, zip)

mod core;
mod extract;
mod platform;
mod release;

pub use self::core::{ArchiveFetcher, MAX_REDIRECTS};
pub use extract::extract_archive;
pub use platform::{Arch, HostIdentifiers, Platform, ReleaseCoordinate};
pub use release::{DownloadTarget, archive_name, release_url};
