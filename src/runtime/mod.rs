//! ## Block Runtime
//!
//! The pieces a host scheduler needs to drive the blocks of this crate: the
//! [`Kernel`] trait, the per-call stream windows ([`StreamIo`]), stream tags,
//! configuration, logging, and the [`Mocker`] harness that runs a single block
//! without a scheduler.
use thiserror::Error;

use crate::Rate;

pub mod config;
mod kernel;
mod logging;
mod mocker;
mod stream_io;
mod tag;
mod work_io;

pub use kernel::Kernel;
pub use mocker::Mocker;
pub use stream_io::StreamIo;
pub use tag::ItemTag;
pub use tag::Tag;
pub use tag::copy_tag_propagation;
pub use work_io::WorkIo;

/// Result type used by kernels and binaries
pub type Result<T, E = anyhow::Error> = std::result::Result<T, E>;

/// Initialize logging
///
/// Installs a `tracing` subscriber. Calling it more than once is harmless.
pub fn init() {
    logging::init();
}

/// Runtime error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// 1 Mbps frames require the long preamble
    #[error("the short preamble cannot be used with {0}")]
    ShortPreambleAt1Mbps(Rate),
    /// Unknown data rate
    #[error("invalid data rate '{0}' (expected 1, 2, 5.5, or 11)")]
    InvalidRate(String),
    /// Unknown preamble type
    #[error("invalid preamble '{0}' (expected long or short)")]
    InvalidPreamble(String),
}
