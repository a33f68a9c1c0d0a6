#![warn(missing_docs)]

//! IEEE 802.11b DSSS/CCK transmit chain.
//!
//! Turns PSDUs into baseband chips in three blocks:
//! * [Framer](blocks::Framer): preamble, PLCP header with LENGTH and CRC-16, and
//!   tags at every modulation change.
//! * [Scrambler](blocks::Scrambler): self-synchronizing scrambler, reset at
//!   each frame start.
//! * [CodeMapper](blocks::CodeMapper): DBPSK/DQPSK with Barker spreading at 1
//!   and 2 Mbps, CCK at 5.5 and 11 Mbps.
//!
//! The blocks implement [Kernel](runtime::Kernel) and are driven by a host that
//! offers input and requests output. The [Mocker](runtime::Mocker) plays that
//! host without a scheduler.
//!
//! ## Example
//! One PPDU at 11 Mbps, from PSDU to samples:
//! ```
//! use ieee80211b::blocks::{CodeMapper, Framer, Mode, Scrambler};
//! use ieee80211b::runtime::Mocker;
//! use ieee80211b::{Preamble, Rate};
//!
//! fn main() -> anyhow::Result<()> {
//!     let framer = Framer::new(Rate::Cck11, Preamble::Long)?;
//!     framer.submit(&[0x42; 10]);
//!
//!     let mut framer = Mocker::new(framer);
//!     framer.run()?;
//!     let (bytes, tags) = framer.take_output();
//!
//!     let mut scrambler = Mocker::new(Scrambler::new(Mode::Scramble));
//!     scrambler.input_with_tags(bytes, tags);
//!     scrambler.run()?;
//!     let (bytes, tags) = scrambler.take_output();
//!
//!     let mut mapper = Mocker::new(CodeMapper::new());
//!     mapper.input_with_tags(bytes, tags);
//!     mapper.run()?;
//!
//!     // 24 bytes at 1 Mbps, 10 bytes at 11 Mbps
//!     assert_eq!(mapper.output().0.len(), 24 * 88 + 10 * 8);
//!     Ok(())
//! }
//! ```

/// Logging macro
#[macro_use]
pub extern crate tracing;

// re-exports
pub use anyhow;
pub use num_complex;

pub mod blocks;
pub mod plcp;
pub mod runtime;

mod modulation;
pub use modulation::Preamble;
pub use modulation::Rate;

mod phase;
pub use phase::QPhase;

/// Prelude with the commonly used types
pub mod prelude {
    pub use crate::Preamble;
    pub use crate::QPhase;
    pub use crate::Rate;
    pub use crate::blocks::CodeMapper;
    pub use crate::blocks::Framer;
    pub use crate::blocks::FramerHandle;
    pub use crate::blocks::Mode;
    pub use crate::blocks::Scrambler;
    pub use crate::runtime::ItemTag;
    pub use crate::runtime::Kernel;
    pub use crate::runtime::Mocker;
    pub use crate::runtime::StreamIo;
    pub use crate::runtime::Tag;
    pub use crate::runtime::WorkIo;
    pub use num_complex::Complex32;
}
