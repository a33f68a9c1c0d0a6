//! ## Blocks
//!
//! The transmit chain, in stream order:
//!
//! | Block | Input | Output | Usage |
//! |---|---|---|---|
//! | [Framer] | `()` | `u8` | Frames submitted PSDUs into PPDUs and tags rate changes |
//! | [Scrambler] | `u8` | `u8` | Scrambles (or descrambles) bytes, resetting at frame starts |
//! | [CodeMapper] | `u8` | `Complex32` | Differential encoding, Barker/CCK spreading |

mod code_mapper;
pub use code_mapper::BARKER;
pub use code_mapper::CodeMapper;

mod framer;
pub use framer::Framer;
pub use framer::FramerHandle;

mod scrambler;
pub use scrambler::DESCRAMBLER_SEED;
pub use scrambler::Mode;
pub use scrambler::SCRAMBLER_SEED;
pub use scrambler::Scrambler;
