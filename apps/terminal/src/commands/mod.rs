//! # Commands Module
//!
//! Operations the terminal front-end invokes.
//!
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! └── tap.rs      ◄─── Keypad taps, bursts, easter egg
//! ```

pub mod tap;

pub use tap::{tap, tap_line, LinkOpener, SystemOpener, TapContext, TapResponse};
