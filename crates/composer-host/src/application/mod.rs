//! Application layer for the host process.
//!
//! # What lives here? (for beginners)
//!
//! The *application* layer drives the domain engine from
//! [`composer_core`] on behalf of a caller.  It knows nothing about files or
//! terminals: the binary hands it an already-parsed [`session::Scenario`] and
//! reads back a [`composer_core::LayoutSnapshot`].
//!
//! - **`session`** – Replays an ordered list of participant events (join,
//!   leave, floor change, topology change, canvas resize) against one engine.

pub mod session;
