//! Cross-tab message types for the Uro site runtime.
//!
//! Pages publish small JSON messages into a single shared local-storage slot
//! and mirror them through an in-page event. This crate owns the wire shape of
//! those messages: a closed set of message kinds, their payloads, the envelope
//! that tags each message with its origin page and timestamp, and the codec
//! that turns raw slot contents back into typed values. Messages published by
//! newer pages with kinds this build does not know decode into
//! [`Inbound::Unknown`] instead of failing.

pub mod codec;
pub mod error;
pub mod payloads;
pub mod topics;

pub use codec::{Inbound, decode, encode};
pub use error::{MessageError, MessageResult};
pub use payloads::{ContentViewed, MessageEnvelope, SearchPerformed, SiteMessage, UserPreference};
pub use topics::MessageKind;
