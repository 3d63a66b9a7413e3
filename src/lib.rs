//! # Commentseal - private messages in public comment threads
//!
//! Commentseal carries secret text of any length over a public, lossy,
//! unordered comment stream that is shared with unrelated traffic.
//!
//! ## Overview
//!
//! - A message is **split** into small frames sharing a random group id
//! - Each frame is **encrypted** under the group passphrase into one comment
//! - Comments are posted independently; the channel may drop, duplicate or
//!   reorder them, and mixes in comments from everyone else
//! - A reader **reassembles** whatever batch it fetched: frames are grouped by
//!   id, missing frames show up as explicit gaps, and unreadable comments
//!   become opaque placeholders in the feed
//!
//! ## Example Usage
//!
//! ```rust
//! use commentseal::{reassemble, seal, ChannelItem, CipherScheme};
//! use chrono::Utc;
//!
//! let sealed = seal("meet at noon", "group passphrase").unwrap();
//!
//! // What a channel fetch might return: our frame plus someone else's comment.
//! let mut items: Vec<ChannelItem> = sealed
//!     .items()
//!     .iter()
//!     .map(|body| ChannelItem::new(body.as_str(), "alice", Utc::now()))
//!     .collect();
//! items.push(ChannelItem::new("nice pic", "bob", Utc::now()));
//!
//! let feed = reassemble(&items, "group passphrase", CipherScheme::Sealed);
//! assert_eq!(feed.messages().next().unwrap().text().as_deref(), Some("meet at noon"));
//! assert_eq!(feed.opaque_count(), 1);
//! ```
//!
//! ## Modules
//!
//! - [`crypto`]: item encryption under a group passphrase
//! - [`frame`]: splitting and the fixed-width frame codec
//! - [`encoder`]: message to postable items
//! - [`decoder`]: item to frame or opaque outcome (never fails)
//! - [`reassembly`]: batch to feed of messages and placeholders
//! - [`channel`]: the channel adapter trait and local implementations
//! - [`session`]: explicit per-group context

pub mod channel;
pub mod config;
pub mod crypto;
pub mod decoder;
pub mod encoder;
pub mod frame;
pub mod reassembly;
pub mod session;

// Re-export commonly used types at the crate root
pub use channel::{post_sealed, Channel, ChannelError, ChannelItem, PostReport};
pub use config::{SealConfig, Settings};
pub use crypto::{decrypt_item, encrypt_item, generate_passphrase, CipherScheme, DecryptFailure};
pub use decoder::{decode_item, ItemOutcome, OpaqueReason};
pub use encoder::{seal, seal_with_config, SealError, SealedMessage};
pub use frame::{Frame, FrameError, GroupId, ParseFailure, DEFAULT_MAX_PAYLOAD, MAX_FRAMES};
pub use reassembly::{reassemble, reassemble_outcomes, Feed, FeedEntry, ReconstructedMessage, Slot};
pub use session::GroupSession;
