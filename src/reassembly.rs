//! Reassembly of messages from a batch of channel items.
//!
//! The engine makes two passes over a batch:
//!
//! 1. Every decoded frame writes its payload into the slot table of its
//!    group. A table is sized by the first frame seen for that group; a later
//!    frame that declares a different total is opaque, not fatal. A repeated
//!    `(group, index)` simply overwrites the slot.
//! 2. Walking the batch in its original order, the first item of each group
//!    emits that group's message and every undecodable item emits an opaque
//!    placeholder, so the result reads as one feed.
//!
//! Slots are `Option<String>`: a frame that never arrived is a gap, which is
//! never confused with an empty payload. Only a message with no gaps has
//! [`ReconstructedMessage::text`].

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::channel::ChannelItem;
use crate::crypto::CipherScheme;
use crate::decoder::{decode_items, ItemOutcome, OpaqueReason};
use crate::frame::GroupId;

/// One position of a reconstructed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot<'a> {
    Payload(&'a str),
    /// No frame with this index was received.
    Gap(usize),
}

/// A message rebuilt from whichever of its frames were in the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconstructedMessage {
    group_id: GroupId,
    slots: Vec<Option<String>>,
}

impl ReconstructedMessage {
    pub fn group_id(&self) -> GroupId {
        self.group_id
    }

    /// Number of frames the message was split into.
    pub fn total(&self) -> usize {
        self.slots.len()
    }

    /// Number of distinct frames received.
    pub fn received(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Indices of frames that never arrived, ascending.
    pub fn missing_indices(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_none())
            .map(|(i, _)| i)
            .collect()
    }

    /// Slots in index order.
    pub fn slots(&self) -> impl Iterator<Item = Slot<'_>> + '_ {
        self.slots.iter().enumerate().map(|(i, s)| match s {
            Some(payload) => Slot::Payload(payload.as_str()),
            None => Slot::Gap(i),
        })
    }

    /// The full message text, or `None` while any frame is missing.
    pub fn text(&self) -> Option<String> {
        self.slots.iter().map(|s| s.as_deref()).collect()
    }

    /// Text for display, with `gap_marker` standing in for each missing frame.
    pub fn render(&self, gap_marker: &str) -> String {
        self.slots()
            .map(|slot| match slot {
                Slot::Payload(p) => p,
                Slot::Gap(_) => gap_marker,
            })
            .collect()
    }
}

/// One line of a reassembled feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEntry {
    /// A message of this group, placed at its first item in the batch.
    Message {
        author: String,
        timestamp: DateTime<Utc>,
        message: ReconstructedMessage,
    },
    /// An item this group cannot read.
    Opaque {
        author: String,
        timestamp: DateTime<Utc>,
        reason: OpaqueReason,
    },
}

impl FeedEntry {
    pub fn author(&self) -> &str {
        match self {
            FeedEntry::Message { author, .. } | FeedEntry::Opaque { author, .. } => author,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            FeedEntry::Message { timestamp, .. } | FeedEntry::Opaque { timestamp, .. } => {
                *timestamp
            }
        }
    }

    pub fn message(&self) -> Option<&ReconstructedMessage> {
        match self {
            FeedEntry::Message { message, .. } => Some(message),
            FeedEntry::Opaque { .. } => None,
        }
    }
}

/// Result of one batch scan, in batch order (newest first).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Feed {
    entries: Vec<FeedEntry>,
}

impl Feed {
    pub fn entries(&self) -> &[FeedEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<FeedEntry> {
        self.entries
    }

    /// Entries oldest first, for display.
    pub fn oldest_first(&self) -> impl Iterator<Item = &FeedEntry> + '_ {
        self.entries.iter().rev()
    }

    pub fn messages(&self) -> impl Iterator<Item = &ReconstructedMessage> + '_ {
        self.entries.iter().filter_map(FeedEntry::message)
    }

    pub fn complete_messages(&self) -> impl Iterator<Item = &ReconstructedMessage> + '_ {
        self.messages().filter(|m| m.is_complete())
    }

    pub fn message(&self, group_id: GroupId) -> Option<&ReconstructedMessage> {
        self.messages().find(|m| m.group_id() == group_id)
    }

    pub fn opaque_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e, FeedEntry::Opaque { .. }))
            .count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Decodes and reassembles a batch of items (newest first).
pub fn reassemble(items: &[ChannelItem], passphrase: &str, scheme: CipherScheme) -> Feed {
    let outcomes = decode_items(items.iter().map(|i| i.body.as_str()), passphrase, scheme);
    reassemble_outcomes(items, outcomes)
}

/// Groups already-decoded items into a feed.
///
/// `outcomes[i]` must belong to `items[i]`; unmatched trailing entries on
/// either side are ignored.
pub fn reassemble_outcomes(items: &[ChannelItem], mut outcomes: Vec<ItemOutcome>) -> Feed {
    let mut tables: HashMap<GroupId, Vec<Option<String>>> = HashMap::new();

    for outcome in outcomes.iter_mut() {
        let conflict = match outcome {
            ItemOutcome::Frame(frame) => {
                let slots = tables
                    .entry(frame.group_id())
                    .or_insert_with(|| vec![None; frame.total()]);
                if slots.len() == frame.total() {
                    slots[frame.index()] = Some(frame.payload().to_owned());
                    None
                } else {
                    Some(OpaqueReason::Conflict {
                        declared: frame.total(),
                        expected: slots.len(),
                    })
                }
            }
            ItemOutcome::Opaque(_) => None,
        };
        if let Some(reason) = conflict {
            *outcome = ItemOutcome::Opaque(reason);
        }
    }

    let mut entries = Vec::new();
    for (item, outcome) in items.iter().zip(outcomes) {
        match outcome {
            ItemOutcome::Frame(frame) => {
                let group_id = frame.group_id();
                // Removing the table marks the group as reported.
                if let Some(slots) = tables.remove(&group_id) {
                    entries.push(FeedEntry::Message {
                        author: item.author.clone(),
                        timestamp: item.timestamp,
                        message: ReconstructedMessage { group_id, slots },
                    });
                }
            }
            ItemOutcome::Opaque(reason) => {
                tracing::debug!(author = %item.author, %reason, "opaque item");
                entries.push(FeedEntry::Opaque {
                    author: item.author.clone(),
                    timestamp: item.timestamp,
                    reason,
                });
            }
        }
    }

    let feed = Feed { entries };
    tracing::debug!(
        items = items.len(),
        messages = feed.messages().count(),
        complete = feed.complete_messages().count(),
        opaque = feed.opaque_count(),
        "reassembled batch"
    );
    feed
}
