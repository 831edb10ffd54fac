//-
// Copyright (c) 2026, the Maildrop authors
//
// This file is part of Maildrop.
//
// Maildrop is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free
// Software Foundation, either version 3 of the License, or (at your option)
// any later version.
//
// Maildrop is distributed in the hope that it will be useful, but WITHOUT ANY
// WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more
// details.
//
// You should have received a copy of the GNU General Public License along with
// Maildrop. If not, see <http://www.gnu.org/licenses/>.

use std::fmt;
use std::num::ParseIntError;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::prelude::*;

use crate::support::tombstones::TombstoneSet;

/// Identifies a message within a single mailbox instance.
///
/// Message numbers are assigned densely from 0, in ascending order of file
/// creation time, when the mailbox is scanned. A message number is bound to
/// its message for the life of the instance; deleting the message leaves a
/// tombstone behind rather than renumbering its successors, so numbers are
/// never reused.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Msgnum(pub u32);

impl fmt::Debug for Msgnum {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Msgnum({})", self.0)
    }
}

impl fmt::Display for Msgnum {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Msgnum {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, ParseIntError> {
        s.parse::<u32>().map(Msgnum)
    }
}

impl Msgnum {
    pub(crate) fn ix(self) -> usize {
        self.0 as usize
    }
}

/// A message's path and metadata as observed during the scan.
#[derive(Clone, Debug)]
pub struct ScannedMessage {
    pub path: PathBuf,
    pub size: u64,
    pub ctime: DateTime<Utc>,
}

/// A chronologically ordered snapshot of the contents of a mailbox.
///
/// The order of `filenames` is fixed when the catalog is built and never
/// changes afterwards, so a `Msgnum` indexes both `filenames` and `sizes`
/// for the life of the catalog. Deletion removes the size entry and records
/// a tombstone; the filename is kept so the flush pass knows what to unlink.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MessageCatalog {
    count: usize,
    total_size: u64,
    sizes: Vec<Option<u64>>,
    filenames: Vec<PathBuf>,
    deleted: TombstoneSet,
}

impl MessageCatalog {
    pub(crate) fn from_scan(messages: Vec<ScannedMessage>) -> Self {
        let mut catalog = MessageCatalog::default();
        for msg in messages {
            catalog.count += 1;
            catalog.total_size += msg.size;
            catalog.sizes.push(Some(msg.size));
            catalog.filenames.push(msg.path);
        }

        catalog
    }

    /// The number of messages ever recorded in this catalog.
    ///
    /// Deletion does not decrement this; it counts tombstones too.
    pub fn count(&self) -> usize {
        self.count
    }

    /// The summed byte size of all non-deleted messages.
    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    /// The byte size of the given message, or `None` if the message number
    /// is out of range or tombstoned.
    pub fn size_of(&self, msgnum: Msgnum) -> Option<u64> {
        self.sizes.get(msgnum.ix()).copied().flatten()
    }

    /// The on-disk path of the given message, as recorded at scan time.
    ///
    /// Unlike `size_of`, this keeps answering for tombstoned messages.
    pub fn filename_of(&self, msgnum: Msgnum) -> Option<&Path> {
        self.filenames.get(msgnum.ix()).map(PathBuf::as_path)
    }

    /// Whether the given message is in range and not tombstoned.
    pub fn contains(&self, msgnum: Msgnum) -> bool {
        self.size_of(msgnum).is_some()
    }

    pub fn is_deleted(&self, msgnum: Msgnum) -> bool {
        self.deleted.contains(msgnum.ix())
    }

    /// Iterate every message number ever assigned, tombstoned or not.
    pub fn msgnums(&self) -> impl Iterator<Item = Msgnum> {
        (0..self.count as u32).map(Msgnum)
    }

    /// Iterate the tombstoned message numbers in ascending order.
    pub fn deleted_msgnums(
        &self,
    ) -> impl Iterator<Item = Msgnum> + '_ {
        self.deleted.iter().map(|ix| Msgnum(ix as u32))
    }

    /// Tombstone `msgnum`: forget its size, subtract it from the total, and
    /// record the deletion.
    ///
    /// Returns false (and changes nothing) if the message number is out of
    /// range or already tombstoned.
    pub(crate) fn tombstone(&mut self, msgnum: Msgnum) -> bool {
        let ix = msgnum.ix();
        if ix >= self.sizes.len() || self.deleted.contains(ix) {
            return false;
        }

        if let Some(size) = self.sizes[ix].take() {
            self.total_size -= size;
            self.deleted.insert(ix);
            true
        } else {
            false
        }
    }
}

/// A message fetched from disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchedMessage {
    pub msgnum: Msgnum,
    /// The message content, decoded lossily as UTF-8.
    pub content: String,
}

#[cfg(test)]
mod test {
    use super::*;

    fn sample_catalog() -> MessageCatalog {
        MessageCatalog::from_scan(
            (0i64..3)
                .map(|n| ScannedMessage {
                    path: PathBuf::from(format!("/mail/cur/{}:2,", n)),
                    size: (10 * (n + 1)) as u64,
                    ctime: Utc.timestamp_opt(1_000 + n, 0).single().unwrap(),
                })
                .collect(),
        )
    }

    #[test]
    fn from_scan_totals() {
        let catalog = sample_catalog();
        assert_eq!(3, catalog.count());
        assert_eq!(60, catalog.total_size());
        assert_eq!(Some(20), catalog.size_of(Msgnum(1)));
        assert_eq!(
            Some(Path::new("/mail/cur/2:2,")),
            catalog.filename_of(Msgnum(2))
        );
        assert_eq!(None, catalog.size_of(Msgnum(3)));
        assert_eq!(None, catalog.filename_of(Msgnum(3)));
    }

    #[test]
    fn tombstone_bookkeeping() {
        let mut catalog = sample_catalog();
        assert!(catalog.tombstone(Msgnum(1)));
        assert_eq!(40, catalog.total_size());
        assert_eq!(3, catalog.count());
        assert!(!catalog.contains(Msgnum(1)));
        assert!(catalog.is_deleted(Msgnum(1)));
        // The filename must survive for the flush pass.
        assert_eq!(
            Some(Path::new("/mail/cur/1:2,")),
            catalog.filename_of(Msgnum(1))
        );

        // Second tombstone is a no-op
        assert!(!catalog.tombstone(Msgnum(1)));
        assert_eq!(40, catalog.total_size());

        assert!(!catalog.tombstone(Msgnum(3)));
        assert_eq!(
            vec![Msgnum(1)],
            catalog.deleted_msgnums().collect::<Vec<_>>()
        );
    }

    #[test]
    fn msgnum_round_trips_through_str() {
        assert_eq!(Ok(Msgnum(42)), "42".parse());
        assert_eq!("42", Msgnum(42).to_string());
        assert!("nope".parse::<Msgnum>().is_err());
    }
}
