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

use log::debug;

use super::defs::Maildir;
use crate::model::Msgnum;
use crate::support::error::Error;
use crate::support::vfs::Vfs;

impl<V: Vfs> Maildir<V> {
    /// Mark message `msgnum` deleted.
    ///
    /// This is purely an in-memory tombstone; the backing file stays on disk
    /// until `flush`. The message's size is removed from the working totals,
    /// but its number remains assigned and is never reused.
    pub fn delete(&mut self, msgnum: Msgnum) -> Result<Msgnum, Error> {
        self.require_ready()?;

        if !self.working.tombstone(msgnum) {
            return Err(Error::NxMessage);
        }

        debug!("{} marked message {} deleted", self.log_prefix, msgnum);
        Ok(msgnum)
    }

    /// Discard every pending deletion, restoring the working catalog to the
    /// exact state the scan produced.
    pub fn reset(&mut self) -> Result<(), Error> {
        self.require_ready()?;

        self.working = self.original.clone();
        debug!("{} reset", self.log_prefix);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;

    use super::super::test_prelude::*;
    use crate::model::{MessageCatalog, ScannedMessage};

    #[test]
    fn delete_then_fetch_is_nx() {
        let setup = set_up();
        setup.deliver_cur("a", b"body a");
        setup.deliver_cur("b", b"body b");

        let mut mailbox = setup.open();
        assert_eq!(Msgnum(0), mailbox.delete(Msgnum(0)).unwrap());
        assert_matches!(Err(Error::NxMessage), mailbox.fetch(Msgnum(0)));

        // The other message and the count are unaffected
        assert_eq!("body b", mailbox.fetch(Msgnum(1)).unwrap().content);
        assert_eq!(2, mailbox.count().unwrap());

        // The file itself stays on disk until flush
        assert!(setup.root.path().join("cur").join("a").is_file());
    }

    #[test]
    fn double_delete_subtracts_size_once() {
        let setup = set_up();
        setup.deliver_cur("a", b"0123456789");
        setup.deliver_cur("b", b"xyz");

        let mut mailbox = setup.open();
        assert_eq!(13, mailbox.working_catalog().unwrap().total_size());

        mailbox.delete(Msgnum(0)).unwrap();
        assert_eq!(3, mailbox.working_catalog().unwrap().total_size());

        assert_matches!(Err(Error::NxMessage), mailbox.delete(Msgnum(0)));
        assert_eq!(3, mailbox.working_catalog().unwrap().total_size());
    }

    #[test]
    fn delete_out_of_range_is_nx() {
        let setup = set_up();
        setup.deliver_cur("a", b"x");

        let mut mailbox = setup.open();
        assert_matches!(Err(Error::NxMessage), mailbox.delete(Msgnum(1)));
        assert_matches!(
            Err(Error::NxMessage),
            mailbox.delete(Msgnum(u32::max_value()))
        );
    }

    #[test]
    fn reset_restores_scanned_state() {
        let setup = set_up();
        setup.deliver_cur("a", b"body a");
        setup.deliver_cur("b", b"body b");

        let mut mailbox = setup.open();
        mailbox.delete(Msgnum(0)).unwrap();
        mailbox.delete(Msgnum(1)).unwrap();
        assert_eq!(0, mailbox.working_catalog().unwrap().total_size());

        mailbox.reset().unwrap();
        assert_eq!(
            mailbox.original_catalog().unwrap(),
            mailbox.working_catalog().unwrap()
        );
        assert_eq!("body a", mailbox.fetch(Msgnum(0)).unwrap().content);

        // Resetting a pristine mailbox changes nothing
        mailbox.reset().unwrap();
        assert_eq!(
            mailbox.original_catalog().unwrap(),
            mailbox.working_catalog().unwrap()
        );
    }

    #[test]
    fn delete_after_reset_works_again() {
        let setup = set_up();
        setup.deliver_cur("a", b"body");

        let mut mailbox = setup.open();
        mailbox.delete(Msgnum(0)).unwrap();
        mailbox.reset().unwrap();
        assert_eq!(Msgnum(0), mailbox.delete(Msgnum(0)).unwrap());
    }

    fn synthetic_catalog(count: u32) -> MessageCatalog {
        use chrono::prelude::*;

        MessageCatalog::from_scan(
            (0..count)
                .map(|n| ScannedMessage {
                    path: format!("/mail/cur/{}", n).into(),
                    size: (n as u64 + 1) * 100,
                    ctime: Utc
                        .timestamp_opt(n as i64, 0)
                        .single()
                        .unwrap(),
                })
                .collect(),
        )
    }

    proptest! {
        /// However deletions are interleaved and repeated, the total size
        /// must equal the sum of the surviving messages' sizes.
        #[test]
        fn bookkeeping_stays_consistent(
            deletions in prop::collection::vec(0u32..24, 0..48)
        ) {
            let mut catalog = synthetic_catalog(20);
            let original = catalog.clone();

            for n in deletions {
                catalog.tombstone(Msgnum(n));
            }

            let surviving: u64 = catalog
                .msgnums()
                .filter_map(|n| catalog.size_of(n))
                .sum();
            prop_assert_eq!(surviving, catalog.total_size());
            prop_assert_eq!(original.count(), catalog.count());

            for n in catalog.msgnums() {
                prop_assert_eq!(
                    catalog.is_deleted(n),
                    catalog.size_of(n).is_none()
                );
                // Paths always survive deletion
                prop_assert_eq!(
                    original.filename_of(n),
                    catalog.filename_of(n)
                );
            }
        }
    }
}
