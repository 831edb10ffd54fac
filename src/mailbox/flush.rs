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

use std::path::Path;

use log::{debug, error, warn};

use super::defs::Maildir;
use crate::support::error::Error;
use crate::support::file_ops::IgnoreKinds;
use crate::support::vfs::Vfs;

impl<V: Vfs> Maildir<V> {
    /// Persist pending deletions by unlinking the file behind every
    /// tombstoned message number, in ascending order.
    ///
    /// The first unlink failure halts the pass; files after it stay on disk
    /// and every tombstone stays in memory, so retrying `flush` continues
    /// where the failed pass stopped. Files that are already gone are
    /// treated as successfully deleted, which makes such a retry (and a
    /// repeated flush generally) idempotent.
    ///
    /// `export` names an mbox-style destination for the surviving messages.
    /// It is accepted for compatibility with the historical API but not
    /// written to; single-file mailbox formats are out of scope, and only
    /// the deletion side effect is guaranteed.
    pub fn flush(&self, export: Option<&Path>) -> Result<(), Error> {
        self.require_ready()?;

        if let Some(export) = export {
            warn!(
                "{} export to {} requested; only deletions are applied",
                self.log_prefix,
                export.display()
            );
        }

        for msgnum in self.working.deleted_msgnums() {
            if let Some(path) = self.working.filename_of(msgnum) {
                debug!("{} unlink {}", self.log_prefix, path.display());
                if let Err(e) = self.vfs.unlink(path).ignore_not_found() {
                    error!(
                        "{} failed to unlink {}: {}",
                        self.log_prefix,
                        path.display(),
                        e
                    );
                    return Err(e.into());
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::cell::Cell;
    use std::ffi::OsString;
    use std::io;
    use std::path::{Path, PathBuf};
    use std::rc::Rc;

    use super::super::test_prelude::*;
    use crate::support::vfs::{EntryInfo, SysVfs, Vfs};

    #[test]
    fn flush_removes_exactly_tombstoned_files() {
        let setup = set_up();
        setup.deliver_cur("a", b"body a");
        setup.deliver_cur("b", b"body b");
        setup.deliver_cur("c", b"body c");

        let mut mailbox = setup.open();
        mailbox.delete(Msgnum(1)).unwrap();
        mailbox.flush(None).unwrap();

        let cur = setup.root.path().join("cur");
        assert!(cur.join("a").is_file());
        assert!(!cur.join("b").exists());
        assert!(cur.join("c").is_file());

        // Survivors remain fetchable afterwards
        assert_eq!("body a", mailbox.fetch(Msgnum(0)).unwrap().content);
        assert_eq!("body c", mailbox.fetch(Msgnum(2)).unwrap().content);
        // The tombstone stays in memory
        assert_matches!(Err(Error::NxMessage), mailbox.fetch(Msgnum(1)));
    }

    #[test]
    fn flush_without_deletions_touches_nothing() {
        let setup = set_up();
        setup.deliver_cur("a", b"body");

        let mailbox = setup.open();
        mailbox.flush(None).unwrap();
        assert!(setup.root.path().join("cur").join("a").is_file());
    }

    #[test]
    fn repeated_flush_is_idempotent() {
        let setup = set_up();
        setup.deliver_cur("a", b"body a");
        setup.deliver_cur("b", b"body b");

        let mut mailbox = setup.open();
        mailbox.delete(Msgnum(0)).unwrap();
        mailbox.flush(None).unwrap();
        // The file behind the tombstone is already gone; flushing again
        // must still succeed.
        mailbox.flush(None).unwrap();
        assert!(setup.root.path().join("cur").join("b").is_file());
    }

    #[test]
    fn export_target_is_accepted_but_not_written() {
        let setup = set_up();
        setup.deliver_cur("a", b"body");

        let mut mailbox = setup.open();
        mailbox.delete(Msgnum(0)).unwrap();
        let export = setup.root.path().join("outbox.mbox");
        mailbox.flush(Some(&export)).unwrap();
        assert!(!export.exists());
        assert!(!setup.root.path().join("cur").join("a").exists());
    }

    /// Delegates to the real filesystem, but fails unlinks of one path
    /// while the shared flag is set.
    struct FlakyUnlink {
        fail_path: PathBuf,
        failing: Rc<Cell<bool>>,
    }

    impl Vfs for FlakyUnlink {
        fn list_dir(&self, path: &Path) -> io::Result<Vec<OsString>> {
            SysVfs.list_dir(path)
        }

        fn stat(&self, path: &Path) -> io::Result<EntryInfo> {
            SysVfs.stat(path)
        }

        fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
            SysVfs.rename(from, to)
        }

        fn unlink(&self, path: &Path) -> io::Result<()> {
            if self.failing.get() && self.fail_path == path {
                Err(io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    "unlink refused",
                ))
            } else {
                SysVfs.unlink(path)
            }
        }

        fn open_read(
            &self,
            path: &Path,
            len: u64,
            bufsize: usize,
        ) -> io::Result<Vec<u8>> {
            SysVfs.open_read(path, len, bufsize)
        }
    }

    #[test]
    fn flush_halts_at_first_failure_and_can_be_retried() {
        let setup = set_up();
        setup.deliver_cur("a", b"body a");
        setup.deliver_cur("b", b"body b");
        setup.deliver_cur("c", b"body c");

        let cur = setup.root.path().join("cur");
        let failing = Rc::new(Cell::new(true));
        let vfs = FlakyUnlink {
            fail_path: cur.join("b"),
            failing: Rc::clone(&failing),
        };

        let mut mailbox = Maildir::with_vfs(
            setup.root.path(),
            MaildirConfig::default(),
            vfs,
        );
        mailbox.scan().unwrap();
        mailbox.delete(Msgnum(0)).unwrap();
        mailbox.delete(Msgnum(1)).unwrap();
        mailbox.delete(Msgnum(2)).unwrap();

        assert_matches!(Err(Error::Io(..)), mailbox.flush(None));
        // Ascending order: a was unlinked, the failure stopped before c
        assert!(!cur.join("a").exists());
        assert!(cur.join("b").is_file());
        assert!(cur.join("c").is_file());
        // Tombstones survive the failure
        assert_eq!(
            3,
            mailbox
                .working_catalog()
                .unwrap()
                .deleted_msgnums()
                .count()
        );

        failing.set(false);
        mailbox.flush(None).unwrap();
        assert!(!cur.join("b").exists());
        assert!(!cur.join("c").exists());
    }
}
