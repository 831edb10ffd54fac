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

use std::ffi::OsStr;
use std::io;

use log::{debug, error, info};

use super::defs::*;
use crate::model::{MessageCatalog, ScannedMessage};
use crate::support::error::Error;
use crate::support::vfs::Vfs;

impl<V: Vfs> Maildir<V> {
    /// Scan the mailbox directory and seed the message catalogs.
    ///
    /// Messages pending under `new/` are first moved into `cur/` with the
    /// `:2,` suffix prescribed by the maildir specification, then every
    /// regular file under `cur/` is catalogued in ascending order of
    /// creation time, with message numbers assigned from 0.
    ///
    /// A mailbox is scanned exactly once. Any filesystem error fails the
    /// scan and permanently poisons the instance; renames already committed
    /// are kept, so scanning a fresh instance of the same directory resumes
    /// the migration where it stopped.
    pub fn scan(&mut self) -> Result<(), Error> {
        match self.status {
            ScanStatus::Unscanned => (),
            ScanStatus::Ready => return Err(Error::AlreadyScanned),
            ScanStatus::Failed => return Err(Error::NotInitialized),
        }

        self.status = ScanStatus::Failed;
        let catalog = match self.run_scan() {
            Ok(catalog) => catalog,
            Err(e) => {
                error!("{} scan failed: {}", self.log_prefix, e);
                return Err(e);
            }
        };

        info!(
            "{} catalogued {} messages, {} bytes",
            self.log_prefix,
            catalog.count(),
            catalog.total_size()
        );
        self.original = catalog.clone();
        self.working = catalog;
        self.status = ScanStatus::Ready;
        Ok(())
    }

    fn run_scan(&self) -> Result<MessageCatalog, Error> {
        let (has_cur, has_new) =
            self.find_subdirs().map_err(Error::ScanFailed)?;
        if !has_cur && !has_new {
            return Err(Error::NotAMaildir);
        }

        if has_new {
            self.migrate_new().map_err(Error::ScanFailed)?;
        }

        let mut messages = self.list_cur().map_err(Error::ScanFailed)?;
        messages.sort_by(|a, b| {
            a.ctime.cmp(&b.ctime).then_with(|| a.path.cmp(&b.path))
        });

        Ok(MessageCatalog::from_scan(messages))
    }

    /// Determine whether `cur/` and `new/` exist directly under the root.
    fn find_subdirs(&self) -> io::Result<(bool, bool)> {
        let mut has_cur = false;
        let mut has_new = false;
        for name in self.vfs.list_dir(&self.root)? {
            let info = self.vfs.stat(&self.root.join(&name))?;
            if info.is_dir {
                if OsStr::new("cur") == name {
                    has_cur = true;
                } else if OsStr::new("new") == name {
                    has_new = true;
                }
            }
        }

        Ok((has_cur, has_new))
    }

    /// Move every regular file under `new/` into `cur/`, marking it seen as
    /// per the maildir spec at <http://cr.yp.to/proto/maildir.html>.
    fn migrate_new(&self) -> io::Result<()> {
        let newdir = self.root.join("new");
        let curdir = self.root.join("cur");
        for name in self.vfs.list_dir(&newdir)? {
            let src = newdir.join(&name);
            if !self.vfs.stat(&src)?.is_file {
                continue;
            }

            let mut newname = name;
            newname.push(":2,");
            let dst = curdir.join(&newname);
            debug!(
                "{} rename {} -> {}",
                self.log_prefix,
                src.display(),
                dst.display()
            );
            self.vfs.rename(&src, &dst)?;
        }

        Ok(())
    }

    fn list_cur(&self) -> io::Result<Vec<ScannedMessage>> {
        let curdir = self.root.join("cur");
        let mut messages = Vec::new();
        for name in self.vfs.list_dir(&curdir)? {
            let path = curdir.join(&name);
            let info = self.vfs.stat(&path)?;
            if info.is_file {
                messages.push(ScannedMessage {
                    path,
                    size: info.size,
                    ctime: info.ctime,
                });
            }
        }

        Ok(messages)
    }
}
