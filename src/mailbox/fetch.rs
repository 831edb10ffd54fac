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
use crate::model::{FetchedMessage, Msgnum};
use crate::support::error::Error;
use crate::support::vfs::Vfs;

impl<V: Vfs> Maildir<V> {
    /// Fetch the full content of message `msgnum`.
    ///
    /// The file is re-opened and re-read on every call; nothing is cached.
    /// Exactly the number of bytes recorded at scan time is read, starting
    /// at offset 0, and the result is decoded as UTF-8 with invalid
    /// sequences replaced rather than rejected.
    pub fn fetch(&self, msgnum: Msgnum) -> Result<FetchedMessage, Error> {
        self.require_ready()?;

        let size =
            self.working.size_of(msgnum).ok_or(Error::NxMessage)?;
        let path =
            self.working.filename_of(msgnum).ok_or(Error::NxMessage)?;

        debug!(
            "{} read {} ({} bytes)",
            self.log_prefix,
            path.display(),
            size
        );
        let data = self.vfs.open_read(path, size, self.config.bufsize)?;

        Ok(FetchedMessage {
            msgnum,
            content: String::from_utf8_lossy(&data).into_owned(),
        })
    }
}
