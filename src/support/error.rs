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

use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The target directory contains neither `cur/` nor `new/`.
    ///
    /// Fatal to the instance; open a fresh one with a corrected path.
    #[error("Cannot find cur/ and new/; are you sure this is a maildir?")]
    NotAMaildir,
    /// A filesystem operation failed somewhere in the scan pipeline.
    ///
    /// Fatal to the instance. Renames of pending messages that were already
    /// committed are kept; a retry in a fresh instance picks up where this
    /// one stopped.
    #[error("Maildir scan failed")]
    ScanFailed(#[source] io::Error),
    /// An operation was invoked before the scan completed, or after it
    /// failed.
    #[error("Maildir has not been fully scanned yet, or the scan failed")]
    NotInitialized,
    /// `scan` was called on an instance that already scanned successfully.
    #[error("Maildir was already scanned")]
    AlreadyScanned,
    /// The message number is out of range or the message was deleted.
    #[error("Message does not exist")]
    NxMessage,
    #[error(transparent)]
    Io(#[from] io::Error),
}
