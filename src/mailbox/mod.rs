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

//! Support for working with a single maildir mailbox.
//!
//! A maildir stores one message per file and uses directory placement and a
//! filename suffix instead of locks or a database:
//!
//! - `new/` holds messages that have been delivered but not yet seen by any
//!   mail reader.
//!
//! - `cur/` holds messages a reader has taken responsibility for. When a
//!   message is moved out of `new/`, the suffix `:2,` (an empty flag list)
//!   is appended to its filename.
//!
//! Opening a mailbox scans the directory once: pending messages are
//! migrated from `new/` into `cur/`, then everything under `cur/` is
//! catalogued in ascending creation-time order and numbered from 0. The
//! scan produces two catalogs, one kept pristine and one that accumulates
//! deletions, which gives the POP3-style session model: `delete` only
//! tombstones in memory, `reset` restores the pristine state, and `flush`
//! makes the deletions real by unlinking files.
//!
//! Every operation returns a typed `Result` rather than emitting events;
//! callers that need notification plumbing can layer it on top.

mod defs;
mod delete; // DELE, RSET
mod fetch; // RETR
mod flush; // QUIT (UPDATE state)
mod scan;

pub use self::defs::{Maildir, MaildirConfig, ScanStatus};
