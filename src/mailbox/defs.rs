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

use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::model::MessageCatalog;
use crate::support::error::Error;
use crate::support::vfs::{SysVfs, Vfs};

/// Configuration accepted when a `Maildir` is constructed.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct MaildirConfig {
    /// Advisory buffer size for message reads.
    #[serde(default = "default_bufsize")]
    pub bufsize: usize,
    /// Staging directory for temporary files. Accepted for forward
    /// compatibility; nothing is currently written there.
    #[serde(default = "default_tmppath")]
    pub tmppath: PathBuf,
    /// Log filesystem traffic at debug level.
    #[serde(default)]
    pub debug: bool,
}

impl Default for MaildirConfig {
    fn default() -> Self {
        MaildirConfig {
            bufsize: default_bufsize(),
            tmppath: default_tmppath(),
            debug: false,
        }
    }
}

fn default_bufsize() -> usize {
    4096
}

fn default_tmppath() -> PathBuf {
    env::temp_dir()
}

/// Where a `Maildir` instance is in its lifecycle.
///
/// A mailbox is scanned exactly once. There is no transition out of
/// `Failed`; retrying requires a fresh instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanStatus {
    /// Constructed, but `scan` has not been called yet.
    Unscanned,
    /// `scan` completed; queries and mutations are accepted.
    Ready,
    /// `scan` failed; the instance is permanently unusable.
    Failed,
}

/// A single mailbox stored in maildir format.
///
/// Two message catalogs are kept: the one produced by the scan, which is
/// never touched again, and a working copy that accumulates deletions. All
/// queries and mutations operate on the working copy; `reset` throws the
/// working copy away and starts over from the scanned one.
pub struct Maildir<V = SysVfs> {
    pub(super) log_prefix: String,
    pub(super) root: PathBuf,
    pub(super) config: MaildirConfig,
    pub(super) vfs: V,
    pub(super) status: ScanStatus,
    /// The catalog produced by the scan. Never mutated afterwards.
    pub(super) original: MessageCatalog,
    /// The catalog deletions are applied to.
    pub(super) working: MessageCatalog,
}

impl Maildir {
    /// Bind a new, unscanned mailbox to `root`.
    pub fn new(root: impl Into<PathBuf>, config: MaildirConfig) -> Self {
        Self::with_vfs(root, config, SysVfs)
    }

    /// Bind a mailbox to `root` and scan it immediately.
    pub fn open(
        root: impl Into<PathBuf>,
        config: MaildirConfig,
    ) -> Result<Self, Error> {
        let mut this = Self::new(root, config);
        this.scan()?;
        Ok(this)
    }
}

impl<V: Vfs> Maildir<V> {
    /// Bind a new, unscanned mailbox to `root`, performing all filesystem
    /// access through `vfs`.
    pub fn with_vfs(
        root: impl Into<PathBuf>,
        config: MaildirConfig,
        vfs: V,
    ) -> Self {
        let root = root.into();
        let log_prefix = format!("maildir:{}", root.display());

        Maildir {
            log_prefix,
            root,
            config,
            vfs,
            status: ScanStatus::Unscanned,
            original: MessageCatalog::default(),
            working: MessageCatalog::default(),
        }
    }

    /// Return the mailbox root path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn status(&self) -> ScanStatus {
        self.status
    }

    /// Return the prefix used for log messages regarding this mailbox.
    pub fn log_prefix(&self) -> &str {
        &self.log_prefix
    }

    /// The number of messages the mailbox was scanned with, tombstoned ones
    /// included.
    pub fn count(&self) -> Result<usize, Error> {
        self.require_ready()?;
        Ok(self.working.count())
    }

    /// The catalog deletions have been applied to.
    pub fn working_catalog(&self) -> Result<&MessageCatalog, Error> {
        self.require_ready()?;
        Ok(&self.working)
    }

    /// The catalog as produced by the scan, unaffected by any deletion.
    pub fn original_catalog(&self) -> Result<&MessageCatalog, Error> {
        self.require_ready()?;
        Ok(&self.original)
    }

    pub(super) fn require_ready(&self) -> Result<(), Error> {
        if ScanStatus::Ready == self.status {
            Ok(())
        } else {
            Err(Error::NotInitialized)
        }
    }
}
