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

//! The narrow filesystem interface the mailbox core consumes.
//!
//! `Maildir` is generic over `Vfs` (defaulting to the real filesystem) so
//! that tests can interpose failures at any point of the scan or flush
//! pipelines without scratch-directory gymnastics.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::os::unix::fs::MetadataExt;
use std::path::Path;

use chrono::prelude::*;

use crate::support::file_ops;

/// Metadata for a single directory entry.
#[derive(Clone, Debug)]
pub struct EntryInfo {
    pub is_dir: bool,
    pub is_file: bool,
    /// Size in bytes. Only meaningful for regular files.
    pub size: u64,
    /// Creation time, as reported by `st_ctime`.
    pub ctime: DateTime<Utc>,
}

/// The filesystem operations the mailbox core performs.
pub trait Vfs {
    /// List the names of the entries directly under `path`.
    fn list_dir(&self, path: &Path) -> io::Result<Vec<OsString>>;
    /// Stat a single entry.
    fn stat(&self, path: &Path) -> io::Result<EntryInfo>;
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;
    fn unlink(&self, path: &Path) -> io::Result<()>;
    /// Open `path` and read exactly `len` bytes starting at offset 0, in
    /// chunks of at most `bufsize` bytes.
    fn open_read(
        &self,
        path: &Path,
        len: u64,
        bufsize: usize,
    ) -> io::Result<Vec<u8>>;
}

/// `Vfs` implementation backed by the real filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct SysVfs;

impl Vfs for SysVfs {
    fn list_dir(&self, path: &Path) -> io::Result<Vec<OsString>> {
        fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.file_name()))
            .collect()
    }

    fn stat(&self, path: &Path) -> io::Result<EntryInfo> {
        let md = fs::metadata(path)?;
        Ok(EntryInfo {
            is_dir: md.is_dir(),
            is_file: md.is_file(),
            size: md.len(),
            ctime: ctime_of(&md),
        })
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }

    fn unlink(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn open_read(
        &self,
        path: &Path,
        len: u64,
        bufsize: usize,
    ) -> io::Result<Vec<u8>> {
        let mut file = fs::File::open(path)?;
        file_ops::read_prefix(&mut file, len, bufsize)
    }
}

fn ctime_of(md: &fs::Metadata) -> DateTime<Utc> {
    // st_ctime from a real filesystem is always in chrono's representable
    // range, and st_ctime_nsec is always a valid nanosecond count.
    Utc.timestamp_opt(md.ctime(), md.ctime_nsec() as u32)
        .single()
        .expect("st_ctime out of range")
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn stat_regular_file() {
        let root = tempfile::TempDir::new().unwrap();
        let path = root.path().join("f");
        fs::write(&path, b"12345").unwrap();

        let info = SysVfs.stat(&path).unwrap();
        assert!(info.is_file);
        assert!(!info.is_dir);
        assert_eq!(5, info.size);
        assert!(info.ctime > Utc.timestamp_opt(0, 0).single().unwrap());

        let info = SysVfs.stat(root.path()).unwrap();
        assert!(info.is_dir);
        assert!(!info.is_file);
    }

    #[test]
    fn list_and_unlink() {
        let root = tempfile::TempDir::new().unwrap();
        fs::write(root.path().join("a"), b"").unwrap();
        fs::write(root.path().join("b"), b"").unwrap();

        let mut names = SysVfs.list_dir(root.path()).unwrap();
        names.sort();
        assert_eq!(vec![OsString::from("a"), OsString::from("b")], names);

        SysVfs.unlink(&root.path().join("a")).unwrap();
        assert_eq!(1, SysVfs.list_dir(root.path()).unwrap().len());
        assert!(SysVfs.unlink(&root.path().join("a")).is_err());
    }

    #[test]
    fn open_read_respects_recorded_length() {
        let root = tempfile::TempDir::new().unwrap();
        let path = root.path().join("f");
        fs::write(&path, b"hello world").unwrap();

        let buf = SysVfs.open_read(&path, 5, 2).unwrap();
        assert_eq!(b"hello", &buf[..]);
    }
}
