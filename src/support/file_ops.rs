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

//! Miscellaneous functions for working with files.

use std::convert::TryFrom;
use std::io::{self, Read};

/// Read exactly `len` bytes from `src` into a new buffer, reading at most
/// `bufsize` bytes at a time.
///
/// `Interrupted` errors are ignored and retried. EOF before `len` bytes have
/// been read produces an `UnexpectedEof` error, since it means the file is
/// shorter than its recorded size.
pub fn read_prefix(
    src: &mut impl Read,
    len: u64,
    bufsize: usize,
) -> io::Result<Vec<u8>> {
    let len = usize::try_from(len).map_err(|_| {
        io::Error::new(io::ErrorKind::InvalidInput, "message too large")
    })?;

    let mut buf = vec![0u8; len];
    let mut off = 0;
    while off < len {
        let end = len.min(off + bufsize.max(1));
        match src.read(&mut buf[off..end]) {
            Ok(0) => {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "file is shorter than its recorded size",
                ))
            }
            Ok(n) => off += n,
            Err(e) if io::ErrorKind::Interrupted == e.kind() => continue,
            Err(e) => return Err(e),
        }
    }

    Ok(buf)
}

pub trait IgnoreKinds {
    /// Convert a `NotFound` error into a default success value.
    fn ignore_not_found(self) -> Self;
}

impl<R: Default> IgnoreKinds for Result<R, io::Error> {
    fn ignore_not_found(self) -> Self {
        match self {
            Ok(r) => Ok(r),
            Err(e) if io::ErrorKind::NotFound == e.kind() => Ok(R::default()),
            Err(e) => Err(e),
        }
    }
}
