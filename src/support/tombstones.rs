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
use std::iter;

/// A set of deleted message numbers, memory-optimised for the common case of
/// a mailbox with fewer than 64 messages.
///
/// The first 64 bits are kept in an inline `u64`; larger mailboxes spill into
/// a boxed vector of additional words, so the inline overhead relative to the
/// bare `u64` is one pointer. Message numbers are dense and assigned from 0,
/// which makes a bitset strictly better than a hash set here.
#[derive(Clone, Default)]
pub struct TombstoneSet {
    near: u64,
    far: Option<Box<Vec<u64>>>,
}

impl fmt::Debug for TombstoneSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "TombstoneSet")?;
        f.debug_list().entries(self.iter()).finish()
    }
}

impl PartialEq for TombstoneSet {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl Eq for TombstoneSet {}

impl TombstoneSet {
    /// Initialise a new, empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `val` into the set.
    ///
    /// Returns true if the element was not already present.
    pub fn insert(&mut self, val: usize) -> bool {
        let (word, mask) = self.addr_mut(val);
        let ret = 0 == (*word & mask);
        *word |= mask;
        ret
    }

    /// Return whether `val` is currently in the set.
    pub fn contains(&self, val: usize) -> bool {
        if val < 64 {
            0 != (self.near & (1 << val))
        } else {
            let ix = val / 64 - 1;
            self.far
                .as_ref()
                .and_then(|far| far.get(ix))
                .map_or(false, |&word| 0 != (word & (1 << (val % 64))))
        }
    }

    /// Remove every element from the set.
    pub fn clear(&mut self) {
        self.near = 0;
        self.far = None;
    }

    /// Return the number of elements in the set.
    pub fn len(&self) -> usize {
        self.near.count_ones() as usize
            + self.far.as_ref().map_or(0, |far| {
                far.iter().map(|w| w.count_ones() as usize).sum::<usize>()
            })
    }

    pub fn is_empty(&self) -> bool {
        0 == self.len()
    }

    /// Iterate over the elements of the set in ascending order.
    pub fn iter<'a>(&'a self) -> impl Iterator<Item = usize> + 'a {
        let far: &[u64] =
            self.far.as_ref().map(|v| v.as_slice()).unwrap_or(&[]);
        iter::once(self.near)
            .chain(far.iter().copied())
            .enumerate()
            .flat_map(|(word_ix, word)| {
                (0..64)
                    .filter(move |&bit| 0 != (word & (1 << bit)))
                    .map(move |bit| word_ix * 64 + bit)
            })
    }

    fn addr_mut(&mut self, val: usize) -> (&mut u64, u64) {
        if val < 64 {
            (&mut self.near, 1 << val)
        } else {
            let ix = val / 64 - 1;
            let far = self.far.get_or_insert_with(|| Box::new(Vec::new()));
            if far.len() <= ix {
                far.resize(ix + 1, 0);
            }

            (&mut far[ix], 1 << (val % 64))
        }
    }
}
