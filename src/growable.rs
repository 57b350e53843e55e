//! Growable array with an explicit doubling policy
//!
//! Capacity is tracked here rather than read back from `Vec`, because `Vec`
//! is free to over-allocate. Growth follows `max(1 + 2 * cap, needed)` and
//! every size computation is bounds-checked before it is performed.

use std::fmt;
use std::mem;

use crate::error::{fatal, FramebufferError, Result};

pub struct GrowableBuffer<T> {
    items: Vec<T>,
    cap: usize,
}

impl<T> GrowableBuffer<T> {
    /// Empty buffer, no allocation until the first push
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            cap: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.cap
    }

    /// Append a value. Allocation failure or size overflow terminates the process.
    #[track_caller]
    pub fn push(&mut self, value: T) {
        if let Err(err) = self.try_push(value) {
            fatal(&err);
        }
    }

    /// Append a value, reporting allocation failure or overflow instead of exiting
    pub fn try_push(&mut self, value: T) -> Result<()> {
        let needed = self
            .items
            .len()
            .checked_add(1)
            .ok_or(FramebufferError::ArithmeticOverflow {
                what: "growable buffer length",
            })?;
        if needed > self.cap {
            self.grow(needed)?;
        }
        self.items.push(value);
        Ok(())
    }

    fn grow(&mut self, needed: usize) -> Result<()> {
        // 1 + 2 * cap must fit in usize
        if self.cap > (usize::MAX - 1) / 2 {
            return Err(FramebufferError::ArithmeticOverflow {
                what: "growable buffer capacity",
            });
        }
        let new_cap = (1 + 2 * self.cap).max(needed);
        let new_bytes = checked_byte_size::<T>(new_cap)?;

        self.items
            .try_reserve_exact(new_cap - self.items.len())
            .map_err(|_| FramebufferError::ResourceExhausted {
                what: "growable buffer",
                bytes: new_bytes,
            })?;
        self.cap = new_cap;
        Ok(())
    }

    /// Release the allocation. Calling it again is a no-op.
    pub fn free(&mut self) {
        self.items = Vec::new();
        self.cap = 0;
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }
}

/// `count * size_of::<T>()` without wrapping; allocations are capped at `isize::MAX`
fn checked_byte_size<T>(count: usize) -> Result<usize> {
    let elem_size = mem::size_of::<T>().max(1);
    if count > isize::MAX as usize / elem_size {
        return Err(FramebufferError::ArithmeticOverflow {
            what: "growable buffer byte size",
        });
    }
    Ok(count * elem_size)
}

impl<T> Default for GrowableBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for GrowableBuffer<T> {
    fn clone(&self) -> Self {
        let mut items = Vec::with_capacity(self.cap);
        items.extend_from_slice(&self.items);
        Self {
            items,
            cap: self.cap,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for GrowableBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GrowableBuffer")
            .field("len", &self.items.len())
            .field("cap", &self.cap)
            .field("items", &self.items)
            .finish()
    }
}

impl<T> Extend<T> for GrowableBuffer<T> {
    #[track_caller]
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

impl<T> FromIterator<T> for GrowableBuffer<T> {
    #[track_caller]
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut buf = Self::new();
        buf.extend(iter);
        buf
    }
}

impl<'a, T> IntoIterator for &'a GrowableBuffer<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
