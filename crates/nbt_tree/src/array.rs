//! Fixed-size numeric arrays backing the `ByteArray`, `IntArray` and
//! `LongArray` values.
//!
//! An [`Array`] is never altered once built. The element-level operations
//! ([`Array::inserted`], [`Array::removed`] and [`Array::replaced`]) return a
//! new array and leave the receiver untouched.
//!
//! ```
//! use nbt_tree::IntArray;
//!
//! let a = IntArray::from(vec![1, 2, 3]);
//! let b = a.inserted(1, 7).unwrap();
//!
//! assert_eq!(a.as_slice(), &[1, 2, 3]);
//! assert_eq!(b.as_slice(), &[1, 7, 2, 3]);
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

use crate::{Error, Result};

/// An immutable array of bytes.
pub type ByteArray = Array<i8>;
/// An immutable array of ints.
pub type IntArray = Array<i32>;
/// An immutable array of longs.
pub type LongArray = Array<i64>;

/// A cheaply cloneable, immutable array of fixed-width integers.
#[derive(Clone, PartialEq, Eq)]
pub struct Array<T> {
    data: Arc<[T]>,
}

impl<T> Array<T> {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Whether `self` and `other` share the same backing storage.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

impl<T: Copy> Array<T> {
    pub fn new() -> Self {
        Self {
            data: Arc::from(Vec::new()),
        }
    }

    pub fn get(&self, index: usize) -> Option<T> {
        self.data.get(index).copied()
    }

    /// Returns a new array with `value` inserted at `index`, shifting all
    /// elements after it to the right.
    ///
    /// Fails if `index > len`.
    pub fn inserted(&self, index: usize, value: T) -> Result<Self> {
        check_index(index, self.len() + 1, self.len())?;

        let mut data = Vec::with_capacity(self.len() + 1);
        data.extend_from_slice(&self.data[..index]);
        data.push(value);
        data.extend_from_slice(&self.data[index..]);

        Ok(data.into())
    }

    /// Returns a new array with the element at `index` removed.
    ///
    /// Fails if `index >= len`.
    pub fn removed(&self, index: usize) -> Result<Self> {
        check_index(index, self.len(), self.len())?;

        let mut data = Vec::with_capacity(self.len() - 1);
        data.extend_from_slice(&self.data[..index]);
        data.extend_from_slice(&self.data[index + 1..]);

        Ok(data.into())
    }

    /// Returns a new array with the element at `index` replaced by `value`.
    ///
    /// Fails if `index >= len`.
    pub fn replaced(&self, index: usize, value: T) -> Result<Self> {
        check_index(index, self.len(), self.len())?;

        let mut data = self.data.to_vec();
        data[index] = value;

        Ok(data.into())
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.data.to_vec()
    }
}

fn check_index(index: usize, bound: usize, len: usize) -> Result<()> {
    if index < bound {
        Ok(())
    } else {
        Err(Error::IndexOutOfBounds { index, len })
    }
}

impl<T: Copy> Default for Array<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Deref for Array<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl<T: Hash> Hash for Array<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.data.hash(state);
    }
}

impl<T: fmt::Debug> fmt::Debug for Array<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.data.iter()).finish()
    }
}

impl<T> From<Vec<T>> for Array<T> {
    fn from(v: Vec<T>) -> Self {
        Self { data: v.into() }
    }
}

impl<T: Copy> From<&[T]> for Array<T> {
    fn from(v: &[T]) -> Self {
        Self { data: v.into() }
    }
}

impl<T, const N: usize> From<[T; N]> for Array<T> {
    fn from(v: [T; N]) -> Self {
        Self {
            data: Arc::from(Vec::from(v)),
        }
    }
}

impl<T> FromIterator<T> for Array<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            data: iter.into_iter().collect(),
        }
    }
}

impl<'a, T> IntoIterator for &'a Array<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

impl<T: PartialEq> PartialEq<[T]> for Array<T> {
    fn eq(&self, other: &[T]) -> bool {
        *self.data == *other
    }
}

impl<T: PartialEq> PartialEq<Vec<T>> for Array<T> {
    fn eq(&self, other: &Vec<T>) -> bool {
        *self.data == **other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_copies() {
        let a = IntArray::from(vec![10, 20, 30]);
        let b = a.inserted(1, 15).unwrap();

        assert_eq!(a.len(), 3);
        assert_eq!(a, vec![10, 20, 30]);
        assert_eq!(b.len(), 4);
        assert_eq!(b, vec![10, 15, 20, 30]);
        assert!(!a.ptr_eq(&b));
    }

    #[test]
    fn insert_at_len_appends() {
        let a = LongArray::from([1, 2]);
        assert_eq!(a.inserted(2, 3).unwrap(), vec![1, 2, 3]);
        assert_eq!(LongArray::new().inserted(0, 9).unwrap(), vec![9]);
    }

    #[test]
    fn insert_past_len_fails() {
        let a = ByteArray::from([1, 2, 3]);
        let err = a.inserted(4, 0).unwrap_err();

        assert!(matches!(
            err,
            Error::IndexOutOfBounds { index: 4, len: 3 }
        ));
        assert_eq!(a, vec![1, 2, 3]);
    }

    #[test]
    fn remove_and_replace() {
        let a = ByteArray::from([1, 2, 3]);

        assert_eq!(a.removed(0).unwrap(), vec![2, 3]);
        assert_eq!(a.removed(2).unwrap(), vec![1, 2]);
        assert_eq!(a.replaced(1, -5).unwrap(), vec![1, -5, 3]);
        assert_eq!(a, vec![1, 2, 3]);

        assert!(matches!(
            a.removed(3),
            Err(Error::IndexOutOfBounds { index: 3, len: 3 })
        ));
        assert!(matches!(
            a.replaced(3, 0),
            Err(Error::IndexOutOfBounds { index: 3, len: 3 })
        ));
        assert!(ByteArray::new().removed(0).is_err());
    }

    #[test]
    fn clones_share_storage() {
        let a = IntArray::from(vec![1, 2, 3]);
        let b = a.clone();

        assert!(a.ptr_eq(&b));
        assert_eq!(a, b);
    }
}
