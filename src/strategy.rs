//! Pluggable equality and hashing.
//!
//! A map asks its key strategy for both halves (`hash_code` to pick a bucket,
//! `equals` to scan it) and asks its value strategy only for `equals`. The
//! two traits keep that split visible in the bounds.

use crate::error::KeyedMapError;
use crate::value::{HashCode, HashedValueType};
use core::fmt;
use std::rc::Rc;

/// Equality half of a strategy. Enough for comparing values.
pub trait Equivalence<T: ?Sized> {
    fn equals(&self, a: &T, b: &T) -> bool;

    /// Whether `other` is known to be the same strategy as `self`.
    ///
    /// Two maps are only comparable when their strategies agree, so
    /// [`KeyedMap::equals`](crate::KeyedMap::equals) reports `false` for maps
    /// whose strategies differ. Strategies that cannot tell (closures) are
    /// never the same as another instance.
    fn same_strategy(&self, _other: &Self) -> bool
    where
        Self: Sized,
    {
        false
    }
}

// Zero-sized values may share an address without being the same object.
fn same_object<S: ?Sized>(a: &S, b: &S) -> bool {
    core::mem::size_of_val(a) != 0
        && core::ptr::eq((a as *const S).cast::<()>(), (b as *const S).cast::<()>())
}

/// Full strategy: equality plus a hash code consistent with it.
///
/// Implementations must guarantee `equals(a, b)` implies
/// `hash_code(a) == hash_code(b)` whenever both hash codes exist.
pub trait EqualityStrategy<T: ?Sized>: Equivalence<T> {
    fn hash_code(&self, t: &T) -> Result<HashCode, KeyedMapError>;
}

/// Forwards to the value's own `PartialEq` and [`HashedValueType`].
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Delegating;

impl<T: ?Sized + PartialEq> Equivalence<T> for Delegating {
    #[inline]
    fn equals(&self, a: &T, b: &T) -> bool {
        a == b
    }

    fn same_strategy(&self, _other: &Self) -> bool {
        true
    }
}

impl<T: ?Sized + HashedValueType> EqualityStrategy<T> for Delegating {
    #[inline]
    fn hash_code(&self, t: &T) -> Result<HashCode, KeyedMapError> {
        t.hash_code().ok_or(KeyedMapError::IneligibleKey)
    }
}

/// Address identity. Two references are equal only if they point at the
/// same object. Has no hash code, so it can compare values but never key a
/// map.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Identity;

impl<T: ?Sized> Equivalence<T> for Identity {
    #[inline]
    fn equals(&self, a: &T, b: &T) -> bool {
        core::ptr::eq(a, b)
    }

    fn same_strategy(&self, _other: &Self) -> bool {
        true
    }
}

impl<T: ?Sized> EqualityStrategy<T> for Identity {
    fn hash_code(&self, _t: &T) -> Result<HashCode, KeyedMapError> {
        Err(KeyedMapError::Unsupported("hash_code of the identity strategy"))
    }
}

/// Strategy assembled from a hash closure and an equality closure.
///
/// ```
/// use keyed_map::{FnStrategy, KeyedMap};
///
/// let nocase = FnStrategy::new(
///     |s: &String| Some(s.to_ascii_lowercase().len() as i32),
///     |a: &String, b: &String| a.eq_ignore_ascii_case(b),
/// );
/// let mut m: KeyedMap<String, i32, _> = KeyedMap::with_key_strategy(nocase);
/// m.set("Hello".to_string(), 1).unwrap();
/// assert_eq!(m.get(&"HELLO".to_string()), Some(&1));
/// ```
#[derive(Copy, Clone)]
pub struct FnStrategy<H, E> {
    hash: H,
    eq: E,
}

impl<H, E> FnStrategy<H, E> {
    pub fn new(hash: H, eq: E) -> Self {
        Self { hash, eq }
    }
}

impl<H, E> fmt::Debug for FnStrategy<H, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnStrategy")
    }
}

impl<T: ?Sized, H, E> Equivalence<T> for FnStrategy<H, E>
where
    E: Fn(&T, &T) -> bool,
{
    #[inline]
    fn equals(&self, a: &T, b: &T) -> bool {
        (self.eq)(a, b)
    }
}

impl<T: ?Sized, H, E> EqualityStrategy<T> for FnStrategy<H, E>
where
    H: Fn(&T) -> Option<HashCode>,
    E: Fn(&T, &T) -> bool,
{
    #[inline]
    fn hash_code(&self, t: &T) -> Result<HashCode, KeyedMapError> {
        (self.hash)(t).ok_or(KeyedMapError::IneligibleKey)
    }
}

// Forwarding impls. A shared or boxed strategy is the same as another only
// when both point at one object.

impl<T: ?Sized, S: ?Sized + Equivalence<T>> Equivalence<T> for &S {
    #[inline]
    fn equals(&self, a: &T, b: &T) -> bool {
        (**self).equals(a, b)
    }

    fn same_strategy(&self, other: &Self) -> bool {
        same_object(*self, *other)
    }
}

impl<T: ?Sized, S: ?Sized + EqualityStrategy<T>> EqualityStrategy<T> for &S {
    #[inline]
    fn hash_code(&self, t: &T) -> Result<HashCode, KeyedMapError> {
        (**self).hash_code(t)
    }
}

impl<T: ?Sized, S: ?Sized + Equivalence<T>> Equivalence<T> for Box<S> {
    #[inline]
    fn equals(&self, a: &T, b: &T) -> bool {
        (**self).equals(a, b)
    }

    fn same_strategy(&self, other: &Self) -> bool {
        same_object(&**self, &**other)
    }
}

impl<T: ?Sized, S: ?Sized + EqualityStrategy<T>> EqualityStrategy<T> for Box<S> {
    #[inline]
    fn hash_code(&self, t: &T) -> Result<HashCode, KeyedMapError> {
        (**self).hash_code(t)
    }
}

impl<T: ?Sized, S: ?Sized + Equivalence<T>> Equivalence<T> for Rc<S> {
    #[inline]
    fn equals(&self, a: &T, b: &T) -> bool {
        (**self).equals(a, b)
    }

    fn same_strategy(&self, other: &Self) -> bool {
        Rc::ptr_eq(self, other)
    }
}

impl<T: ?Sized, S: ?Sized + EqualityStrategy<T>> EqualityStrategy<T> for Rc<S> {
    #[inline]
    fn hash_code(&self, t: &T) -> Result<HashCode, KeyedMapError> {
        (**self).hash_code(t)
    }
}
