//! Value capabilities consumed by the map.
//!
//! Equality of a value type is Rust's `PartialEq`. A value that can also act
//! as a key implements [`HashedValueType`], which adds a 32-bit hash code.
//! The std implementations follow the Java hash conventions so hash codes
//! computed elsewhere (for example from serialized Java objects) line up.

use std::rc::Rc;
use std::sync::Arc;

/// Hash code produced by values and strategies.
pub type HashCode = i32;

/// A value with content equality and a hash code consistent with it.
///
/// Contract: `a == b` implies `a.hash_code() == b.hash_code()`. The map does
/// not check this; breaking it makes lookups miss.
///
/// Returning `None` marks the value as ineligible for use as a key. Inserting
/// such a key into a map fails with `KeyedMapError::IneligibleKey`.
pub trait HashedValueType: PartialEq {
    fn hash_code(&self) -> Option<HashCode>;
}

macro_rules! small_int_hash {
    ($($t:ty),*) => {$(
        impl HashedValueType for $t {
            #[inline]
            fn hash_code(&self) -> Option<HashCode> {
                Some(*self as HashCode)
            }
        }
    )*};
}

macro_rules! wide_int_hash {
    ($($t:ty),*) => {$(
        impl HashedValueType for $t {
            #[inline]
            fn hash_code(&self) -> Option<HashCode> {
                Some(fold_u64(*self as u64))
            }
        }
    )*};
}

small_int_hash!(i8, i16, i32, u8, u16, u32);
wide_int_hash!(i64, u64, isize, usize);

#[inline]
fn fold_u64(bits: u64) -> HashCode {
    (bits ^ (bits >> 32)) as HashCode
}

impl HashedValueType for i128 {
    fn hash_code(&self) -> Option<HashCode> {
        (*self as u128).hash_code()
    }
}

impl HashedValueType for u128 {
    fn hash_code(&self) -> Option<HashCode> {
        Some(fold_u64((*self ^ (*self >> 64)) as u64))
    }
}

impl HashedValueType for bool {
    fn hash_code(&self) -> Option<HashCode> {
        Some(if *self { 1231 } else { 1237 })
    }
}

impl HashedValueType for char {
    fn hash_code(&self) -> Option<HashCode> {
        Some(*self as u32 as HashCode)
    }
}

// NaN never equals itself, so a NaN key could never be found again.
impl HashedValueType for f64 {
    fn hash_code(&self) -> Option<HashCode> {
        if self.is_nan() {
            None
        } else if *self == 0.0 {
            Some(0)
        } else {
            Some(fold_u64(self.to_bits()))
        }
    }
}

impl HashedValueType for f32 {
    fn hash_code(&self) -> Option<HashCode> {
        if self.is_nan() {
            None
        } else if *self == 0.0 {
            Some(0)
        } else {
            Some(self.to_bits() as HashCode)
        }
    }
}

/// `s[0]*31^(n-1) + ... + s[n-1]` over UTF-16 code units.
impl HashedValueType for str {
    fn hash_code(&self) -> Option<HashCode> {
        Some(
            self.encode_utf16()
                .fold(0 as HashCode, |h, unit| {
                    h.wrapping_mul(31).wrapping_add(unit as HashCode)
                }),
        )
    }
}

impl HashedValueType for String {
    #[inline]
    fn hash_code(&self) -> Option<HashCode> {
        self.as_str().hash_code()
    }
}

impl<T: HashedValueType> HashedValueType for Option<T> {
    fn hash_code(&self) -> Option<HashCode> {
        match self {
            Some(v) => v.hash_code(),
            None => Some(0),
        }
    }
}

impl<A: HashedValueType, B: HashedValueType> HashedValueType for (A, B) {
    fn hash_code(&self) -> Option<HashCode> {
        let h = 31i32.wrapping_add(self.0.hash_code()?);
        Some(h.wrapping_mul(31).wrapping_add(self.1.hash_code()?))
    }
}

impl<A: HashedValueType, B: HashedValueType, C: HashedValueType> HashedValueType for (A, B, C) {
    fn hash_code(&self) -> Option<HashCode> {
        let h = 31i32.wrapping_add(self.0.hash_code()?);
        let h = h.wrapping_mul(31).wrapping_add(self.1.hash_code()?);
        Some(h.wrapping_mul(31).wrapping_add(self.2.hash_code()?))
    }
}

impl<T: ?Sized + HashedValueType> HashedValueType for &T {
    #[inline]
    fn hash_code(&self) -> Option<HashCode> {
        (**self).hash_code()
    }
}

impl<T: ?Sized + HashedValueType> HashedValueType for Box<T> {
    #[inline]
    fn hash_code(&self) -> Option<HashCode> {
        (**self).hash_code()
    }
}

impl<T: ?Sized + HashedValueType> HashedValueType for Rc<T> {
    #[inline]
    fn hash_code(&self) -> Option<HashCode> {
        (**self).hash_code()
    }
}

impl<T: ?Sized + HashedValueType> HashedValueType for Arc<T> {
    #[inline]
    fn hash_code(&self) -> Option<HashCode> {
        (**self).hash_code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_hash_matches_java() {
        assert_eq!("".hash_code(), Some(0));
        assert_eq!("a".hash_code(), Some(97));
        assert_eq!("hello".hash_code(), Some(99_162_322));
        // Overflow wraps the same way Java's int arithmetic does.
        assert_eq!(
            "the quick brown fox".hash_code(),
            "the quick brown fox".to_string().hash_code()
        );
    }

    #[test]
    fn wide_integers_fold_high_bits() {
        assert_eq!(1i64.hash_code(), Some(1));
        assert_eq!((1i64 << 32).hash_code(), Some(1));
        assert_eq!((-1i64).hash_code(), Some(0));
        assert_eq!(7u128.hash_code(), 7u64.hash_code());
    }

    #[test]
    fn floats_respect_equality() {
        assert_eq!(0.0f64.hash_code(), (-0.0f64).hash_code());
        assert_eq!(1.5f64.hash_code(), 1.5f64.hash_code());
        assert_eq!(f64::NAN.hash_code(), None);
        assert_eq!(f32::NAN.hash_code(), None);
        assert_eq!(0.0f32.hash_code(), (-0.0f32).hash_code());
    }

    #[test]
    fn wrappers_forward_to_inner_value() {
        let s = "key".to_string();
        assert_eq!(Rc::new(s.clone()).hash_code(), s.hash_code());
        assert_eq!(Arc::new(s.clone()).hash_code(), s.hash_code());
        assert_eq!(Box::new(s.clone()).hash_code(), s.hash_code());
        assert_eq!((&s).hash_code(), s.hash_code());
        assert_eq!(Some(s.clone()).hash_code(), s.hash_code());
        assert_eq!(None::<String>.hash_code(), Some(0));
    }

    #[test]
    fn tuples_propagate_ineligible_members() {
        assert!((1, 2).hash_code().is_some());
        assert_ne!((1, 2).hash_code(), (2, 1).hash_code());
        assert_eq!((1, f64::NAN).hash_code(), None);
        assert_eq!(("a", 1, true).hash_code(), ("a", 1, true).hash_code());
    }

    #[test]
    fn booleans_and_chars() {
        assert_eq!(true.hash_code(), Some(1231));
        assert_eq!(false.hash_code(), Some(1237));
        assert_eq!('A'.hash_code(), Some(65));
    }
}
