//! A single key/value pair as stored in a bucket.

/// One stored pair. The key is fixed at insertion; only the value changes.
///
/// `Clone` duplicates the wrapper and clones key and value with their own
/// `Clone`, which shares the underlying object for `Rc`, `Arc` and `&T`.
#[derive(Clone, Debug)]
pub struct Entry<K, V> {
    key: K,
    value: V,
}

impl<K, V> Entry<K, V> {
    pub(crate) fn new(key: K, value: V) -> Self {
        Self { key, value }
    }

    #[inline]
    pub fn key(&self) -> &K {
        &self.key
    }

    #[inline]
    pub fn value(&self) -> &V {
        &self.value
    }

    #[inline]
    pub(crate) fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    /// Swap in a new value, keeping the stored key untouched.
    pub(crate) fn replace_value(&mut self, value: V) -> V {
        core::mem::replace(&mut self.value, value)
    }

    pub(crate) fn into_pair(self) -> (K, V) {
        (self.key, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::Entry;
    use std::rc::Rc;

    #[test]
    fn replace_keeps_key_identity() {
        let key = Rc::new("k".to_string());
        let mut e = Entry::new(Rc::clone(&key), 1);
        assert_eq!(e.replace_value(2), 1);
        assert_eq!(*e.value(), 2);
        assert!(Rc::ptr_eq(e.key(), &key));
    }

    #[test]
    fn clone_is_shallow_for_shared_pointers() {
        let e = Entry::new(Rc::new(1), Rc::new("v"));
        let c = e.clone();
        assert!(Rc::ptr_eq(e.key(), c.key()));
        assert!(Rc::ptr_eq(e.value(), c.value()));
        assert_eq!(c.into_pair(), (Rc::new(1), Rc::new("v")));
    }
}
