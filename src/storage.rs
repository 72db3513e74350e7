//! Inline-first element storage backing [`Collection`](crate::Collection).
//!
//! Up to `N` elements are kept in a `heapless::Vec` embedded in the collection itself.
//! The first insertion that would exceed `N` moves every element, in order, into a
//! `std::vec::Vec`. The move is one-way: a spilled storage stays on the heap even if it
//! later shrinks, which keeps indices and capacity stable across `shift`/`pop` cycles.

use core::mem;

/// Upper bound on the inline footprint of a single storage value.
pub const MAX_INLINE_BYTES: usize = 16 * 1024;

#[derive(Clone)]
pub(crate) enum Storage<T, const N: usize> {
    Inline(heapless::Vec<T, N>),
    Spilled(Vec<T>),
}

impl<T, const N: usize> Storage<T, N> {
    pub(crate) fn new() -> Self {
        const {
            assert!(
                mem::size_of::<heapless::Vec<T, N>>() <= MAX_INLINE_BYTES,
                "Collection inline storage is too large! Reduce N."
            );
        }
        Storage::Inline(heapless::Vec::new())
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        if capacity <= N {
            Self::new()
        } else {
            Storage::Spilled(Vec::with_capacity(capacity))
        }
    }

    pub(crate) fn from_vec(items: Vec<T>) -> Self {
        if items.len() <= N {
            let mut inline = Self::new();
            for item in items {
                inline.push(item);
            }
            inline
        } else {
            Storage::Spilled(items)
        }
    }

    #[inline]
    pub(crate) fn is_inline(&self) -> bool {
        matches!(self, Storage::Inline(_))
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub(crate) fn capacity(&self) -> usize {
        match self {
            Storage::Inline(_) => N,
            Storage::Spilled(heap) => heap.capacity(),
        }
    }

    #[inline]
    pub(crate) fn as_slice(&self) -> &[T] {
        match self {
            Storage::Inline(inline) => inline.as_slice(),
            Storage::Spilled(heap) => heap.as_slice(),
        }
    }

    #[inline]
    pub(crate) fn as_mut_slice(&mut self) -> &mut [T] {
        match self {
            Storage::Inline(inline) => inline.as_mut_slice(),
            Storage::Spilled(heap) => heap.as_mut_slice(),
        }
    }

    /// Makes room for `additional` more elements, spilling if the inline half is too small.
    pub(crate) fn reserve(&mut self, additional: usize) {
        if self.is_inline() && self.len() + additional > N {
            self.spill(additional);
        }
        if let Storage::Spilled(heap) = self {
            heap.reserve(additional);
        }
    }

    pub(crate) fn push(&mut self, item: T) {
        let item = match self {
            Storage::Inline(inline) => match inline.push(item) {
                Ok(()) => return,
                Err(item) => item,
            },
            Storage::Spilled(heap) => {
                heap.push(item);
                return;
            }
        };
        // Inline half is full.
        self.spill(1).push(item);
    }

    /// Inserts `item` at `index`. The caller guarantees `index <= len`.
    pub(crate) fn insert(&mut self, index: usize, item: T) {
        let item = match self {
            Storage::Inline(inline) => match inline.insert(index, item) {
                Ok(()) => return,
                Err(item) => item,
            },
            Storage::Spilled(heap) => {
                heap.insert(index, item);
                return;
            }
        };
        self.spill(1).insert(index, item);
    }

    /// Removes the element at `index`. The caller guarantees `index < len`.
    pub(crate) fn remove(&mut self, index: usize) -> T {
        match self {
            Storage::Inline(inline) => inline.remove(index),
            Storage::Spilled(heap) => heap.remove(index),
        }
    }

    pub(crate) fn pop(&mut self) -> Option<T> {
        match self {
            Storage::Inline(inline) => inline.pop(),
            Storage::Spilled(heap) => heap.pop(),
        }
    }

    pub(crate) fn clear(&mut self) {
        match self {
            Storage::Inline(inline) => inline.clear(),
            Storage::Spilled(heap) => heap.clear(),
        }
    }

    pub(crate) fn into_vec(self) -> Vec<T> {
        match self {
            Storage::Inline(inline) => inline.into_iter().collect(),
            Storage::Spilled(heap) => heap,
        }
    }

    /// Moves the inline elements to the heap and returns the heap vector.
    #[inline(never)]
    fn spill(&mut self, additional: usize) -> &mut Vec<T> {
        if let Storage::Inline(inline) = self {
            let len = inline.len();
            // Double the inline capacity to amortize the next few pushes.
            let mut heap = Vec::with_capacity((N * 2).max(len + additional));
            heap.extend(mem::replace(inline, heapless::Vec::new()));
            log::trace!(
                "collection storage spilled to heap: len={} inline_capacity={}",
                len,
                N
            );
            *self = Storage::Spilled(heap);
        }
        match self {
            Storage::Spilled(heap) => heap,
            Storage::Inline(_) => unreachable!("storage still inline after spill"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_push_spills_past_inline_capacity() {
        let mut storage: Storage<i32, 2> = Storage::new();
        storage.push(1);
        storage.push(2);
        assert!(storage.is_inline());

        storage.push(3);
        assert!(!storage.is_inline());
        assert_eq!(storage.as_slice(), &[1, 2, 3]);
        // N * 2 = 4
        assert!(storage.capacity() >= 4);
    }

    #[test]
    fn test_storage_insert_at_front_spills_in_order() {
        let mut storage: Storage<i32, 2> = Storage::new();
        storage.push(2);
        storage.push(3);
        storage.insert(0, 1);

        assert!(!storage.is_inline());
        assert_eq!(storage.as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn test_storage_remove_and_pop_both_sides() {
        let mut inline: Storage<i32, 4> = Storage::from_vec(vec![1, 2, 3]);
        assert!(inline.is_inline());
        assert_eq!(inline.remove(0), 1);
        assert_eq!(inline.pop(), Some(3));
        assert_eq!(inline.as_slice(), &[2]);

        let mut heap: Storage<i32, 1> = Storage::from_vec(vec![1, 2, 3]);
        assert!(!heap.is_inline());
        assert_eq!(heap.remove(0), 1);
        assert_eq!(heap.pop(), Some(3));
        assert_eq!(heap.pop(), Some(2));
        assert_eq!(heap.pop(), None);
        // Spill is one-way.
        assert!(!heap.is_inline());
    }

    #[test]
    fn test_storage_with_capacity_and_reserve() {
        let small: Storage<u8, 4> = Storage::with_capacity(3);
        assert!(small.is_inline());
        assert_eq!(small.capacity(), 4);

        let big: Storage<u8, 4> = Storage::with_capacity(10);
        assert!(!big.is_inline());
        assert!(big.capacity() >= 10);

        let mut reserved: Storage<u8, 4> = Storage::new();
        reserved.push(1);
        reserved.reserve(2);
        assert!(reserved.is_inline());
        reserved.reserve(8);
        assert!(!reserved.is_inline());
        assert_eq!(reserved.as_slice(), &[1]);
        assert!(reserved.capacity() >= 9);
    }

    #[test]
    fn test_storage_clear_and_into_vec() {
        let mut storage: Storage<String, 2> =
            Storage::from_vec(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(storage.clone().into_vec(), vec!["a", "b"]);

        storage.as_mut_slice()[0].push('!');
        assert_eq!(storage.as_slice()[0], "a!");

        storage.clear();
        assert_eq!(storage.len(), 0);
        assert!(storage.into_vec().is_empty());
    }

    #[test]
    fn test_storage_drop_behavior() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let counter = Rc::new(RefCell::new(0));

        struct Dropper(Rc<RefCell<i32>>);
        impl Drop for Dropper {
            fn drop(&mut self) {
                *self.0.borrow_mut() += 1;
            }
        }

        {
            let mut storage: Storage<Dropper, 2> = Storage::new();
            storage.push(Dropper(counter.clone()));
            storage.push(Dropper(counter.clone()));
        }
        assert_eq!(*counter.borrow(), 2);

        *counter.borrow_mut() = 0;

        {
            let mut storage: Storage<Dropper, 2> = Storage::new();
            storage.push(Dropper(counter.clone()));
            storage.push(Dropper(counter.clone()));
            storage.push(Dropper(counter.clone())); // Spill
        }
        assert_eq!(*counter.borrow(), 3);
    }
}
