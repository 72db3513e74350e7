use core::slice;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Index;

use crate::error::{CollectionError, Result};
use crate::storage::Storage;

/// Number of elements a [`Collection`] keeps inline when no capacity is named.
pub const DEFAULT_INLINE_CAPACITY: usize = 8;

/// An ordered, zero-indexed sequence with a fluent set of combinators.
///
/// # Behavior
/// * **Inline Storage:** The first `N` elements live inside the collection itself.
/// * **Heap Spill:** Growing past `N` moves the elements to the heap, in order.
/// * **Chaining:** Mutators (`add`, `push`, `prepend`, `merge`, `append`, `fill`)
///   return `&mut Self`; shape-changing combinators (`filter`, `reject`, `map`,
///   `pluck`) return a new collection and leave the receiver alone.
///
/// Element capabilities are only required by the methods that use them: `index_of`
/// needs `PartialEq`, `filter` needs `Clone`, `pluck` needs `Serialize`, and so on.
///
/// ```rust
/// use fluent_collection::{collect, Collection};
///
/// let mut words = collect(["first", "middle", "last"]);
/// words.add("after").prepend("before");
///
/// assert_eq!(words.count(), 5);
/// assert_eq!(words.first(), Ok(&"before"));
/// assert_eq!(words.shift(), Ok("before"));
///
/// let lengths: Collection<usize> = words.map(|w| w.len());
/// assert_eq!(lengths.reduce(|sum, n| sum + *n, 0), 20);
/// ```
pub struct Collection<T, const N: usize = DEFAULT_INLINE_CAPACITY> {
    storage: Storage<T, N>,
}

/// Builds a [`Collection`] holding `items` in iteration order.
pub fn collect<T, I>(items: I) -> Collection<T>
where
    I: IntoIterator<Item = T>,
{
    Collection::collect(items)
}

impl<T> Collection<T> {
    /// Creates an empty collection with the default inline capacity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a collection holding `items` in iteration order.
    pub fn collect<I>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        items.into_iter().collect()
    }
}

impl<T, const N: usize> Collection<T, N> {
    /// Creates an empty collection that starts on the heap when `capacity > N`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: Storage::with_capacity(capacity),
        }
    }

    // --- Inspection ---

    /// Number of elements currently held.
    #[inline]
    pub fn count(&self) -> usize {
        self.storage.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    #[inline]
    pub fn is_not_empty(&self) -> bool {
        !self.is_empty()
    }

    /// Returns `true` while the elements are still stored inline.
    #[inline]
    pub fn is_inline(&self) -> bool {
        self.storage.is_inline()
    }

    pub fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    // --- Population ---

    /// Discards the current elements and holds `items` instead, in order.
    ///
    /// A spilled collection keeps its heap allocation.
    pub fn fill<I>(&mut self, items: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
    {
        self.storage.clear();
        self.extend(items);
        self
    }

    /// Inserts `item` at index 0, shifting every other element up by one.
    pub fn prepend(&mut self, item: T) -> &mut Self {
        self.storage.insert(0, item);
        self
    }

    /// Appends `item` at the tail.
    pub fn add(&mut self, item: T) -> &mut Self {
        self.storage.push(item);
        self
    }

    /// Alias of [`add`](Self::add).
    #[inline]
    pub fn push(&mut self, item: T) -> &mut Self {
        self.add(item)
    }

    /// Appends clones of every element of `other`, keeping their order.
    ///
    /// `other` is left untouched. `a.merge(&b)` and `b.merge(&a)` differ in order.
    pub fn merge<const M: usize>(&mut self, other: &Collection<T, M>) -> &mut Self
    where
        T: Clone,
    {
        self.storage.reserve(other.count());
        for item in other {
            self.storage.push(item.clone());
        }
        self
    }

    /// Like [`merge`](Self::merge), but moves the elements out of `other`.
    pub fn append<const M: usize>(&mut self, other: Collection<T, M>) -> &mut Self {
        self.extend(other);
        self
    }

    // --- End Operations ---

    pub fn first(&self) -> Result<&T> {
        self.as_slice().first().ok_or_else(CollectionError::empty)
    }

    pub fn last(&self) -> Result<&T> {
        self.as_slice().last().ok_or_else(CollectionError::empty)
    }

    /// Removes and returns the element at index 0.
    pub fn shift(&mut self) -> Result<T> {
        if self.is_empty() {
            return Err(CollectionError::empty());
        }
        Ok(self.storage.remove(0))
    }

    /// Removes and returns the element at index `count - 1`.
    pub fn pop(&mut self) -> Result<T> {
        self.storage.pop().ok_or_else(CollectionError::empty)
    }

    // --- Random Access & Search ---

    pub fn get(&self, index: usize) -> Result<&T> {
        self.as_slice()
            .get(index)
            .ok_or(CollectionError::OutOfBounds {
                index,
                count: self.count(),
            })
    }

    /// Index of the first element equal to `item`, or `-1` when there is none.
    ///
    /// Equality is whatever `T: PartialEq` says; for derived impls that is a deep,
    /// field-by-field comparison.
    pub fn index_of(&self, item: &T) -> isize
    where
        T: PartialEq,
    {
        self.position_of(item).map_or(-1, |index| index as isize)
    }

    /// [`index_of`](Self::index_of) with `None` in place of the `-1` sentinel.
    pub fn position_of(&self, item: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.iter().position(|candidate| candidate == item)
    }

    /// Returns `true` if any element satisfies `predicate`. Stops at the first match.
    pub fn contains<F>(&self, predicate: F) -> bool
    where
        F: FnMut(&T) -> bool,
    {
        self.iter().any(predicate)
    }

    /// Returns `true` if any element equals `item`.
    pub fn contains_item(&self, item: &T) -> bool
    where
        T: PartialEq,
    {
        self.as_slice().contains(item)
    }

    // --- Iteration & Reduction ---

    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Calls `action` on every element in ascending index order.
    pub fn for_each<F>(&self, action: F)
    where
        F: FnMut(&T),
    {
        self.iter().for_each(action);
    }

    /// Left fold: `combine(...combine(combine(initial, e0), e1)..., e_last)`.
    pub fn reduce<A, F>(&self, mut combine: F, initial: A) -> A
    where
        F: FnMut(A, &T) -> A,
    {
        self.iter().fold(initial, |acc, item| combine(acc, item))
    }

    /// New collection of the elements for which `predicate` holds, in original order.
    pub fn filter<F>(&self, mut predicate: F) -> Collection<T, N>
    where
        T: Clone,
        F: FnMut(&T) -> bool,
    {
        self.iter().filter(|item| predicate(item)).cloned().collect()
    }

    /// Complement of [`filter`](Self::filter) under the same predicate.
    pub fn reject<F>(&self, mut predicate: F) -> Collection<T, N>
    where
        T: Clone,
        F: FnMut(&T) -> bool,
    {
        self.filter(|item| !predicate(item))
    }

    /// New collection of `transform(e)` for every element, same order and length.
    pub fn map<U, F>(&self, transform: F) -> Collection<U, N>
    where
        F: FnMut(&T) -> U,
    {
        let mut mapped = Collection::with_capacity(self.count());
        mapped.extend(self.iter().map(transform));
        mapped
    }

    // --- Whole-View Accessors ---

    /// Snapshot of every element. Later mutations of the collection do not affect it.
    pub fn all(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.as_slice().to_vec()
    }

    /// Alias of [`all`](Self::all).
    #[inline]
    pub fn to_array(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.all()
    }

    /// Live, borrowed view of the elements.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self.storage.as_slice()
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.storage.as_mut_slice()
    }

    /// Consumes the collection and returns its elements as a `Vec`.
    pub fn into_vec(self) -> Vec<T> {
        self.storage.into_vec()
    }
}

// --- Trait Implementations ---

impl<T, const N: usize> Default for Collection<T, N> {
    fn default() -> Self {
        Self {
            storage: Storage::new(),
        }
    }
}

impl<T: Clone, const N: usize> Clone for Collection<T, N> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
        }
    }
}

impl<T: fmt::Debug, const N: usize> fmt::Debug for Collection<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T, const N: usize> Index<usize> for Collection<T, N> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.as_slice()[index]
    }
}

impl<T: PartialEq, const N: usize, const M: usize> PartialEq<Collection<T, M>>
    for Collection<T, N>
{
    fn eq(&self, other: &Collection<T, M>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq, const N: usize> Eq for Collection<T, N> {}

impl<T: PartialEq, const N: usize> PartialEq<[T]> for Collection<T, N> {
    fn eq(&self, other: &[T]) -> bool {
        self.as_slice() == other
    }
}

impl<T: PartialEq, const N: usize, const M: usize> PartialEq<[T; M]> for Collection<T, N> {
    fn eq(&self, other: &[T; M]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: PartialEq, const N: usize> PartialEq<Vec<T>> for Collection<T, N> {
    fn eq(&self, other: &Vec<T>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: PartialOrd, const N: usize> PartialOrd for Collection<T, N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.as_slice().partial_cmp(other.as_slice())
    }
}

impl<T: Ord, const N: usize> Ord for Collection<T, N> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

impl<T: Hash, const N: usize> Hash for Collection<T, N> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl<T, const N: usize> AsRef<[T]> for Collection<T, N> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, const N: usize> Extend<T> for Collection<T, N> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        self.storage.reserve(lower);
        for item in iter {
            self.storage.push(item);
        }
    }
}

impl<T, const N: usize> FromIterator<T> for Collection<T, N> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut collection = Collection::default();
        collection.extend(iter);
        collection
    }
}

impl<T, const N: usize> From<Vec<T>> for Collection<T, N> {
    fn from(items: Vec<T>) -> Self {
        Self {
            storage: Storage::from_vec(items),
        }
    }
}

impl<T, const N: usize, const M: usize> From<[T; M]> for Collection<T, N> {
    fn from(items: [T; M]) -> Self {
        items.into_iter().collect()
    }
}

impl<T, const N: usize> From<Collection<T, N>> for Vec<T> {
    fn from(collection: Collection<T, N>) -> Self {
        collection.into_vec()
    }
}

// --- Iterators ---

impl<T, const N: usize> IntoIterator for Collection<T, N> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_vec().into_iter()
    }
}

impl<'a, T, const N: usize> IntoIterator for &'a Collection<T, N> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// --- Test Suite ---
