//! # Fluent Collection
//!
//! An ordered, in-memory sequence container with a fluent set of combinators:
//! insertion and removal at both ends, bulk fill/merge, search, iteration, reduction,
//! filter/reject, map and field projection ("pluck").
//!
//! ## Key Features
//!
//! * **Inline Storage:** The first `N` elements (default [`DEFAULT_INLINE_CAPACITY`])
//!   live inside the collection. Growing past `N` spills them to the heap in order.
//! * **Chaining:** Mutators return `&mut Self`, so calls can be strung together.
//! * **Typed Combinators:** `map` and `reduce` take a second type parameter for their
//!   output, so results stay strongly typed.
//! * **Pluck by Name:** Any `Serialize` record can be projected by field name, with
//!   numeric fields widened to `i64`, `u64` or `f64`.
//! * **Explicit Failures:** Out-of-range access and failed projections return
//!   [`CollectionError`] instead of panicking, and leave the collection untouched.
//!
//! A `Collection` is a plain single-owner value. It has no internal locking; share it
//! across threads only behind your own synchronization.
//!
//! ## Examples
//!
//! ### Ends and Chaining
//!
//! ```rust
//! use fluent_collection::{collect, Collection};
//!
//! let mut queue: Collection<&str> = Collection::new();
//! queue.add("middle").add("last").prepend("first");
//!
//! assert_eq!(queue.shift(), Ok("first"));
//! assert_eq!(queue.pop(), Ok("last"));
//! assert_eq!(queue.count(), 1);
//!
//! let mut a = collect(["first", "second"]);
//! let b = collect(["third", "fourth", "fifth"]);
//! a.merge(&b);
//! assert_eq!(a.last(), Ok(&"fifth"));
//! assert_eq!(b.count(), 3);
//! ```
//!
//! ### Functional Combinators
//!
//! ```rust
//! use fluent_collection::{collect, Collection};
//!
//! let numbers = collect([1, 2, 3, 4, 5]);
//!
//! assert_eq!(numbers.reduce(|sum, n| sum + *n, 0), 15);
//! assert_eq!(numbers.filter(|n| n % 2 == 0), [2, 4]);
//! assert_eq!(numbers.reject(|n| n % 2 == 0), [1, 3, 5]);
//! assert_eq!(numbers.map(|n| n * 10).last(), Ok(&50));
//!
//! let reversed = numbers.reduce(
//!     |mut acc: Collection<i32>, n| {
//!         acc.prepend(*n);
//!         acc
//!     },
//!     Collection::new(),
//! );
//! assert_eq!(reversed, [5, 4, 3, 2, 1]);
//! ```
//!
//! ### Pluck
//!
//! ```rust
//! use fluent_collection::{collect, Plucked};
//! use serde::Serialize;
//!
//! #[derive(Serialize, PartialEq)]
//! struct User {
//!     id: i32,
//!     name: String,
//! }
//!
//! let users = collect([
//!     User { id: 1, name: "John".into() },
//!     User { id: 2, name: "Jane".into() },
//! ]);
//!
//! let ids = users.pluck("id").unwrap();
//! assert_eq!(ids, [Plucked::Int(1), Plucked::Int(2)]);
//! assert!(users.pluck("email").is_err());
//!
//! let names = users.pluck_with(|u| u.name.clone());
//! assert_eq!(names.first().map(String::as_str), Ok("John"));
//! ```

// --- Module Declarations ---

pub mod collection;
pub mod error;
pub mod pluck;
mod serialize;
mod storage;

// --- Re-exports ---

pub use collection::{Collection, DEFAULT_INLINE_CAPACITY, collect};
pub use error::{CollectionError, Result};
pub use pluck::Plucked;
pub use storage::MAX_INLINE_BYTES;
