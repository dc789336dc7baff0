//! A hash map built on separate chaining, with cursors that present the
//! bucket chains as one flat sequence.

pub mod error;
pub mod hash;
pub mod hash_map;

pub use error::{Error, Result};
pub use hash::{DefaultHash, Hash};
pub use hash_map::cursor::{Const, ConstCursor, Cursor, Mut, MutCursor, Mutability};
pub use hash_map::entry::{Entry, OccupiedEntry, VacantEntry};
pub use hash_map::{HashMap, DEFAULT_BUCKET_COUNT};
