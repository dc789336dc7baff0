use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;

use duplicate::duplicate_item;

/// Defines a hash function which should have good anti-collision
/// properties. A hash map stores one instance of its hash function,
/// so implementations may carry state (a seed, a salt, ...)
pub trait Hash<T: ?Sized> {
    /// Hashes a key
    ///
    /// # Arguments
    ///
    /// `val`: The key to hash
    fn hash(&self, val: &T) -> usize;
}

/// Any function from a key reference to an integer is a hash function
impl<T: ?Sized, F: Fn(&T) -> usize> Hash<T> for F {
    fn hash(&self, val: &T) -> usize {
        self(val)
    }
}

/// The default hash struct implemented for basic types
pub struct DefaultHash<T: ?Sized> {
    _ignore_type: PhantomData<fn(&T)>,
}

impl<T: ?Sized> DefaultHash<T> {
    /// Creates the default hash function
    pub const fn new() -> Self {
        Self {
            _ignore_type: PhantomData,
        }
    }
}

impl<T: ?Sized> Clone for DefaultHash<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for DefaultHash<T> {}

impl<T: ?Sized> Default for DefaultHash<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> Debug for DefaultHash<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("DefaultHash")
    }
}

#[duplicate_item(
    int_type;
    [u8]; [i8]; [u16]; [i16]; [u32]; [i32]; [u64]; [i64];
    [usize]; [isize]; [bool]; [char]
)]
impl Hash<int_type> for DefaultHash<int_type> {
    fn hash(&self, val: &int_type) -> usize {
        *val as usize
    }
}

/// The FNV1 hash function
///
/// # Arguments
///
/// `str`: The string to hash
fn fnv1<S: AsRef<str>>(str: S) -> usize {
    let mut res: u32 = 2166136261;
    str.as_ref()
        .bytes()
        .for_each(|c| res = (res.wrapping_mul(16777619)) ^ (c as u32));
    res as usize
}

impl Hash<str> for DefaultHash<str> {
    fn hash(&self, val: &str) -> usize {
        fnv1(val)
    }
}

impl<'a> Hash<&'a str> for DefaultHash<&'a str> {
    fn hash(&self, val: &&'a str) -> usize {
        fnv1(val)
    }
}

impl Hash<String> for DefaultHash<String> {
    fn hash(&self, val: &String) -> usize {
        fnv1(val)
    }
}
