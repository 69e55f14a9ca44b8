//! A hash-consing arena.
//!
//! [`Interner`] stores at most one copy of each value it is given and hands
//! out stable [`Id`] tags; equality of interned values is tag equality. Tags
//! are 1-based indices into the backing arena, so an interner survives a
//! serde round-trip by persisting the arena alone and rebuilding the lookup
//! table on deserialization.

use std::hash::{BuildHasher, Hash};
use std::marker::PhantomData;
use std::num::NonZeroU32;
use std::{any, fmt, ops};

use hashbrown::{Equivalent, HashTable};
use rustc_hash::FxBuildHasher;
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

pub struct Id<T> {
    pub(crate) id: NonZeroU32,
    phantom: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    pub const fn new(id: NonZeroU32) -> Self {
        Id { id, phantom: PhantomData }
    }

    /// The raw 1-based tag. Tags are assigned in interning order, so they
    /// define a stable total order on the values of one interner.
    pub const fn index(self) -> u32 {
        self.id.get()
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("Id<{}>({})", any::type_name::<T>(), self.id))
    }
}

impl<T> Copy for Id<T> {}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Id<T> {}

impl<T> PartialOrd for Id<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Id<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.id.cmp(&other.id)
    }
}

impl<T> Hash for Id<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.id.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let id = NonZeroU32::deserialize(deserializer)?;
        Ok(Id::new(id))
    }
}

#[derive(Debug)]
pub struct Interner<T> {
    inner: Vec<T>,
    table: HashTable<NonZeroU32>,
}

impl<T> Default for Interner<T> {
    fn default() -> Interner<T> {
        let inner = vec![];
        let table = HashTable::default();
        Interner { inner, table }
    }
}

impl<T: PartialEq> PartialEq for Interner<T> {
    fn eq(&self, other: &Interner<T>) -> bool {
        self.inner == other.inner
    }
}

impl<T: Eq> Eq for Interner<T> {}

impl<T: Eq + Hash> Interner<T> {
    pub fn intern(&mut self, value: T) -> Id<T> {
        let hash = FxBuildHasher.hash_one(&value);

        let existing =
            self.table.find(hash, |&id| arena_equivalent(&self.inner, id, &value)).copied();

        let id = existing.unwrap_or_else(|| {
            self.inner.push(value);
            let index = self.inner.len();
            // SAFETY: Vec::push ensures that the subsequent Vec::len
            // returns a non-zero value to be used as a 1-based index.
            let id = unsafe { NonZeroU32::new_unchecked(index as u32) };
            self.table.insert_unique(hash, id, |&id| arena_hasher(&self.inner, id));
            id
        });

        Id::new(id)
    }

    pub fn get<Q>(&self, value: &Q) -> Option<Id<T>>
    where
        Q: ?Sized + Hash + Equivalent<T>,
    {
        let hash = FxBuildHasher.hash_one(value);
        let id = self.table.find(hash, |&id| arena_equivalent(&self.inner, id, value))?;
        Some(Id::new(*id))
    }

    /// Rebuilds an interner from its arena, in arena order.
    ///
    /// Tags are reassigned 1..=len, so an arena written out by one interner
    /// reads back with identical tags.
    pub fn from_arena(inner: Vec<T>) -> Interner<T> {
        let mut table = HashTable::with_capacity(inner.len());
        for index in 1..=inner.len() {
            // SAFETY: the range starts at 1.
            let id = unsafe { NonZeroU32::new_unchecked(index as u32) };
            let hash = arena_hasher(&inner, id);
            table.insert_unique(hash, id, |&id| arena_hasher(&inner, id));
        }
        Interner { inner, table }
    }
}

impl<T> Interner<T> {
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Id<T>, &T)> {
        self.inner.iter().enumerate().map(|(index, value)| {
            // SAFETY: enumerate starts at 0 and we offset by 1.
            let id = unsafe { NonZeroU32::new_unchecked(index as u32 + 1) };
            (Id::new(id), value)
        })
    }
}

impl<T> ops::Index<Id<T>> for Interner<T> {
    type Output = T;

    fn index(&self, Id { id, .. }: Id<T>) -> &Self::Output {
        arena_index(&self.inner, id).unwrap_or_else(|| {
            unreachable!("invariant violated: {id} is not a valid index");
        })
    }
}

impl<T: Serialize> Serialize for Interner<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.inner.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Interner<T>
where
    T: Deserialize<'de> + Eq + Hash,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let inner = Vec::deserialize(deserializer)?;
        Ok(Interner::from_arena(inner))
    }
}

#[inline]
fn arena_index<T>(arena: &[T], id: NonZeroU32) -> Option<&T> {
    let index = id.get() as usize;
    arena.get(index - 1)
}

#[inline]
fn arena_hasher<T: Hash>(arena: &[T], id: NonZeroU32) -> u64 {
    let inner = arena_index(arena, id).unwrap_or_else(|| {
        unreachable!("invariant violated: {id} is not a valid index");
    });
    FxBuildHasher.hash_one(inner)
}

#[inline]
fn arena_equivalent<T, Q>(arena: &[T], id: NonZeroU32, value: &Q) -> bool
where
    T: Hash,
    Q: ?Sized + Hash + Equivalent<T>,
{
    let inner = arena_index(arena, id).unwrap_or_else(|| {
        unreachable!("invariant violated: {id} is not a valid index");
    });
    value.equivalent(inner)
}
