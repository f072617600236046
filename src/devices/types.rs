//! Common types for per-kind lookups of grid components.

use std::fmt;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

/// A closed set of component kinds (sources, flexible units, storage devices).
///
/// `ALL` lists every variant in its canonical order; `index` is the variant's
/// position in that list.
pub trait Kind: Copy + Eq + fmt::Debug + 'static {
    /// Every variant, in canonical order.
    const ALL: &'static [Self];

    /// Position of this variant in [`Kind::ALL`].
    fn index(self) -> usize;

    /// Short lowercase identifier used in configuration and CSV headers.
    fn name(self) -> &'static str;
}

/// Fixed-size table holding one value per variant of `K`.
///
/// Replaces name-keyed maps: every kind always has an entry, and lookups are
/// plain array indexing.
///
/// # Examples
///
/// ```
/// use grid_sim::devices::{Source, SourceTable};
///
/// let mut generation = SourceTable::<f64>::default();
/// generation[Source::Pv] = 120.0;
/// generation[Source::Wind] = 30.0;
/// assert_eq!(generation.total(), 150.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Table<K: Kind, T, const N: usize> {
    values: [T; N],
    kind: PhantomData<K>,
}

impl<K: Kind, T, const N: usize> Table<K, T, N> {
    /// Builds a table by evaluating `f` for every variant of `K`.
    pub fn from_fn(mut f: impl FnMut(K) -> T) -> Self {
        debug_assert_eq!(K::ALL.len(), N);
        Self {
            values: std::array::from_fn(|i| f(K::ALL[i])),
            kind: PhantomData,
        }
    }

    /// Iterates over `(kind, value)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (K, &T)> {
        K::ALL.iter().copied().zip(self.values.iter())
    }

    /// Iterates over the values in canonical order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.values.iter()
    }

    /// Builds a new table by applying `f` to every entry.
    pub fn map<U>(&self, mut f: impl FnMut(K, &T) -> U) -> Table<K, U, N> {
        Table::from_fn(|k| f(k, &self[k]))
    }
}

impl<K: Kind, const N: usize> Table<K, f64, N> {
    /// Sum of all entries.
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }
}

impl<K: Kind, T: Default, const N: usize> Default for Table<K, T, N> {
    fn default() -> Self {
        Self::from_fn(|_| T::default())
    }
}

impl<K: Kind, T, const N: usize> Index<K> for Table<K, T, N> {
    type Output = T;

    fn index(&self, kind: K) -> &T {
        &self.values[kind.index()]
    }
}

impl<K: Kind, T, const N: usize> IndexMut<K> for Table<K, T, N> {
    fn index_mut(&mut self, kind: K) -> &mut T {
        &mut self.values[kind.index()]
    }
}
