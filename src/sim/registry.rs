//! Name-keyed equipment collections with cached, validated handles.
//!
//! Callers cache a [`CompIndex`] per equipment they simulate. The first call
//! resolves it by name. Later calls reuse the cached index, and the name is
//! compared against the stored record only the first time each index is used;
//! after that the index is trusted. A mismatch is a fatal calling-layer error.

use std::{
    fmt,
    marker::PhantomData,
    ops::{Index, IndexMut},
};

use super::{Diagnostics, SimError};

/// Equipment with a unique name.
pub trait Named {
    fn name(&self) -> &str;
}

/// Caller-side cache of an equipment index, displayed 1-based.
pub struct CompIndex<T> {
    raw: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> CompIndex<T> {
    /// A cache that has not been resolved yet.
    #[must_use]
    pub fn unset() -> Self {
        Self::from_raw(0)
    }

    /// A cache holding a 1-based index, as a caller would have stored it.
    #[must_use]
    pub fn from_raw(raw: usize) -> Self {
        Self {
            raw,
            _marker: PhantomData,
        }
    }

    #[must_use]
    pub fn is_set(&self) -> bool {
        self.raw != 0
    }
}

impl<T> Default for CompIndex<T> {
    fn default() -> Self {
        Self::unset()
    }
}

impl<T> Clone for CompIndex<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for CompIndex<T> {}

impl<T> fmt::Debug for CompIndex<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CompIndex({})", self.raw)
    }
}

/// A validated reference to an equipment record in a [`Registry`].
pub struct Handle<T> {
    index: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    /// 1-based position of the record.
    #[must_use]
    pub fn number(&self) -> usize {
        self.index + 1
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T> Eq for Handle<T> {}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({})", self.number())
    }
}

/// Equipment records of one kind.
#[derive(Debug, Clone)]
pub struct Registry<T> {
    items: Vec<T>,
    check_name: Vec<bool>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            check_name: Vec::new(),
        }
    }
}

impl<T: Named> Registry<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a record and returns its handle.
    pub fn insert(&mut self, item: T) -> Handle<T> {
        self.items.push(item);
        self.check_name.push(true);
        Handle {
            index: self.items.len() - 1,
            _marker: PhantomData,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Looks a record up by name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<Handle<T>> {
        self.items
            .iter()
            .position(|item| item.name() == name)
            .map(|index| Handle {
                index,
                _marker: PhantomData,
            })
    }

    /// Resolves a caller's cached index into a handle.
    ///
    /// An unset cache is resolved by name and updated. A set cache is checked
    /// against the record count and, on the first use of that record, against
    /// the record's name.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Fatal`] if the name is unknown, the index is out of
    /// range, or the index refers to a record with a different name.
    pub fn resolve(
        &mut self,
        diagnostics: &mut Diagnostics,
        routine: &str,
        name: &str,
        comp_index: &mut CompIndex<T>,
    ) -> Result<Handle<T>, SimError> {
        if !comp_index.is_set() {
            let Some(handle) = self.find(name) else {
                return Err(diagnostics.fatal(format!("{routine}: Unit not found={name}")));
            };
            *comp_index = CompIndex::from_raw(handle.number());
            return Ok(handle);
        }

        let raw = comp_index.raw;
        if raw > self.items.len() {
            return Err(diagnostics.fatal(format!(
                "{routine}:  Invalid CompIndex passed={raw}, Number of Units={}, Entered Unit name={name}",
                self.items.len()
            )));
        }

        let index = raw - 1;
        if self.check_name[index] {
            let stored = self.items[index].name();
            if stored != name {
                return Err(diagnostics.fatal(format!(
                    "{routine}: Invalid CompIndex passed={raw}, Unit name={name}, stored Unit Name for that index={stored}"
                )));
            }
            self.check_name[index] = false;
        }

        Ok(Handle {
            index,
            _marker: PhantomData,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.iter_mut()
    }
}

impl<T> Index<Handle<T>> for Registry<T> {
    type Output = T;

    fn index(&self, handle: Handle<T>) -> &T {
        &self.items[handle.index]
    }
}

impl<T> IndexMut<Handle<T>> for Registry<T> {
    fn index_mut(&mut self, handle: Handle<T>) -> &mut T {
        &mut self.items[handle.index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Unit(&'static str);

    impl Named for Unit {
        fn name(&self) -> &str {
            self.0
        }
    }

    fn registry() -> Registry<Unit> {
        let mut registry = Registry::new();
        registry.insert(Unit("EAST BASEBOARD"));
        registry.insert(Unit("WEST BASEBOARD"));
        registry
    }

    #[test]
    fn unset_index_resolves_by_name() -> Result<(), SimError> {
        let mut registry = registry();
        let mut diagnostics = Diagnostics::new();
        let mut cached = CompIndex::unset();

        let handle = registry.resolve(&mut diagnostics, "SimBaseboard", "WEST BASEBOARD", &mut cached)?;

        assert_eq!(handle.number(), 2);
        assert!(cached.is_set());
        assert_eq!(registry[handle].name(), "WEST BASEBOARD");
        Ok(())
    }

    #[test]
    fn unknown_name_is_fatal() {
        let mut registry = registry();
        let mut diagnostics = Diagnostics::new();

        let result = registry.resolve(&mut diagnostics, "SimBaseboard", "NORTH", &mut CompIndex::unset());

        assert!(result.is_err());
        assert!(diagnostics.contains("SimBaseboard: Unit not found=NORTH"));
    }

    #[test]
    fn out_of_range_index_is_fatal() {
        let mut registry = registry();
        let mut diagnostics = Diagnostics::new();

        let result = registry.resolve(&mut diagnostics, "SimBaseboard", "EAST BASEBOARD", &mut CompIndex::from_raw(3));

        assert!(result.is_err());
        assert!(diagnostics.contains("Invalid CompIndex passed=3, Number of Units=2"));
    }

    #[test]
    fn name_is_checked_only_on_first_use() -> Result<(), SimError> {
        let mut registry = registry();
        let mut diagnostics = Diagnostics::new();
        let mut cached = CompIndex::from_raw(1);

        registry.resolve(&mut diagnostics, "SimBaseboard", "EAST BASEBOARD", &mut cached)?;

        // Trusted from now on, even with a different name.
        let handle = registry.resolve(&mut diagnostics, "SimBaseboard", "WRONG", &mut cached)?;
        assert_eq!(handle.number(), 1);
        Ok(())
    }

    #[test]
    fn mismatched_name_on_first_use_is_fatal() {
        let mut registry = registry();
        let mut diagnostics = Diagnostics::new();

        let result = registry.resolve(&mut diagnostics, "SimBaseboard", "WEST BASEBOARD", &mut CompIndex::from_raw(1));

        assert!(result.is_err());
        assert!(diagnostics.contains("stored Unit Name for that index=EAST BASEBOARD"));
    }
}
