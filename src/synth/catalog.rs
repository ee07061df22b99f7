use std::ops::RangeInclusive;
use std::sync::Mutex;

use super::error::SynthesisError;

/// Catalog numbers reserved for objects that do not exist in any real catalog.
pub const DUMMY_CATALOG_RANGE: RangeInclusive<u32> = 90_000..=99_999;

/// Source of catalog numbers for synthesized element sets.
pub trait CatalogAllocator {
    fn allocate(&self) -> Result<u32, SynthesisError>;
}

/// Hands out the dummy range in ascending order until it is exhausted.
#[derive(Debug)]
pub struct CatalogPool {
    next: Mutex<u32>,
}

impl CatalogPool {
    pub fn new() -> Self {
        Self {
            next: Mutex::new(*DUMMY_CATALOG_RANGE.start()),
        }
    }

    pub fn starting_at(first: u32) -> Result<Self, SynthesisError> {
        if !DUMMY_CATALOG_RANGE.contains(&first) {
            return Err(SynthesisError::Range(format!(
                "catalog number {} outside {:?}",
                first, DUMMY_CATALOG_RANGE
            )));
        }
        Ok(Self {
            next: Mutex::new(first),
        })
    }
}

impl Default for CatalogPool {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogAllocator for CatalogPool {
    fn allocate(&self) -> Result<u32, SynthesisError> {
        let mut next = self
            .next
            .lock()
            .map_err(|_| SynthesisError::Range("catalog pool poisoned".into()))?;
        if *next > *DUMMY_CATALOG_RANGE.end() {
            return Err(SynthesisError::Range("dummy catalog range exhausted".into()));
        }
        let allocated = *next;
        *next += 1;
        Ok(allocated)
    }
}

/// Always returns the same number; for callers that already chose one.
#[derive(Debug, Clone, Copy)]
pub struct FixedCatalog(pub u32);

impl CatalogAllocator for FixedCatalog {
    fn allocate(&self) -> Result<u32, SynthesisError> {
        Ok(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_allocation() {
        let pool = CatalogPool::new();
        assert_eq!(pool.allocate().unwrap(), 90_000);
        assert_eq!(pool.allocate().unwrap(), 90_001);
    }

    #[test]
    fn test_exhaustion() {
        let pool = CatalogPool::starting_at(99_999).unwrap();
        assert_eq!(pool.allocate().unwrap(), 99_999);
        assert!(matches!(pool.allocate(), Err(SynthesisError::Range(_))));
    }

    #[test]
    fn test_start_outside_dummy_range() {
        assert!(CatalogPool::starting_at(25_544).is_err());
    }
}
