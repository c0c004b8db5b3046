//! Lazily computed factorization keyed on the right-hand side length

use crate::error::BandedError;

/// Factors together with the leading length `n` they were computed for
#[derive(Debug, Clone)]
pub struct FactorizationCache<F> {
    entry: Option<(usize, F)>,
    factorizations: usize,
}

impl<F> Default for FactorizationCache<F> {
    fn default() -> Self {
        Self {
            entry: None,
            factorizations: 0,
        }
    }
}

impl<F> FactorizationCache<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no factors exist for a right-hand side of leading length `n`
    pub fn needs_refactor(&self, n: usize) -> bool {
        match &self.entry {
            Some((cached_n, _)) => *cached_n != n,
            None => true,
        }
    }

    /// Length the current factors belong to
    pub fn cached_len(&self) -> Option<usize> {
        self.entry.as_ref().map(|(n, _)| *n)
    }

    /// Current factors, if any
    pub fn factors(&self) -> Option<&F> {
        self.entry.as_ref().map(|(_, f)| f)
    }

    /// Number of factorizations performed so far
    pub fn factorizations(&self) -> usize {
        self.factorizations
    }

    /// Return factors for `n`, running `factorize` first if they are stale.
    ///
    /// A failed factorization leaves the cache empty.
    pub fn get_or_factorize<E>(&mut self, n: usize, factorize: E) -> Result<&F, BandedError>
    where
        E: FnOnce() -> Result<F, BandedError>,
    {
        let entry = match self.entry.take() {
            Some(entry) if entry.0 == n => entry,
            _ => {
                let factors = factorize()?;
                self.factorizations += 1;
                (n, factors)
            }
        };
        Ok(&self.entry.insert(entry).1)
    }
}
