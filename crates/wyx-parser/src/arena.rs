//! Per-file bump allocator.
//!
//! Every token, text slice and syntax node for one file lives in that
//! file's arena. The whole parse product frees in one `reset`, which keeps
//! the largest chunk around for the next parse of the same file.
//!
//! During a parse exactly one thread writes the arena; cross-thread
//! allocation after a parse goes through a separate side arena owned by
//! the file record, never through this one.

use bumpalo::Bump;

pub struct Arena {
    bump: Bump,
}

impl Arena {
    pub fn new() -> Self {
        Self { bump: Bump::new() }
    }

    /// Pre-sized arena; a good starting capacity is the source length
    /// times a small constant.
    pub fn with_capacity(capacity: usize) -> Self {
        Self { bump: Bump::with_capacity(capacity) }
    }

    #[inline]
    pub fn alloc<T>(&self, val: T) -> &T {
        self.bump.alloc(val)
    }

    #[inline]
    pub fn alloc_mut<T>(&self, val: T) -> &mut T {
        self.bump.alloc(val)
    }

    #[inline]
    pub fn alloc_slice<T: Copy>(&self, slice: &[T]) -> &[T] {
        self.bump.alloc_slice_copy(slice)
    }

    #[inline]
    pub fn alloc_str(&self, s: &str) -> &str {
        self.bump.alloc_str(s)
    }

    /// A growable vec backed by this arena. Shrink to a slice with
    /// `into_bump_slice` once the length is final.
    #[inline]
    pub fn vec<T>(&self) -> bumpalo::collections::Vec<'_, T> {
        bumpalo::collections::Vec::new_in(&self.bump)
    }

    #[inline]
    pub fn vec_with_capacity<T>(&self, capacity: usize) -> bumpalo::collections::Vec<'_, T> {
        bumpalo::collections::Vec::with_capacity_in(capacity, &self.bump)
    }

    #[inline]
    pub fn bump(&self) -> &Bump {
        &self.bump
    }

    /// Bulk clear. Requires exclusive access, so no allocation handed out
    /// earlier can survive this call.
    pub fn reset(&mut self) {
        self.bump.reset();
    }

    pub fn allocated_bytes(&self) -> usize {
        self.bump.allocated_bytes()
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

/// A vec allocated in an arena.
pub type Vec<'a, T> = bumpalo::collections::Vec<'a, T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_reclaims_memory() {
        let mut arena = Arena::new();
        for i in 0..1024 {
            arena.alloc(i as u64);
        }
        assert!(arena.allocated_bytes() >= 1024 * 8);
        arena.reset();
        let before = arena.allocated_bytes();
        assert_eq!(before, 0);
    }

    #[test]
    fn vec_shrinks_to_slice() {
        let arena = Arena::new();
        let mut v = arena.vec::<u32>();
        v.extend([1, 2, 3]);
        let slice = v.into_bump_slice();
        assert_eq!(slice, &[1, 2, 3]);
    }
}
