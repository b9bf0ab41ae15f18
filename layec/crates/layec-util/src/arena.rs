//! Append-only arena allocation.
//!
//! The arena backs everything whose lifetime is "the whole compilation":
//! interned identifier text, literal payloads, retained trivia lists, and
//! formatted diagnostic strings. There is no individual free; dropping the
//! arena releases everything at once.

use std::alloc::Layout;

use bumpalo::Bump;

/// Preferred block size for arena growth. Sources and their token text are
/// large enough in practice that small chunks just fragment.
const BLOCK_SIZE: usize = 8 * 1024 * 1024;

/// Alignment applied to raw allocations.
const RAW_ALIGN: usize = 16;

/// A bump-allocating arena.
///
/// Raw allocations are zero-filled and aligned to 16 bytes; text interning
/// copies the bytes and returns a view that lives as long as the arena.
///
/// # Examples
///
/// ```
/// use layec_util::Arena;
///
/// let arena = Arena::new();
/// let name = arena.intern_bytes(b"some_identifier");
/// assert_eq!(name, b"some_identifier");
/// ```
pub struct Arena {
    bump: Bump,
}

impl Arena {
    /// Creates an arena with one block of capacity pre-reserved.
    pub fn new() -> Self {
        Self {
            bump: Bump::with_capacity(BLOCK_SIZE),
        }
    }

    /// Allocates `size` zero-filled bytes aligned to 16 bytes.
    pub fn alloc_raw(&self, size: usize) -> &mut [u8] {
        let layout = Layout::from_size_align(size, RAW_ALIGN)
            .unwrap_or_else(|_| panic!("arena allocation of {size} bytes overflows a layout"));
        let ptr = self.bump.alloc_layout(layout);
        // alloc_layout hands back uninitialized memory; the arena contract
        // is that raw allocations are zeroed.
        unsafe {
            std::ptr::write_bytes(ptr.as_ptr(), 0, size);
            std::slice::from_raw_parts_mut(ptr.as_ptr(), size)
        }
    }

    /// Copies `bytes` into the arena and returns the arena-owned view.
    pub fn intern_bytes<'a>(&'a self, bytes: &[u8]) -> &'a [u8] {
        self.bump.alloc_slice_copy(bytes)
    }

    /// Copies `text` into the arena and returns the arena-owned view.
    pub fn intern_str<'a>(&'a self, text: &str) -> &'a str {
        self.bump.alloc_str(text)
    }

    /// Copies a slice of plain values into the arena.
    pub fn alloc_slice<'a, T: Copy>(&'a self, values: &[T]) -> &'a [T] {
        self.bump.alloc_slice_copy(values)
    }

    /// Returns the total number of bytes currently allocated from the
    /// underlying allocator, including unused block capacity.
    pub fn allocated_bytes(&self) -> usize {
        self.bump.allocated_bytes()
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Arena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arena")
            .field("allocated_bytes", &self.allocated_bytes())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alloc_raw_is_zeroed() {
        let arena = Arena::new();
        let block = arena.alloc_raw(256);
        assert_eq!(block.len(), 256);
        assert!(block.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_alloc_raw_is_aligned() {
        let arena = Arena::new();
        for size in [1, 7, 16, 33, 4096] {
            let block = arena.alloc_raw(size);
            assert_eq!(block.as_ptr() as usize % RAW_ALIGN, 0, "size {size}");
        }
    }

    #[test]
    fn test_alloc_raw_zero_sized() {
        let arena = Arena::new();
        let block = arena.alloc_raw(0);
        assert!(block.is_empty());
    }

    #[test]
    fn test_intern_bytes_copies() {
        let arena = Arena::new();
        let original = b"identifier".to_vec();
        let interned = arena.intern_bytes(&original);
        assert_eq!(interned, original.as_slice());
        assert_ne!(interned.as_ptr(), original.as_ptr());
    }

    #[test]
    fn test_intern_str() {
        let arena = Arena::new();
        let interned = arena.intern_str("hello");
        assert_eq!(interned, "hello");
    }

    #[test]
    fn test_alloc_slice() {
        let arena = Arena::new();
        let values = [1u32, 2, 3, 4];
        let copied = arena.alloc_slice(&values);
        assert_eq!(copied, &values);
    }

    #[test]
    fn test_many_allocations_survive() {
        let arena = Arena::new();
        let views: Vec<&[u8]> = (0..1000)
            .map(|i| arena.intern_bytes(format!("ident_{i}").as_bytes()))
            .collect();
        for (i, view) in views.iter().enumerate() {
            assert_eq!(*view, format!("ident_{i}").as_bytes());
        }
    }
}
