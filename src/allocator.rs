use core::fmt;

/// The allocator refused a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocError;

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("memory allocation failed")
    }
}

impl core::error::Error for AllocError {}

/// Memory policy consulted for every node the tree creates.
///
/// A node costs its header plus the size reported by the tree's sizer for the
/// stored value. `deallocate` is called with the exact amount a previous
/// successful `allocate` claimed, once the node has been unlinked and its
/// value destroyed.
pub trait NodeAllocator {
    fn allocate(&mut self, bytes: usize) -> Result<(), AllocError>;

    fn deallocate(&mut self, bytes: usize);
}

/// Defers to the global allocator and never refuses a node.
#[derive(Debug, Default, Clone, Copy)]
pub struct Global;

impl NodeAllocator for Global {
    fn allocate(&mut self, _bytes: usize) -> Result<(), AllocError> {
        Ok(())
    }

    fn deallocate(&mut self, _bytes: usize) {}
}

/// Caps the memory held by a tree at a fixed number of bytes.
#[derive(Debug, Clone)]
pub struct Budget {
    limit: usize,
    used: usize,
}

impl Budget {
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self { limit, used: 0 }
    }

    #[must_use]
    pub fn used(&self) -> usize {
        self.used
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.limit - self.used
    }
}

impl NodeAllocator for Budget {
    fn allocate(&mut self, bytes: usize) -> Result<(), AllocError> {
        if bytes > self.remaining() {
            return Err(AllocError);
        }

        self.used += bytes;
        Ok(())
    }

    fn deallocate(&mut self, bytes: usize) {
        debug_assert!(bytes <= self.used);
        self.used = self.used.saturating_sub(bytes);
    }
}

impl<A: NodeAllocator + ?Sized> NodeAllocator for &mut A {
    fn allocate(&mut self, bytes: usize) -> Result<(), AllocError> {
        (**self).allocate(bytes)
    }

    fn deallocate(&mut self, bytes: usize) {
        (**self).deallocate(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    pub fn budget_refuses_past_limit() {
        let mut budget = Budget::new(100);

        assert_eq!(budget.allocate(60), Ok(()));
        assert_eq!(budget.allocate(50), Err(AllocError));
        assert_eq!(budget.used(), 60);

        budget.deallocate(60);
        assert_eq!(budget.allocate(100), Ok(()));
        assert_eq!(budget.remaining(), 0);
    }
}
