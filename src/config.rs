use core::mem::size_of_val;

use alloc::{boxed::Box, vec::Vec};
use log::debug;

use crate::{
    Ironwood, TreeError,
    allocator::{Global, NodeAllocator},
    compare::{Comparator, NaturalOrder},
};

/// Callback run on a value right before its node is released.
pub type Destructor<T> = Box<dyn FnMut(&mut T)>;

/// Collects the callbacks a tree is created with.
///
/// ```
/// use ironwood::{Budget, Builder};
///
/// let mut tree = Builder::<String>::new()
///     .comparator(|a: &String, b: &String| a.len().cmp(&b.len()).then(a.cmp(b)))
///     .sizer(|s: &String| s.len() + 1)
///     .allocator(Budget::new(1 << 16))
///     .build()
///     .unwrap();
///
/// tree.insert(String::from("pear")).unwrap();
/// tree.insert(String::from("fig")).unwrap();
/// assert_eq!(tree.first().map(String::as_str), Some("fig"));
/// ```
pub struct Builder<T, C = NaturalOrder, A = Global> {
    comparator: C,
    allocator: A,
    sizer: fn(&T) -> usize,
    destructor: Option<Destructor<T>>,
    capacity: usize,
}

impl<T> Builder<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            comparator: NaturalOrder,
            allocator: Global,
            sizer: size_of_val::<T>,
            destructor: None,
            capacity: 0,
        }
    }
}

impl<T> Default for Builder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C, A> Builder<T, C, A> {
    /// Order used to place and find values.
    pub fn comparator<D: Comparator<T>>(self, comparator: D) -> Builder<T, D, A> {
        Builder {
            comparator,
            allocator: self.allocator,
            sizer: self.sizer,
            destructor: self.destructor,
            capacity: self.capacity,
        }
    }

    /// Memory policy consulted for the tree and each of its nodes.
    pub fn allocator<B: NodeAllocator>(self, allocator: B) -> Builder<T, C, B> {
        Builder {
            comparator: self.comparator,
            allocator,
            sizer: self.sizer,
            destructor: self.destructor,
            capacity: self.capacity,
        }
    }

    /// Bytes a value occupies inside its node. Defaults to `size_of_val`.
    #[must_use]
    pub fn sizer(mut self, sizer: fn(&T) -> usize) -> Self {
        self.sizer = sizer;
        self
    }

    #[must_use]
    pub fn destructor(mut self, destructor: impl FnMut(&mut T) + 'static) -> Self {
        self.destructor = Some(Box::new(destructor));
        self
    }

    /// Number of nodes the arena has room for before it needs to grow.
    #[must_use]
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn build(self) -> Result<Ironwood<T, C, A>, TreeError>
    where
        C: Comparator<T>,
        A: NodeAllocator,
    {
        let Builder {
            comparator,
            mut allocator,
            sizer,
            destructor,
            capacity,
        } = self;

        let mut storage = Vec::new();
        if storage.try_reserve(capacity.saturating_add(1)).is_err() {
            debug!("arena reservation of {capacity} nodes refused");
            return Err(TreeError::OutOfMemory);
        }

        if let Err(err) = allocator.allocate(Ironwood::<T, C, A>::HANDLE_FOOTPRINT) {
            debug!("allocator refused the tree handle");
            return Err(err.into());
        }

        Ok(Ironwood::with_parts(
            storage,
            comparator,
            allocator,
            sizer,
            destructor,
        ))
    }
}
