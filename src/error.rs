use core::fmt;

use crate::allocator::AllocError;

/// Errors reported by tree operations.
///
/// None of them leave the tree in a modified state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeError {
    /// The allocator refused the memory needed for a node or for the tree itself.
    OutOfMemory,
    /// A value comparing equal to the inserted one is already stored.
    AlreadyExists,
    /// No stored value compares equal to the key.
    NotFound,
    /// The node handle does not name a fresh, detached node.
    InvalidNode,
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            TreeError::OutOfMemory => "out of memory",
            TreeError::AlreadyExists => "value already exists",
            TreeError::NotFound => "value not found",
            TreeError::InvalidNode => "node is not a detached fresh node",
        };
        f.write_str(msg)
    }
}

impl core::error::Error for TreeError {}

impl From<AllocError> for TreeError {
    fn from(_: AllocError) -> Self {
        TreeError::OutOfMemory
    }
}

/// A rejected insertion. The value is handed back to the caller untouched.
pub struct InsertError<T> {
    error: TreeError,
    value: T,
}

impl<T> InsertError<T> {
    pub(crate) fn new(error: TreeError, value: T) -> Self {
        Self { error, value }
    }

    #[must_use]
    pub fn error(&self) -> TreeError {
        self.error
    }

    #[must_use]
    pub fn value(&self) -> &T {
        &self.value
    }

    #[must_use]
    pub fn into_value(self) -> T {
        self.value
    }
}

impl<T> fmt::Debug for InsertError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InsertError")
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl<T> fmt::Display for InsertError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "insertion failed: {}", self.error)
    }
}

impl<T> core::error::Error for InsertError<T> {}
