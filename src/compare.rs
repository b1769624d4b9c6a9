use core::cmp::Ordering;

/// Total order used to place and look up values.
///
/// `candidate` is the value being inserted or searched for, `stored` the one
/// already in the tree. The order must stay the same for the lifetime of the
/// tree.
pub trait Comparator<T: ?Sized> {
    fn compare(&self, candidate: &T, stored: &T) -> Ordering;
}

/// Orders values with their [`Ord`] implementation.
#[derive(Debug, Default, Clone, Copy)]
pub struct NaturalOrder;

impl<T: Ord + ?Sized> Comparator<T> for NaturalOrder {
    #[inline]
    fn compare(&self, candidate: &T, stored: &T) -> Ordering {
        candidate.cmp(stored)
    }
}

impl<T: ?Sized, F> Comparator<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    #[inline]
    fn compare(&self, candidate: &T, stored: &T) -> Ordering {
        self(candidate, stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    pub fn closures_are_comparators() {
        let reverse = |a: &u32, b: &u32| b.cmp(a);

        assert_eq!(reverse.compare(&1, &2), Ordering::Greater);
        assert_eq!(NaturalOrder.compare(&1, &2), Ordering::Less);
        assert_eq!(NaturalOrder.compare("b", "b"), Ordering::Equal);
    }
}
