//! Abstraction layer for parallel iteration.
//!
//! With the `parallel` feature enabled this re-exports the Rayon traits used by the batch
//! runner. Without it, serial shims provide the same method names so call sites are written
//! once.

#[cfg(feature = "parallel")]
pub use rayon::prelude::{IntoParallelRefIterator, ParallelIterator};

#[cfg(not(feature = "parallel"))]
pub use self::fallback::*;

#[cfg(not(feature = "parallel"))]
mod fallback {
    pub use std::iter::Iterator as ParallelIterator;

    /// Shim trait to allow `par_iter()` on types that implement `IntoIterator` for `&T`.
    pub trait IntoParallelRefIterator<'data> {
        type Item;
        type Iter: Iterator<Item = Self::Item>;
        fn par_iter(&'data self) -> Self::Iter;
    }

    impl<'data, I: 'data + ?Sized> IntoParallelRefIterator<'data> for I
    where
        &'data I: IntoIterator,
    {
        type Item = <&'data I as IntoIterator>::Item;
        type Iter = <&'data I as IntoIterator>::IntoIter;
        fn par_iter(&'data self) -> Self::Iter {
            self.into_iter()
        }
    }
}
