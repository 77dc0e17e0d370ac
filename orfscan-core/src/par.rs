/// Parallel mutable for-each: apply `$f` to each element of `$slice` in place.
///
/// Falls back to a plain sequential loop when the `parallel` feature is off;
/// callers must not depend on the visiting order.
macro_rules! par_for_each_mut {
    ($slice:expr, $f:expr) => {{
        #[cfg(feature = "parallel")]
        {
            use rayon::iter::{IntoParallelRefMutIterator, ParallelIterator};
            $slice.par_iter_mut().for_each($f);
        }
        #[cfg(not(feature = "parallel"))]
        {
            $slice.iter_mut().for_each($f);
        }
    }};
}
