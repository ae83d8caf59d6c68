//! Combining worker canvases.  Every worker plays its share of the
//! game into a private canvas; once they are all done, the canvases
//! are merged pairwise, weighting each pixel's average by its hit
//! count.  The merge is commutative and, up to floating point
//! rounding, associative, so the fold order does not bias the image.

use itertools::Itertools;

use crate::canvas::Canvas;
use crate::errors::RenderError;

/// Merge two same-shaped canvases.
pub fn merge(a: &Canvas, b: &Canvas) -> Result<Canvas, RenderError> {
    a.merge(b)
}

/// Fold any number of canvases into one, pairing neighbours in a
/// balanced tree rather than a left-leaning chain.  Returns None when
/// there is nothing to fold.
pub fn fold<I>(canvases: I) -> Option<Result<Canvas, RenderError>>
where
    I: IntoIterator<Item = Canvas>,
{
    canvases
        .into_iter()
        .map(Ok::<Canvas, RenderError>)
        .tree_fold1(|a, b| a.and_then(|a| b.and_then(|b| a.merge(&b))))
}
