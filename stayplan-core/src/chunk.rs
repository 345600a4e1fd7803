//! Split long waypoint sequences into provider-sized requests and stitch the
//! answers back together.
//!
//! Routing services cap the number of coordinates accepted per request.
//! [`chunk`] cuts a sequence into overlapping windows so that every adjacent
//! pair of points lands in at least one window, and [`combine`] reverses the
//! operation on the returned legs by dropping the duplicated boundary point.

use thiserror::Error;

use crate::{Provenance, RouteLeg};

/// Errors raised by [`chunk`] and [`combine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ChunkError {
    /// Fewer than two points were supplied; there is nothing to route.
    #[error("at least two points are required, got {0}")]
    InsufficientPoints(usize),
    /// The chunk size cannot hold an overlap point plus a new point.
    #[error("chunk size must be at least 2, got {0}")]
    ChunkTooSmall(usize),
    /// No legs were supplied to [`combine`].
    #[error("cannot combine an empty set of legs")]
    Empty,
}

/// Split `items` into windows of at most `max_size` elements.
///
/// Consecutive windows share exactly one boundary element, so the stride is
/// `max_size - 1`. A sequence no longer than `max_size` yields one window.
///
/// # Errors
/// Returns [`ChunkError::InsufficientPoints`] for fewer than two items and
/// [`ChunkError::ChunkTooSmall`] when `max_size < 2`.
///
/// # Examples
/// ```
/// use stayplan_core::chunk;
///
/// let points: Vec<u32> = (0..45).collect();
/// let windows = chunk(&points, 20)?;
/// assert_eq!(windows.len(), 3);
/// assert_eq!(windows[0].last(), windows[1].first());
/// assert_eq!(windows[2].last(), Some(&44));
/// # Ok::<(), stayplan_core::ChunkError>(())
/// ```
pub fn chunk<T>(items: &[T], max_size: usize) -> Result<Vec<&[T]>, ChunkError> {
    if items.len() < 2 {
        return Err(ChunkError::InsufficientPoints(items.len()));
    }
    if max_size < 2 {
        return Err(ChunkError::ChunkTooSmall(max_size));
    }

    let mut windows = Vec::with_capacity(items.len().div_ceil(max_size - 1));
    let mut start = 0;
    loop {
        let end = (start + max_size).min(items.len());
        if let Some(window) = items.get(start..end) {
            windows.push(window);
        }
        if end == items.len() {
            break;
        }
        start = end - 1;
    }
    Ok(windows)
}

/// Concatenate per-window legs into one continuous leg.
///
/// The first leg contributes all of its coordinates; each later leg skips its
/// first coordinate, which duplicates the previous leg's last one. Distances
/// and durations are summed. The result is approximated when any part is.
///
/// # Errors
/// Returns [`ChunkError::Empty`] when `legs` is empty.
pub fn combine(legs: &[RouteLeg]) -> Result<RouteLeg, ChunkError> {
    let Some((first, rest)) = legs.split_first() else {
        return Err(ChunkError::Empty);
    };

    let capacity = legs.iter().map(|leg| leg.coordinates.len()).sum();
    let mut coordinates = Vec::with_capacity(capacity);
    coordinates.extend_from_slice(&first.coordinates);
    for leg in rest {
        coordinates.extend(leg.coordinates.iter().skip(1).copied());
    }

    let approximated = legs
        .iter()
        .any(|leg| leg.provenance == Provenance::Approximated);

    Ok(RouteLeg {
        coordinates,
        distance_m: legs.iter().map(|leg| leg.distance_m).sum(),
        duration_s: legs.iter().map(|leg| leg.duration_s).sum(),
        provenance: if approximated {
            Provenance::Approximated
        } else {
            Provenance::Routed
        },
        source: first.source,
    })
}
