//! Index rules for Catmull-Rom paths.
//!
//! Two separate questions live here: how an index wraps when looking up
//! tangent neighbours (`wrap_index`), and which segments a caller may address
//! (`segment_count`, `segment_shift`, `raw_segment_index`). A non-looped path
//! with three or more points spends its first and last point purely on
//! tangents, so public segment `0` starts at raw point `1`.

/// Wraps a signed index into `0..len`. Returns `0` for an empty sequence.
#[must_use]
#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
pub fn wrap_index(index: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    index.rem_euclid(len as isize) as usize
}

/// Number of drawable segments for `point_count` points.
#[must_use]
pub const fn segment_count(point_count: usize, looped: bool) -> usize {
    if point_count < 2 {
        0
    } else if looped {
        point_count
    } else if point_count < 4 {
        1
    } else {
        point_count - 3
    }
}

/// Offset from a public segment index to the raw index of its start point.
#[must_use]
pub const fn segment_shift(point_count: usize, looped: bool) -> usize {
    if point_count > 2 && !looped { 1 } else { 0 }
}

/// Maps a public segment to the raw index of its start point, or `None` if
/// the segment is not drawable.
#[must_use]
pub const fn raw_segment_index(segment: usize, point_count: usize, looped: bool) -> Option<usize> {
    if segment >= segment_count(point_count, looped) {
        return None;
    }
    Some(segment + segment_shift(point_count, looped))
}

/// Raw cache indices whose segments are drawable, in public segment order.
pub fn drawable_raw_indices(
    point_count: usize,
    looped: bool,
) -> impl Iterator<Item = usize> + Clone {
    let shift = segment_shift(point_count, looped);
    (0..segment_count(point_count, looped)).map(move |segment| segment + shift)
}

/// Raw indices `start..=end` wrapped into `0..len`, each visited once.
///
/// Used to find the cached segments whose four control points include a
/// mutated point.
#[must_use]
pub fn wrapped_window(start: isize, end: isize, len: usize) -> Vec<usize> {
    let mut out: Vec<usize> = Vec::new();
    if len == 0 {
        return out;
    }
    for raw in start..=end {
        let index = wrap_index(raw, len);
        if !out.contains(&index) {
            out.push(index);
        }
    }
    out
}
