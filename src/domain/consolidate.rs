//! Region consolidation: proximity merging and duplicate removal.
//!
//! Two distinct reductions are applied to detector output. Merging by
//! proximity collapses clusters of nearby rectangles (a logo often splits
//! into several image/vector/text fragments) into one covering rect.
//! Duplicate-overlap removal drops candidates that re-detect a region an
//! earlier strategy already claimed. Both are deterministic for any input
//! order: sort keys resolve ties down to full rect coordinates.

use super::CandidateRegion;
use crate::geometry::Rect;

fn coordinate_key(r: &Rect) -> (f32, f32, f32, f32) {
    (r.y0, r.x0, r.x1, r.y1)
}

fn total_cmp_key(a: (f32, f32, f32, f32), b: (f32, f32, f32, f32)) -> std::cmp::Ordering {
    a.0.total_cmp(&b.0)
        .then(a.1.total_cmp(&b.1))
        .then(a.2.total_cmp(&b.2))
        .then(a.3.total_cmp(&b.3))
}

/// Merges near or overlapping rectangles into a minimal ordered cover.
///
/// Rects are visited in `(y0, x0)` order; each one absorbs every already
/// emitted rect it is [`near`](Rect::near) within `tolerance`, restarting
/// the scan after each union so transitive clusters collapse into a single
/// cover rect. The result is ordered by `(y0, x0)`, every input rect is
/// contained in exactly one output rect, and no two output rects are near
/// each other. Invalid and empty inputs are discarded.
pub fn merge_by_proximity(rects: &[Rect], tolerance: f32) -> Vec<Rect> {
    let mut sorted: Vec<Rect> = rects
        .iter()
        .filter(|r| r.is_valid() && !r.is_empty())
        .copied()
        .collect();
    sorted.sort_by(|a, b| total_cmp_key(coordinate_key(a), coordinate_key(b)));

    let mut merged: Vec<Rect> = Vec::new();
    for next in sorted {
        let mut current = next;
        while let Some(pos) = merged.iter().position(|m| m.near(&current, tolerance)) {
            current = current.union(&merged.remove(pos));
        }
        merged.push(current);
    }
    merged.sort_by(|a, b| total_cmp_key(coordinate_key(a), coordinate_key(b)));
    merged
}

/// Drops candidates that substantially re-cover an already kept region.
///
/// Candidates are visited in ascending area order (ties broken by rect
/// coordinates); one is kept only if its intersection with every kept
/// candidate stays at or below half the smaller of the two areas.
pub fn remove_duplicate_overlaps(candidates: Vec<CandidateRegion>) -> Vec<CandidateRegion> {
    if candidates.len() <= 1 {
        return candidates;
    }

    let mut ordered = candidates;
    ordered.sort_by(|a, b| {
        a.rect
            .area()
            .total_cmp(&b.rect.area())
            .then(total_cmp_key(coordinate_key(&a.rect), coordinate_key(&b.rect)))
    });

    let mut kept: Vec<CandidateRegion> = Vec::new();
    for candidate in ordered {
        let duplicate = kept.iter().any(|existing| {
            let overlap = candidate.rect.intersect(&existing.rect).area();
            let smaller = candidate.rect.area().min(existing.rect.area());
            smaller > 0.0 && overlap > smaller * 0.5
        });
        if !duplicate {
            kept.push(candidate);
        }
    }
    kept
}
