use po_catalog::{Catalog, Entry};

use crate::error::{DiffError, Result};

/// How one entry of the comparison relates to the other catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignedPair<'a> {
    /// The key exists in both catalogs
    Matched { old: &'a Entry, new: &'a Entry },
    /// Only the new catalog has the key
    AddedInNew(&'a Entry),
    /// Only the old catalog has the key
    RemovedFromOld(&'a Entry),
}

/// Index of the first position where the catalogs' key sequences differ.
///
/// When one catalog is a prefix of the other, that is the length of the
/// shorter one.
pub fn first_base_difference(old: &Catalog, new: &Catalog) -> Option<usize> {
    old.iter()
        .zip(new.iter())
        .position(|(o, n)| o.key != n.key)
        .or_else(|| (old.len() != new.len()).then(|| old.len().min(new.len())))
}

/// True iff both catalogs list the same keys in the same order
pub fn has_common_base(old: &Catalog, new: &Catalog) -> bool {
    first_base_difference(old, new).is_none()
}

/// Pair entries by position.
///
/// Keys are not compared here; check [`has_common_base`] first.
pub fn align_strict<'a>(old: &'a Catalog, new: &'a Catalog) -> Result<Vec<AlignedPair<'a>>> {
    if old.len() != new.len() {
        return Err(DiffError::BaseMismatch {
            index: old.len().min(new.len()),
        });
    }

    Ok(old
        .iter()
        .zip(new.iter())
        .map(|(old, new)| AlignedPair::Matched { old, new })
        .collect())
}

/// Pair entries by key, in the new catalog's order.
///
/// With `include_old_only`, keys missing from the new catalog follow at the
/// end, in the old catalog's order. Duplicate keys resolve to their last
/// entry on both sides.
pub fn align_relaxed<'a>(
    old: &'a Catalog,
    new: &'a Catalog,
    include_old_only: bool,
) -> Vec<AlignedPair<'a>> {
    let old_mapping = old.mapping();

    let mut pairs: Vec<AlignedPair<'a>> = new
        .iter()
        .map(|new_entry| match old_mapping.get(&new_entry.key) {
            Some(&old_entry) => AlignedPair::Matched {
                old: old_entry,
                new: new_entry,
            },
            None => AlignedPair::AddedInNew(new_entry),
        })
        .collect();

    if include_old_only {
        let new_mapping = new.mapping();
        pairs.extend(
            old.iter()
                .filter(|entry| !new_mapping.contains_key(&entry.key))
                .filter(|entry| {
                    old_mapping
                        .get(&entry.key)
                        .is_some_and(|last| std::ptr::eq(*last, *entry))
                })
                .map(AlignedPair::RemovedFromOld),
        );
    }

    pairs
}
