//! Field layout planning.
//!
//! Every function here is pure: it takes the owner's current layout and
//! returns the complete layout after the change, positions renumbered densely
//! from 1. The service persists the slots that [`changed`] reports, inside one
//! transaction.
//!
//! Pairing rule: a non-null `row_group` is carried by exactly two fields,
//! both `half`, adjacent in position order.

use std::collections::{HashMap, HashSet};

use cms_sdk::{Field, FieldWidth, LayoutEntry};
use uuid::Uuid;

use super::error::DomainError;

/// Layout-relevant projection of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub field_id: Uuid,
    pub position: i32,
    pub width: FieldWidth,
    pub row_group: Option<i32>,
}

impl From<&Field> for Slot {
    fn from(f: &Field) -> Self {
        Self {
            field_id: f.id,
            position: f.position,
            width: f.width,
            row_group: f.row_group,
        }
    }
}

fn ordered(current: &[Slot]) -> Vec<Slot> {
    let mut slots = current.to_vec();
    slots.sort_by_key(|s| (s.position, s.field_id));
    slots
}

fn renumber(slots: &mut [Slot]) {
    for (pos, slot) in (1..).zip(slots.iter_mut()) {
        slot.position = pos;
    }
}

fn groups(slots: &[Slot]) -> HashMap<i32, Vec<usize>> {
    let mut map: HashMap<i32, Vec<usize>> = HashMap::new();
    for (idx, slot) in slots.iter().enumerate() {
        if let Some(tag) = slot.row_group {
            map.entry(tag).or_default().push(idx);
        }
    }
    map
}

fn group_violation(slots: &[Slot], tag: i32, members: &[usize]) -> Option<String> {
    if members.len() != 2 {
        return Some(format!(
            "row_group {tag} must pair exactly two fields, found {}",
            members.len()
        ));
    }
    if let Some(idx) = members.iter().find(|&&i| slots[i].width != FieldWidth::Half) {
        return Some(format!(
            "field {} in row_group {tag} is not half width",
            slots[*idx].field_id
        ));
    }
    if members[0].abs_diff(members[1]) != 1 {
        return Some(format!("row_group {tag} members are not adjacent"));
    }
    None
}

/// First pairing-rule violation in display order, if any.
#[must_use]
pub fn pairing_violation(slots: &[Slot]) -> Option<String> {
    let slots = ordered(slots);
    let mut tags: Vec<_> = groups(&slots).into_iter().collect();
    tags.sort_by_key(|(tag, _)| *tag);
    tags.into_iter()
        .find_map(|(tag, members)| group_violation(&slots, tag, &members))
}

/// Clear every tag that no longer satisfies the pairing rule, on all of its members.
pub fn dissolve_broken_pairs(slots: &mut [Slot]) {
    let broken: HashSet<i32> = groups(slots)
        .into_iter()
        .filter(|(tag, members)| group_violation(slots, *tag, members).is_some())
        .map(|(tag, _)| tag)
        .collect();
    for slot in slots.iter_mut() {
        if slot.row_group.is_some_and(|tag| broken.contains(&tag)) {
            slot.row_group = None;
        }
    }
}

/// Full layout rewrite. `entries` must list every field of the owner exactly
/// once, in the new display order.
pub fn plan_reorder(current: &[Slot], entries: &[LayoutEntry]) -> Result<Vec<Slot>, DomainError> {
    let by_id: HashMap<Uuid, &Slot> = current.iter().map(|s| (s.field_id, s)).collect();
    let mut seen = HashSet::with_capacity(entries.len());

    let mut slots = Vec::with_capacity(entries.len());
    for entry in entries {
        if !seen.insert(entry.field_id) {
            return Err(DomainError::invalid_layout(format!(
                "field {} listed more than once",
                entry.field_id
            )));
        }
        let slot = by_id.get(&entry.field_id).ok_or_else(|| {
            DomainError::invalid_layout(format!(
                "field {} does not belong to this owner",
                entry.field_id
            ))
        })?;
        slots.push(Slot {
            row_group: entry.row_group,
            ..**slot
        });
    }

    if slots.len() != current.len() {
        return Err(DomainError::invalid_layout(format!(
            "layout lists {} of {} fields",
            slots.len(),
            current.len()
        )));
    }

    renumber(&mut slots);
    if let Some(reason) = pairing_violation(&slots) {
        return Err(DomainError::invalid_layout(reason));
    }
    Ok(slots)
}

/// Insert `new` at the 1-based `at` (appended when `None`), shifting later fields down.
#[must_use]
pub fn plan_insert(current: &[Slot], new: Slot, at: Option<i32>) -> Vec<Slot> {
    let mut slots = ordered(current);
    let idx = clamp_index(at, slots.len() + 1);
    slots.insert(
        idx,
        Slot {
            row_group: None,
            ..new
        },
    );
    dissolve_broken_pairs(&mut slots);
    renumber(&mut slots);
    slots
}

/// Layout after removing `field_id`. A former partner loses its tag.
#[must_use]
pub fn plan_remove(current: &[Slot], field_id: Uuid) -> Vec<Slot> {
    let mut slots = ordered(current);
    slots.retain(|s| s.field_id != field_id);
    dissolve_broken_pairs(&mut slots);
    renumber(&mut slots);
    slots
}

/// Move one field to the 1-based `to` (clamped). The moved field's pair is
/// broken, as is any pair the insertion point splits.
pub fn plan_move(current: &[Slot], field_id: Uuid, to: i32) -> Result<Vec<Slot>, DomainError> {
    let mut slots = ordered(current);
    let idx = index_of(&slots, field_id)?;
    clear_pair(&mut slots, idx);

    let moved = slots.remove(idx);
    let target = clamp_index(Some(to), slots.len() + 1);
    slots.insert(target, moved);

    dissolve_broken_pairs(&mut slots);
    renumber(&mut slots);
    Ok(slots)
}

/// Change the width of one field. Going `full` clears the field's pair on
/// both members; going `half` never pairs automatically.
pub fn plan_width(
    current: &[Slot],
    field_id: Uuid,
    width: FieldWidth,
) -> Result<Vec<Slot>, DomainError> {
    let mut slots = ordered(current);
    let idx = index_of(&slots, field_id)?;
    if width == FieldWidth::Full {
        clear_pair(&mut slots, idx);
    }
    slots[idx].width = width;
    dissolve_broken_pairs(&mut slots);
    renumber(&mut slots);
    Ok(slots)
}

/// Slots of `after` that differ from their counterpart in `before`.
#[must_use]
pub fn changed(before: &[Slot], after: &[Slot]) -> Vec<Slot> {
    let old: HashMap<Uuid, &Slot> = before.iter().map(|s| (s.field_id, s)).collect();
    after
        .iter()
        .filter(|s| old.get(&s.field_id).is_none_or(|o| *o != *s))
        .copied()
        .collect()
}

fn index_of(slots: &[Slot], field_id: Uuid) -> Result<usize, DomainError> {
    slots
        .iter()
        .position(|s| s.field_id == field_id)
        .ok_or_else(|| DomainError::not_found("Field", field_id))
}

fn clear_pair(slots: &mut [Slot], idx: usize) {
    if let Some(tag) = slots[idx].row_group {
        for slot in slots.iter_mut().filter(|s| s.row_group == Some(tag)) {
            slot.row_group = None;
        }
    }
}

/// 1-based position to a vector index in `0..len`.
fn clamp_index(at: Option<i32>, len: usize) -> usize {
    let last = len.max(1);
    at.map_or(last, |p| {
        usize::try_from(p.max(1)).map_or(last, |p| p.min(last))
    }) - 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(position: i32, width: FieldWidth, row_group: Option<i32>) -> Slot {
        Slot {
            field_id: Uuid::now_v7(),
            position,
            width,
            row_group,
        }
    }

    fn ids(slots: &[Slot]) -> Vec<Uuid> {
        slots.iter().map(|s| s.field_id).collect()
    }

    fn entries(slots: &[Slot]) -> Vec<LayoutEntry> {
        slots
            .iter()
            .map(|s| LayoutEntry {
                field_id: s.field_id,
                row_group: s.row_group,
            })
            .collect()
    }

    /// a(full) b(half,1) c(half,1) d(half)
    fn sample() -> Vec<Slot> {
        vec![
            slot(1, FieldWidth::Full, None),
            slot(2, FieldWidth::Half, Some(1)),
            slot(3, FieldWidth::Half, Some(1)),
            slot(4, FieldWidth::Half, None),
        ]
    }

    #[test]
    fn sample_is_valid() {
        assert_eq!(pairing_violation(&sample()), None);
    }

    #[test]
    fn reorder_rewrites_positions_densely() {
        let cur = sample();
        let mut wanted = entries(&cur);
        wanted.swap(0, 3);
        let out = plan_reorder(&cur, &wanted).unwrap();
        assert_eq!(
            out.iter().map(|s| s.position).collect::<Vec<_>>(),
            vec![1, 2, 3, 4]
        );
        assert_eq!(out[0].field_id, cur[3].field_id);
        assert_eq!(out[3].field_id, cur[0].field_id);
    }

    #[test]
    fn reorder_rejects_duplicates_and_foreign_ids() {
        let cur = sample();
        let mut dup = entries(&cur);
        dup[3] = dup[0];
        assert!(matches!(
            plan_reorder(&cur, &dup),
            Err(DomainError::InvalidLayout { .. })
        ));

        let mut foreign = entries(&cur);
        foreign[3].field_id = Uuid::now_v7();
        assert!(matches!(
            plan_reorder(&cur, &foreign),
            Err(DomainError::InvalidLayout { .. })
        ));
    }

    #[test]
    fn reorder_rejects_missing_fields() {
        let cur = sample();
        let partial = &entries(&cur)[..3];
        assert!(plan_reorder(&cur, partial).is_err());
    }

    #[test]
    fn reorder_rejects_bad_pairs() {
        let cur = sample();

        // three members
        let mut three = entries(&cur);
        three[3].row_group = Some(1);
        assert!(plan_reorder(&cur, &three).is_err());

        // full-width member
        let mut full = entries(&cur);
        full[0].row_group = Some(2);
        full[1].row_group = Some(2);
        full[2].row_group = None;
        assert!(plan_reorder(&cur, &full).is_err());

        // split by another field
        let mut split = entries(&cur);
        split.swap(2, 3);
        assert!(plan_reorder(&cur, &split).is_err());
    }

    #[test]
    fn reorder_accepts_new_pair() {
        let cur = sample();
        let mut e = entries(&cur);
        e[1].row_group = None;
        e[2].row_group = Some(7);
        e[3].row_group = Some(7);
        let out = plan_reorder(&cur, &e).unwrap();
        assert_eq!(pairing_violation(&out), None);
        assert_eq!(out[3].row_group, Some(7));
    }

    #[test]
    fn width_full_clears_both_members() {
        let cur = sample();
        let out = plan_width(&cur, cur[1].field_id, FieldWidth::Full).unwrap();
        assert_eq!(out[1].row_group, None);
        assert_eq!(out[2].row_group, None);
        assert_eq!(out[1].width, FieldWidth::Full);
        assert_eq!(changed(&cur, &out).len(), 2);
    }

    #[test]
    fn width_half_does_not_pair() {
        let cur = sample();
        let out = plan_width(&cur, cur[0].field_id, FieldWidth::Half).unwrap();
        assert_eq!(out[0].row_group, None);
        assert_eq!(out[1].row_group, Some(1));
    }

    #[test]
    fn remove_clears_former_partner() {
        let cur = sample();
        let out = plan_remove(&cur, cur[2].field_id);
        assert_eq!(out.len(), 3);
        assert_eq!(out[1].field_id, cur[1].field_id);
        assert_eq!(out[1].row_group, None);
        assert_eq!(out[2].position, 3);
    }

    #[test]
    fn insert_between_partners_dissolves_pair() {
        let cur = sample();
        let new = slot(0, FieldWidth::Full, None);
        let out = plan_insert(&cur, new, Some(3));
        assert_eq!(out[2].field_id, new.field_id);
        assert!(out.iter().all(|s| s.row_group.is_none()));
        assert_eq!(pairing_violation(&out), None);
    }

    #[test]
    fn insert_without_position_appends() {
        let cur = sample();
        let new = slot(0, FieldWidth::Half, None);
        let out = plan_insert(&cur, new, None);
        assert_eq!(out[4].field_id, new.field_id);
        assert_eq!(out[4].position, 5);
        assert_eq!(out[1].row_group, Some(1));
    }

    #[test]
    fn move_breaks_own_pair_and_clamps() {
        let cur = sample();
        let out = plan_move(&cur, cur[1].field_id, 99).unwrap();
        assert_eq!(out[3].field_id, cur[1].field_id);
        assert!(out.iter().all(|s| s.row_group.is_none()));
        assert_eq!(
            ids(&out),
            vec![cur[0].field_id, cur[2].field_id, cur[3].field_id, cur[1].field_id]
        );
    }

    #[test]
    fn move_keeps_untouched_pair() {
        let cur = sample();
        let out = plan_move(&cur, cur[3].field_id, 1).unwrap();
        assert_eq!(out[0].field_id, cur[3].field_id);
        assert_eq!(out[2].row_group, Some(1));
        assert_eq!(out[3].row_group, Some(1));
    }

    #[test]
    fn unknown_field_is_not_found() {
        let cur = sample();
        assert!(matches!(
            plan_move(&cur, Uuid::now_v7(), 1),
            Err(DomainError::NotFound { .. })
        ));
    }

    #[test]
    fn every_single_field_plan_preserves_pairing() {
        let cur = sample();
        for s in &cur {
            for to in 0..=5 {
                assert_eq!(pairing_violation(&plan_move(&cur, s.field_id, to).unwrap()), None);
            }
            for w in [FieldWidth::Full, FieldWidth::Half] {
                assert_eq!(pairing_violation(&plan_width(&cur, s.field_id, w).unwrap()), None);
            }
            assert_eq!(pairing_violation(&plan_remove(&cur, s.field_id)), None);
        }
    }
}
