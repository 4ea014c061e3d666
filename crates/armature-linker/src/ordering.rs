//! Sibling-ordering repair.
//!
//! The source's declared sibling position is unreliable: positions are
//! sometimes duplicated and sometimes missing. This module implements the
//! uniform fallback used by attributes, operations, packages, diagrams and
//! classes-within-a-package: sort by position when the positions are sound,
//! fall back to arrival order (with a full diagnostic) when they are not.
//! Either way, no sibling is ever dropped.

use std::collections::BTreeMap;

use log::warn;

/// Repair the ordering of one sibling group.
///
/// Returns the reordered items plus whether a collision forced the
/// arrival-order fallback. A missing position participates as position 0,
/// so two position-less siblings collide like two equal declared positions
/// do.
///
/// The output always contains exactly the input items: a collision degrades
/// the ordering, never the contents.
pub fn repair_sibling_order<T>(
    group: &str,
    items: Vec<T>,
    position: impl Fn(&T) -> Option<i64>,
    label: impl Fn(&T) -> String,
) -> (Vec<T>, bool) {
    if items.len() < 2 {
        return (items, false);
    }

    let mut by_position: BTreeMap<i64, usize> = BTreeMap::new();
    for (index, item) in items.iter().enumerate() {
        by_position.insert(position(item).unwrap_or(0), index);
    }

    if by_position.len() < items.len() {
        // A position silently overwrote another: the declared ordering is
        // unusable for this whole group. Describe every sibling so the
        // defect can be found in the source tool.
        let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
        for item in &items {
            *counts.entry(position(item).unwrap_or(0)).or_default() += 1;
        }
        let description = items
            .iter()
            .map(|item| {
                let pos = position(item);
                let declared = pos.map_or_else(|| "?".to_string(), |p| p.to_string());
                let duplicate = counts
                    .get(&pos.unwrap_or(0))
                    .is_some_and(|&count| count > 1);
                let mark = if duplicate { " (duplicate)" } else { "" };
                format!("'{}' at {declared}{mark}", label(item))
            })
            .collect::<Vec<_>>()
            .join(", ");
        warn!(
            group = group,
            siblings = items.len();
            "position collision, keeping arrival order: {description}",
        );
        return (items, true);
    }

    let order: Vec<usize> = by_position.into_values().collect();
    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    let sorted = order
        .into_iter()
        .map(|index| slots[index].take().expect("each index appears exactly once"))
        .collect();
    (sorted, false)
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    fn repair(items: Vec<(Option<i64>, &str)>) -> (Vec<(Option<i64>, &str)>, bool) {
        repair_sibling_order("test", items, |it| it.0, |it| it.1.to_string())
    }

    #[test]
    fn sound_positions_sort() {
        let (out, collided) = repair(vec![
            (Some(3), "c"),
            (Some(1), "a"),
            (Some(2), "b"),
        ]);
        assert!(!collided);
        assert_eq!(
            out.iter().map(|it| it.1).collect::<Vec<_>>(),
            vec!["a", "b", "c"]
        );
    }

    #[test]
    fn duplicate_positions_keep_arrival_order() {
        let (out, collided) = repair(vec![
            (Some(3), "first"),
            (Some(3), "second"),
            (Some(1), "third"),
        ]);
        assert!(collided);
        assert_eq!(
            out.iter().map(|it| it.1).collect::<Vec<_>>(),
            vec!["first", "second", "third"]
        );
    }

    #[test]
    fn one_missing_position_sorts_first() {
        let (out, collided) = repair(vec![(Some(2), "b"), (None, "a")]);
        assert!(!collided);
        assert_eq!(
            out.iter().map(|it| it.1).collect::<Vec<_>>(),
            vec!["a", "b"]
        );
    }

    #[test]
    fn two_missing_positions_collide() {
        let (out, collided) = repair(vec![(None, "x"), (None, "y")]);
        assert!(collided);
        assert_eq!(
            out.iter().map(|it| it.1).collect::<Vec<_>>(),
            vec!["x", "y"]
        );
    }

    #[test]
    fn missing_collides_with_declared_zero() {
        let (_, collided) = repair(vec![(Some(0), "a"), (None, "b")]);
        assert!(collided);
    }

    #[test]
    fn empty_and_singleton_groups_pass_through() {
        let (out, collided) = repair(vec![]);
        assert!(!collided);
        assert!(out.is_empty());

        let (out, collided) = repair(vec![(None, "only")]);
        assert!(!collided);
        assert_eq!(out.len(), 1);
    }

    proptest! {
        /// Repair never drops or duplicates a sibling, whatever the
        /// positions look like.
        #[test]
        fn length_is_always_preserved(
            positions in proptest::collection::vec(
                proptest::option::of(-100i64..100),
                0..32,
            )
        ) {
            let items: Vec<(Option<i64>, usize)> =
                positions.iter().copied().zip(0usize..).collect();
            let (out, _) = repair_sibling_order(
                "prop",
                items.clone(),
                |it| it.0,
                |it| it.1.to_string(),
            );

            prop_assert_eq!(out.len(), items.len());

            let mut seen: Vec<usize> = out.iter().map(|it| it.1).collect();
            seen.sort_unstable();
            let expected: Vec<usize> = (0..items.len()).collect();
            prop_assert_eq!(seen, expected);
        }

        /// Sound position sets come back position-sorted.
        #[test]
        fn unique_positions_sort(
            mut positions in proptest::collection::vec(-1000i64..1000, 2..32)
        ) {
            positions.sort_unstable();
            positions.dedup();
            let mut shuffled = positions.clone();
            shuffled.reverse();

            let items: Vec<(Option<i64>, usize)> =
                shuffled.iter().map(|&p| (Some(p), p as usize)).collect();
            let (out, collided) =
                repair_sibling_order("prop", items, |it| it.0, |it| it.1.to_string());

            prop_assert!(!collided);
            let out_positions: Vec<i64> =
                out.iter().map(|it| it.0.unwrap()).collect();
            prop_assert_eq!(out_positions, positions);
        }
    }
}
