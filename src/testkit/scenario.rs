//! Canned pools for batch scenarios and a brute-force showdown optimum.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::domain::PoolBuilder;
use crate::domain::{Entity, PlayerPool, RosterShape, SlotId, TeamId};

/// Ten entities; `LVA` holds the five highest projections and the five
/// highest salaries, so the cap decides how many of them fit.
pub fn top_heavy_pool() -> PlayerPool {
    PoolBuilder::new()
        .showdown("LVA", 12_000, dec!(50))
        .showdown("LVA", 11_000, dec!(46))
        .showdown("LVA", 10_000, dec!(42))
        .showdown("LVA", 9_000, dec!(38))
        .showdown("LVA", 8_000, dec!(34))
        .showdown("NYL", 7_000, dec!(25))
        .showdown("NYL", 6_000, dec!(22))
        .showdown("NYL", 5_000, dec!(18))
        .showdown("NYL", 4_000, dec!(15))
        .showdown("NYL", 3_000, dec!(10))
        .build()
}

/// Eight cheap, attractive `LVA` entities and two weak `NYL` ones.
pub fn one_team_pool() -> PlayerPool {
    let mut builder = PoolBuilder::new();
    for i in 0..8 {
        builder = builder.showdown("LVA", 5_000, Decimal::from(40 - i));
    }
    builder
        .showdown("NYL", 5_000, dec!(5))
        .showdown("NYL", 5_000, dec!(4))
        .build()
}

/// Nine cheap entities where only ids `1` and `2` may captain.
///
/// With diversity 3 the first lineup is `{1..6}` and the second is
/// `{1, 2, 3, 7, 8, 9}`; a third would need `{4..9}`, which has no captain.
pub fn two_lineup_pool() -> PlayerPool {
    PoolBuilder::new()
        .showdown("LVA", 1_000, dec!(50))
        .showdown("NYL", 1_000, dec!(45))
        .utility("LVA", 1_000, dec!(20))
        .utility("NYL", 1_000, dec!(19))
        .utility("LVA", 1_000, dec!(18))
        .utility("NYL", 1_000, dec!(17))
        .utility("LVA", 1_000, dec!(10))
        .utility("NYL", 1_000, dec!(9))
        .utility("LVA", 1_000, dec!(8))
        .build()
}

/// Six `LVA` entities at 30 and the `NYL` star (id `7`) at 50, plus a weak
/// `NYL` reserve (id `8`).
pub fn faded_star_pool() -> PlayerPool {
    let mut builder = PoolBuilder::new();
    for _ in 0..6 {
        builder = builder.showdown("LVA", 5_000, dec!(30));
    }
    builder
        .showdown("NYL", 5_000, dec!(50))
        .showdown("NYL", 5_000, dec!(5))
        .build()
}

fn combinations(items: &[usize], k: usize) -> Vec<Vec<usize>> {
    if k == 0 {
        return vec![Vec::new()];
    }
    if items.len() < k {
        return Vec::new();
    }
    let mut out = Vec::new();
    for (i, &first) in items.iter().enumerate() {
        for mut rest in combinations(&items[i + 1..], k - 1) {
            rest.insert(0, first);
            out.push(rest);
        }
    }
    out
}

/// Best base-projection total over every legal captain + utility lineup,
/// by exhaustive search. Only meant for pools of a dozen or so entities.
pub fn best_showdown_points(pool: &PlayerPool, shape: &RosterShape) -> Option<Decimal> {
    let captain = shape.captain_slot()?;
    let utility = shape.slots().iter().find(|s| !s.captain)?;
    let entities = pool.entities();
    let cap = Decimal::from(shape.salary_cap());

    let mut best: Option<Decimal> = None;
    for (c, star) in entities.iter().enumerate() {
        if !star.is_eligible(&captain.id) {
            continue;
        }
        let others: Vec<usize> = (0..entities.len())
            .filter(|&i| i != c && entities[i].is_eligible(&utility.id))
            .collect();
        for pick in combinations(&others, utility.count as usize) {
            let members: Vec<&Entity> = pick.iter().map(|&i| &entities[i]).collect();
            let salary = star.salary_in(captain)
                + members.iter().map(|e| e.salary_in(utility)).sum::<Decimal>();
            if salary > cap {
                continue;
            }

            let mut teams: BTreeMap<&TeamId, u32> = BTreeMap::new();
            for e in std::iter::once(star).chain(members.iter().copied()) {
                *teams.entry(e.team()).or_insert(0) += 1;
            }
            if teams.values().any(|&n| n > shape.max_from_one_team())
                || (teams.len() as u32) < shape.min_teams_represented()
            {
                continue;
            }

            let points = star.points_in(captain, star.projection())
                + members.iter().map(|e| e.projection()).sum::<Decimal>();
            if best.map_or(true, |b| points > b) {
                best = Some(points);
            }
        }
    }
    best
}

/// Entities filling `slot` in a lineup, as ids.
pub fn in_slot(lineup: &crate::domain::Lineup, slot: &str) -> Vec<String> {
    let slot = SlotId::from(slot);
    lineup
        .in_slot(&slot)
        .map(|s| s.entity_id.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::domain::showdown_shape;

    #[test]
    fn combinations_count() {
        assert_eq!(combinations(&[0, 1, 2, 3, 4], 2).len(), 10);
        assert!(combinations(&[0, 1], 3).is_empty());
    }

    #[test]
    fn brute_force_respects_captain_eligibility() {
        let best = best_showdown_points(&two_lineup_pool(), &showdown_shape()).unwrap();
        // 1 as captain (75) with 2, 3, 4, 5, 6.
        assert_eq!(best, dec!(194));
    }
}
