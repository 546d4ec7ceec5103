//! Integer program for a single optimal lineup.
//!
//! Decision variables are one binary per (entity, eligible slot) pair, plus
//! one binary "team used" indicator per team when a minimum number of teams
//! is required. The objective maximizes effective points; it is stated as a
//! minimization of the negated coefficients for the [`Solver`] port.
//!
//! [`Solver`]: crate::port::Solver

use std::collections::{BTreeMap, HashSet};

use rust_decimal::Decimal;
use tracing::debug;

use super::projection::EffectiveProjections;
use super::settings::BatchSettings;
use crate::domain::{
    Constraint, ConstraintKind, EntityId, ExposureState, Lineup, LineupSlot, PlayerPool,
    RosterShape, TeamId, VariableBounds,
};
use crate::port::{IlpProblem, LpProblem, LpSolution};

/// Values above this are read as a selected binary.
const SELECTED: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// One (entity, slot) selection variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionVar {
    /// Position in [`PlayerPool::entities`].
    pub entity: usize,
    /// Position in [`RosterShape::slots`].
    pub slot: usize,
}

/// Builds one [`LineupModel`] per solve.
#[derive(Debug, Clone, Copy)]
pub struct ConstraintModelBuilder<'a> {
    pool: &'a PlayerPool,
    shape: &'a RosterShape,
    settings: &'a BatchSettings,
}

impl<'a> ConstraintModelBuilder<'a> {
    #[must_use]
    pub fn new(pool: &'a PlayerPool, shape: &'a RosterShape, settings: &'a BatchSettings) -> Self {
        Self {
            pool,
            shape,
            settings,
        }
    }

    /// Assemble the integer program for the next solve.
    ///
    /// `exposure` supplies appearance counts and the accepted lineups that
    /// diversity is measured against.
    #[must_use]
    pub fn build(&self, projections: &EffectiveProjections, exposure: &ExposureState) -> LineupModel<'a> {
        let toggles = self.settings.toggles;

        let mut selection = Vec::new();
        for (e, entity) in self.pool.entities().iter().enumerate() {
            for (s, slot) in self.shape.slots().iter().enumerate() {
                if entity.is_eligible(&slot.id) {
                    selection.push(SelectionVar { entity: e, slot: s });
                }
            }
        }

        let mut by_entity: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        let mut by_team: BTreeMap<&TeamId, Vec<usize>> = BTreeMap::new();
        for (v, var) in selection.iter().enumerate() {
            by_entity.entry(var.entity).or_default().push(v);
            if self.shape.slots()[var.slot].counts_toward_team_limits {
                let team = self.pool.entities()[var.entity].team();
                by_team.entry(team).or_default().push(v);
            }
        }

        let min_teams = self.shape.min_teams_represented();
        let team_indicators: Vec<TeamId> = if toggles.min_teams && min_teams > 0 {
            by_team.keys().map(|t| (*t).clone()).collect()
        } else {
            Vec::new()
        };

        let num_vars = selection.len() + team_indicators.len();
        let mut lp = LpProblem::new(num_vars);
        lp.bounds = vec![VariableBounds::binary(); num_vars];

        for (v, var) in selection.iter().enumerate() {
            let entity = &self.pool.entities()[var.entity];
            let slot = &self.shape.slots()[var.slot];
            lp.objective[v] = -entity.points_in(slot, projections.at(var.entity));
        }

        // 1. Slot fill
        if toggles.slot_fill {
            for (s, slot) in self.shape.slots().iter().enumerate() {
                let vars = selection
                    .iter()
                    .enumerate()
                    .filter(|(_, var)| var.slot == s)
                    .map(|(v, _)| v);
                lp.constraints.push(Constraint::eq(
                    ConstraintKind::SlotFill,
                    Constraint::unit_terms(vars),
                    Decimal::from(slot.count),
                ));
            }
        }

        // 2. Single occupancy
        if toggles.single_occupancy {
            for vars in by_entity.values().filter(|vars| vars.len() > 1) {
                lp.constraints.push(Constraint::leq(
                    ConstraintKind::SingleOccupancy,
                    Constraint::unit_terms(vars.iter().copied()),
                    Decimal::ONE,
                ));
            }
        }

        // 3-4. Salary bounds
        let salary_terms = || -> Vec<(usize, Decimal)> {
            selection
                .iter()
                .enumerate()
                .map(|(v, var)| {
                    let entity = &self.pool.entities()[var.entity];
                    (v, entity.salary_in(&self.shape.slots()[var.slot]))
                })
                .collect()
        };
        let cap = Decimal::from(self.shape.salary_cap());
        if toggles.salary_cap {
            lp.constraints
                .push(Constraint::leq(ConstraintKind::SalaryCap, salary_terms(), cap));
        }
        if toggles.min_salary {
            if let Some(fraction) = self.settings.min_salary_used_fraction.filter(|f| !f.is_zero()) {
                lp.constraints.push(Constraint::geq(
                    ConstraintKind::MinSalary,
                    salary_terms(),
                    fraction * cap,
                ));
            }
        }

        // 5. Max from one team
        if toggles.max_from_team {
            let max = Decimal::from(self.shape.max_from_one_team());
            for vars in by_team.values() {
                lp.constraints.push(Constraint::leq(
                    ConstraintKind::MaxFromTeam,
                    Constraint::unit_terms(vars.iter().copied()),
                    max,
                ));
            }
        }

        // 6. Min teams represented: indicator <= selections from its team
        if !team_indicators.is_empty() {
            let mut indicator_vars = Vec::with_capacity(team_indicators.len());
            for (k, team) in team_indicators.iter().enumerate() {
                let y = selection.len() + k;
                indicator_vars.push(y);
                let mut terms = vec![(y, Decimal::ONE)];
                terms.extend(by_team[team].iter().map(|&v| (v, Decimal::NEGATIVE_ONE)));
                lp.constraints
                    .push(Constraint::leq(ConstraintKind::TeamLink, terms, Decimal::ZERO));
            }
            lp.constraints.push(Constraint::geq(
                ConstraintKind::MinTeams,
                Constraint::unit_terms(indicator_vars),
                Decimal::from(min_teams),
            ));
        }

        // 7. Stacking
        if toggles.stacking {
            if let Some(stack) = self.settings.stack.as_ref().filter(|s| s.count > 0) {
                let vars = by_team.get(&stack.team).cloned().unwrap_or_default();
                lp.constraints.push(Constraint::geq(
                    ConstraintKind::Stack,
                    Constraint::unit_terms(vars),
                    Decimal::from(stack.count),
                ));
            }
        }

        // 8. Exposure caps pin exhausted entities to zero for this solve
        let mut excluded = Vec::new();
        if toggles.exposure {
            for (e, vars) in &by_entity {
                let id = self.pool.entities()[*e].id();
                if let Some(cap) = self.settings.appearance_cap(id) {
                    if exposure.appearances(id) >= cap {
                        for &v in vars {
                            lp.bounds[v] = VariableBounds::pinned_zero();
                        }
                        excluded.push(id.clone());
                    }
                }
            }
        }

        // 9. Diversity against every accepted lineup
        let diversity = self.settings.effective_diversity();
        if toggles.diversity && diversity > 0 {
            let limit = self.shape.size().saturating_sub(diversity);
            for prior in exposure.accepted() {
                let members: HashSet<usize> = prior
                    .entity_ids()
                    .into_iter()
                    .filter_map(|id| self.pool.position(id))
                    .collect();
                let vars = selection
                    .iter()
                    .enumerate()
                    .filter(|(_, var)| members.contains(&var.entity))
                    .map(|(v, _)| v);
                lp.constraints.push(Constraint::leq(
                    ConstraintKind::Diversity,
                    Constraint::unit_terms(vars),
                    Decimal::from(limit),
                ));
            }
        }

        debug!(
            variables = num_vars,
            constraints = lp.constraints.len(),
            excluded = excluded.len(),
            "Built lineup model"
        );

        LineupModel {
            pool: self.pool,
            shape: self.shape,
            problem: IlpProblem::all_binary(lp),
            selection,
            team_indicators,
            projections: projections.clone(),
            excluded,
        }
    }
}

/// A built integer program together with the data needed to decode it.
#[derive(Debug, Clone)]
pub struct LineupModel<'a> {
    pool: &'a PlayerPool,
    shape: &'a RosterShape,
    problem: IlpProblem,
    selection: Vec<SelectionVar>,
    team_indicators: Vec<TeamId>,
    projections: EffectiveProjections,
    excluded: Vec<EntityId>,
}

impl LineupModel<'_> {
    #[must_use]
    pub fn problem(&self) -> &IlpProblem {
        &self.problem
    }

    /// Selection variables; their index is the variable index.
    #[must_use]
    pub fn selection(&self) -> &[SelectionVar] {
        &self.selection
    }

    /// Teams with a "team used" indicator, in variable order after the
    /// selection variables.
    #[must_use]
    pub fn team_indicators(&self) -> &[TeamId] {
        &self.team_indicators
    }

    /// Entities pinned to zero by exposure caps for this solve.
    #[must_use]
    pub fn excluded(&self) -> &[EntityId] {
        &self.excluded
    }

    /// Constraint rows of one kind.
    pub fn constraints_of(&self, kind: ConstraintKind) -> impl Iterator<Item = &Constraint> {
        self.problem
            .lp
            .constraints
            .iter()
            .filter(move |c| c.kind == kind)
    }

    /// Index of the variable selecting `entity` into `slot`, if one exists.
    #[must_use]
    pub fn variable(&self, entity: &EntityId, slot: &crate::domain::SlotId) -> Option<usize> {
        let e = self.pool.position(entity)?;
        let s = self.shape.slot_index(slot)?;
        self.selection
            .iter()
            .position(|var| var.entity == e && var.slot == s)
    }

    /// Turn an optimal solution into a lineup.
    ///
    /// Returns `None` when the assignment does not describe a complete,
    /// feasible lineup (wrong slot counts, a repeated entity, or a violated
    /// row), which callers treat as a failed attempt.
    #[must_use]
    pub fn decode(&self, solution: &LpSolution, index: u32) -> Option<Lineup> {
        if solution.values.len() != self.problem.lp.num_vars() {
            return None;
        }

        let values: Vec<Decimal> = solution
            .values
            .iter()
            .map(|v| if *v > SELECTED { Decimal::ONE } else { Decimal::ZERO })
            .collect();
        if !self.problem.lp.constraints.iter().all(|c| c.is_satisfied(&values)) {
            return None;
        }

        let chosen: Vec<&SelectionVar> = self
            .selection
            .iter()
            .zip(&values)
            .filter(|(_, v)| !v.is_zero())
            .map(|(var, _)| var)
            .collect();

        let mut seen = HashSet::new();
        if !chosen.iter().all(|var| seen.insert(var.entity)) {
            return None;
        }
        for (s, slot) in self.shape.slots().iter().enumerate() {
            if chosen.iter().filter(|var| var.slot == s).count() != slot.count as usize {
                return None;
            }
        }

        let slots_of = |var: &SelectionVar| -> LineupSlot {
            let entity = &self.pool.entities()[var.entity];
            let slot = &self.shape.slots()[var.slot];
            LineupSlot {
                slot: slot.id.clone(),
                entity_id: entity.id().clone(),
                captain_id: if slot.captain {
                    entity.captain_id().cloned()
                } else {
                    None
                },
                name: entity.name().to_string(),
                team: entity.team().clone(),
                opponent: entity.opponent().clone(),
                salary: entity.salary_in(slot),
                projected_points: entity.points_in(slot, entity.projection()),
                effective_points: entity.points_in(slot, self.projections.at(var.entity)),
                counts_toward_team_limits: slot.counts_toward_team_limits,
            }
        };

        let mut slots: Vec<LineupSlot> = chosen.into_iter().map(slots_of).collect();
        slots.sort_by(|a, b| {
            let sa = self.shape.slot_index(&a.slot);
            let sb = self.shape.slot_index(&b.slot);
            sa.cmp(&sb)
                .then(b.effective_points.cmp(&a.effective_points))
                .then(a.entity_id.cmp(&b.entity_id))
        });

        Some(Lineup::new(index, slots))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::projection::ProjectionAdjuster;
    use crate::application::settings::StackRule;
    use crate::domain::{Entity, SlotId, SlotSpec};
    use crate::port::SolutionStatus;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rust_decimal_macros::dec;

    fn showdown_pool() -> PlayerPool {
        let rows = [
            ("1", "LVA", 11_000, dec!(50)),
            ("2", "LVA", 9_000, dec!(40)),
            ("3", "NYL", 8_000, dec!(35)),
            ("4", "NYL", 7_000, dec!(30)),
            ("5", "LVA", 6_000, dec!(25)),
            ("6", "NYL", 5_000, dec!(20)),
            ("7", "NYL", 4_000, dec!(15)),
        ];
        PlayerPool::from_records(rows.iter().map(|(id, team, salary, points)| {
            Entity::builder(EntityId::from(*id), format!("P{id}"), *team)
                .salary(*salary)
                .projection(*points)
                .eligible_slots([SlotId::from("CPT"), SlotId::from("UTIL")])
        }))
        .unwrap()
    }

    fn showdown_shape() -> RosterShape {
        RosterShape::try_new(
            vec![SlotSpec::captain("CPT", 1), SlotSpec::new("UTIL", 5)],
            50_000,
            5,
            2,
        )
        .unwrap()
    }

    fn build(pool: &PlayerPool, shape: &RosterShape, settings: &BatchSettings, exposure: &ExposureState) -> IlpProblem {
        let eff = ProjectionAdjuster::identity().adjust(pool, &mut StdRng::seed_from_u64(1));
        ConstraintModelBuilder::new(pool, shape, settings)
            .build(&eff, exposure)
            .problem()
            .clone()
    }

    #[test]
    fn captain_and_base_forms_are_separate_variables() {
        let pool = showdown_pool();
        let shape = showdown_shape();
        let settings = BatchSettings::default();
        let eff = ProjectionAdjuster::identity().adjust(&pool, &mut StdRng::seed_from_u64(1));
        let model = ConstraintModelBuilder::new(&pool, &shape, &settings)
            .build(&eff, &ExposureState::new());

        assert_eq!(model.selection().len(), 14);
        assert_eq!(model.team_indicators().len(), 2);
        assert_eq!(model.problem().lp.num_vars(), 16);
        assert_eq!(model.constraints_of(ConstraintKind::SingleOccupancy).count(), 7);

        let cpt = model.variable(&EntityId::from("1"), &SlotId::from("CPT")).unwrap();
        let util = model.variable(&EntityId::from("1"), &SlotId::from("UTIL")).unwrap();
        assert_eq!(model.problem().lp.objective[cpt], dec!(-75));
        assert_eq!(model.problem().lp.objective[util], dec!(-50));
    }

    #[test]
    fn salary_cap_uses_captain_multiplier() {
        let pool = showdown_pool();
        let shape = showdown_shape();
        let settings = BatchSettings::default();
        let eff = ProjectionAdjuster::identity().adjust(&pool, &mut StdRng::seed_from_u64(1));
        let model = ConstraintModelBuilder::new(&pool, &shape, &settings)
            .build(&eff, &ExposureState::new());

        let cap = model.constraints_of(ConstraintKind::SalaryCap).next().unwrap();
        let cpt = model.variable(&EntityId::from("1"), &SlotId::from("CPT")).unwrap();
        let coef = cap.terms.iter().find(|(v, _)| *v == cpt).unwrap().1;
        assert_eq!(coef, dec!(16500));
        assert_eq!(cap.rhs, dec!(50000));
    }

    #[test]
    fn optional_families_follow_settings() {
        let pool = showdown_pool();
        let shape = showdown_shape();
        let exposure = ExposureState::new();

        let plain = build(&pool, &shape, &BatchSettings::default(), &exposure);
        assert!(!plain.lp.constraints.iter().any(|c| c.kind == ConstraintKind::Stack));
        assert!(!plain.lp.constraints.iter().any(|c| c.kind == ConstraintKind::MinSalary));

        let settings = BatchSettings {
            stack: Some(StackRule {
                team: TeamId::from("LVA"),
                count: 3,
            }),
            min_salary_used_fraction: Some(dec!(0.9)),
            ..Default::default()
        };
        let full = build(&pool, &shape, &settings, &exposure);
        let stack = full
            .lp
            .constraints
            .iter()
            .find(|c| c.kind == ConstraintKind::Stack)
            .unwrap();
        assert_eq!(stack.rhs, dec!(3));
        assert_eq!(stack.terms.len(), 6);
        let min_salary = full
            .lp
            .constraints
            .iter()
            .find(|c| c.kind == ConstraintKind::MinSalary)
            .unwrap();
        assert_eq!(min_salary.rhs, dec!(45000));
    }

    #[test]
    fn toggled_off_family_is_omitted() {
        let pool = showdown_pool();
        let shape = showdown_shape();
        let mut settings = BatchSettings::default();
        settings.toggles.max_from_team = false;
        settings.toggles.min_teams = false;

        let problem = build(&pool, &shape, &settings, &ExposureState::new());
        assert!(!problem.lp.constraints.iter().any(|c| matches!(
            c.kind,
            ConstraintKind::MaxFromTeam | ConstraintKind::MinTeams | ConstraintKind::TeamLink
        )));
        assert_eq!(problem.lp.num_vars(), 14);
    }

    fn accepted(index: u32, ids: &[&str]) -> Lineup {
        let slots = ids
            .iter()
            .map(|id| LineupSlot {
                slot: SlotId::from("UTIL"),
                entity_id: EntityId::from(*id),
                captain_id: None,
                name: (*id).to_string(),
                team: TeamId::from("LVA"),
                opponent: TeamId::unknown(),
                salary: dec!(1000),
                projected_points: dec!(1),
                effective_points: dec!(1),
                counts_toward_team_limits: true,
            })
            .collect();
        Lineup::new(index, slots)
    }

    #[test]
    fn exposure_cap_pins_variables() {
        let pool = showdown_pool();
        let shape = showdown_shape();
        let settings = BatchSettings {
            num_lineups: 2,
            max_player_appearances: Some(1),
            ..Default::default()
        };
        let mut exposure = ExposureState::new();
        exposure.record(accepted(1, &["1", "2"]));

        let eff = ProjectionAdjuster::identity().adjust(&pool, &mut StdRng::seed_from_u64(1));
        let model = ConstraintModelBuilder::new(&pool, &shape, &settings).build(&eff, &exposure);

        assert_eq!(model.excluded().len(), 2);
        let v = model.variable(&EntityId::from("1"), &SlotId::from("CPT")).unwrap();
        assert!(model.problem().lp.bounds[v].is_pinned_zero());
        let free = model.variable(&EntityId::from("3"), &SlotId::from("CPT")).unwrap();
        assert!(!model.problem().lp.bounds[free].is_pinned_zero());
    }

    #[test]
    fn diversity_row_per_accepted_lineup() {
        let pool = showdown_pool();
        let shape = showdown_shape();
        let settings = BatchSettings {
            player_diversity: 3,
            ..Default::default()
        };
        let mut exposure = ExposureState::new();
        exposure.record(accepted(1, &["1", "2", "3", "4", "5", "6"]));
        exposure.record(accepted(2, &["1", "2", "3", "4", "5", "7"]));

        let problem = build(&pool, &shape, &settings, &exposure);
        let rows: Vec<_> = problem
            .lp
            .constraints
            .iter()
            .filter(|c| c.kind == ConstraintKind::Diversity)
            .collect();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|c| c.rhs == dec!(3)));
        assert_eq!(rows[0].terms.len(), 12);
    }

    #[test]
    fn decode_rejects_incomplete_assignment() {
        let pool = showdown_pool();
        let shape = showdown_shape();
        let settings = BatchSettings::default();
        let eff = ProjectionAdjuster::identity().adjust(&pool, &mut StdRng::seed_from_u64(1));
        let model = ConstraintModelBuilder::new(&pool, &shape, &settings)
            .build(&eff, &ExposureState::new());

        let solution = LpSolution {
            values: vec![Decimal::ZERO; model.problem().lp.num_vars()],
            objective: Decimal::ZERO,
            status: SolutionStatus::Optimal,
        };
        assert!(model.decode(&solution, 1).is_none());
    }

    #[test]
    fn decode_orders_slots_and_applies_multipliers() {
        let pool = showdown_pool();
        let shape = showdown_shape();
        let settings = BatchSettings::default();
        let eff = ProjectionAdjuster::identity().adjust(&pool, &mut StdRng::seed_from_u64(1));
        let model = ConstraintModelBuilder::new(&pool, &shape, &settings)
            .build(&eff, &ExposureState::new());

        let mut values = vec![Decimal::ZERO; model.problem().lp.num_vars()];
        let pick = |id: &str, slot: &str| model.variable(&EntityId::from(id), &SlotId::from(slot)).unwrap();
        values[pick("3", "CPT")] = Decimal::ONE;
        for id in ["1", "2", "4", "6", "7"] {
            values[pick(id, "UTIL")] = Decimal::ONE;
        }
        let base = model.selection().len();
        values[base] = Decimal::ONE;
        values[base + 1] = Decimal::ONE;

        let solution = LpSolution {
            values,
            objective: Decimal::ZERO,
            status: SolutionStatus::Optimal,
        };
        let lineup = model.decode(&solution, 4).unwrap();

        assert_eq!(lineup.index(), 4);
        assert_eq!(lineup.slots()[0].slot, SlotId::from("CPT"));
        assert_eq!(lineup.slots()[0].salary, dec!(12000));
        assert_eq!(lineup.slots()[0].projected_points, dec!(52.5));
        assert_eq!(lineup.slots()[1].entity_id, EntityId::from("1"));
        assert_eq!(lineup.total_salary(), dec!(48000));
    }
}
