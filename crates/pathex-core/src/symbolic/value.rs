//! Symbolic values and the constraint-setting logic that decides path
//! feasibility.
//!
//! A [`SymbolicValue`] stands for a runtime value at a program point and is
//! tracked purely by identity: two freshly created values never compare
//! equal, even when structurally alike. Values wrapping an optional
//! container carry an inner value for "the payload inside", and delegate
//! most constraint handling to it.
//!
//! The `try_set_*` operations return the set of program states in which the
//! candidate fact can hold. An empty set is not an error: it means the
//! current branch is infeasible and must be pruned by the driver.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};
use thiserror::Error;
use tracing::trace;

use super::constraints::{
    Constraint, ConstraintFamily, ConstraintSet, ObjectConstraint, OptionalValueConstraint,
};
use super::state::ProgramState;

/// Default ceiling on the number of internal states a single constraint
/// operation may produce before the analysis unit is aborted.
pub const MAX_INTERNAL_STATE_COUNT: usize = 10_000;

/// States produced by one constraint operation. Almost always zero, one or
/// two entries; bundle folds can fan out further.
pub type StateVec = SmallVec<[ProgramState; 2]>;

/// Fatal-to-the-unit failure: a constraint operation fanned out past the
/// configured state ceiling.
///
/// The driver must abort analysis of the current procedure only; findings
/// already established on other units stay valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("state limit exceeded: {count} internal states (limit {limit})")]
pub struct StateLimitExceeded {
    pub count: usize,
    pub limit: usize,
}

/// Per-analysis-unit exploration budget, owned by the driver and passed into
/// every fan-out operation. A deliberate unsoundness trade-off: large
/// boolean-compound or switch constructs abort instead of blowing up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExplorationLimits {
    pub max_internal_states: usize,
}

impl Default for ExplorationLimits {
    fn default() -> Self {
        Self {
            max_internal_states: MAX_INTERNAL_STATE_COUNT,
        }
    }
}

impl ExplorationLimits {
    /// Fail once `count` reaches the ceiling. Called after every fan-out
    /// step, not only on final results.
    pub fn guard(self, count: usize) -> Result<(), StateLimitExceeded> {
        if count >= self.max_internal_states {
            Err(StateLimitExceeded {
                count,
                limit: self.max_internal_states,
            })
        } else {
            Ok(())
        }
    }
}

/// Seam to the external semantic model: the one question this core asks
/// about a static type is whether it is an optional/nullable carrier, which
/// decides wrapping in [`ValueFactory::create`].
pub trait StaticType {
    fn is_optional(&self) -> bool;
}

/// Identity of a symbolic value: a per-unit ordinal for fresh values, or one
/// of the fixed singleton identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ValueId {
    Fresh(u32),
    True,
    False,
    Null,
    This,
    Base,
}

#[derive(Debug, Clone)]
enum ValueKind {
    Plain,
    Wrapping(Box<SymbolicValue>),
}

/// An abstract placeholder for a runtime value, compared and hashed by
/// identity only.
#[derive(Debug, Clone)]
pub struct SymbolicValue {
    id: ValueId,
    kind: ValueKind,
}

impl PartialEq for SymbolicValue {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for SymbolicValue {}

impl Hash for SymbolicValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for SymbolicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Singletons are always plain; wrapping values always carry a fresh
        // ordinal assigned by the factory.
        match self.id {
            ValueId::Fresh(n) if self.is_wrapping() => write!(f, "NULLABLE_SV_{n}"),
            ValueId::Fresh(n) => write!(f, "SV_{n}"),
            ValueId::True => f.write_str("SV_TRUE"),
            ValueId::False => f.write_str("SV_FALSE"),
            ValueId::Null => f.write_str("SV_NULL"),
            ValueId::This => f.write_str("SV_THIS"),
            ValueId::Base => f.write_str("SV_BASE"),
        }
    }
}

impl SymbolicValue {
    /// The `true` literal value, shared across the whole unit.
    pub const TRUE: SymbolicValue = SymbolicValue {
        id: ValueId::True,
        kind: ValueKind::Plain,
    };
    /// The `false` literal value.
    pub const FALSE: SymbolicValue = SymbolicValue {
        id: ValueId::False,
        kind: ValueKind::Plain,
    };
    /// The null literal value.
    pub const NULL: SymbolicValue = SymbolicValue {
        id: ValueId::Null,
        kind: ValueKind::Plain,
    };
    /// The receiver of the analyzed method.
    pub const THIS: SymbolicValue = SymbolicValue {
        id: ValueId::This,
        kind: ValueKind::Plain,
    };
    /// The base-qualified receiver.
    pub const BASE: SymbolicValue = SymbolicValue {
        id: ValueId::Base,
        kind: ValueKind::Plain,
    };

    pub fn id(&self) -> ValueId {
        self.id
    }

    /// The inner value of a wrapping (optional-typed) value, if any.
    pub fn wrapped(&self) -> Option<&SymbolicValue> {
        match &self.kind {
            ValueKind::Plain => None,
            ValueKind::Wrapping(inner) => Some(inner),
        }
    }

    pub fn is_wrapping(&self) -> bool {
        matches!(self.kind, ValueKind::Wrapping(_))
    }

    /// Try to record `constraint` for this value on `state`.
    ///
    /// Returns every state in which the fact can hold: the unchanged input
    /// for the `None` no-op and for families this core does not combine on
    /// plain values, one derived state when the fact is new or re-asserted,
    /// and the empty sequence when it contradicts what is already known
    /// (the path is infeasible and must be dropped).
    pub fn try_set_constraint(
        &self,
        constraint: Option<Constraint>,
        state: &ProgramState,
        limits: ExplorationLimits,
    ) -> Result<StateVec, StateLimitExceeded> {
        let Some(constraint) = constraint else {
            return Ok(smallvec![state.clone()]);
        };
        match &self.kind {
            ValueKind::Plain => Ok(self.try_set_plain(constraint, state)),
            ValueKind::Wrapping(inner) => self.try_set_wrapping(inner, constraint, state, limits),
        }
    }

    /// Record the logical negation of `constraint`.
    ///
    /// On a wrapping value a negated boolean check may also be explained by
    /// the optional being empty, so the result is the union of the negated
    /// boolean outcome and the no-value outcome. Everywhere else the fixed
    /// family opposite goes through [`try_set_constraint`](Self::try_set_constraint).
    pub fn try_set_opposite_constraint(
        &self,
        constraint: Option<Constraint>,
        state: &ProgramState,
        limits: ExplorationLimits,
    ) -> Result<StateVec, StateLimitExceeded> {
        if self.is_wrapping() {
            if let Some(c @ Constraint::Bool(_)) = constraint {
                let mut states = self.try_set_constraint(Some(c.negated()), state, limits)?;
                let no_value = self.try_set_constraint(
                    Some(Constraint::OptionalValue(OptionalValueConstraint::NoValue)),
                    state,
                    limits,
                )?;
                for extra in no_value {
                    if !states.contains(&extra) {
                        states.push(extra);
                    }
                }
                limits.guard(states.len())?;
                return Ok(states);
            }
        }
        self.try_set_constraint(constraint.map(Constraint::negated), state, limits)
    }

    /// Fold every constraint in `bundle` onto `state`, one family at a time.
    /// Each step may multiply the candidate states; an empty bundle returns
    /// the input state.
    pub fn try_set_constraints(
        &self,
        bundle: &ConstraintSet,
        state: &ProgramState,
        limits: ExplorationLimits,
    ) -> Result<StateVec, StateLimitExceeded> {
        self.fold_bundle(bundle, state, limits, false)
    }

    /// [`try_set_constraints`](Self::try_set_constraints) with every
    /// constraint negated via
    /// [`try_set_opposite_constraint`](Self::try_set_opposite_constraint).
    pub fn try_set_opposite_constraints(
        &self,
        bundle: &ConstraintSet,
        state: &ProgramState,
        limits: ExplorationLimits,
    ) -> Result<StateVec, StateLimitExceeded> {
        self.fold_bundle(bundle, state, limits, true)
    }

    fn fold_bundle(
        &self,
        bundle: &ConstraintSet,
        state: &ProgramState,
        limits: ExplorationLimits,
        opposite: bool,
    ) -> Result<StateVec, StateLimitExceeded> {
        let mut states: StateVec = smallvec![state.clone()];
        for constraint in bundle.iter() {
            let mut next = StateVec::new();
            for current in &states {
                let step = if opposite {
                    self.try_set_opposite_constraint(Some(constraint), current, limits)?
                } else {
                    self.try_set_constraint(Some(constraint), current, limits)?
                };
                next.extend(step);
                limits.guard(next.len())?;
            }
            states = next;
        }
        Ok(states)
    }

    fn try_set_plain(&self, constraint: Constraint, state: &ProgramState) -> StateVec {
        let Some(old) = state.constraints_for(self) else {
            return smallvec![state.set_constraint(self, constraint)];
        };
        match constraint {
            Constraint::Bool(_) => self.try_set_bool(constraint, old, state),
            Constraint::Object(object) => self.try_set_object(object, constraint, old, state),
            // Families the core does not combine on plain values: accepted
            // unchanged, tracked facts for them come from the driver.
            Constraint::OptionalValue(_) | Constraint::Disposable(_) | Constraint::Capacity(_) => {
                smallvec![state.clone()]
            }
        }
    }

    fn try_set_bool(
        &self,
        constraint: Constraint,
        old: &ConstraintSet,
        state: &ProgramState,
    ) -> StateVec {
        if old.contains(Constraint::Object(ObjectConstraint::Null)) {
            // It was null, and now it should be true or false.
            trace!(value = %self, %constraint, "bool constraint on null value, path infeasible");
            return StateVec::new();
        }
        if let Some(previous) = old.get(ConstraintFamily::Bool) {
            if previous != constraint {
                trace!(value = %self, %constraint, "conflicting bool constraint, path infeasible");
                return StateVec::new();
            }
        }
        smallvec![state.set_constraint(self, constraint)]
    }

    fn try_set_object(
        &self,
        object: ObjectConstraint,
        constraint: Constraint,
        old: &ConstraintSet,
        state: &ProgramState,
    ) -> StateVec {
        if old.get(ConstraintFamily::Bool).is_some() {
            if object == ObjectConstraint::Null {
                // A value with a known truth value cannot be null.
                trace!(value = %self, "null constraint on bool-constrained value, path infeasible");
                return StateVec::new();
            }
            return smallvec![state.clone()];
        }
        match old.get(ConstraintFamily::Object) {
            Some(previous) if previous != constraint => {
                trace!(value = %self, %constraint, "conflicting nullness constraint, path infeasible");
                StateVec::new()
            }
            Some(_) => smallvec![state.set_constraint(self, constraint)],
            None => panic!(
                "object constraint on {self} whose record holds neither a bool nor an object fact"
            ),
        }
    }

    fn try_set_wrapping(
        &self,
        inner: &SymbolicValue,
        constraint: Constraint,
        state: &ProgramState,
        limits: ExplorationLimits,
    ) -> Result<StateVec, StateLimitExceeded> {
        match constraint {
            // Nullness of the container is exactly its has-value status.
            Constraint::Object(object) => {
                let optional = if object == ObjectConstraint::Null {
                    OptionalValueConstraint::NoValue
                } else {
                    OptionalValueConstraint::HasValue
                };
                self.try_set_constraint(Some(Constraint::OptionalValue(optional)), state, limits)
            }
            Constraint::OptionalValue(_) => {
                match state.constraint_of(self, ConstraintFamily::OptionalValue) {
                    None => Ok(smallvec![state.set_constraint(self, constraint)]),
                    Some(previous) if previous != constraint => {
                        trace!(value = %self, %constraint, "conflicting has-value constraint, path infeasible");
                        Ok(StateVec::new())
                    }
                    Some(_) => Ok(smallvec![state.clone()]),
                }
            }
            // Any other fact about the payload implies the optional holds a
            // value, then applies to the inner value in each surviving state.
            other => {
                let with_value = self.try_set_constraint(
                    Some(Constraint::OptionalValue(OptionalValueConstraint::HasValue)),
                    state,
                    limits,
                )?;
                let mut fanned = StateVec::new();
                for current in &with_value {
                    fanned.extend(inner.try_set_constraint(Some(other), current, limits)?);
                    limits.guard(fanned.len())?;
                }
                Ok(fanned)
            }
        }
    }
}

/// Allocates symbolic value identities for one analysis unit.
///
/// Owning the ordinal counter here keeps identities unique per unit without
/// process-wide shared state.
#[derive(Debug, Default)]
pub struct ValueFactory {
    next: u32,
}

impl ValueFactory {
    pub fn new() -> Self {
        Self::default()
    }

    fn fresh_id(&mut self) -> ValueId {
        let id = ValueId::Fresh(self.next);
        self.next += 1;
        id
    }

    /// A fresh plain value with a unique ordinal.
    pub fn fresh(&mut self) -> SymbolicValue {
        SymbolicValue {
            id: self.fresh_id(),
            kind: ValueKind::Plain,
        }
    }

    /// A fresh value for an expression of `static_type`: wrapping (around a
    /// fresh inner value) when the type is an optional carrier, plain
    /// otherwise.
    pub fn create<T>(&mut self, static_type: Option<&T>) -> SymbolicValue
    where
        T: StaticType + ?Sized,
    {
        if static_type.is_some_and(StaticType::is_optional) {
            let inner = self.fresh();
            self.wrapping(inner)
        } else {
            self.fresh()
        }
    }

    /// Wrap an existing value in a fresh optional container value.
    pub fn wrapping(&mut self, inner: SymbolicValue) -> SymbolicValue {
        SymbolicValue {
            id: self.fresh_id(),
            kind: ValueKind::Wrapping(Box::new(inner)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::constraints::BoolConstraint;

    struct TestType {
        optional: bool,
    }

    impl StaticType for TestType {
        fn is_optional(&self) -> bool {
            self.optional
        }
    }

    fn limits() -> ExplorationLimits {
        ExplorationLimits::default()
    }

    #[test]
    fn test_fresh_values_are_never_equal() {
        let mut values = ValueFactory::new();
        let a = values.fresh();
        let b = values.fresh();

        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn test_singletons_compare_equal_to_themselves() {
        assert_eq!(SymbolicValue::TRUE, SymbolicValue::TRUE);
        assert_ne!(SymbolicValue::TRUE, SymbolicValue::FALSE);
        assert_ne!(SymbolicValue::NULL, SymbolicValue::THIS);
    }

    #[test]
    fn test_display_forms() {
        let mut values = ValueFactory::new();
        let plain = values.fresh();
        let wrapped = values.create(Some(&TestType { optional: true }));

        assert_eq!(plain.to_string(), "SV_0");
        // The inner value takes ordinal 1, the wrapper 2.
        assert_eq!(wrapped.to_string(), "NULLABLE_SV_2");
        assert_eq!(wrapped.wrapped().map(ToString::to_string).as_deref(), Some("SV_1"));
        assert_eq!(SymbolicValue::TRUE.to_string(), "SV_TRUE");
        assert_eq!(SymbolicValue::BASE.to_string(), "SV_BASE");
    }

    #[test]
    fn test_wrapping_values_always_carry_fresh_ordinals() {
        let mut values = ValueFactory::new();
        let inner = values.fresh();
        let wrapper = values.wrapping(inner);

        assert!(matches!(wrapper.id(), ValueId::Fresh(_)));
        assert_eq!(wrapper.to_string(), "NULLABLE_SV_1");
    }

    #[test]
    fn test_create_wraps_only_optional_types() {
        let mut values = ValueFactory::new();
        let plain = values.create(Some(&TestType { optional: false }));
        let wrapped = values.create(Some(&TestType { optional: true }));
        let untyped = values.create::<TestType>(None);

        assert!(!plain.is_wrapping());
        assert!(wrapped.is_wrapping());
        assert!(!untyped.is_wrapping());
    }

    #[test]
    fn test_none_constraint_is_noop() {
        let mut values = ValueFactory::new();
        let v = values.fresh();
        let state = ProgramState::new().set_constraint(&v, Constraint::Bool(BoolConstraint::True));

        let states = v.try_set_constraint(None, &state, limits()).unwrap();

        assert_eq!(states.as_slice(), &[state]);
    }

    #[test]
    fn test_first_constraint_is_recorded() {
        let mut values = ValueFactory::new();
        let v = values.fresh();

        let states = v
            .try_set_constraint(
                Some(Constraint::Bool(BoolConstraint::True)),
                &ProgramState::new(),
                limits(),
            )
            .unwrap();

        assert_eq!(states.len(), 1);
        assert!(states[0].has_constraint(&v, Constraint::Bool(BoolConstraint::True)));
    }

    #[test]
    fn test_idempotent_reapplication() {
        let mut values = ValueFactory::new();
        let v = values.fresh();
        let constraint = Some(Constraint::Bool(BoolConstraint::False));

        let once = v
            .try_set_constraint(constraint, &ProgramState::new(), limits())
            .unwrap();
        let twice = v.try_set_constraint(constraint, &once[0], limits()).unwrap();

        assert_eq!(once, twice);
    }

    #[test]
    fn test_bool_on_null_is_infeasible() {
        let mut values = ValueFactory::new();
        let v = values.fresh();
        let state = ProgramState::new().set_constraint(&v, Constraint::Object(ObjectConstraint::Null));

        let states = v
            .try_set_constraint(Some(Constraint::Bool(BoolConstraint::True)), &state, limits())
            .unwrap();

        assert!(states.is_empty());
    }

    #[test]
    fn test_null_on_bool_is_infeasible() {
        let mut values = ValueFactory::new();
        let v = values.fresh();
        let state = ProgramState::new().set_constraint(&v, Constraint::Bool(BoolConstraint::True));

        let states = v
            .try_set_constraint(Some(Constraint::Object(ObjectConstraint::Null)), &state, limits())
            .unwrap();

        assert!(states.is_empty());
    }

    #[test]
    fn test_not_null_on_bool_passes_state_through() {
        let mut values = ValueFactory::new();
        let v = values.fresh();
        let state = ProgramState::new().set_constraint(&v, Constraint::Bool(BoolConstraint::True));

        let states = v
            .try_set_constraint(
                Some(Constraint::Object(ObjectConstraint::NotNull)),
                &state,
                limits(),
            )
            .unwrap();

        assert_eq!(states.as_slice(), &[state]);
    }

    #[test]
    fn test_conflicting_bool_is_infeasible() {
        let mut values = ValueFactory::new();
        let v = values.fresh();
        let state = ProgramState::new().set_constraint(&v, Constraint::Bool(BoolConstraint::True));

        let states = v
            .try_set_constraint(Some(Constraint::Bool(BoolConstraint::False)), &state, limits())
            .unwrap();

        assert!(states.is_empty());
    }

    #[test]
    fn test_opaque_families_are_noops_on_plain_values() {
        let mut values = ValueFactory::new();
        let v = values.fresh();
        let state = ProgramState::new().set_constraint(&v, Constraint::Bool(BoolConstraint::True));

        for constraint in [
            Constraint::OptionalValue(OptionalValueConstraint::HasValue),
            Constraint::Disposable(crate::symbolic::DisposableConstraint::Disposed),
            Constraint::Capacity(crate::symbolic::CapacityConstraint::Empty),
        ] {
            let states = v.try_set_constraint(Some(constraint), &state, limits()).unwrap();
            assert_eq!(states.as_slice(), &[state.clone()]);
        }
    }

    #[test]
    fn test_opposite_bool_on_plain_value() {
        let mut values = ValueFactory::new();
        let v = values.fresh();

        let states = v
            .try_set_opposite_constraint(
                Some(Constraint::Bool(BoolConstraint::True)),
                &ProgramState::new(),
                limits(),
            )
            .unwrap();

        assert_eq!(states.len(), 1);
        assert!(states[0].has_constraint(&v, Constraint::Bool(BoolConstraint::False)));
    }

    #[test]
    fn test_wrapping_forces_has_value() {
        let mut values = ValueFactory::new();
        let v = values.create(Some(&TestType { optional: true }));
        let inner = v.wrapped().unwrap().clone();

        let states = v
            .try_set_constraint(
                Some(Constraint::Bool(BoolConstraint::True)),
                &ProgramState::new(),
                limits(),
            )
            .unwrap();

        assert_eq!(states.len(), 1);
        assert!(states[0].has_constraint(
            &v,
            Constraint::OptionalValue(OptionalValueConstraint::HasValue)
        ));
        assert!(states[0].has_constraint(&inner, Constraint::Bool(BoolConstraint::True)));
    }

    #[test]
    fn test_null_on_wrapping_means_no_value() {
        let mut values = ValueFactory::new();
        let v = values.create(Some(&TestType { optional: true }));

        let states = v
            .try_set_constraint(
                Some(Constraint::Object(ObjectConstraint::Null)),
                &ProgramState::new(),
                limits(),
            )
            .unwrap();

        assert_eq!(states.len(), 1);
        assert!(states[0].has_constraint(
            &v,
            Constraint::OptionalValue(OptionalValueConstraint::NoValue)
        ));
    }

    #[test]
    fn test_conflicting_has_value_is_infeasible() {
        let mut values = ValueFactory::new();
        let v = values.create(Some(&TestType { optional: true }));
        let state = ProgramState::new()
            .set_constraint(&v, Constraint::OptionalValue(OptionalValueConstraint::NoValue));

        let states = v
            .try_set_constraint(Some(Constraint::Bool(BoolConstraint::True)), &state, limits())
            .unwrap();

        assert!(states.is_empty());
    }

    #[test]
    fn test_opposite_bool_on_wrapping_fans_out() {
        let mut values = ValueFactory::new();
        let v = values.create(Some(&TestType { optional: true }));
        let inner = v.wrapped().unwrap().clone();

        let states = v
            .try_set_opposite_constraint(
                Some(Constraint::Bool(BoolConstraint::True)),
                &ProgramState::new(),
                limits(),
            )
            .unwrap();

        assert_eq!(states.len(), 2);
        assert!(states[0].has_constraint(&inner, Constraint::Bool(BoolConstraint::False)));
        assert!(states[1].has_constraint(
            &v,
            Constraint::OptionalValue(OptionalValueConstraint::NoValue)
        ));
    }

    #[test]
    fn test_opposite_bool_on_wrapping_prunes_infeasible_half() {
        let mut values = ValueFactory::new();
        let v = values.create(Some(&TestType { optional: true }));
        let state = ProgramState::new().set_constraint(
            &v,
            Constraint::OptionalValue(OptionalValueConstraint::HasValue),
        );

        let states = v
            .try_set_opposite_constraint(
                Some(Constraint::Bool(BoolConstraint::True)),
                &state,
                limits(),
            )
            .unwrap();

        // The no-value half contradicts HasValue, only the negated-bool
        // outcome survives.
        assert_eq!(states.len(), 1);
        assert!(states[0].has_constraint(
            &v,
            Constraint::OptionalValue(OptionalValueConstraint::HasValue)
        ));
    }

    #[test]
    fn test_empty_bundle_is_noop() {
        let mut values = ValueFactory::new();
        let v = values.fresh();
        let state = ProgramState::new().set_constraint(&v, Constraint::Bool(BoolConstraint::True));

        let states = v
            .try_set_constraints(&ConstraintSet::new(), &state, limits())
            .unwrap();

        assert_eq!(states.as_slice(), &[state]);
    }

    #[test]
    fn test_bundle_folds_all_families() {
        let mut values = ValueFactory::new();
        let v = values.fresh();
        let bundle: ConstraintSet = [
            Constraint::Bool(BoolConstraint::True),
            Constraint::Object(ObjectConstraint::NotNull),
        ]
        .into_iter()
        .collect();

        let states = v
            .try_set_constraints(&bundle, &ProgramState::new(), limits())
            .unwrap();

        assert_eq!(states.len(), 1);
        assert!(states[0].has_constraint(&v, Constraint::Bool(BoolConstraint::True)));
    }

    #[test]
    fn test_state_limit_trips() {
        let mut values = ValueFactory::new();
        let v = values.create(Some(&TestType { optional: true }));
        let tight = ExplorationLimits {
            max_internal_states: 2,
        };
        let bundle: ConstraintSet = [Constraint::Bool(BoolConstraint::True)].into_iter().collect();

        let result = v.try_set_opposite_constraints(&bundle, &ProgramState::new(), tight);

        assert_eq!(
            result,
            Err(StateLimitExceeded { count: 2, limit: 2 })
        );
    }

    #[test]
    #[should_panic(expected = "object constraint")]
    fn test_object_constraint_over_opaque_record_is_a_programming_error() {
        let mut values = ValueFactory::new();
        let v = values.fresh();
        // Only a driver-recorded opaque fact, no bool/object history.
        let state = ProgramState::new().set_constraint(
            &v,
            Constraint::Disposable(crate::symbolic::DisposableConstraint::Disposed),
        );

        let _ = v.try_set_constraint(
            Some(Constraint::Object(ObjectConstraint::NotNull)),
            &state,
            limits(),
        );
    }
}
