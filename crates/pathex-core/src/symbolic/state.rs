//! Persistent program state: the constraints known to hold along one
//! explored path.
//!
//! A state is never mutated in place. Every constraint-affecting operation
//! returns a new state, so the worklist driver can branch exploration and
//! keep divergent states alive without aliasing. Equality compares the
//! whole value-to-constraints mapping, which is what lets the driver detect
//! already-visited states and stop its fixpoint iteration.

use indexmap::IndexMap;

use super::constraints::{Constraint, ConstraintFamily, ConstraintSet, ObjectConstraint};
use super::value::{SymbolicValue, ValueId};

/// Immutable snapshot of all known constraints along a single path.
///
/// One empty state is created at procedure entry; derived states are created
/// by [`set_constraint`](Self::set_constraint) and by the symbolic-value
/// operations, and dropped when their path is pruned or finishes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramState {
    constraints: IndexMap<ValueId, ConstraintSet>,
}

impl ProgramState {
    /// The empty state: nothing is known about any value.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `constraint` for `value`, replacing any previous member of the
    /// same family. Pure: returns the derived state, the receiver is
    /// untouched.
    #[must_use]
    pub fn set_constraint(&self, value: &SymbolicValue, constraint: Constraint) -> ProgramState {
        let mut constraints = self.constraints.clone();
        constraints.entry(value.id()).or_default().insert(constraint);
        ProgramState { constraints }
    }

    /// All constraints recorded for `value`, if any.
    pub fn constraints_for(&self, value: &SymbolicValue) -> Option<&ConstraintSet> {
        self.constraints.get(&value.id())
    }

    /// True when exactly `constraint` is recorded for `value`.
    pub fn has_constraint(&self, value: &SymbolicValue, constraint: Constraint) -> bool {
        self.constraints_for(value)
            .is_some_and(|set| set.contains(constraint))
    }

    /// The recorded member of `family` for `value`, if any.
    pub fn constraint_of(&self, value: &SymbolicValue, family: ConstraintFamily) -> Option<Constraint> {
        self.constraints_for(value).and_then(|set| set.get(family))
    }

    /// True when `value` is known to be null in this state.
    pub fn is_null(&self, value: &SymbolicValue) -> bool {
        self.has_constraint(value, Constraint::Object(ObjectConstraint::Null))
    }

    /// Number of values with at least one recorded constraint.
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Iterate over all tracked values and their constraint records.
    pub fn iter(&self) -> impl Iterator<Item = (ValueId, &ConstraintSet)> + '_ {
        self.constraints.iter().map(|(id, set)| (*id, set))
    }
}
