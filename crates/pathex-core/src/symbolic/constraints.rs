//! Constraint families: closed sets of mutually exclusive facts about a
//! symbolic value.
//!
//! Each family is its own member enum; [`Constraint`] is the tagged union
//! over all of them. A program state stores at most one member per family
//! for any given value, so "x is True" and "x is False" can never coexist.
//! Adding a family is a compile-time-checked change: every decision point
//! matches exhaustively on the union.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Discriminant identifying which family a [`Constraint`] belongs to.
///
/// The `Ord` impl defines the canonical storage order inside a
/// [`ConstraintSet`], which keeps set equality structural.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConstraintFamily {
    Bool,
    Object,
    OptionalValue,
    Disposable,
    Capacity,
}

/// Boolean truth of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoolConstraint {
    True,
    False,
}

/// Nullness of a reference-like value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectConstraint {
    Null,
    NotNull,
}

/// Whether an optional container currently holds a value.
///
/// Only meaningful on wrapping symbolic values; plain values accept it as a
/// recorded-elsewhere no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionalValueConstraint {
    HasValue,
    NoValue,
}

/// Disposal state of a resource-like value. Tracked but not combined with
/// the other families in this core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisposableConstraint {
    Disposed,
    NotDisposed,
}

/// Emptiness of a collection-like value. Pass-through in this core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CapacityConstraint {
    Empty,
    NotEmpty,
}

/// A single fact about a symbolic value, drawn from one of the closed
/// constraint families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Constraint {
    Bool(BoolConstraint),
    Object(ObjectConstraint),
    OptionalValue(OptionalValueConstraint),
    Disposable(DisposableConstraint),
    Capacity(CapacityConstraint),
}

impl Constraint {
    /// The family this constraint belongs to.
    pub fn family(self) -> ConstraintFamily {
        match self {
            Constraint::Bool(_) => ConstraintFamily::Bool,
            Constraint::Object(_) => ConstraintFamily::Object,
            Constraint::OptionalValue(_) => ConstraintFamily::OptionalValue,
            Constraint::Disposable(_) => ConstraintFamily::Disposable,
            Constraint::Capacity(_) => ConstraintFamily::Capacity,
        }
    }

    /// The fact implied by a logical negation of this one (`!x` semantics):
    /// the other member of the same family.
    pub fn negated(self) -> Constraint {
        match self {
            Constraint::Bool(BoolConstraint::True) => Constraint::Bool(BoolConstraint::False),
            Constraint::Bool(BoolConstraint::False) => Constraint::Bool(BoolConstraint::True),
            Constraint::Object(ObjectConstraint::Null) => {
                Constraint::Object(ObjectConstraint::NotNull)
            }
            Constraint::Object(ObjectConstraint::NotNull) => {
                Constraint::Object(ObjectConstraint::Null)
            }
            Constraint::OptionalValue(OptionalValueConstraint::HasValue) => {
                Constraint::OptionalValue(OptionalValueConstraint::NoValue)
            }
            Constraint::OptionalValue(OptionalValueConstraint::NoValue) => {
                Constraint::OptionalValue(OptionalValueConstraint::HasValue)
            }
            Constraint::Disposable(DisposableConstraint::Disposed) => {
                Constraint::Disposable(DisposableConstraint::NotDisposed)
            }
            Constraint::Disposable(DisposableConstraint::NotDisposed) => {
                Constraint::Disposable(DisposableConstraint::Disposed)
            }
            Constraint::Capacity(CapacityConstraint::Empty) => {
                Constraint::Capacity(CapacityConstraint::NotEmpty)
            }
            Constraint::Capacity(CapacityConstraint::NotEmpty) => {
                Constraint::Capacity(CapacityConstraint::Empty)
            }
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Constraint::Bool(BoolConstraint::True) => "True",
            Constraint::Bool(BoolConstraint::False) => "False",
            Constraint::Object(ObjectConstraint::Null) => "Null",
            Constraint::Object(ObjectConstraint::NotNull) => "NotNull",
            Constraint::OptionalValue(OptionalValueConstraint::HasValue) => "HasValue",
            Constraint::OptionalValue(OptionalValueConstraint::NoValue) => "NoValue",
            Constraint::Disposable(DisposableConstraint::Disposed) => "Disposed",
            Constraint::Disposable(DisposableConstraint::NotDisposed) => "NotDisposed",
            Constraint::Capacity(CapacityConstraint::Empty) => "Empty",
            Constraint::Capacity(CapacityConstraint::NotEmpty) => "NotEmpty",
        };
        f.write_str(name)
    }
}

/// The per-value constraint record: at most one member per family.
///
/// Inserting a constraint replaces the previous member of its family.
/// Entries stay sorted by [`ConstraintFamily`] order, so two sets built in
/// different insertion orders compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstraintSet {
    entries: SmallVec<[Constraint; 2]>,
}

impl ConstraintSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `constraint`, replacing any existing member of its family.
    pub fn insert(&mut self, constraint: Constraint) {
        match self
            .entries
            .binary_search_by_key(&constraint.family(), |c| c.family())
        {
            Ok(i) => self.entries[i] = constraint,
            Err(i) => self.entries.insert(i, constraint),
        }
    }

    /// Pure variant of [`insert`](Self::insert); returns the updated set.
    pub fn with(&self, constraint: Constraint) -> Self {
        let mut set = self.clone();
        set.insert(constraint);
        set
    }

    /// The recorded member of `family`, if any.
    pub fn get(&self, family: ConstraintFamily) -> Option<Constraint> {
        self.entries.iter().copied().find(|c| c.family() == family)
    }

    /// True when exactly `constraint` is recorded for its family.
    pub fn contains(&self, constraint: Constraint) -> bool {
        self.get(constraint.family()) == Some(constraint)
    }

    pub fn iter(&self) -> impl Iterator<Item = Constraint> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<Constraint> for ConstraintSet {
    fn from_iter<T: IntoIterator<Item = Constraint>>(iter: T) -> Self {
        let mut set = ConstraintSet::new();
        for constraint in iter {
            set.insert(constraint);
        }
        set
    }
}
