//! Symbolic value and constraint subsystem.
//!
//! This is the path-sensitive half of the engine:
//! - Constraint families: closed sets of mutually exclusive facts
//! - Symbolic values: identity-tracked abstract values, plain or wrapping
//! - Program state: the persistent fact mapping along one explored path
//!
//! The worklist driver applies instruction semantics by calling the
//! `try_set_*` operations and branching or pruning exploration according to
//! how many states come back.

mod constraints;
mod state;
mod value;

pub use constraints::{
    BoolConstraint, CapacityConstraint, Constraint, ConstraintFamily, ConstraintSet,
    DisposableConstraint, ObjectConstraint, OptionalValueConstraint,
};
pub use state::ProgramState;
pub use value::{
    ExplorationLimits, StateLimitExceeded, StateVec, StaticType, SymbolicValue, ValueFactory,
    ValueId, MAX_INTERNAL_STATE_COUNT,
};
