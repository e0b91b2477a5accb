//! # Pathex Core
//!
//! Path-sensitive symbolic execution core for static defect detection.
//!
//! The engine walks a method's control flow graph and, for every feasible
//! execution path, tracks logical facts (constraints) about abstract values
//! (symbolic values). Defect-detection rules query those facts to decide
//! whether a bug pattern holds on some or all paths.
//!
//! ## Modules
//!
//! - **[`cfg`]** - Basic blocks, the graph builder, and traversal/closure queries
//! - **[`symbolic`]** - Symbolic values, constraint families, and program state
//!
//! The front-end that lowers source code into instructions and the worklist
//! driver that schedules block visits live outside this crate; both consume
//! the primitives defined here.
//!
//! ## Quick Start
//!
//! ```rust
//! use pathex_core::prelude::*;
//!
//! let mut values = ValueFactory::new();
//! let v = values.fresh();
//!
//! // On a path where v is not null, learning "v is true" is feasible.
//! let state = ProgramState::new().set_constraint(&v, Constraint::Object(ObjectConstraint::NotNull));
//! let states = v
//!     .try_set_constraint(
//!         Some(Constraint::Bool(BoolConstraint::True)),
//!         &state,
//!         ExplorationLimits::default(),
//!     )
//!     .unwrap();
//! assert_eq!(states.len(), 1);
//!
//! // On a path where v is null, the same fact prunes the branch.
//! let state = ProgramState::new().set_constraint(&v, Constraint::Object(ObjectConstraint::Null));
//! let states = v
//!     .try_set_constraint(
//!         Some(Constraint::Bool(BoolConstraint::True)),
//!         &state,
//!         ExplorationLimits::default(),
//!     )
//!     .unwrap();
//! assert!(states.is_empty());
//! ```

pub mod cfg;
pub mod symbolic;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::cfg::{Block, BlockId, BlockKind, CfgBuilder, CfgError, ControlFlowGraph};
    pub use crate::symbolic::{
        BoolConstraint, CapacityConstraint, Constraint, ConstraintFamily, ConstraintSet,
        DisposableConstraint, ExplorationLimits, ObjectConstraint, OptionalValueConstraint,
        ProgramState, StateLimitExceeded, StateVec, StaticType, SymbolicValue, ValueFactory,
        ValueId,
    };
}

pub use cfg::{Block, BlockId, BlockKind, CfgBuilder, CfgError, ControlFlowGraph};
pub use symbolic::{
    Constraint, ConstraintFamily, ConstraintSet, ExplorationLimits, ProgramState,
    StateLimitExceeded, SymbolicValue, ValueFactory,
};
