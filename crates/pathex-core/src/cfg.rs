//! Control flow graph basic blocks and their traversal queries.
//!
//! Blocks are arena-indexed: a [`ControlFlowGraph`] owns a vector of
//! [`Block`]s addressed by [`BlockId`], built once by [`CfgBuilder`] and
//! immutable afterwards. Instructions are opaque handles owned by the
//! front-end; this module never looks inside them. Transitive successor and
//! predecessor sets, and the meaningful-successor link that skips synthetic
//! empty blocks, are computed once when the graph is frozen.

use std::collections::{HashSet, VecDeque};
use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;
use tracing::debug;

/// Index of a block inside its [`ControlFlowGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(u32);

impl BlockId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "b{}", self.0)
    }
}

/// How a block transfers control, fixed per block variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind<I> {
    /// Exactly one unconditional successor. `synthetic` marks an empty
    /// structural artifact that meaningful-successor queries skip over.
    Jump { target: BlockId, synthetic: bool },
    /// A condition instruction with labeled true and false successors.
    Branch {
        condition: I,
        true_target: BlockId,
        false_target: BlockId,
    },
    /// Terminal block, no successors.
    Exit,
}

impl<I> BlockKind<I> {
    fn successor_ids(&self) -> SmallVec<[BlockId; 2]> {
        match self {
            BlockKind::Jump { target, .. } => SmallVec::from_slice(&[*target]),
            BlockKind::Branch {
                true_target,
                false_target,
                ..
            } => SmallVec::from_slice(&[*true_target, *false_target]),
            BlockKind::Exit => SmallVec::new(),
        }
    }
}

/// An immutable basic block: a straight-line instruction sequence plus its
/// control edges and memoized closure sets.
#[derive(Debug, Clone)]
pub struct Block<I> {
    id: BlockId,
    instructions: SmallVec<[I; 4]>,
    kind: BlockKind<I>,
    predecessors: Vec<BlockId>,
    all_successors: HashSet<BlockId>,
    all_predecessors: HashSet<BlockId>,
    meaningful_successor: BlockId,
}

impl<I> Block<I> {
    pub fn id(&self) -> BlockId {
        self.id
    }

    /// The ordered instruction sequence, stable for the block's lifetime.
    pub fn instructions(&self) -> &[I] {
        &self.instructions
    }

    pub fn kind(&self) -> &BlockKind<I> {
        &self.kind
    }

    /// Immediate successors. For a branch block the order is true-edge then
    /// false-edge, but callers that need branch meaning should read the
    /// labeled targets on [`BlockKind::Branch`] instead of relying on it.
    pub fn successors(&self) -> SmallVec<[BlockId; 2]> {
        self.kind.successor_ids()
    }

    /// Immediate predecessors, frozen at graph construction.
    pub fn predecessors(&self) -> &[BlockId] {
        &self.predecessors
    }

    /// Every block reachable from this one, loops included.
    pub fn all_successors(&self) -> &HashSet<BlockId> {
        &self.all_successors
    }

    /// Every block this one is reachable from.
    pub fn all_predecessors(&self) -> &HashSet<BlockId> {
        &self.all_predecessors
    }

    /// The block that actually runs next: this block itself, unless it is a
    /// synthetic empty jump, in which case the first non-synthetic block at
    /// the end of the jump chain.
    pub fn next_meaningful_successor(&self) -> BlockId {
        self.meaningful_successor
    }

    /// The condition instruction of a branch block.
    pub fn branch_condition(&self) -> Option<&I> {
        match &self.kind {
            BlockKind::Branch { condition, .. } => Some(condition),
            _ => None,
        }
    }

    pub fn is_exit(&self) -> bool {
        matches!(self.kind, BlockKind::Exit)
    }

    fn is_transparent(&self) -> bool {
        matches!(self.kind, BlockKind::Jump { synthetic: true, .. }) && self.instructions.is_empty()
    }
}

/// Construction-time validation failures surfaced by [`CfgBuilder::build`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CfgError {
    #[error("block {block} was never given a terminator")]
    MissingTerminator { block: BlockId },
    #[error("block {block} targets undefined block {target}")]
    UndefinedTarget { block: BlockId, target: BlockId },
}

struct BuilderBlock<I> {
    instructions: SmallVec<[I; 4]>,
    kind: Option<BlockKind<I>>,
}

/// Mutable wiring stage of a [`ControlFlowGraph`].
///
/// The builder is consumed by [`build`](Self::build), so a frozen graph can
/// never be wired further; mutation-after-freeze is unrepresentable rather
/// than checked at runtime.
pub struct CfgBuilder<I> {
    blocks: Vec<BuilderBlock<I>>,
}

impl<I> Default for CfgBuilder<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I> CfgBuilder<I> {
    pub fn new() -> Self {
        Self { blocks: Vec::new() }
    }

    /// Reserve a new block. Its terminator is set later, which lets forward
    /// jump targets be allocated before their sources are finished.
    pub fn add_block(&mut self) -> BlockId {
        let id = BlockId(self.blocks.len() as u32);
        self.blocks.push(BuilderBlock {
            instructions: SmallVec::new(),
            kind: None,
        });
        id
    }

    /// Append an instruction handle to `block`.
    pub fn push_instruction(&mut self, block: BlockId, instruction: I) {
        self.blocks[block.index()].instructions.push(instruction);
    }

    pub fn set_jump(&mut self, block: BlockId, target: BlockId) {
        self.blocks[block.index()].kind = Some(BlockKind::Jump {
            target,
            synthetic: false,
        });
    }

    /// A jump marking a structural artifact (empty branch arm, lowered
    /// construct) that meaningful-successor queries should skip.
    pub fn set_synthetic_jump(&mut self, block: BlockId, target: BlockId) {
        self.blocks[block.index()].kind = Some(BlockKind::Jump {
            target,
            synthetic: true,
        });
    }

    pub fn set_branch(
        &mut self,
        block: BlockId,
        condition: I,
        true_target: BlockId,
        false_target: BlockId,
    ) {
        self.blocks[block.index()].kind = Some(BlockKind::Branch {
            condition,
            true_target,
            false_target,
        });
    }

    pub fn set_exit(&mut self, block: BlockId) {
        self.blocks[block.index()].kind = Some(BlockKind::Exit);
    }

    /// Validate the wiring and freeze it into an immutable graph, computing
    /// predecessors, both transitive closures, and the meaningful-successor
    /// links.
    pub fn build(self) -> Result<ControlFlowGraph<I>, CfgError> {
        let count = self.blocks.len();

        let mut kinds = Vec::with_capacity(count);
        let mut instructions = Vec::with_capacity(count);
        for (index, block) in self.blocks.into_iter().enumerate() {
            let id = BlockId(index as u32);
            let kind = block
                .kind
                .ok_or(CfgError::MissingTerminator { block: id })?;
            for target in kind.successor_ids() {
                if target.index() >= count {
                    return Err(CfgError::UndefinedTarget { block: id, target });
                }
            }
            kinds.push(kind);
            instructions.push(block.instructions);
        }

        let successors: Vec<SmallVec<[BlockId; 2]>> =
            kinds.iter().map(BlockKind::successor_ids).collect();

        let mut predecessors: Vec<Vec<BlockId>> = vec![Vec::new(); count];
        for (index, succs) in successors.iter().enumerate() {
            let from = BlockId(index as u32);
            for target in succs {
                let preds = &mut predecessors[target.index()];
                if !preds.contains(&from) {
                    preds.push(from);
                }
            }
        }

        let mut blocks = Vec::with_capacity(count);
        for (index, (kind, instructions)) in kinds.into_iter().zip(instructions).enumerate() {
            let id = BlockId(index as u32);
            blocks.push(Block {
                id,
                instructions,
                kind,
                predecessors: predecessors[index].clone(),
                all_successors: transitive(&successors, id),
                all_predecessors: transitive(&predecessors, id),
                meaningful_successor: id,
            });
        }

        resolve_meaningful_successors(&mut blocks);

        debug!(blocks = count, "control flow graph frozen");
        Ok(ControlFlowGraph { blocks })
    }
}

/// Breadth-first closure over one edge relation, starting from the immediate
/// neighbors. The visited set guarantees termination on cyclic graphs; the
/// start block itself appears only when some cycle leads back to it.
fn transitive<E: AsRef<[BlockId]>>(neighbors: &[E], start: BlockId) -> HashSet<BlockId> {
    let mut seen = HashSet::new();
    let mut queue: VecDeque<BlockId> = neighbors[start.index()].as_ref().iter().copied().collect();
    while let Some(current) = queue.pop_front() {
        if !seen.insert(current) {
            continue;
        }
        queue.extend(neighbors[current.index()].as_ref().iter().copied());
    }
    seen
}

fn resolve_meaningful_successors<I>(blocks: &mut [Block<I>]) {
    for index in 0..blocks.len() {
        let mut current = BlockId(index as u32);
        let mut visited = HashSet::new();
        // Follow chains of synthetic empty jumps; a degenerate synthetic
        // cycle stops at the first revisit.
        while blocks[current.index()].is_transparent() && visited.insert(current) {
            let target = match blocks[current.index()].kind {
                BlockKind::Jump { target, .. } => target,
                _ => break,
            };
            if visited.contains(&target) {
                break;
            }
            current = target;
        }
        blocks[index].meaningful_successor = current;
    }
}

/// The frozen graph: a pure value shared read-only across all explored
/// paths of one analysis unit.
#[derive(Debug, Clone)]
pub struct ControlFlowGraph<I> {
    blocks: Vec<Block<I>>,
}

impl<I> ControlFlowGraph<I> {
    pub fn block(&self, id: BlockId) -> &Block<I> {
        &self.blocks[id.index()]
    }

    pub fn blocks(&self) -> impl Iterator<Item = &Block<I>> {
        self.blocks.iter()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
