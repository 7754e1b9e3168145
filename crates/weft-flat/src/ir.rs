//! The flat program model: labeled chunks with explicit control transfer.

use indexmap::IndexMap;

/// The synthetic termination label. Never a chunk key; control reaching it
/// means the machine instance has finished.
pub const END_LABEL: &str = "end";

/// A flat statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlatStmt {
    /// `lhs = rhs`
    Assign { lhs: FlatExpr, rhs: FlatExpr },
    /// Checked boolean condition.
    Assert(FlatExpr),
    /// Explicit jump to a label.
    Goto(String),
}

/// A flat expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlatExpr {
    /// Identifier reference.
    Ident(String),
    /// Integer literal.
    Int(i64),
    /// Binary operation.
    Binary {
        op: FlatBinOp,
        lhs: Box<FlatExpr>,
        rhs: Box<FlatExpr>,
    },
}

impl FlatExpr {
    pub fn ident(id: impl Into<String>) -> Self {
        FlatExpr::Ident(id.into())
    }

    pub fn binary(op: FlatBinOp, lhs: FlatExpr, rhs: FlatExpr) -> Self {
        FlatExpr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }
}

/// Binary operators of the flat subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlatBinOp {
    Plus,
    Eq,
}

/// A flattened function body.
///
/// Chunks are keyed by label in declaration order; declaration order is
/// meaningful because control falls through from each chunk to the next
/// declared label unless redirected by a goto.
#[derive(Debug, Clone, Default)]
pub struct FlatProgram {
    pub chunks: IndexMap<String, Vec<FlatStmt>>,
    /// Label of the entry chunk.
    pub start: String,
}

impl FlatProgram {
    /// Declared labels in order. Does not include [`END_LABEL`].
    pub fn labels(&self) -> Vec<String> {
        self.chunks.keys().cloned().collect()
    }
}

/// Incremental builder for a [`FlatProgram`].
///
/// Keeps a current-chunk accumulator and a monotonically increasing label
/// counter; suspension points cut the accumulator.
#[derive(Debug)]
pub struct FlatProgramBuilder {
    program: FlatProgram,
    current: String,
    counter: usize,
}

impl FlatProgramBuilder {
    pub fn new() -> Self {
        let mut builder = Self {
            program: FlatProgram::default(),
            current: String::new(),
            counter: 0,
        };
        builder.open_chunk();
        builder.program.start = builder.current.clone();
        builder
    }

    /// Append a statement to the current chunk.
    pub fn append(&mut self, stmt: FlatStmt) {
        self.program
            .chunks
            .entry(self.current.clone())
            .or_default()
            .push(stmt);
    }

    /// Start a new chunk under a fresh label, unless the current chunk is
    /// still empty (prevents degenerate unreachable chunks).
    pub fn cut_block(&mut self) {
        let current_is_empty = self
            .program
            .chunks
            .get(&self.current)
            .is_some_and(|chunk| chunk.is_empty());
        if current_is_empty {
            return;
        }
        self.open_chunk();
    }

    pub fn finish(self) -> FlatProgram {
        self.program
    }

    fn open_chunk(&mut self) {
        let label = format!("P{}", self.counter);
        self.counter += 1;
        self.program.chunks.insert(label.clone(), Vec::new());
        self.current = label;
    }
}

impl Default for FlatProgramBuilder {
    fn default() -> Self {
        Self::new()
    }
}
