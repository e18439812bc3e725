//! Type descriptors and the combination rules applied while expressions are
//! being parsed.
//!
//! A [`TypeDescriptor`] is a value: base kind, array dimensionality layered on
//! top of it, and a data-only provenance flag. Every expression node carries
//! one, fully determined by its children at the moment the node is built.
//!
//! The `illegal` base kind marks a node whose error has already been
//! reported; it propagates through every combination without producing a
//! second report for the same subtree.

use std::fmt;

use thiserror::Error;

/// Scalar/container category of an expression's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseKind {
    Int,
    Real,
    Vector,
    RowVector,
    Matrix,
    /// Type not yet determined.
    Unresolved,
    /// Already reported as erroneous; suppresses cascading reports.
    Illegal,
}

impl BaseKind {
    /// Int or real.
    pub fn is_scalar(self) -> bool {
        matches!(self, BaseKind::Int | BaseKind::Real)
    }

    /// Vector, row_vector, or matrix.
    pub fn is_container(self) -> bool {
        matches!(self, BaseKind::Vector | BaseKind::RowVector | BaseKind::Matrix)
    }

    /// Number of index positions the container kind itself provides.
    fn extents(self) -> usize {
        match self {
            BaseKind::Matrix => 2,
            BaseKind::Vector | BaseKind::RowVector => 1,
            _ => 0,
        }
    }
}

impl fmt::Display for BaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BaseKind::Int => "int",
            BaseKind::Real => "real",
            BaseKind::Vector => "vector",
            BaseKind::RowVector => "row_vector",
            BaseKind::Matrix => "matrix",
            BaseKind::Unresolved => "<unresolved>",
            BaseKind::Illegal => "<illegal>",
        };
        f.write_str(s)
    }
}

/// Type of an expression: base kind, array dimensionality, provenance.
///
/// `data_only` is true iff the value can only ever depend on input data,
/// never on a model parameter. Literals are data-only; a combination is
/// data-only iff all of its operands are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
    pub base: BaseKind,
    pub dims: usize,
    pub data_only: bool,
}

impl Default for TypeDescriptor {
    fn default() -> Self {
        TypeDescriptor::new(BaseKind::Unresolved, 0, false)
    }
}

impl TypeDescriptor {
    pub fn new(base: BaseKind, dims: usize, data_only: bool) -> Self {
        Self {
            base,
            dims,
            data_only,
        }
    }

    /// Scalar int; literals get `data_only = true`.
    pub fn int(data_only: bool) -> Self {
        Self::new(BaseKind::Int, 0, data_only)
    }

    /// Scalar real.
    pub fn real(data_only: bool) -> Self {
        Self::new(BaseKind::Real, 0, data_only)
    }

    /// An already-reported erroneous type; provenance is still tracked so
    /// later provenance checks stay quiet about this subtree.
    pub fn illegal(data_only: bool) -> Self {
        Self::new(BaseKind::Illegal, 0, data_only)
    }

    /// Scalar int, the only type accepted in a bracketed dimension list.
    pub fn is_int(&self) -> bool {
        self.base == BaseKind::Int && self.dims == 0
    }

    /// One-dimensional int array, the shape of a multi-index.
    pub fn is_int_array(&self) -> bool {
        self.base == BaseKind::Int && self.dims == 1
    }

    /// Scalar int or real.
    pub fn is_primitive(&self) -> bool {
        self.dims == 0 && self.base.is_scalar()
    }

    pub fn is_illegal(&self) -> bool {
        self.base == BaseKind::Illegal
    }

    fn is_opaque(&self) -> bool {
        matches!(self.base, BaseKind::Illegal | BaseKind::Unresolved)
    }

    /// Total number of index positions: array dimensions first, then the
    /// container's own extents.
    pub fn index_positions(&self) -> usize {
        self.dims + self.base.extents()
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base)?;
        if self.dims > 0 {
            write!(f, "[{}]", ",".repeat(self.dims - 1))?;
        }
        Ok(())
    }
}

// =============================================================================
// Operators
// =============================================================================

/// Binary operators with arithmetic combination rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Mul,
    Div,
    Mod,
    LeftDiv,
    EltMul,
    EltDiv,
    Pow,
    Add,
    Sub,
}

impl ArithOp {
    /// Surface syntax, for diagnostics.
    pub fn symbol(self) -> &'static str {
        match self {
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
            ArithOp::Mod => "%",
            ArithOp::LeftDiv => "\\",
            ArithOp::EltMul => ".*",
            ArithOp::EltDiv => "./",
            ArithOp::Pow => "^",
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
        }
    }

    /// Canonical function name the operator desugars to in the tree.
    pub fn canonical_name(self) -> &'static str {
        match self {
            ArithOp::Mul => "multiply",
            ArithOp::Div => "divide",
            ArithOp::Mod => "modulus",
            ArithOp::LeftDiv => "mdivide_left",
            ArithOp::EltMul => "elt_multiply",
            ArithOp::EltDiv => "elt_divide",
            ArithOp::Pow => "pow",
            ArithOp::Add => "add",
            ArithOp::Sub => "subtract",
        }
    }
}

/// Binary operators yielding an int truth value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    Or,
    And,
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
}

impl LogicalOp {
    pub fn symbol(self) -> &'static str {
        match self {
            LogicalOp::Or => "||",
            LogicalOp::And => "&&",
            LogicalOp::Eq => "==",
            LogicalOp::Neq => "!=",
            LogicalOp::Lt => "<",
            LogicalOp::Lte => "<=",
            LogicalOp::Gt => ">",
            LogicalOp::Gte => ">=",
        }
    }

    pub fn canonical_name(self) -> &'static str {
        match self {
            LogicalOp::Or => "logical_or",
            LogicalOp::And => "logical_and",
            LogicalOp::Eq => "logical_eq",
            LogicalOp::Neq => "logical_neq",
            LogicalOp::Lt => "logical_lt",
            LogicalOp::Lte => "logical_lte",
            LogicalOp::Gt => "logical_gt",
            LogicalOp::Gte => "logical_gte",
        }
    }
}

/// Prefix operators. `+` is the identity and builds no node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Minus,
    LogicalNot,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Minus => "-",
            UnaryOp::LogicalNot => "!",
        }
    }

    pub fn canonical_name(self) -> &'static str {
        match self {
            UnaryOp::Minus => "minus",
            UnaryOp::LogicalNot => "logical_negation",
        }
    }
}

/// Dimensionality effect class of one slice-index descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexShape {
    /// Single-element index: consumes the dimension.
    Single,
    /// Range, possibly open on either end: preserves the dimension.
    Range,
    /// Index by a value list: preserves the dimension.
    Multi,
}

// =============================================================================
// Errors
// =============================================================================

/// A type-combination failure. The parser decides per call site whether to
/// mark the node `illegal` and continue, or to abort the parse alternative.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("operator `{op}` cannot be applied to operands of type {lhs} and {rhs}")]
    BinaryMismatch {
        op: &'static str,
        lhs: TypeDescriptor,
        rhs: TypeDescriptor,
    },
    #[error("operator `{op}` cannot be applied to operand of type {ty}")]
    UnaryMismatch {
        op: &'static str,
        ty: TypeDescriptor,
    },
    #[error("index expression must have type int, found {ty}")]
    NonIntegerIndex { ty: TypeDescriptor },
    #[error("too many indexes for expression of type {ty}: at most {available} supported, found {supplied}")]
    TooManyIndexes {
        ty: TypeDescriptor,
        available: usize,
        supplied: usize,
    },
    #[error("cannot transpose expression of type {ty}")]
    TransposeNonContainer { ty: TypeDescriptor },
}

// =============================================================================
// Combination rules
// =============================================================================

fn opaque_result(a: &TypeDescriptor, b: &TypeDescriptor) -> TypeDescriptor {
    let base = if a.base == BaseKind::Illegal || b.base == BaseKind::Illegal {
        BaseKind::Illegal
    } else {
        BaseKind::Unresolved
    };
    TypeDescriptor::new(base, 0, a.data_only && b.data_only)
}

/// Combine two operand types under a binary arithmetic operator.
///
/// Arrays never take part in arithmetic: any operand with `dims > 0` is a
/// mismatch. Illegal/unresolved operands short-circuit without an error.
pub fn combine_arithmetic(
    op: ArithOp,
    a: &TypeDescriptor,
    b: &TypeDescriptor,
) -> Result<TypeDescriptor, TypeError> {
    use BaseKind::*;

    if a.is_opaque() || b.is_opaque() {
        return Ok(opaque_result(a, b));
    }

    let mismatch = || TypeError::BinaryMismatch {
        op: op.symbol(),
        lhs: *a,
        rhs: *b,
    };

    if a.dims > 0 || b.dims > 0 {
        return Err(mismatch());
    }

    let data_only = a.data_only && b.data_only;
    let base = match op {
        ArithOp::Mul => match (a.base, b.base) {
            (Int, Int) => Int,
            (x, y) if x.is_scalar() && y.is_scalar() => Real,
            (x, y) if x.is_scalar() && y.is_container() => y,
            (x, y) if x.is_container() && y.is_scalar() => x,
            (Vector, RowVector) => Matrix,
            (RowVector, Vector) => Real,
            (RowVector, Matrix) => RowVector,
            (Matrix, Vector) => Vector,
            (Matrix, Matrix) => Matrix,
            _ => return Err(mismatch()),
        },
        ArithOp::Div => match (a.base, b.base) {
            (Int, Int) => Int,
            (x, y) if x.is_scalar() && y.is_scalar() => Real,
            (x, y) if x.is_container() && y.is_scalar() => x,
            (RowVector, Matrix) => RowVector,
            (Matrix, Matrix) => Matrix,
            _ => return Err(mismatch()),
        },
        ArithOp::Mod => match (a.base, b.base) {
            (Int, Int) => Int,
            _ => return Err(mismatch()),
        },
        ArithOp::LeftDiv => match (a.base, b.base) {
            (Matrix, Vector) => Vector,
            (Matrix, Matrix) => Matrix,
            _ => return Err(mismatch()),
        },
        ArithOp::EltMul | ArithOp::EltDiv => match (a.base, b.base) {
            (Vector, Vector) => Vector,
            (RowVector, RowVector) => RowVector,
            (Matrix, Matrix) => Matrix,
            _ => return Err(mismatch()),
        },
        ArithOp::Pow => match (a.base, b.base) {
            (x, y) if x.is_scalar() && y.is_scalar() => Real,
            _ => return Err(mismatch()),
        },
        ArithOp::Add | ArithOp::Sub => match (a.base, b.base) {
            (Int, Int) => Int,
            (x, y) if x.is_scalar() && y.is_scalar() => Real,
            (x, y) if x == y && x.is_container() => x,
            _ => return Err(mismatch()),
        },
    };
    Ok(TypeDescriptor::new(base, 0, data_only))
}

/// Combine two operand types under a logical or comparison operator.
/// Both operands must be scalar; the result is int (boolean-as-int).
pub fn combine_logical(
    op: LogicalOp,
    a: &TypeDescriptor,
    b: &TypeDescriptor,
) -> Result<TypeDescriptor, TypeError> {
    if a.is_opaque() || b.is_opaque() {
        return Ok(opaque_result(a, b));
    }
    if a.is_primitive() && b.is_primitive() {
        Ok(TypeDescriptor::new(
            BaseKind::Int,
            0,
            a.data_only && b.data_only,
        ))
    } else {
        Err(TypeError::BinaryMismatch {
            op: op.symbol(),
            lhs: *a,
            rhs: *b,
        })
    }
}

/// Combine an operand type under a prefix operator.
pub fn combine_unary(op: UnaryOp, a: &TypeDescriptor) -> Result<TypeDescriptor, TypeError> {
    if a.is_opaque() {
        return Ok(*a);
    }
    match op {
        UnaryOp::Minus => {
            if a.dims == 0 && (a.base.is_scalar() || a.base.is_container()) {
                Ok(*a)
            } else {
                Err(TypeError::UnaryMismatch {
                    op: op.symbol(),
                    ty: *a,
                })
            }
        }
        UnaryOp::LogicalNot => {
            if a.is_primitive() {
                Ok(TypeDescriptor::new(BaseKind::Int, 0, a.data_only))
            } else {
                Err(TypeError::UnaryMismatch {
                    op: op.symbol(),
                    ty: *a,
                })
            }
        }
    }
}

/// Result type after applying `supplied` single-element indexes to `a`.
///
/// Array dimensions are consumed first, then the container's own extents: a
/// matrix yields a row_vector after one index and a scalar after two; a
/// vector or row_vector yields a scalar.
pub fn indexed(
    a: &TypeDescriptor,
    supplied: usize,
    data_only: bool,
) -> Result<TypeDescriptor, TypeError> {
    if a.is_opaque() {
        return Ok(TypeDescriptor::new(a.base, 0, data_only));
    }
    let available = a.index_positions();
    if supplied > available {
        return Err(TypeError::TooManyIndexes {
            ty: *a,
            available,
            supplied,
        });
    }
    let mut dims = a.dims;
    let mut base = a.base;
    for _ in 0..supplied {
        if dims > 0 {
            dims -= 1;
        } else {
            base = match base {
                BaseKind::Matrix => BaseKind::RowVector,
                BaseKind::Vector | BaseKind::RowVector => BaseKind::Real,
                // `available` bounds the loop; scalar kinds have no extents.
                other => other,
            };
        }
    }
    Ok(TypeDescriptor::new(base, dims, data_only))
}

/// Result type after applying a slice-index list to `a`, one descriptor per
/// position in order. Single-element descriptors consume a position;
/// range and multi descriptors preserve it.
pub fn sliced(
    a: &TypeDescriptor,
    shapes: &[IndexShape],
    data_only: bool,
) -> Result<TypeDescriptor, TypeError> {
    if a.is_opaque() {
        return Ok(TypeDescriptor::new(a.base, 0, data_only));
    }
    let available = a.index_positions();
    if shapes.len() > available {
        return Err(TypeError::TooManyIndexes {
            ty: *a,
            available,
            supplied: shapes.len(),
        });
    }

    let take = shapes.len().min(a.dims);
    let (array_part, container_part) = shapes.split_at(take);
    let dims = a.dims
        - array_part
            .iter()
            .filter(|s| matches!(s, IndexShape::Single))
            .count();

    let single = |s: &IndexShape| matches!(s, IndexShape::Single);
    let base = match (a.base, container_part) {
        (base, []) => base,
        (BaseKind::Vector, [s]) if single(s) => BaseKind::Real,
        (BaseKind::Vector, [_]) => BaseKind::Vector,
        (BaseKind::RowVector, [s]) if single(s) => BaseKind::Real,
        (BaseKind::RowVector, [_]) => BaseKind::RowVector,
        (BaseKind::Matrix, [s]) if single(s) => BaseKind::RowVector,
        (BaseKind::Matrix, [_]) => BaseKind::Matrix,
        (BaseKind::Matrix, [r, c]) => match (single(r), single(c)) {
            (true, true) => BaseKind::Real,
            (true, false) => BaseKind::RowVector,
            (false, true) => BaseKind::Vector,
            (false, false) => BaseKind::Matrix,
        },
        // `available` rules out anything longer than the container's extents.
        (base, _) => base,
    };
    Ok(TypeDescriptor::new(base, dims, data_only))
}

/// Result type of the postfix transpose operator.
pub fn transposed(a: &TypeDescriptor) -> Result<TypeDescriptor, TypeError> {
    if a.is_opaque() {
        return Ok(*a);
    }
    if a.dims > 0 {
        return Err(TypeError::TransposeNonContainer { ty: *a });
    }
    let base = match a.base {
        BaseKind::Vector => BaseKind::RowVector,
        BaseKind::RowVector => BaseKind::Vector,
        BaseKind::Matrix => BaseKind::Matrix,
        _ => return Err(TypeError::TransposeNonContainer { ty: *a }),
    };
    Ok(TypeDescriptor::new(base, 0, a.data_only))
}
