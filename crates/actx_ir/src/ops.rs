//! Operator kinds.

/// Non-short-circuit binary operators.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    AddChecked,
    Subtract,
    SubtractChecked,
    Multiply,
    MultiplyChecked,
    Divide,
    Modulo,
    Power,
    LeftShift,
    RightShift,
    And,
    Or,
    ExclusiveOr,
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
}

impl BinaryOp {
    pub fn as_symbol(self) -> &'static str {
        match self {
            BinaryOp::Add | BinaryOp::AddChecked => "+",
            BinaryOp::Subtract | BinaryOp::SubtractChecked => "-",
            BinaryOp::Multiply | BinaryOp::MultiplyChecked => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Modulo => "%",
            BinaryOp::Power => "**",
            BinaryOp::LeftShift => "<<",
            BinaryOp::RightShift => ">>",
            BinaryOp::And => "&",
            BinaryOp::Or => "|",
            BinaryOp::ExclusiveOr => "^",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::LessThan => "<",
            BinaryOp::LessThanOrEqual => "<=",
            BinaryOp::GreaterThan => ">",
            BinaryOp::GreaterThanOrEqual => ">=",
        }
    }

    /// Operators that fault instead of wrapping on overflow.
    pub fn is_checked(self) -> bool {
        matches!(
            self,
            BinaryOp::AddChecked | BinaryOp::SubtractChecked | BinaryOp::MultiplyChecked
        )
    }

    /// `==` and `!=`.
    pub fn is_equality(self) -> bool {
        matches!(self, BinaryOp::Equal | BinaryOp::NotEqual)
    }

    /// `<`, `<=`, `>`, `>=`.
    pub fn is_ordering(self) -> bool {
        matches!(
            self,
            BinaryOp::LessThan
                | BinaryOp::LessThanOrEqual
                | BinaryOp::GreaterThan
                | BinaryOp::GreaterThanOrEqual
        )
    }

    pub fn is_comparison(self) -> bool {
        self.is_equality() || self.is_ordering()
    }

    pub fn is_shift(self) -> bool {
        matches!(self, BinaryOp::LeftShift | BinaryOp::RightShift)
    }

    /// The operator with overflow checking removed.
    #[must_use]
    pub fn unchecked(self) -> BinaryOp {
        match self {
            BinaryOp::AddChecked => BinaryOp::Add,
            BinaryOp::SubtractChecked => BinaryOp::Subtract,
            BinaryOp::MultiplyChecked => BinaryOp::Multiply,
            other => other,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Negate,
    NegateChecked,
    /// Logical not on `bool`, bitwise complement on integers.
    Not,
    OnesComplement,
    UnaryPlus,
    Increment,
    Decrement,
}

impl UnaryOp {
    pub fn as_symbol(self) -> &'static str {
        match self {
            UnaryOp::Negate | UnaryOp::NegateChecked => "-",
            UnaryOp::Not => "!",
            UnaryOp::OnesComplement => "~",
            UnaryOp::UnaryPlus => "+",
            UnaryOp::Increment => "++",
            UnaryOp::Decrement => "--",
        }
    }

    pub fn is_checked(self) -> bool {
        matches!(self, UnaryOp::NegateChecked)
    }
}

/// Short-circuit boolean operators.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LogicalOp {
    AndAlso,
    OrElse,
}

impl LogicalOp {
    pub fn as_symbol(self) -> &'static str {
        match self {
            LogicalOp::AndAlso => "&&",
            LogicalOp::OrElse => "||",
        }
    }

    /// The left value that decides the result without reading the right.
    pub fn short_circuits_on(self) -> bool {
        matches!(self, LogicalOp::OrElse)
    }
}
