//! Variables, linear expressions and constraints.

use std::fmt;

/// Position of a variable in the problem's fixed ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarId(pub usize);

impl VarId {
    /// Index into value vectors.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

/// Variable type for mixed-integer problems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VarType {
    /// Continuous variable
    Continuous,
    /// Integer variable
    #[default]
    Integer,
    /// Binary variable (0 or 1)
    Binary,
}

impl VarType {
    /// Whether the integrality test applies to this type.
    pub fn is_integer(self) -> bool {
        matches!(self, VarType::Integer | VarType::Binary)
    }
}

/// A scalar decision variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    /// Display name
    pub name: String,
    /// Integrality requirement
    pub var_type: VarType,
}

impl Variable {
    /// Integer-constrained variable.
    pub fn integer(name: impl Into<String>) -> Self {
        Self { name: name.into(), var_type: VarType::Integer }
    }

    /// Continuous variable, never branched on.
    pub fn continuous(name: impl Into<String>) -> Self {
        Self { name: name.into(), var_type: VarType::Continuous }
    }

    /// Binary variable with implicit bounds `0 <= x <= 1`.
    pub fn binary(name: impl Into<String>) -> Self {
        Self { name: name.into(), var_type: VarType::Binary }
    }
}

/// Affine expression `sum(coef * x) + constant`.
///
/// Repeated terms on the same variable are summed when evaluated or
/// assembled into a matrix.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LinearExpr {
    terms: Vec<(VarId, f64)>,
    constant: f64,
}

impl LinearExpr {
    /// Empty expression (zero).
    pub fn new() -> Self {
        Self::default()
    }

    /// Expression from (variable, coefficient) pairs.
    pub fn from_terms(terms: impl IntoIterator<Item = (VarId, f64)>) -> Self {
        Self { terms: terms.into_iter().collect(), constant: 0.0 }
    }

    /// Add `coef * var`.
    pub fn term(mut self, var: VarId, coef: f64) -> Self {
        self.terms.push((var, coef));
        self
    }

    /// Set the constant offset.
    pub fn constant(mut self, constant: f64) -> Self {
        self.constant = constant;
        self
    }

    /// Terms in insertion order.
    pub fn terms(&self) -> &[(VarId, f64)] {
        &self.terms
    }

    /// Constant offset.
    pub fn offset(&self) -> f64 {
        self.constant
    }

    /// Value of the expression at `x`.
    pub fn evaluate(&self, x: &[f64]) -> f64 {
        self.constant + self.terms.iter().map(|&(var, coef)| coef * x[var.index()]).sum::<f64>()
    }
}

/// Constraint sense.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    /// `expr <= rhs`
    Le,
    /// `expr >= rhs`
    Ge,
    /// `expr == rhs`
    Eq,
}

/// A linear constraint `expr (<=|>=|==) rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    /// Left-hand side
    pub expr: LinearExpr,
    /// Relation between the sides
    pub sense: Sense,
    /// Right-hand side
    pub rhs: f64,
}

impl Constraint {
    /// `expr <= rhs`
    pub fn le(expr: LinearExpr, rhs: f64) -> Self {
        Self { expr, sense: Sense::Le, rhs }
    }

    /// `expr >= rhs`
    pub fn ge(expr: LinearExpr, rhs: f64) -> Self {
        Self { expr, sense: Sense::Ge, rhs }
    }

    /// `expr == rhs`
    pub fn eq(expr: LinearExpr, rhs: f64) -> Self {
        Self { expr, sense: Sense::Eq, rhs }
    }

    /// Check the constraint at `x` with absolute tolerance `tol`.
    pub fn is_satisfied(&self, x: &[f64], tol: f64) -> bool {
        let lhs = self.expr.evaluate(x);
        match self.sense {
            Sense::Le => lhs <= self.rhs + tol,
            Sense::Ge => lhs >= self.rhs - tol,
            Sense::Eq => (lhs - self.rhs).abs() <= tol,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluate() {
        // 2 x0 - x1 + x0 + 3
        let expr = LinearExpr::new()
            .term(VarId(0), 2.0)
            .term(VarId(1), -1.0)
            .term(VarId(0), 1.0)
            .constant(3.0);

        assert_eq!(expr.evaluate(&[1.0, 4.0]), 2.0);
        assert_eq!(expr.terms().len(), 3);
        assert_eq!(expr.offset(), 3.0);
    }

    #[test]
    fn test_constraint_satisfaction() {
        let expr = LinearExpr::from_terms([(VarId(0), 1.0), (VarId(1), 1.0)]);

        let le = Constraint::le(expr.clone(), 3.5);
        assert!(le.is_satisfied(&[2.0, 1.5], 1e-9));
        assert!(!le.is_satisfied(&[2.0, 2.0], 1e-9));

        let ge = Constraint::ge(expr.clone(), 3.0);
        assert!(ge.is_satisfied(&[2.0, 1.0], 1e-9));
        assert!(!ge.is_satisfied(&[1.0, 1.0], 1e-9));

        let eq = Constraint::eq(expr, 2.0);
        assert!(eq.is_satisfied(&[1.0, 1.0], 1e-9));
        assert!(!eq.is_satisfied(&[1.0, 1.5], 1e-9));
    }

    #[test]
    fn test_var_types() {
        assert!(Variable::integer("x").var_type.is_integer());
        assert!(Variable::binary("b").var_type.is_integer());
        assert!(!Variable::continuous("y").var_type.is_integer());
    }
}
