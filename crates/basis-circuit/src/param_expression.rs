// This code is part of Qiskit.
//
// (C) Copyright IBM 2024
//
// This code is licensed under the Apache License, Version 2.0. You may
// obtain a copy of this license in the LICENSE.txt file in the root directory
// of this source tree or at http://www.apache.org/licenses/LICENSE-2.0.
//
// Any modifications or derivative works of this code must retain this
// copyright notice, and modified files need to carry a notice indicating
// that they have been altered from the originals.

//! A minimal symbolic parameter algebra: named formal parameters, the constant
//! `pi`, and the four arithmetic combinators, closed under substitution.

use std::collections::HashSet;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A symbolic term over named formal parameters, or a concrete constant.
///
/// Equivalence templates carry `ParameterExpression`s built only from the
/// template's own formal parameters (see `EquivalenceLibrary::add`'s
/// `FreeParameter` check); at bind time every `Symbol` is replaced, either by
/// a concrete value (`bind`) or by another expression (`subst`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ParameterExpression {
    Constant(f64),
    Symbol(String),
    Pi,
    Neg(Box<ParameterExpression>),
    Add(Box<ParameterExpression>, Box<ParameterExpression>),
    Sub(Box<ParameterExpression>, Box<ParameterExpression>),
    Mul(Box<ParameterExpression>, Box<ParameterExpression>),
    Div(Box<ParameterExpression>, Box<ParameterExpression>),
}

impl ParameterExpression {
    pub fn constant(value: f64) -> Self {
        ParameterExpression::Constant(value)
    }

    pub fn symbol(name: impl Into<String>) -> Self {
        ParameterExpression::Symbol(name.into())
    }

    pub fn pi() -> Self {
        ParameterExpression::Pi
    }

    pub fn is_symbolic(&self) -> bool {
        !self.symbols().is_empty()
    }

    /// Every distinct formal-parameter name this expression references.
    pub fn symbols(&self) -> HashSet<String> {
        let mut out = HashSet::new();
        self.collect_symbols(&mut out);
        out
    }

    fn collect_symbols(&self, out: &mut HashSet<String>) {
        match self {
            ParameterExpression::Constant(_) | ParameterExpression::Pi => {}
            ParameterExpression::Symbol(name) => {
                out.insert(name.clone());
            }
            ParameterExpression::Neg(a) => a.collect_symbols(out),
            ParameterExpression::Add(a, b)
            | ParameterExpression::Sub(a, b)
            | ParameterExpression::Mul(a, b)
            | ParameterExpression::Div(a, b) => {
                a.collect_symbols(out);
                b.collect_symbols(out);
            }
        }
    }

    /// Numeric binding: replace `name` with a concrete scalar value.
    pub fn bind(&self, name: &str, value: f64) -> Self {
        self.subst(name, &ParameterExpression::Constant(value))
    }

    /// Symbolic substitution: replace every occurrence of `name` with `expr`.
    ///
    /// `bind` is the special case of `subst` where the replacement happens to
    /// be a constant; both dispatch through here so a single substitution
    /// path handles both a caller's concrete value and a caller's own
    /// parameter expression.
    pub fn subst(&self, name: &str, expr: &ParameterExpression) -> Self {
        match self {
            ParameterExpression::Constant(v) => ParameterExpression::Constant(*v),
            ParameterExpression::Pi => ParameterExpression::Pi,
            ParameterExpression::Symbol(s) => {
                if s == name {
                    expr.clone()
                } else {
                    self.clone()
                }
            }
            ParameterExpression::Neg(a) => ParameterExpression::Neg(Box::new(a.subst(name, expr))),
            ParameterExpression::Add(a, b) => {
                ParameterExpression::Add(Box::new(a.subst(name, expr)), Box::new(b.subst(name, expr)))
            }
            ParameterExpression::Sub(a, b) => {
                ParameterExpression::Sub(Box::new(a.subst(name, expr)), Box::new(b.subst(name, expr)))
            }
            ParameterExpression::Mul(a, b) => {
                ParameterExpression::Mul(Box::new(a.subst(name, expr)), Box::new(b.subst(name, expr)))
            }
            ParameterExpression::Div(a, b) => {
                ParameterExpression::Div(Box::new(a.subst(name, expr)), Box::new(b.subst(name, expr)))
            }
        }
    }

    /// Evaluate to a concrete `f64`, if every symbol has been bound away.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParameterExpression::Constant(v) => Some(*v),
            ParameterExpression::Pi => Some(std::f64::consts::PI),
            ParameterExpression::Symbol(_) => None,
            ParameterExpression::Neg(a) => a.as_f64().map(|v| -v),
            ParameterExpression::Add(a, b) => Some(a.as_f64()? + b.as_f64()?),
            ParameterExpression::Sub(a, b) => Some(a.as_f64()? - b.as_f64()?),
            ParameterExpression::Mul(a, b) => Some(a.as_f64()? * b.as_f64()?),
            ParameterExpression::Div(a, b) => Some(a.as_f64()? / b.as_f64()?),
        }
    }

    /// Fold constant sub-expressions without disturbing symbolic structure.
    pub fn simplify(&self) -> Self {
        if let Some(v) = self.as_f64() {
            return ParameterExpression::Constant(v);
        }
        match self {
            ParameterExpression::Neg(a) => ParameterExpression::Neg(Box::new(a.simplify())),
            ParameterExpression::Add(a, b) => {
                ParameterExpression::Add(Box::new(a.simplify()), Box::new(b.simplify()))
            }
            ParameterExpression::Sub(a, b) => {
                ParameterExpression::Sub(Box::new(a.simplify()), Box::new(b.simplify()))
            }
            ParameterExpression::Mul(a, b) => {
                ParameterExpression::Mul(Box::new(a.simplify()), Box::new(b.simplify()))
            }
            ParameterExpression::Div(a, b) => {
                ParameterExpression::Div(Box::new(a.simplify()), Box::new(b.simplify()))
            }
            other => other.clone(),
        }
    }
}

impl fmt::Display for ParameterExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterExpression::Constant(v) => write!(f, "{v}"),
            ParameterExpression::Pi => write!(f, "pi"),
            ParameterExpression::Symbol(s) => write!(f, "{s}"),
            ParameterExpression::Neg(a) => write!(f, "-({a})"),
            ParameterExpression::Add(a, b) => write!(f, "({a} + {b})"),
            ParameterExpression::Sub(a, b) => write!(f, "({a} - {b})"),
            ParameterExpression::Mul(a, b) => write!(f, "({a} * {b})"),
            ParameterExpression::Div(a, b) => write!(f, "({a} / {b})"),
        }
    }
}

impl Neg for ParameterExpression {
    type Output = ParameterExpression;
    fn neg(self) -> Self::Output {
        ParameterExpression::Neg(Box::new(self))
    }
}

impl Add for ParameterExpression {
    type Output = ParameterExpression;
    fn add(self, rhs: Self) -> Self::Output {
        ParameterExpression::Add(Box::new(self), Box::new(rhs))
    }
}

impl Sub for ParameterExpression {
    type Output = ParameterExpression;
    fn sub(self, rhs: Self) -> Self::Output {
        ParameterExpression::Sub(Box::new(self), Box::new(rhs))
    }
}

impl Mul for ParameterExpression {
    type Output = ParameterExpression;
    fn mul(self, rhs: Self) -> Self::Output {
        ParameterExpression::Mul(Box::new(self), Box::new(rhs))
    }
}

impl Div for ParameterExpression {
    type Output = ParameterExpression;
    fn div(self, rhs: Self) -> Self::Output {
        ParameterExpression::Div(Box::new(self), Box::new(rhs))
    }
}

/// A gate parameter: either a bound numeric value or a still-symbolic
/// expression. Equivalence templates carry symbolic `Expr` parameters;
/// concrete circuits passed to the translator carry `Float` (and, for
/// circuits nested under a larger parameterized context, `Expr`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Param {
    Float(f64),
    Expr(ParameterExpression),
}

impl Param {
    pub fn is_symbolic(&self) -> bool {
        matches!(self, Param::Expr(e) if e.is_symbolic())
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Param::Float(v) => Some(*v),
            Param::Expr(e) => e.as_f64(),
        }
    }

    /// Bind `formal` to this parameter's value inside `expr` — dispatches on
    /// whether this parameter is itself a concrete value (numeric `bind`) or
    /// a still-symbolic expression (symbolic `subst`), unifying both paths
    /// behind one call as required of the Composer and Applier.
    pub fn bind_into(&self, formal: &str, expr: &ParameterExpression) -> ParameterExpression {
        match self {
            Param::Float(v) => expr.bind(formal, *v),
            Param::Expr(actual) => expr.subst(formal, actual),
        }
    }
}

impl From<f64> for Param {
    fn from(value: f64) -> Self {
        Param::Float(value)
    }
}

impl From<ParameterExpression> for Param {
    fn from(value: ParameterExpression) -> Self {
        Param::Expr(value)
    }
}

/// An ordered tuple of uniquely-named formal parameters `(name, index)`,
/// used as placeholders inside equivalence templates and composer
/// placeholder DAGs.
#[derive(Clone, Debug)]
pub struct ParameterVector {
    pub prefix: String,
    pub symbols: Vec<ParameterExpression>,
}

impl ParameterVector {
    pub fn new(prefix: impl Into<String>, length: u32) -> Self {
        let prefix = prefix.into();
        let symbols = (0..length)
            .map(|i| ParameterExpression::symbol(format!("{prefix}_{i}")))
            .collect();
        ParameterVector { prefix, symbols }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn as_params(&self) -> SmallVec<[Param; 3]> {
        self.symbols.iter().cloned().map(Param::Expr).collect()
    }
}
