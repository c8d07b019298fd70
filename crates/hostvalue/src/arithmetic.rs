//! Arithmetic on values
//!
//! `+`, `-`, `*` and `/` share one policy, [`Arithmetic`], parameterized by
//! an [`Operator`]. Both operands are reduced to their numeric image; if both
//! are integers the operation stays in integers (overflow promotes to
//! float), otherwise both sides are floats. Modulo does not go through the
//! policy: it always truncates both operands to integers first.

use std::borrow::Cow;
use std::marker::PhantomData;
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Rem, Sub, SubAssign};

use crate::error::{Result, ValueError};
use crate::value::{Number, Value};

/// A binary arithmetic operator.
pub trait Operator {
    /// Operator symbol, for errors and logs
    const SYMBOL: &'static str;

    /// Whether a divisor of zero is an error
    const REJECTS_ZERO: bool = false;

    /// Integer form; `None` on overflow.
    fn int(a: i64, b: i64) -> Option<i64>;

    /// Float form.
    fn float(a: f64, b: f64) -> f64;
}

/// Addition
#[derive(Debug, Clone, Copy)]
pub struct Plus;

/// Subtraction
#[derive(Debug, Clone, Copy)]
pub struct Minus;

/// Multiplication
#[derive(Debug, Clone, Copy)]
pub struct Multiply;

/// Division
#[derive(Debug, Clone, Copy)]
pub struct Divide;

impl Operator for Plus {
    const SYMBOL: &'static str = "+";

    fn int(a: i64, b: i64) -> Option<i64> {
        a.checked_add(b)
    }

    fn float(a: f64, b: f64) -> f64 {
        a + b
    }
}

impl Operator for Minus {
    const SYMBOL: &'static str = "-";

    fn int(a: i64, b: i64) -> Option<i64> {
        a.checked_sub(b)
    }

    fn float(a: f64, b: f64) -> f64 {
        a - b
    }
}

impl Operator for Multiply {
    const SYMBOL: &'static str = "*";

    fn int(a: i64, b: i64) -> Option<i64> {
        a.checked_mul(b)
    }

    fn float(a: f64, b: f64) -> f64 {
        a * b
    }
}

impl Operator for Divide {
    const SYMBOL: &'static str = "/";
    const REJECTS_ZERO: bool = true;

    // Truncating; `i64::MIN / -1` overflows into the float path.
    fn int(a: i64, b: i64) -> Option<i64> {
        a.checked_div(b)
    }

    fn float(a: f64, b: f64) -> f64 {
        a / b
    }
}

/// The arithmetic policy for operator `O`.
#[derive(Debug, Clone, Copy)]
pub struct Arithmetic<O> {
    _op: PhantomData<O>,
}

impl<O: Operator> Arithmetic<O> {
    /// Compute `lhs O rhs` as a new value.
    ///
    /// # Errors
    ///
    /// Returns `DivisionByZero` if the operator rejects a zero divisor and
    /// `rhs` coerces to zero.
    pub fn apply(lhs: &Value, rhs: &Value) -> Result<Value> {
        Self::compute(lhs, rhs).map(Value::from)
    }

    /// Compute `lhs O rhs` and store it in `lhs`.
    ///
    /// An alias group is updated for all of its members; a payload shared
    /// with other variables is left to them.
    ///
    /// # Errors
    ///
    /// As for [`Arithmetic::apply`]; `lhs` is untouched on error.
    pub fn assign(lhs: &mut Value, rhs: &Value) -> Result<()> {
        let result = Self::compute(lhs, rhs)?;
        lhs.assign(Value::from(result));
        Ok(())
    }

    /// The numeric result, after the zero-divisor check.
    pub fn compute(lhs: &Value, rhs: &Value) -> Result<Number> {
        let (a, b) = (lhs.to_number(), rhs.to_number());
        if O::REJECTS_ZERO && b.is_zero() {
            return Err(ValueError::DivisionByZero { op: O::SYMBOL });
        }
        Ok(Self::evaluate(a, b))
    }

    /// The numeric result without any domain check.
    pub fn evaluate(a: Number, b: Number) -> Number {
        match (a, b) {
            (Number::Int(x), Number::Int(y)) => match O::int(x, y) {
                Some(n) => Number::Int(n),
                None => Number::Float(O::float(x as f64, y as f64)),
            },
            (a, b) => Number::Float(O::float(a.as_f64(), b.as_f64())),
        }
    }
}

/// Integer remainder of two values.
///
/// Both operands are truncated to integers first, whatever their kind.
/// `i64::MIN % -1` is 0.
///
/// # Errors
///
/// Returns `DivisionByZero` if `rhs` truncates to zero.
pub fn remainder(lhs: &Value, rhs: &Value) -> Result<Value> {
    let divisor = rhs.int_value();
    if divisor == 0 {
        return Err(ValueError::DivisionByZero { op: "%" });
    }
    Ok(Value::from(lhs.int_value().wrapping_rem(divisor)))
}

impl Value {
    /// Divide in place.
    ///
    /// # Errors
    ///
    /// Returns `DivisionByZero` if `rhs` coerces to zero.
    pub fn try_div_assign(&mut self, rhs: impl Operand) -> Result<()> {
        let rhs = rhs.into_operand();
        Arithmetic::<Divide>::assign(self, &rhs)
    }

    /// Replace this value with its integer remainder by `rhs`.
    ///
    /// # Errors
    ///
    /// Returns `DivisionByZero` if `rhs` truncates to zero.
    pub fn try_rem_assign(&mut self, rhs: impl Operand) -> Result<()> {
        let rhs = rhs.into_operand();
        let result = remainder(self, &rhs)?;
        self.assign(result);
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Operator Overloads
// ═══════════════════════════════════════════════════════════════════════

/// Anything usable as the right-hand side of a value operator.
pub trait Operand {
    /// Borrow or build the operand value.
    fn into_operand<'a>(self) -> Cow<'a, Value>
    where
        Self: 'a;
}

impl Operand for Value {
    fn into_operand<'a>(self) -> Cow<'a, Value>
    where
        Self: 'a,
    {
        Cow::Owned(self)
    }
}

impl Operand for &Value {
    fn into_operand<'a>(self) -> Cow<'a, Value>
    where
        Self: 'a,
    {
        Cow::Borrowed(self)
    }
}

macro_rules! scalar_operand {
    ($($ty:ty),*) => {
        $(
            impl Operand for $ty {
                fn into_operand<'a>(self) -> Cow<'a, Value>
                where
                    Self: 'a,
                {
                    Cow::Owned(Value::from(self))
                }
            }
        )*
    };
}

scalar_operand!(bool, i16, i32, i64, f64, char, &str, String);

macro_rules! infallible_op {
    ($trait:ident, $method:ident, $assign_trait:ident, $assign_method:ident, $op:ty) => {
        impl<T: Operand> $trait<T> for &Value {
            type Output = Value;

            fn $method(self, rhs: T) -> Value {
                let rhs = rhs.into_operand();
                Value::from(Arithmetic::<$op>::evaluate(self.to_number(), rhs.to_number()))
            }
        }

        impl<T: Operand> $trait<T> for Value {
            type Output = Value;

            fn $method(self, rhs: T) -> Value {
                (&self).$method(rhs)
            }
        }

        impl<T: Operand> $assign_trait<T> for Value {
            fn $assign_method(&mut self, rhs: T) {
                let rhs = rhs.into_operand();
                let result = Arithmetic::<$op>::evaluate(self.to_number(), rhs.to_number());
                self.assign(Value::from(result));
            }
        }
    };
}

infallible_op!(Add, add, AddAssign, add_assign, Plus);
infallible_op!(Sub, sub, SubAssign, sub_assign, Minus);
infallible_op!(Mul, mul, MulAssign, mul_assign, Multiply);

impl<T: Operand> Div<T> for &Value {
    type Output = Result<Value>;

    fn div(self, rhs: T) -> Result<Value> {
        let rhs = rhs.into_operand();
        Arithmetic::<Divide>::apply(self, &rhs)
    }
}

impl<T: Operand> Div<T> for Value {
    type Output = Result<Value>;

    fn div(self, rhs: T) -> Result<Value> {
        (&self).div(rhs)
    }
}

impl<T: Operand> Rem<T> for &Value {
    type Output = Result<Value>;

    fn rem(self, rhs: T) -> Result<Value> {
        let rhs = rhs.into_operand();
        remainder(self, &rhs)
    }
}

impl<T: Operand> Rem<T> for Value {
    type Output = Result<Value>;

    fn rem(self, rhs: T) -> Result<Value> {
        (&self).rem(rhs)
    }
}
