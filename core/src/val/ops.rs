use std::ops::{Add, Div, Mul, Rem, Sub};

use crate::op::OpError;

use super::Val;

#[inline]
fn numeric(op: &'static str, l: &Val, r: &Val, f: impl FnOnce(f64, f64) -> f64) -> Result<Val, OpError> {
    match (l, r) {
        (Val::Num(a), Val::Num(b)) => Ok(Val::Num(f(*a, *b))),
        _ => Err(OpError::binary(op, l, r)),
    }
}

impl Add for &Val {
    type Output = Result<Val, OpError>;

    /// Number + Number sums. If either side is a string, both sides are
    /// rendered as text and concatenated in order. Bool + Bool and
    /// Bool + Number are rejected.
    #[inline]
    fn add(self, other: Self) -> Self::Output {
        match (self, other) {
            (Val::Num(a), Val::Num(b)) => Ok(Val::Num(a + b)),
            (Val::Str(a), Val::Str(b)) => Ok(Val::concat_strings(a, b)),
            (Val::Str(a), b) => Ok(Val::concat_strings(a, &b.to_string())),
            (a, Val::Str(b)) => Ok(Val::concat_strings(&a.to_string(), b)),
            _ => Err(OpError::binary("ADD", self, other)),
        }
    }
}

impl Sub for &Val {
    type Output = Result<Val, OpError>;

    #[inline]
    fn sub(self, other: Self) -> Self::Output {
        numeric("SUB", self, other, |a, b| a - b)
    }
}

impl Mul for &Val {
    type Output = Result<Val, OpError>;

    #[inline]
    fn mul(self, other: Self) -> Self::Output {
        numeric("MUL", self, other, |a, b| a * b)
    }
}

impl Div for &Val {
    type Output = Result<Val, OpError>;

    /// IEEE-754 division: `x / 0` yields an infinity or NaN, never an error.
    #[inline]
    fn div(self, other: Self) -> Self::Output {
        numeric("DIV", self, other, |a, b| a / b)
    }
}

impl Rem for &Val {
    type Output = Result<Val, OpError>;

    /// Floored modulo: the result takes the sign of the divisor.
    #[inline]
    fn rem(self, other: Self) -> Self::Output {
        numeric("MOD", self, other, floored_rem)
    }
}

impl Val {
    #[inline]
    pub fn pow(&self, other: &Val) -> Result<Val, OpError> {
        numeric("EXP", self, other, f64::powf)
    }
}

pub(crate) fn floored_rem(a: f64, b: f64) -> f64 {
    let r = a % b;
    if r != 0.0 && (r < 0.0) != (b < 0.0) { r + b } else { r }
}
