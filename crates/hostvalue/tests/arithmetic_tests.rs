//! Tests for value arithmetic

use hostvalue::*;
use pretty_assertions::assert_eq;

fn is_division_by_zero(result: Result<Value>, expected: &str) -> bool {
    matches!(result, Err(ValueError::DivisionByZero { op }) if op == expected)
}

// ═══════════════════════════════════════════════════════════════════════
// Result kind
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_int_plus_int_is_int() {
    let sum = Value::from(3) + Value::from(4);
    assert!(sum.is_int());
    assert_eq!(sum.int_value(), 7);
}

#[test]
fn test_int_plus_float_is_float() {
    let sum = Value::from(3) + Value::from(4.5);
    assert!(sum.is_float());
    assert_eq!(sum.float_value(), 7.5);
}

#[test]
fn test_modulo_truncates_operands() {
    let r = (Value::from(7) % Value::from(2)).map(|v| (v.kind(), v.int_value()));
    assert_eq!(r.ok(), Some((Kind::Int, 1)));

    let r = (Value::from(7.9) % Value::from(2.2)).map(|v| (v.kind(), v.int_value()));
    assert_eq!(r.ok(), Some((Kind::Int, 1)));
}

#[test]
fn test_modulo_sign_follows_dividend() {
    let r = (Value::from(-7) % 3).map(|v| v.int_value());
    assert_eq!(r.ok(), Some(-1));
}

#[test]
fn test_numeric_strings() {
    let sum = Value::from("3") + Value::from("4.5");
    assert_eq!(sum.kind(), Kind::Float);
    assert_eq!(sum.float_value(), 7.5);

    let sum = Value::from("10 apples") + 5;
    assert_eq!(sum.kind(), Kind::Int);
    assert_eq!(sum.int_value(), 15);

    let product = Value::from("abc") * 4;
    assert_eq!(product.int_value(), 0);
}

#[test]
fn test_bool_and_null_operands() {
    assert_eq!((Value::from(true) + true).int_value(), 2);
    assert_eq!((Value::null() - 3).int_value(), -3);
}

#[test]
fn test_integer_division_truncates() {
    let q = (Value::from(7) / Value::from(2)).map(|v| (v.kind(), v.int_value()));
    assert_eq!(q.ok(), Some((Kind::Int, 3)));

    let q = (Value::from("6") / "3").map(|v| v.int_value());
    assert_eq!(q.ok(), Some(2));
}

#[test]
fn test_float_division() {
    let q = (Value::from(7.0) / 2).map(|v| (v.kind(), v.float_value()));
    assert_eq!(q.ok(), Some((Kind::Float, 3.5)));
}

#[test]
fn test_overflow_promotes_to_float() {
    let sum = Value::from(i64::MAX) + 1;
    assert!(sum.is_float());

    let product = Value::from(i64::MAX) * 2;
    assert_eq!(product.kind(), Kind::Float);

    let diff = Value::from(i64::MIN) - 1;
    assert_eq!(diff.kind(), Kind::Float);
}

#[test]
fn test_min_modulo_minus_one_is_zero() {
    let r = remainder(&Value::from(i64::MIN), &Value::from(-1)).map(|v| v.int_value());
    assert_eq!(r.ok(), Some(0));
}

// ═══════════════════════════════════════════════════════════════════════
// Division by zero
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_division_by_zero() {
    assert!(is_division_by_zero(Value::from(1) / Value::from(0), "/"));
    assert!(is_division_by_zero(Value::from(1.5) / 0.0, "/"));
    assert!(is_division_by_zero(Value::from(1) / "0", "/"));
    assert!(is_division_by_zero(Value::from(1) / Value::null(), "/"));
}

#[test]
fn test_modulo_by_zero() {
    assert!(is_division_by_zero(Value::from(1) % Value::from(0), "%"));
    // Truncates to zero before the check
    assert!(is_division_by_zero(Value::from(5) % 0.5, "%"));
}

#[test]
fn test_failed_division_leaves_target() {
    let mut x = Value::from(8);
    let err = x.try_div_assign(0);
    assert!(matches!(err, Err(ValueError::DivisionByZero { .. })));
    assert_eq!(x.int_value(), 8);

    assert!(x.try_rem_assign(Value::from("0")).is_err());
    assert_eq!(x.int_value(), 8);
}

// ═══════════════════════════════════════════════════════════════════════
// Compound assignment
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_compound_chain() -> Result<()> {
    let mut x = Value::from(1);
    x += 2;
    x *= 3;
    x -= 1;
    assert_eq!(x.int_value(), 8);

    x.try_div_assign(2)?;
    assert_eq!(x.int_value(), 4);

    x.try_rem_assign(3)?;
    assert_eq!(x.int_value(), 1);
    Ok(())
}

#[test]
fn test_compound_assign_on_alias_group() {
    let mut a = Value::from(5);
    let mut b = a.reference();

    b *= 10;
    assert_eq!(a.int_value(), 50);

    a -= Value::from(0.5);
    assert_eq!(b.float_value(), 49.5);
}

#[test]
fn test_compound_assign_on_shared_payload() {
    let mut a = Value::from(5);
    let b = a.clone();

    a -= 1;
    assert_eq!(a.int_value(), 4);
    assert_eq!(b.int_value(), 5);
}

#[test]
fn test_borrowed_operands() {
    let a = Value::from(2);
    let b = Value::from(3);

    assert_eq!((&a + &b).int_value(), 5);
    assert_eq!((&a * 'x').int_value(), 0);
    assert_eq!((&b - String::from("1")).int_value(), 2);
    assert_eq!(a.int_value(), 2);
}

// ═══════════════════════════════════════════════════════════════════════
// Policy
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_policy_apply_and_assign() -> Result<()> {
    let lhs = Value::from(9);
    let rhs = Value::from(3);

    let quotient = Arithmetic::<Divide>::apply(&lhs, &rhs)?;
    assert_eq!(quotient.int_value(), 3);

    let mut acc = Value::from(1);
    Arithmetic::<Plus>::assign(&mut acc, &rhs)?;
    Arithmetic::<Minus>::assign(&mut acc, &Value::from(1))?;
    Arithmetic::<Multiply>::assign(&mut acc, &Value::from(2))?;
    assert_eq!(acc.int_value(), 6);
    Ok(())
}

#[test]
fn test_operator_symbols() {
    assert_eq!(Plus::SYMBOL, "+");
    assert_eq!(Minus::SYMBOL, "-");
    assert_eq!(Multiply::SYMBOL, "*");
    assert_eq!(Divide::SYMBOL, "/");
    assert!(Divide::REJECTS_ZERO);
    assert!(!Plus::REJECTS_ZERO);
}
