//! Tests for value handles: copy-on-write sharing and alias groups

use hostvalue::*;
use pretty_assertions::assert_eq;

// ═══════════════════════════════════════════════════════════════════════
// Copies
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_copy_is_independent_of_later_writes() {
    let mut a = Value::from(10);
    let b = a.clone();
    assert!(a.same_payload(&b));

    a.assign(20);
    assert_eq!(a.int_value(), 20);
    assert_eq!(b.int_value(), 10);
}

#[test]
fn test_copy_then_compound_assign() {
    let a = Value::from(10);
    let mut b = a.clone();
    b += Value::from(5);

    assert_eq!(a.int_value(), 10);
    assert_eq!(b.int_value(), 15);
}

#[test]
fn test_copied_array_forks_on_write() {
    let mut a = Value::array();
    a.set("x", &Value::from(1));

    let b = a.clone();
    a.set("x", &Value::from(2));

    assert_eq!(a.get("x").int_value(), 2);
    assert_eq!(b.get("x").int_value(), 1);
}

#[test]
fn test_copy_of_alias_is_not_an_alias() {
    let mut a = Value::from(1);
    let _b = a.reference();

    let mut c = a.clone();
    c.assign(99);

    assert!(!c.is_alias());
    assert_eq!(a.int_value(), 1);
}

// ═══════════════════════════════════════════════════════════════════════
// Alias groups
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_alias_pair_sees_compound_assign() {
    let mut a = Value::from(1);
    let mut b = Value::null();
    Value::bind_alias(&mut a, &mut b);

    a += Value::from(1);
    assert_eq!(b.int_value(), 2);
}

#[test]
fn test_alias_propagates_both_ways() {
    let mut a = Value::from("first");
    let mut b = a.reference();

    b.assign("second");
    assert_eq!(a.string_value(), "second");

    a.assign(3.5);
    assert_eq!(b.float_value(), 3.5);
    assert!(a.same_payload(&b));
}

#[test]
fn test_alias_sees_container_writes() {
    let mut a = Value::array();
    let mut b = a.reference();

    b.set("k", &Value::from("v"));
    assert_eq!(a.get("k").string_value(), "v");
    assert!(a.is_alias());
}

#[test]
fn test_bind_alias_releases_previous_payload() {
    let mut a = Value::from(1);
    let old = Value::from("old");
    let mut b = old.clone();
    assert_eq!(old.refcount(), 2);

    Value::bind_alias(&mut a, &mut b);
    assert_eq!(old.refcount(), 1);
    assert!(a.same_payload(&b));
}

#[test]
fn test_bind_alias_twice_is_stable() {
    let mut a = Value::from(1);
    let mut b = Value::null();
    Value::bind_alias(&mut a, &mut b);
    Value::bind_alias(&mut a, &mut b);

    assert_eq!(a.refcount(), 2);
    assert!(b.is_alias());
}

#[test]
fn test_reference_does_not_drag_in_sharers() {
    let mut a = Value::from(1);
    let sharer = a.clone();
    let mut b = a.reference();

    b.assign(2);
    assert_eq!(a.int_value(), 2);
    assert_eq!(sharer.int_value(), 1);
}

#[test]
fn test_last_alias_holder_is_plain_again() {
    let mut a = Value::from(1);
    let b = a.reference();
    drop(b);

    assert!(!a.is_alias());
    let c = a.clone();
    assert!(c.same_payload(&a));
}

// ═══════════════════════════════════════════════════════════════════════
// Assignment and identity
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_assigning_own_payload_is_noop() {
    let mut a = Value::from("same");
    let same = a.share();

    a.assign_value(&same);
    assert!(a.same_payload(&same));
    assert_eq!(a.refcount(), 2);
}

#[test]
fn test_assign_from_handle_shares() {
    let source = Value::from(vec![Value::from(1)]);
    let mut target = Value::null();

    target.assign_value(&source);
    assert!(target.same_payload(&source));
}

#[test]
fn test_share_is_not_alias() {
    let a = Value::from(5);
    let mut b = a.share();
    assert!(!b.is_alias());

    b.assign(6);
    assert_eq!(a.int_value(), 5);
}

// ═══════════════════════════════════════════════════════════════════════
// Equality and formatting
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_equality_is_by_kind_and_content() {
    assert_eq!(Value::from(1), Value::from(1));
    assert_ne!(Value::from(1), Value::from(1.0));
    assert_ne!(Value::from("1"), Value::from(1));
    assert_eq!(Value::from(()), Value::null());
    assert_eq!(
        Value::from(vec![Value::from("a")]),
        Value::from(vec![Value::from("a")])
    );
}

#[test]
fn test_object_equality_is_identity() {
    let a = Value::object("Foo");
    let b = a.clone();
    assert_eq!(a, b);
    assert_ne!(a, Value::object("Foo"));
}

#[test]
fn test_debug_format() {
    let v: Value = [
        (ArrayKey::from(0), Value::from(1)),
        (ArrayKey::from("k"), Value::from("v")),
    ]
    .into_iter()
    .collect();

    assert_eq!(format!("{:?}", v), r#"[0 => 1, "k" => "v"]"#);
    assert_eq!(format!("{:?}", Value::null()), "null");
}

#[test]
fn test_debug_marks_aliases() {
    let mut a = Value::from(1);
    let _b = a.reference();
    assert_eq!(format!("{:?}", a), "&1");
}

#[test]
fn test_display_uses_string_form() {
    assert_eq!(Value::from(7.5).to_string(), "7.5");
    assert_eq!(Value::from(true).to_string(), "1");
    assert_eq!(Value::array().to_string(), "Array");
}

#[test]
fn test_kind_predicates() {
    assert!(Value::null().is_null());
    assert!(Value::from(false).is_bool());
    assert!(Value::from(1i16).is_int());
    assert!(Value::from(0.5).is_float());
    assert!(Value::from('c').is_string());
    assert!(Value::from(&b"\xff"[..]).is_string());
    assert!(Value::array().is_array());
    assert!(Value::object("X").is_object());
    assert!(Value::callable("f", |_| Ok(None)).is_callable_kind());
}

#[test]
fn test_option_conversion() {
    assert!(Value::from(None::<i64>).is_null());
    assert_eq!(Value::from(Some(3)).int_value(), 3);
}
