// Coverage tests for error types and the invoker against a scripted host
use std::cell::{Cell, RefCell};

use hostvalue::error::type_name;
use hostvalue::*;
use pretty_assertions::assert_eq;

// ═══════════════════════════════════════════════════════════════════════
// type_name Coverage
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_type_name_all_kinds() {
    assert_eq!(type_name(&Value::null()), "null");
    assert_eq!(type_name(&Value::from(true)), "bool");
    assert_eq!(type_name(&Value::from(1)), "int");
    assert_eq!(type_name(&Value::from(1.0)), "float");
    assert_eq!(type_name(&Value::from("s")), "string");
    assert_eq!(type_name(&Value::array()), "array");
    assert_eq!(type_name(&Value::object("C")), "object");
    assert_eq!(type_name(&Value::callable("f", |_| Ok(None))), "callable");
}

// ═══════════════════════════════════════════════════════════════════════
// Error Display
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_division_by_zero_display() {
    let err = ValueError::DivisionByZero { op: "%" };
    assert_eq!(err.to_string(), "Division by zero in `%`");
    assert!(err.exception().is_none());
}

#[test]
fn test_conversion_display() {
    let err = ValueError::Conversion {
        from: Kind::Object,
        to: Kind::String,
    };
    assert_eq!(err.to_string(), "Cannot convert object to string");
}

#[test]
fn test_host_exception_display_and_payload() {
    let err = ValueError::HostException {
        exception: Value::from("boom"),
    };
    assert_eq!(err.to_string(), r#"Host exception: "boom""#);
    assert_eq!(err.exception().map(Value::string_value), Some("boom".to_string()));
}

#[test]
fn test_call_failure_display() {
    assert_eq!(
        CallFailure::NotCallable { kind: Kind::Int }.to_string(),
        "value of kind int is not callable"
    );
    assert_eq!(
        CallFailure::UnknownFunction {
            name: "nope".to_string()
        }
        .to_string(),
        "call to undefined function nope()"
    );
    assert_eq!(
        CallFailure::NoSuchMethod {
            class: "Foo".to_string(),
            method: "bar".to_string()
        }
        .to_string(),
        "call to undefined method Foo::bar()"
    );
    assert_eq!(
        CallFailure::ArityMismatch {
            name: "f".to_string(),
            min: 1,
            max: 2,
            got: 3
        }
        .to_string(),
        "f() expects 1 to 2 arguments, 3 given"
    );
    assert_eq!(
        CallFailure::TypeMismatch {
            name: "count".to_string(),
            position: 1,
            expected: TypeHint::Array,
            given: Kind::String
        }
        .to_string(),
        "count() expects argument 1 to be array, string given"
    );
    assert_eq!(
        CallFailure::TooManyArguments { got: 11, max: 10 }.to_string(),
        "11 arguments exceed the limit of 10"
    );
}

// ═══════════════════════════════════════════════════════════════════════
// Invoker against a scripted host
// ═══════════════════════════════════════════════════════════════════════

/// What the scripted host does on its next call.
enum Script {
    Return(Option<Value>),
    Fail(CallFailure),
    Raise(Value),
}

struct ScriptedHost {
    script: RefCell<Option<Script>>,
    exception: RefCell<Option<Value>>,
    calls: Cell<usize>,
    seen_argc: Cell<usize>,
}

impl ScriptedHost {
    fn new(script: Script) -> Self {
        Self {
            script: RefCell::new(Some(script)),
            exception: RefCell::new(None),
            calls: Cell::new(0),
            seen_argc: Cell::new(0),
        }
    }
}

impl Host for ScriptedHost {
    fn call(
        &self,
        _target: &Value,
        args: &mut [Value],
    ) -> std::result::Result<Option<Value>, CallFailure> {
        self.calls.set(self.calls.get() + 1);
        self.seen_argc.set(args.len());
        match self.script.borrow_mut().take() {
            Some(Script::Return(value)) => Ok(value),
            Some(Script::Fail(failure)) => Err(failure),
            Some(Script::Raise(exception)) => {
                *self.exception.borrow_mut() = Some(exception);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn exception(&self) -> Option<Value> {
        self.exception.borrow().as_ref().map(Value::share)
    }

    fn clear_exception(&self) -> Option<Value> {
        self.exception.borrow_mut().take()
    }

    fn is_callable(&self, _target: &Value) -> bool {
        true
    }
}

#[test]
fn test_invoker_wraps_return_value() -> Result<()> {
    let host = ScriptedHost::new(Script::Return(Some(Value::from(7))));
    let result = Invoker::new(&host).call(&Value::from("anything"), &[Value::from(1)])?;

    assert_eq!(result.int_value(), 7);
    assert_eq!(host.seen_argc.get(), 1);
    Ok(())
}

#[test]
fn test_invoker_absent_return_is_null() -> Result<()> {
    let host = ScriptedHost::new(Script::Return(None));
    assert!(Invoker::new(&host).call(&Value::null(), &[])?.is_null());
    Ok(())
}

#[test_log::test]
fn test_invoker_maps_failure_to_null() -> Result<()> {
    let host = ScriptedHost::new(Script::Fail(CallFailure::NotCallable { kind: Kind::Null }));
    assert!(Invoker::new(&host).call(&Value::null(), &[])?.is_null());
    Ok(())
}

#[test_log::test]
fn test_invoker_bridges_raised_exception() {
    let host = ScriptedHost::new(Script::Raise(Value::from("raised")));
    let err = Invoker::new(&host).call_method(&Value::object("X"), "m", &[]).err();

    let exception = err.as_ref().and_then(ValueError::exception);
    assert_eq!(exception.map(Value::string_value), Some("raised".to_string()));
}

#[test_log::test]
fn test_invoker_rejects_oversized_call_without_dispatch() -> Result<()> {
    let host = ScriptedHost::new(Script::Return(Some(Value::from(1))));
    let args: Vec<Value> = (0..11).map(Value::from).collect();

    assert!(Invoker::new(&host).call(&Value::null(), &args)?.is_null());
    assert_eq!(host.calls.get(), 0);
    Ok(())
}

#[test]
fn test_invoker_uses_host_default_context() {
    let host = ScriptedHost::new(Script::Return(None));
    let invoker = Invoker::new(&host);
    assert_eq!(invoker.context(), &CallContext::default());
}
