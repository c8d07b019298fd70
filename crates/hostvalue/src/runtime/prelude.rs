//! Standard prelude with built-in functions

use super::{Runtime, EXCEPTION_CLASS};
use crate::error::ValueError;
use crate::registry::{ArgInfo, FunctionFlags, NativeFunction, TypeHint};
use crate::value::{Invocation, Kind, Value};

/// Handler result: a return value, or an exception to raise.
type Outcome = Result<Option<Value>, Value>;

impl Runtime {
    /// Create a runtime with the standard built-in functions.
    pub fn with_prelude() -> Self {
        let rt = Self::new();
        rt.load_prelude();
        rt
    }

    /// Load the standard prelude into this runtime.
    pub fn load_prelude(&self) {
        // Strings
        self.register(NativeFunction::new("strlen", builtin_strlen).arg(ArgInfo::required("string")));
        self.register(
            NativeFunction::new("strtoupper", builtin_strtoupper).arg(ArgInfo::required("string")),
        );

        // Arrays
        self.register(
            NativeFunction::new("count", builtin_count)
                .arg(ArgInfo::required("value"))
                .arg(ArgInfo::optional("mode")),
        );

        // Type inspection
        self.register(NativeFunction::new("gettype", builtin_gettype).arg(ArgInfo::required("value")));
        self.register(
            NativeFunction::new("is_callable", builtin_is_callable).arg(ArgInfo::required("value")),
        );

        // Dynamic calls
        self.register(
            NativeFunction::new("call_user_func", builtin_call_user_func)
                .arg(ArgInfo::required("callback").with_type(TypeHint::Callable))
                .with_flags(FunctionFlags::variadic()),
        );

        // Exceptions
        self.register(
            NativeFunction::method(EXCEPTION_CLASS, "__construct", exception_construct)
                .arg(ArgInfo::optional("message")),
        );
        self.register(NativeFunction::method(
            EXCEPTION_CLASS,
            "getMessage",
            exception_get_message,
        ));
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Built-in Function Implementations
// ═══════════════════════════════════════════════════════════════════════

fn length(n: usize) -> Value {
    Value::from(i64::try_from(n).unwrap_or(i64::MAX))
}

fn builtin_strlen(call: &mut Invocation<'_>) -> Outcome {
    Ok(Some(length(call.arg(0).bytes_value().len())))
}

fn builtin_strtoupper(call: &mut Invocation<'_>) -> Outcome {
    Ok(Some(Value::bytes(call.arg(0).bytes_value().to_ascii_uppercase())))
}

fn builtin_count(call: &mut Invocation<'_>) -> Outcome {
    let value = call.arg(0);
    let n = match value.kind() {
        Kind::Array => value.size(),
        Kind::Null => 0,
        _ => 1,
    };
    Ok(Some(length(n)))
}

/// Type names as the host language reports them.
fn builtin_gettype(call: &mut Invocation<'_>) -> Outcome {
    let name = match call.arg(0).kind() {
        Kind::Null => "NULL",
        Kind::Bool => "boolean",
        Kind::Int => "integer",
        Kind::Float => "double",
        Kind::String => "string",
        Kind::Array => "array",
        Kind::Object | Kind::Callable => "object",
    };
    Ok(Some(Value::from(name)))
}

fn builtin_is_callable(call: &mut Invocation<'_>) -> Outcome {
    let callable = call.invoker().is_callable(&call.arg(0));
    Ok(Some(Value::from(callable)))
}

fn builtin_call_user_func(call: &mut Invocation<'_>) -> Outcome {
    let Some((callback, rest)) = call.args().split_first() else {
        return Ok(None);
    };

    match call.invoker().call(callback, rest) {
        Ok(result) => Ok(Some(result)),
        // Already pending in the host; raising it again keeps the marker
        Err(ValueError::HostException { exception }) => Err(exception),
        Err(other) => Err(Value::from(other.to_string())),
    }
}

fn exception_construct(call: &mut Invocation<'_>) -> Outcome {
    let message = call.arg(0);
    if let Some(object) = call.this().and_then(Value::as_object) {
        object.set_property("message", &Value::from(message.string_value()));
    }
    Ok(None)
}

fn exception_get_message(call: &mut Invocation<'_>) -> Outcome {
    let message = call
        .this()
        .and_then(Value::as_object)
        .map(|object| object.property("message"))
        .unwrap_or_default();
    Ok(Some(message))
}
