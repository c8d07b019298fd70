//! Registration descriptors for native functions and methods
//!
//! A [`NativeFunction`] describes one function the embedding exposes to the
//! host: its name, optional class, argument metadata and handler. At
//! registration time it fills a [`FunctionEntry`], the flat record the host
//! dispatches from.

use std::fmt;
use std::rc::Rc;

use crate::invoke::{CallFailure, Host};
use crate::value::{Invocation, NativeHandler, Value};

/// Declared type of a parameter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TypeHint {
    /// No constraint
    #[default]
    Any,
    /// Must be an array
    Array,
    /// Must be callable
    Callable,
    /// Must be an instance of the named class
    Class(String),
}

impl TypeHint {
    /// Whether `value` satisfies this hint.
    ///
    /// Callability is the host's call; class names compare
    /// case-insensitively.
    pub fn admits(&self, value: &Value, host: &dyn Host) -> bool {
        match self {
            TypeHint::Any => true,
            TypeHint::Array => value.is_array(),
            TypeHint::Callable => host.is_callable(value),
            TypeHint::Class(class) => value
                .as_object()
                .is_some_and(|object| object.class_name().eq_ignore_ascii_case(class)),
        }
    }
}

impl fmt::Display for TypeHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeHint::Any => write!(f, "mixed"),
            TypeHint::Array => write!(f, "array"),
            TypeHint::Callable => write!(f, "callable"),
            TypeHint::Class(class) => write!(f, "{}", class),
        }
    }
}

/// Metadata for one declared parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgInfo {
    name: String,
    type_hint: TypeHint,
    by_ref: bool,
    required: bool,
}

impl ArgInfo {
    /// A required parameter.
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_hint: TypeHint::Any,
            by_ref: false,
            required: true,
        }
    }

    /// An optional parameter.
    pub fn optional(name: impl Into<String>) -> Self {
        Self {
            required: false,
            ..Self::required(name)
        }
    }

    /// Mark the parameter as passed by reference.
    ///
    /// The flag is declaration metadata. Writes reach the caller only when
    /// the caller passes an alias (see [`Value::reference`]); a plain
    /// argument is written to locally.
    pub fn by_ref(mut self) -> Self {
        self.by_ref = true;
        self
    }

    /// Attach a type hint.
    pub fn with_type(mut self, hint: TypeHint) -> Self {
        self.type_hint = hint;
        self
    }

    /// Parameter name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type
    pub fn type_hint(&self) -> &TypeHint {
        &self.type_hint
    }

    /// Whether the caller's variable is passed by reference
    pub fn is_by_ref(&self) -> bool {
        self.by_ref
    }

    /// Whether the parameter must be passed
    pub fn is_required(&self) -> bool {
        self.required
    }
}

/// Registration flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FunctionFlags {
    /// Method callable without a receiver
    pub is_static: bool,
    /// Accepts any number of arguments past the declared ones
    pub variadic: bool,
}

impl FunctionFlags {
    /// Flags for a static method.
    pub fn static_method() -> Self {
        Self {
            is_static: true,
            ..Self::default()
        }
    }

    /// Flags for a variadic function.
    pub fn variadic() -> Self {
        Self {
            variadic: true,
            ..Self::default()
        }
    }
}

/// A native function or method as declared by the embedding.
///
/// # Example
///
/// ```
/// use hostvalue::{ArgInfo, FunctionEntry, NativeFunction, Value};
///
/// let double = NativeFunction::new("double", |call| Ok(Some(call.arg(0) * 2)))
///     .arg(ArgInfo::required("n"));
///
/// let mut entry = FunctionEntry::default();
/// double.fill_entry(&mut entry);
///
/// assert_eq!(entry.name, "double");
/// assert_eq!(entry.required_args, 1);
/// assert!(entry.accepts(1));
/// assert!(!entry.accepts(2));
/// ```
#[derive(Clone)]
pub struct NativeFunction {
    name: String,
    class_name: Option<String>,
    args: Vec<ArgInfo>,
    handler: NativeHandler,
    flags: FunctionFlags,
}

impl NativeFunction {
    /// Declare a free function.
    pub fn new<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&mut Invocation<'_>) -> Result<Option<Value>, Value> + 'static,
    {
        Self {
            name: name.into(),
            class_name: None,
            args: Vec::new(),
            handler: Rc::new(handler),
            flags: FunctionFlags::default(),
        }
    }

    /// Declare a method of `class`.
    pub fn method<F>(class: impl Into<String>, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&mut Invocation<'_>) -> Result<Option<Value>, Value> + 'static,
    {
        Self {
            class_name: Some(class.into()),
            ..Self::new(name, handler)
        }
    }

    /// Append a parameter.
    pub fn arg(mut self, info: ArgInfo) -> Self {
        self.args.push(info);
        self
    }

    /// Replace the parameter list.
    pub fn with_args(mut self, args: Vec<ArgInfo>) -> Self {
        self.args = args;
        self
    }

    /// Set the registration flags.
    pub fn with_flags(mut self, flags: FunctionFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Function name as declared.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Owning class, for methods.
    pub fn class_name(&self) -> Option<&str> {
        self.class_name.as_deref()
    }

    /// Declared parameters.
    pub fn args(&self) -> &[ArgInfo] {
        &self.args
    }

    /// Registration flags.
    pub fn flags(&self) -> FunctionFlags {
        self.flags
    }

    /// Number of required parameters.
    pub fn required_args(&self) -> usize {
        self.args.iter().filter(|info| info.is_required()).count()
    }

    /// Upper bound on arguments; `None` for variadic functions.
    pub fn max_args(&self) -> Option<usize> {
        if self.flags.variadic {
            None
        } else {
            Some(self.args.len())
        }
    }

    /// Fill a host dispatch entry from this declaration.
    pub fn fill_entry(&self, entry: &mut FunctionEntry) {
        entry.name.clone_from(&self.name);
        entry.class_name.clone_from(&self.class_name);
        entry.handler = Some(Rc::clone(&self.handler));
        entry.arg_info.clone_from(&self.args);
        entry.num_args = self.args.len();
        entry.required_args = self.required_args();
        entry.flags = self.flags;
    }

    /// A filled entry for this declaration.
    pub fn to_entry(&self) -> FunctionEntry {
        let mut entry = FunctionEntry::default();
        self.fill_entry(&mut entry);
        entry
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction")
            .field("name", &self.name)
            .field("class_name", &self.class_name)
            .field("args", &self.args)
            .field("flags", &self.flags)
            .finish()
    }
}

/// The record a host dispatches a native call from.
#[derive(Clone, Default)]
pub struct FunctionEntry {
    /// Function or method name
    pub name: String,
    /// Owning class, for methods
    pub class_name: Option<String>,
    /// The native handler; `None` until filled
    pub handler: Option<NativeHandler>,
    /// Per-parameter metadata
    pub arg_info: Vec<ArgInfo>,
    /// Number of declared parameters
    pub num_args: usize,
    /// Number of required parameters
    pub required_args: usize,
    /// Registration flags
    pub flags: FunctionFlags,
}

impl FunctionEntry {
    /// Whether a call with `argc` arguments fits the declaration.
    pub fn accepts(&self, argc: usize) -> bool {
        argc >= self.required_args && (self.flags.variadic || argc <= self.num_args)
    }

    /// Check `argc` against the declaration.
    ///
    /// # Errors
    ///
    /// Returns `ArityMismatch` when the count is out of range.
    pub fn check_arity(&self, argc: usize) -> Result<(), CallFailure> {
        if self.accepts(argc) {
            return Ok(());
        }
        Err(CallFailure::ArityMismatch {
            name: self.display_name(),
            min: self.required_args,
            max: if self.flags.variadic {
                usize::MAX
            } else {
                self.num_args
            },
            got: argc,
        })
    }

    /// Check each argument against its parameter's type hint.
    ///
    /// Arguments past the declared parameters of a variadic function are
    /// not checked.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` for the first argument that fails its hint.
    pub fn check_types(&self, args: &[Value], host: &dyn Host) -> Result<(), CallFailure> {
        let mismatch = self
            .arg_info
            .iter()
            .zip(args)
            .position(|(info, arg)| !info.type_hint().admits(arg, host));

        match mismatch {
            None => Ok(()),
            Some(index) => Err(CallFailure::TypeMismatch {
                name: self.display_name(),
                position: index + 1,
                expected: self.arg_info[index].type_hint().clone(),
                given: args[index].kind(),
            }),
        }
    }

    /// Whether parameter `index` is passed by reference.
    pub fn passes_by_ref(&self, index: usize) -> bool {
        self.arg_info.get(index).is_some_and(ArgInfo::is_by_ref)
    }

    /// `Class::method` for methods, the bare name otherwise.
    pub fn display_name(&self) -> String {
        match &self.class_name {
            Some(class) => format!("{}::{}", class, self.name),
            None => self.name.clone(),
        }
    }
}

impl fmt::Debug for FunctionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionEntry")
            .field("name", &self.display_name())
            .field("filled", &self.handler.is_some())
            .field("num_args", &self.num_args)
            .field("required_args", &self.required_args)
            .field("flags", &self.flags)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn noop(_: &mut Invocation<'_>) -> Result<Option<Value>, Value> {
        Ok(None)
    }

    #[test]
    fn test_required_and_optional_counts() {
        let f = NativeFunction::new("substr", noop)
            .arg(ArgInfo::required("string"))
            .arg(ArgInfo::required("offset"))
            .arg(ArgInfo::optional("length"));

        assert_eq!(f.required_args(), 2);
        assert_eq!(f.max_args(), Some(3));
    }

    #[test]
    fn test_fill_entry_copies_metadata() {
        let f = NativeFunction::method("Counter", "add", noop)
            .arg(ArgInfo::required("amount").by_ref())
            .with_flags(FunctionFlags::static_method());

        let mut entry = FunctionEntry::default();
        f.fill_entry(&mut entry);

        assert_eq!(entry.display_name(), "Counter::add");
        assert_eq!(entry.num_args, 1);
        assert!(entry.flags.is_static);
        assert!(entry.passes_by_ref(0));
        assert!(!entry.passes_by_ref(1));
        assert!(entry.handler.is_some());
    }

    #[test]
    fn test_variadic_accepts_any_count_past_required() {
        let entry = NativeFunction::new("printf", noop)
            .arg(ArgInfo::required("format"))
            .with_flags(FunctionFlags::variadic())
            .to_entry();

        assert!(!entry.accepts(0));
        assert!(entry.accepts(1));
        assert!(entry.accepts(8));
    }

    #[test]
    fn test_check_arity_reports_range() {
        let entry = NativeFunction::new("pair", noop)
            .with_args(vec![ArgInfo::required("a"), ArgInfo::required("b")])
            .to_entry();

        assert_eq!(
            entry.check_arity(3),
            Err(CallFailure::ArityMismatch {
                name: "pair".to_string(),
                min: 2,
                max: 2,
                got: 3,
            })
        );
    }

    #[test]
    fn test_type_hint_default_is_any() {
        let info = ArgInfo::optional("cb").with_type(TypeHint::Callable);
        assert_eq!(info.type_hint(), &TypeHint::Callable);
        assert_eq!(ArgInfo::required("x").type_hint(), &TypeHint::Any);
    }

    #[test]
    fn test_type_hints_admit_matching_values() {
        let rt = crate::Runtime::with_prelude();

        assert!(TypeHint::Any.admits(&Value::null(), &rt));
        assert!(TypeHint::Array.admits(&Value::array(), &rt));
        assert!(!TypeHint::Array.admits(&Value::from(1), &rt));
        assert!(TypeHint::Callable.admits(&Value::from("strlen"), &rt));
        assert!(!TypeHint::Callable.admits(&Value::from("nope"), &rt));

        let hint = TypeHint::Class("Point".to_string());
        assert!(hint.admits(&Value::object("point"), &rt));
        assert!(!hint.admits(&Value::object("Line"), &rt));
        assert_eq!(hint.to_string(), "Point");
    }

    #[test]
    fn test_check_types_reports_first_mismatch() {
        let rt = crate::Runtime::new();
        let entry = NativeFunction::new("merge", noop)
            .arg(ArgInfo::required("left").with_type(TypeHint::Array))
            .arg(ArgInfo::required("right").with_type(TypeHint::Array))
            .with_flags(FunctionFlags::variadic())
            .to_entry();

        let extra = [Value::array(), Value::array(), Value::from("tail")];
        assert_eq!(entry.check_types(&extra, &rt), Ok(()));
        assert_eq!(
            entry.check_types(&[Value::array(), Value::from(3)], &rt),
            Err(CallFailure::TypeMismatch {
                name: "merge".to_string(),
                position: 2,
                expected: TypeHint::Array,
                given: crate::Kind::Int,
            })
        );
    }
}
