//! Lazy type coercion and the conversion table

use std::rc::Rc;

use tracing::trace;

use super::{Array, ArrayKey, Kind, Object, Payload, Value};

/// Name of the class that plain arrays and scalars become when cast to object.
pub(crate) const STD_CLASS: &str = "stdClass";

/// A value's numeric image, as used by arithmetic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Integer representation
    Int(i64),
    /// Float representation
    Float(f64),
}

impl Number {
    /// The value as a float.
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(n) => n as f64,
            Number::Float(n) => n,
        }
    }

    /// Whether the value is zero.
    pub fn is_zero(self) -> bool {
        match self {
            Number::Int(n) => n == 0,
            Number::Float(n) => n == 0.0,
        }
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        match n {
            Number::Int(n) => Value::from(n),
            Number::Float(n) => Value::from(n),
        }
    }
}

impl Value {
    /// Convert this value in place.
    ///
    /// This is the only coercion that mutates: a payload shared with
    /// non-aliased holders is forked first, an alias group converts for all
    /// of its members.
    pub fn set_type(&mut self, kind: Kind) -> &mut Self {
        if self.kind() == kind {
            return self;
        }

        let converted = self.payload().convert(kind);
        trace!(from = %self.kind(), to = %kind, "converting value in place");
        self.overwrite(converted);
        self
    }

    /// A private copy of this value converted to `kind`.
    pub fn clone_as(&self, kind: Kind) -> Value {
        let mut copy = self.fork();
        copy.set_type(kind);
        copy
    }

    /// The value as an integer.
    pub fn int_value(&self) -> i64 {
        if let Payload::Int(n) = &*self.payload() {
            return *n;
        }
        self.clone_as(Kind::Int).int_value()
    }

    /// The value as a boolean.
    pub fn bool_value(&self) -> bool {
        if let Payload::Bool(b) = &*self.payload() {
            return *b;
        }
        self.clone_as(Kind::Bool).bool_value()
    }

    /// The value as a float.
    pub fn float_value(&self) -> f64 {
        if let Payload::Float(n) = &*self.payload() {
            return *n;
        }
        self.clone_as(Kind::Float).float_value()
    }

    /// The value as raw bytes.
    pub fn bytes_value(&self) -> Vec<u8> {
        if let Payload::String(s) = &*self.payload() {
            return s.clone();
        }
        self.clone_as(Kind::String).bytes_value()
    }

    /// The value as a string. Invalid UTF-8 is replaced.
    pub fn string_value(&self) -> String {
        if let Payload::String(s) = &*self.payload() {
            return String::from_utf8_lossy(s).into_owned();
        }
        self.clone_as(Kind::String).string_value()
    }

    /// The numeric image used by arithmetic.
    ///
    /// Strings with a fractional or exponent part, and integer strings that
    /// overflow, are floats; everything else that is not a float is an integer.
    pub fn to_number(&self) -> Number {
        match &*self.payload() {
            Payload::Float(n) => Number::Float(*n),
            Payload::String(s) => parse_number(s),
            other => Number::Int(other.to_int()),
        }
    }
}

impl Payload {
    /// The image of this payload under a conversion to `kind`.
    ///
    /// The table is total: every kind converts to every other kind. Casting
    /// to [`Kind::Callable`] is not a host conversion, so such a request
    /// leaves the payload as it is.
    pub fn convert(&self, kind: Kind) -> Payload {
        match kind {
            Kind::Null => Payload::Null,
            Kind::Bool => Payload::Bool(self.to_bool()),
            Kind::Int => Payload::Int(self.to_int()),
            Kind::Float => Payload::Float(self.to_float()),
            Kind::String => Payload::String(self.to_bytes()),
            Kind::Array => self.to_array(),
            Kind::Object => self.to_object(),
            Kind::Callable => self.fork(),
        }
    }

    fn to_bool(&self) -> bool {
        match self {
            Payload::Null => false,
            Payload::Bool(b) => *b,
            Payload::Int(n) => *n != 0,
            Payload::Float(n) => *n != 0.0,
            Payload::String(s) => !(s.is_empty() || s.as_slice() == b"0"),
            Payload::Array(items) => !items.is_empty(),
            Payload::Object(_) | Payload::Callable(_) => true,
        }
    }

    fn to_int(&self) -> i64 {
        match self {
            Payload::Null => 0,
            Payload::Bool(b) => i64::from(*b),
            Payload::Int(n) => *n,
            Payload::Float(n) => float_to_int(*n),
            Payload::String(s) => parse_int_prefix(s),
            Payload::Array(items) => i64::from(!items.is_empty()),
            Payload::Object(_) | Payload::Callable(_) => 1,
        }
    }

    fn to_float(&self) -> f64 {
        match self {
            Payload::Float(n) => *n,
            Payload::String(s) => parse_number(s).as_f64(),
            other => other.to_int() as f64,
        }
    }

    fn to_bytes(&self) -> Vec<u8> {
        match self {
            Payload::Null => Vec::new(),
            Payload::Bool(true) => b"1".to_vec(),
            Payload::Bool(false) => Vec::new(),
            Payload::Int(n) => n.to_string().into_bytes(),
            Payload::Float(n) => format_float(*n).into_bytes(),
            Payload::String(s) => s.clone(),
            Payload::Array(_) => b"Array".to_vec(),
            Payload::Object(_) => b"Object".to_vec(),
            Payload::Callable(_) => b"Closure".to_vec(),
        }
    }

    fn to_array(&self) -> Payload {
        match self {
            Payload::Null => Payload::Array(Array::new()),
            Payload::Array(_) => self.fork(),
            Payload::Object(object) => Payload::Array(
                object
                    .properties()
                    .into_iter()
                    .map(|(name, value)| (ArrayKey::Str(name), value))
                    .collect(),
            ),
            scalar => {
                let mut items = Array::new();
                items.insert(ArrayKey::Int(0), Value::from_payload(scalar.fork()));
                Payload::Array(items)
            }
        }
    }

    fn to_object(&self) -> Payload {
        match self {
            Payload::Object(object) => Payload::Object(Rc::clone(object)),
            Payload::Null => Payload::Object(Rc::new(Object::new(STD_CLASS))),
            Payload::Array(items) => {
                let object = Object::new(STD_CLASS);
                for (key, element) in items {
                    object.set_property(key.to_string(), element);
                }
                Payload::Object(Rc::new(object))
            }
            Payload::Callable(_) => Payload::Object(Rc::new(Object::new("Closure"))),
            scalar => {
                let object = Object::new(STD_CLASS);
                object.set_property("scalar", &Value::from_payload(scalar.fork()));
                Payload::Object(Rc::new(object))
            }
        }
    }
}

/// Truncate toward zero.
///
/// Floats outside the `i64` range, infinities and NaN all become 0
/// rather than saturating.
fn float_to_int(n: f64) -> i64 {
    // 2^63 is exact as an f64; i64::MAX is not
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if (-LIMIT..LIMIT).contains(&n) {
        n as i64
    } else {
        0
    }
}

/// Render a float in the host's canonical decimal form.
///
/// Uses the shortest representation that round-trips. Very large or very
/// small magnitudes switch to exponent form, e.g. `1.0E+25`.
pub(crate) fn format_float(n: f64) -> String {
    if n.is_nan() {
        return "NAN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "INF" } else { "-INF" }.to_string();
    }

    let magnitude = n.abs();
    if magnitude != 0.0 && !(1e-4..1e15).contains(&magnitude) {
        let formatted = format!("{:e}", n);
        let (mantissa, exponent) = formatted.split_once('e').unwrap_or((formatted.as_str(), "0"));
        let mantissa = if mantissa.contains('.') {
            mantissa.to_string()
        } else {
            format!("{}.0", mantissa)
        };
        return match exponent.strip_prefix('-') {
            Some(digits) => format!("{}E-{}", mantissa, digits),
            None => format!("{}E+{}", mantissa, exponent),
        };
    }

    format!("{}", n)
}

fn skip_whitespace(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'\x0b' | b'\x0c'))
        .unwrap_or(bytes.len());
    &bytes[start..]
}

fn digit_run(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Parse the leading integer of a byte string, `strtol`-style.
///
/// Leading whitespace and a sign are accepted; parsing stops at the first
/// non-digit. No digits yields 0, overflow saturates.
pub(crate) fn parse_int_prefix(bytes: &[u8]) -> i64 {
    let rest = skip_whitespace(bytes);
    let (negative, rest) = match rest.first() {
        Some(b'-') => (true, &rest[1..]),
        Some(b'+') => (false, &rest[1..]),
        _ => (false, rest),
    };

    let mut result: i64 = 0;
    for digit in rest.iter().take_while(|b| b.is_ascii_digit()) {
        let d = i64::from(digit - b'0');
        let next = result
            .checked_mul(10)
            .and_then(|r| if negative { r.checked_sub(d) } else { r.checked_add(d) });
        match next {
            Some(n) => result = n,
            None => return if negative { i64::MIN } else { i64::MAX },
        }
    }
    result
}

/// Parse the leading number of a byte string.
///
/// The prefix is an integer unless it has a fractional part or an exponent,
/// or overflows `i64`. A string without a numeric prefix is `Int(0)`.
pub(crate) fn parse_number(bytes: &[u8]) -> Number {
    let rest = skip_whitespace(bytes);
    let sign_len = usize::from(matches!(rest.first(), Some(b'-') | Some(b'+')));

    let int_digits = digit_run(&rest[sign_len..]);
    let mut end = sign_len + int_digits;
    let mut is_float = false;

    let mut frac_digits = 0;
    if rest.get(end) == Some(&b'.') {
        frac_digits = digit_run(&rest[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
            is_float = true;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return Number::Int(0);
    }

    if matches!(rest.get(end), Some(b'e') | Some(b'E')) {
        let exp_sign = usize::from(matches!(rest.get(end + 1), Some(b'-') | Some(b'+')));
        let exp_digits = digit_run(&rest[(end + 1 + exp_sign).min(rest.len())..]);
        if exp_digits > 0 {
            end += 1 + exp_sign + exp_digits;
            is_float = true;
        }
    }

    // The prefix is ASCII by construction.
    let text = String::from_utf8_lossy(&rest[..end]);
    if !is_float {
        if let Ok(n) = text.parse::<i64>() {
            return Number::Int(n);
        }
    }
    Number::Float(text.parse::<f64>().unwrap_or(0.0))
}
