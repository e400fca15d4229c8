//! Members of the built-in `string` type.

use std::sync::LazyLock;

use crate::fault::{self, EvalResult, Fault};
use crate::{Indexer, Method, Property, Type, Value};

fn text(target: &Value) -> Result<&str, Fault> {
    target
        .as_str()
        .ok_or_else(|| fault::invalid_cast(format_args!("{target:?}"), Type::String))
}

fn int_arg(args: &[Value], index: usize) -> Result<i32, Fault> {
    args.get(index)
        .and_then(Value::as_int)
        .ok_or_else(|| fault::argument(format!("argument {index} must be an int")))
}

fn char_count(s: &str) -> i32 {
    i32::try_from(s.chars().count()).unwrap_or(i32::MAX)
}

static LENGTH: LazyLock<Property> = LazyLock::new(|| {
    Property::new(Type::String, "Length", Type::INT, |target| {
        Ok(Value::Int(char_count(text(target)?)))
    })
});

static TO_UPPER: LazyLock<Method> = LazyLock::new(|| {
    Method::new(Type::String, "ToUpper", Vec::new(), Type::String, |target, _| {
        Ok(Value::from(text(target)?.to_uppercase()))
    })
});

static TO_LOWER: LazyLock<Method> = LazyLock::new(|| {
    Method::new(Type::String, "ToLower", Vec::new(), Type::String, |target, _| {
        Ok(Value::from(text(target)?.to_lowercase()))
    })
});

static CONTAINS: LazyLock<Method> = LazyLock::new(|| {
    Method::new(
        Type::String,
        "Contains",
        vec![Type::String],
        Type::BOOL,
        |target, args| {
            let needle = args
                .first()
                .and_then(Value::as_str)
                .ok_or_else(|| fault::argument("value cannot be null"))?;
            Ok(Value::Bool(text(target)?.contains(needle)))
        },
    )
});

static SUBSTRING: LazyLock<Method> = LazyLock::new(|| {
    Method::new(
        Type::String,
        "Substring",
        vec![Type::INT, Type::INT],
        Type::String,
        |target, args| substring(text(target)?, int_arg(args, 0)?, int_arg(args, 1)?),
    )
});

static CHARS: LazyLock<Indexer> = LazyLock::new(|| {
    Indexer::named(
        Type::String,
        "Chars",
        vec![Type::INT],
        Type::CHAR,
        |target, args| {
            let s = text(target)?;
            let index = int_arg(args, 0)?;
            usize::try_from(index)
                .ok()
                .and_then(|i| s.chars().nth(i))
                .map(Value::Char)
                .ok_or_else(|| fault::index_out_of_range(i64::from(index), s.chars().count()))
        },
    )
});

fn substring(s: &str, start: i32, length: i32) -> EvalResult {
    let total = s.chars().count();
    let range = usize::try_from(start)
        .ok()
        .zip(usize::try_from(length).ok())
        .filter(|(start, length)| start.checked_add(*length).is_some_and(|end| end <= total));
    match range {
        Some((start, length)) => Ok(Value::from(
            s.chars().skip(start).take(length).collect::<String>(),
        )),
        None => Err(fault::argument(format!(
            "start {start} and length {length} must refer to a location within the string"
        ))),
    }
}

/// `string.Length`, counted in chars.
pub fn string_length() -> Property {
    LENGTH.clone()
}

/// `string.ToUpper()`.
pub fn string_to_upper() -> Method {
    TO_UPPER.clone()
}

/// `string.ToLower()`.
pub fn string_to_lower() -> Method {
    TO_LOWER.clone()
}

/// `string.Contains(string)`.
pub fn string_contains() -> Method {
    CONTAINS.clone()
}

/// `string.Substring(int, int)`.
pub fn string_substring() -> Method {
    SUBSTRING.clone()
}

/// `string[int]`.
pub fn string_chars() -> Indexer {
    CHARS.clone()
}
