//! Built-in conversions between primitive values.
//!
//! Unchecked conversions truncate like the host's casts: integers keep their
//! low bits, doubles saturate toward the target range. Checked conversions
//! fault with `Overflow` when the source is out of range.

use actx_value::{fault, EvalResult, Primitive, Value};

/// Integral view of a value, widened to `i64`.
fn integral(value: &Value) -> Option<i64> {
    match value {
        Value::Byte(b) => Some(i64::from(*b)),
        Value::Char(c) => Some(i64::from(u32::from(*c))),
        Value::Int(i) => Some(i64::from(*i)),
        Value::Long(l) => Some(*l),
        _ => None,
    }
}

/// Convert a non-null primitive value to another primitive kind.
pub(crate) fn convert_primitive(value: &Value, to: Primitive, checked: bool) -> EvalResult {
    if value.primitive() == Some(to) {
        return Ok(value.clone());
    }
    if let Some(i) = integral(value) {
        return from_integral(i, to, checked);
    }
    if let Value::Double(d) = value {
        return from_double(*d, to, checked);
    }
    Err(fault::invalid_cast(value, to.name()))
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    reason = "unchecked conversions truncate like host casts"
)]
fn from_integral(i: i64, to: Primitive, checked: bool) -> EvalResult {
    let out_of_range = || fault::overflow("conversion");
    match to {
        Primitive::Byte if checked => u8::try_from(i).map(Value::Byte).map_err(|_| out_of_range()),
        Primitive::Byte => Ok(Value::Byte(i as u8)),
        Primitive::Int if checked => i32::try_from(i).map(Value::Int).map_err(|_| out_of_range()),
        Primitive::Int => Ok(Value::Int(i as i32)),
        Primitive::Long => Ok(Value::Long(i)),
        Primitive::Double => Ok(Value::Double(i as f64)),
        Primitive::Char => {
            let unit = if checked {
                u16::try_from(i).map_err(|_| out_of_range())?
            } else {
                i as u16
            };
            char::from_u32(u32::from(unit))
                .map(Value::Char)
                .ok_or_else(|| fault::invalid_cast(format_args!("\\u{{{unit:04x}}}"), "char"))
        }
        Primitive::Bool => Err(fault::invalid_cast(i, "bool")),
    }
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "unchecked conversions saturate like host casts"
)]
fn from_double(d: f64, to: Primitive, checked: bool) -> EvalResult {
    let t = d.trunc();
    let in_range = |min: f64, max_exclusive: f64| d.is_finite() && t >= min && t < max_exclusive;
    let overflow = || Err(fault::overflow("conversion"));
    match to {
        Primitive::Byte if checked && !in_range(0.0, 256.0) => overflow(),
        Primitive::Byte => Ok(Value::Byte(d as u8)),
        Primitive::Int if checked && !in_range(-2_147_483_648.0, 2_147_483_648.0) => overflow(),
        Primitive::Int => Ok(Value::Int(d as i32)),
        Primitive::Long
            if checked && !in_range(-9_223_372_036_854_775_808.0, 9_223_372_036_854_775_808.0) =>
        {
            overflow()
        }
        Primitive::Long => Ok(Value::Long(d as i64)),
        Primitive::Char if checked && !in_range(0.0, 65_536.0) => overflow(),
        Primitive::Char => from_integral(i64::from(d as u16), Primitive::Char, false),
        Primitive::Double => Ok(Value::Double(d)),
        Primitive::Bool => Err(fault::invalid_cast(d, "bool")),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use actx_value::{FaultKind, Primitive, Value};
    use pretty_assertions::assert_eq;

    use super::convert_primitive;

    #[test]
    fn unchecked_narrowing_keeps_low_bits() {
        let value = convert_primitive(&Value::Long(0x1_0000_0001), Primitive::Int, false);
        assert_eq!(value.unwrap(), Value::Int(1));
        let value = convert_primitive(&Value::Int(300), Primitive::Byte, false);
        assert_eq!(value.unwrap(), Value::Byte(44));
    }

    #[test]
    fn checked_narrowing_faults_out_of_range() {
        let fault = convert_primitive(&Value::Int(300), Primitive::Byte, true).unwrap_err();
        assert_eq!(fault.kind(), FaultKind::Overflow);
        let fault = convert_primitive(&Value::Double(3e9), Primitive::Int, true).unwrap_err();
        assert_eq!(fault.kind(), FaultKind::Overflow);
        let fault = convert_primitive(&Value::Double(f64::NAN), Primitive::Long, true).unwrap_err();
        assert_eq!(fault.kind(), FaultKind::Overflow);
    }

    #[test]
    fn doubles_truncate_toward_zero() {
        let value = convert_primitive(&Value::Double(-2.9), Primitive::Int, true);
        assert_eq!(value.unwrap(), Value::Int(-2));
    }

    #[test]
    fn chars_convert_through_code_units() {
        let value = convert_primitive(&Value::Int(65), Primitive::Char, false);
        assert_eq!(value.unwrap(), Value::Char('A'));
        let value = convert_primitive(&Value::Char('A'), Primitive::Long, false);
        assert_eq!(value.unwrap(), Value::Long(65));
        let fault = convert_primitive(&Value::Int(0xD800), Primitive::Char, false).unwrap_err();
        assert_eq!(fault.kind(), FaultKind::InvalidCast);
    }
}
