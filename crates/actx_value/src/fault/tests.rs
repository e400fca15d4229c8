use pretty_assertions::assert_eq;

use super::*;

#[test]
fn display_shows_kind_and_message() {
    let fault = Fault::new(FaultKind::DivideByZero, "attempted to divide by zero");
    assert_eq!(fault.to_string(), "[DivideByZero: attempted to divide by zero]");
}

#[test]
fn custom_kinds_render_their_name() {
    let fault = custom("Timeout", "took too long");
    assert_eq!(fault.kind(), FaultKind::Custom(Name::new("Timeout")));
    assert_eq!(fault.to_string(), "[Timeout: took too long]");
}

#[test]
fn equality_is_identity() {
    let a = divide_by_zero();
    let b = divide_by_zero();
    assert_eq!(a, a.clone());
    assert_ne!(a, b);
    assert_eq!(a.kind(), b.kind());
}

#[test]
fn disposal_fault_carries_error_text() {
    let fault = disposal(&DisposeError::failed("socket busy"));
    assert_eq!(fault.kind(), FaultKind::Disposal);
    assert_eq!(fault.message(), "disposal failed: socket busy");
}

#[test]
fn null_reference_names_member() {
    let fault = null_reference("Length");
    assert_eq!(fault.kind(), FaultKind::NullReference);
    assert!(fault.message().contains("`Length`"));
}
