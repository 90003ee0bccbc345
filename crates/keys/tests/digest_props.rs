//! Property-based tests for call-digest stability and sensitivity.
//!
//! These verify the behavioral contracts of key derivation:
//! - Determinism: the same binding always produces the same digest
//! - Order invariance: calling convention and keyword order don't matter
//! - Sensitivity: changing any bound value changes the digest

use memostash_keys::value::minimal_signed_le;
use memostash_keys::{Signature, Value, digest_call};
use proptest::prelude::*;

/// Generate valid parameter names
fn param_name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,12}".prop_map(String::from)
}

/// Generate scalar argument values
fn value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(Value::from),
        any::<bool>().prop_map(Value::from),
        "[ -~]{0,20}".prop_map(Value::from),
        any::<f64>().prop_map(Value::from),
    ]
}

/// Generate a signature together with a full positional argument list
fn call_strategy() -> impl Strategy<Value = (Vec<String>, Vec<Value>)> {
    prop::collection::btree_set(param_name_strategy(), 0..6).prop_flat_map(|names| {
        let names: Vec<String> = names.into_iter().collect();
        let len = names.len();
        (
            Just(names),
            prop::collection::vec(value_strategy(), len..=len),
        )
    })
}

proptest! {
    /// Same binding, same digest, every time
    #[test]
    fn digest_is_deterministic((names, values) in call_strategy()) {
        let sig = Signature::of_required(names.clone());
        let d1 = digest_call(&sig.bind(values.clone(), vec![]).unwrap());
        let d2 = digest_call(&sig.bind(values, vec![]).unwrap());
        prop_assert_eq!(d1, d2);
    }

    /// Positional and keyword forms of the same call digest identically,
    /// regardless of keyword order
    #[test]
    fn digest_ignores_calling_convention((names, values) in call_strategy()) {
        let sig = Signature::of_required(names.clone());
        let positional = digest_call(&sig.bind(values.clone(), vec![]).unwrap());

        let mut keyword: Vec<(String, Value)> =
            names.into_iter().zip(values).collect();
        keyword.reverse();
        let by_name = digest_call(&sig.bind(vec![], keyword).unwrap());

        prop_assert_eq!(positional, by_name);
    }

    /// Replacing one bound integer with a different one changes the digest
    #[test]
    fn digest_is_sensitive_to_values(
        (names, mut values) in call_strategy().prop_filter("needs at least one arg", |(n, _)| !n.is_empty()),
        index in any::<prop::sample::Index>(),
        replacement in any::<i64>(),
    ) {
        let sig = Signature::of_required(names);
        let before = digest_call(&sig.bind(values.clone(), vec![]).unwrap());

        let i = index.index(values.len());
        let original = values[i].clone();
        values[i] = Value::from(replacement);
        prop_assume!(values[i] != original);

        let after = digest_call(&sig.bind(values, vec![]).unwrap());
        prop_assert_ne!(before, after);
    }

    /// The minimal signed LE encoding round-trips through sign extension
    #[test]
    fn minimal_signed_le_roundtrip(v in any::<i64>()) {
        let bytes = minimal_signed_le(v);
        prop_assert!(!bytes.is_empty() && bytes.len() <= 8);

        let negative = bytes.last().is_some_and(|b| b & 0x80 != 0);
        let fill = if negative { 0xff } else { 0x00 };
        let mut full = [fill; 8];
        full[..bytes.len()].copy_from_slice(&bytes);
        prop_assert_eq!(i64::from_le_bytes(full), v);
    }
}
