//! Argument binding and the call digest
//!
//! A `Binding` is the single canonical form of one invocation's arguments:
//! an ordered-by-name map from parameter name to value. Normalizing
//! positional and keyword forms into this map is what makes `f(1)` and
//! `f(a = 1)` hash identically.

use crate::value::{Value, condense};
use crate::{Digest, Error, Result};
use sha2::{Digest as _, Sha256};
use std::collections::BTreeMap;

/// A declared parameter of a wrapped function
#[derive(Debug, Clone)]
pub struct Param {
    name: String,
    has_default: bool,
}

impl Param {
    /// A parameter that must be bound on every call
    #[must_use]
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            has_default: false,
        }
    }

    /// A parameter with a default at the definition site.
    ///
    /// Calls that leave it unbound simply omit it from the binding; the
    /// default value itself never reaches the digest. A call supplying the
    /// default explicitly therefore digests differently from one omitting
    /// it, which mirrors binding without default application.
    #[must_use]
    pub fn optional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            has_default: true,
        }
    }

    /// The parameter name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A function's declared parameter list, in declaration order
#[derive(Debug, Clone)]
pub struct Signature {
    params: Vec<Param>,
}

impl Signature {
    /// Build a signature from its parameters
    #[must_use]
    pub fn new(params: Vec<Param>) -> Self {
        Self { params }
    }

    /// Shorthand for a signature of required parameters only
    #[must_use]
    pub fn of_required<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(names.into_iter().map(Param::required).collect())
    }

    /// Resolve positional and keyword arguments into a canonical binding.
    ///
    /// Positional arguments fill parameters in declaration order; keyword
    /// arguments fill by name. Every required parameter must end up bound.
    ///
    /// # Errors
    ///
    /// Returns an error on surplus positional arguments, unknown keyword
    /// names, a parameter bound both ways, or an unbound required parameter.
    pub fn bind(
        &self,
        positional: Vec<Value>,
        keyword: Vec<(String, Value)>,
    ) -> Result<Binding> {
        if positional.len() > self.params.len() {
            return Err(Error::TooManyPositional {
                expected: self.params.len(),
                given: positional.len(),
            });
        }

        let mut arguments = BTreeMap::new();
        for (param, value) in self.params.iter().zip(positional) {
            arguments.insert(param.name.clone(), value);
        }
        for (name, value) in keyword {
            if !self.params.iter().any(|p| p.name == name) {
                return Err(Error::UnknownParameter { name });
            }
            if arguments.contains_key(&name) {
                return Err(Error::DuplicateArgument { name });
            }
            arguments.insert(name, value);
        }
        for param in &self.params {
            if !param.has_default && !arguments.contains_key(&param.name) {
                return Err(Error::MissingArgument {
                    name: param.name.clone(),
                });
            }
        }

        Ok(Binding { arguments })
    }
}

/// The canonical, name-sorted form of one invocation's arguments.
///
/// `BTreeMap` keeps iteration in ascending byte-wise name order, which makes
/// the call digest independent of call-site argument order and of any map
/// iteration nondeterminism.
#[derive(Debug, Clone)]
pub struct Binding {
    arguments: BTreeMap<String, Value>,
}

impl Binding {
    /// The bound arguments in ascending name order
    pub fn arguments(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.arguments.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Look up one bound argument by parameter name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.arguments.get(name)
    }

    /// Number of bound arguments
    #[must_use]
    pub fn len(&self) -> usize {
        self.arguments.len()
    }

    /// Whether no arguments are bound
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }
}

/// Lossily condense a binding into the call digest.
///
/// Streams each (name, condensed value) pair through SHA-256 in ascending
/// name order. Same argument values under any calling convention produce the
/// same digest; different argument sets produce, with overwhelming
/// probability, different digests.
#[must_use]
pub fn digest_call(binding: &Binding) -> Digest {
    let mut hasher = Sha256::new();
    for (name, value) in binding.arguments() {
        hasher.update(name.as_bytes());
        hasher.update(condense(value));
    }
    Digest::from_hash_output(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sig_ab() -> Signature {
        Signature::of_required(["a", "b"])
    }

    #[test]
    fn positional_and_keyword_bind_identically() {
        let sig = sig_ab();
        let pos = sig.bind(vec![1.into(), 2.into()], vec![]).unwrap();
        let kw = sig
            .bind(vec![], vec![("a".into(), 1.into()), ("b".into(), 2.into())])
            .unwrap();
        let mixed = sig.bind(vec![1.into()], vec![("b".into(), 2.into())]).unwrap();
        assert_eq!(digest_call(&pos), digest_call(&kw));
        assert_eq!(digest_call(&pos), digest_call(&mixed));
    }

    #[test]
    fn keyword_order_is_irrelevant() {
        let sig = sig_ab();
        let ab = sig
            .bind(vec![], vec![("a".into(), 1.into()), ("b".into(), 2.into())])
            .unwrap();
        let ba = sig
            .bind(vec![], vec![("b".into(), 2.into()), ("a".into(), 1.into())])
            .unwrap();
        assert_eq!(digest_call(&ab), digest_call(&ba));
    }

    #[test]
    fn different_values_digest_differently() {
        let sig = Signature::of_required(["a"]);
        let one = sig.bind(vec![1.into()], vec![]).unwrap();
        let two = sig.bind(vec![2.into()], vec![]).unwrap();
        assert_ne!(digest_call(&one), digest_call(&two));
    }

    #[test]
    fn swapped_values_digest_differently() {
        let sig = sig_ab();
        let ab = sig.bind(vec![1.into(), 2.into()], vec![]).unwrap();
        let ba = sig.bind(vec![2.into(), 1.into()], vec![]).unwrap();
        assert_ne!(digest_call(&ab), digest_call(&ba));
    }

    #[test]
    fn empty_binding_digest_is_stable() {
        let sig = Signature::new(vec![]);
        let a = sig.bind(vec![], vec![]).unwrap();
        let b = sig.bind(vec![], vec![]).unwrap();
        assert_eq!(digest_call(&a), digest_call(&b));
        // SHA-256 of the empty input
        assert_eq!(
            digest_call(&a).as_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn surplus_positional_is_rejected() {
        let sig = Signature::of_required(["a"]);
        assert!(matches!(
            sig.bind(vec![1.into(), 2.into()], vec![]),
            Err(Error::TooManyPositional { expected: 1, given: 2 })
        ));
    }

    #[test]
    fn unknown_keyword_is_rejected() {
        let sig = Signature::of_required(["a"]);
        assert!(matches!(
            sig.bind(vec![], vec![("nope".into(), 1.into())]),
            Err(Error::UnknownParameter { .. })
        ));
    }

    #[test]
    fn double_binding_is_rejected() {
        let sig = sig_ab();
        assert!(matches!(
            sig.bind(vec![1.into()], vec![("a".into(), 1.into())]),
            Err(Error::DuplicateArgument { .. })
        ));
    }

    #[test]
    fn missing_required_is_rejected() {
        let sig = sig_ab();
        assert!(matches!(
            sig.bind(vec![1.into()], vec![]),
            Err(Error::MissingArgument { .. })
        ));
    }

    #[test]
    fn unbound_optional_is_omitted() {
        let sig = Signature::new(vec![Param::required("a"), Param::optional("b")]);
        let omitted = sig.bind(vec![1.into()], vec![]).unwrap();
        assert_eq!(omitted.len(), 1);
        assert!(omitted.get("b").is_none());

        // Supplying the default's value explicitly digests differently:
        // defaults are never applied into the binding.
        let explicit = sig.bind(vec![1.into(), 2.into()], vec![]).unwrap();
        assert_ne!(digest_call(&omitted), digest_call(&explicit));
    }
}
