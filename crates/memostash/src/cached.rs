//! The cached-function wrapper

use crate::Result;
use memostash_keys::{Binding, FunctionIdentity, Signature, Value, digest_call};
use memostash_store::{DiskStore, JsonCodec};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;

/// Description of a function to be wrapped: its qualified name, its source
/// text, and its declared signature.
///
/// The name and source digest partition storage; the signature drives
/// argument normalization. The source text is hashed as-is, so any textual
/// edit to the function invalidates its cached results.
#[derive(Debug, Clone)]
pub struct FnSpec {
    pub(crate) qualname: String,
    pub(crate) source: String,
    pub(crate) signature: Signature,
}

impl FnSpec {
    /// Describe a function by name, source text, and signature
    #[must_use]
    pub fn new(
        qualname: impl Into<String>,
        source: impl Into<String>,
        signature: Signature,
    ) -> Self {
        Self {
            qualname: qualname.into(),
            source: source.into(),
            signature,
        }
    }
}

/// Arguments for one invocation, collected positionally and by keyword
#[derive(Debug, Clone, Default)]
pub struct CallArgs {
    positional: Vec<Value>,
    keyword: Vec<(String, Value)>,
}

impl CallArgs {
    /// Start an empty argument list
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional argument
    #[must_use]
    pub fn pos(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Append a keyword argument
    #[must_use]
    pub fn kw(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.keyword.push((name.into(), value.into()));
        self
    }
}

/// A function wrapped with read-through caching.
///
/// The function digest is computed once at wrap time; each call derives only
/// the call digest. Calling is `bind -> digest -> resolve`: a hit
/// deserializes the stored result, a miss runs the inner function and
/// persists its result before returning it.
pub struct CachedFn<R, F>
where
    F: Fn(&Binding) -> R,
{
    store: DiskStore,
    identity: FunctionIdentity,
    signature: Signature,
    codec: JsonCodec,
    inner: F,
    _result: PhantomData<fn() -> R>,
}

impl<R, F> CachedFn<R, F>
where
    R: Serialize + DeserializeOwned,
    F: Fn(&Binding) -> R,
{
    pub(crate) fn new(store: DiskStore, spec: FnSpec, inner: F) -> Self {
        Self {
            store,
            identity: FunctionIdentity::new(spec.qualname, &spec.source),
            signature: spec.signature,
            codec: JsonCodec,
            inner,
            _result: PhantomData,
        }
    }

    /// The wrapped function's identity
    #[must_use]
    pub fn identity(&self) -> &FunctionIdentity {
        &self.identity
    }

    /// Invoke the wrapped function through the cache
    ///
    /// # Errors
    ///
    /// Returns an error if the arguments don't bind to the declared
    /// signature, or on a store failure as described by
    /// [`DiskStore::resolve`].
    pub fn call(&self, args: CallArgs) -> Result<R> {
        let binding = self.signature.bind(args.positional, args.keyword)?;
        let call_digest = digest_call(&binding);
        tracing::debug!(
            function = self.identity.qualname(),
            call_digest = call_digest.as_hex(),
            "resolving cached call"
        );
        let result = self
            .store
            .resolve(&self.identity, &call_digest, &self.codec, || {
                (self.inner)(&binding)
            })?;
        Ok(result)
    }
}
