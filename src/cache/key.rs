//! Cache Key Module
//!
//! Derives canonical cache keys from call arguments.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

use super::finite::ensure_finite;
use crate::error::{MemoError, Result};

// == Call Args ==
/// Positional and keyword arguments of one call, already in serialized form.
///
/// Pass these to `MemoCache::get_or_compute_with`; the canonical key shape is
/// `[positional, keyword]`.
///
/// Keyword arguments are held in name order so two calls that pass the same
/// keywords in a different order derive the same key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallArgs {
    positional: Vec<Value>,
    keyword: BTreeMap<String, Value>,
}

impl CallArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the positional list from any serializable value.
    ///
    /// A value that serializes to a sequence (tuples, arrays, vectors) is taken
    /// as the argument list itself; anything else is a single argument.
    pub fn from_serialize<T: Serialize + ?Sized>(args: &T) -> Result<Self> {
        let positional = match to_value(args)? {
            Value::Array(items) => items,
            single => vec![single],
        };
        Ok(Self {
            positional,
            keyword: BTreeMap::new(),
        })
    }

    /// Appends a positional argument.
    pub fn arg<T: Serialize + ?Sized>(mut self, value: &T) -> Result<Self> {
        self.positional.push(to_value(value)?);
        Ok(self)
    }

    /// Sets a keyword argument, replacing an earlier one with the same name.
    pub fn kwarg<T: Serialize + ?Sized>(mut self, name: impl Into<String>, value: &T) -> Result<Self> {
        self.keyword.insert(name.into(), to_value(value)?);
        Ok(self)
    }

    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    pub fn keyword(&self) -> &BTreeMap<String, Value> {
        &self.keyword
    }
}

// == Cache Key ==
/// Canonical, comparable and hashable identity of a call's arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    // == Derive ==
    /// Derives the key for `args`, dropping the first positional argument
    /// when `skip_first` is set.
    pub fn derive(args: &CallArgs, skip_first: bool) -> Result<Self> {
        let positional = if skip_first {
            args.positional.get(1..).unwrap_or(&[])
        } else {
            &args.positional[..]
        };

        // serde_json object maps are key-sorted, so nested maps are canonical too
        let canonical = serde_json::to_string(&(positional, &args.keyword))
            .map_err(|e| MemoError::KeyDerivation(e.to_string()))?;
        Ok(Self(canonical))
    }

    /// Derives the key straight from a serializable argument value.
    pub fn for_args<T: Serialize + ?Sized>(args: &T, skip_first: bool) -> Result<Self> {
        Self::derive(&CallArgs::from_serialize(args)?, skip_first)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Converts one argument, rejecting floats JSON would flatten to `null`.
fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    ensure_finite(value)?;
    serde_json::to_value(value).map_err(|e| MemoError::KeyDerivation(e.to_string()))
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_equal_args_equal_keys() {
        let a = CacheKey::for_args(&(1, "two", 3.5), false).unwrap();
        let b = CacheKey::for_args(&(1, "two", 3.5), false).unwrap();
        assert_eq!(a, b);

        let c = CacheKey::for_args(&(1, "two", 4.5), false).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_positional_order_matters() {
        let a = CacheKey::for_args(&(1, 2), false).unwrap();
        let b = CacheKey::for_args(&(2, 1), false).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_single_value_is_one_argument() {
        let a = CacheKey::for_args(&42, false).unwrap();
        let b = CacheKey::derive(&CallArgs::new().arg(&42).unwrap(), false).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "[[42],{}]");
    }

    #[test]
    fn test_skip_first_ignores_leading_argument() {
        let a = CacheKey::for_args(&("session-a", 7), true).unwrap();
        let b = CacheKey::for_args(&("session-b", 7), true).unwrap();
        assert_eq!(a, b);

        let c = CacheKey::for_args(&("session-a", 8), true).unwrap();
        assert_ne!(a, c);

        // Without skip_first the leading argument participates
        let d = CacheKey::for_args(&("session-a", 7), false).unwrap();
        assert_ne!(a, d);
    }

    #[test]
    fn test_skip_first_on_empty_args() {
        let key = CacheKey::derive(&CallArgs::new(), true).unwrap();
        assert_eq!(key.as_str(), "[[],{}]");
    }

    #[test]
    fn test_keyword_order_is_canonical() {
        let a = CallArgs::new()
            .kwarg("alpha", &1)
            .unwrap()
            .kwarg("beta", &2)
            .unwrap();
        let b = CallArgs::new()
            .kwarg("beta", &2)
            .unwrap()
            .kwarg("alpha", &1)
            .unwrap();
        assert_eq!(
            CacheKey::derive(&a, false).unwrap(),
            CacheKey::derive(&b, false).unwrap()
        );
    }

    #[test]
    fn test_keyword_and_positional_are_distinct() {
        let positional = CallArgs::new().arg(&1).unwrap();
        let keyword = CallArgs::new().kwarg("x", &1).unwrap();
        assert_ne!(
            CacheKey::derive(&positional, false).unwrap(),
            CacheKey::derive(&keyword, false).unwrap()
        );
    }

    #[test]
    fn test_hash_map_argument_is_deterministic() {
        let mut first = HashMap::new();
        let mut second = HashMap::new();
        for i in 0..32 {
            first.insert(format!("k{}", i), i);
        }
        for i in (0..32).rev() {
            second.insert(format!("k{}", i), i);
        }
        assert_eq!(
            CacheKey::for_args(&(&first,), false).unwrap(),
            CacheKey::for_args(&(&second,), false).unwrap()
        );
    }

    #[test]
    fn test_unserializable_argument_fails_immediately() {
        let mut bad = HashMap::new();
        bad.insert((1, 2), "tuple keys are not JSON object keys");

        let result = CallArgs::new().arg(&bad);
        assert!(matches!(result, Err(MemoError::KeyDerivation(_))));

        let result = CacheKey::for_args(&(&bad,), false);
        assert!(matches!(result, Err(MemoError::KeyDerivation(_))));
    }

    #[test]
    fn test_non_finite_floats_are_rejected() {
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                CacheKey::for_args(&value, false),
                Err(MemoError::KeyDerivation(_))
            ));
            assert!(matches!(
                CacheKey::for_args(&(1, Some(value)), false),
                Err(MemoError::KeyDerivation(_))
            ));
            assert!(matches!(
                CallArgs::new().kwarg("x", &value),
                Err(MemoError::KeyDerivation(_))
            ));
        }
        assert!(matches!(
            CallArgs::new().arg(&f32::NAN),
            Err(MemoError::KeyDerivation(_))
        ));
    }

    #[test]
    fn test_none_keeps_its_own_key() {
        let none = CacheKey::for_args(&None::<f64>, false).unwrap();
        assert_eq!(none.as_str(), "[[null],{}]");

        let zero = CacheKey::for_args(&Some(0.0), false).unwrap();
        let negative_zero = CacheKey::for_args(&Some(-0.0), false).unwrap();
        assert_ne!(none, zero);
        assert_ne!(zero, negative_zero);
    }

    #[test]
    fn test_call_args_accessors() {
        let args = CallArgs::new()
            .arg(&"a")
            .unwrap()
            .arg(&2)
            .unwrap()
            .kwarg("flag", &true)
            .unwrap();
        assert_eq!(args.positional(), &[Value::from("a"), Value::from(2)]);
        assert_eq!(args.keyword().get("flag"), Some(&Value::Bool(true)));
        assert_eq!(args.keyword().len(), 1);

        let spread = CallArgs::from_serialize(&("a", 2)).unwrap();
        assert_eq!(spread.positional(), args.positional());
        assert!(spread.keyword().is_empty());
    }
}
