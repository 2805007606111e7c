use crate::ast::Value;
use std::collections::HashMap;

/// Maps a variable name to its value. Returning `None` makes the evaluator fail with
/// `UnresolvedVariable`.
pub trait Resolver: Send + Sync {
    fn resolve(&self, name: &str) -> Option<Value>;
}

/// What a [`MapResolver`] answers for names it does not hold.
///
/// The choice matters for conditionals: with `Null`, `if(missing, 1, 2)` picks the
/// else-branch, with `Error` the whole evaluation fails.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum MissingVariable {
    #[default]
    Error,
    Null,
}

/// Resolves variables from a fixed, case-sensitive name -> value map.
#[derive(Debug, Clone, Default)]
pub struct MapResolver {
    values: HashMap<String, Value>,
    missing: MissingVariable,
}

impl MapResolver {
    pub fn new(values: HashMap<String, Value>) -> Self {
        Self {
            values,
            missing: MissingVariable::Error,
        }
    }

    pub fn with_missing(mut self, missing: MissingVariable) -> Self {
        self.missing = missing;
        self
    }

    pub fn insert<T: Into<Value>>(&mut self, name: &str, value: T) {
        self.values.insert(name.to_string(), value.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }
}

impl Resolver for MapResolver {
    fn resolve(&self, name: &str) -> Option<Value> {
        match self.values.get(name) {
            Some(value) => Some(value.clone()),
            None => match self.missing {
                MissingVariable::Error => None,
                MissingVariable::Null => Some(Value::Null),
            },
        }
    }
}

impl From<HashMap<String, Value>> for MapResolver {
    fn from(values: HashMap<String, Value>) -> Self {
        Self::new(values)
    }
}

impl From<HashMap<String, f64>> for MapResolver {
    fn from(values: HashMap<String, f64>) -> Self {
        values.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for MapResolver {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }
}

/// Resolves nothing.
#[derive(Debug, Copy, Clone, Default)]
pub struct EmptyResolver;

impl Resolver for EmptyResolver {
    fn resolve(&self, _name: &str) -> Option<Value> {
        None
    }
}

impl<F> Resolver for F
where
    F: Fn(&str) -> Option<Value> + Send + Sync,
{
    fn resolve(&self, name: &str) -> Option<Value> {
        self(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_two_variables() {
        let resolver: MapResolver = [("t", 1.0), ("c", 2.34)].into_iter().collect();
        assert_eq!(resolver.resolve("t"), Some(Value::Number(1.0)));
        assert_eq!(resolver.resolve("c"), Some(Value::Number(2.34)));
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let resolver: MapResolver = [("price", 10.0)].into_iter().collect();
        assert_eq!(resolver.resolve("Price"), None);
        assert!(resolver.contains("price"));
    }

    #[test]
    fn test_missing_variable_policy() {
        let resolver = MapResolver::default();
        assert_eq!(resolver.resolve("unknown"), None);

        let resolver = resolver.with_missing(MissingVariable::Null);
        assert_eq!(resolver.resolve("unknown"), Some(Value::Null));
    }

    #[test]
    fn test_from_f64_map() {
        let resolver = MapResolver::from(HashMap::from([("x".to_string(), 4.5_f64)]));
        assert_eq!(resolver.resolve("x"), Some(Value::Number(4.5)));
    }

    #[test]
    fn test_insert_overwrites() {
        let mut resolver = MapResolver::default();
        resolver.insert("name", "first");
        resolver.insert("name", "second");
        assert_eq!(resolver.resolve("name"), Some(Value::from("second")));
    }

    #[test]
    fn test_closure_resolver() {
        let resolver = |name: &str| (name == "answer").then(|| Value::Number(42.0));
        assert_eq!(resolver.resolve("answer"), Some(Value::Number(42.0)));
        assert_eq!(resolver.resolve("other"), None);
        assert_eq!(EmptyResolver.resolve("answer"), None);
    }
}
