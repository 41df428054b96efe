//! # Object Names
//!
//! Native representation of the `ObjectName` simple type: a domain plus an
//! unordered, non-empty set of `key=value` properties, written
//! `domain:key=value[,key=value]*`.
//!
//! Two names are equal when their canonical forms are equal; the canonical
//! form lists key properties in lexicographic key order. Ordering compares
//! the domain first and then the canonical key property list.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::ConversionError;

const TARGET: &str = "javax.management.ObjectName";
const RESERVED: [char; 3] = [',', '=', ':'];

/// A parsed management object name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectName {
    domain: String,
    properties: BTreeMap<String, String>,
}

impl ObjectName {
    /// Build an object name from a domain and its key properties.
    pub fn new<I, K, V>(domain: impl Into<String>, properties: I) -> Result<Self, ConversionError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let domain = domain.into();
        let mut map = BTreeMap::new();
        for (k, v) in properties {
            let (k, v) = (k.into(), v.into());
            check_property(&domain, &k, &v)?;
            if map.insert(k.clone(), v).is_some() {
                return Err(ConversionError::new(
                    TARGET,
                    format!("{domain:?}"),
                    format!("duplicate key {k:?}"),
                ));
            }
        }
        if domain.contains(':') {
            return Err(ConversionError::new(
                TARGET,
                format!("{domain:?}"),
                "domain must not contain ':'",
            ));
        }
        if map.is_empty() {
            return Err(ConversionError::new(
                TARGET,
                format!("{domain:?}"),
                "at least one key property is required",
            ));
        }
        Ok(Self {
            domain,
            properties: map,
        })
    }

    /// The domain part.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Look up a key property.
    pub fn key_property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// Key properties in canonical (sorted) order.
    pub fn key_properties(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Canonical key property list, e.g. `name=pool,type=Memory`.
    pub fn canonical_key_list(&self) -> String {
        self.properties
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Canonical name, e.g. `java.lang:name=pool,type=Memory`.
    pub fn canonical_name(&self) -> String {
        format!("{}:{}", self.domain, self.canonical_key_list())
    }
}

fn check_property(domain: &str, key: &str, value: &str) -> Result<(), ConversionError> {
    let bad = |reason: String| ConversionError::new(TARGET, format!("{domain}:{key}={value}"), reason);
    if key.is_empty() {
        return Err(bad("empty key".into()));
    }
    if value.is_empty() {
        return Err(bad(format!("empty value for key {key:?}")));
    }
    if key.contains(RESERVED) || value.contains(RESERVED) {
        return Err(bad("key properties must not contain ',', '=' or ':'".into()));
    }
    Ok(())
}

impl PartialOrd for ObjectName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ObjectName {
    fn cmp(&self, other: &Self) -> Ordering {
        self.domain
            .cmp(&other.domain)
            .then_with(|| self.canonical_key_list().cmp(&other.canonical_key_list()))
    }
}

impl FromStr for ObjectName {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (domain, keys) = s.split_once(':').ok_or_else(|| {
            ConversionError::new(TARGET, format!("{s:?}"), "missing ':' after domain")
        })?;
        let mut properties = Vec::new();
        for pair in keys.split(',') {
            let (k, v) = pair.split_once('=').ok_or_else(|| {
                ConversionError::new(
                    TARGET,
                    format!("{s:?}"),
                    format!("key property {pair:?} is not key=value"),
                )
            })?;
            properties.push((k, v));
        }
        Self::new(domain, properties)
    }
}

impl fmt::Display for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_canonicalize() {
        let name: ObjectName = "java.lang:type=Memory,name=pool".parse().unwrap();
        assert_eq!(name.domain(), "java.lang");
        assert_eq!(name.key_property("type"), Some("Memory"));
        assert_eq!(name.canonical_name(), "java.lang:name=pool,type=Memory");
    }

    #[test]
    fn test_property_order_does_not_matter() {
        let a: ObjectName = "d:a=1,b=2".parse().unwrap();
        let b: ObjectName = "d:b=2,a=1".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.cmp(&b), Ordering::Equal);
    }

    #[test]
    fn test_rejects_malformed() {
        for bad in ["nodomain", "d:", "d:a", "d:a=", "d:=1", "d:a=1,a=2", "d:a=1,,b=2", "d:a=x:y"] {
            assert!(bad.parse::<ObjectName>().is_err(), "{bad:?} should fail");
        }
    }

    #[test]
    fn test_empty_domain_allowed() {
        let name: ObjectName = ":type=Foo".parse().unwrap();
        assert_eq!(name.domain(), "");
        assert_eq!(name.to_string(), ":type=Foo");
    }

    #[test]
    fn test_ordering_domain_first() {
        let a: ObjectName = "a:z=1".parse().unwrap();
        let b: ObjectName = "b:a=1".parse().unwrap();
        assert!(a < b);
    }
}
