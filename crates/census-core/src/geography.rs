//! Geography descriptors
//!
//! A [`Geography`] is an opaque key/value mapping supplied by the caller.
//! Datasources read the area code and record locator out of it; everything
//! else is forwarded untouched.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Deref;

use crate::error::{Error, Result};

/// Key holding the state/area postal code
pub const AREA_KEY: &str = "STUSAB";

/// Key holding the logical record number within a file
pub const LOCATOR_KEY: &str = "LOGRECNO";

/// A geography descriptor
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Geography {
    fields: BTreeMap<String, String>,
}

impl Geography {
    /// Create a descriptor with an area code and record locator
    pub fn new<A: Into<String>, L: Into<String>>(area: A, locator: L) -> Self {
        let mut geography = Self::default();
        geography.insert(AREA_KEY, area);
        geography.insert(LOCATOR_KEY, locator);
        geography
    }

    /// Set a field, returning the previous value if any
    pub fn insert<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) -> Option<String> {
        self.fields.insert(key.into(), value.into())
    }

    /// Look up a field
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// The area code
    pub fn area(&self) -> Result<&str> {
        self.require(AREA_KEY)
    }

    /// The record locator
    pub fn locator(&self) -> Result<&str> {
        self.require(LOCATOR_KEY)
    }

    /// Check that both required keys are present
    pub fn validate(&self) -> Result<()> {
        self.area()?;
        self.locator()?;
        Ok(())
    }

    /// Iterate over all fields
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn require(&self, key: &'static str) -> Result<&str> {
        self.get(key).ok_or(Error::MalformedGeography { key })
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Geography {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl fmt::Display for Geography {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.get(AREA_KEY), self.get(LOCATOR_KEY)) {
            (Some(area), Some(locator)) => write!(f, "{}:{}", area, locator),
            _ => write!(f, "{:?}", self.fields),
        }
    }
}

/// One or more geography descriptors.
///
/// A bare [`Geography`] converts into a one-element sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Geographies<'a>(Cow<'a, [Geography]>);

impl Geographies<'_> {
    /// Validate every descriptor, failing on the first missing key
    pub fn validate(&self) -> Result<()> {
        self.0.iter().try_for_each(Geography::validate)
    }
}

impl Deref for Geographies<'_> {
    type Target = [Geography];

    fn deref(&self) -> &[Geography] {
        &self.0
    }
}

impl From<Geography> for Geographies<'static> {
    fn from(geography: Geography) -> Self {
        Geographies(Cow::Owned(vec![geography]))
    }
}

impl<'a> From<&'a Geography> for Geographies<'a> {
    fn from(geography: &'a Geography) -> Self {
        Geographies(Cow::Borrowed(std::slice::from_ref(geography)))
    }
}

impl From<Vec<Geography>> for Geographies<'static> {
    fn from(geographies: Vec<Geography>) -> Self {
        Geographies(Cow::Owned(geographies))
    }
}

impl<'a> From<&'a [Geography]> for Geographies<'a> {
    fn from(geographies: &'a [Geography]) -> Self {
        Geographies(Cow::Borrowed(geographies))
    }
}

impl<'a> From<&'a Vec<Geography>> for Geographies<'a> {
    fn from(geographies: &'a Vec<Geography>) -> Self {
        Geographies(Cow::Borrowed(geographies.as_slice()))
    }
}

impl<'a, const N: usize> From<&'a [Geography; N]> for Geographies<'a> {
    fn from(geographies: &'a [Geography; N]) -> Self {
        Geographies(Cow::Borrowed(geographies.as_slice()))
    }
}
