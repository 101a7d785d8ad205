use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::FilterValue;

/// Terminal values of a finished group, keyed by filter name in declaration order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterResults {
    entries: Vec<(String, FilterValue)>,
}

impl FilterResults {
    pub(crate) fn push(&mut self, name: &str, value: FilterValue) {
        self.entries.push((name.to_string(), value));
    }

    pub fn get(&self, name: &str) -> Option<&FilterValue> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> { self.entries.iter().map(|(key, _)| key.as_str()) }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

impl Serialize for FilterResults {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'a> IntoIterator for &'a FilterResults {
    type Item = (&'a str, &'a FilterValue);
    type IntoIter = Box<dyn Iterator<Item = Self::Item> + 'a>;

    fn into_iter(self) -> Self::IntoIter { Box::new(self.iter()) }
}
