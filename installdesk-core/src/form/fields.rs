//! Ordered multimap of submitted form fields.

use crate::form::{FormMode, RepeatedGroup};

/// Ordered multimap of submitted form fields.
///
/// Same shape as an `application/x-www-form-urlencoded` body: a name may
/// repeat, and the order of repeats is significant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pairs: Vec<(String, String)>,
}

impl FormFields {
    pub fn new() -> Self {
        FormFields::default()
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// First value for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Every value for `name`, in submission order.
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn count(&self, name: &str) -> usize {
        self.pairs.iter().filter(|(n, _)| n == name).count()
    }

    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((name.into(), value.into()));
    }

    /// Replace every value of `name` with a single one, keeping the position
    /// of the first occurrence.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.pairs.iter().position(|(n, _)| n == name) {
            Some(first) => {
                self.pairs[first].1 = value;
                let mut seen = 0;
                self.pairs.retain(|(n, _)| {
                    if n != name {
                        return true;
                    }
                    seen += 1;
                    seen == 1
                });
            }
            None => self.append(name, value),
        }
    }

    /// Remove the `index`-th occurrence of `name`.
    pub fn remove_at(&mut self, name: &str, index: usize) -> Option<String> {
        let position = self
            .pairs
            .iter()
            .enumerate()
            .filter(|(_, (n, _))| n == name)
            .nth(index)
            .map(|(i, _)| i)?;
        Some(self.pairs.remove(position).1)
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.pairs.retain(|(n, _)| keep(n));
    }

    /// Append one row to a repeated group. Local only; nothing is sent until
    /// the enclosing form is submitted.
    pub fn push_row(
        &mut self,
        group: RepeatedGroup,
        mode: FormMode,
        entry: impl Into<String>,
        price: impl Into<String>,
    ) {
        let (entry_name, price_name) = group.field_names(mode);
        self.append(entry_name, entry);
        self.append(price_name, price);
    }

    /// Remove row `index` from both parallel arrays of a repeated group.
    ///
    /// Returns the removed `(entry, price)`; a side that was already missing
    /// comes back as `None`.
    pub fn remove_row(
        &mut self,
        group: RepeatedGroup,
        mode: FormMode,
        index: usize,
    ) -> (Option<String>, Option<String>) {
        let (entry_name, price_name) = group.field_names(mode);
        let entry = self.remove_at(&entry_name, index);
        let price = self.remove_at(&price_name, index);
        (entry, price)
    }

    pub fn row_count(&self, group: RepeatedGroup, mode: FormMode) -> usize {
        let (entry_name, price_name) = group.field_names(mode);
        self.count(&entry_name).max(self.count(&price_name))
    }
}

impl FromIterator<(String, String)> for FormFields {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        FormFields {
            pairs: iter.into_iter().collect(),
        }
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for FormFields {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(n, v)| (n.to_string(), v.to_string()))
            .collect()
    }
}

impl IntoIterator for FormFields {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.into_iter()
    }
}
