//! Tag Attributes
//!
//! Attributes of one opening tag, kept sorted by name with no duplicates.

/// A single `name="value"` pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Attribute {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Returned by [`AttributeSet::insert`] when the name is already taken.
/// Carries the rejected attribute back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redefinition(pub Attribute);

/// Name-ordered set of attributes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeSet {
    entries: Vec<Attribute>,
}

impl AttributeSet {
    pub fn new() -> Self {
        AttributeSet::default()
    }

    /// Insert an attribute, keeping name order.
    ///
    /// Fails without modifying the set if an attribute with the same name exists.
    pub fn insert(&mut self, attribute: Attribute) -> Result<(), Redefinition> {
        match self
            .entries
            .binary_search_by(|probe| probe.name.as_str().cmp(attribute.name.as_str()))
        {
            Ok(_) => Err(Redefinition(attribute)),
            Err(index) => {
                self.entries.insert(index, attribute);
                Ok(())
            }
        }
    }

    /// Look up a value by attribute name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .binary_search_by(|probe| probe.name.as_str().cmp(name))
            .ok()
            .map(|index| self.entries[index].value.as_str())
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate in name order
    pub fn iter(&self) -> std::slice::Iter<'_, Attribute> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a AttributeSet {
    type Item = &'a Attribute;
    type IntoIter = std::slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
