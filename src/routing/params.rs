//! Named access to the parameter values of a match.

/// Parameter names of a matched route paired with the values `find` wrote.
#[derive(Debug, Clone, Copy)]
pub struct Params<'a> {
    names: &'a [String],
    values: &'a [&'a str],
}

impl<'a> Params<'a> {
    /// Pairs positionally; extra values beyond `names` are ignored.
    pub fn new(names: &'a [String], values: &'a [&'a str]) -> Self {
        let len = names.len().min(values.len());
        Self {
            names: &names[..len],
            values: &values[..len],
        }
    }

    /// Value bound to `name`, if the route declares it.
    pub fn get(&self, name: &str) -> Option<&'a str> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.values[i])
    }

    pub fn by_index(&self, index: usize) -> Option<&'a str> {
        self.values.get(index).copied()
    }

    pub fn names(&self) -> &'a [String] {
        self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }
}
