//! Selection variable types.

/// A binary decision variable: whether a site is selected.
///
/// Can be fixed to a value, which removes it from the search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryVar {
    /// Variable name (unique identifier within a model).
    pub name: String,
    /// Fixed value, if any.
    pub fixed: Option<bool>,
}

impl BinaryVar {
    /// Creates a free binary variable.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fixed: None,
        }
    }

    /// Creates a fixed binary variable.
    pub fn fixed(name: impl Into<String>, value: bool) -> Self {
        Self {
            name: name.into(),
            fixed: Some(value),
        }
    }

    /// Whether this variable is fixed to a single value.
    pub fn is_fixed(&self) -> bool {
        self.fixed.is_some()
    }

    /// Values the variable may take, in domain order.
    pub fn domain(&self) -> &'static [bool] {
        match self.fixed {
            Some(true) => &[true],
            Some(false) => &[false],
            None => &[false, true],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_var() {
        let v = BinaryVar::new("Mumbai");
        assert!(!v.is_fixed());
        assert_eq!(v.domain(), &[false, true]);

        let f = BinaryVar::fixed("Delhi", false);
        assert!(f.is_fixed());
        assert_eq!(f.domain(), &[false]);
    }
}
