use crate::virtual_machine::errors::{QUOTE_LIMIT, RuntimeFault, compress};
use crate::virtual_machine::operand::{
    OperandSyntax, is_identifier, parse_integer_literal, validate_identifier,
};
use crate::virtual_machine::vm::Value;
use std::collections::HashMap;
use std::hash::BuildHasher;

/// Symbol table mapping identifiers to their current [`Value`].
///
/// Identifiers come from untrusted programs, so the table is keyed through a
/// [`BuildHasher`]; the default `RandomState` is SipHash-1-3 with random keys.
/// Entries are created by input binding or assignment and never removed during a
/// run. A symbol keeps the kind it was created with.
pub(super) struct Symbols<S> {
    table: HashMap<String, Value, S>,
}

impl<S: BuildHasher> Symbols<S> {
    pub(super) fn with_hasher(hasher: S) -> Self {
        Self {
            table: HashMap::with_hasher(hasher),
        }
    }

    pub(super) fn get(&self, name: &str) -> Option<&Value> {
        self.table.get(name)
    }

    pub(super) fn clear(&mut self) {
        self.table.clear();
    }

    /// Binds a whole value, creating the symbol or overwriting one of the same kind.
    pub(super) fn bind(&mut self, name: &str, value: Value) -> Result<(), RuntimeFault> {
        validate_identifier(name)?;
        match self.table.get_mut(name) {
            Some(slot) if slot.type_name() != value.type_name() => Err(RuntimeFault::KindChange {
                name: compress(name, QUOTE_LIMIT),
                kind: slot.type_name(),
                incoming: value.type_name(),
            }),
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => {
                self.table.insert(name.to_string(), value);
                Ok(())
            }
        }
    }

    /// Reads the scalar named `name`.
    fn scalar(&self, name: &str) -> Result<i64, RuntimeFault> {
        match self.table.get(name) {
            Some(Value::Scalar(value)) => Ok(*value),
            Some(Value::Array(_)) => Err(RuntimeFault::NotScalar {
                name: compress(name, QUOTE_LIMIT),
            }),
            None => Err(RuntimeFault::UnknownScalar {
                name: compress(name, QUOTE_LIMIT),
            }),
        }
    }

    /// Returns the scalar slot named `name`, creating it as zero when `create` is set.
    fn scalar_mut(&mut self, name: &str, create: bool) -> Result<&mut i64, RuntimeFault> {
        if create && !self.table.contains_key(name) {
            self.table.insert(name.to_string(), Value::Scalar(0));
        }
        match self.table.get_mut(name) {
            Some(Value::Scalar(value)) => Ok(value),
            Some(Value::Array(_)) => Err(RuntimeFault::NotScalar {
                name: compress(name, QUOTE_LIMIT),
            }),
            None => Err(RuntimeFault::UnknownScalar {
                name: compress(name, QUOTE_LIMIT),
            }),
        }
    }

    fn array(&self, name: &str) -> Result<&[i64], RuntimeFault> {
        validate_identifier(name)?;
        match self.table.get(name) {
            Some(Value::Array(items)) => Ok(items),
            Some(Value::Scalar(_)) => Err(RuntimeFault::NotArray {
                name: compress(name, QUOTE_LIMIT),
            }),
            None => Err(RuntimeFault::UnknownArray {
                name: compress(name, QUOTE_LIMIT),
            }),
        }
    }

    fn array_mut(&mut self, name: &str) -> Result<&mut Vec<i64>, RuntimeFault> {
        match self.table.get_mut(name) {
            Some(Value::Array(items)) => Ok(items),
            Some(Value::Scalar(_)) => Err(RuntimeFault::NotArray {
                name: compress(name, QUOTE_LIMIT),
            }),
            None => Err(RuntimeFault::UnknownArray {
                name: compress(name, QUOTE_LIMIT),
            }),
        }
    }

    /// Resolves an array index: a literal, else a scalar variable. No nesting.
    fn index_value(&self, index: &str) -> Result<i64, RuntimeFault> {
        if index.is_empty() {
            return Err(RuntimeFault::EmptyOperand);
        }
        parse_integer_literal(index)
            .or_else(|_| self.scalar(index))
            .map_err(|_| RuntimeFault::InvalidIndex {
                index: compress(index, QUOTE_LIMIT),
            })
    }

    /// Checks `index` against an array of `len` items.
    fn element_position(array: &str, index: i64, len: usize) -> Result<usize, RuntimeFault> {
        usize::try_from(index)
            .ok()
            .filter(|&position| position < len)
            .ok_or_else(|| RuntimeFault::OutOfBounds {
                name: compress(array, QUOTE_LIMIT),
                index,
            })
    }

    fn element(&self, array: &str, index: &str) -> Result<i64, RuntimeFault> {
        let items = self.array(array)?;
        let index = self.index_value(index)?;
        let position = Self::element_position(array, index, items.len())?;
        Ok(items[position])
    }

    fn element_mut(&mut self, array: &str, index: &str) -> Result<&mut i64, RuntimeFault> {
        let len = self.array(array)?.len();
        let index = self.index_value(index)?;
        let position = Self::element_position(array, index, len)?;
        Ok(&mut self.array_mut(array)?[position])
    }

    /// Value-read of an operand token: scalar variable, array element, or literal.
    pub(super) fn read(&self, token: &str) -> Result<i64, RuntimeFault> {
        match OperandSyntax::classify(token) {
            OperandSyntax::Identifier(name) => self.scalar(name),
            OperandSyntax::Element { array, index } => self.element(array, index),
            OperandSyntax::Literal("") => Err(RuntimeFault::EmptyOperand),
            OperandSyntax::Literal(text) => parse_integer_literal(text),
        }
    }

    /// Reference resolution of an operand token.
    ///
    /// A missing bare identifier is created as a zero scalar only when `create` is
    /// set; literals are never references.
    pub(super) fn slot(&mut self, token: &str, create: bool) -> Result<&mut i64, RuntimeFault> {
        match OperandSyntax::classify(token) {
            OperandSyntax::Identifier(name) => self.scalar_mut(name, create),
            OperandSyntax::Element { array, index } => self.element_mut(array, index),
            OperandSyntax::Literal("") => Err(RuntimeFault::EmptyOperand),
            OperandSyntax::Literal(_) => Err(RuntimeFault::NotAReference {
                token: compress(token, QUOTE_LIMIT),
            }),
        }
    }

    /// Whether `token` is an identifier naming an existing symbol of any kind.
    pub(super) fn names_symbol(&self, token: &str) -> Option<&Value> {
        if is_identifier(token) {
            self.table.get(token)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::RandomState;

    fn symbols() -> Symbols<RandomState> {
        let mut symbols = Symbols::with_hasher(RandomState::new());
        symbols.bind("x", Value::Scalar(7)).unwrap();
        symbols.bind("i", Value::Scalar(1)).unwrap();
        symbols.bind("arr", Value::Array(vec![10, 20, 30])).unwrap();
        symbols.bind("empty", Value::Array(vec![])).unwrap();
        symbols
    }

    #[test]
    fn read_precedence() {
        let s = symbols();
        assert_eq!(s.read("x"), Ok(7));
        assert_eq!(s.read("arr[0]"), Ok(10));
        assert_eq!(s.read("arr[i]"), Ok(20));
        assert_eq!(s.read("-3"), Ok(-3));
    }

    #[test]
    fn read_faults() {
        let s = symbols();
        assert!(matches!(s.read("y"), Err(RuntimeFault::UnknownScalar { .. })));
        assert!(matches!(s.read("arr"), Err(RuntimeFault::NotScalar { .. })));
        assert!(matches!(s.read("x[0]"), Err(RuntimeFault::NotArray { .. })));
        assert!(matches!(s.read("nope[0]"), Err(RuntimeFault::UnknownArray { .. })));
        assert!(matches!(s.read("9a[0]"), Err(RuntimeFault::LeadingDigit { .. })));
        assert!(matches!(s.read("a-b[0]"), Err(RuntimeFault::InvalidCharacters { .. })));
        assert!(matches!(s.read("arr[]"), Err(RuntimeFault::EmptyOperand)));
        assert!(matches!(s.read("arr[j]"), Err(RuntimeFault::InvalidIndex { .. })));
        assert!(matches!(s.read("arr[arr]"), Err(RuntimeFault::InvalidIndex { .. })));
        assert!(matches!(s.read("arr[arr[0]]"), Err(RuntimeFault::InvalidIndex { .. })));
        assert!(matches!(s.read("1x"), Err(RuntimeFault::MalformedInteger { .. })));
        assert_eq!(s.read(""), Err(RuntimeFault::EmptyOperand));
    }

    #[test]
    fn array_is_checked_before_its_index() {
        let s = symbols();
        assert!(matches!(s.read("nope[zzz]"), Err(RuntimeFault::UnknownArray { .. })));
    }

    #[test]
    fn bounds_law() {
        let s = symbols();
        for index in -2..5 {
            let result = s.read(&format!("arr[{index}]"));
            assert_eq!(result.is_ok(), (0..3).contains(&index), "index {index}");
        }
        assert!(matches!(
            s.read("empty[0]"),
            Err(RuntimeFault::OutOfBounds { index: 0, .. })
        ));
    }

    #[test]
    fn slot_creates_only_when_asked() {
        let mut s = symbols();
        assert!(matches!(s.slot("fresh", false), Err(RuntimeFault::UnknownScalar { .. })));
        assert!(s.get("fresh").is_none());
        *s.slot("fresh", true).unwrap() = 5;
        assert_eq!(s.get("fresh"), Some(&Value::Scalar(5)));
    }

    #[test]
    fn slot_never_creates_elements_or_literals() {
        let mut s = symbols();
        assert!(matches!(s.slot("nope[0]", true), Err(RuntimeFault::UnknownArray { .. })));
        assert!(matches!(s.slot("5", true), Err(RuntimeFault::NotAReference { .. })));
        assert!(matches!(s.slot("arr", true), Err(RuntimeFault::NotScalar { .. })));
    }

    #[test]
    fn slot_writes_through_to_elements() {
        let mut s = symbols();
        *s.slot("arr[i]", false).unwrap() += 1;
        assert_eq!(s.get("arr"), Some(&Value::Array(vec![10, 21, 30])));
    }

    #[test]
    fn bind_keeps_kind() {
        let mut s = symbols();
        s.bind("x", Value::Scalar(9)).unwrap();
        assert_eq!(s.get("x"), Some(&Value::Scalar(9)));
        assert!(matches!(
            s.bind("x", Value::Array(vec![1])),
            Err(RuntimeFault::KindChange { .. })
        ));
        assert!(matches!(
            s.bind("2x", Value::Scalar(1)),
            Err(RuntimeFault::LeadingDigit { .. })
        ));
    }

    #[test]
    fn names_symbol_requires_plain_identifier() {
        let s = symbols();
        assert!(s.names_symbol("arr").is_some());
        assert!(s.names_symbol("arr[0]").is_none());
        assert!(s.names_symbol("zzz").is_none());
    }
}
