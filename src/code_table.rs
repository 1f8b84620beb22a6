use crate::frequency::FrequencyTable;
use crate::node::Node;
use crate::tree::HuffmanTree;
use ahash::AHashMap as HashMap;
use bitvec::prelude::*;
use std::fmt;

/// The bit code assigned to one symbol, most significant (first emitted) bit first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Code {
    bits: BitVec<u8, Msb0>,
}

impl Code {
    pub(crate) fn push(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    /// Number of bits in the code.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn bits(&self) -> &BitSlice<u8, Msb0> {
        &self.bits
    }

    /// True if `self` is a prefix of `other` (including equality).
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        self.len() <= other.len() && other.bits[..self.len()] == self.bits[..]
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.bits.iter().by_vals() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Symbol to code mapping derived from a [`HuffmanTree`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTable {
    codes: HashMap<u8, Code>,
}

impl CodeTable {
    /// Derives the code of every leaf: `0` for each left edge, `1` for each
    /// right edge on the path from the root.
    ///
    /// A tree made of a single leaf has no edges; its symbol gets the one-bit
    /// code `0` so that every encoded symbol still occupies a bit.
    pub fn generate(tree: Option<&HuffmanTree>) -> Self {
        let mut codes = HashMap::default();
        let Some(tree) = tree else {
            return Self { codes };
        };

        if let Node::Leaf { symbol, .. } = tree.root_node() {
            let mut code = Code::default();
            code.push(false);
            codes.insert(*symbol, code);
            return Self { codes };
        }

        let mut stack = vec![(tree.root(), Code::default())];
        while let Some((key, code)) = stack.pop() {
            match &tree.nodes[key] {
                Node::Leaf { symbol, .. } => {
                    codes.insert(*symbol, code);
                }
                Node::Internal { left, right, .. } => {
                    let mut right_code = code.clone();
                    right_code.push(true);
                    let mut left_code = code;
                    left_code.push(false);

                    stack.push((*right, right_code));
                    stack.push((*left, left_code));
                }
            }
        }

        Self { codes }
    }

    pub fn get(&self, symbol: u8) -> Option<&Code> {
        self.codes.get(&symbol)
    }

    /// Number of symbols with a code.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Returns `(symbol, code)` pairs in ascending symbol order.
    pub fn sorted(&self) -> Vec<(u8, &Code)> {
        let mut entries: Vec<(u8, &Code)> =
            self.codes.iter().map(|(&symbol, code)| (symbol, code)).collect();
        entries.sort_unstable_by_key(|&(symbol, _)| symbol);
        entries
    }

    /// Length in bits of an input with the given frequencies once encoded.
    ///
    /// Symbols without a code contribute nothing.
    pub fn encoded_len(&self, freq: &FrequencyTable) -> u64 {
        freq.sorted()
            .into_iter()
            .filter_map(|(symbol, count)| self.get(symbol).map(|code| code.len() as u64 * count))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_for(input: &[u8]) -> CodeTable {
        let freq = FrequencyTable::count(input);
        CodeTable::generate(HuffmanTree::build(&freq).as_ref())
    }

    fn code_str(table: &CodeTable, symbol: u8) -> String {
        table.get(symbol).expect("symbol has a code").to_string()
    }

    #[test]
    fn test_no_tree_gives_empty_table() {
        let table = CodeTable::generate(None);
        assert!(table.is_empty());
        assert_eq!(table.len(), 0);
    }

    #[test]
    fn test_single_leaf_gets_zero_code() {
        let table = table_for(b"zzzz");
        assert_eq!(table.len(), 1);
        assert_eq!(code_str(&table, b'z'), "0");
    }

    #[test]
    fn test_two_symbol_codes() {
        let table = table_for(b"aaab");
        assert_eq!(code_str(&table, b'b'), "0");
        assert_eq!(code_str(&table, b'a'), "1");
    }

    #[test]
    fn test_uniform_four_symbols() {
        let table = table_for(b"abcd");
        assert_eq!(code_str(&table, b'a'), "00");
        assert_eq!(code_str(&table, b'b'), "01");
        assert_eq!(code_str(&table, b'c'), "10");
        assert_eq!(code_str(&table, b'd'), "11");
    }

    #[test]
    fn test_frequent_symbols_get_shorter_codes() {
        let table = table_for(b"aaaaaaaabbbbccd");
        let a = table.get(b'a').expect("a").len();
        let d = table.get(b'd').expect("d").len();
        assert!(a < d, "a: {}, d: {}", a, d);
    }

    #[test]
    fn test_prefix_free() {
        let table = table_for(b"she sells sea shells by the sea shore");
        let entries = table.sorted();
        for (i, (_, a)) in entries.iter().enumerate() {
            for (j, (_, b)) in entries.iter().enumerate() {
                if i != j {
                    assert!(!a.is_prefix_of(b), "{} is a prefix of {}", a, b);
                }
            }
        }
    }

    #[test]
    fn test_sorted_is_by_symbol() {
        let table = table_for(b"cab");
        let symbols: Vec<u8> = table.sorted().into_iter().map(|(s, _)| s).collect();
        assert_eq!(symbols, b"abc".to_vec());
    }

    #[test]
    fn test_encoded_len() {
        let input = b"aaab";
        let freq = FrequencyTable::count(input);
        let table = CodeTable::generate(HuffmanTree::build(&freq).as_ref());
        assert_eq!(table.encoded_len(&freq), 4);
    }
}
