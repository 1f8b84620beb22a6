use crate::error::{HuffmanError, Result};
use crate::tree::HuffmanTree;
use bitvec::prelude::*;
use std::iter::FusedIterator;

/// Iterator that decodes symbols lazily from a packed bit sequence.
///
/// Each item walks the tree from the root until it reaches a leaf. After the
/// first error the iterator is exhausted.
pub struct Symbols<'a> {
    tree: Option<&'a HuffmanTree>,
    bits: &'a BitSlice<u8, Msb0>,
    position: usize,
    failed: bool,
}

impl<'a> Symbols<'a> {
    /// Prepares to decode the first `bit_count` bits of `packed`.
    ///
    /// Fails with [`HuffmanError::CorruptArtifact`] when `packed` holds fewer
    /// than `bit_count` bits, and with [`HuffmanError::CorruptTree`] when there
    /// are bits to decode but no tree.
    pub fn new(bit_count: u64, packed: &'a [u8], tree: Option<&'a HuffmanTree>) -> Result<Self> {
        let available = packed.len() as u64 * 8;
        let bit_len = usize::try_from(bit_count)
            .ok()
            .filter(|_| bit_count <= available)
            .ok_or_else(|| {
                HuffmanError::corrupt(format!(
                    "bit count {} exceeds the {} bits available",
                    bit_count, available
                ))
            })?;

        if tree.is_none() && bit_len > 0 {
            return Err(HuffmanError::CorruptTree);
        }

        Ok(Self {
            tree,
            bits: &packed.view_bits::<Msb0>()[..bit_len],
            position: 0,
            failed: false,
        })
    }

    fn fail(&mut self) -> Result<u8> {
        self.failed = true;
        Err(HuffmanError::Traversal {
            bit_index: self.position as u64,
        })
    }
}

impl<'a> Iterator for Symbols<'a> {
    type Item = Result<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.position >= self.bits.len() {
            return None;
        }
        let tree = self.tree?;

        // A lone leaf spends exactly one bit per symbol
        if let Some(symbol) = tree.root_node().symbol() {
            self.position += 1;
            return Some(Ok(symbol));
        }

        let mut key = tree.root();
        loop {
            let Some(node) = tree.node(key) else {
                return Some(self.fail());
            };
            if let Some(symbol) = node.symbol() {
                return Some(Ok(symbol));
            }

            let Some(bit) = self.bits.get(self.position).map(|bit| *bit) else {
                // Stream ended part-way through a code
                return Some(self.fail());
            };
            self.position += 1;

            match node.child(bit) {
                Some(child) => key = child,
                None => return Some(self.fail()),
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            (0, Some(0))
        } else {
            (0, Some(self.bits.len() - self.position))
        }
    }
}

impl FusedIterator for Symbols<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::FrequencyTable;

    fn tree_for(input: &[u8]) -> HuffmanTree {
        HuffmanTree::build(&FrequencyTable::count(input)).expect("non-empty input")
    }

    #[test]
    fn test_iter_empty() {
        let mut symbols = Symbols::new(0, &[], None).expect("empty is valid");
        assert!(symbols.next().is_none());
    }

    #[test]
    fn test_iter_yields_lazily() {
        let tree = tree_for(b"aaab");
        let packed = [0b1110_0000];
        let mut symbols = Symbols::new(4, &packed, Some(&tree)).expect("valid");
        assert_eq!(symbols.next().map(|r| r.ok()), Some(Some(b'a')));
        assert_eq!(symbols.size_hint(), (0, Some(3)));
        let rest: Vec<u8> = symbols.map(|r| r.expect("decodes")).collect();
        assert_eq!(rest, b"aab".to_vec());
    }

    #[test]
    fn test_iter_single_leaf_repeats() {
        let tree = tree_for(b"z");
        let symbols = Symbols::new(3, &[0xff], Some(&tree)).expect("valid");
        let out: Vec<u8> = symbols.map(|r| r.expect("decodes")).collect();
        assert_eq!(out, b"zzz".to_vec());
    }

    #[test]
    fn test_iter_fuses_after_error() {
        // a=00 b=01 c=10 d=11, three bits leave half a code
        let tree = tree_for(b"abcd");
        let mut symbols = Symbols::new(3, &[0b0000_0000], Some(&tree)).expect("valid");
        assert_eq!(symbols.next().map(|r| r.ok()), Some(Some(b'a')));
        assert!(matches!(
            symbols.next(),
            Some(Err(HuffmanError::Traversal { bit_index: 3 }))
        ));
        assert!(symbols.next().is_none());
    }

    #[test]
    fn test_new_rejects_overlong_bit_count() {
        let tree = tree_for(b"ab");
        assert!(matches!(
            Symbols::new(9, &[0], Some(&tree)),
            Err(HuffmanError::CorruptArtifact(_))
        ));
    }

    #[test]
    fn test_new_rejects_missing_tree() {
        assert!(matches!(
            Symbols::new(1, &[0], None),
            Err(HuffmanError::CorruptTree)
        ));
    }
}
