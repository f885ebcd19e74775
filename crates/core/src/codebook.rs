//! Bidirectional symbol <-> codeword table derived from a Huffman tree.

use crate::error::{HuffmanError, Result};
use crate::huffman::{HuffNode, HuffmanTree};
use crate::symbol::Symbol;
use std::collections::HashMap;
use std::fmt;

/// Longest codeword the 64-bit representation holds.
pub const MAX_CODE_LEN: u8 = 64;

/// A variable-length bit sequence, stored MSB-first in the low `len` bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Codeword {
    bits: u64,
    len: u8,
}

impl Codeword {
    pub const EMPTY: Codeword = Codeword { bits: 0, len: 0 };

    /// Build from the low `len` bits of `bits`.
    pub fn new(bits: u64, len: u8) -> Result<Self> {
        if len > MAX_CODE_LEN {
            return Err(HuffmanError::CodeLengthTooLong { length: len as usize }.into());
        }
        let mask = if len == MAX_CODE_LEN { u64::MAX } else { (1u64 << len) - 1 };
        Ok(Self { bits: bits & mask, len })
    }

    pub fn bits(&self) -> u64 {
        self.bits
    }

    pub fn len(&self) -> u8 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append one bit, failing past `MAX_CODE_LEN`.
    pub fn push(&self, bit: bool) -> Result<Self> {
        if self.len >= MAX_CODE_LEN {
            return Err(HuffmanError::CodeLengthTooLong {
                length: self.len as usize + 1,
            }
            .into());
        }
        Ok(Self {
            bits: (self.bits << 1) | bit as u64,
            len: self.len + 1,
        })
    }

    /// True if `self` is a (non-strict) prefix of `other`.
    pub fn is_prefix_of(&self, other: &Codeword) -> bool {
        self.len <= other.len && other.head(self.len) == self.bits
    }

    /// The first `n` bits, right-aligned.
    fn head(&self, n: u8) -> u64 {
        self.bits.checked_shr(u32::from(self.len - n)).unwrap_or(0)
    }
}

impl fmt::Display for Codeword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in (0..self.len).rev() {
            f.write_str(if (self.bits >> i) & 1 == 1 { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Symbol <-> codeword mapping for one compression call.
///
/// # Invariants
/// - every symbol maps to exactly one non-empty codeword
/// - the codeword set is prefix-free
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable<S: Symbol> {
    encode: HashMap<S, Codeword>,
    decode: HashMap<Codeword, S>,
}

impl<S: Symbol> CodeTable<S> {
    /// Table with no entries, used for empty input.
    pub fn empty() -> Self {
        Self {
            encode: HashMap::new(),
            decode: HashMap::new(),
        }
    }

    /// Walk the tree depth-first: `0` descending left, `1` descending right.
    ///
    /// A tree that is a single leaf gets the one-bit codeword `0`, since an
    /// empty codeword cannot be packed or decoded.
    pub fn from_tree(tree: &HuffmanTree<S>) -> Result<Self> {
        let mut table = Self::empty();

        if let HuffNode::Leaf { symbol, .. } = tree.root() {
            table.insert(*symbol, Codeword::EMPTY.push(false)?);
            return Ok(table);
        }

        let mut stack = vec![(tree.root(), Codeword::EMPTY)];
        while let Some((node, path)) = stack.pop() {
            match node {
                HuffNode::Leaf { symbol, .. } => table.insert(*symbol, path),
                HuffNode::Internal { left, right, .. } => {
                    stack.push((&**right, path.push(true)?));
                    stack.push((&**left, path.push(false)?));
                }
            }
        }

        log::trace!("code table: {} entries", table.len());
        Ok(table)
    }

    /// Rebuild a persisted table without re-deriving codes.
    ///
    /// # Errors
    /// Rejects empty codewords, duplicate symbols or codewords, and tables
    /// that are not prefix-free.
    pub fn from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Codeword)>,
    {
        let mut table = Self::empty();
        for (symbol, code) in entries {
            if code.is_empty() {
                return Err(HuffmanError::EmptyCodeword {
                    symbol: format!("{symbol:?}"),
                }
                .into());
            }
            if table.encode.contains_key(&symbol) || table.decode.contains_key(&code) {
                return Err(HuffmanError::AmbiguousTable(format!("duplicate entry {symbol:?} -> {code}")).into());
            }
            table.insert(symbol, code);
        }

        if !table.is_prefix_free() {
            return Err(HuffmanError::AmbiguousTable("codeword set is not prefix-free".into()).into());
        }
        Ok(table)
    }

    fn insert(&mut self, symbol: S, code: Codeword) {
        self.encode.insert(symbol, code);
        self.decode.insert(code, symbol);
    }

    pub fn codeword(&self, symbol: &S) -> Option<Codeword> {
        self.encode.get(symbol).copied()
    }

    pub fn symbol(&self, code: &Codeword) -> Option<S> {
        self.decode.get(code).copied()
    }

    pub fn len(&self) -> usize {
        self.encode.len()
    }

    pub fn is_empty(&self) -> bool {
        self.encode.is_empty()
    }

    /// Longest codeword in the table (0 when empty).
    pub fn max_len(&self) -> u8 {
        self.encode.values().map(Codeword::len).max().unwrap_or(0)
    }

    /// Entries sorted by symbol, for stable serialization.
    pub fn entries(&self) -> Vec<(S, Codeword)> {
        let mut entries: Vec<_> = self.encode.iter().map(|(&s, &c)| (s, c)).collect();
        entries.sort_unstable_by_key(|&(symbol, _)| symbol);
        entries
    }

    /// True if no codeword is a prefix of another.
    pub fn is_prefix_free(&self) -> bool {
        // In sorted bit-string order a prefix sorts directly before its
        // extensions, so checking neighbours is enough.
        let mut codes: Vec<Codeword> = self.decode.keys().copied().collect();
        codes.sort_unstable_by(|a, b| {
            let shared = a.len.min(b.len);
            a.head(shared).cmp(&b.head(shared)).then(a.len.cmp(&b.len))
        });
        codes.windows(2).all(|pair| !pair[0].is_prefix_of(&pair[1]))
    }
}
