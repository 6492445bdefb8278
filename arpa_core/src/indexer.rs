//! Vocabulary mapping between word strings and dense integer ids.

use std::collections::HashMap;

/// Symbol marking the start of a sentence.
pub const START_SYMBOL: &str = "<s>";
/// Symbol marking the end of a sentence.
pub const END_SYMBOL: &str = "</s>";
/// Symbol standing in for out-of-vocabulary words.
pub const UNK_SYMBOL: &str = "<unk>";

/// A bidirectional string <-> id vocabulary the reader resolves words through.
///
/// Ids must be stable for the lifetime of the indexer: once a string has been
/// assigned an id, every later lookup of that string returns the same id.
pub trait WordIndexer {
    /// Returns the id of `word`, assigning the next free id if it is new.
    fn get_or_add_index(&mut self, word: &str) -> u32;

    /// Returns the string for `index`, if it has been assigned.
    fn word(&self, index: u32) -> Option<&str>;

    /// Number of distinct words indexed so far.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn set_start_symbol(&mut self, index: u32);
    fn set_end_symbol(&mut self, index: u32);
    fn set_unk_symbol(&mut self, index: u32);
}

/// Default in-memory [`WordIndexer`] backed by a hash map and a word list.
#[derive(Debug, Clone, Default)]
pub struct StringWordIndexer {
    ids: HashMap<String, u32>,
    words: Vec<String>,
    start_symbol: Option<u32>,
    end_symbol: Option<u32>,
    unk_symbol: Option<u32>,
}

impl StringWordIndexer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up an id without adding the word.
    pub fn index_of(&self, word: &str) -> Option<u32> {
        self.ids.get(word).copied()
    }

    pub fn start_symbol(&self) -> Option<u32> {
        self.start_symbol
    }

    pub fn end_symbol(&self) -> Option<u32> {
        self.end_symbol
    }

    pub fn unk_symbol(&self) -> Option<u32> {
        self.unk_symbol
    }

    /// Iterates `(id, word)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.words
            .iter()
            .enumerate()
            .map(|(i, w)| (i as u32, w.as_str()))
    }
}

impl WordIndexer for StringWordIndexer {
    fn get_or_add_index(&mut self, word: &str) -> u32 {
        if let Some(&id) = self.ids.get(word) {
            return id;
        }
        let id = self.words.len() as u32;
        self.words.push(word.to_owned());
        self.ids.insert(word.to_owned(), id);
        id
    }

    fn word(&self, index: u32) -> Option<&str> {
        self.words.get(index as usize).map(String::as_str)
    }

    fn len(&self) -> usize {
        self.words.len()
    }

    fn set_start_symbol(&mut self, index: u32) {
        self.start_symbol = Some(index);
    }

    fn set_end_symbol(&mut self, index: u32) {
        self.end_symbol = Some(index);
    }

    fn set_unk_symbol(&mut self, index: u32) {
        self.unk_symbol = Some(index);
    }
}

/// Makes sure the reserved symbols exist in `indexer` and registers them.
pub fn register_reserved_symbols<W: WordIndexer + ?Sized>(indexer: &mut W) {
    let start = indexer.get_or_add_index(START_SYMBOL);
    indexer.set_start_symbol(start);
    let end = indexer.get_or_add_index(END_SYMBOL);
    indexer.set_end_symbol(end);
    let unk = indexer.get_or_add_index(UNK_SYMBOL);
    indexer.set_unk_symbol(unk);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_dense_and_stable() {
        let mut indexer = StringWordIndexer::new();
        assert!(indexer.is_empty());
        let a = indexer.get_or_add_index("a");
        let b = indexer.get_or_add_index("b");
        assert_eq!((a, b), (0, 1));
        assert_eq!(indexer.get_or_add_index("a"), a);
        assert_eq!(indexer.len(), 2);
        assert_eq!(indexer.word(b), Some("b"));
        assert_eq!(indexer.word(7), None);
        assert_eq!(indexer.index_of("c"), None);
    }

    #[test]
    fn test_register_reserved_symbols_adds_missing() {
        let mut indexer = StringWordIndexer::new();
        let existing_end = indexer.get_or_add_index(END_SYMBOL);
        register_reserved_symbols(&mut indexer);

        assert_eq!(indexer.len(), 3);
        assert_eq!(indexer.end_symbol(), Some(existing_end));
        let start = indexer.start_symbol().unwrap();
        let unk = indexer.unk_symbol().unwrap();
        assert_eq!(indexer.word(start), Some(START_SYMBOL));
        assert_eq!(indexer.word(unk), Some(UNK_SYMBOL));
    }

    #[test]
    fn test_iter_in_id_order() {
        let mut indexer = StringWordIndexer::new();
        indexer.get_or_add_index("x");
        indexer.get_or_add_index("y");
        let pairs: Vec<(u32, &str)> = indexer.iter().collect();
        assert_eq!(pairs, vec![(0, "x"), (1, "y")]);
    }
}
