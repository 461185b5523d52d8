//! Word-packed membership set over dense indices

const WORD_BITS: usize = u64::BITS as usize;

/// Growable bitset keyed by dense node index
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitSet {
    words: Vec<u64>,
}

impl BitSet {
    /// Bitset able to hold indices `0..len` without growing
    pub fn with_len(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(WORD_BITS)],
        }
    }

    #[inline(always)]
    fn split(idx: usize) -> (usize, u64) {
        (idx / WORD_BITS, 1_u64 << (idx % WORD_BITS))
    }

    /// Add `idx`, growing if needed; returns true if it was absent
    #[inline]
    pub fn insert(&mut self, idx: usize) -> bool {
        let (word, mask) = Self::split(idx);
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        let absent = self.words[word] & mask == 0;
        self.words[word] |= mask;
        absent
    }

    /// Remove `idx`; returns true if it was present
    #[inline]
    pub fn remove(&mut self, idx: usize) -> bool {
        let (word, mask) = Self::split(idx);
        match self.words.get_mut(word) {
            Some(w) => {
                let present = *w & mask != 0;
                *w &= !mask;
                present
            }
            None => false,
        }
    }

    /// Membership test; indices beyond the storage are absent
    #[inline]
    pub fn contains(&self, idx: usize) -> bool {
        let (word, mask) = Self::split(idx);
        self.words.get(word).is_some_and(|w| w & mask != 0)
    }

    /// Number of members
    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Remove every member, keeping the allocation
    pub fn clear(&mut self) {
        self.words.fill(0);
    }
}
