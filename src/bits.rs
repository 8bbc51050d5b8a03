const WORD_BITS: usize = 64;

/// A growable set of bit flags, indexed from zero.
///
/// Reads beyond the allocated words return `false`; writes grow the
/// storage as needed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitSet {
    words: Vec<u64>,
}

impl BitSet {
    /// Create a set with room for `capacity` bits, all clear.
    pub fn new(capacity: usize) -> Self {
        Self {
            words: vec![0; capacity.div_ceil(WORD_BITS)],
        }
    }

    pub fn get(&self, index: usize) -> bool {
        self.words
            .get(index / WORD_BITS)
            .is_some_and(|word| word >> (index % WORD_BITS) & 1 != 0)
    }

    pub fn set(&mut self, index: usize) {
        let word = index / WORD_BITS;
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        self.words[word] |= 1 << (index % WORD_BITS);
    }

    pub fn clear(&mut self, index: usize) {
        if let Some(word) = self.words.get_mut(index / WORD_BITS) {
            *word &= !(1 << (index % WORD_BITS));
        }
    }

    /// Set every bit below `count`.
    pub fn set_first(&mut self, count: usize) {
        if count == 0 {
            return;
        }
        let full = count / WORD_BITS;
        if self.words.len() < count.div_ceil(WORD_BITS) {
            self.words.resize(count.div_ceil(WORD_BITS), 0);
        }
        for word in &mut self.words[..full] {
            *word = !0;
        }
        let tail = count % WORD_BITS;
        if tail != 0 {
            self.words[full] |= (1 << tail) - 1;
        }
    }

    /// Find the lowest set bit at or above `from`.
    pub fn next_set_bit(&self, from: usize) -> Option<usize> {
        let mut index = from / WORD_BITS;
        let mut word = *self.words.get(index)? & (!0 << (from % WORD_BITS));
        loop {
            if word != 0 {
                return Some(index * WORD_BITS + word.trailing_zeros() as usize);
            }
            index += 1;
            word = *self.words.get(index)?;
        }
    }

    pub fn union_with(&mut self, other: &BitSet) {
        if self.words.len() < other.words.len() {
            self.words.resize(other.words.len(), 0);
        }
        for (word, extra) in self.words.iter_mut().zip(&other.words) {
            *word |= extra;
        }
    }

    pub fn count(&self) -> usize {
        self.words.iter().map(|word| word.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&word| word == 0)
    }

    /// Visit set bits in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(index, &word)| {
            let mut rest = word;
            std::iter::from_fn(move || {
                if rest == 0 {
                    return None;
                }
                let bit = rest.trailing_zeros() as usize;
                rest &= rest.wrapping_sub(1);
                Some(index * WORD_BITS + bit)
            })
        })
    }
}

/// A set of colour indices.
///
/// Index 0 is the transparent colour; callers are expected to keep it out
/// of the set themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorSet {
    bits: BitSet,
}

impl ColorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, color: u32) -> bool {
        self.bits.get(color as usize)
    }

    pub fn insert(&mut self, color: u32) {
        self.bits.set(color as usize);
    }

    pub fn remove(&mut self, color: u32) {
        self.bits.clear(color as usize);
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bits.count()
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.bits.iter().map(|index| index as u32)
    }
}
