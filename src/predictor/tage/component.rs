
use crate::Outcome;
use crate::history::*;
use crate::predictor::*;

/// Container for inputs passed to the components of a [`TagePredictor`].
#[derive(Clone, Copy, Debug)]
pub struct TageInputs<'a> {
    /// Program counter associated with a predicted branch
    pub pc: u32,

    /// Global history
    pub ghr: &'a HistoryRegister,
}

/// An entry in some [`TageComponent`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TageEntry {
    /// State machine tracking a branch outcome
    pub ctr: DirectionCounter,

    /// The 'useful' counter, used to determine when the entry is
    /// eligible to be replaced
    pub useful: UsefulCounter,

    /// Tag associated with this entry. Entries that have never been
    /// allocated have no tag and never match, even with zero-width tags,
    /// unlike tables whose tags simply start out as zero.
    pub tag: Option<u32>,
}
impl TageEntry {
    /// Get the current predicted outcome.
    pub fn predict(&self) -> Outcome {
        self.ctr.predict()
    }

    /// Returns true if the provided tag matches this entry.
    pub fn tag_matches(&self, tag: u32) -> bool {
        self.tag == Some(tag)
    }

    /// Replace this entry with a new one for the given tag, weakly biased
    /// toward the given outcome.
    ///
    /// New entries start out as "recently useful" so that they aren't
    /// immediately replaced by the next allocation.
    pub fn allocate(&mut self, tag: u32, outcome: Outcome) {
        self.tag = Some(tag);
        self.ctr = DirectionCounter::weak(outcome);
        self.useful.set(Usefulness::WeakUseful);
    }
}

/// A tagged component in the TAGE predictor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TageComponent {
    /// Table of entries
    pub data: Vec<TageEntry>,

    /// Position of this component (ordered by history length)
    num: usize,

    /// Number of index bits
    index_bits: usize,

    /// Number of tag bits
    tag_bits: usize,

    /// Number of global history bits used by this component
    history_len: usize,
}
impl TageComponent {
    pub fn new(num: usize, index_bits: usize, tag_bits: usize, history_len: usize)
        -> Self
    {
        Self {
            data: vec![TageEntry::default(); 1 << index_bits],
            num,
            index_bits,
            tag_bits,
            history_len,
        }
    }

    pub fn history_len(&self) -> usize { self.history_len }
    pub fn index_bits(&self) -> usize { self.index_bits }
    pub fn tag_bits(&self) -> usize { self.tag_bits }

    fn tag_mask(&self) -> usize {
        if self.tag_bits >= usize::BITS as usize {
            usize::MAX
        } else {
            (1 << self.tag_bits) - 1
        }
    }

    /// Hash the program counter and global history into an index.
    ///
    /// The program counter is added to a shifted copy of itself (the shift
    /// depends on the component, so components with the same number of
    /// index bits don't see the same value) and to the history folded into
    /// chunks of 'index_bits'.
    pub fn index_hash(&self, pc: u32, ghr: &HistoryRegister) -> usize {
        let pc = pc as usize;
        let shift = (self.index_bits + self.num) as u32;
        let pc_bits = pc.wrapping_add(pc.checked_shr(shift).unwrap_or(0));
        let ghist_bits = ghr.fold_sum(self.history_len, self.index_bits);
        pc_bits.wrapping_add(ghist_bits) & self.index_mask()
    }

    /// Hash the program counter and global history into a tag.
    ///
    /// History is folded twice: once in chunks of 'index_bits', and again
    /// in chunks one bit narrower (weighted by two), so that the tag isn't
    /// just a copy of the index.
    pub fn tag_hash(&self, pc: u32, ghr: &HistoryRegister) -> u32 {
        let ghist0_bits = ghr.fold_sum(self.history_len, self.index_bits);
        let ghist1_bits = ghr.fold_sum(self.history_len, self.index_bits - 1);
        let res = (pc as usize)
            .wrapping_add(ghist0_bits)
            .wrapping_add(ghist1_bits.wrapping_mul(2));
        (res & self.tag_mask()) as u32
    }

    /// Return the number of entries that have been allocated.
    pub fn num_allocated_entries(&self) -> usize {
        self.data.iter().filter(|e| e.tag.is_some()).count()
    }
}

impl PredictorTable for TageComponent {
    type Input<'a> = TageInputs<'a>;
    type Entry = TageEntry;

    fn size(&self) -> usize { self.data.len() }

    fn get_index(&self, input: TageInputs) -> usize {
        self.index_hash(input.pc, input.ghr)
    }

    fn get_entry(&self, idx: usize) -> &TageEntry {
        let index = idx & self.index_mask();
        &self.data[index]
    }

    fn get_entry_mut(&mut self, idx: usize) -> &mut TageEntry {
        let index = idx & self.index_mask();
        &mut self.data[index]
    }
}

impl TaggedPredictorTable for TageComponent {
    fn get_tag(&self, input: TageInputs) -> u32 {
        self.tag_hash(input.pc, input.ghr)
    }
}
