//! Implementation of a saturating counter.

use crate::Outcome;

/// A small, ordered set of states that a [`SaturatingCounter`] moves through.
///
/// States are ordered from lowest to highest. The upper half of the range
/// is the "high" half: what that means depends on the kind of counter.
pub trait CounterState: Copy + Eq + Ord + std::fmt::Debug {
    /// All states, from the lowest to the highest.
    const STATES: [Self; 4];

    /// The state of a counter in a freshly-built table.
    const DEFAULT: Self;

    /// Position of this state in [`CounterState::STATES`].
    fn level(self) -> usize;
}

/// Taken-bias of a branch.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    StrongNotTaken = 0,
    WeakNotTaken = 1,
    WeakTaken = 2,
    StrongTaken = 3,
}
impl CounterState for Direction {
    const STATES: [Self; 4] = [
        Self::StrongNotTaken, Self::WeakNotTaken,
        Self::WeakTaken, Self::StrongTaken,
    ];
    const DEFAULT: Self = Self::WeakNotTaken;
    fn level(self) -> usize { self as usize }
}

/// Preference of a tournament selector.
/// The low half prefers the global predictor, the high half prefers the
/// local predictor.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Choice {
    StrongGlobal = 0,
    WeakGlobal = 1,
    WeakLocal = 2,
    StrongLocal = 3,
}
impl CounterState for Choice {
    const STATES: [Self; 4] = [
        Self::StrongGlobal, Self::WeakGlobal,
        Self::WeakLocal, Self::StrongLocal,
    ];
    const DEFAULT: Self = Self::WeakGlobal;
    fn level(self) -> usize { self as usize }
}

/// Usefulness of a TAGE entry.
/// Entries at [`Usefulness::StrongUseless`] may be reallocated.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Usefulness {
    StrongUseless = 0,
    WeakUseless = 1,
    WeakUseful = 2,
    StrongUseful = 3,
}
impl CounterState for Usefulness {
    const STATES: [Self; 4] = [
        Self::StrongUseless, Self::WeakUseless,
        Self::WeakUseful, Self::StrongUseful,
    ];
    const DEFAULT: Self = Self::StrongUseless;
    fn level(self) -> usize { self as usize }
}

/// A 2-bit saturating counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SaturatingCounter<S: CounterState> {
    state: S,
}

/// A counter tracking the direction of a branch.
pub type DirectionCounter = SaturatingCounter<Direction>;
/// A counter selecting between two predictors.
pub type ChoiceCounter = SaturatingCounter<Choice>;
/// A counter tracking whether an entry is worth keeping.
pub type UsefulCounter = SaturatingCounter<Usefulness>;

impl<S: CounterState> Default for SaturatingCounter<S> {
    fn default() -> Self { Self::new(S::DEFAULT) }
}

impl<S: CounterState> SaturatingCounter<S> {
    pub fn new(state: S) -> Self {
        Self { state }
    }

    /// Number of bits needed to store this counter.
    pub fn storage_bits() -> usize {
        S::STATES.len().ilog2() as usize
    }

    pub fn state(&self) -> S { self.state }

    /// Overwrite the current state.
    pub fn set(&mut self, state: S) {
        self.state = state;
    }

    /// Reset the counter.
    pub fn reset(&mut self) {
        self.state = S::DEFAULT;
    }

    /// Move up by one state (when 'up' is true) or down by one state.
    /// Does nothing when the counter is already saturated.
    pub fn bump(&mut self, up: bool) {
        let lvl = self.state.level();
        let next = if up {
            (lvl + 1).min(S::STATES.len() - 1)
        } else {
            lvl.saturating_sub(1)
        };
        self.state = S::STATES[next];
    }

    /// Returns 'true' when the counter is in the upper half of its range.
    pub fn is_high(&self) -> bool {
        self.state.level() >= S::STATES.len() / 2
    }

    pub fn is_min(&self) -> bool { self.state.level() == 0 }
    pub fn is_max(&self) -> bool { self.state.level() == S::STATES.len() - 1 }
}

impl SaturatingCounter<Direction> {
    /// A counter weakly biased toward some outcome.
    pub fn weak(outcome: Outcome) -> Self {
        match outcome {
            Outcome::T => Self::new(Direction::WeakTaken),
            Outcome::N => Self::new(Direction::WeakNotTaken),
        }
    }

    pub fn predicts_taken(&self) -> bool { self.is_high() }

    /// Return the current predicted direction.
    pub fn predict(&self) -> Outcome {
        Outcome::from_bool(self.predicts_taken())
    }

    /// Move the counter toward the resolved outcome.
    pub fn update(&mut self, outcome: Outcome) {
        self.bump(outcome.is_taken());
    }
}

impl SaturatingCounter<Choice> {
    pub fn prefers_local(&self) -> bool { self.is_high() }
    pub fn prefers_global(&self) -> bool { !self.is_high() }
}

impl SaturatingCounter<Usefulness> {
    pub fn is_useful(&self) -> bool { self.is_high() }

    /// Returns 'true' when the entry is eligible for reallocation.
    pub fn is_available(&self) -> bool { self.is_min() }
}

#[cfg(test)]
mod test {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn saturates_at_both_ends() {
        let mut ctr = DirectionCounter::default();
        assert_eq!(ctr.state(), Direction::WeakNotTaken);
        for _ in 0..8 {
            ctr.bump(true);
        }
        assert_eq!(ctr.state(), Direction::StrongTaken);
        assert!(ctr.is_max());
        ctr.bump(true);
        assert_eq!(ctr.state(), Direction::StrongTaken);

        for _ in 0..8 {
            ctr.bump(false);
        }
        assert_eq!(ctr.state(), Direction::StrongNotTaken);
        assert!(ctr.is_min());
    }

    #[test]
    fn reset_restores_the_initial_state() {
        let mut ctr = DirectionCounter::new(Direction::StrongTaken);
        ctr.reset();
        assert_eq!(ctr, DirectionCounter::default());
        assert_eq!(ctr.state(), Direction::WeakNotTaken);

        let mut sel = ChoiceCounter::new(Choice::StrongLocal);
        sel.reset();
        assert_eq!(sel.state(), Choice::WeakGlobal);

        let mut u = UsefulCounter::new(Usefulness::StrongUseful);
        u.reset();
        assert!(u.is_available());
    }

    #[test]
    fn upper_half_predicts_taken() {
        let expect = [
            (Direction::StrongNotTaken, Outcome::N),
            (Direction::WeakNotTaken, Outcome::N),
            (Direction::WeakTaken, Outcome::T),
            (Direction::StrongTaken, Outcome::T),
        ];
        for (state, outcome) in expect {
            assert_eq!(DirectionCounter::new(state).predict(), outcome);
        }
        assert_eq!(DirectionCounter::weak(Outcome::T).state(), Direction::WeakTaken);
        assert_eq!(DirectionCounter::weak(Outcome::N).state(), Direction::WeakNotTaken);
    }

    #[test]
    fn other_interpretations() {
        let sel = ChoiceCounter::default();
        assert!(sel.prefers_global());
        assert!(ChoiceCounter::new(Choice::WeakLocal).prefers_local());

        let mut u = UsefulCounter::default();
        assert!(u.is_available());
        u.bump(true);
        assert!(!u.is_available());
        assert!(!u.is_useful());
        u.bump(true);
        assert!(u.is_useful());
        assert_eq!(UsefulCounter::storage_bits(), 2);
    }

    proptest! {
        #[test]
        fn bumps_never_leave_the_range(ups in prop::collection::vec(any::<bool>(), 0..128)) {
            let mut ctr = UsefulCounter::default();
            let mut model: i32 = 0;
            for up in ups {
                ctr.bump(up);
                model = if up { (model + 1).min(3) } else { (model - 1).max(0) };
                prop_assert!(ctr.state().level() <= 3);
                prop_assert_eq!(ctr.state().level() as i32, model);
            }
        }
    }
}
