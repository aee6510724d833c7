mod disk;

pub use disk::{CompositionTable, ElementType, materialize_to_disk};

/// Number of weak compositions, C(N+k-1, k-1). Zero for N < 0 or k <= 0,
/// `None` if the count overflows `u64`.
pub fn composition_count(total: i64, parts: i64) -> Option<u64> {
    if total < 0 || parts <= 0 {
        return Some(0);
    }

    let choose = u128::try_from(parts - 1).ok()?;
    let slots = u128::try_from(total)
        .ok()?
        .checked_add(choose)?;
    let choose = choose.min(slots - choose);

    let mut count = 1_u128;
    for step in 1..=choose {
        count = count.checked_mul(slots - choose + step)? / step;
    }
    u64::try_from(count).ok()
}

pub fn weak_compositions(total: i64, parts: i64) -> WeakCompositions {
    WeakCompositions {
        cursor: BarCursor::new(total, parts),
    }
}

/// Visits every composition through one reused buffer. The slice is only
/// valid for the duration of the call; copy it to keep it.
pub fn for_each_weak_composition<F>(total: i64, parts: i64, mut visit: F)
where
    F: FnMut(&[u64]),
{
    let mut cursor = BarCursor::new(total, parts);
    let mut row = vec![0_u64; cursor.width()];
    while cursor.advance() {
        cursor.fill(&mut row);
        visit(&row);
    }
}

#[derive(Debug, Clone)]
pub struct WeakCompositions {
    cursor: BarCursor,
}

impl Iterator for WeakCompositions {
    type Item = Vec<u64>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.cursor.advance() {
            return None;
        }
        let mut row = vec![0_u64; self.cursor.width()];
        self.cursor.fill(&mut row);
        Some(row)
    }
}

#[derive(Debug, Clone)]
struct BarCursor {
    width: usize,
    slots: usize,
    bars: Vec<usize>,
    state: CursorState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CursorState {
    Fresh,
    Running,
    Done,
}

impl BarCursor {
    fn new(total: i64, parts: i64) -> Self {
        let bounds = usize::try_from(total)
            .ok()
            .zip(usize::try_from(parts).ok().filter(|parts| *parts > 0))
            .and_then(|(total, parts)| total.checked_add(parts - 1).map(|slots| (slots, parts)));

        match bounds {
            Some((slots, parts)) => Self {
                width: parts,
                slots,
                bars: (0..parts - 1).collect(),
                state: CursorState::Fresh,
            },
            None => Self {
                width: 0,
                slots: 0,
                bars: Vec::new(),
                state: CursorState::Done,
            },
        }
    }

    fn width(&self) -> usize {
        self.width
    }

    fn advance(&mut self) -> bool {
        match self.state {
            CursorState::Done => return false,
            CursorState::Fresh => {
                self.state = CursorState::Running;
                return true;
            }
            CursorState::Running => {}
        }

        let chosen = self.bars.len();
        let pivot = (0..chosen)
            .rev()
            .find(|index| self.bars[*index] < self.slots - chosen + index);
        let Some(pivot) = pivot else {
            self.state = CursorState::Done;
            return false;
        };

        self.bars[pivot] += 1;
        for index in pivot + 1..chosen {
            self.bars[index] = self.bars[index - 1] + 1;
        }
        true
    }

    fn fill(&self, row: &mut [u64]) {
        let mut start = 0usize;
        for (slot, bar) in row.iter_mut().zip(self.bars.iter()) {
            *slot = (bar - start) as u64;
            start = bar + 1;
        }
        if let Some(last) = row.last_mut() {
            *last = (self.slots - start) as u64;
        }
    }
}
