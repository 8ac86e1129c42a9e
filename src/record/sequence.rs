use std::{cmp::Ordering, iter::FusedIterator, marker::PhantomData, ops::RangeBounds};

use crate::{Result, Value, util::clamp_range};

/// Sequence operations over a fixed-length, indexed container of [`Value`]s.
///
/// Implementors provide [`len`](FixedSequence::len), [`get`](FixedSequence::get)
/// and [`set`](FixedSequence::set); every other operation is derived from those.
/// The length never changes, so there is no push, pop or splice.
///
/// Mutating operations (`sort`, `reverse`, `fill`, `copy_within`) read every
/// source element before the first write, and stop at the first rejected
/// write.
pub trait FixedSequence<'a> {
    fn len(&self) -> usize;

    fn get(&self, index: usize) -> Option<Value<'a>>;

    fn set(&self, index: usize, value: Value<'_>) -> Result<()>;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    fn iter(&self) -> SequenceIter<'_, 'a, Self>
    where
        Self: Sized,
    {
        SequenceIter {
            sequence: self,
            front: 0,
            back: self.len(),
            _marker: PhantomData,
        }
    }

    fn to_vec(&self) -> Vec<Value<'a>>
    where
        Self: Sized,
    {
        self.iter().collect()
    }

    /// The elements followed by `other`, as a new vector.
    fn concat<I>(&self, other: I) -> Vec<Value<'a>>
    where
        Self: Sized,
        I: IntoIterator<Item = Value<'a>>,
    {
        self.iter().chain(other).collect()
    }

    /// Copies the elements in `range`, clamped to the length.
    fn slice(&self, range: impl RangeBounds<usize>) -> Vec<Value<'a>>
    where
        Self: Sized,
    {
        clamp_range(range, self.len())
            .filter_map(|index| self.get(index))
            .collect()
    }

    fn map<R>(&self, mut f: impl FnMut(Value<'a>, usize) -> R) -> Vec<R>
    where
        Self: Sized,
    {
        self.iter()
            .enumerate()
            .map(|(index, value)| f(value, index))
            .collect()
    }

    fn filter(&self, mut predicate: impl FnMut(&Value<'a>, usize) -> bool) -> Vec<Value<'a>>
    where
        Self: Sized,
    {
        self.iter()
            .enumerate()
            .filter(|(index, value)| predicate(value, *index))
            .map(|(_, value)| value)
            .collect()
    }

    fn find(&self, mut predicate: impl FnMut(&Value<'a>, usize) -> bool) -> Option<Value<'a>>
    where
        Self: Sized,
    {
        self.iter()
            .enumerate()
            .find(|(index, value)| predicate(value, *index))
            .map(|(_, value)| value)
    }

    fn find_index(&self, mut predicate: impl FnMut(&Value<'a>, usize) -> bool) -> Option<usize>
    where
        Self: Sized,
    {
        self.iter()
            .enumerate()
            .find(|(index, value)| predicate(value, *index))
            .map(|(index, _)| index)
    }

    fn find_last(&self, mut predicate: impl FnMut(&Value<'a>, usize) -> bool) -> Option<Value<'a>>
    where
        Self: Sized,
    {
        self.iter()
            .enumerate()
            .rev()
            .find(|(index, value)| predicate(value, *index))
            .map(|(_, value)| value)
    }

    fn find_last_index(
        &self,
        mut predicate: impl FnMut(&Value<'a>, usize) -> bool,
    ) -> Option<usize>
    where
        Self: Sized,
    {
        self.iter()
            .enumerate()
            .rev()
            .find(|(index, value)| predicate(value, *index))
            .map(|(index, _)| index)
    }

    /// `true` for an empty sequence.
    fn every(&self, mut predicate: impl FnMut(&Value<'a>, usize) -> bool) -> bool
    where
        Self: Sized,
    {
        self.iter()
            .enumerate()
            .all(|(index, value)| predicate(&value, index))
    }

    /// `false` for an empty sequence.
    fn some(&self, mut predicate: impl FnMut(&Value<'a>, usize) -> bool) -> bool
    where
        Self: Sized,
    {
        self.iter()
            .enumerate()
            .any(|(index, value)| predicate(&value, index))
    }

    /// Like [`index_of`](FixedSequence::index_of), but NaN matches NaN.
    fn includes(&self, needle: &Value<'_>) -> bool
    where
        Self: Sized,
    {
        self.iter().any(|value| value.same_value_zero(needle))
    }

    fn index_of(&self, needle: &Value<'_>) -> Option<usize>
    where
        Self: Sized,
    {
        self.iter().position(|value| value == *needle)
    }

    fn last_index_of(&self, needle: &Value<'_>) -> Option<usize>
    where
        Self: Sized,
    {
        self.iter().rposition(|value| value == *needle)
    }

    fn for_each(&self, mut f: impl FnMut(Value<'a>, usize))
    where
        Self: Sized,
    {
        self.iter()
            .enumerate()
            .for_each(|(index, value)| f(value, index))
    }

    fn reduce<R>(&self, init: R, mut f: impl FnMut(R, Value<'a>, usize) -> R) -> R
    where
        Self: Sized,
    {
        self.iter()
            .enumerate()
            .fold(init, |acc, (index, value)| f(acc, value, index))
    }

    fn reduce_right<R>(&self, init: R, mut f: impl FnMut(R, Value<'a>, usize) -> R) -> R
    where
        Self: Sized,
    {
        self.iter()
            .enumerate()
            .rev()
            .fold(init, |acc, (index, value)| f(acc, value, index))
    }

    /// Joins the elements' display forms with `separator`.
    fn join(&self, separator: &str) -> String
    where
        Self: Sized,
    {
        self.iter()
            .map(|value| value.to_string())
            .collect::<Vec<_>>()
            .join(separator)
    }

    /// Sorts in place by [`Value::total_cmp`]. The sort is stable.
    fn sort(&self) -> Result<()>
    where
        Self: Sized,
    {
        self.sort_by(|a, b| a.total_cmp(b))
    }

    /// Sorts in place with a comparator. The sort is stable.
    fn sort_by(&self, compare: impl FnMut(&Value<'a>, &Value<'a>) -> Ordering) -> Result<()>
    where
        Self: Sized,
    {
        let mut values = self.to_vec();
        values.sort_by(compare);
        write_all(self, 0, values)
    }

    fn reverse(&self) -> Result<()>
    where
        Self: Sized,
    {
        let mut values = self.to_vec();
        values.reverse();
        write_all(self, 0, values)
    }

    /// Writes `value` to every index in `range`, clamped to the length.
    fn fill(&self, value: Value<'_>, range: impl RangeBounds<usize>) -> Result<()>
    where
        Self: Sized,
    {
        for index in clamp_range(range, self.len()) {
            self.set(index, value.clone())?;
        }
        Ok(())
    }

    /// Copies the elements in `range` to the position starting at `target`.
    /// Overlapping ranges behave as if the source were copied out first.
    fn copy_within(&self, target: usize, range: impl RangeBounds<usize>) -> Result<()>
    where
        Self: Sized,
    {
        let len = self.len();
        let source = clamp_range(range, len);
        let target = target.min(len);
        let count = source.len().min(len - target);
        let values = self.slice(source.start..source.start + count);
        write_all(self, target, values)
    }
}

fn write_all<'a, S: FixedSequence<'a>>(sequence: &S, start: usize, values: Vec<Value<'a>>) -> Result<()> {
    for (offset, value) in values.into_iter().enumerate() {
        sequence.set(start + offset, value)?;
    }
    Ok(())
}

/// Iterator over the elements of a [`FixedSequence`].
pub struct SequenceIter<'s, 'a, S> {
    sequence: &'s S,
    front: usize,
    back: usize,
    _marker: PhantomData<Value<'a>>,
}

impl<'a, S: FixedSequence<'a>> Iterator for SequenceIter<'_, 'a, S> {
    type Item = Value<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        let value = self.sequence.get(self.front);
        self.front += 1;
        value
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<'a, S: FixedSequence<'a>> DoubleEndedIterator for SequenceIter<'_, 'a, S> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        self.sequence.get(self.back)
    }
}

impl<'a, S: FixedSequence<'a>> ExactSizeIterator for SequenceIter<'_, 'a, S> {}

impl<'a, S: FixedSequence<'a>> FusedIterator for SequenceIter<'_, 'a, S> {}
