//! Lazily filtered sequence with single-element lookahead
//!
//! The predicate is evaluated on demand and at most once per source element.
//! A qualifying element found by [`FilteredSequence::has_next`] is buffered, so
//! repeated probes without an intervening take do not touch the source again.

use crate::error::ExhaustedError;

/// Lookahead state
#[derive(Debug)]
enum Lookahead<T> {
    /// The source has not been probed since the last take
    Unprobed,
    /// A qualifying element is buffered
    Buffered(T),
    /// The source ran dry; it is never polled again
    Exhausted,
}

/// Iterator adapter yielding only the source elements that satisfy a predicate
pub struct FilteredSequence<I: Iterator, P> {
    source: I,
    predicate: P,
    lookahead: Lookahead<I::Item>,
}

impl<I, P> FilteredSequence<I, P>
where
    I: Iterator,
    P: FnMut(&I::Item) -> bool,
{
    /// Wrap `source`, keeping the elements for which `predicate` returns true
    pub fn new(source: impl IntoIterator<IntoIter = I>, predicate: P) -> Self {
        Self {
            source: source.into_iter(),
            predicate,
            lookahead: Lookahead::Unprobed,
        }
    }

    /// Returns true if another qualifying element is available.
    ///
    /// Advances the source only as far as the next qualifying element.
    pub fn has_next(&mut self) -> bool {
        if let Lookahead::Unprobed = self.lookahead {
            self.lookahead = Lookahead::Exhausted;
            for item in self.source.by_ref() {
                if (self.predicate)(&item) {
                    self.lookahead = Lookahead::Buffered(item);
                    break;
                }
            }
        }
        matches!(self.lookahead, Lookahead::Buffered(_))
    }

    /// Take the next qualifying element, failing once the sequence is exhausted
    pub fn try_next(&mut self) -> Result<I::Item, ExhaustedError> {
        if !self.has_next() {
            return Err(ExhaustedError);
        }
        match std::mem::replace(&mut self.lookahead, Lookahead::Unprobed) {
            Lookahead::Buffered(item) => Ok(item),
            // has_next() just reported a buffered element
            other => {
                self.lookahead = other;
                Err(ExhaustedError)
            }
        }
    }
}

impl<I, P> Iterator for FilteredSequence<I, P>
where
    I: Iterator,
    P: FnMut(&I::Item) -> bool,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        self.try_next().ok()
    }
}
