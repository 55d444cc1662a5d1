use std::fmt::Debug;

use derive_more::{Add, AddAssign};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Add, AddAssign)]
#[repr(transparent)]
pub struct ByteNum(usize);

impl ByteNum {
    pub const ZERO: ByteNum = ByteNum(0);

    #[inline]
    #[must_use]
    pub const fn new(bytes: usize) -> Self {
        Self(bytes)
    }

    #[inline]
    #[must_use]
    pub const fn get(&self) -> usize {
        self.0
    }
}

/// Receives progress of the long-running operations, e.g. to drive a
/// progress bar.
pub trait ProgressNotifier: Debug + Send + Sync {
    /// Called after a chunk of a streamed input has been consumed.
    fn processed_bytes(&self, bytes: ByteNum);

    /// Called once the number of read groups to process is known.
    fn set_group_num(&self, group_num: u64);

    /// Called after a consensus has been computed for a single read group.
    fn inc_group(&self);
}

impl<T: ProgressNotifier> ProgressNotifier for &T {
    fn processed_bytes(&self, bytes: ByteNum) {
        T::processed_bytes(self, bytes)
    }

    fn set_group_num(&self, group_num: u64) {
        T::set_group_num(self, group_num)
    }

    fn inc_group(&self) {
        T::inc_group(self)
    }
}

/// Progress notifier that ignores all the notifications.
#[derive(Clone, Debug)]
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn processed_bytes(&self, _bytes: ByteNum) {
        // do nothing
    }

    fn set_group_num(&self, _group_num: u64) {
        // do nothing
    }

    fn inc_group(&self) {
        // do nothing
    }
}
