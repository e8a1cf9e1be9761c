use std::collections::VecDeque;

/// Where a tracked resource currently lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Location {
    Available,
    Acquired,
}

/// Membership of the resources tracked by a pool.
///
/// A resource is in at most one of the two collections and never twice in
/// the same one.
#[derive(Debug)]
pub(crate) struct Members<R> {
    /// Resources waiting to be acquired, oldest first.
    available: VecDeque<R>,
    /// Resources lent out. Order carries no meaning.
    acquired: Vec<R>,
}

impl<R> Members<R> {
    pub(crate) fn new() -> Self {
        Self {
            available: VecDeque::new(),
            acquired: Vec::new(),
        }
    }

    pub(crate) fn available(&self) -> usize {
        self.available.len()
    }

    pub(crate) fn acquired(&self) -> usize {
        self.acquired.len()
    }
}

impl<R: PartialEq> Members<R> {
    pub(crate) fn locate(&self, resource: &R) -> Option<Location> {
        if self.available.contains(resource) {
            Some(Location::Available)
        } else if self.acquired.contains(resource) {
            Some(Location::Acquired)
        } else {
            None
        }
    }

    pub(crate) fn is_acquired(&self, resource: &R) -> bool {
        self.acquired.contains(resource)
    }

    /// Appends `resource` to the available queue unless it is already tracked.
    pub(crate) fn insert(&mut self, resource: R) -> bool {
        if self.locate(&resource).is_some() {
            return false;
        }
        self.available.push_back(resource);
        true
    }

    /// Moves the oldest available resource to the acquired set and hands out
    /// a copy of it.
    pub(crate) fn check_out(&mut self) -> Option<R>
    where
        R: Clone,
    {
        let resource = self.available.pop_front()?;
        self.acquired.push(resource.clone());
        Some(resource)
    }

    /// Moves an acquired resource back to the tail of the available queue.
    pub(crate) fn check_in(&mut self, resource: &R) -> bool {
        match self.acquired.iter().position(|r| r == resource) {
            Some(index) => {
                let resource = self.acquired.swap_remove(index);
                self.available.push_back(resource);
                true
            }
            None => false,
        }
    }

    pub(crate) fn remove_available(&mut self, resource: &R) -> bool {
        match self.available.iter().position(|r| r == resource) {
            Some(index) => self.available.remove(index).is_some(),
            None => false,
        }
    }

    /// Drops `resource` from whichever collection holds it.
    pub(crate) fn remove_any(&mut self, resource: &R) -> bool {
        if self.remove_available(resource) {
            return true;
        }
        match self.acquired.iter().position(|r| r == resource) {
            Some(index) => {
                let _ = self.acquired.swap_remove(index);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Location, Members};

    fn members(available: &[&'static str]) -> Members<&'static str> {
        let mut members = Members::new();
        for resource in available {
            assert!(members.insert(*resource));
        }
        members
    }

    #[test]
    fn insert_rejects_duplicates() {
        let mut members = members(&["a"]);
        assert!(!members.insert("a"));
        assert_eq!(members.available(), 1);

        assert_eq!(members.check_out(), Some("a"));
        assert!(!members.insert("a"));
        assert_eq!(members.available(), 0);
        assert_eq!(members.acquired(), 1);
    }

    #[test]
    fn check_out_is_fifo() {
        let mut members = members(&["a", "b", "c"]);
        assert_eq!(members.check_out(), Some("a"));
        assert_eq!(members.check_out(), Some("b"));
        assert!(members.check_in(&"a"));
        assert_eq!(members.check_out(), Some("c"));
        assert_eq!(members.check_out(), Some("a"));
        assert_eq!(members.check_out(), None);
        assert_eq!(members.acquired(), 3);
    }

    #[test]
    fn check_in_requires_acquired() {
        let mut members = members(&["a"]);
        assert!(!members.check_in(&"a"));
        assert!(!members.check_in(&"x"));
        assert_eq!(members.available(), 1);
        assert_eq!(members.acquired(), 0);
    }

    #[test]
    fn locate() {
        let mut members = members(&["a", "b"]);
        let _ = members.check_out();
        assert_eq!(members.locate(&"a"), Some(Location::Acquired));
        assert_eq!(members.locate(&"b"), Some(Location::Available));
        assert_eq!(members.locate(&"c"), None);
        assert!(members.is_acquired(&"a"));
        assert!(!members.is_acquired(&"b"));
    }

    #[test]
    fn remove_available_leaves_acquired_alone() {
        let mut members = members(&["a", "b"]);
        let _ = members.check_out();
        assert!(!members.remove_available(&"a"));
        assert!(members.remove_available(&"b"));
        assert!(!members.remove_available(&"b"));
        assert_eq!(members.acquired(), 1);
    }

    #[test]
    fn remove_any() {
        let mut members = members(&["a", "b"]);
        let _ = members.check_out();
        assert!(members.remove_any(&"a"));
        assert!(members.remove_any(&"b"));
        assert!(!members.remove_any(&"a"));
        assert_eq!(members.available(), 0);
        assert_eq!(members.acquired(), 0);
    }
}
