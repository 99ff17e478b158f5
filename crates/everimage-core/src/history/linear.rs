/// Linear undo/redo history.
///
/// `index` is `-1` exactly when the history is empty; otherwise it points at
/// the current entry. Pushing discards everything after the current entry.
#[derive(Clone, Debug)]
pub struct History<T> {
    entries: Vec<T>,
    index: isize,
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> History<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: -1,
        }
    }

    /// Make `state` the current entry, dropping any redo entries.
    pub fn push(&mut self, state: T) {
        let keep = (self.index + 1) as usize;
        self.entries.truncate(keep);
        self.entries.push(state);
        self.index = self.entries.len() as isize - 1;
    }

    /// Step back one entry. Returns whether the index moved.
    pub fn undo(&mut self) -> bool {
        if !self.can_undo() {
            return false;
        }
        self.index -= 1;
        true
    }

    /// Step forward one entry. Returns whether the index moved.
    pub fn redo(&mut self) -> bool {
        if !self.can_redo() {
            return false;
        }
        self.index += 1;
        true
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index >= 0 && self.index < self.entries.len() as isize - 1
    }

    pub fn current(&self) -> Option<&T> {
        usize::try_from(self.index)
            .ok()
            .and_then(|i| self.entries.get(i))
    }

    /// Edit the current entry in place; no new undo step.
    pub fn replace_current(&mut self, edit: impl FnOnce(&mut T)) -> bool {
        let Ok(i) = usize::try_from(self.index) else {
            return false;
        };
        match self.entries.get_mut(i) {
            Some(entry) => {
                edit(entry);
                true
            }
            None => false,
        }
    }

    /// Push the state built from the current entry (or `None` when empty).
    pub fn push_from_current(&mut self, build: impl FnOnce(Option<&T>) -> T) {
        let next = build(self.current());
        self.push(next);
    }

    /// Push `apply(current)`; does nothing on an empty history.
    pub fn apply_from_current(&mut self, apply: impl FnOnce(&T) -> T) -> bool {
        let Some(current) = self.current() else {
            return false;
        };
        let next = apply(current);
        self.push(next);
        true
    }

    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    pub fn index(&self) -> isize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index = -1;
    }
}
