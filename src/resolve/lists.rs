//! Open-list tracking for nested list emission.

use crate::model::{ListFrame, ListTransition};

/// Stack of open list containers, outermost first.
#[derive(Debug, Clone, Default)]
pub struct ListStack {
    frames: Vec<ListFrame>,
}

impl ListStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move to a list item described by `target`.
    ///
    /// Frames deeper than the target close, as does a frame at the target
    /// depth that belongs to another list or has another kind. A new frame
    /// opens when none at the target depth remains.
    pub fn enter(&mut self, target: ListFrame) -> ListTransition {
        let mut transition = ListTransition::default();

        while let Some(top) = self.frames.last() {
            let deeper = top.ilvl > target.ilvl;
            let replaced =
                top.ilvl == target.ilvl && (top.num_id != target.num_id || top.kind != target.kind);
            if !(deeper || replaced) {
                break;
            }
            if let Some(frame) = self.frames.pop() {
                transition.close_before.push(frame);
            }
        }

        let open_here = self
            .frames
            .last()
            .map_or(true, |top| top.ilvl < target.ilvl);
        if open_here {
            self.frames.push(target);
            transition.open.push(target);
        }

        transition
    }

    /// Close everything, innermost first.
    pub fn close_all(&mut self) -> Vec<ListFrame> {
        let mut closed = std::mem::take(&mut self.frames);
        closed.reverse();
        closed
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
