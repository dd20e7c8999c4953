// Mutual exclusion over a fixed row of toggles.

use std::collections::HashMap;

use crate::error::Error;
use crate::node::{Handle, Node, NodeId, Widget};

/// A widget that can take part in a [`RadioConstraint`].
pub trait Toggle: Widget {
    /// Whether the user clicked it since the last call.
    fn take_click(&mut self) -> bool;
    fn set_on(&mut self, on: bool);
    fn is_on(&self) -> bool;
}

/// Called with the UI root and the item's new state. Listeners only see the
/// tree, so they cannot change the selection while it is being changed.
pub type Listener = Box<dyn FnMut(&mut Node, bool)>;

/// Exactly one of `items` is selected after every operation.
pub struct RadioConstraint<T: Toggle> {
    items: Vec<Handle<T>>,
    index_of: HashMap<NodeId, usize>,
    selected: usize,
    changed: bool,
    listeners: Vec<Vec<Listener>>,
}

impl<T: Toggle> RadioConstraint<T> {
    pub fn new(items: Vec<Handle<T>>, initial: usize) -> Result<Self, Error> {
        if items.is_empty() {
            return Err(Error::EmptyConstraint);
        }
        let index_of = items.iter().enumerate().map(|(i, h)| (h.id(), i)).collect();
        let listeners = items.iter().map(|_| Vec::new()).collect();
        let selected = initial.min(items.len() - 1);
        Ok(Self { items, index_of, selected, changed: true, listeners })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Handle<T>] {
        &self.items
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> Handle<T> {
        self.items[self.selected]
    }

    pub fn index_of(&self, item: Handle<T>) -> Option<usize> {
        self.index_of.get(&item.id()).copied()
    }

    /// Register `listener` on `item`. Returns false if the item isn't part of this constraint.
    pub fn add_listener(&mut self, item: Handle<T>, listener: Listener) -> bool {
        match self.index_of(item) {
            Some(i) => {
                self.listeners[i].push(listener);
                true
            }
            None => false,
        }
    }

    fn notify(&mut self, root: &mut Node, index: usize, on: bool) {
        for listener in &mut self.listeners[index] {
            listener(root, on);
        }
    }

    /// Push the current selection into the tree and fire every listener once,
    /// deselected items first. Call after building the UI.
    pub fn sync(&mut self, root: &mut Node) -> Result<(), Error> {
        for (i, &item) in self.items.iter().enumerate() {
            root.widget_mut(item)?.set_on(i == self.selected);
        }
        let selected = self.selected;
        for i in (0..self.items.len()).filter(|&i| i != selected) {
            self.notify(root, i, false);
        }
        self.notify(root, selected, true);
        Ok(())
    }

    fn select(&mut self, root: &mut Node, index: usize) -> Result<(), Error> {
        let old = self.selected;
        if index == old {
            // Re-assert in case a click flipped it off
            root.widget_mut(self.items[old])?.set_on(true);
            return Ok(());
        }
        root.widget_mut(self.items[old])?.set_on(false);
        self.notify(root, old, false);
        self.selected = index;
        root.widget_mut(self.items[index])?.set_on(true);
        self.notify(root, index, true);
        self.changed = true;
        log::debug!("radio selection {old} -> {index}");
        Ok(())
    }

    /// Consume pending clicks on the items and report
    /// `(changed_since_last_read, selected_index, selected_item)`.
    pub fn read(&mut self, root: &mut Node) -> Result<(bool, usize, Handle<T>), Error> {
        let mut clicked = None;
        for (i, &item) in self.items.iter().enumerate() {
            let widget = root.widget_mut(item)?;
            if widget.take_click() {
                clicked = Some(i);
            }
            // Clicks flip toggles on their own; the constraint decides
            widget.set_on(i == self.selected);
        }
        if let Some(i) = clicked {
            self.select(root, i)?;
        }
        let changed = std::mem::take(&mut self.changed);
        Ok((changed, self.selected, self.items[self.selected]))
    }

    /// Select `item`. Returns false (and changes nothing) for foreign items.
    pub fn change_to(&mut self, root: &mut Node, item: Handle<T>) -> Result<bool, Error> {
        match self.index_of(item) {
            Some(i) => {
                self.select(root, i)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn change_to_index(&mut self, root: &mut Node, index: usize) -> Result<bool, Error> {
        if index >= self.items.len() {
            return Ok(false);
        }
        self.select(root, index)?;
        Ok(true)
    }

    /// Select the following item, wrapping from last to first.
    pub fn next(&mut self, root: &mut Node) -> Result<(), Error> {
        self.select(root, (self.selected + 1) % self.items.len())
    }

    /// Select the preceding item, wrapping from first to last.
    pub fn previous(&mut self, root: &mut Node) -> Result<(), Error> {
        let n = self.items.len();
        self.select(root, (self.selected + n - 1) % n)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::node::PointerEvent;
    use crate::stack::Stack;
    use crate::widgets::ToggleButton;

    fn row(labels: &[&str]) -> (Node, Vec<Handle<ToggleButton>>) {
        let (nodes, handles): (Vec<Node>, Vec<_>) = ToggleButton::many(labels.iter().copied()).into_iter().map(Node::with_handle).unzip();
        (Node::new(Stack::horizontal(nodes).space_equally(true)), handles)
    }

    fn on_states(root: &Node, items: &[Handle<ToggleButton>]) -> Vec<bool> {
        items.iter().map(|&h| root.get(h).map(Toggle::is_on).unwrap_or(false)).collect()
    }

    #[test]
    fn next_and_previous_wrap() {
        let (mut root, items) = row(&["A", "B", "C"]);
        let mut radio = RadioConstraint::new(items.clone(), 2).unwrap();
        radio.sync(&mut root).unwrap();
        radio.next(&mut root).unwrap();
        assert_eq!(radio.selected_index(), 0);
        radio.previous(&mut root).unwrap();
        assert_eq!(radio.selected_index(), 2);
        assert_eq!(on_states(&root, &items), vec![false, false, true]);
    }

    #[test]
    fn read_is_one_shot() {
        let (mut root, items) = row(&["A", "B"]);
        let mut radio = RadioConstraint::new(items.clone(), 0).unwrap();
        assert_eq!(radio.read(&mut root).unwrap(), (true, 0, items[0]));
        assert_eq!(radio.read(&mut root).unwrap(), (false, 0, items[0]));
        radio.change_to(&mut root, items[1]).unwrap();
        assert_eq!(radio.read(&mut root).unwrap(), (true, 1, items[1]));
    }

    #[test]
    fn click_selects_and_clicking_selected_keeps_it() {
        let (mut root, items) = row(&["A", "B"]);
        let mut radio = RadioConstraint::new(items.clone(), 0).unwrap();
        radio.sync(&mut root).unwrap();
        radio.read(&mut root).unwrap();
        root.render(20, 100);

        root.dispatch(PointerEvent::down(75, 10));
        assert_eq!(radio.read(&mut root).unwrap(), (true, 1, items[1]));
        root.dispatch(PointerEvent::down(75, 10));
        assert_eq!(radio.read(&mut root).unwrap(), (false, 1, items[1]));
        assert_eq!(on_states(&root, &items), vec![false, true]);
    }

    #[test]
    fn listeners_fire_deselect_then_select() {
        let (mut root, items) = row(&["A", "B"]);
        let mut radio = RadioConstraint::new(items.clone(), 0).unwrap();
        let log = Rc::new(RefCell::new(Vec::new()));
        for (i, &item) in items.iter().enumerate() {
            let log = Rc::clone(&log);
            radio.add_listener(item, Box::new(move |_, on| log.borrow_mut().push((i, on))));
        }
        radio.change_to(&mut root, items[1]).unwrap();
        assert_eq!(*log.borrow(), vec![(0, false), (1, true)]);
    }

    #[test]
    fn sync_sets_states_and_fires_selected_last() {
        let (mut root, items) = row(&["A", "B", "C"]);
        let mut radio = RadioConstraint::new(items.clone(), 1).unwrap();
        let log = Rc::new(RefCell::new(Vec::new()));
        for (i, &item) in items.iter().enumerate() {
            let log = Rc::clone(&log);
            radio.add_listener(item, Box::new(move |_, on| log.borrow_mut().push((i, on))));
        }
        radio.sync(&mut root).unwrap();
        assert_eq!(*log.borrow(), vec![(0, false), (2, false), (1, true)]);
        assert_eq!(on_states(&root, &items), vec![false, true, false]);
    }

    #[test]
    fn empty_constraint_is_rejected() {
        assert!(RadioConstraint::<ToggleButton>::new(Vec::new(), 0).is_err());
    }
}
