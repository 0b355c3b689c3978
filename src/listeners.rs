use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;

/// An ordered list of listeners notified one after another.
///
/// A listener that fails during [`ListenerList::notify`] is logged and
/// skipped; the remaining listeners are still notified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerList<L> {
    listeners: Vec<L>,
}

impl<L> Default for ListenerList<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L> ListenerList<L> {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn add_listener(&mut self, listener: L) {
        self.listeners.push(listener);
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &L> {
        self.listeners.iter()
    }

    /// Apply `op` to every listener in insertion order.
    ///
    /// Returns how many listeners failed.
    pub fn notify<E, F>(&self, mut op: F) -> usize
    where
        E: Display,
        F: FnMut(&L) -> Result<(), E>,
    {
        let mut failures = 0;
        for (index, listener) in self.listeners.iter().enumerate() {
            if let Err(e) = op(listener) {
                log::warn!("listener {index} failed: {e}");
                failures += 1;
            }
        }
        failures
    }
}

impl<L: PartialEq> ListenerList<L> {
    /// Remove the first listener equal to `listener`. Returns whether one was found.
    pub fn remove_listener(&mut self, listener: &L) -> bool {
        match self.listeners.iter().position(|l| l == listener) {
            Some(index) => {
                self.listeners.remove(index);
                true
            }
            None => false,
        }
    }
}

/// Add `listener` to `list`, creating the list when there is none yet.
pub fn add_listener<L>(list: Option<ListenerList<L>>, listener: L) -> ListenerList<L> {
    let mut list = list.unwrap_or_default();
    list.add_listener(listener);
    list
}

/// Add `listener` to the list registered under `key`, creating it if needed.
pub fn add_keyed_listener<K, L>(map: &mut HashMap<K, ListenerList<L>>, key: K, listener: L)
where
    K: Eq + Hash,
{
    map.entry(key).or_default().add_listener(listener);
}

/// Remove `listener` from the list registered under `key`.
///
/// A list left empty is dropped from the map. Returns whether the listener was found.
pub fn remove_keyed_listener<K, L>(
    map: &mut HashMap<K, ListenerList<L>>,
    key: &K,
    listener: &L,
) -> bool
where
    K: Eq + Hash,
    L: PartialEq,
{
    let Some(list) = map.get_mut(key) else {
        return false;
    };
    let removed = list.remove_listener(listener);
    if list.is_empty() {
        map.remove(key);
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn notifies_in_order() {
        let mut list = ListenerList::new();
        list.add_listener("a");
        list.add_listener("b");
        list.add_listener("c");

        let seen = RefCell::new(Vec::new());
        let failures = list.notify(|name| {
            seen.borrow_mut().push(*name);
            Ok::<(), String>(())
        });
        assert_eq!(failures, 0);
        assert_eq!(seen.into_inner(), vec!["a", "b", "c"]);
    }

    #[test]
    fn failing_listener_does_not_stop_the_rest() {
        let list = add_listener(Some(add_listener(Some(add_listener(None, 1)), 2)), 3);
        let mut seen = Vec::new();
        let failures = list.notify(|n| {
            seen.push(*n);
            if *n == 2 { Err("boom") } else { Ok(()) }
        });
        assert_eq!(failures, 1);
        assert_eq!(seen, vec![1, 2, 3]);
    }

    #[test]
    fn remove_takes_first_match() {
        let mut list = ListenerList::default();
        list.add_listener(7);
        list.add_listener(8);
        list.add_listener(7);
        assert!(list.remove_listener(&7));
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![8, 7]);
        assert!(!list.remove_listener(&9));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn keyed_listeners() {
        let mut map: HashMap<&str, ListenerList<u32>> = HashMap::new();
        add_keyed_listener(&mut map, "click", 1);
        add_keyed_listener(&mut map, "click", 2);
        add_keyed_listener(&mut map, "key", 3);
        assert_eq!(map["click"].len(), 2);

        assert!(remove_keyed_listener(&mut map, &"click", &1));
        assert_eq!(map["click"].len(), 1);
        assert!(!remove_keyed_listener(&mut map, &"missing", &1));

        assert!(remove_keyed_listener(&mut map, &"key", &3));
        assert!(!map.contains_key("key"));
    }
}
