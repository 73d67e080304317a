// -------------------------------------------------------------------
// Versioned
// -------------------------------------------------------------------

/// Value paired with a counter that moves on every mutation, so
/// derived data can be keyed on it.
#[derive(Clone)]
pub struct Versioned<T> {
    version: u64,
    data: T,
}

impl<T> Versioned<T> {
    pub fn new(data: T) -> Self {
        Self { version: 0, data }
    }
    pub fn get(&self) -> &T {
        &self.data
    }
    pub fn version(&self) -> u64 {
        self.version
    }
    /// Run `f` on the data; bump the version only if it reports a
    /// change.
    pub fn modify(&mut self, f: impl FnOnce(&mut T) -> bool) -> bool {
        let changed = f(&mut self.data);
        if changed {
            self.version = self.version.wrapping_add(1);
        }
        changed
    }
}

// -------------------------------------------------------------------
// Memoized
// -------------------------------------------------------------------

pub struct Memoized<S, K, V> {
    version: u64,
    cached: Option<(K, V)>,
    get_key: Box<dyn Fn(&S) -> K>,
    calc: Box<dyn Fn(&S) -> V>,
}

impl<S, K, V> Memoized<S, K, V>
where
    K: PartialEq,
{
    pub fn new(
        get_key: impl Fn(&S) -> K + 'static,
        calc: impl Fn(&S) -> V + 'static,
    ) -> Self {
        Self {
            version: 0,
            cached: None,
            get_key: Box::new(get_key),
            calc: Box::new(calc),
        }
    }

    /// Recompute only if the key changed; return a reference to the cached value.
    pub fn get<'a>(&'a mut self, store: &S) -> &'a V {
        let key = (self.get_key)(store);
        let hit = matches!(&self.cached, Some(entry) if entry.0 == key);
        if !hit {
            let value = (self.calc)(store);
            self.version = self.version.wrapping_add(1);
            self.cached = Some((key, value));
        }
        &self.cached.as_ref().expect("cache populated above").1
    }

    /// Number of recomputations so far.
    pub fn version(&self) -> u64 {
        self.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_modify_bumps_version_only_on_change() {
        let mut value = Versioned::new(1);
        assert!(!value.modify(|_| false));
        assert_eq!(value.version(), 0);
        assert!(value.modify(|v| {
            *v += 1;
            true
        }));
        assert_eq!((*value.get(), value.version()), (2, 1));
    }

    #[test]
    fn test_memoized_recomputes_on_key_change() {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let mut doubled = Memoized::new(
            |s: &Versioned<i32>| s.version(),
            move |s: &Versioned<i32>| {
                counter.set(counter.get() + 1);
                s.get() * 2
            },
        );
        let mut source = Versioned::new(21);
        assert_eq!(*doubled.get(&source), 42);
        assert_eq!(*doubled.get(&source), 42);
        assert_eq!(calls.get(), 1);

        source.modify(|v| {
            *v = 5;
            true
        });
        assert_eq!(*doubled.get(&source), 10);
        assert_eq!(calls.get(), 2);
        assert_eq!(doubled.version(), 2);
    }
}
