use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Append-only storage, handing out typed indices instead of references
pub struct Arena<T> {
    data: Vec<T>,
}

/// An index into an `Arena<T>`. Only valid for the arena that created it.
pub struct Index<T> {
    data: u32,
    phantom: PhantomData<T>,
}

impl<T> Index<T> {
    fn new(data: u32) -> Self {
        Self {
            data,
            phantom: PhantomData,
        }
    }

    pub fn get(self) -> usize {
        self.data as usize
    }
}

// Manual impls, to not require `T` to implement these traits
impl<T> Clone for Index<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Index<T> {}

impl<T> PartialEq for Index<T> {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl<T> Eq for Index<T> {}

impl<T> Hash for Index<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.data.hash(state)
    }
}

impl<T> fmt::Debug for Index<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.data)
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Arena { data: vec![] }
    }
}

impl<T> Arena<T> {
    pub fn get(&self, index: Index<T>) -> &T {
        &self.data[index.get()]
    }

    pub fn get_mut(&mut self, index: Index<T>) -> &mut T {
        &mut self.data[index.get()]
    }

    pub fn add(&mut self, value: T) -> Index<T> {
        let index = Index::new(self.data.len() as u32);
        self.data.push(value);
        index
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
