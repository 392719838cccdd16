use std::ops::Deref;

/// Read-only holder for values which must not change after construction (e.g. experiment parameters)
#[derive(Debug, Clone)]
pub struct Immutable<T> {
    value: T,
}

impl<T> Immutable<T> {
    pub fn new(value: T) -> Self { Self { value } }
}

impl<T> Deref for Immutable<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target { &self.value }
}
