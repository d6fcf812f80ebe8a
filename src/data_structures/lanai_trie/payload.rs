// Copyright (c) 2025 Lanai Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Type-tagged value storage for terminal trie nodes.

use std::any::{Any, TypeId};
use std::fmt;

/// A type-erased value together with the tag of the type it was stored as.
///
/// The tag is recorded at construction and compared on every typed read, so a
/// value inserted as `u32` can never be observed as `i32` or `u64`.
pub struct Payload {
    type_id: TypeId,
    type_name: &'static str,
    value: Box<dyn Any + Send + Sync>,
}

impl Payload {
    /// Wraps `value`, tagging it with the `TypeId` of `T`.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            value: Box::new(value),
        }
    }

    /// Returns `true` if the stored tag matches `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Borrows the value as `T`, or `None` if the tag does not match.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        if !self.is::<T>() {
            return None;
        }
        self.value.downcast_ref::<T>()
    }

    /// Consumes the payload and returns the value as `T`.
    ///
    /// On a tag mismatch the payload is handed back untouched.
    pub fn downcast<T: Any>(self) -> Result<T, Self> {
        if !self.is::<T>() {
            return Err(self);
        }
        let Self {
            type_id,
            type_name,
            value,
        } = self;
        match value.downcast::<T>() {
            Ok(boxed) => Ok(*boxed),
            Err(value) => Err(Self {
                type_id,
                type_name,
                value,
            }),
        }
    }

    /// The tag the value was stored under.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Human-readable name of the stored type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Payload")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}
