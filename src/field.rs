// Copyright 2025 The Drasi Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Field tables describing how a structure is hydrated.
//!
//! A type opts into hydration by implementing [`Hydrate`], which lists its
//! fields in declaration order. Each [`Field`] carries the declared name, an
//! optional key override and a [`Slot`] borrowing the field's storage.
//!
//! The [`hydrate_fields!`](crate::hydrate_fields) macro writes the table for
//! plain structs:
//!
//! ```
//! use etcd_hydrator::hydrate_fields;
//!
//! #[derive(Default)]
//! struct Tls {
//!     enabled: bool,
//!     cert: Vec<u8>,
//! }
//!
//! #[derive(Default)]
//! struct Listener {
//!     address: String,
//!     port: u16,
//!     backlog: u32,
//!     tls: Tls,
//! }
//!
//! hydrate_fields!(Tls { value enabled, value cert => "certificate" });
//! hydrate_fields!(Listener { value address, value port, value backlog, nested tls });
//! ```

use std::fmt;

/// A structure whose fields can be populated from a key-value store.
pub trait Hydrate: Send {
    /// Returns the field table of this value, in declaration order.
    fn fields(&mut self) -> Vec<Field<'_>>;
}

/// Semantic kind of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Bool,
    String,
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
    Bytes,
    Aggregate,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Bool => "bool",
            Kind::String => "string",
            Kind::I8 => "i8",
            Kind::I16 => "i16",
            Kind::I32 => "i32",
            Kind::I64 => "i64",
            Kind::Isize => "isize",
            Kind::U8 => "u8",
            Kind::U16 => "u16",
            Kind::U32 => "u32",
            Kind::U64 => "u64",
            Kind::Usize => "usize",
            Kind::F32 => "f32",
            Kind::F64 => "f64",
            Kind::Bytes => "bytes",
            Kind::Aggregate => "aggregate",
        };
        f.write_str(name)
    }
}

/// Mutable access to a field's storage, tagged by kind.
pub enum Slot<'a> {
    Bool(&'a mut bool),
    Str(&'a mut String),
    I8(&'a mut i8),
    I16(&'a mut i16),
    I32(&'a mut i32),
    I64(&'a mut i64),
    Isize(&'a mut isize),
    U8(&'a mut u8),
    U16(&'a mut u16),
    U32(&'a mut u32),
    U64(&'a mut u64),
    Usize(&'a mut usize),
    F32(&'a mut f32),
    F64(&'a mut f64),
    Bytes(&'a mut Vec<u8>),
    Nested(&'a mut (dyn Hydrate + 'a)),
}

impl Slot<'_> {
    pub fn kind(&self) -> Kind {
        match self {
            Slot::Bool(_) => Kind::Bool,
            Slot::Str(_) => Kind::String,
            Slot::I8(_) => Kind::I8,
            Slot::I16(_) => Kind::I16,
            Slot::I32(_) => Kind::I32,
            Slot::I64(_) => Kind::I64,
            Slot::Isize(_) => Kind::Isize,
            Slot::U8(_) => Kind::U8,
            Slot::U16(_) => Kind::U16,
            Slot::U32(_) => Kind::U32,
            Slot::U64(_) => Kind::U64,
            Slot::Usize(_) => Kind::Usize,
            Slot::F32(_) => Kind::F32,
            Slot::F64(_) => Kind::F64,
            Slot::Bytes(_) => Kind::Bytes,
            Slot::Nested(_) => Kind::Aggregate,
        }
    }
}

impl fmt::Debug for Slot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Slot({})", self.kind())
    }
}

/// Types that can be assigned from a raw store value.
pub trait FieldValue {
    fn slot(&mut self) -> Slot<'_>;
}

macro_rules! field_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl FieldValue for $ty {
                fn slot(&mut self) -> Slot<'_> {
                    Slot::$variant(self)
                }
            }
        )*
    };
}

field_value! {
    bool => Bool,
    String => Str,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
    f32 => F32,
    f64 => F64,
    Vec<u8> => Bytes,
}

/// One entry of a field table.
#[derive(Debug)]
pub struct Field<'a> {
    name: &'static str,
    key: Option<&'static str>,
    slot: Slot<'a>,
}

impl<'a> Field<'a> {
    /// A leaf field coerced from the value stored at its key.
    pub fn value<T: FieldValue>(name: &'static str, value: &'a mut T) -> Self {
        Self {
            name,
            key: None,
            slot: value.slot(),
        }
    }

    /// An aggregate field whose own fields are hydrated beneath its key.
    pub fn nested<T: Hydrate>(name: &'static str, value: &'a mut T) -> Self {
        Self {
            name,
            key: None,
            slot: Slot::Nested(value),
        }
    }

    /// Use `key` as this field's key segment instead of its lowercased name.
    pub fn with_key(mut self, key: &'static str) -> Self {
        self.key = Some(key);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn key(&self) -> Option<&'static str> {
        self.key
    }

    pub fn kind(&self) -> Kind {
        self.slot.kind()
    }

    pub fn into_parts(self) -> (&'static str, Option<&'static str>, Slot<'a>) {
        (self.name, self.key, self.slot)
    }
}

/// Implement [`Hydrate`] for a struct from a list of its fields.
///
/// Each entry is `value <field>` for a leaf or `nested <field>` for an
/// aggregate, optionally followed by `=> "key"` to override the key segment.
#[macro_export]
macro_rules! hydrate_fields {
    ($ty:ty { $( $kind:ident $field:ident $(=> $key:literal)? ),* $(,)? }) => {
        impl $crate::Hydrate for $ty {
            fn fields(&mut self) -> ::std::vec::Vec<$crate::Field<'_>> {
                ::std::vec![
                    $(
                        $crate::Field::$kind(::std::stringify!($field), &mut self.$field)
                            $(.with_key($key))?
                    ),*
                ]
            }
        }
    };
}
