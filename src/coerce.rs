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

//! Conversion of raw store values into field values.
//!
//! Store values are always strings. Each [`Slot`] kind has one parsing rule:
//!
//! | kind | rule |
//! |---|---|
//! | `bool` | `1 t T TRUE true True` / `0 f F FALSE false False` |
//! | `String` | assigned verbatim |
//! | signed integers | base-10 `i64`, truncated to the field width |
//! | unsigned integers | base-10 `u64`, truncated to the field width |
//! | floats | decimal `f64`, converted to the field width |
//! | `Vec<u8>` | raw bytes, only while the field is still empty |
//!
//! An absent or empty value never changes the field. A value that does not
//! parse leaves the field unchanged and is reported as [`Coercion::Rejected`].

use crate::field::{Kind, Slot};
use serde::{Deserialize, Serialize};

/// What happens to a field whose value does not parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoercionPolicy {
    /// Keep the field's current value and carry on.
    #[default]
    Lenient,
    /// Abort hydration with [`HydrateError::Coercion`](crate::HydrateError::Coercion).
    Strict,
}

/// Result of applying a raw value to a slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Coercion {
    Assigned,
    Unchanged,
    Rejected { kind: Kind, reason: String },
}

/// Parse the textual boolean forms accepted in the store.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

fn signed(raw: &str) -> Result<i64, String> {
    raw.parse::<i64>().map_err(|e| e.to_string())
}

fn unsigned(raw: &str) -> Result<u64, String> {
    // Unsigned values carry no sign at all, not even '+'.
    if raw.starts_with('+') {
        return Err("unexpected sign in unsigned value".to_string());
    }
    raw.parse::<u64>().map_err(|e| e.to_string())
}

fn float(raw: &str) -> Result<f64, String> {
    raw.parse::<f64>().map_err(|e| e.to_string())
}

fn assign<T>(target: &mut T, parsed: Result<T, String>, kind: Kind) -> Coercion {
    match parsed {
        Ok(value) => {
            *target = value;
            Coercion::Assigned
        }
        Err(reason) => Coercion::Rejected { kind, reason },
    }
}

/// Apply `raw` to `slot` following the rule for its kind.
///
/// Aggregate slots are never coerced and come back [`Coercion::Unchanged`].
pub fn apply(slot: Slot<'_>, raw: Option<&str>) -> Coercion {
    let raw = match raw {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Coercion::Unchanged,
    };

    match slot {
        Slot::Bool(v) => assign(
            v,
            parse_bool(raw).ok_or_else(|| format!("invalid boolean '{raw}'")),
            Kind::Bool,
        ),
        Slot::Str(v) => {
            *v = raw.to_string();
            Coercion::Assigned
        }
        Slot::I8(v) => assign(v, signed(raw).map(|n| n as i8), Kind::I8),
        Slot::I16(v) => assign(v, signed(raw).map(|n| n as i16), Kind::I16),
        Slot::I32(v) => assign(v, signed(raw).map(|n| n as i32), Kind::I32),
        Slot::I64(v) => assign(v, signed(raw), Kind::I64),
        Slot::Isize(v) => assign(v, signed(raw).map(|n| n as isize), Kind::Isize),
        Slot::U8(v) => assign(v, unsigned(raw).map(|n| n as u8), Kind::U8),
        Slot::U16(v) => assign(v, unsigned(raw).map(|n| n as u16), Kind::U16),
        Slot::U32(v) => assign(v, unsigned(raw).map(|n| n as u32), Kind::U32),
        Slot::U64(v) => assign(v, unsigned(raw), Kind::U64),
        Slot::Usize(v) => assign(v, unsigned(raw).map(|n| n as usize), Kind::Usize),
        Slot::F32(v) => assign(v, float(raw).map(|n| n as f32), Kind::F32),
        Slot::F64(v) => assign(v, float(raw), Kind::F64),
        Slot::Bytes(v) => {
            // Bytes set before hydration win over the store.
            if v.is_empty() {
                *v = raw.as_bytes().to_vec();
                Coercion::Assigned
            } else {
                Coercion::Unchanged
            }
        }
        Slot::Nested(_) => Coercion::Unchanged,
    }
}
