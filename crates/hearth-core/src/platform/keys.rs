// Copyright 2025 eraflo
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

//! Backend-neutral key identities.

/// A key identity independent of any windowing backend.
///
/// Covers the named keys the host itself reacts to plus printable
/// characters. Encodable as a `u32` so a key press can travel through an
/// atomic; see [`to_raw`](KeySym::to_raw) and [`from_raw`](KeySym::from_raw).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeySym {
    /// No key has been recorded.
    None,
    /// The Escape key.
    Escape,
    /// The Tab key.
    Tab,
    /// The space bar.
    Space,
    /// The Enter / Return key.
    Enter,
    /// The Backspace key.
    Backspace,
    /// A printable character, as reported by the active keyboard layout.
    Character(char),
    /// A key the backend reported but the host does not name.
    Unidentified,
}

/// Marks a raw value as carrying a character scalar. Scalar values stop at
/// 0x10FFFF, so the top bit is free to carry the discriminant.
const CHARACTER_BIT: u32 = 0x8000_0000;

impl KeySym {
    /// Encodes the key as a `u32` for atomic storage.
    pub const fn to_raw(self) -> u32 {
        match self {
            KeySym::None => 0,
            KeySym::Escape => 1,
            KeySym::Tab => 2,
            KeySym::Space => 3,
            KeySym::Enter => 4,
            KeySym::Backspace => 5,
            KeySym::Unidentified => 6,
            KeySym::Character(c) => CHARACTER_BIT | c as u32,
        }
    }

    /// Decodes a value produced by [`to_raw`](KeySym::to_raw). A raw value
    /// this module never produced decodes as [`KeySym::Unidentified`].
    pub fn from_raw(raw: u32) -> KeySym {
        if raw & CHARACTER_BIT != 0 {
            return match char::from_u32(raw & !CHARACTER_BIT) {
                Some(c) => KeySym::Character(c),
                None => KeySym::Unidentified,
            };
        }
        match raw {
            0 => KeySym::None,
            1 => KeySym::Escape,
            2 => KeySym::Tab,
            3 => KeySym::Space,
            4 => KeySym::Enter,
            5 => KeySym::Backspace,
            _ => KeySym::Unidentified,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_keys_round_trip_through_raw() {
        for key in [
            KeySym::None,
            KeySym::Escape,
            KeySym::Tab,
            KeySym::Space,
            KeySym::Enter,
            KeySym::Backspace,
            KeySym::Unidentified,
        ] {
            assert_eq!(KeySym::from_raw(key.to_raw()), key);
        }
    }

    #[test]
    fn characters_round_trip_through_raw() {
        for c in ['a', 'Z', '0', 'é', '🔥'] {
            let key = KeySym::Character(c);
            assert_eq!(KeySym::from_raw(key.to_raw()), key);
        }
    }

    #[test]
    fn unknown_raw_values_decode_as_unidentified() {
        assert_eq!(KeySym::from_raw(99), KeySym::Unidentified);
    }
}
