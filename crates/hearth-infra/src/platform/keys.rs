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

//! Translation from `winit` keyboard events to the host's key identities.
//!
//! This module acts as an adapter layer, decoupling the rest of the host
//! from the specific key event format of the `winit` crate.

use hearth_core::platform::KeySym;
use winit::event::KeyEvent;
use winit::keyboard::{Key, KeyCode, PhysicalKey};

/// Translates a `winit` keyboard event into the host's `KeySym`.
///
/// Named keys are resolved from the physical key code so they stay stable
/// across keyboard layouts; printable characters come from the logical key,
/// which respects the layout.
///
/// # Arguments
///
/// * `event`: A reference to a `KeyEvent` from the `winit` library.
///
/// # Returns
///
/// The matching `KeySym`, or `KeySym::Unidentified` when the key has no
/// host-side name and produces no character.
pub fn translate_key_event(event: &KeyEvent) -> KeySym {
    if let PhysicalKey::Code(code) = event.physical_key {
        if let Some(named) = map_key_code(code) {
            return named;
        }
    }
    map_logical_key(&event.logical_key).unwrap_or(KeySym::Unidentified)
}

/// (Internal) Maps the physical key codes the host names directly.
fn map_key_code(code: KeyCode) -> Option<KeySym> {
    match code {
        KeyCode::Escape => Some(KeySym::Escape),
        KeyCode::Tab => Some(KeySym::Tab),
        KeyCode::Space => Some(KeySym::Space),
        KeyCode::Enter => Some(KeySym::Enter),
        KeyCode::Backspace => Some(KeySym::Backspace),
        _ => None,
    }
}

/// (Internal) Extracts a printable character from the logical key.
fn map_logical_key(key: &Key) -> Option<KeySym> {
    if let Key::Character(text) = key {
        if let Some(c) = text.chars().next() {
            return Some(KeySym::Character(c));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::{NamedKey, SmolStr};

    #[test]
    fn named_physical_keys_map_to_their_symbols() {
        assert_eq!(map_key_code(KeyCode::Escape), Some(KeySym::Escape));
        assert_eq!(map_key_code(KeyCode::Tab), Some(KeySym::Tab));
        assert_eq!(map_key_code(KeyCode::Space), Some(KeySym::Space));
        assert_eq!(map_key_code(KeyCode::Enter), Some(KeySym::Enter));
        assert_eq!(map_key_code(KeyCode::Backspace), Some(KeySym::Backspace));
    }

    #[test]
    fn letter_keys_fall_through_to_the_logical_character() {
        assert_eq!(map_key_code(KeyCode::KeyA), None);
        assert_eq!(
            map_logical_key(&Key::Character(SmolStr::new("a"))),
            Some(KeySym::Character('a'))
        );
        assert_eq!(
            map_logical_key(&Key::Character(SmolStr::new("É"))),
            Some(KeySym::Character('É'))
        );
    }

    #[test]
    fn non_character_logical_keys_map_to_nothing() {
        assert_eq!(map_logical_key(&Key::Named(NamedKey::Shift)), None);
        assert_eq!(map_logical_key(&Key::Named(NamedKey::F5)), None);
    }
}
