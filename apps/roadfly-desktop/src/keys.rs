use winit::keyboard::{Key, NamedKey};

/// Key identifier pushed to the input queue, in the same vocabulary as the
/// controls' key bindings (`"w"`, `"ArrowUp"`, ...).
pub fn key_identifier(key: &Key) -> Option<String> {
    match key {
        Key::Character(s) => Some(s.to_lowercase()),
        Key::Named(named) => named_identifier(*named).map(String::from),
        _ => None,
    }
}

fn named_identifier(key: NamedKey) -> Option<&'static str> {
    Some(match key {
        NamedKey::ArrowUp => "ArrowUp",
        NamedKey::ArrowDown => "ArrowDown",
        NamedKey::ArrowLeft => "ArrowLeft",
        NamedKey::ArrowRight => "ArrowRight",
        NamedKey::Space => " ",
        NamedKey::Shift => "Shift",
        NamedKey::Escape => "Escape",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use roadfly_input::{KeyBindings, MoveDirection};

    #[test]
    fn characters_are_lowercased() {
        assert_eq!(key_identifier(&Key::Character("W".into())).as_deref(), Some("w"));
    }

    #[test]
    fn arrows_use_binding_names() {
        let bindings = KeyBindings::default();
        let id = key_identifier(&Key::Named(NamedKey::ArrowLeft)).unwrap();
        assert_eq!(bindings.direction_for(&id), Some(MoveDirection::Left));
    }

    #[test]
    fn unmapped_named_keys_are_dropped() {
        assert_eq!(key_identifier(&Key::Named(NamedKey::F5)), None);
    }
}
