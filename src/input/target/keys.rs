use evdev::KeyCode;

/// Returns the key code for the given key name. Single characters ("a", "7"),
/// common key names ("space", "enter", "up") and raw evdev names ("KEY_A")
/// are accepted.
pub fn key_from_name(name: &str) -> Option<KeyCode> {
    let lower = name.to_lowercase();
    let lower = lower.strip_prefix("key_").unwrap_or(lower.as_str());
    let key = match lower {
        "a" => KeyCode::KEY_A,
        "b" => KeyCode::KEY_B,
        "c" => KeyCode::KEY_C,
        "d" => KeyCode::KEY_D,
        "e" => KeyCode::KEY_E,
        "f" => KeyCode::KEY_F,
        "g" => KeyCode::KEY_G,
        "h" => KeyCode::KEY_H,
        "i" => KeyCode::KEY_I,
        "j" => KeyCode::KEY_J,
        "k" => KeyCode::KEY_K,
        "l" => KeyCode::KEY_L,
        "m" => KeyCode::KEY_M,
        "n" => KeyCode::KEY_N,
        "o" => KeyCode::KEY_O,
        "p" => KeyCode::KEY_P,
        "q" => KeyCode::KEY_Q,
        "r" => KeyCode::KEY_R,
        "s" => KeyCode::KEY_S,
        "t" => KeyCode::KEY_T,
        "u" => KeyCode::KEY_U,
        "v" => KeyCode::KEY_V,
        "w" => KeyCode::KEY_W,
        "x" => KeyCode::KEY_X,
        "y" => KeyCode::KEY_Y,
        "z" => KeyCode::KEY_Z,
        "0" => KeyCode::KEY_0,
        "1" => KeyCode::KEY_1,
        "2" => KeyCode::KEY_2,
        "3" => KeyCode::KEY_3,
        "4" => KeyCode::KEY_4,
        "5" => KeyCode::KEY_5,
        "6" => KeyCode::KEY_6,
        "7" => KeyCode::KEY_7,
        "8" => KeyCode::KEY_8,
        "9" => KeyCode::KEY_9,
        "-" | "minus" => KeyCode::KEY_MINUS,
        "=" | "equal" => KeyCode::KEY_EQUAL,
        "[" | "leftbrace" => KeyCode::KEY_LEFTBRACE,
        "]" | "rightbrace" => KeyCode::KEY_RIGHTBRACE,
        ";" | "semicolon" => KeyCode::KEY_SEMICOLON,
        "'" | "apostrophe" => KeyCode::KEY_APOSTROPHE,
        "`" | "grave" => KeyCode::KEY_GRAVE,
        "\\" | "backslash" => KeyCode::KEY_BACKSLASH,
        "," | "comma" => KeyCode::KEY_COMMA,
        "." | "dot" => KeyCode::KEY_DOT,
        "/" | "slash" => KeyCode::KEY_SLASH,
        " " | "space" => KeyCode::KEY_SPACE,
        "enter" | "return" => KeyCode::KEY_ENTER,
        "esc" | "escape" => KeyCode::KEY_ESC,
        "tab" => KeyCode::KEY_TAB,
        "backspace" => KeyCode::KEY_BACKSPACE,
        "delete" => KeyCode::KEY_DELETE,
        "insert" => KeyCode::KEY_INSERT,
        "home" => KeyCode::KEY_HOME,
        "end" => KeyCode::KEY_END,
        "pageup" | "page_up" => KeyCode::KEY_PAGEUP,
        "pagedown" | "page_down" => KeyCode::KEY_PAGEDOWN,
        "up" => KeyCode::KEY_UP,
        "down" => KeyCode::KEY_DOWN,
        "left" => KeyCode::KEY_LEFT,
        "right" => KeyCode::KEY_RIGHT,
        "shift" | "leftshift" | "shift_l" => KeyCode::KEY_LEFTSHIFT,
        "rightshift" | "shift_r" => KeyCode::KEY_RIGHTSHIFT,
        "ctrl" | "leftctrl" | "ctrl_l" => KeyCode::KEY_LEFTCTRL,
        "rightctrl" | "ctrl_r" => KeyCode::KEY_RIGHTCTRL,
        "alt" | "leftalt" | "alt_l" => KeyCode::KEY_LEFTALT,
        "rightalt" | "alt_r" => KeyCode::KEY_RIGHTALT,
        "meta" | "leftmeta" | "cmd" => KeyCode::KEY_LEFTMETA,
        "capslock" | "caps_lock" => KeyCode::KEY_CAPSLOCK,
        "f1" => KeyCode::KEY_F1,
        "f2" => KeyCode::KEY_F2,
        "f3" => KeyCode::KEY_F3,
        "f4" => KeyCode::KEY_F4,
        "f5" => KeyCode::KEY_F5,
        "f6" => KeyCode::KEY_F6,
        "f7" => KeyCode::KEY_F7,
        "f8" => KeyCode::KEY_F8,
        "f9" => KeyCode::KEY_F9,
        "f10" => KeyCode::KEY_F10,
        "f11" => KeyCode::KEY_F11,
        "f12" => KeyCode::KEY_F12,
        _ => return None,
    };

    Some(key)
}
