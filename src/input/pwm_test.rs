use evdev::KeyCode;

use crate::input::{
    pwm::{KeyAction, KeyPair, Phase, PwmBinding, PwmChannel, PwmKeyEmulator, PwmSettings},
    state::ChannelState,
    target::recorder::{OutputEvent, Recorder},
};

const KEYS: KeyPair = KeyPair {
    negative: KeyCode::KEY_A,
    positive: KeyCode::KEY_D,
};

/// 8Hz with 64 ticks per period keeps every elapsed time exactly representable
const PERIOD: f64 = 0.125;
const TICKS_PER_PERIOD: usize = 64;
const DELTA: f64 = PERIOD / TICKS_PER_PERIOD as f64;

fn settings() -> PwmSettings {
    PwmSettings {
        period: PERIOD,
        deadzone: 0.15,
    }
}

/// Runs the channel at a constant value for the given number of ticks and
/// returns the number of ticks after which a key was held
fn held_ticks(channel: &mut PwmChannel, value: f64, ticks: usize) -> usize {
    let settings = settings();
    (0..ticks)
        .filter(|_| {
            channel.advance(DELTA, value, &KEYS, &settings);
            channel.held().is_some()
        })
        .count()
}

#[test]
fn test_duty_cycle_matches_axis_magnitude() {
    for value in [0.25, 0.5, 0.75, 0.9, -0.3, -0.6] {
        let mut channel = PwmChannel::new();
        // Start the first period at the same point as every following one
        channel.advance(0.0, value, &KEYS, &settings());

        let periods = 10;
        let held = held_ticks(&mut channel, value, periods * TICKS_PER_PERIOD);
        let duty = held as f64 / (periods * TICKS_PER_PERIOD) as f64;
        let resolution = 1.0 / TICKS_PER_PERIOD as f64;
        println!("value: {value}, duty: {duty}");
        assert!(
            (duty - f64::abs(value)).abs() <= 2.0 * resolution,
            "duty cycle {duty} should match |{value}|"
        );
    }
}

#[test]
fn test_deadzone_never_presses() {
    for value in [0.0, 0.1, 0.15, -0.15, -0.05] {
        let mut channel = PwmChannel::new();
        let settings = settings();
        for _ in 0..(5 * TICKS_PER_PERIOD) {
            let actions = channel.advance(DELTA, value, &KEYS, &settings);
            assert!(actions.is_empty(), "value {value} should not press a key");
        }
        assert_eq!(channel.phase(), Phase::Idle);
        assert_eq!(channel.held(), None);
    }
}

#[test]
fn test_key_follows_sign_at_press_time() {
    let settings = settings();
    let mut channel = PwmChannel::new();

    let actions = channel.advance(0.0, -0.5, &KEYS, &settings);
    assert_eq!(actions, vec![KeyAction::Press(KeyCode::KEY_A)]);
    assert_eq!(channel.phase(), Phase::Pressed);

    let mut channel = PwmChannel::new();
    let actions = channel.advance(0.0, 0.5, &KEYS, &settings);
    assert_eq!(actions, vec![KeyAction::Press(KeyCode::KEY_D)]);
}

#[test]
fn test_sign_change_mid_period_releases_pressed_key() {
    let settings = settings();
    let mut channel = PwmChannel::new();
    assert_eq!(
        channel.advance(0.0, 0.8, &KEYS, &settings),
        vec![KeyAction::Press(KeyCode::KEY_D)]
    );

    // Flip the sign while the pulse is still running
    let mut actions = Vec::new();
    for _ in 1..TICKS_PER_PERIOD {
        actions.extend(channel.advance(DELTA, -0.8, &KEYS, &settings));
    }
    assert_eq!(actions, vec![KeyAction::Release(KeyCode::KEY_D)]);
    assert_eq!(channel.phase(), Phase::WaitingForPeriodEnd);

    // The next period evaluates the new sign
    let actions = channel.advance(DELTA, -0.8, &KEYS, &settings);
    assert_eq!(actions, vec![KeyAction::Press(KeyCode::KEY_A)]);
}

#[test]
fn test_full_deflection_holds_key_across_periods() {
    let settings = settings();
    let mut channel = PwmChannel::new();
    let mut actions = channel.advance(0.0, 1.0, &KEYS, &settings);
    for _ in 0..(3 * TICKS_PER_PERIOD) {
        actions.extend(channel.advance(DELTA, 1.0, &KEYS, &settings));
        assert_eq!(channel.held(), Some(KeyCode::KEY_D));
    }

    // The period reset wins over the release, so the key is only re-pressed
    assert_eq!(actions, vec![KeyAction::Press(KeyCode::KEY_D); 4]);
}

#[test]
fn test_full_deflection_sign_flip_releases_before_press() {
    let settings = settings();
    let mut channel = PwmChannel::new();
    channel.advance(0.0, 1.0, &KEYS, &settings);
    for _ in 1..TICKS_PER_PERIOD {
        channel.advance(DELTA, 1.0, &KEYS, &settings);
    }
    assert_eq!(channel.held(), Some(KeyCode::KEY_D));

    let actions = channel.advance(DELTA, -1.0, &KEYS, &settings);
    assert_eq!(
        actions,
        vec![
            KeyAction::Release(KeyCode::KEY_D),
            KeyAction::Press(KeyCode::KEY_A)
        ]
    );
}

#[test]
fn test_full_deflection_released_when_entering_deadzone_at_period_end() {
    let settings = settings();
    let mut channel = PwmChannel::new();
    channel.advance(0.0, 1.0, &KEYS, &settings);
    for _ in 1..TICKS_PER_PERIOD {
        channel.advance(DELTA, 1.0, &KEYS, &settings);
    }

    let actions = channel.advance(DELTA, 0.0, &KEYS, &settings);
    assert_eq!(actions, vec![KeyAction::Release(KeyCode::KEY_D)]);
    assert_eq!(channel.held(), None);
    assert_eq!(channel.phase(), Phase::Idle);
}

#[test]
fn test_reset_releases_held_key() {
    let settings = settings();
    let mut channel = PwmChannel::new();
    channel.advance(0.0, -0.7, &KEYS, &settings);
    assert_eq!(channel.reset(), Some(KeyAction::Release(KeyCode::KEY_A)));
    assert_eq!(channel.reset(), None);
    assert_eq!(channel.period_elapsed(), 0.0);
}

fn emulator(state: &ChannelState, frequency: f64) -> PwmKeyEmulator {
    let axis = state.axis_id("x").expect("should have x axis");
    PwmKeyEmulator::new(
        PwmSettings {
            period: 1.0 / frequency,
            deadzone: 0.150,
        },
        vec![PwmBinding { axis, keys: KEYS }],
    )
}

#[test]
fn test_half_deflection_at_10hz() {
    let mut state = ChannelState::new(&["x".to_string()], &[]);
    let x = state.axis_id("x").expect("should have x axis");
    state.set_axis(x, 0.5);
    let mut pwm = emulator(&state, 10.0);
    let mut keyboard = Recorder::new();

    // One second of 1ms ticks
    let delta = 0.001;
    let mut held_time = 0.0;
    pwm.tick(0.0, &state, &mut keyboard);
    for _ in 0..1000 {
        pwm.tick(delta, &state, &mut keyboard);
        if keyboard.held_keys.contains(&KeyCode::KEY_D) {
            held_time += delta;
        }
    }

    println!("held for {held_time}s");
    assert!((held_time - 0.5).abs() < 0.05, "key should be held ~50%");
    let presses = keyboard
        .events
        .iter()
        .filter(|e| **e == OutputEvent::KeyPress(KeyCode::KEY_D))
        .count();
    assert!((9..=11).contains(&presses), "should press once per period");
    assert!(!keyboard.events.contains(&OutputEvent::KeyPress(KeyCode::KEY_A)));
}

#[test]
fn test_full_deflection_at_10hz_repress_every_period() {
    let mut state = ChannelState::new(&["x".to_string()], &[]);
    let x = state.axis_id("x").expect("should have x axis");
    state.set_axis(x, 1.0);
    let mut pwm = emulator(&state, 10.0);
    let mut keyboard = Recorder::new();

    pwm.tick(0.0, &state, &mut keyboard);
    assert_eq!(keyboard.take(), vec![OutputEvent::KeyPress(KeyCode::KEY_D)]);

    let delta = 0.001;
    for _ in 0..1000 {
        pwm.tick(delta, &state, &mut keyboard);
        assert!(keyboard.held_keys.contains(&KeyCode::KEY_D));
    }
    let events = keyboard.take();
    assert!(events
        .iter()
        .all(|e| *e == OutputEvent::KeyPress(KeyCode::KEY_D)));
    assert!((9..=10).contains(&events.len()));
}

#[test]
fn test_mutual_exclusion_under_changing_input() {
    let mut state = ChannelState::new(&["x".to_string()], &[]);
    let x = state.axis_id("x").expect("should have x axis");
    let mut pwm = emulator(&state, 10.0);
    let mut keyboard = Recorder::new();

    let values = [1.0, -1.0, 0.4, -0.95, 0.0, 1.0, -0.2, 0.6, -1.0, 1.0];
    for step in 0..5000 {
        let value = values[(step / 37) % values.len()];
        state.set_axis(x, value);
        pwm.tick(0.001, &state, &mut keyboard);
        assert!(
            keyboard.held_keys.len() <= 1,
            "at most one key may be held, got {:?}",
            keyboard.held_keys
        );
    }

    pwm.release_all(&mut keyboard);
    assert!(keyboard.held_keys.is_empty());
}
