use crate::{ChannelOptions, DEFAULT_CAPACITY, REPLACEMENT, Substitution, TRIGGER};

#[test]
fn defaults_enable_the_standard_rule() {
    let options = ChannelOptions::default();
    assert_eq!(options.capacity, DEFAULT_CAPACITY);
    let rule = options.substitution.expect("default rule");
    assert_eq!(rule.trigger(), &TRIGGER);
    assert_eq!(rule.replacement(), REPLACEMENT);
    assert_eq!(rule, Substitution::default());
}

#[test]
fn validate_accepts_minimum_and_above() {
    for capacity in [DEFAULT_CAPACITY, DEFAULT_CAPACITY + 1, 1 << 20] {
        let options = ChannelOptions {
            capacity,
            ..Default::default()
        };
        assert!(options.validate().is_ok(), "capacity {capacity}");
    }
    assert!(
        ChannelOptions {
            capacity: 0,
            substitution: None,
        }
        .validate()
        .is_err()
    );
}

#[cfg(feature = "serde")]
#[test]
fn options_roundtrip_through_json() {
    let options = ChannelOptions {
        capacity: 2048,
        substitution: Some(Substitution::new(*b"abc", b"xyz".as_slice())),
    };
    let json = serde_json::to_string(&options).unwrap();
    let back: ChannelOptions = serde_json::from_str(&json).unwrap();
    assert_eq!(back, options);

    let partial: ChannelOptions = serde_json::from_str(r#"{"capacity":4096}"#).unwrap();
    assert_eq!(partial.capacity, 4096);
    assert_eq!(partial.substitution, Some(Substitution::default()));
}
