use quickcheck_macros::quickcheck;

use crate::{Channel, ChannelOptions, ContractViolation, MIN_CAPACITY, RingStore};

fn plain_options() -> ChannelOptions {
    ChannelOptions {
        capacity: MIN_CAPACITY,
        substitution: None,
    }
}

fn digits(n: usize) -> Vec<u8> {
    (0..n).map(|i| b'0' + (i % 10) as u8).collect()
}

#[test]
fn run_inside_the_buffer_is_one_span() {
    let mut store = RingStore::new(plain_options()).unwrap();
    for &b in &digits(10) {
        store.add_byte(b);
    }

    let (first, second) = store.get_bytes(4).unwrap();
    assert_eq!(first, b"0123");
    assert!(second.is_empty());
    assert_eq!(store.count(), 6);
}

#[test]
fn run_crossing_the_end_is_split_in_two() {
    let mut store = RingStore::new(plain_options()).unwrap();
    for _ in 0..1000 {
        store.add_byte(b'-');
    }
    store.get_bytes(1000).unwrap();

    let input = digits(100);
    for &b in &input {
        store.add_byte(b);
    }

    let (first, second) = store.get_bytes(100).unwrap();
    assert_eq!(first.len(), MIN_CAPACITY - 1000);
    assert_eq!(second.len(), 100 - first.len());
    assert_eq!([first, second].concat(), input);
    assert!(store.is_empty());
}

#[test]
fn zero_length_request_changes_nothing() {
    let mut store = RingStore::new(plain_options()).unwrap();
    store.add_byte(b'q');

    let (first, second) = store.get_bytes(0).unwrap();
    assert!(first.is_empty() && second.is_empty());
    assert_eq!(store.count(), 1);
    assert_eq!(store.stats().delivered, 0);

    store.get_byte().unwrap();
    let (first, second) = store.get_bytes(0).unwrap();
    assert!(first.is_empty() && second.is_empty());
    assert!(store.is_empty());
}

#[test]
fn overdraw_is_a_contract_violation() {
    let mut store = RingStore::new(plain_options()).unwrap();
    for &b in &digits(10) {
        store.add_byte(b);
    }

    assert_eq!(
        store.get_bytes(11).unwrap_err(),
        ContractViolation::Overdraw {
            requested: 11,
            available: 10,
        }
    );
    assert_eq!(store.count(), 10);
    assert_eq!(store.get_byte(), Ok(b'0'));
}

#[test]
fn whole_full_store_can_be_taken_at_once() {
    let mut store = RingStore::new(plain_options()).unwrap();
    for _ in 0..10 {
        store.add_byte(b'x');
    }
    store.get_bytes(10).unwrap();
    let input = digits(MIN_CAPACITY);
    for &b in &input {
        store.add_byte(b);
    }
    assert!(store.is_full());

    let (first, second) = store.get_bytes(MIN_CAPACITY).unwrap();
    assert_eq!(first.len() + second.len(), MIN_CAPACITY);
    assert_eq!([first, second].concat(), input);
    assert!(store.is_empty());
    assert!(!store.is_full());
}

#[test]
fn peek_leaves_bytes_in_place() {
    let mut store = RingStore::new(plain_options()).unwrap();
    for &b in b"peek" {
        store.add_byte(b);
    }
    let (first, second) = store.peek_bytes(3).unwrap();
    assert_eq!([first, second].concat(), b"pee");
    assert_eq!(store.count(), 4);
}

#[test]
fn channel_spans_view_removed_bytes() {
    let channel = Channel::new(ChannelOptions::default()).unwrap();
    channel.write(b"hello UCF");

    {
        let spans = channel.get_bytes(6).unwrap();
        assert_eq!(spans.len(), 6);
        assert_eq!(spans.first(), b"hello ");
        assert!(spans.second().is_empty());
        assert_eq!(format!("{spans:?}"), r#"Spans { first: "hello ", second: "" }"#);
    }

    assert_eq!(channel.count(), crate::REPLACEMENT.len());
    let rest = channel.get_bytes(channel.count()).unwrap();
    assert_eq!(rest.iter().collect::<Vec<_>>(), crate::REPLACEMENT);
}

#[test]
fn channel_overdraw_keeps_state() {
    let channel = Channel::new(plain_options()).unwrap();
    channel.write(b"abc");
    assert!(matches!(
        channel.get_bytes(4),
        Err(ContractViolation::Overdraw {
            requested: 4,
            available: 3
        })
    ));
    assert_eq!(channel.count(), 3);
}

/// Property: for any fill level and read offset, taking `len` bytes as spans
/// yields what `len` single-byte reads would.
#[quickcheck]
fn spans_match_sequential_reads(offset: u16, fill: u16, take: u16) -> bool {
    let offset = usize::from(offset) % MIN_CAPACITY;
    let fill = usize::from(fill) % (MIN_CAPACITY + 1);
    let take = if fill == 0 { 0 } else { usize::from(take) % (fill + 1) };

    let mut by_spans = RingStore::new(plain_options()).unwrap();
    let mut by_bytes = RingStore::new(plain_options()).unwrap();
    for store in [&mut by_spans, &mut by_bytes] {
        for _ in 0..offset {
            store.add_byte(0);
        }
        store.get_bytes(offset).unwrap();
        for i in 0..fill {
            store.add_byte((i % 256) as u8);
        }
    }

    let expected: Vec<u8> = (0..take).map(|_| by_bytes.get_byte().unwrap()).collect();
    let (first, second) = by_spans.get_bytes(take).unwrap();
    let crosses_end = offset + take > MIN_CAPACITY;

    first.len() + second.len() == take
        && (crosses_end || second.is_empty())
        && [first, second].concat() == expected
        && by_spans.count() == by_bytes.count()
        && by_spans.is_empty() == by_bytes.is_empty()
}
