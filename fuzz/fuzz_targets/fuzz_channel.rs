#![no_main]
use std::collections::VecDeque;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use ringdev::{Channel, ChannelOptions, ContractViolation, MIN_CAPACITY, Substitution};

#[derive(Debug, Arbitrary)]
enum Op {
    Write(Vec<u8>),
    /// Repeat a short chunk to reach saturation quickly.
    Flood { chunk: Vec<u8>, times: u8 },
    Read(u16),
    GetByte,
    Clear,
}

#[derive(Debug, Arbitrary)]
struct Input {
    extra_capacity: u8,
    trigger: Option<([u8; 3], Vec<u8>)>,
    ops: Vec<Op>,
}

/// Reference behaviour: a bounded deque that drops on full and rewrites its
/// newest three bytes after every push, without rescanning the replacement.
struct Model {
    capacity: usize,
    bytes: VecDeque<u8>,
    rule: Option<Substitution>,
}

impl Model {
    fn write(&mut self, data: &[u8]) -> usize {
        let mut consumed = 0;
        for &byte in data {
            if self.bytes.len() == self.capacity {
                break;
            }
            self.bytes.push_back(byte);
            consumed += 1;

            let Some(rule) = &self.rule else { continue };
            let len = self.bytes.len();
            if len >= 3 && self.bytes.range(len - 3..).eq(rule.trigger()) {
                self.bytes.truncate(len - 3);
                for &b in rule.replacement() {
                    if self.bytes.len() == self.capacity {
                        break;
                    }
                    self.bytes.push_back(b);
                }
            }
        }
        consumed
    }
}

fuzz_target!(|input: Input| {
    let rule = match input.trigger {
        Some((trigger, replacement)) => Some(Substitution::new(trigger, replacement)),
        None => Some(Substitution::default()),
    };
    let options = ChannelOptions {
        capacity: MIN_CAPACITY + usize::from(input.extra_capacity),
        substitution: rule.clone(),
    };
    let channel = Channel::new(options.clone()).unwrap();
    let mut model = Model {
        capacity: options.capacity,
        bytes: VecDeque::new(),
        rule,
    };

    for op in input.ops {
        match op {
            Op::Write(data) => assert_eq!(channel.write(&data), model.write(&data)),
            Op::Flood { chunk, times } => {
                let data = chunk.repeat(usize::from(times));
                assert_eq!(channel.write(&data), model.write(&data));
            }
            Op::Read(n) => {
                let n = usize::from(n).min(channel.count());
                let spans = channel.get_bytes(n).unwrap();
                let expected: Vec<u8> = model.bytes.drain(..n).collect();
                assert_eq!(spans.to_vec(), expected);
            }
            Op::GetByte => match model.bytes.pop_front() {
                Some(b) => assert_eq!(channel.get_byte(), Ok(b)),
                None => assert_eq!(channel.get_byte(), Err(ContractViolation::Empty)),
            },
            Op::Clear => {
                channel.clear();
                model.bytes.clear();
            }
        }

        channel.assert_invariants();
        let count = channel.count();
        assert_eq!(count, model.bytes.len());
        assert_eq!(channel.is_empty(), count == 0);
        assert_eq!(channel.is_full(), count == options.capacity);
    }
});
