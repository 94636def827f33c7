//! Fuzz target: `wire::decode_text`
//!
//! Arbitrary frames must never panic the decoder, and anything it
//! accepts must re-encode to a frame that decodes to the same command.
//!
//! cargo fuzz run fuzz_text_decoder

#![no_main]

use libfuzzer_sys::fuzz_target;
use rcpanel::adapters::wire::{decode_text, encode_text};
use rcpanel::dispatch::DeviceCommand;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };
    let Ok(cmd) = decode_text(text) else {
        return;
    };

    let reencoded = encode_text(&cmd);
    let again = decode_text(&reencoded).expect("re-encoded frame must decode");
    match (cmd, again) {
        // Vectors are printed with three decimals; compare loosely.
        (DeviceCommand::MoveLeft(a), DeviceCommand::MoveLeft(b))
        | (DeviceCommand::MoveRight(a), DeviceCommand::MoveRight(b)) => {
            assert!((a.x - b.x).abs() <= 0.0005 && (a.y - b.y).abs() <= 0.0005);
        }
        (a, b) => assert_eq!(a, b),
    }
});
