//! Streaming WAVE header verification
//!
//! The header must be bit-exact, including the sentinel chunk sizes used
//! because the total length is unknown while streaming. Existing tools
//! depend on these exact bytes.

use reel_audio::test_utils::MemorySink;
use reel_audio::{ByteSink, WaveWriter};
use reel_core::{AudioFormat, SampleRate};

#[test]
fn header_is_bit_exact_for_cd_stereo() {
    let sink = MemorySink::new();
    let output = sink.clone();
    let format = AudioFormat::new(SampleRate::new(44_100), 2, 16, false);
    let mut writer = WaveWriter::new(sink, format);

    writer.write(&[0]).unwrap();
    writer.close().unwrap();

    #[rustfmt::skip]
    let expected: [u8; 44] = [
        b'R', b'I', b'F', b'F',
        0x24, 0x00, 0x00, 0x80, // RIFF size sentinel: unknown length
        b'W', b'A', b'V', b'E',
        b'f', b'm', b't', b' ',
        16, 0, 0, 0,            // fmt chunk size
        1, 0,                   // PCM
        2, 0,                   // channels
        0x44, 0xac, 0x00, 0x00, // 44100 Hz
        0x10, 0xb1, 0x02, 0x00, // byte rate 176400
        4, 0,                   // block align
        16, 0,                  // bits per sample
        b'd', b'a', b't', b'a',
        0x00, 0x00, 0x00, 0x80, // data size sentinel: unknown length
    ];

    let written = output.bytes();
    assert_eq!(written.len(), 45);
    assert_eq!(&written[..44], &expected);
    assert_eq!(written[44], 0);
}

#[test]
fn header_reflects_the_configured_format() {
    let sink = MemorySink::new();
    let output = sink.clone();
    let format = AudioFormat::new(SampleRate::new(22_050), 1, 8, false);
    let mut writer = WaveWriter::new(sink, format);

    writer.write(&[0x42]).unwrap();
    writer.close().unwrap();

    let written = output.bytes();
    // channels
    assert_eq!(u16::from_le_bytes([written[22], written[23]]), 1);
    // sample rate
    assert_eq!(
        u32::from_le_bytes([written[24], written[25], written[26], written[27]]),
        22_050
    );
    // byte rate = 22050 * 1 * 8 / 8
    assert_eq!(
        u32::from_le_bytes([written[28], written[29], written[30], written[31]]),
        22_050
    );
    // block align
    assert_eq!(u16::from_le_bytes([written[32], written[33]]), 1);
    // bits per sample
    assert_eq!(u16::from_le_bytes([written[34], written[35]]), 8);
}

#[test]
fn payload_is_passed_through_unchanged() {
    let sink = MemorySink::new();
    let output = sink.clone();
    let format = AudioFormat::new(SampleRate::new(44_100), 2, 16, false);
    let mut writer = WaveWriter::new(sink, format);

    let payload: Vec<u8> = (0..=255).collect();
    writer.write(&payload).unwrap();
    writer.close().unwrap();

    assert_eq!(&output.bytes()[44..], &payload[..]);
}
