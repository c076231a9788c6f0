//! Control-sequence filter for bridged program output.
//!
//! Removes CSI sequences (`ESC [`, parameter bytes `[0-9;?]*`, one final
//! byte) and OSC sequences (`ESC ]` up to `BEL` or `ESC \`). Everything else
//! is copied through. Single forward pass, no backtracking.

const ESC: u8 = 0x1b;
const BEL: u8 = 0x07;

/// Strip CSI and OSC sequences from `input`.
///
/// A sequence cut off by the end of input is dropped. A lone `ESC` that does
/// not introduce CSI or OSC is kept.
pub fn strip_escapes(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = String::with_capacity(input.len());
    let mut run_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        let introducer = if bytes[i] == ESC {
            bytes.get(i + 1).copied()
        } else {
            None
        };
        match introducer {
            Some(b'[') => {
                out.push_str(&input[run_start..i]);
                i = skip_csi(input, i + 2);
                run_start = i;
            }
            Some(b']') => {
                out.push_str(&input[run_start..i]);
                i = skip_osc(bytes, i + 2);
                run_start = i;
            }
            _ => i += 1,
        }
    }

    out.push_str(&input[run_start..]);
    out
}

/// Index just past a CSI sequence whose parameters start at `i`.
fn skip_csi(input: &str, mut i: usize) -> usize {
    let bytes = input.as_bytes();
    while i < bytes.len() && matches!(bytes[i], b'0'..=b'9' | b';' | b'?') {
        i += 1;
    }
    if i < bytes.len() {
        // The final byte may be the lead of a multi-byte character.
        i += 1;
        while i < bytes.len() && !input.is_char_boundary(i) {
            i += 1;
        }
    }
    i
}

/// Index just past an OSC sequence whose payload starts at `i`.
///
/// Stops in front of a stray `ESC` that is not part of `ESC \` so the main
/// loop can look at it again.
fn skip_osc(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i] != BEL && bytes[i] != ESC {
        i += 1;
    }
    if i < bytes.len() && bytes[i] == BEL {
        i + 1
    } else if bytes.get(i) == Some(&ESC) && bytes.get(i + 1) == Some(&b'\\') {
        i + 2
    } else {
        i
    }
}
