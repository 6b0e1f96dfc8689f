// Deferred formatting: decodes a record's bytes into one text line.
// Runs only on the consumer thread.

use crate::level::Level;
use crate::record::{
    TAG_CHAR, TAG_F64, TAG_I32, TAG_I64, TAG_STR_LITERAL, TAG_STR_OWNED, TAG_U32, TAG_U64,
};
use std::io::Write;

/// Render one encoded record as
/// `[<timestamp_us>][<LEVEL>][<thread_id>][<file>:<function>:<line>] <args...>`
/// followed by a newline. Arguments are concatenated with no separators:
/// integers in base 10, `char` as itself, strings as their raw bytes, and
/// `f64` in Rust's default `Display` form (the shortest representation that
/// parses back to the same value).
pub(crate) fn write_line(buf: &[u8], out: &mut Vec<u8>) {
    let mut pos = 0;
    let timestamp = u64::from_ne_bytes(read_array(buf, &mut pos));
    let thread_id = u32::from_ne_bytes(read_array(buf, &mut pos));
    let file = read_str_ref(buf, &mut pos);
    let function = read_str_ref(buf, &mut pos);
    let line = u32::from_ne_bytes(read_array(buf, &mut pos));
    let level = match Level::from_u8(buf[pos]) {
        Some(level) => level.as_str(),
        None => "XXXX",
    };
    pos += 1;

    let _ = write!(
        out,
        "[{}][{}][{}][{}:{}:{}] ",
        timestamp, level, thread_id, file, function, line
    );
    write_args(&buf[pos..], out);
    out.push(b'\n');
}

/// Decode argument entries tag by tag. An unrecognized tag makes the rest of
/// the buffer undecodable, so the remaining arguments are skipped; the line
/// is still terminated by the caller.
fn write_args(buf: &[u8], out: &mut Vec<u8>) {
    let mut pos = 0;
    while pos < buf.len() {
        let tag = buf[pos];
        pos += 1;
        match tag {
            TAG_CHAR => {
                let value = u32::from_ne_bytes(read_array(buf, &mut pos));
                let decoded = char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER);
                let _ = write!(out, "{}", decoded);
            }
            TAG_U32 => {
                let _ = write!(out, "{}", u32::from_ne_bytes(read_array(buf, &mut pos)));
            }
            TAG_U64 => {
                let _ = write!(out, "{}", u64::from_ne_bytes(read_array(buf, &mut pos)));
            }
            TAG_I32 => {
                let _ = write!(out, "{}", i32::from_ne_bytes(read_array(buf, &mut pos)));
            }
            TAG_I64 => {
                let _ = write!(out, "{}", i64::from_ne_bytes(read_array(buf, &mut pos)));
            }
            TAG_F64 => {
                let _ = write!(out, "{}", f64::from_ne_bytes(read_array(buf, &mut pos)));
            }
            TAG_STR_LITERAL => {
                out.extend_from_slice(read_str_ref(buf, &mut pos).as_bytes());
            }
            TAG_STR_OWNED => {
                let rest = &buf[pos..];
                match rest.iter().position(|&b| b == 0) {
                    Some(end) => {
                        out.extend_from_slice(&rest[..end]);
                        pos += end + 1;
                    }
                    None => {
                        out.extend_from_slice(rest);
                        pos = buf.len();
                    }
                }
            }
            _ => return,
        }
    }
}

fn read_array<const N: usize>(buf: &[u8], pos: &mut usize) -> [u8; N] {
    let mut bytes = [0u8; N];
    bytes.copy_from_slice(&buf[*pos..*pos + N]);
    *pos += N;
    bytes
}

fn read_str_ref(buf: &[u8], pos: &mut usize) -> &'static str {
    let ptr = usize::from_ne_bytes(read_array(buf, pos)) as *const u8;
    let len = usize::from_ne_bytes(read_array(buf, pos));
    // SAFETY: reference entries are only ever encoded from `&'static str`
    // values (the header fields and the literal `Loggable` impl), so the
    // pointer and length denote live, valid UTF-8 for the life of the
    // process.
    unsafe { std::str::from_utf8_unchecked(std::slice::from_raw_parts(ptr, len)) }
}
