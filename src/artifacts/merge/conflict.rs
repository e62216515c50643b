use bytes::{BufMut, Bytes, BytesMut};

pub const OURS_MARKER: &str = "<<<<<<< HEAD";
pub const SEPARATOR: &str = "=======";
pub const THEIRS_MARKER: &str = ">>>>>>>";

/// Build the conflict block written in place of a file both sides changed differently
///
/// ```text
/// <<<<<<< HEAD
/// <ours>
/// =======
/// <theirs>
/// >>>>>>>
/// ```
///
/// Trailing newlines of each side are stripped before the side is placed on its own line.
/// A side that deleted the file contributes no body, but all three marker lines stay.
pub fn conflict_block(ours: Option<&[u8]>, theirs: Option<&[u8]>) -> Bytes {
    let mut block = BytesMut::new();

    push_line(&mut block, OURS_MARKER.as_bytes());
    if let Some(ours) = ours {
        push_line(&mut block, strip_trailing_newlines(ours));
    }
    push_line(&mut block, SEPARATOR.as_bytes());
    if let Some(theirs) = theirs {
        push_line(&mut block, strip_trailing_newlines(theirs));
    }
    push_line(&mut block, THEIRS_MARKER.as_bytes());

    block.freeze()
}

fn push_line(block: &mut BytesMut, line: &[u8]) {
    block.put_slice(line);
    block.put_u8(b'\n');
}

fn strip_trailing_newlines(content: &[u8]) -> &[u8] {
    let end = content
        .iter()
        .rposition(|byte| *byte != b'\n')
        .map_or(0, |last| last + 1);

    &content[..end]
}
