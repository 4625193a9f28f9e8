// [libs/infra/pair-agent/src/dechunk.rs]
//! HTTP/1.1 `Transfer-Encoding: chunked` decoding, reused over SSH to avoid
//! out-of-band termination ambiguity (spec §9: "chunked transport decoding").
//!
//! Each chunk is `<hex-size>\r\n<data>\r\n`, terminated by a zero-size chunk.
//! Trailers (if any) are discarded.

use crate::errors::PairAgentError;

pub fn dechunk(input: &[u8]) -> Result<Vec<u8>, PairAgentError> {
    let mut out = Vec::with_capacity(input.len());
    let mut cursor = input;

    loop {
        let line_end = find_crlf(cursor).ok_or_else(|| PairAgentError::ChunkDecode("missing chunk size line".into()))?;
        let size_line = std::str::from_utf8(&cursor[..line_end])
            .map_err(|e| PairAgentError::ChunkDecode(format!("non-utf8 chunk size: {e}")))?;
        let size_str = size_line.split(';').next().unwrap_or("").trim();
        let size = usize::from_str_radix(size_str, 16)
            .map_err(|e| PairAgentError::ChunkDecode(format!("invalid chunk size {size_str:?}: {e}")))?;

        cursor = &cursor[line_end + 2..];

        if size == 0 {
            return Ok(out);
        }

        if cursor.len() < size + 2 {
            return Err(PairAgentError::ChunkDecode("truncated chunk body".into()));
        }

        out.extend_from_slice(&cursor[..size]);
        cursor = &cursor[size + 2..];
    }
}

fn find_crlf(buf: &[u8]) -> Option<usize> {
    buf.windows(2).position(|w| w == b"\r\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_two_chunks_and_terminator() {
        let input = b"4\r\nWiki\r\n5\r\npedia\r\n0\r\n\r\n";
        assert_eq!(dechunk(input).unwrap(), b"Wikipedia");
    }

    #[test]
    fn decodes_empty_body() {
        assert_eq!(dechunk(b"0\r\n\r\n").unwrap(), b"");
    }

    #[test]
    fn rejects_truncated_chunk() {
        assert!(dechunk(b"a\r\nshort").is_err());
    }

    #[test]
    fn rejects_non_hex_size() {
        assert!(dechunk(b"zz\r\ndata\r\n0\r\n\r\n").is_err());
    }
}
