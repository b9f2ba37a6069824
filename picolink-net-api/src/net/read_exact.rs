//! The accumulation loop behind every `read_exact`.

use crate::error::{Error, ReadExactError};

/// What a zero-byte read means while filling a buffer.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum ZeroRead {
    /// The peer closed the stream; stop with [`ReadExactError::UnexpectedEof`].
    EndOfStream,
    /// An empty datagram arrived; keep reading.
    Skip,
}

/// Fills `buffer` completely by calling `read` on the unfilled tail until it is full.
///
/// Stops at the first failing `read` without retrying. The returned error carries how many
/// bytes at the front of `buffer` were filled. An empty `buffer` never calls `read`.
pub fn fill_exact<F>(
    buffer: &mut [u8],
    on_zero: ZeroRead,
    mut read: F,
) -> Result<(), ReadExactError>
where
    F: FnMut(&mut [u8]) -> Result<usize, Error>,
{
    let mut filled = 0;

    while filled < buffer.len() {
        match read(&mut buffer[filled..]) {
            Ok(0) if on_zero == ZeroRead::EndOfStream => {
                return Err(ReadExactError::UnexpectedEof { filled });
            }
            // A misbehaving reader must not push the cursor past the end.
            Ok(count) => filled += count.min(buffer.len() - filled),
            Err(source) => return Err(ReadExactError::Read { filled, source }),
        }
    }

    Ok(())
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::{ZeroRead, fill_exact};
    use crate::error::{Error, OsError, ReadExactError};
    use alloc::vec::Vec;
    use test_case::test_case;

    /// Serves `data` in chunks of the given sizes, then reports end of stream.
    struct Chunked<'a> {
        data: &'a [u8],
        chunks: core::slice::Iter<'a, usize>,
        calls: usize,
    }

    impl<'a> Chunked<'a> {
        fn new(data: &'a [u8], chunks: &'a [usize]) -> Self {
            Self {
                data,
                chunks: chunks.iter(),
                calls: 0,
            }
        }

        fn read(&mut self, buffer: &mut [u8]) -> Result<usize, Error> {
            self.calls += 1;
            let chunk = self.chunks.next().copied().unwrap_or(self.data.len());
            let read = chunk.min(buffer.len()).min(self.data.len());
            buffer[..read].copy_from_slice(&self.data[..read]);
            self.data = &self.data[read..];
            Ok(read)
        }
    }

    #[test_case(&[8]; "one chunk")]
    #[test_case(&[1, 1, 1, 1, 1, 1, 1, 1]; "single bytes")]
    #[test_case(&[3, 5]; "two chunks")]
    #[test_case(&[2, 1, 4, 1]; "uneven chunks")]
    #[test_case(&[6, 6]; "more available than requested")]
    fn fragmentation_is_invisible(chunks: &[usize]) {
        let data = b"PONGPONGtrailer";
        let mut reader = Chunked::new(data, chunks);
        let mut buffer = [0u8; 8];

        fill_exact(&mut buffer, ZeroRead::EndOfStream, |buffer| reader.read(buffer)).unwrap();

        assert_eq!(&buffer, b"PONGPONG");
    }

    #[test]
    fn error_is_returned_immediately_with_progress() {
        let mut calls = 0;
        let mut buffer = [0u8; 8];

        let result = fill_exact(&mut buffer, ZeroRead::EndOfStream, |buffer| {
            calls += 1;
            if calls == 1 {
                buffer[..3].copy_from_slice(b"abc");
                Ok(3)
            } else {
                Err(Error::ConnectionReset)
            }
        });

        assert_eq!(
            result,
            Err(ReadExactError::Read {
                filled: 3,
                source: Error::ConnectionReset
            })
        );
        assert_eq!(calls, 2);
        assert_eq!(&buffer[..3], b"abc");
    }

    #[test]
    fn end_of_stream_stops_the_loop() {
        let mut reader = Chunked::new(b"ab", &[1, 1]);
        let mut buffer = [0u8; 4];

        let result = fill_exact(&mut buffer, ZeroRead::EndOfStream, |buffer| reader.read(buffer));

        assert_eq!(result, Err(ReadExactError::UnexpectedEof { filled: 2 }));
        assert_eq!(reader.calls, 3);
    }

    #[test]
    fn empty_datagrams_are_skipped() {
        let mut datagrams: Vec<&[u8]> = alloc::vec![&b"ab"[..], &b""[..], &b"cd"[..]];
        datagrams.reverse();
        let mut buffer = [0u8; 4];

        fill_exact(&mut buffer, ZeroRead::Skip, |buffer| {
            let datagram = datagrams.pop().ok_or(Error::TimedOut)?;
            buffer[..datagram.len()].copy_from_slice(datagram);
            Ok(datagram.len())
        })
        .unwrap();

        assert_eq!(&buffer, b"abcd");
    }

    #[test]
    fn empty_buffer_does_not_read() {
        let result = fill_exact(&mut [], ZeroRead::EndOfStream, |_| {
            Err(Error::Other(OsError::unknown()))
        });
        assert_eq!(result, Ok(()));
    }
}
