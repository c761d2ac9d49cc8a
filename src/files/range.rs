use crate::files::error::FsError;

/// A satisfiable byte range, inclusive on both ends.
///
/// Only constructed by [`RangeSpec::parse`], which guarantees
/// `start <= end < file_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeSpec {
    pub start: u64,
    pub end: u64,
}

impl RangeSpec {
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// Parses a `bytes=<start>-<end>` range expression against a file of
    /// `file_size` bytes.
    ///
    /// Supported forms: `bytes=0-99`, `bytes=100-` (to end of file) and
    /// `bytes=-50` (last 50 bytes). `end` past the file is clamped to the
    /// last byte. Errors:
    ///
    /// - `RangeMalformed` for anything that does not parse, including
    ///   multi-range expressions; callers recover by serving full content.
    /// - `RangeNotSatisfiable` when `start` lies at or past end of file.
    pub fn parse(header: &str, file_size: u64) -> Result<RangeSpec, FsError> {
        let Some(ranges) = header.strip_prefix("bytes=") else {
            return Err(FsError::RangeMalformed);
        };
        // Multi-range is unsupported; degrade like any malformed header.
        if ranges.contains(',') {
            return Err(FsError::RangeMalformed);
        }

        let mut parts = ranges.splitn(2, '-');
        let start_part = parts.next().unwrap_or_default().trim();
        let end_part = match parts.next() {
            Some(end) => end.trim(),
            None => return Err(FsError::RangeMalformed),
        };

        let (start, end) = if start_part.is_empty() {
            // Suffix form: the last N bytes.
            let suffix: u64 = end_part.parse().map_err(|_| FsError::RangeMalformed)?;
            if suffix == 0 {
                return Err(FsError::RangeMalformed);
            }
            (
                file_size.saturating_sub(suffix),
                file_size.saturating_sub(1),
            )
        } else {
            let start: u64 = start_part.parse().map_err(|_| FsError::RangeMalformed)?;
            let end = if end_part.is_empty() {
                file_size.saturating_sub(1)
            } else {
                end_part.parse().map_err(|_| FsError::RangeMalformed)?
            };
            if start > end {
                return Err(FsError::RangeMalformed);
            }
            (start, end)
        };

        if start >= file_size {
            return Err(FsError::RangeNotSatisfiable { file_size });
        }

        Ok(RangeSpec {
            start,
            end: end.min(file_size - 1),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(header: &str, size: u64) -> Result<RangeSpec, FsError> {
        RangeSpec::parse(header, size)
    }

    #[test]
    fn plain_range() {
        let spec = parse("bytes=0-99", 1000).unwrap();
        assert_eq!(spec, RangeSpec { start: 0, end: 99 });
        assert_eq!(spec.len(), 100);
    }

    #[test]
    fn open_ended_range_runs_to_eof() {
        let spec = parse("bytes=900-", 1000).unwrap();
        assert_eq!(spec, RangeSpec { start: 900, end: 999 });
    }

    #[test]
    fn suffix_range_takes_last_bytes() {
        let spec = parse("bytes=-50", 1000).unwrap();
        assert_eq!(spec, RangeSpec { start: 950, end: 999 });

        // Suffix longer than the file means the whole file.
        let spec = parse("bytes=-5000", 1000).unwrap();
        assert_eq!(spec, RangeSpec { start: 0, end: 999 });
    }

    #[test]
    fn end_is_clamped_to_last_byte() {
        let spec = parse("bytes=500-999999", 1000).unwrap();
        assert_eq!(spec, RangeSpec { start: 500, end: 999 });
    }

    #[test]
    fn start_at_or_past_eof_is_unsatisfiable() {
        assert!(matches!(
            parse("bytes=1000-1050", 1000),
            Err(FsError::RangeNotSatisfiable { file_size: 1000 })
        ));
        assert!(matches!(
            parse("bytes=0-", 0),
            Err(FsError::RangeNotSatisfiable { file_size: 0 })
        ));
        assert!(matches!(
            parse("bytes=-10", 0),
            Err(FsError::RangeNotSatisfiable { file_size: 0 })
        ));
    }

    #[test]
    fn malformed_expressions() {
        for header in [
            "bites=0-99",
            "bytes=",
            "bytes=-",
            "bytes=abc-def",
            "bytes=99",
            "bytes=-0",
            "bytes=50-10",
            "bytes=0-99,200-299",
        ] {
            assert!(
                matches!(parse(header, 1000), Err(FsError::RangeMalformed)),
                "expected malformed: {header}"
            );
        }
    }
}
