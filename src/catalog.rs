//! Star catalog records and the streaming reader.
//!
//! Catalog lines are whitespace-delimited text of the form
//! `x y z <ignored> magnitude`, with any trailing fields ignored. The
//! reader pulls lines lazily from any [`BufRead`] source, decodes them
//! with an explicitly configured [`Encoding`], and optionally pipes the
//! positional and magnitude fields of every record through a
//! caller-supplied [`FieldTransform`] before yielding a [`Star`].

use std::fmt;
use std::io::BufRead;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::coords::TransformError;

/// The positional and magnitude fields of one record: `(x, y, z, magnitude)`.
pub type RecordFields = (f64, f64, f64, f64);

/// One parsed catalog entry: a 3D position and a brightness magnitude.
///
/// Lower magnitude denotes a brighter object. The z coordinate is
/// frequently zero in 2D contexts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Star {
    pub coordinates: (f64, f64, f64),
    pub magnitude: f64,
}

impl Star {
    pub fn new(coordinates: (f64, f64, f64), magnitude: f64) -> Self {
        Self {
            coordinates,
            magnitude,
        }
    }
}

/// Text encoding used to decode raw catalog bytes.
///
/// Passed explicitly to [`StarReader::with_encoding`]; there is no
/// process-wide default encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Encoding {
    /// UTF-8, the default.
    #[default]
    Utf8,
    /// ISO-8859-1. Every byte maps directly to the code point of the
    /// same value, so decoding cannot fail.
    Latin1,
}

impl Encoding {
    fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            Encoding::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_owned),
            Encoding::Latin1 => Some(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::Utf8 => write!(f, "UTF-8"),
            Encoding::Latin1 => write!(f, "ISO-8859-1"),
        }
    }
}

impl FromStr for Encoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(Encoding::Utf8),
            "latin-1" | "latin1" | "iso-8859-1" => Ok(Encoding::Latin1),
            other => Err(format!(
                "unsupported encoding {other:?} (expected utf-8 or latin-1)"
            )),
        }
    }
}

/// Error type for catalog reading.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    /// The underlying line source failed.
    #[error("failed to read catalog line {line}: {source}")]
    Io {
        line: usize,
        #[source]
        source: std::io::Error,
    },

    /// A line could not be decoded with the configured encoding.
    #[error("catalog line {line} is not valid {encoding}")]
    Decode { line: usize, encoding: Encoding },

    /// A line did not contain five parseable numeric fields.
    #[error("malformed record at line {line}: {reason} in {record:?}")]
    MalformedRecord {
        line: usize,
        record: String,
        reason: String,
    },

    /// The caller-supplied field transform rejected the record.
    #[error("record at line {line} could not be transformed")]
    Transform {
        line: usize,
        #[source]
        source: TransformError,
    },
}

/// Per-record hook applied to `(x, y, z, magnitude)` before a [`Star`]
/// is constructed.
///
/// Implemented for any compatible `Fn`, so a closure binding a
/// [`LinearCoordinateSystemTransform`](crate::coords::LinearCoordinateSystemTransform)
/// works directly. The reader does not inspect the output beyond its
/// shape; a rejection surfaces unchanged as [`ReadError::Transform`].
pub trait FieldTransform {
    fn apply(&self, fields: RecordFields) -> Result<RecordFields, TransformError>;
}

impl<F> FieldTransform for F
where
    F: Fn(RecordFields) -> Result<RecordFields, TransformError>,
{
    fn apply(&self, fields: RecordFields) -> Result<RecordFields, TransformError> {
        self(fields)
    }
}

/// Streaming reader for whitespace-delimited star catalog lines.
///
/// Wraps any [`BufRead`] line source and yields records lazily in a
/// single, non-restartable pass; the catalog is never buffered as a
/// whole. Closing the underlying source remains the responsibility of
/// whoever opened it.
///
/// # Example
///
/// ```
/// use starcat::catalog::StarReader;
///
/// let data = "0.994772 0.023164 -0.099456 28 4.61\n";
/// let reader = StarReader::new(data.as_bytes());
/// for star in reader.read() {
///     println!("{:?}", star?);
/// }
/// # Ok::<(), starcat::catalog::ReadError>(())
/// ```
#[derive(Debug)]
pub struct StarReader<R> {
    source: R,
    encoding: Encoding,
}

impl<R: BufRead> StarReader<R> {
    /// Create a reader that decodes lines as UTF-8.
    pub fn new(source: R) -> Self {
        Self::with_encoding(source, Encoding::default())
    }

    /// Create a reader with an explicit line encoding.
    pub fn with_encoding(source: R, encoding: Encoding) -> Self {
        Self { source, encoding }
    }

    /// Iterate over the catalog records as parsed.
    pub fn read(self) -> Records<R, fn(RecordFields) -> Result<RecordFields, TransformError>> {
        Records {
            source: self.source,
            encoding: self.encoding,
            transform: None,
            line: 0,
        }
    }

    /// Iterate over the catalog records, piping each one through
    /// `transform` before it is yielded.
    pub fn read_with<T: FieldTransform>(self, transform: T) -> Records<R, T> {
        Records {
            source: self.source,
            encoding: self.encoding,
            transform: Some(transform),
            line: 0,
        }
    }
}

/// Lazy record iterator returned by [`StarReader::read`] and
/// [`StarReader::read_with`].
///
/// Each `next` call reads exactly one line from the source; stopping
/// iteration early simply leaves the rest of the source unread.
#[derive(Debug)]
pub struct Records<R, T> {
    source: R,
    encoding: Encoding,
    transform: Option<T>,
    line: usize,
}

impl<R: BufRead, T: FieldTransform> Records<R, T> {
    fn parse_line(&self, raw: &[u8]) -> Result<Star, ReadError> {
        let text = self.encoding.decode(raw).ok_or(ReadError::Decode {
            line: self.line,
            encoding: self.encoding,
        })?;
        let trimmed = text.trim();

        // Single-space delimiters; runs of spaces produce empty fields
        // which fail the numeric parse below.
        let fields: Vec<&str> = trimmed.split(' ').collect();
        if fields.len() < 5 {
            return Err(ReadError::MalformedRecord {
                line: self.line,
                record: trimmed.to_owned(),
                reason: format!("expected at least 5 fields, found {}", fields.len()),
            });
        }

        let mut values = [0.0f64; 5];
        for (value, field) in values.iter_mut().zip(&fields) {
            *value = field.parse().map_err(|_| ReadError::MalformedRecord {
                line: self.line,
                record: trimmed.to_owned(),
                reason: format!("{field:?} is not a number"),
            })?;
        }

        let [x, y, z, _, magnitude] = values;
        let (x, y, z, magnitude) = match &self.transform {
            Some(transform) => {
                transform
                    .apply((x, y, z, magnitude))
                    .map_err(|source| ReadError::Transform {
                        line: self.line,
                        source,
                    })?
            }
            None => (x, y, z, magnitude),
        };

        Ok(Star::new((x, y, z), magnitude))
    }
}

impl<R: BufRead, T: FieldTransform> Iterator for Records<R, T> {
    type Item = Result<Star, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut raw = Vec::new();
        self.line += 1;
        match self.source.read_until(b'\n', &mut raw) {
            Ok(0) => None,
            Ok(_) => Some(self.parse_line(&raw)),
            Err(source) => Some(Err(ReadError::Io {
                line: self.line,
                source,
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{CoordinateSystem, LinearCoordinateSystemTransform};

    fn read_all(data: &[u8]) -> Vec<Result<Star, ReadError>> {
        StarReader::new(data).read().collect()
    }

    #[test]
    fn test_can_read_star() {
        let stars = read_all(b"0.994772 0.023164 -0.099456 28 4.61 3");

        assert_eq!(stars.len(), 1);
        let star = stars[0].as_ref().unwrap();
        assert_eq!(star.coordinates, (0.994772, 0.023164, -0.099456));
        assert_eq!(star.magnitude, 4.61);
    }

    #[test]
    fn test_reads_byte_lines() {
        let stars = read_all(b"1 2 3 4 5\n11 12 13 14 15\n");

        assert_eq!(stars.len(), 2);
        assert_eq!(
            *stars[0].as_ref().unwrap(),
            Star::new((1.0, 2.0, 3.0), 5.0)
        );
        assert_eq!(
            *stars[1].as_ref().unwrap(),
            Star::new((11.0, 12.0, 13.0), 15.0)
        );
    }

    #[test]
    fn test_fourth_field_is_ignored() {
        let stars = read_all(b"1 2 3 999 5\n");
        assert_eq!(*stars[0].as_ref().unwrap(), Star::new((1.0, 2.0, 3.0), 5.0));
    }

    #[test]
    fn test_read_with_transform() {
        let reader = StarReader::new(&b"0 0 0 1 3 5"[..]);
        let stars: Vec<_> = reader
            .read_with(
                |(x, y, z, magnitude): RecordFields| -> Result<RecordFields, TransformError> {
                    Ok((x + 1.0, y + 1.0, z + 1.0, magnitude + 1.0))
                },
            )
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(stars, vec![Star::new((1.0, 1.0, 1.0), 4.0)]);
    }

    #[test]
    fn test_read_with_coordinate_transform_closure() {
        let source = CoordinateSystem::new((-1.0, 1.0), (-1.0, 1.0));
        let target = CoordinateSystem::new((0.0, 1000.0), (0.0, 1000.0));
        let transform = LinearCoordinateSystemTransform::new(&source, &target);

        let reader = StarReader::new(&b"0.5 0.5 0 28 4.61\n"[..]);
        let stars: Vec<_> = reader
            .read_with(
                |(x, y, z, magnitude): RecordFields| -> Result<RecordFields, TransformError> {
                    let (x, y) = transform.transform((x, y))?;
                    Ok((x, y, z, magnitude))
                },
            )
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(stars, vec![Star::new((750.0, 250.0, 0.0), 4.61)]);
    }

    #[test]
    fn test_transform_rejection_surfaces() {
        let source = CoordinateSystem::new((-1.0, 1.0), (-1.0, 1.0));
        let target = CoordinateSystem::new((0.0, 1000.0), (0.0, 1000.0));
        let transform = LinearCoordinateSystemTransform::new(&source, &target);

        let reader = StarReader::new(&b"0 0 0 28 4.61\n2.5 0 0 28 4.61\n"[..]);
        let mut records = reader.read_with(
            |(x, y, z, magnitude): RecordFields| -> Result<RecordFields, TransformError> {
                let (x, y) = transform.transform((x, y))?;
                Ok((x, y, z, magnitude))
            },
        );

        assert!(records.next().unwrap().is_ok());
        let err = records.next().unwrap().unwrap_err();
        assert!(matches!(err, ReadError::Transform { line: 2, .. }));
    }

    #[test]
    fn test_too_few_fields_is_malformed() {
        let stars = read_all(b"1 2 3\n");
        assert!(matches!(
            stars[0].as_ref().unwrap_err(),
            ReadError::MalformedRecord { line: 1, .. }
        ));
    }

    #[test]
    fn test_non_numeric_field_is_malformed() {
        let stars = read_all(b"1 2 three 4 5\n");
        let err = stars[0].as_ref().unwrap_err();
        assert!(err.to_string().contains("\"three\" is not a number"));
    }

    #[test]
    fn test_runs_of_spaces_are_malformed() {
        // Fields are separated by single spaces; a double space yields an
        // empty field, which is not a number.
        let stars = read_all(b"1  2 3 4 5\n");
        assert!(matches!(
            stars[0].as_ref().unwrap_err(),
            ReadError::MalformedRecord { .. }
        ));
    }

    #[test]
    fn test_latin1_decodes_what_utf8_rejects() {
        // 0xE9 in a trailing ignored field is invalid UTF-8 but valid
        // ISO-8859-1.
        let data: &[u8] = b"1 2 3 4 5 \xe9\n";

        let stars = read_all(data);
        assert!(matches!(
            stars[0].as_ref().unwrap_err(),
            ReadError::Decode { line: 1, .. }
        ));

        let stars: Vec<_> = StarReader::with_encoding(data, Encoding::Latin1)
            .read()
            .collect();
        assert_eq!(*stars[0].as_ref().unwrap(), Star::new((1.0, 2.0, 3.0), 5.0));
    }

    #[test]
    fn test_crlf_lines_are_trimmed() {
        let stars = read_all(b"1 2 3 4 5\r\n");
        assert_eq!(*stars[0].as_ref().unwrap(), Star::new((1.0, 2.0, 3.0), 5.0));
    }

    #[test]
    fn test_encoding_from_str() {
        assert_eq!("utf-8".parse::<Encoding>().unwrap(), Encoding::Utf8);
        assert_eq!("Latin-1".parse::<Encoding>().unwrap(), Encoding::Latin1);
        assert_eq!("iso-8859-1".parse::<Encoding>().unwrap(), Encoding::Latin1);
        assert!("utf-16".parse::<Encoding>().is_err());
    }
}
