//! URI resolution for buffer and image references.

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
    io,
    path::Path,
};

use base64::{engine::general_purpose::STANDARD, Engine};

use crate::{error::ImportError, loader::IoSystem};

#[derive(Debug)]
pub enum SchemeError {
    Unsupported,
    BadDataUri,
}

impl Display for SchemeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SchemeError::Unsupported => write!(f, "Unsupported scheme"),
            SchemeError::BadDataUri => write!(f, "Bad data URI"),
        }
    }
}

impl Error for SchemeError {}

/// A reference URI, classified far enough to read bytes from it. Only
/// data URIs and plain or `file:` paths make sense inside an asset;
/// anything else (http and friends) is rejected.
pub(crate) enum Scheme<'a> {
    /// RFC 2397 data URI with optional MIME type; the payload is
    /// decoded eagerly.
    Data(Option<&'a str>, Vec<u8>),
    /// Path relative to the asset.
    Relative(&'a str),
    /// `file:` URI.
    Absolute(&'a str),
}

impl<'a> Scheme<'a> {
    pub(crate) fn parse(uri: &'a str) -> Result<Self, SchemeError> {
        if let Some(rest) = strip_prefix_ignore_case(uri, "data:") {
            let Some((param, value)) = rest.split_once(',') else {
                return Err(SchemeError::BadDataUri);
            };
            return if let Some((mime, encoding)) = param.split_once(';') {
                if encoding.eq_ignore_ascii_case("base64") {
                    let data = STANDARD.decode(value).map_err(|_| SchemeError::BadDataUri)?;
                    Ok(Scheme::Data(Some(mime), data))
                } else {
                    Err(SchemeError::BadDataUri)
                }
            } else {
                // Unencoded payload. The default MIME (text/plain) is
                // meaningless for asset data, so none is reported.
                Ok(Scheme::Data(None, value.as_bytes().to_vec()))
            };
        }
        if let Some(path) = strip_prefix_ignore_case(uri, "file://") {
            Ok(Scheme::Absolute(path))
        } else if let Some(path) = strip_prefix_ignore_case(uri, "file:") {
            Ok(Scheme::Absolute(path))
        } else if uri.contains(':') {
            Err(SchemeError::Unsupported)
        } else {
            Ok(Scheme::Relative(uri))
        }
    }

    pub(crate) fn read<I: IoSystem>(
        self,
        base: Option<&Path>,
        io: &mut I,
    ) -> Result<Vec<u8>, ImportError> {
        match self {
            Scheme::Data(_, data) => Ok(data),
            Scheme::Relative(uri) => {
                let path = match base {
                    Some(base) => base.join(uri),
                    None => Path::new(uri).to_path_buf(),
                };
                read_file(io, &path, uri)
            }
            Scheme::Absolute(path) => read_file(io, Path::new(path), path),
        }
    }
}

fn read_file<I: IoSystem>(io: &mut I, path: &Path, uri: &str) -> Result<Vec<u8>, ImportError> {
    io.read(path).map_err(|error| {
        if error.kind() == io::ErrorKind::NotFound {
            ImportError::ResourceNotFound(uri.to_string())
        } else {
            ImportError::Io(error)
        }
    })
}

fn strip_prefix_ignore_case<'a>(value: &'a str, prefix: &str) -> Option<&'a str> {
    let head = value.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&value[prefix.len()..])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_uri_decodes_base64() {
        let Ok(Scheme::Data(mime, data)) =
            Scheme::parse("data:application/octet-stream;base64,AAECAw==")
        else {
            panic!("expected a data scheme");
        };
        assert_eq!(mime, Some("application/octet-stream"));
        assert_eq!(data, [0, 1, 2, 3]);
    }

    #[test]
    fn plain_paths_are_relative() {
        assert!(matches!(
            Scheme::parse("buffers/mesh.bin"),
            Ok(Scheme::Relative("buffers/mesh.bin"))
        ));
    }

    #[test]
    fn foreign_schemes_are_rejected() {
        assert!(matches!(
            Scheme::parse("https://example.com/mesh.bin"),
            Err(SchemeError::Unsupported)
        ));
    }
}
