/// An embedded texture: the encoded image bytes moved out of the source
/// asset, plus a short format hint derived from the image MIME type
/// (`"jpg"`, `"png"`, ...; empty when the type is unknown). The bytes
/// are not decoded; that is the consumer's business.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Texture {
    pub data: Vec<u8>,
    pub format_hint: String,
}

impl Texture {
    pub(crate) fn new(data: Vec<u8>, mime_type: Option<&str>) -> Self {
        Self {
            data,
            format_hint: mime_type.map(format_hint).unwrap_or_default(),
        }
    }
}

/// `image/jpeg` becomes `jpg`: the MIME subtype, truncated to at most
/// three bytes.
fn format_hint(mime_type: &str) -> String {
    let subtype = match mime_type.split_once('/') {
        Some((_, subtype)) => subtype,
        None => "",
    };
    let subtype = if subtype == "jpeg" { "jpg" } else { subtype };
    subtype.chars().take(3).collect()
}
