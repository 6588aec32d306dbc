//! Parse an S3 `ListBucketResult` document into version entries.

use chrono::{DateTime, Utc};
use roxmltree::{Document, Node};

use super::VersionEntry;
use crate::error::ParseError;

/// Namespace of the S3 bucket listing schema.
pub const S3_NAMESPACE: &str = "http://s3.amazonaws.com/doc/2006-03-01/";

const FILE_PREFIX: &str = "shopper-";
const FILE_SUFFIX: &str = ".apk";

/// Derive the version string from an object key.
///
/// `builds/shopper-1.2.3.apk` becomes `1.2.3`. The directory part is dropped,
/// then the `shopper-` prefix and `.apk` suffix are removed when present.
pub fn derive_version(object_key: &str) -> String {
    let name = object_key.rsplit('/').next().unwrap_or(object_key);
    let name = name.strip_prefix(FILE_PREFIX).unwrap_or(name);
    let name = name.strip_suffix(FILE_SUFFIX).unwrap_or(name);
    name.to_string()
}

/// Parse the raw listing body. Entries keep document order.
///
/// Any `Contents` element lacking `Key`, `Size` or `LastModified` fails the
/// whole document; no partial list is returned.
pub fn parse_listing(raw: &[u8]) -> Result<Vec<VersionEntry>, ParseError> {
    let text = std::str::from_utf8(raw)?;
    let doc = Document::parse(text)?;
    let root = doc.root_element();
    if !root.has_tag_name((S3_NAMESPACE, "ListBucketResult")) {
        return Err(ParseError::UnexpectedRoot(
            root.tag_name().name().to_string(),
        ));
    }

    root.children()
        .filter(|n| n.has_tag_name((S3_NAMESPACE, "Contents")))
        .enumerate()
        .map(|(entry_index, node)| parse_entry(entry_index, node))
        .collect()
}

fn parse_entry(entry_index: usize, node: Node<'_, '_>) -> Result<VersionEntry, ParseError> {
    let object_key = required_text(entry_index, node, "Key")?;
    let size_text = required_text(entry_index, node, "Size")?;
    let modified_text = required_text(entry_index, node, "LastModified")?;

    let size_bytes = size_text
        .trim()
        .parse::<u64>()
        .map_err(|_| ParseError::InvalidField {
            entry_index,
            field: "Size",
            value: size_text.to_string(),
        })?;
    let last_modified = DateTime::parse_from_rfc3339(modified_text.trim())
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| ParseError::InvalidField {
            entry_index,
            field: "LastModified",
            value: modified_text.to_string(),
        })?;

    Ok(VersionEntry {
        version: derive_version(object_key),
        object_key: object_key.to_string(),
        last_modified,
        size_bytes,
    })
}

/// Text of the first namespaced child named `field`. An empty element counts as missing.
fn required_text<'a>(
    entry_index: usize,
    node: Node<'a, '_>,
    field: &'static str,
) -> Result<&'a str, ParseError> {
    node.children()
        .find(|c| c.has_tag_name((S3_NAMESPACE, field)))
        .and_then(|c| c.text())
        .filter(|t| !t.trim().is_empty())
        .ok_or(ParseError::MissingField { entry_index, field })
}
