//! Model summary derived from the version marker, the model-info record and
//! member sizes.

use std::io::{Read, Seek};
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::stats::SizeBreakdown;
use crate::{FILEVERSION_MEMBER, MODEL_INFO_MEMBER};

use super::Container;

/// Placeholder for a title or description the record does not declare.
pub const NOT_AVAILABLE: &str = "N/A";

const MIB: f64 = 1024.0 * 1024.0;

/// Summary of a container. Derived on demand, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelInfo {
    /// Contents of the `fileversion` member, trimmed.
    pub version: String,
    /// `title` attribute of the model-info record.
    pub title: String,
    /// `description` attribute of the model-info record.
    pub description: String,
    /// Number of members.
    pub member_count: u32,
    /// Sum of all member sizes.
    pub total_bytes: u64,
    /// Sum of configuration, metadata and text-data members.
    pub text_bytes: u64,
    /// Sum of simulation-data members.
    pub binary_bytes: u64,
}

impl ModelInfo {
    /// Total size in mebibytes.
    pub fn total_mib(&self) -> f64 {
        self.total_bytes as f64 / MIB
    }

    /// Text subtotal in mebibytes.
    pub fn text_mib(&self) -> f64 {
        self.text_bytes as f64 / MIB
    }

    /// Binary subtotal in mebibytes.
    pub fn binary_mib(&self) -> f64 {
        self.binary_bytes as f64 / MIB
    }

    /// Share of text members in percent (0 for an empty container).
    pub fn text_percent(&self) -> f64 {
        percent(self.text_bytes, self.total_bytes)
    }

    /// Share of simulation-data members in percent (0 for an empty container).
    pub fn binary_percent(&self) -> f64 {
        percent(self.binary_bytes, self.total_bytes)
    }
}

fn percent(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

/// Reads the summary of the container at `path`.
///
/// This is a soft-failing operation: `None` means the summary is unavailable
/// (unreadable container, missing or malformed `fileversion` /
/// `modelinfo.xml`), not that the container is unusable.
pub fn extract_info(path: impl AsRef<Path>) -> Option<ModelInfo> {
    let path = path.as_ref();
    match Container::open(path) {
        Ok(mut container) => container.info(),
        Err(e) => {
            log::debug!("no model info for '{}': {}", path.display(), e);
            None
        }
    }
}

pub(super) fn from_container<R: Read + Seek>(container: &mut Container<R>) -> Option<ModelInfo> {
    let version = match container.read_member(FILEVERSION_MEMBER) {
        Ok(Some(bytes)) => decode_version(&bytes),
        Ok(None) => {
            log::debug!("no model info: '{}' member missing", FILEVERSION_MEMBER);
            return None;
        }
        Err(e) => {
            log::debug!("no model info: {}", e);
            return None;
        }
    };

    let record = match container.read_member_text(MODEL_INFO_MEMBER) {
        Ok(Some(text)) => text,
        Ok(None) => {
            log::debug!("no model info: '{}' member missing", MODEL_INFO_MEMBER);
            return None;
        }
        Err(e) => {
            log::debug!("no model info: {}", e);
            return None;
        }
    };

    let (title, description) = match parse_record(&record) {
        Ok(Some(fields)) => fields,
        Ok(None) => {
            log::debug!("no model info: '{}' has no root element", MODEL_INFO_MEMBER);
            return None;
        }
        Err(e) => {
            log::debug!("no model info: malformed '{}': {}", MODEL_INFO_MEMBER, e);
            return None;
        }
    };

    let members = match container.members() {
        Ok(members) => members,
        Err(e) => {
            log::debug!("no model info: {}", e);
            return None;
        }
    };
    let breakdown = SizeBreakdown::from_members(&members);

    Some(ModelInfo {
        version,
        title,
        description,
        member_count: u32::try_from(members.len()).unwrap_or(u32::MAX),
        total_bytes: breakdown.total_bytes(),
        text_bytes: breakdown.text_bytes(),
        binary_bytes: breakdown.binary_bytes(),
    })
}

/// Decodes the version marker, dropping invalid UTF-8 sequences.
fn decode_version(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .replace(char::REPLACEMENT_CHARACTER, "")
        .trim()
        .to_string()
}

/// Reads `title` and `description` from the root element of the record.
///
/// The whole document is parsed so that a truncated or otherwise broken
/// record is reported as malformed.
fn parse_record(xml: &str) -> Result<Option<(String, String)>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut fields = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if fields.is_none() => {
                let mut title = None;
                let mut description = None;
                for attr in e.attributes() {
                    let attr = attr?;
                    match attr.key.as_ref() {
                        b"title" => title = Some(attr.unescape_value()?.into_owned()),
                        b"description" => {
                            description = Some(attr.unescape_value()?.into_owned())
                        }
                        _ => {}
                    }
                }
                fields = Some((
                    title.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
                    description.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
                ));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(fields)
}
