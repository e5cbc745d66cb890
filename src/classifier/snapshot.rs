//! Persistence codec: converts a [`Model`] to and from a plain snapshot.
//!
//! A [`ModelSnapshot`] is the structurally plain form of a model: the class
//! table as an ordered mapping, the vocabulary as a sorted list, and the
//! document total. Its JSON form looks like:
//!
//! ```json
//! {
//!   "classes": {
//!     "theist": { "documentCount": 2, "tokenCounts": { "god": 1, "is": 1 } }
//!   },
//!   "vocabulary": ["god", "is"],
//!   "totalDocuments": 2
//! }
//! ```
//!
//! For storage the snapshot is wrapped in a small binary frame:
//!
//! ```text
//! magic "SIEV" | version u16 | format u8 | crc32 u32 | length u64 | payload
//! ```
//!
//! All integers are little-endian; the checksum covers the payload only.

use std::collections::{BTreeMap, HashSet};
use std::io::{Cursor, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use serde::{Deserialize, Serialize};

use crate::classifier::model::{ClassStats, Model};
use crate::error::{Result, SieveError};

/// Frame magic bytes.
pub const SNAPSHOT_MAGIC: &[u8; 4] = b"SIEV";

/// Current frame version.
pub const SNAPSHOT_VERSION: u16 = 1;

const HEADER_LEN: usize = 4 + 2 + 1 + 4 + 8;

/// Payload encoding of a framed snapshot.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotFormat {
    /// Human-readable JSON.
    #[default]
    Json,
    /// Compact bincode.
    Binary,
}

impl SnapshotFormat {
    fn tag(self) -> u8 {
        match self {
            SnapshotFormat::Json => 0,
            SnapshotFormat::Binary => 1,
        }
    }

    fn from_tag(tag: u8) -> Result<Self> {
        match tag {
            0 => Ok(SnapshotFormat::Json),
            1 => Ok(SnapshotFormat::Binary),
            other => Err(SieveError::decode(format!(
                "unknown snapshot format tag {other}"
            ))),
        }
    }
}

impl std::fmt::Display for SnapshotFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotFormat::Json => write!(f, "json"),
            SnapshotFormat::Binary => write!(f, "binary"),
        }
    }
}

/// Persisted counts of one label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSnapshot {
    /// Documents trained under the label.
    pub document_count: u64,
    /// Token occurrences under the label.
    pub token_counts: BTreeMap<String, u64>,
}

/// Plain, serializable form of a [`Model`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelSnapshot {
    /// Label → counts, in label order.
    #[serde(with = "ordered_classes")]
    pub classes: Vec<(String, ClassSnapshot)>,
    /// Every distinct token, sorted.
    pub vocabulary: Vec<String>,
    /// Documents across all labels.
    pub total_documents: u64,
}

impl ModelSnapshot {
    /// Serialize to compact JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize to indented JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a snapshot from JSON.
    ///
    /// This only checks the shape of the document; [`Model::from_snapshot`]
    /// checks the counts.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| SieveError::decode(format!("invalid snapshot JSON: {e}")))
    }

    /// Encode the payload and wrap it in a checksummed frame.
    pub fn encode(&self, format: SnapshotFormat) -> Result<Vec<u8>> {
        let payload = match format {
            SnapshotFormat::Json => serde_json::to_vec(self)?,
            SnapshotFormat::Binary => bincode::serialize(self)
                .map_err(|e| SieveError::other(format!("failed to encode snapshot: {e}")))?,
        };

        let mut frame = Vec::with_capacity(HEADER_LEN + payload.len());
        frame.write_all(SNAPSHOT_MAGIC)?;
        frame.write_u16::<LittleEndian>(SNAPSHOT_VERSION)?;
        frame.write_u8(format.tag())?;
        frame.write_u32::<LittleEndian>(crc32fast::hash(&payload))?;
        frame.write_u64::<LittleEndian>(payload.len() as u64)?;
        frame.write_all(&payload)?;

        Ok(frame)
    }

    /// Unwrap and decode a framed snapshot produced by [`ModelSnapshot::encode`].
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Self::decode_with_format(bytes).map(|(snapshot, _)| snapshot)
    }

    /// Like [`ModelSnapshot::decode`], also returning the payload format
    /// recorded in the frame.
    pub fn decode_with_format(bytes: &[u8]) -> Result<(Self, SnapshotFormat)> {
        let (format, payload) = read_frame(bytes)?;
        let snapshot = match format {
            SnapshotFormat::Json => serde_json::from_slice(payload)
                .map_err(|e| SieveError::decode(format!("invalid snapshot JSON: {e}")))?,
            SnapshotFormat::Binary => bincode::deserialize(payload)
                .map_err(|e| SieveError::decode(format!("invalid binary snapshot: {e}")))?,
        };
        Ok((snapshot, format))
    }
}

fn truncated(e: std::io::Error) -> SieveError {
    SieveError::decode(format!("truncated snapshot header: {e}"))
}

fn read_frame(bytes: &[u8]) -> Result<(SnapshotFormat, &[u8])> {
    let mut cursor = Cursor::new(bytes);

    let mut magic = [0u8; 4];
    cursor.read_exact(&mut magic).map_err(truncated)?;
    if &magic != SNAPSHOT_MAGIC {
        return Err(SieveError::decode("not a sieve snapshot (bad magic)"));
    }

    let version = cursor.read_u16::<LittleEndian>().map_err(truncated)?;
    if version != SNAPSHOT_VERSION {
        return Err(SieveError::decode(format!(
            "unsupported snapshot version {version} (expected {SNAPSHOT_VERSION})"
        )));
    }

    let format = SnapshotFormat::from_tag(cursor.read_u8().map_err(truncated)?)?;
    let checksum = cursor.read_u32::<LittleEndian>().map_err(truncated)?;
    let length = cursor.read_u64::<LittleEndian>().map_err(truncated)?;

    let payload = &bytes[HEADER_LEN..];
    if payload.len() as u64 != length {
        return Err(SieveError::decode(format!(
            "snapshot payload is {} bytes, header says {length}",
            payload.len()
        )));
    }
    let actual = crc32fast::hash(payload);
    if actual != checksum {
        return Err(SieveError::decode(format!(
            "snapshot checksum mismatch: expected {checksum:08x}, got {actual:08x}"
        )));
    }

    Ok((format, payload))
}

impl Model {
    /// Capture this model as a plain snapshot.
    pub fn to_snapshot(&self) -> ModelSnapshot {
        let classes = self
            .classes()
            .map(|(label, stats)| {
                let token_counts = stats
                    .token_counts()
                    .iter()
                    .map(|(token, &count)| (token.clone(), count))
                    .collect();
                (
                    label.to_string(),
                    ClassSnapshot {
                        document_count: stats.document_count(),
                        token_counts,
                    },
                )
            })
            .collect();

        let mut vocabulary: Vec<String> = self.vocabulary().iter().cloned().collect();
        vocabulary.sort_unstable();

        ModelSnapshot {
            classes,
            vocabulary,
            total_documents: self.total_documents(),
        }
    }

    /// Rebuild a model from a snapshot, rejecting any snapshot whose counts
    /// break the model's invariants.
    pub fn from_snapshot(snapshot: ModelSnapshot) -> Result<Model> {
        let expected = snapshot.vocabulary.len();
        let vocabulary: HashSet<String> = snapshot.vocabulary.into_iter().collect();
        if vocabulary.len() != expected {
            return Err(SieveError::decode("vocabulary contains duplicate tokens"));
        }

        let classes = snapshot
            .classes
            .into_iter()
            .map(|(label, class)| {
                let stats =
                    ClassStats::from_parts(class.document_count, class.token_counts.into_iter().collect());
                (label, stats)
            })
            .collect();

        Model::from_parts(classes, vocabulary, snapshot.total_documents)
    }

    /// Encode this model as a framed snapshot.
    pub fn encode(&self, format: SnapshotFormat) -> Result<Vec<u8>> {
        self.to_snapshot().encode(format)
    }

    /// Decode and validate a framed snapshot.
    pub fn decode(bytes: &[u8]) -> Result<Model> {
        Model::from_snapshot(ModelSnapshot::decode(bytes)?)
    }
}

/// Serializes `Vec<(String, ClassSnapshot)>` as a map while keeping entry
/// order in both directions.
mod ordered_classes {
    use std::fmt;

    use serde::de::{MapAccess, Visitor};
    use serde::{Deserializer, Serializer};

    use super::ClassSnapshot;

    pub fn serialize<S>(classes: &[(String, ClassSnapshot)], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(classes.iter().map(|(label, class)| (label, class)))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<(String, ClassSnapshot)>, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ClassesVisitor;

        impl<'de> Visitor<'de> for ClassesVisitor {
            type Value = Vec<(String, ClassSnapshot)>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of label to class counts")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut classes = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some(entry) = access.next_entry::<String, ClassSnapshot>()? {
                    classes.push(entry);
                }
                Ok(classes)
            }
        }

        deserializer.deserialize_map(ClassesVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trained_model() -> Model {
        let mut model = Model::new();
        model.add_tokens("theist", ["god", "is", "real"]).unwrap();
        model.add_tokens("neutral", ["nature", "is", "beautiful"]).unwrap();
        model.add_tokens("theist", ["prayer", "works", "god"]).unwrap();
        model
    }

    #[test]
    fn test_snapshot_shape() {
        let snapshot = trained_model().to_snapshot();

        assert_eq!(snapshot.total_documents, 3);
        assert_eq!(snapshot.classes[0].0, "theist");
        assert_eq!(snapshot.classes[1].0, "neutral");
        assert_eq!(snapshot.classes[0].1.document_count, 2);
        assert_eq!(snapshot.classes[0].1.token_counts["god"], 2);

        let mut sorted = snapshot.vocabulary.clone();
        sorted.sort();
        assert_eq!(snapshot.vocabulary, sorted);
        assert_eq!(snapshot.vocabulary.len(), 7);
    }

    #[test]
    fn test_json_keys_and_label_order() {
        let json = trained_model().to_snapshot().to_json().unwrap();
        assert!(json.contains("\"documentCount\""));
        assert!(json.contains("\"tokenCounts\""));
        assert!(json.contains("\"totalDocuments\":3"));
        assert!(json.find("\"theist\"").unwrap() < json.find("\"neutral\"").unwrap());

        let parsed = ModelSnapshot::from_json(&json).unwrap();
        let labels: Vec<&str> = parsed.classes.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, vec!["theist", "neutral"]);
    }

    #[test]
    fn test_model_round_trip() {
        let model = trained_model();
        let restored = Model::from_snapshot(model.to_snapshot()).unwrap();
        assert_eq!(restored, model);
    }

    #[test]
    fn test_framed_round_trip_both_formats() {
        let model = trained_model();
        for format in [SnapshotFormat::Json, SnapshotFormat::Binary] {
            let bytes = model.encode(format).unwrap();
            assert_eq!(&bytes[..4], SNAPSHOT_MAGIC);
            let (snapshot, decoded_format) = ModelSnapshot::decode_with_format(&bytes).unwrap();
            assert_eq!(decoded_format, format);
            assert_eq!(snapshot, model.to_snapshot());
            assert_eq!(Model::decode(&bytes).unwrap(), model);
        }
    }

    #[test]
    fn test_missing_fields_and_bad_types_are_decode_errors() {
        let cases = [
            r#"{ "vocabulary": [], "totalDocuments": 0 }"#,
            r#"{ "classes": {}, "vocabulary": [], "totalDocuments": "three" }"#,
            r#"{ "classes": { "a": { "documentCount": -1, "tokenCounts": {} } }, "vocabulary": [], "totalDocuments": 0 }"#,
            r#"{ "classes": { "a": { "documentCount": 1 } }, "vocabulary": [], "totalDocuments": 1 }"#,
            r#"not json"#,
        ];
        for case in cases {
            assert!(
                matches!(ModelSnapshot::from_json(case), Err(SieveError::Decode(_))),
                "accepted {case}"
            );
        }
    }

    #[test]
    fn test_invariant_violations_are_decode_errors() {
        let cases = [
            // zero-document class would give ln(0) as its prior
            r#"{ "classes": { "a": { "documentCount": 0, "tokenCounts": {} } }, "vocabulary": [], "totalDocuments": 0 }"#,
            r#"{ "classes": { "a": { "documentCount": 1, "tokenCounts": {} } }, "vocabulary": [], "totalDocuments": 5 }"#,
            r#"{ "classes": { "a": { "documentCount": 1, "tokenCounts": { "x": 1 } } }, "vocabulary": [], "totalDocuments": 1 }"#,
            r#"{ "classes": { "a": { "documentCount": 1, "tokenCounts": { "x": 1 } } }, "vocabulary": ["x", "x"], "totalDocuments": 1 }"#,
        ];
        for case in cases {
            let snapshot = ModelSnapshot::from_json(case).unwrap();
            assert!(
                matches!(Model::from_snapshot(snapshot), Err(SieveError::Decode(_))),
                "accepted {case}"
            );
        }
    }

    #[test]
    fn test_corrupt_frames_are_rejected() {
        let bytes = trained_model().encode(SnapshotFormat::Binary).unwrap();

        let mut flipped = bytes.clone();
        let last = flipped.len() - 1;
        flipped[last] ^= 0xff;
        assert!(matches!(Model::decode(&flipped), Err(SieveError::Decode(_))));

        let mut bad_magic = bytes.clone();
        bad_magic[0] = b'X';
        assert!(matches!(Model::decode(&bad_magic), Err(SieveError::Decode(_))));

        let mut bad_version = bytes.clone();
        bad_version[4] = 9;
        assert!(matches!(Model::decode(&bad_version), Err(SieveError::Decode(_))));

        assert!(matches!(Model::decode(&bytes[..10]), Err(SieveError::Decode(_))));
        assert!(matches!(
            Model::decode(&bytes[..bytes.len() - 1]),
            Err(SieveError::Decode(_))
        ));
        assert!(matches!(Model::decode(&[]), Err(SieveError::Decode(_))));
    }

    #[test]
    fn test_empty_model_round_trip() {
        let model = Model::new();
        let bytes = model.encode(SnapshotFormat::Json).unwrap();
        let restored = Model::decode(&bytes).unwrap();
        assert!(!restored.is_trained());
        assert_eq!(restored.total_documents(), 0);
    }
}
