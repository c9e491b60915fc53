// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

// A record for sequences, consisting of an identifier, an optional free-text description, and a
// raw sequence. Meant to be format-agnostic: FastA headers carry a description, Clustal and
// Stockholm rows only an id.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeqRecord {
    pub id: String,
    pub description: String,
    pub sequence: String,
}

impl SeqRecord {
    pub fn new(id: impl Into<String>, sequence: impl Into<String>) -> Self {
        SeqRecord {
            id: id.into(),
            description: String::new(),
            sequence: sequence.into(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Splits a FastA-style header at the first run of whitespace: the first word is the id, the
    /// rest (if any) the description.
    pub fn from_header(header: &str, sequence: impl Into<String>) -> Self {
        let header = header.trim();
        let (id, description) = match header.split_once(char::is_whitespace) {
            Some((id, rest)) => (id, rest.trim_start()),
            None => (header, ""),
        };
        SeqRecord::new(id, sequence).with_description(description)
    }

    pub fn header(&self) -> String {
        if self.description.is_empty() {
            self.id.clone()
        } else {
            format!("{} {}", self.id, self.description)
        }
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_header_with_description() {
        let rec = SeqRecord::from_header("sp|P69905|HBA_HUMAN Hemoglobin  alpha", "MVLS");
        assert_eq!(rec.id, "sp|P69905|HBA_HUMAN");
        assert_eq!(rec.description, "Hemoglobin  alpha");
        assert_eq!(rec.header(), "sp|P69905|HBA_HUMAN Hemoglobin  alpha");
    }

    #[test]
    fn test_from_header_id_only() {
        let rec = SeqRecord::from_header("seq1", "GAATTC");
        assert_eq!(rec.id, "seq1");
        assert!(rec.description.is_empty());
        assert_eq!(rec.header(), "seq1");
        assert_eq!(rec.len(), 6);
    }
}
