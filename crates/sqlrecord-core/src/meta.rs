//! Track which fields of a record were touched since it was loaded or built.
//!
//! Every record embeds one [`MetaBag`]. The touched-field list drives how a
//! column is materialized in INSERT and UPDATE statements: touched columns are
//! sent, untouched ones fall back to the schema default (INSERT) or are left
//! as they are (UPDATE).

/// Per-record change-tracking sidecar.
///
/// A freshly constructed or freshly hydrated record carries an empty bag.
/// Setters append to `touched_fields`; the only removal is the reset after a
/// successful write.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetaBag {
    annotations: Vec<(String, String)>,
    touched_fields: Vec<&'static str>,
}

impl MetaBag {
    /// Create an empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Field names touched so far, in touch order. May contain duplicates.
    pub fn touched_fields(&self) -> &[&'static str] {
        &self.touched_fields
    }

    /// Check whether `field` has been touched.
    #[must_use]
    pub fn is_touched(&self, field: &str) -> bool {
        self.touched_fields.iter().any(|touched| *touched == field)
    }

    /// True if any field has been touched.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        !self.touched_fields.is_empty()
    }

    /// Mark `field` as touched.
    ///
    /// Touching twice is harmless: only membership is ever tested.
    pub fn touch(&mut self, field: &'static str) {
        tracing::trace!(field, "touched field");
        self.touched_fields.push(field);
    }

    /// Forget all touched fields. Called after a successful create or update.
    pub fn reset_touched(&mut self) {
        self.touched_fields.clear();
    }

    /// Attach a free-form annotation, e.g. a validation message for `key`.
    pub fn annotate(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.annotations.push((key.into(), message.into()));
    }

    /// All annotations, in insertion order.
    pub fn annotations(&self) -> &[(String, String)] {
        &self.annotations
    }

    /// Annotations recorded for `key`.
    pub fn annotations_for<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.annotations
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Drop every annotation. The touched-set is left alone.
    pub fn clear_annotations(&mut self) {
        self.annotations.clear();
    }
}
