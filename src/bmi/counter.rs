use serde_json::Value as JsonValue;

use super::category::BmiCategory;
use super::classifier::ClassifiedRecord;
use crate::error::BmiError;

/// Number of records whose `BMICat` label equals `label` exactly
/// (case-sensitive). Unknown labels count zero.
pub fn count_category(records: &[ClassifiedRecord], label: &str) -> usize {
    records
        .iter()
        .filter(|r| r.bmi_cat.is_some_and(|c| c.label() == label))
        .count()
}

/// [`count_category`] for a label of unknown type, e.g. one read from a
/// JSON labels file. Anything but a string is a [`BmiError::LabelType`].
pub fn count_label(records: &[ClassifiedRecord], label: &JsonValue) -> Result<usize, BmiError> {
    match label {
        JsonValue::String(s) => Ok(count_category(records, s)),
        other => Err(BmiError::LabelType {
            found: json_type_name(other),
        }),
    }
}

/// Count each label, keeping the caller's order. A repeated label keeps its
/// first position.
pub fn count_all<S: AsRef<str>>(records: &[ClassifiedRecord], labels: &[S]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::with_capacity(labels.len());
    for label in labels {
        let label = label.as_ref();
        if counts.iter().any(|(l, _)| l == label) {
            continue;
        }
        counts.push((label.to_string(), count_category(records, label)));
    }
    counts
}

/// Count of every category, lowest BMI first.
pub fn summary(records: &[ClassifiedRecord]) -> Vec<(BmiCategory, usize)> {
    BmiCategory::ALL
        .into_iter()
        .map(|cat| (cat, records.iter().filter(|r| r.bmi_cat == Some(cat)).count()))
        .collect()
}

fn json_type_name(val: &JsonValue) -> &'static str {
    match val {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bmi::classifier::classify;
    use crate::bmi::validator::Measurement;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn records() -> Vec<ClassifiedRecord> {
        let ms: Vec<Measurement> = [17.0, 22.0, 23.0, 27.0, 42.0]
            .into_iter()
            .map(|weight_kg| Measurement::new("Male", 100.0, weight_kg))
            .collect();
        classify(&ms)
    }

    #[test]
    fn exact_labels() {
        let recs = records();
        assert_eq!(count_category(&recs, "Normal weight"), 2);
        assert_eq!(count_category(&recs, "Underweight"), 1);
        assert_eq!(count_category(&recs, "Severely obese"), 0);
        assert_eq!(count_category(&recs, "normal weight"), 0);
        assert_eq!(count_category(&recs, "foo"), 0);
    }

    #[test]
    fn non_string_labels_are_type_errors() {
        let recs = records();
        assert_eq!(count_label(&recs, &json!("Overweight")), Ok(1));
        assert_eq!(
            count_label(&recs, &json!(0)),
            Err(BmiError::LabelType { found: "number" })
        );
        assert_eq!(
            count_label(&recs, &json!(true)),
            Err(BmiError::LabelType { found: "boolean" })
        );
        assert_eq!(
            count_label(&recs, &json!(null)),
            Err(BmiError::LabelType { found: "null" })
        );
    }

    #[test]
    fn count_all_keeps_order_and_dedups() {
        let recs = records();
        let counts = count_all(&recs, &["Overweight", "foo", "Normal weight", "Overweight"]);
        assert_eq!(
            counts,
            vec![
                ("Overweight".to_string(), 1),
                ("foo".to_string(), 0),
                ("Normal weight".to_string(), 2),
            ]
        );
    }

    #[test]
    fn summary_covers_every_category() {
        let counts: Vec<usize> = summary(&records()).into_iter().map(|(_, n)| n).collect();
        assert_eq!(counts, vec![1, 2, 1, 0, 0, 1]);
    }
}
