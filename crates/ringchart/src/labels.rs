use crate::PLACEHOLDER_LABEL;
use crate::category::{Category, CategoryId};
use crate::state::Selection;

/// Host-supplied currency/locale formatting.
pub trait ValueFormatter {
    fn format_value(&self, value: f64) -> String;
}

impl<F> ValueFormatter for F
where
    F: Fn(f64) -> String,
{
    fn format_value(&self, value: f64) -> String {
        self(value)
    }
}

/// Spoken description of one segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentLabel {
    pub id: CategoryId,
    pub text: String,
    pub selected: bool,
}

/// One label per category, in ring order. `selected` is the selected index.
pub fn segment_labels(
    categories: &[Category],
    selected: Option<usize>,
    formatter: &dyn ValueFormatter,
) -> Vec<SegmentLabel> {
    categories
        .iter()
        .enumerate()
        .map(|(i, c)| SegmentLabel {
            id: c.id().clone(),
            text: format!("{}, {}", c.name(), formatter.format_value(c.value())),
            selected: selected == Some(i),
        })
        .collect()
}

pub fn center_label(selection: &Selection<'_>, formatter: &dyn ValueFormatter) -> String {
    match selection {
        Selection::Selected { category, .. } => format!(
            "{} selected, {}",
            category.name(),
            formatter.format_value(category.value())
        ),
        Selection::Empty => PLACEHOLDER_LABEL.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::sample;
    use crate::state::ChartState;

    fn dollars(value: f64) -> String {
        format!("${value:.2}")
    }

    #[test]
    fn test_segment_labels_follow_selection() {
        let state = ChartState::new(vec![sample("food", 40.0), sample("rent", 60.0)], None);
        let labels = segment_labels(state.categories(), state.selection().index(), &dollars);

        assert_eq!(
            labels,
            vec![
                SegmentLabel {
                    id: CategoryId::from("food"),
                    text: "FOOD, $40.00".to_string(),
                    selected: true,
                },
                SegmentLabel {
                    id: CategoryId::from("rent"),
                    text: "RENT, $60.00".to_string(),
                    selected: false,
                },
            ]
        );
    }

    #[test]
    fn test_duplicate_ids_announce_one_selection() {
        let cats = vec![sample("a", 1.0), sample("b", 2.0), sample("b", 3.0)];
        let state = ChartState::new(cats, Some(&CategoryId::from("b")));

        let flags: Vec<_> = segment_labels(state.categories(), state.selection().index(), &dollars)
            .iter()
            .map(|l| l.selected)
            .collect();
        assert_eq!(flags, vec![false, true, false]);
    }

    #[test]
    fn test_center_label() {
        let state = ChartState::new(vec![sample("rent", 1250.0)], None);
        assert_eq!(
            center_label(&state.selection(), &dollars),
            "RENT selected, $1250.00"
        );
        assert_eq!(center_label(&Selection::Empty, &dollars), "No data");
    }
}
