//! A raw row collection plus its derived, filtered visible subset.

use crate::criteria::{FilterCriteria, Record, RecordId};

/// An ordered collection of rows and the criteria narrowing which are shown.
///
/// The visible subset is derived freshly from the current rows and criteria
/// on every call, so there is no cache to invalidate across mutations. The
/// filter is stable: rows are never reordered, only skipped.
#[derive(Debug, Clone, Default)]
pub struct FilterableList<R: Record> {
    items: Vec<R>,
    criteria: FilterCriteria,
}

impl<R: Record> FilterableList<R> {
    /// An empty list with no active filter.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            criteria: FilterCriteria::default(),
        }
    }

    /// A list holding `items`, with no active filter.
    pub fn from_items(items: Vec<R>) -> Self {
        Self {
            items,
            criteria: FilterCriteria::default(),
        }
    }

    /// Replace the active filter criteria.
    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
    }

    /// The active filter criteria.
    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Mutable access to the active filter criteria.
    pub fn criteria_mut(&mut self) -> &mut FilterCriteria {
        &mut self.criteria
    }

    /// The rows matching every active constraint, in their original order.
    pub fn visible(&self) -> impl Iterator<Item = &R> {
        self.items.iter().filter(|item| self.criteria.matches(*item))
    }

    /// The number of rows matching the active criteria.
    pub fn visible_count(&self) -> usize {
        self.visible().count()
    }

    /// The visible rows belonging to 1-indexed `page` at `page_size` rows
    /// per page.
    pub fn page_of(&self, page: u64, page_size: u64) -> Vec<&R> {
        let skip = page.saturating_sub(1) * page_size;

        self.visible()
            .skip(skip as usize)
            .take(page_size as usize)
            .collect()
    }

    /// Every row in the raw collection, unfiltered.
    pub fn items(&self) -> &[R] {
        &self.items
    }

    /// Look up a row by its id.
    pub fn get(&self, id: RecordId) -> Option<&R> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Replace the raw collection, e.g. after a (re)load from the API.
    pub fn replace_items(&mut self, items: Vec<R>) {
        self.items = items;
    }

    /// Append a row to the end of the raw collection.
    pub fn push(&mut self, item: R) {
        self.items.push(item);
    }

    /// Remove the row with `id`, preserving the order of the rest.
    ///
    /// Removing an absent id is a no-op; the return value reports whether a
    /// row was actually removed.
    pub fn remove(&mut self, id: RecordId) -> bool {
        match self.items.iter().position(|item| item.id() == id) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    /// Apply `patch` to the row with `id`.
    ///
    /// Updating an absent id is a no-op; the return value reports whether a
    /// row was found.
    pub fn update(&mut self, id: RecordId, patch: impl FnOnce(&mut R)) -> bool {
        match self.items.iter_mut().find(|item| item.id() == id) {
            Some(item) => {
                patch(item);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::criteria::{FilterCriteria, Record, RecordId};

    use super::FilterableList;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: RecordId,
        text: String,
        kind: &'static str,
    }

    impl Record for Row {
        fn id(&self) -> RecordId {
            self.id
        }

        fn search_text(&self) -> String {
            self.text.clone()
        }

        fn kind(&self) -> Option<&str> {
            Some(self.kind)
        }

        fn date(&self) -> Option<time::Date> {
            Some(date!(2026 - 08 - 01))
        }
    }

    fn row(id: RecordId, text: &str, kind: &'static str) -> Row {
        Row {
            id,
            text: text.to_owned(),
            kind,
        }
    }

    fn mixed_rows(count: usize) -> Vec<Row> {
        (1..=count as RecordId)
            .map(|id| {
                let kind = if id % 3 == 0 { "income" } else { "expense" };
                row(id, &format!("row {id}"), kind)
            })
            .collect()
    }

    #[test]
    fn empty_criteria_is_the_identity() {
        let rows = mixed_rows(8);
        let list = FilterableList::from_items(rows.clone());

        let visible: Vec<Row> = list.visible().cloned().collect();

        assert_eq!(rows, visible);
    }

    #[test]
    fn clearing_criteria_restores_original_order() {
        let rows = mixed_rows(8);
        let mut list = FilterableList::from_items(rows.clone());

        list.set_criteria(FilterCriteria {
            kind: "income".to_owned(),
            ..FilterCriteria::default()
        });
        list.set_criteria(FilterCriteria::default());

        let visible: Vec<Row> = list.visible().cloned().collect();

        assert_eq!(rows, visible);
    }

    #[test]
    fn kind_filter_keeps_matching_subset_in_order() {
        let mut list = FilterableList::from_items(mixed_rows(15));

        list.set_criteria(FilterCriteria {
            kind: "income".to_owned(),
            ..FilterCriteria::default()
        });

        let ids: Vec<RecordId> = list.visible().map(Record::id).collect();

        assert_eq!(ids, vec![3, 6, 9, 12, 15]);
        assert_eq!(list.visible_count(), 5);
    }

    #[test]
    fn visible_reflects_mutations_immediately() {
        let mut list = FilterableList::from_items(mixed_rows(4));

        list.remove(2);
        list.update(3, |item| item.text = "renamed".to_owned());
        list.push(row(9, "appended", "expense"));

        let texts: Vec<String> = list.visible().map(|item| item.text.clone()).collect();

        assert_eq!(texts, vec!["row 1", "renamed", "row 4", "appended"]);
    }

    #[test]
    fn remove_and_update_tolerate_absent_ids() {
        let mut list = FilterableList::from_items(mixed_rows(3));

        assert!(!list.remove(42));
        assert!(!list.update(42, |item| item.text.clear()));
        assert_eq!(list.items().len(), 3);
    }

    #[test]
    fn page_of_slices_the_visible_rows() {
        let list = FilterableList::from_items(mixed_rows(12));

        let page: Vec<RecordId> = list.page_of(3, 5).iter().map(|item| item.id()).collect();

        assert_eq!(page, vec![11, 12]);
    }

    #[test]
    fn page_of_pages_the_filtered_subset_not_the_raw_rows() {
        let mut list = FilterableList::from_items(mixed_rows(15));

        list.set_criteria(FilterCriteria {
            kind: "income".to_owned(),
            ..FilterCriteria::default()
        });

        let page: Vec<RecordId> = list.page_of(2, 3).iter().map(|item| item.id()).collect();

        assert_eq!(page, vec![12, 15]);
    }
}
